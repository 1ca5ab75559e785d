/*!
# Graph Representations

Both representations of this module are **write-once** CSR graphs sharing the flat buffer
described in [`layout`]:

- [`CsrGraph`]: adjacency form; an edge is the pair `Edge(tail, head)` and the neighbor region
  stores heads.
- [`IncidenceCsr`]: incidence form; an edge is its index `0..m`, the neighbor region stores
  edge ids and two extra regions store head and tail per edge. [`IncidenceGraph`] is directed,
  [`UndirectedIncidenceGraph`] lists each non-loop edge at both endpoints.

Graphs are built either in one batch from an edge list ([`GraphFromEdges`]) or incrementally
with a [`CsrBuilder`].
*/

use crate::*;

mod builder;
mod csr;
mod incidence;
pub mod layout;

pub use builder::*;
pub use csr::*;
pub use incidence::*;
pub use layout::CsrLayout;

/// What to do with edges that reference a vertex outside of `0..n` during batch construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRangePolicy {
    /// The edge is silently excluded from the graph
    #[default]
    Drop,
    /// Construction fails with [`GraphError::EdgeOutOfRange`]
    Reject,
}

/// Configuration of batch construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsrOptions {
    vertex_count: Option<NumNodes>,
    out_of_range: OutOfRangePolicy,
}

impl CsrOptions {
    /// Infer the vertex count, drop out-of-range edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the number of vertices instead of inferring `max(endpoint) + 1`
    pub fn set_vertex_count(&mut self, n: NumNodes) {
        self.vertex_count = Some(n);
    }

    /// Builder-style variant of [`Self::set_vertex_count`]
    pub fn vertex_count(mut self, n: NumNodes) -> Self {
        self.set_vertex_count(n);
        self
    }

    /// Sets the policy for edges with an endpoint outside of `0..n`
    pub fn set_out_of_range(&mut self, policy: OutOfRangePolicy) {
        self.out_of_range = policy;
    }

    /// Builder-style variant of [`Self::set_out_of_range`]
    pub fn out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.set_out_of_range(policy);
        self
    }

    /// Returns the requested vertex count, if any
    pub fn requested_vertex_count(&self) -> Option<NumNodes> {
        self.vertex_count
    }

    /// Returns the configured out-of-range policy
    pub fn policy(&self) -> OutOfRangePolicy {
        self.out_of_range
    }

    /// Validates `edges` against this configuration and returns the vertex count together with
    /// the number of edges that will be stored.
    pub(crate) fn prepare(&self, edges: &[Edge]) -> Result<(NumNodes, NumEdges)> {
        if edges.len() >= EdgeId::MAX as usize {
            return Err(GraphError::TooManyEdges {
                requested: edges.len() as u64,
            });
        }

        let n = match self.vertex_count {
            Some(n) => try_vertex_count(n)?,
            None => match edges.iter().map(Edge::max_node).max() {
                None => 0,
                Some(INVALID_NODE) => {
                    return Err(GraphError::InvalidNode {
                        what: "endpoint",
                        value: INVALID_NODE,
                    });
                }
                Some(max) => try_vertex_count(max + 1)?,
            },
        };

        let retained = match self.out_of_range {
            OutOfRangePolicy::Drop => edges.iter().filter(|e| e.is_within(n)).count(),
            OutOfRangePolicy::Reject => {
                if let Some(&edge) = edges.iter().find(|e| !e.is_within(n)) {
                    return Err(GraphError::EdgeOutOfRange {
                        edge,
                        vertex_count: n,
                    });
                }
                edges.len()
            }
        };

        let dropped = edges.len() - retained;
        if dropped > 0 {
            tracing::debug!(dropped, vertex_count = n, "dropped out-of-range edges");
        }

        Ok((n, retained as NumEdges))
    }
}

/// Access to the flat buffer of a CSR representation
pub trait CsrStorage {
    /// Returns the underlying layout
    fn layout(&self) -> &CsrLayout;
}

/// Batch construction of CSR graphs from edge lists.
///
/// All variants run in `O(m log m)` due to a stable sort by tail: edges sharing a tail keep
/// their relative input order in the out-list of that tail.
pub trait GraphFromEdges: Sized {
    /// Builds a graph from `edges` according to `options`.
    ///
    /// The adjacency form sorts `edges` by tail **in place**; the incidence form leaves the
    /// slice untouched as edge ids are input positions.
    ///
    /// # Errors
    /// Fails if an edge is out of range under [`OutOfRangePolicy::Reject`], if the inferred
    /// vertex count overflows, or if there are too many edges.
    fn try_from_edges_with(edges: &mut [Edge], options: CsrOptions) -> Result<Self>;

    /// Builds a graph with `n` vertices; edges with an endpoint `>= n` are dropped.
    ///
    /// # Panics
    /// Panics if the number of edges exceeds the `EdgeId` space.
    fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        let mut edges: Vec<Edge> = edges.into_iter().map(|e| e.into()).collect();
        match Self::try_from_edges_with(&mut edges, CsrOptions::new().vertex_count(n)) {
            Ok(graph) => graph,
            Err(err) => panic!("cannot build graph: {err}"),
        }
    }

    /// Builds a graph whose vertex count is `max(endpoint) + 1` (zero for an empty list).
    ///
    /// # Panics
    /// Panics if an endpoint equals [`INVALID_NODE`] or the number of edges exceeds the
    /// `EdgeId` space.
    fn from_edge_list<I, E>(edges: I) -> Self
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        let mut edges: Vec<Edge> = edges.into_iter().map(|e| e.into()).collect();
        match Self::try_from_edges_with(&mut edges, CsrOptions::new()) {
            Ok(graph) => graph,
            Err(err) => panic!("cannot build graph: {err}"),
        }
    }
}
