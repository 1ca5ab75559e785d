/*!
# Incidence CSR Graph

[`IncidenceCsr`] identifies every edge by its index `e` in `0..m`. The neighbor region of the
[`CsrLayout`] holds edge ids grouped by tail, and two extra regions hold the head and the tail of
every edge. Edge ids follow the input order after out-of-range edges have been removed.

In the undirected variant each non-loop edge `e = {u, v}` with `u` its first endpoint is listed
as `e` in the out-list of `u` and as `!e` in the out-list of `v`; `!e` denotes `e` traversed from
`v` to `u`. Self-loops are listed once. Hence at most `2^31` undirected edges are supported.
*/

use std::{iter::Copied, marker::PhantomData, slice::Iter};

use super::{layout::RawLayout, *};
use crate::{ops::*, testing::test_csr_graph};

pub(super) const HEADS: usize = 0;
pub(super) const TAILS: usize = 1;

/// Largest edge count of an undirected incidence graph; ids `>= 2^31` denote reversed edges
pub const MAX_UNDIRECTED_EDGES: u64 = 1 << 31;

/// Incidence-form CSR graph; see the [module docs](self)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceCsr<D: GraphDir = Directed> {
    layout: CsrLayout,
    _dir: PhantomData<D>,
}

/// Directed incidence graph
pub type IncidenceGraph = IncidenceCsr<Directed>;

/// Undirected incidence graph
pub type UndirectedIncidenceGraph = IncidenceCsr<Undirected>;

impl<D: GraphDir> Default for IncidenceCsr<D> {
    fn default() -> Self {
        Self::from_layout(CsrLayout::default())
    }
}

impl<D: GraphDir> IncidenceCsr<D> {
    pub(crate) fn from_layout(layout: CsrLayout) -> Self {
        Self {
            layout,
            _dir: PhantomData,
        }
    }

    /// Returns the head of every edge, indexed by edge id
    pub fn heads(&self) -> &[Node] {
        self.layout.extra_region(HEADS)
    }

    /// Returns the tail of every edge, indexed by edge id
    pub fn tails(&self) -> &[Node] {
        self.layout.extra_region(TAILS)
    }

    /// Returns the endpoints of `edge` as stored, or `None` if `edge` does not exist.
    ///
    /// For a reversed id `!e` of an undirected graph the endpoints are swapped.
    pub fn endpoints(&self, edge: EdgeId) -> Option<Edge> {
        Some(Edge(self.try_get_tail(edge)?, self.try_get_head(edge)?))
    }

    /// Returns the canonical id of `edge`, i.e. `e` for both `e` and `!e`
    pub fn canonical_edge_id(&self, edge: EdgeId) -> Option<EdgeId> {
        self.resolve(edge).map(|(idx, _)| idx as EdgeId)
    }

    /// Resolves `edge` to its index in the extra regions and whether it is traversed reversed
    #[inline]
    fn resolve(&self, edge: EdgeId) -> Option<(usize, bool)> {
        let m = self.number_of_edges();
        if edge < m {
            Some((edge as usize, false))
        } else if !D::IS_DIRECTED && reverse_edge_id(edge) < m {
            Some((reverse_edge_id(edge) as usize, true))
        } else {
            None
        }
    }
}

impl<D: GraphDir> CsrStorage for IncidenceCsr<D> {
    fn layout(&self) -> &CsrLayout {
        &self.layout
    }
}

impl<D: GraphDir> GraphType for IncidenceCsr<D> {
    type Dir = D;
}

impl<D: GraphDir> GraphNodeOrder for IncidenceCsr<D> {
    fn number_of_nodes(&self) -> NumNodes {
        self.layout.vertex_count()
    }
}

impl<D: GraphDir> GraphEdgeOrder for IncidenceCsr<D> {
    fn number_of_edges(&self) -> NumEdges {
        self.layout.edge_count()
    }
}

impl<D: GraphDir> Incidence for IncidenceCsr<D> {
    type EdgeId = EdgeId;

    fn try_get_tail(&self, edge: EdgeId) -> Option<Node> {
        let (idx, reversed) = self.resolve(edge)?;
        let region = if reversed { HEADS } else { TAILS };
        Some(self.layout.extra_region(region)[idx])
    }

    fn try_get_head(&self, edge: EdgeId) -> Option<Node> {
        let (idx, reversed) = self.resolve(edge)?;
        let region = if reversed { TAILS } else { HEADS };
        Some(self.layout.extra_region(region)[idx])
    }
}

impl<D: GraphDir> OutEdges for IncidenceCsr<D> {
    type OutEdgesIter<'a>
        = Copied<Iter<'a, EdgeId>>
    where
        Self: 'a;

    fn out_edges_of(&self, u: Node) -> Self::OutEdgesIter<'_> {
        self.layout.out_iter(u)
    }

    fn out_degree_of(&self, u: Node) -> NumEdges {
        self.layout.out_len(u)
    }

    fn total_out_degree(&self) -> u64 {
        self.layout.neighbor_region().len() as u64
    }
}

impl<D: GraphDir> OutNeighbors for IncidenceCsr<D> {
    type NeighborIter<'a>
        = HeadsIter<'a>
    where
        Self: 'a;

    fn out_neighbors_of(&self, u: Node) -> Self::NeighborIter<'_> {
        HeadsIter {
            edges: self.layout.out_slice(u).iter(),
            heads: self.heads(),
            tails: self.tails(),
        }
    }
}

impl<D: GraphDir> GraphFromEdges for IncidenceCsr<D> {
    #[tracing::instrument(level = "debug", skip_all, fields(edges = edges.len(), directed = D::IS_DIRECTED))]
    fn try_from_edges_with(edges: &mut [Edge], options: CsrOptions) -> Result<Self> {
        let (n, m) = options.prepare(edges)?;
        if !D::IS_DIRECTED && m as u64 > MAX_UNDIRECTED_EDGES {
            return Err(GraphError::TooManyEdges {
                requested: m as u64,
            });
        }

        let retained = edges.iter().filter(|e| e.is_within(n));

        let capacity = if D::IS_DIRECTED {
            m as usize
        } else {
            m as usize + retained.clone().filter(|e| e.0 != e.1).count()
        };
        let mut raw = RawLayout::try_new(n, m, capacity, 2)?;

        let mut entries: Vec<(Node, EdgeId)> = Vec::with_capacity(capacity);
        for (e, &Edge(u, v)) in retained.clone().enumerate() {
            let e = e as EdgeId;
            entries.push((u, e));
            if !D::IS_DIRECTED && u != v {
                entries.push((v, reverse_edge_id(e)));
            }
        }
        entries.sort_by_key(|&(u, _)| u);
        raw.write_sorted_runs(entries);

        for (slot, edge) in raw.extra_region_mut(HEADS).iter_mut().zip(retained.clone()) {
            *slot = edge.1;
        }
        for (slot, edge) in raw.extra_region_mut(TAILS).iter_mut().zip(retained) {
            *slot = edge.0;
        }

        Ok(Self::from_layout(raw.finish()))
    }
}

// ---------- Custom Iterators ----------

/// Out-neighbors of a vertex in an [`IncidenceCsr`], resolved through the head region
#[derive(Debug, Clone)]
pub struct HeadsIter<'a> {
    edges: Iter<'a, EdgeId>,
    heads: &'a [Node],
    tails: &'a [Node],
}

impl Iterator for HeadsIter<'_> {
    type Item = Node;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let &e = self.edges.next()?;
        // only undirected graphs store reversed ids, which are the only ids `>= m`
        Some(match self.heads.get(e as usize) {
            Some(&v) => v,
            None => self.tails[reverse_edge_id(e) as usize],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl ExactSizeIterator for HeadsIter<'_> {}

// ---------- Testing ----------

test_csr_graph!(test_incidence_graph, IncidenceGraph, false);
test_csr_graph!(test_undirected_incidence_graph, UndirectedIncidenceGraph, true);
