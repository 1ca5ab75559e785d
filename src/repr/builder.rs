/*!
# Incremental CSR Builder

A [`CsrBuilder`] keeps one [`GrowableArray`] of edge ids per vertex plus the tail and head of
every edge. Vertices are created on demand: adding `(u, v)` grows the vertex count to
`max(u, v) + 1`. Calling [`CsrBuilder::into_graph`] consumes the builder and flattens all
buckets into a single [`CsrLayout`] in vertex order.
*/

use std::marker::PhantomData;

use super::{
    incidence::{HEADS, TAILS},
    layout::{RawLayout, buffer_len},
    *,
};
use crate::{
    ops::*,
    testing::test_csr_graph,
    utils::{GrowableArray, growable::DEFAULT_CAPACITY},
};

/// Incremental builder of [`IncidenceCsr`] (and, for directed graphs, [`CsrGraph`]).
///
/// # Example
/// ```
/// use csrkit::prelude::*;
///
/// let mut builder = CsrBuilder::<Directed>::new();
/// builder.add_edge(0, 2);
/// builder.add_edge(2, 1);
/// let graph = builder.into_graph();
///
/// assert_eq!(graph.number_of_nodes(), 3);
/// assert_eq!(graph.out_neighbors_of(2).collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct CsrBuilder<D: GraphDir = Directed> {
    bucket_capacity: usize,
    buckets: Vec<GrowableArray<EdgeId>>,
    entries: usize,
    tails: GrowableArray<Node>,
    heads: GrowableArray<Node>,
    _dir: PhantomData<D>,
}

impl<D: GraphDir> Default for CsrBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GraphDir> CsrBuilder<D> {
    /// Creates a builder without vertices and edges
    pub fn new() -> Self {
        Self {
            bucket_capacity: DEFAULT_CAPACITY,
            buckets: Vec::new(),
            entries: 0,
            tails: GrowableArray::new(),
            heads: GrowableArray::new(),
            _dir: PhantomData,
        }
    }

    /// Creates a builder with `n` isolated vertices and room for `m` edges.
    ///
    /// # Errors
    /// Fails with [`GraphError::TooManyNodes`] if `n` exceeds [`MAX_NODES`], e.g. for a
    /// wrapped negative count.
    pub fn try_with_capacity(n: NumNodes, m: NumEdges) -> Result<Self> {
        let n = try_vertex_count(n)?;
        let mut builder = Self {
            bucket_capacity: DEFAULT_CAPACITY,
            buckets: Vec::with_capacity(n as usize),
            entries: 0,
            tails: GrowableArray::with_capacity(m as usize),
            heads: GrowableArray::with_capacity(m as usize),
            _dir: PhantomData,
        };
        builder.try_ensure_vertex_count(n)?;
        Ok(builder)
    }

    /// Creates a builder with `n` isolated vertices and room for `m` edges.
    ///
    /// # Panics
    /// Panics if [`CsrBuilder::try_with_capacity`] fails.
    pub fn with_capacity(n: NumNodes, m: NumEdges) -> Self {
        match Self::try_with_capacity(n, m) {
            Ok(builder) => builder,
            Err(err) => panic!("cannot create builder: {err}"),
        }
    }

    /// Sets the capacity a vertex bucket allocates on its first edge (default
    /// [`DEFAULT_CAPACITY`]). Only affects vertices created afterwards.
    pub fn set_bucket_capacity(&mut self, capacity: usize) {
        self.bucket_capacity = capacity;
    }

    /// Builder-style variant of [`CsrBuilder::set_bucket_capacity`]
    pub fn bucket_capacity(mut self, capacity: usize) -> Self {
        self.set_bucket_capacity(capacity);
        self
    }

    /// Returns the current number of vertices
    pub fn number_of_nodes(&self) -> NumNodes {
        self.buckets.len() as NumNodes
    }

    /// Returns the number of edges added so far
    pub fn number_of_edges(&self) -> NumEdges {
        self.tails.len() as NumEdges
    }

    /// Grows the vertex set to at least `n` vertices.
    ///
    /// # Errors
    /// Fails if `n` exceeds [`MAX_NODES`] or the flattened graph would not fit a `u32` buffer.
    pub fn try_ensure_vertex_count(&mut self, n: NumNodes) -> Result<()> {
        if self.buckets.len() < n as usize {
            self.check_size(n, self.number_of_edges(), self.entries)?;
            self.grow_to(n);
        }
        Ok(())
    }

    /// Fails unless a graph with `n` vertices, `m` edges and `entries` bucket entries fits
    fn check_size(&self, n: NumNodes, m: NumEdges, entries: usize) -> Result<()> {
        try_vertex_count(n)?;
        buffer_len(n, m, entries, 2)?;
        Ok(())
    }

    fn grow_to(&mut self, n: NumNodes) {
        if self.buckets.len() < n as usize {
            let capacity = self.bucket_capacity;
            self.buckets
                .resize_with(n as usize, || GrowableArray::with_first_capacity(capacity));
        }
    }

    /// Adds an isolated vertex and returns it.
    ///
    /// # Errors
    /// Fails if the vertex space is exhausted.
    pub fn try_add_vertex(&mut self) -> Result<Node> {
        let u = self.number_of_nodes();
        if u >= MAX_NODES {
            return Err(GraphError::TooManyNodes {
                requested: u as u64 + 1,
            });
        }
        self.check_size(u + 1, self.number_of_edges(), self.entries)?;
        self.buckets
            .push(GrowableArray::with_first_capacity(self.bucket_capacity));
        Ok(u)
    }

    /// Returns the edge ids currently listed at `u` in insertion order
    pub fn bucket_of(&self, u: Node) -> &[EdgeId] {
        self.buckets
            .get(u as usize)
            .map_or(&[][..], GrowableArray::as_slice)
    }

    /// Adds the edge `(tail, head)` and returns its id.
    ///
    /// # Errors
    /// Fails if an endpoint equals [`INVALID_NODE`] (e.g. a wrapped negative index) or the edge
    /// space is exhausted.
    pub fn try_add_edge(&mut self, tail: Node, head: Node) -> Result<EdgeId> {
        let Edge(tail, head) = Edge::try_new(tail, head)?;

        let limit = if D::IS_DIRECTED {
            INVALID_EDGE as u64
        } else {
            MAX_UNDIRECTED_EDGES
        };
        if self.tails.len() as u64 >= limit {
            return Err(GraphError::TooManyEdges {
                requested: self.tails.len() as u64 + 1,
            });
        }

        let n = self.number_of_nodes().max(tail.max(head) + 1);
        let added = if !D::IS_DIRECTED && tail != head { 2 } else { 1 };
        self.check_size(n, self.number_of_edges() + 1, self.entries + added)?;

        Ok(self.add_edge_unchecked(tail, head))
    }

    /// Adds an edge given by signed endpoints, see [`CsrBuilder::try_add_edge`].
    ///
    /// # Errors
    /// Fails with [`GraphError::NegativeIndex`] on a negative endpoint.
    pub fn try_add_signed_edge(&mut self, tail: i64, head: i64) -> Result<EdgeId> {
        let Edge(tail, head) = Edge::try_from((tail, head))?;
        self.try_add_edge(tail, head)
    }

    /// Adds the edge `(tail, head)` and returns its id.
    ///
    /// # Panics
    /// Panics if [`CsrBuilder::try_add_edge`] fails.
    pub fn add_edge(&mut self, tail: Node, head: Node) -> EdgeId {
        match self.try_add_edge(tail, head) {
            Ok(e) => e,
            Err(err) => panic!("cannot add edge ({tail},{head}): {err}"),
        }
    }

    /// Adds all edges of `edges` in order
    pub fn extend_edges<I, E>(&mut self, edges: I) -> Result<()>
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        for Edge(u, v) in edges.into_iter().map(|e| e.into()) {
            self.try_add_edge(u, v)?;
        }
        Ok(())
    }

    /// Adds an edge assuming both endpoints are valid and the edge space is not exhausted
    pub(crate) fn add_edge_unchecked(&mut self, tail: Node, head: Node) -> EdgeId {
        debug_assert!(tail != INVALID_NODE && head != INVALID_NODE);

        let e = self.tails.len() as EdgeId;
        self.grow_to(tail.max(head) + 1);

        self.tails.push(tail);
        self.heads.push(head);
        self.buckets[tail as usize].push(e);
        self.entries += 1;
        if !D::IS_DIRECTED && tail != head {
            self.buckets[head as usize].push(reverse_edge_id(e));
            self.entries += 1;
        }

        e
    }

    /// Flattens all buckets into an [`IncidenceCsr`]; the builder is consumed.
    #[tracing::instrument(level = "debug", skip_all, fields(n = self.buckets.len(), m = self.tails.len()))]
    pub fn into_graph(self) -> IncidenceCsr<D> {
        let n = self.number_of_nodes();
        let m = self.number_of_edges();
        debug_assert_eq!(
            self.entries,
            self.buckets.iter().map(GrowableArray::len).sum::<usize>()
        );

        let mut raw = RawLayout::new(n, m, self.entries, 2);
        raw.write_buckets(self.buckets.iter().map(GrowableArray::as_slice));
        raw.extra_region_mut(HEADS)
            .copy_from_slice(self.heads.as_slice());
        raw.extra_region_mut(TAILS)
            .copy_from_slice(self.tails.as_slice());

        IncidenceCsr::from_layout(raw.finish())
    }
}

impl CsrBuilder<Directed> {
    /// Flattens all buckets into an adjacency-form [`CsrGraph`]; the builder is consumed.
    #[tracing::instrument(level = "debug", skip_all, fields(n = self.buckets.len(), m = self.tails.len()))]
    pub fn into_adjacency_graph(self) -> CsrGraph {
        let n = self.number_of_nodes();
        let m = self.number_of_edges();
        let Self { buckets, heads, .. } = self;
        let heads = heads.into_vec();

        let mut raw = RawLayout::new(n, m, m as usize, 0);
        raw.write_sorted_runs(buckets.into_iter().enumerate().flat_map(|(u, bucket)| {
            let heads = &heads;
            bucket
                .into_vec()
                .into_iter()
                .map(move |e| (u as Node, heads[e as usize]))
        }));

        CsrGraph::from_layout(raw.finish())
    }
}

// ---------- Testing ----------

test_csr_graph!(
    test_builder_directed,
    IncidenceGraph,
    false,
    |n: NumNodes, edges: &[Edge]| {
        let mut builder = CsrBuilder::<Directed>::with_capacity(n, edges.len() as NumEdges);
        builder
            .extend_edges(edges.iter().filter(|e| e.is_within(n)))
            .unwrap();
        builder.into_graph()
    }
);

test_csr_graph!(
    test_builder_undirected,
    UndirectedIncidenceGraph,
    true,
    |n: NumNodes, edges: &[Edge]| {
        let mut builder = CsrBuilder::<Undirected>::with_capacity(n, edges.len() as NumEdges);
        builder
            .extend_edges(edges.iter().filter(|e| e.is_within(n)))
            .unwrap();
        builder.into_graph()
    }
);

test_csr_graph!(
    test_builder_adjacency,
    CsrGraph,
    false,
    |n: NumNodes, edges: &[Edge]| {
        let mut builder = CsrBuilder::<Directed>::with_capacity(n, edges.len() as NumEdges);
        builder
            .extend_edges(edges.iter().filter(|e| e.is_within(n)))
            .unwrap();
        builder.into_adjacency_graph()
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn vertices_grow_on_demand() {
        let mut builder = CsrBuilder::<Directed>::new();
        assert_eq!(builder.add_edge(3, 3), 0);
        assert_eq!(builder.number_of_nodes(), 4);
        assert_eq!(builder.add_edge(0, 5), 1);
        assert_eq!(builder.number_of_nodes(), 6);
        assert_eq!(builder.try_add_vertex(), Ok(6));

        let graph = builder.into_graph();
        assert_eq!(graph.number_of_nodes(), 7);
        assert_eq!(graph.layout().offsets().collect_vec(), vec![1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(graph.endpoints(1), Some(Edge(0, 5)));
    }

    #[test]
    fn undirected_buckets_hold_complements() {
        let mut builder = CsrBuilder::<Undirected>::new();
        builder.add_edge(0, 1);
        builder.add_edge(2, 2);
        builder.add_edge(2, 0);

        assert_eq!(builder.bucket_of(0), &[0, !2]);
        assert_eq!(builder.bucket_of(1), &[!0]);
        assert_eq!(builder.bucket_of(2), &[1, 2]);
        assert!(builder.bucket_of(3).is_empty());
    }

    #[test]
    fn bucket_capacity_applies_to_new_vertices() {
        let mut builder = CsrBuilder::<Directed>::with_capacity(1, 4).bucket_capacity(2);
        builder.add_edge(0, 1);
        builder.add_edge(1, 0);

        assert_eq!(builder.buckets[0].capacity(), DEFAULT_CAPACITY);
        assert_eq!(builder.buckets[1].capacity(), 2);
        assert_eq!(builder.into_graph().number_of_edges(), 2);
    }

    #[test]
    fn invalid_endpoints_are_reported() {
        let mut builder = CsrBuilder::<Directed>::new();
        assert!(matches!(
            builder.try_add_edge(INVALID_NODE, 0),
            Err(GraphError::InvalidNode { what: "tail", .. })
        ));
        assert!(matches!(
            builder.try_add_signed_edge(0, -3),
            Err(GraphError::NegativeIndex {
                what: "head",
                value: -3
            })
        ));
        assert_eq!(builder.number_of_edges(), 0);
        assert_eq!(builder.number_of_nodes(), 0);
        assert!(builder.into_graph().layout().is_sentinel());
    }

    #[test]
    fn wrapped_negative_vertex_count() {
        assert!(matches!(
            CsrBuilder::<Directed>::try_with_capacity((-1i32) as NumNodes, 0),
            Err(GraphError::TooManyNodes { .. })
        ));

        let mut builder = CsrBuilder::<Undirected>::try_with_capacity(2, 0).unwrap();
        assert!(matches!(
            builder.try_ensure_vertex_count(INVALID_NODE),
            Err(GraphError::TooManyNodes { .. })
        ));
        assert!(matches!(
            builder.try_add_edge(0, MAX_NODES),
            Err(GraphError::TooManyNodes { .. })
        ));
        assert_eq!(builder.number_of_nodes(), 2);
        assert_eq!(builder.number_of_edges(), 0);

        assert_eq!(builder.try_ensure_vertex_count(4), Ok(()));
        assert_eq!(builder.try_add_edge(3, 1), Ok(0));
        assert_eq!(builder.into_graph().number_of_nodes(), 4);
    }

    #[test]
    fn batch_and_incremental_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);

        for n in [5 as NumNodes, 20, 40] {
            let edges = (0..n * 4)
                .map(|_| Edge(rng.random_range(0..n), rng.random_range(0..n)))
                .collect_vec();

            let mut builder = CsrBuilder::<Undirected>::with_capacity(n, 0);
            builder.extend_edges(edges.iter()).unwrap();
            let incremental = builder.into_graph();
            let batch = UndirectedIncidenceGraph::from_edges(n, edges.iter());
            assert_eq!(incremental, batch);

            let mut builder = CsrBuilder::<Directed>::with_capacity(n, 0);
            builder.extend_edges(edges.iter()).unwrap();
            let incremental = builder.into_adjacency_graph();
            let batch = CsrGraph::from_edges(n, edges.iter());
            assert_eq!(incremental, batch);
        }
    }
}
