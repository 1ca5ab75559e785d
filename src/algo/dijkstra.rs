/*!
# Dijkstra

[`Dijkstra`] is a lazy single- or multi-source shortest path search. It runs on the same
[`SearchSkeleton`] as [`GenericSearch`]; its frontier is an [`IndexedDaryHeap`] keyed by
tentative distance and every successful relaxation is yielded as a [`Relaxation`]. Path lengths are combined through a [`Monoid`] ([`Additive`] by default) and
compared through a [`PriorityOrder`] ([`NaturalOrder`] by default).

A weight ordered below the monoid identity, an edge without weight or a vertex leaving the heap
without a recorded distance is a caller error: the search yields it once and is fused afterwards.
*/

use super::*;
use num::Zero;
use std::ops::Add;

/// An edge that lowered the distance of its head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relaxation<E, W> {
    pub tail: Node,
    pub head: Node,
    pub edge: E,
    /// New distance of `head`
    pub distance: W,
}

/// Lazy Dijkstra search yielding `Result<Relaxation>` items.
///
/// # Examples
/// ```
/// use csrkit::{prelude::*, algo::*};
/// use fxhash::FxHashMap;
///
/// let g = CsrGraph::from_edges(3, [(0, 1), (0, 2), (2, 1)]);
/// let weights: FxHashMap<Edge, u32> =
///     [(Edge(0, 1), 4), (Edge(0, 2), 1), (Edge(2, 1), 1)].into_iter().collect();
///
/// let mut search = Dijkstra::new(&g, &weights).with_source(0);
/// search.run().unwrap();
/// assert_eq!(search.distance_of(1), Some(&2));
/// ```
pub struct Dijkstra<'a, G, W, WM, M = Additive, O = NaturalOrder, DM = DenseMap<W>>
where
    G: OutEdges + 'a,
{
    skeleton: SearchSkeleton<'a, G>,
    frontier: DistanceFrontier<'a, W, WM, M, O, DM>,
}

/// Heap frontier of a [`Dijkstra`] search: admits a head on strict improvement of its distance
/// and expands vertices in order of their tentative distance.
struct DistanceFrontier<'a, W, WM, M, O, DM> {
    weights: &'a WM,
    monoid: M,
    order: O,
    distances: DM,
    heap: IndexedDaryHeap<Node, W, DenseMap<usize>, O>,
    /// Distance of the vertex being expanded
    settled: Option<W>,
    failed: bool,
}

impl<W, WM, M, O, DM> DistanceFrontier<'_, W, WM, M, O, DM>
where
    O: PriorityOrder<W>,
{
    fn fail<E>(&mut self, err: GraphError) -> Result<E> {
        tracing::warn!(error = %err, "aborting shortest path search");
        self.failed = true;
        self.settled = None;
        self.heap.clear();
        Err(err)
    }
}

impl<G, W, WM, M, O, DM> SearchPolicy<G> for DistanceFrontier<'_, W, WM, M, O, DM>
where
    G: OutEdges,
    W: Clone,
    WM: EdgeWeights<G::EdgeId, W>,
    M: Monoid<W>,
    O: PriorityOrder<W>,
    DM: Map<Node, W>,
{
    type Item = Result<Relaxation<G::EdgeId, W>>;

    fn examine(&mut self, _: &G, tail: Node, edge: G::EdgeId, head: Node) -> Option<Self::Item> {
        let Some(w) = self.weights.weight_of(edge) else {
            let err = GraphError::MissingWeight {
                edge: format!("{edge:?}"),
            };
            return Some(self.fail(err));
        };
        if self.order.less(&w, &self.monoid.identity()) {
            let err = GraphError::NegativeWeight {
                edge: format!("{edge:?}"),
            };
            return Some(self.fail(err));
        }

        let candidate = self.monoid.combine(self.settled.as_ref()?, &w);
        let improves = self
            .distances
            .get(&head)
            .is_none_or(|known| self.order.less(&candidate, known));
        if !improves {
            return None;
        }

        self.distances.insert(head, candidate.clone());
        self.heap.add_or_update(head, candidate.clone());
        Some(Ok(Relaxation {
            tail,
            head,
            edge,
            distance: candidate,
        }))
    }

    fn select(&mut self, _: &G) -> Option<Selection<Self::Item>> {
        if self.failed {
            return None;
        }

        loop {
            let (u, du) = self.heap.pop()?;
            let Some(known) = self.distances.get(&u) else {
                let err = GraphError::MissingDistance { vertex: u };
                return Some(Selection::Report(self.fail(err)));
            };
            // stale entry
            if self.order.less(known, &du) {
                continue;
            }
            self.settled = Some(du);
            return Some(Selection::Expand(u));
        }
    }
}

impl<'a, G, W, WM> Dijkstra<'a, G, W, WM>
where
    G: OutEdges,
    W: Zero + Add<Output = W> + Clone + PartialOrd,
    WM: EdgeWeights<G::EdgeId, W>,
{
    /// Creates a search with additive weights, their natural order and a dense distance map.
    /// No source is admitted yet.
    pub fn new(graph: &'a G, weights: &'a WM) -> Self {
        Self::with_parts(
            graph,
            weights,
            Additive,
            NaturalOrder,
            DenseMap::new(graph.len()),
        )
    }
}

impl<'a, G, W, WM, M, O, DM> Dijkstra<'a, G, W, WM, M, O, DM>
where
    G: OutEdges,
    W: Clone,
    WM: EdgeWeights<G::EdgeId, W>,
    M: Monoid<W>,
    O: PriorityOrder<W> + Clone,
    DM: Map<Node, W>,
{
    fn with_parts(graph: &'a G, weights: &'a WM, monoid: M, order: O, mut distances: DM) -> Self {
        distances.clear();
        Self {
            skeleton: SearchSkeleton::new(graph),
            frontier: DistanceFrontier {
                weights,
                monoid,
                heap: IndexedDaryHeap::with_index_and_order(
                    DenseMap::new(graph.len()),
                    order.clone(),
                ),
                order,
                distances,
                settled: None,
                failed: false,
            },
        }
    }

    /// Replaces the weight monoid. Resets all sources and distances.
    pub fn with_monoid<M2>(self, monoid: M2) -> Dijkstra<'a, G, W, WM, M2, O, DM>
    where
        M2: Monoid<W>,
    {
        let DistanceFrontier {
            weights,
            order,
            distances,
            ..
        } = self.frontier;
        Dijkstra::with_parts(self.skeleton.graph(), weights, monoid, order, distances)
    }

    /// Replaces the order distances are compared by. Resets all sources and distances.
    pub fn with_order<O2>(self, order: O2) -> Dijkstra<'a, G, W, WM, M, O2, DM>
    where
        O2: PriorityOrder<W> + Clone,
    {
        let DistanceFrontier {
            weights,
            monoid,
            distances,
            ..
        } = self.frontier;
        Dijkstra::with_parts(self.skeleton.graph(), weights, monoid, order, distances)
    }

    /// Replaces the distance map. Resets all sources and distances.
    pub fn with_distance_map<DM2>(self, distances: DM2) -> Dijkstra<'a, G, W, WM, M, O, DM2>
    where
        DM2: Map<Node, W>,
    {
        let DistanceFrontier {
            weights,
            monoid,
            order,
            ..
        } = self.frontier;
        Dijkstra::with_parts(self.skeleton.graph(), weights, monoid, order, distances)
    }

    /// Admits `s` with the identity of the monoid as distance.
    /// Non-vertices and vertices that already have a distance at most the identity are ignored.
    pub fn add_source(&mut self, s: Node) {
        if !self.skeleton.graph().has_vertex(s) {
            return;
        }

        let frontier = &mut self.frontier;
        let identity = frontier.monoid.identity();
        if let Some(known) = frontier.distances.get(&s) {
            if !frontier.order.less(&identity, known) {
                return;
            }
        }

        frontier.distances.insert(s, identity.clone());
        frontier.heap.add_or_update(s, identity);
    }

    /// Builder-style variant of [`Self::add_source`]
    pub fn with_source(mut self, s: Node) -> Self {
        self.add_source(s);
        self
    }

    /// Admits all `sources` before the first vertex is settled
    pub fn with_sources<S>(mut self, sources: S) -> Self
    where
        S: IntoIterator<Item = Node>,
    {
        for s in sources {
            self.add_source(s);
        }
        self
    }

    /// Returns the best distance to `u` known so far
    pub fn distance_of(&self, u: Node) -> Option<&W> {
        self.frontier.distances.get(&u)
    }

    /// Returns the number of vertices waiting in the heap
    pub fn frontier_len(&self) -> usize {
        self.frontier.heap.len()
    }

    /// Drives the search to completion.
    ///
    /// # Errors
    /// Returns the first invariant violation encountered.
    pub fn run(&mut self) -> Result<()> {
        for step in self.by_ref() {
            step?;
        }
        Ok(())
    }

    /// Consumes the search and returns the distance map
    pub fn into_distances(self) -> DM {
        self.frontier.distances
    }

    /// Drives the search to completion and returns, for every reached non-source vertex, the
    /// tail and edge of its final relaxation.
    ///
    /// # Errors
    /// Returns the first invariant violation encountered.
    pub fn shortest_path_tree(mut self) -> Result<DenseMap<(Node, G::EdgeId)>> {
        let mut parents = DenseMap::new(self.skeleton.graph().len());
        for step in self.by_ref() {
            let relaxed = step?;
            parents.insert(relaxed.head, (relaxed.tail, relaxed.edge));
        }
        Ok(parents)
    }
}

impl<G, W, WM, M, O, DM> Iterator for Dijkstra<'_, G, W, WM, M, O, DM>
where
    G: OutEdges,
    W: Clone,
    WM: EdgeWeights<G::EdgeId, W>,
    M: Monoid<W>,
    O: PriorityOrder<W> + Clone,
    DM: Map<Node, W>,
{
    type Item = Result<Relaxation<G::EdgeId, W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.skeleton.advance(&mut self.frontier)?;
        if self.frontier.failed {
            self.skeleton.interrupt();
        }
        Some(item)
    }
}

impl<G, W, WM, M, O, DM> WithGraphRef<G> for Dijkstra<'_, G, W, WM, M, O, DM>
where
    G: OutEdges,
{
    fn graph_ref(&self) -> &G {
        self.skeleton.graph()
    }
}

/// Shortest path searches directly on graphs
pub trait ShortestPaths: OutEdges + Sized {
    /// Returns a lazy Dijkstra search from `source` with additive weights
    fn dijkstra<'a, W, WM>(&'a self, weights: &'a WM, source: Node) -> Dijkstra<'a, Self, W, WM>
    where
        W: Zero + Add<Output = W> + Clone + PartialOrd,
        WM: EdgeWeights<Self::EdgeId, W>,
    {
        Dijkstra::new(self, weights).with_source(source)
    }

    /// Computes the additive shortest path distances from `source` to all reachable vertices.
    ///
    /// # Errors
    /// Fails on a negative or missing edge weight.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*, utils::*};
    ///
    /// let g = IncidenceGraph::from_edges(3, [(0, 1), (1, 2), (0, 2)]);
    /// let weights: Vec<u64> = vec![1, 1, 5];
    ///
    /// let dist = g.shortest_distances(&weights, 0).unwrap();
    /// assert_eq!(dist.get(&2u32), Some(&2));
    /// ```
    #[tracing::instrument(level = "debug", skip(self, weights))]
    fn shortest_distances<W, WM>(&self, weights: &WM, source: Node) -> Result<DenseMap<W>>
    where
        W: Zero + Add<Output = W> + Clone + PartialOrd,
        WM: EdgeWeights<Self::EdgeId, W>,
    {
        let mut search = self.dijkstra(weights, source);
        search.run()?;
        Ok(search.into_distances())
    }
}

impl<G> ShortestPaths for G where G: OutEdges + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;
    use std::collections::HashSet;

    fn weighted(edges: &[(Node, Node, u32)]) -> (CsrGraph, FxHashMap<Edge, u32>) {
        let graph = CsrGraph::from_edge_list(edges.iter().map(|&(u, v, _)| (u, v)));
        let weights = edges.iter().map(|&(u, v, w)| (Edge(u, v), w)).collect();
        (graph, weights)
    }

    #[test]
    fn shorter_detour_wins() {
        let (graph, weights) = weighted(&[(0, 1, 4), (0, 2, 1), (2, 1, 1)]);

        let relaxed = graph
            .dijkstra(&weights, 0)
            .map(|r| r.map(|r| (r.head, r.distance)))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(relaxed, vec![(1, 4), (2, 1), (1, 2)]);

        let dist = graph.shortest_distances(&weights, 0).unwrap();
        assert_eq!(dist.as_slots(), &[Some(0), Some(2), Some(1)]);

        let tree = graph.dijkstra(&weights, 0).shortest_path_tree().unwrap();
        assert_eq!(tree.get(&1u32), Some(&(2, Edge(2, 1))));
        assert_eq!(tree.get(&2u32), Some(&(0, Edge(0, 2))));
        assert_eq!(tree.get(&0u32), None);
    }

    #[test]
    fn settles_in_distance_order() {
        let (graph, weights) = weighted(&[(0, 1, 4), (0, 2, 1), (2, 1, 1)]);
        let mut search = graph.dijkstra(&weights, 0);

        // the detour through 2 is relaxed while 1 still waits at distance 4
        let first = search.by_ref().take(2).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(first[1].head, 2);
        assert_eq!(search.distance_of(1), Some(&4));

        let last = search.next().unwrap().unwrap();
        assert_eq!((last.tail, last.head, last.distance), (2, 1, 2));
        assert!(search.next().is_none());
        assert_eq!(search.frontier_len(), 0);
    }

    #[test]
    fn negative_weight_is_reported_once() {
        let graph = CsrGraph::from_edges(3, [(0, 1), (1, 2)]);
        let weights: FxHashMap<Edge, i32> =
            [(Edge(0, 1), 2), (Edge(1, 2), -1)].into_iter().collect();

        let mut search = graph.dijkstra(&weights, 0);
        assert!(search.next().unwrap().is_ok());
        assert!(matches!(
            search.next(),
            Some(Err(GraphError::NegativeWeight { .. }))
        ));
        assert!(search.next().is_none());
        assert!(search.next().is_none());

        assert!(graph.shortest_distances(&weights, 0).is_err());
        assert!(graph.shortest_distances(&weights, 1).is_err());
        assert!(graph.shortest_distances(&weights, 2).is_ok());
    }

    #[test]
    fn missing_weight() {
        let graph = IncidenceGraph::from_edges(3, [(0, 1), (1, 2)]);
        let weights: Vec<u32> = vec![1];
        assert_eq!(
            graph.shortest_distances(&weights, 0),
            Err(GraphError::MissingWeight {
                edge: "1".into()
            })
        );
    }

    struct Forgetful;

    impl Map<Node, u32> for Forgetful {
        fn insert(&mut self, _: Node, _: u32) -> Option<u32> {
            None
        }
        fn remove(&mut self, _: &Node) -> Option<u32> {
            None
        }
        fn get(&self, _: &Node) -> Option<&u32> {
            None
        }
        fn clear(&mut self) {}
        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn missing_distance() {
        let (graph, weights) = weighted(&[(0, 1, 1)]);
        let mut search = Dijkstra::new(&graph, &weights)
            .with_distance_map(Forgetful)
            .with_source(0);
        assert_eq!(
            search.next(),
            Some(Err(GraphError::MissingDistance { vertex: 0 }))
        );
        assert_eq!(search.next(), None);
    }

    #[test]
    fn multiple_sources() {
        let (graph, weights) = weighted(&[(0, 1, 5), (3, 1, 1), (1, 2, 1), (3, 2, 7)]);
        let mut search = Dijkstra::new(&graph, &weights).with_sources([0, 3, 3, 42]);
        search.run().unwrap();

        let dist = search.into_distances();
        assert_eq!(dist.as_slots(), &[Some(0), Some(1), Some(2), Some(0)]);
    }

    #[test]
    fn bottleneck_and_custom_order() {
        let (graph, weights) = weighted(&[(0, 1, 5), (0, 2, 1), (2, 1, 3)]);
        let mut search = Dijkstra::new(&graph, &weights)
            .with_monoid(Bottleneck)
            .with_source(0);
        search.run().unwrap();
        assert_eq!(search.distance_of(1), Some(&3));

        let graph = CsrGraph::from_edges(3, [(0, 1), (1, 2), (0, 2)]);
        let weights: FxHashMap<Edge, f64> =
            [(Edge(0, 1), 0.25), (Edge(1, 2), 0.5), (Edge(0, 2), 1.0)]
                .into_iter()
                .collect();
        let mut search = Dijkstra::new(&graph, &weights)
            .with_order(|a: &f64, b: &f64| a < b)
            .with_source(0);
        search.run().unwrap();
        assert_eq!(search.distance_of(2), Some(&0.75));
    }

    #[test]
    fn undirected_weights_by_canonical_id() {
        let graph = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (2, 1)]);
        let weights = [3u32, 4];
        let lookup = WeightFn(|e: EdgeId| {
            graph
                .canonical_edge_id(e)
                .map(|c| weights[c as usize])
        });

        let dist = graph.shortest_distances(&lookup, 2).unwrap();
        assert_eq!(dist.as_slots(), &[Some(7), Some(4), Some(0)]);
    }

    #[test]
    fn unit_weights_agree_with_breadth_first_search() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x5eed);
        let unit = WeightFn(|_: Edge| Some(1u32));

        for n in [10 as NumNodes, 50, 200] {
            let edges = (0..3 * n)
                .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                .collect_vec();
            let graph = CsrGraph::from_edges(n, edges.iter());

            let mut search = graph.dijkstra(&unit, 0);
            let tails = search.by_ref().map(|r| r.unwrap().tail).collect_vec();
            let dist = search.into_distances();

            let depths = graph.bfs_with_predecessor(0).depths();
            let reached: HashSet<Node> = graph.bfs(0).collect();
            for v in graph.vertices() {
                match dist.get(&v) {
                    Some(&d) => assert_eq!(d, depths[v as usize]),
                    None => assert!(!reached.contains(&v)),
                }
            }
            assert_eq!(dist.len(), reached.len());

            // vertices are expanded in order of their final distance
            let settled = tails.iter().map(|t| dist.get(t).copied().unwrap()).collect_vec();
            assert!(settled.is_sorted());
        }
    }

    #[test]
    fn random_graphs_match_bellman_ford() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0xd1);

        for n in [4 as NumNodes, 20, 60] {
            for _ in 0..10 {
                let m = rng.random_range(0..4 * n);
                let edges = (0..m)
                    .map(|_| {
                        (
                            rng.random_range(0..n),
                            rng.random_range(0..n),
                            rng.random_range(0..10u64),
                        )
                    })
                    .collect_vec();
                let graph = IncidenceGraph::from_edges(n, edges.iter().map(|&(u, v, _)| (u, v)));
                let weights = edges.iter().map(|&(_, _, w)| w).collect_vec();

                let mut expected = vec![None; n as usize];
                expected[0] = Some(0u64);
                for _ in 0..n {
                    for &(u, v, w) in &edges {
                        if let Some(du) = expected[u as usize] {
                            let dv = &mut expected[v as usize];
                            if dv.is_none_or(|dv| du + w < dv) {
                                *dv = Some(du + w);
                            }
                        }
                    }
                }

                let mut best: Vec<Option<u64>> = vec![None; n as usize];
                best[0] = Some(0);
                for relaxed in graph.dijkstra(&weights, 0) {
                    let relaxed = relaxed.unwrap();
                    let slot = &mut best[relaxed.head as usize];
                    assert!(slot.is_none_or(|d| relaxed.distance < d));
                    *slot = Some(relaxed.distance);
                }
                assert_eq!(best, expected);
            }
        }
    }
}
