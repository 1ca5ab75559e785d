/*!
Frontier-driven graph search and traversal-derived utilities.

This module provides:
- [`GenericSearch`], a lazy search iterator parameterized by its [`Frontier`] (queue for BFS,
  stack for a stack-based search), its explored [`Set`] and the kind of item it yields.
- Abstractions ([`TraversalTree`], [`RankFromOrder`]) that turn searches into parent arrays,
  depth arrays or rankings.
- A high-level [`Traversal`] trait that exposes searches directly as methods on graphs.

Every vertex is admitted into the explored set and the frontier at most once; the explored set
is consulted *before* admission, so each out-edge is examined at most once per search. Items are
produced at discovery time, sources first.
*/

use super::*;
use std::{collections::VecDeque, marker::PhantomData};

/// Common interface for maintaining and querying visited-states
/// during a traversal.
pub trait TraversalState<S>
where
    S: Set<Node>,
{
    /// Returns a reference to the set of visited nodes.
    fn visited(&self) -> &S;

    /// Checks if a given node `u` has already been visited.
    fn did_visit_node(&self, u: Node) -> bool {
        self.visited().contains(&u)
    }
}

/// Read access to the node and predecessor carried by a search item.
pub trait SequencedNode: Clone + Copy {
    /// Returns the node represented by this item.
    fn item(&self) -> Node;

    /// Returns the predecessor of this node, if any.
    fn predecessor(&self) -> Option<Node>;

    /// Returns a pair `(predecessor, item)` where the predecessor
    /// may be `None` if not tracked.
    fn predecessor_with_item(&self) -> (Option<Node>, Node) {
        (self.predecessor(), self.item())
    }
}

/// Abstraction for items yielded by a search iterator over edges of type `E`.
///
/// Three implementations are provided:
/// - [`Node`]: only the discovered node,
/// - [`PredecessorOfNode`]: `(predecessor, node)` pairs,
/// - [`Discovery`]: node, predecessor and the edge it was discovered through.
pub trait SequencedItem<E>: SequencedNode {
    /// Constructs an item for `item` discovered from `predecessor` via `edge`.
    fn new_with_predecessor(predecessor: Node, edge: E, item: Node) -> Self;

    /// Constructs an item for a source.
    fn new_without_predecessor(item: Node) -> Self;
}

impl<E> SequencedItem<E> for Node {
    fn new_with_predecessor(_: Node, _: E, item: Node) -> Self {
        item
    }
    fn new_without_predecessor(item: Node) -> Self {
        item
    }
}

impl SequencedNode for Node {
    fn item(&self) -> Node {
        *self
    }
    fn predecessor(&self) -> Option<Node> {
        None
    }
}

/// Compact representation of `(predecessor, node)` used for
/// traversals with parent tracking.
///
/// Internally, the absence of a predecessor is encoded by
/// setting both tuple entries to the same node value. A self-loop can therefore
/// not be told apart from a source; use [`Discovery`] if this matters.
pub type PredecessorOfNode = (Node, Node);

impl<E> SequencedItem<E> for PredecessorOfNode {
    fn new_with_predecessor(predecessor: Node, _: E, item: Node) -> Self {
        (predecessor, item)
    }
    fn new_without_predecessor(item: Node) -> Self {
        (item, item)
    }
}

impl SequencedNode for PredecessorOfNode {
    fn item(&self) -> Node {
        self.1
    }

    fn predecessor(&self) -> Option<Node> {
        if self.0 == self.1 { None } else { Some(self.0) }
    }
}

/// Full record of a discovery: the vertex, and for non-sources the tail and edge it was
/// reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Discovery<E> {
    pub vertex: Node,
    pub predecessor: Option<Node>,
    pub edge: Option<E>,
}

impl<E: Copy> SequencedItem<E> for Discovery<E> {
    fn new_with_predecessor(predecessor: Node, edge: E, item: Node) -> Self {
        Self {
            vertex: item,
            predecessor: Some(predecessor),
            edge: Some(edge),
        }
    }

    fn new_without_predecessor(item: Node) -> Self {
        Self {
            vertex: item,
            predecessor: None,
            edge: None,
        }
    }
}

impl<E: Copy> SequencedNode for Discovery<E> {
    fn item(&self) -> Node {
        self.vertex
    }

    fn predecessor(&self) -> Option<Node> {
        self.predecessor
    }
}

/// Abstraction for the search frontier.
///
/// A `Frontier` stores the admitted but not yet expanded nodes. The implementation determines
/// the traversal order:
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics
pub trait Frontier: Default {
    /// If *true*, multiple sources are admitted one at a time and each source's reachable
    /// region is drained before the next source is admitted. Otherwise all sources are
    /// admitted up front.
    const DRAIN_PER_SOURCE: bool;

    /// Pushes a node into the frontier.
    fn push(&mut self, u: Node);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<Node>;

    /// Returns the next node without removing it.
    fn peek(&self) -> Option<Node>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;

    /// Removes all nodes.
    fn clear(&mut self);
}

impl Frontier for VecDeque<Node> {
    const DRAIN_PER_SOURCE: bool = false;

    fn push(&mut self, u: Node) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<Node> {
        self.pop_front()
    }
    fn peek(&self) -> Option<Node> {
        self.front().copied()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
    fn clear(&mut self) {
        VecDeque::clear(self)
    }
}

impl Frontier for Vec<Node> {
    const DRAIN_PER_SOURCE: bool = true;

    fn push(&mut self, u: Node) {
        Vec::push(self, u)
    }
    fn pop(&mut self) -> Option<Node> {
        Vec::pop(self)
    }
    fn peek(&self) -> Option<Node> {
        self.last().copied()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

/// What a [`SearchPolicy`] hands to the [`SearchSkeleton`] once no vertex is being expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    /// Enumerate the out-edges of this vertex next
    Expand(Node),
    /// Report this item without expanding a vertex
    Report(T),
}

/// Admission and ordering rules of a frontier-driven search.
///
/// The [`SearchSkeleton`] enumerates the out-edges of one vertex at a time and leaves two
/// decisions to the policy: whether the head of an examined edge is admitted (and what is
/// reported for it), and which vertex is expanded next. [`GenericSearch`] admits through an
/// explored set and orders by its [`Frontier`]; [`Dijkstra`](super::Dijkstra) admits on strict
/// distance improvement and orders by an [`IndexedDaryHeap`].
pub trait SearchPolicy<G: OutEdges> {
    type Item;

    /// Called for every out-edge `edge = (tail, head)` of the vertex being expanded.
    /// Returning an item reports it and pauses the enumeration until the next pull.
    fn examine(&mut self, graph: &G, tail: Node, edge: G::EdgeId, head: Node)
    -> Option<Self::Item>;

    /// Called once the previous vertex is fully expanded; `None` ends the search.
    fn select(&mut self, graph: &G) -> Option<Selection<Self::Item>>;
}

/// The vertex-expansion loop shared by all frontier-driven searches.
///
/// Holds the graph and the out-edge enumerator of the vertex currently being expanded; all
/// other state lives in the [`SearchPolicy`] passed to [`SearchSkeleton::advance`].
pub struct SearchSkeleton<'a, G>
where
    G: OutEdges + 'a,
{
    graph: &'a G,
    current: Option<(Node, G::OutEdgesIter<'a>)>,
}

impl<'a, G> SearchSkeleton<'a, G>
where
    G: OutEdges,
{
    /// Creates a skeleton that is not expanding any vertex
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            current: None,
        }
    }

    /// Returns the graph being searched
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Returns the vertex whose out-edges are being enumerated, if any
    pub fn expanding(&self) -> Option<Node> {
        self.current.as_ref().map(|(u, _)| *u)
    }

    /// Abandons the enumeration of the current vertex
    pub fn interrupt(&mut self) {
        self.current = None;
    }

    /// Performs work until `policy` reports an item or has no vertex left to expand
    pub fn advance<P>(&mut self, policy: &mut P) -> Option<P::Item>
    where
        P: SearchPolicy<G>,
    {
        loop {
            if let Some((u, edges)) = &mut self.current {
                let u = *u;
                for edge in edges.by_ref() {
                    let Some(v) = self.graph.try_get_head(edge) else {
                        continue;
                    };
                    if let Some(item) = policy.examine(self.graph, u, edge, v) {
                        return Some(item);
                    }
                }
                self.current = None;
            }

            match policy.select(self.graph)? {
                Selection::Expand(u) => self.current = Some((u, self.graph.out_edges_of(u))),
                Selection::Report(item) => return Some(item),
            }
        }
    }
}

/// Explored set and frontier of a [`GenericSearch`]
struct Exploration<F, I, V> {
    explored: V,
    frontier: F,
    announce: VecDeque<Node>,
    pending_sources: VecDeque<Node>,
    _item: PhantomData<I>,
}

impl<F, I, V> Exploration<F, I, V>
where
    F: Frontier,
    V: Set<Node>,
{
    /// Admits a source if it is an unexplored vertex of the graph
    fn admit_source<G: GraphNodeOrder>(&mut self, graph: &G, u: Node) -> bool {
        if !graph.has_vertex(u) || self.explored.insert(u) {
            return false;
        }
        self.frontier.push(u);
        self.announce.push_back(u);
        true
    }

    fn halt(&mut self) {
        self.frontier.clear();
        self.announce.clear();
        self.pending_sources.clear();
    }
}

impl<G, F, I, V> SearchPolicy<G> for Exploration<F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    type Item = I;

    fn examine(&mut self, _: &G, tail: Node, edge: G::EdgeId, head: Node) -> Option<I> {
        if self.explored.insert(head) {
            return None;
        }
        self.frontier.push(head);
        Some(I::new_with_predecessor(tail, edge, head))
    }

    fn select(&mut self, graph: &G) -> Option<Selection<I>> {
        loop {
            if let Some(u) = self.announce.pop_front() {
                return Some(Selection::Report(I::new_without_predecessor(u)));
            }
            if let Some(u) = self.frontier.pop() {
                return Some(Selection::Expand(u));
            }
            let source = self.pending_sources.pop_front()?;
            self.admit_source(graph, source);
        }
    }
}

/// Lazy, frontier-parameterized graph search.
///
/// Every call to `next` performs work until the next vertex is discovered: it continues the
/// out-edge enumeration of the vertex currently being expanded, and pops the next vertex from
/// the frontier once that enumeration is exhausted.
pub struct GenericSearch<'a, G, F, I, V>
where
    G: OutEdges + 'a,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    skeleton: SearchSkeleton<'a, G>,
    state: Exploration<F, I, V>,
    stop_at: Option<Node>,
}

/// Type alias for a **breadth-first search** iterator with a custom explored set.
pub type BFSWithSet<'a, G, V> = GenericSearch<'a, G, VecDeque<Node>, Node, V>;

/// A BFS iterator over the graph, visiting nodes in breadth-first order.
pub type BFS<'a, G> = GenericSearch<'a, G, VecDeque<Node>, Node, NodeBitSet>;

/// A stack-based search iterator; see [`Traversal::dfs`] for a true depth-first traversal.
pub type StackSearch<'a, G> = GenericSearch<'a, G, Vec<Node>, Node, NodeBitSet>;

/// A BFS iterator that records predecessor information.
pub type BFSWithPredecessor<'a, G> =
    GenericSearch<'a, G, VecDeque<Node>, PredecessorOfNode, NodeBitSet>;

/// A BFS iterator yielding full [`Discovery`] records.
pub type BFSDiscoveries<'a, G> =
    GenericSearch<'a, G, VecDeque<Node>, Discovery<<G as Incidence>::EdgeId>, NodeBitSet>;

impl<G, F, I, V> WithGraphRef<G> for GenericSearch<'_, G, F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    fn graph_ref(&self) -> &G {
        self.skeleton.graph()
    }
}

impl<G, F, I, V> TraversalState<V> for GenericSearch<'_, G, F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    fn visited(&self) -> &V {
        &self.state.explored
    }
}

impl<G, F, I, V> Iterator for GenericSearch<'_, G, F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.skeleton.advance(&mut self.state)?;
        if self.stop_at == Some(item.item()) {
            self.state.halt();
            self.skeleton.interrupt();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let announced = self.state.announce.len();
        (
            announced,
            Some(
                self.skeleton
                    .graph()
                    .len()
                    .saturating_sub(self.state.explored.len())
                    .saturating_add(announced),
            ),
        )
    }
}

impl<'a, G, F, I, V> GenericSearch<'a, G, F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node> + FromCapacity,
{
    /// Creates a new search starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        Self::with_sources(graph, [start])
    }

    /// Creates a new search from multiple sources.
    ///
    /// Queue frontiers admit all sources before the first expansion; stack frontiers admit the
    /// next source only after everything reachable from the previous ones was exhausted.
    /// Sources that are not vertices of the graph are ignored.
    pub fn with_sources<S>(graph: &'a G, sources: S) -> Self
    where
        S: IntoIterator<Item = Node>,
    {
        let len = graph.len();
        Self::with_explored_set(graph, sources, V::from_total_used_capacity(len, len))
    }
}

impl<'a, G, F, I, V> GenericSearch<'a, G, F, I, V>
where
    G: OutEdges,
    F: Frontier,
    I: SequencedItem<G::EdgeId>,
    V: Set<Node>,
{
    /// Creates a new search from `sources` using the caller-provided explored set.
    /// Nodes already contained in `explored` are treated as excluded.
    pub fn with_explored_set<S>(graph: &'a G, sources: S, explored: V) -> Self
    where
        S: IntoIterator<Item = Node>,
    {
        let mut state = Exploration {
            explored,
            frontier: F::default(),
            announce: VecDeque::new(),
            pending_sources: sources.into_iter().collect(),
            _item: PhantomData,
        };

        if !F::DRAIN_PER_SOURCE {
            while let Some(s) = state.pending_sources.pop_front() {
                state.admit_source(graph, s);
            }
        }

        Self {
            skeleton: SearchSkeleton::new(graph),
            state,
            stop_at: None,
        }
    }

    /// Tries to restart the search at an yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        debug_assert_eq!(self.state.frontier.cardinality(), 0);
        let graph = self.skeleton.graph();
        let node = graph.vertices().find(|u| !self.state.explored.contains(u));
        match node {
            None => false,
            Some(x) => self.state.admit_source(graph, x),
        }
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn set_stop_at(&mut self, stopper: Node) {
        self.stop_at = Some(stopper);
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn stop_at(mut self, stopper: Node) -> Self {
        self.set_stop_at(stopper);
        self
    }

    /// Excludes a node from the search. It will be treated as if it was already visited,
    /// i.e. no edges to or from that node will be taken. If the node was already visited,
    /// this is a non-op.
    ///
    /// # Warning
    /// Calling this method has no effect if the node was already admitted. It is therefore
    /// highly recommended to call this method directly after the constructor.
    pub fn exclude_node(&mut self, u: Node) {
        if self.skeleton.graph().has_vertex(u) {
            self.state.explored.insert(u);
        }
    }

    /// Builder-style variant of [`GenericSearch::exclude_node`].
    pub fn with_node_excluded(mut self, u: Node) -> Self {
        self.exclude_node(u);
        self
    }

    /// Exclude multiple nodes from traversal. It is functionally equivalent to repeatedly
    /// calling [`GenericSearch::exclude_node`].
    pub fn exclude_nodes<N>(&mut self, us: N)
    where
        N: IntoIterator<Item = Node>,
    {
        for u in us {
            self.exclude_node(u);
        }
    }

    /// Builder-style variant of [`GenericSearch::exclude_nodes`].
    pub fn with_nodes_excluded<N>(mut self, us: N) -> Self
    where
        N: IntoIterator<Item = Node>,
    {
        self.exclude_nodes(us);
        self
    }

    /// Consumes the search and returns true iff there exists a path of at least one edge
    /// from the first source to `u`.
    ///
    /// # Warning
    /// The result is meaningless on a partially executed iterator.
    pub fn is_node_reachable(mut self, u: Node) -> bool {
        // the first item is the source itself
        if self.next().is_none() {
            return false;
        }
        if self.skeleton.graph().has_vertex(u) {
            self.state.explored.remove(&u);
        }
        self.any(|v| v.item() == u)
    }

    /// Consumes the search and returns the explored set
    pub fn into_explored(self) -> V {
        self.state.explored
    }
}

/// Extension trait for traversal iterators that allows computing a ranking (iteration order)
/// of the nodes in the graph.
pub trait RankFromOrder<'a, G>: WithGraphRef<G> + Iterator<Item = Node> + Sized
where
    G: 'a + GraphNodeOrder,
{
    /// Consumes the traversal iterator and produces a vector `ranking` where
    /// `ranking[u]` gives the position (rank, starting at 0) at which node `u`
    /// was visited.
    ///
    /// - Returns `Some(ranking)` if **all nodes of the graph** were visited.
    /// - Returns `None` if the iterator did not cover every node.
    ///
    /// # Panics
    /// Panics if the iterator yields the same node more than once.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2)]);
    ///
    /// let ranking = g.bfs(0).ranking().unwrap();
    /// assert_eq!(ranking, vec![0, 1, 2]);
    /// ```
    fn ranking(mut self) -> Option<Vec<Node>> {
        let mut ranking = vec![INVALID_NODE; self.graph_ref().len()];
        let mut rank: Node = 0;

        for u in self.by_ref() {
            assert_eq!(ranking[u as usize], INVALID_NODE); // assert no item is repeated by iterator
            ranking[u as usize] = rank;
            rank += 1;
        }

        if rank == self.graph_ref().number_of_nodes() {
            Some(ranking)
        } else {
            None
        }
    }
}

impl<'a, G, F, V> RankFromOrder<'a, G> for GenericSearch<'a, G, F, Node, V>
where
    G: OutEdges,
    F: Frontier,
    V: Set<Node>,
{
}

/// Extension trait for searches that return `PredecessorOfNode`,
/// enabling extraction of the implied spanning tree structure (parents, depths).
pub trait TraversalTree<'a, G>:
    WithGraphRef<G> + Iterator<Item = PredecessorOfNode> + Sized
where
    G: 'a + GraphNodeOrder,
{
    /// Consumes the iterator and records the parent of each node in the implied
    /// traversal tree into the provided slice `tree`.
    ///
    /// - For each visited node `v`, `tree[v]` is set to its predecessor.
    /// - Unvisited entries remain unchanged.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2)]);
    ///
    /// let mut parents: Vec<Node> = g.vertices().collect();
    /// g.bfs_with_predecessor(0).parent_array_into(&mut parents);
    /// assert_eq!(parents, vec![0, 0, 1]);
    /// ```
    fn parent_array_into(&mut self, tree: &mut [Node]) {
        for pred_with_item in self.by_ref() {
            if let Some(p) = pred_with_item.predecessor() {
                tree[pred_with_item.item() as usize] = p;
            }
        }
    }

    /// Constructs a fresh parent array where each node is initially its own parent
    /// and fills in the traversal tree using [`TraversalTree::parent_array_into`].
    fn parent_array(&mut self) -> Vec<Node> {
        let mut tree: Vec<_> = self.graph_ref().vertices().collect();
        self.parent_array_into(&mut tree);
        tree
    }

    /// Consumes the iterator and computes the depth of each visited node in
    /// the traversal tree (root depth = 0).
    fn depths_into(&mut self, depths: &mut [Node]) {
        for pred_with_item in self.by_ref() {
            depths[pred_with_item.item() as usize] = pred_with_item
                .predecessor()
                .map_or(0, |p| depths[p as usize] + 1);
        }
    }

    /// Constructs a fresh depth array initialized with 0 and fills it using
    /// [`TraversalTree::depths_into`].
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2)]);
    ///
    /// let depths = g.bfs_with_predecessor(0).depths();
    /// assert_eq!(depths, vec![0, 1, 2]);
    /// ```
    fn depths(&mut self) -> Vec<Node> {
        let mut depths: Vec<_> = vec![0; self.graph_ref().len()];
        self.depths_into(&mut depths);
        depths
    }
}

impl<'a, G, F, V> TraversalTree<'a, G> for GenericSearch<'a, G, F, PredecessorOfNode, V>
where
    G: OutEdges,
    F: Frontier,
    V: Set<Node>,
{
}

/// Provides convenient traversal methods directly on graphs
pub trait Traversal: OutEdges + Sized {
    /// Returns an iterator that traverses nodes reachable from `start`
    /// in **breadth-first search (BFS) order**.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = CsrGraph::from_edges(3, [(0, 1), (1, 2), (2, 0), (1, 0), (2, 1), (0, 2)]);
    ///
    /// let order: Vec<_> = g.bfs(0).collect();
    /// assert_eq!(order, vec![0, 1, 2]);
    /// ```
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns a BFS iterator admitting all `sources` before the first expansion.
    fn bfs_from<S>(&self, sources: S) -> BFS<'_, Self>
    where
        S: IntoIterator<Item = Node>,
    {
        BFS::with_sources(self, sources)
    }

    /// Returns a BFS iterator that additionally yields the predecessor relation.
    fn bfs_with_predecessor(&self, start: Node) -> BFSWithPredecessor<'_, Self> {
        BFSWithPredecessor::new(self, start)
    }

    /// Returns a BFS iterator yielding [`Discovery`] records including the discovering edge.
    fn bfs_discoveries(&self, start: Node) -> BFSDiscoveries<'_, Self> {
        BFSDiscoveries::new(self, start)
    }

    /// Returns a search iterator using a stack as frontier.
    fn stack_search(&self, start: Node) -> StackSearch<'_, Self> {
        StackSearch::new(self, start)
    }

    /// Returns `true` if node `u` lies on a directed cycle.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = CsrGraph::from_edges(3, [(0, 1), (1, 2), (2, 1)]);
    /// assert!(!g.is_node_on_cycle(0));
    /// assert!(g.is_node_on_cycle(1));
    /// ```
    fn is_node_on_cycle(&self, u: Node) -> bool
    where
        Self: GraphType<Dir = Directed>,
    {
        self.bfs(u).is_node_reachable(u)
    }

    /// Returns `true` if node `u` lies on a directed cycle **after
    /// removing the given set of nodes** from the graph.
    fn is_node_on_cycle_after_deleting<I>(&self, u: Node, deleted: I) -> bool
    where
        I: IntoIterator<Item = Node>,
        Self: GraphType<Dir = Directed>,
    {
        self.bfs(u)
            .with_nodes_excluded(deleted.into_iter().filter(|&x| x != u))
            .is_node_reachable(u)
    }

    /// Computes the **shortest path** (in edges) from `start` to `end` using BFS.
    ///
    /// - Returns `Some(path)` if a path exists, where `path` is the sequence
    ///   of intermediate nodes (excluding `start`, ending before `end`).
    /// - Returns `None` if no path exists.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    /// use fxhash::FxHashMap;
    ///
    /// let g = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2)]);
    ///
    /// let path = g.shortest_path::<NodeBitSet, FxHashMap<Node, Node>>(0, 2);
    /// assert_eq!(path, Some(vec![1]));
    /// ```
    fn shortest_path<S, M>(&self, start: Node, end: Node) -> Option<Vec<Node>>
    where
        S: Set<Node> + FromCapacity,
        M: Map<Node, Node> + FromCapacity,
    {
        let mut bfs = GenericSearch::<'_, Self, VecDeque<Node>, Discovery<Self::EdgeId>, S>::new(
            self, start,
        );
        let len = self.len();
        let mut parent = M::from_total_used_capacity(len, len);

        // `bfs` first returns `start` which has no predecessor
        bfs.next()?;
        if start == end {
            bfs.state.explored.remove(&start);
        }

        for item in bfs {
            let Some(pred) = item.predecessor else {
                continue;
            };
            parent.insert(item.vertex, pred);

            if item.vertex == end {
                let mut path = Vec::new();
                let mut node = pred;
                while node != start {
                    path.push(node);
                    node = *parent.get(&node)?;
                }

                path.reverse();
                return Some(path);
            }
        }

        None
    }

    /// Returns a lazy iterative depth-first traversal from `start` yielding [`DfsStep`]s.
    fn dfs(&self, start: Node) -> IterativeDfs<'_, Self, DenseMap<Color>> {
        IterativeDfs::new(self, [start])
    }

    /// Returns a lazy iterative depth-first traversal that drains each white source in turn.
    fn dfs_from<S>(&self, sources: S) -> IterativeDfs<'_, Self, DenseMap<Color>>
    where
        S: IntoIterator<Item = Node>,
    {
        IterativeDfs::new(self, sources)
    }

    /// Returns a depth-first traversal over all vertices (every white vertex becomes a root).
    fn dfs_all(&self) -> IterativeDfs<'_, Self, DenseMap<Color>> {
        IterativeDfs::new(self, self.vertices())
    }

    /// Returns the depth-first preorder (discovery order) from `start`.
    fn dfs_preorder(&self, start: Node) -> Vec<Node> {
        self.dfs(start).preorder().collect()
    }

    /// Returns the depth-first postorder (finish order) from `start`.
    fn dfs_postorder(&self, start: Node) -> Vec<Node> {
        self.dfs(start).postorder().collect()
    }

    /// Returns the tree edges of a depth-first traversal from `start` in discovery order.
    fn dfs_tree_edges(&self, start: Node) -> Vec<Self::EdgeId> {
        self.dfs(start).tree_edges().collect()
    }

    /// Returns `true` if a depth-first traversal over all vertices finds a back edge.
    ///
    /// For undirected incidence graphs this reports every edge as a cycle, as the reverse
    /// orientation of a tree edge is a back edge.
    fn has_cycle(&self) -> bool {
        self.dfs_all()
            .any(|step| matches!(step, DfsStep::BackEdge { .. }))
    }

    /// Returns the vertices in topological order (reverse postorder), or `None` if the graph
    /// contains a directed cycle.
    ///
    /// # Examples
    /// ```
    /// use csrkit::{prelude::*, algo::*};
    ///
    /// let g = CsrGraph::from_edges(4, [(2, 0), (0, 1), (3, 2)]);
    /// assert_eq!(g.topological_order(), Some(vec![3, 2, 0, 1]));
    ///
    /// let g = CsrGraph::from_edges(2, [(0, 1), (1, 0)]);
    /// assert_eq!(g.topological_order(), None);
    /// ```
    fn topological_order(&self) -> Option<Vec<Node>>
    where
        Self: GraphType<Dir = Directed>,
    {
        let mut order = Vec::with_capacity(self.len());
        for step in self.dfs_all() {
            match step {
                DfsStep::BackEdge { .. } => return None,
                DfsStep::FinishVertex(u) => order.push(u),
                _ => {}
            }
        }
        order.reverse();
        Some(order)
    }
}

impl<G> Traversal for G where G: OutEdges + Sized {}

#[cfg(test)]
pub mod tests {
    use super::*;
    use fxhash::FxHashSet;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    //  / 2 --- \
    // 1         4 - 3
    //  \ 0 - 5 /
    const GRAPH: [(Node, Node); 6] = [(1, 2), (1, 0), (4, 3), (0, 5), (2, 4), (5, 4)];

    #[test]
    fn bfs_order() {
        let graph = CsrGraph::from_edges(6, GRAPH);

        {
            let order: Vec<Node> = graph.bfs(1).collect();
            assert_eq!(order, vec![1, 2, 0, 4, 5, 3]);
        }

        {
            let order: Vec<Node> = BFS::new(&graph, 5).collect();
            assert_eq!(order, [5, 4, 3]);
        }
    }

    #[test]
    fn bfs_triangle() {
        let graph =
            UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        assert_eq!(graph.bfs(0).collect_vec(), vec![0, 1, 2]);

        let graph = CsrGraph::from_edges(3, [(0, 1), (1, 0), (1, 2), (2, 1), (2, 0), (0, 2)]);
        assert_eq!(graph.bfs(0).collect_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn bfs_with_predecessor() {
        let graph = IncidenceGraph::from_edges(6, GRAPH);

        let mut edges: Vec<_> = graph
            .bfs_with_predecessor(1)
            .map(|x| x.predecessor_with_item())
            .collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![
                (None, 1),
                (Some(0), 5),
                (Some(1), 0),
                (Some(1), 2),
                (Some(2), 4),
                (Some(4), 3)
            ]
        );
    }

    #[test]
    fn discoveries_carry_edges() {
        let graph = IncidenceGraph::from_edges(6, GRAPH);
        for d in graph.bfs_discoveries(1) {
            match d.edge {
                None => assert_eq!(d.vertex, 1),
                Some(e) => {
                    assert_eq!(graph.endpoints(e), Some(Edge(d.predecessor.unwrap(), d.vertex)))
                }
            }
        }
    }

    #[test]
    fn test_stopper() {
        let graph = CsrGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        assert_eq!(graph.bfs(0).collect_vec(), vec![0, 1, 2, 3]);

        assert_eq!(graph.bfs(0).stop_at(1).collect_vec(), vec![0, 1]);
        assert_eq!(graph.bfs(0).stop_at(0).collect_vec(), vec![0]);
    }

    #[test]
    fn exclusion() {
        let graph = CsrGraph::from_edges(6, GRAPH);
        assert_eq!(
            graph.bfs(1).with_nodes_excluded([2]).collect_vec(),
            vec![1, 0, 5, 4, 3]
        );
        assert_eq!(
            graph.bfs(1).with_node_excluded(0).with_node_excluded(2).collect_vec(),
            vec![1]
        );
    }

    #[test]
    fn bfs_tree() {
        let graph = CsrGraph::from_edges(6, GRAPH);
        let tree = graph.bfs_with_predecessor(1).parent_array();
        assert_eq!(tree, vec![1, 1, 1, 4, 2, 0]);

        let depths = graph.bfs_with_predecessor(1).depths();
        assert_eq!(depths, vec![1, 0, 1, 3, 2, 2]);
    }

    /// Reports every out-edge of the listed vertices, last vertex first
    struct EdgeLister(Vec<Node>);

    impl<G: OutEdges> SearchPolicy<G> for EdgeLister {
        type Item = (Node, Node);

        fn examine(&mut self, _: &G, tail: Node, _: G::EdgeId, head: Node) -> Option<(Node, Node)> {
            Some((tail, head))
        }

        fn select(&mut self, _: &G) -> Option<Selection<(Node, Node)>> {
            self.0.pop().map(Selection::Expand)
        }
    }

    #[test]
    fn skeleton_with_custom_policy() {
        let graph = CsrGraph::from_edges(6, GRAPH);

        let mut skeleton = SearchSkeleton::new(&graph);
        let mut policy = EdgeLister(vec![4, 1]);
        let edges = std::iter::from_fn(|| skeleton.advance(&mut policy)).collect_vec();
        assert_eq!(edges, vec![(1, 2), (1, 0), (4, 3)]);
        assert_eq!(skeleton.expanding(), None);

        let mut policy = EdgeLister(vec![4, 1]);
        assert_eq!(skeleton.advance(&mut policy), Some((1, 2)));
        assert_eq!(skeleton.expanding(), Some(1));
        skeleton.interrupt();
        assert_eq!(skeleton.advance(&mut policy), Some((4, 3)));
        assert_eq!(skeleton.advance(&mut policy), None);
    }

    fn tree_of<'a, G, T>(mut parents: T, mut depths: T, n: NumNodes) -> (Vec<Node>, Vec<Node>)
    where
        G: 'a + GraphNodeOrder,
        T: TraversalTree<'a, G>,
    {
        let mut tree = vec![INVALID_NODE; n as usize];
        parents.parent_array_into(&mut tree);
        (tree, depths.depths())
    }

    fn parents_of<I: SequencedNode>(items: impl Iterator<Item = I>) -> Vec<(Option<Node>, Node)> {
        items.map(|x| x.predecessor_with_item()).sorted().collect()
    }

    #[test]
    fn tree_arrays_through_traits() {
        let graph = UndirectedIncidenceGraph::from_edges(5, [(0, 1), (1, 2), (3, 4)]);

        let (parents, depths) =
            tree_of(graph.bfs_with_predecessor(1), graph.bfs_with_predecessor(1), 5);
        assert_eq!(parents, vec![1, INVALID_NODE, 1, INVALID_NODE, INVALID_NODE]);
        assert_eq!(depths, vec![1, 0, 1, 0, 0]);

        assert_eq!(
            parents_of(graph.bfs_with_predecessor(3)),
            vec![(None, 3), (Some(3), 4)]
        );
        assert_eq!(
            parents_of(graph.bfs_discoveries(0)),
            vec![(None, 0), (Some(0), 1), (Some(1), 2)]
        );
        assert_eq!(parents_of(graph.bfs(2)), vec![(None, 0), (None, 1), (None, 2)]);
    }

    #[test]
    fn multi_source_order_depends_on_frontier() {
        // two disjoint paths 0 -> 1 -> 2 and 3 -> 4 -> 5
        let graph = CsrGraph::from_edges(6, [(0, 1), (1, 2), (3, 4), (4, 5)]);

        assert_eq!(graph.bfs_from([0, 3]).collect_vec(), vec![0, 3, 1, 4, 2, 5]);

        let stack = StackSearch::with_sources(&graph, [0, 3]).collect_vec();
        assert_eq!(stack, vec![0, 1, 2, 3, 4, 5]);

        // duplicate and out-of-range sources are ignored
        assert_eq!(graph.bfs_from([0, 0, 17]).collect_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn restart_at_unvisited() {
        let graph = CsrGraph::from_edges(4, [(0, 1), (2, 3)]);
        let mut search = graph.bfs(0);
        assert_eq!(search.by_ref().collect_vec(), vec![0, 1]);
        assert!(search.try_restart_at_unvisited());
        assert_eq!(search.by_ref().collect_vec(), vec![2, 3]);
        assert!(!search.try_restart_at_unvisited());
        assert!(search.did_visit_node(3));
    }

    #[test]
    fn ranking_requires_all_nodes() {
        let graph = CsrGraph::from_edges(3, [(0, 1), (1, 2)]);
        assert_eq!(graph.bfs(0).ranking(), Some(vec![0, 1, 2]));
        assert_eq!(graph.bfs(1).ranking(), None);
    }

    #[test]
    fn node_on_cycle() {
        let graph =
            CsrGraph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 0), (3, 4), (4, 5)]);
        assert!(graph.is_node_on_cycle(0));
        assert!(graph.is_node_on_cycle(1));
        assert!(graph.is_node_on_cycle(2));
        assert!(graph.is_node_on_cycle(3));
        assert!(!graph.is_node_on_cycle(4));
        assert!(!graph.is_node_on_cycle(5));

        assert!(!graph.is_node_on_cycle_after_deleting(1, [3]));
        assert!(graph.is_node_on_cycle_after_deleting(1, [4, 1]));

        let looped = CsrGraph::from_edges(2, [(0, 0), (0, 1)]);
        assert!(looped.is_node_on_cycle(0));
        assert!(!looped.is_node_on_cycle(1));
    }

    #[test]
    fn shortest_paths() {
        let graph = CsrGraph::from_edges(6, GRAPH);
        assert_eq!(
            graph.shortest_path::<NodeBitSet, DenseMap<Node>>(1, 3),
            Some(vec![2, 4])
        );
        assert_eq!(graph.shortest_path::<NodeBitSet, DenseMap<Node>>(3, 1), None);

        let cycle = CsrGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        assert_eq!(
            cycle.shortest_path::<FxHashSet<Node>, DenseMap<Node>>(0, 0),
            Some(vec![1, 2])
        );
        let looped = CsrGraph::from_edges(1, [(0, 0)]);
        assert_eq!(
            looped.shortest_path::<NodeBitSet, DenseMap<Node>>(0, 0),
            Some(vec![])
        );
    }

    #[test]
    fn empty_and_out_of_range() {
        let graph = CsrGraph::default();
        assert_eq!(graph.bfs(0).count(), 0);
        assert_eq!(graph.stack_search(0).count(), 0);

        let graph = CsrGraph::from_edges(2, [(0, 1)]);
        assert_eq!(graph.bfs(5).count(), 0);
        assert_eq!(graph.bfs(INVALID_NODE).count(), 0);
    }

    #[test]
    fn bfs_layering() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [10 as NumNodes, 50, 200] {
            for _ in 0..5 {
                let edges = (0..n * 3)
                    .map(|_| Edge(rng.random_range(0..n), rng.random_range(0..n)))
                    .collect_vec();
                let graph = IncidenceGraph::from_edges(n, edges.iter());

                let mut depth = vec![NumNodes::MAX; n as usize];
                let mut last_depth = 0;
                let mut count = 0;
                for (pred, v) in graph.bfs_with_predecessor(0).map(|x| x.predecessor_with_item()) {
                    assert_eq!(depth[v as usize], NumNodes::MAX, "vertex repeated");
                    depth[v as usize] = pred.map_or(0, |p| depth[p as usize] + 1);
                    assert!(depth[v as usize] >= last_depth);
                    last_depth = depth[v as usize];
                    count += 1;
                }

                let reachable = graph.stack_search(0).count();
                assert_eq!(count, reachable);
                assert_eq!(
                    graph.stack_search(0).sorted().collect_vec(),
                    graph.bfs(0).sorted().collect_vec()
                );
            }
        }
    }
}
