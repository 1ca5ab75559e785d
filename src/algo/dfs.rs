/*!
# Iterative Depth-First Search

[`IterativeDfs`] is a lazy depth-first traversal that keeps an explicit stack of
`(vertex, out-edge iterator)` frames instead of recursing, so arbitrarily deep graphs
(for example a path over many thousand vertices) cannot overflow the call stack.
Every call to `next` resumes the topmost frame and yields one [`DfsStep`].

Vertices are colored white (unseen), gray (on the stack) and black (finished); an examined
edge is classified by the color of its head at that moment.
*/

use super::*;
use std::collections::VecDeque;

/// A single event of a depth-first traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsStep<E> {
    /// A white source becomes the root of a new DFS tree
    StartVertex(Node),
    /// A vertex turns gray
    DiscoverVertex(Node),
    /// An out-edge of `tail` is about to be classified
    ExamineEdge { tail: Node, edge: E },
    /// The head was white and is discovered through this edge
    TreeEdge { tail: Node, head: Node, edge: E },
    /// The head is gray, i.e. an ancestor on the current stack
    BackEdge { tail: Node, head: Node, edge: E },
    /// The head is already black
    ForwardOrCrossEdge { tail: Node, head: Node, edge: E },
    /// The traversal returns from `head` to `tail` over a tree edge
    FinishEdge { tail: Node, head: Node, edge: E },
    /// All out-edges of the vertex were examined and it turns black
    FinishVertex(Node),
}

struct StackFrame<'a, G>
where
    G: OutEdges + 'a,
{
    vertex: Node,
    edges: G::OutEdgesIter<'a>,
    tree_edge: Option<(Node, G::EdgeId)>,
}

/// Lazy depth-first traversal yielding [`DfsStep`]s.
///
/// With multiple sources, each source that is still white when its turn comes is drained
/// completely before the next one is considered.
pub struct IterativeDfs<'a, G, C>
where
    G: OutEdges + 'a,
    C: ColorMap,
{
    graph: &'a G,
    colors: C,
    call_stack: Vec<StackFrame<'a, G>>,
    sources: VecDeque<Node>,
    pending: VecDeque<DfsStep<G::EdgeId>>,
}

impl<'a, G, C> IterativeDfs<'a, G, C>
where
    G: OutEdges,
    C: ColorMap + FromCapacity,
{
    /// Creates a traversal over `sources` with a fresh color map
    pub fn new<S>(graph: &'a G, sources: S) -> Self
    where
        S: IntoIterator<Item = Node>,
    {
        let len = graph.len();
        Self::with_colors(graph, sources, C::from_total_used_capacity(len, len))
    }
}

impl<'a, G, C> IterativeDfs<'a, G, C>
where
    G: OutEdges,
    C: ColorMap,
{
    /// Creates a traversal over `sources` using the caller's color map.
    /// Vertices that are not white are never entered.
    pub fn with_colors<S>(graph: &'a G, sources: S, colors: C) -> Self
    where
        S: IntoIterator<Item = Node>,
    {
        Self {
            graph,
            colors,
            call_stack: Vec::new(),
            sources: sources.into_iter().collect(),
            pending: VecDeque::with_capacity(2),
        }
    }

    /// Returns the current color of `u`
    pub fn color_of(&self, u: Node) -> Color {
        self.colors.color_of(u)
    }

    /// Returns the number of vertices currently on the stack (all gray)
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Consumes the traversal and returns its color map
    pub fn into_colors(self) -> C {
        self.colors
    }

    /// Vertices in discovery order
    pub fn preorder(self) -> impl Iterator<Item = Node> {
        self.filter_map(|step| match step {
            DfsStep::DiscoverVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Vertices in finish order
    pub fn postorder(self) -> impl Iterator<Item = Node> {
        self.filter_map(|step| match step {
            DfsStep::FinishVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Tree edges in discovery order
    pub fn tree_edges(self) -> impl Iterator<Item = G::EdgeId> {
        self.filter_map(|step| match step {
            DfsStep::TreeEdge { edge, .. } => Some(edge),
            _ => None,
        })
    }

    fn enter(&mut self, u: Node, tree_edge: Option<(Node, G::EdgeId)>) {
        self.colors.set_color(u, Color::Gray);
        self.pending.push_back(DfsStep::DiscoverVertex(u));
        self.call_stack.push(StackFrame {
            vertex: u,
            edges: self.graph.out_edges_of(u),
            tree_edge,
        });
    }

    /// Advances the topmost frame by one edge or finishes it
    fn advance(&mut self) -> bool {
        let Some(frame) = self.call_stack.last_mut() else {
            return false;
        };
        let u = frame.vertex;

        let Some(edge) = frame.edges.next() else {
            let tree_edge = frame.tree_edge;
            self.call_stack.pop();
            self.colors.set_color(u, Color::Black);
            self.pending.push_back(DfsStep::FinishVertex(u));
            if let Some((parent, edge)) = tree_edge {
                self.pending.push_back(DfsStep::FinishEdge {
                    tail: parent,
                    head: u,
                    edge,
                });
            }
            return true;
        };

        self.pending
            .push_back(DfsStep::ExamineEdge { tail: u, edge });
        let Some(v) = self.graph.try_get_head(edge) else {
            return true;
        };

        match self.colors.color_of(v) {
            Color::White => {
                self.pending.push_back(DfsStep::TreeEdge {
                    tail: u,
                    head: v,
                    edge,
                });
                self.enter(v, Some((u, edge)));
            }
            Color::Gray => self.pending.push_back(DfsStep::BackEdge {
                tail: u,
                head: v,
                edge,
            }),
            Color::Black => self.pending.push_back(DfsStep::ForwardOrCrossEdge {
                tail: u,
                head: v,
                edge,
            }),
        }
        true
    }
}

impl<G, C> Iterator for IterativeDfs<'_, G, C>
where
    G: OutEdges,
    C: ColorMap,
{
    type Item = DfsStep<G::EdgeId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                return Some(step);
            }

            if self.advance() {
                continue;
            }

            let s = self.sources.pop_front()?;
            if self.graph.has_vertex(s) && self.colors.color_of(s) == Color::White {
                self.pending.push_back(DfsStep::StartVertex(s));
                self.enter(s, None);
            }
        }
    }
}

impl<G, C> WithGraphRef<G> for IterativeDfs<'_, G, C>
where
    G: OutEdges,
    C: ColorMap,
{
    fn graph_ref(&self) -> &G {
        self.graph
    }
}
