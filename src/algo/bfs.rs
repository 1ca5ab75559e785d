/*!
# Eager Breadth-First Search

[`eager_bfs`] runs a complete breadth-first search in one call and reports every event to a
callback, in contrast to the lazy [`GenericSearch`](super::GenericSearch). It drives a
caller-provided [`ColorMap`] so that several calls can share exploration state, and it polls a
cancellation predicate once for every vertex taken from the queue.
*/

use super::*;
use std::collections::VecDeque;

/// Events reported by [`eager_bfs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsStep<E> {
    /// A vertex turns gray and enters the queue; sources are discovered first
    DiscoverVertex(Node),
    /// A vertex was taken from the queue and its out-edges are enumerated next
    ExamineVertex(Node),
    /// An out-edge of `tail` is about to be classified
    ExamineEdge { tail: Node, edge: E },
    /// The head was white and is discovered through this edge
    TreeEdge { tail: Node, head: Node, edge: E },
    /// The head was gray or black
    NonTreeEdge { tail: Node, head: Node, edge: E },
    /// All out-edges were examined and the vertex turns black
    FinishVertex(Node),
}

/// Result of [`eager_bfs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsOutcome {
    /// The queue ran empty
    Completed,
    /// The cancellation predicate returned *true*; the vertex taken from the queue last was
    /// colored black without examining its out-edges
    Cancelled,
}

impl BfsOutcome {
    /// Returns *true* if the search was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Breadth-first search over everything reachable from `sources` that is white in `colors`.
///
/// All white sources are discovered before the first vertex is examined. Invalid sources and
/// sources that are not white are skipped. `cancel` is called once per vertex taken from the
/// queue, before its out-edges are examined. On cancellation the colors stay consistent: the
/// examined vertex is black, every vertex still queued stays gray.
///
/// # Examples
/// ```
/// use csrkit::{prelude::*, algo::*, utils::*};
///
/// let g = CsrGraph::from_edges(3, [(0, 1), (1, 2)]);
/// let mut colors: DenseMap<Color> = DenseMap::new(3);
/// let mut order = Vec::new();
///
/// let outcome = eager_bfs(&g, [0], &mut colors, || false, |step| {
///     if let BfsStep::FinishVertex(u) = step {
///         order.push(u);
///     }
/// });
///
/// assert_eq!(outcome, BfsOutcome::Completed);
/// assert_eq!(order, vec![0, 1, 2]);
/// assert_eq!(colors.color_of(2), Color::Black);
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(nodes = graph.number_of_nodes()))]
pub fn eager_bfs<G, C, S, X, F>(
    graph: &G,
    sources: S,
    colors: &mut C,
    mut cancel: X,
    mut on_step: F,
) -> BfsOutcome
where
    G: OutEdges,
    C: ColorMap,
    S: IntoIterator<Item = Node>,
    X: FnMut() -> bool,
    F: FnMut(BfsStep<G::EdgeId>),
{
    let mut queue = VecDeque::new();
    for s in sources {
        if graph.has_vertex(s) && colors.color_of(s) == Color::White {
            colors.set_color(s, Color::Gray);
            on_step(BfsStep::DiscoverVertex(s));
            queue.push_back(s);
        }
    }

    while let Some(u) = queue.pop_front() {
        if cancel() {
            colors.set_color(u, Color::Black);
            tracing::debug!(vertex = u, queued = queue.len(), "breadth-first search cancelled");
            return BfsOutcome::Cancelled;
        }

        on_step(BfsStep::ExamineVertex(u));
        for edge in graph.out_edges_of(u) {
            on_step(BfsStep::ExamineEdge { tail: u, edge });
            let Some(v) = graph.try_get_head(edge) else {
                continue;
            };

            if colors.color_of(v) == Color::White {
                on_step(BfsStep::TreeEdge {
                    tail: u,
                    head: v,
                    edge,
                });
                colors.set_color(v, Color::Gray);
                on_step(BfsStep::DiscoverVertex(v));
                queue.push_back(v);
            } else {
                on_step(BfsStep::NonTreeEdge {
                    tail: u,
                    head: v,
                    edge,
                });
            }
        }

        colors.set_color(u, Color::Black);
        on_step(BfsStep::FinishVertex(u));
    }

    BfsOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn run<G: OutEdges>(graph: &G, sources: &[Node]) -> Vec<BfsStep<G::EdgeId>> {
        let mut colors: DenseMap<Color> = DenseMap::new(graph.len());
        let mut steps = Vec::new();
        let outcome = eager_bfs(graph, sources.iter().copied(), &mut colors, || false, |s| {
            steps.push(s)
        });
        assert_eq!(outcome, BfsOutcome::Completed);
        steps
    }

    #[test]
    fn events_on_triangle() {
        let graph = UndirectedIncidenceGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let discovered = run(&graph, &[0])
            .into_iter()
            .filter_map(|s| match s {
                BfsStep::DiscoverVertex(u) => Some(u),
                _ => None,
            })
            .collect_vec();
        assert_eq!(discovered, vec![0, 1, 2]);
    }

    #[test]
    fn event_sequence() {
        let graph = CsrGraph::from_edges(3, [(0, 1), (1, 0), (1, 2)]);

        use BfsStep::*;
        assert_eq!(
            run(&graph, &[0]),
            vec![
                DiscoverVertex(0),
                ExamineVertex(0),
                ExamineEdge { tail: 0, edge: Edge(0, 1) },
                TreeEdge { tail: 0, head: 1, edge: Edge(0, 1) },
                DiscoverVertex(1),
                FinishVertex(0),
                ExamineVertex(1),
                ExamineEdge { tail: 1, edge: Edge(1, 0) },
                NonTreeEdge { tail: 1, head: 0, edge: Edge(1, 0) },
                ExamineEdge { tail: 1, edge: Edge(1, 2) },
                TreeEdge { tail: 1, head: 2, edge: Edge(1, 2) },
                DiscoverVertex(2),
                FinishVertex(1),
                ExamineVertex(2),
                FinishVertex(2),
            ]
        );
    }

    #[test]
    fn sources_are_discovered_first() {
        let graph = CsrGraph::from_edges(4, [(0, 1), (2, 3)]);
        let discovered = run(&graph, &[2, 0, 2, 9])
            .into_iter()
            .filter_map(|s| match s {
                BfsStep::DiscoverVertex(u) => Some(u),
                _ => None,
            })
            .collect_vec();
        assert_eq!(discovered, vec![2, 0, 3, 1]);
    }

    #[test]
    fn cancellation_leaves_consistent_colors() {
        let graph = CsrGraph::from_edges(5, [(0, 1), (0, 2), (1, 3), (2, 4)]);
        let mut colors: FxHashMap<Node, Color> = FxHashMap::default();

        let mut polls = 0;
        let mut finished = Vec::new();
        let outcome = eager_bfs(
            &graph,
            [0],
            &mut colors,
            || {
                polls += 1;
                polls == 2
            },
            |step| {
                if let BfsStep::FinishVertex(u) = step {
                    finished.push(u)
                }
            },
        );

        assert!(outcome.is_cancelled());
        assert_eq!(polls, 2);
        assert_eq!(finished, vec![0]);
        assert_eq!(colors.color_of(0), Color::Black);
        assert_eq!(colors.color_of(1), Color::Black);
        assert_eq!(colors.color_of(2), Color::Gray);
        assert_eq!(colors.color_of(3), Color::White);

        // resuming from the queued vertex continues with the shared colors
        colors.set_color(2, Color::White);
        let outcome = eager_bfs(&graph, [2], &mut colors, || false, |_| {});
        assert_eq!(outcome, BfsOutcome::Completed);
        assert_eq!(colors.color_of(4), Color::Black);
        assert_eq!(colors.color_of(3), Color::White);
    }

    #[test]
    fn agrees_with_lazy_search() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for n in [8 as NumNodes, 64, 256] {
            let edges = (0..2 * n)
                .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                .collect_vec();
            let graph = IncidenceGraph::from_edges(n, edges.iter());

            let eager = run(&graph, &[0, n / 2])
                .into_iter()
                .filter_map(|s| match s {
                    BfsStep::DiscoverVertex(u) => Some(u),
                    _ => None,
                })
                .collect_vec();
            let lazy = graph.bfs_from([0, n / 2]).collect_vec();
            assert_eq!(eager, lazy);
        }
    }
}
