/// Every CSR representation must store exactly the retained input edges, grouped by tail with
/// input order preserved, and answer out-of-range queries with the empty result.
///
/// `test_csr_graph!(env, Graph, undirected)` builds graphs via [`crate::repr::GraphFromEdges`];
/// an optional fourth argument `|n, edges| -> Graph` replaces the constructor.
macro_rules! test_csr_graph {
    ($env:ident, $graph:ty, $undirected:literal) => {
        test_csr_graph!($env, $graph, $undirected, |n: NumNodes, edges: &[Edge]| {
            <$graph>::from_edges(n, edges.iter().copied())
        });
    };
    ($env:ident, $graph:ty, $undirected:literal, $build:expr) => {
        #[cfg(test)]
        mod $env {
            #[allow(unused_imports)]
            use crate::{ops::*, repr::*, *};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            /// Creates `m` random edges with endpoints in `0..n + spill`
            fn random_edges<R: Rng>(
                rng: &mut R,
                n: NumNodes,
                m: NumEdges,
                spill: NumNodes,
            ) -> Vec<Edge> {
                (0..m)
                    .map(|_| {
                        Edge(
                            rng.random_range(0..n + spill),
                            rng.random_range(0..n + spill),
                        )
                    })
                    .collect_vec()
            }

            /// Out-lists a correct graph reports for `edges`
            fn expected_lists(n: NumNodes, edges: &[Edge]) -> Vec<Vec<Node>> {
                let mut lists = vec![Vec::new(); n as usize];
                for &Edge(u, v) in edges.iter().filter(|e| e.is_within(n)) {
                    lists[u as usize].push(v);
                    if $undirected && u != v {
                        lists[v as usize].push(u);
                    }
                }
                lists
            }

            fn build(n: NumNodes, edges: &[Edge]) -> $graph {
                let build = $build;
                build(n, edges)
            }

            fn check_graph(graph: &$graph, n: NumNodes, edges: &[Edge]) {
                let lists = expected_lists(n, edges);
                let retained = edges.iter().filter(|e| e.is_within(n)).count();

                assert_eq!(graph.number_of_nodes(), n);
                assert_eq!(graph.number_of_edges() as usize, retained);
                assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());
                assert_eq!(
                    graph.total_out_degree() as usize,
                    lists.iter().map(Vec::len).sum::<usize>()
                );

                for u in graph.vertices() {
                    let list = &lists[u as usize];
                    assert_eq!(&graph.out_neighbors_of(u).collect_vec(), list);
                    assert_eq!(graph.out_degree_of(u) as usize, list.len());

                    let heads = graph
                        .out_edges_of(u)
                        .map(|e| {
                            assert_eq!(graph.try_get_tail(e), Some(u));
                            graph.try_get_head(e).unwrap()
                        })
                        .collect_vec();
                    assert_eq!(&heads, list);
                }

                let offsets = graph.layout().offsets().collect_vec();
                assert_eq!(offsets.len(), n as usize);
                assert!(offsets.is_sorted());
                assert_eq!(
                    offsets.last().copied().unwrap_or(0) as u64,
                    graph.total_out_degree()
                );
                for u in graph.vertices() {
                    let (lb, ub) = (
                        graph.layout().lower_bound(u).unwrap(),
                        graph.layout().upper_bound(u).unwrap(),
                    );
                    assert_eq!(ub - lb, lists[u as usize].len());
                }
            }

            #[test]
            fn random_graphs() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [1 as NumNodes, 10, 20, 50] {
                    for m in [0, n, n * 3, n * 10] {
                        for _ in 0..5 {
                            let edges = random_edges(rng, n, m, 0);
                            let graph = build(n, &edges);
                            check_graph(&graph, n, &edges);
                        }
                    }
                }
            }

            #[test]
            fn out_of_range_edges_are_dropped() {
                let rng = &mut Pcg64Mcg::seed_from_u64(4);

                for n in [1 as NumNodes, 10, 30] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, n * 4, 3);
                        let graph = build(n, &edges);
                        check_graph(&graph, n, &edges);
                    }
                }

                // tail outside of the vertex range
                let graph = build(2, &[Edge(0, 1), Edge(5, 0)]);
                assert_eq!(graph.number_of_edges(), 1);
                assert_eq!(graph.out_neighbors_of(0).collect_vec(), vec![1]);
            }

            #[test]
            fn empty_graph() {
                let graph = build(0, &[Edge(0, 1), Edge(2, 2)]);
                assert!(graph.is_empty());
                assert!(graph.has_no_edges());
                assert!(graph.layout().is_sentinel());
                assert_eq!(graph.out_edges_of(0).count(), 0);
                assert_eq!(graph.out_degree_of(0), 0);
                assert_eq!(graph.total_out_degree(), 0);
            }

            #[test]
            fn edgeless_graph() {
                let graph = build(4, &[]);
                assert_eq!(graph.number_of_nodes(), 4);
                assert!(graph.has_no_edges());
                assert_eq!(graph.layout().offsets().collect_vec(), vec![0; 4]);
                assert!(graph.vertices().all(|u| graph.out_degree_of(u) == 0));
            }

            #[test]
            fn out_of_range_queries() {
                let graph = build(3, &[Edge(0, 1), Edge(1, 2), Edge(2, 0)]);
                for u in [3, 100, INVALID_NODE, (-2i32) as Node] {
                    assert!(!graph.has_vertex(u));
                    assert_eq!(graph.out_edges_of(u).count(), 0);
                    assert_eq!(graph.out_neighbors_of(u).count(), 0);
                    assert_eq!(graph.out_degree_of(u), 0);
                }
            }

            #[test]
            fn directedness() {
                let graph = build(1, &[]);
                assert_eq!(graph.is_directed(), !$undirected);
            }
        }
    };
}

pub(crate) use test_csr_graph;
