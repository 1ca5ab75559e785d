/*!
`csrkit` provides immutable **compressed sparse row** (CSR) graphs and the searches that run on
them. Graphs are
- **static**: built once, either from an edge list or incrementally, then only read,
- **compact**: all offsets, neighbors and per-edge data live in one flat `u32` buffer,
- **u**nlabelled : Nodes are numbered `0` to `n - 1`.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
For **edges**, we use a simple tuple-struct `Edge(Node, Node)` in the adjacency form and an
index `EdgeId` in the incidence form.

See the [`repr`] module for the storage backends:

- [`CsrGraph`](crate::repr::CsrGraph): out-neighbors only, an edge is its `(tail, head)` pair
- [`IncidenceGraph`](crate::repr::IncidenceGraph): directed, edges are numbered in input order
- [`UndirectedIncidenceGraph`](crate::repr::UndirectedIncidenceGraph): every edge is listed at
  both endpoints, the reverse orientation of edge `e` is `!e`

Queries never fail: an out-of-range vertex has no out-edges and an unknown edge has no endpoints.

# Design

Searches are lazy iterators configured with the *Builder* / *Setter* pattern; the commonly used
ones are also available as methods on every graph through the traits of [`algo`].
Explored sets, colors, distances and heap indices are generic over the [`utils::Set`] and
[`utils::Map`] abstractions, so they may be backed by bitsets, dense arrays or hash maps.

# Usage

- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, and all
  representations,
- [`algo`] includes breadth-first and stack-based searches (`graph.bfs(start_node)`), an
  iterative depth-first step stream, an eager BFS with cancellation and Dijkstra,
- [`utils`] includes the set, map, color, heap and weight abstractions.

In most use-cases, `use csrkit::{prelude::*, algo::*};` suffices for your needs.

```
use csrkit::{prelude::*, algo::*};

let g = CsrGraph::from_edges(4, [(0, 1), (1, 2), (0, 3)]);
assert_eq!(g.out_neighbors_of(0).collect::<Vec<_>>(), vec![1, 3]);
assert_eq!(g.bfs(0).collect::<Vec<_>>(), vec![0, 1, 3, 2]);
```

The library does not install a `tracing` subscriber; construction spans and diagnostics are
emitted at `debug` level, aborted searches at `warn` level.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use error::*;
pub use node::*;

/// `csrkit::prelude` includes definitions for nodes and edges, the error type, all basic graph
/// operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, error::*, node::*, ops::*, repr::*};
}
