/*!
# Graph Algorithms

Searches built on top of the graph representations in this crate.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use csrkit::algo::*;
```
and gain access to the lazy frontier searches, the iterative depth-first traversal, the eager
breadth-first search and Dijkstra.
Searches are provided as **iterators** wherever possible, making it easy to consume results lazily.
*/

mod bfs;
mod dfs;
mod dijkstra;
mod traversal;

use crate::{prelude::*, utils::*};

pub use bfs::*;
pub use dfs::*;
pub use dijkstra::*;
pub use traversal::*;
