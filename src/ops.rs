/*!
# Capability Traits

Algorithms in this crate never name a concrete representation. They consume graphs through a
small set of capabilities:

- [`GraphNodeOrder`] / [`GraphEdgeOrder`]: vertex and edge counts,
- [`Incidence`]: resolving an edge to its tail and head,
- [`OutEdges`]: enumerating the out-edges of a vertex,
- [`OutNeighbors`]: enumerating the out-neighbors of a vertex.

Every query is total: vertices or edges outside of the graph produce the empty sequence or
`None`, never a panic. Enumerations borrow the graph and are cheap to restart by calling the
method again.
*/

use std::{fmt::Debug, ops::Range};

use crate::*;

/// Marker for directed graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directed;

/// Marker for undirected graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Undirected;

/// Common behaviour of [`Directed`] and [`Undirected`]
pub trait GraphDir: Debug + Clone + Copy + Default + 'static {
    /// *true* for [`Directed`]
    const IS_DIRECTED: bool;
}

impl GraphDir for Directed {
    const IS_DIRECTED: bool = true;
}

impl GraphDir for Undirected {
    const IS_DIRECTED: bool = false;
}

/// Associates a graph with its directedness
pub trait GraphType {
    type Dir: GraphDir;

    /// Returns *true* if the graph is directed
    fn is_directed(&self) -> bool {
        Self::Dir::IS_DIRECTED
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.number_of_nodes() == 0
    }

    /// Returns the range `0..n` of all vertices
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns *true* if `u` is a vertex of the graph
    #[inline(always)]
    fn has_vertex(&self, u: Node) -> bool {
        node_in_range(u, self.number_of_nodes())
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn has_no_edges(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Resolves edges to their endpoints.
pub trait Incidence {
    /// The way an edge is identified: a `(tail, head)` pair in adjacency form
    /// or an index in incidence form.
    type EdgeId: Copy + Debug;

    /// Returns the tail of `edge` or `None` if the edge does not exist
    fn try_get_tail(&self, edge: Self::EdgeId) -> Option<Node>;

    /// Returns the head of `edge` or `None` if the edge does not exist
    fn try_get_head(&self, edge: Self::EdgeId) -> Option<Node>;
}

/// Enumerates the out-edges of a vertex
pub trait OutEdges: GraphNodeOrder + Incidence {
    type OutEdgesIter<'a>: Iterator<Item = Self::EdgeId> + Clone + 'a
    where
        Self: 'a;

    /// Returns the out-edges of `u`; empty if `u` is not a vertex
    fn out_edges_of(&self, u: Node) -> Self::OutEdgesIter<'_>;

    /// Returns the number of out-edges of `u`; zero if `u` is not a vertex
    fn out_degree_of(&self, u: Node) -> NumEdges;

    /// Returns the sum of all out-degrees
    fn total_out_degree(&self) -> u64 {
        self.vertices().map(|u| self.out_degree_of(u) as u64).sum()
    }
}

/// Enumerates the out-neighbors of a vertex
pub trait OutNeighbors: GraphNodeOrder {
    type NeighborIter<'a>: Iterator<Item = Node> + Clone + 'a
    where
        Self: 'a;

    /// Returns the heads of all out-edges of `u`; empty if `u` is not a vertex
    fn out_neighbors_of(&self, u: Node) -> Self::NeighborIter<'_>;

    /// Returns an iterator over all `(tail, head)` pairs, grouped by tail in increasing order
    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices()
            .flat_map(move |u| self.out_neighbors_of(u).map(move |v| Edge(u, v)))
    }

    /// Returns *true* if `v` is an out-neighbor of `u`
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.out_neighbors_of(u).any(|w| w == v)
    }
}

/// Gives access to the graph an algorithm operates on
pub trait WithGraphRef<G> {
    /// Returns the graph being processed
    fn graph_ref(&self) -> &G;
}
