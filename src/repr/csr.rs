/*!
# Adjacency CSR Graph

[`CsrGraph`] stores the heads of all out-edges in the neighbor region of a [`CsrLayout`].
An edge is identified by its endpoints `Edge(tail, head)`, so parallel edges are
indistinguishable as identities but are all enumerated.

Construction sorts the edge list by tail **in place** with a stable sort; edges sharing a tail
therefore appear in input order.
*/

use std::{iter::Copied, slice::Iter};

use super::{layout::RawLayout, *};
use crate::{ops::*, testing::test_csr_graph};

/// Directed adjacency-form CSR graph.
///
/// Incoming edges are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrGraph {
    layout: CsrLayout,
}

impl CsrGraph {
    pub(crate) fn from_layout(layout: CsrLayout) -> Self {
        Self { layout }
    }

    /// Alias of [`GraphFromEdges::try_from_edges_with`] reflecting that `edges` is reordered
    pub fn from_edges_in_place(edges: &mut [Edge], options: CsrOptions) -> Result<Self> {
        Self::try_from_edges_with(edges, options)
    }
}

impl CsrStorage for CsrGraph {
    fn layout(&self) -> &CsrLayout {
        &self.layout
    }
}

impl GraphType for CsrGraph {
    type Dir = Directed;
}

impl GraphNodeOrder for CsrGraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.layout.vertex_count()
    }
}

impl GraphEdgeOrder for CsrGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.layout.edge_count()
    }
}

impl Incidence for CsrGraph {
    type EdgeId = Edge;

    fn try_get_tail(&self, edge: Edge) -> Option<Node> {
        edge.is_within(self.number_of_nodes()).then_some(edge.0)
    }

    fn try_get_head(&self, edge: Edge) -> Option<Node> {
        edge.is_within(self.number_of_nodes()).then_some(edge.1)
    }
}

impl OutEdges for CsrGraph {
    type OutEdgesIter<'a>
        = AdjacencyEdgesIter<'a>
    where
        Self: 'a;

    fn out_edges_of(&self, u: Node) -> Self::OutEdgesIter<'_> {
        AdjacencyEdgesIter {
            tail: u,
            heads: self.layout.out_slice(u).iter(),
        }
    }

    fn out_degree_of(&self, u: Node) -> NumEdges {
        self.layout.out_len(u)
    }

    fn total_out_degree(&self) -> u64 {
        self.layout.neighbor_region().len() as u64
    }
}

impl OutNeighbors for CsrGraph {
    type NeighborIter<'a>
        = Copied<Iter<'a, Node>>
    where
        Self: 'a;

    fn out_neighbors_of(&self, u: Node) -> Self::NeighborIter<'_> {
        self.layout.out_iter(u)
    }
}

impl GraphFromEdges for CsrGraph {
    #[tracing::instrument(level = "debug", skip_all, fields(edges = edges.len()))]
    fn try_from_edges_with(edges: &mut [Edge], options: CsrOptions) -> Result<Self> {
        let (n, m) = options.prepare(edges)?;

        edges.sort_by_key(|e| e.0);

        let mut raw = RawLayout::try_new(n, m, m as usize, 0)?;
        raw.write_sorted_runs(
            edges
                .iter()
                .filter(|e| e.is_within(n))
                .map(|&Edge(u, v)| (u, v)),
        );

        Ok(Self {
            layout: raw.finish(),
        })
    }
}

// ---------- Custom Iterators ----------

/// Out-edges of a single vertex in a [`CsrGraph`] as `Edge(tail, head)`
#[derive(Debug, Clone)]
pub struct AdjacencyEdgesIter<'a> {
    tail: Node,
    heads: Iter<'a, Node>,
}

impl Iterator for AdjacencyEdgesIter<'_> {
    type Item = Edge;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heads.next().map(|&v| Edge(self.tail, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heads.size_hint()
    }
}

impl ExactSizeIterator for AdjacencyEdgesIter<'_> {}

// ---------- Testing ----------

test_csr_graph!(test_csr_graph, CsrGraph, false);
