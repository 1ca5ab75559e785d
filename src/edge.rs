use std::fmt::{Debug, Display};

use crate::{error::GraphError, node::*};

/// An edge is defined by its two endpoints, the *tail* (first) and the *head* (second).
/// All graphs in this crate treat edges as directed from tail to head; undirected
/// representations store both orientations.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Edge(pub Node, pub Node);

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// Identity of an edge in an incidence representation: its index in `0..m`.
///
/// Undirected incidence graphs additionally use the bitwise complement `!e` to denote the edge
/// `e` traversed from head to tail (see [`reverse_edge_id`]).
pub type EdgeId = u32;

/// Edge-Id that is considered invalid
pub const INVALID_EDGE: EdgeId = EdgeId::MAX;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Returns the tail (source) of the edge
    #[inline(always)]
    pub const fn tail(&self) -> Node {
        self.0
    }

    /// Returns the head (target) of the edge
    #[inline(always)]
    pub const fn head(&self) -> Node {
        self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Returns the larger endpoint; used to infer the vertex count of an edge list
    pub fn max_node(&self) -> Node {
        self.0.max(self.1)
    }

    /// Returns *true* if both endpoints lie in `0..n`
    pub fn is_within(&self, n: NumNodes) -> bool {
        node_in_range(self.0, n) && node_in_range(self.1, n)
    }

    /// Checked constructor for user-facing entry points.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidNode`] if either endpoint equals [`INVALID_NODE`].
    pub fn try_new(tail: Node, head: Node) -> Result<Self, GraphError> {
        if tail == INVALID_NODE {
            return Err(GraphError::InvalidNode {
                what: "tail",
                value: tail,
            });
        }
        if head == INVALID_NODE {
            return Err(GraphError::InvalidNode {
                what: "head",
                value: head,
            });
        }
        Ok(Edge(tail, head))
    }
}

/// Returns the id denoting edge `e` traversed against its orientation.
/// Applying it twice yields `e` again.
#[inline(always)]
pub const fn reverse_edge_id(e: EdgeId) -> EdgeId {
    !e
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

impl TryFrom<(i64, i64)> for Edge {
    type Error = GraphError;

    /// Converts a signed endpoint pair, rejecting negative or unrepresentable endpoints
    fn try_from((tail, head): (i64, i64)) -> Result<Self, Self::Error> {
        let convert = |what: &'static str, value: i64| -> Result<Node, GraphError> {
            if value < 0 {
                return Err(GraphError::NegativeIndex { what, value });
            }
            match Node::try_from(value) {
                Ok(u) if u != INVALID_NODE => Ok(u),
                _ => Err(GraphError::TooManyNodes { requested: value as u64 }),
            }
        };

        Ok(Edge(convert("tail", tail)?, convert("head", head)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_conversion() {
        assert_eq!(Edge::try_from((3i64, 4i64)).unwrap(), Edge(3, 4));
        assert!(matches!(
            Edge::try_from((-1i64, 4i64)),
            Err(GraphError::NegativeIndex {
                what: "tail",
                value: -1
            })
        ));
        assert!(matches!(
            Edge::try_from((1i64, -4i64)),
            Err(GraphError::NegativeIndex { what: "head", .. })
        ));
        assert!(matches!(
            Edge::try_from((1i64, u32::MAX as i64)),
            Err(GraphError::TooManyNodes { .. })
        ));
    }

    #[test]
    fn checked_constructor() {
        assert!(Edge::try_new(0, 1).is_ok());
        assert!(Edge::try_new(INVALID_NODE, 1).is_err());
        assert!(Edge::try_new(1, (-1i32) as Node).is_err());
    }

    #[test]
    fn complement_roundtrip() {
        for e in [0, 1, 17, 1 << 20] {
            let r = reverse_edge_id(e);
            assert_ne!(r, e);
            assert_eq!(reverse_edge_id(r), e);
        }
        assert_eq!(format!("{}", Edge(2, 5)), "(2,5)");
    }
}
