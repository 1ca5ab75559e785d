/*!
# Errors

Construction entry points validate their input and report misuse through [`GraphError`].
Queries on built graphs never fail: an out-of-range vertex or edge simply yields an empty
sequence or `None`. Traversals that detect a broken caller contract (a negative weight, a
vertex in the heap without a distance) yield the error once and stop.
*/

use thiserror::Error;

use crate::{edge::*, node::*};

/// Everything that can go wrong in this crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A checked entry point received the reserved [`INVALID_NODE`] value.
    #[error("invalid {what}: {value} is not a valid vertex")]
    InvalidNode { what: &'static str, value: Node },

    /// A signed index was negative.
    #[error("negative {what}: {value}")]
    NegativeIndex { what: &'static str, value: i64 },

    /// An edge referenced a vertex outside of `0..vertex_count` while rejection was requested.
    #[error("edge {edge} references a vertex outside of 0..{vertex_count}")]
    EdgeOutOfRange { edge: Edge, vertex_count: NumNodes },

    /// The vertex space would exceed what `Node` can index.
    #[error("cannot address {requested} vertices")]
    TooManyNodes { requested: u64 },

    /// The edge space would exceed what `EdgeId` can index.
    #[error("cannot address {requested} edges")]
    TooManyEdges { requested: u64 },

    /// An edge weight compared below the identity of the weight monoid.
    #[error("edge {edge} has a negative weight")]
    NegativeWeight { edge: String },

    /// An examined edge had no weight.
    #[error("edge {edge} has no weight")]
    MissingWeight { edge: String },

    /// A vertex was taken from the frontier without a recorded distance.
    #[error("vertex {vertex} was extracted from the heap without a known distance")]
    MissingDistance { vertex: Node },

    /// `peek`/`extract` was called on an empty heap.
    #[error("the heap is empty")]
    EmptyHeap,
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = GraphError::EdgeOutOfRange {
            edge: Edge(7, 1),
            vertex_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "edge (7,1) references a vertex outside of 0..3"
        );
        assert_eq!(GraphError::EmptyHeap.to_string(), "the heap is empty");
    }
}
