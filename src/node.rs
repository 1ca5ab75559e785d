/*!
# Node Representation

We choose `Node = u32` as the vertex space of a CSR graph is the dense range `0..n` and rarely
exceeds `2^32` entries. This allows us to (1) store the whole graph in one `u32` buffer and
(2) detect "negative" indices (as they would appear after a signed-to-unsigned reinterpretation)
with the same single comparison that rejects indices `>= n`.
*/

use stream_bitset::bitset::BitSetImpl;

use crate::error::GraphError;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 2`
pub type Node = u32;

/// Node-Value that is considered invalid.
///
/// A signed `-1` reinterpreted as `u32` lands exactly here, which is why checked entry points
/// report it as a usage error rather than as a (huge) vertex.
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 2` nodes in a graph!
pub type NumNodes = Node;

/// Largest supported vertex count; a count of [`INVALID_NODE`] is a wrapped `-1`
pub const MAX_NODES: NumNodes = INVALID_NODE - 1;

/// Returns `n` if it is a supported vertex count.
///
/// # Errors
/// Fails with [`GraphError::TooManyNodes`] if `n > MAX_NODES`.
pub fn try_vertex_count(n: NumNodes) -> Result<NumNodes, GraphError> {
    if n > MAX_NODES {
        Err(GraphError::TooManyNodes { requested: n as u64 })
    } else {
        Ok(n)
    }
}

/// BitSet for Nodes
pub type NodeBitSet = BitSetImpl<Node>;

/// Returns *true* if `u` lies in `0..n`.
///
/// As `Node` is unsigned, a wrapped negative index is simply very large and fails the same test.
#[inline(always)]
pub const fn node_in_range(u: Node, n: NumNodes) -> bool {
    u < n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_negative_is_out_of_range() {
        assert_eq!((-1i32) as Node, INVALID_NODE);
        assert!(!node_in_range((-1i32) as Node, 10));
        assert!(!node_in_range((-7i32) as Node, 10));
        assert!(node_in_range(9, 10));
        assert!(!node_in_range(0, 0));
    }

    #[test]
    fn wrapped_negative_count_is_rejected() {
        assert_eq!(try_vertex_count(0), Ok(0));
        assert_eq!(try_vertex_count(MAX_NODES), Ok(MAX_NODES));
        assert_eq!(
            try_vertex_count((-1i32) as NumNodes),
            Err(GraphError::TooManyNodes {
                requested: u32::MAX as u64
            })
        );
    }
}
