/*!
# Vertex Colors

Depth-first traversals track every vertex as [`Color::White`] (unseen), [`Color::Gray`]
(on the stack) or [`Color::Black`] (finished). Any [`Map<Node, Color>`] serves as a color map;
an absent entry reads as white.
*/

use super::Map;
use crate::node::*;

/// Tri-state exploration status of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    White,
    Gray,
    Black,
}

/// Read/write access to vertex colors
pub trait ColorMap {
    /// Returns the color of `u`; white if `u` was never colored
    fn color_of(&self, u: Node) -> Color;

    /// Colors `u` with `color`
    fn set_color(&mut self, u: Node, color: Color);

    /// Resets every vertex to white
    fn reset_colors(&mut self);
}

impl<M> ColorMap for M
where
    M: Map<Node, Color>,
{
    #[inline]
    fn color_of(&self, u: Node) -> Color {
        self.get(&u).copied().unwrap_or_default()
    }

    #[inline]
    fn set_color(&mut self, u: Node, color: Color) {
        if color == Color::White {
            self.remove(&u);
        } else {
            self.insert(u, color);
        }
    }

    fn reset_colors(&mut self) {
        self.clear();
    }
}
