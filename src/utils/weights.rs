/*!
# Weight Monoids

Shortest-path searches combine edge weights through a [`Monoid`]: an identity (the distance of a
source) and an associative `combine`. [`Additive`] is the usual `(0, +)`; other monoids such as
`(0, max)` for bottleneck paths plug in the same way.

Edge weights are looked up through [`EdgeWeights`], implemented for dense and hashed maps,
plain vectors indexed by edge id and closures wrapped in [`WeightFn`].
*/

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
    ops::Add,
};

use num::{ToPrimitive, Zero};

use super::{DenseMap, Map};

/// An identity element together with an associative binary operation
pub trait Monoid<W> {
    /// The neutral element; `combine(identity, w) == w`
    fn identity(&self) -> W;

    /// Combines a path length with the weight of the next edge
    fn combine(&self, a: &W, b: &W) -> W;
}

/// `(0, +)` for every numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Additive;

impl<W> Monoid<W> for Additive
where
    W: Zero + Add<Output = W> + Clone,
{
    #[inline]
    fn identity(&self) -> W {
        W::zero()
    }

    #[inline]
    fn combine(&self, a: &W, b: &W) -> W {
        a.clone() + b.clone()
    }
}

/// `(0, max)`: the length of a path is its heaviest edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bottleneck;

impl<W> Monoid<W> for Bottleneck
where
    W: Zero + PartialOrd + Clone,
{
    fn identity(&self) -> W {
        W::zero()
    }

    fn combine(&self, a: &W, b: &W) -> W {
        if a < b { b.clone() } else { a.clone() }
    }
}

/// Read access to the weight of an edge
pub trait EdgeWeights<E, W> {
    /// Returns the weight of `edge` or `None` if it has none
    fn weight_of(&self, edge: E) -> Option<W>;
}

impl<E, W> EdgeWeights<E, W> for DenseMap<W>
where
    E: ToPrimitive,
    W: Clone,
{
    fn weight_of(&self, edge: E) -> Option<W> {
        self.get(&edge).cloned()
    }
}

impl<E, W, S> EdgeWeights<E, W> for HashMap<E, W, S>
where
    E: Hash + Eq,
    W: Clone,
    S: BuildHasher,
{
    fn weight_of(&self, edge: E) -> Option<W> {
        self.get(&edge).cloned()
    }
}

/// Weights indexed by edge id; the complement ids of undirected graphs have no entry
impl<E, W> EdgeWeights<E, W> for Vec<W>
where
    E: ToPrimitive,
    W: Clone,
{
    fn weight_of(&self, edge: E) -> Option<W> {
        self.get(edge.to_usize()?).cloned()
    }
}

/// Adapts a closure `Fn(E) -> Option<W>` to [`EdgeWeights`]
#[derive(Debug, Clone, Copy)]
pub struct WeightFn<F>(pub F);

impl<E, W, F> EdgeWeights<E, W> for WeightFn<F>
where
    F: Fn(E) -> Option<W>,
{
    fn weight_of(&self, edge: E) -> Option<W> {
        (self.0)(edge)
    }
}
