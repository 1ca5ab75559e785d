/*!
# Flat CSR Layout

All CSR representations of this crate share one immutable `u32` buffer with fixed regions:

| Region | Length | Content |
|---|---|---|
| header | `2` | `n`, `m` |
| offsets | `n` | exclusive end (absolute index into the buffer) of each vertex' out-list |
| neighbors | `k` | heads or edge ids, grouped by tail in increasing order |
| extra regions | `m` each | e.g. head-by-edge and tail-by-edge of incidence graphs |

The out-list of `v` occupies `[lower(v), upper(v))` where `lower(0)` is the first index of
the neighbor region and `lower(v) = upper(v - 1)` otherwise. For directed graphs `k == m`.

A graph without vertices carries no buffer at all; every query on it returns the empty result.
*/

use std::{iter::Copied, slice::Iter};

use itertools::Itertools;

use crate::*;

const HEADER_LEN: usize = 2;

/// The immutable backing buffer of a CSR graph.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CsrLayout {
    data: Option<Box<[u32]>>,
}

impl std::fmt::Debug for CsrLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrLayout")
            .field("n", &self.vertex_count())
            .field("m", &self.edge_count())
            .field("offsets", &self.offsets().collect_vec())
            .finish()
    }
}

impl CsrLayout {
    /// Returns the number of vertices `n`
    #[inline(always)]
    pub fn vertex_count(&self) -> NumNodes {
        self.data.as_ref().map_or(0, |d| d[0])
    }

    /// Returns the number of edges `m`
    #[inline(always)]
    pub fn edge_count(&self) -> NumEdges {
        self.data.as_ref().map_or(0, |d| d[1])
    }

    /// Returns *true* for the vertex-less sentinel which owns no buffer
    pub fn is_sentinel(&self) -> bool {
        self.data.is_none()
    }

    /// Returns the complete raw buffer (empty for the sentinel)
    pub fn raw(&self) -> &[u32] {
        self.data.as_deref().unwrap_or(&[])
    }

    #[inline(always)]
    fn base(data: &[u32]) -> usize {
        HEADER_LEN + data[0] as usize
    }

    #[inline(always)]
    fn neighbor_region_end(data: &[u32]) -> usize {
        let n = data[0] as usize;
        // a buffer only exists for `n > 0`
        data[HEADER_LEN + n - 1] as usize
    }

    /// Returns the exclusive end of `v`'s out-list relative to the start of the neighbor region,
    /// or `None` if `v` is not a vertex.
    pub fn upper_bound(&self, v: Node) -> Option<usize> {
        let data = self.data.as_deref()?;
        node_in_range(v, data[0]).then(|| data[HEADER_LEN + v as usize] as usize - Self::base(data))
    }

    /// Returns the start of `v`'s out-list relative to the start of the neighbor region,
    /// or `None` if `v` is not a vertex.
    pub fn lower_bound(&self, v: Node) -> Option<usize> {
        let data = self.data.as_deref()?;
        if !node_in_range(v, data[0]) {
            return None;
        }
        Some(if v == 0 {
            0
        } else {
            data[HEADER_LEN + v as usize - 1] as usize - Self::base(data)
        })
    }

    /// Returns the relative upper bounds of all vertices in order
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        let (base, offsets) = match self.data.as_deref() {
            Some(data) => (
                Self::base(data),
                &data[HEADER_LEN..HEADER_LEN + data[0] as usize],
            ),
            None => (0, &[][..]),
        };
        offsets.iter().map(move |&x| x as usize - base)
    }

    /// Returns the whole neighbor region
    pub fn neighbor_region(&self) -> &[u32] {
        match self.data.as_deref() {
            Some(data) => &data[Self::base(data)..Self::neighbor_region_end(data)],
            None => &[],
        }
    }

    /// Returns the out-list of `v`; empty if `v` is not a vertex
    #[inline]
    pub fn out_slice(&self, v: Node) -> &[u32] {
        let Some(data) = self.data.as_deref() else {
            return &[];
        };
        if !node_in_range(v, data[0]) {
            return &[];
        }

        let idx = HEADER_LEN + v as usize;
        let end = data[idx] as usize;
        let start = if v == 0 {
            Self::base(data)
        } else {
            data[idx - 1] as usize
        };
        &data[start..end]
    }

    /// Iterator version of [`CsrLayout::out_slice`]
    #[inline]
    pub fn out_iter(&self, v: Node) -> Copied<Iter<'_, u32>> {
        self.out_slice(v).iter().copied()
    }

    /// Returns the number of entries in `v`'s out-list
    #[inline]
    pub fn out_len(&self, v: Node) -> u32 {
        self.out_slice(v).len() as u32
    }

    /// Returns the `k`-th extra region (each of length `m`)
    pub fn extra_region(&self, k: usize) -> &[u32] {
        match self.data.as_deref() {
            Some(data) => {
                let m = data[1] as usize;
                let start = Self::neighbor_region_end(data) + k * m;
                data.get(start..start + m).unwrap_or(&[])
            }
            None => &[],
        }
    }
}

/// Mutable buffer used while a [`CsrLayout`] is being written.
///
/// The offsets are written exactly once by either [`RawLayout::write_sorted_runs`] or
/// [`RawLayout::write_buckets`]; the extra regions may be filled afterwards.
pub(crate) struct RawLayout {
    data: Vec<u32>,
    n: usize,
    m: usize,
    entries: usize,
}

/// Returns the length of a buffer for `n` vertices, `entries` neighbor entries and `extra`
/// regions of `m` entries each.
///
/// # Errors
/// Fails with [`GraphError::TooManyEdges`] if the buffer could not be indexed by `u32`.
pub(crate) fn buffer_len(n: NumNodes, m: NumEdges, entries: usize, extra: usize) -> Result<usize> {
    let len = (extra as u64)
        .checked_mul(m as u64)
        .and_then(|x| x.checked_add(HEADER_LEN as u64 + n as u64))
        .and_then(|x| x.checked_add(entries as u64));

    match len {
        Some(len) if len <= u32::MAX as u64 => Ok(len as usize),
        _ => Err(GraphError::TooManyEdges {
            requested: m as u64,
        }),
    }
}

impl RawLayout {
    /// Allocates a zeroed buffer for `n` vertices, `m` edges, `entries` neighbor entries
    /// and `extra` additional per-edge regions.
    ///
    /// # Errors
    /// Fails if the buffer could not be indexed by `u32`, see [`buffer_len`].
    pub(crate) fn try_new(n: NumNodes, m: NumEdges, entries: usize, extra: usize) -> Result<Self> {
        buffer_len(n, m, entries, extra)?;
        Ok(Self::new(n, m, entries, extra))
    }

    /// Unchecked variant of [`RawLayout::try_new`] for sizes validated beforehand
    pub(crate) fn new(n: NumNodes, m: NumEdges, entries: usize, extra: usize) -> Self {
        debug_assert!(buffer_len(n, m, entries, extra).is_ok());

        let (n, m_usize) = (n as usize, m as usize);
        let mut data = vec![0u32; HEADER_LEN + n + entries + extra * m_usize];
        data[0] = n as u32;
        data[1] = m;

        // trivial case: every out-list is empty until written
        let base = (HEADER_LEN + n) as u32;
        data[HEADER_LEN..HEADER_LEN + n].fill(base);

        Self {
            data,
            n,
            m: m_usize,
            entries,
        }
    }

    #[inline(always)]
    fn base(&self) -> usize {
        HEADER_LEN + self.n
    }

    /// Writes `(tail, value)` pairs that are sorted by tail (stable order within equal tails).
    ///
    /// For every maximal run of a tail, the values are copied into the neighbor region and the
    /// upper bound of the tail is set to the end of the run. Vertices skipped by the sequence
    /// inherit the previous upper bound, i.e. receive an empty range. Pairs with a tail `>= n`
    /// terminate the scan; the caller has filtered them.
    pub(crate) fn write_sorted_runs<I>(&mut self, sorted: I)
    where
        I: IntoIterator<Item = (Node, u32)>,
    {
        let base = self.base();
        let mut pos = base;
        let mut next_unfilled = 0usize;

        for (tail, value) in sorted {
            let tail = tail as usize;
            debug_assert!(tail < self.n);
            debug_assert!(tail + 1 >= next_unfilled, "input not sorted by tail");

            // close all vertices before `tail`: skipped ones inherit the previous bound
            while next_unfilled < tail {
                self.data[HEADER_LEN + next_unfilled] = pos as u32;
                next_unfilled += 1;
            }

            self.data[pos] = value;
            pos += 1;
            self.data[HEADER_LEN + tail] = pos as u32;
            next_unfilled = tail + 1;
        }

        while next_unfilled < self.n {
            self.data[HEADER_LEN + next_unfilled] = pos as u32;
            next_unfilled += 1;
        }

        debug_assert_eq!(pos - base, self.entries);
    }

    /// Copies per-vertex buckets (given in vertex order) into the neighbor region
    pub(crate) fn write_buckets<'a, I>(&mut self, buckets: I)
    where
        I: IntoIterator<Item = &'a [u32]>,
    {
        let mut pos = self.base();
        let mut v = 0usize;
        for bucket in buckets {
            self.data[pos..pos + bucket.len()].copy_from_slice(bucket);
            pos += bucket.len();
            self.data[HEADER_LEN + v] = pos as u32;
            v += 1;
        }
        debug_assert_eq!(v, self.n);
        debug_assert_eq!(pos - self.base(), self.entries);
    }

    /// Returns the `k`-th extra region for writing
    pub(crate) fn extra_region_mut(&mut self, k: usize) -> &mut [u32] {
        let start = self.base() + self.entries + k * self.m;
        &mut self.data[start..start + self.m]
    }

    pub(crate) fn finish(self) -> CsrLayout {
        if self.n == 0 {
            return CsrLayout::default();
        }
        debug_assert!(
            self.data[HEADER_LEN..HEADER_LEN + self.n].is_sorted(),
            "offsets must be non-decreasing"
        );
        CsrLayout {
            data: Some(self.data.into_boxed_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_answers_empty() {
        let layout = CsrLayout::default();
        assert!(layout.is_sentinel());
        assert_eq!(layout.vertex_count(), 0);
        assert_eq!(layout.edge_count(), 0);
        assert!(layout.out_slice(0).is_empty());
        assert!(layout.out_slice(INVALID_NODE).is_empty());
        assert_eq!(layout.upper_bound(0), None);
        assert_eq!(layout.lower_bound(0), None);
        assert_eq!(layout.offsets().count(), 0);
        assert!(layout.neighbor_region().is_empty());
        assert!(layout.extra_region(0).is_empty());
        assert!(layout.raw().is_empty());
    }

    #[test]
    fn runs_fill_skipped_vertices() {
        // tails 0, 0, 2, 2, 2, 4 in a graph of 6 vertices
        let mut raw = RawLayout::new(6, 6, 6, 0);
        raw.write_sorted_runs([(0, 10), (0, 11), (2, 12), (2, 13), (2, 14), (4, 15)]);
        let layout = raw.finish();

        assert_eq!(layout.offsets().collect_vec(), vec![2, 2, 5, 5, 6, 6]);
        assert_eq!(layout.out_slice(0), &[10, 11]);
        assert!(layout.out_slice(1).is_empty());
        assert_eq!(layout.out_slice(2), &[12, 13, 14]);
        assert!(layout.out_slice(3).is_empty());
        assert_eq!(layout.out_slice(4), &[15]);
        assert!(layout.out_slice(5).is_empty());
        assert!(layout.out_slice(6).is_empty());

        for v in 0..6 {
            assert!(layout.lower_bound(v).unwrap() <= layout.upper_bound(v).unwrap());
        }
        assert_eq!(layout.raw()[0], 6);
        assert_eq!(layout.raw()[1], 6);
    }

    #[test]
    fn buffer_len_fits_u32() {
        assert_eq!(buffer_len(3, 3, 3, 2), Ok(14));
        assert_eq!(buffer_len(0, 0, 0, 0), Ok(2));
        assert_eq!(buffer_len(u32::MAX - 2, 0, 0, 2), Ok(u32::MAX as usize));
        assert!(buffer_len(u32::MAX - 1, 0, 0, 0).is_err());

        // undirected incidence form close to the edge id limit: 2m entries plus two regions
        let m = (1u32 << 31) - 1;
        assert_eq!(
            buffer_len(10, m, 2 * m as usize, 2),
            Err(GraphError::TooManyEdges {
                requested: m as u64
            })
        );
        assert!(RawLayout::try_new(10, m, 2 * m as usize, 2).is_err());

        // the same edges fit without extra regions only if the entries do
        let m = 1u32 << 30;
        assert!(buffer_len(0, m, 2 * m as usize, 0).is_ok());
        assert!(buffer_len(0, m, 2 * m as usize, 2).is_err());
    }

    #[test]
    fn trivial_layout() {
        let layout = RawLayout::new(3, 0, 0, 2).finish();
        assert_eq!(layout.offsets().collect_vec(), vec![0, 0, 0]);
        assert!(layout.extra_region(0).is_empty());
        assert!(layout.extra_region(1).is_empty());
        assert_eq!(layout.raw().len(), 5);
    }

    #[test]
    fn buckets_and_extra_regions() {
        let mut raw = RawLayout::new(3, 3, 3, 2);
        raw.write_buckets([&[0u32, 2][..], &[1][..], &[][..]]);
        raw.extra_region_mut(0).copy_from_slice(&[1, 2, 2]);
        raw.extra_region_mut(1).copy_from_slice(&[0, 1, 0]);
        let layout = raw.finish();

        assert_eq!(layout.offsets().collect_vec(), vec![2, 3, 3]);
        assert_eq!(layout.neighbor_region(), &[0, 2, 1]);
        assert_eq!(layout.extra_region(0), &[1, 2, 2]);
        assert_eq!(layout.extra_region(1), &[0, 1, 0]);
        assert_eq!(layout.out_len(0), 2);
    }
}
