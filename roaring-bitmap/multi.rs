//! The multi-bitmap container (C5): an ordered collection of `ImmutableBitmap`s sharing
//! one backing buffer, plus the batched operations that amortize the per-call overhead
//! of folding many bitmaps together — folded intersection, pairwise Jaccard distance,
//! and pairwise and/or cardinalities. A slot may be null (§6's distinguished null-slot
//! encoding), meaning "no bitmap at this ordinal"; see `serialize::load_multi` for how
//! that's read off the offset table.

use crate::immutable::ImmutableBitmap;
use crate::{Bitmap, Error, Result};

/// An ordered sequence of `ImmutableBitmap`s, any of which may be a null slot. Every
/// non-null entry borrows from the same `Arc<Buffer>` a `MultiBitmap` was loaded from
/// (see `serialize::load_multi`), so cloning a slot out never re-reads or re-maps the
/// backing file.
pub struct MultiBitmap {
    slots: Vec<Option<ImmutableBitmap>>,
}

impl MultiBitmap {
    pub(crate) fn new(slots: Vec<Option<ImmutableBitmap>>) -> MultiBitmap {
        MultiBitmap { slots }
    }

    /// The number of slots, including null ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn resolve_index(&self, index: i64) -> Result<usize> {
        let len = self.slots.len() as i64;
        let idx = if index < 0 { index + len } else { index };
        if idx < 0 || idx >= len {
            return Err(Error::ValueInvalid { reason: "multi-bitmap index out of bounds" });
        }
        Ok(idx as usize)
    }

    /// Returns the slot at `index`, or `Error::ValueInvalid` if out of bounds. `None`
    /// means a null slot, not an error.
    pub fn get(&self, index: usize) -> Result<Option<&ImmutableBitmap>> {
        self.slots
            .get(index)
            .map(|s| s.as_ref())
            .ok_or(Error::ValueInvalid { reason: "multi-bitmap index out of bounds" })
    }

    /// Like `get`, but a negative `index` counts from the end (`-1` is the last slot).
    pub fn get_signed(&self, index: i64) -> Result<Option<&ImmutableBitmap>> {
        let idx = self.resolve_index(index)?;
        Ok(self.slots[idx].as_ref())
    }

    /// Iterates every slot in order, including null ones.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<ImmutableBitmap>> {
        self.slots.iter()
    }

    /// Intersects the bitmaps at `indices`. Returns `None` if `indices` is empty, if any
    /// index points at a null slot, or if the result is empty. When `range` is
    /// `Some((start, stop))`, the result is additionally restricted to `[start, stop)`
    /// via `Bitmap::clamp`.
    pub fn intersection(&self, indices: &[usize], range: Option<(u32, u32)>) -> Option<Bitmap> {
        if indices.is_empty() {
            return None;
        }
        let mut bitmaps = Vec::with_capacity(indices.len());
        for &idx in indices {
            let slot = self.get(idx).ok()??;
            bitmaps.push(slot);
        }
        bitmaps.sort_by_key(|b| b.len());
        let mut result = bitmaps[0].to_bitmap();
        for b in &bitmaps[1..] {
            if result.is_empty() {
                return None;
            }
            result.intersect_with(&b.to_bitmap());
        }
        if let Some((start, stop)) = range {
            result = result.clamp(start, stop);
        }
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// For each `(a[i], b[i])` pair of ordinals, the Jaccard distance `1 - |A ∩ B| / |A
    /// ∪ B|` between the slots, computed via the `*_len` kernels without materializing
    /// either the intersection or the union. A pair touching a null slot yields `1.0`
    /// (maximally dissimilar, since a null slot contributes no elements).
    pub fn jaccard_dist(&self, a: &[usize], b: &[usize]) -> Vec<f64> {
        a.iter()
            .zip(b.iter())
            .map(|(&ia, &ib)| match (self.get(ia).ok().flatten(), self.get(ib).ok().flatten()) {
                (Some(x), Some(y)) => {
                    let union = x.union_len(y);
                    if union == 0 {
                        0.0
                    } else {
                        1.0 - (x.intersection_len(y) as f64 / union as f64)
                    }
                }
                _ => 1.0,
            })
            .collect()
    }

    /// For each `(a[i], b[i])` pair of ordinals, fills `out_and[i]` with `|A ∩ B|` and
    /// `out_or[i]` with `|A ∪ B|`. A pair touching a null slot contributes zero to both.
    /// `a`, `b`, `out_and`, and `out_or` must have equal length.
    pub fn andor_len_pairwise(
        &self,
        a: &[usize],
        b: &[usize],
        out_and: &mut [u64],
        out_or: &mut [u64],
    ) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), out_and.len());
        assert_eq!(a.len(), out_or.len());
        for (i, (&ia, &ib)) in a.iter().zip(b.iter()).enumerate() {
            match (self.get(ia).ok().flatten(), self.get(ib).ok().flatten()) {
                (Some(x), Some(y)) => {
                    out_and[i] = x.intersection_len(y);
                    out_or[i] = x.union_len(y);
                }
                _ => {
                    out_and[i] = 0;
                    out_or[i] = 0;
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a MultiBitmap {
    type Item = &'a Option<ImmutableBitmap>;
    type IntoIter = std::slice::Iter<'a, Option<ImmutableBitmap>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
