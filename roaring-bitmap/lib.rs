// Roaring Bitmap Implementation

//! Internal Structure:
//!
//! A Roaring Bitmap stores 32-bit integers by splitting them into:
//! - High 16 bits: Block key (determines which block)
//! - Low 16 bits: Value stored within that block
//!
//! Each block picks whichever of three physical encodings (positive array, dense
//! bitmap, inverted array) is cheapest for its current cardinality; see `block.rs`.
//! This module is the two-level structure on top: an ascending `(key, Block)` index,
//! set algebra as a merge of the two key streams, and rank/select/iteration built on
//! the per-block primitives.

mod block;
pub mod error;
pub mod immutable;
pub mod multi;
mod primitives;
pub mod serialize;

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use block::Block;
pub use error::{Error, Result};
pub use immutable::ImmutableBitmap;
pub use multi::MultiBitmap;

/// Splits a u32 value into high 16 bits (key) and low 16 bits.
#[inline]
pub(crate) fn split(value: u32) -> (u16, u16) {
    ((value >> 16) as u16, value as u16)
}

/// Combines a key (high 16 bits) and a low 16-bit part into a u32.
#[inline]
pub(crate) fn combine(key: u16, low: u16) -> u32 {
    ((key as u32) << 16) | (low as u32)
}

/// A compressed, random-access set of 32-bit unsigned integers.
///
/// Values are partitioned by their high 16 bits into a `Block`, one per distinct key,
/// kept in a vector ordered ascending by key. Every mutating method re-establishes the
/// invariants described on the `blocks` field before returning.
#[derive(Clone)]
pub struct Bitmap {
    /// Ascending, key-deduplicated `(key, Block)` pairs.
    ///
    /// # Invariants
    /// - `blocks` is sorted ascending by key, with no duplicate keys.
    /// - Every block is non-empty (`Block::is_empty() == false`).
    /// - The bitmap's cardinality is the sum of the blocks' cardinalities.
    blocks: Vec<(u16, Block)>,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    // ---- construction --------------------------------------------------------------

    /// Creates an empty bitmap.
    ///
    /// ```
    /// use roaring_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::new();
    /// assert!(bm.is_empty());
    /// ```
    pub fn new() -> Self {
        Bitmap { blocks: Vec::new() }
    }

    /// Builds a bitmap from the half-open range `[start, end)`, taking every `step`-th
    /// value. Each 2^16 window is built directly into its minimal block variant rather
    /// than inserted element by element; dense windows bit-set every `step`-th bit in
    /// place instead of probing one value at a time.
    ///
    /// Returns `Error::ValueInvalid` if `step == 0`.
    pub fn from_range_with_step(start: u32, end: u32, step: u32) -> Result<Bitmap> {
        if step == 0 {
            return Err(Error::ValueInvalid { reason: "range step must be positive" });
        }
        let mut blocks: Vec<(u16, Block)> = Vec::new();
        if start >= end {
            return Ok(Bitmap { blocks });
        }
        let mut value = start as u64;
        let end = end as u64;
        let step = step as u64;
        while value < end {
            let key = (value >> 16) as u16;
            let window_end = ((key as u64) + 1) << 16;
            let window_limit = window_end.min(end);
            let count = ((window_limit - value) + step - 1) / step;
            let lows = (value..window_limit)
                .step_by(step as usize)
                .map(|v| v as u16);
            let block = Block::from_sorted_values(lows, count as usize);
            if !block.is_empty() {
                blocks.push((key, block));
            }
            value = window_end;
        }
        Ok(Bitmap { blocks })
    }

    /// Resolves any `RangeBounds<u32>` to a half-open `[start, end)` in `u64`, so an
    /// unbounded end can represent "through `u32::MAX` inclusive" (`2^32`) without
    /// overflowing `u32`.
    fn resolve_u32_range<R: std::ops::RangeBounds<u32>>(range: R) -> (u64, u64) {
        use std::ops::Bound::*;
        let start = match range.start_bound() {
            Included(&v) => v as u64,
            Excluded(&v) => v as u64 + 1,
            Unbounded => 0,
        };
        let end = match range.end_bound() {
            Included(&v) => v as u64 + 1,
            Excluded(&v) => v as u64,
            Unbounded => 1u64 << 32,
        };
        (start, end.min(1u64 << 32))
    }

    /// Builds the blocks covering every value in the half-open `[start, end)`, one
    /// minimal-variant block per 2^16 window, the same way `from_range_with_step` does
    /// for `step == 1`.
    fn consecutive_blocks(start: u64, end: u64) -> Vec<(u16, Block)> {
        let mut blocks = Vec::new();
        if start >= end {
            return blocks;
        }
        let mut value = start;
        while value < end {
            let key = (value >> 16) as u16;
            let window_end = ((key as u64) + 1) << 16;
            let window_limit = window_end.min(end);
            let count = (window_limit - value) as usize;
            let lows = (value..window_limit).map(|v| v as u16);
            let block = Block::from_sorted_values(lows, count);
            if !block.is_empty() {
                blocks.push((key, block));
            }
            value = window_end;
        }
        blocks
    }

    /// Inserts every value in `range` (any `RangeBounds<u32>`, so `a..b`, `a..=b`, and
    /// `a..` all work). Builds each 2^16 window's block directly rather than inserting
    /// one value at a time, the same way `from_range_with_step` does.
    pub fn extend_consecutive<R: std::ops::RangeBounds<u32>>(&mut self, range: R) {
        let (start, end) = Bitmap::resolve_u32_range(range);
        let added = Bitmap { blocks: Bitmap::consecutive_blocks(start, end) };
        self.union_with(&added);
    }

    /// Removes every value in `range` (any `RangeBounds<u32>`).
    pub fn remove_range<R: std::ops::RangeBounds<u32>>(&mut self, range: R) {
        let (start, end) = Bitmap::resolve_u32_range(range);
        let removed = Bitmap { blocks: Bitmap::consecutive_blocks(start, end) };
        self.difference_with(&removed);
    }

    /// Inserts every value yielded by `values`, in no particular order.
    pub fn extend_sparse<I: IntoIterator<Item = u32>>(&mut self, values: I) {
        self.extend(values);
    }

    /// Inserts every value yielded by `values`. An alias of `extend_sparse`: a block's
    /// variant is chosen from its cardinality after every mutation regardless of how
    /// the caller characterizes the input's density, so there is no separate dense
    /// insertion path to pick.
    pub fn extend_dense<I: IntoIterator<Item = u32>>(&mut self, values: I) {
        self.extend(values);
    }

    /// Removes every value yielded by `values`.
    pub fn remove_sparse<I: IntoIterator<Item = u32>>(&mut self, values: I) {
        for v in values {
            self.remove(v);
        }
    }

    // ---- membership & size -----------------------------------------------------------

    /// Returns `true` if `value` is a member of the set.
    pub fn contains(&self, value: u32) -> bool {
        let (key, low) = split(value);
        match self.blocks.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(idx) => self.blocks[idx].1.contains(low),
            Err(_) => false,
        }
    }

    /// Inserts `value`, returning `true` if it was newly added.
    pub fn insert(&mut self, value: u32) -> bool {
        let (key, low) = split(value);
        match self.blocks.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(idx) => self.blocks[idx].1.add(low),
            Err(idx) => {
                let mut block = Block::empty();
                block.add(low);
                self.blocks.insert(idx, (key, block));
                true
            }
        }
    }

    /// Removes `value`, returning `true` if it was present.
    pub fn remove(&mut self, value: u32) -> bool {
        let (key, low) = split(value);
        match self.blocks.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(idx) => {
                let removed = self.blocks[idx].1.discard(low);
                if removed && self.blocks[idx].1.is_empty() {
                    self.blocks.remove(idx);
                }
                removed
            }
            Err(_) => false,
        }
    }

    /// Removes and returns the smallest element, or `Error::ValueInvalid` if empty.
    pub fn pop_min(&mut self) -> Result<u32> {
        let v = self.min().ok_or(Error::ValueInvalid { reason: "pop on empty bitmap" })?;
        self.remove(v);
        Ok(v)
    }

    /// Removes and returns the largest element, or `Error::ValueInvalid` if empty.
    pub fn pop_max(&mut self) -> Result<u32> {
        let v = self.max().ok_or(Error::ValueInvalid { reason: "pop on empty bitmap" })?;
        self.remove(v);
        Ok(v)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// The number of elements in the set.
    pub fn len(&self) -> u64 {
        self.blocks.iter().map(|(_, b)| b.cardinality() as u64).sum()
    }

    /// `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The smallest element, or `None` if empty.
    pub fn min(&self) -> Option<u32> {
        self.blocks.first().map(|(k, b)| combine(*k, b.min()))
    }

    /// The largest element, or `None` if empty.
    pub fn max(&self) -> Option<u32> {
        self.blocks.last().map(|(k, b)| combine(*k, b.max()))
    }

    // ---- rank / select / indexing ---------------------------------------------------

    /// The number of elements `<= value`.
    pub fn rank(&self, value: u32) -> u64 {
        let (key, low) = split(value);
        let mut count = 0u64;
        for (k, b) in &self.blocks {
            if *k < key {
                count += b.cardinality() as u64;
            } else if *k == key {
                count += b.rank(low) as u64;
                break;
            } else {
                break;
            }
        }
        count
    }

    /// The `k`-th smallest element (0-indexed), or `Error::ValueInvalid` if `k` is past
    /// the cardinality.
    pub fn select(&self, k: u64) -> Result<u32> {
        let mut remaining = k;
        for (key, block) in &self.blocks {
            let card = block.cardinality() as u64;
            if remaining < card {
                return Ok(combine(*key, block.select(remaining as u32)));
            }
            remaining -= card;
        }
        Err(Error::ValueInvalid { reason: "select index past cardinality" })
    }

    /// Positional indexing: the `index`-th smallest element. An alias for `select`
    /// kept separate so call sites reading `get(i)` and `select(k)` stay distinct, as
    /// the host-binding surface in §6 publishes both names.
    pub fn get(&self, index: u64) -> Result<u32> {
        self.select(index)
    }

    /// Returns a new bitmap containing the elements at positions `start, start+step,
    /// start+2*step, ...` while the position stays below `stop`. `step` must be
    /// strictly positive.
    pub fn slice(&self, start: u64, stop: u64, step: i64) -> Result<Bitmap> {
        if step <= 0 {
            return Err(Error::ValueInvalid { reason: "slice step must be positive" });
        }
        let step = step as u64;
        let len = self.len();
        let stop = stop.min(len);
        let mut out = Bitmap::new();
        let mut pos = start;
        while pos < stop {
            if let Ok(v) = self.select(pos) {
                out.insert(v);
            }
            pos += step;
        }
        Ok(out)
    }

    // ---- iteration --------------------------------------------------------------------

    /// Ascending iterator over the set's elements.
    pub fn iter(&self) -> Iter<'_> {
        Iter { blocks: &self.blocks, block_idx: 0, current: None }
    }

    /// Descending iterator over the set's elements.
    pub fn iter_rev(&self) -> RevIter<'_> {
        RevIter {
            blocks: &self.blocks,
            block_idx: self.blocks.len(),
            current: None,
        }
    }

    // ---- relational queries -----------------------------------------------------------

    /// `true` if every element of `self` is also in `other`.
    pub fn is_subset(&self, other: &Bitmap) -> bool {
        for (key, block) in &self.blocks {
            match other.blocks.binary_search_by_key(key, |(k, _)| *k) {
                Ok(idx) => {
                    if block.and_len(&other.blocks[idx].1) != block.cardinality() {
                        return false;
                    }
                }
                Err(_) => return false,
            }
        }
        true
    }

    /// `true` if `self` and `other` share no elements.
    pub fn is_disjoint(&self, other: &Bitmap) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, _) = &self.blocks[i];
            let (kb, _) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    if self.blocks[i].1.and_len(&other.blocks[j].1) != 0 {
                        return false;
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        true
    }

    // ---- binary set algebra: functional forms -----------------------------------------

    /// `self ∪ other`, a new bitmap.
    pub fn union(&self, other: &Bitmap) -> Bitmap {
        let mut blocks = Vec::with_capacity(self.blocks.len() + other.blocks.len());
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, ba) = &self.blocks[i];
            let (kb, bb) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => {
                    blocks.push((*ka, ba.clone()));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    blocks.push((*kb, bb.clone()));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    blocks.push((*ka, ba.or(bb)));
                    i += 1;
                    j += 1;
                }
            }
        }
        blocks.extend(self.blocks[i..].iter().cloned());
        blocks.extend(other.blocks[j..].iter().cloned());
        Bitmap { blocks }
    }

    /// `self ∩ other`, a new bitmap.
    pub fn intersection(&self, other: &Bitmap) -> Bitmap {
        let mut blocks = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, ba) = &self.blocks[i];
            let (kb, bb) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    let result = ba.and(bb);
                    if !result.is_empty() {
                        blocks.push((*ka, result));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        Bitmap { blocks }
    }

    /// `self \ other`, a new bitmap.
    pub fn difference(&self, other: &Bitmap) -> Bitmap {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, ba) = &self.blocks[i];
            let (kb, bb) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => {
                    blocks.push((*ka, ba.clone()));
                    i += 1;
                }
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    let result = ba.sub(bb);
                    if !result.is_empty() {
                        blocks.push((*ka, result));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        blocks.extend(self.blocks[i..].iter().cloned());
        Bitmap { blocks }
    }

    /// `self △ other`, a new bitmap.
    pub fn symmetric_difference(&self, other: &Bitmap) -> Bitmap {
        let mut blocks = Vec::with_capacity(self.blocks.len() + other.blocks.len());
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, ba) = &self.blocks[i];
            let (kb, bb) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => {
                    blocks.push((*ka, ba.clone()));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    blocks.push((*kb, bb.clone()));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    let result = ba.xor(bb);
                    if !result.is_empty() {
                        blocks.push((*ka, result));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        blocks.extend(self.blocks[i..].iter().cloned());
        blocks.extend(other.blocks[j..].iter().cloned());
        Bitmap { blocks }
    }

    // ---- binary set algebra: in-place forms --------------------------------------------

    /// `self = self ∪ other`.
    pub fn union_with(&mut self, other: &Bitmap) {
        *self = self.union(other);
    }

    /// `self = self ∩ other`.
    pub fn intersect_with(&mut self, other: &Bitmap) {
        *self = self.intersection(other);
    }

    /// `self = self \ other`.
    pub fn difference_with(&mut self, other: &Bitmap) {
        *self = self.difference(other);
    }

    /// `self = self △ other`.
    pub fn symmetric_difference_with(&mut self, other: &Bitmap) {
        *self = self.symmetric_difference(other);
    }

    // ---- multi-operand folds ------------------------------------------------------------

    /// Intersects `self` with every bitmap in `others`, sorting the fold order by
    /// ascending cardinality so the narrowest operand prunes the rest earliest.
    pub fn intersection_update(&mut self, others: &[Bitmap]) {
        let mut order: Vec<&Bitmap> = others.iter().collect();
        order.sort_by_key(|b| b.len());
        for other in order {
            if self.is_empty() {
                return;
            }
            self.intersect_with(other);
        }
    }

    /// Unions `self` with every bitmap in `others`, left to right.
    pub fn union_update(&mut self, others: &[Bitmap]) {
        for other in others {
            self.union_with(other);
        }
    }

    // ---- cardinality-only set algebra ---------------------------------------------------

    /// `|self ∩ other|` without materializing the intersection.
    pub fn intersection_len(&self, other: &Bitmap) -> u64 {
        let mut total = 0u64;
        let (mut i, mut j) = (0, 0);
        while i < self.blocks.len() && j < other.blocks.len() {
            let (ka, ba) = &self.blocks[i];
            let (kb, bb) = &other.blocks[j];
            match ka.cmp(kb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    total += ba.and_len(bb) as u64;
                    i += 1;
                    j += 1;
                }
            }
        }
        total
    }

    /// `|self ∪ other|` without materializing the union.
    pub fn union_len(&self, other: &Bitmap) -> u64 {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// Jaccard distance `1 - |A ∩ B| / |A ∪ B|`; `0.0` when both sets are empty.
    pub fn jaccard_dist(&self, other: &Bitmap) -> f64 {
        let union = self.union_len(other);
        if union == 0 {
            return 0.0;
        }
        let inter = self.intersection_len(other);
        1.0 - (inter as f64 / union as f64)
    }

    // ---- range restriction ---------------------------------------------------------------

    /// Returns a new bitmap containing exactly the elements of `self` in `[a, b)`.
    pub fn clamp(&self, a: u32, b: u32) -> Bitmap {
        if a >= b {
            return Bitmap::new();
        }
        let (key_a, low_a) = split(a);
        // `b` may be exactly 2^32 represented as `u32::MAX + 1`, which doesn't fit in a
        // u32; callers instead pass `b == 0` meaning "no upper bound" is not a concern
        // here because `a < b` is checked above and b is itself a u32, so the largest
        // representable exclusive bound is u32::MAX + 1, unreachable as a u32 value.
        // Treat b's key/low the same way as a.
        let last_value_included = b - 1;
        let (key_b, low_b) = split(last_value_included);

        let mut blocks = Vec::new();
        for (key, block) in &self.blocks {
            if *key < key_a || *key > key_b {
                continue;
            }
            if *key == key_a && *key == key_b {
                let restricted = restrict_block(block, low_a, low_b);
                if !restricted.is_empty() {
                    blocks.push((*key, restricted));
                }
            } else if *key == key_a {
                let restricted = restrict_block(block, low_a, u16::MAX);
                if !restricted.is_empty() {
                    blocks.push((*key, restricted));
                }
            } else if *key == key_b {
                let restricted = restrict_block(block, 0, low_b);
                if !restricted.is_empty() {
                    blocks.push((*key, restricted));
                }
            } else {
                blocks.push((*key, block.clone()));
            }
        }
        Bitmap { blocks }
    }

    // ---- diagnostics ----------------------------------------------------------------------

    /// Verifies every Bitmap invariant from the data model: ascending, deduplicated
    /// keys; non-empty blocks; each block internally consistent. Compiled only for
    /// debug/test builds — a violation here is a bug in this crate, not a caller error.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn check_invariants(&self) {
        let mut prev_key: Option<u16> = None;
        for (key, block) in &self.blocks {
            if let Some(p) = prev_key {
                debug_assert!(*key > p, "bitmap keys must be strictly ascending");
            }
            prev_key = Some(*key);
            debug_assert!(!block.is_empty(), "bitmap must not retain empty blocks");
        }
    }

    /// Rough resident-memory estimate in bytes: the struct itself plus each block's
    /// heap payload (array length * 2 bytes, or the fixed 8KiB dense payload).
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .blocks
                .iter()
                .map(|(_, b)| {
                    std::mem::size_of::<(u16, Block)>()
                        + match b {
                            Block::Positive(v) => v.capacity() * 2,
                            Block::Dense { .. } => primitives::DenseWords::BYTES,
                            Block::Inverted { absent, .. } => absent.capacity() * 2,
                        }
                })
                .sum::<usize>()
    }

    /// The name of the variant chosen for the block at `key` ("Positive", "Dense", or
    /// "Inverted"), or `None` if no block is stored at that key.
    pub fn container_type(&self, key: u16) -> Option<&'static str> {
        self.blocks
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|idx| self.blocks[idx].1.variant_name())
    }

    /// `(key, variant name, cardinality)` for every block, ascending by key.
    pub fn container_stats(&self) -> Vec<(u16, &'static str, u64)> {
        self.blocks
            .iter()
            .map(|(k, b)| (*k, b.variant_name(), b.cardinality() as u64))
            .collect()
    }

    /// Per-block breakdown of `memory_usage`'s estimate.
    pub fn memory_usage_detailed(&self) -> MemoryUsage {
        let containers: Vec<BlockMemoryUsage> = self
            .blocks
            .iter()
            .map(|(key, b)| BlockMemoryUsage {
                key: *key,
                container_type: b.variant_name(),
                memory_bytes: match b {
                    Block::Positive(v) => v.capacity() * 2,
                    Block::Dense { .. } => primitives::DenseWords::BYTES,
                    Block::Inverted { absent, .. } => absent.capacity() * 2,
                },
            })
            .collect();
        MemoryUsage { total_bytes: self.memory_usage(), containers }
    }

    pub(crate) fn blocks(&self) -> &[(u16, Block)] {
        &self.blocks
    }

    pub(crate) fn from_blocks(blocks: Vec<(u16, Block)>) -> Bitmap {
        Bitmap { blocks }
    }
}

/// One block's contribution to `Bitmap::memory_usage_detailed`.
#[derive(Debug, Clone, Copy)]
pub struct BlockMemoryUsage {
    pub key: u16,
    pub container_type: &'static str,
    pub memory_bytes: usize,
}

/// Full breakdown returned by `Bitmap::memory_usage_detailed`.
#[derive(Debug, Clone)]
pub struct MemoryUsage {
    pub containers: Vec<BlockMemoryUsage>,
    pub total_bytes: usize,
}

/// Restricts `block`'s low-parts to `[lo, hi]` inclusive, producing a fresh block.
/// Shared by `clamp`'s three cases (bound in the same key, or at one end of a
/// multi-key span) so the endpoint logic lives in one place.
fn restrict_block(block: &Block, lo: u16, hi: u16) -> Block {
    if lo == 0 && hi == u16::MAX {
        return block.clone();
    }
    let mut out = Block::empty();
    for v in block.iter() {
        if v < lo {
            continue;
        }
        if v > hi {
            break;
        }
        out.add(v);
    }
    out
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Bitmap) -> bool {
        if self.blocks.len() != other.blocks.len() {
            return false;
        }
        self.blocks.iter().zip(other.blocks.iter()).all(|((ka, ba), (kb, bb))| {
            ka == kb && ba.cardinality() == bb.cardinality() && ba.iter().eq(bb.iter())
        })
    }
}

impl Eq for Bitmap {}

impl FromIterator<u32> for Bitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut bm = Bitmap::new();
        for v in iter {
            bm.insert(v);
        }
        bm
    }
}

impl Extend<u32> for Bitmap {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<'a> IntoIterator for &'a Bitmap {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Ascending iterator over a `Bitmap`'s elements.
pub struct Iter<'a> {
    blocks: &'a [(u16, Block)],
    block_idx: usize,
    current: Option<(u16, block::BlockIter<'a>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some((key, inner)) = &mut self.current {
                if let Some(lo) = inner.next() {
                    return Some(combine(*key, lo));
                }
                self.current = None;
            }
            if self.block_idx >= self.blocks.len() {
                return None;
            }
            let (key, block) = &self.blocks[self.block_idx];
            self.current = Some((*key, block.iter()));
            self.block_idx += 1;
        }
    }
}

/// Descending iterator over a `Bitmap`'s elements.
pub struct RevIter<'a> {
    blocks: &'a [(u16, Block)],
    block_idx: usize,
    current: Option<(u16, block::RevBlockIter<'a>)>,
}

impl<'a> Iterator for RevIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some((key, inner)) = &mut self.current {
                if let Some(lo) = inner.next() {
                    return Some(combine(*key, lo));
                }
                self.current = None;
            }
            if self.block_idx == 0 {
                return None;
            }
            self.block_idx -= 1;
            let (key, block) = &self.blocks[self.block_idx];
            self.current = Some((*key, block.iter_rev()));
        }
    }
}

// ---- operator sugar: owned and by-reference combinations, matching the host-binding
// ---- surface of §6 (`& | ^ -` and their augmented forms). --------------------------

impl BitOr<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitor(self, rhs: &Bitmap) -> Bitmap {
        self.union(rhs)
    }
}

impl BitAnd<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitand(self, rhs: &Bitmap) -> Bitmap {
        self.intersection(rhs)
    }
}

impl BitXor<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitxor(self, rhs: &Bitmap) -> Bitmap {
        self.symmetric_difference(rhs)
    }
}

impl Sub<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn sub(self, rhs: &Bitmap) -> Bitmap {
        self.difference(rhs)
    }
}

impl BitOrAssign<&Bitmap> for Bitmap {
    fn bitor_assign(&mut self, rhs: &Bitmap) {
        self.union_with(rhs);
    }
}

impl BitAndAssign<&Bitmap> for Bitmap {
    fn bitand_assign(&mut self, rhs: &Bitmap) {
        self.intersect_with(rhs);
    }
}

impl BitXorAssign<&Bitmap> for Bitmap {
    fn bitxor_assign(&mut self, rhs: &Bitmap) {
        self.symmetric_difference_with(rhs);
    }
}

impl SubAssign<&Bitmap> for Bitmap {
    fn sub_assign(&mut self, rhs: &Bitmap) {
        self.difference_with(rhs);
    }
}

impl BitOr<Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitor(self, rhs: Bitmap) -> Bitmap {
        &self | &rhs
    }
}

impl BitAnd<Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitand(self, rhs: Bitmap) -> Bitmap {
        &self & &rhs
    }
}

impl BitXor<Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitxor(self, rhs: Bitmap) -> Bitmap {
        &self ^ &rhs
    }
}

impl Sub<Bitmap> for Bitmap {
    type Output = Bitmap;
    fn sub(self, rhs: Bitmap) -> Bitmap {
        &self - &rhs
    }
}

impl BitOr<&Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitor(self, rhs: &Bitmap) -> Bitmap {
        &self | rhs
    }
}

impl BitAnd<&Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitand(self, rhs: &Bitmap) -> Bitmap {
        &self & rhs
    }
}

impl BitXor<&Bitmap> for Bitmap {
    type Output = Bitmap;
    fn bitxor(self, rhs: &Bitmap) -> Bitmap {
        &self ^ rhs
    }
}

impl Sub<&Bitmap> for Bitmap {
    type Output = Bitmap;
    fn sub(self, rhs: &Bitmap) -> Bitmap {
        &self - rhs
    }
}

impl BitOr<Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitor(self, rhs: Bitmap) -> Bitmap {
        self.union(&rhs)
    }
}

impl BitAnd<Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitand(self, rhs: Bitmap) -> Bitmap {
        self.intersection(&rhs)
    }
}

impl BitXor<Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitxor(self, rhs: Bitmap) -> Bitmap {
        self.symmetric_difference(&rhs)
    }
}

impl Sub<Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn sub(self, rhs: Bitmap) -> Bitmap {
        self.difference(&rhs)
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap").field("len", &self.len()).finish()
    }
}
