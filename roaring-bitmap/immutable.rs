//! The read-only overlay (C4): a `Bitmap`'s worth of blocks interpreted directly out of
//! a borrowed byte buffer, with no parsing step and no per-block allocation. Shares its
//! arithmetic with `Block` via `BlockView`, a borrowed-bytes mirror of the same three
//! variants that reads straight out of the mapped region.

use std::sync::Arc;

use crate::block::{union_into_len, Block};
use crate::primitives::intersect_len;
use crate::serialize::{self, Buffer};
use crate::{combine, split, Bitmap, Error, Result};

/// Bit test into a borrowed dense payload, the `BlockView` equivalent of
/// `DenseWords::get` over owned storage.
fn dense_get(words: &[u64], lo: u16) -> bool {
    let (word, bit) = ((lo as usize) >> 6, (lo as u32) & 63);
    (words[word] >> bit) & 1 != 0
}

/// A read-only view over the low-parts of one block, backed by borrowed bytes rather
/// than an owned `Vec`/`Box`. Implements the same read surface as `Block` (`contains`,
/// `rank`, `select`, `min`, `max`, `iter`) so `ImmutableBitmap`'s public methods are
/// thin wrappers, the same way `Bitmap`'s are thin wrappers over `Block`.
#[derive(Clone, Copy)]
pub(crate) enum BlockView<'a> {
    Positive { values: &'a [u16] },
    Dense { words: &'a [u64] },
    Inverted { absent: &'a [u16], cardinality: u32 },
}

impl<'a> BlockView<'a> {
    pub(crate) fn cardinality(&self) -> u32 {
        match self {
            BlockView::Positive { values } => values.len() as u32,
            BlockView::Dense { words } => words.iter().map(|w| w.count_ones()).sum(),
            BlockView::Inverted { cardinality, .. } => *cardinality,
        }
    }

    pub(crate) fn contains(&self, lo: u16) -> bool {
        match self {
            BlockView::Positive { values } => values.binary_search(&lo).is_ok(),
            BlockView::Dense { words } => {
                let (word, bit) = ((lo as usize) >> 6, (lo as u32) & 63);
                (words[word] >> bit) & 1 != 0
            }
            BlockView::Inverted { absent, .. } => absent.binary_search(&lo).is_err(),
        }
    }

    pub(crate) fn min(&self) -> u16 {
        match self {
            BlockView::Positive { values } => *values.first().expect("non-empty block"),
            BlockView::Dense { words } => {
                for (i, &w) in words.iter().enumerate() {
                    if w != 0 {
                        return (i * 64 + w.trailing_zeros() as usize) as u16;
                    }
                }
                unreachable!("non-empty block")
            }
            BlockView::Inverted { absent, .. } => {
                let mut v = 0u32;
                for &a in *absent {
                    if a as u32 != v {
                        return v as u16;
                    }
                    v += 1;
                }
                v as u16
            }
        }
    }

    pub(crate) fn max(&self) -> u16 {
        match self {
            BlockView::Positive { values } => *values.last().expect("non-empty block"),
            BlockView::Dense { words } => {
                for (i, &w) in words.iter().enumerate().rev() {
                    if w != 0 {
                        return (i * 64 + 63 - w.leading_zeros() as usize) as u16;
                    }
                }
                unreachable!("non-empty block")
            }
            BlockView::Inverted { absent, .. } => {
                let mut v = 65_535u32;
                for &a in absent.iter().rev() {
                    if a as u32 != v {
                        return v as u16;
                    }
                    v -= 1;
                }
                v as u16
            }
        }
    }

    pub(crate) fn rank(&self, lo: u16) -> u32 {
        match self {
            BlockView::Positive { values } => values.partition_point(|&x| x <= lo) as u32,
            BlockView::Dense { words } => {
                let word_idx = (lo as usize) >> 6;
                let bit = (lo as u32) & 63;
                let mut count = 0u32;
                for w in &words[..word_idx] {
                    count += w.count_ones();
                }
                let mask = if bit == 63 { u64::MAX } else { (1u64 << (bit + 1)) - 1 };
                count += (words[word_idx] & mask).count_ones();
                count
            }
            BlockView::Inverted { absent, .. } => {
                let absent_le = absent.partition_point(|&v| v as u32 <= lo as u32);
                (lo as u32 + 1) - absent_le as u32
            }
        }
    }

    pub(crate) fn select(&self, k: u32) -> u16 {
        match self {
            BlockView::Positive { values } => values[k as usize],
            BlockView::Dense { words } => {
                let mut remaining = k;
                for (i, &w) in words.iter().enumerate() {
                    let ones = w.count_ones();
                    if remaining < ones {
                        let mut bits = w;
                        for _ in 0..remaining {
                            bits &= bits - 1;
                        }
                        return (i * 64 + bits.trailing_zeros() as usize) as u16;
                    }
                    remaining -= ones;
                }
                unreachable!("k out of range for block cardinality")
            }
            BlockView::Inverted { .. } => {
                let (mut lo, mut hi) = (0u32, 65_535u32);
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    if self.rank(mid as u16) >= k + 1 {
                        hi = mid;
                    } else {
                        lo = mid + 1;
                    }
                }
                lo as u16
            }
        }
    }

    pub(crate) fn iter(&self) -> BlockViewIter<'a> {
        match *self {
            BlockView::Positive { values } => BlockViewIter::Positive(values.iter()),
            BlockView::Dense { words } => BlockViewIter::Dense { words, word: 0, bits: words[0] },
            BlockView::Inverted { absent, .. } => {
                BlockViewIter::Inverted { absent, next: 0, absent_idx: 0 }
            }
        }
    }

    /// `|self ∩ other|`, scanning the borrowed bytes of both operands directly —
    /// mirrors `Block::and_len`'s per-pair dispatch, but never calls `to_owned_block`
    /// on either side, so a dense/dense pair costs a word-wise scan, not an 8KB
    /// allocation-and-copy per call.
    pub(crate) fn and_len(&self, other: &BlockView) -> u32 {
        use BlockView::*;
        match (self, other) {
            (Positive { values: a }, Positive { values: b }) => intersect_len(a, b) as u32,
            (Positive { values: a }, Dense { words }) | (Dense { words }, Positive { values: a }) => {
                a.iter().filter(|&&v| dense_get(words, v)).count() as u32
            }
            (Positive { values: a }, Inverted { absent, .. })
            | (Inverted { absent, .. }, Positive { values: a }) => {
                a.len() as u32 - intersect_len(a, absent) as u32
            }
            (Dense { words: a }, Dense { words: b }) => {
                a.iter().zip(b.iter()).map(|(x, y)| (x & y).count_ones()).sum()
            }
            (Dense { words }, Inverted { absent, cardinality })
            | (Inverted { absent, cardinality }, Dense { words }) => {
                let removed = absent.iter().filter(|&&v| dense_get(words, v)).count() as u32;
                cardinality - removed
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                65_536 - union_into_len(a, b) as u32
            }
        }
    }

    /// Materializes this view into an owned `Block`, used where set algebra between
    /// two immutable overlays (or an overlay and an owned `Bitmap`) must produce a
    /// result that owns its storage.
    pub(crate) fn to_owned_block(&self) -> Block {
        match *self {
            BlockView::Positive { values } => Block::from_positive_vec(values.to_vec()),
            BlockView::Dense { words } => {
                let mut boxed = crate::primitives::DenseWords::zeroed();
                boxed.0.copy_from_slice(words);
                Block::from_dense_words(boxed)
            }
            BlockView::Inverted { absent, cardinality } => {
                Block::from_inverted_vec(absent.to_vec(), cardinality)
            }
        }
    }
}

pub(crate) enum BlockViewIter<'a> {
    Positive(std::slice::Iter<'a, u16>),
    Dense { words: &'a [u64], word: usize, bits: u64 },
    Inverted { absent: &'a [u16], next: u32, absent_idx: usize },
}

impl<'a> Iterator for BlockViewIter<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match self {
            BlockViewIter::Positive(it) => it.next().copied(),
            BlockViewIter::Dense { words, word, bits } => loop {
                if *bits != 0 {
                    let b = bits.trailing_zeros();
                    *bits &= *bits - 1;
                    return Some((*word * 64 + b as usize) as u16);
                }
                *word += 1;
                if *word >= words.len() {
                    return None;
                }
                *bits = words[*word];
            },
            BlockViewIter::Inverted { absent, next, absent_idx } => {
                if *next > u16::MAX as u32 {
                    return None;
                }
                loop {
                    if *absent_idx < absent.len() && absent[*absent_idx] as u32 == *next {
                        *absent_idx += 1;
                        *next += 1;
                        if *next > u16::MAX as u32 {
                            return None;
                        }
                        continue;
                    }
                    let value = *next as u16;
                    *next += 1;
                    return Some(value);
                }
            }
        }
    }
}

/// A read-only bitmap overlaying a borrowed, shared byte buffer. Every accessor reads
/// bytes in place; nothing here allocates for the payload, and dropping an
/// `ImmutableBitmap` never frees the buffer — the last `Arc<Buffer>` to drop does.
#[derive(Clone)]
pub struct ImmutableBitmap {
    buffer: Arc<Buffer>,
    /// Byte offset of this bitmap's serialized form within `buffer`.
    base: usize,
    keys: Vec<u16>,
    cardinalities: Vec<u32>,
    variants: Vec<u8>,
    payload_offsets: Vec<u32>,
    payload_base: usize,
}

impl ImmutableBitmap {
    pub(crate) fn new(
        buffer: Arc<Buffer>,
        base: usize,
        keys: Vec<u16>,
        cardinalities: Vec<u32>,
        variants: Vec<u8>,
        payload_offsets: Vec<u32>,
        payload_base: usize,
    ) -> ImmutableBitmap {
        ImmutableBitmap { buffer, base, keys, cardinalities, variants, payload_offsets, payload_base }
    }

    /// Loads a single serialized bitmap out of an owned byte buffer.
    pub fn load_bytes(bytes: Vec<u8>) -> Result<ImmutableBitmap> {
        serialize::load_immutable(Arc::new(Buffer::Owned(bytes)), 0)
    }

    /// Reads `path` fully into memory and loads it as a single serialized bitmap.
    pub fn load_file(path: &std::path::Path) -> Result<ImmutableBitmap> {
        let bytes = std::fs::read(path).map_err(|source| Error::ResourceExhausted { source })?;
        Self::load_bytes(bytes)
    }

    /// Memory-maps `path` and loads it as a single serialized bitmap without copying
    /// the file into process memory.
    ///
    /// # Safety
    /// Inherits `memmap2::Mmap::map`'s safety contract: the caller must ensure the
    /// backing file is not modified or truncated while the mapping is alive.
    pub unsafe fn load_mmap(path: &std::path::Path) -> Result<ImmutableBitmap> {
        let file = std::fs::File::open(path).map_err(|source| Error::ResourceExhausted { source })?;
        let mmap = memmap2::Mmap::map(&file).map_err(|source| Error::ResourceExhausted { source })?;
        log::debug!("opened {}-byte mapping at {}", mmap.len(), path.display());
        serialize::load_immutable(Arc::new(Buffer::Mapped(mmap)), 0)
    }

    fn block_view(&self, idx: usize) -> BlockView<'_> {
        let bytes = self.buffer.as_bytes();
        let offset = self.payload_base + self.payload_offsets[idx] as usize;
        let cardinality = self.cardinalities[idx];
        match self.variants[idx] {
            0 => {
                let len = cardinality as usize;
                let raw = &bytes[offset..offset + len * 2];
                BlockView::Positive { values: cast_u16_slice(raw) }
            }
            1 => {
                let raw = &bytes[offset..offset + crate::primitives::DenseWords::BYTES];
                BlockView::Dense { words: cast_u64_slice(raw) }
            }
            2 => {
                let len = (65_536 - cardinality) as usize;
                let raw = &bytes[offset..offset + len * 2];
                BlockView::Inverted { absent: cast_u16_slice(raw), cardinality }
            }
            other => unreachable!("corrupt variant tag {other} should have been rejected on load"),
        }
    }

    fn find_key(&self, key: u16) -> std::result::Result<usize, usize> {
        self.keys.binary_search(&key)
    }

    pub fn len(&self) -> u64 {
        self.cardinalities.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, value: u32) -> bool {
        let (key, low) = split(value);
        match self.find_key(key) {
            Ok(idx) => self.block_view(idx).contains(low),
            Err(_) => false,
        }
    }

    pub fn min(&self) -> Option<u32> {
        if self.keys.is_empty() {
            return None;
        }
        Some(combine(self.keys[0], self.block_view(0).min()))
    }

    pub fn max(&self) -> Option<u32> {
        if self.keys.is_empty() {
            return None;
        }
        let last = self.keys.len() - 1;
        Some(combine(self.keys[last], self.block_view(last).max()))
    }

    pub fn rank(&self, value: u32) -> u64 {
        let (key, low) = split(value);
        let mut count = 0u64;
        for (i, &k) in self.keys.iter().enumerate() {
            if k < key {
                count += self.cardinalities[i] as u64;
            } else if k == key {
                count += self.block_view(i).rank(low) as u64;
                break;
            } else {
                break;
            }
        }
        count
    }

    pub fn select(&self, k: u64) -> Result<u32> {
        let mut remaining = k;
        for (i, &key) in self.keys.iter().enumerate() {
            let card = self.cardinalities[i] as u64;
            if remaining < card {
                return Ok(combine(key, self.block_view(i).select(remaining as u32)));
            }
            remaining -= card;
        }
        Err(Error::ValueInvalid { reason: "select index past cardinality" })
    }

    pub fn get(&self, index: u64) -> Result<u32> {
        self.select(index)
    }

    /// Ascending iterator over this overlay's elements.
    pub fn iter(&self) -> ImmutableIter<'_> {
        ImmutableIter { bitmap: self, key_idx: 0, current: None }
    }

    /// Materializes this overlay into an owned `Bitmap`, cloning every block's payload.
    pub fn to_bitmap(&self) -> Bitmap {
        let blocks = (0..self.keys.len())
            .map(|i| (self.keys[i], self.block_view(i).to_owned_block()))
            .collect();
        Bitmap::from_blocks(blocks)
    }

    /// `self ∩ other`, materialized as an owned `Bitmap` since the result can't borrow
    /// from either read-only operand's memory.
    pub fn intersection(&self, other: &ImmutableBitmap) -> Bitmap {
        let mut blocks = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    let a = self.block_view(i).to_owned_block();
                    let b = other.block_view(j).to_owned_block();
                    let result = a.and(&b);
                    if !result.is_empty() {
                        blocks.push((self.keys[i], result));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        Bitmap::from_blocks(blocks)
    }

    /// `self ∪ other`, materialized as an owned `Bitmap`.
    pub fn union(&self, other: &ImmutableBitmap) -> Bitmap {
        self.merge(other, |a, b| a.or(b), Side::Keep, Side::Keep)
    }

    /// `self \ other`, materialized as an owned `Bitmap`.
    pub fn difference(&self, other: &ImmutableBitmap) -> Bitmap {
        self.merge(other, |a, b| a.sub(b), Side::Keep, Side::Drop)
    }

    /// `self △ other` (symmetric difference), materialized as an owned `Bitmap`.
    pub fn symmetric_difference(&self, other: &ImmutableBitmap) -> Bitmap {
        self.merge(other, |a, b| a.xor(b), Side::Keep, Side::Keep)
    }

    /// Shared merge walk for the two-`ImmutableBitmap` set algebra above (besides
    /// `intersection`, which never keeps a non-overlapping key and so is simpler
    /// written directly): steps the two ascending key streams in lockstep, dispatching
    /// the overlapping-key case to `op` (a `Block` binary kernel) and deciding whether
    /// each side's non-overlapping keys survive via `self_only`/`other_only` — exactly
    /// as `Bitmap`'s own merge-based set algebra walks `self.blocks`/`other.blocks`
    /// (§4.3), generalized here to read `BlockView`s instead of owned `Block`s.
    fn merge(
        &self,
        other: &ImmutableBitmap,
        op: impl Fn(&Block, &Block) -> Block,
        self_only: Side,
        other_only: Side,
    ) -> Bitmap {
        let mut blocks = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                std::cmp::Ordering::Less => {
                    if self_only == Side::Keep {
                        blocks.push((self.keys[i], self.block_view(i).to_owned_block()));
                    }
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    if other_only == Side::Keep {
                        blocks.push((other.keys[j], other.block_view(j).to_owned_block()));
                    }
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    let a = self.block_view(i).to_owned_block();
                    let b = other.block_view(j).to_owned_block();
                    let result = op(&a, &b);
                    if !result.is_empty() {
                        blocks.push((self.keys[i], result));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        while self_only == Side::Keep && i < self.keys.len() {
            blocks.push((self.keys[i], self.block_view(i).to_owned_block()));
            i += 1;
        }
        while other_only == Side::Keep && j < other.keys.len() {
            blocks.push((other.keys[j], other.block_view(j).to_owned_block()));
            j += 1;
        }
        Bitmap::from_blocks(blocks)
    }

    /// `|self ∩ other|` without materializing the intersection bitmap.
    pub fn intersection_len(&self, other: &ImmutableBitmap) -> u64 {
        let mut total = 0u64;
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    total += self.block_view(i).and_len(&other.block_view(j)) as u64;
                    i += 1;
                    j += 1;
                }
            }
        }
        total
    }

    /// `|self ∪ other|` without materializing the union bitmap.
    pub fn union_len(&self, other: &ImmutableBitmap) -> u64 {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// `self ∩ other`, materialized as an owned `Bitmap` against a plain `Bitmap`
    /// operand rather than another overlay — converts `self` to an owned `Bitmap` and
    /// delegates to `Bitmap::intersection`'s own merge, the same way `union` above
    /// reuses `to_bitmap` for its materialization step.
    pub fn intersection_bitmap(&self, other: &Bitmap) -> Bitmap {
        self.to_bitmap().intersection(other)
    }

    /// `self ∪ other` against a plain `Bitmap` operand.
    pub fn union_bitmap(&self, other: &Bitmap) -> Bitmap {
        self.to_bitmap().union(other)
    }

    /// `self \ other` against a plain `Bitmap` operand.
    pub fn difference_bitmap(&self, other: &Bitmap) -> Bitmap {
        self.to_bitmap().difference(other)
    }

    /// `self △ other` against a plain `Bitmap` operand.
    pub fn symmetric_difference_bitmap(&self, other: &Bitmap) -> Bitmap {
        self.to_bitmap().symmetric_difference(other)
    }
}

/// Whether a non-overlapping key from one side of a two-overlay merge survives into
/// the result (`union`/`symmetric_difference` keep both sides; `difference` drops
/// `other`'s exclusive keys since they can't contribute to `self \ other`).
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Keep,
    Drop,
}

fn cast_u16_slice(bytes: &[u8]) -> &[u16] {
    bytemuck::try_cast_slice(bytes).expect(
        "serializer aligns and sizes array payloads for a zero-copy u16 reinterpretation",
    )
}

fn cast_u64_slice(bytes: &[u8]) -> &[u64] {
    bytemuck::try_cast_slice(bytes).expect(
        "serializer 32-byte-aligns and exactly sizes dense payloads for a zero-copy u64 reinterpretation",
    )
}

impl PartialEq for ImmutableBitmap {
    fn eq(&self, other: &ImmutableBitmap) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl PartialEq<Bitmap> for ImmutableBitmap {
    fn eq(&self, other: &Bitmap) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl PartialEq<ImmutableBitmap> for Bitmap {
    fn eq(&self, other: &ImmutableBitmap) -> bool {
        other == self
    }
}

/// Ascending iterator over an `ImmutableBitmap`'s elements.
pub struct ImmutableIter<'a> {
    bitmap: &'a ImmutableBitmap,
    key_idx: usize,
    current: Option<BlockViewIter<'a>>,
}

impl<'a> Iterator for ImmutableIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(inner) = &mut self.current {
                if let Some(lo) = inner.next() {
                    return Some(combine(self.bitmap.keys[self.key_idx - 1], lo));
                }
                self.current = None;
            }
            if self.key_idx >= self.bitmap.keys.len() {
                return None;
            }
            self.current = Some(self.bitmap.block_view(self.key_idx).iter());
            self.key_idx += 1;
        }
    }
}
