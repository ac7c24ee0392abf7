//! The immutable, page-aligned on-disk/mmap format (C6): a self-describing layout that
//! lets a mapped byte buffer be interpreted directly as live blocks, with no parsing
//! pass between "bytes on disk" and "queryable bitmap". See §6 of the design notes for
//! the bit-exact layout this module reads and writes.
//!
//! Byte-level manual little-endian encode/decode is used rather than a generic serde
//! derive: the field order, padding, and offset table are load-bearing for the
//! zero-copy contract, so the explicit writer/reader *is* the layout.

use std::path::Path;
use std::sync::Arc;

use crate::block::Block;
use crate::immutable::ImmutableBitmap;
use crate::multi::MultiBitmap;
use crate::primitives::DenseWords;
use crate::{Bitmap, Error, Result};

/// The owned or memory-mapped byte region backing one or more `ImmutableBitmap`s.
/// Shared via `Arc` so every overlay reading out of the same mapping can outlive any
/// individual overlay without re-reading or re-mapping the file.
pub enum Buffer {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

impl Buffer {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Buffer::Owned(v) => v,
            Buffer::Mapped(m) => m,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

#[inline]
fn align_up(x: usize, to: usize) -> usize {
    (x + to - 1) / to * to
}

fn corrupt(reason: impl Into<String>) -> Error {
    Error::CorruptFormat { reason: reason.into() }
}

struct BlockLayout {
    rel_offset: u32,
    len: usize,
}

/// Computes each block's byte length and its offset relative to the start of the
/// payload region, honoring the array (2-byte) and dense (32-byte) alignment each
/// variant needs for the zero-copy read path. Returns `(header_len, payload_region_len,
/// per_block_layout)`.
fn plan_layout(bitmap: &Bitmap) -> (usize, usize, Vec<BlockLayout>) {
    let n = bitmap.blocks().len();
    let header_len = 4 + n * 2 + n * 4 + n * 4;
    let mut rel = 0usize;
    let mut layouts = Vec::with_capacity(n);
    for (_, block) in bitmap.blocks() {
        let align = if block.variant_tag() == 1 { 32 } else { 2 };
        rel = align_up(rel, align);
        let len = block_payload_len(block);
        layouts.push(BlockLayout { rel_offset: rel as u32, len });
        rel += len;
    }
    (header_len, rel, layouts)
}

fn block_payload_len(block: &Block) -> usize {
    match block.variant_tag() {
        0 => block.positive_slice().expect("positive variant").len() * 2,
        1 => DenseWords::BYTES,
        2 => block.inverted_slice().expect("inverted variant").len() * 2,
        other => unreachable!("unknown variant tag {other}"),
    }
}

/// Appends `bitmap`'s serialized form to `out`. The caller is responsible for having
/// `out.len()` already 32-byte aligned if zero-copy reads over the result (rather than
/// a fully-owned reload) are desired; `MultiBitmap` serialization arranges this for
/// every embedded bitmap.
pub(crate) fn write_bitmap_into(bitmap: &Bitmap, out: &mut Vec<u8>) {
    let (header_len, payload_len, layouts) = plan_layout(bitmap);
    let payload_start = align_up(header_len, 32);
    let start = out.len();
    out.reserve(payload_start + payload_len);

    let n = bitmap.blocks().len() as u32;
    out.extend_from_slice(&n.to_le_bytes());
    for (key, _) in bitmap.blocks() {
        out.extend_from_slice(&key.to_le_bytes());
    }
    for (_, block) in bitmap.blocks() {
        let cardinality_minus_one = (block.cardinality() - 1) as u16;
        out.extend_from_slice(&cardinality_minus_one.to_le_bytes());
        out.push(block.variant_tag());
        out.push(0); // reserved
    }
    for layout in &layouts {
        out.extend_from_slice(&layout.rel_offset.to_le_bytes());
    }
    while out.len() - start < payload_start {
        out.push(0);
    }
    for ((_, block), layout) in bitmap.blocks().iter().zip(layouts.iter()) {
        while out.len() - start < payload_start + layout.rel_offset as usize {
            out.push(0);
        }
        match block {
            Block::Positive(_) => {
                for &v in block.positive_slice().unwrap() {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            Block::Dense { .. } => {
                for &w in block.dense_words().unwrap().0.iter() {
                    out.extend_from_slice(&w.to_le_bytes());
                }
            }
            Block::Inverted { .. } => {
                for &v in block.inverted_slice().unwrap() {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
}

impl Bitmap {
    /// The exact byte length `serialize_into`/`to_bytes` will produce.
    pub fn serialized_size(&self) -> usize {
        let (header_len, payload_len, _) = plan_layout(self);
        align_up(header_len, 32) + payload_len
    }

    /// Serializes this bitmap into the layout of §6.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        write_bitmap_into(self, &mut out);
        out
    }

    /// Writes the serialized form to any `std::io::Write` sink.
    pub fn serialize_into<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

/// Parses one serialized bitmap's header starting at `base` within `buffer` and
/// returns an `ImmutableBitmap` overlay. Validates ordering, variant tags, and bounds
/// before constructing a single `BlockView`, so a structurally invalid buffer never
/// gets far enough to be read as a block.
pub(crate) fn load_immutable(buffer: Arc<Buffer>, base: usize) -> Result<ImmutableBitmap> {
    let bytes = buffer.as_bytes();
    if base + 4 > bytes.len() {
        return Err(corrupt("buffer too small for bitmap header"));
    }
    let num_blocks = u32::from_le_bytes(bytes[base..base + 4].try_into().unwrap()) as usize;

    let mut pos = base + 4;
    let keys_len = num_blocks * 2;
    if pos + keys_len > bytes.len() {
        return Err(corrupt("buffer too small for key table"));
    }
    let mut keys = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        let off = pos + i * 2;
        keys.push(u16::from_le_bytes(bytes[off..off + 2].try_into().unwrap()));
    }
    if keys.windows(2).any(|w| w[0] >= w[1]) {
        return Err(corrupt("block keys are not strictly ascending"));
    }
    pos += keys_len;

    let desc_len = num_blocks * 4;
    if pos + desc_len > bytes.len() {
        return Err(corrupt("buffer too small for block descriptors"));
    }
    let mut cardinalities = Vec::with_capacity(num_blocks);
    let mut variants = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        let off = pos + i * 4;
        let cardinality_minus_one = u16::from_le_bytes(bytes[off..off + 2].try_into().unwrap());
        let variant = bytes[off + 2];
        if variant > 2 {
            return Err(corrupt(format!("unknown block variant tag {variant}")));
        }
        cardinalities.push(cardinality_minus_one as u32 + 1);
        variants.push(variant);
    }
    pos += desc_len;

    let offsets_len = num_blocks * 4;
    if pos + offsets_len > bytes.len() {
        return Err(corrupt("buffer too small for payload offset table"));
    }
    let mut payload_offsets = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        let off = pos + i * 4;
        payload_offsets.push(u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap()));
    }
    pos += offsets_len;

    let header_len = pos - base;
    let payload_base = base + align_up(header_len, 32);

    for i in 0..num_blocks {
        let offset = payload_base + payload_offsets[i] as usize;
        let len = match variants[i] {
            0 => cardinalities[i] as usize * 2,
            1 => DenseWords::BYTES,
            2 => (65_536 - cardinalities[i]) as usize * 2,
            other => return Err(corrupt(format!("unknown block variant tag {other}"))),
        };
        if offset + len > bytes.len() {
            return Err(corrupt(format!("block {i} payload runs past end of buffer")));
        }
        let required_align = if variants[i] == 1 { 32 } else { 2 };
        if offset % required_align != 0 {
            return Err(corrupt(format!("block {i} payload is not {required_align}-byte aligned")));
        }
    }

    Ok(ImmutableBitmap::new(buffer, base, keys, cardinalities, variants, payload_offsets, payload_base))
}

/// Writes the multi-bitmap file prefix of §6: a `u64` count, then `count + 1` absolute
/// offsets, followed by each non-null bitmap's serialized form at its declared offset.
/// A `None` slot is encoded as two equal adjacent offsets; nothing is written for it.
pub fn serialize_multi(bitmaps: &[Option<Bitmap>]) -> Vec<u8> {
    let mut out = Vec::new();
    let num = bitmaps.len() as u64;
    out.extend_from_slice(&num.to_le_bytes());
    let table_pos = out.len();
    for _ in 0..=bitmaps.len() {
        out.extend_from_slice(&0u64.to_le_bytes());
    }

    let mut offsets = Vec::with_capacity(bitmaps.len() + 1);
    for slot in bitmaps {
        while out.len() % 32 != 0 {
            out.push(0);
        }
        offsets.push(out.len() as u64);
        if let Some(bitmap) = slot {
            write_bitmap_into(bitmap, &mut out);
        }
    }
    while out.len() % 32 != 0 {
        out.push(0);
    }
    offsets.push(out.len() as u64);

    for (i, off) in offsets.iter().enumerate() {
        let pos = table_pos + i * 8;
        out[pos..pos + 8].copy_from_slice(&off.to_le_bytes());
    }
    out
}

/// Parses the multi-bitmap file prefix and loads every non-null slot as an
/// `ImmutableBitmap` sharing `buffer`.
pub(crate) fn load_multi(buffer: Arc<Buffer>) -> Result<MultiBitmap> {
    let bytes = buffer.as_bytes();
    if bytes.len() < 8 {
        return Err(corrupt("buffer too small for multi-bitmap count"));
    }
    let num = u64::from_le_bytes(bytes[0..8].try_into().unwrap()) as usize;
    let table_len = (num + 1) * 8;
    if 8 + table_len > bytes.len() {
        return Err(corrupt("buffer too small for multi-bitmap offset table"));
    }
    let mut offsets = Vec::with_capacity(num + 1);
    for i in 0..=num {
        let off = 8 + i * 8;
        offsets.push(u64::from_le_bytes(bytes[off..off + 8].try_into().unwrap()));
    }

    let mut slots = Vec::with_capacity(num);
    for i in 0..num {
        if offsets[i] == offsets[i + 1] {
            slots.push(None);
            continue;
        }
        if offsets[i] > offsets[i + 1] || offsets[i + 1] as usize > bytes.len() {
            return Err(corrupt(format!("multi-bitmap slot {i} has an invalid offset range")));
        }
        let base = offsets[i] as usize;
        slots.push(Some(load_immutable(Arc::clone(&buffer), base)?));
    }
    Ok(MultiBitmap::new(slots))
}

impl MultiBitmap {
    /// Loads a multi-bitmap file out of an owned byte buffer.
    pub fn load_bytes(bytes: Vec<u8>) -> Result<MultiBitmap> {
        load_multi(Arc::new(Buffer::Owned(bytes)))
    }

    /// Reads `path` fully into memory and loads it as a multi-bitmap file.
    pub fn load_file(path: &Path) -> Result<MultiBitmap> {
        let bytes = std::fs::read(path).map_err(|source| Error::ResourceExhausted { source })?;
        Self::load_bytes(bytes)
    }

    /// Memory-maps `path` and loads it as a multi-bitmap file without copying the file
    /// into process memory.
    ///
    /// # Safety
    /// Inherits `memmap2::Mmap::map`'s safety contract: the caller must ensure the
    /// backing file is not modified or truncated while the mapping is alive.
    pub unsafe fn load_mmap(path: &Path) -> Result<MultiBitmap> {
        let file = std::fs::File::open(path).map_err(|source| Error::ResourceExhausted { source })?;
        let mmap = memmap2::Mmap::map(&file).map_err(|source| Error::ResourceExhausted { source })?;
        log::debug!("opened {}-byte multi-bitmap mapping at {}", mmap.len(), path.display());
        load_multi(Arc::new(Buffer::Mapped(mmap)))
    }
}
