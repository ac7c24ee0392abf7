//! The per-chunk block representation: a tagged union of three physical encodings over
//! the 65,536 low-parts sharing one key, with the conversion rules that keep a block in
//! its asymptotically best form and the variant-aware binary set-algebra kernels.

use crate::primitives::{
    difference_into, intersect_into, intersect_len, symmetric_difference_into, union_into, DenseWords,
};

/// Above this many elements a positive array converts to a dense bitmap.
pub(crate) const POSITIVE_MAX: usize = 4096;
/// At or above this cardinality a dense bitmap converts to an inverted array
/// (65,536 − 61,441 = 4,095 absentees or fewer).
pub(crate) const INVERTED_MIN_CARDINALITY: u32 = 61_441;

/// A chunk of the 2^16 values sharing one 16-bit key.
#[derive(Clone)]
pub(crate) enum Block {
    /// Ascending, deduplicated low-parts present in the block. Used while `len() <= 4096`.
    Positive(Vec<u16>),
    /// A fixed 1,024-word bitmap plus its cached population count. Used for the
    /// mid-density range that neither array form represents compactly.
    Dense { words: Box<DenseWords>, cardinality: u32 },
    /// Ascending, deduplicated low-parts *absent* from the block, plus the explicit
    /// cardinality. Used once the block is dense enough that complementing it is cheaper.
    Inverted { absent: Vec<u16>, cardinality: u32 },
}

impl Block {
    pub(crate) fn empty() -> Block {
        Block::Positive(Vec::new())
    }

    pub(crate) fn cardinality(&self) -> u32 {
        match self {
            Block::Positive(v) => v.len() as u32,
            Block::Dense { cardinality, .. } => *cardinality,
            Block::Inverted { cardinality, .. } => *cardinality,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// The on-disk variant discriminant of §6: 0 = positive, 1 = dense, 2 = inverted.
    pub(crate) fn variant_tag(&self) -> u8 {
        match self {
            Block::Positive(_) => 0,
            Block::Dense { .. } => 1,
            Block::Inverted { .. } => 2,
        }
    }

    /// The variant's display name, for diagnostics (`Bitmap::container_type` and
    /// friends).
    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            Block::Positive(_) => "Positive",
            Block::Dense { .. } => "Dense",
            Block::Inverted { .. } => "Inverted",
        }
    }

    /// Borrows the payload as raw bytes the way the serializer wants to write it:
    /// the array forms as their native `&[u16]` (the caller writes each element
    /// little-endian), the dense form as its 1024 words.
    pub(crate) fn positive_slice(&self) -> Option<&[u16]> {
        match self {
            Block::Positive(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn inverted_slice(&self) -> Option<&[u16]> {
        match self {
            Block::Inverted { absent, .. } => Some(absent),
            _ => None,
        }
    }

    pub(crate) fn dense_words(&self) -> Option<&crate::primitives::DenseWords> {
        match self {
            Block::Dense { words, .. } => Some(words),
            _ => None,
        }
    }

    /// Reconstructs a block from an already-minimal on-disk variant. Used only by the
    /// loader that materializes an owned `Bitmap` out of an `ImmutableBitmap`/`BlockView`
    /// (e.g. set algebra between two immutable overlays); trusts the caller to have
    /// validated the payload already (the deserializer's header checks run first).
    pub(crate) fn from_positive_vec(values: Vec<u16>) -> Block {
        Block::Positive(values).normalize()
    }

    pub(crate) fn from_dense_words(words: Box<crate::primitives::DenseWords>) -> Block {
        let cardinality = words.popcount() as u32;
        Block::Dense { words, cardinality }.normalize()
    }

    pub(crate) fn from_inverted_vec(absent: Vec<u16>, cardinality: u32) -> Block {
        Block::Inverted { absent, cardinality }.normalize()
    }

    /// Builds the minimal-storage block directly from a sorted, deduplicated source,
    /// without inserting element-by-element. `count_hint` lets dense windows of a
    /// stride-constructed range go straight to bit-setting.
    pub(crate) fn from_sorted_values<I: Iterator<Item = u16>>(values: I, count_hint: usize) -> Block {
        if count_hint <= POSITIVE_MAX {
            Block::Positive(values.collect())
        } else {
            let mut words = DenseWords::zeroed();
            let mut card = 0u32;
            for v in values {
                if words.set(v) {
                    card += 1;
                }
            }
            Block::Dense { words, cardinality: card }.normalize()
        }
    }

    pub(crate) fn contains(&self, lo: u16) -> bool {
        match self {
            Block::Positive(v) => v.binary_search(&lo).is_ok(),
            Block::Dense { words, .. } => words.get(lo),
            Block::Inverted { absent, .. } => absent.binary_search(&lo).is_err(),
        }
    }

    /// Inserts `lo`, returning whether it was newly added, and re-normalizes the variant.
    pub(crate) fn add(&mut self, lo: u16) -> bool {
        let inserted = match self {
            Block::Positive(v) => match v.binary_search(&lo) {
                Ok(_) => false,
                Err(idx) => {
                    v.insert(idx, lo);
                    true
                }
            },
            Block::Dense { words, cardinality } => {
                if words.set(lo) {
                    *cardinality += 1;
                    true
                } else {
                    false
                }
            }
            Block::Inverted { absent, cardinality } => match absent.binary_search(&lo) {
                Ok(idx) => {
                    absent.remove(idx);
                    *cardinality += 1;
                    true
                }
                Err(_) => false,
            },
        };
        if inserted {
            self.renormalize();
        }
        inserted
    }

    /// Removes `lo`, returning whether it was present, and re-normalizes the variant.
    pub(crate) fn discard(&mut self, lo: u16) -> bool {
        let removed = match self {
            Block::Positive(v) => match v.binary_search(&lo) {
                Ok(idx) => {
                    v.remove(idx);
                    true
                }
                Err(_) => false,
            },
            Block::Dense { words, cardinality } => {
                if words.clear_bit(lo) {
                    *cardinality -= 1;
                    true
                } else {
                    false
                }
            }
            Block::Inverted { absent, cardinality } => match absent.binary_search(&lo) {
                Ok(_) => false,
                Err(idx) => {
                    absent.insert(idx, lo);
                    *cardinality -= 1;
                    true
                }
            },
        };
        if removed {
            self.renormalize();
        }
        removed
    }

    fn renormalize(&mut self) {
        let placeholder = Block::Positive(Vec::new());
        let this = std::mem::replace(self, placeholder);
        *self = this.normalize();
    }

    /// Converts `self` into the minimal-storage variant for its current cardinality.
    /// Every binary-operator kernel below builds whichever shape is cheapest to compute
    /// and calls this once at the end, rather than hand-picking the output variant per arm.
    fn normalize(self) -> Block {
        match self {
            Block::Positive(v) if v.len() > POSITIVE_MAX => {
                let mut words = DenseWords::zeroed();
                let mut card = 0u32;
                for &lo in &v {
                    if words.set(lo) {
                        card += 1;
                    }
                }
                Block::Dense { words, cardinality: card }
            }
            Block::Inverted { absent, cardinality } if cardinality < INVERTED_MIN_CARDINALITY => {
                let mut words = DenseWords::zeroed();
                for w in words.0.iter_mut() {
                    *w = u64::MAX;
                }
                for &lo in &absent {
                    words.clear_bit(lo);
                }
                Block::Dense { words, cardinality }
            }
            Block::Dense { words, cardinality } if cardinality as usize <= POSITIVE_MAX => {
                Block::Positive(extract_set_bits(&words, cardinality as usize))
            }
            Block::Dense { words, cardinality } if cardinality >= INVERTED_MIN_CARDINALITY => {
                let absent = extract_clear_bits(&words, (65_536 - cardinality) as usize);
                Block::Inverted { absent, cardinality }
            }
            other => other,
        }
    }

    pub(crate) fn min(&self) -> u16 {
        match self {
            Block::Positive(v) => *v.first().expect("block is non-empty"),
            Block::Dense { words, .. } => {
                for (i, &w) in words.0.iter().enumerate() {
                    if w != 0 {
                        return (i * 64 + w.trailing_zeros() as usize) as u16;
                    }
                }
                unreachable!("block is non-empty")
            }
            Block::Inverted { absent, .. } => {
                let mut v = 0u32;
                for &a in absent {
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
            Block::Positive(v) => *v.last().expect("block is non-empty"),
            Block::Dense { words, .. } => {
                for (i, &w) in words.0.iter().enumerate().rev() {
                    if w != 0 {
                        return (i * 64 + 63 - w.leading_zeros() as usize) as u16;
                    }
                }
                unreachable!("block is non-empty")
            }
            Block::Inverted { absent, .. } => {
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

    /// Number of elements of this block that are `<= lo`.
    pub(crate) fn rank(&self, lo: u16) -> u32 {
        match self {
            Block::Positive(v) => v.partition_point(|&x| x <= lo) as u32,
            Block::Dense { words, .. } => {
                let (word_idx, bit) = DenseWords::position(lo);
                let mut count = 0u32;
                for w in &words.0[..word_idx] {
                    count += w.count_ones();
                }
                let mask = if bit == 63 { u64::MAX } else { (1u64 << (bit + 1)) - 1 };
                count += (words.0[word_idx] & mask).count_ones();
                count
            }
            Block::Inverted { absent, .. } => {
                let absent_le = absent.partition_point(|&v| v as u32 <= lo as u32);
                (lo as u32 + 1) - absent_le as u32
            }
        }
    }

    /// The 0-indexed `k`-th smallest element of the block.
    pub(crate) fn select(&self, k: u32) -> u16 {
        match self {
            Block::Positive(v) => v[k as usize],
            Block::Dense { words, .. } => {
                let mut remaining = k;
                for (i, &w) in words.0.iter().enumerate() {
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
            Block::Inverted { .. } => {
                // Skip-count through the absentee array: binary-search the smallest value
                // whose rank equals k + 1 (rank is monotone, climbing by exactly one at
                // every present value).
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

    pub(crate) fn iter(&self) -> BlockIter<'_> {
        match self {
            Block::Positive(v) => BlockIter::Positive(v.iter()),
            Block::Dense { words, .. } => BlockIter::Dense { words, word: 0, bits: words.0[0] },
            Block::Inverted { absent, .. } => BlockIter::Inverted { absent, next: 0, absent_idx: 0 },
        }
    }

    /// Descending counterpart to `iter`, used by `Bitmap`'s reverse iteration.
    pub(crate) fn iter_rev(&self) -> RevBlockIter<'_> {
        match self {
            Block::Positive(v) => RevBlockIter::Positive(v.iter().rev()),
            Block::Dense { words, .. } => {
                let word = DenseWords::WORDS - 1;
                RevBlockIter::Dense { words, word, bits: words.0[word] }
            }
            Block::Inverted { absent, .. } => RevBlockIter::Inverted {
                absent,
                next: u16::MAX as i32,
                absent_idx: absent.len(),
            },
        }
    }

    // ---- binary set algebra -------------------------------------------------------

    pub(crate) fn and(&self, other: &Block) -> Block {
        use Block::*;
        let raw = match (self, other) {
            (Positive(a), Positive(b)) => {
                let mut out = Vec::new();
                intersect_into(a, b, &mut out);
                Positive(out)
            }
            (Positive(a), Dense { words, .. }) | (Dense { words, .. }, Positive(a)) => {
                Positive(a.iter().copied().filter(|&v| words.get(v)).collect())
            }
            (Positive(a), Inverted { absent, .. }) | (Inverted { absent, .. }, Positive(a)) => {
                let mut out = Vec::new();
                difference_into(a, absent, &mut out);
                Positive(out)
            }
            (Dense { words: a, .. }, Dense { words: b, .. }) => dense_wordwise(a, b, |x, y| x & y),
            (Dense { words, .. }, Inverted { absent, .. }) | (Inverted { absent, .. }, Dense { words, .. }) => {
                let mut clone = words.clone();
                let mut card = clone.popcount() as u32;
                for &v in absent {
                    if clone.clear_bit(v) {
                        card -= 1;
                    }
                }
                Dense { words: clone, cardinality: card }
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                let mut out = Vec::new();
                union_into(a, b, &mut out);
                let cardinality = 65_536 - out.len() as u32;
                Inverted { absent: out, cardinality }
            }
        };
        raw.normalize()
    }

    pub(crate) fn and_len(&self, other: &Block) -> u32 {
        use Block::*;
        match (self, other) {
            (Positive(a), Positive(b)) => intersect_len(a, b) as u32,
            (Positive(a), Dense { words, .. }) | (Dense { words, .. }, Positive(a)) => {
                a.iter().filter(|&&v| words.get(v)).count() as u32
            }
            (Positive(a), Inverted { absent, .. }) | (Inverted { absent, .. }, Positive(a)) => {
                a.len() as u32 - intersect_len(a, absent) as u32
            }
            (Dense { words: a, .. }, Dense { words: b, .. }) => {
                a.0.iter().zip(b.0.iter()).map(|(x, y)| (x & y).count_ones()).sum()
            }
            (Dense { words, cardinality }, Inverted { absent, .. })
            | (Inverted { absent, .. }, Dense { words, cardinality }) => {
                let removed = absent.iter().filter(|&&v| words.get(v)).count() as u32;
                cardinality - removed
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                65_536 - union_into_len(a, b) as u32
            }
        }
    }

    pub(crate) fn or(&self, other: &Block) -> Block {
        use Block::*;
        let raw = match (self, other) {
            (Positive(a), Positive(b)) => {
                let mut out = Vec::new();
                union_into(a, b, &mut out);
                Positive(out)
            }
            (Positive(a), Dense { words, .. }) | (Dense { words, .. }, Positive(a)) => {
                let mut clone = words.clone();
                let mut card = clone.popcount() as u32;
                for &v in a {
                    if clone.set(v) {
                        card += 1;
                    }
                }
                Dense { words: clone, cardinality: card }
            }
            (Positive(a), Inverted { absent, .. }) | (Inverted { absent, .. }, Positive(a)) => {
                let mut out = Vec::new();
                difference_into(absent, a, &mut out);
                let cardinality = 65_536 - out.len() as u32;
                Inverted { absent: out, cardinality }
            }
            (Dense { words: a, .. }, Dense { words: b, .. }) => dense_wordwise(a, b, |x, y| x | y),
            (Dense { words, .. }, Inverted { absent, .. }) | (Inverted { absent, .. }, Dense { words, .. }) => {
                let out: Vec<u16> = absent.iter().copied().filter(|&v| !words.get(v)).collect();
                let cardinality = 65_536 - out.len() as u32;
                Inverted { absent: out, cardinality }
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                let mut out = Vec::new();
                intersect_into(a, b, &mut out);
                let cardinality = 65_536 - out.len() as u32;
                Inverted { absent: out, cardinality }
            }
        };
        raw.normalize()
    }

    pub(crate) fn or_len(&self, other: &Block) -> u32 {
        // |A ∪ B| = |A| + |B| - |A ∩ B|
        self.cardinality() + other.cardinality() - self.and_len(other)
    }

    pub(crate) fn xor(&self, other: &Block) -> Block {
        use Block::*;
        let raw = match (self, other) {
            (Positive(a), Positive(b)) => {
                let mut out = Vec::new();
                symmetric_difference_into(a, b, &mut out);
                Positive(out)
            }
            (Positive(a), Dense { words, .. }) | (Dense { words, .. }, Positive(a)) => {
                let mut toggled = words.clone();
                for &v in a {
                    let (w, b) = DenseWords::position(v);
                    toggled.0[w] ^= 1u64 << b;
                }
                let cardinality = toggled.popcount() as u32;
                Dense { words: toggled, cardinality }
            }
            (Positive(a), Inverted { absent, .. }) | (Inverted { absent, .. }, Positive(a)) => {
                let mut out = Vec::new();
                symmetric_difference_into(a, absent, &mut out);
                build_from_absent_candidate(out)
            }
            (Dense { words: a, .. }, Dense { words: b, .. }) => dense_wordwise(a, b, |x, y| x ^ y),
            (Dense { words, .. }, Inverted { absent, .. }) | (Inverted { absent, .. }, Dense { words, .. }) => {
                let babsent = absent_as_dense(absent);
                let mut result = DenseWords::zeroed();
                for i in 0..DenseWords::WORDS {
                    result.0[i] = !(words.0[i] ^ babsent.0[i]);
                }
                let cardinality = result.popcount() as u32;
                Dense { words: result, cardinality }
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                let mut out = Vec::new();
                symmetric_difference_into(a, b, &mut out);
                build_from_present_candidate(out)
            }
        };
        raw.normalize()
    }

    pub(crate) fn xor_len(&self, other: &Block) -> u32 {
        self.cardinality() + other.cardinality() - 2 * self.and_len(other)
    }

    /// `self \ other`.
    pub(crate) fn sub(&self, other: &Block) -> Block {
        use Block::*;
        let raw = match (self, other) {
            (Positive(a), Positive(b)) => {
                let mut out = Vec::new();
                difference_into(a, b, &mut out);
                Positive(out)
            }
            (Positive(a), Dense { words, .. }) => {
                Positive(a.iter().copied().filter(|&v| !words.get(v)).collect())
            }
            (Dense { words, .. }, Positive(a)) => {
                let mut clone = words.clone();
                let mut card = clone.popcount() as u32;
                for &v in a {
                    if clone.clear_bit(v) {
                        card -= 1;
                    }
                }
                Dense { words: clone, cardinality: card }
            }
            (Positive(a), Inverted { absent, .. }) => {
                let mut out = Vec::new();
                intersect_into(a, absent, &mut out);
                Positive(out)
            }
            (Inverted { absent: a, .. }, Positive(b)) => {
                let mut out = Vec::new();
                union_into(a, b, &mut out);
                build_from_absent_candidate(out)
            }
            (Dense { words: a, .. }, Dense { words: b, .. }) => dense_wordwise(a, b, |x, y| x & !y),
            (Dense { words, .. }, Inverted { absent, .. }) => {
                let babsent = absent_as_dense(absent);
                let mut result = DenseWords::zeroed();
                for i in 0..DenseWords::WORDS {
                    result.0[i] = words.0[i] & babsent.0[i];
                }
                let cardinality = result.popcount() as u32;
                Dense { words: result, cardinality }
            }
            (Inverted { absent, .. }, Dense { words, .. }) => {
                let babsent = absent_as_dense(absent);
                let mut result = DenseWords::zeroed();
                for i in 0..DenseWords::WORDS {
                    result.0[i] = babsent.0[i] | words.0[i];
                }
                for w in result.0.iter_mut() {
                    *w = !*w;
                }
                let cardinality = result.popcount() as u32;
                Dense { words: result, cardinality }
            }
            (Inverted { absent: a, .. }, Inverted { absent: b, .. }) => {
                let mut out = Vec::new();
                difference_into(b, a, &mut out);
                build_from_present_candidate(out)
            }
        };
        raw.normalize()
    }

    pub(crate) fn sub_len(&self, other: &Block) -> u32 {
        self.cardinality() - self.and_len(other)
    }

    // ---- in-place forms -----------------------------------------------------------
    //
    // These share the functional kernels above rather than threading a second set of
    // variant-pair arms through every operator; the merge-level caller (`Bitmap`) only
    // needs the end state to be correct; it is not on a path hot enough to justify
    // duplicating nine match arms four times over.

    pub(crate) fn and_inplace(&mut self, other: &Block) {
        *self = self.and(other);
    }

    pub(crate) fn or_inplace(&mut self, other: &Block) {
        *self = self.or(other);
    }

    pub(crate) fn xor_inplace(&mut self, other: &Block) {
        *self = self.xor(other);
    }

    pub(crate) fn sub_inplace(&mut self, other: &Block) {
        *self = self.sub(other);
    }
}

/// Elements of `arr` present in `dense` with no intermediate `Block` wrapper, shared by
/// the several array∩dense / array\dense arms above.
fn extract_set_bits(words: &DenseWords, hint: usize) -> Vec<u16> {
    let mut out = Vec::with_capacity(hint);
    for (i, &w) in words.0.iter().enumerate() {
        let mut bits = w;
        while bits != 0 {
            let b = bits.trailing_zeros();
            out.push((i * 64 + b as usize) as u16);
            bits &= bits - 1;
        }
    }
    out
}

fn extract_clear_bits(words: &DenseWords, hint: usize) -> Vec<u16> {
    let mut out = Vec::with_capacity(hint);
    for (i, &w) in words.0.iter().enumerate() {
        let mut bits = !w;
        while bits != 0 {
            let b = bits.trailing_zeros();
            out.push((i * 64 + b as usize) as u16);
            bits &= bits - 1;
        }
    }
    out
}

fn dense_wordwise(a: &DenseWords, b: &DenseWords, op: impl Fn(u64, u64) -> u64) -> Block {
    let mut result = DenseWords::zeroed();
    let mut card = 0u32;
    for i in 0..DenseWords::WORDS {
        result.0[i] = op(a.0[i], b.0[i]);
        card += result.0[i].count_ones();
    }
    Block::Dense { words: result, cardinality: card }
}

fn absent_as_dense(absent: &[u16]) -> Box<DenseWords> {
    let mut words = DenseWords::zeroed();
    for &v in absent {
        words.set(v);
    }
    words
}

/// Builds the minimal block from a freshly computed *absent* candidate list (bounded to
/// roughly 2 * 4096 elements by construction, so always cheap to classify).
fn build_from_absent_candidate(absent: Vec<u16>) -> Block {
    let cardinality = 65_536 - absent.len() as u32;
    Block::Inverted { absent, cardinality }
}

/// Builds the minimal block from a freshly computed *present* candidate list.
fn build_from_present_candidate(present: Vec<u16>) -> Block {
    Block::Positive(present)
}

pub(crate) fn union_into_len(a: &[u16], b: &[u16]) -> usize {
    let mut scratch = Vec::new();
    union_into(a, b, &mut scratch);
    scratch.len()
}

/// Ascending iterator over a block's low-parts.
pub(crate) enum BlockIter<'a> {
    Positive(std::slice::Iter<'a, u16>),
    Dense { words: &'a DenseWords, word: usize, bits: u64 },
    Inverted { absent: &'a [u16], next: u32, absent_idx: usize },
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match self {
            BlockIter::Positive(it) => it.next().copied(),
            BlockIter::Dense { words, word, bits } => loop {
                if *bits != 0 {
                    let b = bits.trailing_zeros();
                    *bits &= *bits - 1;
                    return Some((*word * 64 + b as usize) as u16);
                }
                *word += 1;
                if *word >= DenseWords::WORDS {
                    return None;
                }
                *bits = words.0[*word];
            },
            BlockIter::Inverted { absent, next, absent_idx } => {
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

/// Descending iterator over a block's low-parts, mirroring `BlockIter`.
pub(crate) enum RevBlockIter<'a> {
    Positive(std::iter::Rev<std::slice::Iter<'a, u16>>),
    Dense { words: &'a DenseWords, word: usize, bits: u64 },
    Inverted { absent: &'a [u16], next: i32, absent_idx: usize },
}

impl<'a> Iterator for RevBlockIter<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match self {
            RevBlockIter::Positive(it) => it.next().copied(),
            RevBlockIter::Dense { words, word, bits } => loop {
                if *bits != 0 {
                    let b = 63 - bits.leading_zeros();
                    *bits &= !(1u64 << b);
                    return Some((*word * 64 + b as usize) as u16);
                }
                if *word == 0 {
                    return None;
                }
                *word -= 1;
                *bits = words.0[*word];
            },
            RevBlockIter::Inverted { absent, next, absent_idx } => {
                if *next < 0 {
                    return None;
                }
                loop {
                    if *absent_idx > 0 && absent[*absent_idx - 1] as i32 == *next {
                        *absent_idx -= 1;
                        *next -= 1;
                        if *next < 0 {
                            return None;
                        }
                        continue;
                    }
                    let value = *next as u16;
                    *next -= 1;
                    return Some(value);
                }
            }
        }
    }
}
