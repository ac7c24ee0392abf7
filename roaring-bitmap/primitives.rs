// Block primitives: population count, aligned dense storage, ordered scan helpers.
//
// Nothing in this module knows about the three block variants; it only provides the
// low-level building blocks that `block.rs` composes into variant-aware algorithms.

/// Galloping search switches to linear merge once the size ratio drops below this.
pub(crate) const GALLOP_RATIO: usize = 64;

/// 1024 64-bit words (65,536 bits), over-aligned to 32 bytes so a byte buffer of the
/// right length and alignment can be reinterpreted as `DenseWords` without copying.
#[repr(C, align(32))]
#[derive(Clone)]
pub(crate) struct DenseWords(pub [u64; 1024]);

impl DenseWords {
    pub(crate) const WORDS: usize = 1024;
    pub(crate) const BYTES: usize = Self::WORDS * 8;

    #[inline]
    pub(crate) fn zeroed() -> Box<Self> {
        Box::new(DenseWords([0u64; 1024]))
    }

    #[inline]
    pub(crate) fn position(lo: u16) -> (usize, u32) {
        ((lo as usize) >> 6, (lo as u32) & 63)
    }

    #[inline]
    pub(crate) fn get(&self, lo: u16) -> bool {
        let (word, bit) = Self::position(lo);
        (self.0[word] >> bit) & 1 != 0
    }

    #[inline]
    pub(crate) fn set(&mut self, lo: u16) -> bool {
        let (word, bit) = Self::position(lo);
        let mask = 1u64 << bit;
        let was_set = self.0[word] & mask != 0;
        self.0[word] |= mask;
        !was_set
    }

    #[inline]
    pub(crate) fn clear_bit(&mut self, lo: u16) -> bool {
        let (word, bit) = Self::position(lo);
        let mask = 1u64 << bit;
        let was_set = self.0[word] & mask != 0;
        self.0[word] &= !mask;
        was_set
    }

    pub(crate) fn popcount(&self) -> u64 {
        popcount(&self.0)
    }
}

/// Fast population count, expected to compile to `POPCNT` per word.
#[inline]
pub(crate) fn popcount(words: &[u64]) -> u64 {
    words.iter().map(|w| w.count_ones() as u64).sum()
}

/// Reference, bit-by-bit population count used only to cross-check `popcount` in tests.
#[cfg(test)]
pub(crate) fn popcount_reference(words: &[u64]) -> u64 {
    let mut total = 0u64;
    for &w in words {
        for bit in 0..64 {
            if (w >> bit) & 1 != 0 {
                total += 1;
            }
        }
    }
    total
}

/// Smallest index `i` such that `slice[i] >= target`, or `slice.len()` if none.
#[inline]
pub(crate) fn lower_bound(slice: &[u16], target: u16) -> usize {
    slice.partition_point(|&v| v < target)
}

/// Exponential probe followed by binary search for `target` within `slice[start..]`.
/// Returns `Ok(index)` if found, `Err(index)` of the insertion point otherwise.
pub(crate) fn gallop_search(slice: &[u16], start: usize, target: u16) -> Result<usize, usize> {
    if start >= slice.len() {
        return Err(start);
    }
    if slice[start] >= target {
        return if slice[start] == target {
            Ok(start)
        } else {
            Err(start)
        };
    }
    let mut prev = start;
    let mut step = 1usize;
    loop {
        let probe = start + step;
        if probe >= slice.len() || slice[probe] >= target {
            let hi = probe.min(slice.len());
            return match slice[prev..hi].binary_search(&target) {
                Ok(i) => Ok(prev + i),
                Err(i) => Err(prev + i),
            };
        }
        prev = probe;
        step *= 2;
    }
}

/// Merges two sorted, deduplicated `u16` slices into `out` (ascending, deduplicated).
pub(crate) fn union_into(a: &[u16], b: &[u16], out: &mut Vec<u16>) {
    out.clear();
    out.reserve(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
}

/// Intersects two sorted slices into `out`, choosing a linear merge or a galloping
/// probe of the larger slice depending on the size ratio between the two operands.
pub(crate) fn intersect_into(a: &[u16], b: &[u16], out: &mut Vec<u16>) {
    out.clear();
    if a.is_empty() || b.is_empty() {
        return;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if large.len() / small.len().max(1) < GALLOP_RATIO {
        // Comparable sizes: linear merge.
        let (mut i, mut j) = (0, 0);
        while i < small.len() && j < large.len() {
            match small[i].cmp(&large[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Equal => {
                    out.push(small[i]);
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Greater => j += 1,
            }
        }
    } else {
        // Lopsided sizes: gallop the smaller operand's elements into the larger.
        let mut cursor = 0usize;
        for &v in small {
            match gallop_search(large, cursor, v) {
                Ok(idx) => {
                    out.push(v);
                    cursor = idx + 1;
                }
                Err(idx) => cursor = idx,
            }
        }
    }
}

/// Computes `a \ b` (elements of `a` not present in `b`) into `out`.
pub(crate) fn difference_into(a: &[u16], b: &[u16], out: &mut Vec<u16>) {
    out.clear();
    if b.is_empty() {
        out.extend_from_slice(a);
        return;
    }
    if a.len() / b.len().max(1) >= GALLOP_RATIO {
        let mut cursor = 0usize;
        for &v in a {
            match gallop_search(b, cursor, v) {
                Ok(idx) => cursor = idx + 1,
                Err(idx) => {
                    out.push(v);
                    cursor = idx;
                }
            }
        }
        return;
    }
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    out.extend_from_slice(&a[i..]);
}

/// Computes the symmetric difference of two sorted slices into `out`.
pub(crate) fn symmetric_difference_into(a: &[u16], b: &[u16], out: &mut Vec<u16>) {
    out.clear();
    out.reserve(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
}

/// Counts the intersection of two sorted slices without materializing it.
pub(crate) fn intersect_len(a: &[u16], b: &[u16]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut count = 0usize;
    if large.len() / small.len().max(1) < GALLOP_RATIO {
        let (mut i, mut j) = (0, 0);
        while i < small.len() && j < large.len() {
            match small[i].cmp(&large[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Greater => j += 1,
            }
        }
    } else {
        let mut cursor = 0usize;
        for &v in small {
            match gallop_search(large, cursor, v) {
                Ok(idx) => {
                    count += 1;
                    cursor = idx + 1;
                }
                Err(idx) => cursor = idx,
            }
        }
    }
    count
}
