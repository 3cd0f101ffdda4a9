use crate::KeyRef;

// The modulus of the secondary hash. Steps are drawn from `1..=7` before the
// odd adjustment.
const STEP_MODULUS: i64 = 7;

// Folds a key into the integer both hash functions work on.
//
// Text folds to the sum of `position * code point` over 1-based positions,
// wrapping on overflow so long strings stay deterministic.
#[inline]
pub fn normalize(key: KeyRef<'_>) -> i64 {
    match key {
        KeyRef::Int(n) => n,
        KeyRef::Text(text) => text
            .chars()
            .zip(1i64..)
            .fold(0i64, |acc, (c, p)| {
                acc.wrapping_add(p.wrapping_mul(i64::from(u32::from(c))))
            }),
    }
}

// The base position of a key.
#[inline]
pub fn h1(k: i64, len: usize) -> usize {
    // The remainder is in `0..len`, so it fits back into a `usize`.
    i128::from(k).rem_euclid(len as i128) as usize
}

// The step between successive probes of a key.
//
// The step is biased odd and kept below `len` when the odd adjustment would
// overshoot. This approximates coprimality with `len` but does not guarantee
// it: small or composite lengths can yield sequences that revisit positions.
#[inline]
pub fn h2(k: i64, len: usize) -> usize {
    let mut step = (STEP_MODULUS - k.rem_euclid(STEP_MODULUS)) as usize;
    if step == 0 {
        step = 1;
    }

    if step % 2 == 0 {
        step += 1;
        if step >= len {
            step = 1;
        }
    }

    step
}

// A double hashing probe sequence.
//
// Yields `(h1 + i * h2) mod len` for `i` in `0..len`.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    // The base position.
    pub base: usize,
    // The secondary hash, before reduction.
    pub step: usize,
    // The step reduced modulo the table length.
    stride: usize,
    // The length of the table.
    len: usize,
}

impl Probe {
    // Initialize the probe sequence for a key.
    #[inline]
    pub fn start(key: KeyRef<'_>, len: usize) -> Probe {
        debug_assert!(len > 0);

        let k = normalize(key);
        let step = h2(k, len);

        Probe {
            base: h1(k, len),
            step,
            stride: step % len,
            len,
        }
    }

    // Returns the position probed at index `i`.
    #[inline]
    pub fn at(&self, i: usize) -> usize {
        let offset = (i as u128 * self.stride as u128) % self.len as u128;
        (self.base + offset as usize) % self.len
    }

    // Iterate over the probe sequence, yielding `(index, position)` pairs.
    #[inline]
    pub fn iter(&self) -> ProbeIter {
        ProbeIter {
            i: 0,
            pos: self.base,
            probe: *self,
        }
    }
}

// An iterator over a probe sequence.
pub struct ProbeIter {
    i: usize,
    pos: usize,
    probe: Probe,
}

impl Iterator for ProbeIter {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<(usize, usize)> {
        if self.i == self.probe.len {
            return None;
        }

        let item = (self.i, self.pos);

        self.i += 1;
        // Both operands are below `len`, so this cannot overflow for any table
        // that fits in memory.
        self.pos += self.probe.stride;
        if self.pos >= self.probe.len {
            self.pos -= self.probe.len;
        }

        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.probe.len - self.i;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeIter {}
