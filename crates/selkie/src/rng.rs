//! Seeded xorshift64* generator used for random initial placement.
//!
//! Layout must stay reproducible, so we avoid `rand` and ship the same
//! deterministic generator for every platform.

#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    /// Zero is a fixed point of the xorshift step, so a zero seed is bumped to 1.
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        // Map to [0, 1) with 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform draw from `[lo, hi)`.
    pub(crate) fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64_unit() * (hi - lo)
    }
}
