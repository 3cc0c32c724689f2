//! Deterministic Park–Miller generator behind every mock figure on the dashboard.
//!
//! The stream is a pure function of (seed, number of prior draws), so the same
//! table renders identically wherever it is generated. Series that need to look
//! independent (one per month, one per competitor) take a fresh generator at
//! `seed + i` instead of sharing a stream.

use rand::{RngCore, SeedableRng};

const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: i64 = 16_807;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: i64,
}

impl SeededRng {
    pub fn new(seed: i64) -> Self {
        let mut state = seed % MODULUS;
        if state <= 0 {
            state += MODULUS - 1;
        }
        // Only reachable for seed == -(MODULUS - 1); a zero state would never advance.
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { state }
    }

    /// Advances the state. State stays below 2^31, so the product fits in i64.
    fn step(&mut self) -> i64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.step() - 1) as f64 / (MODULUS - 1) as f64
    }

    /// `floor(draw * span) + low`, the scaling every mock table uses.
    pub fn range_u64(&mut self, low: u64, span: u64) -> u64 {
        (self.next_f64() * span as f64).floor() as u64 + low
    }

    /// `draw * span + low` rounded to one decimal place.
    pub fn range_f64_1dp(&mut self, low: f64, span: f64) -> f64 {
        round_1dp(self.next_f64() * span + low)
    }
}

pub fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        let high = ((self.step() - 1) as u32) & 0xFFFF;
        let low = ((self.step() - 1) as u32) & 0xFFFF;
        (high << 16) | low
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }

    // The default implementation scrambles the seed; callers expect `seed_from_u64(777)`
    // to behave exactly like `SeededRng::new(777)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::new((state % MODULUS as u64) as i64)
    }
}
