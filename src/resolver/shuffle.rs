//! Seeded, reproducible ordering.
//!
//! The generator is mulberry32: a 32-bit additive state mixed with two
//! xor-shift/multiply rounds. Every operation wraps at 32 bits, so the
//! sequence is identical on every platform and matches other mulberry32
//! implementations draw for draw.

/// Seed used when the central character's id is unavailable.
pub const FALLBACK_SEED: u32 = 1;

/// A mulberry32 pseudo-random generator.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Fisher–Yates permutation of `items` driven by [`Mulberry32`].
///
/// Same input and seed always give the same order.
pub fn shuffle<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut rng = Mulberry32::new(seed);
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        out.swap(i, j);
    }
    out
}

/// Seed for a character id: the id itself, or [`FALLBACK_SEED`].
pub fn seed_for(id: Option<u32>) -> u32 {
    id.filter(|id| *id != 0).unwrap_or(FALLBACK_SEED)
}
