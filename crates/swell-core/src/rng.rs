//! Deterministic 32-bit generator for spectrum synthesis and basin forcing.
//!
//! The exact output stream is part of the crate's contract: the same seed
//! must produce the same spectrum and the same impulse sequence on every
//! platform, so the mix uses fixed-width wrapping arithmetic throughout.

use rand::RngCore;

/// Mulberry32 generator. Small state, good enough statistics for visual
/// forcing, and exactly reproducible.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    /// Uniform value in [0, 1). Built from the top 24 bits of the stream:
    /// a 24-bit integer over 2^24 is exact in f32, so no rounding can push
    /// the result up to 1.0.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        Mulberry32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = Mulberry32::next_u32(self) as u64;
        let hi = Mulberry32::next_u32(self) as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = Mulberry32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand::SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Mulberry32::new(1337);
        let mut b = Mulberry32::new(1337);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Mulberry32::new(1);
        let mut b = Mulberry32::new(2);
        let matches = (0..100).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(matches < 5, "streams for seeds 1 and 2 are near-identical");
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(99);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "value {v} escaped [0, 1)");
        }
    }

    #[test]
    fn top_of_range_draws_stay_below_one() {
        // This seed's first raw u32 is ≥ 0xffff_ff80; a full-width divide
        // narrowed to f32 would round it up to exactly 1.0.
        let mut rng = Mulberry32::new(52_078_625);
        let first = rng.next_f32();
        assert!(first < 1.0, "first draw {first} escaped [0, 1)");
        for _ in 0..1000 {
            assert!(rng.next_f32() < 1.0);
        }
    }

    #[test]
    fn unit_floats_cover_the_interval() {
        let mut rng = Mulberry32::new(7);
        let vals: Vec<f32> = (0..1000).map(|_| rng.next_f32()).collect();
        assert!(vals.iter().any(|&v| v < 0.1));
        assert!(vals.iter().any(|&v| v > 0.9));
        let mean = vals.iter().sum::<f32>() / vals.len() as f32;
        assert!((mean - 0.5).abs() < 0.05, "mean {mean} far from uniform");
    }
}
