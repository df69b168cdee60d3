// ── Seeded pseudo-random sequence ──
//
// Placeholder content must look identical across renders within a day, so
// it never touches an ambient RNG. The seed string is hashed with 32-bit
// FNV-1a and the state advanced with xorshift32 (13, 17, 5). Both are
// fully specified so any reimplementation yields the same sequence.

use chrono::NaiveDate;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
/// Substitute state for a zero hash; xorshift never leaves zero.
const ZERO_STATE: u32 = 0x9e37_79b9;

/// Seed for an entity on a calendar day: `"YYYY-MM-DD:<entity id>"`.
pub fn day_seed(day: NaiveDate, entity_id: &str) -> String {
    format!("{}:{entity_id}", day.format("%Y-%m-%d"))
}

/// Deterministic sequence of floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        let hash = seed
            .bytes()
            .fold(FNV_OFFSET, |h, b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME));
        Self {
            state: if hash == 0 { ZERO_STATE } else { hash },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Index into a slice of length `len` (> 0).
    pub fn pick(&mut self, len: usize) -> usize {
        let n = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        usize::try_from(self.next_u32() % n).unwrap_or(0)
    }

    /// Integer in `[lo, hi]`.
    pub fn range(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo + 1;
        lo + u64::from(self.next_u32()) % span
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a: Vec<f64> = SeededRng::new("2026-10-19:s1").take(16).collect();
        let b: Vec<f64> = SeededRng::new("2026-10-19:s1").take(16).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn different_day_different_sequence() {
        let a: Vec<f64> = SeededRng::new("2026-10-19:s1").take(4).collect();
        let b: Vec<f64> = SeededRng::new("2026-10-20:s1").take(4).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn values_in_unit_interval() {
        assert!(SeededRng::new("x").take(1000).all(|v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn empty_seed_still_advances() {
        let mut rng = SeededRng::new("");
        let first = rng.next_f64();
        let second = rng.next_f64();
        assert_ne!(first, second);
    }

    #[test]
    fn range_and_pick_bounds() {
        let mut rng = SeededRng::new("bounds");
        for _ in 0..500 {
            let v = rng.range(10, 20);
            assert!((10..=20).contains(&v));
            assert!(rng.pick(3) < 3);
        }
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn day_seed_format() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(day_seed(day, "shop-1"), "2026-03-07:shop-1");
    }
}
