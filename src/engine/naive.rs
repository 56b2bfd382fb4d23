//! Full-domain naive meet-in-the-middle baseline.
//!
//! Enumerates f over the whole domain into the compact dictionary, then
//! probes with g. Quadratic memory in the domain, so only usable on small
//! instances; serves as a verification oracle for the DP engine.

use crate::dp::CompactDict;
use crate::problem::{ClawProblem, CollisionProblem};

/// Slots per domain element; load factor stays under 0.8.
const SLOT_HEADROOM: f64 = 1.25;

/// All good claws of the problem, each pair (x0, x1) with f(x0) == g(x1).
pub fn naive_claw_search<P: ClawProblem>(pb: &P) -> Vec<(u64, u64)> {
    let n = 1u64 << pb.domain_bits();
    let mut dict = CompactDict::new(((n as f64) * SLOT_HEADROOM) as u64);
    for x in 0..n {
        dict.insert(pb.hash(pb.f(x)), x);
    }

    let mut result = Vec::new();
    let mut matches = Vec::new();
    for x in 0..n {
        let z = pb.g(x);
        dict.probe(pb.hash(z), &mut matches);
        for &y in &matches {
            if pb.f(y) != z {
                continue; // false positive from key truncation
            }
            if pb.is_good_pair(y, x) {
                result.push((y, x));
            }
        }
    }
    result
}

/// All good collisions, each unordered pair reported once with x0 < x1.
pub fn naive_collision_search<P: CollisionProblem>(pb: &P) -> Vec<(u64, u64)> {
    let n = 1u64 << pb.domain_bits();
    let mut dict = CompactDict::new(((n as f64) * SLOT_HEADROOM) as u64);
    for x in 0..n {
        dict.insert(pb.hash(pb.f(x)), x);
    }

    let mut result = Vec::new();
    let mut matches = Vec::new();
    for x in 0..n {
        let z = pb.f(x);
        dict.probe(pb.hash(z), &mut matches);
        for &y in &matches {
            if y >= x || pb.f(y) != z {
                continue;
            }
            if pb.is_good_pair(y, x) {
                result.push((y, x));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{width_mask, BlackBox};
    use crate::utils::prng::mix64;

    /// Claw with a planted pair: g equals f shifted by a secret offset, so
    /// f(x) == g(x ^ secret) for every x; the predicate pins one pair.
    struct PlantedClaw {
        secret: u64,
        golden_x: u64,
    }

    impl BlackBox for PlantedClaw {
        fn domain_bits(&self) -> u32 {
            10
        }
        fn range_bits(&self) -> u32 {
            10
        }
        fn hash(&self, y: u64) -> u64 {
            mix64(y)
        }
    }

    impl ClawProblem for PlantedClaw {
        fn f(&self, x: u64) -> u64 {
            mix64(x) & width_mask(10)
        }
        fn g(&self, x: u64) -> u64 {
            self.f(x ^ self.secret)
        }
        fn is_good_pair(&self, x0: u64, x1: u64) -> bool {
            x0 == self.golden_x && x1 == (self.golden_x ^ self.secret)
        }
    }

    #[test]
    fn test_naive_claw_finds_planted_pair() {
        let pb = PlantedClaw {
            secret: 0x2a5,
            golden_x: 0x17,
        };
        let result = naive_claw_search(&pb);
        assert!(result.contains(&(0x17, 0x17 ^ 0x2a5)));
        for &(x0, x1) in &result {
            assert_eq!(pb.f(x0), pb.g(x1));
            assert!(pb.is_good_pair(x0, x1));
        }
    }

    struct ParityFold;

    impl BlackBox for ParityFold {
        fn domain_bits(&self) -> u32 {
            8
        }
        fn range_bits(&self) -> u32 {
            8
        }
        fn hash(&self, y: u64) -> u64 {
            mix64(y)
        }
    }

    impl CollisionProblem for ParityFold {
        // two-to-one: drops the top input bit
        fn f(&self, x: u64) -> u64 {
            x & 0x7f
        }
        fn is_good_pair(&self, x0: u64, x1: u64) -> bool {
            x0 != x1
        }
    }

    #[test]
    fn test_naive_collision_enumerates_unordered_pairs() {
        let result = naive_collision_search(&ParityFold);
        assert_eq!(result.len(), 128);
        for &(x0, x1) in &result {
            assert!(x0 < x1);
            assert_eq!(x0, x1 & 0x7f);
        }
    }
}
