//! Fixed-capacity open-addressed dictionary of distinguished points.
//!
//! Keys are truncated DP digests; values are (chain start, chain length).
//! No resizing, no deletion: saturation ends the epoch, and a logical clear
//! rewrites every slot with the empty sentinel. The full DP value is never
//! stored; chain replay reproves equality, so key truncation only costs an
//! occasional false candidate.

use serde::Serialize;

/// Reserved key marking an empty slot. Stored keys are reduced mod
/// `KEY_MODULUS` (the largest 32-bit prime) and can never equal it.
const EMPTY_KEY: u32 = 0xffff_ffff;
const KEY_MODULUS: u64 = 0xffff_fffb;

/// One slot: truncated digest, chain length, chain start. Lengths are
/// bounded by the step budget k*2^d, which fits u32 in any feasible
/// configuration.
#[derive(Clone, Copy)]
#[repr(C)]
struct Slot {
    key: u32,
    len: u32,
    start: u64,
}

/// Bytes per slot; used by the memory-budget sizing in `Params::finalize`.
pub const SLOT_BYTES: u64 = std::mem::size_of::<Slot>() as u64;

const EMPTY_SLOT: Slot = Slot {
    key: EMPTY_KEY,
    len: 0,
    start: 0,
};

/// Outcome of a combined insert/probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Stored in a fresh slot.
    Inserted,
    /// A record with the same truncated digest exists; its chain is
    /// returned and the new record is dropped, not overwritten.
    Candidate { start: u64, len: u64 },
    /// Every slot was probed without finding room; the epoch should end.
    Full,
}

#[derive(Debug, Clone, Serialize)]
pub struct DictStats {
    pub n_slots: u64,
    pub used: u64,
    pub utilization: f64,
}

pub struct CompactDict {
    slots: Vec<Slot>,
    used: u64,
}

impl CompactDict {
    pub fn new(n_slots: u64) -> Self {
        assert!(n_slots > 0, "dictionary needs at least one slot");
        CompactDict {
            slots: vec![EMPTY_SLOT; n_slots as usize],
            used: 0,
        }
    }

    pub fn n_slots(&self) -> u64 {
        self.slots.len() as u64
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    #[inline]
    fn home_slot(&self, digest: u64) -> usize {
        ((digest ^ (digest >> 32)) % self.n_slots()) as usize
    }

    #[inline]
    fn truncate(digest: u64) -> u32 {
        (digest % KEY_MODULUS) as u32
    }

    /// Insert a DP record, or report the stored chain colliding on the same
    /// truncated key. Linear probing, wrapping at the table end, with a
    /// probe budget of one full sweep.
    pub fn insert_or_probe(&mut self, digest: u64, start: u64, len: u64) -> ProbeOutcome {
        let key = Self::truncate(digest);
        let mut h = self.home_slot(digest);
        for _ in 0..self.slots.len() {
            let slot = self.slots[h];
            if slot.key == EMPTY_KEY {
                self.slots[h] = Slot {
                    key,
                    len: len as u32,
                    start,
                };
                self.used += 1;
                return ProbeOutcome::Inserted;
            }
            if slot.key == key {
                return ProbeOutcome::Candidate {
                    start: slot.start,
                    len: slot.len as u64,
                };
            }
            h += 1;
            if h == self.slots.len() {
                h = 0;
            }
        }
        ProbeOutcome::Full
    }

    /// Unconditional insert, used by the full-domain baseline. Returns false
    /// when the table is full.
    pub fn insert(&mut self, digest: u64, value: u64) -> bool {
        let key = Self::truncate(digest);
        let mut h = self.home_slot(digest);
        for _ in 0..self.slots.len() {
            if self.slots[h].key == EMPTY_KEY {
                self.slots[h] = Slot {
                    key,
                    len: 0,
                    start: value,
                };
                self.used += 1;
                return true;
            }
            h += 1;
            if h == self.slots.len() {
                h = 0;
            }
        }
        false
    }

    /// Collect every stored value whose truncated digest matches, walking
    /// the cluster run from the home slot to the first empty slot.
    pub fn probe(&self, digest: u64, out: &mut Vec<u64>) {
        out.clear();
        let key = Self::truncate(digest);
        let mut h = self.home_slot(digest);
        for _ in 0..self.slots.len() {
            let slot = self.slots[h];
            if slot.key == EMPTY_KEY {
                return;
            }
            if slot.key == key {
                out.push(slot.start);
            }
            h += 1;
            if h == self.slots.len() {
                h = 0;
            }
        }
    }

    /// Logical clear: every slot back to the empty sentinel, O(S).
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = EMPTY_SLOT;
        }
        self.used = 0;
    }

    pub fn stats(&self) -> DictStats {
        DictStats {
            n_slots: self.n_slots(),
            used: self.used,
            utilization: self.used as f64 / self.n_slots() as f64,
        }
    }

    pub fn log_stats(&self) {
        let stats = self.stats();
        log::debug!(
            "DP dictionary: {}/{} slots ({:.1}% utilization)",
            stats.used,
            stats.n_slots,
            stats.utilization * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that an inserted key is findable until the table fills.
    #[test]
    fn test_insert_then_candidate() {
        let mut dict = CompactDict::new(64);
        assert_eq!(dict.insert_or_probe(0x1234, 7, 100), ProbeOutcome::Inserted);
        match dict.insert_or_probe(0x1234, 8, 200) {
            ProbeOutcome::Candidate { start, len } => {
                assert_eq!(start, 7);
                assert_eq!(len, 100);
            }
            other => panic!("expected candidate, got {:?}", other),
        }
        // the candidate path must not overwrite
        match dict.insert_or_probe(0x1234, 9, 300) {
            ProbeOutcome::Candidate { start, .. } => assert_eq!(start, 7),
            other => panic!("expected candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_keys_coexist_in_cluster() {
        let mut dict = CompactDict::new(8);
        // digests colliding on the home slot but with different keys
        let a = 8u64; // home 0
        let b = 16u64; // home 0
        assert_eq!(dict.insert_or_probe(a, 1, 1), ProbeOutcome::Inserted);
        assert_eq!(dict.insert_or_probe(b, 2, 2), ProbeOutcome::Inserted);
        match dict.insert_or_probe(b, 3, 3) {
            ProbeOutcome::Candidate { start, .. } => assert_eq!(start, 2),
            other => panic!("expected candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_full_table_detected() {
        let mut dict = CompactDict::new(4);
        let mut n_inserted = 0;
        for digest in 0..16u64 {
            match dict.insert_or_probe(digest * 977, digest, 1) {
                ProbeOutcome::Inserted => n_inserted += 1,
                ProbeOutcome::Candidate { .. } => {}
                ProbeOutcome::Full => break,
            }
        }
        assert_eq!(n_inserted, 4);
        assert!(matches!(
            dict.insert_or_probe(0xdead_beef, 0, 1),
            ProbeOutcome::Full | ProbeOutcome::Candidate { .. }
        ));
    }

    /// Test that a logical clear forgets every key.
    #[test]
    fn test_clear_forgets_keys() {
        let mut dict = CompactDict::new(32);
        for digest in 0..8u64 {
            dict.insert_or_probe(digest * 1009, digest, digest);
        }
        dict.clear();
        assert_eq!(dict.used(), 0);
        for digest in 0..8u64 {
            assert_eq!(
                dict.insert_or_probe(digest * 1009, digest, digest),
                ProbeOutcome::Inserted
            );
        }
    }

    #[test]
    fn test_naive_probe_collects_all_matches() {
        let mut dict = CompactDict::new(16);
        assert!(dict.insert(0x42, 10));
        assert!(dict.insert(0x42, 11));
        assert!(dict.insert(0x43, 12));
        let mut out = Vec::new();
        dict.probe(0x42, &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![10, 11]);
        dict.probe(0x9999, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_slot_is_sixteen_bytes() {
        assert_eq!(SLOT_BYTES, 16);
    }
}
