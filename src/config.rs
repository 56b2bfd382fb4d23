//! Engine parameters and their CLI surface.
//!
//! clap::Args struct with memory sizing, distinguished-point difficulty and
//! distributed-run knobs, plus the finalization that derives slot counts,
//! difficulty and rank counts from the problem size.

use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;

use crate::dp::{DP_STEP_MULTIPLIER, SLOT_BYTES};
use crate::utils::memory::available_memory;

#[derive(Args, Debug, Clone, Serialize)]
pub struct Params {
    /// Dictionary memory budget, accepts K/M/G/T suffixes. Defaults to half
    /// of the available RAM.
    #[arg(long, value_parser = parse_size)]
    pub ram: Option<u64>,

    /// Trailing zero bits required of a distinguished point. Derived from
    /// the memory budget and problem size when absent.
    #[arg(long)]
    pub difficulty: Option<u32>,

    /// Chain step bound multiplier k: a chain is abandoned after k*2^d steps.
    #[arg(long, default_value_t = DP_STEP_MULTIPLIER)]
    pub step_multiplier: u64,

    /// Distinguished points per dictionary slot before the version rotates.
    #[arg(long, default_value_t = 10)]
    pub dp_per_slot: u64,

    /// Wall-time ceiling per version in seconds (distributed runs).
    #[arg(long, default_value_t = 60.0)]
    pub max_version_seconds: f64,

    /// Receiver ranks.
    #[arg(long, default_value_t = 1)]
    pub recv_per_node: usize,

    /// Sender ranks; defaults to the remaining hardware threads.
    #[arg(long)]
    pub n_send: Option<usize>,

    /// DP records per send buffer before a synchronous flush.
    #[arg(long, default_value_t = 4096)]
    pub buffer_capacity: usize,

    /// Minimum delay between sender CALLHOME reports, milliseconds.
    #[arg(long, default_value_t = 100)]
    pub ping_delay_ms: u64,

    /// Chain starts between CALLHOME checks.
    #[arg(long, default_value_t = 10_000)]
    pub callhome_interval: u64,

    /// Telemetry output.
    #[arg(long)]
    pub verbose: bool,

    /// Resolved DP difficulty, filled by `finalize`.
    #[arg(skip)]
    pub dp_bits: u32,

    /// Resolved total dictionary slot count, filled by `finalize`.
    #[arg(skip)]
    pub n_slots: u64,

    #[arg(skip)]
    pub finalized: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            ram: None,
            difficulty: None,
            step_multiplier: DP_STEP_MULTIPLIER,
            dp_per_slot: 10,
            max_version_seconds: 60.0,
            recv_per_node: 1,
            n_send: None,
            buffer_capacity: 4096,
            ping_delay_ms: 100,
            callhome_interval: 10_000,
            verbose: false,
            dp_bits: 0,
            n_slots: 0,
            finalized: false,
        }
    }
}

impl Params {
    /// Derive slot count, difficulty and rank counts for a problem with an
    /// n-bit domain and m-bit range. Idempotent.
    pub fn finalize(&mut self, domain_bits: u32, range_bits: u32) -> Result<()> {
        ensure!(
            (1..=64).contains(&domain_bits),
            "domain width {} out of range 1..=64",
            domain_bits
        );
        ensure!(
            domain_bits <= range_bits && range_bits <= 64,
            "range width {} must be in {}..=64",
            range_bits,
            domain_bits
        );
        ensure!(self.step_multiplier > 0, "step multiplier must be positive");
        ensure!(self.dp_per_slot > 0, "DP budget per slot must be positive");
        ensure!(self.buffer_capacity > 0, "buffer capacity must be positive");
        ensure!(self.recv_per_node > 0, "need at least one receiver rank");

        let nbytes = self.ram.unwrap_or_else(|| available_memory() / 2);
        // more than ~2 slots per domain element is wasted memory
        let domain_cap = 2u64.saturating_mul(1u64 << domain_bits.min(57));
        self.n_slots = (nbytes / SLOT_BYTES).max(64).min(domain_cap);

        let dp_bits = match self.difficulty {
            Some(d) => d,
            None => auto_difficulty(domain_bits, self.n_slots),
        };
        ensure!(dp_bits < 64, "difficulty {} out of range 0..64", dp_bits);
        self.dp_bits = dp_bits;

        if self.n_send.is_none() {
            let cpus = num_cpus::get();
            self.n_send = Some(cpus.saturating_sub(self.recv_per_node + 1).max(1));
        }

        self.finalized = true;
        if self.verbose {
            log::info!(
                "parameters: {} slots ({} bytes), difficulty {}, {} senders / {} receivers",
                self.n_slots,
                self.n_slots * SLOT_BYTES,
                self.dp_bits,
                self.sender_ranks(),
                self.receiver_ranks()
            );
        }
        Ok(())
    }

    /// Aggregate distinguished-point budget for one version.
    pub fn dp_budget(&self) -> u64 {
        self.dp_per_slot.saturating_mul(self.n_slots)
    }

    /// Chain step bound k*2^d.
    pub fn step_bound(&self) -> u64 {
        self.step_multiplier.saturating_mul(1u64 << self.dp_bits)
    }

    pub fn sender_ranks(&self) -> usize {
        self.n_send.unwrap_or(1).max(1)
    }

    pub fn receiver_ranks(&self) -> usize {
        self.recv_per_node.max(1)
    }
}

/// Difficulty from the vOW heuristic theta = 2.25 * sqrt(w / N): chains of
/// expected length 1/theta fill w slots in about w/theta evaluations.
fn auto_difficulty(domain_bits: u32, n_slots: u64) -> u32 {
    let n = 2f64.powi(domain_bits as i32);
    let theta = 2.25 * ((n_slots as f64) / n).sqrt();
    if theta >= 1.0 {
        0
    } else {
        ((-theta.log2()).round() as u32).min(48)
    }
}

/// Parse a byte size with an optional K/M/G/T suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let t = s.trim();
    let (digits, multiplier) = match t.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let mult = match c.to_ascii_lowercase() {
                'k' => 1u64 << 10,
                'm' => 1u64 << 20,
                'g' => 1u64 << 30,
                't' => 1u64 << 40,
                other => return Err(format!("unknown size suffix {:?}", other)),
            };
            (&t[..t.len() - 1], mult)
        }
        _ => (t, 1),
    };
    digits
        .trim()
        .parse::<u64>()
        .map(|v| v * multiplier)
        .map_err(|e| format!("bad size {:?}: {}", s, e))
}

/// Parse a seed given in hexadecimal, with or without a 0x prefix.
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let t = s.trim().trim_start_matches("0x");
    u64::from_str_radix(t, 16).map_err(|e| format!("bad hex seed {:?}: {}", s, e))
}
