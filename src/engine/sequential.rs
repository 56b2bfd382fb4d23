//! Sequential van Oorschot-Wiener engine.
//!
//! One rank, one dictionary: generate chains to distinguished points, store
//! them, resolve candidate collisions by local replay, and rotate the
//! version when the per-version DP budget is spent or the dictionary
//! saturates.

use std::time::Instant;

use log::{debug, info};

use crate::config::Params;
use crate::dp::{resolve_candidate, walk_to_dp, CompactDict, ProbeOutcome, Resolution};
use crate::stats::{SearchCounters, Solution};
use crate::utils::logging::log_epoch_summary;
use crate::utils::prng::Prng;
use crate::wrapper::IterFn;

pub struct SequentialEngine {
    dict: CompactDict,
    counters: SearchCounters,
    dp_bits: u32,
    step_bound: u64,
    dp_budget: u64,
    verbose: bool,
}

impl SequentialEngine {
    /// `params` must be finalized.
    pub fn new(params: &Params) -> Self {
        debug_assert!(params.finalized);
        SequentialEngine {
            dict: CompactDict::new(params.n_slots),
            counters: SearchCounters::default(),
            dp_bits: params.dp_bits,
            step_bound: params.step_bound(),
            dp_budget: params.dp_budget(),
            verbose: params.verbose,
        }
    }

    pub fn counters(&self) -> &SearchCounters {
        &self.counters
    }

    /// Run until the golden pair is found. The first version is drawn from
    /// the PRNG; later versions increment so the sequence is monotone.
    pub fn run<F: IterFn>(&mut self, fun: &mut F, prng: &mut Prng) -> Solution {
        let t0 = Instant::now();
        let mut version = prng.next_u64();
        loop {
            self.counters.n_versions += 1;
            let epoch_start = Instant::now();
            let eval_start = fun.n_eval();
            self.dict.clear();
            debug!(
                "version {:#018x}: budget {} DPs over {} slots",
                version,
                self.dp_budget,
                self.dict.n_slots()
            );

            let mut n_dp = 0u64;
            while n_dp < self.dp_budget {
                let start = prng.next_u64() & fun.walk_mask();
                self.counters.n_chains += 1;
                let Some((end, len)) =
                    walk_to_dp(fun, version, start, self.dp_bits, self.step_bound)
                else {
                    self.counters.n_abandoned += 1;
                    continue;
                };
                self.counters.n_dp += 1;
                n_dp += 1;

                match self.dict.insert_or_probe(fun.hash(end), start, len) {
                    ProbeOutcome::Inserted => {}
                    ProbeOutcome::Full => {
                        self.counters.n_saturations += 1;
                        break;
                    }
                    ProbeOutcome::Candidate {
                        start: other,
                        len: other_len,
                    } => {
                        let r = resolve_candidate(fun, version, (start, len), (other, other_len));
                        self.counters.record(&r);
                        if let Resolution::Golden { x0, x1 } = r {
                            info!(
                                "golden collision at version {:#018x} after {} evaluations",
                                version,
                                fun.n_eval()
                            );
                            if self.verbose {
                                self.counters.log_summary();
                            }
                            return Solution {
                                x0,
                                x1,
                                version,
                                n_versions: self.counters.n_versions,
                                n_eval: fun.n_eval(),
                                seconds: t0.elapsed().as_secs_f64(),
                            };
                        }
                    }
                }
            }
            log_epoch_summary(
                version,
                n_dp,
                fun.n_eval() - eval_start,
                epoch_start.elapsed().as_secs_f64(),
            );
            if self.verbose {
                self.dict.log_stats();
            }
            version = version.wrapping_add(1);
        }
    }
}
