//! Version broadcaster, progress aggregation and termination.
//!
//! Owns the epoch state machine: broadcast (version, seed_base), answer
//! sender CALLHOMEs with KEEP_GOING until the aggregate DP count reaches
//! the per-version budget (or the wall-time ceiling, or a golden pair
//! arrives), then rotate every sender onto NEW_VERSION, collect the
//! end-of-epoch reports as a barrier, and either broadcast the next epoch
//! or stop the run.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::config::Params;
use crate::net::transport::{Assignment, Control, Report};
use crate::stats::TelemetryReduction;
use crate::utils::prng::Prng;

pub struct ControllerOutcome {
    pub x0: u64,
    pub x1: u64,
    pub version: u64,
    pub n_versions: u64,
    pub n_eval: u64,
}

pub struct Controller {
    pub control: Vec<Sender<Control>>,
    pub assignments: Vec<Sender<Assignment>>,
    pub reports: Receiver<Report>,
    pub n_send: usize,
    pub n_recv: usize,
}

impl Controller {
    pub fn run(&mut self, params: &Params, prng: &mut Prng) -> ControllerOutcome {
        let dp_budget = params.dp_budget();
        let mut version = prng.next_u64();
        let mut n_versions = 0u64;
        let mut total_eval = 0u64;
        let mut golden: Option<(u64, u64)> = None;

        loop {
            n_versions += 1;
            let seed_base = prng.next_u64();
            self.broadcast(Control::Epoch { version, seed_base });
            debug!(
                "controller: version {:#018x}, seed base {:#018x}",
                version, seed_base
            );

            let epoch_start = Instant::now();
            let mut total_dp = 0u64;
            let mut rotate = false;
            let mut senders_done = 0usize;
            let mut receivers_done = 0usize;
            let mut reduction = TelemetryReduction::default();

            while senders_done < self.n_send || receivers_done < self.n_recv {
                match self.reports.recv().expect("report channel closed") {
                    Report::CallHome { rank, n_dp } => {
                        total_dp += n_dp;
                        if golden.is_some()
                            || total_dp >= dp_budget
                            || epoch_start.elapsed().as_secs_f64() > params.max_version_seconds
                        {
                            rotate = true;
                        }
                        let reply = if rotate {
                            Assignment::NewVersion
                        } else {
                            Assignment::KeepGoing
                        };
                        self.assignments[rank]
                            .send(reply)
                            .expect("assignment channel closed");
                    }
                    Report::Golden { x0, x1 } => {
                        if golden.is_none() {
                            info!("controller: golden pair ({:#x}, {:#x}) reported", x0, x1);
                            golden = Some((x0, x1));
                        }
                        rotate = true;
                    }
                    Report::SenderDone { stats, .. } => {
                        senders_done += 1;
                        total_eval += stats.n_eval;
                        reduction.add(&stats);
                    }
                    Report::ReceiverDone { stats, .. } => {
                        receivers_done += 1;
                        total_eval += stats.n_eval;
                        reduction.add(&stats);
                    }
                }
            }

            if params.verbose {
                reduction.log(version);
            }
            if let Some((x0, x1)) = golden {
                self.broadcast(Control::Stop);
                return ControllerOutcome {
                    x0,
                    x1,
                    version,
                    n_versions,
                    n_eval: total_eval,
                };
            }
            version = version.wrapping_add(1);
        }
    }

    fn broadcast(&self, msg: Control) {
        for tx in &self.control {
            tx.send(msg).expect("control channel closed");
        }
    }
}
