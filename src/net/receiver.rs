//! Dictionary-owning rank.
//!
//! Holds one slice of the distinguished-point dictionary. Drains incoming
//! DP batches, inserts each record, and on a candidate match replays both
//! chains locally: routing guarantees that equivalent DPs always land here,
//! so resolution never needs another rank. Golden pairs are reported to the
//! controller; draining continues so in-flight buffers empty before the
//! epoch barrier.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::config::Params;
use crate::dp::{resolve_candidate, CompactDict, ProbeOutcome, Resolution};
use crate::net::transport::{Control, PointMsg, Report, DP_RECORD_WORDS};
use crate::stats::{SearchCounters, Telemetry};
use crate::wrapper::IterFn;

pub struct ReceiverRank<F: IterFn> {
    pub rank: usize,
    pub n_send: usize,
    pub n_slots: u64,
    pub fun: F,
    pub control: Receiver<Control>,
    pub points: Receiver<PointMsg>,
    pub reports: Sender<Report>,
}

impl<F: IterFn> ReceiverRank<F> {
    pub fn run(mut self, params: &Params) {
        let mut dict = CompactDict::new(self.n_slots);
        loop {
            let version = match self.control.recv().expect("control channel closed") {
                Control::Stop => return,
                Control::Epoch { version, .. } => version,
            };

            dict.clear();
            self.fun.reset_n_eval();
            let mut counters = SearchCounters::default();
            let mut recv_wait = 0.0f64;
            let mut flushes = 0usize;

            while flushes < self.n_send {
                let t = Instant::now();
                let msg = self.points.recv().expect("point channel closed");
                recv_wait += t.elapsed().as_secs_f64();
                let words = match msg {
                    PointMsg::Flush => {
                        flushes += 1;
                        continue;
                    }
                    PointMsg::Batch(words) => words,
                };
                for record in words.chunks_exact(DP_RECORD_WORDS) {
                    let (start, end, len) = (record[0], record[1], record[2]);
                    counters.n_dp += 1;
                    match dict.insert_or_probe(self.fun.hash(end), start, len) {
                        ProbeOutcome::Inserted => {}
                        ProbeOutcome::Full => {
                            // saturation is not an error; the controller's DP
                            // budget will rotate the version shortly
                            counters.n_saturations += 1;
                        }
                        ProbeOutcome::Candidate {
                            start: other,
                            len: other_len,
                        } => {
                            let r = resolve_candidate(
                                &mut self.fun,
                                version,
                                (start, len),
                                (other, other_len),
                            );
                            counters.record(&r);
                            if let Resolution::Golden { x0, x1 } = r {
                                self.reports
                                    .send(Report::Golden { x0, x1 })
                                    .expect("report channel closed");
                            }
                        }
                    }
                }
            }

            if params.verbose {
                dict.log_stats();
            }
            debug!(
                "receiver {}: version {:#018x} done, {} DPs, {} collisions",
                self.rank, version, counters.n_dp, counters.n_collisions
            );
            self.reports
                .send(Report::ReceiverDone {
                    rank: self.rank,
                    stats: Telemetry {
                        n_eval: self.fun.n_eval(),
                        n_dp: counters.n_dp,
                        bytes_sent: 0,
                        send_wait: 0.0,
                        recv_wait,
                    },
                })
                .expect("report channel closed");
        }
    }
}
