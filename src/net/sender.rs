//! Chain-producing rank.
//!
//! Awaits the version broadcast, enumerates chain starts disjoint from
//! every other sender, walks each to a distinguished point and routes the
//! (start, end, length) triple to the owning receiver. Periodically calls
//! home with its DP count and obeys the controller's assignment.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::config::Params;
use crate::dp::walk_to_dp;
use crate::net::transport::{
    route, Assignment, Control, PointMsg, Report, SendBuffers, DP_RECORD_WORDS,
};
use crate::stats::Telemetry;
use crate::wrapper::IterFn;

pub struct SenderRank<F: IterFn> {
    pub rank: usize,
    pub n_send: usize,
    pub fun: F,
    pub control: Receiver<Control>,
    pub points: Vec<Sender<PointMsg>>,
    pub reports: Sender<Report>,
    pub assignment: Receiver<Assignment>,
}

impl<F: IterFn> SenderRank<F> {
    pub fn run(mut self, params: &Params) {
        let ping_delay = Duration::from_millis(params.ping_delay_ms);
        loop {
            let (version, seed_base) = match self.control.recv().expect("control channel closed") {
                Control::Stop => return,
                Control::Epoch { version, seed_base } => (version, seed_base),
            };

            self.fun.reset_n_eval();
            let mut bufs = SendBuffers::new(
                self.points.clone(),
                params.buffer_capacity,
                DP_RECORD_WORDS,
            );
            let n_recv = self.points.len();
            let mut n_dp_epoch = 0u64;
            let mut n_dp_report = 0u64;
            let mut chains_since_report = 0u64;
            let mut last_ping = Instant::now();

            // the 3*rank offset with a 3*n_send stride keeps seed streams
            // disjoint across senders for any common base
            let mut j = seed_base.wrapping_add(3 * self.rank as u64);
            loop {
                if chains_since_report >= params.callhome_interval
                    && last_ping.elapsed() >= ping_delay
                {
                    self.reports
                        .send(Report::CallHome {
                            rank: self.rank,
                            n_dp: n_dp_report,
                        })
                        .expect("report channel closed");
                    n_dp_report = 0;
                    chains_since_report = 0;
                    last_ping = Instant::now();
                    match self.assignment.recv().expect("assignment channel closed") {
                        Assignment::KeepGoing => {}
                        Assignment::NewVersion => break,
                    }
                }

                let start = j & self.fun.walk_mask();
                j = j.wrapping_add(3 * self.n_send as u64);
                chains_since_report += 1;
                let Some((end, len)) = walk_to_dp(
                    &mut self.fun,
                    version,
                    start,
                    params.dp_bits,
                    params.step_bound(),
                ) else {
                    continue;
                };
                n_dp_epoch += 1;
                n_dp_report += 1;
                bufs.push(&[start, end, len], route(end, n_recv));
            }

            bufs.flush_all();
            debug!(
                "sender {}: version {:#018x} done, {} DPs, {} evals",
                self.rank,
                version,
                n_dp_epoch,
                self.fun.n_eval()
            );
            self.reports
                .send(Report::SenderDone {
                    rank: self.rank,
                    stats: Telemetry {
                        n_eval: self.fun.n_eval(),
                        n_dp: n_dp_epoch,
                        bytes_sent: bufs.bytes_sent,
                        send_wait: bufs.send_wait,
                        recv_wait: 0.0,
                    },
                })
                .expect("report channel closed");
        }
    }
}
