//! Search counters, per-rank telemetry and the final solution record.

use std::fmt;

use serde::Serialize;

use crate::dp::Resolution;

/// Local counters updated by the engine loops. Every recoverable anomaly is
/// a counter update; only contract violations abort a run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchCounters {
    /// Chain starts drawn.
    pub n_chains: u64,
    /// Distinguished points produced.
    pub n_dp: u64,
    /// Chains that exceeded the step bound.
    pub n_abandoned: u64,
    /// Real merges found (golden or useless).
    pub n_collisions: u64,
    pub n_robin_hoods: u64,
    /// Claw candidates rejected because both inputs took the same branch.
    pub n_same_branch: u64,
    /// Dictionary candidates that never merged (key truncation).
    pub n_collision_failures: u64,
    /// Times the dictionary filled before the version budget was spent.
    pub n_saturations: u64,
    /// Versions consumed.
    pub n_versions: u64,
}

impl SearchCounters {
    pub fn record(&mut self, r: &Resolution) {
        match r {
            Resolution::Golden { .. } | Resolution::Useless => self.n_collisions += 1,
            Resolution::RobinHood => self.n_robin_hoods += 1,
            Resolution::SameBranch => self.n_same_branch += 1,
            Resolution::NoMerge => self.n_collision_failures += 1,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "{} chains -> {} DPs ({} abandoned), {} collisions, {} robin hoods, {} same-branch, {} false candidates, {} versions",
            self.n_chains,
            self.n_dp,
            self.n_abandoned,
            self.n_collisions,
            self.n_robin_hoods,
            self.n_same_branch,
            self.n_collision_failures,
            self.n_versions
        );
    }
}

/// Per-rank epoch telemetry exchanged at the end-of-epoch barrier.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Telemetry {
    pub n_eval: u64,
    pub n_dp: u64,
    pub bytes_sent: u64,
    /// Seconds spent blocked on sends (back-pressure).
    pub send_wait: f64,
    /// Seconds spent blocked on receives.
    pub recv_wait: f64,
}

/// Field-wise min/max/sum fold over rank telemetry, reported by the
/// controller at each epoch end.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TelemetryReduction {
    pub min: Telemetry,
    pub max: Telemetry,
    pub sum: Telemetry,
    pub n_ranks: u64,
}

impl Default for TelemetryReduction {
    fn default() -> Self {
        TelemetryReduction {
            min: Telemetry {
                n_eval: u64::MAX,
                n_dp: u64::MAX,
                bytes_sent: u64::MAX,
                send_wait: f64::INFINITY,
                recv_wait: f64::INFINITY,
            },
            max: Telemetry::default(),
            sum: Telemetry::default(),
            n_ranks: 0,
        }
    }
}

impl TelemetryReduction {
    pub fn add(&mut self, t: &Telemetry) {
        self.min.n_eval = self.min.n_eval.min(t.n_eval);
        self.min.n_dp = self.min.n_dp.min(t.n_dp);
        self.min.bytes_sent = self.min.bytes_sent.min(t.bytes_sent);
        self.min.send_wait = self.min.send_wait.min(t.send_wait);
        self.min.recv_wait = self.min.recv_wait.min(t.recv_wait);

        self.max.n_eval = self.max.n_eval.max(t.n_eval);
        self.max.n_dp = self.max.n_dp.max(t.n_dp);
        self.max.bytes_sent = self.max.bytes_sent.max(t.bytes_sent);
        self.max.send_wait = self.max.send_wait.max(t.send_wait);
        self.max.recv_wait = self.max.recv_wait.max(t.recv_wait);

        self.sum.n_eval += t.n_eval;
        self.sum.n_dp += t.n_dp;
        self.sum.bytes_sent += t.bytes_sent;
        self.sum.send_wait += t.send_wait;
        self.sum.recv_wait += t.recv_wait;

        self.n_ranks += 1;
    }

    pub fn log(&self, version: u64) {
        if self.n_ranks == 0 {
            return;
        }
        log::info!(
            "version {:#018x} telemetry: evals {}..{} (sum {}), {} bytes sent, send wait {:.3}s max, recv wait {:.3}s max",
            version,
            self.min.n_eval,
            self.max.n_eval,
            self.sum.n_eval,
            self.sum.bytes_sent,
            self.max.send_wait,
            self.max.recv_wait
        );
    }
}

/// Final result of a search, in user coordinates.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Solution {
    pub x0: u64,
    pub x1: u64,
    /// Version the golden collision was found under.
    pub version: u64,
    /// Versions consumed, including the successful one.
    pub n_versions: u64,
    /// Iteration-function evaluations (summed over ranks when distributed).
    pub n_eval: u64,
    pub seconds: f64,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:#x}, {:#x}) after {} evaluations, {} versions, {:.2}s",
            self.x0, self.x1, self.n_eval, self.n_versions, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_record() {
        let mut c = SearchCounters::default();
        c.record(&Resolution::Golden { x0: 1, x1: 2 });
        c.record(&Resolution::Useless);
        c.record(&Resolution::RobinHood);
        c.record(&Resolution::SameBranch);
        c.record(&Resolution::NoMerge);
        assert_eq!(c.n_collisions, 2);
        assert_eq!(c.n_robin_hoods, 1);
        assert_eq!(c.n_same_branch, 1);
        assert_eq!(c.n_collision_failures, 1);
    }

    #[test]
    fn test_reduction_folds_min_max_sum() {
        let mut red = TelemetryReduction::default();
        red.add(&Telemetry {
            n_eval: 10,
            n_dp: 1,
            bytes_sent: 100,
            send_wait: 0.5,
            recv_wait: 0.0,
        });
        red.add(&Telemetry {
            n_eval: 30,
            n_dp: 3,
            bytes_sent: 50,
            send_wait: 0.1,
            recv_wait: 2.0,
        });
        assert_eq!(red.min.n_eval, 10);
        assert_eq!(red.max.n_eval, 30);
        assert_eq!(red.sum.n_eval, 40);
        assert_eq!(red.min.bytes_sent, 50);
        assert_eq!(red.sum.bytes_sent, 150);
        assert_eq!(red.n_ranks, 2);
    }
}
