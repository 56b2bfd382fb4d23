//! Structured logging utilities
//!
//! env_logger setup plus the handful of formatted reports the engines emit:
//! epoch summaries, dictionary utilization and golden-collision
//! announcements.

use log::info;

/// Initialise the global logger. `verbose` raises the default filter to
/// debug; `RUST_LOG` still overrides either way. Safe to call more than
/// once (later calls are no-ops).
pub fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp_millis()
    .try_init();
}

/// Format a count with a K/M/G/T suffix.
pub fn human_format(num: f64) -> String {
    if num >= 1e12 {
        format!("{:.2}T", num / 1e12)
    } else if num >= 1e9 {
        format!("{:.2}G", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        format!("{:.0}", num)
    }
}

/// Log one epoch summary line.
pub fn log_epoch_summary(version: u64, n_dp: u64, n_eval: u64, seconds: f64) {
    info!(
        "version {:#018x}: {} DPs, {} evals ({}/s) in {:.2}s",
        version,
        human_format(n_dp as f64),
        human_format(n_eval as f64),
        human_format(n_eval as f64 / seconds.max(1e-9)),
        seconds
    );
}

/// Announce the golden pair.
pub fn log_golden(x0: u64, x1: u64) {
    info!("GOLDEN COLLISION: f({:#x}) = g({:#x})", x0, x1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_format() {
        assert_eq!(human_format(500.0), "500");
        assert_eq!(human_format(1500.0), "1.50K");
        assert_eq!(human_format(2_500_000.0), "2.50M");
        assert_eq!(human_format(3_500_000_000.0), "3.50G");
    }
}
