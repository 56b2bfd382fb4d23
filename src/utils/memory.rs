//! Available-memory probe used to size the distinguished-point dictionary.

use std::fs;

/// Assumed when the platform offers no probe.
const FALLBACK_BYTES: u64 = 1 << 30;

/// Best-effort estimate of the memory currently available to this process.
pub fn available_memory() -> u64 {
    fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|text| parse_meminfo(&text))
        .unwrap_or(FALLBACK_BYTES)
}

fn parse_meminfo(text: &str) -> Option<u64> {
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemAvailable:") {
            let kb: u64 = rest.trim().trim_end_matches("kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo() {
        let text = "MemTotal:       16318128 kB\nMemFree:         1198460 kB\nMemAvailable:    8002116 kB\n";
        assert_eq!(parse_meminfo(text), Some(8002116 * 1024));
    }

    #[test]
    fn test_parse_meminfo_missing_field() {
        assert_eq!(parse_meminfo("MemTotal: 1 kB\n"), None);
    }

    #[test]
    fn test_probe_never_zero() {
        assert!(available_memory() > 0);
    }
}
