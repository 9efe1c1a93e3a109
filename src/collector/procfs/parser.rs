//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

use crate::model::{CpuCounters, MemoryInfo, UptimeInfo};

/// Number of `/proc/meminfo` keys recognized by [`parse_meminfo`].
pub const EXPECTED_MEMINFO_KEYS: usize = 8;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses the aggregate CPU counters from `/proc/stat` content.
///
/// Only the first line is considered. Its leading identifier (normally `cpu`)
/// is skipped and the next eight tokens must be unsigned integers, in order:
/// user nice system idle iowait irq softirq steal. Anything after the eighth
/// value (guest, guest_nice) is ignored. A line with fewer than eight values
/// is an error; missing values are never filled with zeros.
pub fn parse_cpu_counters(content: &str) -> Result<CpuCounters, ParseError> {
    let line = content
        .lines()
        .next()
        .ok_or_else(|| ParseError::new("empty stat"))?;

    let mut parts = line.split_whitespace();
    parts
        .next()
        .ok_or_else(|| ParseError::new("missing cpu identifier"))?;

    let mut values = [0u64; 8];
    for (idx, slot) in values.iter_mut().enumerate() {
        let token = parts.next().ok_or_else(|| {
            ParseError::new(format!("expected 8 cpu fields, got {}", idx))
        })?;
        *slot = token.parse().map_err(|_| {
            ParseError::new(format!("invalid cpu field {}: {:?}", idx + 1, token))
        })?;
    }

    Ok(CpuCounters::from_array(values))
}

/// Returns the field of `info` backing an exact `/proc/meminfo` key, with its
/// position in the recognized-key table.
fn meminfo_slot<'a>(info: &'a mut MemoryInfo, key: &str) -> Option<(usize, &'a mut u64)> {
    let slot = match key {
        "MemTotal" => (0, &mut info.total),
        "MemFree" => (1, &mut info.free),
        "MemAvailable" => (2, &mut info.available),
        "Buffers" => (3, &mut info.buffers),
        "Cached" => (4, &mut info.cached),
        "Shmem" => (5, &mut info.shared),
        "SwapTotal" => (6, &mut info.swap_total),
        "SwapFree" => (7, &mut info.swap_free),
        _ => return None,
    };
    Some(slot)
}

/// Parses the leading decimal digits of `token`, ignoring whatever follows.
fn leading_u64(token: &str) -> Option<u64> {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

/// Parses `/proc/meminfo` lines.
///
/// Format is `Key:   value kB`, one per line. Keys are matched exactly, so
/// `SwapCached` never lands in `cached`. The value is the run of leading
/// digits of the first token after the colon, so a unit suffix is ignored
/// whether or not it is separated by a space. Unknown keys and lines without
/// a number are skipped.
///
/// Returns the parsed fields together with the number of distinct recognized
/// keys found (at most [`EXPECTED_MEMINFO_KEYS`]). Keys absent from the input
/// leave their field at 0. Derived fields are not touched.
pub fn parse_meminfo<'a, I>(lines: I) -> (MemoryInfo, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut info = MemoryInfo::default();
    let mut seen = [false; EXPECTED_MEMINFO_KEYS];

    for line in lines {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(value) = rest.split_whitespace().next().and_then(leading_u64) else {
            continue;
        };
        if let Some((idx, field)) = meminfo_slot(&mut info, key.trim()) {
            *field = value;
            seen[idx] = true;
        }
    }

    let found = seen.iter().filter(|&&s| s).count();
    (info, found)
}

/// Parses `/proc/uptime` content.
///
/// Format: `uptime_seconds idle_seconds`
pub fn parse_uptime(content: &str) -> Result<UptimeInfo, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(ParseError::new(format!(
            "expected 2 fields in uptime, got {}",
            parts.len()
        )));
    }

    let uptime: f64 = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid uptime"))?;
    let idle_time: f64 = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid idle time"))?;

    if !uptime.is_finite() || !idle_time.is_finite() || uptime < 0.0 || idle_time < 0.0 {
        return Err(ParseError::new("uptime values out of range"));
    }

    Ok(UptimeInfo { uptime, idle_time })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_counters() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 50 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
ctxt 500000
";
        let cpu = parse_cpu_counters(content).unwrap();

        assert_eq!(cpu.user, 10000);
        assert_eq!(cpu.nice, 500);
        assert_eq!(cpu.system, 3000);
        assert_eq!(cpu.idle, 80000);
        assert_eq!(cpu.iowait, 1000);
        assert_eq!(cpu.irq, 200);
        assert_eq!(cpu.softirq, 100);
        assert_eq!(cpu.steal, 50);
    }

    #[test]
    fn test_parse_cpu_counters_exactly_eight() {
        let cpu = parse_cpu_counters("cpu 1 2 3 4 5 6 7 8").unwrap();
        assert_eq!(cpu.as_array(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_parse_cpu_counters_partial_line_fails() {
        // Old kernels with only 5 columns must not be zero-padded.
        let err = parse_cpu_counters("cpu  10000 500 3000 80000 1000\n").unwrap_err();
        assert_eq!(err.message, "expected 8 cpu fields, got 5");
    }

    #[test]
    fn test_parse_cpu_counters_non_numeric_fails() {
        let err = parse_cpu_counters("cpu 1 2 3 x 5 6 7 8").unwrap_err();
        assert!(err.message.contains("invalid cpu field 4"));

        assert!(parse_cpu_counters("cpu 1 2 3 -4 5 6 7 8").is_err());
    }

    #[test]
    fn test_parse_cpu_counters_empty() {
        assert_eq!(parse_cpu_counters("").unwrap_err().message, "empty stat");
        assert_eq!(
            parse_cpu_counters("   \n").unwrap_err().message,
            "missing cpu identifier"
        );
    }

    #[test]
    fn test_parse_meminfo_partial() {
        let lines = ["MemTotal:    16384000 kB", "MemFree: 512000 kB", "Bogus: 1"];
        let (info, found) = parse_meminfo(lines);

        assert_eq!(found, 2);
        assert_eq!(info.total, 16384000);
        assert_eq!(info.free, 512000);
        assert_eq!(info.available, 0);
        assert_eq!(info.buffers, 0);
        assert_eq!(info.cached, 0);
        assert_eq!(info.shared, 0);
        assert_eq!(info.swap_total, 0);
        assert_eq!(info.swap_free, 0);
    }

    #[test]
    fn test_parse_meminfo_full() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:         1000 kB
Active:          4096000 kB
Shmem:            128000 kB
SwapTotal:       4096000 kB
SwapFree:        4000000 kB
";
        let (info, found) = parse_meminfo(content.lines());

        assert_eq!(found, EXPECTED_MEMINFO_KEYS);
        assert_eq!(info.available, 12000000);
        assert_eq!(info.buffers, 512000);
        assert_eq!(info.cached, 2048000); // not SwapCached
        assert_eq!(info.shared, 128000);
        assert_eq!(info.swap_total, 4096000);
        assert_eq!(info.swap_free, 4000000);
        assert_eq!(info.used, 0);
        assert_eq!(info.percent_used, 0.0);
    }

    #[test]
    fn test_parse_meminfo_exact_key_match() {
        let lines = [
            "MemTotalFoo: 1 kB",
            "XMemTotal: 2 kB",
            "SwapCached: 3 kB",
            "Cached_: 4 kB",
        ];
        let (info, found) = parse_meminfo(lines);

        assert_eq!(found, 0);
        assert_eq!(info, MemoryInfo::default());
    }

    #[test]
    fn test_parse_meminfo_tolerates_whitespace_and_garbage() {
        let lines = [
            "  MemTotal  :\t2048 kB  ",
            "MemFree:",
            "MemAvailable: lots kB",
            "no colon here",
            "",
            "Buffers:100",
        ];
        let (info, found) = parse_meminfo(lines);

        assert_eq!(found, 2);
        assert_eq!(info.total, 2048);
        assert_eq!(info.buffers, 100);
        assert_eq!(info.free, 0);
        assert_eq!(info.available, 0);
    }

    #[test]
    fn test_parse_meminfo_unit_without_space() {
        let lines = ["MemTotal: 123kB", "MemFree:\t45kB", "Cached: kB12"];
        let (info, found) = parse_meminfo(lines);

        assert_eq!(found, 2);
        assert_eq!(info.total, 123);
        assert_eq!(info.free, 45);
        assert_eq!(info.cached, 0);
    }

    #[test]
    fn test_parse_meminfo_repeated_key_counts_once() {
        let lines = ["MemTotal: 100 kB", "MemTotal: 200 kB"];
        let (info, found) = parse_meminfo(lines);

        assert_eq!(found, 1);
        assert_eq!(info.total, 200);
    }

    #[test]
    fn test_parse_uptime() {
        let info = parse_uptime("12345.67 98765.43\n").unwrap();
        assert!((info.uptime - 12345.67).abs() < 1e-9);
        assert!((info.idle_time - 98765.43).abs() < 1e-9);
        // Idle time summed over cores exceeds uptime; that is fine.
        assert!(info.idle_time > info.uptime);
    }

    #[test]
    fn test_parse_uptime_malformed() {
        assert!(parse_uptime("").is_err());
        assert!(parse_uptime("123.4").is_err());
        assert!(parse_uptime("abc 1.0").is_err());
        assert!(parse_uptime("1.0 NaN").is_err());
    }
}
