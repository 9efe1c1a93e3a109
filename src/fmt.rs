//! Unit conversions and human-readable formatting for reports.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Converts bytes to whole gibibytes, rounding down.
pub fn bytes_to_gb(bytes: u64) -> u64 {
    bytes / GIB
}

/// Converts kibibytes (the `/proc/meminfo` unit) to whole mebibytes,
/// rounding down.
pub fn kb_to_mb(kb: u64) -> u64 {
    kb / KIB
}

/// Format byte count as human-readable size.
///
/// `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: u64) -> String {
    let f = bytes as f64;
    if bytes >= GIB {
        format!("{:.1} GiB", f / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", f / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", f / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format seconds since boot as `"3d 4h 5m"`.
///
/// Leading zero units are omitted; under a minute prints seconds.
/// Negative and non-finite input prints `"0s"`.
pub fn format_uptime(secs: f64) -> String {
    if !secs.is_finite() || secs < 1.0 {
        return "0s".to_string();
    }
    let secs = secs as u64;
    if secs < 60 {
        return format!("{}s", secs);
    }

    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let mins = (secs % 3600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
