//! sysload - one-shot system load report.
//!
//! Samples CPU usage over an interval, then prints memory, storage and uptime
//! figures as text or JSON.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, LevelFilter};

#[cfg(not(target_os = "linux"))]
use sysload::collector::MockFs;
#[cfg(target_os = "linux")]
use sysload::collector::RealFs;
use sysload::collector::SystemCollector;
use sysload::collector::procfs::parser::EXPECTED_MEMINFO_KEYS;
use sysload::fmt::{bytes_to_gb, format_bytes, format_uptime, kb_to_mb};
use sysload::report::SystemReport;

/// One-shot system load report.
#[derive(Parser)]
#[command(name = "sysload", about = "Report CPU, memory, storage and uptime", version)]
struct Args {
    /// CPU sampling interval in seconds (minimum 0.1).
    #[arg(default_value = "1.0")]
    interval: f64,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Mount point to report storage for.
    #[arg(long, default_value = "/")]
    mount: String,

    /// Output as JSON.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let directive = format!("sysload={}", level)
        .parse::<Directive>()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into());
    let filter = EnvFilter::from_default_env().add_directive(directive);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &SystemReport) {
    println!("--- CPU Statistics ---");
    match &report.cpu {
        Some(cpu) => {
            println!("User:     {:.2}%", cpu.user);
            println!("Nice:     {:.2}%", cpu.nice);
            println!("System:   {:.2}%", cpu.system);
            println!("Idle:     {:.2}%", cpu.idle);
            println!("I/O Wait: {:.2}%", cpu.iowait);
            println!("IRQ:      {:.2}%", cpu.irq);
            println!("SoftIRQ:  {:.2}%", cpu.softirq);
            println!("Steal:    {:.2}%", cpu.steal);
            println!("Total:    {:.2}%", cpu.total);
        }
        None => println!("unavailable"),
    }

    println!("\n--- Memory Statistics ---");
    match &report.memory {
        Some(mem) => {
            println!("Total:      {} MB", kb_to_mb(mem.total));
            println!("Free:       {} MB", kb_to_mb(mem.free));
            println!("Available:  {} MB", kb_to_mb(mem.available));
            println!("Buffers:    {} MB", kb_to_mb(mem.buffers));
            println!("Cached:     {} MB", kb_to_mb(mem.cached));
            println!("Shared:     {} MB", kb_to_mb(mem.shared));
            println!("Used:       {} MB", kb_to_mb(mem.used));
            println!("Used %:     {:.2}%", mem.percent_used);
            println!("Swap Total: {} MB", kb_to_mb(mem.swap_total));
            println!("Swap Free:  {} MB", kb_to_mb(mem.swap_free));
            println!("Swap Used:  {} MB", kb_to_mb(mem.swap_used));
            if report.memory_fields_found < EXPECTED_MEMINFO_KEYS {
                println!(
                    "Missing {} fields from meminfo",
                    EXPECTED_MEMINFO_KEYS - report.memory_fields_found
                );
            }
        }
        None => println!("unavailable"),
    }

    println!("\n--- Storage Statistics ---");
    match &report.storage {
        Some(st) => {
            println!(
                "Total:     {} GB ({})",
                bytes_to_gb(st.total),
                format_bytes(st.total)
            );
            println!(
                "Available: {} GB ({})",
                bytes_to_gb(st.available),
                format_bytes(st.available)
            );
            println!(
                "Used:      {} GB ({})",
                bytes_to_gb(st.used),
                format_bytes(st.used)
            );
            println!("Used %:    {:.2}%", st.percent_usage);
        }
        None => println!("unavailable"),
    }

    println!("\n--- System Uptime ---");
    match &report.uptime {
        Some(up) => {
            println!("Uptime:    {:.2} seconds ({})", up.uptime, format_uptime(up.uptime));
            println!("Idle time: {:.2} seconds", up.idle_time);
        }
        None => println!("unavailable"),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("sysload {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, proc={}, mount={}",
        args.interval, args.proc_path, args.mount
    );

    #[cfg(target_os = "linux")]
    let collector = SystemCollector::new(RealFs::new(), &args.proc_path);
    #[cfg(not(target_os = "linux"))]
    let collector = SystemCollector::new(MockFs::busy_system(), &args.proc_path);

    let report = SystemReport::collect(&collector, args.interval, &args.mount);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }

    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
