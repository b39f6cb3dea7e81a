use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Context as _;
use aya::{programs::TracePoint, Ebpf};
use aya_log::EbpfLogger;
use log::{info, warn};
use tokio::signal;

mod trace_pipe;

const TRACING_ON: &str = "/sys/kernel/debug/tracing/tracing_on";
const TRACE_PIPE: &str = "/sys/kernel/debug/tracing/trace_pipe";

// Object produced by `cargo xtask build-ebpf`, loaded at runtime so the
// userspace binary builds without the bpf toolchain present.
#[cfg(debug_assertions)]
const PROBE_OBJECT: &str = "target/bpfel-unknown-none/debug/syscallsnoop";
#[cfg(not(debug_assertions))]
const PROBE_OBJECT: &str = "target/bpfel-unknown-none/release/syscallsnoop";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut bpf = Ebpf::load_file(PROBE_OBJECT)
        .with_context(|| format!("failed to load eBPF object from {PROBE_OBJECT}"))?;
    if let Err(e) = EbpfLogger::init(&mut bpf) {
        // This can happen if you remove all log statements from your eBPF program.
        warn!("failed to initialize eBPF logger: {e}");
    }

    let program: &mut TracePoint = bpf.program_mut("syscallsnoop").unwrap().try_into()?;
    program.load()?;
    program.attach("raw_syscalls", "sys_enter")?;

    fs::write(TRACING_ON, "1").context("failed to enable tracing")?;

    info!("streaming records from {TRACE_PIPE}");

    tokio::task::spawn_blocking(|| {
        if let Err(e) = stream_records() {
            warn!("trace pipe reader stopped: {e}");
        }
    });

    signal::ctrl_c().await?;
    info!("Exiting...");
    Ok(())
}

/// Reads trace_pipe line by line, printing the lines this tool's probe
/// emitted and skipping everything else sharing the stream.
fn stream_records() -> Result<(), anyhow::Error> {
    let file = File::open(TRACE_PIPE).with_context(|| format!("failed to open {TRACE_PIPE}"))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if let Some(record) = trace_pipe::parse_line(&line) {
            println!("{record}");
        }
    }
}
