//! Extracts this tool's records from the kernel's trace_pipe stream.
//!
//! trace_pipe lines look like
//! `            bash-1234    [002] d..3.   357.477215: bpf_trace_printk: process 1234 executed syscall 59`
//! with the printk payload after the marker. The stream is shared and
//! best-effort; anything that is not one of our records is skipped.

use syscallsnoop_common::SyscallRecord;

const PRINTK_MARKER: &str = "bpf_trace_printk: ";

/// Returns the bpf_trace_printk payload of a raw trace_pipe line, if any.
pub fn printk_payload(line: &str) -> Option<&str> {
    let (_, payload) = line.split_once(PRINTK_MARKER)?;
    Some(payload.trim_end())
}

/// Parses a raw trace_pipe line into a syscall record, if it is one of ours.
pub fn parse_line(line: &str) -> Option<SyscallRecord> {
    printk_payload(line)?.parse().ok()
}
