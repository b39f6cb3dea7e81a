#![no_std]
#![no_main]

use aya_ebpf::{
    bpf_printk, helpers::bpf_get_current_pid_tgid, macros::tracepoint,
    programs::TracePointContext,
};

use syscallsnoop_common::{process_id, SYS_ENTER_ID_OFFSET};

/// Status handed back to the kernel on every invocation. Tracing is
/// best-effort; the traced syscall must never observe a failure here.
const TRACE_OK: u32 = 0;

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 4] = syscallsnoop_common::LICENSE;

#[link_section = "version"]
#[no_mangle]
static VERSION: u32 = syscallsnoop_common::VERSION_ANY;

#[tracepoint]
pub fn syscallsnoop(ctx: TracePointContext) -> u32 {
    // A failed context read or a saturated trace pipe costs one record,
    // nothing else. The status stays fixed either way.
    let _ = try_syscallsnoop(&ctx);
    TRACE_OK
}

fn try_syscallsnoop(ctx: &TracePointContext) -> Result<(), i64> {
    let syscall: i64 = unsafe { ctx.read_at(SYS_ENTER_ID_OFFSET)? };
    let pid = process_id(bpf_get_current_pid_tgid());
    emit_record(pid, syscall);
    Ok(())
}

/// Copies the record template into the probe frame and hands it to the
/// kernel's trace-write primitive. Dropped silently when the pipe is
/// saturated. Keep the template in sync with SyscallRecord's Display impl.
#[inline(always)]
fn emit_record(pid: u32, syscall: i64) {
    unsafe { bpf_printk!(b"process %u executed syscall %lld", pid, syscall) };
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
