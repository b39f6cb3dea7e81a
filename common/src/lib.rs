#![cfg_attr(not(test), no_std)]

use core::fmt;
use core::mem;
use core::str::FromStr;

/// License token the kernel checks before the probe may attach.
/// bpf_trace_printk is a GPL-only helper, so anything else is refused.
pub const LICENSE: [u8; 4] = *b"GPL\0";

/// Version sentinel meaning "compatible with any kernel version".
pub const VERSION_ANY: u32 = 0xFFFF_FFFE;

/// Argument layout of the raw_syscalls:sys_enter tracepoint.
///
/// Field order and widths are kernel ABI (see the tracepoint's tracefs
/// `format` file). The verifier rejects any access outside this layout at
/// load time; nothing is checked at runtime.
#[repr(C)]
pub struct SysEnterArgs {
    /// Common tracepoint preamble, opaque to the probe.
    pub unused: u64,
    /// Syscall number, signed per the kernel's definition.
    pub id: i64,
    /// The six syscall argument words. Unused here, kept for layout.
    pub args: [u64; 6],
}

impl SysEnterArgs {
    #[inline]
    pub fn syscall_id(&self) -> i64 {
        self.id
    }
}

/// Byte offset of the syscall id within the sys_enter context, for
/// `TracePointContext::read_at`.
pub const SYS_ENTER_ID_OFFSET: usize = mem::offset_of!(SysEnterArgs, id);

/// Splits the value packed by bpf_get_current_pid_tgid(): the tgid (what
/// user space calls the pid) lives in the upper 32 bits.
#[inline]
pub fn process_id(pid_tgid: u64) -> u32 {
    (pid_tgid >> 32) as u32
}

/// Lower 32 bits of the packed value: the kernel task id.
#[inline]
pub fn thread_id(pid_tgid: u64) -> u32 {
    pid_tgid as u32
}

/// One emitted trace record: which process entered which syscall.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallRecord {
    pub pid: u32,
    pub syscall: i64,
}

impl fmt::Display for SyscallRecord {
    // Must stay in sync with the printk template in ebpf/src/main.rs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process {} executed syscall {}", self.pid, self.syscall)
    }
}

impl FromStr for SyscallRecord {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("process ").ok_or(ParseRecordError)?;
        let (pid, syscall) = rest
            .split_once(" executed syscall ")
            .ok_or(ParseRecordError)?;
        Ok(SyscallRecord {
            pid: pid.parse().map_err(|_| ParseRecordError)?,
            syscall: syscall.trim_end().parse().map_err(|_| ParseRecordError)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRecordError;

impl fmt::Display for ParseRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a syscall trace record")
    }
}

impl core::error::Error for ParseRecordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_is_upper_half_of_packed_value() {
        // pid 10000, tid 5
        let packed = 0x0000_2710_0000_0005u64;
        assert_eq!(process_id(packed), 10000);
        assert_eq!(thread_id(packed), 5);
    }

    #[test]
    fn sys_enter_layout_matches_kernel_abi() {
        assert_eq!(SYS_ENTER_ID_OFFSET, 8);
        assert_eq!(mem::size_of::<SysEnterArgs>(), 64);
        assert_eq!(mem::offset_of!(SysEnterArgs, args), 16);
    }

    #[test]
    fn syscall_id_accessor_reads_the_id_field() {
        let ctx = SysEnterArgs {
            unused: 0xdead_beef,
            id: 59,
            args: [1, 2, 3, 4, 5, 6],
        };
        assert_eq!(ctx.syscall_id(), 59);
    }

    #[test]
    fn record_renders_the_wire_line() {
        let record = SyscallRecord {
            pid: 1234,
            syscall: 0,
        };
        assert_eq!(record.to_string(), "process 1234 executed syscall 0");
    }

    #[test]
    fn record_parses_back_from_the_wire_line() {
        let record: SyscallRecord = "process 1234 executed syscall 0".parse().unwrap();
        assert_eq!(
            record,
            SyscallRecord {
                pid: 1234,
                syscall: 0
            }
        );
    }

    #[test]
    fn boundary_syscall_ids_survive_render_and_parse() {
        for syscall in [i64::MIN, -1, 0, i64::MAX] {
            let record = SyscallRecord { pid: 1, syscall };
            let parsed: SyscallRecord = record.to_string().parse().unwrap();
            assert_eq!(parsed, record);
        }
    }

    #[test]
    fn sequential_records_are_independent() {
        let first: SyscallRecord = "process 1 executed syscall 2".parse().unwrap();
        let second: SyscallRecord = "process 3 executed syscall 4".parse().unwrap();
        assert_eq!(first, SyscallRecord { pid: 1, syscall: 2 });
        assert_eq!(second, SyscallRecord { pid: 3, syscall: 4 });
    }

    #[test]
    fn non_records_are_rejected() {
        for line in [
            "",
            "process ",
            "process x executed syscall 0",
            "process 1 executed syscall ",
            "task 1 entered syscall 2",
        ] {
            assert!(line.parse::<SyscallRecord>().is_err());
        }
    }

    #[test]
    fn metadata_constants_hold_their_declared_values() {
        assert_eq!(&LICENSE, b"GPL\0");
        assert_eq!(VERSION_ANY, 0xFFFF_FFFE);
        // repeated inspection, same values
        assert_eq!(&LICENSE, b"GPL\0");
        assert_eq!(VERSION_ANY, 0xFFFF_FFFE);
    }
}
