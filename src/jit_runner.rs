use crate::codegen::{detect_host_target, Target};
use crate::error::{Error, Result};
use log::debug;
use memmap2::{Mmap, MmapMut};
use sysgate_runtime::{Errno, FileDescriptor};

/// Runs emitted trampolines in-process, on the host architecture only.
pub struct JitRunner;

pub trait JitRunnerTrt {
    fn load(instructions: &[u8]) -> Result<Mmap>;
    fn call_write(target: Target, fd: FileDescriptor, buf: &[u8], count: usize) -> Result<isize>;
}

impl JitRunnerTrt for JitRunner {
    fn load(instructions: &[u8]) -> Result<Mmap> {
        let mut m = MmapMut::map_anon(instructions.len()).map_err(Error::Map)?;
        m.copy_from_slice(instructions);
        let m = m.make_exec().map_err(Error::Map)?;
        sync_instruction_cache(m.as_ptr(), m.len());
        Ok(m)
    }

    fn call_write(target: Target, fd: FileDescriptor, buf: &[u8], count: usize) -> Result<isize> {
        if target != detect_host_target() {
            return Err(Error::ForeignTarget(target));
        }
        if count > buf.len() {
            return Ok(-(Errno::EFAULT.raw() as isize));
        }

        let code = Self::load(&target.backend().write())?;
        debug!("jit write trampoline at {:p}", code.as_ptr());

        // The trampoline takes (fd, buf, count) in the C argument registers and
        // returns the raw kernel result; `code` stays mapped for the whole call.
        let result = unsafe {
            let func: extern "C" fn(u64, *const u8, usize) -> isize = std::mem::transmute(code.as_ptr());
            func(fd, buf.as_ptr(), count)
        };
        Ok(result)
    }
}

/// Data and instruction caches are not coherent on AArch64; code written
/// through the data side must be cleaned to the point of unification first.
#[cfg(target_arch = "aarch64")]
fn sync_instruction_cache(start: *const u8, len: usize) {
    use core::arch::asm;

    let ctr: u64;
    unsafe {
        asm!("mrs {}, ctr_el0", out(reg) ctr, options(nomem, nostack, preserves_flags));
    }
    let dline = 4usize << ((ctr >> 16) & 0xf);
    let iline = 4usize << (ctr & 0xf);
    let begin = start as usize;
    let end = begin + len;

    let mut addr = begin & !(dline - 1);
    while addr < end {
        unsafe {
            asm!("dc cvau, {}", in(reg) addr, options(nostack, preserves_flags));
        }
        addr += dline;
    }
    unsafe {
        asm!("dsb ish", options(nostack, preserves_flags));
    }

    let mut addr = begin & !(iline - 1);
    while addr < end {
        unsafe {
            asm!("ic ivau, {}", in(reg) addr, options(nostack, preserves_flags));
        }
        addr += iline;
    }
    unsafe {
        asm!("dsb ish", "isb", options(nostack, preserves_flags));
    }
}

#[cfg(not(target_arch = "aarch64"))]
fn sync_instruction_cache(_start: *const u8, _len: usize) {}
