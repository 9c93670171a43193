use core::arch::asm;

use crate::status::Errno;

pub type FileDescriptor = u64;

pub const STDIN: FileDescriptor = 0;
pub const STDOUT: FileDescriptor = 1;
pub const STDERR: FileDescriptor = 2;

pub const SYS_WRITE: u64 = 64;
pub const SYS_EXIT: u64 = 93;

/// Terminate the calling process. Only the low 8 bits of `status` reach the parent.
#[inline(always)]
pub fn exit_with(status: i64) -> ! {
    unsafe {
        asm!(
            "svc #0",
            in("x8") SYS_EXIT,
            in("x0") status,
            options(noreturn, nostack),
        );
    }
}

/// Write the first `count` bytes of `buf` to `fd`.
///
/// Returns the kernel's raw result: the number of bytes accepted, or a negated errno.
/// A `count` past the end of `buf` never reaches the kernel and yields `-EFAULT`.
#[inline(always)]
pub fn write(fd: FileDescriptor, buf: &[u8], count: usize) -> isize {
    if count > buf.len() {
        return -(Errno::EFAULT.raw() as isize);
    }

    let ret: isize;
    unsafe {
        asm!(
            "svc #0",
            in("x8") SYS_WRITE,
            inlateout("x0") fd => ret,
            in("x1") buf.as_ptr(),
            in("x2") count,
            options(nostack),
        );
    }
    ret
}
