use core::arch::asm;

use crate::status::Errno;

pub type FileDescriptor = u64;

pub const STDIN: FileDescriptor = 0;
pub const STDOUT: FileDescriptor = 1;
pub const STDERR: FileDescriptor = 2;

pub const SYS_WRITE: u64 = 1;
pub const SYS_EXIT: u64 = 60;

/// Terminate the calling process. Only the low 8 bits of `status` reach the parent.
#[inline(always)]
pub fn exit_with(status: i64) -> ! {
    unsafe {
        asm!(
            "syscall",
            in("rax") SYS_EXIT,
            in("rdi") status,
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
            "syscall",
            inlateout("rax") SYS_WRITE as isize => ret,
            in("rdi") fd,
            in("rsi") buf.as_ptr(),
            in("rdx") count,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack, preserves_flags),
        );
    }
    ret
}
