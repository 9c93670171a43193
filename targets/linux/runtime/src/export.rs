//! C ABI entry points exported by the static archive.

use crate::status::Errno;
use crate::{exit_with, write, FileDescriptor};

/// Write `count` bytes starting at `buf` to `fd`, returning the raw kernel result.
///
/// # Safety
///
/// When `count` is non-zero, `buf` must be null or valid for reads of `count` bytes.
#[no_mangle]
pub unsafe extern "C" fn sysgate_write(fd: FileDescriptor, buf: *const u8, count: usize) -> isize {
    if count == 0 {
        return write(fd, &[], 0);
    }
    if buf.is_null() || count > isize::MAX as usize {
        return -(Errno::EFAULT.raw() as isize);
    }
    let bytes = core::slice::from_raw_parts(buf, count);
    write(fd, bytes, count)
}

#[no_mangle]
pub extern "C" fn sysgate_exit_with(status: i64) -> ! {
    exit_with(status)
}
