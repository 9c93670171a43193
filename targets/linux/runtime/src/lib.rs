//! Syscall trampolines for the sysgate runtime.
//!
//! Exactly one architecture module is compiled in, chosen by `target_arch`:
//!
//! | Arch    | exit | write | number reg | args           | trap      |
//! |---------|------|-------|------------|----------------|-----------|
//! | x86-64  | 60   | 1     | rax        | rdi, rsi, rdx  | `syscall` |
//! | aarch64 | 93   | 64    | x8         | x0, x1, x2     | `svc #0`  |
//!
//! `write` hands back the kernel's signed result untouched; [`WriteStatus`]
//! classifies it for callers that want complete / partial / failed.
//!
//! With `--no-default-features` the crate is `no_std` and builds as a static
//! archive exporting `sysgate_write` and `sysgate_exit_with`. Such builds need
//! `-C panic=abort`; a panic exits with status 101.
#![cfg_attr(not(feature = "std"), no_std)]

mod arch;
mod export;
mod status;

pub use arch::*;
pub use export::{sysgate_exit_with, sysgate_write};
pub use status::{Errno, WriteStatus};

/// `write` followed by classification of the kernel's answer.
#[inline]
pub fn write_status(fd: FileDescriptor, buf: &[u8], count: usize) -> WriteStatus {
    WriteStatus::from_raw(write(fd, buf, count), count)
}

#[cfg(all(not(feature = "std"), not(test)))]
#[panic_handler]
fn panic_handler(_: &core::panic::PanicInfo) -> ! {
    exit_with(101)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::fs::{self, File, OpenOptions};
    use std::os::unix::io::AsRawFd;
    use std::path::PathBuf;
    use std::vec::Vec;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(std::format!("sysgate-runtime-{}-{}", std::process::id(), name))
    }

    fn with_scratch_file(name: &str, body: impl FnOnce(FileDescriptor)) -> Vec<u8> {
        let path = scratch_path(name);
        let file: File = OpenOptions::new().create(true).write(true).truncate(true).open(&path).unwrap();
        body(file.as_raw_fd() as FileDescriptor);
        drop(file);
        let contents = fs::read(&path).unwrap();
        let _ = fs::remove_file(&path);
        contents
    }

    #[test]
    fn write_honors_count_exactly() {
        let contents = with_scratch_file("count", |fd| {
            assert_eq!(write(fd, b"ab", 1), 1);
        });
        assert_eq!(contents, b"a");
    }

    #[test]
    fn consecutive_writes_keep_call_order() {
        let contents = with_scratch_file("order", |fd| {
            assert!(write_status(fd, b"foo", 3).is_complete());
            assert!(write_status(fd, b"bar", 3).is_complete());
        });
        assert_eq!(contents, b"foobar");
    }

    #[test]
    fn zero_count_writes_nothing() {
        let contents = with_scratch_file("empty", |fd| {
            assert_eq!(write(fd, b"ignored", 0), 0);
        });
        assert!(contents.is_empty());
    }

    #[test]
    fn count_past_buffer_is_rejected_before_the_kernel() {
        let contents = with_scratch_file("overrun", |fd| {
            assert_eq!(write(fd, b"ab", 3), -(Errno::EFAULT.raw() as isize));
            assert_eq!(write_status(fd, b"", 1), WriteStatus::Failed(Errno::EFAULT));
        });
        assert!(contents.is_empty());
    }

    #[test]
    fn bad_descriptor_reports_ebadf() {
        let status = write_status(u32::MAX as FileDescriptor, b"lost", 4);
        assert_eq!(status, WriteStatus::Failed(Errno::EBADF));
    }

    #[test]
    fn read_only_descriptor_is_not_silently_ignored() {
        let path = scratch_path("readonly");
        fs::write(&path, b"seed").unwrap();
        let file = File::open(&path).unwrap();
        let status = write_status(file.as_raw_fd() as FileDescriptor, b"x", 1);
        drop(file);
        let _ = fs::remove_file(&path);
        assert_eq!(status, WriteStatus::Failed(Errno::EBADF));
    }

    #[test]
    fn exported_write_matches_safe_write() {
        let contents = with_scratch_file("export", |fd| {
            assert_eq!(unsafe { sysgate_write(fd, b"abc".as_ptr(), 2) }, 2);
            assert_eq!(unsafe { sysgate_write(fd, core::ptr::null(), 0) }, 0);
        });
        assert_eq!(contents, b"ab");
    }

    #[test]
    fn exported_write_rejects_null_buffer() {
        let contents = with_scratch_file("export-null", |fd| {
            assert_eq!(unsafe { sysgate_write(fd, core::ptr::null(), 4) }, -(Errno::EFAULT.raw() as isize));
        });
        assert!(contents.is_empty());
    }
}
