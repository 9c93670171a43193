use core::fmt;

/// Positive kernel error number, as carried (negated) in a syscall result.
///
/// The values below are the asm-generic numbers shared by x86-64 and aarch64 Linux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    pub const EINTR: Errno = Errno(4);
    pub const EIO: Errno = Errno(5);
    pub const EBADF: Errno = Errno(9);
    pub const EAGAIN: Errno = Errno(11);
    pub const EFAULT: Errno = Errno(14);
    pub const EINVAL: Errno = Errno(22);
    pub const EFBIG: Errno = Errno(27);
    pub const ENOSPC: Errno = Errno(28);
    pub const EPIPE: Errno = Errno(32);

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Errno::EINTR => "EINTR",
            Errno::EIO => "EIO",
            Errno::EBADF => "EBADF",
            Errno::EAGAIN => "EAGAIN",
            Errno::EFAULT => "EFAULT",
            Errno::EINVAL => "EINVAL",
            Errno::EFBIG => "EFBIG",
            Errno::ENOSPC => "ENOSPC",
            Errno::EPIPE => "EPIPE",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "errno {}", self.0),
        }
    }
}

#[cfg(feature = "std")]
impl From<Errno> for std::io::Error {
    fn from(errno: Errno) -> Self {
        std::io::Error::from_raw_os_error(errno.0)
    }
}

/// Outcome of a single `write` trap, classified from the kernel's signed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Complete { written: usize },
    Partial { written: usize },
    Failed(Errno),
}

impl WriteStatus {
    pub fn from_raw(ret: isize, count: usize) -> Self {
        if ret < 0 {
            return WriteStatus::Failed(Errno(ret.unsigned_abs() as i32));
        }

        let written = ret as usize;
        if written >= count {
            WriteStatus::Complete { written }
        } else {
            WriteStatus::Partial { written }
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, WriteStatus::Complete { .. })
    }

    /// Bytes the kernel accepted; zero on failure.
    pub fn written(&self) -> usize {
        match self {
            WriteStatus::Complete { written } | WriteStatus::Partial { written } => *written,
            WriteStatus::Failed(_) => 0,
        }
    }

    pub fn errno(&self) -> Option<Errno> {
        match self {
            WriteStatus::Failed(errno) => Some(*errno),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_result_is_failure() {
        assert_eq!(WriteStatus::from_raw(-9, 5), WriteStatus::Failed(Errno::EBADF));
        assert_eq!(WriteStatus::from_raw(-14, 0).errno(), Some(Errno::EFAULT));
    }

    #[test]
    fn short_result_is_partial() {
        let status = WriteStatus::from_raw(3, 8);
        assert_eq!(status, WriteStatus::Partial { written: 3 });
        assert!(!status.is_complete());
        assert_eq!(status.written(), 3);
    }

    #[test]
    fn full_result_is_complete() {
        assert!(WriteStatus::from_raw(5, 5).is_complete());
        assert!(WriteStatus::from_raw(0, 0).is_complete());
        assert_eq!(WriteStatus::Failed(Errno::EPIPE).written(), 0);
    }

    #[test]
    fn errno_display() {
        extern crate std;
        use std::string::ToString;

        assert_eq!(Errno::EBADF.to_string(), "EBADF");
        assert_eq!(Errno(99).to_string(), "errno 99");
    }
}
