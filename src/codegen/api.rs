/// Public API for target selection
///
/// A `Target` picks the encoder and the syscall table. Dispatch on it only
/// happens on the host side; the runtime crate picks its module at compile time.
use super::aarch64_linux::Aarch64Linux;
use super::abi::SyscallAbi;
use super::backend::TrampolineBackend;
use super::x86_64_linux::X86_64Linux;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Supported target platforms (architecture + OS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    X86_64Linux,
    Aarch64Linux,
}

impl Target {
    #[cfg(test)]
    pub const ALL: [Target; 2] = [Target::X86_64Linux, Target::Aarch64Linux];

    pub fn name(&self) -> &'static str {
        match self {
            Target::X86_64Linux => "x86-64",
            Target::Aarch64Linux => "aarch64",
        }
    }

    pub fn abi(&self) -> &'static SyscallAbi {
        SyscallAbi::for_target(*self)
    }

    /// Encoder for this target
    pub fn backend(&self) -> &'static dyn TrampolineBackend {
        match self {
            Target::X86_64Linux => &X86_64Linux,
            Target::Aarch64Linux => &Aarch64Linux,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "x86-64" | "x64" | "amd64" => Ok(Target::X86_64Linux),
            "aarch64" | "arm64" => Ok(Target::Aarch64Linux),
            _ => Err(Error::InvalidTarget(s.to_string())),
        }
    }
}

/// Detect the host target platform
///
/// The runtime crate refuses to build anywhere but x86-64 or aarch64 Linux,
/// so those are the only two answers.
pub fn detect_host_target() -> Target {
    if cfg!(target_arch = "aarch64") {
        Target::Aarch64Linux
    } else {
        Target::X86_64Linux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_aliases() {
        assert_eq!("x86_64".parse::<Target>().unwrap(), Target::X86_64Linux);
        assert_eq!("AMD64".parse::<Target>().unwrap(), Target::X86_64Linux);
        assert_eq!("arm64".parse::<Target>().unwrap(), Target::Aarch64Linux);
        assert!(matches!("riscv64".parse::<Target>(), Err(Error::InvalidTarget(name)) if name == "riscv64"));
    }

    #[test]
    fn host_detection_matches_compile_target() {
        let expected = if cfg!(target_arch = "x86_64") { Target::X86_64Linux } else { Target::Aarch64Linux };
        assert_eq!(detect_host_target(), expected);
    }

    #[test]
    fn display_pads_like_a_str() {
        assert_eq!(format!("[{:<8}]", Target::X86_64Linux), "[x86-64  ]");
    }
}
