/// Linux syscall conventions for each supported target
///
/// One row per target: which register selects the syscall, which registers
/// carry the arguments, and which instruction traps into the kernel.
use super::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallAbi {
    pub target: Target,
    pub number_register: &'static str,
    pub arg_registers: [&'static str; 3],
    pub return_register: &'static str,
    pub trap: &'static str,
    pub exit_number: u64,
    pub write_number: u64,
    pub descriptors: [(&'static str, u64); 3],
}

const STANDARD_DESCRIPTORS: [(&str, u64); 3] = [("STDIN", 0), ("STDOUT", 1), ("STDERR", 2)];

pub const X86_64_LINUX: SyscallAbi = SyscallAbi {
    target: Target::X86_64Linux,
    number_register: "rax",
    arg_registers: ["rdi", "rsi", "rdx"],
    return_register: "rax",
    trap: "syscall",
    exit_number: 60,
    write_number: 1,
    descriptors: STANDARD_DESCRIPTORS,
};

pub const AARCH64_LINUX: SyscallAbi = SyscallAbi {
    target: Target::Aarch64Linux,
    number_register: "x8",
    arg_registers: ["x0", "x1", "x2"],
    return_register: "x0",
    trap: "svc #0",
    exit_number: 93,
    write_number: 64,
    descriptors: STANDARD_DESCRIPTORS,
};

impl SyscallAbi {
    pub fn for_target(target: Target) -> &'static SyscallAbi {
        match target {
            Target::X86_64Linux => &X86_64_LINUX,
            Target::Aarch64Linux => &AARCH64_LINUX,
        }
    }

    /// Human-readable table rows: `exit` then `write`.
    pub fn describe(&self) -> Vec<String> {
        let [a0, a1, a2] = self.arg_registers;
        vec![
            format!(
                "{:<8} exit  {:>3}  {:<3} {}=status  {}",
                self.target, self.exit_number, self.number_register, a0, self.trap
            ),
            format!(
                "{:<8} write {:>3}  {:<3} {}=fd, {}=buf, {}=count  {}  -> {}",
                self.target, self.write_number, self.number_register, a0, a1, a2, self.trap, self.return_register
            ),
        ]
    }
}
