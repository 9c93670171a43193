/// Trampoline code generation - architecture-agnostic interface
///
/// The runtime crate carries the trampolines as inline assembly for the host.
/// This module encodes the same two trampolines as raw machine code for any
/// supported target, so they can be linked into compiled programs or packed
/// into a standalone executable.
///
/// Current supported targets:
/// - x86-64 Linux (`syscall`, number in rax)
/// - ARM64 Linux (`svc #0`, number in x8)
///
/// ## Module Structure
/// - `api`: Target selection and host detection
/// - `abi`: Linux syscall register conventions per target
/// - `backend`: Trait every target encoder implements
/// - `relocatable`: Relocatable ELF object emission
/// - `executable`: Static ELF executable emission
/// - `x86_64_linux`, `aarch64_linux`: Target encoders
mod abi;
mod api;
mod backend;
pub mod aarch64_linux;
pub mod executable;
pub mod relocatable;
pub mod x86_64_linux;

pub use api::{detect_host_target, Target};
pub use backend::{flatten, EntryCall, Encoded, ProgramLayout, TrampolineBackend};
