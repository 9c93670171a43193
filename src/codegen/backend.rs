/// Architecture-agnostic trampoline backend trait
///
/// Every target encodes the same three pieces: the `exit_with` and `write`
/// trampolines, and an entry stub that calls them. Encodings are returned
/// instruction by instruction so they can be listed as well as emitted.
use super::Target;

/// One encoded machine instruction and its assembly text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub mnemonic: String,
}

impl Encoded {
    pub fn new(bytes: Vec<u8>, mnemonic: impl Into<String>) -> Self {
        Encoded { bytes, mnemonic: mnemonic.into() }
    }

    /// A fixed-width 32-bit instruction word, stored little-endian.
    pub fn word(word: u32, mnemonic: impl Into<String>) -> Self {
        Encoded::new(word.to_le_bytes().to_vec(), mnemonic)
    }
}

pub fn flatten(sequence: &[Encoded]) -> Vec<u8> {
    sequence.iter().flat_map(|inst| inst.bytes.iter().copied()).collect()
}

/// Virtual addresses of the pieces of an emitted program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramLayout {
    pub stub: u64,
    pub write: u64,
    pub exit_with: u64,
    pub message: u64,
}

/// Arguments the entry stub passes to the trampolines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCall {
    pub fd: u64,
    pub count: u64,
    pub status: i64,
}

/// Appends instructions while tracking the address of the next one.
pub(crate) struct StubBuilder {
    base: u64,
    len: u64,
    sequence: Vec<Encoded>,
}

impl StubBuilder {
    pub(crate) fn new(base: u64) -> Self {
        StubBuilder { base, len: 0, sequence: Vec::new() }
    }

    pub(crate) fn here(&self) -> u64 {
        self.base + self.len
    }

    pub(crate) fn push(&mut self, inst: Encoded) {
        self.len += inst.bytes.len() as u64;
        self.sequence.push(inst);
    }

    pub(crate) fn extend(&mut self, insts: impl IntoIterator<Item = Encoded>) {
        for inst in insts {
            self.push(inst);
        }
    }

    pub(crate) fn finish(self) -> Vec<Encoded> {
        self.sequence
    }
}

/// High-level interface each target encoder must implement.
pub trait TrampolineBackend {
    fn target(&self) -> Target;

    /// ELF `e_machine` value
    fn elf_machine(&self) -> u16;

    /// Terminates with the status already in the first argument register. Never returns.
    fn exit_with_sequence(&self) -> Vec<Encoded>;

    /// fd, buffer and count arrive in the C argument registers, which are also
    /// the syscall argument registers; the kernel result is the C return value.
    fn write_sequence(&self) -> Vec<Encoded>;

    /// Calls `write(fd, message, count)` then `exit_with(status)`, or
    /// `exit_with(1)` if the write failed. Size must not depend on `call` or `layout`.
    fn entry_stub(&self, call: &EntryCall, layout: &ProgramLayout) -> Vec<Encoded>;

    fn exit_with(&self) -> Vec<u8> {
        flatten(&self.exit_with_sequence())
    }

    fn write(&self) -> Vec<u8> {
        flatten(&self.write_sequence())
    }

    fn entry_stub_size(&self) -> usize {
        flatten(&self.entry_stub(&EntryCall::default(), &ProgramLayout::default())).len()
    }
}
