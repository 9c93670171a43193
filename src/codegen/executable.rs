/// Executable generation for Linux (ELF format)
///
/// Builds the smallest useful static ELF64 binary around the trampolines:
/// one read+execute PT_LOAD segment mapping the whole file at 0x400000.
///
/// File layout:
/// - ELF header (64 bytes) and a single program header (56 bytes)
/// - entry stub: write(fd, message, count), then exit_with(status or 1)
/// - `write` trampoline
/// - `exit_with` trampoline
/// - message bytes
///
/// Pieces start on 4-byte boundaries so the same layout is valid for AArch64.
use super::{flatten, EntryCall, ProgramLayout, Target};
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Virtual address the file is mapped at
const BASE_VADDR: u64 = 0x400000;
const ELF_HEADER_SIZE: u64 = 64;
const PROGRAM_HEADER_SIZE: u64 = 56;
const SEGMENT_ALIGN: u64 = 0x1000;

/// What the emitted program does: one write, then exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoProgram {
    pub fd: u64,
    pub message: Vec<u8>,
    pub count: usize,
    pub status: i64,
}

impl EchoProgram {
    /// Writes all of `message` to stdout and exits 0.
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        let message = message.into();
        EchoProgram { fd: 1, count: message.len(), message, status: 0 }
    }

    pub fn with_fd(mut self, fd: u64) -> Self {
        self.fd = fd;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }
}

#[inline]
fn align_up_4(value: u64) -> u64 {
    (value + 3) & !3
}

fn place(image: &mut Vec<u8>, offset: u64, bytes: &[u8]) {
    image.resize(offset as usize, 0);
    image.extend_from_slice(bytes);
}

fn write_elf_header(elf: &mut Vec<u8>, machine: u16, entry_point: u64) {
    // e_ident
    elf.extend_from_slice(&[0x7f, 0x45, 0x4c, 0x46]); // ELF magic
    elf.push(2); // EI_CLASS: 64-bit
    elf.push(1); // EI_DATA: little endian
    elf.push(1); // EI_VERSION: current
    elf.push(0); // EI_OSABI: System V
    elf.extend_from_slice(&[0; 8]); // EI_PAD

    elf.extend_from_slice(&2u16.to_le_bytes()); // e_type: ET_EXEC
    elf.extend_from_slice(&machine.to_le_bytes()); // e_machine
    elf.extend_from_slice(&1u32.to_le_bytes()); // e_version: EV_CURRENT

    elf.extend_from_slice(&entry_point.to_le_bytes()); // e_entry
    elf.extend_from_slice(&ELF_HEADER_SIZE.to_le_bytes()); // e_phoff
    elf.extend_from_slice(&0u64.to_le_bytes()); // e_shoff (no sections)
    elf.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    elf.extend_from_slice(&(ELF_HEADER_SIZE as u16).to_le_bytes()); // e_ehsize
    elf.extend_from_slice(&(PROGRAM_HEADER_SIZE as u16).to_le_bytes()); // e_phentsize
    elf.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    elf.extend_from_slice(&0u16.to_le_bytes()); // e_shentsize
    elf.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    elf.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx
}

fn write_program_header(elf: &mut Vec<u8>, file_size: u64) {
    elf.extend_from_slice(&1u32.to_le_bytes()); // p_type: PT_LOAD
    elf.extend_from_slice(&5u32.to_le_bytes()); // p_flags: PF_R | PF_X
    elf.extend_from_slice(&0u64.to_le_bytes()); // p_offset
    elf.extend_from_slice(&BASE_VADDR.to_le_bytes()); // p_vaddr
    elf.extend_from_slice(&BASE_VADDR.to_le_bytes()); // p_paddr
    elf.extend_from_slice(&file_size.to_le_bytes()); // p_filesz
    elf.extend_from_slice(&file_size.to_le_bytes()); // p_memsz
    elf.extend_from_slice(&SEGMENT_ALIGN.to_le_bytes()); // p_align
}

/// Build the executable image in memory
pub fn build_executable(target: Target, program: &EchoProgram) -> Result<Vec<u8>> {
    if program.count > program.message.len() {
        return Err(Error::CountExceedsMessage { count: program.count, len: program.message.len() });
    }

    let backend = target.backend();
    let write_code = backend.write();
    let exit_code = backend.exit_with();

    let stub_offset = ELF_HEADER_SIZE + PROGRAM_HEADER_SIZE;
    let write_offset = align_up_4(stub_offset + backend.entry_stub_size() as u64);
    let exit_offset = align_up_4(write_offset + write_code.len() as u64);
    let message_offset = align_up_4(exit_offset + exit_code.len() as u64);
    let file_size = message_offset + program.message.len() as u64;

    let layout = ProgramLayout {
        stub: BASE_VADDR + stub_offset,
        write: BASE_VADDR + write_offset,
        exit_with: BASE_VADDR + exit_offset,
        message: BASE_VADDR + message_offset,
    };
    let call = EntryCall { fd: program.fd, count: program.count as u64, status: program.status };
    let stub = flatten(&backend.entry_stub(&call, &layout));

    let mut elf = Vec::with_capacity(file_size as usize);
    write_elf_header(&mut elf, backend.elf_machine(), layout.stub);
    write_program_header(&mut elf, file_size);
    place(&mut elf, stub_offset, &stub);
    place(&mut elf, write_offset, &write_code);
    place(&mut elf, exit_offset, &exit_code);
    place(&mut elf, message_offset, &program.message);

    debug!(
        "{} executable: stub={:#x} write={:#x} exit_with={:#x} message={:#x} ({} bytes)",
        target,
        layout.stub,
        layout.write,
        layout.exit_with,
        layout.message,
        elf.len()
    );

    Ok(elf)
}

/// Write an executable for `target` to `output_path` and mark it executable
pub fn generate_executable(target: Target, program: &EchoProgram, output_path: &Path) -> Result<()> {
    let image = build_executable(target, program)?;
    fs::write(output_path, &image).map_err(|source| Error::Io { op: "write", path: output_path.to_path_buf(), source })?;
    fs::set_permissions(output_path, fs::Permissions::from_mode(0o755)).map_err(|source| Error::Io {
        op: "set permissions on",
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(())
}
