/// Relocatable object emission
///
/// Packs the trampolines into an ELF `.o` that a compiled program can link
/// against: `write` and `exit_with` as global functions in `.text`, and the
/// standard descriptors as global u64 constants in `.rodata`.
use super::Target;
use crate::error::Result;
use log::debug;
use object::write::{Object, StandardSection, Symbol, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};

/// Serialized object file bytes suitable for further linking.
#[derive(Debug)]
pub struct ObjectArtifact {
    pub bytes: Vec<u8>,
}

fn architecture(target: Target) -> Architecture {
    match target {
        Target::X86_64Linux => Architecture::X86_64,
        Target::Aarch64Linux => Architecture::Aarch64,
    }
}

pub fn compile_object(target: Target) -> Result<ObjectArtifact> {
    let backend = target.backend();
    let mut obj = Object::new(BinaryFormat::Elf, architecture(backend.target()), Endianness::Little);
    let text_section = obj.section_id(StandardSection::Text);
    let rodata_section = obj.section_id(StandardSection::ReadOnlyData);

    let functions = [("write", backend.write()), ("exit_with", backend.exit_with())];
    for (name, code) in &functions {
        let offset = obj.append_section_data(text_section, code, 16);
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: offset,
            size: code.len() as u64,
            kind: SymbolKind::Text,
            scope: SymbolScope::Linkage,
            weak: false,
            section: SymbolSection::Section(text_section),
            flags: SymbolFlags::None,
        });
        debug!("{}: {} = {} bytes at .text+{:#x}", target, name, code.len(), offset);
    }

    for (name, fd) in target.abi().descriptors {
        let offset = obj.append_section_data(rodata_section, &fd.to_le_bytes(), 8);
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: offset,
            size: 8,
            kind: SymbolKind::Data,
            scope: SymbolScope::Linkage,
            weak: false,
            section: SymbolSection::Section(rodata_section),
            flags: SymbolFlags::None,
        });
    }

    let bytes = obj.write()?;
    Ok(ObjectArtifact { bytes })
}
