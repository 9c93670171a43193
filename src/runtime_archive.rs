/// The prebuilt `no_std` runtime archive, for linking the trampolines into foreign code
use crate::error::{Error, Result};
use object::read::archive::ArchiveFile;
use object::{Object, ObjectSymbol};
use std::fs;
use std::path::Path;

/// Path of `libsysgate_runtime.a`, produced by the build script
pub const RUNTIME_LIB: &str = env!("SYSGATE_RUNTIME_LIB");

/// C entry points every runtime archive must define
pub const EXPORTED_SYMBOLS: [&str; 2] = ["sysgate_write", "sysgate_exit_with"];

/// Defined global symbols of the archive that belong to the C entry points
pub fn exported_symbols(archive: &[u8]) -> Result<Vec<String>> {
    let archive_file = ArchiveFile::parse(archive)?;
    let mut found = Vec::new();

    for member in archive_file.members() {
        let member = member?;
        // Members that are not objects (symbol tables, metadata) carry nothing to link.
        let Ok(file) = object::File::parse(member.data(archive)?) else {
            continue;
        };
        for symbol in file.symbols() {
            if !symbol.is_definition() || !symbol.is_global() {
                continue;
            }
            if let Ok(name) = symbol.name() {
                if EXPORTED_SYMBOLS.contains(&name) && !found.iter().any(|f| f == name) {
                    found.push(name.to_string());
                }
            }
        }
    }

    Ok(found)
}

/// Read the runtime archive and return its path with the entry points it defines
pub fn inspect() -> Result<(&'static Path, Vec<String>)> {
    let path = Path::new(RUNTIME_LIB);
    let bytes = fs::read(path).map_err(|source| Error::Io { op: "read", path: path.to_path_buf(), source })?;
    let symbols = exported_symbols(&bytes)?;
    if symbols.len() != EXPORTED_SYMBOLS.len() {
        return Err(Error::MissingExports(path.to_path_buf()));
    }
    Ok((path, symbols))
}
