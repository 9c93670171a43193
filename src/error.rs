use crate::codegen::Target;
use std::io;
use std::path::PathBuf;
use sysgate_runtime::{Errno, FileDescriptor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to {} '{}': {}", .op, .path.display(), .source)]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build object file: {0}")]
    Object(#[from] object::write::Error),

    #[error("failed to read runtime archive: {0}")]
    Archive(#[from] object::read::Error),

    #[error("runtime archive '{}' is missing its C entry points", .0.display())]
    MissingExports(PathBuf),

    #[error("unknown target '{0}' (expected x86_64 or aarch64)")]
    InvalidTarget(String),

    #[error("count {count} exceeds message length {len}")]
    CountExceedsMessage { count: usize, len: usize },

    #[error("write to fd {fd} failed: {errno}")]
    Write { fd: FileDescriptor, errno: Errno },

    #[error("cannot execute {0} code on this host")]
    ForeignTarget(Target),

    #[error("failed to map executable memory: {0}")]
    Map(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
