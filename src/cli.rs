/// CLI commands: ABI listing, trampoline dumps, artifact emission, and the native runtime
use crate::codegen::executable::{generate_executable, EchoProgram};
use crate::codegen::relocatable::compile_object;
use crate::codegen::{detect_host_target, Encoded, Target};
use crate::error::{Error, Result};
use crate::jit_runner::{JitRunner, JitRunnerTrt};
use crate::runtime_archive;
use clap::{Parser, Subcommand};
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;
use sysgate_runtime::{exit_with, write_status, FileDescriptor, WriteStatus, STDOUT};

#[derive(Parser, Debug)]
#[command(name = "sysgate", version)]
#[command(about = "Linux syscall trampolines for x86-64 and aarch64", arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the syscall register convention
    Abi {
        #[arg(long, default_value_t = detect_host_target())]
        target: Target,
    },
    /// List the trampolines' machine code
    Dump {
        #[arg(long, default_value_t = detect_host_target())]
        target: Target,
    },
    /// Emit a relocatable object with the trampolines
    Object {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = detect_host_target())]
        target: Target,
    },
    /// Emit a static executable that writes then exits
    Exe {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = detect_host_target())]
        target: Target,
        #[arg(long, default_value_t = STDOUT)]
        fd: FileDescriptor,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        status: i64,
        /// Bytes of the message to write (defaults to all of it)
        #[arg(long)]
        count: Option<usize>,
        message: String,
    },
    /// Write each message with the native runtime, then exit
    Echo {
        #[arg(long, default_value_t = STDOUT)]
        fd: FileDescriptor,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        status: i64,
        #[arg(long)]
        count: Option<usize>,
        messages: Vec<String>,
    },
    /// Write each message through emitted code in-process
    Jit {
        #[arg(long, default_value_t = STDOUT)]
        fd: FileDescriptor,
        #[arg(long)]
        count: Option<usize>,
        messages: Vec<String>,
    },
    /// Exit immediately with <STATUS>
    Exit {
        #[arg(allow_negative_numbers = true)]
        status: i64,
    },
    /// Show the prebuilt no_std runtime archive and its C entry points
    Runtime,
}

/// Render a trampoline as an offset / hex / mnemonic listing
pub fn format_listing(name: &str, sequence: &[Encoded]) -> String {
    let mut out = format!("{}:\n", name);
    let mut offset = 0;
    for inst in sequence {
        let hex: Vec<String> = inst.bytes.iter().map(|b| format!("{:02x}", b)).collect();
        out.push_str(&format!("  {:04x}  {:<30} {}\n", offset, hex.join(" "), inst.mnemonic));
        offset += inst.bytes.len();
    }
    out
}

pub fn run(command: Command) -> Result<()> {
    debug!("running command: {:?}", command);
    match command {
        Command::Abi { target } => {
            for row in target.abi().describe() {
                println!("{}", row);
            }
        }
        Command::Dump { target } => {
            let backend = target.backend();
            print!("{}", format_listing("write", &backend.write_sequence()));
            print!("{}", format_listing("exit_with", &backend.exit_with_sequence()));
        }
        Command::Object { output, target } => {
            let artifact = compile_object(target)?;
            fs::write(&output, &artifact.bytes).map_err(|source| Error::Io { op: "write", path: output.clone(), source })?;
            println!("Wrote {} object '{}' ({} bytes)", target, output.display(), artifact.bytes.len());
        }
        Command::Exe { output, target, fd, status, count, message } => {
            let mut program = EchoProgram::new(message).with_fd(fd).with_status(status);
            if let Some(count) = count {
                program = program.with_count(count);
            }
            generate_executable(target, &program, &output)?;
            println!("Wrote {} executable '{}'", target, output.display());
        }
        Command::Echo { fd, status, count, messages } => echo(fd, count, status, &messages),
        Command::Jit { fd, count, messages } => {
            for message in &messages {
                let count = count.unwrap_or(message.len());
                let raw = JitRunner::call_write(detect_host_target(), fd, message.as_bytes(), count)?;
                report(fd, count, WriteStatus::from_raw(raw, count))?;
            }
        }
        Command::Exit { status } => exit_with(status),
        Command::Runtime => {
            let (path, symbols) = runtime_archive::inspect()?;
            println!("{}", path.display());
            for symbol in symbols {
                println!("  {}", symbol);
            }
        }
    }
    Ok(())
}

fn report(fd: FileDescriptor, count: usize, status: WriteStatus) -> Result<()> {
    match status {
        WriteStatus::Complete { .. } => Ok(()),
        WriteStatus::Partial { written } => {
            warn!("short write on fd {}: {} of {} bytes", fd, written, count);
            Ok(())
        }
        WriteStatus::Failed(errno) => Err(Error::Write { fd, errno }),
    }
}

/// Writes through the runtime trampolines and leaves through `exit_with`; never returns.
fn echo(fd: FileDescriptor, count: Option<usize>, status: i64, messages: &[String]) -> ! {
    for message in messages {
        let bytes = message.as_bytes();
        let count = count.unwrap_or(bytes.len());
        if let Err(e) = report(fd, count, write_status(fd, bytes, count)) {
            eprintln!("Error: {}", e);
            exit_with(1);
        }
    }
    exit_with(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("sysgate").chain(args.iter().copied())).map(|cli| cli.command)
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_exe_with_all_flags() {
        let command = parse(&["exe", "-o", "out", "--target", "arm64", "--fd", "2", "--status", "7", "--count", "1", "ab"]).unwrap();
        assert_eq!(
            command,
            Command::Exe {
                output: PathBuf::from("out"),
                target: Target::Aarch64Linux,
                fd: 2,
                status: 7,
                count: Some(1),
                message: "ab".to_string(),
            }
        );
    }

    #[test]
    fn echo_keeps_messages_in_order() {
        let command = parse(&["echo", "foo", "bar"]).unwrap();
        assert_eq!(
            command,
            Command::Echo { fd: 1, status: 0, count: None, messages: vec!["foo".to_string(), "bar".to_string()] }
        );
    }

    #[test]
    fn double_dash_ends_options() {
        let command = parse(&["echo", "--", "--status", "-1"]).unwrap();
        assert_eq!(
            command,
            Command::Echo { fd: 1, status: 0, count: None, messages: vec!["--status".to_string(), "-1".to_string()] }
        );
    }

    #[test]
    fn negative_statuses_are_values() {
        assert_eq!(parse(&["exit", "42"]).unwrap(), Command::Exit { status: 42 });
        assert_eq!(parse(&["exit", "-3"]).unwrap(), Command::Exit { status: -3 });
        assert!(matches!(parse(&["echo", "--status", "-1", "hi"]).unwrap(), Command::Echo { status: -1, .. }));
        assert_eq!(parse(&["exit"]).unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn defaults_to_host_target() {
        assert_eq!(parse(&["abi"]).unwrap(), Command::Abi { target: detect_host_target() });
        assert_eq!(parse(&["dump", "--target", "x86-64"]).unwrap(), Command::Dump { target: Target::X86_64Linux });
    }

    #[test]
    fn usage_errors() {
        assert_eq!(parse(&["object"]).unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse(&["dump", "--target", "mips"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["echo", "--fd", "x", "hi"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["echo", "--fd"]).is_err());
        assert!(parse(&["exe", "-o", "out", "a", "b"]).is_err());
    }

    #[test]
    fn listing_shows_offsets_bytes_and_mnemonics() {
        let listing = format_listing("write", &Target::X86_64Linux.backend().write_sequence());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "write:");
        assert!(lines[1].starts_with("  0000  48 c7 c0 01 00 00 00"));
        assert!(lines[1].ends_with("mov rax, 1"));
        assert!(lines[2].starts_with("  0007  0f 05") && lines[2].ends_with("syscall"));
        assert!(lines[3].starts_with("  0009  c3") && lines[3].ends_with("ret"));
    }
}
