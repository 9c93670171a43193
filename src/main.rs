mod cli;
mod codegen;
mod error;
mod jit_runner;
mod runtime_archive;

use clap::Parser;
use cli::{run, Cli};
use env_logger::Env;
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
