use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=targets/linux/runtime/Cargo.toml");
    println!("cargo:rerun-if-changed=targets/linux/runtime/src");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let profile = env::var("PROFILE").expect("PROFILE not set");

    // The no_std archive has no unwinder.
    let mut rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    if !rustflags.contains("panic=abort") {
        if !rustflags.trim().is_empty() {
            rustflags.push(' ');
        }
        rustflags.push_str("-C panic=abort");
    }

    let runtime_target_dir = manifest_dir.join("target").join("runtime-build");
    let mut command = Command::new(&cargo);
    command
        .current_dir(&manifest_dir)
        .env("RUSTFLAGS", rustflags)
        .env("CARGO_TARGET_DIR", &runtime_target_dir)
        .env_remove("CARGO_MAKEFLAGS")
        .env_remove("MAKEFLAGS")
        .env_remove("CARGO_ENCODED_RUSTFLAGS")
        .args(["build", "-p", "sysgate-runtime", "--no-default-features"]);

    if profile == "release" {
        command.arg("--release");
    }

    let status = command.status().expect("Failed to invoke cargo build for sysgate-runtime");
    if !status.success() {
        panic!("Building sysgate-runtime failed with status {}", status);
    }

    let lib_path = runtime_target_dir.join(&profile).join("libsysgate_runtime.a");
    if !lib_path.exists() {
        panic!("Expected runtime static library at {}, but it was not found", lib_path.display());
    }
    let lib_path = lib_path.canonicalize().unwrap_or_else(|_| lib_path.clone());

    println!("cargo:rustc-env=SYSGATE_RUNTIME_LIB={}", lib_path.display());
    println!("cargo:rerun-if-env-changed=RUSTFLAGS");
}
