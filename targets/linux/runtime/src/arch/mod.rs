#[cfg(not(target_os = "linux"))]
compile_error!("sysgate-runtime only speaks the Linux syscall ABI");

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
pub use x86_64::*;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use aarch64::*;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("sysgate-runtime supports x86_64 and aarch64 only");
