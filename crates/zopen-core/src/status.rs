//! Status codes carried by stage failures.
//!
//! When the operating system reported an error number it is passed through
//! unchanged; otherwise each kind of failure has a fixed code below.

use std::io;

/// Creating the `boot`/`prod`/`dev` skeleton failed.
pub const PROVISION_FAILED: u8 = 12;

/// Release metadata could not be used to find the archive name.
pub const METADATA_FAILED: u8 = 14;

/// The HTTPS transfer failed (connection, TLS, or HTTP status).
pub const FETCH_FAILED: u8 = 16;

/// Unpacking an archive failed.
pub const EXTRACT_FAILED: u8 = 20;

/// A symbolic link could not be created.
pub const LINK_FAILED: u8 = 24;

/// Writing the boot environment descriptor failed.
pub const BOOTENV_FAILED: u8 = 28;

/// Map an I/O error to an exit status, falling back to `fallback` when the
/// error carries no usable OS error number.
pub fn os_status(err: &io::Error, fallback: u8) -> u8 {
    match err.raw_os_error() {
        Some(code) if (1..=255).contains(&code) => code as u8,
        _ => fallback,
    }
}

/// Map a child process exit code the same way.
pub fn exit_status(code: Option<i32>, fallback: u8) -> u8 {
    match code {
        Some(code) if (1..=255).contains(&code) => code as u8,
        _ => fallback,
    }
}
