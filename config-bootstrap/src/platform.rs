// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Platform Abstraction Module
//!
//! Platform-specific abstractions for operating system functionality.
//!
//! ## Architecture Pattern
//!
//! Following hexagonal architecture principles:
//! - **Interface**: `Platform` trait defines the contract
//! - **Implementations**:
//!   - `UnixPlatform`: POSIX implementation (Linux + macOS)
//!   - `WindowsPlatform`: Windows API implementation
//! - **Selection**: Compile-time platform selection via `#[cfg]`
//!
//! ## Usage
//!
//! ```rust
//! use config_bootstrap::platform::create_platform;
//!
//! let platform = create_platform();
//! println!("Running on: {}", platform.platform_name());
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(unix)]
mod unix;

#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixPlatform;

#[cfg(windows)]
pub use windows::WindowsPlatform;

/// Platform-specific errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not supported on this platform: {0}")]
    NotSupported(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Platform error: {0}")]
    Other(String),
}

/// Platform abstraction trait for OS-specific operations.
///
/// Allows the bootstrap layer to work with different operating systems
/// without conditional compilation throughout the codebase.
pub trait Platform: Send + Sync {
    /// Number of logical CPU cores available to the process.
    fn cpu_count(&self) -> usize;

    /// Platform-specific line separator (`"\n"` on Unix, `"\r\n"` on Windows).
    fn line_separator(&self) -> &'static str;

    /// Platform identifier: `"linux"`, `"macos"`, `"windows"`, etc.
    fn platform_name(&self) -> &'static str;

    /// Platform-specific temporary directory.
    fn temp_dir(&self) -> PathBuf;

    /// Whether the current process is running with elevated privileges
    /// (root on Unix, Administrator on Windows).
    fn is_elevated(&self) -> bool;

    /// Set file permissions. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), PlatformError>;

    /// Sets the process-wide file-creation mask, returning the previous
    /// mask. Unix-only; on Windows returns `PlatformError::NotSupported`,
    /// which callers must treat as non-fatal (§4.B — the daemon logs a
    /// warning and continues startup regardless of the outcome).
    fn set_process_umask(&self, mode: u32) -> Result<u32, PlatformError>;
}

#[cfg(unix)]
type PlatformImpl = UnixPlatform;

#[cfg(windows)]
type PlatformImpl = WindowsPlatform;

/// Creates the platform-specific implementation, selected at compile time.
pub fn create_platform() -> Box<dyn Platform> {
    Box::new(PlatformImpl::new())
}
