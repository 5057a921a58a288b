//! # Outbound Ports
//!
//! Contracts for everything the broadcaster needs from the operating system.
//! Concrete implementations live in `garp_core::system`; tests substitute fakes.

use std::path::Path;
use std::time::Duration;

use crate::error::CmdError;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

pub trait FileSystem {
    /// Must not block and must not have side effects.
    fn file_exists(&self, path: &Path) -> bool;
}

pub trait CmdRunner {
    /// Runs `program` to completion.
    ///
    /// A non-zero exit status is reported as [`CmdError::NonZeroExit`].
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CmdOutput, CmdError>;
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}
