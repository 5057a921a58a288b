use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::debug;

use garp_common::error::CmdError;
use garp_common::system::{CmdOutput, CmdRunner, FileSystem, Sleeper};

pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub struct ProcessCmdRunner;

impl CmdRunner for ProcessCmdRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CmdOutput, CmdError> {
        debug!("Running command: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CmdError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal
            status: output.status.code().unwrap_or(-1),
        };

        if !output.status.success() {
            return Err(CmdError::NonZeroExit {
                program: program.to_string(),
                status: result.status,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
