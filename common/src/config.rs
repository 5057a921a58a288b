use std::path::PathBuf;
use std::time::Duration;

use crate::error::PolicyError;

pub const DEFAULT_ITERATIONS: u32 = 6;
pub const DEFAULT_ITERATION_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_INTERFACE_CHECK_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_SYS_CLASS_NET: &str = "/sys/class/net";
pub const DEFAULT_ARPING_BIN: &str = "arping";

/// How often and how patiently addresses are announced.
///
/// Built once and never mutated, so one broadcaster can be reused across
/// calls with identical behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastPolicy {
    iterations: u32,
    iteration_delay: Duration,
    interface_check_delay: Duration,
    interface_timeout: Option<Duration>,
}

impl BroadcastPolicy {
    /// Creates a policy that waits for interfaces without bound.
    ///
    /// Fails if `interface_check_delay` is zero, which would turn the readiness
    /// poll into a busy loop.
    pub fn new(
        iterations: u32,
        iteration_delay: Duration,
        interface_check_delay: Duration,
    ) -> Result<Self, PolicyError> {
        if interface_check_delay.is_zero() {
            return Err(PolicyError::ZeroCheckDelay);
        }

        Ok(Self {
            iterations,
            iteration_delay,
            interface_check_delay,
            interface_timeout: None,
        })
    }

    /// Stops waiting for a missing interface after `timeout` and skips the address.
    pub fn with_interface_timeout(mut self, timeout: Duration) -> Result<Self, PolicyError> {
        if timeout.is_zero() {
            return Err(PolicyError::ZeroTimeout);
        }
        self.interface_timeout = Some(timeout);
        Ok(self)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn iteration_delay(&self) -> Duration {
        self.iteration_delay
    }

    pub fn interface_check_delay(&self) -> Duration {
        self.interface_check_delay
    }

    /// `None` means the readiness gate blocks until the interface shows up.
    pub fn interface_timeout(&self) -> Option<Duration> {
        self.interface_timeout
    }
}

impl Default for BroadcastPolicy {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            iteration_delay: DEFAULT_ITERATION_DELAY,
            interface_check_delay: DEFAULT_INTERFACE_CHECK_DELAY,
            interface_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one entry per present network interface.
    pub sys_class_net: PathBuf,
    /// Program invoked to send a single unsolicited ARP reply.
    pub arping_bin: String,
    pub policy: BroadcastPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sys_class_net: PathBuf::from(DEFAULT_SYS_CLASS_NET),
            arping_bin: DEFAULT_ARPING_BIN.to_string(),
            policy: BroadcastPolicy::default(),
        }
    }
}
