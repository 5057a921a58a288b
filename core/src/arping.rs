//! # Gratuitous ARP Broadcaster
//!
//! Announces IP-to-MAC bindings right after interfaces are configured so that
//! switches and peers drop stale ARP cache entries.
//!
//! A broadcast is a number of **passes** over the supplied addresses. For every
//! address a pass:
//! 1. waits for the interface to appear below the sysfs root,
//! 2. resolves the IP to announce,
//! 3. runs `arping -c 1 -U -I <interface> <ip>` once.
//!
//! Any failure only skips that address for that pass. It is logged under the
//! `arping` target and never reaches the caller: failing to announce must not
//! hold up network bring-up.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use garp_common::config::{BroadcastPolicy, Config};
use garp_common::error::BroadcastError;
use garp_common::network::address::InterfaceAddress;
use garp_common::system::{CmdRunner, FileSystem, Sleeper};

use crate::system::{OsFileSystem, ProcessCmdRunner, ThreadSleeper};

const ARPING_LOG_TAG: &str = "arping";

/// Result of announcing one address during one pass.
#[derive(Debug)]
pub enum BroadcastOutcome {
    Announced { interface: String, ip: String },
    Failed(BroadcastError),
}

pub struct Arping<R, F, S> {
    cmd_runner: R,
    fs: F,
    sleeper: S,
    sys_class_net: PathBuf,
    arping_bin: String,
    policy: BroadcastPolicy,
}

impl Arping<ProcessCmdRunner, OsFileSystem, ThreadSleeper> {
    /// A broadcaster wired to the real system.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(ProcessCmdRunner, OsFileSystem, ThreadSleeper, cfg)
    }
}

impl<R, F, S> Arping<R, F, S>
where
    R: CmdRunner,
    F: FileSystem,
    S: Sleeper,
{
    pub fn new(cmd_runner: R, fs: F, sleeper: S, cfg: &Config) -> Self {
        Self {
            cmd_runner,
            fs,
            sleeper,
            sys_class_net: cfg.sys_class_net.clone(),
            arping_bin: cfg.arping_bin.clone(),
            policy: cfg.policy,
        }
    }

    /// Announces every address, `iterations` times, sleeping `iteration_delay`
    /// between passes but not after the last one.
    pub fn broadcast_mac_addresses<A: InterfaceAddress>(&self, addresses: &[A]) {
        let iterations = self.policy.iterations();

        for i in 0..iterations {
            debug!(target: ARPING_LOG_TAG, "Broadcast pass {}/{} over {} address(es)", i + 1, iterations, addresses.len());
            self.broadcast_mac_addresses_once(addresses);

            if i + 1 < iterations {
                self.sleeper.sleep(self.policy.iteration_delay());
            }
        }
    }

    fn broadcast_mac_addresses_once<A: InterfaceAddress>(&self, addresses: &[A]) {
        for address in addresses {
            match self.broadcast_mac_address(address) {
                BroadcastOutcome::Announced { interface, ip } => {
                    debug!(target: ARPING_LOG_TAG, "Announced {ip} on {interface}");
                }
                BroadcastOutcome::Failed(err) => {
                    info!(target: ARPING_LOG_TAG, "{err}");
                }
            }
        }
    }

    /// Blocks until `<sys_class_net>/<interface_name>` exists.
    ///
    /// Checks once before sleeping, so a present interface costs no delay.
    /// Without an interface timeout this never returns an error.
    pub fn block_until_interface_exists(&self, interface_name: &str) -> Result<(), BroadcastError> {
        let path = self.sys_class_net.join(interface_name);
        let check_delay = self.policy.interface_check_delay();
        let timeout = self.policy.interface_timeout();
        let mut waited = Duration::ZERO;

        while !self.fs.file_exists(&path) {
            let step = match timeout {
                Some(timeout) if waited >= timeout => {
                    return Err(BroadcastError::InterfaceTimeout {
                        interface: interface_name.to_string(),
                        waited,
                    });
                }
                Some(timeout) => check_delay.min(timeout - waited),
                None => check_delay,
            };

            if waited.is_zero() {
                debug!(target: ARPING_LOG_TAG, "Waiting for interface {interface_name} to appear at {}", path.display());
            }

            self.sleeper.sleep(step);
            waited += step;
        }

        Ok(())
    }

    /// Announces a single address once. Never retries; the next pass does.
    pub fn broadcast_mac_address<A: InterfaceAddress>(&self, address: &A) -> BroadcastOutcome {
        let interface = address.interface_name();

        if let Err(err) = self.block_until_interface_exists(interface) {
            return BroadcastOutcome::Failed(err);
        }

        let ip = match address.ip() {
            Ok(ip) => ip,
            Err(err) => return BroadcastOutcome::Failed(BroadcastError::AddressResolution(err)),
        };

        let args = ["-c", "1", "-U", "-I", interface, ip.as_str()];
        if let Err(err) = self.cmd_runner.run_command(&self.arping_bin, &args) {
            return BroadcastOutcome::Failed(BroadcastError::Announcement(err));
        }

        BroadcastOutcome::Announced {
            interface: interface.to_string(),
            ip,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
