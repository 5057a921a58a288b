use std::time::Duration;

use thiserror::Error;

/// Failure to obtain the IP literal of an interface address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("network interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("network interface '{0}' has no IPv4 address")]
    NoIpv4Address(String),

    #[error("invalid address: {0}")]
    Invalid(String),
}

/// Failure reported by a [`crate::system::CmdRunner`].
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: i32,
        stderr: String,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("interface check delay must be greater than zero")]
    ZeroCheckDelay,

    #[error("interface timeout must be greater than zero")]
    ZeroTimeout,
}

/// Why a single address was skipped during one pass.
///
/// None of these ever reach the caller of a broadcast; they are logged and
/// the pass moves on to the next address.
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Ignoring GetIP failure: {0}")]
    AddressResolution(#[source] ResolveError),

    #[error("Ignoring arping failure: {0}")]
    Announcement(#[source] CmdError),

    #[error("Giving up waiting for interface '{interface}' after {waited:?}")]
    InterfaceTimeout { interface: String, waited: Duration },
}
