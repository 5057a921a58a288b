//! # garp common
//!
//! Shared building blocks for the gratuitous ARP broadcaster:
//!
//! * **[`config`]**: the immutable [`config::BroadcastPolicy`] and process-level [`config::Config`].
//! * **[`network`]**: the addresses handed to the broadcaster.
//! * **[`system`]**: ports for the outside world (filesystem, processes, time).
//! * **[`error`]**: every error type the workspace reports.

pub mod config;
pub mod error;
pub mod network;
pub mod system;
