//! The gratuitous ARP broadcaster.
//!
//! [`arping::Arping`] is the orchestrator; [`system`] and [`resolver`] hold the
//! operating system adapters for the ports declared in `garp_common::system`.

pub mod arping;
pub mod resolver;
pub mod system;
