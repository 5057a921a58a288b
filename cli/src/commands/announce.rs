use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use colored::*;
use tracing::{info, warn};

use garp_common::config::Config;
use garp_common::network::address::{AddressSpec, InterfaceAddress};
use garp_core::arping::Arping;
use garp_core::resolver::PnetIpResolver;

/// Runs the blocking broadcast off the async runtime, racing it against
/// Ctrl-C and the optional overall `deadline`.
///
/// On interrupt or deadline the broadcast thread is left running; the caller
/// must shut the runtime down with `shutdown_background`.
pub async fn announce(
    specs: Vec<AddressSpec>,
    cfg: Config,
    deadline: Option<Duration>,
) -> anyhow::Result<()> {
    if !is_root::is_root() {
        warn!("Not running as root, arping will likely fail to open a raw socket");
    }

    let address_count = specs.len();
    let iterations = cfg.policy.iterations();
    let start_time = Instant::now();

    let broadcast = tokio::task::spawn_blocking(move || {
        let addresses: Vec<Box<dyn InterfaceAddress>> = specs
            .into_iter()
            .map(|spec| spec.into_address(PnetIpResolver))
            .collect();

        Arping::from_config(&cfg).broadcast_mac_addresses(&addresses);
    });

    let deadline_elapsed = async {
        match deadline {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        res = broadcast => {
            res.context("broadcast task failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning the broadcast");
            bail!("interrupted before the broadcast finished");
        }
        _ = deadline_elapsed => {
            let limit = deadline.unwrap_or_default();
            warn!("Deadline of {limit:?} reached, abandoning the broadcast");
            bail!("broadcast did not finish within {limit:?}");
        }
    }

    let passes = format!("{iterations} pass(es)").bold().green();
    let addresses = format!("{address_count} address(es)").bold().green();
    let total_time = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    info!("Broadcast complete: {passes} over {addresses} in {total_time}");

    Ok(())
}
