pub mod announce;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use garp_common::config::{
    BroadcastPolicy, Config, DEFAULT_ARPING_BIN, DEFAULT_ITERATIONS, DEFAULT_SYS_CLASS_NET,
};
use garp_common::network::address::AddressSpec;

#[derive(Parser)]
#[command(name = "garp")]
#[command(about = "Announce IP-to-MAC bindings with gratuitous ARP.")]
pub struct CommandLine {
    /// Interfaces to announce on, as `eth0` (use its current IPv4) or `eth0=10.0.0.5`
    #[arg(required = true)]
    pub addresses: Vec<AddressSpec>,

    /// Number of passes over all addresses
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// Pause between passes, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub iteration_delay_ms: u64,

    /// Poll interval while waiting for an interface to appear, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub check_delay_ms: u64,

    /// Skip an interface that has not appeared after this many milliseconds
    #[arg(long)]
    pub interface_timeout_ms: Option<u64>,

    /// Abort the whole broadcast after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Directory listing present network interfaces
    #[arg(long, default_value = DEFAULT_SYS_CLASS_NET)]
    pub sys_class_net: PathBuf,

    /// arping executable
    #[arg(long, default_value = DEFAULT_ARPING_BIN)]
    pub arping: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> anyhow::Result<Config> {
        let mut policy = BroadcastPolicy::new(
            self.iterations,
            Duration::from_millis(self.iteration_delay_ms),
            Duration::from_millis(self.check_delay_ms),
        )?;

        if let Some(ms) = self.interface_timeout_ms {
            policy = policy.with_interface_timeout(Duration::from_millis(ms))?;
        }

        Ok(Config {
            sys_class_net: self.sys_class_net.clone(),
            arping_bin: self.arping.clone(),
            policy,
        })
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
