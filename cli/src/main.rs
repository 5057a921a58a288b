mod commands;
mod terminal;

use commands::{CommandLine, announce};
use terminal::logging;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.to_config()?;
    let deadline = commands.deadline();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(announce::announce(commands.addresses, cfg, deadline));

    // A broadcast still waiting on an interface must not keep the process alive.
    runtime.shutdown_background();

    result
}
