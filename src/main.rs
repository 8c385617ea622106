use anyhow::Result;
use clap::Parser;
use tagwm::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence, then RUST_LOG, then warn.
    tagwm::debug::init_log_bridge(cli.log_level.map(cli::LogLevelArg::to_level_filter));
    log::debug!("tagwm {}", tagwm::VERSION);

    let code = cli::run(cli)?;
    if code != 0 {
        // Nothing is left to clean up, so exiting directly is fine.
        std::process::exit(code);
    }
    Ok(())
}
