use anyhow::Result;
use colored::Colorize;

use dataproc_url::{cli, config::Config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args();

    // Config supplies the default verbosity, the flag wins
    let config = Config::load()?;
    let verbosity = args.verbosity.or(config.verbosity).unwrap_or(0);

    let guard = logging::init(verbosity, args.dev)?;
    let result = cli::run(args, config).await;

    // Flush the dev log file before a non-zero exit skips destructors
    drop(guard);

    if let Err(e) = result {
        eprintln!("{} {:#}", "❌ Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
