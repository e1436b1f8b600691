// Entrypoint for the CLI application.
// - Loads `config.yml`, builds a client for the active profile and uploads
//   every file named on the command line.
// - Per-file failures are printed, not returned: the exit code stays 0.

use anyhow::Context;
use imgup_cli::{config, run, ApiClient, Configuration};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = config::default_path()?;
    let config = Configuration::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let api = ApiClient::new(config.active_profile()).context("Failed to build HTTP client")?;

    let stdout = std::io::stdout();
    run(&api, std::env::args_os().skip(1), &mut stdout.lock())?;
    Ok(())
}
