use std::process::ExitCode;

use copy_backends::{copy_backends, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let summary = copy_backends(&config)?;
    info!(
        count = summary.copied.len(),
        bytes = summary.total_bytes,
        bin_dir = %config.bin_dir().display(),
        "backends installed"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
