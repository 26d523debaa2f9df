use crate::config::load_config;
use crate::run::{run, Mode, PlotError};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Compare cubvec-bench vs pgvector-bench results for one metric, reading
/// every run file in ./cubvec-bench and ./pgvector-bench and writing one
/// chart per vector dimension under ./plots.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Metric name, e.g. "SELECT TIME"
    #[arg(value_name = "METRIC")]
    pub metric: String,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}

fn plot(cli: &Cli, mode: Mode) -> Result<(), PlotError> {
    let config = load_config(Path::new("."))?;
    run(&config, &cli.metric, mode)?;
    Ok(())
}

/// Entry point shared by `plot-bench` and `plot-bench-interactive`.
pub fn main(mode: Mode) -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    tracing::debug!(?cli, ?mode, "parsed CLI arguments");

    match plot(&cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "plotting failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
