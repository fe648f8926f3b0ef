use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagemark::error::ReplayError;
use pagemark::replay::{self, ReplayScript};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pagemark-replay", about = "Replay a recorded annotation session and print the resulting annotations")]
struct Cli {
    /// Path to a JSON replay script.
    script: PathBuf,

    /// Log filter, e.g. `info` or `pagemark=trace`.
    #[arg(long, env = "PAGEMARK_LOG", default_value = "warn")]
    log_level: String,

    /// Print the full report instead of only the annotations.
    #[arg(long)]
    report: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "replay failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, ReplayError> {
    let script = ReplayScript::load(&cli.script)?;
    let report = replay::run(&script)?;
    let output = if cli.report {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.annotations)?
    };
    Ok(output)
}
