//! Writes a generated target set to a file, one target per line.

use std::path::PathBuf;

use clap::Parser;
use pingsweep::targets::{DEFAULT_GENERATED_TARGETS, generate_targets};

/// Generate a shuffled target list for pingsweep
#[derive(Parser, Debug)]
#[command(name = "gen-targets", version, about, long_about = None)]
struct Cli {
    /// Output file
    #[arg(short, long, default_value = "targets.txt")]
    out: PathBuf,

    /// Number of targets to generate
    #[arg(short, long, default_value_t = DEFAULT_GENERATED_TARGETS)]
    count: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let targets = generate_targets(cli.count);

    let mut content = targets.join("\n");
    content.push('\n');
    std::fs::write(&cli.out, content)?;

    tracing::info!("Wrote {} targets to {}", targets.len(), cli.out.display());
    Ok(())
}
