//! Atelier CLI binary.
//!
//! Runs a single generation node from the command line and prints each
//! state transition as the node would render it.

use atelier_core::TelemetryOptions;
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, GenerateOptions, run_generate, show_config};

    let cli = Cli::parse();

    atelier_core::init_telemetry(TelemetryOptions {
        verbose: cli.verbose,
        export_spans: cli.telemetry,
    })
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    let result = match cli.command {
        Commands::Generate {
            kind,
            prompt,
            negative_prompt,
            aspect_ratio,
            style,
            model,
            images,
            credits,
        } => {
            run_generate(GenerateOptions {
                kind,
                prompt,
                negative_prompt,
                aspect_ratio,
                style,
                model,
                images,
                credits,
            })
            .await
        }

        Commands::Config => show_config(),
    };

    if cli.telemetry {
        atelier_core::shutdown_telemetry();
    }

    result
}
