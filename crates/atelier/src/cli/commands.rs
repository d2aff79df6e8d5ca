//! CLI command definitions.

use atelier_core::{AspectRatio, NodeKind, Style};
use clap::{Parser, Subcommand};

/// Atelier - run text, image and video generation nodes from the terminal
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Run text, image and video generation nodes from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Export spans to stdout through OpenTelemetry
    #[arg(long, global = true)]
    pub telemetry: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one generation and print every state transition
    Generate {
        /// Node kind (text, image, video)
        #[arg(long)]
        kind: NodeKind,

        /// Prompt text
        #[arg(long, default_value = "")]
        prompt: String,

        /// Things the image should avoid
        #[arg(long)]
        negative_prompt: Option<String>,

        /// Image aspect ratio (e.g., 16:9)
        #[arg(long)]
        aspect_ratio: Option<AspectRatio>,

        /// Image style (auto, general, realistic, design, render_3D, anime)
        #[arg(long)]
        style: Option<Style>,

        /// Model id (defaults to the configured model for the kind)
        #[arg(long)]
        model: Option<String>,

        /// Input image URL for video nodes (repeat for each slot)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Credits available to the in-memory ledger
        #[arg(long, default_value = "10")]
        credits: u32,
    },

    /// Print the resolved configuration as TOML
    Config,
}
