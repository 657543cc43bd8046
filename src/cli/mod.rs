// CLI module for wildlife-id
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wildlife-id - Identify wildlife species and their conservation status from a photo
#[derive(Parser, Debug)]
#[command(name = "wildlife-id", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.wildlife-id/config.toml)
    #[arg(long, global = true, env = "WILDLIFE_ID_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Identify the animal in a single image (JPEG, PNG, GIF or WEBP, up to 5MB)
    Identify {
        /// Image file to analyze
        image: PathBuf,

        /// Print the raw identification as JSON
        #[arg(long)]
        json: bool,

        /// Override the configured Gemini model
        #[arg(long)]
        model: Option<String>,
    },

    /// Serve the identification session over HTTP
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}
