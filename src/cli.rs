use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "thumbforge")]
#[command(author, version, about = "Image resize and center-crop thumbnail service")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resize a local image to exact dimensions
    Resize {
        /// Image to resize
        #[arg(required = true)]
        input: PathBuf,

        /// Target width in pixels
        #[arg(long)]
        width: u32,

        /// Target height in pixels
        #[arg(long)]
        height: u32,

        /// Output file (defaults to `resized-<name>` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a center-cropped JPEG thumbnail from a local image
    Thumbnail {
        /// Source image
        #[arg(required = true)]
        input: PathBuf,

        /// Thumbnail width in pixels
        #[arg(long, default_value = "200")]
        width: u32,

        /// Thumbnail height in pixels
        #[arg(long, default_value = "200")]
        height: u32,

        /// Output file (defaults to `thumb-<stem>.jpg` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
