mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::{Path, PathBuf};
use tf_core::config::{Config, LogFormat};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref());
    config.apply_env();

    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Start { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let metrics = install_metrics_recorder();
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config, metrics))
        }
        Commands::Resize {
            input,
            width,
            height,
            output,
        } => resize_file(&input, width, height, output),
        Commands::Thumbnail {
            input,
            width,
            height,
            output,
        } => thumbnail_file(&input, width, height, output),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("thumbforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Respect RUST_LOG if set, then the config filter, then defaults based on
/// the verbose flag.
fn init_logging(config: &Config, verbose: bool) {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config.logging.filter.clone())
        .unwrap_or_else(|| {
            if verbose {
                "thumbforge=trace,tf_server=trace,tf_imaging=trace,tf_core=debug,tower_http=debug"
                    .to_string()
            } else {
                "thumbforge=debug,tf_server=debug,tf_imaging=info,tf_core=info,tower_http=info"
                    .to_string()
            }
        });

    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(env_filter));
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn install_metrics_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Metrics disabled: {e}");
            None
        }
    }
}

async fn start_server(config: Config, metrics: Option<PrometheusHandle>) -> Result<()> {
    tracing::info!("Starting thumbforge server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    tf_server::start(config, metrics).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

fn resize_file(input: &Path, width: u32, height: u32, output: Option<PathBuf>) -> Result<()> {
    let data = read_input(input)?;
    let resized = tf_imaging::resize_bytes(&data, width, height)?;

    let output = output.unwrap_or_else(|| {
        let stem = file_stem(input);
        let ext = resized.format.extensions_str().first().copied().unwrap_or("png");
        input.with_file_name(format!("resized-{stem}.{ext}"))
    });

    std::fs::write(&output, &resized.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Resized to {width}x{height} ({})", resized.media_type());
    println!("Output: {}", output.display());
    Ok(())
}

fn thumbnail_file(input: &Path, width: u32, height: u32, output: Option<PathBuf>) -> Result<()> {
    let data = read_input(input)?;
    let thumbnail = tf_imaging::generate_thumbnail_bytes(&data, width, height)?;

    let output = output
        .unwrap_or_else(|| input.with_file_name(format!("thumb-{}.jpg", file_stem(input))));

    std::fs::write(&output, &thumbnail.output.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let crop = thumbnail.crop;
    println!(
        "Cropped to ({}, {}, {}, {}), scaled to {width}x{height}",
        crop.left, crop.top, crop.right, crop.bottom
    );
    println!("Output: {}", output.display());
    Ok(())
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }
    std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Max upload: {} bytes", config.server.max_upload_bytes);
    println!("  Base dir: {}", config.storage.base_dir.display());

    for warning in config.validate() {
        println!("  warning: {warning}");
    }

    Ok(())
}
