//! Entry point for the fsimage tool.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Build the filesystem image if a root directory was given.
//! 3. Append it to the firmware, fix the checksum address and append the CRC32.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fsimage::builder::build_image;
use fsimage::config::Config;
use fsimage::firmware::patch_firmware;

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Firmware binary: {}", config.firmware.display());

    let image = match &config.fs_root {
        Some(root) => {
            let root = root
                .canonicalize()
                .with_context(|| format!("invalid FS directory {}", root.display()))?;
            if !root.is_dir() {
                anyhow::bail!("{} is not a directory", root.display());
            }
            tracing::info!("FS root directory: {}", root.display());

            let image = build_image(&root)
                .with_context(|| format!("failed to build image from {}", root.display()))?;
            tracing::info!(
                "FS image: {} files, {} bytes",
                image.files().len(),
                image.as_bytes().len()
            );

            if let Some(out) = &config.image_out {
                std::fs::write(out, image.as_bytes())
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            Some(image)
        }
        None => None,
    };

    patch_firmware(&config.firmware, image.as_ref().map(|i| i.as_bytes()))?;

    println!("Patched {} successfully", config.firmware.display());
    Ok(())
}
