//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.

use clap::Parser;
use std::path::PathBuf;

/// Appends an embedded filesystem image and a CRC32 checksum to a firmware binary.
///
/// Without a filesystem directory only the checksum is appended.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Firmware binary to patch in place
    pub firmware: PathBuf,

    /// Root directory of the files to embed
    pub fs_root: Option<PathBuf>,

    /// Also write the built filesystem image to this file
    #[arg(long, value_name = "PATH")]
    pub image_out: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_firmware_only() {
        let config = Config::try_parse_from(["fsimage", "fw.bin"]).unwrap();
        assert_eq!(config.firmware, PathBuf::from("fw.bin"));
        assert!(config.fs_root.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_all() {
        let config = Config::try_parse_from([
            "fsimage",
            "fw.bin",
            "sd",
            "--image-out",
            "fs.img",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.fs_root, Some(PathBuf::from("sd")));
        assert_eq!(config.image_out, Some(PathBuf::from("fs.img")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_firmware_required() {
        assert!(Config::try_parse_from(["fsimage"]).is_err());
    }
}
