//! Embedded filesystem image builder.
//!
//! This library packs a directory tree into a flat image that firmware can
//! read in place. It is organized into several modules:
//! - `config`: CLI configuration.
//! - `error`: Error types for image construction.
//! - `layout`: On-image constants and the file table entries.
//! - `path`: Conversion of on-disk paths to embedded paths.
//! - `scan`: Directory and file discovery.
//! - `content`: File contents, with comment stripping for G-code scripts.
//! - `writer`: The growable image buffer.
//! - `builder`: Image construction.
//! - `firmware`: Appending the image and CRC32 to a firmware binary.

pub mod builder;
pub mod config;
pub mod content;
pub mod error;
pub mod firmware;
pub mod layout;
pub mod path;
pub mod scan;
pub mod utils;
pub mod writer;

pub use builder::build_image;
pub use error::ImageError;
pub use layout::{FileEntry, Image};
