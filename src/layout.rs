//! Image layout.
//!
//! This module defines the on-image constants and the structures that describe
//! where each embedded file ends up. All multi-byte fields are little-endian `u32`.
//!
//! ```text
//! 0                 magic
//! 4                 offset of the directory-name section
//! 8                 file count
//! 12                file table: (name offset, content offset, content length) per file
//! dir offset        directory names, NUL-terminated, list ends with an extra NUL
//! ...               file names, NUL-terminated, padded to 4 bytes
//! ...               per file: content, NUL, padding to 4 bytes
//! ```

use std::path::PathBuf;

/// Magic number that each image starts with.
pub const MAGIC: u32 = 0x543C_2BEF;

/// Offset of the directory-section field inside the header.
pub const DIR_OFFSET_FIELD: u64 = 4;

/// Size of the fixed header: magic, directory offset, file count.
pub const HEADER_SIZE: u64 = 12;

/// Size of one file table record.
pub const FILE_RECORD_SIZE: u64 = 12;

/// Alignment of the filename section end and of every content block.
pub const ALIGNMENT: u64 = 4;

/// One file to embed.
///
/// Offsets and length are unknown when the entry is discovered and get
/// assigned by the builder while the image is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file on disk.
    pub source_path: PathBuf,
    /// Offset of the NUL-terminated embedded path.
    pub name_offset: u32,
    /// Offset of the first content byte.
    pub content_offset: u32,
    /// Length of the embedded (possibly transformed) content.
    pub content_length: u32,
}

impl FileEntry {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            name_offset: 0,
            content_offset: 0,
            content_length: 0,
        }
    }

    /// Serialized file table record.
    pub fn record(&self) -> [u8; FILE_RECORD_SIZE as usize] {
        let mut record = [0u8; FILE_RECORD_SIZE as usize];
        record[0..4].copy_from_slice(&self.name_offset.to_le_bytes());
        record[4..8].copy_from_slice(&self.content_offset.to_le_bytes());
        record[8..12].copy_from_slice(&self.content_length.to_le_bytes());
        record
    }
}

/// A finished filesystem image together with the table that describes it.
#[derive(Debug, Clone)]
pub struct Image {
    data: Vec<u8>,
    files: Vec<FileEntry>,
}

impl Image {
    pub(crate) fn new(data: Vec<u8>, files: Vec<FileEntry>) -> Self {
        Self { data, files }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// File table entries in table order, with their final offsets.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_little_endian() {
        let mut entry = FileEntry::new("/tmp/a");
        entry.name_offset = 0x20;
        entry.content_offset = 0x0102_0304;
        entry.content_length = 7;

        assert_eq!(
            entry.record(),
            [0x20, 0, 0, 0, 0x04, 0x03, 0x02, 0x01, 7, 0, 0, 0]
        );
    }

    #[test]
    fn test_new_entry_is_unassigned() {
        let entry = FileEntry::new("/tmp/a");
        assert_eq!(entry.record(), [0u8; 12]);
        assert_eq!(entry.source_path, PathBuf::from("/tmp/a"));
    }
}
