//! Image builder.
//!
//! This module contains the `ImageBuilder` which lays out a complete image in one pass:
//! 1. Scan: collects directories and files below the root.
//! 2. Header: writes the magic and file count and reserves the file table.
//! 3. Names: writes directory names and file names, recording name offsets.
//! 4. Contents: writes (possibly stripped) file contents, recording offsets and lengths.
//! 5. Backpatch: fills in the directory offset and the reserved file table.

use std::path::{Path, PathBuf};

use crate::content::open_content;
use crate::error::{ImageError, Result};
use crate::layout::{FileEntry, Image, DIR_OFFSET_FIELD, FILE_RECORD_SIZE, MAGIC};
use crate::path::embedded_path;
use crate::scan::{list_directories, list_files};
use crate::writer::ImageWriter;

/// Builds the image for everything below `root`.
pub fn build_image(root: &Path) -> Result<Image> {
    ImageBuilder::new(root)?.build()
}

pub struct ImageBuilder {
    root: PathBuf,
    directories: Vec<PathBuf>,
    files: Vec<FileEntry>,
    writer: ImageWriter,
}

impl ImageBuilder {
    /// Scans `root` and prepares a builder for it.
    pub fn new(root: &Path) -> Result<Self> {
        let directories = list_directories(root)?;
        let files = list_files(root, &directories)?;
        tracing::debug!(
            "found {} directories and {} files in {}",
            directories.len(),
            files.len(),
            root.display()
        );

        Ok(Self {
            root: root.to_path_buf(),
            directories,
            files,
            writer: ImageWriter::new(),
        })
    }

    pub fn build(mut self) -> Result<Image> {
        let table_offset = self.write_header()?;
        self.write_directories()?;
        self.write_filenames()?;
        self.write_contents()?;
        self.write_file_table(table_offset);

        Ok(Image::new(self.writer.into_inner(), self.files))
    }

    /// Writes the header and reserves the file table, returning the table offset.
    fn write_header(&mut self) -> Result<u32> {
        let file_count = u32::try_from(self.files.len()).map_err(|_| ImageError::ImageTooLarge {
            offset: self.files.len() as u64,
        })?;

        self.writer.write_u32(MAGIC);
        self.writer.write_u32(0); // directory offset, patched below
        self.writer.write_u32(file_count);

        let table_len = self.files.len() * FILE_RECORD_SIZE as usize;
        let table_offset = self.writer.reserve(table_len)?;

        let dir_offset = self.writer.position()?;
        tracing::debug!("directory section at {:#x}", dir_offset);
        self.writer.patch_u32(DIR_OFFSET_FIELD as u32, dir_offset);

        Ok(table_offset)
    }

    fn write_directories(&mut self) -> Result<()> {
        for directory in &self.directories {
            tracing::info!("Embedding directory {}", directory.display());
            let name = embedded_path(directory, &self.root)?;
            self.writer.write_cstr(&name);
        }
        self.writer.write(&[0]);
        Ok(())
    }

    fn write_filenames(&mut self) -> Result<()> {
        for file in &mut self.files {
            file.name_offset = self.writer.position()?;
            let name = embedded_path(&file.source_path, &self.root)?;
            tracing::debug!(
                "name {} @ {:#x}",
                String::from_utf8_lossy(&name),
                file.name_offset
            );
            self.writer.write_cstr(&name);
        }
        self.writer.pad();
        Ok(())
    }

    fn write_contents(&mut self) -> Result<()> {
        for file in &mut self.files {
            file.content_offset = self.writer.position()?;
            let content = open_content(&file.source_path)?;
            file.content_length =
                u32::try_from(content.len()).map_err(|_| ImageError::ImageTooLarge {
                    offset: content.len() as u64,
                })?;

            tracing::info!(
                "Embedding file {} ({} bytes @ {})",
                file.source_path.display(),
                file.content_length,
                file.content_offset
            );

            self.writer.write_cstr(&content);
            self.writer.pad();
        }
        // the final position must still be addressable
        self.writer.position()?;
        Ok(())
    }

    fn write_file_table(&mut self, table_offset: u32) {
        let mut offset = table_offset;
        for file in &self.files {
            self.writer.patch(offset, &file.record());
            offset += FILE_RECORD_SIZE as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_empty_root() {
        let temp = TempDir::new().unwrap();
        let image = build_image(temp.path()).unwrap();
        let data = image.as_bytes();

        // header, one NUL ending the directory list, zero-length name section padded
        assert_eq!(read_u32(data, 0), MAGIC);
        assert_eq!(read_u32(data, 4), 12);
        assert_eq!(read_u32(data, 8), 0);
        assert_eq!(data.len(), 16);
        assert_eq!(&data[12..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_single_file_layout() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "xyz").unwrap();

        let image = build_image(temp.path()).unwrap();
        let data = image.as_bytes();

        assert_eq!(read_u32(data, 8), 1);
        // header 12 + record 12
        assert_eq!(read_u32(data, 4), 24);
        // directory terminator at 24, "/a\0" at 25..28
        assert_eq!(data[24], 0);
        assert_eq!(read_u32(data, 12), 25);
        assert_eq!(&data[25..28], b"/a\0");
        // names end at 28, already aligned
        assert_eq!(read_u32(data, 16), 28);
        assert_eq!(read_u32(data, 20), 3);
        assert_eq!(&data[28..32], b"xyz\0");
        assert_eq!(data.len(), 32);
    }

    #[test]
    fn test_builder_scans_subdirectories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sys")).unwrap();
        fs::write(temp.path().join("sys/config.g"), "G28\n").unwrap();

        let builder = ImageBuilder::new(temp.path()).unwrap();
        assert_eq!(builder.directories, vec![temp.path().join("sys")]);
        assert_eq!(builder.files.len(), 1);

        let image = builder.build().unwrap();
        let entry = &image.files()[0];
        assert_eq!(entry.content_length, 4);
        assert_eq!(entry.content_offset % 4, 0);
    }
}
