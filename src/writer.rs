//! Image buffer writer.
//!
//! An append-only byte buffer with a write cursor at its end. Already written
//! bytes can only be touched again through [`ImageWriter::patch`], which
//! overwrites a fixed-width range in place.

use crate::error::{ImageError, Result};
use crate::layout::ALIGNMENT;
use crate::utils::align_up;

#[derive(Debug, Default)]
pub struct ImageWriter {
    buffer: Vec<u8>,
}

impl ImageWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current write position as a 32-bit image offset.
    pub fn position(&self) -> Result<u32> {
        let offset = self.buffer.len() as u64;
        u32::try_from(offset).map_err(|_| ImageError::ImageTooLarge { offset })
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }

    /// Writes `bytes` followed by a NUL terminator.
    pub fn write_cstr(&mut self, bytes: &[u8]) {
        self.write(bytes);
        self.buffer.push(0);
    }

    /// Reserves `len` zero bytes and returns where they start.
    pub fn reserve(&mut self, len: usize) -> Result<u32> {
        let start = self.position()?;
        self.buffer.resize(self.buffer.len() + len, 0);
        Ok(start)
    }

    /// Zero-fills up to the next 4-byte boundary.
    pub fn pad(&mut self) {
        let aligned = align_up(self.buffer.len() as u64, ALIGNMENT) as usize;
        if aligned != self.buffer.len() {
            tracing::debug!("padding {} bytes", aligned - self.buffer.len());
        }
        self.buffer.resize(aligned, 0);
    }

    /// Overwrites previously written bytes at `offset`.
    ///
    /// Panics if the range was never written; the builder only patches
    /// ranges it reserved itself.
    pub fn patch(&mut self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        self.buffer[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn patch_u32(&mut self, offset: u32, value: u32) {
        self.patch(offset, &value.to_le_bytes());
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_then_patch() {
        let mut writer = ImageWriter::new();
        writer.write_u32(0xAABB_CCDD);
        let slot = writer.reserve(4).unwrap();
        writer.write(b"xyz");
        writer.patch_u32(slot, 7);

        assert_eq!(
            writer.into_inner(),
            vec![0xDD, 0xCC, 0xBB, 0xAA, 7, 0, 0, 0, b'x', b'y', b'z']
        );
    }

    #[test]
    fn test_pad() {
        let mut writer = ImageWriter::new();
        writer.pad();
        assert_eq!(writer.position().unwrap(), 0);

        writer.write_cstr(b"ab");
        writer.pad();
        assert_eq!(writer.into_inner(), vec![b'a', b'b', 0, 0]);
    }

    #[test]
    fn test_padding_logged_at_debug() {
        let logs = crate::utils::capture_logs(|| {
            let mut writer = ImageWriter::new();
            writer.write(b"a");
            writer.pad();
        });
        assert!(logs.contains("DEBUG"));
        assert!(logs.contains("padding 3 bytes"));
    }

    #[test]
    fn test_pad_when_aligned() {
        let mut writer = ImageWriter::new();
        writer.write_cstr(b"abc");
        writer.pad();
        assert_eq!(writer.position().unwrap(), 4);
    }
}
