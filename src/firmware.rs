//! Firmware binary patching.
//!
//! Appends an optional filesystem image to a firmware binary, moves the
//! firmware's pointer to its trailing checksum past the image, and appends
//! the CRC32 of the whole file.

use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::layout::ALIGNMENT;

/// Offset of the little-endian field holding the address of the trailing CRC32.
pub const CRC32_ADDRESS: u64 = 0x1C;

/// Patches `path` in place and returns the CRC32 that was appended.
pub fn patch_firmware(path: &Path, image: Option<&[u8]>) -> Result<u32> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let len = file.metadata()?.len();
    if len < CRC32_ADDRESS + 4 {
        bail!("firmware binary is too small: {} bytes", len);
    }
    if len % ALIGNMENT != 0 {
        bail!("firmware binary is not aligned: {} bytes", len);
    }

    if let Some(image) = image {
        append_image(&mut file, image)?;
    }

    append_crc32(&mut file)
}

/// Appends `image` and adds its length to the CRC32 address field.
///
/// The file is left untouched if the new address does not fit.
fn append_image(file: &mut File, image: &[u8]) -> Result<()> {
    let image_len = u32::try_from(image.len()).context("filesystem image exceeds 4 GiB")?;

    let mut field = [0u8; 4];
    file.seek(SeekFrom::Start(CRC32_ADDRESS))?;
    file.read_exact(&mut field)?;
    let old_address = u32::from_le_bytes(field);
    let Some(new_address) = old_address.checked_add(image_len) else {
        bail!("CRC32 address {:#x} overflows after adding {} bytes", old_address, image_len);
    };

    file.seek(SeekFrom::End(0))?;
    file.write_all(image).context("failed to append filesystem image")?;

    tracing::debug!("CRC32 address {:#x} -> {:#x}", old_address, new_address);
    file.seek(SeekFrom::Start(CRC32_ADDRESS))?;
    file.write_all(&new_address.to_le_bytes())?;
    Ok(())
}

fn append_crc32(file: &mut File) -> Result<u32> {
    file.flush()?;
    let crc = {
        // Safety: the file is opened by us and not modified while mapped.
        let mmap = unsafe { Mmap::map(&*file)? };
        crc32fast::hash(&mmap)
    };

    tracing::info!("CRC32 = {:#010x}", crc);
    file.seek(SeekFrom::End(0))?;
    file.write_all(&crc.to_le_bytes())?;
    Ok(crc)
}
