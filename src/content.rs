//! File content provider.
//!
//! G-code scripts (`*.g`) are stored with comments and blank lines stripped to
//! save space in the image; every other file is stored as-is.

use std::fs;
use std::path::Path;

use crate::error::{ImageError, Result};

const SCRIPT_SUFFIX: &[u8] = b".g";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How the content of a file is turned into embedded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// G-code script: comments and blank lines are stripped.
    Script,
    /// Stored byte for byte.
    Raw,
}

impl ContentKind {
    pub fn for_path(path: &Path) -> Self {
        match path.file_name() {
            Some(name) if name.as_encoded_bytes().ends_with(SCRIPT_SUFFIX) => ContentKind::Script,
            _ => ContentKind::Raw,
        }
    }
}

/// Reads `path` and returns the bytes to embed for it.
pub fn open_content(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).map_err(|e| ImageError::io(path, e))?;
    match ContentKind::for_path(path) {
        ContentKind::Script => strip_comments(path, &data),
        ContentKind::Raw => Ok(data),
    }
}

/// Removes `;` comments and blank lines from a script.
///
/// Kept lines are re-terminated with `\n`. `path` is only used for errors.
pub fn strip_comments(path: &Path, data: &[u8]) -> Result<Vec<u8>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut output = Vec::with_capacity(data.len());

    for (index, raw) in Lines::new(data).enumerate() {
        let line = std::str::from_utf8(raw).map_err(|source| ImageError::Transform {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;

        match strip_line(line) {
            Some(line) => {
                output.extend_from_slice(line.as_bytes());
                output.push(b'\n');
            }
            None => tracing::debug!("dropping line {} of {}", index + 1, path.display()),
        }
    }

    Ok(output)
}

/// Strips a trailing comment from one line, `None` if nothing is left.
///
/// The line is scanned from its end: a `"` seen before any `;` means the
/// semicolon may be quoted, so the line is kept whole.
fn strip_line(line: &str) -> Option<&str> {
    let mut line = line;
    for (i, c) in line.char_indices().rev() {
        if c == '"' {
            break;
        }
        if c == ';' {
            line = line[..i].trim_end();
            break;
        }
    }

    if line.trim().is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Splits on `\n`, `\r\n` and lone `\r`, without yielding the terminators.
struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                let line = &self.rest[..end];
                let skip = if self.rest[end] == b'\r' && self.rest.get(end + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                self.rest = &self.rest[end + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = &[];
                Some(line)
            }
        }
    }
}
