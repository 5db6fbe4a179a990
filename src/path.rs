//! Embedded path conversion.
//!
//! Turns an on-disk path such as `/work/sd/sys/config.g` under root `/work/sd`
//! into the form stored in the image, `/sys/config.g`.

use std::path::{Component, Path};

use crate::error::{ImageError, Result};

/// Converts `path` into its `/`-rooted, `/`-separated UTF-8 form relative to `root`.
pub fn embedded_path(path: &Path, root: &Path) -> Result<Vec<u8>> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ImageError::PathNotUnderRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let mut embedded = String::new();
    for component in relative.components() {
        let Component::Normal(name) = component else {
            continue;
        };
        let name = name.to_str().ok_or_else(|| ImageError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
        embedded.push('/');
        embedded.push_str(name);
    }
    if embedded.is_empty() {
        embedded.push('/');
    }

    Ok(embedded.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_root() {
        let path = embedded_path(Path::new("/sd/sys/foo.txt"), Path::new("/sd")).unwrap();
        assert_eq!(path, b"/sys/foo.txt");
    }

    #[test]
    fn test_root_with_trailing_separator() {
        let path = embedded_path(Path::new("/sd/sys/foo.txt"), Path::new("/sd/")).unwrap();
        assert_eq!(path, b"/sys/foo.txt");
    }

    #[test]
    fn test_already_embedded_path_is_unchanged() {
        let path = embedded_path(Path::new("/sys/macros/home.g"), Path::new("/")).unwrap();
        assert_eq!(path, b"/sys/macros/home.g");
    }

    #[test]
    fn test_utf8_names() {
        let path = embedded_path(Path::new("/sd/www/größe.htm"), Path::new("/sd")).unwrap();
        assert_eq!(path, "/www/größe.htm".as_bytes());
    }

    #[test]
    fn test_path_outside_root() {
        let err = embedded_path(Path::new("/other/foo"), Path::new("/sd")).unwrap_err();
        assert!(matches!(err, ImageError::PathNotUnderRoot { .. }));
    }

    #[test]
    fn test_sibling_with_common_prefix_is_outside_root() {
        let err = embedded_path(Path::new("/sdcard/foo"), Path::new("/sd")).unwrap_err();
        assert!(matches!(err, ImageError::PathNotUnderRoot { .. }));
    }
}
