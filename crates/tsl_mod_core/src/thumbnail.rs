//! Decoder for the uncompressed TGA screenshots stored in save directories.
//!
//! Save games ship a `Screen.tga` written bottom-up in BGR(A) order. Only the
//! 24 and 32 bit depths the game produces are supported; anything else decodes
//! to `None` rather than an error, since a missing preview is not fatal.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

const HEADER_LEN: usize = 18;

/// Name of the screenshot file inside a save directory (matched case-insensitively).
pub const SCREENSHOT_FILE_NAME: &str = "screen.tga";

/// Channel layout of decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// A decoded image with rows ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Decode an uncompressed 24/32-bit TGA image.
///
/// Returns `None` for truncated input, zero dimensions or unsupported bit
/// depths. The output buffer is sized from the declared dimensions, which must
/// fit inside `bytes`.
pub fn decode_tga(bytes: &[u8]) -> Option<Thumbnail> {
    if bytes.len() < HEADER_LEN {
        tracing::debug!(len = bytes.len(), "TGA header truncated");
        return None;
    }

    let id_len = bytes[0] as usize;
    let width = u16::from_le_bytes([bytes[12], bytes[13]]) as usize;
    let height = u16::from_le_bytes([bytes[14], bytes[15]]) as usize;
    let format = match bytes[16] {
        24 => PixelFormat::Rgb8,
        32 => PixelFormat::Rgba8,
        other => {
            tracing::debug!(bpp = other, "Unsupported TGA bit depth");
            return None;
        }
    };

    if width == 0 || height == 0 {
        tracing::debug!(width, height, "TGA has zero dimensions");
        return None;
    }

    let bpp = format.bytes_per_pixel();
    let row_len = width * bpp;
    let offset = HEADER_LEN + id_len;
    let needed = row_len.checked_mul(height)?;
    let Some(payload) = offset
        .checked_add(needed)
        .and_then(|end| bytes.get(offset..end))
    else {
        tracing::debug!(
            width,
            height,
            available = bytes.len().saturating_sub(offset),
            needed,
            "TGA pixel data truncated"
        );
        return None;
    };

    let mut pixels = Vec::with_capacity(needed);
    for row in payload.chunks_exact(row_len).rev() {
        pixels.extend_from_slice(row);
    }
    for pixel in pixels.chunks_exact_mut(bpp) {
        pixel.swap(0, 2);
    }

    Some(Thumbnail {
        width: width as u32,
        height: height as u32,
        format,
        pixels,
    })
}

/// Locate the screenshot file of a save directory, ignoring case.
pub fn find_save_screenshot(save_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let preferred = save_dir.join("Screen.tga");
    if preferred.is_file() {
        return Some(preferred);
    }

    let mut candidates: Vec<Utf8PathBuf> = fs::read_dir(save_dir)
        .ok()?
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(SCREENSHOT_FILE_NAME))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Read and decode the screenshot of a save directory.
///
/// `Ok(None)` means the save has no screenshot or it could not be decoded.
pub fn load_save_screenshot(save_dir: &Utf8Path) -> Result<Option<Thumbnail>> {
    let Some(path) = find_save_screenshot(save_dir) else {
        tracing::debug!("No screenshot in save directory {}", save_dir);
        return Ok(None);
    };
    let bytes = fs::read(&path)?;
    Ok(decode_tga(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn header(id_len: u8, width: u16, height: u16, bpp: u8) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_LEN];
        header[0] = id_len;
        header[2] = 2;
        header[12..14].copy_from_slice(&width.to_le_bytes());
        header[14..16].copy_from_slice(&height.to_le_bytes());
        header[16] = bpp;
        header
    }

    #[test]
    fn test_decode_24bit_flips_rows_and_swaps_channels() {
        let mut data = header(0, 2, 2, 24);
        // Bottom row first: B G R per pixel.
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        data.extend_from_slice(&[7, 8, 9, 10, 11, 12]);

        let thumb = decode_tga(&data).unwrap();
        assert_eq!((thumb.width, thumb.height), (2, 2));
        assert_eq!(thumb.format, PixelFormat::Rgb8);
        assert_eq!(
            thumb.pixels,
            vec![9, 8, 7, 12, 11, 10, 3, 2, 1, 6, 5, 4]
        );
    }

    #[test]
    fn test_decode_32bit_keeps_alpha() {
        let mut data = header(0, 1, 1, 32);
        data.extend_from_slice(&[10, 20, 30, 40]);

        let thumb = decode_tga(&data).unwrap();
        assert_eq!(thumb.format, PixelFormat::Rgba8);
        assert_eq!(thumb.pixels, vec![30, 20, 10, 40]);
    }

    #[test]
    fn test_decode_skips_image_id() {
        let mut data = header(3, 1, 1, 24);
        data.extend_from_slice(b"abc");
        data.extend_from_slice(&[1, 2, 3]);

        assert_eq!(decode_tga(&data).unwrap().pixels, vec![3, 2, 1]);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let mut sixteen = header(0, 1, 1, 16);
        sixteen.extend_from_slice(&[0, 0]);
        assert!(decode_tga(&sixteen).is_none());

        assert!(decode_tga(&[0u8; 10]).is_none());

        let zero = header(0, 0, 4, 24);
        assert!(decode_tga(&zero).is_none());

        let mut truncated = header(0, 4, 4, 24);
        truncated.extend_from_slice(&[0u8; 10]);
        assert!(decode_tga(&truncated).is_none());
    }

    #[test]
    fn test_decode_declared_size_must_fit_input() {
        let mut data = header(0, u16::MAX, u16::MAX, 32);
        data.extend_from_slice(&[0u8; 64]);
        assert!(decode_tga(&data).is_none());
    }

    #[test]
    fn test_load_save_screenshot() {
        let dir = tempdir().unwrap();
        let save = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert!(load_save_screenshot(&save).unwrap().is_none());

        let mut data = header(0, 1, 1, 24);
        data.extend_from_slice(&[1, 2, 3]);
        fs::write(save.join("SCREEN.TGA"), &data).unwrap();

        let thumb = load_save_screenshot(&save).unwrap().unwrap();
        assert_eq!(thumb.pixels, vec![3, 2, 1]);
    }
}
