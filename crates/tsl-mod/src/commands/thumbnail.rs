use crate::errors::CliError;
use crate::println_pad;
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use image::{RgbImage, RgbaImage};
use miette::{IntoDiagnostic, Result};
use tsl_mod_core::{decode_tga, load_save_screenshot, PixelFormat, Thumbnail};

pub struct ThumbnailArgs {
    /// A TGA file or a save folder.
    pub path: String,
    pub output: Option<String>,
}

fn read_thumbnail(path: &Utf8Path) -> Result<Thumbnail> {
    if path.is_dir() {
        return load_save_screenshot(path)
            .map_err(CliError::from)?
            .ok_or_else(|| {
                CliError::ScreenshotNotFound {
                    path: path.to_path_buf(),
                }
                .into()
            });
    }
    if !path.is_file() {
        return Err(CliError::file_not_found(path).into());
    }

    let bytes = std::fs::read(path).into_diagnostic()?;
    decode_tga(&bytes).ok_or_else(|| {
        CliError::UnsupportedImage {
            path: path.to_path_buf(),
        }
        .into()
    })
}

fn default_output(path: &Utf8Path) -> Utf8PathBuf {
    let stem = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    Utf8PathBuf::from(format!("{}.png", stem.unwrap_or("thumbnail")))
}

fn save_png(thumbnail: Thumbnail, output: &Utf8Path) -> Result<()> {
    let (width, height) = (thumbnail.width, thumbnail.height);
    let saved = match thumbnail.format {
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, thumbnail.pixels)
            .map(|image| image.save(output)),
        PixelFormat::Rgba8 => RgbaImage::from_raw(width, height, thumbnail.pixels)
            .map(|image| image.save(output)),
    };
    match saved {
        Some(result) => result.into_diagnostic(),
        None => Err(miette::miette!(
            "Decoded pixel buffer does not match {}x{}",
            width,
            height
        )),
    }
}

/// Decode a TGA image or save screenshot and write it as PNG.
pub fn export_thumbnail(args: ThumbnailArgs) -> Result<()> {
    let path = Utf8PathBuf::from(&args.path);
    let output = args
        .output
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| default_output(&path));

    let thumbnail = read_thumbnail(&path)?;
    println_pad!(
        "{} {}x{} {}",
        "🖼️ Image:".bright_blue(),
        thumbnail.width,
        thumbnail.height,
        format!("({:?})", thumbnail.format).dimmed()
    );
    save_png(thumbnail, &output)?;
    println_pad!("{} {}", "✓ Saved".bright_green().bold(), output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_png() {
        let dir = tempdir().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().join("out.png")).unwrap();
        let thumbnail = Thumbnail {
            width: 2,
            height: 1,
            format: PixelFormat::Rgba8,
            pixels: vec![255, 0, 0, 255, 0, 0, 255, 128],
        };

        save_png(thumbnail, &output).unwrap();
        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn test_save_png_rejects_short_buffer() {
        let dir = tempdir().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().join("out.png")).unwrap();
        let thumbnail = Thumbnail {
            width: 4,
            height: 4,
            format: PixelFormat::Rgb8,
            pixels: vec![0; 3],
        };
        assert!(save_png(thumbnail, &output).is_err());
    }

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Utf8Path::new("saves/000001 - QuickSave/Screen.tga")),
            Utf8PathBuf::from("Screen.png")
        );
    }
}
