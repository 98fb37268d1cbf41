//! Image file input/output
//!
//! The pipeline itself only sees in-memory buffers; loading sources and
//! writing renders lives here so the CLI and tests share one path.

use crate::error::{Result, StudioError};
use image::{codecs::jpeg::JpegEncoder, DynamicImage, ImageFormat, RgbImage};
use std::{fs::File, io::BufWriter, path::Path};

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    /// JPEG with quality 1-100
    Jpeg(u8),
    Tiff,
    #[cfg(feature = "webp-support")]
    WebP,
}

impl OutputFormat {
    /// Default JPEG quality
    pub const JPEG_QUALITY: u8 = 92;

    /// Pick a format from a file extension, defaulting to PNG
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg(Self::JPEG_QUALITY),
            Some("tif" | "tiff") => Self::Tiff,
            #[cfg(feature = "webp-support")]
            Some("webp") => Self::WebP,
            _ => Self::Png,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg(_) => "JPEG",
            Self::Tiff => "TIFF",
            #[cfg(feature = "webp-support")]
            Self::WebP => "WebP",
        }
    }
}

/// Service for handling image file input/output operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image, trying the extension first and then content sniffing
    ///
    /// # Examples
    /// ```rust,no_run
    /// use drisya_studio::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("product.jpg")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(StudioError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    StudioError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    StudioError::decode(format!(
                        "Failed to decode {} ({} bytes): {}",
                        path_ref.display(),
                        data.len(),
                        content_err
                    ))
                })
            },
        }
    }

    /// Save a render, creating parent directories as needed
    pub fn save_image<P: AsRef<Path>>(
        image: &RgbImage,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StudioError::file_io_error("create output directory", parent, &e)
            })?;
        }

        let result = match format {
            OutputFormat::Png => image.save_with_format(path_ref, ImageFormat::Png),
            OutputFormat::Tiff => image.save_with_format(path_ref, ImageFormat::Tiff),
            #[cfg(feature = "webp-support")]
            OutputFormat::WebP => image.save_with_format(path_ref, ImageFormat::WebP),
            OutputFormat::Jpeg(quality) => {
                let file = File::create(path_ref)
                    .map_err(|e| StudioError::file_io_error("create output file", path_ref, &e))?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100))
                    .encode_image(image)
            },
        };

        result.map_err(|e| {
            StudioError::processing_stage_error(
                "image save",
                &format!("Failed to save as {}: {}", format.name(), e),
                Some(&format!("path: {}", path_ref.display())),
            )
        })
    }

    /// Check if a file path has an extension this build can decode
    #[must_use]
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| match ext.to_ascii_lowercase().as_str() {
                "jpg" | "jpeg" | "png" | "tiff" | "tif" => true,
                #[cfg(feature = "webp-support")]
                "webp" => true,
                _ => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_is_supported_format() {
        assert!(ImageIOService::is_supported_format("test.jpg"));
        assert!(ImageIOService::is_supported_format("test.JPEG"));
        assert!(ImageIOService::is_supported_format("test.png"));
        assert!(ImageIOService::is_supported_format("test.tif"));

        assert!(!ImageIOService::is_supported_format("test.txt"));
        assert!(!ImageIOService::is_supported_format("test"));
    }

    #[cfg(feature = "webp-support")]
    #[test]
    fn test_webp_supported_with_feature() {
        assert!(ImageIOService::is_supported_format("shot.webp"));
        assert_eq!(OutputFormat::from_path("shot.WEBP"), OutputFormat::WebP);
    }

    #[cfg(not(feature = "webp-support"))]
    #[test]
    fn test_webp_rejected_without_feature() {
        assert!(!ImageIOService::is_supported_format("shot.webp"));
        assert_eq!(OutputFormat::from_path("shot.webp"), OutputFormat::Png);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("a/b.JPG"), OutputFormat::Jpeg(92));
        assert_eq!(OutputFormat::from_path("out.tiff"), OutputFormat::Tiff);
        assert_eq!(OutputFormat::from_path("render"), OutputFormat::Png);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = ImageIOService::load_image("nonexistent.jpg").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_save_and_reload_png() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("render.png");
        let image = RgbImage::from_pixel(6, 4, Rgb([10, 20, 30]));

        ImageIOService::save_image(&image, &path, OutputFormat::Png).unwrap();
        let loaded = ImageIOService::load_image(&path).unwrap();
        assert_eq!(loaded.to_rgb8(), image);
    }

    #[test]
    fn test_save_jpeg() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("render.jpg");
        let image = RgbImage::from_pixel(16, 16, Rgb([200, 100, 50]));

        ImageIOService::save_image(&image, &path, OutputFormat::Jpeg(80)).unwrap();
        let loaded = ImageIOService::load_image(&path).unwrap();
        assert_eq!(loaded.width(), 16);
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = ImageIOService::load_image(&path).unwrap_err();
        assert!(matches!(err, StudioError::Decode(_)));
    }
}
