//! Image resolution and preparation for embedding
//!
//! Resolution is an explicit boundary: a resolver hands back either a
//! decoded bitmap or an `Unavailable` reason, and drawing code picks the
//! placeholder path for the latter. Nothing here returns an error for a
//! missing or broken image.

use crate::options::Quality;
use crate::types::{CatalogError, Product, ProductField, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

/// Prefix of image files stored per product row: `{index}_IMAGE 1_{hash}.jpg`
const INDEXED_IMAGE_MARKER: &str = "_IMAGE 1_";

/// A bitmap decoded in memory
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            image: image::open(path)?,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            image: image::load_from_memory(bytes)?,
        })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.dimensions();
        if h == 0 { 1.0 } else { w as f32 / h as f32 }
    }

    /// Downsample to the placed size at the tier's DPI and re-encode as JPEG.
    ///
    /// Images are never upsampled. `Stretch` keeps the target aspect ratio
    /// (the bitmap is distorted when placed); `Contain` keeps the source's.
    pub fn encode(
        &self,
        target_width_pt: f32,
        target_height_pt: f32,
        fit: ImageFit,
        quality: Quality,
    ) -> Result<EncodedImage> {
        let (src_w, src_h) = self.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(CatalogError::Image(image::ImageError::Parameter(
                image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ),
            )));
        }

        let target_w = pixels_for(target_width_pt, quality);
        let target_h = pixels_for(target_height_pt, quality);

        let resized = match fit {
            ImageFit::Stretch => {
                let w = src_w.min(target_w);
                let h = src_h.min(target_h);
                if (w, h) == (src_w, src_h) {
                    self.image.clone()
                } else {
                    self.image.resize_exact(w, h, FilterType::Lanczos3)
                }
            }
            ImageFit::Contain => {
                if src_w > target_w || src_h > target_h {
                    self.image.resize(target_w, target_h, FilterType::Lanczos3)
                } else {
                    self.image.clone()
                }
            }
        };

        let (width_px, height_px) = resized.dimensions();

        let alpha = if resized.color().has_alpha() {
            let rgba = resized.to_rgba8();
            let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            if alpha.iter().all(|&a| a == u8::MAX) {
                None
            } else {
                Some(alpha)
            }
        } else {
            None
        };

        let rgb = resized.to_rgb8();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality()).encode_image(&rgb)?;

        log::debug!(
            "Encoded {}x{} image to {}x{} JPEG ({} bytes, q={})",
            src_w,
            src_h,
            width_px,
            height_px,
            jpeg.len(),
            quality.jpeg_quality()
        );

        Ok(EncodedImage {
            width_px,
            height_px,
            jpeg,
            alpha,
        })
    }
}

fn pixels_for(points: f32, quality: Quality) -> u32 {
    ((points * quality.dpi() / 72.0).ceil() as u32).max(1)
}

/// How a bitmap maps onto its target box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Fill the box exactly, ignoring the source aspect ratio
    Stretch,
    /// Fit inside the box, preserving the aspect ratio
    Contain,
}

/// JPEG bytes ready for a DCTDecode image XObject
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub jpeg: Vec<u8>,
    /// 8-bit soft mask, one byte per pixel
    pub alpha: Option<Vec<u8>>,
}

/// Outcome of resolving a product's image
#[derive(Debug)]
pub enum ImageResolution {
    Bitmap(DecodedImage),
    Unavailable(String),
}

/// Supplies product images. Implementations may block (disk, network);
/// rendering waits for the answer before drawing the card.
pub trait ImageResolver {
    /// `index` is the product's 0-based position in the input
    fn resolve(&self, index: usize, product: &Product) -> ImageResolution;
}

/// Resolver that never has an image
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _index: usize, _product: &Product) -> ImageResolution {
        ImageResolution::Unavailable("no image source configured".into())
    }
}

/// Resolves images from the local filesystem.
///
/// The product's image column is tried first as a path (relative paths
/// against `base_dir`); failing that, the images folder is searched for a
/// file named `{index}_IMAGE 1_*`.
pub struct LocalImageResolver {
    base_dir: PathBuf,
    images_folder: Option<PathBuf>,
}

impl LocalImageResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            images_folder: None,
        }
    }

    pub fn with_images_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.images_folder = Some(folder.into());
        self
    }

    fn column_path(&self, product: &Product) -> Option<PathBuf> {
        let value = product.resolve(ProductField::Image)?.to_string();
        if value.starts_with("http://") || value.starts_with("https://") {
            log::debug!("Skipping remote image {}", value);
            return None;
        }
        let path = PathBuf::from(value);
        Some(if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        })
    }

    fn indexed_path(&self, index: usize) -> Option<PathBuf> {
        let folder = self.images_folder.as_ref()?;
        let prefix = format!("{}{}", index, INDEXED_IMAGE_MARKER);
        let entries = match std::fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read images folder {}: {}", folder.display(), e);
                return None;
            }
        };

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
            .map(|entry| entry.path())
            .collect();
        // Directory order is platform dependent
        matches.sort();
        matches.into_iter().next()
    }
}

impl ImageResolver for LocalImageResolver {
    fn resolve(&self, index: usize, product: &Product) -> ImageResolution {
        let candidates = [self.column_path(product), self.indexed_path(index)];
        let mut last_error = None;

        for path in candidates.into_iter().flatten() {
            if !path.is_file() {
                continue;
            }
            match DecodedImage::open(&path) {
                Ok(image) => return ImageResolution::Bitmap(image),
                Err(e) => {
                    log::warn!("Failed to decode image {}: {}", path.display(), e);
                    last_error = Some(format!("{}: {}", path.display(), e));
                }
            }
        }

        ImageResolution::Unavailable(
            last_error.unwrap_or_else(|| format!("no image found for product {}", index)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_downsamples_to_target_dpi() {
        let decoded = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            1000,
            500,
            Rgb([200, 10, 10]),
        )));
        // 72pt at 72 DPI is 72px wide
        let encoded = decoded.encode(72.0, 72.0, ImageFit::Contain, Quality::Bd).unwrap();
        assert_eq!(encoded.width_px, 72);
        assert_eq!(encoded.height_px, 36);
        assert!(encoded.alpha.is_none());
        assert_eq!(&encoded.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_small_images_are_not_upsampled() {
        let decoded = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(10, 20)));
        let encoded = decoded.encode(300.0, 300.0, ImageFit::Stretch, Quality::Hd).unwrap();
        assert_eq!((encoded.width_px, encoded.height_px), (10, 20));
    }

    #[test]
    fn test_alpha_becomes_soft_mask() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let encoded = DecodedImage::from_dynamic(DynamicImage::ImageRgba8(img))
            .encode(100.0, 100.0, ImageFit::Contain, Quality::Hd)
            .unwrap();
        let alpha = encoded.alpha.unwrap();
        assert_eq!(alpha.len(), 16);
        assert_eq!(alpha[0], 0);
    }

    #[test]
    fn test_corrupt_bytes_are_an_error() {
        assert!(DecodedImage::from_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_local_resolver_finds_indexed_file() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(8, 8, Rgb([0, 128, 0]))
            .save(dir.path().join("3_IMAGE 1_abc.png"))
            .unwrap();

        let resolver = LocalImageResolver::new(dir.path()).with_images_folder(dir.path());
        let product = Product::new().with("title", "Plante");
        assert!(matches!(resolver.resolve(3, &product), ImageResolution::Bitmap(_)));
        assert!(matches!(resolver.resolve(4, &product), ImageResolution::Unavailable(_)));
    }

    #[test]
    fn test_local_resolver_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.jpg"), b"garbage").unwrap();
        let resolver = LocalImageResolver::new(dir.path());
        let product = Product::new().with("image", "broken.jpg");
        match resolver.resolve(0, &product) {
            ImageResolution::Unavailable(reason) => assert!(reason.contains("broken.jpg")),
            ImageResolution::Bitmap(_) => panic!("corrupt file decoded"),
        }
    }
}
