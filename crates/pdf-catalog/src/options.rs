use crate::color::Rgb;
use crate::constants::DEFAULT_WATERMARK;
use crate::price::PriceOptions;
use crate::text::BuiltinFont;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Image quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Quality {
    /// 300 DPI, JPEG quality 95
    #[default]
    Hd,
    /// 150 DPI, JPEG quality 75
    Medium,
    /// 72 DPI, JPEG quality 50
    Bd,
}

impl Quality {
    pub fn dpi(self) -> f32 {
        match self {
            Quality::Hd => 300.0,
            Quality::Medium => 150.0,
            Quality::Bd => 72.0,
        }
    }

    pub fn jpeg_quality(self) -> u8 {
        match self {
            Quality::Hd => 95,
            Quality::Medium => 75,
            Quality::Bd => 50,
        }
    }

    /// Parse the tier names used in configuration ("hd", "medium", "bd")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "hd" => Some(Quality::Hd),
            "medium" => Some(Quality::Medium),
            "bd" => Some(Quality::Bd),
            _ => None,
        }
    }
}

/// Built-in font family used for all catalog text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
}

impl FontFamily {
    /// Resolve a configured family name; unknown names fall back to Helvetica
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "helvetica" | "arial" | "sans" | "sans-serif" => FontFamily::Helvetica,
            "courier" | "mono" | "monospace" => FontFamily::Courier,
            other => {
                log::warn!("Font family '{}' is not available, falling back to Helvetica", other);
                FontFamily::Helvetica
            }
        }
    }

    pub fn regular(self) -> BuiltinFont {
        match self {
            FontFamily::Helvetica => BuiltinFont::Helvetica,
            FontFamily::Courier => BuiltinFont::Courier,
        }
    }

    pub fn bold(self) -> BuiltinFont {
        match self {
            FontFamily::Helvetica => BuiltinFont::HelveticaBold,
            FontFamily::Courier => BuiltinFont::CourierBold,
        }
    }
}

/// Everything that shapes one catalog run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogOptions {
    // Cover and banner text
    pub title: String,
    pub subtitle: String,

    // Colors as #RRGGBB
    pub primary_color: String,
    pub background_color: String,

    // Images
    pub logo_path: Option<PathBuf>,
    pub cover_path: Option<PathBuf>,
    /// Folder searched for `{index}_IMAGE 1_*` files
    pub images_folder: Option<PathBuf>,
    pub quality: Quality,

    // Layout
    pub cards_per_page: usize,
    pub font_family: String,
    pub watermark: String,

    /// Fail with `NoProducts` instead of emitting a cover-only catalog
    pub require_products: bool,

    pub price: PriceOptions,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            title: "Catalogue".to_string(),
            subtitle: String::new(),
            primary_color: "#1976d2".to_string(),
            background_color: "#F0F0F0".to_string(),
            logo_path: None,
            cover_path: None,
            images_folder: None,
            quality: Quality::Hd,
            cards_per_page: 4,
            font_family: "Helvetica".to_string(),
            watermark: DEFAULT_WATERMARK.to_string(),
            require_products: false,
            price: PriceOptions::default(),
        }
    }
}

impl CatalogOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| CatalogError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        Rgb::from_hex(&self.primary_color)?;
        Rgb::from_hex(&self.background_color)?;
        self.price.validate()?;
        Ok(())
    }

    pub fn font(&self) -> FontFamily {
        FontFamily::from_name(&self.font_family)
    }
}
