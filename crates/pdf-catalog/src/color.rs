//! Hex color parsing and background readability checks

use crate::types::{CatalogError, Result};

/// Relative luminance below which a page background gets lightened
pub const BACKGROUND_LUMINANCE_THRESHOLD: f32 = 0.9;

/// Share of the distance to white added when lightening
const LIGHTEN_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f32) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(v, v, v)
    }

    /// Parse `#RRGGBB`, `RRGGBB` or the short `#RGB` form
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => {
                return Err(CatalogError::Config(format!(
                    "Invalid color '{}': expected #RRGGBB",
                    hex
                )));
            }
        };

        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| CatalogError::Config(format!("Invalid color '{}'", hex)))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Weighted luminance in 0.0..=1.0
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Components in 0.0..=1.0 for content stream operators
    pub fn components(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    fn lightened(self) -> Self {
        let lift = |c: u8| {
            let c = c as f32;
            (c + (255.0 - c) * LIGHTEN_FACTOR).min(255.0) as u8
        };
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }
}

/// Result of checking a background color for readability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundCheck {
    pub color: Rgb,
    /// True when the input was too dark and has been lightened
    pub adjusted: bool,
}

/// Lighten page backgrounds whose luminance would hurt readability.
pub fn validate_background_color(hex: &str) -> Result<BackgroundCheck> {
    let color = Rgb::from_hex(hex)?;
    if color.luminance() < BACKGROUND_LUMINANCE_THRESHOLD {
        let lightened = color.lightened();
        log::info!(
            "Background {} too dark (luminance {:.2}), using {}",
            color.to_hex(),
            color.luminance(),
            lightened.to_hex()
        );
        Ok(BackgroundCheck {
            color: lightened,
            adjusted: true,
        })
    } else {
        Ok(BackgroundCheck {
            color,
            adjusted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgb::from_hex("#1976d2").unwrap(), Rgb::new(0x19, 0x76, 0xd2));
        assert_eq!(Rgb::from_hex("1976D2").unwrap(), Rgb::new(0x19, 0x76, 0xd2));
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_dark_background_is_lightened() {
        let check = validate_background_color("#101010").unwrap();
        assert!(check.adjusted);
        assert_eq!(check.color.to_hex(), "#e7e7e7");
        assert!(check.color.luminance() >= BACKGROUND_LUMINANCE_THRESHOLD);
    }

    #[test]
    fn test_light_background_passes_through() {
        let check = validate_background_color("#F0F0F0").unwrap();
        assert!(!check.adjusted);
        assert_eq!(check.color, Rgb::new(0xf0, 0xf0, 0xf0));
    }
}
