//! Cover page
//!
//! Optional full-bleed background image, optional logo in the top-right
//! corner, then the title and subtitle in translucent rounded boxes whose
//! size depends on how long the text is.

use crate::color::Rgb;
use crate::constants::*;
use crate::document::CatalogDocument;
use crate::images::{DecodedImage, ImageFit};
use crate::layout::Rect;
use crate::options::{FontFamily, Quality};
use crate::text::{BuiltinFont, FitRequest, FittedText, TextFitter};
use crate::types::Result;

use super::PageCanvas;

const TITLE_COLOR: Rgb = Rgb::new(0x1E, 0x3A, 0x8A);

/// Offsets of the tier-height box bottoms from the vertical page center
const TITLE_BOTTOM_ABOVE_CENTER_PT: f32 = 30.0;
const SUBTITLE_BOTTOM_BELOW_CENTER_PT: f32 = 80.0;

/// Which edge of a text box stays put when the fitter grows it
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Bottom(f32),
    Top(f32),
}

/// Box size and starting font chosen from the text length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTier {
    /// Fraction of the page width
    pub width_ratio: f32,
    pub height: f32,
    pub font_size: f32,
}

impl BoxTier {
    pub fn for_title(text: &str) -> Self {
        let (width_ratio, height_cm, font_size) = match text.chars().count() {
            0..=30 => (0.75, 3.5, 38.0),
            31..=50 => (0.80, 4.0, 34.0),
            51..=70 => (0.85, 4.5, 30.0),
            _ => (0.90, 5.0, 26.0),
        };
        Self {
            width_ratio,
            height: cm_to_pt(height_cm),
            font_size,
        }
    }

    pub fn for_subtitle(text: &str) -> Self {
        let (width_ratio, height_cm, font_size) = match text.chars().count() {
            0..=40 => (0.60, 2.5, 20.0),
            41..=60 => (0.65, 3.0, 18.0),
            _ => (0.70, 3.5, 16.0),
        };
        Self {
            width_ratio,
            height: cm_to_pt(height_cm),
            font_size,
        }
    }
}

pub struct CoverRenderer {
    pub title: String,
    pub subtitle: String,
    pub primary: Rgb,
    pub fonts: FontFamily,
    pub quality: Quality,
    pub page_width: f32,
    pub page_height: f32,
}

impl CoverRenderer {
    /// Draw the cover. Image problems are logged and the image skipped.
    pub fn draw(
        &self,
        doc: &mut CatalogDocument,
        background: Option<DecodedImage>,
        logo: Option<DecodedImage>,
    ) -> Result<PageCanvas> {
        let mut canvas = PageCanvas::new();
        let page = Rect::new(0.0, 0.0, self.page_width, self.page_height);

        if let Some(background) = background {
            match background.encode(page.width, page.height, ImageFit::Stretch, self.quality) {
                Ok(encoded) => {
                    let id = doc.embed_image(&encoded)?;
                    canvas.draw_image(id, page);
                }
                Err(e) => log::warn!("Cover image skipped: {}", e),
            }
        }

        if let Some(logo) = logo {
            self.draw_logo(doc, &mut canvas, &logo)?;
        }

        self.draw_title(&mut canvas);
        self.draw_subtitle(&mut canvas);

        Ok(canvas)
    }

    /// Title box; grows upward from its bottom edge
    fn draw_title(&self, canvas: &mut PageCanvas) -> Option<Rect> {
        let tier = BoxTier::for_title(&self.title);
        let bottom = self.page_height / 2.0 + TITLE_BOTTOM_ABOVE_CENTER_PT;
        self.draw_text_box(
            canvas,
            &self.title,
            tier,
            Anchor::Bottom(bottom),
            TextStyle {
                font: self.fonts.bold(),
                min_size: TITLE_MIN_FONT_SIZE,
                step: TITLE_FONT_STEP,
                leading_extra: TITLE_LEADING_EXTRA,
                radius: TITLE_BOX_RADIUS_PT,
                color: TITLE_COLOR,
            },
        )
    }

    /// Subtitle box; grows downward so it never reaches the title
    fn draw_subtitle(&self, canvas: &mut PageCanvas) -> Option<Rect> {
        let tier = BoxTier::for_subtitle(&self.subtitle);
        let top = self.page_height / 2.0 - SUBTITLE_BOTTOM_BELOW_CENTER_PT + tier.height;
        self.draw_text_box(
            canvas,
            &self.subtitle,
            tier,
            Anchor::Top(top),
            TextStyle {
                font: self.fonts.regular(),
                min_size: SUBTITLE_MIN_FONT_SIZE,
                step: SUBTITLE_FONT_STEP,
                leading_extra: SUBTITLE_LEADING_EXTRA,
                radius: SUBTITLE_BOX_RADIUS_PT,
                color: self.primary,
            },
        )
    }

    fn draw_logo(&self, doc: &mut CatalogDocument, canvas: &mut PageCanvas, logo: &DecodedImage) -> Result<()> {
        let encoded = match logo.encode(LOGO_BOX_PT, LOGO_BOX_PT, ImageFit::Contain, self.quality) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Logo skipped: {}", e);
                return Ok(());
            }
        };

        // Anchored to the top-right corner of its box
        let aspect = logo.aspect_ratio();
        let (width, height) = if aspect >= 1.0 {
            (LOGO_BOX_PT, LOGO_BOX_PT / aspect)
        } else {
            (LOGO_BOX_PT * aspect, LOGO_BOX_PT)
        };
        let right = self.page_width - LOGO_EDGE_OFFSET_PT;
        let top = self.page_height - LOGO_EDGE_OFFSET_PT;
        let id = doc.embed_image(&encoded)?;
        canvas.draw_image(id, Rect::new(right - width, top - height, width, height));
        Ok(())
    }

    fn draw_text_box(
        &self,
        canvas: &mut PageCanvas,
        text: &str,
        tier: BoxTier,
        anchor: Anchor,
        style: TextStyle,
    ) -> Option<Rect> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let font = style.font;
        let box_width = self.page_width * tier.width_ratio;
        let request = FitRequest::new(
            box_width - 2.0 * COVER_TEXT_PAD_X_PT,
            tier.height - 2.0 * COVER_TEXT_PAD_Y_PT,
            tier.font_size,
            style.min_size,
        )
        .step(style.step)
        .leading_extra(style.leading_extra);
        let fitted = TextFitter::new(&font).fit(text, &request);

        let box_height = fitted.box_height + 2.0 * COVER_TEXT_PAD_Y_PT;
        let bottom = match anchor {
            Anchor::Bottom(y) => y,
            Anchor::Top(y) => y - box_height,
        };
        let rect = Rect::new((self.page_width - box_width) / 2.0, bottom, box_width, box_height);
        canvas.fill_round_rect(rect, style.radius, Rgb::WHITE, COVER_BOX_ALPHA);

        for (line, baseline) in fitted.lines.iter().zip(baselines(&fitted, rect)) {
            canvas.text_centered(font, fitted.font_size, style.color, rect.center_x(), baseline, line);
        }
        Some(rect)
    }
}

struct TextStyle {
    font: BuiltinFont,
    min_size: f32,
    step: f32,
    leading_extra: f32,
    radius: f32,
    color: Rgb,
}

/// Baselines of a fitted block centered vertically in `rect`, top line first
fn baselines(fitted: &FittedText, rect: Rect) -> impl Iterator<Item = f32> {
    let block_bottom = rect.y + (rect.height - fitted.height) / 2.0;
    // Lift by half the leading plus an approximate descender
    let lift = (fitted.line_height - fitted.font_size) / 2.0 + fitted.font_size * 0.2;
    let count = fitted.lines.len();
    let line_height = fitted.line_height;
    (0..count).map(move |i| block_bottom + (count - 1 - i) as f32 * line_height + lift)
}
