//! Product cards
//!
//! A card is an image zone on the left and a text column on the right:
//! title, price, description and a metadata line pinned to the bottom.
//! Two densities exist; `Compact` is used when the regular metrics cannot
//! fit the fixed content into the card height.

use crate::color::Rgb;
use crate::constants::*;
use crate::document::CatalogDocument;
use crate::images::{ImageFit, ImageResolution};
use crate::layout::Rect;
use crate::options::{FontFamily, Quality};
use crate::price::PriceNormalizer;
use crate::text::{TextMetrics, ellipsize_to_width, limit_lines, smart_truncate, wrap_text};
use crate::types::{CatalogError, Product, ProductField, Result};

use super::PageCanvas;

const CARD_BACKGROUND: Rgb = Rgb::WHITE;
const CARD_BORDER: Rgb = Rgb::new(0xE5, 0xE7, 0xEB);
const PLACEHOLDER_FILL: Rgb = Rgb::new(0xF3, 0xF4, 0xF6);
const PLACEHOLDER_TEXT: Rgb = Rgb::new(0x9C, 0xA3, 0xAF);
const PLACEHOLDER_FONT_SIZE: f32 = 8.0;
const TEXT_COLOR: Rgb = Rgb::BLACK;
const PRICE_COLOR: Rgb = Rgb::new(0xEF, 0x44, 0x44);
const META_COLOR: Rgb = Rgb::new(0x6B, 0x72, 0x80);
const MISSING_PRICE: &str = "Prix N/A";

/// Narrowest text column still worth drawing
const MIN_TEXT_COLUMN_PT: f32 = cm_to_pt(2.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Regular,
    Compact,
}

/// Font sizes and spacing for one density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    pub top_pad: f32,
    pub image_width: f32,
    pub title_size: f32,
    pub title_leading: f32,
    pub title_max_lines: usize,
    pub after_title: f32,
    pub price_size: f32,
    pub price_advance: f32,
    pub desc_size: f32,
    pub desc_leading: f32,
    pub desc_max_lines: usize,
    pub desc_max_chars: usize,
    pub meta_size: f32,
}

impl Density {
    pub fn metrics(self) -> CardMetrics {
        match self {
            Density::Regular => CardMetrics {
                top_pad: cm_to_pt(0.5),
                image_width: cm_to_pt(4.0),
                title_size: 13.0,
                title_leading: cm_to_pt(0.6),
                title_max_lines: 2,
                after_title: cm_to_pt(0.4),
                price_size: 16.0,
                price_advance: cm_to_pt(1.0),
                desc_size: 9.0,
                desc_leading: cm_to_pt(0.35),
                desc_max_lines: 6,
                desc_max_chars: 400,
                meta_size: 8.0,
            },
            Density::Compact => CardMetrics {
                top_pad: cm_to_pt(0.3),
                image_width: cm_to_pt(3.0),
                title_size: 11.0,
                title_leading: cm_to_pt(0.45),
                title_max_lines: 1,
                after_title: cm_to_pt(0.2),
                price_size: 12.0,
                price_advance: cm_to_pt(0.6),
                desc_size: 7.5,
                desc_leading: cm_to_pt(0.3),
                desc_max_lines: 3,
                desc_max_chars: 200,
                meta_size: 7.0,
            },
        }
    }
}

impl CardMetrics {
    /// Height of the metadata band at the bottom of the card
    fn meta_band(&self) -> f32 {
        CARD_META_BASELINE_PT + self.meta_size + CARD_META_GAP_PT
    }

    /// Height taken by everything but title lines and description
    fn fixed_height(&self) -> f32 {
        self.top_pad + self.after_title + self.price_advance + self.meta_band()
    }

    /// Smallest card that holds one title line, the price and the metadata
    pub fn required_height(&self) -> f32 {
        self.fixed_height() + self.title_leading
    }

    pub fn required_width(&self) -> f32 {
        CARD_IMAGE_INSET_PT + self.image_width + CARD_TEXT_GAP_PT + CARD_RIGHT_PAD_PT + MIN_TEXT_COLUMN_PT
    }

    fn fits(&self, card_width: f32, card_height: f32) -> bool {
        card_height + LAYOUT_EPSILON_PT >= self.required_height() && card_width >= self.required_width()
    }
}

/// Pick the densest layout that fits, trying `Regular` then `Compact` once
pub fn plan_density(card_width: f32, card_height: f32, cards_per_page: usize) -> Result<Density> {
    if Density::Regular.metrics().fits(card_width, card_height) {
        return Ok(Density::Regular);
    }

    log::info!(
        "Cards of {:.1}pt are too small for the regular layout ({:.1}pt needed), retrying compact",
        card_height,
        Density::Regular.metrics().required_height()
    );

    let compact = Density::Compact.metrics();
    if compact.fits(card_width, card_height) {
        return Ok(Density::Compact);
    }

    Err(CatalogError::LayoutOverflow {
        card_width_pt: card_width,
        card_height_pt: card_height,
        required_height_pt: compact.required_height(),
        cards_per_page,
    })
}

/// One product placed in one slot; lives for a single draw call
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    pub rect: Rect,
    pub product: &'a Product,
    /// Position in the input list
    pub index: usize,
    pub slot_index: usize,
}

pub struct CardRenderer<'a> {
    normalizer: &'a PriceNormalizer,
    fonts: FontFamily,
    quality: Quality,
    density: Density,
}

impl<'a> CardRenderer<'a> {
    pub fn new(normalizer: &'a PriceNormalizer, fonts: FontFamily, quality: Quality) -> Self {
        Self {
            normalizer,
            fonts,
            quality,
            density: Density::Regular,
        }
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Draw `card` onto `canvas`. Image problems end in the placeholder;
    /// only document errors are returned.
    pub fn draw(
        &self,
        doc: &mut CatalogDocument,
        canvas: &mut PageCanvas,
        card: &Card<'_>,
        image: ImageResolution,
    ) -> Result<()> {
        let m = self.density.metrics();
        let rect = card.rect;

        canvas.fill_rect(rect, CARD_BACKGROUND);
        canvas.stroke_rect(rect, CARD_BORDER, CARD_BORDER_WIDTH);

        let zone = Rect::new(
            rect.x + CARD_IMAGE_INSET_PT,
            rect.y + CARD_IMAGE_INSET_PT,
            m.image_width,
            (rect.height - 2.0 * CARD_IMAGE_INSET_PT).max(0.0),
        );
        self.draw_image_zone(doc, canvas, card, zone, image)?;

        let text_x = zone.right() + CARD_TEXT_GAP_PT;
        let text_width = (rect.right() - CARD_RIGHT_PAD_PT - text_x).max(0.0);
        let mut cursor = rect.top() - m.top_pad;

        // Title
        let bold = self.fonts.bold();
        let title = card.product.text(ProductField::Title);
        let room = ((rect.height - m.fixed_height()) / m.title_leading).floor().max(1.0) as usize;
        let title_lines = limit_lines(
            wrap_text(&title, &bold, m.title_size, text_width, MAX_WORD_LENGTH),
            m.title_max_lines.min(room),
            &bold,
            m.title_size,
            text_width,
        );
        for line in &title_lines {
            canvas.text(bold, m.title_size, TEXT_COLOR, text_x, cursor, line);
            cursor -= m.title_leading;
        }
        if title_lines.is_empty() {
            cursor -= m.title_leading;
        }
        cursor -= m.after_title;

        // Price
        let price = match card.product.resolve(ProductField::Price) {
            Some(raw) => self.normalizer.normalize(raw).display,
            None => String::new(),
        };
        let price = if price.is_empty() { MISSING_PRICE.to_string() } else { price };
        let price = fit_width(&price, &bold, m.price_size, text_width);
        canvas.text(bold, m.price_size, PRICE_COLOR, text_x, cursor, &price);
        cursor -= m.price_advance;

        // Description, stopping above the metadata band
        let regular = self.fonts.regular();
        let description = smart_truncate(&card.product.text(ProductField::Description), m.desc_max_chars);
        let meta_top = rect.y + m.meta_band();
        let desc_room = if cursor >= meta_top {
            ((cursor - meta_top) / m.desc_leading).floor() as usize + 1
        } else {
            0
        };
        let desc_lines = limit_lines(
            wrap_text(&description, &regular, m.desc_size, text_width, MAX_WORD_LENGTH),
            m.desc_max_lines.min(desc_room),
            &regular,
            m.desc_size,
            text_width,
        );
        for line in &desc_lines {
            canvas.text(regular, m.desc_size, TEXT_COLOR, text_x, cursor, line);
            cursor -= m.desc_leading;
        }

        // Metadata
        let meta = format!(
            "Qté: {} • Réf: {} • {}",
            card.product.text(ProductField::Quantity),
            card.product.text(ProductField::Reference),
            card.product.text(ProductField::Material)
        );
        let meta = fit_width(&meta, &regular, m.meta_size, text_width);
        canvas.text(
            regular,
            m.meta_size,
            META_COLOR,
            text_x,
            rect.y + CARD_META_BASELINE_PT,
            &meta,
        );

        Ok(())
    }

    fn draw_image_zone(
        &self,
        doc: &mut CatalogDocument,
        canvas: &mut PageCanvas,
        card: &Card<'_>,
        zone: Rect,
        image: ImageResolution,
    ) -> Result<()> {
        let bitmap = match image {
            ImageResolution::Bitmap(bitmap) => bitmap,
            ImageResolution::Unavailable(reason) => {
                log::debug!("No image for product {}: {}", card.index, reason);
                self.draw_placeholder(canvas, zone);
                return Ok(());
            }
        };

        let encoded = match bitmap.encode(zone.width, zone.height, ImageFit::Contain, self.quality) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Image for product {} could not be prepared: {}", card.index, e);
                self.draw_placeholder(canvas, zone);
                return Ok(());
            }
        };

        let placed = contain(zone, bitmap.aspect_ratio());
        let image_id = doc.embed_image(&encoded)?;
        canvas.draw_image(image_id, placed);
        Ok(())
    }

    fn draw_placeholder(&self, canvas: &mut PageCanvas, zone: Rect) {
        canvas.fill_rect(zone, PLACEHOLDER_FILL);
        canvas.text_centered(
            self.fonts.regular(),
            PLACEHOLDER_FONT_SIZE,
            PLACEHOLDER_TEXT,
            zone.center_x(),
            zone.center_y(),
            PLACEHOLDER_LABEL,
        );
    }
}

/// Largest rect with `aspect` (width / height) centered inside `zone`
fn contain(zone: Rect, aspect: f32) -> Rect {
    if zone.height <= 0.0 || aspect <= 0.0 {
        return zone;
    }
    let (width, height) = if aspect > zone.width / zone.height {
        (zone.width, zone.width / aspect)
    } else {
        (zone.height * aspect, zone.height)
    };
    Rect::new(
        zone.x + (zone.width - width) / 2.0,
        zone.y + (zone.height - height) / 2.0,
        width,
        height,
    )
}

fn fit_width(text: &str, metrics: &dyn TextMetrics, size: f32, max_width: f32) -> String {
    if metrics.text_width(text, size) <= max_width {
        text.to_string()
    } else {
        ellipsize_to_width(text, metrics, size, max_width)
    }
}
