//! Catalog assembly
//!
//! One run goes through these steps:
//! 1. Validate options and plan the card density for the page geometry
//! 2. Draw the cover as page 1
//! 3. Walk the products through the layout engine, drawing each card and
//!    closing pages as the engine opens new ones
//! 4. Stamp the last page and hand back the document, ready to serialize

use std::path::Path;

use crate::color::{Rgb, validate_background_color};
use crate::document::{CatalogDocument, SlotRecord};
use crate::images::{DecodedImage, ImageResolver};
use crate::layout::{LayoutSpec, PageLayoutEngine};
use crate::options::CatalogOptions;
use crate::price::PriceNormalizer;
use crate::render::{Card, CardRenderer, CoverRenderer, Density, PageCanvas, PageChrome, plan_density};
use crate::types::{CatalogError, Product, Result};

/// Receives `(index, total, fraction)` after each product is drawn.
///
/// Purely informational: implementations must return quickly and cannot
/// influence the run.
pub trait ProgressSink {
    fn report(&mut self, index: usize, total: usize, fraction: f32);
}

impl<F: FnMut(usize, usize, f32)> ProgressSink for F {
    fn report(&mut self, index: usize, total: usize, fraction: f32) {
        self(index, total, fraction)
    }
}

/// Discards progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _index: usize, _total: usize, _fraction: f32) {}
}

pub struct CatalogAssembler<'a> {
    options: &'a CatalogOptions,
    resolver: &'a dyn ImageResolver,
}

impl<'a> CatalogAssembler<'a> {
    pub fn new(options: &'a CatalogOptions, resolver: &'a dyn ImageResolver) -> Self {
        Self { options, resolver }
    }

    /// Card geometry and the density cards will be drawn at
    pub fn plan(&self) -> Result<(LayoutSpec, Density)> {
        let spec = LayoutSpec::compute(self.options.cards_per_page);
        let density = plan_density(spec.card_width, spec.card_height, self.options.cards_per_page)?;
        Ok((spec, density))
    }

    pub fn assemble(&self, products: &[Product], progress: &mut dyn ProgressSink) -> Result<CatalogDocument> {
        let options = self.options;
        options.validate()?;

        if products.is_empty() && options.require_products {
            return Err(CatalogError::NoProducts);
        }

        let primary = Rgb::from_hex(&options.primary_color)?;
        let background = validate_background_color(&options.background_color)?.color;

        // An empty run never draws a card, so any geometry is acceptable
        let (spec, density) = if products.is_empty() {
            (LayoutSpec::compute(options.cards_per_page), Density::Regular)
        } else {
            self.plan()?
        };

        let fonts = options.font();
        let mut doc = CatalogDocument::new(&options.title, spec.page_width, spec.page_height);
        let chrome = PageChrome {
            title: options.title.clone(),
            subtitle: options.subtitle.clone(),
            primary,
            background,
            watermark: options.watermark.clone(),
            fonts,
            page_width: spec.page_width,
            page_height: spec.page_height,
        };

        // Cover
        let cover = CoverRenderer {
            title: options.title.clone(),
            subtitle: options.subtitle.clone(),
            primary,
            fonts,
            quality: options.quality,
            page_width: spec.page_width,
            page_height: spec.page_height,
        };
        let cover = cover.draw(
            &mut doc,
            load_optional(options.cover_path.as_deref(), "cover"),
            load_optional(options.logo_path.as_deref(), "logo"),
        )?;
        doc.add_page(cover)?;

        let mut engine = PageLayoutEngine::new(spec);
        engine.finish_cover()?;

        let total = products.len();
        if total == 0 {
            log::info!("No products, catalog has only the cover");
            progress.report(0, 0, 1.0);
            return Ok(doc);
        }

        let normalizer = PriceNormalizer::new(options.price.clone());
        let renderer = CardRenderer::new(&normalizer, fonts, options.quality).with_density(density);
        let mut current: Option<(usize, PageCanvas)> = None;

        for (index, product) in products.iter().enumerate() {
            let slot = engine.next_slot()?;

            if slot.starts_new_page {
                if let Some((page_number, canvas)) = current.take() {
                    close_page(&mut doc, &chrome, page_number, canvas)?;
                }
                current = Some((slot.page_number, chrome.begin_page()));
            }

            let Some((_, canvas)) = current.as_mut() else {
                return Err(CatalogError::Layout(format!(
                    "product {} was assigned a slot before any page was opened",
                    index
                )));
            };

            let card = Card {
                rect: slot.rect,
                product,
                index,
                slot_index: slot.slot_index,
            };
            let image = self.resolver.resolve(index, product);
            renderer.draw(&mut doc, canvas, &card, image)?;

            doc.record_slot(SlotRecord {
                product_index: index,
                page_number: slot.page_number,
                slot_index: slot.slot_index,
                rect: slot.rect,
            });

            progress.report(index + 1, total, (index + 1) as f32 / total as f32);
        }

        if let Some((page_number, canvas)) = current.take() {
            close_page(&mut doc, &chrome, page_number, canvas)?;
        }

        log::info!(
            "Assembled {} products on {} pages ({:?} cards, {} per page)",
            total,
            doc.page_count(),
            density,
            spec.slots_per_page
        );
        Ok(doc)
    }
}

fn close_page(doc: &mut CatalogDocument, chrome: &PageChrome, page_number: usize, mut canvas: PageCanvas) -> Result<()> {
    chrome.finalize(&mut canvas, page_number);
    let added = doc.add_page(canvas)?;
    if added != page_number {
        return Err(CatalogError::Layout(format!(
            "page {} was written as page {}",
            page_number, added
        )));
    }
    Ok(())
}

fn load_optional(path: Option<&Path>, what: &str) -> Option<DecodedImage> {
    let path = path?;
    match DecodedImage::open(path) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Ignoring {} image {}: {}", what, path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoImages;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                Product::new()
                    .with("title", format!("Produit {}", i))
                    .with("price", "9,90 €")
            })
            .collect()
    }

    #[test]
    fn test_slots_follow_engine() {
        let options = CatalogOptions::default();
        let doc = CatalogAssembler::new(&options, &NoImages)
            .assemble(&products(10), &mut NoProgress)
            .unwrap();
        assert_eq!(doc.page_count(), 4);
        let pages: Vec<usize> = doc.slots().iter().map(|s| s.page_number).collect();
        assert_eq!(pages, vec![2, 2, 2, 2, 3, 3, 3, 3, 4, 4]);
    }

    #[test]
    fn test_progress_is_reported_per_product() {
        let options = CatalogOptions::default();
        let mut seen = Vec::new();
        let mut sink = |index: usize, total: usize, fraction: f32| seen.push((index, total, fraction));
        CatalogAssembler::new(&options, &NoImages)
            .assemble(&products(3), &mut sink)
            .unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[2], (3, 3, 1.0));
    }

    #[test]
    fn test_missing_cover_image_is_ignored() {
        let options = CatalogOptions {
            cover_path: Some("/nonexistent/cover.jpg".into()),
            ..Default::default()
        };
        let doc = CatalogAssembler::new(&options, &NoImages)
            .assemble(&products(1), &mut NoProgress)
            .unwrap();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let options = CatalogOptions {
            primary_color: "blue".into(),
            ..Default::default()
        };
        let result = CatalogAssembler::new(&options, &NoImages).assemble(&products(1), &mut NoProgress);
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
