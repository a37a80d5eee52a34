//! Card slot geometry
//!
//! Cards are stacked top to bottom in a single column between the margins.
//! When a positive cards-per-page count is configured the card height is
//! solved so the stack exactly fills the available height:
//!
//! `n * card_height + (n - 1) * gap = page_height - top - bottom`

use super::{Margins, Rect};
use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    pub gap: f32,
    pub card_width: f32,
    pub card_height: f32,
    /// Requested cards per page (0 means "use the fallback card height")
    pub cards_per_page: usize,
    /// Slots that actually fit on one page
    pub slots_per_page: usize,
}

impl LayoutSpec {
    /// Geometry for the fixed A4 portrait format
    pub fn compute(cards_per_page: usize) -> Self {
        Self::for_page(
            PAGE_WIDTH_PT,
            PAGE_HEIGHT_PT,
            Margins {
                left: LEFT_MARGIN_PT,
                right: RIGHT_MARGIN_PT,
                top: TOP_MARGIN_PT,
                bottom: BOTTOM_MARGIN_PT,
            },
            CARD_GAP_PT,
            cards_per_page,
        )
    }

    pub fn for_page(
        page_width: f32,
        page_height: f32,
        margins: Margins,
        gap: f32,
        cards_per_page: usize,
    ) -> Self {
        let available = (page_height - margins.top - margins.bottom).max(MIN_CARD_HEIGHT_PT);
        let card_width = (page_width - margins.left - margins.right).max(0.0);

        let card_height = if cards_per_page > 0 {
            let n = cards_per_page as f32;
            ((available - (n - 1.0) * gap) / n).clamp(MIN_CARD_HEIGHT_PT, available)
        } else {
            log::warn!(
                "cards_per_page is 0, using fallback card height of {:.1}pt",
                FALLBACK_CARD_HEIGHT_PT
            );
            FALLBACK_CARD_HEIGHT_PT.min(available)
        };

        // Small tolerance: the solved height fills the stack exactly
        let fitting = (((available + gap) / (card_height + gap)) + 1e-3).floor().max(1.0) as usize;
        let slots_per_page = if cards_per_page > 0 {
            cards_per_page.min(fitting)
        } else {
            fitting
        };

        if slots_per_page < cards_per_page {
            log::warn!(
                "Only {} of {} requested cards fit on a page",
                slots_per_page,
                cards_per_page
            );
        }

        Self {
            page_width,
            page_height,
            margins,
            gap,
            card_width,
            card_height,
            cards_per_page,
            slots_per_page,
        }
    }

    /// Height between the top and bottom margins
    pub fn available_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }

    /// Bottom edge of the card in slot `index`
    pub fn slot_y(&self, index: usize) -> f32 {
        self.page_height
            - self.margins.top
            - index as f32 * (self.card_height + self.gap)
            - self.card_height
    }

    pub fn slot_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.margins.left,
            self.slot_y(index),
            self.card_width,
            self.card_height,
        )
    }

    /// Product pages needed for `product_count` cards
    pub fn product_pages(&self, product_count: usize) -> usize {
        product_count.div_ceil(self.slots_per_page.max(1))
    }

    /// Total pages including the cover
    pub fn page_count(&self, product_count: usize) -> usize {
        1 + self.product_pages(product_count)
    }
}
