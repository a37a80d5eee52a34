//! Slot assignment and pagination
//!
//! The engine starts on the cover. Once the cover is finished every call
//! to [`PageLayoutEngine::next_slot`] hands out the next card position,
//! opening a new page when the current one is full or when the next slot
//! would fall below the bottom margin.

use super::{LayoutSpec, Rect};
use crate::constants::LAYOUT_EPSILON_PT;
use crate::types::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Initial state; page 1 is being drawn
    OnCover,
    /// Drawing product cards on `page_number` (1-based, cover included)
    OnProductPage {
        page_number: usize,
        slots_used: usize,
    },
}

/// Where the next card goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAssignment {
    /// Physical page number, the cover being page 1
    pub page_number: usize,
    pub slot_index: usize,
    pub rect: Rect,
    /// The previous page must be finalized before drawing this card
    pub starts_new_page: bool,
}

pub struct PageLayoutEngine {
    spec: LayoutSpec,
    state: LayoutState,
}

impl PageLayoutEngine {
    pub fn new(spec: LayoutSpec) -> Self {
        Self {
            spec,
            state: LayoutState::OnCover,
        }
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Leave the cover. The cover counts as a full page, so the first slot
    /// requested afterwards opens page 2.
    pub fn finish_cover(&mut self) -> Result<()> {
        match self.state {
            LayoutState::OnCover => {
                self.state = LayoutState::OnProductPage {
                    page_number: 1,
                    slots_used: self.spec.slots_per_page,
                };
                Ok(())
            }
            LayoutState::OnProductPage { .. } => {
                Err(CatalogError::Layout("cover already finished".into()))
            }
        }
    }

    pub fn next_slot(&mut self) -> Result<SlotAssignment> {
        let LayoutState::OnProductPage {
            page_number,
            slots_used,
        } = self.state
        else {
            return Err(CatalogError::Layout(
                "slot requested before the cover was finished".into(),
            ));
        };

        let mut starts_new_page = slots_used >= self.spec.slots_per_page;
        if !starts_new_page {
            let y = self.spec.slot_y(slots_used);
            if y < self.spec.margins.bottom - LAYOUT_EPSILON_PT {
                log::warn!(
                    "Slot {} on page {} would start at y={:.2}pt, below the bottom margin; breaking page",
                    slots_used,
                    page_number,
                    y
                );
                starts_new_page = true;
            }
        }

        let (page_number, slot_index) = if starts_new_page {
            (page_number + 1, 0)
        } else {
            (page_number, slots_used)
        };

        self.state = LayoutState::OnProductPage {
            page_number,
            slots_used: slot_index + 1,
        };

        Ok(SlotAssignment {
            page_number,
            slot_index,
            rect: self.spec.slot_rect(slot_index),
            starts_new_page,
        })
    }

    /// Pages opened so far, cover included
    pub fn pages_used(&self) -> usize {
        match self.state {
            LayoutState::OnCover => 1,
            LayoutState::OnProductPage { page_number, .. } => page_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margins;

    #[test]
    fn test_slot_before_cover_is_an_error() {
        let mut engine = PageLayoutEngine::new(LayoutSpec::compute(4));
        assert!(engine.next_slot().is_err());
        engine.finish_cover().unwrap();
        assert!(engine.finish_cover().is_err());
    }

    #[test]
    fn test_pagination_ten_products_four_per_page() {
        let mut engine = PageLayoutEngine::new(LayoutSpec::compute(4));
        engine.finish_cover().unwrap();

        let slots: Vec<_> = (0..10).map(|_| engine.next_slot().unwrap()).collect();
        let pages: Vec<_> = slots.iter().map(|s| s.page_number).collect();
        assert_eq!(pages, vec![2, 2, 2, 2, 3, 3, 3, 3, 4, 4]);
        let indices: Vec<_> = slots.iter().map(|s| s.slot_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
        let breaks: Vec<_> = slots.iter().map(|s| s.starts_new_page).collect();
        assert_eq!(
            breaks,
            vec![true, false, false, false, true, false, false, false, true, false]
        );
        assert_eq!(engine.pages_used(), 4);
        assert_eq!(engine.spec().page_count(10), engine.pages_used());
    }

    #[test]
    fn test_bottom_margin_safety_break() {
        // Geometry that claims four slots while only two fit
        let mut spec = LayoutSpec::for_page(
            200.0,
            300.0,
            Margins {
                left: 10.0,
                right: 10.0,
                top: 10.0,
                bottom: 10.0,
            },
            10.0,
            2,
        );
        spec.slots_per_page = 4;

        let mut engine = PageLayoutEngine::new(spec);
        engine.finish_cover().unwrap();
        let pages: Vec<_> = (0..4).map(|_| engine.next_slot().unwrap().page_number).collect();
        assert_eq!(pages, vec![2, 2, 3, 3]);
    }

    #[test]
    fn test_same_slots_on_every_run() {
        let run = || {
            let mut engine = PageLayoutEngine::new(LayoutSpec::compute(3));
            engine.finish_cover().unwrap();
            (0..7).map(|_| engine.next_slot().unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
