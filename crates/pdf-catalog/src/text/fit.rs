//! Shrink-to-fit text blocks
//!
//! Text is wrapped at a starting size and shrunk step by step until the
//! block fits its box. At the minimum size the box grows instead: text is
//! never clipped.

use super::metrics::TextMetrics;
use super::wrap::{block_width, wrap_text};
use crate::constants::MAX_WORD_LENGTH;

/// Parameters for fitting one block of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub box_width: f32,
    pub box_height: f32,
    pub start_size: f32,
    pub min_size: f32,
    /// Decrement applied at each shrink attempt
    pub step: f32,
    /// Added to the font size to get the line height
    pub leading_extra: f32,
    pub max_word_len: usize,
}

impl FitRequest {
    pub fn new(box_width: f32, box_height: f32, start_size: f32, min_size: f32) -> Self {
        Self {
            box_width,
            box_height,
            start_size,
            min_size: min_size.min(start_size),
            step: 2.0,
            leading_extra: 6.0,
            max_word_len: MAX_WORD_LENGTH,
        }
    }

    pub fn step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn leading_extra(mut self, extra: f32) -> Self {
        self.leading_extra = extra;
        self
    }
}

/// A wrapped block and the size it was fitted at
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub line_height: f32,
    /// Widest rendered line
    pub width: f32,
    /// Height of the wrapped block
    pub height: f32,
    /// Box height after fitting; larger than requested only when grown
    pub box_height: f32,
    pub grown: bool,
}

pub struct TextFitter<'a> {
    metrics: &'a dyn TextMetrics,
}

impl<'a> TextFitter<'a> {
    pub fn new(metrics: &'a dyn TextMetrics) -> Self {
        Self { metrics }
    }

    pub fn fit(&self, text: &str, request: &FitRequest) -> FittedText {
        let step = if request.step > 0.0 { request.step } else { 1.0 };
        let mut size = request.start_size;

        loop {
            let lines = wrap_text(
                text,
                self.metrics,
                size,
                request.box_width,
                request.max_word_len,
            );
            let line_height = size + request.leading_extra;
            let height = lines.len() as f32 * line_height;

            if height <= request.box_height || size <= request.min_size {
                let grown = height > request.box_height;
                if grown {
                    log::debug!(
                        "Growing text box from {:.1}pt to {:.1}pt at {:.1}pt font",
                        request.box_height,
                        height,
                        size
                    );
                }
                return FittedText {
                    width: block_width(&lines, self.metrics, size),
                    lines,
                    font_size: size,
                    line_height,
                    height,
                    box_height: if grown { height } else { request.box_height },
                    grown,
                };
            }

            size = (size - step).max(request.min_size);
        }
    }
}
