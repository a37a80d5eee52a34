//! Content stream builder for one page
//!
//! Drawing calls append PDF operators to a string and remember which
//! fonts, images and transparency states the page needs. The document
//! turns those into the page's resource dictionary when the page is added.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use lopdf::ObjectId;

use crate::color::Rgb;
use crate::constants::BEZIER_CIRCLE_FACTOR;
use crate::layout::Rect;
use crate::text::{BuiltinFont, TextMetrics, encode_win_ansi};

#[derive(Debug, Default)]
pub struct PageCanvas {
    ops: String,
    fonts: BTreeSet<BuiltinFont>,
    images: BTreeMap<String, ObjectId>,
    /// Graphics state name -> fill alpha
    alphas: BTreeMap<String, f32>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &str {
        &self.ops
    }

    pub(crate) fn fonts(&self) -> &BTreeSet<BuiltinFont> {
        &self.fonts
    }

    pub(crate) fn images(&self) -> &BTreeMap<String, ObjectId> {
        &self.images
    }

    pub(crate) fn alphas(&self) -> &BTreeMap<String, f32> {
        &self.alphas
    }

    pub(crate) fn into_content(self) -> Vec<u8> {
        self.ops.into_bytes()
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let (r, g, b) = color.components();
        let _ = writeln!(
            self.ops,
            "q {:.3} {:.3} {:.3} rg {:.2} {:.2} {:.2} {:.2} re f Q",
            r, g, b, rect.x, rect.y, rect.width, rect.height
        );
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f32) {
        let (r, g, b) = color.components();
        let _ = writeln!(
            self.ops,
            "q {:.3} {:.3} {:.3} RG {:.2} w {:.2} {:.2} {:.2} {:.2} re S Q",
            r, g, b, line_width, rect.x, rect.y, rect.width, rect.height
        );
    }

    /// Filled rectangle with rounded corners, optionally translucent
    pub fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Rgb, alpha: f32) {
        let radius = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
        let k = radius * BEZIER_CIRCLE_FACTOR;
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let (r, g, b) = color.components();

        self.ops.push_str("q ");
        if alpha < 1.0 {
            let name = self.alpha_state(alpha);
            let _ = write!(self.ops, "/{} gs ", name);
        }
        let _ = writeln!(self.ops, "{:.3} {:.3} {:.3} rg", r, g, b);
        let _ = writeln!(self.ops, "{:.2} {:.2} m", x + radius, y);
        let _ = writeln!(self.ops, "{:.2} {:.2} l", x + w - radius, y);
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w - radius + k,
            y,
            x + w,
            y + radius - k,
            x + w,
            y + radius
        );
        let _ = writeln!(self.ops, "{:.2} {:.2} l", x + w, y + h - radius);
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w,
            y + h - radius + k,
            x + w - radius + k,
            y + h,
            x + w - radius,
            y + h
        );
        let _ = writeln!(self.ops, "{:.2} {:.2} l", x + radius, y + h);
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + radius - k,
            y + h,
            x,
            y + h - radius + k,
            x,
            y + h - radius
        );
        let _ = writeln!(self.ops, "{:.2} {:.2} l", x, y + radius);
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x,
            y + radius - k,
            x + radius - k,
            y,
            x + radius,
            y
        );
        self.ops.push_str("h f Q\n");
    }

    /// Draw `text` with its baseline starting at (`x`, `y`)
    pub fn text(&mut self, font: BuiltinFont, size: f32, color: Rgb, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.fonts.insert(font);
        let (r, g, b) = color.components();
        let _ = writeln!(
            self.ops,
            "BT /{} {:.2} Tf {:.3} {:.3} {:.3} rg {:.2} {:.2} Td <{}> Tj ET",
            font.resource_name(),
            size,
            r,
            g,
            b,
            x,
            y,
            hex_string(text)
        );
    }

    /// Draw `text` horizontally centered on `center_x`
    pub fn text_centered(
        &mut self,
        font: BuiltinFont,
        size: f32,
        color: Rgb,
        center_x: f32,
        y: f32,
        text: &str,
    ) {
        let width = font.text_width(text, size);
        self.text(font, size, color, center_x - width / 2.0, y, text);
    }

    /// Paint an embedded image XObject into `rect`
    pub fn draw_image(&mut self, image_id: ObjectId, rect: Rect) {
        let name = format!("Im{}", image_id.0);
        let _ = writeln!(
            self.ops,
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{} Do Q",
            rect.width, rect.height, rect.x, rect.y, name
        );
        self.images.insert(name, image_id);
    }

    fn alpha_state(&mut self, alpha: f32) -> String {
        let alpha = alpha.clamp(0.0, 1.0);
        let name = format!("GS{}", (alpha * 100.0).round() as u32);
        self.alphas.insert(name.clone(), alpha);
        name
    }
}

fn hex_string(text: &str) -> String {
    encode_win_ansi(text).iter().fold(String::new(), |mut out, b| {
        let _ = write!(out, "{:02X}", b);
        out
    })
}
