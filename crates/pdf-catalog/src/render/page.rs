//! Product page chrome: background, header banner, watermark, page number

use crate::color::Rgb;
use crate::constants::*;
use crate::layout::Rect;
use crate::options::FontFamily;
use crate::text::{TextMetrics, ellipsize_to_width};

use super::PageCanvas;

/// Everything drawn on a product page besides the cards
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub title: String,
    pub subtitle: String,
    pub primary: Rgb,
    pub background: Rgb,
    pub watermark: String,
    pub fonts: FontFamily,
    pub page_width: f32,
    pub page_height: f32,
}

impl PageChrome {
    /// Fresh product page with background and banner already painted
    pub fn begin_page(&self) -> PageCanvas {
        let mut canvas = PageCanvas::new();
        canvas.fill_rect(
            Rect::new(0.0, 0.0, self.page_width, self.page_height),
            self.background,
        );
        self.draw_banner(&mut canvas);
        canvas
    }

    fn draw_banner(&self, canvas: &mut PageCanvas) {
        canvas.fill_rect(
            Rect::new(
                0.0,
                self.page_height - BANNER_HEIGHT_PT,
                self.page_width,
                BANNER_HEIGHT_PT,
            ),
            self.primary,
        );

        let max_width = self.page_width - 2.0 * BANNER_TEXT_LEFT_PT;
        let title_font = self.fonts.bold();
        let title = fit_line(&self.title, title_font, BANNER_TITLE_SIZE, max_width);
        canvas.text(
            title_font,
            BANNER_TITLE_SIZE,
            Rgb::WHITE,
            BANNER_TEXT_LEFT_PT,
            self.page_height - BANNER_TITLE_FROM_TOP_PT,
            &title,
        );

        if !self.subtitle.trim().is_empty() {
            let font = self.fonts.regular();
            let subtitle = fit_line(&self.subtitle, font, BANNER_SUBTITLE_SIZE, max_width);
            canvas.text(
                font,
                BANNER_SUBTITLE_SIZE,
                Rgb::WHITE,
                BANNER_TEXT_LEFT_PT,
                self.page_height - BANNER_SUBTITLE_FROM_TOP_PT,
                &subtitle,
            );
        }
    }

    /// Stamp the watermark and the page number. The cover carries neither.
    pub fn finalize(&self, canvas: &mut PageCanvas, page_number: usize) {
        if page_number < 2 {
            return;
        }
        let center_x = self.page_width / 2.0;
        let font = self.fonts.regular();

        if !self.watermark.is_empty() {
            canvas.text_centered(
                font,
                WATERMARK_FONT_SIZE,
                Rgb::gray(WATERMARK_GRAY),
                center_x,
                WATERMARK_Y_PT,
                &self.watermark,
            );
        }

        canvas.text_centered(
            font,
            PAGE_NUMBER_FONT_SIZE,
            Rgb::BLACK,
            center_x,
            PAGE_NUMBER_Y_PT,
            &format!("Page {}", page_number),
        );
        log::debug!("Finalized page {}", page_number);
    }
}

fn fit_line(text: &str, font: impl TextMetrics, size: f32, max_width: f32) -> String {
    let text = text.trim();
    if font.text_width(text, size) <= max_width {
        text.to_string()
    } else {
        ellipsize_to_width(text, &font, size, max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> PageChrome {
        PageChrome {
            title: "Catalogue".into(),
            subtitle: "Printemps".into(),
            primary: Rgb::new(0x19, 0x76, 0xd2),
            background: Rgb::new(0xf0, 0xf0, 0xf0),
            watermark: DEFAULT_WATERMARK.into(),
            fonts: FontFamily::Helvetica,
            page_width: PAGE_WIDTH_PT,
            page_height: PAGE_HEIGHT_PT,
        }
    }

    #[test]
    fn test_watermark_from_page_two() {
        let chrome = chrome();
        let mut canvas = chrome.begin_page();
        chrome.finalize(&mut canvas, 2);
        // "Catalogue gé" and "Page 2" in WinAnsi hex
        assert!(canvas.ops().contains("436174616C6F6775652067E9"));
        assert!(canvas.ops().contains("<506167652032>"));
    }

    #[test]
    fn test_cover_is_left_unstamped() {
        let chrome = chrome();
        let mut canvas = PageCanvas::new();
        chrome.finalize(&mut canvas, 1);
        assert!(canvas.is_empty());
    }
}
