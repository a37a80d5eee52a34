//! Built-in PDF fonts: widths and WinAnsi encoding
//!
//! The catalog only uses the standard 14 Type1 fonts, so widths come from
//! the Adobe core metrics rather than parsed font files.

/// Anything that can measure a string at a given font size
pub trait TextMetrics {
    /// Rendered width of `text` in points at `size`
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Adapter turning a plain closure into [`TextMetrics`]
pub struct FnMetrics<F>(pub F);

impl<F: Fn(&str, f32) -> f32> TextMetrics for FnMetrics<F> {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        (self.0)(text, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl BuiltinFont {
    /// PostScript name used in the font dictionary
    pub fn base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
        }
    }

    /// Name under which the font is registered in page resources
    pub fn resource_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::Courier => "F3",
            BuiltinFont::CourierBold => "F4",
        }
    }

    /// Advance width of one character in thousandths of an em.
    ///
    /// Measured as the glyph actually shown, so characters outside WinAnsi
    /// take the width of `?`.
    pub fn char_width(self, c: char) -> u16 {
        let code = win_ansi_code(c);
        match self {
            BuiltinFont::Courier | BuiltinFont::CourierBold => 600,
            BuiltinFont::Helvetica => width_for(&HELVETICA_WIDTHS, &HELVETICA_HIGH_WIDTHS, code),
            BuiltinFont::HelveticaBold => width_for(&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_HIGH_WIDTHS, code),
        }
    }
}

impl TextMetrics for BuiltinFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

fn width_for(low: &[u16; 95], high: &[u16; 128], code: u8) -> u16 {
    match code {
        0x20..=0x7E => low[code as usize - 0x20],
        0x80..=0xFF => high[code as usize - 0x80],
        _ => low[0],
    }
}

/// Helvetica widths for ASCII 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica widths for WinAnsi 0x80..=0xFF (0 where the code is unassigned)
#[rustfmt::skip]
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold widths for ASCII 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica-Bold widths for WinAnsi 0x80..=0xFF
#[rustfmt::skip]
const HELVETICA_BOLD_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi code shown for `c`. Characters outside the code page become `?`;
/// both no-break spaces map to 0xA0.
fn win_ansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{202f}' => 0xA0,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        '\t' | '\n' | '\r' => b' ',
        _ => b'?',
    }
}

/// Encode text for a WinAnsiEncoding simple font
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_widths() {
        let w = BuiltinFont::Helvetica.text_width("Hello", 10.0);
        // H=722 e=556 l=222 l=222 o=556
        assert!((w - 22.78).abs() < 0.001);
        assert_eq!(BuiltinFont::Courier.text_width("abc", 10.0), 18.0);
        assert!(
            BuiltinFont::HelveticaBold.text_width("Catalogue", 12.0)
                > BuiltinFont::Helvetica.text_width("Catalogue", 12.0)
        );
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("12,50 €"), b"12,50 \x80".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("1\u{202f}234"), vec![b'1', 0xA0, b'2', b'3', b'4']);
        assert_eq!(encode_win_ansi("₹"), b"?".to_vec());
        assert_eq!(encode_win_ansi("Šœ"), vec![0x8A, 0x9C]);
    }

    #[test]
    fn test_accented_capitals_use_their_own_widths() {
        let font = BuiltinFont::HelveticaBold;
        assert_eq!(font.char_width('Œ'), 1000);
        assert_eq!(font.char_width('œ'), 944);
        assert_eq!(font.char_width('É'), 667);
        assert_eq!(font.char_width('Ç'), 722);
        assert_eq!(font.char_width('Ô'), 778);
        assert_eq!(BuiltinFont::Helvetica.char_width('æ'), 889);

        // 4445 + 278 + 3166 + 278 + 3445 units
        let width = font.text_width("ŒUVRES CŒUR ÉCOLE", 13.0);
        assert!((width - 150.956).abs() < 0.01);
    }

    #[test]
    fn test_unencodable_measures_as_question_mark() {
        let font = BuiltinFont::Helvetica;
        assert_eq!(font.char_width('₹'), font.char_width('?'));
        assert_eq!(font.char_width('\u{202f}'), font.char_width(' '));
    }
}
