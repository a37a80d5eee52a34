//! Numeric token extraction with competing separator grammars

use regex::Regex;
use std::sync::LazyLock;

/// Which character is the decimal separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberGrammar {
    /// `1 234,56` / `1.234,56`
    CommaDecimal,
    /// `1,234.56` / `1 234.56`
    DotDecimal,
}

static COMMA_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[ .]\d{3})+(?:,\d+)?|\d+(?:,\d+)?").expect("valid comma-decimal regex")
});

static DOT_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[ ,]\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?").expect("valid dot-decimal regex")
});

static COMMA_BETWEEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d,\d").expect("valid comma regex"));

static DOT_BETWEEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\.\d").expect("valid dot regex"));

static DOT_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\d+)").expect("valid digit run regex"));

impl NumberGrammar {
    /// Pick the grammar from the separators actually present.
    ///
    /// With both separators the later one is the decimal mark. A lone
    /// comma is decimal. Lone dots are decimal unless every one of them
    /// groups exactly three digits.
    pub fn detect(text: &str) -> Self {
        let last_comma = COMMA_BETWEEN_DIGITS.find_iter(text).last().map(|m| m.start());
        let last_dot = DOT_BETWEEN_DIGITS.find_iter(text).last().map(|m| m.start());

        match (last_comma, last_dot) {
            (Some(c), Some(d)) if d > c => NumberGrammar::DotDecimal,
            (Some(_), _) => NumberGrammar::CommaDecimal,
            (None, Some(_)) => {
                let grouped = DOT_DIGIT_RUN
                    .captures_iter(text)
                    .all(|caps| caps[1].len() == 3);
                if grouped {
                    NumberGrammar::CommaDecimal
                } else {
                    NumberGrammar::DotDecimal
                }
            }
            (None, None) => NumberGrammar::CommaDecimal,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            NumberGrammar::CommaDecimal => &COMMA_DECIMAL,
            NumberGrammar::DotDecimal => &DOT_DECIMAL,
        }
    }

    fn decimal_mark(self) -> char {
        match self {
            NumberGrammar::CommaDecimal => ',',
            NumberGrammar::DotDecimal => '.',
        }
    }

    fn parse(self, token: &str) -> Option<f64> {
        let decimal = self.decimal_mark();
        let normalized: String = token
            .chars()
            .filter_map(|c| match c {
                c if c.is_ascii_digit() => Some(c),
                c if c == decimal => Some('.'),
                _ => None,
            })
            .collect();
        normalized.parse().ok()
    }
}

/// Numbers found in a price string
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedNumbers {
    pub values: Vec<f64>,
    /// Any token carried a fractional part
    pub had_fraction: bool,
    pub grammar: NumberGrammar,
}

pub fn extract_numbers(text: &str) -> ExtractedNumbers {
    let text = text.replace(['\u{a0}', '\u{202f}'], " ");
    let grammar = NumberGrammar::detect(&text);
    let decimal = grammar.decimal_mark();

    let mut values = Vec::new();
    let mut had_fraction = false;
    for token in grammar.pattern().find_iter(&text) {
        let token = token.as_str();
        if let Some(value) = grammar.parse(token) {
            had_fraction |= token.contains(decimal);
            values.push(value);
        }
    }

    ExtractedNumbers {
        values,
        had_fraction,
        grammar,
    }
}

/// Format `value` with a fixed number of decimals and grouped thousands
pub fn format_amount(value: f64, decimals: usize, decimal_mark: char, group_mark: char) -> String {
    let factor = 10f64.powi(decimals as i32);
    let fixed = format!("{:.*}", decimals, (value.abs() * factor).round() / factor);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(group_mark);
        }
        grouped.push(*c);
    }

    let mut out = String::new();
    if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(decimal_mark);
        out.push_str(frac);
    }
    out
}
