//! Greedy word wrapping against real font metrics

use super::metrics::TextMetrics;

/// Wrap `text` into lines no wider than `max_width` at `size`.
///
/// Words are accumulated while the running line fits. A word that cannot
/// fit on a line of its own is split into chunks of at most
/// `max_word_len` characters, and chunks are shortened further until each
/// one fits. Only a single character wider than `max_width` can exceed it.
pub fn wrap_text(
    text: &str,
    metrics: &dyn TextMetrics,
    size: f32,
    max_width: f32,
    max_word_len: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if metrics.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if metrics.text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_long_word(word, metrics, size, max_width, max_word_len);
            // The last piece stays open so following words can join it
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn split_long_word(
    word: &str,
    metrics: &dyn TextMetrics,
    size: f32,
    max_width: f32,
    max_word_len: usize,
) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_word_len.max(1)).min(chars.len());
        while end > start + 1 {
            let piece: String = chars[start..end].iter().collect();
            if metrics.text_width(&piece, size) <= max_width {
                break;
            }
            end -= 1;
        }
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    pieces
}

/// Widest line of a wrapped block
pub fn block_width(lines: &[String], metrics: &dyn TextMetrics, size: f32) -> f32 {
    lines
        .iter()
        .map(|line| metrics.text_width(line, size))
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::metrics::{BuiltinFont, FnMetrics};

    /// Every character is exactly one point wide at size 1
    fn mono() -> FnMetrics<impl Fn(&str, f32) -> f32> {
        FnMetrics(|s: &str, size: f32| s.chars().count() as f32 * size)
    }

    #[test]
    fn test_greedy_wrap() {
        let lines = wrap_text("the quick brown fox jumps", &mono(), 1.0, 10.0, 15);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_long_word_is_split_at_max_length() {
        let lines = wrap_text("abcdefghijklmnopqrstuvwxyz", &mono(), 1.0, 12.0, 10);
        assert_eq!(lines, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_split_piece_shrinks_to_box() {
        let lines = wrap_text("abcdefghijkl", &mono(), 1.0, 5.0, 15);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let text = "Catalogue Classic Game Cover 2025 — Tous nos produits en un coup d'œil \
                    avec un motextrêmementlongquinerentrepasdanslaboite";
        let font = BuiltinFont::HelveticaBold;
        for width in [60.0, 120.0, 250.0, 480.0] {
            for line in wrap_text(text, &font, 24.0, width, 15) {
                assert!(font.text_width(&line, 24.0) <= width, "{line:?} wider than {width}");
            }
        }
    }

    #[test]
    fn test_ligature_capitals_wrap_inside_box() {
        let font = BuiltinFont::HelveticaBold;
        let lines = wrap_text("ŒUVRES CŒUR ÉCOLE", &font, 13.0, 150.0, 15);
        assert_eq!(lines, vec!["ŒUVRES CŒUR", "ÉCOLE"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(wrap_text("   ", &mono(), 1.0, 10.0, 15).is_empty());
    }
}
