use super::metrics::TextMetrics;

const ELLIPSIS: &str = "...";

/// Share of the budget a sentence must reach before we cut at its end
const SENTENCE_CUT_RATIO: f32 = 0.7;

/// Shorten `text` to at most `max_chars` characters.
///
/// Prefers ending on a full sentence past 70% of the budget, then on the
/// last word boundary (with an ellipsis), then a hard cut with ellipsis.
pub fn smart_truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();

    if let Some(dot) = truncated.rfind('.') {
        let sentence_chars = truncated[..dot].chars().count();
        if sentence_chars as f32 > max_chars as f32 * SENTENCE_CUT_RATIO {
            return truncated[..=dot].to_string();
        }
    }

    if let Some(space) = truncated.rfind(' ') {
        if space > 0 {
            return format!("{}{}", truncated[..space].trim_end(), ELLIPSIS);
        }
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let hard: String = text.chars().take(keep).collect();
    format!("{}{}", hard, ELLIPSIS)
}

/// Trim `line` until it plus an ellipsis fits `max_width`
pub fn ellipsize_to_width(line: &str, metrics: &dyn TextMetrics, size: f32, max_width: f32) -> String {
    let candidate = format!("{}{}", line.trim_end(), ELLIPSIS);
    if metrics.text_width(&candidate, size) <= max_width {
        return candidate;
    }

    let chars: Vec<char> = line.chars().collect();
    for end in (0..chars.len()).rev() {
        let head: String = chars[..end].iter().collect();
        let candidate = format!("{}{}", head.trim_end(), ELLIPSIS);
        if metrics.text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }

    ELLIPSIS.to_string()
}

/// Keep at most `max_lines` lines, marking the last kept line with an
/// ellipsis when anything was dropped.
pub fn limit_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    metrics: &dyn TextMetrics,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = ellipsize_to_width(last, metrics, size, max_width);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::metrics::FnMetrics;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(smart_truncate("  Court.  ", 50), "Court.");
    }

    #[test]
    fn test_cut_at_sentence_past_seventy_percent() {
        let text = "Une console portable en parfait état. Livrée avec sa housse et deux jeux.";
        // The first sentence ends at char 37, past 70% of 45
        assert_eq!(
            smart_truncate(text, 45),
            "Une console portable en parfait état."
        );
    }

    #[test]
    fn test_cut_at_word_when_sentence_too_short() {
        let text = "Neuf. Une manette sans fil compatible avec toutes les consoles récentes";
        let out = smart_truncate(text, 40);
        assert_eq!(out, "Neuf. Une manette sans fil compatible...");
        assert!(out.chars().count() <= 43);
    }

    #[test]
    fn test_hard_cut_without_spaces() {
        let out = smart_truncate("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(out, "abcdefg...");
    }

    #[test]
    fn test_limit_lines_adds_ellipsis() {
        let metrics = FnMetrics(|s: &str, _size: f32| s.chars().count() as f32);
        let lines = vec!["first line".to_string(), "second line".to_string(), "third".to_string()];
        let kept = limit_lines(lines, 2, &metrics, 10.0, 12.0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1], "second li...");
        assert!(kept[1].chars().count() <= 12);
    }
}
