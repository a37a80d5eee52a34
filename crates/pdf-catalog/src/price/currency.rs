//! Ordered currency knowledge base
//!
//! Rules are tried first to last against the lowercased price text. ISO
//! codes and multi-character markers come first, single symbols next and
//! the bare `$` last. Short letter abbreviations (`r`, `kr`, `ft`, ...)
//! only count when written right next to a number, so ordinary words such
//! as "partir" do not trigger a currency.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{CatalogError, Result};

/// Where the symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$19,99`
    Prefix,
    /// `12,50 €`
    Suffix,
}

#[derive(Debug, Clone)]
pub struct CurrencyRule {
    pattern: Regex,
    pub code: String,
    pub symbol: String,
    pub position: SymbolPosition,
}

impl CurrencyRule {
    pub fn new(pattern: &str, code: &str, symbol: &str, position: SymbolPosition) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| CatalogError::Config(format!("Invalid currency pattern for {code}: {e}")))?;
        Ok(Self {
            pattern,
            code: code.to_string(),
            symbol: symbol.to_string(),
            position,
        })
    }

    /// Test the rule against already lowercased text
    pub fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }

    /// The built-in table, in priority order
    pub fn default_table() -> Vec<CurrencyRule> {
        DEFAULT_TABLE.clone()
    }
}

/// Currencies displayed without a minor unit
pub const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK", "HUF"];

pub fn is_zero_decimal(code: &str) -> bool {
    ZERO_DECIMAL_CURRENCIES.contains(&code)
}

use SymbolPosition::{Prefix, Suffix};

#[rustfmt::skip]
const RULES: &[(&str, &str, &str, SymbolPosition)] = &[
    // ISO codes and unambiguous multi-character markers
    (r"\b(?:xpf|cfp)\b",                        "XPF", "XPF",  Suffix),
    (r"\bxaf\b",                                "XAF", "CFA",  Suffix),
    (r"\b(?:xof|f?cfa)\b",                      "XOF", "CFA",  Suffix),
    (r"\bmad\b",                                "MAD", "DH",   Suffix),
    (r"\bdzd\b",                                "DZD", "DZD",  Suffix),
    (r"\btnd\b",                                "TND", "TND",  Suffix),
    (r"\b(?:chf|sfr)\b",                        "CHF", "CHF",  Suffix),
    (r"\bgbp\b",                                "GBP", "£",    Prefix),
    (r"\bcad\b|\bc\$",                          "CAD", "C$",   Prefix),
    (r"\baud\b|\bau?\$",                        "AUD", "A$",   Prefix),
    (r"\bnzd\b|\bnz\$",                         "NZD", "NZ$",  Prefix),
    (r"\bhkd\b|\bhk\$",                         "HKD", "HK$",  Prefix),
    (r"\bsgd\b|\bs\$",                          "SGD", "S$",   Prefix),
    (r"\bbrl\b|\br\$",                          "BRL", "R$",   Prefix),
    (r"\bmxn\b|\bmx\$",                         "MXN", "MX$",  Prefix),
    (r"\bars\b",                                "ARS", "AR$",  Prefix),
    (r"\bcop\b",                                "COP", "COL$", Prefix),
    (r"\busd\b|\bus\$",                         "USD", "$",    Prefix),
    (r"\bjpy\b",                                "JPY", "¥",    Prefix),
    (r"\b(?:cny|rmb)\b",                        "CNY", "¥",    Prefix),
    (r"\bkrw\b|₩",                              "KRW", "₩",    Prefix),
    (r"\bsek\b",                                "SEK", "kr",   Suffix),
    (r"\bnok\b",                                "NOK", "kr",   Suffix),
    (r"\bdkk\b",                                "DKK", "kr",   Suffix),
    (r"\bisk\b",                                "ISK", "kr",   Suffix),
    (r"\bpln\b|zł",                             "PLN", "zł",   Suffix),
    (r"\bczk\b|kč",                             "CZK", "Kč",   Suffix),
    (r"\bhuf\b",                                "HUF", "Ft",   Suffix),
    (r"\bron\b",                                "RON", "lei",  Suffix),
    (r"\bbgn\b|лв",                             "BGN", "лв",   Suffix),
    (r"\btry\b",                                "TRY", "₺",    Suffix),
    (r"\buah\b",                                "UAH", "₴",    Suffix),
    (r"\brub\b",                                "RUB", "₽",    Suffix),
    (r"\binr\b",                                "INR", "₹",    Prefix),
    (r"\baed\b|د\.?إ",                          "AED", "AED",  Suffix),
    (r"\bsar\b|ر\.?س",                          "SAR", "SAR",  Suffix),
    (r"\bqar\b",                                "QAR", "QAR",  Suffix),
    (r"\b(?:ils|nis)\b",                        "ILS", "₪",    Prefix),
    (r"\bphp\b",                                "PHP", "₱",    Prefix),
    (r"\bthb\b",                                "THB", "฿",    Prefix),
    (r"\bvnd\b",                                "VND", "₫",    Suffix),
    (r"\bkwd\b",                                "KWD", "KWD",  Suffix),
    (r"\bomr\b",                                "OMR", "OMR",  Suffix),
    (r"\bbhd\b",                                "BHD", "BHD",  Suffix),
    (r"\bzar\b",                                "ZAR", "R",    Prefix),
    (r"\beur\b|\beuros?\b",                     "EUR", "€",    Suffix),
    // Distinct symbols
    (r"€",                                      "EUR", "€",    Suffix),
    (r"£",                                      "GBP", "£",    Prefix),
    (r"[¥￥]",                                   "JPY", "¥",    Prefix),
    (r"₺",                                      "TRY", "₺",    Suffix),
    (r"₴",                                      "UAH", "₴",    Suffix),
    (r"₽",                                      "RUB", "₽",    Suffix),
    (r"₹",                                      "INR", "₹",    Prefix),
    (r"₪",                                      "ILS", "₪",    Prefix),
    (r"₱",                                      "PHP", "₱",    Prefix),
    (r"฿",                                      "THB", "฿",    Prefix),
    (r"₫",                                      "VND", "₫",    Suffix),
    // Short abbreviations, only when touching a number
    (r"\d\s*kr\b|\bkr\.?\s*\d",                 "SEK", "kr",   Suffix),
    (r"\d\s*ft\b",                              "HUF", "Ft",   Suffix),
    (r"\d\s*dh\b|\bdh\s*\d",                    "MAD", "DH",   Suffix),
    (r"\d\s*(?:lei|leu)\b",                     "RON", "lei",  Suffix),
    (r"\d\s*fr\.|\bfr\.\s*\d",                  "CHF", "CHF",  Suffix),
    (r"\brs\.?\s*\d|\d\s*rs\b",                 "INR", "₹",    Prefix),
    (r"\br\s*\d|\d\s*r\b",                      "ZAR", "R",    Prefix),
    // Generic dollar last
    (r"\$",                                     "USD", "$",    Prefix),
];

static DEFAULT_TABLE: LazyLock<Vec<CurrencyRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(pattern, code, symbol, position)| CurrencyRule {
            pattern: Regex::new(pattern).expect("valid built-in currency regex"),
            code: code.to_string(),
            symbol: symbol.to_string(),
            position,
        })
        .collect()
});

/// First rule matching `raw`, if any
pub fn detect<'a>(table: &'a [CurrencyRule], raw: &str) -> Option<&'a CurrencyRule> {
    let lowered = raw.to_lowercase();
    table.iter().find(|rule| rule.matches(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> Option<String> {
        detect(&CurrencyRule::default_table(), raw).map(|r| r.code.clone())
    }

    #[test]
    fn test_symbols_and_codes() {
        assert_eq!(code("12,50 €").as_deref(), Some("EUR"));
        assert_eq!(code("$19.99").as_deref(), Some("USD"));
        assert_eq!(code("CAD$ 25").as_deref(), Some("CAD"));
        assert_eq!(code("C$25").as_deref(), Some("CAD"));
        assert_eq!(code("£10").as_deref(), Some("GBP"));
        assert_eq!(code("1500 ¥").as_deref(), Some("JPY"));
        assert_eq!(code("200 CHF").as_deref(), Some("CHF"));
        assert_eq!(code("R$ 49,90").as_deref(), Some("BRL"));
        assert_eq!(code("99 kr").as_deref(), Some("SEK"));
    }

    #[test]
    fn test_words_do_not_trigger_short_abbreviations() {
        assert_eq!(code("à partir de 10"), None);
        assert_eq!(code("prix sur demande"), None);
        assert_eq!(code("Offre spéciale 10 €").as_deref(), Some("EUR"));
    }

    #[test]
    fn test_rand_next_to_number() {
        assert_eq!(code("R 150").as_deref(), Some("ZAR"));
        assert_eq!(code("150 ZAR").as_deref(), Some("ZAR"));
    }

    #[test]
    fn test_custom_table_overrides_defaults() {
        let table = vec![CurrencyRule::new(r"\$", "CAD", "$", SymbolPosition::Suffix).unwrap()];
        let rule = detect(&table, "$19").unwrap();
        assert_eq!(rule.code, "CAD");
        assert!(CurrencyRule::new("(", "XXX", "X", SymbolPosition::Prefix).is_err());
    }

    #[test]
    fn test_zero_decimal_currencies() {
        assert!(is_zero_decimal("JPY"));
        assert!(!is_zero_decimal("EUR"));
    }
}
