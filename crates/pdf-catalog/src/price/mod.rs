//! Price normalization
//!
//! Turns whatever was typed in a price column ("12,50 € TTC", "$19.99",
//! "de 10 à 20 €/m²", "Gratuit", 42.0) into a numeric value in the home
//! currency plus a canonical display string. Parsing never fails: input
//! that cannot be understood keeps its text as the display.

pub mod currency;
pub mod number;

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{CatalogError, FieldValue, Result};
pub use currency::{CurrencyRule, SymbolPosition};
use number::{extract_numbers, format_amount};

/// Decimal mark used in displayed amounts
pub const DECIMAL_MARK: char = ',';
/// Thousands separator used in displayed amounts (narrow no-break space)
pub const GROUP_MARK: char = '\u{202f}';
/// Separator between the two bounds of a range
const RANGE_SEPARATOR: &str = " – ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TaxStatus {
    /// Taxes included (TTC)
    #[default]
    Included,
    /// Taxes excluded (HT)
    Excluded,
}

impl TaxStatus {
    pub fn suffix(self) -> &'static str {
        match self {
            TaxStatus::Included => "TTC",
            TaxStatus::Excluded => "HT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PriceOptions {
    /// Used when the text carries no tax marker
    pub default_tax: TaxStatus,
    /// Rates converting one unit of a currency into the home currency
    pub conversion_rates: HashMap<String, f64>,
    pub min_decimals: usize,
    pub max_decimals: usize,
    /// ISO code of the catalog currency
    pub home_currency: String,
}

impl Default for PriceOptions {
    fn default() -> Self {
        Self {
            default_tax: TaxStatus::Included,
            conversion_rates: HashMap::new(),
            min_decimals: 0,
            max_decimals: 2,
            home_currency: "EUR".to_string(),
        }
    }
}

impl PriceOptions {
    pub fn validate(&self) -> Result<()> {
        if self.min_decimals > self.max_decimals {
            return Err(CatalogError::Config(format!(
                "min_decimals ({}) exceeds max_decimals ({})",
                self.min_decimals, self.max_decimals
            )));
        }
        if self.home_currency.trim().is_empty() {
            return Err(CatalogError::Config("home_currency must not be empty".into()));
        }
        if let Some((code, rate)) = self
            .conversion_rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(CatalogError::Config(format!(
                "Conversion rate for {} must be positive, got {}",
                code, rate
            )));
        }
        Ok(())
    }
}

/// Canonical form of a raw price
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPrice {
    /// Amount in the home currency; `None` when it could not be resolved
    pub value: Option<f64>,
    pub tax_status: TaxStatus,
    pub display: String,
    /// Detected ISO currency code
    pub currency: String,
    pub is_range: bool,
}

static FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gratuit|offert|inclus|free)\b").expect("valid free regex")
});

static TAX_INCLUDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bttc\b|\bt\.t\.c\b|tva incl|tvaincluse|inclus[ea]? tva|toutes taxes? (?:comprises?|incluses?)|\bvat incl|\btax(?:es)? incl|incl\.? (?:vat|tax)",
    )
    .expect("valid tax-included regex")
});

static TAX_EXCLUDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bht\b|\bh\.t\b|hors taxes?\b|hors tva\b|sans tva\b|excl\.? (?:vat|tax)|\b(?:vat|tax) excl")
        .expect("valid tax-excluded regex")
});

/// Longest forms first so `/m²` wins over `/m`
static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)/\s*(?:m²|m2|unit[ée]?s?|pi[eè]ces?|litres?|pa?ck|lot|kg|ml|g|l|u)\b|/\s*m²",
    )
    .expect("valid unit regex")
});

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(à\s*partir\s*d(?:e\b|')|dès\b|~|≈|environ\b|env\.?|approx\.?|from\b|starting at\b)\s*")
        .expect("valid prefix regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub struct PriceNormalizer {
    table: Vec<CurrencyRule>,
    options: PriceOptions,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(PriceOptions::default())
    }
}

impl PriceNormalizer {
    pub fn new(options: PriceOptions) -> Self {
        Self {
            table: CurrencyRule::default_table(),
            options,
        }
    }

    /// Replace the currency table, e.g. for a market where `$` means CAD
    pub fn with_currency_table(mut self, table: Vec<CurrencyRule>) -> Self {
        self.table = table;
        self
    }

    pub fn normalize(&self, raw: &FieldValue) -> NormalizedPrice {
        match raw {
            FieldValue::Number(n) => self.normalize_number(*n),
            FieldValue::Text(text) => self.normalize_text(text),
        }
    }

    pub fn normalize_str(&self, raw: &str) -> NormalizedPrice {
        self.normalize_text(raw)
    }

    fn normalize_number(&self, value: f64) -> NormalizedPrice {
        let (symbol, position) = self.home_symbol();
        let decimals = self.options.max_decimals;
        let amount = self.format_with_symbol(value, decimals, &symbol, position);
        let tax = self.options.default_tax;
        NormalizedPrice {
            value: Some(round_to(value, decimals)),
            tax_status: tax,
            display: format!("{} {}", amount, tax.suffix()),
            currency: self.options.home_currency.clone(),
            is_range: false,
        }
    }

    fn normalize_text(&self, raw: &str) -> NormalizedPrice {
        let cleaned = WHITESPACE.replace_all(raw.trim(), " ").into_owned();
        let default_tax = self.options.default_tax;

        if cleaned.is_empty() {
            return NormalizedPrice {
                value: None,
                tax_status: default_tax,
                display: String::new(),
                currency: self.options.home_currency.clone(),
                is_range: false,
            };
        }

        let lowered = cleaned.to_lowercase();
        let detected_tax = detect_tax(&lowered);

        if FREE.is_match(&cleaned) && !cleaned.chars().any(|c| c.is_ascii_digit()) {
            return NormalizedPrice {
                value: Some(0.0),
                tax_status: detected_tax.unwrap_or(TaxStatus::Included),
                display: "Gratuit".to_string(),
                currency: self.options.home_currency.clone(),
                is_range: false,
            };
        }

        let tax = detected_tax.unwrap_or(default_tax);
        let (code, symbol, position) = match currency::detect(&self.table, &cleaned) {
            Some(rule) => (rule.code.clone(), rule.symbol.clone(), rule.position),
            None => {
                let (symbol, position) = self.home_symbol();
                (self.options.home_currency.clone(), symbol, position)
            }
        };

        // Unit and prefix are cut out before numbers are read: "/m2" holds a digit
        let mut remainder = cleaned.clone();
        let unit = UNIT.find(&cleaned).map(|m| {
            remainder.replace_range(m.range(), " ");
            m.as_str().split_whitespace().collect::<String>()
        });
        let prefix = PREFIX.captures(&remainder).map(|caps| {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            let word = canonical_prefix(&caps[1]);
            (whole, word)
        });
        let numbers_text = match &prefix {
            Some((end, _)) => &remainder[*end..],
            None => remainder.as_str(),
        };

        let numbers = extract_numbers(numbers_text);
        let Some(min) = numbers.values.iter().copied().reduce(f64::min) else {
            log::debug!("No amount found in price {:?}", cleaned);
            return NormalizedPrice {
                value: None,
                tax_status: tax,
                display: cleaned,
                currency: code,
                is_range: false,
            };
        };
        let max = numbers.values.iter().copied().fold(min, f64::max);
        let is_range = numbers.values.len() > 1;

        let decimals = if currency::is_zero_decimal(&code) {
            0
        } else {
            let natural = if numbers.had_fraction { 2 } else { 0 };
            natural.max(self.options.min_decimals).min(self.options.max_decimals)
        };

        let value = if code == self.options.home_currency {
            Some(min)
        } else {
            self.options.conversion_rates.get(&code).map(|rate| min * rate)
        };

        let amount = if is_range {
            format!(
                "{}{}{}",
                self.format_with_symbol(min, decimals, &symbol, position),
                RANGE_SEPARATOR,
                self.format_with_symbol(max, decimals, &symbol, position)
            )
        } else {
            self.format_with_symbol(min, decimals, &symbol, position)
        };

        let mut parts: Vec<String> = Vec::new();
        if let Some((_, word)) = prefix {
            parts.push(word);
        }
        parts.push(amount);
        if let Some(unit) = unit {
            parts.push(unit.replace("m2", "m²"));
        }
        parts.push(tax.suffix().to_string());

        NormalizedPrice {
            value: value.map(|v| round_to(v, decimals)),
            tax_status: tax,
            display: parts.join(" "),
            currency: code,
            is_range,
        }
    }

    fn home_symbol(&self) -> (String, SymbolPosition) {
        self.table
            .iter()
            .find(|rule| rule.code == self.options.home_currency)
            .map(|rule| (rule.symbol.clone(), rule.position))
            .unwrap_or_else(|| (self.options.home_currency.clone(), SymbolPosition::Suffix))
    }

    fn format_with_symbol(
        &self,
        value: f64,
        decimals: usize,
        symbol: &str,
        position: SymbolPosition,
    ) -> String {
        let mut amount = format_amount(value, decimals, DECIMAL_MARK, GROUP_MARK);
        // "12,00" reads better as "12" unless more decimals were requested
        if decimals > self.options.min_decimals {
            if let Some((int_part, frac)) = amount.split_once(DECIMAL_MARK) {
                if frac.chars().all(|c| c == '0') {
                    amount = int_part.to_string();
                }
            }
        }
        match position {
            SymbolPosition::Prefix => format!("{}{}", symbol, amount),
            SymbolPosition::Suffix => format!("{} {}", amount, symbol),
        }
    }
}

fn detect_tax(lowered: &str) -> Option<TaxStatus> {
    if TAX_INCLUDED.is_match(lowered) {
        Some(TaxStatus::Included)
    } else if TAX_EXCLUDED.is_match(lowered) {
        Some(TaxStatus::Excluded)
    } else {
        None
    }
}

fn canonical_prefix(word: &str) -> String {
    let lowered = word.to_lowercase();
    let squashed: String = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    match squashed.as_str() {
        s if s.starts_with('à') => "À partir de".to_string(),
        "dès" => "Dès".to_string(),
        "env" | "env." | "environ" => "Environ".to_string(),
        "approx" | "approx." => "Approx.".to_string(),
        "from" => "From".to_string(),
        "starting at" => "Starting at".to_string(),
        other => other.to_string(),
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> NormalizedPrice {
        PriceNormalizer::default().normalize_str(raw)
    }

    #[test]
    fn test_euro_with_tax_marker() {
        let p = normalize("12,50 € TTC");
        assert_eq!(p.value, Some(12.5));
        assert_eq!(p.tax_status, TaxStatus::Included);
        assert_eq!(p.display, "12,50 € TTC");
        assert!(!p.is_range);
    }

    #[test]
    fn test_dollar_without_rates() {
        let p = normalize("$19.99");
        assert_eq!(p.value, None);
        assert_eq!(p.currency, "USD");
        assert_eq!(p.display, "$19,99 TTC");
    }

    #[test]
    fn test_dollar_with_rates() {
        let mut options = PriceOptions::default();
        options.conversion_rates.insert("USD".into(), 2.0);
        let p = PriceNormalizer::new(options).normalize_str("$19.99");
        assert_eq!(p.value, Some(39.98));
        assert_eq!(p.display, "$19,99 TTC");
    }

    #[test]
    fn test_range_reports_minimum() {
        let p = normalize("de 10 à 20 €");
        assert!(p.is_range);
        assert_eq!(p.value, Some(10.0));
        assert_eq!(p.display, "10 € – 20 € TTC");
    }

    #[test]
    fn test_excluded_tax_and_unit() {
        let p = normalize("1 234,5 € HT / m2");
        assert_eq!(p.tax_status, TaxStatus::Excluded);
        assert_eq!(p.value, Some(1234.5));
        assert_eq!(p.display, "1\u{202f}234,50 € /m² HT");
    }

    #[test]
    fn test_prefix_is_title_cased() {
        let p = normalize("env. 30 €");
        assert_eq!(p.display, "Environ 30 € TTC");
        let p = normalize("à partir de 15 €");
        assert_eq!(p.display, "À partir de 15 € TTC");
        assert_eq!(p.value, Some(15.0));
    }

    #[test]
    fn test_free() {
        let p = normalize("Offert");
        assert_eq!(p.value, Some(0.0));
        assert_eq!(p.display, "Gratuit");
        // A digit means "inclus" describes tax, not the price
        let p = normalize("15 € TVA inclus");
        assert_eq!(p.value, Some(15.0));
    }

    #[test]
    fn test_numeric_input() {
        let p = PriceNormalizer::default().normalize(&FieldValue::Number(12.5));
        assert_eq!(p.value, Some(12.5));
        assert_eq!(p.display, "12,50 € TTC");
        let p = PriceNormalizer::default().normalize(&FieldValue::Number(12.0));
        assert_eq!(p.display, "12 € TTC");
    }

    #[test]
    fn test_blank_and_unparseable() {
        let p = normalize("   ");
        assert_eq!(p.value, None);
        assert_eq!(p.display, "");
        let p = normalize("Sur  demande");
        assert_eq!(p.value, None);
        assert_eq!(p.display, "Sur demande");
    }

    #[test]
    fn test_zero_decimal_currency() {
        let p = normalize("¥1500.75");
        assert_eq!(p.currency, "JPY");
        assert_eq!(p.display, "¥1\u{202f}501 TTC");
    }

    #[test]
    fn test_display_never_empty_for_non_blank_input() {
        let inputs = [
            "12", "abc", "€", "~", "—", "1.2.3", "/kg", "HT", "$", "0", "12,50 €/kg", "10-20",
        ];
        let normalizer = PriceNormalizer::default();
        for raw in inputs {
            assert!(!normalizer.normalize_str(raw).display.is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn test_options_validation() {
        let mut options = PriceOptions::default();
        assert!(options.validate().is_ok());
        options.min_decimals = 3;
        assert!(options.validate().is_err());
    }
}
