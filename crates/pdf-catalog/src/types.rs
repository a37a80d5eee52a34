use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("No products to render")]
    NoProducts,
    #[error(
        "Card content does not fit: {required_height_pt:.1}pt needed but cards are \
         {card_width_pt:.1}x{card_height_pt:.1}pt at {cards_per_page} per page. \
         Reduce the number of cards per page or shorten the title/description columns."
    )]
    LayoutOverflow {
        card_width_pt: f32,
        card_height_pt: f32,
        required_height_pt: f32,
        cards_per_page: usize,
    },
    #[error("Document is sealed; no further pages can be added")]
    Sealed,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A raw scalar read from a product record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// True for empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// One product record.
///
/// Field names are matched case-insensitively: `title`, `Title` and
/// `TITLE` are the same field. Records are immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    fields: BTreeMap<String, FieldValue>,
}

impl Product {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when assembling a record
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(normalize_key(name), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(&normalize_key(name))
    }

    /// First non-blank value among the field's aliases, in priority order
    pub fn resolve(&self, field: ProductField) -> Option<&FieldValue> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|value| !value.is_blank())
    }

    /// Resolved value as display text, or the field's fallback
    pub fn text(&self, field: ProductField) -> String {
        self.resolve(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| field.fallback().to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<FieldValue>> FromIterator<(K, V)> for Product {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
            .collect();
        Self { fields }
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Logical product fields, each resolved through an ordered alias list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Title,
    Price,
    Description,
    Quantity,
    Reference,
    Material,
    Image,
}

impl ProductField {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ProductField::Title => &["title", "titre", "name", "nom"],
            ProductField::Price => &["price", "prix"],
            ProductField::Description => &["description", "desc"],
            ProductField::Quantity => &["quantité", "quantity", "qty", "qté"],
            ProductField::Reference => &["ref", "référence", "reference", "sku"],
            ProductField::Material => &["matériaux", "material", "materials", "matériau"],
            ProductField::Image => &["image 1", "image", "image_path", "image_url"],
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            ProductField::Title => "Produit sans nom",
            ProductField::Price | ProductField::Description | ProductField::Image => "",
            ProductField::Quantity | ProductField::Reference | ProductField::Material => {
                crate::constants::NOT_AVAILABLE
            }
        }
    }
}
