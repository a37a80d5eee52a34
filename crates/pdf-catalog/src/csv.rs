use crate::types::{FieldValue, Product, Result};
use std::path::Path;

pub async fn load_products_from_csv(path: impl AsRef<Path>) -> Result<Vec<Product>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let products = tokio::task::spawn_blocking(move || parse_products(&contents)).await??;

    log::info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}

/// Parse CSV text into products. Header names become field names and
/// every cell is kept as raw text; rows with only blank cells are skipped.
pub fn parse_products(contents: &str) -> Result<Vec<Product>> {
    let contents = contents.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(contents);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = reader.headers()?.clone();
    let mut products = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let product: Product = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, cell)| (name, FieldValue::from(cell)))
            .collect();
        products.push(product);
    }

    Ok(products)
}

/// `;` when the header line has more semicolons than commas
fn sniff_delimiter(contents: &str) -> u8 {
    let header = contents.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductField;

    #[test]
    fn test_comma_csv() {
        let products = parse_products("Title,Price,Qty\nConsole,\"12,50 €\",3\n").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].text(ProductField::Title), "Console");
        assert_eq!(products[0].text(ProductField::Price), "12,50 €");
        assert_eq!(products[0].text(ProductField::Quantity), "3");
    }

    #[test]
    fn test_semicolon_csv_with_bom() {
        let csv = "\u{feff}TITRE;Prix;Référence\nManette;19,99 €;REF-1\n;;\nJeu;5 €;\n";
        let products = parse_products(csv).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].text(ProductField::Title), "Manette");
        assert_eq!(products[0].text(ProductField::Reference), "REF-1");
        assert_eq!(products[1].text(ProductField::Reference), "N/A");
    }
}
