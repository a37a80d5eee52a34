pub mod assembler;
pub mod color;
pub mod constants;
pub mod csv;
mod document;
pub mod images;
pub mod layout;
mod options;
pub mod price;
pub mod render;
pub mod text;
mod types;

pub use crate::csv::{load_products_from_csv, parse_products};
pub use assembler::{CatalogAssembler, NoProgress, ProgressSink};
pub use document::{CatalogDocument, SlotRecord};
pub use images::{ImageResolution, ImageResolver, LocalImageResolver, NoImages};
pub use layout::{LayoutSpec, PageLayoutEngine};
pub use options::*;
pub use price::{NormalizedPrice, PriceNormalizer, PriceOptions, TaxStatus};
pub use types::*;

use std::path::PathBuf;

/// Where a generated catalog goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutput {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Build the catalog synchronously. The returned document is not yet
/// serialized; call `to_bytes` or `save` on it.
pub fn build_catalog(
    products: &[Product],
    options: &CatalogOptions,
    resolver: &dyn ImageResolver,
    progress: &mut dyn ProgressSink,
) -> Result<CatalogDocument> {
    CatalogAssembler::new(options, resolver).assemble(products, progress)
}

/// Image resolver for `options`: paths relative to the working directory,
/// plus the configured images folder.
pub fn resolver_for(options: &CatalogOptions) -> LocalImageResolver {
    let resolver = LocalImageResolver::new(".");
    match &options.images_folder {
        Some(folder) => resolver.with_images_folder(folder),
        None => resolver,
    }
}

/// Generate a catalog off the async runtime and serialize it to `target`
pub async fn generate_catalog<R, P>(
    products: Vec<Product>,
    options: CatalogOptions,
    resolver: R,
    target: OutputTarget,
    mut progress: P,
) -> Result<CatalogOutput>
where
    R: ImageResolver + Send + 'static,
    P: FnMut(usize, usize, f32) + Send + 'static,
{
    options.validate()?;

    // Rendering and image encoding are CPU-bound
    let bytes = tokio::task::spawn_blocking(move || {
        let mut doc = build_catalog(&products, &options, &resolver, &mut progress)?;
        doc.to_bytes()
    })
    .await??;

    match target {
        OutputTarget::Memory => Ok(CatalogOutput::Bytes(bytes)),
        OutputTarget::File(path) => {
            tokio::fs::write(&path, bytes).await?;
            log::info!("Catalog written to {}", path.display());
            Ok(CatalogOutput::File(path))
        }
    }
}
