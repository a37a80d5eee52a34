use std::path::PathBuf;

use tokio::sync::mpsc;

// Re-export types from the library crate
pub use pdf_catalog::{CatalogOptions, OutputTarget, Product};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum CatalogCommand {
    LoadCsv {
        input_path: PathBuf,
    },
    LoadConfig {
        path: PathBuf,
    },
    Generate {
        products: Vec<Product>,
        options: CatalogOptions,
        output_path: PathBuf,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogUpdate {
    Progress {
        current: usize,
        total: usize,
        fraction: f32,
    },
    ProductsLoaded {
        products: Vec<Product>,
    },
    ConfigLoaded {
        options: CatalogOptions,
    },
    Complete {
        path: PathBuf,
        product_count: usize,
    },
    Error {
        message: String,
    },
}

/// Async worker task that processes catalog commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CatalogCommand>,
    update_tx: mpsc::UnboundedSender<CatalogUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            CatalogCommand::LoadCsv { input_path } => handle_load_csv(input_path, &update_tx).await,
            CatalogCommand::LoadConfig { path } => handle_load_config(path, &update_tx).await,
            CatalogCommand::Generate {
                products,
                options,
                output_path,
            } => handle_generate(products, options, output_path, &update_tx).await,
        }
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn handle_load_csv(input_path: PathBuf, update_tx: &mpsc::UnboundedSender<CatalogUpdate>) {
    match pdf_catalog::load_products_from_csv(&input_path).await {
        Ok(products) => {
            let _ = update_tx.send(CatalogUpdate::ProductsLoaded { products });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to load CSV: {e}"),
            });
        }
    }
}

async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<CatalogUpdate>) {
    match CatalogOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(CatalogUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to load config: {e}"),
            });
        }
    }
}

async fn handle_generate(
    products: Vec<Product>,
    options: CatalogOptions,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<CatalogUpdate>,
) {
    let product_count = products.len();
    let resolver = pdf_catalog::resolver_for(&options);
    let progress_tx = update_tx.clone();
    let progress = move |current, total, fraction| {
        let _ = progress_tx.send(CatalogUpdate::Progress {
            current,
            total,
            fraction,
        });
    };

    let result = pdf_catalog::generate_catalog(
        products,
        options,
        resolver,
        OutputTarget::File(output_path.clone()),
        progress,
    )
    .await;

    match result {
        Ok(_) => {
            let _ = update_tx.send(CatalogUpdate::Complete {
                path: output_path,
                product_count,
            });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to generate catalog: {e}"),
            });
        }
    }
}
