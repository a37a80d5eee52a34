use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_catalog::{CatalogOptions, Quality, TaxStatus};
use pdf_catalog_runtime::{CatalogCommand, CatalogUpdate, worker_task};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "pdfcat", about = "Product catalog PDF generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a catalog PDF from a product CSV
    Generate {
        /// Input CSV file (one product per row, headers as field names)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON options file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Catalog title (cover and page banner)
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subtitle: Option<String>,

        /// Primary color as #RRGGBB
        #[arg(long)]
        primary_color: Option<String>,

        /// Page background as #RRGGBB (dark colors are lightened)
        #[arg(long)]
        background_color: Option<String>,

        /// Logo image placed on the cover
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Full-bleed cover image
        #[arg(long)]
        cover: Option<PathBuf>,

        /// Folder holding `{row}_IMAGE 1_*` product images
        #[arg(long)]
        images: Option<PathBuf>,

        /// Image quality tier
        #[arg(long, value_enum)]
        quality: Option<QualityArg>,

        /// Product cards per page (0 uses a fixed card height)
        #[arg(long)]
        cards_per_page: Option<usize>,

        /// Font family (Helvetica or Courier)
        #[arg(long)]
        font: Option<String>,

        /// Tax status assumed when a price has no TTC/HT marker
        #[arg(long, value_enum)]
        tax: Option<TaxArg>,

        /// Fail instead of producing a cover-only catalog
        #[arg(long)]
        require_products: bool,
    },

    /// Write the default options to a JSON file
    InitConfig {
        /// Output JSON file
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QualityArg {
    Hd,
    Medium,
    Bd,
}

#[derive(Clone, Copy, ValueEnum)]
enum TaxArg {
    Ttc,
    Ht,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Hd => Self::Hd,
            QualityArg::Medium => Self::Medium,
            QualityArg::Bd => Self::Bd,
        }
    }
}

impl From<TaxArg> for TaxStatus {
    fn from(arg: TaxArg) -> Self {
        match arg {
            TaxArg::Ttc => Self::Included,
            TaxArg::Ht => Self::Excluded,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            title,
            subtitle,
            primary_color,
            background_color,
            logo,
            cover,
            images,
            quality,
            cards_per_page,
            font,
            tax,
            require_products,
        } => {
            let mut options = match &config {
                Some(path) => CatalogOptions::load(path)
                    .await
                    .with_context(|| format!("loading {}", path.display()))?,
                None => CatalogOptions::default(),
            };
            if let Some(path) = &config {
                log::info!("Options loaded from {}", path.display());
            }

            if let Some(title) = title {
                options.title = title;
            }
            if let Some(subtitle) = subtitle {
                options.subtitle = subtitle;
            }
            if let Some(color) = primary_color {
                options.primary_color = color;
            }
            if let Some(color) = background_color {
                options.background_color = color;
            }
            if logo.is_some() {
                options.logo_path = logo;
            }
            if cover.is_some() {
                options.cover_path = cover;
            }
            if images.is_some() {
                options.images_folder = images;
            }
            if let Some(quality) = quality {
                options.quality = quality.into();
            }
            if let Some(cards_per_page) = cards_per_page {
                options.cards_per_page = cards_per_page;
            }
            if let Some(font) = font {
                options.font_family = font;
            }
            if let Some(tax) = tax {
                options.price.default_tax = tax.into();
            }
            options.require_products |= require_products;
            options.validate()?;

            run_generate(input, options, output).await?;
        }

        Commands::InitConfig { output } => {
            CatalogOptions::default().save(&output).await?;
            println!("Default options → {}", output.display());
        }
    }

    Ok(())
}

/// Drive the worker: load the CSV, then generate, printing progress
async fn run_generate(input: PathBuf, options: CatalogOptions, output: PathBuf) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx));

    command_tx.send(CatalogCommand::LoadCsv { input_path: input })?;

    while let Some(update) = update_rx.recv().await {
        match update {
            CatalogUpdate::ProductsLoaded { products } => {
                println!("Loaded {} products", products.len());
                command_tx.send(CatalogCommand::Generate {
                    products,
                    options: options.clone(),
                    output_path: output.clone(),
                })?;
            }
            CatalogUpdate::Progress {
                current,
                total,
                fraction,
            } => {
                println!("  [{:>3.0}%] product {}/{}", fraction * 100.0, current, total);
            }
            CatalogUpdate::Complete {
                path,
                product_count,
            } => {
                println!("Generated catalog of {} products → {}", product_count, path.display());
                break;
            }
            CatalogUpdate::Error { message } => bail!(message),
            CatalogUpdate::ConfigLoaded { .. } => {}
        }
    }

    drop(command_tx);
    worker.await?;
    Ok(())
}
