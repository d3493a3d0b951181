//! phylocolor - taxon colour assignment CLI
//!
//! `resolve` prints a colour (or a detailed lineage row) per taxon name;
//! `preview` samples genera per phylum from the reference table.
//! Logs go to stderr, results to stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phylocolor::config::{resolve_reference_db, resolve_remote_config};
use phylocolor::{
    build_palette_service, read_names_file, ReferenceDatabase, ResolutionOutput, ResolveOptions,
    TaxonRow,
};
use phylocolor_common::config::ConfigResolver;
use phylocolor_common::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "phylocolor", version, about = "Stable, phylum-aware colours for taxon names")]
struct Cli {
    /// Config file (overrides PHYLOCOLOR_CONFIG and the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite reference taxonomy table
    #[arg(long, global = true)]
    reference_db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve taxon names to colours
    Resolve {
        /// Taxon names
        names: Vec<String>,

        /// Read additional names from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,

        /// Query NCBI Taxonomy for names the reference table lacks
        #[arg(long)]
        remote: bool,

        /// Print phylum, rank and superkingdom alongside each colour
        #[arg(long)]
        detailed: bool,

        #[arg(long)]
        json: bool,
    },
    /// Preview the palette on genera sampled from the reference table
    Preview {
        /// Restrict to one phylum
        #[arg(long)]
        phylum: Option<String>,

        /// Genera sampled per phylum
        #[arg(long, default_value_t = 5)]
        per_phylum: usize,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loaded before the subscriber exists, so the chosen path is logged below
    let config_resolver = ConfigResolver::new(cli.config.clone());
    let config_path = config_resolver.config_path();
    let toml_config = config_resolver.load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting phylocolor v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: compiled defaults"),
    }
    info!("Log level: {}", toml_config.logging.level);

    let reference_path = resolve_reference_db(cli.reference_db.as_deref(), &toml_config)?;
    let reference = ReferenceDatabase::load_sqlite(&reference_path)
        .await
        .with_context(|| format!("Failed to load {}", reference_path.display()))?;
    let service = build_palette_service(reference, &resolve_remote_config(&toml_config))?;

    match cli.command {
        Command::Resolve {
            mut names,
            file,
            remote,
            detailed,
            json,
        } => {
            if let Some(path) = file {
                names.extend(
                    read_names_file(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                );
            }
            if names.is_empty() {
                return Err(Error::InvalidInput(
                    "no taxon names given (pass names or --file)".to_string(),
                )
                .into());
            }

            let resolution = service
                .resolve(names.as_slice(), ResolveOptions { remote, detailed })
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution.output)?);
            } else {
                match &resolution.output {
                    ResolutionOutput::Colors(colors) => {
                        for (name, color) in colors.iter() {
                            println!("{}\t{}", name, color);
                        }
                    }
                    ResolutionOutput::Table(rows) => print_rows(rows),
                }
            }
        }
        Command::Preview {
            phylum,
            per_phylum,
            json,
        } => {
            let rows = service.preview(phylum.as_deref(), per_phylum).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_rows(&rows);
            }
        }
    }

    Ok(())
}

fn print_rows(rows: &[TaxonRow]) {
    println!("taxon\tcolor\tphylum\trank\tsuperkingdom");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.taxon, row.color, row.phylum, row.rank, row.superkingdom
        );
    }
}
