//! phylocolor: stable, taxonomy-aware colours for taxon names
//!
//! Names are resolved to a lineage against the local reference table, with
//! an optional NCBI Taxonomy fallback, then coloured within a hue band
//! chosen by phylum so related taxa look related in every plot.

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use crate::db::{ReferenceDatabase, ReferenceRow};
pub use crate::models::{
    ColorMap, HexColor, Lineage, Resolution, ResolutionOutput, ResolveOptions, TaxonRow,
};
pub use crate::services::PaletteService;

use crate::services::{
    ColorSynthesizer, LineageOrchestrator, NcbiTaxonomyClient, RemoteLineageResolver,
    SessionCache,
};
use phylocolor_common::config::RemoteConfig;
use phylocolor_common::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Assemble a service around an already loaded reference table.
///
/// The remote resolver is attached only when `remote.enabled` is set.
pub fn build_palette_service(
    reference: ReferenceDatabase,
    remote: &RemoteConfig,
) -> Result<PaletteService> {
    let resolver: Option<Arc<dyn RemoteLineageResolver>> = if remote.enabled {
        let client = NcbiTaxonomyClient::new(remote)
            .map_err(|e| Error::Config(format!("Remote resolver setup failed: {}", e)))?;
        info!(base_url = %remote.base_url, "Remote lineage fallback available");
        Some(Arc::new(client))
    } else {
        None
    };

    let orchestrator = LineageOrchestrator::new(Arc::new(reference), SessionCache::new(), resolver);
    Ok(PaletteService::new(orchestrator, ColorSynthesizer::default()))
}

/// Taxon names from a text file, one per line; blank lines are skipped
pub fn read_names_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    debug!(path = %path.display(), count = names.len(), "Read taxon name list");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_names_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("names.txt");
        std::fs::write(&path, "g__Bacteroides\n\n  Faecalibacterium prausnitzii  \n\t\nunclassified\n")
            .unwrap();

        let names = read_names_file(&path).unwrap();
        assert_eq!(
            names,
            vec!["g__Bacteroides", "Faecalibacterium prausnitzii", "unclassified"]
        );
    }

    #[test]
    fn test_read_names_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_names_file(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
