//! Public resolution entry points
//!
//! Wraps lineage resolution and colour synthesis into the three operations
//! callers use: batch resolve, cache reset, palette preview.

use super::color_synthesizer::ColorSynthesizer;
use super::lineage_orchestrator::LineageOrchestrator;
use super::name_normalizer::identity_key;
use crate::models::{
    ColorMap, HexColor, Lineage, Resolution, ResolutionOutput, ResolveOptions, TaxonRow,
};
use phylocolor_common::{Error, Result};
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Clone)]
pub struct PaletteService {
    orchestrator: LineageOrchestrator,
    synthesizer: ColorSynthesizer,
}

impl PaletteService {
    pub fn new(orchestrator: LineageOrchestrator, synthesizer: ColorSynthesizer) -> Self {
        Self {
            orchestrator,
            synthesizer,
        }
    }

    pub fn orchestrator(&self) -> &LineageOrchestrator {
        &self.orchestrator
    }

    /// Lineage and colour for a single name
    pub async fn color_of(&self, name: &str, allow_remote: bool) -> (Lineage, HexColor) {
        let lineage = self.orchestrator.resolve(name, allow_remote).await;
        let color = self.color_for_lineage(name, &lineage);
        (lineage, color)
    }

    fn color_for_lineage(&self, name: &str, lineage: &Lineage) -> HexColor {
        self.synthesizer
            .color_for(&identity_key(name), lineage.phylum())
    }

    /// Resolve a batch of names.
    ///
    /// Output has one entry per distinct input string, in first-appearance
    /// order. An empty batch yields an empty map or table.
    pub async fn resolve<S: AsRef<str>>(&self, names: &[S], options: ResolveOptions) -> Resolution {
        let mut warnings = Vec::new();

        let allow_remote = options.remote && self.orchestrator.has_remote();
        if options.remote && !allow_remote {
            let message = "Remote fallback requested but no remote resolver is configured".to_string();
            warn!("{}", message);
            warnings.push(message);
        }

        let mut seen = HashSet::new();
        let mut colors = ColorMap::new();
        let mut rows = Vec::new();

        for name in names.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                continue;
            }

            let outcome = self
                .orchestrator
                .resolve_with_warning(name, allow_remote)
                .await;
            warnings.extend(outcome.warning);

            let color = self.color_for_lineage(name, &outcome.lineage);
            if options.detailed {
                rows.push(TaxonRow::new(name, color, &outcome.lineage));
            } else {
                colors.insert(name, color);
            }
        }

        let output = if options.detailed {
            ResolutionOutput::Table(rows)
        } else {
            ResolutionOutput::Colors(colors)
        };

        info!(
            taxa = output.len(),
            warnings = warnings.len(),
            remote = allow_remote,
            "Resolved taxon colours"
        );

        Resolution { output, warnings }
    }

    /// Forget every memoized lineage; returns how many were dropped.
    ///
    /// Waits on the session cache lock, so it blocks until any in-flight
    /// resolution (including a slow remote lookup) has finished.
    pub async fn reset_cache(&self) -> usize {
        let cleared = self.orchestrator.cache().clear().await;
        info!(cleared, "Session cache cleared");
        cleared
    }

    /// Sample up to `per_phylum` genera of each phylum (or of `phylum` only)
    /// from the reference table and colour them, local tiers only
    pub async fn preview(&self, phylum: Option<&str>, per_phylum: usize) -> Result<Vec<TaxonRow>> {
        if per_phylum == 0 {
            return Err(Error::InvalidInput(
                "per-phylum sample size must be at least 1".to_string(),
            ));
        }

        let reference = self.orchestrator.reference();
        let phyla: Vec<String> = reference
            .phyla()
            .into_iter()
            .filter(|p| phylum.map_or(true, |want| p.eq_ignore_ascii_case(want.trim())))
            .map(str::to_string)
            .collect();

        if phyla.is_empty() {
            if let Some(want) = phylum {
                warn!(phylum = %want, "No reference entries for requested phylum");
            }
            return Ok(Vec::new());
        }

        let genera: Vec<String> = phyla
            .iter()
            .flat_map(|p| reference.genera_for_phylum(p, per_phylum))
            .map(|row| row.name.clone())
            .collect();

        let mut rows = Vec::with_capacity(genera.len());
        for genus in &genera {
            let (lineage, color) = self.color_of(genus, false).await;
            rows.push(TaxonRow::new(genus.as_str(), color, &lineage));
        }

        Ok(rows)
    }
}
