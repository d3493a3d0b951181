//! Output shapes returned by the public entry points

use super::color::HexColor;
use super::lineage::Lineage;
use serde::Serialize;
use std::collections::HashMap;

/// Options for a batch resolution call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Query the remote taxonomy service when local tiers miss
    pub remote: bool,
    /// Return a [`TaxonRow`] table instead of a name → colour map
    pub detailed: bool,
}

/// One row of detailed output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonRow {
    pub taxon: String,
    pub color: HexColor,
    /// Phylum, or "Unknown"
    pub phylum: String,
    /// Rank, or "unknown"
    pub rank: String,
    /// Superkingdom, or "Unknown"
    pub superkingdom: String,
}

impl TaxonRow {
    pub fn new(taxon: impl Into<String>, color: HexColor, lineage: &Lineage) -> Self {
        Self {
            taxon: taxon.into(),
            color,
            phylum: lineage.phylum().unwrap_or("Unknown").to_string(),
            rank: lineage.rank().unwrap_or("unknown").to_string(),
            superkingdom: lineage.superkingdom().unwrap_or("Unknown").to_string(),
        }
    }
}

/// Name → colour mapping in first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<(String, HexColor)>,
    index: HashMap<String, usize>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless the name is already present; returns whether it was added
    pub fn insert(&mut self, taxon: impl Into<String>, color: HexColor) -> bool {
        let taxon = taxon.into();
        if self.index.contains_key(&taxon) {
            return false;
        }
        self.index.insert(taxon.clone(), self.entries.len());
        self.entries.push((taxon, color));
        true
    }

    pub fn get(&self, taxon: &str) -> Option<&HexColor> {
        self.index.get(taxon).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HexColor)> {
        self.entries.iter().map(|(name, color)| (name.as_str(), color))
    }
}

impl Serialize for ColorMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, color) in &self.entries {
            map.serialize_entry(name, color)?;
        }
        map.end()
    }
}

/// Result of a batch resolution, shaped by [`ResolveOptions::detailed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolutionOutput {
    Colors(ColorMap),
    Table(Vec<TaxonRow>),
}

impl ResolutionOutput {
    pub fn len(&self) -> usize {
        match self {
            ResolutionOutput::Colors(map) => map.len(),
            ResolutionOutput::Table(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn colors(&self) -> Option<&ColorMap> {
        match self {
            ResolutionOutput::Colors(map) => Some(map),
            ResolutionOutput::Table(_) => None,
        }
    }

    pub fn table(&self) -> Option<&[TaxonRow]> {
        match self {
            ResolutionOutput::Table(rows) => Some(rows),
            ResolutionOutput::Colors(_) => None,
        }
    }
}

/// Batch output plus the non-fatal warnings raised while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub output: ResolutionOutput,
    pub warnings: Vec<String>,
}
