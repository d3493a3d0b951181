//! Phylum → base hue mapping
//!
//! Current names and their legacy synonyms share one hue so a dataset
//! labelled with either nomenclature renders the same way. Phyla missing
//! from the table get a hue hashed from their own name.

use super::hasher::{hash_unit, SALT_BASE};
use std::collections::HashMap;

/// (phylum, base hue in degrees)
const PHYLUM_HUES: &[(&str, f64)] = &[
    // Bacteria
    ("Bacteroidota", 250.0),
    ("Bacteroidetes", 250.0),
    ("Bacillota", 40.0),
    ("Firmicutes", 40.0),
    ("Pseudomonadota", 130.0),
    ("Proteobacteria", 130.0),
    ("Actinomycetota", 300.0),
    ("Actinobacteria", 300.0),
    ("Verrucomicrobiota", 340.0),
    ("Verrucomicrobia", 340.0),
    ("Fusobacteriota", 70.0),
    ("Fusobacteria", 70.0),
    ("Spirochaetota", 190.0),
    ("Spirochaetes", 190.0),
    ("Cyanobacteriota", 105.0),
    ("Cyanobacteria", 105.0),
    ("Chloroflexota", 160.0),
    ("Chloroflexi", 160.0),
    ("Planctomycetota", 220.0),
    ("Planctomycetes", 220.0),
    ("Acidobacteriota", 15.0),
    ("Acidobacteria", 15.0),
    ("Campylobacterota", 355.0),
    ("Desulfobacterota", 275.0),
    ("Thermodesulfobacteriota", 275.0),
    ("Synergistota", 320.0),
    ("Synergistetes", 320.0),
    ("Mycoplasmatota", 55.0),
    ("Tenericutes", 55.0),
    ("Deinococcota", 85.0),
    ("Deinococcus-Thermus", 85.0),
    ("Gemmatimonadota", 175.0),
    ("Gemmatimonadetes", 175.0),
    ("Nitrospirota", 235.0),
    ("Nitrospirae", 235.0),
    ("Lentisphaerota", 285.0),
    ("Lentisphaerae", 285.0),
    ("Elusimicrobiota", 205.0),
    ("Elusimicrobia", 205.0),
    ("Thermotogota", 145.0),
    ("Thermotogae", 145.0),
    ("Chlorobiota", 120.0),
    ("Chlorobi", 120.0),
    // Archaea
    ("Methanobacteriota", 0.0),
    ("Euryarchaeota", 0.0),
    ("Thermoproteota", 25.0),
    ("Crenarchaeota", 25.0),
    ("Nitrososphaerota", 310.0),
    ("Thaumarchaeota", 310.0),
    // Fungi
    ("Ascomycota", 60.0),
    ("Basidiomycota", 10.0),
    ("Mucoromycota", 150.0),
    ("Chytridiomycota", 265.0),
    ("Microsporidia", 95.0),
    ("Zoopagomycota", 185.0),
];

#[derive(Clone)]
pub struct PhylumHueTable {
    hues: HashMap<String, f64>,
}

impl Default for PhylumHueTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PhylumHueTable {
    pub fn new() -> Self {
        Self {
            hues: PHYLUM_HUES
                .iter()
                .map(|&(name, hue)| (name.to_lowercase(), hue))
                .collect(),
        }
    }

    /// Listed hue, matched case-insensitively
    pub fn known_hue(&self, phylum: &str) -> Option<f64> {
        self.hues.get(&phylum.trim().to_lowercase()).copied()
    }

    /// Listed hue, or one hashed from the phylum name into [0, 360)
    pub fn base_hue(&self, phylum: &str) -> f64 {
        self.known_hue(phylum)
            .unwrap_or_else(|| hash_unit(phylum, SALT_BASE) * 360.0)
    }

    pub fn len(&self) -> usize {
        self.hues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_share_hue() {
        let table = PhylumHueTable::new();
        for (current, legacy) in [
            ("Bacillota", "Firmicutes"),
            ("Bacteroidota", "Bacteroidetes"),
            ("Pseudomonadota", "Proteobacteria"),
            ("Actinomycetota", "Actinobacteria"),
            ("Thermoproteota", "Crenarchaeota"),
        ] {
            assert_eq!(table.known_hue(current), table.known_hue(legacy));
            assert!(table.known_hue(current).is_some());
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let table = PhylumHueTable::new();
        assert_eq!(table.known_hue("firmicutes"), Some(40.0));
        assert_eq!(table.known_hue("ASCOMYCOTA"), Some(60.0));
    }

    #[test]
    fn test_unknown_phylum_gets_stable_hashed_hue() {
        let table = PhylumHueTable::new();
        assert!(table.known_hue("Candidatus Saccharibacteria").is_none());

        let hue = table.base_hue("Candidatus Saccharibacteria");
        assert!((0.0..360.0).contains(&hue));
        assert_eq!(hue, table.base_hue("Candidatus Saccharibacteria"));
        assert_ne!(hue, table.base_hue("Patescibacteria"));
    }

    #[test]
    fn test_table_entries_in_range() {
        assert!(PHYLUM_HUES.iter().all(|(_, h)| (0.0..360.0).contains(h)));
        assert_eq!(PhylumHueTable::new().len(), PHYLUM_HUES.len());
    }
}
