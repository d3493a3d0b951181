//! Lineage records produced by resolution

use serde::Serialize;

/// Phylum reported for sentinel "unknown/unclassified" names
pub const UNCLASSIFIED_PHYLUM: &str = "Unclassified";

/// Rank reported for sentinel "unknown/unclassified" names
pub const UNCLASSIFIED_RANK: &str = "unclassified";

/// Rank reported when only the genus token of a name matched
pub const SPECIES_INFERRED_RANK: &str = "species_inferred";

/// Which tier produced a resolved lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageSource {
    /// Exact match in the local reference table
    Reference,
    /// Remote taxonomy service
    Remote,
}

/// A lineage whose phylum is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLineage {
    pub phylum: String,
    /// Rank label of the matched taxon (absent if the source did not report one)
    pub rank: Option<String>,
    pub superkingdom: Option<String>,
    pub source: LineageSource,
}

/// Outcome of resolving one taxon name
///
/// Keeps "matched", "inferred from genus", "known to be unclassified" and
/// "could not resolve" apart instead of encoding them in optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lineage {
    Resolved(ResolvedLineage),
    /// Full name missed; its first token matched a reference row
    Inferred {
        phylum: String,
        superkingdom: Option<String>,
    },
    /// Name is one of the sentinel "unknown" spellings
    Unclassified,
    /// No tier produced a phylum
    Unresolved,
}

impl Lineage {
    pub fn phylum(&self) -> Option<&str> {
        match self {
            Lineage::Resolved(r) => Some(&r.phylum),
            Lineage::Inferred { phylum, .. } => Some(phylum),
            Lineage::Unclassified => Some(UNCLASSIFIED_PHYLUM),
            Lineage::Unresolved => None,
        }
    }

    pub fn rank(&self) -> Option<&str> {
        match self {
            Lineage::Resolved(r) => r.rank.as_deref(),
            Lineage::Inferred { .. } => Some(SPECIES_INFERRED_RANK),
            Lineage::Unclassified => Some(UNCLASSIFIED_RANK),
            Lineage::Unresolved => None,
        }
    }

    pub fn superkingdom(&self) -> Option<&str> {
        match self {
            Lineage::Resolved(r) => r.superkingdom.as_deref(),
            Lineage::Inferred { superkingdom, .. } => superkingdom.as_deref(),
            Lineage::Unclassified | Lineage::Unresolved => None,
        }
    }

    /// True when a real phylum (not the unclassified sentinel) is known
    pub fn has_phylum(&self) -> bool {
        matches!(self, Lineage::Resolved(_) | Lineage::Inferred { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_per_variant() {
        let resolved = Lineage::Resolved(ResolvedLineage {
            phylum: "Bacteroidota".into(),
            rank: Some("genus".into()),
            superkingdom: Some("Bacteria".into()),
            source: LineageSource::Reference,
        });
        assert_eq!(resolved.phylum(), Some("Bacteroidota"));
        assert_eq!(resolved.rank(), Some("genus"));
        assert_eq!(resolved.superkingdom(), Some("Bacteria"));
        assert!(resolved.has_phylum());

        let inferred = Lineage::Inferred {
            phylum: "Bacillota".into(),
            superkingdom: None,
        };
        assert_eq!(inferred.rank(), Some(SPECIES_INFERRED_RANK));
        assert!(inferred.superkingdom().is_none());

        assert_eq!(Lineage::Unclassified.phylum(), Some(UNCLASSIFIED_PHYLUM));
        assert_eq!(Lineage::Unclassified.rank(), Some(UNCLASSIFIED_RANK));
        assert!(!Lineage::Unclassified.has_phylum());

        assert!(Lineage::Unresolved.phylum().is_none());
        assert!(Lineage::Unresolved.rank().is_none());
    }
}
