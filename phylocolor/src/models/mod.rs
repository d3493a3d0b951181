//! Data models for lineage resolution and colour output

pub mod color;
pub mod lineage;
pub mod output;

pub use color::{HclColor, HexColor};
pub use lineage::{
    Lineage, LineageSource, ResolvedLineage, SPECIES_INFERRED_RANK, UNCLASSIFIED_PHYLUM,
    UNCLASSIFIED_RANK,
};
pub use output::{ColorMap, Resolution, ResolutionOutput, ResolveOptions, TaxonRow};
