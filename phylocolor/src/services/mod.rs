//! Lineage resolution and colour synthesis services

pub mod color_synthesizer;
pub mod hasher;
pub mod lineage_orchestrator;
pub mod name_normalizer;
pub mod ncbi_client;
pub mod palette_service;
pub mod phylum_hues;
pub mod session_cache;
pub mod unclassified;

pub use color_synthesizer::ColorSynthesizer;
pub use lineage_orchestrator::{LineageOrchestrator, LineageOutcome};
pub use ncbi_client::{NcbiTaxonomyClient, RemoteError, RemoteLineageResolver};
pub use palette_service::PaletteService;
pub use phylum_hues::PhylumHueTable;
pub use session_cache::SessionCache;
