//! # phylocolor common library
//!
//! Shared code for the phylocolor workspace:
//! - Error and result types
//! - TOML configuration loading with ENV overrides

pub mod config;
pub mod error;

pub use error::{Error, Result};
