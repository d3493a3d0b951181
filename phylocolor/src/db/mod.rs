//! Reference data access layer
//!
//! All connections are read-only; the reference table is produced offline.

mod reference;

pub use reference::{ReferenceDatabase, ReferenceRow};
