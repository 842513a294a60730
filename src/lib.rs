//! Rewrite machine-generated prose so it stops reading like it.
//!
//! ```no_run
//! use slop_scrub::Humanizer;
//!
//! let humanizer = Humanizer::new(Some(42));
//! let out = humanizer.process("Cinquecento. È il problema fondamentale [1].");
//! assert!(out.contains("[1]"));
//! ```

pub mod analyzer;
pub mod burstiness;
pub mod catalog;
pub mod citation;
pub mod error;
pub mod hedging;
pub mod hyperparameters;
pub mod lexical;
pub mod noise;
pub mod pipeline;
pub mod segment;
pub mod structural;

mod text;

pub use analyzer::{analyze, analyze_with, DiagnosticReport};
pub use catalog::{Catalog, CatalogData, PatternKind, Strategy};
pub use citation::{protect, restore, Protected};
pub use error::{Error, Result};
pub use hyperparameters::Hyperparameters;
pub use pipeline::{Humanizer, Mode, PhaseFn};
pub use segment::{Document, Segment};
