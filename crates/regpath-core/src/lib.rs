//! # regpath-core
//!
//! Offline analysis for module-network pipelines. Two independent tools share
//! this crate:
//!
//! - **Regulator significance**: read a module's real regression weights and
//!   its randomized control runs, score each regulator per lambda, and call
//!   the regulators whose weights beat the random background.
//! - **Solution confidence**: read many solver dumps and report, per variable
//!   symbol, the fraction of solutions in which it appears.
//!
//! ## Quick Start
//!
//! ```no_run
//! use regpath_core::{ModuleLayout, ScorerConfig, score_module};
//!
//! let layout = ModuleLayout::new("results", "1549");
//! let report = score_module(&layout, &ScorerConfig::with_cutoff(0.10)).unwrap();
//! for lambda in &report.lambdas {
//!     println!("lambda {} FDR {}", lambda.lambda, lambda.fdr.display_rate());
//! }
//! ```
//!
//! ## Pipeline
//!
//! Weight file → [`WeightTable`] → [`scoring`] → [`significance`] (against
//! [`RandomScores`] from [`trials`])
//!
//! Dump files → [`dump`] → [`SymbolTally`] → [`confidence`] tables

pub mod confidence;
pub mod dump;
pub mod error;
mod lines;
pub mod scoring;
pub mod significance;
pub mod trials;
pub mod weights;

pub use confidence::{
    AggregateSummary, Aggregation, AggregatorConfig, ConfidenceTable, SymbolTally, aggregate,
    confidence_tables, matching_files, tally_file, tally_files, tally_matching, write_tables,
};
pub use dump::{DumpStatus, SYMBOL_NOT_FOUND, VariableCategory, symbol_name, tally_dump};
pub use error::{Error, Result};
pub use scoring::{RegulatorScores, score_lambda, score_table};
pub use significance::{
    ComparisonResult, DEFAULT_ALPHA, DEFAULT_CUTOFF, FdrSummary, LambdaReport, ModuleReport,
    ScorerConfig, compare_lambda, compare_module, rank_by_magnitude, rank_table, score_module,
};
pub use trials::{DEFAULT_TRIALS, ModuleLayout, RandomScores, load_random_scores};
pub use weights::{Lambda, WeightTable, parse_weights, read_weight_file};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
