//! Per-symbol confidence across repeated solver runs.
//!
//! Confidence of a symbol is the fraction of good dump files in which it
//! appears. Files that hit a bad line are left out of the denominator, but
//! whatever they tallied before the bad line is kept.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dump::{DumpStatus, VariableCategory, tally_dump};
use crate::error::{Error, Result};

/// Log a running count every this many good files.
const PROGRESS_EVERY: u64 = 100;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Glob pattern matching dump files, e.g. `runs/path_sol*.dump`.
    pub pattern: String,
    /// Output files are written to `{output_prefix}_{code}.tab`.
    pub output_prefix: String,
}

impl AggregatorConfig {
    pub fn new(pattern: impl Into<String>, output_prefix: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            output_prefix: output_prefix.into(),
        }
    }

    pub fn output_path(&self, category: VariableCategory) -> PathBuf {
        PathBuf::from(format!("{}_{}.tab", self.output_prefix, category.code()))
    }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Occurrence counts per category and symbol, plus file bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct SymbolTally {
    counts: BTreeMap<VariableCategory, BTreeMap<String, u64>>,
    good_files: u64,
    bad_files: u64,
}

impl SymbolTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: VariableCategory, symbol: String) {
        *self
            .counts
            .entry(category)
            .or_default()
            .entry(symbol)
            .or_insert(0) += 1;
    }

    pub fn count(&self, category: VariableCategory, symbol: &str) -> u64 {
        self.counts
            .get(&category)
            .and_then(|m| m.get(symbol))
            .copied()
            .unwrap_or(0)
    }

    /// Symbols of one category with their counts, sorted by symbol.
    pub fn symbols(&self, category: VariableCategory) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .get(&category)
            .into_iter()
            .flatten()
            .map(|(s, c)| (s.as_str(), *c))
    }

    /// Distinct symbols across all categories.
    pub fn total_symbols(&self) -> usize {
        self.counts.values().map(BTreeMap::len).sum()
    }

    pub fn mark_good(&mut self) {
        self.good_files += 1;
    }

    pub fn mark_bad(&mut self) {
        self.bad_files += 1;
    }

    /// Files that contribute to the denominator.
    pub fn good_files(&self) -> u64 {
        self.good_files
    }

    pub fn bad_files(&self) -> u64 {
        self.bad_files
    }
}

/// Tally one dump file from disk, updating good/bad counts.
pub fn tally_file(path: &Path, tally: &mut SymbolTally) -> DumpStatus {
    let status = File::open(path).and_then(|f| tally_dump(BufReader::new(f), tally));
    match status {
        Ok(DumpStatus::Complete) => {
            tally.mark_good();
            log::debug!("parsed {}", path.display());
            if tally.good_files() % PROGRESS_EVERY == 0 {
                log::info!("{} solutions parsed", tally.good_files());
            }
            DumpStatus::Complete
        }
        Ok(status) => {
            tally.mark_bad();
            match &status {
                DumpStatus::Malformed { line, content } => {
                    log::warn!("Bad format {}:{line}: {content:?}", path.display())
                }
                _ => log::warn!("Bad file: {}", path.display()),
            }
            status
        }
        Err(e) => {
            tally.mark_bad();
            log::warn!("Unreadable file: {}: {e}", path.display());
            DumpStatus::Unreadable {
                reason: e.to_string(),
            }
        }
    }
}

/// Tally every file in order.
pub fn tally_files<P: AsRef<Path>>(paths: &[P]) -> SymbolTally {
    let mut tally = SymbolTally::new();
    for path in paths {
        tally_file(path.as_ref(), &mut tally);
    }
    tally
}

/// Expand a glob pattern into a sorted list of paths.
pub fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| Error::Pattern(e.to_string()))?;
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => log::warn!("skipping unreadable match: {e}"),
        }
    }
    paths.sort();
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Confidence tables
// ---------------------------------------------------------------------------

/// Confidence for every symbol of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceTable {
    pub category: VariableCategory,
    pub entries: Vec<(String, f64)>,
}

impl ConfidenceTable {
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, c)| *c)
    }

    /// Header line and one `symbol\tconfidence` row per entry.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "#item\tconf({})", self.category)?;
        for (symbol, conf) in &self.entries {
            writeln!(out, "{symbol}\t{conf:.6}")?;
        }
        out.flush()
    }
}

/// Build all five tables, one per category in [`VariableCategory::ALL`] order.
///
/// With no good files every confidence is 0. A confidence above 1 means a
/// symbol was counted more than once per file and fails the whole run.
pub fn confidence_tables(tally: &SymbolTally) -> Result<Vec<ConfidenceTable>> {
    let total = tally.good_files();
    let mut tables = Vec::with_capacity(VariableCategory::ALL.len());
    for category in VariableCategory::ALL {
        let mut entries = Vec::new();
        for (symbol, count) in tally.symbols(category) {
            let conf = if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            };
            if conf > 1.0 {
                return Err(Error::ConfidenceOverflow {
                    category,
                    symbol: symbol.to_string(),
                    count,
                    total,
                });
            }
            entries.push((symbol.to_string(), conf));
        }
        tables.push(ConfidenceTable { category, entries });
    }
    Ok(tables)
}

/// Write each table to its output file, returning the paths written.
pub fn write_tables(tables: &[ConfidenceTable], config: &AggregatorConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = config.output_path(table.category);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        table
            .write_to(BufWriter::new(file))
            .map_err(|e| Error::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

/// Summary of an aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateSummary {
    pub files_matched: usize,
    pub good_files: u64,
    pub bad_files: u64,
    pub outputs: Vec<PathBuf>,
}

/// Dump files matched by a pattern and their combined tally.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub paths: Vec<PathBuf>,
    pub tally: SymbolTally,
}

impl Aggregation {
    /// Validate every confidence, then write the tables. Nothing is written
    /// unless every confidence is valid.
    pub fn finish(self, config: &AggregatorConfig) -> Result<AggregateSummary> {
        let tables = confidence_tables(&self.tally)?;
        let outputs = write_tables(&tables, config)?;
        Ok(AggregateSummary {
            files_matched: self.paths.len(),
            good_files: self.tally.good_files(),
            bad_files: self.tally.bad_files(),
            outputs,
        })
    }
}

/// Match and tally every dump file for `config`.
pub fn tally_matching(config: &AggregatorConfig) -> Result<Aggregation> {
    let paths = matching_files(&config.pattern)?;
    let tally = tally_files(&paths);
    Ok(Aggregation { paths, tally })
}

/// Match, tally, validate and write.
pub fn aggregate(config: &AggregatorConfig) -> Result<AggregateSummary> {
    tally_matching(config)?.finish(config)
}
