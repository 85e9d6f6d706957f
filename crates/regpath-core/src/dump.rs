//! Solver dump files.
//!
//! Each line of a dump names one variable setting:
//!
//! ```text
//! x	'P1'.'G7'	1
//! sigma	'path12'	1
//! ```
//!
//! The first field is the variable category, the last is the integer setting,
//! and everything in between is the variable's index tuple. A line containing
//! `Symbol not found` means the solver run did not produce a usable solution.
//!
//! A line with only a category and a setting has an empty index tuple and is
//! tallied under the empty symbol. A line with a single field is malformed.

use std::collections::HashSet;
use std::fmt;
use std::io::BufRead;

use serde::Serialize;

use crate::confidence::SymbolTally;
use crate::lines::lossy_lines;

/// Marker the dump tool writes when a requested symbol is missing.
pub const SYMBOL_NOT_FOUND: &str = "Symbol not found";

// ---------------------------------------------------------------------------
// Variable categories
// ---------------------------------------------------------------------------

/// The closed set of solver variables that are tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum VariableCategory {
    /// `sigma`: a path is selected.
    Path,
    /// `x`: an edge is kept.
    Edge,
    /// `y`: a node is kept.
    Node,
    /// `d`: an edge orientation.
    Direction,
    /// `sat`: a source-target pair is satisfied.
    PairSatisfaction,
}

impl VariableCategory {
    pub const ALL: [VariableCategory; 5] = [
        VariableCategory::Path,
        VariableCategory::Edge,
        VariableCategory::Node,
        VariableCategory::Direction,
        VariableCategory::PairSatisfaction,
    ];

    /// Code used in dump files and output file names.
    pub fn code(self) -> &'static str {
        match self {
            VariableCategory::Path => "sigma",
            VariableCategory::Edge => "x",
            VariableCategory::Node => "y",
            VariableCategory::Direction => "d",
            VariableCategory::PairSatisfaction => "sat",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// How a dump file ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpStatus {
    /// Every line was read.
    Complete,
    /// The solver reported a missing symbol at `line`.
    SymbolNotFound { line: usize },
    /// `line` could not be split into category and integer setting.
    Malformed { line: usize, content: String },
    /// The file could not be read at all.
    Unreadable { reason: String },
}

impl DumpStatus {
    pub fn is_good(&self) -> bool {
        matches!(self, DumpStatus::Complete)
    }
}

/// Join index parts with `.` and drop quote characters.
pub fn symbol_name(parts: &[&str]) -> String {
    parts.join(".").replace(['\'', '"'], "")
}

/// Tally one dump into `tally`.
///
/// Only the first occurrence of a `(category, symbol)` pair in the file is
/// counted. Parsing stops at the first bad line; counts recorded before it
/// stay in `tally`. Unknown categories are logged and skipped. Whether the
/// file counts toward the solution total is left to the caller.
pub fn tally_dump<R: BufRead>(reader: R, tally: &mut SymbolTally) -> std::io::Result<DumpStatus> {
    let mut seen: HashSet<(VariableCategory, String)> = HashSet::new();

    for (idx, line) in lossy_lines(reader).enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.contains(SYMBOL_NOT_FOUND) {
            return Ok(DumpStatus::SymbolNotFound { line: lineno });
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        let malformed = || DumpStatus::Malformed {
            line: lineno,
            content: trimmed.to_string(),
        };
        let [code, name @ .., setting] = fields.as_slice() else {
            return Ok(malformed());
        };
        if setting.trim().parse::<i64>().is_err() {
            return Ok(malformed());
        }

        let Some(category) = VariableCategory::from_code(code) else {
            log::warn!("Implementation for variable {code} not available");
            continue;
        };

        let symbol = symbol_name(name);
        if seen.insert((category, symbol.clone())) {
            tally.record(category, symbol);
        }
    }

    Ok(DumpStatus::Complete)
}
