//! Regression weight tables.
//!
//! A weight file is tab-delimited with no header and exactly five columns:
//!
//! ```text
//! lambda  fold  protein  target  weight
//! 0.10    1     Prot1    GeneA   0.25
//! ```
//!
//! Parsed into `lambda → protein → target → fold → weight`. A repeated
//! `(lambda, protein, target, fold)` key overwrites the earlier weight.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::lines::lossy_lines;

/// Number of tab-separated columns in a weight row.
pub const WEIGHT_COLUMNS: usize = 5;

/// Fold → weight for one protein-target pair.
pub type FoldWeights = BTreeMap<i64, f64>;
/// Target → per-fold weights for one protein.
pub type TargetWeights = BTreeMap<String, FoldWeights>;
/// Protein → targets, all weights for one lambda.
pub type ProteinWeights = BTreeMap<String, TargetWeights>;

// ---------------------------------------------------------------------------
// Lambda key
// ---------------------------------------------------------------------------

/// A regularization parameter value usable as an ordered map key.
///
/// Ordering is IEEE total ordering, with `-0.0` folded into `0.0` so that
/// every spelling of the same number lands on one key.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Lambda(f64);

impl Lambda {
    pub fn new(value: f64) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Lambda {}

impl PartialOrd for Lambda {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Lambda {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Weight table
// ---------------------------------------------------------------------------

/// All regression weights from one run (real or randomized) of one module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    lambdas: BTreeMap<Lambda, ProteinWeights>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one weight, returning the weight it replaced, if any.
    pub fn insert(
        &mut self,
        lambda: Lambda,
        fold: i64,
        protein: &str,
        target: &str,
        weight: f64,
    ) -> Option<f64> {
        self.lambdas
            .entry(lambda)
            .or_default()
            .entry(protein.to_string())
            .or_default()
            .entry(target.to_string())
            .or_default()
            .insert(fold, weight)
    }

    /// Look up a single weight.
    pub fn weight(&self, lambda: Lambda, protein: &str, target: &str, fold: i64) -> Option<f64> {
        self.lambdas
            .get(&lambda)?
            .get(protein)?
            .get(target)?
            .get(&fold)
            .copied()
    }

    /// All weights recorded under one lambda.
    pub fn proteins(&self, lambda: Lambda) -> Option<&ProteinWeights> {
        self.lambdas.get(&lambda)
    }

    /// Lambdas present, ascending.
    pub fn lambdas(&self) -> impl Iterator<Item = Lambda> + '_ {
        self.lambdas.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Lambda, &ProteinWeights)> {
        self.lambdas.iter().map(|(l, p)| (*l, p))
    }

    /// Number of distinct lambdas.
    pub fn len(&self) -> usize {
        self.lambdas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lambdas.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read and parse a weight file from disk.
pub fn read_weight_file(path: &Path) -> Result<WeightTable> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    log::debug!("reading weights from {}", path.display());
    parse_weights(BufReader::new(file), path)
}

/// Parse weight rows from any buffered reader. `origin` is only used to
/// label errors.
pub fn parse_weights<R: BufRead>(reader: R, origin: &Path) -> Result<WeightTable> {
    let mut table = WeightTable::new();
    for (idx, line) in lossy_lines(reader).enumerate() {
        let line = line.map_err(|e| Error::io(origin, e))?;
        if line.is_empty() {
            continue;
        }
        let format_error = |message: String| Error::Format {
            path: origin.to_path_buf(),
            line: idx + 1,
            message,
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != WEIGHT_COLUMNS {
            return Err(format_error(format!(
                "expected {WEIGHT_COLUMNS} tab-separated fields, found {}",
                fields.len()
            )));
        }

        let lambda: f64 = fields[0]
            .trim()
            .parse()
            .map_err(|_| format_error(format!("lambda is not a number: {:?}", fields[0])))?;
        let fold: i64 = fields[1]
            .trim()
            .parse()
            .map_err(|_| format_error(format!("fold is not an integer: {:?}", fields[1])))?;
        let weight: f64 = fields[4]
            .trim()
            .parse()
            .map_err(|_| format_error(format!("weight is not a number: {:?}", fields[4])))?;

        table.insert(Lambda::new(lambda), fold, fields[2], fields[3], weight);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<WeightTable> {
        parse_weights(text.as_bytes(), Path::new("test.tab"))
    }

    #[test]
    fn test_parse_basic_rows() {
        let table = parse("0.1\t1\tP1\tT1\t0.5\n0.1\t2\tP1\tT1\t-0.25\n0.2\t1\tP2\tT3\t1e-3\n")
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.weight(Lambda::new(0.1), "P1", "T1", 1), Some(0.5));
        assert_eq!(table.weight(Lambda::new(0.1), "P1", "T1", 2), Some(-0.25));
        assert_eq!(table.weight(Lambda::new(0.2), "P2", "T3", 1), Some(0.001));
        assert_eq!(table.weight(Lambda::new(0.2), "P1", "T1", 1), None);
    }

    #[test]
    fn test_last_write_wins() {
        let table = parse("0.1\t1\tP1\tT1\t0.5\n0.1\t1\tP1\tT1\t0.9\n").unwrap();
        assert_eq!(table.weight(Lambda::new(0.1), "P1", "T1", 1), Some(0.9));
        let folds = &table.proteins(Lambda::new(0.1)).unwrap()["P1"]["T1"];
        assert_eq!(folds.len(), 1);
    }

    #[test]
    fn test_lambda_spellings_share_key() {
        let table = parse("0.1\t1\tP1\tT1\t0.5\n0.10\t2\tP1\tT1\t0.7\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.proteins(Lambda::new(0.1)).unwrap()["P1"]["T1"].len(), 2);
    }

    #[test]
    fn test_lambdas_ascending() {
        let table = parse("0.3\t1\tP\tT\t1\n0.1\t1\tP\tT\t1\n0.2\t1\tP\tT\t1\n").unwrap();
        let lambdas: Vec<f64> = table.lambdas().map(Lambda::value).collect();
        assert_eq!(lambdas, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_negative_zero_lambda_folds_into_zero() {
        assert_eq!(Lambda::new(-0.0), Lambda::new(0.0));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse("\n0.1\t1\tP1\tT1\t0.5\n\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_numeric_fields_are_trimmed() {
        let table = parse("0.1 \t 3\tP1\tT1\t 0.5\r\n").unwrap();
        assert_eq!(table.weight(Lambda::new(0.1), "P1", "T1", 3), Some(0.5));
    }

    #[test]
    fn test_name_fields_kept_verbatim() {
        let table = parse("0.1\t1\tP1 \tT1\t0.5\n0.1\t1\tP1\tT1\t0.7\n").unwrap();
        assert_eq!(table.weight(Lambda::new(0.1), "P1 ", "T1", 1), Some(0.5));
        assert_eq!(table.weight(Lambda::new(0.1), "P1", "T1", 1), Some(0.7));
    }

    #[test]
    fn test_non_utf8_protein_is_decoded_lossily() {
        let bytes: &[u8] = b"0.1\t1\tP\xe9\tT1\t0.5\n";
        let table = parse_weights(bytes, Path::new("test.tab")).unwrap();
        assert_eq!(table.weight(Lambda::new(0.1), "P\u{FFFD}", "T1", 1), Some(0.5));
    }

    #[test]
    fn test_non_numeric_weight_is_format_error() {
        let err = parse("0.1\t1\tP1\tT1\t0.5\n0.1\t1\tP1\tT2\tabc\n").unwrap_err();
        match err {
            Error::Format { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("weight"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_fold_is_format_error() {
        let err = parse("0.1\t1.5\tP1\tT1\t0.5\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_non_numeric_lambda_is_format_error() {
        assert!(matches!(
            parse("low\t1\tP1\tT1\t0.5\n"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_wrong_field_count_is_format_error() {
        assert!(matches!(
            parse("0.1\t1\tP1\tT1\n"),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            parse("0.1\t1\tP1\tT1\t0.5\textra\n"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_insert_reports_replaced_weight() {
        let mut table = WeightTable::new();
        assert_eq!(table.insert(Lambda::new(0.1), 1, "P", "T", 0.2), None);
        assert_eq!(table.insert(Lambda::new(0.1), 1, "P", "T", 0.4), Some(0.2));
    }
}
