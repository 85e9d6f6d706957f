//! Per-regulator scores from regression weights.
//!
//! A regulator's score under one lambda is the mean, over its targets, of the
//! fold-averaged weight for each target. Weights keep their sign: a regulator
//! whose targets disagree in direction scores close to zero.

use std::collections::BTreeMap;

use regpath_stats::mean;

use crate::weights::{FoldWeights, Lambda, ProteinWeights, WeightTable};

/// Protein → score for a single lambda.
pub type RegulatorScores = BTreeMap<String, f64>;

/// Mean weight of one protein-target pair across folds.
pub fn fold_average(folds: &FoldWeights) -> f64 {
    let weights: Vec<f64> = folds.values().copied().collect();
    mean(&weights)
}

/// Score every protein recorded under one lambda.
pub fn score_lambda(proteins: &ProteinWeights) -> RegulatorScores {
    proteins
        .iter()
        .map(|(protein, targets)| {
            let per_target: Vec<f64> = targets.values().map(fold_average).collect();
            (protein.clone(), mean(&per_target))
        })
        .collect()
}

/// Score every lambda in a weight table.
pub fn score_table(table: &WeightTable) -> BTreeMap<Lambda, RegulatorScores> {
    table
        .iter()
        .map(|(lambda, proteins)| (lambda, score_lambda(proteins)))
        .collect()
}
