//! File layout of one module's results and loading of its randomized trials.
//!
//! Real weights live at `{dir}/module{id}_regweights.tab`; randomized control
//! runs at `{dir}/module{id}_rand{i}_regweights.tab` for `i` in `1..=trials`.
//! The significance test assumes a fixed number of trials, so a single
//! missing trial aborts the load.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::scoring::score_table;
use crate::weights::{Lambda, WeightTable, read_weight_file};

/// Default number of randomized runs per module.
pub const DEFAULT_TRIALS: usize = 40;

/// Score used for a protein that never appears in any random trial.
static ABSENT_SCORES: [f64; 1] = [0.0];

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Where a module's weight files live.
#[derive(Debug, Clone)]
pub struct ModuleLayout {
    pub results_dir: PathBuf,
    pub module_id: String,
}

impl ModuleLayout {
    pub fn new(results_dir: impl Into<PathBuf>, module_id: impl Into<String>) -> Self {
        Self {
            results_dir: results_dir.into(),
            module_id: module_id.into(),
        }
    }

    /// Path of the real (non-randomized) weight file.
    pub fn real_path(&self) -> PathBuf {
        self.results_dir
            .join(format!("module{}_regweights.tab", self.module_id))
    }

    /// Path of random trial `trial` (1-based).
    pub fn trial_path(&self, trial: usize) -> PathBuf {
        self.results_dir
            .join(format!("module{}_rand{trial}_regweights.tab", self.module_id))
    }

    /// Read the real weight file, failing with [`Error::MissingInput`] if absent.
    pub fn read_real(&self) -> Result<WeightTable> {
        let path = self.real_path();
        if !path.exists() {
            return Err(Error::MissingInput { path });
        }
        read_weight_file(&path)
    }
}

// ---------------------------------------------------------------------------
// Random score distribution
// ---------------------------------------------------------------------------

/// lambda → protein → one score per random trial the protein appeared in.
#[derive(Debug, Clone, Default)]
pub struct RandomScores {
    scores: BTreeMap<Lambda, BTreeMap<String, Vec<f64>>>,
}

impl RandomScores {
    /// An empty distribution that accepts scores for the given lambdas only.
    pub fn for_lambdas(lambdas: impl IntoIterator<Item = Lambda>) -> Self {
        Self {
            scores: lambdas.into_iter().map(|l| (l, BTreeMap::new())).collect(),
        }
    }

    /// Score one trial's weights and append each protein's score.
    ///
    /// Lambdas that are not tracked are skipped.
    pub fn add_trial(&mut self, trial: &WeightTable) {
        for (lambda, scores) in score_table(trial) {
            let Some(by_protein) = self.scores.get_mut(&lambda) else {
                log::debug!("ignoring random scores for untracked lambda {lambda}");
                continue;
            };
            for (protein, score) in scores {
                by_protein.entry(protein).or_default().push(score);
            }
        }
    }

    /// Observed scores, or `[0.0]` if the protein never appeared for `lambda`.
    pub fn scores_for(&self, lambda: Lambda, protein: &str) -> &[f64] {
        self.scores
            .get(&lambda)
            .and_then(|m| m.get(protein))
            .map(Vec::as_slice)
            .unwrap_or(&ABSENT_SCORES)
    }

    pub fn lambdas(&self) -> BTreeSet<Lambda> {
        self.scores.keys().copied().collect()
    }
}

/// Load and score trials `1..=trials`, keeping only the tracked lambdas.
pub fn load_random_scores(
    layout: &ModuleLayout,
    trials: usize,
    lambdas: impl IntoIterator<Item = Lambda>,
) -> Result<RandomScores> {
    let mut dist = RandomScores::for_lambdas(lambdas);
    for trial in 1..=trials {
        let path = layout.trial_path(trial);
        if !path.exists() {
            return Err(Error::MissingTrial { trial, path });
        }
        let table = read_weight_file(&path)?;
        dist.add_trial(&table);
    }
    log::debug!("loaded {trials} random trials for module {}", layout.module_id);
    Ok(dist)
}
