//! Significance calls for a module's regulators.
//!
//! For each lambda in the real data, every regulator's real score is paired
//! with the distribution of its scores across randomized runs. The random
//! magnitude is tested against the cutoff with a one-sided z-test: a regulator
//! is a hit when its random scores are confidently *below* the cutoff (at a
//! Bonferroni-corrected alpha) while its real score is strictly above it.
//!
//! Two behaviours are kept on purpose:
//! - a regulator absent from every random run is tested against the single
//!   sample `[0.0]`, which has zero spread and therefore `p = 0.0`;
//! - the standard error divides by the configured trial count, not by the
//!   number of runs the regulator actually appeared in.

use serde::Serialize;

use regpath_stats::{bonferroni_threshold, lower_tail_z_test, mean, population_std_dev};

use crate::error::Result;
use crate::scoring::{RegulatorScores, score_lambda};
use crate::trials::{DEFAULT_TRIALS, ModuleLayout, RandomScores, load_random_scores};
use crate::weights::{Lambda, WeightTable};

/// Family-wise alpha before correction.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Suggested cutoff for mouse modules; human modules usually use 0.20.
pub const DEFAULT_CUTOFF: f64 = 0.10;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Parameters of one scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorerConfig {
    /// Absolute regression-weight cutoff.
    pub cutoff: f64,
    /// Number of randomized runs expected on disk.
    pub trials: usize,
    pub alpha: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            trials: DEFAULT_TRIALS,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ScorerConfig {
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome for one regulator under one lambda.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub protein: String,
    pub score: f64,
    pub rand_mean: f64,
    pub rand_sd: f64,
    pub p_value: f64,
    pub hit: bool,
}

/// False-discovery bookkeeping at the cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FdrSummary {
    /// Regulators with `|score| >= cutoff`.
    pub qualifying: usize,
    /// Qualifying regulators whose p-value missed the corrected threshold.
    pub failed: usize,
}

impl FdrSummary {
    /// `failed / qualifying`, or `None` when nothing qualified.
    pub fn rate(&self) -> Option<f64> {
        if self.qualifying == 0 {
            None
        } else {
            Some(self.failed as f64 / self.qualifying as f64)
        }
    }

    /// Three-decimal rate, or `NA`.
    pub fn display_rate(&self) -> String {
        match self.rate() {
            Some(r) => format!("{r:.3}"),
            None => "NA".to_string(),
        }
    }
}

/// All calls for one lambda, regulators in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaReport {
    pub lambda: Lambda,
    pub corrected_alpha: f64,
    pub fdr: FdrSummary,
    pub results: Vec<ComparisonResult>,
}

impl LambdaReport {
    pub fn hits(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(|r| r.hit)
    }
}

/// Everything computed for one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    pub module_id: String,
    pub config: ScorerConfig,
    /// One entry per lambda in the real data, ascending.
    pub lambdas: Vec<LambdaReport>,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Sort regulators by descending absolute score. Ties keep name order.
pub fn rank_by_magnitude(scores: &RegulatorScores) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores.iter().map(|(p, s)| (p.clone(), *s)).collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    ranked
}

/// Test every ranked regulator of one lambda against its random scores.
pub fn compare_lambda(
    lambda: Lambda,
    ranked: &[(String, f64)],
    random: &RandomScores,
    config: &ScorerConfig,
) -> LambdaReport {
    let pcorr = bonferroni_threshold(config.alpha, ranked.len());
    let mut fdr = FdrSummary::default();
    let mut results = Vec::with_capacity(ranked.len());

    for (protein, score) in ranked {
        let samples = random.scores_for(lambda, protein);
        let rand_mean = mean(samples);
        let rand_sd = population_std_dev(samples);
        let test = lower_tail_z_test(rand_mean.abs(), config.cutoff.abs(), rand_sd, config.trials);

        let hit = test.significant_at(pcorr) && score.abs() > config.cutoff;

        if score.abs() >= config.cutoff {
            fdr.qualifying += 1;
            if !test.significant_at(pcorr) {
                fdr.failed += 1;
            }
        }

        results.push(ComparisonResult {
            protein: protein.clone(),
            score: *score,
            rand_mean,
            rand_sd,
            p_value: test.p_value,
            hit,
        });
    }

    LambdaReport {
        lambda,
        corrected_alpha: pcorr,
        fdr,
        results,
    }
}

/// Compare every lambda of the real table against the random distribution.
pub fn compare_module(
    real: &WeightTable,
    random: &RandomScores,
    config: &ScorerConfig,
) -> Vec<LambdaReport> {
    real.iter()
        .map(|(lambda, proteins)| {
            let ranked = rank_by_magnitude(&score_lambda(proteins));
            compare_lambda(lambda, &ranked, random, config)
        })
        .collect()
}

/// Read a module's real and random weight files and produce its report.
///
/// Fails if the real file or any of the `config.trials` random files is
/// missing, or if any file is malformed.
pub fn score_module(layout: &ModuleLayout, config: &ScorerConfig) -> Result<ModuleReport> {
    let real = layout.read_real()?;
    let random = load_random_scores(layout, config.trials, real.lambdas())?;
    let lambdas = compare_module(&real, &random, config);
    log::info!(
        "module {}: {} lambda(s), {} hit(s)",
        layout.module_id,
        lambdas.len(),
        lambdas.iter().map(|l| l.hits().count()).sum::<usize>()
    );
    Ok(ModuleReport {
        module_id: layout.module_id.clone(),
        config: *config,
        lambdas,
    })
}

/// How rankings shift with lambda: row `i` holds the `i`-th ranked
/// `(protein, score)` of each lambda, `None` where a lambda has fewer.
pub fn rank_table(report: &ModuleReport) -> Vec<Vec<Option<(String, f64)>>> {
    let depth = report
        .lambdas
        .iter()
        .map(|l| l.results.len())
        .max()
        .unwrap_or(0);
    (0..depth)
        .map(|i| {
            report
                .lambdas
                .iter()
                .map(|l| l.results.get(i).map(|r| (r.protein.clone(), r.score)))
                .collect()
        })
        .collect()
}
