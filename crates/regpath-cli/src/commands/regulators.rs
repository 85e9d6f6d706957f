//! `regpath regulators`: significance calls for one module.

use std::fmt::Write;

use regpath_core::{
    LambdaReport, ModuleLayout, ModuleReport, ScorerConfig, rank_table, score_module,
};

pub struct RegulatorsCommandConfig<'a> {
    pub results_dir: &'a str,
    pub module_id: &'a str,
    pub scorer: ScorerConfig,
    pub output_path: Option<&'a str>,
    pub include_rankings: bool,
}

/// Run the regulators command.
pub fn run(cfg: RegulatorsCommandConfig<'_>) {
    let layout = ModuleLayout::new(cfg.results_dir, cfg.module_id);
    let report = match score_module(&layout, &cfg.scorer) {
        Ok(r) => r,
        Err(e) => super::fail(&e),
    };

    print!("{}", render_report(&report));
    if cfg.include_rankings {
        print!("{}", render_rank_table(&report));
    }

    if let Some(path) = cfg.output_path {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => eprintln!("Results written to {path}"),
                Err(e) => eprintln!("Failed to write {path}: {e}"),
            },
            Err(e) => eprintln!("Failed to serialize report: {e}"),
        }
    }
}

/// Header, then for each lambda an FDR comment line and one row per regulator.
pub fn render_report(report: &ModuleReport) -> String {
    let cutoff = report.config.cutoff;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#lambda\tprotein\tavg_reg_weight\tp-val(random < {cutoff:.2})\tweight>{cutoff:.2} and reject h0"
    );
    for lambda in &report.lambdas {
        render_lambda(&mut out, &report.module_id, lambda);
    }
    out
}

fn render_lambda(out: &mut String, module_id: &str, report: &LambdaReport) {
    let lam = report.lambda.value();
    let _ = writeln!(
        out,
        "# lambda {lam:.2} FDR {} {}/{}",
        report.fdr.display_rate(),
        report.fdr.failed,
        report.fdr.qualifying
    );
    for r in &report.results {
        let _ = writeln!(
            out,
            "{module_id}\t{lam:.6}\t{}\t{:.2}\t{:.2}\t{:.3}\t{}",
            r.protein,
            r.score,
            r.rand_mean,
            r.p_value,
            u8::from(r.hit)
        );
    }
}

/// One line per rank; each column is a lambda (ascending) holding
/// `protein:score` or an empty cell.
pub fn render_rank_table(report: &ModuleReport) -> String {
    let mut out = String::new();
    for row in rank_table(report) {
        let cells: Vec<String> = row
            .into_iter()
            .map(|cell| match cell {
                Some((protein, score)) => format!("{protein}:{score:.2}"),
                None => String::new(),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("\t"));
    }
    out
}
