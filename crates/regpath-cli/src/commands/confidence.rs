//! `regpath confidence`: per-symbol confidence over solver dumps.

use regpath_core::{AggregatorConfig, tally_matching};

/// Run the confidence command.
pub fn run(cfg: &AggregatorConfig) {
    let run = match tally_matching(cfg) {
        Ok(r) => r,
        Err(e) => super::fail(&e),
    };
    eprintln!("Writing confs to files with prefix {}", cfg.output_prefix);

    println!("# {} total solutions", run.tally.good_files());
    if run.tally.bad_files() > 0 {
        eprintln!(
            "{} of {} file(s) skipped as bad",
            run.tally.bad_files(),
            run.paths.len()
        );
    }

    match run.finish(cfg) {
        Ok(summary) => {
            for path in summary.outputs {
                log::debug!("wrote {}", path.display());
            }
        }
        Err(e) => super::fail(&e),
    }
}
