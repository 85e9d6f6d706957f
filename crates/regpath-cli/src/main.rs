//! CLI for regpath: regulator significance and solution confidence.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "regpath")]
#[command(about = "regpath: regulator significance and solver solution confidence")]
#[command(version = regpath_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call significant regulators for a module by comparing real regression
    /// weights against randomized runs. Writes a tab-separated table to stdout.
    Regulators {
        /// Directory holding the module's regweights files
        results_dir: String,

        /// Module ID, a number like 1549
        module_id: String,

        /// Cutoff on the absolute regression weight (e.g. 0.10 mouse, 0.20 human)
        cutoff: f64,

        /// Number of randomized runs expected in the results directory
        #[arg(long, default_value_t = regpath_core::DEFAULT_TRIALS)]
        trials: usize,

        /// Family-wise alpha, Bonferroni-corrected per lambda
        #[arg(long, default_value_t = regpath_core::DEFAULT_ALPHA)]
        alpha: f64,

        /// Also write the full report as JSON
        #[arg(long)]
        output: Option<String>,

        /// Append a table of how regulator rankings change with lambda
        #[arg(long)]
        rankings: bool,
    },

    /// Aggregate solver dump files into per-symbol confidence tables
    /// ({prefix}_sigma.tab, _x, _y, _d, _sat).
    Confidence {
        /// Glob pattern for dump files, e.g. 'path_sol*dump'
        pattern: String,

        /// Prefix for the five output files
        output_prefix: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Regulators {
            results_dir,
            module_id,
            cutoff,
            trials,
            alpha,
            output,
            rankings,
        } => commands::regulators::run(commands::regulators::RegulatorsCommandConfig {
            results_dir: &results_dir,
            module_id: &module_id,
            scorer: regpath_core::ScorerConfig {
                cutoff,
                trials,
                alpha,
            },
            output_path: output.as_deref(),
            include_rankings: rankings,
        }),
        Commands::Confidence {
            pattern,
            output_prefix,
        } => commands::confidence::run(&regpath_core::AggregatorConfig::new(
            pattern,
            output_prefix,
        )),
    }
}
