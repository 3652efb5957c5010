mod cli;
mod config;
mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use clap::Parser;

use crate::cli::{Args, RunArgs, SubArgs};
use crate::config::{FileConfig, RunSettings};
use crate::error::EngineError;
use crate::pipeline::stage3_regulation::render_table_tsv;

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), EngineError> {
    match args.command {
        SubArgs::Categories => {
            print!("{}", render_table_tsv());
            Ok(())
        }
        SubArgs::Run(run_args) => {
            let settings = resolve_settings(&run_args)?;
            let outcome = pipeline::run(&settings)?;
            tracing::info!(
                rows = outcome.table.records.len(),
                shared_genes = outcome.summary.shared_genes,
                background_genes = outcome.summary.background_genes,
                table = %outcome.files.unified_csv.display(),
                "done"
            );
            Ok(())
        }
    }
}

fn resolve_settings(run_args: &RunArgs) -> Result<RunSettings, EngineError> {
    let base = match &run_args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    base.overlay(run_args.to_overrides()).resolve()
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
