mod reports;
mod sources;

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufWriter, Write, stdout};
use std::time::Instant;

use cost_sim::CostEngine;
use reports::{
    CsvReportSink, DISTRIBUTION_FILE, SAMPLE_FILE, SUMMARY_FILE, generate_console_report,
};
use sources::{FileConfigLoader, results_dir_from_env};

fn main() -> Result<()> {
    env_logger::init();
    announce_banner();

    let loader = FileConfigLoader::from_env();
    if let Some(path) = loader.path() {
        println!("Assumptions: {}", path.display());
    } else {
        println!("Assumptions: reference defaults");
    }
    let sink = CsvReportSink::new(results_dir_from_env());
    let results_dir = sink.dir().to_path_buf();

    println!("Running Monte Carlo simulation...");
    let start_time = Instant::now();
    let report = CostEngine::new(loader, sink)
        .run()
        .with_context(|| {
            format!(
                "simulation run failed (results dir {})",
                results_dir.display()
            )
        })?;

    let mut out = BufWriter::new(stdout());
    generate_console_report(&mut out, &report, start_time.elapsed())
        .context("failed to print console report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Check '{}' for: {SAMPLE_FILE}, {SUMMARY_FILE}, {DISTRIBUTION_FILE}",
        results_dir.display()
    )?;
    out.flush()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "💸 Program Cost Range Simulator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}
