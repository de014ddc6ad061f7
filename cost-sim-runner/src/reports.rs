use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use cost_sim::{Histogram, ReportSink, SimulationReport, SummaryStatistics, histogram};

pub const SAMPLE_FILE: &str = "simulation_output.csv";
pub const SUMMARY_FILE: &str = "summary_stats.csv";
pub const DISTRIBUTION_FILE: &str = "cost_distribution.csv";
pub const DISTRIBUTION_BINS: usize = 50;

/// Writes the raw sample, the summary and the distribution as CSV files.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    dir: PathBuf,
}

impl CsvReportSink {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create(&self, name: &str) -> io::Result<BufWriter<File>> {
        Ok(BufWriter::new(File::create(self.dir.join(name))?))
    }
}

impl ReportSink for CsvReportSink {
    type Error = io::Error;

    fn persist(&self, report: &SimulationReport) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;

        let mut sample_out = self.create(SAMPLE_FILE)?;
        write_sample_csv(&mut sample_out, &report.sample)?;
        sample_out.flush()?;

        let mut summary_out = self.create(SUMMARY_FILE)?;
        write_summary_csv(&mut summary_out, &report.summary)?;
        summary_out.flush()?;

        let distribution = histogram(&report.sample, DISTRIBUTION_BINS).map_err(io::Error::other)?;
        let mut distribution_out = self.create(DISTRIBUTION_FILE)?;
        write_histogram_csv(&mut distribution_out, &distribution)?;
        distribution_out.flush()?;

        log::info!("wrote reports to {}", self.dir.display());
        Ok(())
    }
}

pub fn write_sample_csv<W: Write + ?Sized>(writer: &mut W, sample: &[f64]) -> io::Result<()> {
    writeln!(writer, "total_cost")?;
    for total in sample {
        writeln!(writer, "{total}")?;
    }
    Ok(())
}

pub fn write_summary_csv<W: Write + ?Sized>(
    writer: &mut W,
    summary: &SummaryStatistics,
) -> io::Result<()> {
    writeln!(writer, "metric,value")?;
    for (name, value) in summary.metrics() {
        writeln!(writer, "{name},{value}")?;
    }
    Ok(())
}

pub fn write_histogram_csv<W: Write + ?Sized>(
    writer: &mut W,
    distribution: &Histogram,
) -> io::Result<()> {
    writeln!(writer, "lower,upper,count")?;
    for bin in &distribution.bins {
        writeln!(writer, "{},{},{}", bin.lower, bin.upper, bin.count)?;
    }
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &SimulationReport,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Cost Range Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=====================".cyan())?;
    writeln!(
        writer,
        "Paths: {}  Horizon: {} years  Seed: {}",
        report.sample.len(),
        report.horizon_years,
        report.seed
    )?;
    writeln!(writer)?;
    for (name, value) in report.summary.metrics() {
        writeln!(writer, "{name:15}: {}", format_dollars(value).green())?;
    }
    writeln!(writer)?;
    writeln!(writer, "🏁 Total time: {elapsed:?}")?;
    Ok(())
}

/// Format an amount as `$1,234,567.89`.
#[must_use]
pub fn format_dollars(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
