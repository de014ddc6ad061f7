//! Cost-range engine for a bundle of public programs.
//!
//! Estimates the distribution of the multi-year fiscal cost of a childcare
//! subsidy, free transit and subsidized city grocery stores by simulating many
//! independent cost paths under compounding growth and lognormal shocks, then
//! reducing the sample of path totals to summary statistics. This crate only
//! computes; loading assumptions and persisting results sit behind the
//! [`ConfigLoader`] and [`ReportSink`] traits.

pub mod config;
pub mod error;
pub mod monte_carlo;
pub mod numbers;
pub mod profile;
pub mod rng;
pub mod simulator;
pub mod stats;

// Re-export commonly used types
pub use config::{
    CapexConfig, ChildcareConfig, GroceryConfig, ProgressConfig, ShockConfig, SimulationConfig,
    TransitConfig,
};
pub use error::{ConfigError, SimulationError};
pub use monte_carlo::{
    LogProgress, NoProgress, ProgressObserver, run_monte_carlo, run_monte_carlo_observed,
    run_monte_carlo_parallel,
};
pub use profile::{CapexSchedule, Program, ProgramCostProfile, ProgramProfiles, Shock};
pub use rng::{CountingRng, SimRng, derive_stream_seed, master_rng, path_rng};
pub use simulator::{PathTrace, YearCost, simulate_one_path, simulate_path_with, trace_path};
pub use stats::{
    Histogram, HistogramBin, SummaryStatistics, histogram, percentile_linear, summarize,
};

use serde::Serialize;

/// Trait for abstracting where simulation assumptions come from
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the assumption set for one run
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_config(&self) -> Result<SimulationConfig, Self::Error>;
}

/// Trait for abstracting where finished results are written
pub trait ReportSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a finished report
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    fn persist(&self, report: &SimulationReport) -> Result<(), Self::Error>;
}

/// Finished output of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub horizon_years: u32,
    pub population: u64,
    pub sample: Vec<f64>,
    pub summary: SummaryStatistics,
}

/// A validated configuration together with the profiles built from it.
#[derive(Debug, Clone)]
pub struct Scenario {
    config: SimulationConfig,
    profiles: ProgramProfiles,
}

impl Scenario {
    /// Validate `config` and build the program profiles.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in `config`.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let profiles = ProgramProfiles::from_config(&config)?;
        Ok(Self { config, profiles })
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub const fn profiles(&self) -> &ProgramProfiles {
        &self.profiles
    }

    /// Draw the sample of path totals for this scenario.
    ///
    /// The parallel driver reports progress once, when every path is done.
    pub fn sample<O>(&self, observer: &mut O) -> Vec<f64>
    where
        O: ProgressObserver + ?Sized,
    {
        let cfg = &self.config;
        if cfg.parallel {
            let sample =
                run_monte_carlo_parallel(cfg.runs, cfg.horizon_years, &self.profiles, cfg.seed);
            observer.on_progress(sample.len(), cfg.runs);
            sample
        } else {
            let mut rng = master_rng(cfg.seed);
            run_monte_carlo_observed(
                cfg.runs,
                cfg.horizon_years,
                &self.profiles,
                &mut rng,
                observer,
            )
        }
    }

    /// Draw the sample and summarize it.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::EmptySample` when the scenario has zero runs.
    pub fn run<O>(&self, observer: &mut O) -> Result<SimulationReport, SimulationError>
    where
        O: ProgressObserver + ?Sized,
    {
        let cfg = &self.config;
        log::debug!(
            "scenario start: {} runs, {} years, seed {}, parallel {}",
            cfg.runs,
            cfg.horizon_years,
            cfg.seed,
            cfg.parallel
        );
        let sample = self.sample(observer);
        let summary = summarize(&sample, cfg.population)?;
        log::debug!("scenario done: mean total {:.2}", summary.mean);
        Ok(SimulationReport {
            seed: cfg.seed,
            horizon_years: cfg.horizon_years,
            population: cfg.population,
            sample,
            summary,
        })
    }
}

/// Ties a configuration source and a report sink around one scenario run.
pub struct CostEngine<L, S>
where
    L: ConfigLoader,
    S: ReportSink,
{
    loader: L,
    sink: S,
}

impl<L, S> CostEngine<L, S>
where
    L: ConfigLoader,
    S: ReportSink,
{
    pub const fn new(loader: L, sink: S) -> Self {
        Self { loader, sink }
    }

    /// Load the configuration, build the scenario, run it and persist the report.
    ///
    /// Progress is logged every `progress.every` completed paths.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, validation, summarizing or persisting fails.
    pub fn run(&self) -> anyhow::Result<SimulationReport> {
        let config = self.loader.load_config()?;
        let mut progress = LogProgress::new(config.progress.every);
        let scenario = Scenario::new(config)?;
        let report = scenario.run(&mut progress)?;
        self.sink.persist(&report)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FixtureLoader(SimulationConfig);

    impl ConfigLoader for FixtureLoader {
        type Error = Infallible;

        fn load_config(&self) -> Result<SimulationConfig, Self::Error> {
            Ok(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MemorySink {
        reports: Rc<RefCell<Vec<SimulationReport>>>,
    }

    impl ReportSink for MemorySink {
        type Error = Infallible;

        fn persist(&self, report: &SimulationReport) -> Result<(), Self::Error> {
            self.reports.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            runs: 200,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn engine_runs_and_persists_report() {
        let sink = MemorySink::default();
        let engine = CostEngine::new(FixtureLoader(small_config()), sink.clone());
        let report = engine.run().unwrap();

        assert_eq!(report.sample.len(), 200);
        assert_eq!(report.seed, 42);
        let stored = sink.reports.borrow();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], report);
    }

    #[test]
    fn engine_surfaces_invalid_config() {
        let mut cfg = small_config();
        cfg.transit.capex.every_n_years = 0;
        let sink = MemorySink::default();
        let engine = CostEngine::new(FixtureLoader(cfg), sink.clone());
        let err = engine.run().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroCapexInterval)
        );
        assert!(sink.reports.borrow().is_empty());
    }

    #[test]
    fn scenario_with_zero_runs_cannot_be_summarized() {
        let scenario = Scenario::new(SimulationConfig {
            runs: 0,
            ..SimulationConfig::default()
        })
        .unwrap();
        assert!(scenario.sample(&mut NoProgress).is_empty());
        assert_eq!(
            scenario.run(&mut NoProgress).unwrap_err(),
            SimulationError::EmptySample
        );
    }

    #[test]
    fn parallel_scenario_reports_completion_once() {
        let scenario = Scenario::new(SimulationConfig {
            parallel: true,
            ..small_config()
        })
        .unwrap();
        let mut calls = Vec::new();
        let mut record = |done: usize, total: usize| calls.push((done, total));
        let report = scenario.run(&mut record).unwrap();
        assert_eq!(calls, vec![(200, 200)]);
        assert_eq!(report.sample.len(), 200);
    }

    #[test]
    fn scenario_runs_are_reproducible() {
        let scenario = Scenario::new(small_config()).unwrap();
        let first = scenario.run(&mut NoProgress).unwrap();
        let second = scenario.run(&mut NoProgress).unwrap();
        assert_eq!(first, second);
    }
}
