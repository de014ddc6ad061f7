//! Monte Carlo drivers: repeat the path model and collect the sample of totals.

use rand::Rng;
use rayon::prelude::*;

use crate::profile::ProgramProfiles;
use crate::rng::path_rng;
use crate::simulator::simulate_one_path;

/// Receives progress notifications from the sequential driver.
///
/// Observers only watch; they cannot influence the simulated values.
pub trait ProgressObserver {
    fn on_progress(&mut self, completed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, completed: usize, total: usize) {
        self(completed, total);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Observer that logs a line every `every` completed paths and at the end.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    #[must_use]
    pub const fn new(every: usize) -> Self {
        Self { every }
    }

    #[must_use]
    pub const fn should_report(&self, completed: usize, total: usize) -> bool {
        completed == total || (self.every > 0 && completed % self.every == 0)
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, completed: usize, total: usize) {
        if self.should_report(completed, total) {
            log::info!("Completed {completed} / {total} simulations");
        }
    }
}

/// Run `run_count` independent paths from one shared random source.
///
/// The returned sample keeps path order, so a fixed seed reproduces it exactly.
pub fn run_monte_carlo<R: Rng + ?Sized>(
    run_count: usize,
    horizon_years: u32,
    profiles: &ProgramProfiles,
    rng: &mut R,
) -> Vec<f64> {
    run_monte_carlo_observed(run_count, horizon_years, profiles, rng, &mut NoProgress)
}

/// Same as [`run_monte_carlo`], notifying `observer` after every path.
pub fn run_monte_carlo_observed<R, O>(
    run_count: usize,
    horizon_years: u32,
    profiles: &ProgramProfiles,
    rng: &mut R,
    observer: &mut O,
) -> Vec<f64>
where
    R: Rng + ?Sized,
    O: ProgressObserver + ?Sized,
{
    log::debug!("running {run_count} sequential paths over {horizon_years} years");
    let mut sample = Vec::with_capacity(run_count);
    for completed in 1..=run_count {
        sample.push(simulate_one_path(horizon_years, profiles, rng));
        observer.on_progress(completed, run_count);
    }
    sample
}

/// Run `run_count` paths across the rayon pool.
///
/// Path `i` draws from its own stream derived from `master_seed` and `i`, so
/// the sample is identical for any thread count.
#[must_use]
pub fn run_monte_carlo_parallel(
    run_count: usize,
    horizon_years: u32,
    profiles: &ProgramProfiles,
    master_seed: u64,
) -> Vec<f64> {
    log::debug!(
        "running {run_count} parallel paths over {horizon_years} years on {} threads",
        rayon::current_num_threads()
    );
    (0..run_count)
        .into_par_iter()
        .map(|index| {
            let stream = u64::try_from(index).unwrap_or(u64::MAX);
            let mut rng = path_rng(master_seed, stream);
            simulate_one_path(horizon_years, profiles, &mut rng)
        })
        .collect()
}
