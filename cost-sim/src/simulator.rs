//! Single-path cost model.
//!
//! A path walks the horizon one year at a time. Each year draws one shock per
//! program (childcare, transit, grocery, in that order), prices every program
//! at its current compounded level, adds the transit capex lump sum in
//! qualifying years with its own shock, and only then compounds the levels for
//! the following year.

use rand::Rng;
use serde::Serialize;

use crate::profile::{ProgramCostProfile, ProgramProfiles};

/// Per-year cost breakdown of one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearCost {
    pub year: u32,
    pub childcare: f64,
    pub transit_operating: f64,
    pub transit_capex: f64,
    pub grocery: f64,
}

impl YearCost {
    #[must_use]
    pub fn transit(&self) -> f64 {
        self.transit_operating + self.transit_capex
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.childcare + self.transit() + self.grocery
    }
}

/// Full per-year record of one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathTrace {
    pub years: Vec<YearCost>,
    pub total: f64,
}

/// Compounded cost levels carried from one year to the next.
#[derive(Debug, Clone, Copy)]
struct PathState {
    childcare: f64,
    transit: f64,
    grocery: f64,
}

impl PathState {
    const fn start(profiles: &ProgramProfiles) -> Self {
        Self {
            childcare: profiles.childcare.base_cost,
            transit: profiles.transit.base_cost,
            grocery: profiles.grocery.base_cost,
        }
    }

    fn compound(&mut self, profiles: &ProgramProfiles) {
        self.childcare *= 1.0 + profiles.childcare.growth_rate;
        self.transit *= 1.0 + profiles.transit.growth_rate;
        self.grocery *= 1.0 + profiles.grocery.growth_rate;
    }
}

fn priced(profile: &ProgramCostProfile, level: f64, shock: f64) -> f64 {
    level * profile.multiplier * shock
}

/// Simulate one path and return its total cost over `horizon_years`.
///
/// A zero horizon returns `0.0` without drawing from `rng`.
pub fn simulate_one_path<R: Rng + ?Sized>(
    horizon_years: u32,
    profiles: &ProgramProfiles,
    rng: &mut R,
) -> f64 {
    simulate_path_with(horizon_years, profiles, rng, |_| {})
}

/// Simulate one path, handing each year's breakdown to `on_year`.
pub fn simulate_path_with<R, F>(
    horizon_years: u32,
    profiles: &ProgramProfiles,
    rng: &mut R,
    mut on_year: F,
) -> f64
where
    R: Rng + ?Sized,
    F: FnMut(&YearCost),
{
    let mut state = PathState::start(profiles);
    let mut total = 0.0;

    for year in 1..=horizon_years {
        let childcare_shock = profiles.childcare.shock.draw(rng);
        let transit_shock = profiles.transit.shock.draw(rng);
        let grocery_shock = profiles.grocery.shock.draw(rng);

        // The capex shock is a separate draw, never the operating one.
        let transit_capex = match profiles.capex {
            Some(capex) if capex.applies_in(year) => {
                capex.amount * profiles.transit.shock.draw(rng)
            }
            _ => 0.0,
        };

        let cost = YearCost {
            year,
            childcare: priced(&profiles.childcare, state.childcare, childcare_shock),
            transit_operating: priced(&profiles.transit, state.transit, transit_shock),
            transit_capex,
            grocery: priced(&profiles.grocery, state.grocery, grocery_shock),
        };
        total += cost.total();
        on_year(&cost);

        state.compound(profiles);
    }

    log::trace!("path total {total:.2} over {horizon_years} years");
    total
}

/// Simulate one path and keep every year's breakdown.
pub fn trace_path<R: Rng + ?Sized>(
    horizon_years: u32,
    profiles: &ProgramProfiles,
    rng: &mut R,
) -> PathTrace {
    let mut years = Vec::with_capacity(usize::try_from(horizon_years).unwrap_or(0));
    let total = simulate_path_with(horizon_years, profiles, rng, |cost| years.push(*cost));
    PathTrace { years, total }
}
