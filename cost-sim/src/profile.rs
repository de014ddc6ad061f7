//! Immutable per-run cost profiles shared read-only by every simulated path.

use std::fmt;
use std::num::NonZeroU32;

use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};

use crate::config::{SimulationConfig, require_non_negative};
use crate::error::ConfigError;
use crate::numbers::u64_to_f64;

/// Public programs in the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    Childcare,
    Transit,
    Grocery,
}

impl Program {
    pub const ALL: [Self; 3] = [Self::Childcare, Self::Transit, Self::Grocery];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Childcare => "childcare",
            Self::Transit => "transit",
            Self::Grocery => "grocery",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiplicative lognormal shock with mean-of-log zero.
///
/// Every draw is strictly positive; a volatility of zero always yields 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Shock {
    volatility: f64,
    dist: LogNormal<f64>,
}

impl Shock {
    /// # Errors
    ///
    /// Returns `ConfigError` when `volatility` is negative or non-finite.
    pub fn new(field: &'static str, volatility: f64) -> Result<Self, ConfigError> {
        require_non_negative(field, volatility)?;
        let dist = LogNormal::new(0.0, volatility).map_err(|_| ConfigError::MinViolation {
            field,
            min: 0.0,
            value: volatility,
        })?;
        Ok(Self { volatility, dist })
    }

    #[must_use]
    pub const fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }
}

/// Cost profile of one program.
///
/// `base_cost` is the year-1 level that compounds by `growth_rate`; `multiplier`
/// folds in the program's fixed participation, subsidy share and unit count.
#[derive(Debug, Clone, Copy)]
pub struct ProgramCostProfile {
    pub program: Program,
    pub base_cost: f64,
    pub growth_rate: f64,
    pub multiplier: f64,
    pub shock: Shock,
}

impl ProgramCostProfile {
    /// # Errors
    ///
    /// Returns `ConfigError` for negative or non-finite inputs.
    pub fn new(
        program: Program,
        base_cost: f64,
        growth_rate: f64,
        multiplier: f64,
        volatility: f64,
    ) -> Result<Self, ConfigError> {
        require_non_negative("profile.base_cost", base_cost)?;
        require_non_negative("profile.growth_rate", growth_rate)?;
        require_non_negative("profile.multiplier", multiplier)?;
        Ok(Self {
            program,
            base_cost,
            growth_rate,
            multiplier,
            shock: Shock::new("profile.volatility", volatility)?,
        })
    }

    /// A program that contributes nothing but still consumes its yearly draw.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `volatility` is invalid.
    pub fn inactive(program: Program, volatility: f64) -> Result<Self, ConfigError> {
        Self::new(program, 0.0, 0.0, 0.0, volatility)
    }
}

/// Lump-sum capital expenditure added to transit every `interval` years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapexSchedule {
    pub interval: NonZeroU32,
    pub amount: f64,
}

impl CapexSchedule {
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroCapexInterval` when `every_n_years` is zero.
    pub fn new(every_n_years: u32, amount: f64) -> Result<Self, ConfigError> {
        let interval = NonZeroU32::new(every_n_years).ok_or(ConfigError::ZeroCapexInterval)?;
        require_non_negative("transit.capex.amount", amount)?;
        Ok(Self { interval, amount })
    }

    #[must_use]
    pub const fn applies_in(&self, year: u32) -> bool {
        year % self.interval.get() == 0
    }
}

/// The full program bundle for one run.
#[derive(Debug, Clone, Copy)]
pub struct ProgramProfiles {
    pub childcare: ProgramCostProfile,
    pub transit: ProgramCostProfile,
    pub grocery: ProgramCostProfile,
    pub capex: Option<CapexSchedule>,
}

impl ProgramProfiles {
    /// Build the profiles from a configuration, validating it first.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` raised by validation.
    pub fn from_config(cfg: &SimulationConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let childcare = ProgramCostProfile::new(
            Program::Childcare,
            cfg.childcare.cost_per_child_year1,
            cfg.childcare.annual_growth,
            u64_to_f64(cfg.childcare.children_count) * cfg.childcare.participation,
            cfg.childcare_volatility(),
        )?;
        let transit = ProgramCostProfile::new(
            Program::Transit,
            cfg.transit.base_cost_year1(),
            cfg.transit.annual_growth,
            1.0,
            cfg.transit_volatility(),
        )?;
        let grocery = ProgramCostProfile::new(
            Program::Grocery,
            cfg.grocery.cost_per_store_year1,
            cfg.grocery.annual_growth,
            f64::from(cfg.grocery.stores) * cfg.grocery.subsidy_rate,
            cfg.grocery_volatility(),
        )?;
        let capex = CapexSchedule::new(cfg.transit.capex.every_n_years, cfg.transit.capex.amount)?;

        log::debug!(
            "built program profiles: childcare x{:.1}, transit base {:.0}, grocery x{:.1}, capex every {} years",
            childcare.multiplier,
            transit.base_cost,
            grocery.multiplier,
            capex.interval
        );

        Ok(Self {
            childcare,
            transit,
            grocery,
            capex: Some(capex),
        })
    }

    #[must_use]
    pub const fn get(&self, program: Program) -> &ProgramCostProfile {
        match program {
            Program::Childcare => &self.childcare,
            Program::Transit => &self.transit,
            Program::Grocery => &self.grocery,
        }
    }
}
