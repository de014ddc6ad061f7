//! Simulation assumptions: run sizing, program cost drivers and shock volatility.
//!
//! Every field carries a serde default reproducing the reference scenario, so an
//! empty JSON object deserializes into the full default assumption set.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Full assumption set for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_horizon_years")]
    pub horizon_years: u32,
    #[serde(default = "SimulationConfig::default_runs")]
    pub runs: usize,
    #[serde(default = "SimulationConfig::default_population")]
    pub population: u64,
    #[serde(default = "SimulationConfig::default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub childcare: ChildcareConfig,
    #[serde(default)]
    pub transit: TransitConfig,
    #[serde(default)]
    pub grocery: GroceryConfig,
    #[serde(default)]
    pub shock: ShockConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl SimulationConfig {
    #[must_use]
    pub const fn default_horizon_years() -> u32 {
        10
    }

    #[must_use]
    pub const fn default_runs() -> usize {
        20_000
    }

    /// Approximate New York City population.
    #[must_use]
    pub const fn default_population() -> u64 {
        8_500_000
    }

    #[must_use]
    pub const fn default_seed() -> u64 {
        42
    }

    /// Parse a JSON document and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation error
    /// raised by [`SimulationConfig::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants before any path is simulated.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        self.shock.validate()?;
        self.childcare.validate()?;
        self.transit.validate()?;
        self.grocery.validate()?;
        self.progress.validate()?;
        Ok(())
    }

    /// Volatility applied to childcare shocks.
    #[must_use]
    pub fn childcare_volatility(&self) -> f64 {
        self.childcare.volatility.unwrap_or(self.shock.sigma)
    }

    /// Volatility applied to transit operating and capex shocks.
    #[must_use]
    pub fn transit_volatility(&self) -> f64 {
        self.transit.volatility.unwrap_or(self.shock.sigma)
    }

    /// Volatility applied to grocery shocks.
    #[must_use]
    pub fn grocery_volatility(&self) -> f64 {
        self.grocery.volatility.unwrap_or(self.shock.sigma)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_years: Self::default_horizon_years(),
            runs: Self::default_runs(),
            population: Self::default_population(),
            seed: Self::default_seed(),
            parallel: false,
            childcare: ChildcareConfig::default(),
            transit: TransitConfig::default(),
            grocery: GroceryConfig::default(),
            shock: ShockConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

/// Childcare subsidy cost drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildcareConfig {
    #[serde(default = "ChildcareConfig::default_children_count")]
    pub children_count: u64,
    #[serde(default = "ChildcareConfig::default_participation")]
    pub participation: f64,
    #[serde(default = "ChildcareConfig::default_cost_per_child_year1")]
    pub cost_per_child_year1: f64,
    #[serde(default = "ChildcareConfig::default_annual_growth")]
    pub annual_growth: f64,
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl ChildcareConfig {
    const fn default_children_count() -> u64 {
        900_000
    }

    const fn default_participation() -> f64 {
        0.55
    }

    const fn default_cost_per_child_year1() -> f64 {
        6_000.0
    }

    const fn default_annual_growth() -> f64 {
        0.02
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_fraction("childcare.participation", self.participation)?;
        require_non_negative("childcare.cost_per_child_year1", self.cost_per_child_year1)?;
        require_non_negative("childcare.annual_growth", self.annual_growth)?;
        if let Some(volatility) = self.volatility {
            require_non_negative("childcare.volatility", volatility)?;
        }
        Ok(())
    }
}

impl Default for ChildcareConfig {
    fn default() -> Self {
        Self {
            children_count: Self::default_children_count(),
            participation: Self::default_participation(),
            cost_per_child_year1: Self::default_cost_per_child_year1(),
            annual_growth: Self::default_annual_growth(),
            volatility: None,
        }
    }
}

/// Free transit cost drivers: operating budget plus forgone fare revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitConfig {
    #[serde(default = "TransitConfig::default_operating_cost_year1")]
    pub operating_cost_year1: f64,
    #[serde(default = "TransitConfig::default_lost_fares_year1")]
    pub lost_fares_year1: f64,
    #[serde(default = "TransitConfig::default_annual_growth")]
    pub annual_growth: f64,
    #[serde(default)]
    pub capex: CapexConfig,
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl TransitConfig {
    const fn default_operating_cost_year1() -> f64 {
        4_000_000_000.0
    }

    const fn default_lost_fares_year1() -> f64 {
        900_000_000.0
    }

    const fn default_annual_growth() -> f64 {
        0.02
    }

    /// Year-1 cost level: operations plus the fares no longer collected.
    #[must_use]
    pub fn base_cost_year1(&self) -> f64 {
        self.operating_cost_year1 + self.lost_fares_year1
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("transit.operating_cost_year1", self.operating_cost_year1)?;
        require_non_negative("transit.lost_fares_year1", self.lost_fares_year1)?;
        require_non_negative("transit.annual_growth", self.annual_growth)?;
        if let Some(volatility) = self.volatility {
            require_non_negative("transit.volatility", volatility)?;
        }
        self.capex.validate()
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            operating_cost_year1: Self::default_operating_cost_year1(),
            lost_fares_year1: Self::default_lost_fares_year1(),
            annual_growth: Self::default_annual_growth(),
            capex: CapexConfig::default(),
            volatility: None,
        }
    }
}

/// Periodic fleet renewal lump sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexConfig {
    #[serde(default = "CapexConfig::default_every_n_years")]
    pub every_n_years: u32,
    #[serde(default = "CapexConfig::default_amount")]
    pub amount: f64,
}

impl CapexConfig {
    const fn default_every_n_years() -> u32 {
        5
    }

    const fn default_amount() -> f64 {
        2_000_000_000.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.every_n_years == 0 {
            return Err(ConfigError::ZeroCapexInterval);
        }
        require_non_negative("transit.capex.amount", self.amount)
    }
}

impl Default for CapexConfig {
    fn default() -> Self {
        Self {
            every_n_years: Self::default_every_n_years(),
            amount: Self::default_amount(),
        }
    }
}

/// City-run grocery store cost drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryConfig {
    #[serde(default = "GroceryConfig::default_stores")]
    pub stores: u32,
    #[serde(default = "GroceryConfig::default_cost_per_store_year1")]
    pub cost_per_store_year1: f64,
    /// Share of store cost covered by the city.
    #[serde(default = "GroceryConfig::default_subsidy_rate")]
    pub subsidy_rate: f64,
    #[serde(default = "GroceryConfig::default_annual_growth")]
    pub annual_growth: f64,
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl GroceryConfig {
    const fn default_stores() -> u32 {
        120
    }

    const fn default_cost_per_store_year1() -> f64 {
        3_500_000.0
    }

    const fn default_subsidy_rate() -> f64 {
        0.20
    }

    const fn default_annual_growth() -> f64 {
        0.03
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("grocery.cost_per_store_year1", self.cost_per_store_year1)?;
        require_fraction("grocery.subsidy_rate", self.subsidy_rate)?;
        require_non_negative("grocery.annual_growth", self.annual_growth)?;
        if let Some(volatility) = self.volatility {
            require_non_negative("grocery.volatility", volatility)?;
        }
        Ok(())
    }
}

impl Default for GroceryConfig {
    fn default() -> Self {
        Self {
            stores: Self::default_stores(),
            cost_per_store_year1: Self::default_cost_per_store_year1(),
            subsidy_rate: Self::default_subsidy_rate(),
            annual_growth: Self::default_annual_growth(),
            volatility: None,
        }
    }
}

/// Lognormal shock shape shared by every program without an override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockConfig {
    #[serde(default = "ShockConfig::default_sigma")]
    pub sigma: f64,
}

impl ShockConfig {
    const fn default_sigma() -> f64 {
        0.18
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("shock.sigma", self.sigma)
    }
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self {
            sigma: Self::default_sigma(),
        }
    }
}

/// How often the bundled progress observer reports completed paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "ProgressConfig::default_every")]
    pub every: usize,
}

impl ProgressConfig {
    const fn default_every() -> usize {
        2_000
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.every == 0 {
            return Err(ConfigError::MinViolation {
                field: "progress.every",
                min: 1.0,
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            every: Self::default_every(),
        }
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::MinViolation {
            field,
            min: 0.0,
            value,
        });
    }
    Ok(())
}

pub(crate) fn require_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}
