use cost_sim::{
    CapexSchedule, CountingRng, Program, ProgramCostProfile, ProgramProfiles, SimulationConfig,
    master_rng, simulate_one_path, trace_path,
};
use cost_sim::numbers::u64_to_f64;

const REL_TOLERANCE: f64 = 1e-9;

fn single_program(base: f64, growth: f64, multiplier: f64) -> ProgramProfiles {
    ProgramProfiles {
        childcare: ProgramCostProfile::new(Program::Childcare, base, growth, multiplier, 0.0)
            .expect("valid childcare profile"),
        transit: ProgramCostProfile::inactive(Program::Transit, 0.0).expect("valid transit"),
        grocery: ProgramCostProfile::inactive(Program::Grocery, 0.0).expect("valid grocery"),
        capex: None,
    }
}

fn closed_form_total(cfg: &SimulationConfig) -> f64 {
    let childcare_units = u64_to_f64(cfg.childcare.children_count) * cfg.childcare.participation;
    let grocery_units = f64::from(cfg.grocery.stores) * cfg.grocery.subsidy_rate;
    let mut total = 0.0;
    for year in 1..=cfg.horizon_years {
        let exponent = i32::try_from(year - 1).expect("horizon fits i32");
        total += cfg.childcare.cost_per_child_year1
            * (1.0 + cfg.childcare.annual_growth).powi(exponent)
            * childcare_units;
        total += cfg.transit.base_cost_year1() * (1.0 + cfg.transit.annual_growth).powi(exponent);
        total += cfg.grocery.cost_per_store_year1
            * (1.0 + cfg.grocery.annual_growth).powi(exponent)
            * grocery_units;
        if year % cfg.transit.capex.every_n_years == 0 {
            total += cfg.transit.capex.amount;
        }
    }
    total
}

#[test]
fn one_year_single_program_returns_its_base_cost() {
    let profiles = single_program(1_000.0, 0.0, 1.0);
    let total = simulate_one_path(1, &profiles, &mut master_rng(1));
    assert_eq!(total.to_bits(), 1_000.0_f64.to_bits());
}

#[test]
fn two_year_growth_compounds_once() {
    let profiles = single_program(100.0, 0.10, 1.0);
    let total = simulate_one_path(2, &profiles, &mut master_rng(1));
    assert!((total - 210.0).abs() < 1e-9, "got {total}");
}

#[test]
fn zero_volatility_matches_closed_form_for_reference_assumptions() {
    let mut cfg = SimulationConfig::default();
    cfg.shock.sigma = 0.0;
    let profiles = ProgramProfiles::from_config(&cfg).expect("valid defaults");
    let expected = closed_form_total(&cfg);

    for seed in [1, 2, 3] {
        let total = simulate_one_path(cfg.horizon_years, &profiles, &mut master_rng(seed));
        assert!(
            ((total - expected) / expected).abs() < REL_TOLERANCE,
            "seed {seed}: {total} vs {expected}"
        );
    }
}

#[test]
fn zero_volatility_handles_longer_horizons() {
    let mut cfg = SimulationConfig::default();
    cfg.shock.sigma = 0.0;
    cfg.horizon_years = 23;
    cfg.transit.capex.every_n_years = 4;
    let profiles = ProgramProfiles::from_config(&cfg).expect("valid config");
    let total = simulate_one_path(cfg.horizon_years, &profiles, &mut master_rng(9));
    let expected = closed_form_total(&cfg);
    assert!(((total - expected) / expected).abs() < REL_TOLERANCE);
}

#[test]
fn zero_horizon_is_exactly_zero_without_draws() {
    let profiles = ProgramProfiles::from_config(&SimulationConfig::default()).expect("defaults");
    let mut rng = CountingRng::new(master_rng(77));
    assert_eq!(simulate_one_path(0, &profiles, &mut rng).to_bits(), 0.0_f64.to_bits());
    assert_eq!(rng.draws(), 0);
    assert!(trace_path(0, &profiles, &mut rng).years.is_empty());
}

#[test]
fn capex_shock_is_independent_of_operating_shock() {
    let mut cfg = SimulationConfig::default();
    cfg.transit.volatility = Some(0.5);
    cfg.transit.capex.every_n_years = 1;
    let profiles = ProgramProfiles::from_config(&cfg).expect("valid config");
    let trace = trace_path(20, &profiles, &mut master_rng(13));

    let base = profiles.transit.base_cost;
    let capex = profiles.capex.expect("capex configured").amount;
    let mut level = base;
    let mut differing = 0;
    for year in &trace.years {
        let operating_shock = year.transit_operating / level;
        let capex_shock = year.transit_capex / capex;
        if (operating_shock - capex_shock).abs() > 1e-9 {
            differing += 1;
        }
        level *= 1.0 + profiles.transit.growth_rate;
    }
    assert_eq!(differing, trace.years.len());
}

#[test]
fn capex_interval_longer_than_horizon_never_fires() {
    let mut profiles = single_program(0.0, 0.0, 0.0);
    profiles.capex = Some(CapexSchedule::new(50, 1_000.0).expect("valid schedule"));
    let trace = trace_path(10, &profiles, &mut master_rng(2));
    assert!(trace.years.iter().all(|year| year.transit_capex == 0.0));
    assert_eq!(trace.total.to_bits(), 0.0_f64.to_bits());
}
