use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Equipment classes that are replaced on a fixed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    SmartMeter,
    Battery,
    Inverter,
    Panels,
}

impl Equipment {
    /// Human-readable name used in the ledger's replacement column.
    pub fn label(self) -> &'static str {
        match self {
            Equipment::SmartMeter => "Smart meter",
            Equipment::Battery => "Battery",
            Equipment::Inverter => "Inverter",
            Equipment::Panels => "Solar panels",
        }
    }
}

/// What the unit cost of a replacement is multiplied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// One unit, independent of system size.
    Flat,
    PerBatteryKwh,
    PerSolarKw,
}

impl CostBasis {
    pub fn quantity(self, solar_capacity: f64, battery_capacity: f64) -> f64 {
        match self {
            CostBasis::Flat => 1.0,
            CostBasis::PerBatteryKwh => battery_capacity,
            CostBasis::PerSolarKw => solar_capacity,
        }
    }
}

/// A piece of equipment replaced every `interval_years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub equipment: Equipment,
    pub interval_years: u32,
    pub unit_cost: f64, // currency per basis unit, at year-0 prices
    pub basis: CostBasis,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssumptionError {
    #[error("the simulation horizon must be at least one year")]
    ZeroHorizon,
    #[error("replacement interval of {0:?} must be at least one year")]
    ZeroInterval(Equipment),
    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },
}

/// Deployment-wide constants of the cost, energy and pricing models.
///
/// Every field can be overridden from TOML; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    // Investment costs
    pub solar_cost_per_kw: f64,    // currency per kW
    pub battery_cost_per_kwh: f64, // currency per kWh
    pub installation_cost: f64,    // fixed cost per installation
    pub subsidy_unit: f64,         // currency per subsidy block

    // Generation
    pub generation_per_kw: f64, // kWh per kW and year
    pub degradation_rate: f64,  // panel output loss per year

    // Battery
    pub battery_efficiency: f64,      // round trip
    pub battery_cycles_per_year: f64, // one cycle per day
    pub dr_revenue_per_kwh: f64,      // demand response incentive per kWh of battery

    // Running costs, as a share of the gross initial cost
    pub maintenance_rate: f64,
    pub insurance_rate: f64,

    // Feed-in tariff
    pub fit_period_years: u32,
    pub post_fit_rate_ratio: f64, // share of the tariff paid after the FIT period

    // Replacements
    pub replacement_price_decline: f64, // yearly equipment price decline
    pub replacement_schedule: Vec<ReplacementRule>,

    pub horizon_years: u32,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            solar_cost_per_kw: 260_000.0,
            battery_cost_per_kwh: 200_000.0,
            installation_cost: 880_000.0,
            subsidy_unit: 10_000.0,

            generation_per_kw: 1000.0,
            degradation_rate: 0.005,

            battery_efficiency: 0.9,
            battery_cycles_per_year: 365.0,
            dr_revenue_per_kwh: 250.0,

            maintenance_rate: 0.01,
            insurance_rate: 0.005,

            fit_period_years: 10,
            post_fit_rate_ratio: 0.5,

            replacement_price_decline: 0.02,
            replacement_schedule: vec![
                ReplacementRule {
                    equipment: Equipment::SmartMeter,
                    interval_years: 10,
                    unit_cost: 80_000.0,
                    basis: CostBasis::Flat,
                },
                ReplacementRule {
                    equipment: Equipment::Battery,
                    interval_years: 12,
                    unit_cost: 160_000.0,
                    basis: CostBasis::PerBatteryKwh,
                },
                ReplacementRule {
                    equipment: Equipment::Inverter,
                    interval_years: 15,
                    unit_cost: 40_000.0,
                    basis: CostBasis::PerSolarKw,
                },
                ReplacementRule {
                    equipment: Equipment::Panels,
                    interval_years: 25,
                    unit_cost: 195_000.0,
                    basis: CostBasis::PerSolarKw,
                },
            ],

            horizon_years: 50,
        }
    }
}

impl Assumptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let assumptions: Assumptions =
            toml::from_str(content).context("Failed to parse assumptions")?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read assumptions file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid assumptions file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), AssumptionError> {
        if self.horizon_years == 0 {
            return Err(AssumptionError::ZeroHorizon);
        }

        let constants = [
            ("solar_cost_per_kw", self.solar_cost_per_kw),
            ("battery_cost_per_kwh", self.battery_cost_per_kwh),
            ("installation_cost", self.installation_cost),
            ("subsidy_unit", self.subsidy_unit),
            ("generation_per_kw", self.generation_per_kw),
            ("degradation_rate", self.degradation_rate),
            ("battery_efficiency", self.battery_efficiency),
            ("battery_cycles_per_year", self.battery_cycles_per_year),
            ("dr_revenue_per_kwh", self.dr_revenue_per_kwh),
            ("maintenance_rate", self.maintenance_rate),
            ("insurance_rate", self.insurance_rate),
            ("post_fit_rate_ratio", self.post_fit_rate_ratio),
            ("replacement_price_decline", self.replacement_price_decline),
        ];
        if let Some(&(name, value)) = constants
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(AssumptionError::InvalidConstant { name, value });
        }

        for rule in &self.replacement_schedule {
            if rule.interval_years == 0 {
                return Err(AssumptionError::ZeroInterval(rule.equipment));
            }
            if !rule.unit_cost.is_finite() || rule.unit_cost < 0.0 {
                return Err(AssumptionError::InvalidConstant {
                    name: "unit_cost",
                    value: rule.unit_cost,
                });
            }
        }

        Ok(())
    }
}
