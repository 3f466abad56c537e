use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pv_model::InputParameters;

/// Simulates a residential solar and battery investment over its lifetime.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// TOML file with the input parameters (camelCase keys); defaults otherwise.
    #[clap(long)]
    pub params: Option<PathBuf>,

    /// TOML file overriding deployment assumptions.
    #[clap(long)]
    pub assumptions: Option<PathBuf>,

    #[clap(flatten)]
    pub overrides: ParameterOverrides,

    /// Replace the annual consumption with the estimate from capacity and rate.
    #[clap(long)]
    pub estimate_consumption: bool,

    /// Print the full result as JSON instead of tables.
    #[clap(long)]
    pub json: bool,

    /// Show every year of the ledger instead of the first ten.
    #[clap(long)]
    pub all_years: bool,

    /// Also print the income and expense breakdown of this year (table output only).
    #[clap(long, value_name = "YEAR")]
    pub breakdown: Option<u32>,

    /// Write `cashflow.png` and `energy_flow.png` into this directory.
    #[clap(long)]
    pub plot_dir: Option<PathBuf>,

    /// Debug logging, unless `RUST_LOG` says otherwise.
    #[clap(long, short)]
    pub verbose: bool,
}

/// Per-field overrides applied on top of the loaded parameters.
#[derive(Debug, Default, Parser)]
pub struct ParameterOverrides {
    /// Solar capacity in kW.
    #[clap(long)]
    pub solar_capacity: Option<f64>,

    /// Battery capacity in kWh.
    #[clap(long)]
    pub battery_capacity: Option<f64>,

    /// Annual consumption in kWh.
    #[clap(long)]
    pub consumption: Option<f64>,

    /// Self-consumption rate in percent.
    #[clap(long)]
    pub self_consumption_rate: Option<f64>,

    /// Enable feed-in with this tariff per kWh.
    #[clap(long = "feed-in-tariff")]
    pub feed_in_tariff: Option<f64>,

    /// National subsidy in blocks of 10,000.
    #[clap(long)]
    pub subsidy_national: Option<f64>,

    /// Local subsidy in blocks of 10,000.
    #[clap(long)]
    pub subsidy_local: Option<f64>,

    /// Electricity base price per kWh.
    #[clap(long)]
    pub base_price: Option<f64>,

    /// Yearly electricity price increase in percent.
    #[clap(long)]
    pub price_increase: Option<f64>,

    /// Discount rate in percent.
    #[clap(long)]
    pub discount_rate: Option<f64>,
}

impl ParameterOverrides {
    pub fn apply(&self, mut params: InputParameters) -> InputParameters {
        let fields = [
            (self.solar_capacity, &mut params.solar_capacity),
            (self.battery_capacity, &mut params.battery_capacity),
            (self.consumption, &mut params.annual_consumption),
            (self.self_consumption_rate, &mut params.self_consumption_rate),
            (self.subsidy_national, &mut params.subsidy_national),
            (self.subsidy_local, &mut params.subsidy_local),
            (self.base_price, &mut params.electricity_base_price),
            (self.price_increase, &mut params.electricity_price_increase_rate),
            (self.discount_rate, &mut params.discount_rate),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        if let Some(rate) = self.feed_in_tariff {
            params.enable_feed_in_tariff = true;
            params.feed_in_tariff_rate = rate;
        }
        params
    }
}

pub fn load_parameters(path: &Path) -> Result<InputParameters> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse parameters file: {}", path.display()))
}
