use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ParameterError;

/// Technical and financial parameters of one simulation run.
///
/// Field names serialise in camelCase, the names the form layer uses. Missing
/// fields fall back to [`InputParameters::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "./simulation.ts")]
pub struct InputParameters {
    // System configuration
    pub solar_capacity: f64,   // kW
    pub battery_capacity: f64, // kWh

    // Usage
    pub annual_consumption: f64, // kWh
    /// Share of generation routed to self-consumption, in percent (0-200).
    /// Values above 100 describe a household consuming more than it generates.
    pub self_consumption_rate: f64,

    // Feed-in
    pub enable_feed_in_tariff: bool,
    pub feed_in_tariff_rate: f64, // currency/kWh

    // Subsidies, in blocks of 10,000 currency units
    pub subsidy_national: f64,
    pub subsidy_local: f64,

    // Electricity price
    pub electricity_base_price: f64,          // currency/kWh
    pub electricity_price_increase_rate: f64, // %/year

    pub discount_rate: f64, // %/year
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            solar_capacity: 10.0,
            battery_capacity: 0.0,

            annual_consumption: 4500.0,
            self_consumption_rate: 100.0,

            enable_feed_in_tariff: false,
            feed_in_tariff_rate: 16.0,

            subsidy_national: 0.0,
            subsidy_local: 0.0,

            electricity_base_price: 30.0,
            electricity_price_increase_rate: 2.0,

            discount_rate: 3.0,
        }
    }
}

impl InputParameters {
    /// Numeric fields paired with their serialised names, in form order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 10] {
        [
            ("solarCapacity", self.solar_capacity),
            ("batteryCapacity", self.battery_capacity),
            ("annualConsumption", self.annual_consumption),
            ("selfConsumptionRate", self.self_consumption_rate),
            ("feedInTariffRate", self.feed_in_tariff_rate),
            ("subsidyNational", self.subsidy_national),
            ("subsidyLocal", self.subsidy_local),
            ("electricityBasePrice", self.electricity_base_price),
            (
                "electricityPriceIncreaseRate",
                self.electricity_price_increase_rate,
            ),
            ("discountRate", self.discount_rate),
        ]
    }

    /// Checks the domain the simulation is defined on: every number finite,
    /// solar capacity and consumption strictly positive, everything else
    /// non-negative.
    ///
    /// This does not check the form ranges, see
    /// [`ParameterConfig::out_of_range`](crate::ParameterConfig::out_of_range).
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = self.numeric_fields();

        if let Some(&(field, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ParameterError::NonFinite { field, value });
        }

        for (field, value) in [
            ("solarCapacity", self.solar_capacity),
            ("annualConsumption", self.annual_consumption),
        ] {
            if value <= 0.0 {
                return Err(ParameterError::NotPositive { field, value });
            }
        }

        if let Some(&(field, value)) = fields.iter().find(|(_, value)| *value < 0.0) {
            return Err(ParameterError::Negative { field, value });
        }

        Ok(())
    }

    /// Total subsidy in subsidy blocks.
    pub fn total_subsidy(&self) -> f64 {
        self.subsidy_national + self.subsidy_local
    }

    /// Replaces the annual consumption with [`estimate_annual_consumption`].
    pub fn with_estimated_consumption(mut self) -> Self {
        self.annual_consumption =
            estimate_annual_consumption(self.solar_capacity, self.self_consumption_rate);
        self
    }
}

/// Rough annual consumption derived from panel size and usage rate, as the
/// form pre-fills it: capacity × rate × 24 h × 365 d, rounded to whole kWh.
pub fn estimate_annual_consumption(solar_capacity: f64, self_consumption_rate: f64) -> f64 {
    let daily_usage = solar_capacity * (self_consumption_rate / 100.0) * 24.0;
    (daily_usage * 365.0).round()
}
