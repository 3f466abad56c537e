use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Energy and cash ledger of a single simulated year.
///
/// Energy in kWh, money in currency units. Everything except the cashflow and
/// NPV columns is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./simulation.ts")]
pub struct YearlyRecord {
    /// 1-based year index.
    pub year: u32,

    // Energy
    pub generation: f64,
    pub self_consumed: f64,
    pub grid_purchase: f64,
    /// Surplus available for export, whether or not it is sold.
    pub feed_in: f64,

    pub electricity_price: f64, // currency/kWh

    // Income
    pub feed_in_revenue: f64,
    pub savings_from_self_consumption: f64,
    pub dr_revenue: f64,

    // Expenses
    pub grid_purchase_cost: f64,
    pub maintenance_cost: f64,
    pub insurance_cost: f64,
    pub replacement_cost: f64,
    /// Comma-joined names of the equipment replaced this year, empty if none.
    pub replacement_item: String,

    // Cashflow
    pub annual_cashflow: f64,
    pub cumulative_cashflow: f64,
    pub discounted_cashflow: f64,
    pub npv: f64,
}

impl YearlyRecord {
    pub fn total_income(&self) -> f64 {
        self.feed_in_revenue + self.savings_from_self_consumption + self.dr_revenue
    }

    pub fn total_expenses(&self) -> f64 {
        self.grid_purchase_cost + self.maintenance_cost + self.insurance_cost + self.replacement_cost
    }

    pub fn has_replacement(&self) -> bool {
        !self.replacement_item.is_empty()
    }
}
