use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::output::yearly::YearlyRecord;

/// Full outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./simulation.ts")]
pub struct SimulationResult {
    /// One record per year, ordered, without gaps.
    pub yearly_data: Vec<YearlyRecord>,
    /// Years until the cumulative cashflow turns non-negative. Equals the
    /// horizon length when the investment is never recovered.
    pub payback_period: f64,
    /// Cumulative cashflow at the end of the horizon.
    pub total_cashflow: f64,
    /// NPV at the end of the horizon.
    pub npv: f64,
    /// Internal rate of return in percent, bounded to -100..=999.9.
    pub irr: f64,
    /// Initial cost after subsidies.
    #[serde(rename = "initialCost")]
    pub net_initial_cost: f64,
}

impl SimulationResult {
    pub fn horizon(&self) -> usize {
        self.yearly_data.len()
    }

    /// The record of a 1-based year, if inside the horizon.
    pub fn year(&self, year: u32) -> Option<&YearlyRecord> {
        let index = usize::try_from(year).ok()?.checked_sub(1)?;
        self.yearly_data.get(index)
    }

    pub fn annual_cashflows(&self) -> Vec<f64> {
        self.yearly_data.iter().map(|r| r.annual_cashflow).collect()
    }

    /// Whether the cumulative cashflow turns non-negative within the horizon.
    pub fn is_recovered(&self) -> bool {
        self.yearly_data.iter().any(|r| r.cumulative_cashflow >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: u32, annual_cashflow: f64, cumulative_cashflow: f64) -> YearlyRecord {
        YearlyRecord {
            year,
            generation: 0.0,
            self_consumed: 0.0,
            grid_purchase: 0.0,
            feed_in: 0.0,
            electricity_price: 0.0,
            feed_in_revenue: 0.0,
            savings_from_self_consumption: 0.0,
            dr_revenue: 0.0,
            grid_purchase_cost: 0.0,
            maintenance_cost: 0.0,
            insurance_cost: 0.0,
            replacement_cost: 0.0,
            replacement_item: String::new(),
            annual_cashflow,
            cumulative_cashflow,
            discounted_cashflow: 0.0,
            npv: 0.0,
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            yearly_data: vec![record(1, 60.0, -40.0), record(2, 70.0, 30.0)],
            payback_period: 1.5714,
            total_cashflow: 30.0,
            npv: 20.0,
            irr: 12.0,
            net_initial_cost: 100.0,
        }
    }

    #[test]
    fn test_year_lookup_is_one_based() {
        let result = result();
        assert_eq!(result.horizon(), 2);
        assert_eq!(result.year(1).map(|r| r.year), Some(1));
        assert_eq!(result.year(2).map(|r| r.annual_cashflow), Some(70.0));
        assert!(result.year(0).is_none());
        assert!(result.year(3).is_none());
    }

    #[test]
    fn test_cashflow_accessors() {
        let result = result();
        assert_eq!(result.annual_cashflows(), vec![60.0, 70.0]);
        assert!(result.is_recovered());
    }

    #[test]
    fn test_serialises_presentation_field_names() {
        let value = serde_json::to_value(result()).unwrap();
        assert_eq!(value["initialCost"], 100.0);
        assert_eq!(value["paybackPeriod"], 1.5714);
        assert_eq!(value["yearlyData"][0]["cumulativeCashflow"], -40.0);
        assert_eq!(value["yearlyData"][1]["feedIn"], 0.0);
        assert_eq!(value["yearlyData"][1]["replacementItem"], "");
    }
}
