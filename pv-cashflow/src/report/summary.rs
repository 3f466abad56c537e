//! Read-only aggregations over a finished ledger, in the shape the charts and
//! summary cards show them.

use indexmap::IndexMap;
use pv_model::{SimulationResult, YearlyRecord};
use serde::Serialize;

/// Money is displayed in blocks of this many currency units.
pub const DISPLAY_BLOCK: f64 = 10_000.0;

pub fn to_blocks(amount: f64) -> f64 {
    amount / DISPLAY_BLOCK
}

/// Horizon-wide energy totals in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySummary {
    pub total_generation: f64,
    pub total_self_consumed: f64,
    /// Exported energy; zero when feed-in is disabled.
    pub total_feed_in: f64,
    pub total_grid_purchase: f64,
    /// Self-consumed share of generation, in percent.
    pub self_consumption_share: f64,
}

impl EnergySummary {
    pub fn from_records(records: &[YearlyRecord], feed_in_enabled: bool) -> Self {
        let mut summary = records.iter().fold(Self::default(), |mut acc, r| {
            acc.total_generation += r.generation;
            acc.total_self_consumed += r.self_consumed;
            acc.total_feed_in += r.feed_in;
            acc.total_grid_purchase += r.grid_purchase;
            acc
        });

        if !feed_in_enabled {
            summary.total_feed_in = 0.0;
        }
        if summary.total_generation > 0.0 {
            summary.self_consumption_share =
                summary.total_self_consumed / summary.total_generation * 100.0;
        }
        summary
    }
}

/// Income and expense items of one year, in display blocks.
///
/// Items keep their display order; zero items are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualBreakdown {
    pub year: u32,
    pub income: IndexMap<&'static str, f64>,
    pub expenses: IndexMap<&'static str, f64>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_cashflow: f64,
}

impl AnnualBreakdown {
    pub fn for_record(record: &YearlyRecord) -> Self {
        let income = non_zero_items([
            ("Feed-in revenue", record.feed_in_revenue),
            ("Self-consumption savings", record.savings_from_self_consumption),
            ("Demand response", record.dr_revenue),
        ]);
        let expenses = non_zero_items([
            ("Grid purchase", record.grid_purchase_cost),
            ("Maintenance", record.maintenance_cost),
            ("Insurance", record.insurance_cost),
            ("Replacement", record.replacement_cost),
        ]);

        Self {
            year: record.year,
            total_income: income.values().sum(),
            total_expenses: expenses.values().sum(),
            net_cashflow: to_blocks(record.annual_cashflow),
            income,
            expenses,
        }
    }
}

fn non_zero_items<const N: usize>(
    items: [(&'static str, f64); N],
) -> IndexMap<&'static str, f64> {
    items
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(name, amount)| (name, to_blocks(amount)))
        .collect()
}

/// Rule-of-thumb verdicts shown next to the headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAssessment {
    /// Payback within [`InvestmentAssessment::PAYBACK_GUIDELINE_YEARS`].
    pub quick_payback: bool,
    pub positive_npv: bool,
    /// IRR at or above [`InvestmentAssessment::IRR_GUIDELINE_PERCENT`].
    pub attractive_irr: bool,
}

impl InvestmentAssessment {
    pub const PAYBACK_GUIDELINE_YEARS: f64 = 15.0;
    pub const IRR_GUIDELINE_PERCENT: f64 = 5.0;

    pub fn of(result: &SimulationResult) -> Self {
        Self {
            quick_payback: result.payback_period <= Self::PAYBACK_GUIDELINE_YEARS,
            positive_npv: result.npv >= 0.0,
            attractive_irr: result.irr >= Self::IRR_GUIDELINE_PERCENT,
        }
    }
}

/// Years plotted in the energy-flow chart: every 10th year for horizons
/// longer than 20 years, else every 5th, plus the final year.
pub fn sample_years(records: &[YearlyRecord]) -> Vec<&YearlyRecord> {
    let step = if records.len() > 20 { 10 } else { 5 };
    records
        .iter()
        .enumerate()
        .filter(|(index, _)| index % step == 0 || *index + 1 == records.len())
        .map(|(_, record)| record)
        .collect()
}
