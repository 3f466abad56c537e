use pv_model::{InputParameters, YearlyRecord};

use crate::general::assumptions::Assumptions;
use crate::model::cost::{annual_generation, replacement_cost};
use crate::model::energy_flow::energy_flow;
use crate::model::pricing::{electricity_price, feed_in_revenue};

/// Running totals carried from one year into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub cumulative_cashflow: f64,
    pub npv: f64,
}

impl Accumulator {
    /// Year-0 baseline: only the net investment has been paid.
    pub fn new(net_initial_cost: f64) -> Self {
        Self {
            cumulative_cashflow: -net_initial_cost,
            npv: -net_initial_cost,
        }
    }
}

/// Inputs that stay fixed for every year of a run.
#[derive(Debug, Clone, Copy)]
pub struct YearContext<'a> {
    pub params: &'a InputParameters,
    pub assumptions: &'a Assumptions,
    /// Gross initial cost, the base of maintenance and insurance.
    pub initial_cost: f64,
}

impl YearContext<'_> {
    pub fn dr_revenue(&self) -> f64 {
        if self.params.battery_capacity > 0.0 {
            self.params.battery_capacity * self.assumptions.dr_revenue_per_kwh
        } else {
            0.0
        }
    }

    pub fn maintenance_cost(&self) -> f64 {
        self.initial_cost * self.assumptions.maintenance_rate
    }

    pub fn insurance_cost(&self) -> f64 {
        self.initial_cost * self.assumptions.insurance_rate
    }

    pub fn discount_factor(&self, year: u32) -> f64 {
        (1.0 + self.params.discount_rate / 100.0).powf(f64::from(year))
    }
}

/// Builds the ledger row of the 1-based `year` and the totals after it.
pub fn assemble_year(
    ctx: &YearContext<'_>,
    previous: Accumulator,
    year: u32,
) -> (YearlyRecord, Accumulator) {
    let params = ctx.params;
    let assumptions = ctx.assumptions;

    let generation = annual_generation(params.solar_capacity, year, assumptions);
    let flow = energy_flow(
        generation,
        params.annual_consumption,
        params.self_consumption_rate,
        params.battery_capacity,
        assumptions,
    );

    let price = electricity_price(
        params.electricity_base_price,
        params.electricity_price_increase_rate,
        year,
    );
    let feed_in_revenue = feed_in_revenue(flow.surplus, params, year, assumptions);
    let savings_from_self_consumption = flow.self_consumed * price;
    let dr_revenue = ctx.dr_revenue();

    let grid_purchase_cost = flow.grid_purchase * price;
    let maintenance_cost = ctx.maintenance_cost();
    let insurance_cost = ctx.insurance_cost();
    let replacement = replacement_cost(
        year,
        params.solar_capacity,
        params.battery_capacity,
        assumptions,
    );

    let annual_cashflow = feed_in_revenue + savings_from_self_consumption + dr_revenue
        - grid_purchase_cost
        - maintenance_cost
        - insurance_cost
        - replacement.cost;
    let discounted_cashflow = annual_cashflow / ctx.discount_factor(year);

    let next = Accumulator {
        cumulative_cashflow: previous.cumulative_cashflow + annual_cashflow,
        npv: previous.npv + discounted_cashflow,
    };

    let record = YearlyRecord {
        year,
        generation,
        self_consumed: flow.self_consumed,
        grid_purchase: flow.grid_purchase,
        feed_in: flow.surplus,
        electricity_price: price,
        feed_in_revenue,
        savings_from_self_consumption,
        dr_revenue,
        grid_purchase_cost,
        maintenance_cost,
        insurance_cost,
        replacement_cost: replacement.cost,
        replacement_item: replacement.label(),
        annual_cashflow,
        cumulative_cashflow: next.cumulative_cashflow,
        discounted_cashflow,
        npv: next.npv,
    };

    (record, next)
}
