use pv_model::{InputParameters, ParameterError, SimulationResult, YearlyRecord};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::general::assumptions::{AssumptionError, Assumptions};
use crate::general::finance::{IrrOutcome, Payback, irr, payback_period};
use crate::model::cashflow::{Accumulator, YearContext, assemble_year};
use crate::model::cost::{initial_cost, net_initial_cost};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid input parameters: {0}")]
    Parameters(#[from] ParameterError),
    #[error("invalid assumptions: {0}")]
    Assumptions(#[from] AssumptionError),
}

/// Simulates the investment over the default horizon with default assumptions.
pub fn run_simulation(params: &InputParameters) -> Result<SimulationResult, SimulationError> {
    run_simulation_with(params, &Assumptions::default())
}

/// Simulates `assumptions.horizon_years` years of the system described by
/// `params` and derives payback, NPV and IRR from the ledger.
///
/// Inputs are validated before the first year is computed. Degenerate
/// investments are not errors: IRR and payback saturate instead.
pub fn run_simulation_with(
    params: &InputParameters,
    assumptions: &Assumptions,
) -> Result<SimulationResult, SimulationError> {
    params.validate()?;
    assumptions.validate()?;

    let initial_cost = initial_cost(params.solar_capacity, params.battery_capacity, assumptions);
    let net_initial_cost = net_initial_cost(initial_cost, params, assumptions);
    debug!(
        initial_cost,
        net_initial_cost,
        horizon = assumptions.horizon_years,
        "Starting simulation"
    );

    let ctx = YearContext {
        params,
        assumptions,
        initial_cost,
    };
    let yearly_data: Vec<YearlyRecord> = (1..=assumptions.horizon_years)
        .scan(Accumulator::new(net_initial_cost), |acc, year| {
            let (record, next) = assemble_year(&ctx, *acc, year);
            trace!(
                year,
                annual_cashflow = record.annual_cashflow,
                cumulative_cashflow = record.cumulative_cashflow,
                replacement = %record.replacement_item,
                "Year computed"
            );
            *acc = next;
            Some(record)
        })
        .collect();

    let cumulative: Vec<f64> = yearly_data.iter().map(|r| r.cumulative_cashflow).collect();
    let payback = payback_period(&cumulative);
    if let Payback::NotRecovered(horizon) = payback {
        warn!(horizon, "Investment is not recovered within the horizon");
    }

    let cashflows: Vec<f64> = yearly_data.iter().map(|r| r.annual_cashflow).collect();
    let irr_outcome = irr(&cashflows, net_initial_cost);
    match irr_outcome {
        IrrOutcome::Converged(_) => {}
        IrrOutcome::Saturated(percent) => warn!(percent, "IRR saturated"),
        IrrOutcome::FlatSlope(rate) => warn!(rate, "IRR solver stopped on a flat NPV curve"),
        IrrOutcome::ExhaustedIterations(rate) => {
            warn!(rate, "IRR solver did not converge")
        }
    }

    let last = yearly_data.last();
    let result = SimulationResult {
        total_cashflow: last.map_or(-net_initial_cost, |r| r.cumulative_cashflow),
        npv: last.map_or(-net_initial_cost, |r| r.npv),
        payback_period: payback.years(),
        irr: irr_outcome.percent(),
        net_initial_cost,
        yearly_data,
    };
    debug!(
        payback = result.payback_period,
        irr = result.irr,
        npv = result.npv,
        "Simulation finished"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::general::finance::net_present_value;

    fn scenario() -> InputParameters {
        InputParameters {
            solar_capacity: 12.0,
            battery_capacity: 20.0,
            annual_consumption: 8_000.0,
            self_consumption_rate: 100.0,
            enable_feed_in_tariff: false,
            subsidy_national: 160.0,
            subsidy_local: 30.0,
            electricity_base_price: 40.0,
            electricity_price_increase_rate: 3.0,
            discount_rate: 3.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let result = run_simulation(&scenario()).unwrap();

        assert_eq!(result.net_initial_cost, 6_100_000.0);
        assert_eq!(result.horizon(), 50);
        assert_eq!(result.year(1).unwrap().annual_cashflow, 205_000.0);
        assert!(result.payback_period > 0.0 && result.payback_period <= 50.0);
        assert!(result.irr >= -100.0 && result.irr <= 999.9);

        let last = result.yearly_data.last().unwrap();
        assert_eq!(result.total_cashflow, last.cumulative_cashflow);
        assert_eq!(result.npv, last.npv);
    }

    #[test]
    fn test_years_are_contiguous() {
        let result = run_simulation(&scenario()).unwrap();
        for (index, record) in result.yearly_data.iter().enumerate() {
            assert_eq!(record.year as usize, index + 1);
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let params = scenario();
        assert_eq!(run_simulation(&params), run_simulation(&params));
    }

    #[test]
    fn test_cumulative_and_npv_recurrences() {
        let result = run_simulation(&scenario()).unwrap();

        let mut cumulative = -result.net_initial_cost;
        for record in &result.yearly_data {
            cumulative += record.annual_cashflow;
            assert_relative_eq!(record.cumulative_cashflow, cumulative, max_relative = 1e-9);
        }

        let expected_npv = net_present_value(3.0, &result.annual_cashflows(), result.net_initial_cost);
        assert_abs_diff_eq!(result.npv, expected_npv, epsilon = 1e-3);
    }

    #[test]
    fn test_payback_matches_first_recovered_year() {
        let result = run_simulation(&scenario()).unwrap();
        if result.is_recovered() {
            let first = result
                .yearly_data
                .iter()
                .find(|r| r.cumulative_cashflow >= 0.0)
                .unwrap();
            assert!(result.payback_period <= f64::from(first.year));
            assert!(result.payback_period > f64::from(first.year) - 1.0);
        } else {
            assert_eq!(result.payback_period, 50.0);
        }
    }

    #[test]
    fn test_never_recovered_saturates() {
        // tiny consumption on a large system barely earns anything
        let params = InputParameters {
            solar_capacity: 50.0,
            annual_consumption: 1_000.0,
            electricity_base_price: 20.0,
            electricity_price_increase_rate: 0.0,
            ..Default::default()
        };
        let result = run_simulation(&params).unwrap();
        assert!(!result.is_recovered());
        assert_eq!(result.payback_period, 50.0);
        assert_eq!(result.irr, -100.0);
    }

    #[test]
    fn test_subsidies_above_cost_saturate_irr() {
        let params = InputParameters {
            solar_capacity: 3.0,
            subsidy_national: 200.0,
            ..Default::default()
        };
        let result = run_simulation(&params).unwrap();
        assert!(result.net_initial_cost < 0.0);
        assert_eq!(result.irr, 999.9);
        assert_eq!(result.payback_period, 1.0);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let params = InputParameters {
            solar_capacity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            run_simulation(&params),
            Err(SimulationError::Parameters(ParameterError::NotPositive { .. }))
        ));

        let params = InputParameters {
            discount_rate: f64::NAN,
            ..Default::default()
        };
        assert!(run_simulation(&params).is_err());
    }

    #[test]
    fn test_custom_horizon() {
        let assumptions = Assumptions {
            horizon_years: 20,
            ..Default::default()
        };
        let result = run_simulation_with(&scenario(), &assumptions).unwrap();
        assert_eq!(result.horizon(), 20);

        let assumptions = Assumptions {
            horizon_years: 0,
            ..Default::default()
        };
        assert_eq!(
            run_simulation_with(&scenario(), &assumptions),
            Err(SimulationError::Assumptions(AssumptionError::ZeroHorizon))
        );
    }
}
