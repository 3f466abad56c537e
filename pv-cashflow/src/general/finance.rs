//! Payback period, NPV and IRR of an investment with yearly cashflows.
//!
//! Cashflow `j` (0-based) is received at the end of year `j + 1`; the initial
//! investment is paid at year 0.

/// IRR reported when nothing was invested (or subsidies exceed the cost).
pub const IRR_CEILING_PERCENT: f64 = 999.9;
/// Lower bound of a solved IRR.
pub const IRR_FLOOR_PERCENT: f64 = -99.9;
/// IRR reported when the summed cashflows never cover the investment.
pub const IRR_UNRECOVERED_PERCENT: f64 = -100.0;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 0.00001;
const MIN_SLOPE: f64 = 0.0001;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 9.99;

/// How the IRR solver finished.
///
/// Rates are fractions (0.05 = 5 %), saturated values are already percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IrrOutcome {
    /// Newton steps became smaller than the tolerance.
    Converged(f64),
    /// A degenerate input or an overflowing discount factor; the value is final.
    Saturated(f64),
    /// The NPV curve was too flat to take another step.
    FlatSlope(f64),
    /// No convergence within the iteration budget.
    ExhaustedIterations(f64),
}

impl IrrOutcome {
    /// The IRR in percent, bounded to the reporting range.
    pub fn percent(self) -> f64 {
        match self {
            IrrOutcome::Converged(rate)
            | IrrOutcome::FlatSlope(rate)
            | IrrOutcome::ExhaustedIterations(rate) => clamp_percent(rate * 100.0),
            IrrOutcome::Saturated(percent) => percent,
        }
    }

    pub fn is_converged(self) -> bool {
        matches!(self, IrrOutcome::Converged(_))
    }
}

fn clamp_percent(percent: f64) -> f64 {
    percent.clamp(IRR_FLOOR_PERCENT, IRR_CEILING_PERCENT)
}

/// Solves `-I + sum(cf_j / (1 + r)^(j + 1)) = 0` for `r` with Newton-Raphson.
///
/// Seeded from the average simple return and kept inside [-0.99, 9.99] between
/// steps. Degenerate cases saturate instead of failing:
/// * `net_initial_cost <= 0` gives 999.9 %
/// * summed cashflows `<= 0` give -100 %
/// * an overflowing discount factor gives 999.9 % or -99.9 %, by the sign of
///   the current rate
pub fn irr(cashflows: &[f64], net_initial_cost: f64) -> IrrOutcome {
    if net_initial_cost <= 0.0 {
        return IrrOutcome::Saturated(IRR_CEILING_PERCENT);
    }

    let total_cashflow: f64 = cashflows.iter().sum();
    if total_cashflow <= 0.0 {
        return IrrOutcome::Saturated(IRR_UNRECOVERED_PERCENT);
    }

    let average_cashflow = total_cashflow / cashflows.len() as f64;
    let mut rate = (average_cashflow / net_initial_cost).clamp(MIN_RATE, MAX_RATE);

    for _ in 0..MAX_ITERATIONS {
        let Some((npv, slope)) = npv_with_slope(rate, cashflows, net_initial_cost) else {
            return IrrOutcome::Saturated(if rate > 0.0 {
                IRR_CEILING_PERCENT
            } else {
                IRR_FLOOR_PERCENT
            });
        };

        if slope.abs() < MIN_SLOPE {
            return IrrOutcome::FlatSlope(rate);
        }

        let new_rate = rate - npv / slope;
        if (new_rate - rate).abs() < TOLERANCE {
            return IrrOutcome::Converged(new_rate);
        }

        rate = new_rate.clamp(MIN_RATE, MAX_RATE);
    }

    IrrOutcome::ExhaustedIterations(rate)
}

/// NPV at `rate` and its derivative with respect to `rate`.
///
/// `None` if a discount factor overflows or vanishes.
fn npv_with_slope(rate: f64, cashflows: &[f64], net_initial_cost: f64) -> Option<(f64, f64)> {
    let mut npv = -net_initial_cost;
    let mut slope = 0.0;

    for (j, &cashflow) in cashflows.iter().enumerate() {
        let exponent = (j + 1) as f64;
        let discount = (1.0 + rate).powf(exponent);
        if !discount.is_finite() || discount == 0.0 {
            return None;
        }

        npv += cashflow / discount;
        slope -= exponent * cashflow / (1.0 + rate).powf(exponent + 1.0);
    }

    Some((npv, slope))
}

/// NPV of the investment at a discount rate given in percent.
pub fn net_present_value(discount_rate_percent: f64, cashflows: &[f64], net_initial_cost: f64) -> f64 {
    let rate = discount_rate_percent / 100.0;
    cashflows
        .iter()
        .enumerate()
        .fold(-net_initial_cost, |npv, (j, &cashflow)| {
            npv + cashflow / (1.0 + rate).powf((j + 1) as f64)
        })
}

/// Payback period derived from the cumulative cashflow at the end of each year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payback {
    /// Fractional years until the cumulative cashflow turned non-negative.
    Recovered(f64),
    /// Never recovered; carries the horizon length.
    NotRecovered(f64),
}

impl Payback {
    /// Payback in years, saturating at the horizon length.
    pub fn years(self) -> f64 {
        match self {
            Payback::Recovered(years) | Payback::NotRecovered(years) => years,
        }
    }
}

/// Finds the first year with a non-negative cumulative cashflow and
/// interpolates linearly within the preceding year.
///
/// A first-year recovery is reported as exactly one year.
pub fn payback_period(cumulative_cashflows: &[f64]) -> Payback {
    match cumulative_cashflows.iter().position(|&cashflow| cashflow >= 0.0) {
        Some(0) => Payback::Recovered(1.0),
        Some(index) => {
            let previous = cumulative_cashflows[index - 1];
            let current = cumulative_cashflows[index];
            Payback::Recovered(index as f64 + (-previous) / (current - previous))
        }
        None => Payback::NotRecovered(cumulative_cashflows.len() as f64),
    }
}
