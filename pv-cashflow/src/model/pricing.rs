use pv_model::InputParameters;

use crate::general::assumptions::Assumptions;

/// Retail electricity price in the 1-based `year`, escalated yearly from the
/// base price.
pub fn electricity_price(base_price: f64, increase_rate: f64, year: u32) -> f64 {
    base_price * (1.0 + increase_rate / 100.0).powf(f64::from(year) - 1.0)
}

/// Tariff paid per exported kWh in `year`: the full rate during the FIT
/// period, a reduced share afterwards, nothing with feed-in disabled.
pub fn feed_in_rate(params: &InputParameters, year: u32, assumptions: &Assumptions) -> f64 {
    if !params.enable_feed_in_tariff {
        0.0
    } else if year <= assumptions.fit_period_years {
        params.feed_in_tariff_rate
    } else {
        params.feed_in_tariff_rate * assumptions.post_fit_rate_ratio
    }
}

pub fn feed_in_revenue(
    surplus: f64,
    params: &InputParameters,
    year: u32,
    assumptions: &Assumptions,
) -> f64 {
    if surplus > 0.0 {
        surplus * feed_in_rate(params, year, assumptions)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn feed_in_params(enabled: bool) -> InputParameters {
        InputParameters {
            enable_feed_in_tariff: enabled,
            feed_in_tariff_rate: 16.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_price_escalates_from_base() {
        assert_eq!(electricity_price(30.0, 2.0, 1), 30.0);
        assert_relative_eq!(electricity_price(30.0, 2.0, 2), 30.6, max_relative = 1e-12);
        assert_relative_eq!(
            electricity_price(40.0, 3.0, 11),
            40.0 * 1.03_f64.powi(10),
            max_relative = 1e-12
        );
        assert_eq!(electricity_price(30.0, 0.0, 50), 30.0);
    }

    #[test]
    fn test_feed_in_rate_halves_after_fit_period() {
        let assumptions = Assumptions::default();
        let params = feed_in_params(true);
        assert_eq!(feed_in_rate(&params, 1, &assumptions), 16.0);
        assert_eq!(feed_in_rate(&params, 10, &assumptions), 16.0);
        assert_eq!(feed_in_rate(&params, 11, &assumptions), 8.0);
        assert_eq!(feed_in_rate(&params, 50, &assumptions), 8.0);
    }

    #[test]
    fn test_feed_in_revenue() {
        let assumptions = Assumptions::default();
        assert_eq!(
            feed_in_revenue(1_000.0, &feed_in_params(true), 3, &assumptions),
            16_000.0
        );
        assert_eq!(
            feed_in_revenue(1_000.0, &feed_in_params(true), 12, &assumptions),
            8_000.0
        );
        assert_eq!(
            feed_in_revenue(0.0, &feed_in_params(true), 3, &assumptions),
            0.0
        );
        assert_eq!(
            feed_in_revenue(1_000.0, &feed_in_params(false), 3, &assumptions),
            0.0
        );
    }
}
