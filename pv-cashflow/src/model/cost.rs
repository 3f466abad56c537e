use pv_model::InputParameters;

use crate::general::assumptions::{Assumptions, CostBasis, Equipment, ReplacementRule};

/// Gross installation cost: panels, battery and the fixed installation fee.
pub fn initial_cost(solar_capacity: f64, battery_capacity: f64, assumptions: &Assumptions) -> f64 {
    solar_capacity * assumptions.solar_cost_per_kw
        + battery_capacity * assumptions.battery_cost_per_kwh
        + assumptions.installation_cost
}

/// Initial cost after national and local subsidies.
///
/// Subsidies are given in blocks of `subsidy_unit`; the result is negative if
/// they exceed the cost.
pub fn net_initial_cost(
    initial_cost: f64,
    params: &InputParameters,
    assumptions: &Assumptions,
) -> f64 {
    initial_cost - params.total_subsidy() * assumptions.subsidy_unit
}

/// Generation in kWh of the 1-based `year`, after panel degradation.
pub fn annual_generation(solar_capacity: f64, year: u32, assumptions: &Assumptions) -> f64 {
    solar_capacity
        * assumptions.generation_per_kw
        * (1.0 - assumptions.degradation_rate).powf(f64::from(year) - 1.0)
}

/// Equipment replaced in one year and what it costs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacement {
    pub cost: f64,
    pub items: Vec<Equipment>,
}

impl Replacement {
    /// Item names joined in schedule order, empty if nothing is replaced.
    pub fn label(&self) -> String {
        self.items
            .iter()
            .map(|item| item.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ReplacementRule {
    /// Whether the rule fires in `year`. Year 0 is the installation year and
    /// never triggers a replacement, for any equipment class; simulated years
    /// start at 1, so only direct callers can observe this.
    pub fn is_due(&self, year: u32) -> bool {
        year > 0 && self.interval_years > 0 && year % self.interval_years == 0
    }

    /// Replacement cost in `year`, or `None` if the rule does not apply.
    ///
    /// Capacity-based rules are skipped for equipment that is not installed.
    /// Prices decline by `price_decline` per year since installation.
    pub fn cost_in_year(
        &self,
        year: u32,
        solar_capacity: f64,
        battery_capacity: f64,
        price_decline: f64,
    ) -> Option<f64> {
        if !self.is_due(year) {
            return None;
        }

        let quantity = self.basis.quantity(solar_capacity, battery_capacity);
        if self.basis != CostBasis::Flat && quantity <= 0.0 {
            return None;
        }

        let reduction_factor = (1.0 - price_decline).powf(f64::from(year));
        Some(self.unit_cost * quantity * reduction_factor)
    }
}

/// Evaluates every scheduled rule against `year` and sums what is due.
pub fn replacement_cost(
    year: u32,
    solar_capacity: f64,
    battery_capacity: f64,
    assumptions: &Assumptions,
) -> Replacement {
    assumptions
        .replacement_schedule
        .iter()
        .filter_map(|rule| {
            rule.cost_in_year(
                year,
                solar_capacity,
                battery_capacity,
                assumptions.replacement_price_decline,
            )
            .map(|cost| (rule.equipment, cost))
        })
        .fold(Replacement::default(), |mut replacement, (item, cost)| {
            replacement.cost += cost;
            replacement.items.push(item);
            replacement
        })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_initial_cost() {
        let assumptions = Assumptions::default();
        assert_eq!(initial_cost(12.0, 20.0, &assumptions), 8_000_000.0);
        assert_eq!(initial_cost(3.0, 0.0, &assumptions), 1_660_000.0);
    }

    #[test]
    fn test_net_initial_cost_subtracts_subsidy_blocks() {
        let assumptions = Assumptions::default();
        let params = InputParameters {
            subsidy_national: 160.0,
            subsidy_local: 30.0,
            ..Default::default()
        };
        assert_eq!(
            net_initial_cost(8_000_000.0, &params, &assumptions),
            6_100_000.0
        );
    }

    #[test]
    fn test_generation_degrades() {
        let assumptions = Assumptions::default();
        assert_eq!(annual_generation(10.0, 1, &assumptions), 10_000.0);
        assert_relative_eq!(
            annual_generation(10.0, 2, &assumptions),
            9_950.0,
            max_relative = 1e-12
        );

        let mut previous = f64::INFINITY;
        for year in 1..=50 {
            let generation = annual_generation(10.0, year, &assumptions);
            assert_relative_eq!(
                generation,
                10.0 * 1000.0 * 0.995_f64.powf(f64::from(year - 1)),
                max_relative = 1e-12
            );
            assert!(generation < previous && generation > 0.0);
            previous = generation;
        }
    }

    #[test]
    fn test_no_replacement_outside_schedule() {
        let assumptions = Assumptions::default();
        for year in [1, 9, 11, 13, 26, 49] {
            let replacement = replacement_cost(year, 10.0, 10.0, &assumptions);
            assert_eq!(replacement, Replacement::default(), "year {year}");
            assert_eq!(replacement.label(), "");
        }
    }

    #[test]
    fn test_smart_meter_replacement() {
        let assumptions = Assumptions::default();
        let replacement = replacement_cost(10, 10.0, 0.0, &assumptions);
        assert_eq!(replacement.items, vec![Equipment::SmartMeter]);
        assert_relative_eq!(
            replacement.cost,
            80_000.0 * 0.98_f64.powf(10.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_battery_replacement_skipped_without_battery() {
        let assumptions = Assumptions::default();
        assert!(replacement_cost(12, 10.0, 0.0, &assumptions).items.is_empty());

        let replacement = replacement_cost(12, 10.0, 5.0, &assumptions);
        assert_eq!(replacement.items, vec![Equipment::Battery]);
        assert_relative_eq!(
            replacement.cost,
            160_000.0 * 5.0 * 0.98_f64.powf(12.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_coinciding_replacements_sum_in_schedule_order() {
        let assumptions = Assumptions::default();
        // 60 = 10 * 6 = 12 * 5 = 15 * 4
        let replacement = replacement_cost(60, 10.0, 5.0, &assumptions);
        assert_eq!(
            replacement.items,
            vec![Equipment::SmartMeter, Equipment::Battery, Equipment::Inverter]
        );
        assert_eq!(replacement.label(), "Smart meter, Battery, Inverter");

        let factor = 0.98_f64.powf(60.0);
        let expected = 80_000.0 * factor + 160_000.0 * 5.0 * factor + 40_000.0 * 10.0 * factor;
        assert_relative_eq!(replacement.cost, expected, max_relative = 1e-12);

        // 50 = 10 * 5 = 25 * 2
        let replacement = replacement_cost(50, 10.0, 5.0, &assumptions);
        assert_eq!(replacement.label(), "Smart meter, Solar panels");
    }

    #[test]
    fn test_later_replacements_are_cheaper() {
        let assumptions = Assumptions::default();
        for rule in &assumptions.replacement_schedule {
            let costs: Vec<f64> = (1..=4)
                .filter_map(|n| rule.cost_in_year(rule.interval_years * n, 8.0, 4.0, 0.02))
                .collect();
            assert_eq!(costs.len(), 4);
            assert!(
                costs.windows(2).all(|pair| pair[0] > pair[1]),
                "{:?}: {costs:?}",
                rule.equipment
            );
        }
    }

    #[test]
    fn test_rule_is_never_due_in_year_zero() {
        let assumptions = Assumptions::default();
        assert!(
            assumptions
                .replacement_schedule
                .iter()
                .all(|rule| !rule.is_due(0))
        );
    }
}
