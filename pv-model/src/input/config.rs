use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ParameterError;
use crate::input::parameters::InputParameters;

/// Slider/number-input metadata of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./parameter_config.ts")]
pub struct ParameterRange {
    /// The label shown next to the input.
    pub label: String,
    /// A one-line explanation of the parameter.
    pub description: String,
    /// Unit suffix used when displaying the value.
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterRange {
    fn new(label: &str, description: &str, unit: &str, min: f64, max: f64, step: f64) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            min,
            max,
            step,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Formats a value with this range's unit suffix.
    pub fn format(&self, value: f64) -> String {
        if self.unit.is_empty() {
            format!("{}", value)
        } else {
            format!("{} {}", value, self.unit)
        }
    }
}

/// Declared ranges of every numeric input, as the form enforces them.
///
/// The engine does not consult these; they are metadata for whoever collects
/// the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./parameter_config.ts")]
pub struct ParameterConfig {
    pub solar_capacity: ParameterRange,
    pub battery_capacity: ParameterRange,
    pub annual_consumption: ParameterRange,
    pub self_consumption_rate: ParameterRange,
    pub feed_in_tariff_rate: ParameterRange,
    pub subsidy_national: ParameterRange,
    pub subsidy_local: ParameterRange,
    pub electricity_base_price: ParameterRange,
    pub electricity_price_increase_rate: ParameterRange,
    pub discount_rate: ParameterRange,
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self {
            solar_capacity: ParameterRange::new(
                "Solar panel capacity",
                "Total rated capacity of the installed panels",
                "kW",
                3.0,
                50.0,
                0.5,
            ),
            battery_capacity: ParameterRange::new(
                "Battery capacity",
                "Usable capacity of the storage battery, 0 for none",
                "kWh",
                0.0,
                50.0,
                0.5,
            ),
            annual_consumption: ParameterRange::new(
                "Annual consumption",
                "Household electricity use per year",
                "kWh",
                1000.0,
                20000.0,
                100.0,
            ),
            self_consumption_rate: ParameterRange::new(
                "Usage rate",
                "Share of generation consumed on site (the rest is exported or stored)",
                "%",
                0.0,
                200.0,
                1.0,
            ),
            feed_in_tariff_rate: ParameterRange::new(
                "Feed-in tariff",
                "Price paid for exported electricity during the 10-year FIT period",
                "/kWh",
                0.0,
                50.0,
                1.0,
            ),
            subsidy_national: ParameterRange::new(
                "National subsidy",
                "Subsidy granted by the national government",
                "x10,000",
                0.0,
                200.0,
                1.0,
            ),
            subsidy_local: ParameterRange::new(
                "Local subsidy",
                "Subsidy granted by the local government",
                "x10,000",
                0.0,
                200.0,
                1.0,
            ),
            electricity_base_price: ParameterRange::new(
                "Electricity price",
                "Current retail price of grid electricity",
                "/kWh",
                20.0,
                60.0,
                1.0,
            ),
            electricity_price_increase_rate: ParameterRange::new(
                "Price increase",
                "Yearly escalation of the electricity price",
                "%/year",
                0.0,
                10.0,
                0.1,
            ),
            discount_rate: ParameterRange::new(
                "Discount rate",
                "Yearly discount rate used for the NPV",
                "%",
                0.0,
                10.0,
                0.1,
            ),
        }
    }
}

impl ParameterConfig {
    /// Looks up the range of a parameter by its serialised name.
    pub fn range_for(&self, field: &str) -> Option<&ParameterRange> {
        match field {
            "solarCapacity" => Some(&self.solar_capacity),
            "batteryCapacity" => Some(&self.battery_capacity),
            "annualConsumption" => Some(&self.annual_consumption),
            "selfConsumptionRate" => Some(&self.self_consumption_rate),
            "feedInTariffRate" => Some(&self.feed_in_tariff_rate),
            "subsidyNational" => Some(&self.subsidy_national),
            "subsidyLocal" => Some(&self.subsidy_local),
            "electricityBasePrice" => Some(&self.electricity_base_price),
            "electricityPriceIncreaseRate" => Some(&self.electricity_price_increase_rate),
            "discountRate" => Some(&self.discount_rate),
            _ => None,
        }
    }

    /// Every parameter outside its declared range.
    ///
    /// The feed-in tariff is only checked when feed-in is enabled, since the
    /// form hides it otherwise.
    pub fn out_of_range(&self, params: &InputParameters) -> Vec<ParameterError> {
        params
            .numeric_fields()
            .into_iter()
            .filter(|(field, _)| params.enable_feed_in_tariff || *field != "feedInTariffRate")
            .filter_map(|(field, value)| {
                let range = self.range_for(field)?;
                (!range.contains(value)).then_some(ParameterError::OutOfRange {
                    field,
                    value,
                    min: range.min,
                    max: range.max,
                })
            })
            .collect()
    }

    /// Renders a finding with the field's label and unit, falling back to the
    /// plain error message for anything but a range violation.
    pub fn describe(&self, error: &ParameterError) -> String {
        match (error, self.range_for(error.field())) {
            (ParameterError::OutOfRange { value, .. }, Some(range)) => format!(
                "{} = {} is outside {} to {}",
                range.label,
                range.format(*value),
                range.format(range.min),
                range.format(range.max)
            ),
            _ => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_numeric_field_has_a_range() {
        let config = ParameterConfig::default();
        let params = InputParameters::default();
        for (field, _) in params.numeric_fields() {
            assert!(config.range_for(field).is_some(), "missing range for {field}");
        }
        assert!(config.range_for("unknown").is_none());
    }

    #[test]
    fn test_declared_ranges() {
        let config = ParameterConfig::default();
        assert_eq!(config.solar_capacity.min, 3.0);
        assert_eq!(config.solar_capacity.step, 0.5);
        assert_eq!(config.self_consumption_rate.max, 200.0);
        assert_eq!(config.discount_rate.step, 0.1);
    }

    #[test]
    fn test_out_of_range_reports_each_field() {
        let config = ParameterConfig::default();
        let params = InputParameters {
            solar_capacity: 60.0,
            discount_rate: 12.0,
            ..Default::default()
        };
        let errors = config.out_of_range(&params);
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["solarCapacity", "discountRate"]);
        assert_eq!(
            errors[0],
            ParameterError::OutOfRange {
                field: "solarCapacity",
                value: 60.0,
                min: 3.0,
                max: 50.0
            }
        );
    }

    #[test]
    fn test_feed_in_rate_only_checked_when_enabled() {
        let config = ParameterConfig::default();
        let mut params = InputParameters {
            feed_in_tariff_rate: 80.0,
            ..Default::default()
        };
        assert!(config.out_of_range(&params).is_empty());

        params.enable_feed_in_tariff = true;
        assert_eq!(config.out_of_range(&params).len(), 1);
    }

    #[test]
    fn test_format_with_unit() {
        let config = ParameterConfig::default();
        assert_eq!(config.solar_capacity.format(4.5), "4.5 kW");
        assert_eq!(config.discount_rate.format(3.0), "3 %");
    }

    #[test]
    fn test_describe_uses_label_and_unit() {
        let config = ParameterConfig::default();
        let params = InputParameters {
            solar_capacity: 60.0,
            ..Default::default()
        };
        let findings = config.out_of_range(&params);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            config.describe(&findings[0]),
            "Solar panel capacity = 60 kW is outside 3 kW to 50 kW"
        );

        let error = ParameterError::Negative {
            field: "batteryCapacity",
            value: -1.0,
        };
        assert_eq!(config.describe(&error), error.to_string());
    }
}
