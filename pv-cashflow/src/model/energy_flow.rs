use crate::general::assumptions::Assumptions;

/// Split of one year's generation and consumption, in kWh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyFlow {
    pub self_consumed: f64,
    pub grid_purchase: f64,
    /// Generation not consumed on site, available for export.
    pub surplus: f64,
}

/// Energy a battery can shift from daytime surplus into self-consumption per
/// year: one full cycle per day at the round-trip efficiency.
pub fn battery_annual_throughput(battery_capacity: f64, assumptions: &Assumptions) -> f64 {
    battery_capacity * assumptions.battery_cycles_per_year * assumptions.battery_efficiency
}

/// Annual energy-bucket allocation of generation to self-consumption.
///
/// `self_consumption_rate` is the percentage of generation targeted for own
/// use; a battery raises that target by its annual throughput. Self-consumption
/// never exceeds generation nor consumption, so rates above 100 % only matter
/// for consumption estimates made outside the engine.
pub fn energy_flow(
    generation: f64,
    consumption: f64,
    self_consumption_rate: f64,
    battery_capacity: f64,
    assumptions: &Assumptions,
) -> EnergyFlow {
    let target_self_consumption = generation * (self_consumption_rate / 100.0);

    let max_self_consumption = if battery_capacity > 0.0 {
        let throughput = battery_annual_throughput(battery_capacity, assumptions);
        generation.min(target_self_consumption + throughput)
    } else {
        generation.min(target_self_consumption)
    };

    let self_consumed = max_self_consumption.min(consumption);

    EnergyFlow {
        self_consumed,
        grid_purchase: (consumption - self_consumed).max(0.0),
        surplus: (generation - self_consumed).max(0.0),
    }
}
