pub mod cashflow;
pub mod cost;
pub mod energy_flow;
pub mod pricing;
