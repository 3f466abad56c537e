pub mod assumptions;
pub mod finance;

pub use assumptions::{AssumptionError, Assumptions, CostBasis, Equipment, ReplacementRule};
pub use finance::{IrrOutcome, Payback, irr, net_present_value, payback_period};
