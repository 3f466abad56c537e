pub mod error;
pub mod input;
pub mod output;

pub use error::ParameterError;
pub use input::config::{ParameterConfig, ParameterRange};
pub use input::parameters::{estimate_annual_consumption, InputParameters};
pub use output::result::SimulationResult;
pub use output::yearly::YearlyRecord;
