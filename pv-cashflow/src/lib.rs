pub mod cli;
pub mod general;
pub mod model;
pub mod report;
pub mod simulation;

// Re-export commonly used items for convenience
pub use general::assumptions::Assumptions;
pub use simulation::{SimulationError, run_simulation, run_simulation_with};
