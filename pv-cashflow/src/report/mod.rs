pub mod plot;
pub mod summary;
pub mod table;

pub use plot::{plot_cashflow, plot_energy_flow};
pub use summary::{AnnualBreakdown, EnergySummary, InvestmentAssessment, sample_years};
pub use table::{breakdown_table, ledger_table, summary_table};
