use thiserror::Error;

/// A caller-supplied parameter outside the domain the simulation is defined on.
///
/// `field` is the serialised (camelCase) name of the offending parameter so the
/// form layer can map the error back onto its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} = {value} is outside the range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ParameterError {
    pub fn field(&self) -> &'static str {
        match self {
            ParameterError::NonFinite { field, .. }
            | ParameterError::NotPositive { field, .. }
            | ParameterError::Negative { field, .. }
            | ParameterError::OutOfRange { field, .. } => field,
        }
    }
}
