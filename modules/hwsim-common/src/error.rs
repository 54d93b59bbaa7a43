use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A field is outside its declared range or not in its closed set of values.
    #[error("Validation error: {field} {constraint}")]
    Validation { field: String, constraint: String },

    #[error("Unknown simulator type: {0}")]
    UnknownSimulatorKind(String),

    /// A formula produced a value outside what the metric can represent.
    #[error("Internal computation error: {0}")]
    Computation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        SimError::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// True for errors the caller caused and can fix by resubmitting.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SimError::Validation { .. } | SimError::UnknownSimulatorKind(_)
        )
    }
}
