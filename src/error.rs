use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid {field}{}: {reason}", employee_suffix(.employee_id))]
    InvalidInput {
        field: &'static str,
        reason: String,
        employee_id: Option<String>,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
            employee_id: None,
        }
    }

    /// Attaches the record the failure came from.
    pub fn for_employee(self, id: &str) -> Self {
        match self {
            EngineError::InvalidInput { field, reason, .. } => EngineError::InvalidInput {
                field,
                reason,
                employee_id: Some(id.to_string()),
            },
        }
    }
}

fn employee_suffix(employee_id: &Option<String>) -> String {
    match employee_id {
        Some(id) => format!(" for employee {id}"),
        None => String::new(),
    }
}

pub fn check_unit_interval(field: &'static str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::invalid(field, format!("{value} is outside [0, 1]")))
    }
}
