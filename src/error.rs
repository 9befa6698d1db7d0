//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating and managing
//! paychecks.

use thiserror::Error;
use uuid::Uuid;

use crate::models::PaycheckStatus;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "Employee".to_string(),
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An employee, paycheck or business id did not resolve.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up (e.g. "Employee").
        entity: String,
        /// The id that did not resolve.
        id: String,
    },

    /// Input failed validation.
    #[error("Invalid input: {message}")]
    Validation {
        /// A human-readable reason.
        message: String,
    },

    /// A paycheck could not be calculated for an employee.
    #[error("Payroll calculation failed for employee '{employee_id}': {message}")]
    CalculationFailed {
        /// The employee the calculation was attempted for.
        employee_id: String,
        /// A description of what went wrong.
        message: String,
    },

    /// The paycheck's current status forbids the attempted operation.
    #[error("Operation '{operation}' not allowed for paycheck {paycheck_id} in status {status}")]
    LifecycleViolation {
        /// The paycheck the operation targeted (nil for unsaved paychecks).
        paycheck_id: Uuid,
        /// The status the paycheck was in.
        status: PaycheckStatus,
        /// The rejected operation.
        operation: String,
    },

    /// Every per-employee calculation in a bonus batch failed.
    #[error("All {} bonus calculations failed: {}", .failures.len(), .failures.join("; "))]
    BatchFailed {
        /// The individual failure reasons, in attempt order.
        failures: Vec<String>,
    },

    /// The engine is misconfigured (tax strategy, insurance rate).
    #[error("Configuration error: {message}")]
    Configuration {
        /// A description of the misconfiguration.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A storage collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::NotFound`] for the given entity kind and id.
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Builds a [`EngineError::Validation`] with the given reason.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::Validation`] for an amount outside the
    /// representable decimal range.
    pub fn amount_overflow(what: &str) -> Self {
        EngineError::Validation {
            message: format!("{} exceeds the supported amount range", what),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = EngineError::not_found("Paycheck", "42");
        assert_eq!(error.to_string(), "Paycheck not found: 42");
    }

    #[test]
    fn test_validation_displays_reason() {
        let error = EngineError::validation("bonus amount must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid input: bonus amount must be positive"
        );
    }

    #[test]
    fn test_amount_overflow_is_validation() {
        let error = EngineError::amount_overflow("net pay");
        assert!(matches!(error, EngineError::Validation { .. }));
        assert_eq!(
            error.to_string(),
            "Invalid input: net pay exceeds the supported amount range"
        );
    }

    #[test]
    fn test_lifecycle_violation_displays_id_and_status() {
        let id = Uuid::nil();
        let error = EngineError::LifecycleViolation {
            paycheck_id: id,
            status: PaycheckStatus::Paid,
            operation: "update".to_string(),
        };
        assert_eq!(
            error.to_string(),
            format!("Operation 'update' not allowed for paycheck {} in status PAID", id)
        );
    }

    #[test]
    fn test_batch_failed_bundles_reasons() {
        let error = EngineError::BatchFailed {
            failures: vec!["emp_1: no salary".to_string(), "emp_2: no salary".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "All 2 bonus calculations failed: emp_1: no salary; emp_2: no salary"
        );
    }

    #[test]
    fn test_calculation_failed_names_employee() {
        let error = EngineError::CalculationFailed {
            employee_id: "emp_007".to_string(),
            message: "salary is not set".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll calculation failed for employee 'emp_007': salary is not set"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::not_found("Employee", "missing"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
