//! Error types for the Compensation Engine.
//!
//! Only caller contract violations and configuration I/O surface as errors.
//! Configuration gaps (no back rule, no sliding tier, nobody to credit) resolve
//! to zero values inside the calculations and never reach this type.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Compensation Engine.
///
/// # Example
///
/// ```
/// use compensation_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A line item carried a negative price or quantity.
    #[error("Invalid line item '{item_id}' on receipt '{receipt_id}': {message}")]
    InvalidLineItem {
        /// The receipt the item belongs to.
        receipt_id: String,
        /// The offending line item.
        item_id: String,
        /// A description of what made the item invalid.
        message: String,
    },

    /// Work hours supplied for a cast were negative.
    #[error("Invalid work hours for cast '{cast_id}': {message}")]
    InvalidWorkHours {
        /// The cast the hours belong to.
        cast_id: String,
        /// A description of the problem.
        message: String,
    },

    /// The pay period ends before it starts.
    #[error("Invalid pay period: {start_date} is after {end_date}")]
    InvalidPayPeriod {
        /// The period start.
        start_date: NaiveDate,
        /// The period end.
        end_date: NaiveDate,
    },

    /// Two compensation types share the same id.
    #[error("Duplicate compensation type: {type_id}")]
    DuplicateCompensationType {
        /// The repeated type id.
        type_id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/policy.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/policy.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_line_item_displays_receipt_and_item() {
        let error = EngineError::InvalidLineItem {
            receipt_id: "r_001".to_string(),
            item_id: "item_3".to_string(),
            message: "negative price -500".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid line item 'item_3' on receipt 'r_001': negative price -500"
        );
    }

    #[test]
    fn test_invalid_work_hours_displays_cast() {
        let error = EngineError::InvalidWorkHours {
            cast_id: "cast_7".to_string(),
            message: "hours cannot be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid work hours for cast 'cast_7': hours cannot be negative"
        );
    }

    #[test]
    fn test_invalid_pay_period_displays_dates() {
        let error = EngineError::InvalidPayPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid pay period: 2026-03-31 is after 2026-03-01"
        );
    }

    #[test]
    fn test_duplicate_compensation_type_displays_id() {
        let error = EngineError::DuplicateCompensationType {
            type_id: "ct_1".to_string(),
        };
        assert_eq!(error.to_string(), "Duplicate compensation type: ct_1");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_item() -> EngineResult<()> {
            Err(EngineError::InvalidLineItem {
                receipt_id: "r".to_string(),
                item_id: "i".to_string(),
                message: "negative quantity".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_item()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
