//! Per-slot validation results

use serde::{Deserialize, Serialize};

pub const MSG_REQUIRED: &str = "Value is required";
pub const MSG_NOT_A_NUMBER: &str = "Value must be a number";
pub const MSG_NOT_WHOLE: &str = "Value must be a whole number";
pub const MSG_NEGATIVE: &str = "Value must not be negative";
pub const MSG_NOT_A_DATE: &str = "Value must be a valid date";
pub const MSG_NOT_AN_OPTION: &str = "Value must be a valid option";
pub const MSG_NOT_A_REFERENCE: &str = "Value must be a valid record reference";
pub const MSG_UNSUPPORTED_OPERATOR: &str = "Operator is not supported for this column";

/// Outcome for one value slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub error: bool,
    pub error_message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            error: true,
            error_message: message.into(),
        }
    }

    /// Build from a check returning the failure message, if any
    pub fn from_check(check: Option<&str>) -> Self {
        check.map(Self::invalid).unwrap_or_default()
    }
}

/// True when any slot of any result is an error
pub fn has_errors(results: &[ValidationResult]) -> bool {
    results.iter().any(|r| r.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_check() {
        assert_eq!(ValidationResult::from_check(None), ValidationResult::valid());
        let result = ValidationResult::from_check(Some(MSG_REQUIRED));
        assert!(result.error);
        assert_eq!(result.error_message, "Value is required");
    }

    #[test]
    fn test_has_errors() {
        assert!(!has_errors(&[ValidationResult::valid(), ValidationResult::valid()]));
        assert!(has_errors(&[
            ValidationResult::valid(),
            ValidationResult::invalid(MSG_NOT_A_NUMBER)
        ]));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ValidationResult::invalid(MSG_REQUIRED)).unwrap();
        assert_eq!(value["errorMessage"], "Value is required");
        assert_eq!(value["error"], true);
    }
}
