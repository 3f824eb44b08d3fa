//! Editor-facing control values

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resolved or bare reference to a related record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LookupReference {
    /// Reference known only by id
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: None,
            name: None,
        }
    }

    pub fn resolved(
        id: impl Into<String>,
        entity_type: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type: Some(entity_type.into()),
            name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.entity_type.is_some()
    }
}

/// Value shape handed to and received from an editor control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    NumberRange([Option<f64>; 2]),
    Date(NaiveDate),
    DateRange([Option<NaiveDate>; 2]),
    Options(Vec<i32>),
    References(Vec<LookupReference>),
}

impl ControlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Unresolved references the metadata service should look up
    pub fn unresolved_references(&self) -> Vec<&LookupReference> {
        match self {
            Self::References(refs) => refs.iter().filter(|r| !r.is_resolved()).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_control_value_tagged_serde() {
        let value = ControlValue::NumberRange([Some(10.0), None]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"type": "number_range", "value": [10.0, null]})
        );

        let parsed: ControlValue =
            serde_json::from_value(json!({"type": "date", "value": "2024-03-01"})).unwrap();
        assert_eq!(
            parsed,
            ControlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );

        let parsed: ControlValue = serde_json::from_value(json!({"type": "null"})).unwrap();
        assert!(parsed.is_null());
    }

    #[test]
    fn test_unresolved_references() {
        let value = ControlValue::References(vec![
            LookupReference::bare("a"),
            LookupReference::resolved("b", "account", Some("Contoso".into())),
        ]);
        let unresolved = value.unresolved_references();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].id, "a");
        assert!(ControlValue::text("x").unresolved_references().is_empty());
    }
}
