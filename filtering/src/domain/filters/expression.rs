//! Filter expression wire types
//!
//! The shapes exchanged with the dataset query layer. Field names and operator
//! codes must match what that layer expects exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::operators::Operator;

/// Value carried by a condition on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    #[default]
    Null,
    Scalar(String),
    List(Vec<Option<String>>),
}

impl WireValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// List of present values
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Two-slot range value
    pub fn range(from: Option<String>, to: Option<String>) -> Self {
        Self::List(vec![from, to])
    }

    /// Null, empty string, or a list without any present entry
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(s) => s.is_empty(),
            Self::List(items) => items.iter().all(|item| item.as_deref().is_none_or(str::is_empty)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Present entries, treating a scalar as a one-element list
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Null => Vec::new(),
            Self::Scalar(s) => vec![s.as_str()],
            Self::List(items) => items.iter().flatten().map(String::as_str).collect(),
        }
    }

    /// Range slots, padded or truncated to exactly two
    pub fn slots(&self) -> [Option<&str>; 2] {
        match self {
            Self::Null => [None, None],
            Self::Scalar(s) => [Some(s.as_str()), None],
            Self::List(items) => [
                items.first().and_then(|s| s.as_deref()),
                items.get(1).and_then(|s| s.as_deref()),
            ],
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<&str> =
                    items.iter().map(|i| i.as_deref().unwrap_or("null")).collect();
                write!(f, "[{}]", parts.join(","))
            }
        }
    }
}

/// Single filter atom on one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionExpression {
    pub attribute_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_alias_name: Option<String>,
    #[serde(rename = "conditionOperator")]
    pub operator: Operator,
    #[serde(default)]
    pub value: WireValue,
}

impl ConditionExpression {
    pub fn new(attribute_name: impl Into<String>, operator: Operator, value: WireValue) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            entity_alias_name: None,
            operator,
            value,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.entity_alias_name = Some(alias.into());
        self
    }

    /// `alias.attribute` for joined attributes, else the bare attribute name
    pub fn qualified_name(&self) -> String {
        match &self.entity_alias_name {
            Some(alias) if !alias.is_empty() => format!("{}.{}", alias, self.attribute_name),
            _ => self.attribute_name.clone(),
        }
    }
}

/// Top-level boolean combinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BooleanOperator {
    #[default]
    And,
    Or,
}

impl TryFrom<u8> for BooleanOperator {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::And),
            1 => Ok(Self::Or),
            other => Err(format!("unknown filter operator code {}", other)),
        }
    }
}

impl From<BooleanOperator> for u8 {
    fn from(op: BooleanOperator) -> Self {
        match op {
            BooleanOperator::And => 0,
            BooleanOperator::Or => 1,
        }
    }
}

/// Composite filter handed to the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    #[serde(rename = "filterOperator", default)]
    pub boolean_operator: BooleanOperator,
    #[serde(default)]
    pub conditions: Vec<ConditionExpression>,
    /// Nested groups, carried through untouched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterExpression>,
}

impl FilterExpression {
    pub fn new(boolean_operator: BooleanOperator, conditions: Vec<ConditionExpression>) -> Self {
        Self {
            boolean_operator,
            conditions,
            filters: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_value_untagged_serde() {
        assert_eq!(serde_json::to_value(WireValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(WireValue::scalar("a")).unwrap(), json!("a"));
        assert_eq!(
            serde_json::to_value(WireValue::range(Some("1".into()), None)).unwrap(),
            json!(["1", null])
        );

        let v: WireValue = serde_json::from_value(json!(["x", "y"])).unwrap();
        assert_eq!(v, WireValue::list(["x", "y"]));
        let v: WireValue = serde_json::from_value(json!(null)).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_wire_value_slots_are_padded() {
        assert_eq!(WireValue::Null.slots(), [None, None]);
        assert_eq!(WireValue::list(["1"]).slots(), [Some("1"), None]);
        assert_eq!(WireValue::list(["1", "2", "3"]).slots(), [Some("1"), Some("2")]);
    }

    #[test]
    fn test_wire_value_is_empty() {
        assert!(WireValue::Null.is_empty());
        assert!(WireValue::scalar("").is_empty());
        assert!(WireValue::List(vec![None, None]).is_empty());
        assert!(!WireValue::List(vec![None, Some("2".into())]).is_empty());
    }

    #[test]
    fn test_condition_expression_json_shape() {
        let condition =
            ConditionExpression::new("ownername", Operator::Like, WireValue::scalar("%jo%"))
                .with_alias("acc");
        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            value,
            json!({
                "attributeName": "ownername",
                "entityAliasName": "acc",
                "conditionOperator": 6,
                "value": "%jo%"
            })
        );
        assert_eq!(condition.qualified_name(), "acc.ownername");
    }

    #[test]
    fn test_filter_expression_parse() {
        let json = r#"{
            "filterOperator": 1,
            "conditions": [
                {"attributeName": "amount", "conditionOperator": 10, "value": ["10", "20"]},
                {"attributeName": "name", "conditionOperator": 13}
            ]
        }"#;
        let expression: FilterExpression = serde_json::from_str(json).unwrap();
        assert_eq!(expression.boolean_operator, BooleanOperator::Or);
        assert_eq!(expression.conditions.len(), 2);
        assert_eq!(expression.conditions[1].value, WireValue::Null);
        assert!(expression.filters.is_empty());
    }

    #[test]
    fn test_filter_expression_rejects_unknown_operator() {
        let json = r#"{"filterOperator": 0, "conditions": [
            {"attributeName": "a", "conditionOperator": 500}
        ]}"#;
        assert!(serde_json::from_str::<FilterExpression>(json).is_err());
    }
}
