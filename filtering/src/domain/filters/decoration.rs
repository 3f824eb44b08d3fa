//! Serialization-boundary rewriting
//!
//! Conditions keep an editor-canonical operator and value. Decoration turns
//! them into what the query layer expects (wildcards, In/NotIn, name-suffixed
//! attributes) and undecoration reverses it when hydrating.

use super::column::DataType;
use super::expression::WireValue;
use super::operators::{Operator, OperatorCategory};
use super::variants::ConditionKind;

/// Query-layer operator and value for a canonical condition
pub fn decorate(
    kind: ConditionKind,
    operator: Operator,
    value: &WireValue,
    wildcard: &str,
) -> (Operator, WireValue) {
    if operator.is_pattern() {
        let value = match value {
            WireValue::Scalar(s) => WireValue::Scalar(wrap_wildcards(operator, s, wildcard)),
            other => other.clone(),
        };
        return (operator, value);
    }

    if kind.rewrites_multi_value()
        && let Some(multi) = operator.multi_valued()
        && let WireValue::List(items) = value
    {
        return match items.as_slice() {
            [Some(single)] => (operator, WireValue::Scalar(single.clone())),
            [_, _, ..] => (multi, value.clone()),
            _ => (operator, value.clone()),
        };
    }

    (operator, value.clone())
}

/// Canonical operator and value for a query-layer condition
pub fn undecorate(
    kind: ConditionKind,
    operator: Operator,
    value: WireValue,
    wildcard: &str,
) -> (Operator, WireValue) {
    if operator.is_pattern() {
        let value = match value {
            WireValue::Scalar(s) => WireValue::Scalar(strip_wildcards(operator, &s, wildcard)),
            other => other,
        };
        return (operator, value);
    }

    if !kind.rewrites_multi_value() {
        return (operator, value);
    }

    let operator = operator.single_valued().unwrap_or(operator);
    let list_operator = matches!(
        operator.category(),
        OperatorCategory::Equality | OperatorCategory::MultiValue
    );
    let value = match value {
        WireValue::Scalar(s) if list_operator => WireValue::list([s]),
        other => other,
    };
    (operator, value)
}

/// Pattern operators on these columns search the name-suffixed shadow attribute
pub fn uses_name_attribute(data_type: DataType, operator: Operator) -> bool {
    operator.is_pattern() && data_type.has_name_shadow()
}

/// Attribute name with the shadow suffix removed, when it carries one
pub fn strip_name_suffix<'a>(attribute: &'a str, suffix: &str) -> &'a str {
    attribute
        .strip_suffix(suffix)
        .filter(|base| !base.is_empty())
        .unwrap_or(attribute)
}

fn wrap_wildcards(operator: Operator, value: &str, wildcard: &str) -> String {
    let (leading, trailing) = operator.wildcard_sides();
    let mut wrapped = String::with_capacity(value.len() + 2 * wildcard.len());
    if leading {
        wrapped.push_str(wildcard);
    }
    wrapped.push_str(value);
    if trailing {
        wrapped.push_str(wildcard);
    }
    wrapped
}

fn strip_wildcards(operator: Operator, value: &str, wildcard: &str) -> String {
    let (leading, trailing) = operator.wildcard_sides();
    let mut stripped = value;
    if leading {
        stripped = stripped.strip_prefix(wildcard).unwrap_or(stripped);
    }
    if trailing {
        stripped = stripped.strip_suffix(wildcard).unwrap_or(stripped);
    }
    stripped.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begins_with_wraps_trailing_wildcard() {
        let (op, value) = decorate(
            ConditionKind::Text,
            Operator::BeginsWith,
            &WireValue::scalar("foo"),
            "%",
        );
        assert_eq!(op, Operator::BeginsWith);
        assert_eq!(value, WireValue::scalar("foo%"));

        let (op, value) = undecorate(ConditionKind::Text, Operator::BeginsWith, value, "%");
        assert_eq!(op, Operator::BeginsWith);
        assert_eq!(value, WireValue::scalar("foo"));
    }

    #[test]
    fn test_like_wraps_both_sides() {
        let (_, value) = decorate(
            ConditionKind::Text,
            Operator::NotLike,
            &WireValue::scalar("a"),
            "%",
        );
        assert_eq!(value, WireValue::scalar("%a%"));
        let (_, value) = decorate(
            ConditionKind::Text,
            Operator::EndsWith,
            &WireValue::scalar("a"),
            "%",
        );
        assert_eq!(value, WireValue::scalar("%a"));
    }

    #[test]
    fn test_strip_leaves_unwrapped_values() {
        let (_, value) = undecorate(
            ConditionKind::Text,
            Operator::Like,
            WireValue::scalar("abc"),
            "%",
        );
        assert_eq!(value, WireValue::scalar("abc"));
        let (_, value) = undecorate(
            ConditionKind::Text,
            Operator::EndsWith,
            WireValue::scalar("%abc%"),
            "%",
        );
        assert_eq!(value, WireValue::scalar("abc%"));
    }

    #[test]
    fn test_multi_value_rewrite() {
        let two = WireValue::list(["1", "2"]);
        let (op, value) = decorate(ConditionKind::OptionSet, Operator::Equal, &two, "%");
        assert_eq!(op, Operator::In);
        assert_eq!(value, two);

        let (op, value) = decorate(ConditionKind::Lookup, Operator::DoesNotEqual, &two, "%");
        assert_eq!(op, Operator::NotIn);
        assert_eq!(value, two);

        let (op, value) = decorate(
            ConditionKind::OptionSet,
            Operator::Equal,
            &WireValue::list(["1"]),
            "%",
        );
        assert_eq!(op, Operator::Equal);
        assert_eq!(value, WireValue::scalar("1"));
    }

    #[test]
    fn test_text_is_never_rewritten() {
        let two = WireValue::list(["a", "b"]);
        let (op, _) = decorate(ConditionKind::Text, Operator::Equal, &two, "%");
        assert_eq!(op, Operator::Equal);
    }

    #[test]
    fn test_in_normalized_to_equal() {
        let (op, value) = undecorate(
            ConditionKind::Lookup,
            Operator::In,
            WireValue::list(["a", "b"]),
            "%",
        );
        assert_eq!(op, Operator::Equal);
        assert_eq!(value, WireValue::list(["a", "b"]));

        let (op, value) = undecorate(
            ConditionKind::OptionSet,
            Operator::Equal,
            WireValue::scalar("3"),
            "%",
        );
        assert_eq!(op, Operator::Equal);
        assert_eq!(value, WireValue::list(["3"]));
    }

    #[test]
    fn test_name_attribute() {
        assert!(uses_name_attribute(DataType::Owner, Operator::Like));
        assert!(uses_name_attribute(DataType::TwoOptions, Operator::BeginsWith));
        assert!(!uses_name_attribute(DataType::Owner, Operator::Equal));
        assert!(!uses_name_attribute(DataType::Text, Operator::Like));

        assert_eq!(strip_name_suffix("ownername", "name"), "owner");
        assert_eq!(strip_name_suffix("name", "name"), "name");
        assert_eq!(strip_name_suffix("owner", "name"), "owner");
    }
}
