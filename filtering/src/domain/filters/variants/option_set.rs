//! Option set and two-option columns
//!
//! Equality operators pick from the column's options; pattern operators search
//! the option label as text.

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::{MSG_NOT_AN_OPTION, ValidationResult};
use super::super::value::ControlValue;
use super::{ConditionStrategy, is_list_operator, validate_list, validate_slots};

pub(crate) struct OptionSetStrategy;

const OPERATORS: &[Operator] = &[
    Operator::Equal,
    Operator::DoesNotEqual,
    Operator::Like,
    Operator::NotLike,
    Operator::BeginsWith,
    Operator::DoesNotBeginWith,
    Operator::EndsWith,
    Operator::DoesNotEndWith,
    Operator::ContainsData,
    Operator::DoesNotContainData,
];

impl ConditionStrategy for OptionSetStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, operator: Operator, _column: &Column) -> Option<DataType> {
        if operator.is_pattern() {
            Some(DataType::Text)
        } else {
            Some(DataType::MultiSelectOptionSet)
        }
    }

    fn encode(&self, operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        if operator.is_pattern() {
            return match value {
                ControlValue::Text(s) => WireValue::scalar(s.clone()),
                _ => WireValue::Null,
            };
        }
        encode_options(value)
    }

    fn decode(&self, operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        if operator.is_pattern() {
            return wire
                .as_scalar()
                .map(ControlValue::text)
                .unwrap_or_default();
        }
        decode_options(wire)
    }

    fn validate(
        &self,
        operator: Operator,
        wire: &WireValue,
        column: &Column,
    ) -> Vec<ValidationResult> {
        if is_list_operator(operator) {
            return validate_list(wire, |value| check_option(value, column));
        }
        validate_slots(operator, wire, |_| None)
    }

    fn rewrites_multi_value(&self) -> bool {
        true
    }
}

pub(crate) fn encode_options(value: &ControlValue) -> WireValue {
    match value {
        ControlValue::Options(values) => WireValue::list(values.iter().map(i32::to_string)),
        ControlValue::Number(n) if n.fract() == 0.0 => WireValue::list([(*n as i32).to_string()]),
        _ => WireValue::Null,
    }
}

pub(crate) fn decode_options(wire: &WireValue) -> ControlValue {
    if wire.is_null() {
        return ControlValue::Null;
    }
    ControlValue::Options(
        wire.values()
            .into_iter()
            .filter_map(|v| v.trim().parse::<i32>().ok())
            .collect(),
    )
}

/// Integer, and one of the column's options when the column lists them
pub(crate) fn check_option(value: &str, column: &Column) -> Option<&'static str> {
    match value.parse::<i32>() {
        Ok(v) if column.metadata.options.is_empty() || column.has_option(v) => None,
        _ => Some(MSG_NOT_AN_OPTION),
    }
}

#[cfg(test)]
mod tests {
    use super::super::ConditionKind;
    use super::*;
    use crate::domain::filters::validation::MSG_REQUIRED;

    fn status() -> Column {
        Column::new("statuscode", DataType::OptionSet)
            .with_options([(1, "Active"), (2, "Inactive")])
    }

    #[test]
    fn test_equality_round_trip() {
        let value = ControlValue::Options(vec![1, 2]);
        let wire = ConditionKind::OptionSet.encode(Operator::Equal, &value, &status());
        assert_eq!(wire, WireValue::list(["1", "2"]));
        assert_eq!(ConditionKind::OptionSet.decode(Operator::Equal, &wire, &status()), value);
    }

    #[test]
    fn test_pattern_searches_label_text() {
        assert_eq!(
            ConditionKind::OptionSet.data_type(Operator::Like, &status()),
            Some(DataType::Text)
        );
        assert_eq!(
            ConditionKind::OptionSet.data_type(Operator::Equal, &status()),
            Some(DataType::MultiSelectOptionSet)
        );
        let wire = ConditionKind::OptionSet.encode(
            Operator::Like,
            &ControlValue::text("act"),
            &status(),
        );
        assert_eq!(wire, WireValue::scalar("act"));
        assert_eq!(
            ConditionKind::OptionSet.encode(
                Operator::Like,
                &ControlValue::Options(vec![1]),
                &status(),
            ),
            WireValue::Null
        );
    }

    #[test]
    fn test_validation() {
        let validate =
            |wire: WireValue| ConditionKind::OptionSet.validate(Operator::Equal, &wire, &status());
        assert_eq!(validate(WireValue::list(["1"])), vec![ValidationResult::valid()]);
        assert_eq!(
            validate(WireValue::list(["1", "7"])),
            vec![ValidationResult::invalid(MSG_NOT_AN_OPTION)]
        );
        assert_eq!(
            validate(WireValue::List(vec![])),
            vec![ValidationResult::invalid(MSG_REQUIRED)]
        );
    }

    #[test]
    fn test_two_options_share_strategy() {
        let column = Column::new("donotemail", DataType::TwoOptions)
            .with_options([(0, "Allow"), (1, "Do Not Allow")]);
        let wire = ConditionKind::for_data_type(column.data_type).encode(
            Operator::Equal,
            &ControlValue::Options(vec![0]),
            &column,
        );
        assert_eq!(wire, WireValue::list(["0"]));
    }
}
