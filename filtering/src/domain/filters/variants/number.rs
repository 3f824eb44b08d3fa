//! Whole, decimal, floating point and currency columns

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::{MSG_NOT_A_NUMBER, MSG_NOT_WHOLE, ValidationResult};
use super::super::value::ControlValue;
use super::{ConditionStrategy, format_number, parse_number, validate_slots};

pub(crate) struct NumberStrategy;

const OPERATORS: &[Operator] = &[
    Operator::Equal,
    Operator::DoesNotEqual,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
    Operator::Between,
    Operator::NotBetween,
    Operator::ContainsData,
    Operator::DoesNotContainData,
];

impl ConditionStrategy for NumberStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, _operator: Operator, column: &Column) -> Option<DataType> {
        Some(column.data_type)
    }

    fn encode(&self, operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        if operator.is_range() {
            return match value {
                ControlValue::NumberRange([from, to]) => {
                    WireValue::range(from.map(format_number), to.map(format_number))
                }
                ControlValue::Number(n) => WireValue::range(Some(format_number(*n)), None),
                ControlValue::Text(s) => WireValue::range(Some(s.trim().to_string()), None),
                _ => WireValue::Null,
            };
        }
        match value {
            ControlValue::Number(n) => WireValue::scalar(format_number(*n)),
            ControlValue::Text(s) => WireValue::scalar(s.trim()),
            ControlValue::NumberRange([Some(from), _]) => WireValue::scalar(format_number(*from)),
            _ => WireValue::Null,
        }
    }

    fn decode(&self, operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        if operator.is_range() {
            let [from, to] = wire.slots();
            return ControlValue::NumberRange([
                from.and_then(parse_number),
                to.and_then(parse_number),
            ]);
        }
        match wire.values().first() {
            // Unparsable input stays visible to the editor as typed
            Some(s) => parse_number(s)
                .map(ControlValue::Number)
                .unwrap_or_else(|| ControlValue::text(*s)),
            None => ControlValue::Null,
        }
    }

    fn validate(
        &self,
        operator: Operator,
        wire: &WireValue,
        column: &Column,
    ) -> Vec<ValidationResult> {
        let whole = column.data_type.is_whole_number();
        validate_slots(operator, wire, |value| check_number(value, whole))
    }
}

pub(crate) fn check_number(value: &str, whole: bool) -> Option<&'static str> {
    match parse_number(value) {
        None => Some(MSG_NOT_A_NUMBER),
        Some(n) if whole && n.fract() != 0.0 => Some(MSG_NOT_WHOLE),
        Some(_) => None,
    }
}
