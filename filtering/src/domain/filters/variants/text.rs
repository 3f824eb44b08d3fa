//! Text columns

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::ValidationResult;
use super::super::value::ControlValue;
use super::{ConditionStrategy, format_date, format_number, validate_slots};

pub(crate) struct TextStrategy;

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

impl ConditionStrategy for TextStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, _operator: Operator, column: &Column) -> Option<DataType> {
        if column.metadata.multiline || column.data_type == DataType::MultilineText {
            Some(DataType::MultilineText)
        } else {
            Some(DataType::Text)
        }
    }

    fn encode(&self, _operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        match value {
            ControlValue::Text(s) => WireValue::scalar(s.clone()),
            ControlValue::Number(n) => WireValue::scalar(format_number(*n)),
            ControlValue::Date(d) => WireValue::scalar(format_date(d)),
            _ => WireValue::Null,
        }
    }

    fn decode(&self, _operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        wire.values()
            .first()
            .map(|s| ControlValue::text(*s))
            .unwrap_or_default()
    }

    fn validate(
        &self,
        operator: Operator,
        wire: &WireValue,
        _column: &Column,
    ) -> Vec<ValidationResult> {
        validate_slots(operator, wire, |_| None)
    }
}
