//! Date-only and date-time columns

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::{Operator, OperatorCategory};
use super::super::validation::{MSG_NEGATIVE, MSG_NOT_A_DATE, ValidationResult};
use super::super::value::ControlValue;
use super::number::check_number;
use super::{
    ConditionStrategy, format_date, format_number, parse_date, parse_number, validate_slots,
};

pub(crate) struct DateStrategy;

const OPERATORS: &[Operator] = &[
    Operator::Equal,
    Operator::DoesNotEqual,
    Operator::On,
    Operator::NotOn,
    Operator::OnOrBefore,
    Operator::OnOrAfter,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
    Operator::Between,
    Operator::NotBetween,
    Operator::Yesterday,
    Operator::Today,
    Operator::Tomorrow,
    Operator::Last7Days,
    Operator::Next7Days,
    Operator::LastWeek,
    Operator::ThisWeek,
    Operator::NextWeek,
    Operator::LastMonth,
    Operator::ThisMonth,
    Operator::NextMonth,
    Operator::LastYear,
    Operator::ThisYear,
    Operator::NextYear,
    Operator::LastXHours,
    Operator::NextXHours,
    Operator::LastXDays,
    Operator::NextXDays,
    Operator::LastXWeeks,
    Operator::NextXWeeks,
    Operator::LastXMonths,
    Operator::NextXMonths,
    Operator::LastXYears,
    Operator::NextXYears,
    Operator::OlderThanXMonths,
    Operator::ContainsData,
    Operator::DoesNotContainData,
];

fn is_count(operator: Operator) -> bool {
    operator.category() == OperatorCategory::RelativeCount
}

impl ConditionStrategy for DateStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, operator: Operator, _column: &Column) -> Option<DataType> {
        if is_count(operator) {
            Some(DataType::WholeNumber)
        } else {
            Some(DataType::DateOnly)
        }
    }

    fn encode(&self, operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        if is_count(operator) {
            return match value {
                ControlValue::Number(n) => WireValue::scalar(format_number(*n)),
                ControlValue::Text(s) => WireValue::scalar(s.trim()),
                _ => WireValue::Null,
            };
        }
        if operator.is_range() {
            return match value {
                ControlValue::DateRange([from, to]) => {
                    WireValue::range(from.as_ref().map(format_date), to.as_ref().map(format_date))
                }
                ControlValue::Date(d) => WireValue::range(Some(format_date(d)), None),
                ControlValue::Text(s) => WireValue::range(Some(s.trim().to_string()), None),
                _ => WireValue::Null,
            };
        }
        match value {
            ControlValue::Date(d) => WireValue::scalar(format_date(d)),
            ControlValue::Text(s) => WireValue::scalar(s.trim()),
            ControlValue::DateRange([Some(from), _]) => WireValue::scalar(format_date(from)),
            _ => WireValue::Null,
        }
    }

    fn decode(&self, operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        if operator.is_range() {
            let [from, to] = wire.slots();
            return ControlValue::DateRange([from.and_then(parse_date), to.and_then(parse_date)]);
        }
        let Some(value) = wire.values().first().copied() else {
            return ControlValue::Null;
        };
        if is_count(operator) {
            return parse_number(value)
                .map(ControlValue::Number)
                .unwrap_or_else(|| ControlValue::text(value));
        }
        parse_date(value)
            .map(ControlValue::Date)
            .unwrap_or_else(|| ControlValue::text(value))
    }

    fn validate(
        &self,
        operator: Operator,
        wire: &WireValue,
        _column: &Column,
    ) -> Vec<ValidationResult> {
        if is_count(operator) {
            return validate_slots(operator, wire, |value| {
                check_number(value, true).or_else(|| {
                    parse_number(value)
                        .filter(|n| *n < 0.0)
                        .map(|_| MSG_NEGATIVE)
                })
            });
        }
        validate_slots(operator, wire, |value| match parse_date(value) {
            Some(_) => None,
            None => Some(MSG_NOT_A_DATE),
        })
    }
}
