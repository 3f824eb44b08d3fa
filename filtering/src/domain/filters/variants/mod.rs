//! Per-data-type condition strategies
//!
//! Each column data type maps to one strategy implementing encode, decode,
//! editor type selection, and validation. `ConditionKind` is the dispatch
//! table; it also applies the rules every strategy shares (value-less
//! operators, unsupported operators, range slot counts).

mod date;
mod file;
mod lookup;
mod multi_select;
mod number;
mod option_set;
mod text;

use chrono::{DateTime, NaiveDate};

use super::column::{Column, DataType};
use super::expression::WireValue;
use super::operators::{Operator, OperatorCategory};
use super::validation::{MSG_REQUIRED, MSG_UNSUPPORTED_OPERATOR, ValidationResult};
use super::value::ControlValue;

pub use lookup::merge_remembered_references;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Type-specific behaviour of a condition
pub(crate) trait ConditionStrategy: Send + Sync {
    /// Operators the editor may choose for this data type
    fn supported_operators(&self) -> &'static [Operator];

    /// Editor data type for a value-taking operator
    fn data_type(&self, operator: Operator, column: &Column) -> Option<DataType>;

    /// Control value to undecorated wire value
    fn encode(&self, operator: Operator, value: &ControlValue, column: &Column) -> WireValue;

    /// Undecorated wire value to control value
    fn decode(&self, operator: Operator, wire: &WireValue, column: &Column) -> ControlValue;

    /// Validate a value-taking operator's wire value
    fn validate(&self, operator: Operator, wire: &WireValue, column: &Column)
    -> Vec<ValidationResult>;

    /// Equal/DoesNotEqual become In/NotIn on the wire when multi-valued
    fn rewrites_multi_value(&self) -> bool {
        false
    }
}

/// Strategy selector keyed by column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Text,
    Number,
    Date,
    OptionSet,
    MultiSelectOptionSet,
    Lookup,
    File,
}

impl ConditionKind {
    pub fn for_data_type(data_type: DataType) -> Self {
        match data_type {
            DataType::Text
            | DataType::Email
            | DataType::Phone
            | DataType::Url
            | DataType::MultilineText => Self::Text,
            DataType::WholeNumber
            | DataType::Decimal
            | DataType::FloatingPoint
            | DataType::Currency => Self::Number,
            DataType::DateOnly | DataType::DateAndTime => Self::Date,
            DataType::OptionSet | DataType::TwoOptions => Self::OptionSet,
            DataType::MultiSelectOptionSet => Self::MultiSelectOptionSet,
            DataType::Lookup | DataType::Customer | DataType::Owner | DataType::Regarding => {
                Self::Lookup
            }
            DataType::File | DataType::Image => Self::File,
        }
    }

    fn strategy(self) -> &'static dyn ConditionStrategy {
        match self {
            Self::Text => &text::TextStrategy,
            Self::Number => &number::NumberStrategy,
            Self::Date => &date::DateStrategy,
            Self::OptionSet => &option_set::OptionSetStrategy,
            Self::MultiSelectOptionSet => &multi_select::MultiSelectStrategy,
            Self::Lookup => &lookup::LookupStrategy,
            Self::File => &file::FileStrategy,
        }
    }

    pub fn supported_operators(self) -> &'static [Operator] {
        self.strategy().supported_operators()
    }

    pub fn supports(self, operator: Operator) -> bool {
        self.supported_operators().contains(&operator)
    }

    pub fn rewrites_multi_value(self) -> bool {
        self.strategy().rewrites_multi_value()
    }

    /// Editor data type, `None` when the operator takes no value
    pub fn data_type(self, operator: Operator, column: &Column) -> Option<DataType> {
        if operator.is_value_less() || !self.supports(operator) {
            return None;
        }
        self.strategy().data_type(operator, column)
    }

    pub fn encode(self, operator: Operator, value: &ControlValue, column: &Column) -> WireValue {
        if operator.is_value_less() {
            return WireValue::Null;
        }
        self.strategy().encode(operator, value, column)
    }

    pub fn decode(self, operator: Operator, wire: &WireValue, column: &Column) -> ControlValue {
        if operator.is_value_less() {
            return ControlValue::Null;
        }
        self.strategy().decode(operator, wire, column)
    }

    /// One result per value slot: two for range operators, one otherwise
    pub fn validate(
        self,
        operator: Operator,
        wire: &WireValue,
        column: &Column,
    ) -> Vec<ValidationResult> {
        if !self.supports(operator) {
            return vec![ValidationResult::invalid(MSG_UNSUPPORTED_OPERATOR); slot_count(operator)];
        }
        if operator.is_value_less() {
            return vec![ValidationResult::valid()];
        }
        self.strategy().validate(operator, wire, column)
    }
}

pub(crate) fn slot_count(operator: Operator) -> usize {
    if operator.is_range() { 2 } else { 1 }
}

/// Shortest decimal rendering, `10` rather than `10.0`
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Validate scalar or range slots with a per-value check
pub(crate) fn validate_slots<F>(
    operator: Operator,
    wire: &WireValue,
    check: F,
) -> Vec<ValidationResult>
where
    F: Fn(&str) -> Option<&'static str>,
{
    let check_slot = |slot: Option<&str>| match slot.map(str::trim) {
        None | Some("") => ValidationResult::invalid(MSG_REQUIRED),
        Some(value) => ValidationResult::from_check(check(value)),
    };

    if operator.is_range() {
        let [from, to] = wire.slots();
        return vec![check_slot(from), check_slot(to)];
    }
    let scalar = match wire {
        WireValue::List(_) => wire.values().first().copied(),
        _ => wire.as_scalar(),
    };
    vec![check_slot(scalar)]
}

/// Validate a list value as a whole: required, then every entry checked
pub(crate) fn validate_list<F>(wire: &WireValue, check: F) -> Vec<ValidationResult>
where
    F: Fn(&str) -> Option<&'static str>,
{
    if wire.is_empty() {
        return vec![ValidationResult::invalid(MSG_REQUIRED)];
    }
    let failure = wire.values().into_iter().find_map(|value| check(value.trim()));
    vec![ValidationResult::from_check(failure)]
}

/// Operators taking a list of scalars under multi-value rewriting
pub(crate) fn is_list_operator(operator: Operator) -> bool {
    matches!(
        operator.category(),
        OperatorCategory::Equality | OperatorCategory::MultiValue
    )
}

/// Value-less operators every variant accepts
pub(crate) const NULL_CHECKS: [Operator; 2] =
    [Operator::ContainsData, Operator::DoesNotContainData];
