//! Multi-select option set columns

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::ValidationResult;
use super::super::value::ControlValue;
use super::option_set::{check_option, decode_options, encode_options};
use super::{ConditionStrategy, validate_list};

pub(crate) struct MultiSelectStrategy;

const OPERATORS: &[Operator] = &[
    Operator::Equal,
    Operator::DoesNotEqual,
    Operator::ContainValues,
    Operator::DoesNotContainValues,
    Operator::ContainsData,
    Operator::DoesNotContainData,
];

impl ConditionStrategy for MultiSelectStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, _operator: Operator, _column: &Column) -> Option<DataType> {
        Some(DataType::MultiSelectOptionSet)
    }

    fn encode(&self, _operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        encode_options(value)
    }

    fn decode(&self, _operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        decode_options(wire)
    }

    fn validate(
        &self,
        _operator: Operator,
        wire: &WireValue,
        column: &Column,
    ) -> Vec<ValidationResult> {
        validate_list(wire, |value| check_option(value, column))
    }

    fn rewrites_multi_value(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::ConditionKind;
    use super::*;
    use crate::domain::filters::validation::MSG_NOT_AN_OPTION;

    fn hobbies() -> Column {
        Column::new("hobbies", DataType::MultiSelectOptionSet)
            .with_options([(10, "Chess"), (20, "Golf")])
    }

    #[test]
    fn test_contain_values_round_trip() {
        let value = ControlValue::Options(vec![10, 20]);
        let wire = ConditionKind::MultiSelectOptionSet.encode(
            Operator::ContainValues,
            &value,
            &hobbies(),
        );
        assert_eq!(wire, WireValue::list(["10", "20"]));
        assert_eq!(
            ConditionKind::MultiSelectOptionSet.decode(Operator::ContainValues, &wire, &hobbies()),
            value
        );
    }

    #[test]
    fn test_pattern_operators_not_offered() {
        assert!(!ConditionKind::MultiSelectOptionSet.supports(Operator::Like));
        assert_eq!(ConditionKind::MultiSelectOptionSet.data_type(Operator::Like, &hobbies()), None);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let results = ConditionKind::MultiSelectOptionSet.validate(
            Operator::Equal,
            &WireValue::list(["30"]),
            &hobbies(),
        );
        assert_eq!(results, vec![ValidationResult::invalid(MSG_NOT_AN_OPTION)]);
    }
}
