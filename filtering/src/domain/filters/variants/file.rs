//! File and image columns
//!
//! Only presence can be filtered; there is never an editor value.

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::ValidationResult;
use super::super::value::ControlValue;
use super::{ConditionStrategy, NULL_CHECKS};

pub(crate) struct FileStrategy;

impl ConditionStrategy for FileStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        &NULL_CHECKS
    }

    fn data_type(&self, _operator: Operator, _column: &Column) -> Option<DataType> {
        None
    }

    fn encode(&self, _operator: Operator, _value: &ControlValue, _column: &Column) -> WireValue {
        WireValue::Null
    }

    fn decode(&self, _operator: Operator, _wire: &WireValue, _column: &Column) -> ControlValue {
        ControlValue::Null
    }

    fn validate(
        &self,
        _operator: Operator,
        _wire: &WireValue,
        _column: &Column,
    ) -> Vec<ValidationResult> {
        vec![ValidationResult::valid()]
    }
}

#[cfg(test)]
mod tests {
    use super::super::ConditionKind;
    use super::*;
    use crate::domain::filters::validation::MSG_UNSUPPORTED_OPERATOR;

    #[test]
    fn test_file_never_has_editor() {
        let column = Column::new("attachment", DataType::File);
        for op in [Operator::Equal, Operator::ContainsData, Operator::Like] {
            assert_eq!(ConditionKind::File.data_type(op, &column), None);
        }
    }

    #[test]
    fn test_only_null_checks_validate() {
        let column = Column::new("photo", DataType::Image);
        assert_eq!(
            ConditionKind::File.validate(Operator::ContainsData, &WireValue::Null, &column),
            vec![ValidationResult::valid()]
        );
        assert_eq!(
            ConditionKind::File.validate(Operator::Equal, &WireValue::Null, &column),
            vec![ValidationResult::invalid(MSG_UNSUPPORTED_OPERATOR)]
        );
    }
}
