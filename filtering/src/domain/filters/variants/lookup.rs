//! Lookup (reference) columns
//!
//! Equality operators hold record ids; pattern operators search the related
//! record's primary name as text. Display names are not carried on the wire,
//! they are remembered on the condition once resolved.

use uuid::Uuid;

use super::super::column::{Column, DataType};
use super::super::expression::WireValue;
use super::super::operators::Operator;
use super::super::validation::{MSG_NOT_A_REFERENCE, ValidationResult};
use super::super::value::{ControlValue, LookupReference};
use super::{ConditionStrategy, validate_list, validate_slots};

pub(crate) struct LookupStrategy;

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

impl ConditionStrategy for LookupStrategy {
    fn supported_operators(&self) -> &'static [Operator] {
        OPERATORS
    }

    fn data_type(&self, operator: Operator, column: &Column) -> Option<DataType> {
        if operator.is_pattern() {
            Some(DataType::Text)
        } else {
            Some(column.data_type)
        }
    }

    fn encode(&self, operator: Operator, value: &ControlValue, _column: &Column) -> WireValue {
        if operator.is_pattern() {
            return match value {
                ControlValue::Text(s) => WireValue::scalar(s.clone()),
                _ => WireValue::Null,
            };
        }
        match value {
            ControlValue::References(refs) if !refs.is_empty() => {
                WireValue::list(refs.iter().map(|r| normalize_id(&r.id)))
            }
            // Search text never becomes an id
            _ => WireValue::Null,
        }
    }

    fn decode(&self, operator: Operator, wire: &WireValue, _column: &Column) -> ControlValue {
        if operator.is_pattern() {
            return wire
                .as_scalar()
                .map(ControlValue::text)
                .unwrap_or_default();
        }
        if wire.is_null() {
            return ControlValue::Null;
        }
        ControlValue::References(
            wire.values()
                .into_iter()
                .map(|id| LookupReference::bare(normalize_id(id)))
                .collect(),
        )
    }

    fn validate(
        &self,
        operator: Operator,
        wire: &WireValue,
        _column: &Column,
    ) -> Vec<ValidationResult> {
        if operator.is_pattern() {
            return validate_slots(operator, wire, |_| None);
        }
        validate_list(wire, |id| match Uuid::parse_str(id) {
            Ok(_) => None,
            Err(_) => Some(MSG_NOT_A_REFERENCE),
        })
    }

    fn rewrites_multi_value(&self) -> bool {
        true
    }
}

/// Ids compare case-insensitively and may arrive wrapped in braces
fn normalize_id(id: &str) -> String {
    id.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_lowercase()
}

/// Fill bare references from ones resolved earlier for the same ids
pub fn merge_remembered_references(
    decoded: ControlValue,
    remembered: Option<&ControlValue>,
) -> ControlValue {
    match (decoded, remembered) {
        (ControlValue::References(refs), Some(ControlValue::References(known))) => {
            ControlValue::References(
                refs.into_iter()
                    .map(|r| {
                        known
                            .iter()
                            .find(|k| k.is_resolved() && normalize_id(&k.id) == r.id)
                            .cloned()
                            .unwrap_or(r)
                    })
                    .collect(),
            )
        }
        (decoded, _) => decoded,
    }
}

#[cfg(test)]
mod tests {
    use super::super::ConditionKind;
    use super::*;
    use crate::domain::filters::validation::MSG_REQUIRED;

    const ID: &str = "6f9619ff-8b86-d011-b42d-00c04fc964ff";

    fn owner() -> Column {
        Column::new("owner", DataType::Owner).with_targets(["systemuser", "team"])
    }

    #[test]
    fn test_references_encode_to_ids() {
        let value = ControlValue::References(vec![LookupReference::resolved(
            ID,
            "systemuser",
            Some("Ada".into()),
        )]);
        let wire = ConditionKind::Lookup.encode(Operator::Equal, &value, &owner());
        assert_eq!(wire, WireValue::list([ID]));
        assert_eq!(
            ConditionKind::Lookup.decode(Operator::Equal, &wire, &owner()),
            ControlValue::References(vec![LookupReference::bare(ID)])
        );
    }

    #[test]
    fn test_braced_upper_case_ids_normalized() {
        let wire = WireValue::scalar(format!("{{{}}}", ID.to_uppercase()));
        assert_eq!(
            ConditionKind::Lookup.decode(Operator::Equal, &wire, &owner()),
            ControlValue::References(vec![LookupReference::bare(ID)])
        );
    }

    #[test]
    fn test_merge_remembered_references() {
        let decoded = ControlValue::References(vec![
            LookupReference::bare(ID),
            LookupReference::bare("other"),
        ]);
        let remembered = ControlValue::References(vec![LookupReference::resolved(
            ID,
            "team",
            Some("Sales".into()),
        )]);
        let merged = merge_remembered_references(decoded, Some(&remembered));
        let ControlValue::References(refs) = merged else {
            panic!("expected references");
        };
        assert_eq!(refs[0].name.as_deref(), Some("Sales"));
        assert!(!refs[1].is_resolved());
    }

    #[test]
    fn test_pattern_is_text() {
        assert_eq!(ConditionKind::Lookup.data_type(Operator::Like, &owner()), Some(DataType::Text));
        assert_eq!(
            ConditionKind::Lookup.data_type(Operator::Equal, &owner()),
            Some(DataType::Owner)
        );
        let refs = ControlValue::References(vec![LookupReference::bare(ID)]);
        assert_eq!(ConditionKind::Lookup.encode(Operator::Like, &refs, &owner()), WireValue::Null);
        assert_eq!(
            ConditionKind::Lookup.encode(Operator::Equal, &ControlValue::text("Ada"), &owner()),
            WireValue::Null
        );
    }

    #[test]
    fn test_validation() {
        let validate =
            |wire: WireValue| ConditionKind::Lookup.validate(Operator::Equal, &wire, &owner());
        assert_eq!(validate(WireValue::list([ID])), vec![ValidationResult::valid()]);
        assert_eq!(
            validate(WireValue::list(["not-a-guid"])),
            vec![ValidationResult::invalid(MSG_NOT_A_REFERENCE)]
        );
        assert_eq!(validate(WireValue::Null), vec![ValidationResult::invalid(MSG_REQUIRED)]);
    }
}
