//! All conditions of one column
//!
//! Synthesizes the column's slice of the filter expression and rebuilds its
//! conditions from scratch whenever the dataset expression changes.

use std::collections::HashMap;
use std::sync::Arc;

use super::column::Column;
use super::condition::Condition;
use super::context::FilterContext;
use super::decoration::{strip_name_suffix, undecorate, uses_name_attribute};
use super::expression::{ConditionExpression, FilterExpression, WireValue};
use super::operators::Operator;
use super::variants::ConditionKind;

#[derive(Debug)]
pub struct ColumnFilter {
    column: Arc<Column>,
    kind: ConditionKind,
    context: FilterContext,
    conditions: Vec<Condition>,
}

impl ColumnFilter {
    pub fn new(column: Column, context: FilterContext) -> Self {
        let kind = ConditionKind::for_data_type(column.data_type);
        Self {
            column: Arc::new(column),
            kind,
            context,
            conditions: Vec::new(),
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Register a default condition (Equal, no value)
    pub fn add_condition(&mut self) -> Condition {
        let id = uuid::Uuid::new_v4().to_string();
        let condition = Condition::fresh(id, self.column.clone(), self.context.clone());
        tracing::trace!(column = %self.column.name, id = %condition.id(), "Condition added");
        self.conditions.push(condition.clone());
        condition
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id() == id)
    }

    pub fn remove_condition(&mut self, id: &str) -> Option<Condition> {
        let index = self.conditions.iter().position(|c| c.id() == id)?;
        Some(self.conditions.remove(index))
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    /// Discard every condition and re-derive them from `expression`
    ///
    /// Only top-level conditions addressing this column with an operator the
    /// column supports are taken; everything else is skipped silently.
    pub fn rebuild(&mut self, expression: &FilterExpression) {
        self.conditions.clear();
        let alias = self.column.alias();
        let mut occurrences: HashMap<String, usize> = HashMap::new();

        for entry in &expression.conditions {
            let Some((operator, value)) = self.match_entry(entry) else {
                continue;
            };
            let base = condition_id(alias, operator, &value);
            let seen = occurrences.entry(base.clone()).or_default();
            let id = if *seen == 0 {
                base
            } else {
                format!("{}-{}", base, seen)
            };
            *seen += 1;

            self.conditions.push(Condition::hydrated(
                id,
                self.column.clone(),
                self.context.clone(),
                operator,
                value,
            ));
        }

        tracing::debug!(
            column = %alias,
            scanned = expression.conditions.len(),
            hydrated = self.conditions.len(),
            "Column filter rebuilt"
        );
    }

    /// True when `entry` addresses this column, whatever its operator
    pub fn claims(&self, entry: &ConditionExpression) -> bool {
        if !uses_name_attribute(self.column.data_type, entry.operator) {
            return entry.qualified_name() == self.column.alias();
        }
        let suffix = &self.context.settings.name_suffix;
        let stripped = ConditionExpression {
            attribute_name: strip_name_suffix(&entry.attribute_name, suffix).to_string(),
            ..entry.clone()
        };
        stripped.qualified_name() == self.column.alias()
    }

    /// Canonical operator and value when `entry` belongs to this column
    fn match_entry(&self, entry: &ConditionExpression) -> Option<(Operator, WireValue)> {
        if !self.claims(entry) {
            return None;
        }

        let settings = &self.context.settings;

        let (operator, value) =
            undecorate(self.kind, entry.operator, entry.value.clone(), &settings.wildcard);
        if !self.kind.supports(operator) {
            tracing::trace!(
                column = %self.column.name,
                operator = %operator,
                "Skipping condition with unsupported operator"
            );
            return None;
        }
        Some((operator, value))
    }

    /// Live conditions as query-layer condition expressions
    pub fn expression_conditions(&self) -> Vec<ConditionExpression> {
        let suffix = &self.context.settings.name_suffix;
        self.conditions
            .iter()
            .map(|condition| {
                let (operator, value) = condition.decorated();
                let mut attribute = self.column.attribute_name().to_string();
                if uses_name_attribute(self.column.data_type, operator) {
                    attribute.push_str(suffix);
                }
                let expression = ConditionExpression::new(attribute, operator, value);
                match self.column.entity_alias() {
                    Some(alias) => expression.with_alias(alias),
                    None => expression,
                }
            })
            .collect()
    }

    /// True when some condition came from the dataset's live expression
    pub fn is_applied_to_dataset(&self) -> bool {
        self.conditions.iter().any(Condition::is_hydrated)
    }

    /// Ids of conditions whose validation reports an error
    pub fn invalid_condition_ids(&self) -> Vec<String> {
        self.conditions
            .iter()
            .filter(|c| !c.is_valid())
            .map(|c| c.id().to_string())
            .collect()
    }
}

/// Value-stable id of a hydrated condition
fn condition_id(alias: &str, operator: Operator, value: &WireValue) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(alias.as_bytes());
    hasher.update(&operator.code().to_le_bytes());
    hasher.update(value.to_string().as_bytes());
    let hash = hasher.finalize();
    hash.to_hex()[..16].to_string()
}
