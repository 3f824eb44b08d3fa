//! Filter state of a whole grid
//!
//! One `ColumnFilter` per column, created on first access. The composite
//! expression is only produced when every condition of every column passes
//! validation.

use super::column::Column;
use super::column_filter::ColumnFilter;
use super::context::FilterContext;
use super::error::FilterError;
use super::expression::{BooleanOperator, FilterExpression};

#[derive(Debug, Default)]
pub struct Filtering {
    context: FilterContext,
    column_filters: Vec<ColumnFilter>,
    /// Last expression reported by the dataset
    dataset_expression: Option<FilterExpression>,
}

impl Filtering {
    pub fn new(context: FilterContext) -> Self {
        Self {
            context,
            column_filters: Vec::new(),
            dataset_expression: None,
        }
    }

    pub fn context(&self) -> &FilterContext {
        &self.context
    }

    /// Column filter for `column`, hydrated from the dataset expression on creation
    pub fn column_filter(&mut self, column: &Column) -> &mut ColumnFilter {
        if let Some(index) = self
            .column_filters
            .iter()
            .position(|f| f.column().name == column.name)
        {
            return &mut self.column_filters[index];
        }

        let mut filter = ColumnFilter::new(column.clone(), self.context.clone());
        if let Some(expression) = &self.dataset_expression {
            filter.rebuild(expression);
        }
        self.column_filters.push(filter);
        let last = self.column_filters.len() - 1;
        &mut self.column_filters[last]
    }

    /// Existing column filter, without creating one
    pub fn get_column_filter(&self, name: &str) -> Option<&ColumnFilter> {
        self.column_filters.iter().find(|f| f.column().name == name)
    }

    pub fn column_filters(&self) -> &[ColumnFilter] {
        &self.column_filters
    }

    /// The dataset's expression changed: rebuild every column filter
    pub fn on_filter_expression_changed(&mut self, expression: FilterExpression) {
        for filter in &mut self.column_filters {
            filter.rebuild(&expression);
        }
        tracing::debug!(
            columns = self.column_filters.len(),
            conditions = expression.conditions.len(),
            "Filter expression changed"
        );
        self.dataset_expression = Some(expression);
    }

    /// Composite expression of all columns, gated on validation
    ///
    /// Dataset conditions no column filter claims (columns never opened) and
    /// nested groups of the dataset expression are carried over untouched.
    pub fn filter_expression(
        &self,
        boolean_operator: BooleanOperator,
    ) -> Result<FilterExpression, FilterError> {
        let condition_ids: Vec<String> = self
            .column_filters
            .iter()
            .flat_map(ColumnFilter::invalid_condition_ids)
            .collect();
        if !condition_ids.is_empty() {
            tracing::debug!(invalid = condition_ids.len(), "Filter expression not produced");
            return Err(FilterError::InvalidConditions { condition_ids });
        }

        let mut conditions: Vec<_> = self
            .column_filters
            .iter()
            .flat_map(ColumnFilter::expression_conditions)
            .collect();
        let mut filters = Vec::new();
        if let Some(dataset) = &self.dataset_expression {
            let unclaimed: Vec<_> = dataset
                .conditions
                .iter()
                .filter(|entry| !self.column_filters.iter().any(|f| f.claims(entry)))
                .cloned()
                .collect();
            if !unclaimed.is_empty() {
                tracing::trace!(count = unclaimed.len(), "Carrying over unclaimed conditions");
            }
            conditions.extend(unclaimed);
            filters = dataset.filters.clone();
        }
        let mut expression = FilterExpression::new(boolean_operator, conditions);
        expression.filters = filters;
        tracing::debug!(
            conditions = expression.conditions.len(),
            operator = ?boolean_operator,
            "Filter expression produced"
        );
        Ok(expression)
    }

    /// Drop every column filter; the dataset's conditions are carried over again
    pub fn clear(&mut self) {
        self.column_filters.clear();
    }
}
