//! Filter-condition compiler
//!
//! Turns per-column editor input into the dataset's composite filter
//! expression, and parses an existing expression back into editable
//! conditions. Column data types map to condition strategies (text, number,
//! date, option set, multi-select, lookup, file).
//!
//! ## Usage
//!
//! ```no_run
//! use tabula_filtering::domain::filters::{
//!     BooleanOperator, Column, ControlValue, DataType, FilterContext, Filtering, Operator,
//! };
//!
//! let mut filtering = Filtering::new(FilterContext::default());
//! let amount = Column::new("amount", DataType::Decimal);
//! let condition = filtering.column_filter(&amount).add_condition();
//! condition.set_operator(Operator::Between);
//! condition.set_value(ControlValue::NumberRange([Some(10.0), Some(20.0)]));
//! let expression = filtering.filter_expression(BooleanOperator::And).unwrap();
//! ```

mod column;
mod column_filter;
mod condition;
mod context;
mod decoration;
mod error;
mod expression;
mod filtering;
mod operators;
mod resolver;
mod validation;
mod value;
mod variants;


pub use column::{Column, ColumnMetadata, DataType, OptionItem};
pub use column_filter::ColumnFilter;
pub use condition::{Condition, ConditionEvent, ConditionOrigin, ConditionSnapshot, ValueFamily};
pub use context::{FilterContext, FilterSettings};
pub use error::FilterError;
pub use expression::{BooleanOperator, ConditionExpression, FilterExpression, WireValue};
pub use filtering::Filtering;
pub use operators::{Operator, OperatorCategory, UnknownOperator};
pub use validation::{ValidationResult, has_errors};
pub use value::{ControlValue, LookupReference};
pub use variants::ConditionKind;
