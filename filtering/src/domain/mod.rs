//! Domain logic
//!
//! - `filters` - filter conditions, column filters and expression synthesis

pub mod filters;
