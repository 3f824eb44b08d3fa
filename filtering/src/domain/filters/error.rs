use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Apply aborted; the listed conditions must be fixed in the editor
    #[error("Filter expression not applied: {} invalid condition(s)", condition_ids.len())]
    InvalidConditions { condition_ids: Vec<String> },
}
