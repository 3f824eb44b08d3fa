//! Data access layer

pub mod metadata;

pub use metadata::{MetadataError, MetadataService};
