//! Utility modules

pub mod file;
