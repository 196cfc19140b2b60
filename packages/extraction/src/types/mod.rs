//! Data types shared across the pipeline.

pub mod config;
pub mod document;
pub mod report;
pub mod routing;
pub mod section;
