//! Kernel module - wiring of the pipeline's production collaborators.

pub mod deps;

pub use deps::build_pipeline;
