//! Core trait abstractions for the extraction library.
//!
//! Every external collaborator of the pipeline sits behind one of these,
//! so the coordinator can be exercised with the mocks in [`crate::testing`].

pub mod backend;
pub mod classifier;
pub mod delivery;
pub mod normalizer;
pub mod rates;
