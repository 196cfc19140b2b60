//! Anthropic-backed collaborators.
//!
//! Reference implementations of [`StructuredBackend`](crate::traits::backend::StructuredBackend)
//! and [`DocumentNormalizer`](crate::traits::normalizer::DocumentNormalizer)
//! over `anthropic-client`. Users can use these directly or implement their own.

mod backend;
mod normalizer;

pub use backend::{AnthropicBackend, DEFAULT_ACCURATE_MODEL, DEFAULT_FAST_MODEL};
pub use normalizer::AnthropicNormalizer;
