//! Invoice Extraction Orchestration Library
//!
//! Turns uploaded travel invoices into ordered, screen-shaped sections for
//! a back-office booking system.
//!
//! # Run Shape
//!
//! - Normalize the bundle into one compact document
//! - Classify vendor, rule set and booking types
//! - Resolve one shared exchange-rate note (soft failure)
//! - Fan out one extractor per booking type, plus the service fee
//! - Merge in dispatch order, isolating failed tasks
//! - Deliver the report, whatever happened
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::{Pipeline, RunRequest, DocumentFile};
//! use extraction::testing::{MockBackend, MockClassifier, MockNormalizer, MockRateSource, RecordingDelivery};
//!
//! let pipeline = Pipeline::new(
//!     Arc::new(MockBackend::new()),
//!     Arc::new(MockNormalizer::new()),
//!     Arc::new(MockClassifier::new()),
//!     Arc::new(MockRateSource::new()),
//!     Arc::new(RecordingDelivery::new()),
//! );
//!
//! let report = pipeline.run(RunRequest::new("Westjet", files)).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (backend, normalizer, classifier, rates, delivery)
//! - [`types`] - Sections, routing decisions, run requests and reports
//! - [`extractors`] - Per-booking-type workers and their registry
//! - [`pipeline`] - Dispatch, merge and the run coordinator
//! - [`currency`] - Currency detection and the exchange-rate note
//! - [`testing`] - Mock implementations for testing

pub mod classifier;
pub mod currency;
pub mod error;
pub mod extractors;
pub mod mime;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "anthropic")]
pub mod ai;

// Re-export core types at crate root
pub use classifier::LlmClassifier;
pub use currency::{detect_currency, CurrencyResolver, EnrichmentNote, FrankfurterRates};
pub use error::{
    DeliveryError, DeliveryResult, ExtractionError, PipelineError, RateError, RateResult, Result,
};
pub use extractors::{
    BookingExtractor, ExtractionInput, Extractor, ExtractorRegistry, ServiceFeeExtractor,
};
pub use pipeline::{merge, traveller_name, Dispatcher, Pipeline, Stage, TaskLabel, TaskOutcome};
pub use traits::{
    backend::{ModelTier, StructuredBackend, StructuredCall},
    classifier::Classifier,
    delivery::Delivery,
    normalizer::DocumentNormalizer,
    rates::RateSource,
};
pub use types::{
    config::PipelineConfig,
    document::DocumentFile,
    report::{RunReport, RunRequest, RunStatus},
    routing::{BookingType, RoutingDecision, UnknownBookingType},
    section::{Section, SectionData, EXTRACTION_ERROR_TITLE},
};

#[cfg(feature = "anthropic")]
pub use ai::{AnthropicBackend, AnthropicNormalizer};
