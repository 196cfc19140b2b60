//! Run coordinator.
//!
//! A run moves through `Normalizing → Classifying → Enriching → Extracting
//! → Delivering → Done`. A run-fatal error before delivery jumps straight
//! to delivery with whatever was captured; delivery happens on every path.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{error, info, info_span, Instrument};

use super::dispatch::Dispatcher;
use super::merge::merge;
use super::traveller::traveller_name;
use crate::currency::CurrencyResolver;
use crate::error::{panic_message, PipelineError};
use crate::extractors::{ExtractionInput, ExtractorRegistry, ServiceFeeExtractor};
use crate::traits::{
    backend::StructuredBackend, classifier::Classifier, delivery::Delivery,
    normalizer::DocumentNormalizer, rates::RateSource,
};
use crate::types::{
    config::PipelineConfig,
    report::{RunReport, RunRequest, RunStatus},
    routing::RoutingDecision,
    section::Section,
};

/// Coordinator states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalizing,
    Classifying,
    Enriching,
    Extracting,
    Delivering,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalizing => "normalizing",
            Stage::Classifying => "classifying",
            Stage::Enriching => "enriching",
            Stage::Extracting => "extracting",
            Stage::Delivering => "delivering",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a run has captured so far. Survives a timeout.
#[derive(Debug)]
struct Progress {
    stage: Stage,
    document: String,
    routing: Option<RoutingDecision>,
    sections: Vec<Section>,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: Stage::Normalizing,
            document: String::new(),
            routing: None,
            sections: Vec::new(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        info!(stage = %stage, "Stage started");
    }
}

/// The invoice extraction pipeline.
///
/// Holds only read-only collaborators, so one instance serves any number
/// of concurrent runs.
pub struct Pipeline {
    normalizer: Arc<dyn DocumentNormalizer>,
    classifier: Arc<dyn Classifier>,
    rates: Arc<dyn RateSource>,
    registry: ExtractorRegistry,
    service_fee: ServiceFeeExtractor,
    delivery: Arc<dyn Delivery>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Pipeline with the standard extractor registry over `backend`.
    pub fn new(
        backend: Arc<dyn StructuredBackend>,
        normalizer: Arc<dyn DocumentNormalizer>,
        classifier: Arc<dyn Classifier>,
        rates: Arc<dyn RateSource>,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            rates,
            registry: ExtractorRegistry::standard(backend.clone()),
            service_fee: ServiceFeeExtractor::new(backend),
            delivery,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run to completion and deliver the report.
    ///
    /// Never fails: errors end up in the returned (and delivered) report.
    pub async fn run(&self, request: RunRequest) -> RunReport {
        let span = info_span!("pipeline_run", run_id = %request.run_id);
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: RunRequest) -> RunReport {
        let start = Instant::now();
        info!(
            vendor_hint = %request.vendor_hint,
            files = request.files.len(),
            service_fee = request.service_fee,
            "Run started"
        );

        let mut progress = Progress::new();
        let outcome = match tokio::time::timeout(
            self.config.run_timeout,
            AssertUnwindSafe(self.execute(&request, &mut progress)).catch_unwind(),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => Err(PipelineError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(PipelineError::Timeout(self.config.run_timeout)),
        };

        if let Err(e) = &outcome {
            error!(stage = %progress.stage, error = %e, "Run failed");
        }

        let report = self.build_report(request, progress, outcome);

        info!(stage = %Stage::Delivering, "Stage started");
        if let Err(e) = self.delivery.deliver(&report).await {
            error!(error = %e, "Delivery failed");
        }

        info!(
            stage = %Stage::Done,
            status = report.status.as_str(),
            sections = report.sections.len(),
            duration_ms = start.elapsed().as_millis(),
            "Run finished"
        );

        report
    }

    async fn execute(
        &self,
        request: &RunRequest,
        progress: &mut Progress,
    ) -> Result<(), PipelineError> {
        // 1. Normalize the bundle into one document
        progress.enter(Stage::Normalizing);
        progress.document = self
            .normalizer
            .normalize(&request.files)
            .await
            .map_err(PipelineError::Normalize)?;
        self.cooldown().await;

        // 2. Route
        progress.enter(Stage::Classifying);
        let routing = self
            .classifier
            .classify(
                &progress.document,
                &request.vendor_hint,
                &request.booking_type_hint,
            )
            .await
            .map_err(PipelineError::Classify)?;
        info!(
            vendor = %routing.vendor,
            rule_set = %routing.rule_set,
            booking_types = ?routing.booking_types,
            "Routing decided"
        );
        progress.routing = Some(routing.clone());
        self.cooldown().await;

        // 3. Shared exchange rate note, resolved before any task starts
        progress.enter(Stage::Enriching);
        let resolver = CurrencyResolver::new(self.rates.clone())
            .with_home_currency(self.config.home_currency.as_str())
            .with_timeout(self.config.rate_timeout);
        let note = resolver.resolve(&progress.document, request.today).await;

        // 4. Fan out and merge
        progress.enter(Stage::Extracting);
        let input = ExtractionInput {
            document: &progress.document,
            routing: &routing,
            enrichment: note.as_ref(),
            today: request.today,
            home_currency: &self.config.home_currency,
        };
        let outcomes = Dispatcher::new(&self.registry, &self.service_fee)
            .dispatch(&input, request.service_fee)
            .await;
        progress.sections = merge(outcomes);

        Ok(())
    }

    async fn cooldown(&self) {
        let cooldown: Duration = self.config.stage_cooldown;
        if !cooldown.is_zero() {
            tokio::time::sleep(cooldown).await;
        }
    }

    fn build_report(
        &self,
        request: RunRequest,
        progress: Progress,
        outcome: Result<(), PipelineError>,
    ) -> RunReport {
        let traveller_name = traveller_name(&progress.sections, &progress.document);
        let (vendor, booking_types) = match progress.routing {
            Some(routing) => (routing.vendor, routing.booking_types),
            None => (request.vendor_hint, Vec::new()),
        };
        let (status, error) = match outcome {
            Ok(()) => (RunStatus::Success, None),
            Err(e) => (RunStatus::Error, Some(e.to_string())),
        };

        RunReport {
            run_id: request.run_id,
            status,
            error,
            vendor,
            booking_types,
            sections: progress.sections,
            traveller_name,
            attachments: request.files,
            callback_url: request.callback_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::testing::{
        MockBackend, MockClassifier, MockNormalizer, MockRateSource, RecordingDelivery,
    };
    use async_trait::async_trait;
    use crate::types::document::DocumentFile;
    use chrono::NaiveDate;
    use serde_json::json;

    fn request() -> RunRequest {
        RunRequest::new(
            "Expedia",
            vec![DocumentFile::new("inv.md", "text/markdown", "Room CA $100")],
        )
        .with_today(NaiveDate::from_ymd_opt(2024, 8, 26).unwrap())
    }

    fn hotel_backend() -> Arc<MockBackend> {
        Arc::new(MockBackend::new().with_response(
            "hotel extractor",
            json!([{"sectionTitle": "Hotel Screen 1 (Summary)", "data": {"vendor": "Expedia TAAP"}}]),
        ))
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Normalizing.to_string(), "normalizing");
        assert_eq!(Stage::Done.to_string(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_runs_between_model_stages() {
        let delivery = Arc::new(RecordingDelivery::new());
        let pipeline = Pipeline::new(
            hotel_backend(),
            Arc::new(MockNormalizer::new()),
            Arc::new(MockClassifier::new().with_decision(
                RoutingDecision::new("Expedia TAAP", "expedia").with_booking_type("hotel"),
            )),
            Arc::new(MockRateSource::new()),
            delivery.clone(),
        );

        let started = tokio::time::Instant::now();
        let report = pipeline.run(request()).await;

        assert!(report.is_success());
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(delivery.reports().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_run_fatal_and_still_delivers() {
        let backend = Arc::new(
            MockBackend::new()
                .with_response("hotel extractor", json!([]))
                .with_delay("hotel extractor", Duration::from_secs(600)),
        );
        let delivery = Arc::new(RecordingDelivery::new());
        let pipeline = Pipeline::new(
            backend,
            Arc::new(MockNormalizer::new()),
            Arc::new(MockClassifier::new().with_decision(
                RoutingDecision::new("Expedia TAAP", "expedia").with_booking_type("hotel"),
            )),
            Arc::new(MockRateSource::new()),
            delivery.clone(),
        )
        .with_config(
            PipelineConfig::new()
                .with_stage_cooldown(Duration::ZERO)
                .with_run_timeout(Duration::from_secs(60)),
        );

        let report = pipeline.run(request()).await;

        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(report.error.as_deref(), Some("run exceeded timeout of 60s"));
        assert!(report.sections.is_empty());
        // Routing was captured before the timeout hit
        assert_eq!(report.vendor, "Expedia TAAP");
        assert_eq!(delivery.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_change_report() {
        let pipeline = Pipeline::new(
            hotel_backend(),
            Arc::new(MockNormalizer::new()),
            Arc::new(MockClassifier::new().with_decision(
                RoutingDecision::new("Expedia TAAP", "expedia").with_booking_type("hotel"),
            )),
            Arc::new(MockRateSource::new()),
            Arc::new(RecordingDelivery::new().failing()),
        )
        .with_config(PipelineConfig::new().with_stage_cooldown(Duration::ZERO));

        let report = pipeline.run(request()).await;

        assert!(report.is_success());
        assert_eq!(report.attachments.len(), 1);
    }

    struct PanickingClassifier;

    #[async_trait]
    impl Classifier for PanickingClassifier {
        async fn classify(
            &self,
            _document: &str,
            _vendor_hint: &str,
            _booking_type_hint: &str,
        ) -> Result<RoutingDecision> {
            panic!("classifier bug");
        }
    }

    #[tokio::test]
    async fn test_panic_outside_tasks_still_delivers() {
        let delivery = Arc::new(RecordingDelivery::new());
        let pipeline = Pipeline::new(
            hotel_backend(),
            Arc::new(MockNormalizer::new()),
            Arc::new(PanickingClassifier),
            Arc::new(MockRateSource::new()),
            delivery.clone(),
        )
        .with_config(PipelineConfig::new().with_stage_cooldown(Duration::ZERO));

        let report = pipeline.run(request()).await;

        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(report.error.as_deref(), Some("run panicked: classifier bug"));
        assert_eq!(report.vendor, "Expedia");
        assert_eq!(delivery.reports().len(), 1);
    }
}
