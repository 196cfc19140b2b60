//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without model calls,
//! rate lookups or outbound email. Every mock records its calls.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{
    DeliveryError, DeliveryResult, ExtractionError, RateError, RateResult, Result,
};
use crate::traits::{
    backend::{parse_json_payload, StructuredBackend, StructuredCall},
    classifier::Classifier,
    delivery::Delivery,
    normalizer::DocumentNormalizer,
    rates::RateSource,
};
use crate::types::{document::DocumentFile, report::RunReport, routing::RoutingDecision};

#[derive(Debug, Clone)]
enum MockReply {
    Json(Value),
    Raw(String),
    Failure(String),
}

#[derive(Debug, Clone)]
struct MockRule {
    needle: String,
    reply: MockReply,
}

fn mock_failure(message: &str) -> ExtractionError {
    ExtractionError::Backend(message.to_string().into())
}

/// A mock structured backend.
///
/// Replies are chosen by substring match against the call's system prompt;
/// the first matching rule wins. Calls with no matching rule fail with a
/// backend error.
#[derive(Default)]
pub struct MockBackend {
    rules: Arc<RwLock<Vec<MockRule>>>,

    /// Simulated latency by system-prompt substring
    delays: Arc<RwLock<Vec<(String, Duration)>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<StructuredCall>>>,

    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with a JSON value when the system prompt contains `needle`.
    pub fn with_response(self, needle: impl Into<String>, value: Value) -> Self {
        self.push_rule(needle, MockReply::Json(value))
    }

    /// Reply with raw model text, parsed the way a real backend would.
    pub fn with_raw_response(self, needle: impl Into<String>, raw: impl Into<String>) -> Self {
        self.push_rule(needle, MockReply::Raw(raw.into()))
    }

    /// Fail with a backend error when the system prompt contains `needle`.
    pub fn with_failure(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_rule(needle, MockReply::Failure(message.into()))
    }

    /// Sleep before answering calls whose system prompt contains `needle`.
    pub fn with_delay(self, needle: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().push((needle.into(), delay));
        self
    }

    /// Get all calls made to this mock, in arrival order.
    pub fn calls(&self) -> Vec<StructuredCall> {
        self.calls.read().unwrap().clone()
    }

    /// Highest number of calls that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn push_rule(self, needle: impl Into<String>, reply: MockReply) -> Self {
        self.rules.write().unwrap().push(MockRule {
            needle: needle.into(),
            reply,
        });
        self
    }
}

#[async_trait]
impl StructuredBackend for MockBackend {
    async fn complete_json(&self, call: StructuredCall) -> Result<Value> {
        self.calls.write().unwrap().push(call.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self
            .delays
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| call.system.contains(needle.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|rule| call.system.contains(rule.needle.as_str()))
            .map(|rule| rule.reply.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Raw(raw)) => parse_json_payload(&raw),
            Some(MockReply::Failure(message)) => Err(mock_failure(&message)),
            None => Err(mock_failure("no mock response configured")),
        }
    }
}

/// Record of a call made to the mock classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MockClassifyCall {
    pub document: String,
    pub vendor_hint: String,
    pub booking_type_hint: String,
}

/// A mock classifier returning a fixed routing decision.
#[derive(Default)]
pub struct MockClassifier {
    decision: Option<RoutingDecision>,
    fail: bool,
    calls: Arc<RwLock<Vec<MockClassifyCall>>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decision(mut self, decision: RoutingDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Every call fails with a classification error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<MockClassifyCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        document: &str,
        vendor_hint: &str,
        booking_type_hint: &str,
    ) -> Result<RoutingDecision> {
        self.calls.write().unwrap().push(MockClassifyCall {
            document: document.to_string(),
            vendor_hint: vendor_hint.to_string(),
            booking_type_hint: booking_type_hint.to_string(),
        });

        if self.fail {
            return Err(ExtractionError::Classification(
                "mock classifier failure".into(),
            ));
        }

        // Unconfigured mocks route to the hint vendor with no types
        Ok(self
            .decision
            .clone()
            .unwrap_or_else(|| RoutingDecision::new(vendor_hint, "generic")))
    }
}

/// A mock normalizer that returns fixed text.
#[derive(Default)]
pub struct MockNormalizer {
    text: Option<String>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentNormalizer for MockNormalizer {
    async fn normalize(&self, files: &[DocumentFile]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ExtractionError::Normalization(
                "mock normalizer failure".into(),
            ));
        }

        // Without configured text, concatenate the files as text
        Ok(self.text.clone().unwrap_or_else(|| {
            files
                .iter()
                .map(DocumentFile::text_lossy)
                .collect::<Vec<_>>()
                .join("\n\n")
        }))
    }
}

/// A mock exchange rate source.
#[derive(Default)]
pub struct MockRateSource {
    rates: HashMap<String, f64>,
    fail: bool,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate quoted when converting from `currency`.
    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(currency.into(), rate);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `(from, to)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn quote(&self, from: &str, to: &str) -> RateResult<f64> {
        self.calls
            .write()
            .unwrap()
            .push((from.to_string(), to.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(RateError::Status(503));
        }

        self.rates
            .get(from)
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                currency: from.to_string(),
            })
    }
}

/// A delivery that keeps every report it receives.
#[derive(Default)]
pub struct RecordingDelivery {
    reports: Arc<RwLock<Vec<RunReport>>>,
    fail: bool,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the report, then fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.read().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn deliver(&self, report: &RunReport) -> DeliveryResult<()> {
        self.reports.write().unwrap().push(report.clone());

        if self.fail {
            return Err(DeliveryError::Email("mock delivery failure".into()));
        }
        Ok(())
    }
}
