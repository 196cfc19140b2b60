//! Task fan-out.
//!
//! One task per routed booking type, in routing order, plus the service fee
//! task last. Every task runs concurrently and is awaited to completion;
//! a failure stays in its own slot.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::error::{panic_message, ExtractionError, Result};
use crate::extractors::{ExtractionInput, ExtractorRegistry, ServiceFeeExtractor};
use crate::types::routing::RoutingDecision;
use crate::types::section::Section;

/// What a dispatched task was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskLabel {
    /// Raw identifier from the routing decision, known or not
    Booking(String),
    ServiceFee,
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskLabel::Booking(id) => f.write_str(id),
            TaskLabel::ServiceFee => f.write_str("service_fee"),
        }
    }
}

/// Settled result of one task, tagged with its dispatch position.
#[derive(Debug)]
pub struct TaskOutcome {
    pub index: usize,
    pub label: TaskLabel,
    pub result: Result<Vec<Section>>,
}

/// Task list for a run, in dispatch order.
pub fn plan(routing: &RoutingDecision, service_fee: f64) -> Vec<TaskLabel> {
    let mut labels: Vec<TaskLabel> = routing
        .booking_types
        .iter()
        .cloned()
        .map(TaskLabel::Booking)
        .collect();

    if service_fee > 0.0 {
        labels.push(TaskLabel::ServiceFee);
    }

    labels
}

/// Runs a run's task list against the registry.
pub struct Dispatcher<'a> {
    registry: &'a ExtractorRegistry,
    service_fee: &'a ServiceFeeExtractor,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a ExtractorRegistry, service_fee: &'a ServiceFeeExtractor) -> Self {
        Self {
            registry,
            service_fee,
        }
    }

    /// Start every task at once and wait for all of them.
    ///
    /// Outcomes come back in dispatch order whatever order they finish in.
    pub async fn dispatch(&self, input: &ExtractionInput<'_>, service_fee: f64) -> Vec<TaskOutcome> {
        let labels = plan(input.routing, service_fee);
        debug!(tasks = labels.len(), "Dispatching extraction tasks");

        let tasks = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| self.run_task(index, label, input, service_fee));

        join_all(tasks).await
    }

    async fn run_task(
        &self,
        index: usize,
        label: TaskLabel,
        input: &ExtractionInput<'_>,
        service_fee: f64,
    ) -> TaskOutcome {
        let start = Instant::now();

        let work = async {
            match &label {
                TaskLabel::Booking(id) => match self.registry.get(id) {
                    Some(extractor) => extractor.extract(input).await,
                    None => {
                        warn!(task_index = index, booking_type = %id, "No extractor registered");
                        Ok(vec![Section::unknown_booking_type(id)])
                    }
                },
                TaskLabel::ServiceFee => {
                    self.service_fee
                        .extract(input.document, service_fee, input.today)
                        .await
                }
            }
        };

        // A panicking task must not take its siblings down with it
        let result = match AssertUnwindSafe(work).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(task_index = index, booking_type = %label, panic = %message, "Task panicked");
                Err(ExtractionError::Panicked(message))
            }
        };

        match &result {
            Ok(sections) => debug!(
                task_index = index,
                booking_type = %label,
                sections = sections.len(),
                duration_ms = start.elapsed().as_millis(),
                "Task finished"
            ),
            Err(e) => warn!(
                task_index = index,
                booking_type = %label,
                error = %e,
                duration_ms = start.elapsed().as_millis(),
                "Task failed"
            ),
        }

        TaskOutcome {
            index,
            label,
            result,
        }
    }
}
