//! Run orchestration.
//!
//! - [`dispatch`]: one concurrent task per routed booking type, plus the fee task
//! - [`merge`]: flatten task outcomes in dispatch order
//! - [`traveller`]: lead traveller name for the report
//! - [`coordinator`]: the stage machine that ties a run together

pub mod coordinator;
pub mod dispatch;
pub mod merge;
pub mod traveller;

pub use coordinator::{Pipeline, Stage};
pub use dispatch::{plan, Dispatcher, TaskLabel, TaskOutcome};
pub use merge::merge;
pub use traveller::{traveller_name, UNKNOWN_TRAVELLER};
