// Invoice Extraction Server
//
// Accepts invoice uploads over HTTP, runs the extraction pipeline in the
// background and delivers each report by email and optional callback.

pub mod config;
pub mod delivery;
pub mod kernel;
pub mod server;

pub use config::*;
