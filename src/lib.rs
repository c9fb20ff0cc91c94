//! Concurrent HTTP liveness probes.
//!
//! A [`Dispatcher`] fans one probe per target out over tokio tasks and fans the
//! outcomes back in. How it detects that all workers are done is selected by
//! [`Strategy`]: sequential baseline, fixed sleep (racy, kept for comparison),
//! a wait-group counter, a bounded channel, or a join over task handles.

pub mod cli;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod probe;
pub mod report;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::ProbeFailure;
pub use models::{DispatchReport, ProbeOutcome, ResultSet, Status, Strategy, Target};
pub use probe::{probe_once, HttpProbe, Probe};
pub use report::{ConsoleReporter, JsonReporter, Reporter};
