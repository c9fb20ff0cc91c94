use std::io::{self, Write};
use tracing::warn;

use crate::models::{ProbeOutcome, Status};

/// Sink for finished outcomes. Called from worker tasks concurrently, so
/// implementations serialize their own writes.
pub trait Reporter: Send + Sync {
    fn report(&self, outcome: &ProbeOutcome);
}

pub fn status_line(outcome: &ProbeOutcome) -> String {
    match outcome.status {
        Status::Reachable => format!("{} is up and running.", outcome.target),
        Status::Unreachable => format!("{} is down !!!", outcome.target),
    }
}

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, outcome: &ProbeOutcome) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", status_line(outcome)) {
            warn!("Failed to write result for {}: {}", outcome.target, e);
        }
    }
}

#[derive(Debug, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, outcome: &ProbeOutcome) {
        let line = match serde_json::to_string(outcome) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode result for {}: {}", outcome.target, e);
                return;
            }
        };
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line) {
            warn!("Failed to write result for {}: {}", outcome.target, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Target;
    use chrono::Utc;

    fn outcome(status: Status) -> ProbeOutcome {
        ProbeOutcome {
            target: Target::from("https://wizzair.com/"),
            status,
            checked_at: Utc::now(),
            latency_ms: None,
            message: String::new(),
        }
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            status_line(&outcome(Status::Reachable)),
            "https://wizzair.com/ is up and running."
        );
        assert_eq!(
            status_line(&outcome(Status::Unreachable)),
            "https://wizzair.com/ is down !!!"
        );
    }
}
