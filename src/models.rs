use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Identifier of an endpoint to probe. Opaque to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Reachable,
    Unreachable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub target: Target,
    pub status: Status,
    pub checked_at: DateTime<Utc>,
    pub latency_ms: Option<f64>,
    pub message: String,
}

/// Outcomes keyed by target. A target is recorded at most once; arrival order
/// is kept separately.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    outcomes: HashMap<Target, ProbeOutcome>,
    arrival: Vec<Target>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            outcomes: HashMap::with_capacity(n),
            arrival: Vec::with_capacity(n),
        }
    }

    /// Returns `false` and leaves the set untouched if the target is already present.
    pub fn record(&mut self, outcome: ProbeOutcome) -> bool {
        if self.outcomes.contains_key(&outcome.target) {
            return false;
        }
        self.arrival.push(outcome.target.clone());
        self.outcomes.insert(outcome.target.clone(), outcome);
        true
    }

    pub fn get(&self, target: &Target) -> Option<&ProbeOutcome> {
        self.outcomes.get(target)
    }

    pub fn status_of(&self, target: &Target) -> Option<Status> {
        self.get(target).map(|o| o.status)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn completion_order(&self) -> &[Target] {
        &self.arrival
    }

    /// Outcomes in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.arrival.iter().filter_map(|t| self.outcomes.get(t))
    }

    pub fn count(&self, status: Status) -> usize {
        self.outcomes.values().filter(|o| o.status == status).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    Sequential,
    FireAndForget,
    Counted,
    Channel,
    Joined,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Sequential,
        Strategy::FireAndForget,
        Strategy::Counted,
        Strategy::Channel,
        Strategy::Joined,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Sequential => "sequential",
            Strategy::FireAndForget => "fire-and-forget",
            Strategy::Counted => "counted",
            Strategy::Channel => "channel",
            Strategy::Joined => "joined",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub strategy: Strategy,
    pub dispatched: usize,
    pub outcomes: ResultSet,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.dispatched
    }

    pub fn reachable(&self) -> usize {
        self.outcomes.count(Status::Reachable)
    }

    pub fn unreachable(&self) -> usize {
        self.outcomes.count(Status::Unreachable)
    }
}
