#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use linkpulse::{DispatchConfig, Dispatcher, ProbeFailure, ProbeOutcome, Probe, Reporter, Target};

#[derive(Clone, Copy)]
pub enum Behavior {
    Up(Duration),
    Down(Duration),
    Panic,
}

/// Probe whose answer and latency are fixed per target. Unknown targets are up
/// immediately.
#[derive(Default)]
pub struct StubProbe {
    behaviors: HashMap<Target, Behavior>,
}

impl StubProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(Target::from(target), behavior);
        self
    }
}

#[async_trait]
impl Probe for StubProbe {
    async fn check(&self, target: &Target) -> Result<(), ProbeFailure> {
        match self.behaviors.get(target).copied().unwrap_or(Behavior::Up(Duration::ZERO)) {
            Behavior::Up(latency) => {
                tokio::time::sleep(latency).await;
                Ok(())
            }
            Behavior::Down(latency) => {
                tokio::time::sleep(latency).await;
                Err(ProbeFailure::Timeout(latency))
            }
            Behavior::Panic => panic!("stub probe failed for {}", target),
        }
    }
}

#[derive(Default)]
pub struct CollectingReporter {
    seen: Mutex<Vec<ProbeOutcome>>,
}

impl CollectingReporter {
    pub fn targets(&self) -> Vec<Target> {
        self.seen.lock().unwrap().iter().map(|o| o.target.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, outcome: &ProbeOutcome) {
        self.seen.lock().unwrap().push(outcome.clone());
    }
}

pub fn targets(names: &[&str]) -> Vec<Target> {
    names.iter().map(|&n| Target::from(n)).collect()
}

pub fn many_targets(n: usize) -> Vec<Target> {
    (0..n).map(|i| Target::new(format!("http://host-{}.test/", i))).collect()
}

pub fn dispatcher(probe: StubProbe, settle_wait_ms: u64) -> (Dispatcher, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::default());
    let config = DispatchConfig {
        probe_timeout_ms: 60_000,
        settle_wait_ms,
    };
    let dispatcher = Dispatcher::new(config, Arc::new(probe), reporter.clone());
    (dispatcher, reporter)
}
