use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::completion::CompletionCounter;
use crate::config::DispatchConfig;
use crate::models::{DispatchReport, ProbeOutcome, ResultSet, Strategy, Target};
use crate::probe::{probe_once, Probe};
use crate::report::Reporter;

/// One write-once cell per dispatched target, written by its worker. The
/// fire-and-forget caller closes unfilled cells with `None` at snapshot time.
type Slot = OnceLock<Option<ProbeOutcome>>;
type Slots = Arc<Vec<Slot>>;

pub struct Dispatcher {
    pub config: DispatchConfig,
    probe: Arc<dyn Probe>,
    reporter: Arc<dyn Reporter>,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig, probe: Arc<dyn Probe>, reporter: Arc<dyn Reporter>) -> Self {
        Self { config, probe, reporter }
    }

    pub async fn dispatch(&self, strategy: Strategy, targets: &[Target]) -> DispatchReport {
        info!("Dispatching {} probes ({} strategy)", targets.len(), strategy);
        let start = Instant::now();

        let outcomes = match strategy {
            Strategy::Sequential => self.run_sequential(targets).await,
            Strategy::FireAndForget => self.run_fire_and_forget(targets).await,
            Strategy::Counted => self.run_counted(targets).await,
            Strategy::Channel => self.run_channel(targets).await,
            Strategy::Joined => self.run_joined(targets).await,
        };

        let report = DispatchReport {
            strategy,
            dispatched: targets.iter().collect::<HashSet<_>>().len(),
            outcomes,
            elapsed: start.elapsed(),
        };

        if report.is_complete() {
            info!(
                "{} strategy finished: {} up, {} down in {:.2}s",
                strategy,
                report.reachable(),
                report.unreachable(),
                report.elapsed.as_secs_f64()
            );
        } else {
            warn!(
                "{} strategy returned with {} of {} outcomes",
                strategy,
                report.outcomes.len(),
                report.dispatched
            );
        }
        report
    }

    /// Runs every strategy in turn against the same targets.
    pub async fn compare(&self, targets: &[Target]) -> Vec<DispatchReport> {
        let mut reports = Vec::with_capacity(Strategy::ALL.len());
        for strategy in Strategy::ALL {
            reports.push(self.dispatch(strategy, targets).await);
        }

        info!("--- Strategy comparison ({} targets) ---", targets.len());
        for r in &reports {
            info!(
                "{:<16} observed {}/{}  up {}  down {}  {:.2}s",
                r.strategy.to_string(),
                r.outcomes.len(),
                r.dispatched,
                r.reachable(),
                r.unreachable(),
                r.elapsed.as_secs_f64()
            );
        }
        reports
    }

    async fn run_sequential(&self, targets: &[Target]) -> ResultSet {
        let timeout = self.config.probe_timeout();
        let mut results = ResultSet::with_capacity(targets.len());
        for target in targets {
            let outcome = probe_once(self.probe.as_ref(), target, timeout).await;
            self.reporter.report(&outcome);
            results.record(outcome);
        }
        results
    }

    /// Spawns workers without tracking completion and sleeps for
    /// `settle_wait`. Not a completion guarantee: anything slower than the
    /// wait is missing from the result. Stragglers are aborted once the
    /// snapshot is taken, so they never report. Use `Counted`, `Channel` or
    /// `Joined` instead.
    async fn run_fire_and_forget(&self, targets: &[Target]) -> ResultSet {
        if targets.is_empty() {
            return ResultSet::new();
        }

        let timeout = self.config.probe_timeout();
        let slots = new_slots(targets.len());
        let mut handles = Vec::with_capacity(targets.len());

        for (i, target) in targets.iter().cloned().enumerate() {
            let probe = Arc::clone(&self.probe);
            let reporter = Arc::clone(&self.reporter);
            let slots = Arc::clone(&slots);
            handles.push(tokio::spawn(async move {
                let outcome = probe_once(probe.as_ref(), &target, timeout).await;
                store_and_report(&slots[i], outcome, reporter.as_ref());
            }));
        }

        let wait = self.config.settle_wait();
        info!("Waiting {:.1}s for workers...", wait.as_secs_f64());
        tokio::time::sleep(wait).await;

        let mut dropped = 0;
        for (slot, handle) in slots.iter().zip(&handles) {
            if slot.set(None).is_ok() {
                handle.abort();
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("{} probes still running after the fixed wait; aborted and dropped", dropped);
        }
        collect_slots(&slots)
    }

    async fn run_counted(&self, targets: &[Target]) -> ResultSet {
        let timeout = self.config.probe_timeout();
        let slots = new_slots(targets.len());
        let counter = CompletionCounter::new();
        counter.add(targets.len());

        for (i, target) in targets.iter().cloned().enumerate() {
            let guard = counter.guard();
            let probe = Arc::clone(&self.probe);
            let reporter = Arc::clone(&self.reporter);
            let slots = Arc::clone(&slots);
            tokio::spawn(async move {
                let _guard = guard;
                let outcome = probe_once(probe.as_ref(), &target, timeout).await;
                store_and_report(&slots[i], outcome, reporter.as_ref());
            });
        }

        counter.wait().await;
        collect_slots(&slots)
    }

    async fn run_channel(&self, targets: &[Target]) -> ResultSet {
        let timeout = self.config.probe_timeout();
        let (tx, mut rx) = mpsc::channel::<ProbeOutcome>(targets.len().max(1));

        for target in targets.iter().cloned() {
            let probe = Arc::clone(&self.probe);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = probe_once(probe.as_ref(), &target, timeout).await;
                if let Err(e) = tx.send(outcome).await {
                    warn!("Result channel closed before {} was delivered", e.0.target);
                }
            });
        }
        drop(tx);

        let mut results = ResultSet::with_capacity(targets.len());
        for received in 0..targets.len() {
            match rx.recv().await {
                Some(outcome) => {
                    self.reporter.report(&outcome);
                    results.record(outcome);
                }
                None => {
                    error!("Result channel closed after {} of {} outcomes", received, targets.len());
                    break;
                }
            }
        }
        results
    }

    async fn run_joined(&self, targets: &[Target]) -> ResultSet {
        let timeout = self.config.probe_timeout();
        let mut tasks = FuturesUnordered::new();

        for target in targets.iter().cloned() {
            let probe = Arc::clone(&self.probe);
            tasks.push(tokio::spawn(async move {
                probe_once(probe.as_ref(), &target, timeout).await
            }));
        }

        let mut results = ResultSet::with_capacity(targets.len());
        while let Some(join_res) = tasks.next().await {
            match join_res {
                Ok(outcome) => {
                    self.reporter.report(&outcome);
                    results.record(outcome);
                }
                Err(e) => error!("Probe task failed: {}", e),
            }
        }
        results
    }
}

/// Reports only outcomes that made it into their slot, so a closed slot never
/// produces output.
fn store_and_report(slot: &Slot, outcome: ProbeOutcome, reporter: &dyn Reporter) {
    match slot.set(Some(outcome)) {
        Ok(()) => {
            if let Some(Some(outcome)) = slot.get() {
                reporter.report(outcome);
            }
        }
        Err(late) => {
            if let Some(outcome) = late {
                debug!("{} finished after the snapshot; discarded", outcome.target);
            }
        }
    }
}

fn new_slots(n: usize) -> Slots {
    Arc::new((0..n).map(|_| OnceLock::new()).collect())
}

fn collect_slots(slots: &[Slot]) -> ResultSet {
    let mut results = ResultSet::with_capacity(slots.len());
    for outcome in slots.iter().filter_map(|s| s.get().and_then(Option::as_ref)) {
        results.record(outcome.clone());
    }
    results
}
