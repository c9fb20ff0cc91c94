use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::error::ProbeFailure;
use crate::models::{ProbeOutcome, Status, Target};

/// A single connectivity check against one target.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, target: &Target) -> Result<(), ProbeFailure>;
}

/// Issues one GET per check. Any HTTP response counts as reachable; only
/// transport-level failures do not.
pub struct HttpProbe {
    http_client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self, target: &Target) -> Result<(), ProbeFailure> {
        let response = self.http_client.get(target.as_str()).send().await?;
        debug!("{} answered with {}", target, response.status());
        Ok(())
    }
}

/// Runs `probe` against `target` and classifies the result. Errors, panics and
/// overruns of `timeout` all become `Status::Unreachable`; nothing escapes.
pub async fn probe_once(probe: &dyn Probe, target: &Target, timeout: Duration) -> ProbeOutcome {
    let checked_at = Utc::now();
    let start = Instant::now();

    let guarded = AssertUnwindSafe(probe.check(target)).catch_unwind();
    let result = match tokio::time::timeout(timeout, guarded).await {
        Ok(Ok(res)) => res,
        Ok(Err(payload)) => Err(ProbeFailure::Panicked(panic_message(payload))),
        Err(_) => Err(ProbeFailure::Timeout(timeout)),
    };

    let outcome = match result {
        Ok(()) => ProbeOutcome {
            target: target.clone(),
            status: Status::Reachable,
            checked_at,
            latency_ms: Some(start.elapsed().as_secs_f64() * 1000.0),
            message: "Response received".into(),
        },
        Err(e) => ProbeOutcome {
            target: target.clone(),
            status: Status::Unreachable,
            checked_at,
            latency_ms: None,
            message: e.to_string(),
        },
    };

    debug!("{} -> {:?} ({})", target, outcome.status, outcome.message);
    outcome
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    #[async_trait]
    impl Probe for Fixed {
        async fn check(&self, _target: &Target) -> Result<(), ProbeFailure> {
            if self.0 {
                Ok(())
            } else {
                Err(ProbeFailure::Timeout(Duration::from_millis(1)))
            }
        }
    }

    struct Panics;

    #[async_trait]
    impl Probe for Panics {
        async fn check(&self, target: &Target) -> Result<(), ProbeFailure> {
            panic!("boom on {}", target);
        }
    }

    struct Hangs;

    #[async_trait]
    impl Probe for Hangs {
        async fn check(&self, _target: &Target) -> Result<(), ProbeFailure> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn success_is_reachable_with_latency() {
        let t = Target::from("a");
        let outcome = probe_once(&Fixed(true), &t, Duration::from_secs(1)).await;
        assert_eq!(outcome.status, Status::Reachable);
        assert_eq!(outcome.target, t);
        assert!(outcome.latency_ms.is_some());
    }

    #[tokio::test]
    async fn failure_is_absorbed() {
        let outcome = probe_once(&Fixed(false), &Target::from("b"), Duration::from_secs(1)).await;
        assert_eq!(outcome.status, Status::Unreachable);
        assert!(outcome.latency_ms.is_none());
    }

    #[tokio::test]
    async fn panic_is_absorbed() {
        let outcome = probe_once(&Panics, &Target::from("c"), Duration::from_secs(1)).await;
        assert_eq!(outcome.status, Status::Unreachable);
        assert!(outcome.message.contains("boom on c"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_probe_times_out() {
        let outcome = probe_once(&Hangs, &Target::from("d"), Duration::from_millis(200)).await;
        assert_eq!(outcome.status, Status::Unreachable);
        assert!(outcome.message.starts_with("no response within"));
    }
}
