//! The poller: owns the repeating fetch timer.
//!
//! On each tick, one GET per configured endpoint runs concurrently and the
//! cycle is joined all-or-nothing: any single failure fails the whole round.
//! Outcomes are delivered through a bounded channel and drained from the UI
//! loop via [`CycleSource::poll`], which is non-blocking.
//!
//! Each cycle runs as its own task so a slow round never delays the next
//! tick. Cycles therefore may overlap; every outcome carries a monotonically
//! increasing cycle id and the consumer discards outcomes older than the
//! last one it applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use futures::future::try_join_all;
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, warn};

use super::{Fetch, FetchError, Record};

/// The result of one complete poll round.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Monotonically increasing cycle id, starting at 1.
    pub cycle: u64,
    /// One payload per configured endpoint, in configuration order, or the
    /// error that failed the round.
    pub outcome: Result<Vec<Vec<Record>>, FetchError>,
    /// When the round settled.
    pub completed_at: DateTime<Local>,
}

/// Polls the configured endpoints on a fixed interval.
pub struct Poller {
    fetcher: Arc<dyn Fetch>,
    endpoints: Vec<String>,
}

impl Poller {
    /// Create a poller for the given endpoints.
    ///
    /// Endpoint order is significant: merged payloads preserve it.
    pub fn new(fetcher: Arc<dyn Fetch>, endpoints: Vec<String>) -> Self {
        Self { fetcher, endpoints }
    }

    /// Run a single poll round without starting the timer.
    ///
    /// Used by the one-shot export mode.
    pub async fn run_cycle(&self) -> Result<Vec<Vec<Record>>, FetchError> {
        fetch_all(self.fetcher.as_ref(), &self.endpoints).await
    }

    /// Start polling: one round immediately, then one per `interval`.
    ///
    /// Returns the handle that owns the timer (the caller must hold it and
    /// call [`PollHandle::stop`] on teardown; dropping it also stops) and
    /// the source the UI loop drains for outcomes.
    pub fn start(self, interval: Duration) -> (PollHandle, CycleSource) {
        let Poller { fetcher, endpoints } = self;

        let description = match endpoints.as_slice() {
            [single] => format!("http: {}", single),
            several => format!("http: {} endpoints", several.len()),
        };

        let (tx, rx) = mpsc::channel(16);
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
        let stopped = Arc::new(AtomicBool::new(false));

        let scheduler = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycle: u64 = 0;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    requested = refresh_rx.recv() => {
                        if requested.is_none() {
                            // All handles dropped.
                            break;
                        }
                    }
                }

                cycle += 1;
                let fetcher = Arc::clone(&fetcher);
                let endpoints = endpoints.clone();
                let tx = tx.clone();

                tokio::spawn(async move {
                    let outcome = fetch_all(fetcher.as_ref(), &endpoints).await;
                    match &outcome {
                        Ok(payloads) => {
                            let total: usize = payloads.iter().map(Vec::len).sum();
                            debug!("cycle {} fetched {} records", cycle, total);
                        }
                        Err(e) => warn!("cycle {} failed: {}", cycle, e),
                    }
                    let _ = tx
                        .send(CycleOutcome {
                            cycle,
                            outcome,
                            completed_at: Local::now(),
                        })
                        .await;
                });
            }
        });

        let handle = PollHandle {
            scheduler,
            refresh: refresh_tx,
            stopped: Arc::clone(&stopped),
        };
        let source = CycleSource {
            receiver: rx,
            stopped,
            description,
        };

        (handle, source)
    }
}

/// One GET per endpoint, run concurrently, joined all-or-nothing.
async fn fetch_all(
    fetcher: &dyn Fetch,
    endpoints: &[String],
) -> Result<Vec<Vec<Record>>, FetchError> {
    try_join_all(endpoints.iter().map(|url| fetcher.fetch(url))).await
}

/// Owns the poll timer. Stop it explicitly on teardown; dropping the handle
/// stops it as well.
pub struct PollHandle {
    scheduler: tokio::task::JoinHandle<()>,
    refresh: mpsc::Sender<()>,
    stopped: Arc<AtomicBool>,
}

impl PollHandle {
    /// Request an immediate out-of-band poll round.
    ///
    /// A round already pending coalesces with this request.
    pub fn refresh_now(&self) {
        let _ = self.refresh.try_send(());
    }

    /// Stop polling. Idempotent.
    ///
    /// After this returns, [`CycleSource::poll`] never yields another
    /// outcome, including from rounds still in flight.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.scheduler.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("stopped", &self.stopped.load(Ordering::SeqCst))
            .finish()
    }
}

/// Consumer side of the poller: drained non-blockingly from the UI loop.
#[derive(Debug)]
pub struct CycleSource {
    receiver: mpsc::Receiver<CycleOutcome>,
    stopped: Arc<AtomicBool>,
    description: String,
}

impl CycleSource {
    /// Returns a human-readable description of the polled endpoints.
    ///
    /// Used for display in the status bar.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Poll for the next cycle outcome.
    ///
    /// Returns `None` when no outcome is pending or after the handle was
    /// stopped; the stop check comes first so an in-flight round that
    /// settled after `stop()` is never delivered into torn-down state.
    pub fn poll(&mut self) -> Option<CycleOutcome> {
        if self.stopped.load(Ordering::SeqCst) {
            return None;
        }
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::source::Severity;

    /// Scripted fetcher: each URL maps to a fixed result, optionally
    /// delivered after a delay.
    #[derive(Default)]
    struct StubFetch {
        payloads: HashMap<String, Result<Vec<Record>, FetchError>>,
        delay: Option<Duration>,
    }

    impl StubFetch {
        fn with(mut self, url: &str, result: Result<Vec<Record>, FetchError>) -> Self {
            self.payloads.insert(url.to_string(), result);
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl Fetch for StubFetch {
        async fn fetch(&self, url: &str) -> Result<Vec<Record>, FetchError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.payloads
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::new(format!("no stub for {}", url))))
        }
    }

    fn record(repository: &str, severity: Severity) -> Record {
        Record {
            repository_name: repository.to_string(),
            severity,
            ..serde_json::from_str::<Record>("{}").unwrap()
        }
    }

    async fn next_outcome(source: &mut CycleSource) -> CycleOutcome {
        for _ in 0..200 {
            if let Some(outcome) = source.poll() {
                return outcome;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no cycle outcome within timeout");
    }

    #[tokio::test]
    async fn test_first_cycle_is_immediate() {
        let fetcher = Arc::new(
            StubFetch::default().with("a", Ok(vec![record("one", Severity::Ok)])),
        );
        let poller = Poller::new(fetcher, vec!["a".to_string()]);
        let (handle, mut source) = poller.start(Duration::from_secs(3600));

        let outcome = next_outcome(&mut source).await;
        assert_eq!(outcome.cycle, 1);
        let payloads = outcome.outcome.unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0][0].repository_name, "one");

        handle.stop();
    }

    #[tokio::test]
    async fn test_payloads_preserve_endpoint_order() {
        let fetcher = Arc::new(
            StubFetch::default()
                .with("releases", Ok(vec![record("r", Severity::Ok)]))
                .with("charts", Ok(vec![record("c", Severity::Warning)])),
        );
        let poller =
            Poller::new(fetcher, vec!["releases".to_string(), "charts".to_string()]);
        let (handle, mut source) = poller.start(Duration::from_secs(3600));

        let payloads = next_outcome(&mut source).await.outcome.unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0][0].repository_name, "r");
        assert_eq!(payloads[1][0].repository_name, "c");

        handle.stop();
    }

    #[tokio::test]
    async fn test_one_failing_endpoint_fails_the_cycle() {
        let fetcher = Arc::new(
            StubFetch::default()
                .with("good", Ok(vec![record("r", Severity::Ok)]))
                .with("bad", Err(FetchError::new("connection refused"))),
        );
        let poller = Poller::new(fetcher, vec!["good".to_string(), "bad".to_string()]);
        let (handle, mut source) = poller.start(Duration::from_secs(3600));

        let outcome = next_outcome(&mut source).await;
        let err = outcome.outcome.unwrap_err();
        assert!(err.message.contains("connection refused"));

        handle.stop();
    }

    #[tokio::test]
    async fn test_refresh_now_runs_another_cycle() {
        let fetcher =
            Arc::new(StubFetch::default().with("a", Ok(vec![record("one", Severity::Ok)])));
        let poller = Poller::new(fetcher, vec!["a".to_string()]);
        let (handle, mut source) = poller.start(Duration::from_secs(3600));

        assert_eq!(next_outcome(&mut source).await.cycle, 1);

        handle.refresh_now();
        assert_eq!(next_outcome(&mut source).await.cycle, 2);

        handle.stop();
    }

    #[tokio::test]
    async fn test_stop_suppresses_in_flight_cycle() {
        let fetcher = Arc::new(
            StubFetch::default()
                .with("a", Ok(vec![record("one", Severity::Ok)]))
                .delayed(Duration::from_millis(100)),
        );
        let poller = Poller::new(fetcher, vec!["a".to_string()]);
        let (handle, mut source) = poller.start(Duration::from_secs(3600));

        // The first cycle is still sleeping inside the stub when we stop.
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.stop();

        // Wait past the stub delay; the settled outcome must not surface.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_source_description() {
        let fetcher = Arc::new(StubFetch::default());
        let poller = Poller::new(fetcher, vec!["http://api/releases".to_string()]);
        let (_handle, source) = poller.start(Duration::from_secs(3600));
        assert_eq!(source.description(), "http: http://api/releases");
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let fetcher = Arc::new(StubFetch::default().with("a", Ok(vec![])));
        let poller = Poller::new(fetcher, vec!["a".to_string()]);
        let (handle, _source) = poller.start(Duration::from_secs(3600));

        handle.stop();
        handle.stop();
    }

    #[tokio::test]
    async fn test_run_cycle_without_timer() {
        let fetcher =
            Arc::new(StubFetch::default().with("a", Ok(vec![record("one", Severity::Ok)])));
        let poller = Poller::new(fetcher, vec!["a".to_string()]);

        let payloads = poller.run_cycle().await.unwrap();
        assert_eq!(payloads.len(), 1);
    }
}
