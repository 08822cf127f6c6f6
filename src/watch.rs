//! Continuous aggregation over a polled source.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::aggregator::{AggregateResult, StatusAggregator};
use crate::error::Result;
use crate::source::ReportSource;

/// Poll `source` every `refresh` and aggregate each new snapshot until
/// `shutdown` resolves.
///
/// `on_result` is called once per snapshot with the aggregate, or with the
/// error if the snapshot could not be parsed. Source errors (unreadable
/// file, bad JSON) are logged once per distinct message.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use health_rollup::{watch, AggregatorConfig, FileSource, Status, StatusAggregator};
///
/// let file = tempfile::NamedTempFile::new().unwrap();
/// std::fs::write(file.path(), r#"{"db":{"status":"UP"},"mongo":{"status":"DOWN"}}"#).unwrap();
///
/// let mut source = FileSource::new(file.path());
/// let aggregator = StatusAggregator::new(&AggregatorConfig::default().exclude("mongo"));
/// let mut statuses = Vec::new();
///
/// tokio_test::block_on(async {
///     watch(
///         &mut source,
///         &aggregator,
///         Duration::from_millis(10),
///         tokio::time::sleep(Duration::from_millis(50)),
///         |result| statuses.push(result.unwrap().status()),
///     )
///     .await
/// });
///
/// // The file never changes, so it is aggregated once
/// assert_eq!(statuses, [Status::Up]);
/// ```
pub async fn watch<S, F, Fut>(
    source: &mut S,
    aggregator: &StatusAggregator,
    refresh: Duration,
    shutdown: Fut,
    mut on_result: F,
) where
    S: ReportSource + ?Sized,
    F: FnMut(Result<AggregateResult>),
    Fut: Future<Output = ()>,
{
    // interval() panics on a zero period
    let mut ticker = interval(refresh.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut last_error: Option<String> = None;
    info!("Watching {}", source.description());

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Stopping watch on {}", source.description());
                break;
            }
            _ = ticker.tick() => {
                if let Some(snapshot) = source.poll() {
                    debug!("New snapshot with {} component(s)", snapshot.len());
                    last_error = None;
                    on_result(aggregator.aggregate_snapshot(snapshot));
                } else if let Some(err) = source.error() {
                    if last_error.as_deref() != Some(err) {
                        warn!("{}: {}", source.description(), err);
                        last_error = Some(err.to_string());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregatorConfig;
    use crate::source::{ReportSnapshot, SerializedHealthReport};
    use crate::HealthError;
    use health_rollup_types::Status;
    use std::collections::{BTreeMap, VecDeque};
    use tokio::sync::oneshot;

    /// Hands out queued snapshots one per poll.
    #[derive(Debug, Default)]
    struct QueueSource {
        pending: VecDeque<ReportSnapshot>,
        error: Option<String>,
    }

    impl ReportSource for QueueSource {
        fn poll(&mut self) -> Option<ReportSnapshot> {
            self.pending.pop_front()
        }

        fn description(&self) -> &str {
            "queue"
        }

        fn error(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    fn snapshot(entries: &[(&str, &str)]) -> ReportSnapshot {
        entries
            .iter()
            .map(|(name, status)| {
                (
                    name.to_string(),
                    SerializedHealthReport {
                        status: status.to_string(),
                        details: BTreeMap::new(),
                    },
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_watch_aggregates_each_snapshot() {
        let mut source = QueueSource {
            pending: VecDeque::from([
                snapshot(&[("db", "UP"), ("mongo", "DOWN")]),
                snapshot(&[("db", "OUT_OF_SERVICE")]),
            ]),
            ..Default::default()
        };

        let aggregator = StatusAggregator::new(&AggregatorConfig::default().exclude("mongo"));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut stop_tx = Some(stop_tx);
        let mut seen = Vec::new();

        watch(
            &mut source,
            &aggregator,
            Duration::from_millis(5),
            async {
                let _ = stop_rx.await;
            },
            |result| {
                seen.push(result.map(|r| r.status()).ok());
                if seen.len() == 2 {
                    if let Some(stop) = stop_tx.take() {
                        let _ = stop.send(());
                    }
                }
            },
        )
        .await;

        assert_eq!(seen, [Some(Status::Up), Some(Status::OutOfService)]);
    }

    #[tokio::test]
    async fn test_watch_reports_parse_errors() {
        let mut source = QueueSource {
            pending: VecDeque::from([snapshot(&[("db", "SIDEWAYS")])]),
            ..Default::default()
        };

        let aggregator = StatusAggregator::new(&AggregatorConfig::default());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut stop_tx = Some(stop_tx);
        let mut errors = 0;

        watch(
            &mut source,
            &aggregator,
            Duration::from_millis(5),
            async {
                let _ = stop_rx.await;
            },
            |result| {
                if let Err(HealthError::UnknownStatus { code, .. }) = result {
                    assert_eq!(code, "SIDEWAYS");
                    errors += 1;
                }
                if let Some(stop) = stop_tx.take() {
                    let _ = stop.send(());
                }
            },
        )
        .await;

        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_watch_skips_source_errors() {
        let mut source = QueueSource {
            error: Some("Read error: missing".to_string()),
            ..Default::default()
        };

        let aggregator = StatusAggregator::new(&AggregatorConfig::default());
        let mut calls = 0;

        watch(
            &mut source,
            &aggregator,
            Duration::from_millis(5),
            tokio::time::sleep(Duration::from_millis(30)),
            |_| calls += 1,
        )
        .await;

        assert_eq!(calls, 0);
    }
}
