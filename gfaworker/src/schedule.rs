//! Scheduler for recomputing the latest intervals on a fixed cadence.
//!
//! Telemetry for an interval keeps arriving for a while after the interval
//! ends, so each tick processes the intervals that ended at least `lag` ago
//! rather than the one just closed.

use gfa_core::ports::{AggregateSink, FlowSolver, TimeSeriesReader};
use gfa_solver::{Disposition, FlowError, IntervalOrchestrator, Summary};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{Instrument as _, Level, event, span};

/// Configuration of the periodic interval runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scheduler {
    /// An RFC3339 timestamp to align the ticks to (if omitted, ticks start now)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,

    /// How often to tick; scheduling is disabled if omitted
    #[serde(default, with = "humantime_serde::option")]
    pub every: Option<Duration>,

    /// How long after an interval ends before it is processed
    #[serde(default = "default_lag", with = "humantime_serde")]
    pub lag: Duration,
}

fn default_lag() -> Duration {
    Duration::from_secs(60)
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            from: None,
            every: None,
            lag: default_lag(),
        }
    }
}

impl Scheduler {
    /// Execute `f` at regular intervals.
    ///
    /// Each call receives the tick time less the configured lag, i.e. the
    /// latest moment whose telemetry is considered complete.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if scheduling is disabled (no cadence configured)
    /// * `Err(E)` as soon as the scheduled function returns an error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use gfaworker::Scheduler;
    ///
    /// # fn main() -> Result<(), String> {
    /// let scheduler = Scheduler {
    ///     from: None,
    ///     every: Some(Duration::from_secs(300)),
    ///     lag: Duration::from_secs(60),
    /// };
    ///
    /// # tokio_test::block_on(async {
    /// scheduler.schedule(async |complete| {
    ///     println!("telemetry is complete up to {complete}");
    ///     Ok::<(), String>(())
    /// }).await?;
    /// # Ok(())
    /// # })
    /// # }
    /// ```
    pub async fn schedule<T, E>(
        &self,
        f: impl AsyncFn(OffsetDateTime) -> Result<T, E>,
    ) -> Result<(), E> {
        // extract the cadence or return immediately
        let Some(delta) = self.every else {
            return Ok(());
        };

        let now = OffsetDateTime::now_utc();

        // adjust the anchor time to be >= now
        let mut anchor = match self.from {
            Some(mut from) => {
                if from < now {
                    let x = ((now - from) / delta).ceil() as u32;
                    from += delta * x;
                }
                from
            }
            None => now,
        };

        // now we align the clocks as best we can
        let sleepy = Duration::try_from(anchor - now).unwrap_or_default();
        tokio::time::sleep(sleepy).await;

        let mut interval = tokio::time::interval(delta);
        loop {
            interval.tick().await;

            let complete = anchor - self.lag;
            let span = span!(Level::INFO, "tick", %anchor);
            async {
                event!(Level::DEBUG, %complete, "running scheduled intervals");
                f(complete).await
            }
            .instrument(span)
            .await?;

            anchor += delta;
        }
    }
}

/// The start of the latest interval of length `duration` that ends at or before `at`.
///
/// Intervals are aligned to multiples of `duration` since the unix epoch.
pub fn latest_complete(
    at: OffsetDateTime,
    duration: Duration,
) -> Result<OffsetDateTime, time::error::ComponentRange> {
    let length = duration.as_nanos().max(1) as i128;
    let now = at.unix_timestamp_nanos();
    let end = now - now.rem_euclid(length);
    OffsetDateTime::from_unix_timestamp_nanos(end - length)
}

/// Run the latest interval of every network of `engine` that is complete at `complete`.
///
/// A network whose interval cannot be determined, or whose interval fails, is
/// logged and skipped; the remaining networks still run.
pub async fn run_networks<R, S, F>(
    engine: &IntervalOrchestrator<R, S, F>,
    complete: OffsetDateTime,
) -> Vec<Summary>
where
    R: TimeSeriesReader + Sync,
    S: AggregateSink + Sync,
    F: FlowSolver + Sync,
    FlowError: From<F::Error>,
{
    let mut summaries = Vec::new();
    for network in engine.networks() {
        let code = &network.code;
        let start = match latest_complete(complete, network.interval) {
            Ok(start) => start,
            Err(error) => {
                event!(Level::ERROR, network = %code, %complete, %error, "no interval to run");
                continue;
            }
        };

        // failures are already logged by the engine; the next tick moves on
        match engine.run_interval(start, code).await {
            Ok(summary) => summaries.push(summary),
            Err(failure) if failure.disposition() == Disposition::Fatal => {
                event!(Level::ERROR, network = %code, %start, "interval needs attention");
            }
            Err(_) => {}
        }
    }
    summaries
}
