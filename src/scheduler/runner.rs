use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use super::error::{SchedulerError, TickError};
use super::status::{LoopState, SchedulerStatus};
use super::SchedulePolicy;
use crate::catalog::Catalog;
use crate::config::RefreshConfig;
use crate::frame::{build_frame, Frame};
use crate::geofence::Geofence;
use crate::propagate::{PropagationError, Propagator};
use crate::publish::{ArtifactLocation, Publisher};

type Shared = Arc<StdMutex<SchedulerStatus>>;

/// Drives frame production: build, publish, sleep, repeat.
pub struct Scheduler<P, B> {
    catalog: Arc<Catalog>,
    propagator: P,
    geofence: Geofence,
    publisher: B,
    refresh: RefreshConfig,
}

impl<P, B> Scheduler<P, B>
where
    P: Propagator,
    B: Publisher,
{
    pub fn new(
        catalog: Arc<Catalog>,
        propagator: P,
        geofence: Geofence,
        publisher: B,
        refresh: RefreshConfig,
    ) -> Self {
        Self {
            catalog,
            propagator,
            geofence,
            publisher,
            refresh,
        }
    }

    pub fn build(&self, now: DateTime<Utc>) -> Result<Frame, PropagationError> {
        build_frame(&self.catalog, &self.propagator, &self.geofence, now)
    }

    /// Builds and publishes a single frame captured at `now`.
    pub fn tick(&self, now: DateTime<Utc>) -> Result<(Frame, ArtifactLocation), TickError> {
        let frame = self.build(now)?;
        let location = self.publisher.publish(&frame)?;
        Ok((frame, location))
    }

    fn run_tick(&self, shared: &Shared) -> Result<ArtifactLocation, TickError> {
        let now = Utc::now();
        set_state(shared, LoopState::Building);

        let result = self.build(now).map_err(TickError::from).and_then(|frame| {
            log_frame(&frame);
            set_state(shared, LoopState::Publishing);
            let location = self.publisher.publish(&frame)?;
            Ok((frame, location))
        });

        let mut status = lock(shared);
        status.ticks += 1;
        match result {
            Ok((frame, location)) => {
                status.frames_published += 1;
                status.last_captured_at = Some(frame.captured_at());
                status.last_artifact = Some(location.path().to_path_buf());
                status.last_error = None;
                status.consecutive_failures = 0;
                Ok(location)
            }
            Err(err) => {
                status.last_error = Some(err.to_string());
                status.consecutive_failures += 1;
                log::error!(
                    "Tick {} failed ({} in a row), previous artifact left in place: {}",
                    status.ticks,
                    status.consecutive_failures,
                    err
                );
                Err(err)
            }
        }
    }
}

impl<P, B> Scheduler<P, B>
where
    P: Propagator + Send + Sync + 'static,
    B: Publisher + Send + Sync + 'static,
{
    /// Starts the refresh loop on the tokio runtime. The loop runs until
    /// `token` is cancelled or the failure ceiling is hit.
    pub fn spawn(self, token: CancellationToken) -> SchedulerHandle {
        let shared: Shared = Arc::new(StdMutex::new(SchedulerStatus::default()));
        let (published_tx, published_rx) = watch::channel(None);

        let join = tokio::spawn(run_refresh_loop(
            self,
            shared.clone(),
            published_tx,
            token.clone(),
        ));

        SchedulerHandle {
            token,
            shared,
            published: published_rx,
            join: Some(join),
        }
    }
}

pub struct SchedulerHandle {
    token: CancellationToken,
    shared: Shared,
    published: watch::Receiver<Option<ArtifactLocation>>,
    join: Option<JoinHandle<Result<(), SchedulerError>>>,
}

impl SchedulerHandle {
    pub fn status(&self) -> SchedulerStatus {
        lock(&self.shared).clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ArtifactLocation>> {
        self.published.clone()
    }

    #[cfg(test)]
    pub async fn first_publish(&self) -> Option<ArtifactLocation> {
        first_publish(self.subscribe()).await
    }

    /// Waits for the loop to end on its own.
    pub async fn finished(&mut self) -> Result<(), SchedulerError> {
        match self.join.as_mut() {
            Some(join) => {
                let result = join.await;
                self.join = None;
                result?
            }
            None => Ok(()),
        }
    }

    /// Cancels the loop and waits for it to wind down.
    pub async fn stop(&mut self) -> Result<(), SchedulerError> {
        self.token.cancel();
        match self.join.take() {
            Some(join) => join.await?,
            None => Ok(()),
        }
    }
}

/// Resolves with the first published artifact, or `None` if the loop ends
/// before publishing anything.
pub async fn first_publish(
    mut published: watch::Receiver<Option<ArtifactLocation>>,
) -> Option<ArtifactLocation> {
    loop {
        if let Some(location) = published.borrow_and_update().clone() {
            return Some(location);
        }
        if published.changed().await.is_err() {
            return None;
        }
    }
}

async fn run_refresh_loop<P, B>(
    scheduler: Scheduler<P, B>,
    shared: Shared,
    published: watch::Sender<Option<ArtifactLocation>>,
    token: CancellationToken,
) -> Result<(), SchedulerError>
where
    P: Propagator + Send + Sync + 'static,
    B: Publisher + Send + Sync + 'static,
{
    let refresh = scheduler.refresh.clone();
    let scheduler = Arc::new(scheduler);
    log::info!(
        "Refresh loop started: every {} ({})",
        humantime::format_duration(refresh.interval),
        refresh.policy
    );

    let mut scheduled = Instant::now();
    let result = loop {
        if token.is_cancelled() {
            break Ok(());
        }

        // Propagation, rendering and fsync all block.
        let tick = {
            let scheduler = Arc::clone(&scheduler);
            let shared = Arc::clone(&shared);
            tokio::task::spawn_blocking(move || scheduler.run_tick(&shared)).await
        };
        let tick = match tick {
            Ok(tick) => tick,
            Err(e) => break Err(SchedulerError::Join(e)),
        };

        match tick {
            Ok(location) => {
                published.send_replace(Some(location));
            }
            Err(err) => {
                let failures = lock(&shared).consecutive_failures;
                if let Some(max) = refresh.max_consecutive_failures {
                    if failures >= max {
                        break Err(SchedulerError::TooManyFailures {
                            failures,
                            last_error: err.to_string(),
                        });
                    }
                }
            }
        }

        set_state(&shared, LoopState::Sleeping);
        scheduled = next_deadline(refresh.policy, scheduled, Instant::now(), refresh.interval);

        let should_stop = tokio::select! {
            _ = sleep_until(scheduled) => false,
            _ = token.cancelled() => true,
        };
        if should_stop {
            break Ok(());
        }
    };

    set_state(&shared, LoopState::Stopped);
    match &result {
        Ok(()) => log::info!("Refresh loop stopped"),
        Err(e) => log::error!("Refresh loop aborted: {}", e),
    }
    result
}

/// When the tick after the one scheduled at `scheduled` should start, given
/// that the current tick finished at `now`.
fn next_deadline(
    policy: SchedulePolicy,
    scheduled: Instant,
    now: Instant,
    interval: Duration,
) -> Instant {
    match policy {
        SchedulePolicy::FixedDelay => now + interval,
        SchedulePolicy::FixedRate => {
            let mut deadline = scheduled + interval;
            while deadline <= now {
                deadline += interval;
            }
            deadline
        }
    }
}

fn log_frame(frame: &Frame) {
    log::info!(
        "LIVE UPDATE | {} UTC | {} satellites, {} over region",
        frame.captured_at().format("%Y-%m-%d %H:%M:%S"),
        frame.len(),
        frame.in_region_count()
    );
    for obs in frame.observations() {
        log::debug!("{}", obs.report_line());
    }
}

fn lock(shared: &Shared) -> MutexGuard<'_, SchedulerStatus> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_state(shared: &Shared, state: LoopState) {
    lock(shared).state = state;
}
