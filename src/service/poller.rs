use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior, interval_at}
};
use tracing::{debug, info, trace, warn};

use crate::{
    domain::{DEFAULT_STALE_AFTER, ReadingStore},
    port::ReadingSource
};

/// What a single poll cycle did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated,
    Empty,
    Failed
}

/// Periodically pulls from a [`ReadingSource`] into the store.
pub struct Poller<S: ReadingSource> {
    source:      Arc<S>,
    store:       ReadingStore,
    interval:    Duration,
    stale_after: u32
}

impl<S: ReadingSource + 'static> Poller<S> {
    pub fn new(source: S, store: ReadingStore, interval: Duration) -> Self {
        Self { source: Arc::new(source), store, interval, stale_after: DEFAULT_STALE_AFTER }
    }

    /// Cycles without an update before a stale streak is logged. 0 disables it.
    pub fn with_stale_after(mut self, cycles: u32) -> Self {
        self.stale_after = cycles;
        self
    }

    /// Ask the source once and store whatever it has.
    ///
    /// The call runs on the blocking pool and has no timeout: a hung decoder
    /// stalls this poller but nothing else. Errors and panics from the source
    /// are logged and leave the store untouched.
    pub async fn poll_once(&self) -> PollOutcome {
        let source = Arc::clone(&self.source);
        match tokio::task::spawn_blocking(move || source.current_reading()).await {
            Ok(Ok(Some(reading))) => {
                debug!(bytes = reading.len(), "storing new reading");
                self.store.set(reading);
                PollOutcome::Updated
            }
            Ok(Ok(None)) => {
                trace!("no new reading");
                PollOutcome::Empty
            }
            Ok(Err(err)) => {
                warn!("decoder call failed: {err}");
                PollOutcome::Failed
            }
            Err(err) => {
                warn!("decoder call did not complete: {err}");
                PollOutcome::Failed
            }
        }
    }

    /// Poll every interval until `shutdown` flips to true or its sender is
    /// dropped. The first poll happens one interval after start.
    ///
    /// Shutdown also cuts short a poll that is still waiting on the source;
    /// the blocked decoder thread is left behind.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow_and_update() {
            return;
        }

        info!("polling every {:?}", self.interval);
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut quiet_cycles: u32 = 0;
        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => {
                    warn!("decoder call still running at shutdown, abandoning it");
                    break;
                }
                outcome = self.poll_once() => outcome
            };

            match outcome {
                PollOutcome::Updated => quiet_cycles = 0,
                PollOutcome::Empty | PollOutcome::Failed => {
                    quiet_cycles = quiet_cycles.saturating_add(1);
                    if quiet_cycles == self.stale_after {
                        let since = self.store.snapshot().updated_at;
                        match since {
                            Some(at) => info!("no new reading for {quiet_cycles} polls (last at {at})"),
                            None => info!("no reading received yet after {quiet_cycles} polls")
                        }
                    }
                }
            }
        }

        info!("poller stopped");
    }
}

/// Resolves once shutdown is requested or the sender is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
