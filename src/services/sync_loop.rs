use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, warn};

use crate::{
    api::{QuizGateway, SessionId},
    state::{DisplayStore, SharedStore, normalize},
};

/// Message shown when a failed poll carries no description.
const POLL_FAILURE_FALLBACK: &str = "Failed to load state";

/// Where the polling loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Not started, or stopped.
    Idle,
    /// A fetch is in flight.
    Polling,
    /// The last fetch resolved (success or failure) and the next tick is pending.
    Settled,
}

/// Recurring fetch-and-normalize cycle feeding the display store.
///
/// The first cycle runs immediately on [`SyncLoop::start`], then one per
/// interval. Cycles never overlap. Stopping (or dropping) the loop guarantees
/// that no fetch issued before the stop writes to the store afterwards, on
/// current-thread and multi-thread runtimes alike.
pub struct SyncLoop {
    gateway: Arc<dyn QuizGateway>,
    store: SharedStore,
    interval: Duration,
    phase: Arc<watch::Sender<LoopPhase>>,
    running: Option<RunningLoop>,
}

/// Handle on one started run of the loop.
struct RunningLoop {
    session: Option<SessionId>,
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RunningLoop {
    /// Clear the liveness flag, then wait out any store write already past its check.
    fn cancel(self, store: &DisplayStore) {
        self.alive.store(false, Ordering::Release);
        self.task.abort();
        store.settle_writes();
    }
}

impl SyncLoop {
    /// Build an idle loop. Nothing is fetched until [`SyncLoop::start`].
    pub fn new(gateway: Arc<dyn QuizGateway>, store: SharedStore, interval: Duration) -> Self {
        let (phase, _rx) = watch::channel(LoopPhase::Idle);
        Self {
            gateway,
            store,
            interval,
            phase: Arc::new(phase),
            running: None,
        }
    }

    /// Start polling `session`, replacing any run already in progress.
    pub fn start(&mut self, session: Option<SessionId>) {
        self.stop();

        let alive = Arc::new(AtomicBool::new(true));
        let poller = Poller {
            gateway: self.gateway.clone(),
            store: self.store.clone(),
            session: session.clone(),
            alive: alive.clone(),
            phase: self.phase.clone(),
        };
        let task = tokio::spawn(poller.run(self.interval));

        info!(
            session = ?session,
            interval_ms = self.interval.as_millis() as u64,
            "sync loop started"
        );
        self.running = Some(RunningLoop {
            session,
            alive,
            task,
        });
    }

    /// Stop polling. Returns `false` when the loop was not running.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.cancel(&self.store);
        self.phase.send_replace(LoopPhase::Idle);
        info!("sync loop stopped");
        true
    }

    /// Point the loop at another session, restarting it only when the session changed.
    pub fn set_session(&mut self, session: Option<SessionId>) {
        match &self.running {
            Some(running) if running.session == session => {}
            _ => self.start(session),
        }
    }

    /// Whether a run is in progress.
    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// Current loop phase.
    pub fn phase(&self) -> LoopPhase {
        *self.phase.borrow()
    }

    /// Session the running loop is polling, if any.
    pub fn session(&self) -> Option<&SessionId> {
        self.running.as_ref().and_then(|running| running.session.as_ref())
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel(&self.store);
        }
    }
}

/// State captured by one run; `alive` is checked inside every write.
struct Poller {
    gateway: Arc<dyn QuizGateway>,
    store: SharedStore,
    session: Option<SessionId>,
    alive: Arc<AtomicBool>,
    phase: Arc<watch::Sender<LoopPhase>>,
}

impl Poller {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Move to `next` unless the run was stopped; `stop` resets to `Idle` under the same lock.
    fn set_phase(&self, next: LoopPhase) {
        self.phase.send_if_modified(|phase| {
            if !self.is_alive() || *phase == next {
                return false;
            }
            *phase = next;
            true
        });
    }

    async fn run(self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_alive() {
                break;
            }
            self.cycle().await;
        }
    }

    /// One fetch-normalize-publish iteration.
    async fn cycle(&self) {
        self.set_phase(LoopPhase::Polling);
        let result = self.gateway.fetch_state(self.session.clone()).await;

        if !self.is_alive() {
            debug!("discarding poll result received after stop");
            return;
        }

        match result {
            Ok(payload) => {
                let view = normalize(&payload.into_value());
                if !self.store.publish_snapshot_if_live(view, &self.alive) {
                    debug!("discarding poll result received after stop");
                    return;
                }
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = POLL_FAILURE_FALLBACK.to_string();
                }
                warn!(error = %message, status = ?err.status(), "poll failed; keeping last state");
                if !self.store.record_poll_failure_if_live(message, &self.alive) {
                    return;
                }
            }
        }
        self.set_phase(LoopPhase::Settled);
    }
}
