use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use super::{PlanRequest, PlanResponse, Planner, PlannerError, GENERATION_FAILED};

/// Observable state of one visitor's planner.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlanState {
    #[default]
    Idle,
    Pending,
    Fulfilled(PlanResponse),
    Rejected(String),
}

impl PlanState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PlanState::Pending)
    }

    pub fn plan(&self) -> Option<&PlanResponse> {
        match self {
            PlanState::Fulfilled(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PlanState::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

/// Tracks the single in-flight planner run for one visitor.
///
/// Each run gets a generation number. Starting a new run or cancelling
/// signals the previous run to stop, and a result whose generation is no
/// longer current is dropped.
#[derive(Debug, Default)]
pub struct PlanTracker {
    state: PlanState,
    generation: u64,
    cancel: Option<watch::Sender<bool>>,
}

/// Handle for one run, held by the task awaiting the planner.
pub struct PlanTicket {
    generation: u64,
    cancelled: watch::Receiver<bool>,
}

impl PlanTracker {
    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn begin(&mut self) -> PlanTicket {
        self.signal_cancel();
        self.generation += 1;
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(tx);
        self.state = PlanState::Pending;
        PlanTicket {
            generation: self.generation,
            cancelled: rx,
        }
    }

    /// Record the outcome of a run. Returns false when the run was
    /// superseded or cancelled and the outcome was discarded.
    pub fn finish(
        &mut self,
        generation: u64,
        outcome: Result<PlanResponse, PlannerError>,
    ) -> bool {
        if generation != self.generation || !self.state.is_pending() {
            tracing::debug!("Discarding stale planner result (run {})", generation);
            return false;
        }
        self.cancel = None;
        self.state = match outcome {
            Ok(plan) => PlanState::Fulfilled(plan),
            Err(e) => {
                tracing::error!("Error generating travel plan: {}", e);
                PlanState::Rejected(GENERATION_FAILED.to_string())
            }
        };
        true
    }

    /// Stop the in-flight run, if any, and return to idle.
    pub fn cancel(&mut self) {
        if self.state.is_pending() {
            self.signal_cancel();
            self.state = PlanState::Idle;
        }
    }

    fn signal_cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(true);
        }
    }
}

impl PlanTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Await the planner unless the run is cancelled first.
    pub async fn run(
        mut self,
        planner: &dyn Planner,
        request: &PlanRequest,
    ) -> Result<PlanResponse, PlannerError> {
        tokio::select! {
            result = planner.generate(request) => result,
            _ = wait_cancelled(&mut self.cancelled) => Err(PlannerError::Cancelled),
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    // A dropped sender without a cancel signal means the run finished.
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Trackers keyed by visitor id. Idle visitors are forgotten after
/// `idle_ttl`; a tracker with a run in flight is kept until it settles.
pub struct PlanTrackers {
    trackers: HashMap<String, (Instant, PlanTracker)>,
    idle_ttl: Duration,
}

impl PlanTrackers {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            trackers: HashMap::new(),
            idle_ttl,
        }
    }

    pub fn get(&self, visitor: &str) -> Option<&PlanTracker> {
        let (seen, tracker) = self.trackers.get(visitor)?;
        is_live(*seen, tracker, self.idle_ttl).then_some(tracker)
    }

    /// Tracker for `visitor`, created when missing. Refreshes its idle timer.
    pub fn entry(&mut self, visitor: &str) -> &mut PlanTracker {
        self.clear_stale();
        let (seen, tracker) = self
            .trackers
            .entry(visitor.to_string())
            .or_insert_with(|| (Instant::now(), PlanTracker::default()));
        *seen = Instant::now();
        tracker
    }

    pub fn get_mut(&mut self, visitor: &str) -> Option<&mut PlanTracker> {
        self.clear_stale();
        let (seen, tracker) = self.trackers.get_mut(visitor)?;
        *seen = Instant::now();
        Some(tracker)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    fn clear_stale(&mut self) {
        let ttl = self.idle_ttl;
        self.trackers
            .retain(|_, (seen, tracker)| is_live(*seen, tracker, ttl));
    }
}

fn is_live(seen: Instant, tracker: &PlanTracker, ttl: Duration) -> bool {
    tracker.state().is_pending() || seen.elapsed() < ttl
}
