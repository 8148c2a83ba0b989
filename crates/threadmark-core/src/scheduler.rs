//! Drives reconciliation passes on a fixed interval.
//!
//! ```text
//! Idle ──run──▶ Probing ──window found──▶ Steady ──window empty──▶ Probing
//!                  │
//!                  └─ retries exhausted ─▶ long wait ─▶ Probing
//! ```
//!
//! Passes never overlap: a pass is synchronous and the only suspension points
//! are the inter-cycle sleep and the probe delay. Cancellation is observed at
//! the next suspension point at the latest, and no pass starts once the token
//! is cancelled.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::models::ViewMessage;
use crate::presenter::Presenter;
use crate::view::MessageView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// Looking for a non-empty window
    Probing { failed_attempts: u32 },
    /// Running passes on the poll interval
    Steady,
}

/// Why [`Scheduler::run`] returned. Cancellation is the only way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerExit {
    /// Reconciliation passes run over the scheduler's lifetime, including no-op ones
    pub cycles: u64,
}

#[derive(Debug)]
enum ProbeOutcome {
    Found(Vec<ViewMessage>),
    Exhausted,
    Cancelled,
}

/// Long wait after an exhausted probe: doubles each time, capped.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: base,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

pub struct Scheduler {
    poll_interval: Duration,
    probe_delay: Duration,
    probe_retries: u32,
    backoff: Backoff,
    state: SchedulerState,
    cycles: u64,
}

impl Scheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            probe_delay: config.probe_delay(),
            probe_retries: config.probe_retries.max(1),
            backoff: Backoff::new(config.backoff_base(), config.backoff_max()),
            state: SchedulerState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Forget the backoff progress of an abandoned run. The cycle count is kept.
    pub fn reset(&mut self) {
        self.backoff.reset();
        self.transition(SchedulerState::Idle);
    }

    /// Run passes until `cancel` fires.
    pub async fn run<V, P>(
        &mut self,
        engine: &mut Engine,
        view: &V,
        presenter: &mut P,
        cancel: &CancellationToken,
    ) -> SchedulerExit
    where
        V: MessageView + ?Sized,
        P: Presenter + ?Sized,
    {
        self.transition(SchedulerState::Probing { failed_attempts: 0 });

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let window = match self.probe(view, cancel).await {
                ProbeOutcome::Found(window) => window,
                ProbeOutcome::Cancelled => break,
                ProbeOutcome::Exhausted => {
                    let wait = self.backoff.next_delay();
                    info!(
                        "scheduler: no messages after {} probes, waiting {:?}",
                        self.probe_retries, wait
                    );
                    if !sleep_or_cancel(wait, cancel).await {
                        break;
                    }
                    continue;
                }
            };

            self.backoff.reset();
            self.transition(SchedulerState::Steady);
            if cancel.is_cancelled() {
                break;
            }

            if let Ok(report) = engine.run_pass(&window, view, presenter) {
                self.cycles += 1;
                if report.decision.is_some() {
                    debug!("scheduler: cycle {} -> {:?}", self.cycles, report.decision);
                }
            }

            if !sleep_or_cancel(self.poll_interval, cancel).await {
                break;
            }
        }

        self.transition(SchedulerState::Idle);
        SchedulerExit {
            cycles: self.cycles,
        }
    }

    /// Query for a non-empty window, up to `probe_retries` times.
    async fn probe<V>(&mut self, view: &V, cancel: &CancellationToken) -> ProbeOutcome
    where
        V: MessageView + ?Sized,
    {
        for attempt in 1..=self.probe_retries {
            if attempt > 1 && !sleep_or_cancel(self.probe_delay, cancel).await {
                return ProbeOutcome::Cancelled;
            }

            let window = view.visible_messages();
            if !window.is_empty() {
                return ProbeOutcome::Found(window);
            }
            self.transition(SchedulerState::Probing {
                failed_attempts: attempt,
            });
        }

        ProbeOutcome::Exhausted
    }

    fn transition(&mut self, next: SchedulerState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            info!("scheduler: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}

/// Sleep for `duration`. Returns `false` if cancelled first.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
