//! Lifetime of the engine across navigations.
//!
//! Every navigation cancels the running scheduler, empties the engine and
//! starts a fresh cycle. Shutdown is the only way out of [`Session::run`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::presenter::Presenter;
use crate::scheduler::{Scheduler, SchedulerExit};
use crate::view::MessageView;

/// The host switched to another conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: String,
}

impl Navigation {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

pub struct Session {
    engine: Engine,
    scheduler: Scheduler,
    navigations: u64,
}

impl Session {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
            scheduler: Scheduler::new(config),
            navigations: 0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Navigations handled so far.
    pub fn navigations(&self) -> u64 {
        self.navigations
    }

    /// Run the scheduler until `shutdown` fires, restarting it from an empty
    /// engine on every navigation received.
    pub async fn run<V, P>(
        &mut self,
        view: &V,
        presenter: &mut P,
        navigations: &mut mpsc::Receiver<Navigation>,
        shutdown: &CancellationToken,
    ) -> SchedulerExit
    where
        V: MessageView + ?Sized,
        P: Presenter + ?Sized,
    {
        let mut navigations_open = true;

        loop {
            let cycle = shutdown.child_token();
            let run = self.scheduler.run(&mut self.engine, view, presenter, &cycle);

            let navigation = tokio::select! {
                exit = run => return exit,
                navigation = navigations.recv(), if navigations_open => navigation,
            };
            // The dropped run future never resumes; cancel for anything sharing the token
            cycle.cancel();

            match navigation {
                Some(navigation) => {
                    self.navigations += 1;
                    info!(
                        "session: navigated to {} after {} cycles, dropping {} tracked roots",
                        navigation.location,
                        self.scheduler.cycles(),
                        self.engine.records().len()
                    );
                    self.engine.reset();
                    self.scheduler.reset();
                }
                None => navigations_open = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{reply, root, FakeView};
    use crate::scheduler::tests::PaintingPresenter;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_navigation_restarts_from_empty_store() {
        let config = EngineConfig::default();
        let mut session = Session::new(&config);
        let view = FakeView::default();
        view.show(vec![root("R1", 1, "alpha"), reply("A", "a.png")]);
        let mut presenter = PaintingPresenter::new(&view);
        let (tx, mut rx) = mpsc::channel(4);
        let shutdown = CancellationToken::new();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            // Same number of indicators, so only the navigation can trigger the reset
            view.show(vec![root("R2", 1, "beta"), reply("X", "x.png")]);
            tx.send(Navigation::new("/team/channels/other")).await.unwrap();
            tokio::time::sleep(Duration::from_millis(2200)).await;
            shutdown.cancel();
        };
        let (exit, _) = tokio::join!(
            session.run(&view, &mut presenter, &mut rx, &shutdown),
            driver
        );

        assert_eq!(session.navigations(), 1);
        let ids: Vec<_> = session.engine().records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R2"]);
        assert_eq!(session.engine().records()[0].recent_authors.to_vec(), vec!["x.png"]);
        assert!(!session.engine().store().is_processed("A"));
        // 0, 1000 before navigating; 1500, 2500, 3500 after
        assert_eq!(exit.cycles, 2 + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_restarts_backoff_from_base() {
        let config = EngineConfig::default();
        let mut session = Session::new(&config);
        let view = FakeView::default();
        let mut presenter = PaintingPresenter::new(&view);
        let (tx, mut rx) = mpsc::channel(4);
        let shutdown = CancellationToken::new();

        let driver = async {
            // Two exhausted probes: waits of 1s and 2s, the second cut short
            tokio::time::sleep(Duration::from_millis(9000)).await;
            tx.send(Navigation::new("/team/channels/other")).await.unwrap();
            // Fresh probe exhausts at 12600ms, then waits the 1s base
            tokio::time::sleep(Duration::from_millis(4000)).await;
            view.show(vec![root("R1", 1, "alpha")]);
            tokio::time::sleep(Duration::from_millis(1000)).await;
            shutdown.cancel();
        };
        let (exit, _) = tokio::join!(
            session.run(&view, &mut presenter, &mut rx, &shutdown),
            driver
        );

        // Found at 13600ms; a carried-over 4s wait would still be sleeping
        assert_eq!(exit.cycles, 1);
        assert_eq!(session.engine().records().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_navigation_channel_keeps_running() {
        let config = EngineConfig::default();
        let mut session = Session::new(&config);
        let view = FakeView::default();
        view.show(vec![root("R1", 1, "alpha")]);
        let mut presenter = PaintingPresenter::new(&view);
        let (tx, mut rx) = mpsc::channel::<Navigation>(1);
        drop(tx);
        let shutdown = CancellationToken::new();

        let driver = async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            shutdown.cancel();
        };
        let (_, _) = tokio::join!(session.run(&view, &mut presenter, &mut rx, &shutdown), driver);

        assert_eq!(session.navigations(), 0);
        assert_eq!(session.engine().records().len(), 1);
        assert_eq!(session.scheduler().state(), crate::scheduler::SchedulerState::Idle);
    }
}
