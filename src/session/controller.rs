//! View switching state machine.
//!
//! A switch issues a fresh generation token and hands the photograph load to a worker thread.
//! Completions come back over a channel tagged with the token they were issued for; only the
//! completion carrying the current token of an in-flight transition is ever applied. Workers are
//! never cancelled, their late results are simply dropped.
//!
//! Every transition carries a deadline. Once it passes the owner settles the view on a
//! placeholder, so a stalled load never keeps the canvas locked.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::render::compositor::PhotoOutcome;
use crate::scene::view::View;

/// Where the view controller is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// `view` is fully built and editable.
    Idle(View),
    /// A switch to `to` is in flight.
    Transitioning {
        /// View that was active when the switch started (`None` while the first view loads).
        from: Option<View>,
        /// Requested view.
        to: View,
        /// Generation token of the in-flight load.
        token: u64,
    },
}

impl ControllerState {
    /// Active view when idle.
    pub fn idle_view(self) -> Option<View> {
        match self {
            ControllerState::Idle(v) => Some(v),
            ControllerState::Transitioning { .. } => None,
        }
    }

    /// View being shown or loaded.
    pub fn target(self) -> View {
        match self {
            ControllerState::Idle(v) => v,
            ControllerState::Transitioning { to, .. } => to,
        }
    }
}

/// Completion of one background photograph load.
#[derive(Debug)]
pub(crate) struct BackgroundLoad {
    pub(crate) token: u64,
    pub(crate) view: View,
    /// Resolved reference the photograph was fetched from, for caching.
    pub(crate) source_key: Option<String>,
    pub(crate) photo: PhotoOutcome,
}

#[derive(Debug)]
pub(crate) struct ViewController {
    state: ControllerState,
    last_token: u64,
    load_timeout: Duration,
    deadline: Option<Instant>,
    tx: mpsc::Sender<BackgroundLoad>,
    rx: mpsc::Receiver<BackgroundLoad>,
}

impl ViewController {
    /// Controller about to load `initial`; call [`ViewController::begin`] next.
    ///
    /// Each transition started by `begin` expires `load_timeout` later.
    pub(crate) fn new(initial: View, load_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: ControllerState::Transitioning {
                from: None,
                to: initial,
                token: 0,
            },
            last_token: 0,
            load_timeout,
            deadline: None,
            tx,
            rx,
        }
    }

    pub(crate) fn state(&self) -> ControllerState {
        self.state
    }

    /// Enter `Transitioning` towards `to` under a fresh token, superseding any in-flight switch.
    pub(crate) fn begin(&mut self, to: View) -> u64 {
        self.last_token += 1;
        let token = self.last_token;
        let from = self.state.idle_view();
        self.state = ControllerState::Transitioning { from, to, token };
        self.deadline = Some(Instant::now() + self.load_timeout);
        tracing::debug!(?from, %to, token, "view transition started");
        token
    }

    /// Return `true` when `load` completes the current transition.
    pub(crate) fn accepts(&self, load: &BackgroundLoad) -> bool {
        matches!(
            self.state,
            ControllerState::Transitioning { to, token, .. }
                if token == load.token && to == load.view
        )
    }

    pub(crate) fn finish(&mut self, view: View) {
        self.state = ControllerState::Idle(view);
        self.deadline = None;
        tracing::debug!(%view, "view idle");
    }

    pub(crate) fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// When the in-flight transition expires.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        match self.state {
            ControllerState::Transitioning { .. } => self.deadline,
            ControllerState::Idle(_) => None,
        }
    }

    /// Target and token of the in-flight transition if its deadline has passed at `now`.
    pub(crate) fn expired(&self, now: Instant) -> Option<(View, u64)> {
        match (self.state, self.deadline) {
            (ControllerState::Transitioning { to, token, .. }, Some(deadline)) if now >= deadline => {
                Some((to, token))
            }
            _ => None,
        }
    }

    /// Enqueue a completion that is already known (cached or missing photograph).
    pub(crate) fn complete_now(
        &self,
        token: u64,
        view: View,
        source_key: Option<String>,
        photo: PhotoOutcome,
    ) {
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.tx.send(BackgroundLoad {
            token,
            view,
            source_key,
            photo,
        });
    }

    /// Run `job` on a worker thread and enqueue its outcome.
    pub(crate) fn spawn_load<F>(&self, token: u64, view: View, source_key: String, job: F)
    where
        F: FnOnce() -> PhotoOutcome + Send + 'static,
    {
        let tx = self.tx.clone();
        let key = source_key.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("drape-load-{}", view.file_stem()))
            .spawn(move || {
                let photo = job();
                let _ = tx.send(BackgroundLoad {
                    token,
                    view,
                    source_key: Some(key),
                    photo,
                });
            });
        if let Err(e) = spawned {
            tracing::warn!(%view, error = %e, "could not start background load worker");
            self.complete_now(
                token,
                view,
                None,
                PhotoOutcome::Failed(format!("spawn load worker: {e}")),
            );
        }
    }

    pub(crate) fn try_recv(&self) -> Option<BackgroundLoad> {
        self.rx.try_recv().ok()
    }

    /// Block for the next completion; `None` on timeout.
    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Option<BackgroundLoad> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
