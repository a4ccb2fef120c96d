//! Mount-scoped driver around [`AuthorizationGate`].
//!
//! A [`ProtectedView`] starts an evaluation when it is mounted and publishes
//! the resulting [`RenderState`] on a `watch` channel. Each evaluation
//! captures its own liveness flag; once the view is unmounted, or the
//! requirement changes, the flag is cleared and a late result is dropped
//! instead of being applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::guard::AuthorizationGate;
use super::role::Requirement;
use super::state::RenderState;

/// A protected view bound to one gate and one requirement at a time.
///
/// Must be mounted from within a Tokio runtime.
pub struct ProtectedView {
    gate: Arc<AuthorizationGate>,
    requirement: Requirement,
    state: Arc<watch::Sender<RenderState>>,
    evaluation: Option<Evaluation>,
}

struct Evaluation {
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Evaluation {
    fn cancel(self) {
        self.alive.store(false, Ordering::Release);
        self.task.abort();
    }
}

impl ProtectedView {
    /// Mounts the view and starts evaluating `requirement`.
    #[must_use]
    pub fn mount(gate: Arc<AuthorizationGate>, requirement: Requirement) -> Self {
        let (state, _) = watch::channel(RenderState::Loading);
        let mut view = Self {
            gate,
            requirement,
            state: Arc::new(state),
            evaluation: None,
        };
        view.start();
        view
    }

    /// The requirement currently being enforced.
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// The current render state.
    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state.borrow().clone()
    }

    /// Subscribes to render state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.state.subscribe()
    }

    /// Waits until the current evaluation publishes a decision.
    pub async fn resolved(&self) -> RenderState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives as long as `self`
            Err(_) => RenderState::Loading,
        }
    }

    /// Changes the requirement. An unchanged requirement is a no-op;
    /// otherwise the in-flight evaluation is discarded and a new one starts.
    pub fn set_requirement(&mut self, requirement: Requirement) {
        if requirement == self.requirement {
            return;
        }
        self.requirement = requirement;
        // Retire the old evaluation before publishing Loading so it cannot
        // overwrite it.
        self.stop();
        self.state.send_replace(RenderState::Loading);
        self.start();
    }

    /// Unmounts the view, discarding any in-flight evaluation.
    pub fn unmount(mut self) {
        self.stop();
    }

    fn start(&mut self) {
        self.stop();

        let alive = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn({
            let alive = alive.clone();
            let gate = self.gate.clone();
            let state = self.state.clone();
            let requirement = self.requirement;
            async move {
                let decision = gate.evaluate(requirement).await;
                let render = RenderState::from_decision(decision, &gate.config().routes);
                if !publish_if_alive(&state, &alive, render) {
                    tracing::debug!(role = %requirement.role, "Discarding result for unmounted view");
                }
            }
        });

        self.evaluation = Some(Evaluation { alive, task });
    }

    fn stop(&mut self) {
        if let Some(evaluation) = self.evaluation.take() {
            evaluation.cancel();
        }
    }
}

/// Publishes `render` unless the evaluation was retired. The liveness check
/// runs under the channel lock, so it is ordered against the `Loading`
/// published by a requirement change.
fn publish_if_alive(
    state: &watch::Sender<RenderState>,
    alive: &AtomicBool,
    render: RenderState,
) -> bool {
    state.send_if_modified(|current| {
        if !alive.load(Ordering::Acquire) {
            return false;
        }
        *current = render;
        true
    })
}

impl Drop for ProtectedView {
    fn drop(&mut self) {
        self.stop();
    }
}
