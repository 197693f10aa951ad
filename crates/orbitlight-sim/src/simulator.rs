//! Light simulator — the periodic light-position source.
//!
//! `LightSimulator` owns a repeating timer. Each expiry publishes the
//! position for the current pose to every listener, then advances the pose
//! by one fixed step. `stop` cancels the timer and returns to the canonical
//! starting pose, so a restart replays the orbit from the beginning.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orbitlight_core::config::OrbitConfig;
use orbitlight_core::error::Result;
use orbitlight_core::types::Vector3;

use crate::listeners::{ListenerRegistry, SubscriptionId};
use crate::orbit::{OrbitState, OrbitSteps};
use crate::scheduler::{Scheduler, ThreadScheduler};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the simulator and its timer task.
#[derive(Default)]
struct TickShared {
    /// Serializes whole ticks (state update plus notification).
    tick_lock: Mutex<()>,
    state: Mutex<OrbitState>,
    listeners: Mutex<ListenerRegistry>,
}

impl TickShared {
    fn run_tick(&self, config: &OrbitConfig, steps: &OrbitSteps) {
        let _serial = lock(&self.tick_lock);

        let position = {
            let mut state = lock(&self.state);
            let position = state.position(config);
            if state.advance(steps) {
                log::trace!(
                    "vertical phase reversed to {:?} at offset {:.4}",
                    state.phase(),
                    state.vertical_offset()
                );
            }
            position
        };

        // Notify from a snapshot so listeners can call back into the simulator.
        let listeners = lock(&self.listeners).snapshot();
        log::trace!(
            "publishing light position ({:.4}, {:.4}, {:.4}) to {} listener(s)",
            position.x(),
            position.y(),
            position.z(),
            listeners.len()
        );
        for listener in listeners {
            listener(position);
        }
    }
}

/// Periodic light-position simulator.
///
/// Generic over the timer primitive; defaults to a wall-clock thread timer.
pub struct LightSimulator<S: Scheduler = ThreadScheduler> {
    config: OrbitConfig,
    steps: OrbitSteps,
    shared: Arc<TickShared>,
    scheduler: S,
    /// `Some` while running.
    timer: Mutex<Option<S::Handle>>,
}

impl LightSimulator<ThreadScheduler> {
    /// Create a simulator driven by a thread timer.
    ///
    /// The configuration is not validated; degenerate values produce
    /// NaN or infinite motion. Use `try_new` to reject them.
    pub fn new(config: OrbitConfig) -> Self {
        Self::with_scheduler(config, ThreadScheduler::new())
    }

    /// Create a simulator after validating the configuration.
    pub fn try_new(config: OrbitConfig) -> Result<Self> {
        Self::try_with_scheduler(config, ThreadScheduler::new())
    }
}

impl<S: Scheduler> LightSimulator<S> {
    /// Create a simulator driven by the given timer primitive (unchecked).
    pub fn with_scheduler(config: OrbitConfig, scheduler: S) -> Self {
        Self {
            config,
            steps: OrbitSteps::from_config(&config),
            shared: Arc::new(TickShared::default()),
            scheduler,
            timer: Mutex::new(None),
        }
    }

    /// Checked variant of `with_scheduler`.
    pub fn try_with_scheduler(config: OrbitConfig, scheduler: S) -> Result<Self> {
        if let Err(err) = config.validate() {
            log::warn!("rejecting orbit configuration: {err}");
            return Err(err);
        }
        Ok(Self::with_scheduler(config, scheduler))
    }

    /// Begin ticking every `tick_interval_ms`. No effect if already running.
    pub fn start(&self) {
        let mut timer = lock(&self.timer);
        if timer.is_some() {
            log::debug!("light simulator already running; start ignored");
            return;
        }

        let shared = Arc::clone(&self.shared);
        let config = self.config;
        let steps = self.steps;
        let handle = self.scheduler.schedule_repeating(
            self.config.tick_interval(),
            Box::new(move || shared.run_tick(&config, &steps)),
        );
        *timer = Some(handle);

        log::debug!(
            "light simulator started: tick {}ms, horizontal step {:.5} rad, vertical step {:.5} rad",
            self.config.tick_interval_ms,
            self.steps.horizontal_step,
            self.steps.vertical_step
        );
    }

    /// Cancel the timer if running and return to the starting pose.
    ///
    /// Safe to call repeatedly and from within a listener.
    pub fn stop(&self) {
        // Release the timer lock before cancelling: cancellation may wait
        // for an in-flight tick whose listeners call back into `stop`.
        let handle = lock(&self.timer).take();
        if let Some(handle) = handle {
            self.scheduler.cancel(handle);
            log::debug!("light simulator stopped");
        }
        lock(&self.shared.state).reset();
    }

    pub fn is_running(&self) -> bool {
        lock(&self.timer).is_some()
    }

    /// Register a callback invoked with every published position.
    ///
    /// Listeners run synchronously on the ticking thread, in registration order.
    pub fn on_position_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Vector3) + Send + Sync + 'static,
    {
        let id = lock(&self.shared.listeners).add(Arc::new(listener));
        log::debug!("registered position listener {id:?}");
        id
    }

    /// Unregister a callback. Returns false if it was not registered.
    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        lock(&self.shared.listeners).remove(id)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.shared.listeners).len()
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Per-tick increments derived at construction.
    pub fn steps(&self) -> OrbitSteps {
        self.steps
    }

    /// Copy of the current pose (for tests).
    #[cfg(test)]
    pub fn orbit_state(&self) -> OrbitState {
        *lock(&self.shared.state)
    }
}

impl<S: Scheduler> Drop for LightSimulator<S> {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}
