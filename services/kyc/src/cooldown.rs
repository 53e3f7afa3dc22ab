//! Cancellable one-second countdown gating OTP re-requests.
//!
//! The countdown runs on its own tokio task and publishes the remaining
//! seconds through a `watch` channel. Dropping a [`Cooldown`] aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Cooldown {
    tx: Arc<watch::Sender<u64>>,
    rx: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl Cooldown {
    /// Inactive timer (remaining = 0).
    pub fn idle() -> Self {
        let (tx, rx) = watch::channel(0);
        Self {
            tx: Arc::new(tx),
            rx,
            task: None,
        }
    }

    /// Start counting down from `secs`. Must be called inside a tokio runtime.
    ///
    /// The first decrement happens one second after start; `start(0)` is idle.
    pub fn start(secs: u64) -> Self {
        let mut cooldown = Self::idle();
        if secs == 0 {
            return cooldown;
        }
        cooldown.tx.send_replace(secs);

        let tx = Arc::clone(&cooldown.tx);
        cooldown.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut remaining = secs;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                tx.send_replace(remaining);
                tracing::trace!(remaining, "otp cooldown tick");
            }
        }));
        cooldown
    }

    pub fn remaining(&self) -> u64 {
        *self.rx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    /// Receiver for UIs that render the countdown. `changed()` fires on the next tick.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        let mut rx = self.rx.clone();
        rx.borrow_and_update();
        rx
    }

    /// Resolves once the countdown reaches zero (immediately if idle or stopped).
    pub async fn expired(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so this only ends on zero.
        let _ = rx.wait_for(|remaining| *remaining == 0).await;
    }

    /// Cancel the countdown and re-enable requests.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.tx.send_replace(0);
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::idle()
    }
}

impl Drop for Cooldown {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
