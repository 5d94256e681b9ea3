use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::compose::{compositor::StripRenderer, inputs::StripInputs, preview::StripPreview};

/// Default quiet period between the last input change and regeneration.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegenState {
    Idle,
    /// A change arrived and the quiet-period timer is running.
    Pending,
}

#[derive(Debug, Default)]
struct Counters {
    pending: AtomicBool,
    started: AtomicU64,
    completed: AtomicU64,
}

/// Debounced regeneration: after the inputs stop changing for one quiet period, the latest
/// snapshot is rendered and published.
///
/// Runs are never cancelled once started. A run that finishes after a newer one overwrites the
/// newer preview until the next run completes; previews are published in completion order.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct RegenController {
    preview_rx: watch::Receiver<Option<StripPreview>>,
    counters: Arc<Counters>,
    worker: JoinHandle<()>,
}

impl RegenController {
    /// Start watching `inputs`. The current snapshot is rendered once the first quiet period
    /// elapses, even if nothing changes.
    pub fn spawn(
        inputs: watch::Receiver<StripInputs>,
        renderer: Arc<dyn StripRenderer>,
        quiet_period: Duration,
    ) -> Self {
        let (preview_tx, preview_rx) = watch::channel(None);
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(
            inputs,
            renderer,
            quiet_period,
            Arc::new(preview_tx),
            counters.clone(),
        ));
        Self {
            preview_rx,
            counters,
            worker,
        }
    }

    /// Receiver of the most recently completed preview.
    pub fn preview(&self) -> watch::Receiver<Option<StripPreview>> {
        self.preview_rx.clone()
    }

    pub fn latest(&self) -> Option<StripPreview> {
        self.preview_rx.borrow().clone()
    }

    pub fn state(&self) -> RegenState {
        if self.counters.pending.load(Ordering::Acquire) {
            RegenState::Pending
        } else {
            RegenState::Idle
        }
    }

    pub fn runs_started(&self) -> u64 {
        self.counters.started.load(Ordering::Acquire)
    }

    pub fn runs_completed(&self) -> u64 {
        self.counters.completed.load(Ordering::Acquire)
    }

    /// Cancel the pending timer and stop watching. In-flight runs still publish.
    pub fn shutdown(&self) {
        if !self.worker.is_finished() {
            tracing::debug!("regeneration controller shut down");
        }
        self.worker.abort();
        self.counters.pending.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }
}

impl Drop for RegenController {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(
    mut inputs: watch::Receiver<StripInputs>,
    renderer: Arc<dyn StripRenderer>,
    quiet_period: Duration,
    preview_tx: Arc<watch::Sender<Option<StripPreview>>>,
    counters: Arc<Counters>,
) {
    // Initial render of whatever the store holds.
    inputs.mark_changed();

    loop {
        if inputs.changed().await.is_err() {
            break;
        }
        counters.pending.store(true, Ordering::Release);
        tracing::trace!(?quiet_period, "regeneration scheduled");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(quiet_period) => break,
                changed = inputs.changed() => {
                    if changed.is_err() {
                        counters.pending.store(false, Ordering::Release);
                        tracing::debug!("input store closed with a regeneration pending");
                        return;
                    }
                    tracing::trace!("input changed, quiet period restarted");
                }
            }
        }

        let snapshot = inputs.borrow_and_update().clone();
        counters.pending.store(false, Ordering::Release);
        let run = counters.started.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(run, frames = snapshot.frames.len(), "regeneration started");

        let render = renderer.render(snapshot);
        let tx = preview_tx.clone();
        let done = counters.clone();
        tokio::spawn(async move {
            let preview = render.await;
            tx.send_replace(Some(preview));
            done.completed.fetch_add(1, Ordering::AcqRel);
            tracing::debug!(run, "regeneration published");
        });
    }

    counters.pending.store(false, Ordering::Release);
    tracing::debug!("input store closed, regeneration stopped");
}

#[cfg(test)]
#[path = "../../tests/unit/session/regen.rs"]
mod tests;
