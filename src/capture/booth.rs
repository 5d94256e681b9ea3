use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    capture::{
        filters::FilterKind,
        pipeline::{CameraSource, CapturePipeline, CaptureSettings},
    },
    compose::{
        compositor::{Compositor, StripRenderer},
        preview::StripPreview,
    },
    config::BoothOpts,
    foundation::{
        core::StripCapacity,
        error::{StripError, StripResult},
    },
    session::{regen::RegenController, store::StripStore},
};

#[derive(Debug)]
struct BoothState {
    retake: Option<usize>,
    settings: CaptureSettings,
}

/// One booth session: the strip inputs, live preview regeneration and the capture flow.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct PhotoBooth {
    store: StripStore,
    regen: RegenController,
    pipeline: CapturePipeline,
    state: Mutex<BoothState>,
}

impl PhotoBooth {
    pub fn new(
        opts: &BoothOpts,
        camera: Arc<dyn CameraSource>,
        renderer: Arc<dyn StripRenderer>,
    ) -> Self {
        let store = StripStore::new(opts.max_stamps);
        let regen = RegenController::spawn(store.subscribe(), renderer, opts.quiet_period());
        let pipeline = CapturePipeline::new(camera).with_countdown(opts.countdown_secs);
        Self {
            store,
            regen,
            pipeline,
            state: Mutex::new(BoothState {
                retake: None,
                settings: CaptureSettings::default(),
            }),
        }
    }

    /// Booth rendering through a [`Compositor`] configured from `opts`.
    pub fn with_compositor(opts: &BoothOpts, camera: Arc<dyn CameraSource>) -> Self {
        Self::new(opts, camera, Arc::new(Compositor::from_opts(opts)))
    }

    /// Replace the capture pipeline, e.g. to shorten the countdown tick.
    pub fn with_pipeline(mut self, pipeline: CapturePipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn store(&self) -> &StripStore {
        &self.store
    }

    pub fn regen(&self) -> &RegenController {
        &self.regen
    }

    pub fn pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }

    fn state(&self) -> MutexGuard<'_, BoothState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn mirror(&self) -> bool {
        self.state().settings.mirror
    }

    pub fn set_mirror(&self, mirror: bool) {
        self.state().settings.mirror = mirror;
    }

    pub fn filter(&self) -> FilterKind {
        self.state().settings.filter
    }

    pub fn set_filter(&self, filter: FilterKind) {
        self.state().settings.filter = filter;
        tracing::debug!(%filter, "capture filter selected");
    }

    pub fn retake_index(&self) -> Option<usize> {
        self.state().retake
    }

    /// Make the next capture replace frame `index`.
    pub fn request_retake(&self, index: usize) -> StripResult<()> {
        let capacity = self.store.capacity().count();
        if index >= capacity {
            return Err(StripError::validation(format!(
                "retake index {index} is outside a {capacity}-frame strip"
            )));
        }
        self.state().retake = Some(index);
        Ok(())
    }

    pub fn cancel_retake(&self) {
        self.state().retake = None;
    }

    /// No capture is running, and the strip has a free slot or a retake is pending.
    pub fn can_capture(&self) -> bool {
        !self.pipeline.is_capturing() && (!self.store.is_full() || self.retake_index().is_some())
    }

    /// Run one capture and route the frame into the strip.
    ///
    /// Returns whether the strip changed. A completed retake clears the pending retake index.
    pub async fn capture(&self) -> StripResult<bool> {
        if self.pipeline.is_capturing() {
            return Err(StripError::capture("a capture is already in progress"));
        }
        let (retake, settings) = {
            let s = self.state();
            (s.retake, s.settings)
        };
        if retake.is_none() && self.store.is_full() {
            return Err(StripError::capture("strip is full; pick a frame to retake"));
        }

        let Some(frame) = self.pipeline.capture(settings).await? else {
            return Ok(false);
        };

        let changed = self.store.apply_capture(frame, retake);
        if retake.is_some() {
            let mut s = self.state();
            if s.retake == retake {
                s.retake = None;
            }
        }
        tracing::debug!(?retake, changed, frames = self.store.frame_count(), "capture applied");
        Ok(changed)
    }

    /// Switch strip format; a pending retake outside the new capacity is dropped.
    pub fn set_capacity(&self, capacity: StripCapacity) -> bool {
        let changed = self.store.set_capacity(capacity);
        let mut s = self.state();
        if s.retake.is_some_and(|i| i >= capacity.count()) {
            s.retake = None;
        }
        changed
    }

    /// Start over: empty strip, defaults restored, no filter, no pending retake.
    pub fn reset(&self) -> bool {
        {
            let mut s = self.state();
            s.retake = None;
            s.settings.filter = FilterKind::None;
        }
        self.store.reset()
    }

    pub fn latest_preview(&self) -> Option<StripPreview> {
        self.regen.latest()
    }

    /// Save the current preview into `dir`. `Ok(None)` when no preview exists yet.
    pub fn download(&self, dir: &Path) -> StripResult<Option<PathBuf>> {
        self.latest_preview()
            .map(|p| p.save_download(dir))
            .transpose()
    }

    pub fn shutdown(&self) {
        self.regen.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/booth.rs"]
mod tests;
