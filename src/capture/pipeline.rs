use std::{
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use image::RgbaImage;
use tokio::sync::watch;

use crate::{
    capture::filters::FilterKind,
    compose::inputs::CapturedFrame,
    foundation::error::{StripError, StripResult},
};

/// Default countdown start, in ticks.
pub const DEFAULT_COUNTDOWN: u32 = 3;
/// Time between countdown ticks.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Live video source the booth grabs stills from.
pub trait CameraSource: Send + Sync {
    /// Whether the stream is up and has reported its dimensions.
    fn is_ready(&self) -> bool {
        true
    }

    /// Current frame as straight-alpha RGBA, or `None` while no frame is available.
    fn grab(&self) -> StripResult<Option<RgbaImage>>;
}

/// How a grabbed frame is burned in before it becomes a strip frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptureSettings {
    pub mirror: bool,
    pub filter: FilterKind,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mirror: true,
            filter: FilterKind::None,
        }
    }
}

/// Countdown-then-grab capture. One capture runs at a time.
pub struct CapturePipeline {
    camera: Arc<dyn CameraSource>,
    countdown_from: u32,
    tick: Duration,
    countdown_tx: watch::Sender<Option<u32>>,
    busy: AtomicBool,
}

impl std::fmt::Debug for CapturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturePipeline")
            .field("countdown_from", &self.countdown_from)
            .field("tick", &self.tick)
            .field("capturing", &self.is_capturing())
            .finish_non_exhaustive()
    }
}

impl CapturePipeline {
    pub fn new(camera: Arc<dyn CameraSource>) -> Self {
        let (countdown_tx, _rx) = watch::channel(None);
        Self {
            camera,
            countdown_from: DEFAULT_COUNTDOWN,
            tick: COUNTDOWN_TICK,
            countdown_tx,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_countdown(mut self, from: u32) -> Self {
        self.countdown_from = from;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Value currently shown by the countdown overlay; `None` when no countdown runs.
    pub fn countdown(&self) -> watch::Receiver<Option<u32>> {
        self.countdown_tx.subscribe()
    }

    pub fn is_capturing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run the countdown, grab a frame and burn it in.
    ///
    /// `Ok(None)` means the camera had no usable frame; nothing was captured.
    pub async fn capture(&self, settings: CaptureSettings) -> StripResult<Option<CapturedFrame>> {
        if !self.camera.is_ready() {
            tracing::warn!("camera not ready, capture skipped");
            return Ok(None);
        }
        let _busy = BusyGuard::acquire(&self.busy, &self.countdown_tx)?;

        for n in (1..=self.countdown_from).rev() {
            self.countdown_tx.send_replace(Some(n));
            tracing::info!(remaining = n, "capture countdown");
            tokio::time::sleep(self.tick).await;
        }
        self.countdown_tx.send_replace(None);

        let Some(img) = self.camera.grab()? else {
            tracing::warn!("camera returned no frame, capture skipped");
            return Ok(None);
        };
        if img.width() == 0 || img.height() == 0 {
            tracing::warn!("camera frame has zero size, capture skipped");
            return Ok(None);
        }

        let (w, h) = img.dimensions();
        let frame = tokio::task::spawn_blocking(move || burn_in(img, settings))
            .await
            .map_err(|e| StripError::capture(format!("burn-in task failed: {e}")))??;
        tracing::info!(
            width = w,
            height = h,
            mirror = settings.mirror,
            filter = %settings.filter,
            bytes = frame.len(),
            "frame captured"
        );
        Ok(Some(frame))
    }
}

/// Mirror, filter and PNG-encode a grabbed frame.
pub fn burn_in(mut img: RgbaImage, settings: CaptureSettings) -> StripResult<CapturedFrame> {
    if settings.mirror {
        image::imageops::flip_horizontal_in_place(&mut img);
    }
    let img = settings.filter.apply(img);

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| StripError::capture(format!("encode captured frame: {e}")))?;
    Ok(CapturedFrame::from_encoded(out.into_inner()))
}

/// Holds the single capture slot; releasing it also clears the countdown overlay.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    countdown: &'a watch::Sender<Option<u32>>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(
        busy: &'a AtomicBool,
        countdown: &'a watch::Sender<Option<u32>>,
    ) -> StripResult<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StripError::capture("a capture is already in progress"))?;
        Ok(Self { busy, countdown })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.countdown.send_replace(None);
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pipeline.rs"]
mod tests;
