use std::sync::{Mutex, atomic::AtomicUsize};

use image::Rgba;

use super::*;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

struct FakeCamera {
    ready: bool,
    frame: Mutex<Option<RgbaImage>>,
    fail: bool,
    grabs: AtomicUsize,
}

impl FakeCamera {
    fn with_frame(img: RgbaImage) -> Self {
        Self {
            ready: true,
            frame: Mutex::new(Some(img)),
            fail: false,
            grabs: AtomicUsize::new(0),
        }
    }

    fn red_blue() -> Self {
        let mut img = RgbaImage::from_pixel(2, 1, RED);
        img.put_pixel(1, 0, BLUE);
        Self::with_frame(img)
    }
}

impl CameraSource for FakeCamera {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn grab(&self) -> StripResult<Option<RgbaImage>> {
        self.grabs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StripError::capture("device unplugged"));
        }
        Ok(self.frame.lock().unwrap().clone())
    }
}

fn decode(frame: &CapturedFrame) -> RgbaImage {
    image::load_from_memory(frame.bytes()).unwrap().to_rgba8()
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_once_per_second_before_the_grab() {
    let camera = Arc::new(FakeCamera::red_blue());
    let pipeline = Arc::new(CapturePipeline::new(camera.clone()));
    let rx = pipeline.countdown();

    let task = tokio::spawn({
        let p = pipeline.clone();
        async move { p.capture(CaptureSettings::default()).await }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(*rx.borrow(), Some(3));
    assert!(pipeline.is_capturing());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*rx.borrow(), Some(2));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*rx.borrow(), Some(1));
    assert_eq!(camera.grabs.load(Ordering::SeqCst), 0);

    let frame = task.await.unwrap().unwrap().expect("frame captured");
    assert_eq!(*rx.borrow(), None);
    assert!(!pipeline.is_capturing());
    assert_eq!(camera.grabs.load(Ordering::SeqCst), 1);
    assert_eq!(decode(&frame).dimensions(), (2, 1));
}

#[tokio::test(start_paused = true)]
async fn second_capture_during_countdown_is_rejected() {
    let pipeline = Arc::new(CapturePipeline::new(Arc::new(FakeCamera::red_blue())));
    let first = tokio::spawn({
        let p = pipeline.clone();
        async move { p.capture(CaptureSettings::default()).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = pipeline.capture(CaptureSettings::default()).await.unwrap_err();
    assert!(matches!(err, StripError::Capture(_)));

    assert!(first.await.unwrap().unwrap().is_some());
    // slot released afterwards
    assert!(
        pipeline
            .capture(CaptureSettings::default())
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test(start_paused = true)]
async fn camera_without_a_usable_frame_captures_nothing() {
    let not_ready = Arc::new(FakeCamera {
        ready: false,
        ..FakeCamera::red_blue()
    });
    let p = CapturePipeline::new(not_ready.clone());
    assert!(p.capture(CaptureSettings::default()).await.unwrap().is_none());
    assert_eq!(not_ready.grabs.load(Ordering::SeqCst), 0);

    let empty = CapturePipeline::new(Arc::new(FakeCamera::with_frame(RgbaImage::new(0, 0))))
        .with_countdown(0);
    assert!(empty.capture(CaptureSettings::default()).await.unwrap().is_none());

    let none = FakeCamera::red_blue();
    *none.frame.lock().unwrap() = None;
    let p = CapturePipeline::new(Arc::new(none)).with_countdown(0);
    assert!(p.capture(CaptureSettings::default()).await.unwrap().is_none());
    assert!(!p.is_capturing());
}

#[tokio::test(start_paused = true)]
async fn grab_errors_propagate_and_release_the_slot() {
    let camera = Arc::new(FakeCamera {
        fail: true,
        ..FakeCamera::red_blue()
    });
    let p = CapturePipeline::new(camera).with_countdown(1);
    let rx = p.countdown();
    assert!(p.capture(CaptureSettings::default()).await.is_err());
    assert!(!p.is_capturing());
    assert_eq!(*rx.borrow(), None);
}

#[test]
fn burn_in_mirrors_then_filters() {
    let mut img = RgbaImage::from_pixel(2, 1, RED);
    img.put_pixel(1, 0, BLUE);

    let mirrored = decode(&burn_in(img.clone(), CaptureSettings::default()).unwrap());
    assert_eq!(*mirrored.get_pixel(0, 0), BLUE);
    assert_eq!(*mirrored.get_pixel(1, 0), RED);

    let straight = CaptureSettings {
        mirror: false,
        filter: FilterKind::Invert,
    };
    let inverted = decode(&burn_in(img, straight).unwrap());
    assert_eq!(inverted.get_pixel(0, 0).0, [0, 255, 255, 255]);
    assert_eq!(inverted.get_pixel(1, 0).0, [255, 255, 0, 255]);
}
