use tokio::sync::watch;

use crate::{
    compose::inputs::{CapturedFrame, EmojiStamp, StripInputs},
    foundation::{core::StripCapacity, math::SplitMix64},
    template::model::Template,
};

/// Default cap on stamps per strip.
pub const MAX_STAMPS: usize = 10;

/// Observable holder of the compositor inputs.
///
/// Every mutation that changes the snapshot notifies subscribers; a mutation that leaves it
/// unchanged notifies nobody. Mutators return whether anything changed.
#[derive(Debug)]
pub struct StripStore {
    tx: watch::Sender<StripInputs>,
    max_stamps: usize,
}

impl Default for StripStore {
    fn default() -> Self {
        Self::new(MAX_STAMPS)
    }
}

impl StripStore {
    pub fn new(max_stamps: usize) -> Self {
        Self::with_inputs(StripInputs::default(), max_stamps)
    }

    pub fn with_inputs(inputs: StripInputs, max_stamps: usize) -> Self {
        let (tx, _rx) = watch::channel(inputs);
        Self { tx, max_stamps }
    }

    /// Receiver that observes every published change.
    pub fn subscribe(&self) -> watch::Receiver<StripInputs> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> StripInputs {
        self.tx.borrow().clone()
    }

    pub fn capacity(&self) -> StripCapacity {
        self.tx.borrow().config.capacity
    }

    pub fn frame_count(&self) -> usize {
        self.tx.borrow().frames.len()
    }

    pub fn is_full(&self) -> bool {
        let s = self.tx.borrow();
        s.frames.len() >= s.config.capacity.count()
    }

    pub fn stamp_count(&self) -> usize {
        self.tx.borrow().stamps.len()
    }

    /// Append a frame while the strip has free slots.
    pub fn push_frame(&self, frame: CapturedFrame) -> bool {
        self.tx.send_if_modified(|s| {
            if s.frames.len() >= s.config.capacity.count() {
                return false;
            }
            s.frames.push(frame);
            true
        })
    }

    /// Replace frame `index` in place, or append when `index` is past the end and a slot is free.
    pub fn retake(&self, index: usize, frame: CapturedFrame) -> bool {
        self.tx.send_if_modified(|s| {
            if let Some(slot) = s.frames.get_mut(index) {
                if *slot == frame {
                    return false;
                }
                *slot = frame;
            } else if s.frames.len() < s.config.capacity.count() {
                s.frames.push(frame);
            } else {
                return false;
            }
            true
        })
    }

    /// Route a finished capture: a retake replaces, anything else appends.
    pub fn apply_capture(&self, frame: CapturedFrame, retake: Option<usize>) -> bool {
        match retake {
            Some(index) => self.retake(index, frame),
            None => self.push_frame(frame),
        }
    }

    pub fn add_stamp(&self, glyph: impl Into<String>, x: f64, y: f64) -> bool {
        let stamp = EmojiStamp::new(glyph, x, y);
        let max = self.max_stamps;
        self.tx.send_if_modified(|s| {
            if s.stamps.len() >= max {
                return false;
            }
            s.stamps.push(stamp);
            true
        })
    }

    /// Add a stamp somewhere in the central 80% of the strip.
    pub fn add_stamp_random(&self, glyph: impl Into<String>, seed: u64) -> bool {
        let (w, h) = {
            let s = self.tx.borrow();
            (f64::from(s.config.width), f64::from(s.config.height))
        };
        let mut rng = SplitMix64::new(seed);
        let x = rng.next_f64() * w * 0.8 + w * 0.1;
        let y = rng.next_f64() * h * 0.8 + h * 0.1;
        self.add_stamp(glyph, x, y)
    }

    pub fn set_caption(&self, caption: impl Into<String>) -> bool {
        let caption = caption.into();
        self.tx.send_if_modified(|s| {
            if s.caption == caption {
                return false;
            }
            s.caption = caption;
            true
        })
    }

    pub fn set_template(&self, template: Template) -> bool {
        self.tx.send_if_modified(|s| {
            if s.template == template {
                return false;
            }
            s.template = template;
            true
        })
    }

    /// Switch strip format. Frames beyond the new capacity are dropped.
    pub fn set_capacity(&self, capacity: StripCapacity) -> bool {
        self.tx.send_if_modified(|s| {
            if s.config.capacity == capacity {
                return false;
            }
            s.config = capacity.config();
            s.frames.truncate(capacity.count());
            true
        })
    }

    /// Clear frames and stamps and restore caption, template and capacity defaults.
    pub fn reset(&self) -> bool {
        self.tx.send_if_modified(|s| {
            let fresh = StripInputs::default();
            if *s == fresh {
                return false;
            }
            *s = fresh;
            true
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
