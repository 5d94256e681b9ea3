use crate::foundation::core::{
    FRAME_ASPECT_RATIO, FRAME_GAP, FRAME_MARGIN, FrameRect, StripCapacity,
};

/// Rectangle of frame slot `index` on a strip of the given size.
///
/// Capacity 4 is a single column; capacity 8 is two columns filled row by row. Frame size is
/// uniform within a configuration and always has the fixed 4:3 aspect ratio.
///
/// `strip_height` does not influence the layout; frames are stacked from the top.
///
/// # Panics
///
/// Panics if `index >= capacity.count()`. Callers truncate their frame list first.
pub fn frame_layout(
    strip_width: f64,
    _strip_height: f64,
    capacity: StripCapacity,
    index: usize,
) -> FrameRect {
    assert!(
        index < capacity.count(),
        "frame index {index} out of range for capacity {capacity}"
    );

    match capacity {
        StripCapacity::Four => {
            let width = strip_width - FRAME_MARGIN * 2.0;
            let height = width / FRAME_ASPECT_RATIO;
            FrameRect::new(
                FRAME_MARGIN,
                FRAME_MARGIN + index as f64 * (height + FRAME_GAP),
                width,
                height,
            )
        }
        StripCapacity::Eight => {
            let cols = capacity.columns();
            let width = (strip_width - FRAME_MARGIN * (cols as f64 + 1.0)) / cols as f64;
            let height = width / FRAME_ASPECT_RATIO;
            let col = (index % cols) as f64;
            let row = (index / cols) as f64;
            FrameRect::new(
                FRAME_MARGIN + col * (width + FRAME_MARGIN),
                FRAME_MARGIN + row * (height + FRAME_MARGIN),
                width,
                height,
            )
        }
    }
}

/// All slot rectangles of a configuration, in index order.
pub fn frame_layouts(
    strip_width: f64,
    strip_height: f64,
    capacity: StripCapacity,
) -> Vec<FrameRect> {
    (0..capacity.count())
        .map(|i| frame_layout(strip_width, strip_height, capacity, i))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/frames.rs"]
mod tests;
