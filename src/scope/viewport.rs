use std::ops::Range;
use log::debug;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 100.0;
const WHEEL_ZOOM_IN: f32 = 1.2;
const WHEEL_ZOOM_OUT: f32 = 0.8;
/// Zoom and pan over the normalized `[0, 1)` extent of the buffer.
///
/// The visible window is `[pan / zoom, pan / zoom + 1 / zoom)`, kept inside `[0, 1)` by
/// holding `pan_offset` in `[0, zoom - 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan_offset: f32,
}
impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            pan_offset: 0.0,
        }
    }
}
impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn zoom(&self) -> f32 {
        self.zoom
    }
    pub fn pan_offset(&self) -> f32 {
        self.pan_offset
    }
    pub fn set_zoom(&mut self, requested: f32, pivot: f32) {
        let new_zoom = clamp_zoom(requested);
        let pivot = if pivot.is_nan() { 0.0 } else { pivot.clamp(0.0, 1.0) };
        let old_zoom = self.zoom;
        self.pan_offset *= new_zoom / old_zoom;
        self.zoom = new_zoom;
        self.clamp_pan();
        debug!(
            "zoom {old_zoom:.2} -> {new_zoom:.2} (pivot {pivot:.2}), pan {:.3}",
            self.pan_offset
        );
    }
    /// Mouse wheel step; the zoom only moves when the clamped value actually changes.
    pub fn zoom_step(&mut self, wheel_up: bool, pivot: f32) {
        let factor = if wheel_up { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        let new_zoom = clamp_zoom(self.zoom * factor);
        if new_zoom != self.zoom {
            self.set_zoom(new_zoom, pivot);
        }
    }
    pub fn pan(&mut self, delta_normalized: f32) {
        if !delta_normalized.is_finite() {
            return;
        }
        self.pan_offset -= delta_normalized * self.zoom;
        self.clamp_pan();
    }
    /// Drag by `dx` pixels across a plot `plot_width` pixels wide.
    pub fn pan_pixels(&mut self, dx: f32, plot_width: f32) {
        if plot_width > 0.0 {
            self.pan(dx / plot_width);
        }
    }
    pub fn reset(&mut self) {
        *self = Self::default();
    }
    pub fn is_zoomed(&self) -> bool {
        self.zoom > MIN_ZOOM
    }
    /// Start and end of the visible window as buffer fractions.
    pub fn visible_fraction(&self) -> (f32, f32) {
        let start = self.pan_offset / self.zoom;
        (start, start + 1.0 / self.zoom)
    }
    /// Absolute sample indices for a buffer of `total_samples`, end clamped to the last index.
    ///
    /// An empty buffer yields `0..0`, meaning nothing to draw.
    pub fn visible_range(&self, total_samples: usize) -> Range<usize> {
        if total_samples == 0 {
            return 0..0;
        }
        let (start, end) = self.visible_fraction();
        let last = total_samples - 1;
        let total = total_samples as f32;
        let end_index = ((end * total).floor().max(0.0) as usize).min(last);
        let start_index = ((start * total).floor().max(0.0) as usize).min(end_index);
        start_index..end_index
    }
    pub fn zoom_label(&self) -> String {
        let mut label = format!("Zoom: {:.1}x", self.zoom);
        if self.is_zoomed() {
            label.push_str(" (Double-click to reset)");
        }
        label
    }
    fn clamp_pan(&mut self) {
        let max_offset = self.zoom - 1.0;
        self.pan_offset = self.pan_offset.clamp(0.0, max_offset);
    }
}
fn clamp_zoom(requested: f32) -> f32 {
    if requested.is_nan() {
        return MIN_ZOOM;
    }
    requested.clamp(MIN_ZOOM, MAX_ZOOM)
}
