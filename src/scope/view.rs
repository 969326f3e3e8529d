use std::ops::Range;
use crate::scope::buffer::Snapshot;
use crate::scope::mapper::{x_axis_title, GridLine, PlotArea, PlotMapper, Tick, Trace};
use crate::scope::processor::ScopeProcessor;
use crate::scope::sample::DisplayMode;
use crate::scope::viewport::Viewport;
pub const PLACEHOLDER: &str = "Waiting for signal...";
pub const TITLE: &str = "Time Domain Signal";
pub const Y_AXIS_TITLE: &str = "Amplitude";
/// Everything the host renderer needs for one refresh.
#[derive(Clone, Debug)]
pub struct ScopeFrame {
    pub mode: DisplayMode,
    /// Legend text for the current mode.
    pub mode_label: &'static str,
    /// Widget size the frame was laid out for.
    pub widget_size: [f32; 2],
    pub area: PlotArea,
    pub max_magnitude: f32,
    pub sample_count: usize,
    pub visible: Range<usize>,
    pub traces: Vec<Trace>,
    pub grid: Vec<GridLine>,
    pub amplitude_ticks: Vec<Tick>,
    pub time_ticks: Vec<Tick>,
    pub title: &'static str,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    pub zoom_label: String,
    /// Set when there is nothing buffered yet.
    pub placeholder: Option<&'static str>,
}
/// Render-thread state: viewport plus the widget geometry it is drawn into.
#[derive(Clone, Debug)]
pub struct ScopeView {
    viewport: Viewport,
    widget_size: [f32; 2],
    area: PlotArea,
}
impl ScopeView {
    pub fn new(widget_width: f32, widget_height: f32) -> Self {
        Self {
            viewport: Viewport::default(),
            widget_size: [widget_width, widget_height],
            area: PlotArea::inset(widget_width, widget_height),
        }
    }
    pub fn resize(&mut self, widget_width: f32, widget_height: f32) {
        self.widget_size = [widget_width, widget_height];
        self.area = PlotArea::inset(widget_width, widget_height);
    }
    pub fn area(&self) -> PlotArea {
        self.area
    }
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    /// Wheel over the widget; `cursor_x` is in widget pixels.
    pub fn on_wheel(&mut self, delta: f32, cursor_x: f32) {
        if delta == 0.0 {
            return;
        }
        let pivot = if self.area.width > 0.0 {
            (cursor_x - self.area.left) / self.area.width
        } else {
            0.0
        };
        self.viewport.zoom_step(delta > 0.0, pivot);
    }
    pub fn on_drag(&mut self, dx: f32) {
        self.viewport.pan_pixels(dx, self.area.width);
    }
    pub fn on_double_click(&mut self) {
        self.viewport.reset();
    }
    pub fn frame(&self, processor: &ScopeProcessor) -> ScopeFrame {
        let snapshot = processor.snapshot();
        self.frame_from(&snapshot, processor.display_mode(), processor.sample_rate_hz())
    }
    pub fn frame_from(&self, snapshot: &Snapshot, mode: DisplayMode, sample_rate_hz: f64) -> ScopeFrame {
        let mapper = PlotMapper::new(self.area);
        let total = snapshot.len();
        let visible = self.viewport.visible_range(total);
        let traces = if snapshot.is_empty() {
            Vec::new()
        } else {
            let channels = snapshot.channels(mode);
            mapper.build(&channels, visible.clone(), snapshot.max_magnitude, mode.is_bipolar())
        };
        ScopeFrame {
            mode,
            mode_label: mode.label(),
            widget_size: self.widget_size,
            area: self.area,
            max_magnitude: snapshot.max_magnitude,
            sample_count: total,
            visible,
            traces,
            grid: mapper.grid_lines(),
            amplitude_ticks: mapper.amplitude_ticks(snapshot.max_magnitude),
            time_ticks: mapper.time_ticks(&self.viewport, total, sample_rate_hz),
            title: TITLE,
            x_axis_title: x_axis_title(sample_rate_hz),
            y_axis_title: Y_AXIS_TITLE,
            zoom_label: self.viewport.zoom_label(),
            placeholder: snapshot.is_empty().then_some(PLACEHOLDER),
        }
    }
}
