use std::ops::Range;
use crate::scope::sample::ChannelSet;
use crate::scope::viewport::Viewport;
const LEFT_MARGIN: f32 = 60.0;
const RIGHT_MARGIN: f32 = 20.0;
const TOP_MARGIN: f32 = 30.0;
const BOTTOM_MARGIN: f32 = 40.0;
/// Fraction of the half height used by bipolar traces at full scale.
const BIPOLAR_HEADROOM: f32 = 0.9;
/// Grid and tick divisions along each axis.
pub const DIVISIONS: usize = 10;
/// Pixel rectangle the traces are drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}
impl PlotArea {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
    /// Plot rectangle inside a widget of the given size, leaving room for axis labels.
    pub fn inset(widget_width: f32, widget_height: f32) -> Self {
        Self::new(
            LEFT_MARGIN,
            TOP_MARGIN,
            widget_width - LEFT_MARGIN - RIGHT_MARGIN,
            widget_height - TOP_MARGIN - BOTTOM_MARGIN,
        )
    }
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
    pub fn pixel_width(&self) -> usize {
        self.width as usize
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceChannel {
    Primary,
    Secondary,
}
/// Connected screen-space polyline for one display channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub channel: TraceChannel,
    pub points: Vec<[f32; 2]>,
}
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel coordinate along the axis (y for amplitude, x for time).
    pub position: f32,
    pub value: f64,
    pub label: String,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub orientation: Orientation,
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub major: bool,
}
/// Turns display channels and a visible range into plot geometry.
#[derive(Clone, Copy, Debug)]
pub struct PlotMapper {
    area: PlotArea,
}
impl PlotMapper {
    pub fn new(area: PlotArea) -> Self {
        Self { area }
    }
    pub fn area(&self) -> PlotArea {
        self.area
    }
    /// Decimate the visible range to one point per pixel column.
    ///
    /// Uses a plain stride of `max(1, visible / width)` samples; no min/max envelope is
    /// kept, so short spikes between stride points can be skipped at high decimation.
    pub fn build(
        &self,
        channels: &ChannelSet,
        range: Range<usize>,
        max_magnitude: f32,
        bipolar: bool,
    ) -> Vec<Trace> {
        if range.end <= range.start {
            return Vec::new();
        }
        let mut traces = Vec::with_capacity(2);
        let primary = self.trace_points(&channels.primary, &range, max_magnitude, bipolar);
        if !primary.is_empty() {
            traces.push(Trace {
                channel: TraceChannel::Primary,
                points: primary,
            });
        }
        if let Some(secondary) = &channels.secondary {
            let points = self.trace_points(secondary, &range, max_magnitude, true);
            if !points.is_empty() {
                traces.push(Trace {
                    channel: TraceChannel::Secondary,
                    points,
                });
            }
        }
        traces
    }
    pub fn samples_per_pixel(&self, visible: usize) -> usize {
        match self.area.pixel_width() {
            0 => 1,
            width => (visible / width).max(1),
        }
    }
    fn trace_points(
        &self,
        values: &[f32],
        range: &Range<usize>,
        max_magnitude: f32,
        bipolar: bool,
    ) -> Vec<[f32; 2]> {
        let stride = self.samples_per_pixel(range.end - range.start);
        let last = range.end - 1;
        let columns = self.area.pixel_width().saturating_sub(1);
        let mut points = Vec::new();
        for x in 0..columns {
            let index = range.start + x * stride;
            if index >= last {
                break;
            }
            let (Some(&first), Some(&second)) =
                (values.get(index), values.get((index + stride).min(last)))
            else {
                break;
            };
            let column = self.area.left + x as f32;
            if points.is_empty() {
                points.push([column, self.map_y(first, max_magnitude, bipolar)]);
            }
            points.push([column + 1.0, self.map_y(second, max_magnitude, bipolar)]);
        }
        points
    }
    /// Screen y for a channel value scaled by the current peak estimate.
    pub fn map_y(&self, value: f32, max_magnitude: f32, bipolar: bool) -> f32 {
        let ratio = if max_magnitude > 0.0 && value.is_finite() {
            value / max_magnitude
        } else {
            0.0
        };
        if bipolar {
            let normalized = ratio.clamp(-1.0, 1.0);
            self.area.center_y() - normalized * (self.area.height / 2.0) * BIPOLAR_HEADROOM
        } else {
            let normalized = ratio.clamp(0.0, 1.0);
            self.area.bottom() - normalized * self.area.height
        }
    }
    /// Eleven labels from `max_magnitude` at the top down to zero at the bottom.
    pub fn amplitude_ticks(&self, max_magnitude: f32) -> Vec<Tick> {
        (0..=DIVISIONS)
            .map(|i| {
                let value = max_magnitude as f64 * (DIVISIONS - i) as f64 / DIVISIONS as f64;
                Tick {
                    position: self.area.top + self.area.height * i as f32 / DIVISIONS as f32,
                    value,
                    label: format!("{value:.2e}"),
                }
            })
            .collect()
    }
    /// Eleven labels across the visible part of a buffer holding `total_samples`.
    ///
    /// `value` is in seconds when the sample rate is known, otherwise a sample index.
    pub fn time_ticks(&self, viewport: &Viewport, total_samples: usize, sample_rate_hz: f64) -> Vec<Tick> {
        let (start, end) = viewport.visible_fraction();
        (0..=DIVISIONS)
            .map(|i| {
                let fraction = start as f64 + (end - start) as f64 * i as f64 / DIVISIONS as f64;
                let sample_pos = total_samples as f64 * fraction;
                let value = if sample_rate_hz > 0.0 {
                    sample_pos / sample_rate_hz
                } else {
                    sample_pos
                };
                Tick {
                    position: self.area.left + self.area.width * i as f32 / DIVISIONS as f32,
                    value,
                    label: format_time_label(sample_pos, sample_rate_hz),
                }
            })
            .collect()
    }
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let area = self.area;
        let mut lines = Vec::with_capacity(2 * (DIVISIONS + 1));
        for i in 0..=DIVISIONS {
            let y = area.top + area.height * i as f32 / DIVISIONS as f32;
            lines.push(GridLine {
                orientation: Orientation::Horizontal,
                from: [area.left, y],
                to: [area.right(), y],
                major: i % 2 == 0,
            });
        }
        for i in 0..=DIVISIONS {
            let x = area.left + area.width * i as f32 / DIVISIONS as f32;
            lines.push(GridLine {
                orientation: Orientation::Vertical,
                from: [x, area.top],
                to: [x, area.bottom()],
                major: i % 2 == 0,
            });
        }
        lines
    }
}
/// Time label for a sample position; falls back to the raw sample index when the rate is unknown.
pub fn format_time_label(sample_pos: f64, sample_rate_hz: f64) -> String {
    if sample_rate_hz <= 0.0 {
        return format!("{sample_pos:.0}");
    }
    let millis = sample_pos / sample_rate_hz * 1000.0;
    if millis < 1.0 {
        format!("{:.1}μs", millis * 1000.0)
    } else if millis < 1000.0 {
        format!("{millis:.2}ms")
    } else {
        format!("{:.2}s", millis / 1000.0)
    }
}
pub fn x_axis_title(sample_rate_hz: f64) -> &'static str {
    if sample_rate_hz > 0.0 {
        "Time"
    } else {
        "Sample Number"
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::sample::{ComplexSample, DisplayMode};
    fn area() -> PlotArea {
        PlotArea::new(0.0, 0.0, 100.0, 200.0)
    }
    fn ramp(n: usize) -> ChannelSet {
        ChannelSet {
            primary: (0..n).map(|i| i as f32).collect(),
            secondary: None,
        }
    }
    #[test]
    fn empty_range_draws_nothing() {
        let mapper = PlotMapper::new(area());
        assert!(mapper.build(&ramp(10), 0..0, 1.0, true).is_empty());
        assert!(mapper.build(&ramp(10), 5..5, 1.0, true).is_empty());
    }
    #[test]
    fn stride_picks_every_nth_sample() {
        let mapper = PlotMapper::new(area());
        let channels = ramp(1000);
        let traces = mapper.build(&channels, 0..999, 1000.0, false);
        assert_eq!(traces.len(), 1);
        let points = &traces[0].points;
        // 999 visible over 100 columns -> stride 9, 99 segments.
        assert_eq!(mapper.samples_per_pixel(999), 9);
        assert_eq!(points.len(), 100);
        assert_eq!(points[0], [0.0, mapper.map_y(0.0, 1000.0, false)]);
        assert_eq!(points[1], [1.0, mapper.map_y(9.0, 1000.0, false)]);
        assert_eq!(points[99], [99.0, mapper.map_y(891.0, 1000.0, false)]);
    }
    #[test]
    fn short_range_stops_at_last_visible_sample() {
        let mapper = PlotMapper::new(area());
        let traces = mapper.build(&ramp(10), 2..6, 10.0, true);
        let xs: Vec<f32> = traces[0].points.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        let last_y = traces[0].points[3][1];
        assert_eq!(last_y, mapper.map_y(5.0, 10.0, true));
    }
    #[test]
    fn bipolar_and_unipolar_mapping() {
        let mapper = PlotMapper::new(area());
        assert_eq!(mapper.map_y(0.0, 2.0, true), 100.0);
        assert_eq!(mapper.map_y(2.0, 2.0, true), 10.0);
        assert_eq!(mapper.map_y(-4.0, 2.0, true), 190.0);
        assert_eq!(mapper.map_y(0.0, 2.0, false), 200.0);
        assert_eq!(mapper.map_y(1.0, 2.0, false), 100.0);
        assert_eq!(mapper.map_y(-1.0, 2.0, false), 200.0);
        assert_eq!(mapper.map_y(9.0, 2.0, false), 0.0);
        assert_eq!(mapper.map_y(1.0, 0.0, true), 100.0);
    }
    #[test]
    fn both_mode_yields_second_trace() {
        let mapper = PlotMapper::new(area());
        let samples: Vec<_> = (0..50)
            .map(|i| ComplexSample::new(i as f32 / 50.0, -(i as f32) / 50.0))
            .collect();
        let channels = ChannelSet::from_samples(&samples, DisplayMode::Both);
        let traces = mapper.build(&channels, 0..49, 1.0, true);
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].channel, TraceChannel::Secondary);
        assert_eq!(traces[0].points.len(), traces[1].points.len());
        assert!(traces[1].points[10][1] > 100.0);
        assert!(traces[0].points[10][1] < 100.0);
    }
    #[test]
    fn amplitude_ticks_descend_from_peak() {
        let mapper = PlotMapper::new(area());
        let ticks = mapper.amplitude_ticks(2.0);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].value, 2.0);
        assert_eq!(ticks[0].position, 0.0);
        assert_eq!(ticks[10].value, 0.0);
        assert_eq!(ticks[10].position, 200.0);
        assert_eq!(ticks[5].label, "1.00e0");
    }
    #[test]
    fn time_ticks_follow_viewport() {
        let mapper = PlotMapper::new(area());
        let mut vp = Viewport::new();
        let ticks = mapper.time_ticks(&vp, 1000, 1000.0);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].label, "0.0μs");
        assert_eq!(ticks[1].label, "100.00ms");
        assert_eq!(ticks[10].label, "1.00s");
        vp.set_zoom(4.0, 0.0);
        vp.pan(-0.25);
        let zoomed = mapper.time_ticks(&vp, 1000, 1000.0);
        assert_eq!(zoomed[0].label, "250.00ms");
        assert_eq!(zoomed[10].label, "500.00ms");
        let raw = mapper.time_ticks(&vp, 1000, 0.0);
        assert_eq!(raw[0].label, "250");
        assert_eq!(raw[0].value, 250.0);
    }
    #[test]
    fn time_label_units() {
        assert_eq!(format_time_label(1.0, 2_000_000.0), "0.5μs");
        assert_eq!(format_time_label(2_500.0, 250_000.0), "10.00ms");
        assert_eq!(format_time_label(500_000.0, 250_000.0), "2.00s");
        assert_eq!(format_time_label(42.4, 0.0), "42");
        assert_eq!(x_axis_title(0.0), "Sample Number");
        assert_eq!(x_axis_title(48_000.0), "Time");
    }
    #[test]
    fn grid_has_major_every_other_line() {
        let lines = PlotMapper::new(PlotArea::inset(400.0, 300.0)).grid_lines();
        assert_eq!(lines.len(), 22);
        assert_eq!(lines.iter().filter(|l| l.major).count(), 12);
        assert_eq!(lines[0].from, [60.0, 30.0]);
        assert_eq!(lines[21].to, [380.0, 260.0]);
    }
}
