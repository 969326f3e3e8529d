use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::scope::error::ScopeError;
use crate::scope::mapper::{Trace, TraceChannel};
use crate::scope::view::ScopeFrame;
const TICK_LEN: i32 = 5;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub background: RGBColor,
    pub plot_background: RGBColor,
    pub grid_minor: RGBColor,
    pub grid_major: RGBColor,
    pub axis: RGBColor,
    pub primary: RGBColor,
    pub secondary: RGBColor,
    pub trace_width: u32,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: BLACK,
            plot_background: RGBColor(10, 10, 10),
            grid_minor: RGBColor(40, 40, 40),
            grid_major: RGBColor(60, 60, 60),
            axis: WHITE,
            primary: RGBColor(0, 255, 0),
            secondary: CYAN,
            trace_width: 2,
        }
    }
}
/// Rasterise a frame's grid, axes and traces. Text is left to the host renderer.
pub fn render_frame_png(frame: &ScopeFrame, style: &PlotStyle) -> Result<Vec<u8>, ScopeError> {
    let width = frame.widget_size[0].round().max(1.0) as u32;
    let height = frame.widget_size[1].round().max(1.0) as u32;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&style.background)?;
        let area = frame.area;
        let (left, top) = (px(area.left), px(area.top));
        let (right, bottom) = (px(area.right()), px(area.bottom()));
        root.draw(&Rectangle::new(
            [(left, top), (right, bottom)],
            style.plot_background.filled(),
        ))?;
        for line in &frame.grid {
            let color = if line.major {
                style.grid_major
            } else {
                style.grid_minor
            };
            root.draw(&PathElement::new(
                vec![point(line.from), point(line.to)],
                &color,
            ))?;
        }
        for trace in &frame.traces {
            root.draw(&PathElement::new(
                trace.points.iter().copied().map(point).collect::<Vec<_>>(),
                trace_color(trace, style).stroke_width(style.trace_width),
            ))?;
        }
        let axis = style.axis.stroke_width(2);
        root.draw(&PathElement::new(vec![(left, top), (left, bottom)], axis))?;
        root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], axis))?;
        for tick in &frame.amplitude_ticks {
            let y = px(tick.position);
            root.draw(&PathElement::new(vec![(left - TICK_LEN, y), (left, y)], &style.axis))?;
        }
        for tick in &frame.time_ticks {
            let x = px(tick.position);
            root.draw(&PathElement::new(
                vec![(x, bottom), (x, bottom + TICK_LEN)],
                &style.axis,
            ))?;
        }
        root.present()?;
    }
    encode_png(&buffer, width, height)
}
fn trace_color(trace: &Trace, style: &PlotStyle) -> RGBColor {
    match trace.channel {
        TraceChannel::Primary => style.primary,
        TraceChannel::Secondary => style.secondary,
    }
}
fn px(v: f32) -> i32 {
    v.round() as i32
}
fn point(p: [f32; 2]) -> (i32, i32) {
    (px(p[0]), px(p[1]))
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::buffer::Snapshot;
    use crate::scope::sample::{ComplexSample, DisplayMode};
    use crate::scope::view::ScopeView;
    #[test]
    fn placeholder_frame_still_renders() {
        let view = ScopeView::new(400.0, 300.0);
        let frame = view.frame_from(&Snapshot::default(), DisplayMode::Envelope, 0.0);
        let png = render_frame_png(&frame, &PlotStyle::default()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
    #[test]
    fn envelope_frame_renders() {
        let samples: Vec<_> = (0..2_000)
            .map(|i| ComplexSample::new((i as f32 * 0.01).sin(), 0.2))
            .collect();
        let snapshot = Snapshot {
            samples,
            max_magnitude: 1.1,
        };
        let frame = ScopeView::new(640.0, 240.0).frame_from(&snapshot, DisplayMode::Envelope, 48_000.0);
        assert_eq!(frame.traces.len(), 1);
        let png = render_frame_png(&frame, &PlotStyle::default()).unwrap();
        assert!(png.len() > 8);
    }
}
