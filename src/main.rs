// src/main.rs
use std::env;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use log::info;
use iqscope::{
    config::FALLBACK_SAMPLE_RATE_HZ, join_worker, render_frame_png, spawn_producer, PlotStyle,
    RefreshLoop, ScopeConfig, ScopeProcessor, ScopeView, SimulatedOokSource, ViewCommand,
};
const BLOCK_LEN: usize = 1024;
const DEMO_FRAMES: usize = 40;
// Headless demo host: simulated OOK bursts in, one PNG of the final frame out.
// Usage: iqscope [config.json] [out.png]
fn main() -> Result<()> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => ScopeConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => ScopeConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "iqscope.png".to_owned());
    let processor = Arc::new(ScopeProcessor::from_config(&config).context("creating scope")?);
    let running = Arc::new(AtomicBool::new(true));
    let source = SimulatedOokSource::new(config.sample_rate_hz as f32, BLOCK_LEN, 0x5eed);
    // An unknown rate (0) paces the simulation at the same rate the source falls back to.
    let pace_rate = if config.sample_rate_hz > 0.0 {
        config.sample_rate_hz
    } else {
        FALLBACK_SAMPLE_RATE_HZ
    };
    let pace = Duration::from_secs_f64(BLOCK_LEN as f64 / pace_rate);
    let producer = spawn_producer(Arc::clone(&processor), source, Arc::clone(&running), Some(pace));
    let view = ScopeView::new(config.plot_width as f32, config.plot_height as f32);
    let refresh = RefreshLoop::spawn(
        Arc::clone(&processor),
        view,
        Duration::from_millis(config.refresh_interval_ms),
    );
    let mut last = None;
    for i in 0..DEMO_FRAMES {
        if i == DEMO_FRAMES / 2 {
            // Zoom in twice around the middle of the plot, then drag a little.
            let centre = config.plot_width as f32 / 2.0;
            refresh.send(ViewCommand::Wheel { delta: 1.0, cursor_x: centre });
            refresh.send(ViewCommand::Wheel { delta: 1.0, cursor_x: centre });
            refresh.send(ViewCommand::Drag { dx: -40.0 });
        }
        let frame = refresh
            .frames()
            .recv_timeout(Duration::from_secs(2))
            .context("refresh loop stalled")?;
        info!(
            "frame {i}: {} samples, visible {:?}, max {:.3e}, {}",
            frame.sample_count, frame.visible, frame.max_magnitude, frame.zoom_label
        );
        last = Some(frame);
    }
    running.store(false, Ordering::SeqCst);
    let frames = refresh.stop()?;
    let blocks = join_worker(producer, "producer")??;
    info!("{frames} frames rendered from {blocks} blocks");
    if let Some(frame) = last {
        let png = render_frame_png(&frame, &PlotStyle::default()).context("rendering frame")?;
        fs::write(&output, png).with_context(|| format!("writing {output}"))?;
        info!("wrote {output}");
    }
    Ok(())
}
