use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::{debug, warn};
use crate::scope::processor::ScopeProcessor;
use crate::scope::source::IqSource;
use crate::scope::view::{ScopeFrame, ScopeView};
use crate::scope::ScopeError;
/// Longest uninterrupted sleep on the producer thread.
const PACE_SLICE: Duration = Duration::from_millis(10);
/// Drain `source` into the processor on a dedicated thread until it runs dry or `running` drops.
///
/// Returns the number of blocks delivered.
pub fn spawn_producer<S>(
    processor: Arc<ScopeProcessor>,
    mut source: S,
    running: Arc<AtomicBool>,
    pace: Option<Duration>,
) -> JoinHandle<Result<u64, ScopeError>>
where
    S: IqSource + Send + 'static,
{
    thread::spawn(move || {
        let mut blocks = 0u64;
        while running.load(Ordering::SeqCst) {
            let block = match source.next_block() {
                Ok(Some(block)) => block,
                Ok(None) => break,
                Err(err) => {
                    warn!("producer stopped: {err}");
                    return Err(err);
                }
            };
            processor.process(&block);
            blocks += 1;
            if let Some(pace) = pace {
                sleep_while_running(pace, &running);
            }
        }
        debug!("producer finished after {blocks} blocks");
        Ok(blocks)
    })
}
fn sleep_while_running(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(PACE_SLICE));
    }
}
/// Join a worker thread, turning a panic into an error instead of a silent default.
pub fn join_worker<T>(handle: JoinHandle<T>, name: &'static str) -> Result<T, ScopeError> {
    handle.join().map_err(|_| {
        warn!("{name} thread panicked");
        ScopeError::WorkerPanicked(name)
    })
}
/// Input events forwarded from the host UI to the refresh thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewCommand {
    Wheel { delta: f32, cursor_x: f32 },
    Drag { dx: f32 },
    DoubleClick,
    Resize { width: f32, height: f32 },
    /// Pause or resume frame production without stopping the thread.
    SetActive(bool),
    Stop,
}
/// Handle to a running refresh thread.
///
/// At most one frame waits in the queue; a tick whose frame finds it occupied is dropped,
/// so a slow host always picks up a recent frame.
pub struct RefreshLoop {
    commands: Sender<ViewCommand>,
    frames: Receiver<ScopeFrame>,
    handle: JoinHandle<u64>,
}
impl RefreshLoop {
    /// Build a frame every `interval` from the processor's latest snapshot.
    pub fn spawn(processor: Arc<ScopeProcessor>, view: ScopeView, interval: Duration) -> Self {
        let (tx_cmd, rx_cmd) = mpsc::channel();
        let (tx_frame, rx_frame) = mpsc::sync_channel(1);
        let handle = thread::spawn(move || run_refresh(processor, view, interval, rx_cmd, tx_frame));
        Self {
            commands: tx_cmd,
            frames: rx_frame,
            handle,
        }
    }
    pub fn send(&self, command: ViewCommand) {
        self.commands.send(command).ok();
    }
    pub fn frames(&self) -> &Receiver<ScopeFrame> {
        &self.frames
    }
    /// Stop the thread and return how many frames it handed over.
    pub fn stop(self) -> Result<u64, ScopeError> {
        self.commands.send(ViewCommand::Stop).ok();
        join_worker(self.handle, "refresh")
    }
}
/// Next tick after `deadline`; ticks already missed at `now` are skipped rather than replayed.
fn next_deadline(deadline: Instant, interval: Duration, now: Instant) -> Instant {
    let next = deadline + interval;
    if next < now {
        now + interval
    } else {
        next
    }
}
fn run_refresh(
    processor: Arc<ScopeProcessor>,
    mut view: ScopeView,
    interval: Duration,
    commands: Receiver<ViewCommand>,
    frames: SyncSender<ScopeFrame>,
) -> u64 {
    let mut active = true;
    let mut produced = 0u64;
    let mut deadline = Instant::now();
    loop {
        loop {
            match commands.try_recv() {
                Ok(ViewCommand::Wheel { delta, cursor_x }) => view.on_wheel(delta, cursor_x),
                Ok(ViewCommand::Drag { dx }) => view.on_drag(dx),
                Ok(ViewCommand::DoubleClick) => view.on_double_click(),
                Ok(ViewCommand::Resize { width, height }) => view.resize(width, height),
                Ok(ViewCommand::SetActive(on)) => active = on,
                Ok(ViewCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    debug!("refresh loop stopped after {produced} frames");
                    return produced;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        if active {
            match frames.try_send(view.frame(&processor)) {
                Ok(()) => produced += 1,
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => return produced,
            }
        }
        let now = Instant::now();
        deadline = next_deadline(deadline, interval, now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::plot::{render_frame_png, PlotStyle};
    use crate::scope::sample::{ComplexSample, DisplayMode};
    use crate::scope::source::{ManualSource, SimulatedOokSource};
    #[test]
    fn producer_fills_buffer_from_source() {
        let processor = Arc::new(ScopeProcessor::new(10, 1_000.0).unwrap());
        let blocks = (0..4).map(|i| vec![ComplexSample::new(i as f32, 0.0); 4]);
        let source = ManualSource::new(blocks);
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_producer(Arc::clone(&processor), source, running, None);
        assert_eq!(handle.join().unwrap().unwrap(), 4);
        let snap = processor.snapshot();
        assert_eq!(snap.len(), 10);
        assert_eq!(snap.samples[0].re, 1.0);
        assert_eq!(snap.max_magnitude, 3.0);
    }
    #[test]
    fn producer_respects_running_flag() {
        let processor = Arc::new(ScopeProcessor::new(64, 1_000.0).unwrap());
        let source = SimulatedOokSource::new(1_000.0, 8, 3);
        let running = Arc::new(AtomicBool::new(false));
        let handle = spawn_producer(Arc::clone(&processor), source, running, None);
        assert_eq!(handle.join().unwrap().unwrap(), 0);
        assert!(processor.snapshot().is_empty());
    }
    #[test]
    fn refresh_loop_streams_frames_and_png() {
        let processor = Arc::new(ScopeProcessor::new(2_000, 48_000.0).unwrap());
        processor.set_display_mode(DisplayMode::Both);
        let source = SimulatedOokSource::new(48_000.0, 500, 11).with_block_limit(8);
        let running = Arc::new(AtomicBool::new(true));
        spawn_producer(Arc::clone(&processor), source, running, None)
            .join()
            .unwrap()
            .unwrap();
        let refresh = RefreshLoop::spawn(
            Arc::clone(&processor),
            ScopeView::new(400.0, 300.0),
            Duration::from_millis(5),
        );
        refresh.send(ViewCommand::Wheel { delta: 1.0, cursor_x: 200.0 });
        let frame = refresh
            .frames()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(frame.sample_count, 2_000);
        assert_eq!(frame.traces.len(), 2);
        let png = render_frame_png(&frame, &PlotStyle::default()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(refresh.stop().unwrap() >= 1);
    }
    #[test]
    fn undrained_frames_do_not_pile_up() {
        let processor = Arc::new(ScopeProcessor::new(256, 1_000.0).unwrap());
        processor.process(&[ComplexSample::new(0.5, -0.5); 256]);
        let refresh = RefreshLoop::spawn(
            Arc::clone(&processor),
            ScopeView::new(400.0, 300.0),
            Duration::from_millis(1),
        );
        thread::sleep(Duration::from_millis(200));
        assert!(refresh.frames().try_iter().count() <= 1);
        refresh.stop().unwrap();
    }
    #[test]
    fn paced_producer_stops_promptly() {
        let processor = Arc::new(ScopeProcessor::new(64, 0.0).unwrap());
        let source = SimulatedOokSource::new(0.0, 16, 5);
        let running = Arc::new(AtomicBool::new(true));
        let started = Instant::now();
        let handle = spawn_producer(
            Arc::clone(&processor),
            source,
            Arc::clone(&running),
            Some(Duration::from_secs(600)),
        );
        thread::sleep(Duration::from_millis(50));
        running.store(false, Ordering::SeqCst);
        let blocks = join_worker(handle, "producer").unwrap().unwrap();
        assert_eq!(blocks, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(processor.snapshot().len(), 16);
    }
    #[test]
    fn missed_ticks_are_skipped() {
        let start = Instant::now();
        let tick = Duration::from_millis(50);
        assert_eq!(next_deadline(start, tick, start), start + tick);
        let late = start + Duration::from_millis(180);
        assert_eq!(next_deadline(start, tick, late), late + tick);
        let slightly_late = start + Duration::from_millis(20);
        assert_eq!(next_deadline(start, tick, slightly_late), start + tick);
    }
    #[test]
    fn panicked_worker_surfaces_as_error() {
        let handle = thread::spawn(|| -> u64 { panic!("boom") });
        assert!(matches!(
            join_worker(handle, "refresh"),
            Err(ScopeError::WorkerPanicked("refresh"))
        ));
    }
}
