use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use log::info;
use crate::scope::buffer::{SampleBuffer, Snapshot};
use crate::scope::config::{validate_sample_rate, ScopeConfig, TimeWindow};
use crate::scope::sample::{ComplexSample, DisplayMode};
use crate::scope::ScopeError;
#[derive(Clone, Copy, Debug, PartialEq)]
struct Settings {
    mode: DisplayMode,
    sample_rate_hz: f64,
}
/// Per-instance scope state shared by the ingestion thread and the render thread.
pub struct ScopeProcessor {
    enabled: AtomicBool,
    buffer: SampleBuffer,
    settings: RwLock<Settings>,
}
impl ScopeProcessor {
    pub fn new(capacity: usize, sample_rate_hz: f64) -> Result<Self, ScopeError> {
        validate_sample_rate(sample_rate_hz)?;
        Ok(Self {
            enabled: AtomicBool::new(true),
            buffer: SampleBuffer::new(capacity)?,
            settings: RwLock::new(Settings {
                mode: DisplayMode::default(),
                sample_rate_hz,
            }),
        })
    }
    pub fn from_config(config: &ScopeConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        let processor = Self {
            enabled: AtomicBool::new(true),
            buffer: SampleBuffer::with_decay(config.capacity(), config.decay_factor)?,
            settings: RwLock::new(Settings {
                mode: config.display_mode,
                sample_rate_hz: config.sample_rate_hz,
            }),
        };
        info!(
            "scope ready: {} ms window, {} samples, {:?}",
            config.time_window.millis(),
            config.capacity(),
            config.display_mode
        );
        Ok(processor)
    }
    /// Ingestion entry point; does nothing at all while disabled.
    pub fn process(&self, block: &[ComplexSample]) {
        if !self.is_enabled() {
            return;
        }
        self.buffer.push(block);
    }
    pub fn snapshot(&self) -> Snapshot {
        self.buffer.snapshot()
    }
    pub fn clear(&self) {
        self.buffer.clear();
    }
    pub fn set_capacity(&self, capacity: usize) -> Result<(), ScopeError> {
        self.buffer.set_capacity(capacity)
    }
    /// Resize the history to `window` at the current sample rate; this clears the buffer.
    pub fn apply_time_window(&self, window: TimeWindow) -> Result<usize, ScopeError> {
        let capacity = window.samples(self.sample_rate_hz());
        self.buffer.set_capacity(capacity)?;
        info!("time window {} ms -> {capacity} samples", window.millis());
        Ok(capacity)
    }
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
    pub fn max_magnitude(&self) -> f32 {
        self.buffer.max_magnitude()
    }
    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::SeqCst) != enabled {
            info!("scope {}", if enabled { "enabled" } else { "disabled" });
        }
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
    pub fn set_display_mode(&self, mode: DisplayMode) {
        self.write_settings(|s| s.mode = mode);
    }
    pub fn display_mode(&self) -> DisplayMode {
        self.read_settings().mode
    }
    pub fn set_sample_rate(&self, sample_rate_hz: f64) -> Result<(), ScopeError> {
        validate_sample_rate(sample_rate_hz)?;
        self.write_settings(|s| s.sample_rate_hz = sample_rate_hz);
        Ok(())
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.read_settings().sample_rate_hz
    }
    fn read_settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write_settings(&self, update: impl FnOnce(&mut Settings)) {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut settings);
    }
}
