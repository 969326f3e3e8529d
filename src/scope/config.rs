use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::scope::buffer::DEFAULT_DECAY_FACTOR;
use crate::scope::sample::DisplayMode;
use crate::scope::ScopeError;
pub const MIN_WINDOW_MS: u32 = 10;
pub const MAX_WINDOW_MS: u32 = 200;
/// Rate assumed for sizing the buffer while the front end has not reported one.
pub const FALLBACK_SAMPLE_RATE_HZ: f64 = 250_000.0;
/// Duration of history kept by the scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct TimeWindow {
    millis: u32,
}
impl TimeWindow {
    pub fn from_millis(millis: u32) -> Self {
        Self {
            millis: millis.clamp(MIN_WINDOW_MS, MAX_WINDOW_MS),
        }
    }
    pub fn millis(&self) -> u32 {
        self.millis
    }
    /// Buffer capacity for this window; never zero.
    pub fn samples(&self, sample_rate_hz: f64) -> usize {
        let rate = if sample_rate_hz > 0.0 && sample_rate_hz.is_finite() {
            sample_rate_hz
        } else {
            FALLBACK_SAMPLE_RATE_HZ
        };
        ((rate * self.millis as f64 / 1000.0) as usize).max(1)
    }
}
impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow { millis: 100 }
    }
}
impl From<u32> for TimeWindow {
    fn from(millis: u32) -> Self {
        Self::from_millis(millis)
    }
}
impl From<TimeWindow> for u32 {
    fn from(window: TimeWindow) -> Self {
        window.millis
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Hz; 0 means unknown and switches time labels to sample numbers.
    pub sample_rate_hz: f64,
    #[serde(rename = "time_window_ms")]
    pub time_window: TimeWindow,
    pub display_mode: DisplayMode,
    pub refresh_interval_ms: u64,
    pub decay_factor: f32,
    pub plot_width: u32,
    pub plot_height: u32,
}
impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: FALLBACK_SAMPLE_RATE_HZ,
            time_window: TimeWindow::default(),
            display_mode: DisplayMode::default(),
            refresh_interval_ms: 50,
            decay_factor: DEFAULT_DECAY_FACTOR,
            plot_width: 400,
            plot_height: 300,
        }
    }
}
impl ScopeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
    pub fn from_json(text: &str) -> Result<Self, ScopeError> {
        let config: ScopeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ScopeError> {
        validate_sample_rate(self.sample_rate_hz)?;
        if self.refresh_interval_ms == 0 {
            return Err(ScopeError::InvalidRefreshInterval);
        }
        Ok(())
    }
    pub fn capacity(&self) -> usize {
        self.time_window.samples(self.sample_rate_hz)
    }
}
pub(crate) fn validate_sample_rate(sample_rate_hz: f64) -> Result<(), ScopeError> {
    if sample_rate_hz.is_finite() && sample_rate_hz >= 0.0 {
        Ok(())
    } else {
        Err(ScopeError::InvalidSampleRate(sample_rate_hz))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn window_is_clamped_to_slider_range() {
        assert_eq!(TimeWindow::from_millis(1).millis(), 10);
        assert_eq!(TimeWindow::from_millis(5_000).millis(), 200);
        assert_eq!(TimeWindow::from_millis(50).millis(), 50);
    }
    #[test]
    fn window_samples_use_fallback_rate() {
        let window = TimeWindow::from_millis(100);
        assert_eq!(window.samples(48_000.0), 4_800);
        assert_eq!(window.samples(0.0), 25_000);
        assert_eq!(TimeWindow::from_millis(10).samples(10.0), 1);
    }
    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ScopeConfig::from_json(r#"{"sample_rate_hz": 2048000.0, "time_window_ms": 20, "display_mode": "Both"}"#)
                .unwrap();
        assert_eq!(config.display_mode, DisplayMode::Both);
        assert_eq!(config.time_window.millis(), 20);
        assert_eq!(config.capacity(), 40_960);
        assert_eq!(config.refresh_interval_ms, 50);
        assert_eq!(config.decay_factor, DEFAULT_DECAY_FACTOR);
    }
    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ScopeConfig::from_json(r#"{"refresh_interval_ms": 0}"#),
            Err(ScopeError::InvalidRefreshInterval)
        ));
        assert!(matches!(
            ScopeConfig::from_json(r#"{"sample_rate_hz": -1.0}"#),
            Err(ScopeError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ScopeConfig::from_json("{not json"),
            Err(ScopeError::Config(_))
        ));
    }
    #[test]
    fn round_trips_through_json() {
        let config = ScopeConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"time_window_ms\":100"));
        assert_eq!(ScopeConfig::from_json(&text).unwrap(), config);
    }
}
