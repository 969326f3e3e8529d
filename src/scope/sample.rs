use num_complex::Complex32;
use serde::{Deserialize, Serialize};
/// One I/Q sample as delivered by the radio front end.
pub type ComplexSample = Complex32;
/// Which scalar channel(s) are derived from each complex sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Magnitude, baselined at the bottom of the plot.
    Envelope,
    #[default]
    IComponent,
    QComponent,
    /// In-phase as the primary trace, quadrature as the secondary one.
    Both,
}
impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::IComponent,
        DisplayMode::QComponent,
        DisplayMode::Envelope,
        DisplayMode::Both,
    ];
    /// Bipolar modes are centred on a zero line; the envelope never goes negative.
    pub fn is_bipolar(self) -> bool {
        !matches!(self, DisplayMode::Envelope)
    }
    pub fn has_secondary(self) -> bool {
        matches!(self, DisplayMode::Both)
    }
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Envelope => "Envelope",
            DisplayMode::IComponent => "I Component",
            DisplayMode::QComponent => "Q Component",
            DisplayMode::Both => "I + Q",
        }
    }
    /// Map one sample to its primary and optional secondary display value.
    pub fn project(self, sample: ComplexSample) -> (f32, Option<f32>) {
        match self {
            DisplayMode::Envelope => (sample.norm(), None),
            DisplayMode::IComponent => (sample.re, None),
            DisplayMode::QComponent => (sample.im, None),
            DisplayMode::Both => (sample.re, Some(sample.im)),
        }
    }
}
/// Display channels derived from a snapshot, equal length when both are present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelSet {
    pub primary: Vec<f32>,
    pub secondary: Option<Vec<f32>>,
}
impl ChannelSet {
    pub fn from_samples(samples: &[ComplexSample], mode: DisplayMode) -> Self {
        let mut primary = Vec::with_capacity(samples.len());
        let mut secondary = mode
            .has_secondary()
            .then(|| Vec::with_capacity(samples.len()));
        for &sample in samples {
            let (p, s) = mode.project(sample);
            primary.push(p);
            if let (Some(values), Some(v)) = (secondary.as_mut(), s) {
                values.push(v);
            }
        }
        Self { primary, secondary }
    }
    pub fn len(&self) -> usize {
        self.primary.len()
    }
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}
