use std::collections::VecDeque;
use std::f32::consts::TAU;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::scope::sample::ComplexSample;
use crate::scope::ScopeError;
/// Anything that can hand the scope blocks of I/Q samples.
pub trait IqSource {
    /// `Ok(None)` means the source is exhausted.
    fn next_block(&mut self) -> Result<Option<Vec<ComplexSample>>, ScopeError>;
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Vec<ComplexSample>>,
}
impl ManualSource {
    pub fn new(blocks: impl IntoIterator<Item = Vec<ComplexSample>>) -> Self {
        Self {
            queue: blocks.into_iter().collect(),
        }
    }
}
impl IqSource for ManualSource {
    fn next_block(&mut self) -> Result<Option<Vec<ComplexSample>>, ScopeError> {
        Ok(self.queue.pop_front())
    }
}
/// On/off keyed carrier with additive noise, the kind of burst signal the envelope view is for.
pub struct SimulatedOokSource {
    rng: StdRng,
    sample_rate_hz: f32,
    carrier_hz: f32,
    symbol_len: usize,
    block_len: usize,
    amplitude: f32,
    noise: f32,
    phase: f32,
    position: usize,
    keyed: bool,
    remaining: Option<usize>,
}
impl SimulatedOokSource {
    pub fn new(sample_rate_hz: f32, block_len: usize, seed: u64) -> Self {
        let rate = if sample_rate_hz > 0.0 { sample_rate_hz } else { 250_000.0 };
        Self {
            rng: StdRng::seed_from_u64(seed),
            sample_rate_hz: rate,
            carrier_hz: rate / 50.0,
            // 1 ms symbols.
            symbol_len: ((rate / 1000.0) as usize).max(1),
            block_len: block_len.max(1),
            amplitude: 0.8,
            noise: 0.02,
            phase: 0.0,
            position: 0,
            keyed: true,
            remaining: None,
        }
    }
    /// Stop after `blocks` blocks instead of running forever.
    pub fn with_block_limit(mut self, blocks: usize) -> Self {
        self.remaining = Some(blocks);
        self
    }
    pub fn with_levels(mut self, amplitude: f32, noise: f32) -> Self {
        self.amplitude = amplitude.max(0.0);
        self.noise = noise.max(0.0);
        self
    }
    fn next_sample(&mut self) -> ComplexSample {
        if self.position % self.symbol_len == 0 {
            self.keyed = self.rng.gen_bool(0.5);
        }
        self.position += 1;
        self.phase = (self.phase + TAU * self.carrier_hz / self.sample_rate_hz) % TAU;
        let level = if self.keyed { self.amplitude } else { 0.0 };
        let carrier = ComplexSample::from_polar(level, self.phase);
        let jitter = if self.noise > 0.0 {
            ComplexSample::new(
                self.rng.gen_range(-self.noise..self.noise),
                self.rng.gen_range(-self.noise..self.noise),
            )
        } else {
            ComplexSample::new(0.0, 0.0)
        };
        carrier + jitter
    }
}
impl IqSource for SimulatedOokSource {
    fn next_block(&mut self) -> Result<Option<Vec<ComplexSample>>, ScopeError> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        let block = (0..self.block_len).map(|_| self.next_sample()).collect();
        Ok(Some(block))
    }
}
