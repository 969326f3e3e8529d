use std::sync::{Mutex, MutexGuard, PoisonError};
use log::{debug, info, trace};
use crate::scope::sample::{ChannelSet, ComplexSample, DisplayMode};
use crate::scope::ScopeError;
/// Lowest value the auto-scale estimate may reach.
pub const MAGNITUDE_FLOOR: f32 = 1e-4;
/// Estimate before the first block arrives.
pub const INITIAL_MAX_MAGNITUDE: f32 = 0.001;
pub const DEFAULT_DECAY_FACTOR: f32 = 0.9995;
/// Peak tracker with instant attack and slow exponential release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScale {
    max_magnitude: f32,
    decay: f32,
}
impl AutoScale {
    pub fn new(decay: f32) -> Self {
        Self {
            max_magnitude: INITIAL_MAX_MAGNITUDE,
            decay: clamp_decay(decay),
        }
    }
    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }
    pub fn decay(&self) -> f32 {
        self.decay
    }
    /// Fold one block's peak into the estimate. Called once per push, not per sample.
    pub fn observe(&mut self, local_max: f32) {
        if local_max > self.max_magnitude {
            self.max_magnitude = local_max;
        } else {
            self.max_magnitude *= self.decay;
        }
        self.max_magnitude = self.max_magnitude.max(MAGNITUDE_FLOOR);
    }
}
impl Default for AutoScale {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_FACTOR)
    }
}
fn clamp_decay(decay: f32) -> f32 {
    if decay.is_finite() && decay > 0.0 && decay < 1.0 {
        decay
    } else {
        DEFAULT_DECAY_FACTOR
    }
}
/// Fixed backing store with head/len bookkeeping; the oldest sample is overwritten on overflow.
#[derive(Debug)]
struct Ring {
    slots: Vec<ComplexSample>,
    head: usize,
    len: usize,
}
impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![ComplexSample::new(0.0, 0.0); capacity],
            head: 0,
            len: 0,
        }
    }
    fn capacity(&self) -> usize {
        self.slots.len()
    }
    fn push(&mut self, sample: ComplexSample) {
        self.slots[self.head] = sample;
        self.head = (self.head + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }
    fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
    fn to_vec(&self) -> Vec<ComplexSample> {
        let mut out = Vec::with_capacity(self.len);
        if self.len < self.slots.len() {
            out.extend_from_slice(&self.slots[..self.len]);
        } else {
            out.extend_from_slice(&self.slots[self.head..]);
            out.extend_from_slice(&self.slots[..self.head]);
        }
        out
    }
}
/// Deep copy of the buffer contents together with the scale at copy time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub samples: Vec<ComplexSample>,
    pub max_magnitude: f32,
}
impl Snapshot {
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn channels(&self, mode: DisplayMode) -> ChannelSet {
        ChannelSet::from_samples(&self.samples, mode)
    }
}
#[derive(Debug)]
struct BufferInner {
    ring: Ring,
    scale: AutoScale,
}
/// Rolling store shared between the producer and the render thread.
///
/// Every entry point takes the same lock, so a snapshot never sees a half-appended
/// block or a length above capacity.
#[derive(Debug)]
pub struct SampleBuffer {
    inner: Mutex<BufferInner>,
}
impl SampleBuffer {
    pub fn new(capacity: usize) -> Result<Self, ScopeError> {
        Self::with_decay(capacity, DEFAULT_DECAY_FACTOR)
    }
    pub fn with_decay(capacity: usize, decay: f32) -> Result<Self, ScopeError> {
        if capacity == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        Ok(Self {
            inner: Mutex::new(BufferInner {
                ring: Ring::new(capacity),
                scale: AutoScale::new(decay),
            }),
        })
    }
    fn lock(&self) -> MutexGuard<'_, BufferInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn push(&self, block: &[ComplexSample]) {
        if block.is_empty() {
            return;
        }
        let local_max = block.iter().map(|s| s.norm()).fold(0.0f32, f32::max);
        let mut inner = self.lock();
        for &sample in block {
            inner.ring.push(sample);
        }
        inner.scale.observe(local_max);
        trace!(
            "pushed {} samples, len {}, max {:.3e}",
            block.len(),
            inner.ring.len,
            inner.scale.max_magnitude()
        );
    }
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            samples: inner.ring.to_vec(),
            max_magnitude: inner.scale.max_magnitude(),
        }
    }
    /// Replaces the capacity and discards all history; the scale estimate is kept.
    pub fn set_capacity(&self, capacity: usize) -> Result<(), ScopeError> {
        if capacity == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        let mut inner = self.lock();
        inner.ring = Ring::new(capacity);
        info!("sample buffer capacity set to {capacity}");
        Ok(())
    }
    pub fn clear(&self) {
        self.lock().ring.clear();
        debug!("sample buffer cleared");
    }
    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }
    pub fn len(&self) -> usize {
        self.lock().ring.len
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn max_magnitude(&self) -> f32 {
        self.lock().scale.max_magnitude()
    }
}
