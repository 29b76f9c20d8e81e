//! Circular delay buffer with smoothed, fractional delay-time reads.
//!
//! [`DelayBuffer`] is the storage primitive behind every time-based stage in
//! the riser: the doubler comb, and the reverb's early and late comb banks.
//!
//! # Design
//!
//! The buffer separates the control-rate operation (setting a delay time,
//! absorbed by a [`SmoothedParam`] ramp) from the sample-rate operations
//! (push/read). Each read advances the smoothed delay time by one sample
//! step, so a live control change glides continuously across repeated reads
//! instead of clicking.
//!
//! # Interpolation
//!
//! | Mode | Taps | Use case |
//! |------|------|----------|
//! | [`Interpolation::None`] | 1 | Fixed integer delays (reverb combs) |
//! | [`Interpolation::Linear`] | 2 | Slowly swept delays (doubler comb) |
//! | [`Interpolation::Cubic`] | 4 | Fast sweeps needing smooth passage |
//!
//! # Memory
//!
//! The buffer allocates in [`DelayBuffer::prepare`] and only there — never
//! during push/read. `prepare` must not run concurrently with processing.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::SmoothedParam;
use crate::math::{CubicKind, cubic_interp, fractional_part, lerp};

/// Hard ceiling on buffer capacity, in seconds' worth of samples.
/// Bounds memory use regardless of caller-supplied sizes.
const MAX_CAPACITY_SECS: f32 = 600.0;

/// Interpolation method for fractional delay reads.
///
/// Resolved once at configuration time and dispatched per read; stages that
/// never sweep their delay use [`Interpolation::None`] to skip the blend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// No interpolation (truncate to the nearest sample).
    #[default]
    None,
    /// Linear blend between two samples.
    Linear,
    /// 4-point Catmull-Rom blend.
    Cubic,
}

/// Circular sample store with a smoothed, fractional delay time.
///
/// # Example
///
/// ```rust
/// use subida_core::{DelayBuffer, Interpolation};
///
/// let mut delay = DelayBuffer::new();
/// delay.prepare(8, 48000.0);
/// delay.set_delay_time(3.0 / 48000.0, 0.0);
///
/// for i in 0..8 {
///     delay.push(i as f32);
/// }
/// // 3 samples of delay: reads the value written 3 pushes ago
/// assert_eq!(delay.read(Interpolation::None), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayBuffer {
    /// Circular storage; allocated by `prepare`
    buffer: Vec<f32>,
    /// Next slot to write
    write_index: usize,
    /// Sample rate in Hz, forced >= 1
    sample_rate: f32,
    /// Delay time in seconds, ramped to avoid clicks
    delay_secs: SmoothedParam,
    /// Ramp duration currently armed on `delay_secs`
    smoothing_secs: f32,
}

impl DelayBuffer {
    /// Create an unprepared delay buffer (capacity 1, silent).
    ///
    /// Call [`prepare`](Self::prepare) before use; the single-slot default
    /// only guarantees reads are well-defined.
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0],
            write_index: 0,
            sample_rate: 44100.0,
            delay_secs: SmoothedParam::new(0.0),
            smoothing_secs: 0.0,
        }
    }

    /// (Re)allocate storage for the given capacity in samples.
    ///
    /// The capacity is clamped to \[1, 600 s × sample rate\] and storage is
    /// reallocated only when the size actually changes. Contents are cleared
    /// and the write index resets to 0 either way.
    ///
    /// Not safe to call concurrently with [`push`](Self::push) or
    /// [`read`](Self::read); this is the only allocation point.
    pub fn prepare(&mut self, capacity_samples: usize, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.delay_secs.set_sample_rate(self.sample_rate);

        let max_capacity = (MAX_CAPACITY_SECS * self.sample_rate) as usize;
        let capacity = capacity_samples.clamp(1, max_capacity.max(1));

        if capacity != self.buffer.len() {
            self.buffer = vec![0.0; capacity];
        }

        self.write_index = 0;
        self.clear();
    }

    /// (Re)allocate storage for the given capacity in seconds.
    pub fn prepare_secs(&mut self, capacity_secs: f32, sample_rate: f32) {
        let capacity = (capacity_secs * sample_rate.max(1.0)) as usize;
        self.prepare(capacity, sample_rate);
    }

    /// Set all elements to zero without touching the delay-time ramp.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    /// Set the delay time in seconds, ramped over `smoothing_secs`.
    ///
    /// The delay time is clamped to \[0, capacity / sample rate\]; negative
    /// requests clamp to zero. The smoothing time re-arms the ramp only when
    /// it differs from the currently armed one, so repeated calls with the
    /// same smoothing keep an in-flight glide undisturbed.
    pub fn set_delay_time(&mut self, delay_secs: f32, smoothing_secs: f32) {
        if smoothing_secs != self.smoothing_secs {
            self.smoothing_secs = smoothing_secs.max(0.0);
            self.delay_secs.set_ramp_secs(self.smoothing_secs);
        }

        let clamped = delay_secs.clamp(0.0, self.max_delay_secs());
        self.delay_secs.set_target(clamped);
    }

    /// Push a sample at the write index and advance it with wraparound.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_index] = sample;
        self.write_index += 1;
        if self.write_index == self.buffer.len() {
            self.write_index = 0;
        }
    }

    /// Read the delayed sample at the current (possibly fractional) offset.
    ///
    /// Advances the smoothed delay time by one sample step, so delay-time
    /// changes glide continuously across repeated reads.
    #[inline]
    pub fn read(&mut self, interp: Interpolation) -> f32 {
        let offset = self.sample_rate * self.delay_secs.advance();

        match interp {
            Interpolation::None => self.read_no_interp(offset),
            Interpolation::Linear => self.read_linear(offset),
            Interpolation::Cubic => self.read_cubic(offset),
        }
    }

    /// Combined push-then-read for stages that need both in one step.
    #[inline]
    pub fn read_and_push(&mut self, sample: f32, interp: Interpolation) -> f32 {
        self.push(sample);
        self.read(interp)
    }

    /// Buffer capacity in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Longest representable delay in seconds.
    #[inline]
    pub fn max_delay_secs(&self) -> f32 {
        self.buffer.len() as f32 / self.sample_rate
    }

    /// Circular read index for an integer sample offset behind the write index.
    #[inline]
    fn read_index(&self, offset: usize) -> usize {
        let len = self.buffer.len();
        (self.write_index + len - offset % len) % len
    }

    fn read_no_interp(&self, offset: f32) -> f32 {
        self.buffer[self.read_index(offset as usize)]
    }

    fn read_linear(&self, offset: f32) -> f32 {
        let len = self.buffer.len();
        let idx = self.read_index(offset as usize);
        let older = (idx + len - 1) % len;

        lerp(self.buffer[idx], self.buffer[older], fractional_part(offset))
    }

    fn read_cubic(&self, offset: f32) -> f32 {
        // Floor clamped to >= 2 so all four taps stay behind the write index
        let offset = offset.max(2.0);
        let len = self.buffer.len();
        let idx = self.read_index(offset as usize);

        let newer = self.buffer[(idx + 1) % len];
        let here = self.buffer[idx];
        let older1 = self.buffer[(idx + len - 1) % len];
        let older2 = self.buffer[(idx + len - 2) % len];

        cubic_interp(
            newer,
            here,
            older1,
            older2,
            fractional_part(offset),
            CubicKind::CatmullRom,
        )
    }
}

impl Default for DelayBuffer {
    fn default() -> Self {
        Self::new()
    }
}
