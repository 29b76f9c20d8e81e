//! Recirculating comb filter, the riser's doubler stage.
//!
//! A single delay tap with feedback and a dry-plus-wet output. The delay
//! time is frequency-controlled (`1 / freq` seconds), so the comb's notch
//! series lands on harmonics of `freq`. This is not a swept flanger on its
//! own — the flanging motion comes from the orchestrator continuously
//! re-targeting the frequency, which the buffer's smoothed delay time turns
//! into a glide.

use crate::delay::{DelayBuffer, Interpolation};

/// Smoothing applied to frequency-driven delay-time changes.
const DELAY_SMOOTHING_SECS: f32 = 0.03;

/// Comb filter configuration.
///
/// Passed whole to [`CombFilter::set_params`] so default behavior is visible
/// at the call site.
#[derive(Debug, Clone, Copy)]
pub struct CombParams {
    /// Filter frequency in Hz; the delay time is its reciprocal.
    pub freq_hz: f32,
    /// Delayed-signal gain added to the dry output.
    pub wet: f32,
    /// Feedback gain, clamped to \[0, 1\] on apply.
    pub feedback: f32,
    /// Interpolation used for delay reads.
    pub interpolation: Interpolation,
}

impl Default for CombParams {
    fn default() -> Self {
        Self {
            freq_hz: 440.0,
            wet: 0.0,
            feedback: 0.0,
            interpolation: Interpolation::None,
        }
    }
}

/// A single-tap recirculating comb filter.
///
/// # Example
///
/// ```rust
/// use subida_core::{CombFilter, CombParams, Interpolation};
///
/// let mut comb = CombFilter::new();
/// comb.prepare(48000.0);
/// comb.set_params(
///     &CombParams {
///         freq_hz: 100.0,
///         wet: 0.5,
///         feedback: 0.3,
///         interpolation: Interpolation::Linear,
///     },
///     0.0,
/// );
///
/// let out = comb.process(1.0);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombFilter {
    delay: DelayBuffer,
    params: CombParams,
}

impl CombFilter {
    /// Create an unprepared comb filter with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the delay buffer for playback: one second of samples, delay time
    /// reset to zero.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.delay.prepare_secs(1.0, sample_rate);
        self.delay.set_delay_time(0.0, 0.0);
    }

    /// Apply a parameter set.
    ///
    /// `freq_offset_hz` shifts the effective frequency; the orchestrator
    /// uses it to detune one stereo channel against the other. Feedback is
    /// clamped to \[0, 1\]; the resulting delay-time change glides over a
    /// fixed 30 ms ramp.
    pub fn set_params(&mut self, params: &CombParams, freq_offset_hz: f32) {
        self.params = *params;
        self.params.feedback = self.params.feedback.clamp(0.0, 1.0);

        self.delay
            .set_delay_time(1.0 / (self.params.freq_hz + freq_offset_hz), DELAY_SMOOTHING_SECS);
    }

    /// Current parameter set (after clamping).
    pub fn params(&self) -> &CombParams {
        &self.params
    }

    /// Process a single sample.
    ///
    /// Reads the delayed sample `d`, writes `input + d * feedback` back into
    /// the buffer, and returns `input + d * wet`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read(self.params.interpolation);

        self.delay.push(input + delayed * self.params.feedback);

        input + delayed * self.params.wet
    }

    /// Clear the delay buffer.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
