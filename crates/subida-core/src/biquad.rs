//! Second-order recursive lowpass/highpass filters (12 dB/octave).
//!
//! Coefficients come from a bilinear-transform formulation with a
//! tangent-based frequency pre-warp, evaluated through
//! [`fast_tan`](crate::fast_math::fast_tan). Recomputation is change-driven:
//! the pre-warp runs only when cutoff or sample rate moved, the Q
//! normalization only when Q moved. That caching is a contract, not a
//! tuning detail — it bounds how often the transcendental approximation is
//! re-evaluated.

use crate::fast_math::fast_tan;
use core::f32::consts::PI;

/// Filter response selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// Second-order lowpass.
    #[default]
    Lowpass,
    /// Second-order highpass.
    Highpass,
}

/// Biquad filter configuration.
///
/// Passed whole to [`Biquad::set_params`] so defaults are visible at the
/// call site.
#[derive(Clone, Copy, Debug)]
pub struct BiquadParams {
    /// Filter response.
    pub kind: FilterKind,
    /// Cutoff frequency in Hz. Must stay below Nyquist.
    pub cutoff_hz: f32,
    /// Resonance; must be > 0.
    pub q: f32,
    /// Disabled filters pass input through untouched.
    pub enabled: bool,
}

impl Default for BiquadParams {
    fn default() -> Self {
        Self {
            kind: FilterKind::Lowpass,
            cutoff_hz: 500.0,
            q: core::f32::consts::FRAC_1_SQRT_2,
            enabled: true,
        }
    }
}

/// Cached coefficient state with change detection.
///
/// `k`/`k2` depend on cutoff and sample rate, `n` on Q (and `k`); the stored
/// previous values decide which stage actually recomputes.
#[derive(Clone, Copy, Debug, Default)]
struct CoefficientCache {
    // filter coefficients
    a0: f32,
    a1: f32,
    a2: f32,
    b1: f32,
    b2: f32,

    // pre-warp intermediates
    k: f32,
    k2: f32,
    n: f32,

    // change detection
    prev_cutoff: f32,
    prev_q: f32,
    prev_sample_rate: f32,
}

impl CoefficientCache {
    /// Recompute whatever the parameter deltas require.
    ///
    /// Returns without touching the coefficient set when neither the
    /// pre-warp nor the normalization stage ran.
    fn update(&mut self, kind: FilterKind, cutoff_hz: f32, q: f32, sample_rate: f32) {
        let mut stale = false;

        if cutoff_hz != self.prev_cutoff || sample_rate != self.prev_sample_rate {
            self.k = fast_tan(PI * (cutoff_hz / sample_rate));
            self.k2 = self.k * self.k;
            self.prev_cutoff = cutoff_hz;
            self.prev_sample_rate = sample_rate;
            stale = true;
        }

        // n refreshes only on a Q change, even though it reads k: callers
        // that move cutoff always move Q with it, and the trigger set is a
        // compatibility contract
        if q != self.prev_q {
            self.n = 1.0 / (1.0 + self.k / q + self.k2);
            self.prev_q = q;
            stale = true;
        }

        if !stale {
            return;
        }

        match kind {
            FilterKind::Lowpass => {
                self.a0 = self.k2 * self.n;
                self.a1 = 2.0 * self.a0;
                self.a2 = self.a0;
            }
            FilterKind::Highpass => {
                self.a0 = self.n;
                self.a1 = -2.0 * self.a0;
                self.a2 = self.a0;
            }
        }
        self.b1 = 2.0 * (self.k2 - 1.0) * self.n;
        self.b2 = (1.0 - self.k / q + self.k2) * self.n;
    }
}

/// Second-order recursive filter with change-driven coefficient updates.
///
/// Uses the transposed direct form II structure: two delay registers,
/// updated per sample as
///
/// ```text
/// out  = in*a0 + d1
/// d1'  = in*a1 + d2 - b1*out
/// d2'  = in*a2 - b2*out
/// ```
///
/// # Example
///
/// ```rust
/// use subida_core::{Biquad, BiquadParams, FilterKind};
///
/// let mut lowpass = Biquad::new();
/// lowpass.prepare(48000.0);
/// lowpass.set_params(&BiquadParams {
///     kind: FilterKind::Lowpass,
///     cutoff_hz: 1000.0,
///     q: 0.707,
///     enabled: true,
/// });
///
/// let out = lowpass.process(0.5);
/// assert!(out.is_finite());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Biquad {
    params: BiquadParams,
    sample_rate: f32,
    cache: CoefficientCache,
    dly1: f32,
    dly2: f32,
}

impl Biquad {
    /// Create a filter with default parameters; call
    /// [`prepare`](Self::prepare) before use.
    pub fn new() -> Self {
        Self {
            sample_rate: 44100.0,
            ..Self::default()
        }
    }

    /// Store the sample rate. Coefficients refresh on the next
    /// [`set_params`](Self::set_params).
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    /// Apply a parameter set, recomputing only what changed.
    ///
    /// Disabled filters skip the coefficient update entirely.
    pub fn set_params(&mut self, params: &BiquadParams) {
        self.params = *params;

        if !self.params.enabled {
            return;
        }

        self.cache.update(
            self.params.kind,
            self.params.cutoff_hz,
            self.params.q,
            self.sample_rate,
        );
    }

    /// Current parameter set.
    pub fn params(&self) -> &BiquadParams {
        &self.params
    }

    /// Process a single sample.
    ///
    /// A disabled filter is a pass-through and must not mutate the delay
    /// registers.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.params.enabled {
            return input;
        }

        let co = &self.cache;
        let out = input * co.a0 + self.dly1;
        self.dly1 = input * co.a1 + self.dly2 - co.b1 * out;
        self.dly2 = input * co.a2 - co.b2 * out;
        out
    }

    /// Clear the delay registers without touching coefficients.
    pub fn clear(&mut self) {
        self.dly1 = 0.0;
        self.dly2 = 0.0;
    }
}
