//! The riser signal chain.
//!
//! [`Riser`] owns one instance of every processor per channel and runs the
//! fixed per-sample pipeline
//!
//! ```text
//! comb -> lowpass -> highpass -> reverb -> safety clip
//! ```
//!
//! Four macro amounts in \[0, 1\] drive everything: each effect amount is
//! scaled by the master amount, bent through [`exp_rounder`] with an
//! effect-specific curve, and linearly mapped into that processor's native
//! range. The chain itself has no state machine — it is a parameter-mapping
//! and pipeline-execution unit.
//!
//! ## Threading
//!
//! [`Riser::process`] runs on the audio thread; [`Riser::set_macros`] may be
//! called from a control path between blocks. Every derived parameter lands
//! in a smoothed ramp, so a control update never produces a discontinuity
//! mid-block. [`Riser::prepare`] allocates and must not overlap processing.

use crate::reverb::{Reverb, ReverbParams};
use subida_core::{
    Biquad, BiquadParams, CombFilter, CombParams, FilterKind, Interpolation, clamp, exp_rounder,
    map_range,
};

/// Protective output ceiling; a development guard, not a creative stage.
const CLIP_CEILING: f32 = 1.2;

/// Early-bank comb tuning in seconds, chosen mutually non-harmonic.
const EARLY_COMB_TIMES: [f32; 8] = [
    0.0053, 0.0134, 0.0229, 0.030, 0.0092, 0.0158, 0.0397, 0.0184,
];

/// Late-bank comb tuning in seconds.
const LATE_COMB_TIMES: [f32; 4] = [0.0111, 0.0175, 0.0076, 0.0152];

/// Macro amounts, each in \[0, 1\].
///
/// `master` scales the other three, acting as a global intensity control
/// that doubles as a bypass at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Macros {
    /// Doubler (comb/flanger) intensity.
    pub doubler: f32,
    /// Filter sweep intensity.
    pub filter: f32,
    /// Reverb intensity.
    pub reverb: f32,
    /// Global intensity.
    pub master: f32,
}

/// The fixed stereo riser chain.
///
/// # Example
///
/// ```rust
/// use subida_effects::{Macros, Riser};
///
/// let mut riser = Riser::new();
/// riser.prepare(48000);
/// riser.set_macros(Macros {
///     doubler: 0.5,
///     filter: 0.5,
///     reverb: 0.5,
///     master: 1.0,
/// });
///
/// let mut left = vec![0.0f32; 256];
/// let mut right = vec![0.0f32; 256];
/// riser.process(&mut left, &mut right);
/// ```
#[derive(Debug, Clone)]
pub struct Riser {
    macros: Macros,

    comb: [CombFilter; 2],
    lowpass: [Biquad; 2],
    highpass: [Biquad; 2],
    reverb: Reverb,

    comb_params: CombParams,
    lowpass_params: BiquadParams,
    highpass_params: BiquadParams,
    reverb_params: ReverbParams,
}

impl Riser {
    /// Create a riser with its default voicing; call
    /// [`prepare`](Self::prepare) before processing.
    pub fn new() -> Self {
        let comb_params = CombParams {
            freq_hz: 3000.0,
            wet: 0.0,
            feedback: 0.5,
            interpolation: Interpolation::Linear,
        };

        let lowpass_params = BiquadParams {
            kind: FilterKind::Lowpass,
            cutoff_hz: 20000.0,
            q: 0.5,
            enabled: true,
        };

        let highpass_params = BiquadParams {
            kind: FilterKind::Highpass,
            cutoff_hz: 10.0,
            q: core::f32::consts::FRAC_1_SQRT_2,
            enabled: true,
        };

        let reverb_params = ReverbParams {
            width: 1.0,
            damping: 0.6,
            mix: 0.0,
            size: 0.2,
            spread: 6.5, // clamped to the 10ms bound inside the reverb
            ..ReverbParams::default()
        };

        let mut reverb = Reverb::new(reverb_params);
        for (i, &time) in EARLY_COMB_TIMES.iter().enumerate() {
            reverb.set_early_time(time, i);
        }
        for (i, &time) in LATE_COMB_TIMES.iter().enumerate() {
            reverb.set_late_time(time, i);
        }

        Self {
            macros: Macros {
                doubler: 0.7,
                filter: 1.0,
                reverb: 0.65,
                master: 0.0,
            },
            comb: [CombFilter::new(), CombFilter::new()],
            lowpass: [Biquad::new(), Biquad::new()],
            highpass: [Biquad::new(), Biquad::new()],
            reverb,
            comb_params,
            lowpass_params,
            highpass_params,
            reverb_params,
        }
    }

    /// Prepare every processor for playback at the given sample rate.
    ///
    /// The only allocation point; never call concurrently with
    /// [`process`](Self::process). A zero rate is forced to 1.
    pub fn prepare(&mut self, sample_rate: u32) {
        let rate = sample_rate.max(1) as f32;

        self.reverb.prepare(rate);

        for ch in 0..2 {
            self.comb[ch].prepare(rate);
            self.lowpass[ch].prepare(rate);
            self.highpass[ch].prepare(rate);
        }

        // map the correct values before playback too
        self.calculate_values();
    }

    /// Update the macro controls.
    ///
    /// Every amount clamps to \[0, 1\]; the three effect amounts are scaled
    /// by `master` before mapping. Safe to call from a control path between
    /// audio blocks.
    pub fn set_macros(&mut self, macros: Macros) {
        self.macros = Macros {
            doubler: clamp(macros.doubler, 0.0, 1.0),
            filter: clamp(macros.filter, 0.0, 1.0),
            reverb: clamp(macros.reverb, 0.0, 1.0),
            master: clamp(macros.master, 0.0, 1.0),
        };

        self.calculate_values();
    }

    /// Current macro values (after clamping, before master scaling).
    pub fn macros(&self) -> Macros {
        self.macros
    }

    /// Process one stereo block in place.
    ///
    /// Runs comb -> lowpass -> highpass per channel, then the stereo reverb,
    /// then the safety clip. Processes `min(left.len(), right.len())`
    /// frames; empty slices are a no-op.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mut out_l = *l;
            let mut out_r = *r;

            out_l = self.comb[0].process(out_l);
            out_r = self.comb[1].process(out_r);

            out_l = self.lowpass[0].process(out_l);
            out_r = self.lowpass[1].process(out_r);

            out_l = self.highpass[0].process(out_l);
            out_r = self.highpass[1].process(out_r);

            self.reverb.process(&mut out_l, &mut out_r);

            *l = clamp(out_l, -CLIP_CEILING, CLIP_CEILING);
            *r = clamp(out_r, -CLIP_CEILING, CLIP_CEILING);
        }
    }

    /// Map the macro amounts into every processor's native ranges and push
    /// the results down.
    fn calculate_values(&mut self) {
        let doubler = self.macros.doubler * self.macros.master;
        let filter = self.macros.filter * self.macros.master;
        let reverb = self.macros.reverb * self.macros.master;

        // doubler comb: wet, frequency, feedback
        self.comb_params.wet = map01(exp_rounder(doubler, 0.3), 0.0, 0.75);
        self.comb_params.freq_hz = map01(doubler, 20.0, 280.0);
        self.comb_params.feedback = map01(doubler, 0.0, 0.55);

        // filters: cutoff and Q for both; the lowpass range is inverted so
        // more macro means a lower ceiling
        self.lowpass_params.cutoff_hz = map01(exp_rounder(filter, 0.3), 20000.0, 4000.0);
        self.lowpass_params.q = map01(exp_rounder(filter, -0.6), 0.5, 0.85);
        self.highpass_params.cutoff_hz = map01(exp_rounder(filter, -0.3), 10.0, 200.0);
        self.highpass_params.q =
            map01(exp_rounder(filter, -0.5), core::f32::consts::FRAC_1_SQRT_2, 1.0);

        // reverb: mix, size, width, stereo spread
        self.reverb_params.mix = map01(reverb, 0.0, 0.75);
        self.reverb_params.size = map01(reverb, 0.01, 0.45);
        self.reverb_params.width = map01(reverb, 1.0, 0.6);
        self.reverb_params.spread = map01(exp_rounder(reverb, 0.3), 0.5, 1.5);

        // the second channel's comb runs detuned against the first, scaled
        // by the doubler amount, which widens the single-comb topology
        self.comb[0].set_params(&self.comb_params, 0.0);
        self.comb[1]
            .set_params(&self.comb_params, 7.0 * exp_rounder(doubler, -0.4));

        for ch in 0..2 {
            self.lowpass[ch].set_params(&self.lowpass_params);
            self.highpass[ch].set_params(&self.highpass_params);
        }

        self.reverb.set_params(self.reverb_params);
    }
}

impl Default for Riser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a \[0, 1\] amount into a processor range.
#[inline]
fn map01(amount: f32, out_lo: f32, out_hi: f32) -> f32 {
    map_range(amount, 0.0, 1.0, out_lo, out_hi)
}
