//! Stereo comb-network reverb.
//!
//! Two banks of comb filters per channel: an early bank (damped, feedback,
//! summed in parallel) approximating dense first reflections, and a late
//! bank (fixed feedback, chained in series) smearing them into a tail.
//! Stereo width comes from decorrelating the two channels' comb delay times
//! by a small per-channel offset ("spread") rather than from independent
//! inputs — both channels are fed the same pre-gained mono sum.
//!
//! Gain staging matters here: with up to twelve feedback paths summing, the
//! input is scaled by a pre-gain derived from the active comb count before
//! it enters any bank.

use subida_core::{DelayBuffer, Interpolation, SmoothedParam, clamp, exp_rounder, flush_denormal};

/// Upper bound on parallel early combs per channel.
pub const MAX_EARLY_COMBS: usize = 8;
/// Upper bound on series late combs per channel.
pub const MAX_LATE_COMBS: usize = 4;

/// Ramp applied to the reverb's smoothed gains.
const GAIN_SMOOTHING_SECS: f32 = 0.05;

/// Wet output scale applied on top of the mix curve.
const WET_GAIN_SCALE: f32 = 1.2;

/// Feedback derivation constants: `feedback = size * SCALE + OFFSET`.
const FEEDBACK_SCALE: f32 = 0.78;
const FEEDBACK_OFFSET: f32 = 0.2;
/// Damping derivation constant: `damping = damping_param * SCALE`.
const DAMPING_SCALE: f32 = 0.9;

/// Reverb configuration.
///
/// Passed at construction and to [`Reverb::set_params`]; comb counts above
/// the bank bounds clamp silently.
#[derive(Debug, Clone, Copy)]
pub struct ReverbParams {
    /// High-frequency absorption in the early bank, 0 (bright) to 1 (dark).
    pub damping: f32,
    /// Tail length control; scales the early banks' feedback.
    pub size: f32,
    /// Wet/dry balance in \[0, 1\], pushed through a non-linear curve.
    pub mix: f32,
    /// Stereo cross-mix: 1 = wide, 0 = mono wet signal.
    pub width: f32,
    /// Per-channel comb delay-time offset in seconds, clamped to \[0, 0.01\].
    pub spread: f32,
    /// Active early combs per channel, at most [`MAX_EARLY_COMBS`].
    pub num_early: usize,
    /// Active late combs per channel, at most [`MAX_LATE_COMBS`].
    pub num_late: usize,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            damping: 0.0,
            size: 0.0,
            mix: 0.0,
            width: 0.0,
            spread: 0.0,
            num_early: MAX_EARLY_COMBS,
            num_late: MAX_LATE_COMBS,
        }
    }
}

/// One comb of the reverb network: a delay buffer plus the one-pole state
/// used for early-bank damping.
#[derive(Debug, Clone, Default)]
struct ReverbComb {
    buffer: DelayBuffer,
    previous_value: f32,
}

impl ReverbComb {
    /// Size the buffer for playback: 100 ms of samples.
    fn prepare(&mut self, sample_rate: f32) {
        self.buffer.prepare_secs(0.1, sample_rate);
        self.clear();
    }

    fn clear(&mut self) {
        self.previous_value = 0.0;
        self.buffer.clear();
    }

    /// Set the comb's delay time (its resonant period).
    fn set_time(&mut self, delay_secs: f32) {
        self.buffer
            .set_delay_time(clamp(delay_secs, 0.001, 1.0), 0.1);
    }

    /// Early-bank step: damped feedback, undamped tap to the output sum.
    ///
    /// The one-pole weighted average `prev = d + damping * (prev - d)`
    /// emulates high-frequency absorption on each recirculation.
    #[inline]
    fn process_early(&mut self, input: f32, damping: f32, feedback: f32) -> f32 {
        let delayed = self.buffer.read(Interpolation::None);

        self.previous_value =
            flush_denormal(delayed + damping * (self.previous_value - delayed));

        self.buffer.push(input + self.previous_value * feedback);

        delayed
    }

    /// Late-bank step: fixed 0.5 feedback, polarity-inverted dry term.
    #[inline]
    fn process_late(&mut self, input: f32) -> f32 {
        let delayed = self.buffer.read(Interpolation::None);

        self.buffer.push(input + delayed * 0.5);

        delayed - input
    }
}

/// Stereo reverb built from per-channel early and late comb banks.
///
/// # Example
///
/// ```rust
/// use subida_effects::{Reverb, ReverbParams};
///
/// let mut reverb = Reverb::new(ReverbParams {
///     mix: 0.4,
///     size: 0.3,
///     damping: 0.6,
///     width: 1.0,
///     spread: 0.001,
///     ..ReverbParams::default()
/// });
/// reverb.prepare(48000.0);
///
/// let (mut left, mut right) = (0.5, 0.5);
/// reverb.process(&mut left, &mut right);
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    sample_rate: f32,
    params: ReverbParams,

    // combs[channel][instance]
    early_combs: [[ReverbComb; MAX_EARLY_COMBS]; 2],
    late_combs: [[ReverbComb; MAX_LATE_COMBS]; 2],
    early_times: [f32; MAX_EARLY_COMBS],
    late_times: [f32; MAX_LATE_COMBS],

    pre_gain: f32,
    // mix-derived intermediates, recomputed only when mix changes
    wet: f32,
    dry: f32,

    damping_smooth: SmoothedParam,
    feedback_smooth: SmoothedParam,
    dry_smooth: SmoothedParam,
    wet1: SmoothedParam,
    wet2: SmoothedParam,
}

impl Reverb {
    /// Create a reverb with the given configuration and placeholder comb
    /// tuning, prepared at 44.1 kHz so it is usable before the first
    /// [`prepare`](Self::prepare).
    pub fn new(params: ReverbParams) -> Self {
        let mut reverb = Self {
            sample_rate: 44100.0,
            params: Self::bounded(params),
            early_combs: [
                core::array::from_fn(|_| ReverbComb::default()),
                core::array::from_fn(|_| ReverbComb::default()),
            ],
            late_combs: [
                core::array::from_fn(|_| ReverbComb::default()),
                core::array::from_fn(|_| ReverbComb::default()),
            ],
            // fallback comb tuning, in case the caller never sets its own
            early_times: [0.06, 0.04, 0.02, 0.01, 0.052, 0.036, 0.042, 0.024],
            late_times: [0.011, 0.054, 0.033, 0.023],
            pre_gain: 0.0,
            wet: 0.0,
            dry: 0.0,
            damping_smooth: SmoothedParam::new(0.0),
            feedback_smooth: SmoothedParam::new(0.0),
            dry_smooth: SmoothedParam::new(0.0),
            wet1: SmoothedParam::new(0.0),
            wet2: SmoothedParam::new(0.0),
        };

        reverb.set_combs();
        reverb.apply_derived();
        reverb.prepare(44100.0);
        reverb
    }

    /// Derive every dependent value from the current parameter set, so the
    /// construction-time configuration is fully in effect before the first
    /// `set_params`.
    fn apply_derived(&mut self) {
        self.set_mix_values();
        self.set_gain_targets();
        self.set_damping();
    }

    /// Prepare the reverb for playback at the given sample rate.
    ///
    /// Sizes every comb buffer, re-arms the gain smoothers, and clears all
    /// state. The only allocation point; idempotent for an unchanged rate.
    pub fn prepare(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate && sample_rate != 0.0 {
            self.sample_rate = sample_rate;
        }

        for ch in 0..2 {
            for comb in &mut self.early_combs[ch] {
                comb.prepare(self.sample_rate);
            }
            for comb in &mut self.late_combs[ch] {
                comb.prepare(self.sample_rate);
            }
        }

        for smooth in [
            &mut self.damping_smooth,
            &mut self.feedback_smooth,
            &mut self.dry_smooth,
            &mut self.wet1,
            &mut self.wet2,
        ] {
            smooth.set_sample_rate(self.sample_rate);
            smooth.set_ramp_secs(GAIN_SMOOTHING_SECS);
            smooth.snap_to_target();
        }

        self.clear();
    }

    /// Clear every comb buffer and damping register.
    pub fn clear(&mut self) {
        for ch in 0..2 {
            for comb in &mut self.early_combs[ch] {
                comb.clear();
            }
            for comb in &mut self.late_combs[ch] {
                comb.clear();
            }
        }
    }

    /// Apply a parameter set.
    ///
    /// Derived values recompute change-driven: the mix curve only when mix
    /// moved, comb delay times only when spread moved, damping/feedback
    /// targets only when their sources moved. Gain targets ramp over 50 ms.
    pub fn set_params(&mut self, params: ReverbParams) {
        let old_mix = self.params.mix;
        let old_spread = self.params.spread;
        let old_damping = self.params.damping;
        let old_size = self.params.size;

        self.params = Self::bounded(params);

        if self.params.mix != old_mix {
            self.set_mix_values();
        }

        self.set_gain_targets();

        if self.params.spread != old_spread {
            self.set_combs();
        }

        if self.params.damping != old_damping || self.params.size != old_size {
            self.set_damping();
        }
    }

    /// Current parameter set (after bounding).
    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    /// Set one early comb's delay time in seconds.
    pub fn set_early_time(&mut self, delay_secs: f32, index: usize) {
        self.early_times[index.min(MAX_EARLY_COMBS - 1)] = delay_secs;
        self.set_combs();
    }

    /// Set one late comb's delay time in seconds.
    pub fn set_late_time(&mut self, delay_secs: f32, index: usize) {
        self.late_times[index.min(MAX_LATE_COMBS - 1)] = delay_secs;
        self.set_combs();
    }

    /// Process one stereo sample pair in place.
    pub fn process(&mut self, left: &mut f32, right: &mut f32) {
        let input = (*left + *right) * self.pre_gain;
        let damping = self.damping_smooth.advance();
        let feedback = self.feedback_smooth.advance();

        // early banks accumulate in parallel
        let mut out_l = 0.0;
        let mut out_r = 0.0;
        for i in 0..self.params.num_early {
            out_l += self.early_combs[0][i].process_early(input, damping, feedback);
            out_r += self.early_combs[1][i].process_early(input, damping, feedback);
        }

        // late banks run in series on each channel's sum
        for i in 0..self.params.num_late {
            out_l = self.late_combs[0][i].process_late(out_l);
            out_r = self.late_combs[1][i].process_late(out_r);
        }

        let dry = self.dry_smooth.advance();
        let w1 = self.wet1.advance();
        let w2 = self.wet2.advance();

        *left = dry * *left + w1 * out_l + w2 * out_r;
        *right = dry * *right + w1 * out_r + w2 * out_l;
    }

    /// Clamp comb counts into the banks' fixed bounds.
    fn bounded(mut params: ReverbParams) -> ReverbParams {
        params.num_early = params.num_early.min(MAX_EARLY_COMBS);
        params.num_late = params.num_late.min(MAX_LATE_COMBS);
        params
    }

    /// Push the comb tuning tables into the buffers, decorrelating the two
    /// channels by half the spread in opposite directions.
    fn set_combs(&mut self) {
        let spread_amount = clamp(self.params.spread, 0.0, 0.01) / 2.0;

        for ch in 0..2 {
            let spread = if ch == 0 { spread_amount } else { -spread_amount };

            for i in 0..MAX_EARLY_COMBS {
                self.early_combs[ch][i].set_time(self.early_times[i] + spread);
            }
            for i in 0..MAX_LATE_COMBS {
                self.late_combs[ch][i].set_time(self.late_times[i] + spread);
            }
        }
    }

    /// Re-target the output gains from the stored dry/wet intermediates.
    ///
    /// Runs on every parameter update: width changes must land even when
    /// the mix curve itself did not recompute.
    fn set_gain_targets(&mut self) {
        let active = self.params.num_early + self.params.num_late;
        self.pre_gain = 0.1 / active.max(1) as f32;
        self.dry_smooth.set_target(self.dry);
        self.wet1
            .set_target(WET_GAIN_SCALE * self.wet * (1.0 + self.params.width));
        self.wet2
            .set_target(WET_GAIN_SCALE * self.wet * (1.0 - self.params.width));
    }

    /// Recompute the mix-derived dry/wet intermediates.
    fn set_mix_values(&mut self) {
        let mix = clamp(self.params.mix, 0.0, 1.0);
        self.dry = 1.0 - mix;
        self.wet = exp_rounder(mix, 0.8) * 1.55;
    }

    /// Push damping and size through their scale/offset constants.
    fn set_damping(&mut self) {
        self.damping_smooth
            .set_target(self.params.damping * DAMPING_SCALE);
        self.feedback_smooth
            .set_target(self.params.size * FEEDBACK_SCALE + FEEDBACK_OFFSET);
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(ReverbParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(mut reverb: Reverb, secs: f32) -> Reverb {
        let samples = (48000.0 * secs) as usize;
        for _ in 0..samples {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
        }
        reverb
    }

    fn make(params: ReverbParams) -> Reverb {
        let mut reverb = Reverb::new(params);
        reverb.prepare(48000.0);
        // Let gain ramps and comb delay-time glides finish
        settled(reverb, 0.2)
    }

    #[test]
    fn test_bypass_at_zero_mix() {
        let mut reverb = make(ReverbParams {
            mix: 0.0,
            size: 0.3,
            damping: 0.5,
            width: 1.0,
            spread: 0.005,
            ..ReverbParams::default()
        });

        for i in 0..1000 {
            let input_l = (i as f32 * 0.37).sin() * 0.5;
            let input_r = (i as f32 * 0.73).sin() * 0.5;
            let (mut l, mut r) = (input_l, input_r);
            reverb.process(&mut l, &mut r);
            assert_eq!(l, input_l, "Left channel altered at sample {i}");
            assert_eq!(r, input_r, "Right channel altered at sample {i}");
        }
    }

    #[test]
    fn test_wet_tail_persists_after_input_stops() {
        let mut reverb = make(ReverbParams {
            mix: 0.6,
            size: 0.45,
            damping: 0.3,
            width: 1.0,
            spread: 0.001,
            ..ReverbParams::default()
        });

        // Feed a burst
        for i in 0..4800 {
            let x = (i as f32 * 0.21).sin() * 0.5;
            let (mut l, mut r) = (x, x);
            reverb.process(&mut l, &mut r);
        }

        // Tail should ring on for a while after the input stops
        let mut tail_energy = 0.0f32;
        for _ in 0..4800 {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            tail_energy += l * l + r * r;
        }
        assert!(tail_energy > 1e-4, "Expected a reverb tail, got {tail_energy}");
    }

    #[test]
    fn test_tail_decays() {
        let mut reverb = make(ReverbParams {
            mix: 0.6,
            size: 0.3,
            damping: 0.5,
            width: 1.0,
            spread: 0.001,
            ..ReverbParams::default()
        });

        for i in 0..4800 {
            let x = (i as f32 * 0.21).sin() * 0.5;
            let (mut l, mut r) = (x, x);
            reverb.process(&mut l, &mut r);
        }

        let mut first = 0.0f32;
        let mut second = 0.0f32;
        for n in 0..48000 {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            if n < 24000 {
                first += l * l + r * r;
            } else {
                second += l * l + r * r;
            }
        }
        assert!(
            second < first,
            "Tail must decay: first={first}, second={second}"
        );
    }

    #[test]
    fn test_spread_decorrelates_channels() {
        let run = |spread: f32| {
            // width 1.0 removes the cross-mix so each output carries only
            // its own channel's comb network
            let mut reverb = make(ReverbParams {
                mix: 1.0,
                size: 0.3,
                damping: 0.4,
                width: 1.0,
                spread,
                ..ReverbParams::default()
            });
            let mut diff = 0.0f32;
            for i in 0..9600 {
                let x = (i as f32 * 0.37).sin() * 0.5;
                let (mut l, mut r) = (x, x);
                reverb.process(&mut l, &mut r);
                diff += (l - r).abs();
            }
            diff
        };

        // Identical comb times -> identical channels; spread separates them
        assert!(run(0.0) < 1e-3, "Zero spread should keep channels identical");
        assert!(run(0.008) > 0.1, "Spread should decorrelate the channels");
    }

    #[test]
    fn test_stability_with_maximum_settings() {
        let mut reverb = make(ReverbParams {
            mix: 1.0,
            size: 1.0,
            damping: 0.0,
            width: 1.0,
            spread: 0.01,
            ..ReverbParams::default()
        });

        for i in 0..96000 {
            let x = (i as f32 * 0.37).sin();
            let (mut l, mut r) = (x, x);
            reverb.process(&mut l, &mut r);
            assert!(l.is_finite() && r.is_finite(), "Non-finite at {i}");
            // Every feedback path is individually < 1; sustained drive can
            // pile up resonance but never diverge
            assert!(
                l.abs() < 100.0 && r.abs() < 100.0,
                "Unbounded at {i}: ({l}, {r})"
            );
        }
    }

    #[test]
    fn test_comb_counts_clamped() {
        let reverb = Reverb::new(ReverbParams {
            num_early: 100,
            num_late: 50,
            ..ReverbParams::default()
        });
        assert_eq!(reverb.params().num_early, MAX_EARLY_COMBS);
        assert_eq!(reverb.params().num_late, MAX_LATE_COMBS);
    }

    #[test]
    fn test_pre_gain_tracks_active_comb_count() {
        let mut reverb = Reverb::new(ReverbParams::default());
        reverb.set_params(ReverbParams {
            mix: 0.5,
            ..ReverbParams::default()
        });
        assert!((reverb.pre_gain - 0.1 / 12.0).abs() < 1e-7);

        reverb.set_params(ReverbParams {
            mix: 0.5,
            num_early: 4,
            num_late: 2,
            ..ReverbParams::default()
        });
        assert!((reverb.pre_gain - 0.1 / 6.0).abs() < 1e-7);
    }

    #[test]
    fn test_clear_silences_tail() {
        let mut reverb = make(ReverbParams {
            mix: 1.0,
            size: 0.45,
            damping: 0.2,
            spread: 0.001,
            width: 1.0,
            ..ReverbParams::default()
        });

        for _ in 0..9600 {
            let (mut l, mut r) = (0.5, 0.5);
            reverb.process(&mut l, &mut r);
        }

        reverb.clear();

        // Dry path is zero (mix=1) and the tail is gone
        let mut energy = 0.0f32;
        for _ in 0..4800 {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            energy += l * l + r * r;
        }
        assert!(energy < 1e-6, "Tail survived clear: {energy}");
    }

    #[test]
    fn test_dc_does_not_accumulate() {
        let mut reverb = make(ReverbParams {
            mix: 1.0,
            size: 1.0,
            damping: 0.0,
            width: 1.0,
            spread: 0.005,
            ..ReverbParams::default()
        });

        let mut out = (0.0, 0.0);
        for _ in 0..96000 {
            let (mut l, mut r) = (1.0, 1.0);
            reverb.process(&mut l, &mut r);
            out = (l, r);
        }
        assert!(
            out.0.abs() < 100.0 && out.1.abs() < 100.0,
            "DC accumulated: {out:?}"
        );
    }
}
