//! Property-based tests for subida-core DSP primitives.
//!
//! Tests filter stability, parameter convergence, and delay buffer
//! integrity using proptest for randomized input generation.

use proptest::prelude::*;
use subida_core::{
    Biquad, BiquadParams, CombFilter, CombParams, DelayBuffer, FilterKind, Interpolation,
    SmoothedParam,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any valid cutoff (20 Hz to just below Nyquist) and Q in the
    /// riser's mapped range, both biquad kinds produce finite output for
    /// random finite input.
    #[test]
    fn biquad_stability(
        cutoff in 20.0f32..20000.0f32,
        q in 0.5f32..1.0f32,
        highpass in any::<bool>(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        biquad.prepare(48000.0);
        biquad.set_params(&BiquadParams {
            kind: if highpass { FilterKind::Highpass } else { FilterKind::Lowpass },
            cutoff_hz: cutoff,
            q,
            enabled: true,
        });

        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(
                out.is_finite(),
                "Biquad (cutoff={}, q={}, highpass={}) produced {} for input {}",
                cutoff, q, highpass, out, sample
            );
        }
    }

    /// Comb filters with any in-range parameters stay finite and bounded
    /// for sustained random input.
    #[test]
    fn comb_stability(
        freq in 20.0f32..300.0f32,
        wet in 0.0f32..1.0f32,
        feedback in 0.0f32..1.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut comb = CombFilter::new();
        comb.prepare(48000.0);
        comb.set_params(
            &CombParams {
                freq_hz: freq,
                wet,
                feedback,
                interpolation: Interpolation::Linear,
            },
            0.0,
        );

        // Cycle the random block enough times to recirculate the feedback
        for round in 0..64 {
            for &sample in &input {
                let out = comb.process(sample);
                prop_assert!(out.is_finite(), "Non-finite output in round {}", round);
                prop_assert!(
                    out.abs() < 100.0,
                    "Comb output {} unbounded (freq={}, feedback={})",
                    out, freq, feedback
                );
            }
        }
    }

    /// SmoothedParam reaches any target exactly within its ramp time.
    #[test]
    fn smoothed_param_exact_convergence(
        initial in -100.0f32..100.0f32,
        target in -100.0f32..100.0f32,
        ramp_ms in 1.0f32..200.0f32,
    ) {
        let ramp_secs = ramp_ms / 1000.0;
        let mut param = SmoothedParam::with_config(initial, 48000.0, ramp_secs);
        param.set_target(target);

        let samples = (48000.0 * ramp_secs) as usize + 1;
        for _ in 0..samples {
            param.advance();
        }

        prop_assert_eq!(param.get(), target);
        prop_assert!(param.is_settled());
    }

    /// Write N random samples, read them back at integer delays — every
    /// sample is recovered exactly regardless of buffer size.
    #[test]
    fn delay_buffer_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let n = samples.len();
        // Power-of-two rate keeps k/rate representable, so offsets are exact
        let rate = 1024.0;
        let mut delay = DelayBuffer::new();
        delay.prepare(n, rate);

        for &s in &samples {
            delay.push(s);
        }

        for k in 1..=n {
            delay.set_delay_time(k as f32 / rate, 0.0);
            let out = delay.read(Interpolation::None);
            prop_assert_eq!(out, samples[n - k], "Mismatch at delay {}", k);
        }
    }

    /// The delay buffer's capacity ceiling holds for arbitrary requests.
    #[test]
    fn delay_capacity_bounded(
        requested in 0usize..100_000_000,
        rate in 0.0f32..192000.0f32,
    ) {
        let mut delay = DelayBuffer::new();
        delay.prepare(requested, rate);
        let ceiling = ((600.0 * rate.max(1.0)) as usize).max(1);
        prop_assert!(delay.capacity() >= 1);
        prop_assert!(delay.capacity() <= ceiling);
    }
}
