//! Fast trigonometric approximations for coefficient computation.
//!
//! Rational (Padé-style) approximations that trade full IEEE 754 precision
//! for speed. The biquad filter recomputes its frequency pre-warp on every
//! cutoff change; these keep that control-rate work off the libm
//! transcendentals. Each input is wrapped into the approximation's domain
//! by modulo first, and accuracy only needs to hold within that wrapped
//! domain.
//!
//! Intermediate arithmetic runs in f64: the coefficient sets carry 11-digit
//! integers that would lose significance in f32 products.
//!
//! | Function | Replaces | Wrapped domain | Max error |
//! |----------|----------|----------------|-----------|
//! | [`fast_sin`] | `libm::sinf` | \[-π, π\] | < 1e-5 |
//! | [`fast_cos`] | `libm::cosf` | \[-π, π\] | < 1e-5 |
//! | [`fast_tan`] | `libm::tanf` | \[-π/2, π/2\] | < 0.1% (f < sr/4) |
//!
//! # When NOT to use
//!
//! Audio-rate synthesis — use `libm` for full precision. These target
//! per-parameter-change coefficient computation where the input range is
//! bounded and the call count is low.

use core::f64::consts::PI;
use libm::fmod;

/// Wrap an angle into \[-π, π).
#[inline]
pub fn wrap_pi(x: f64) -> f64 {
    let r = fmod(x + PI, 2.0 * PI);
    let r = if r < 0.0 { r + 2.0 * PI } else { r };
    r - PI
}

/// Wrap an angle into \[-π/2, π/2), for the tangent approximation.
#[inline]
pub fn wrap_half_pi(x: f64) -> f64 {
    let r = fmod(x + PI * 0.5, PI);
    let r = if r < 0.0 { r + PI } else { r };
    r - PI * 0.5
}

/// Fast sine approximation.
///
/// Wraps the input into \[-π, π\] and evaluates a fixed-order rational
/// approximation (numerator degree 7, denominator degree 6).
///
/// # Example
/// ```rust
/// use subida_core::fast_math::fast_sin;
///
/// assert!((fast_sin(core::f32::consts::FRAC_PI_2) - 1.0).abs() < 1e-4);
/// assert!(fast_sin(0.0).abs() < 1e-6);
/// ```
pub fn fast_sin(x: f32) -> f32 {
    let x = wrap_pi(f64::from(x));
    let x2 = x * x;
    let num = -x * (-11511339840.0 + x2 * (1640635920.0 + x2 * (-52785432.0 + x2 * 479249.0)));
    let den = 11511339840.0 + x2 * (277920720.0 + x2 * (3177720.0 + x2 * 18361.0));
    (num / den) as f32
}

/// Fast cosine approximation.
///
/// Wraps the input into \[-π, π\] and evaluates a fixed-order rational
/// approximation (even numerator and denominator, degree 6).
///
/// # Example
/// ```rust
/// use subida_core::fast_math::fast_cos;
///
/// assert!((fast_cos(0.0) - 1.0).abs() < 1e-6);
/// assert!(fast_cos(core::f32::consts::FRAC_PI_2).abs() < 1e-4);
/// ```
pub fn fast_cos(x: f32) -> f32 {
    let x = wrap_pi(f64::from(x));
    let x2 = x * x;
    let num = -(-39251520.0 + x2 * (18471600.0 + x2 * (-1075032.0 + 14615.0 * x2)));
    let den = 39251520.0 + x2 * (1154160.0 + x2 * (16632.0 + x2 * 127.0));
    (num / den) as f32
}

/// Fast tangent approximation.
///
/// Wraps the input into \[-π/2, π/2\] and evaluates the \[3/3\]
/// continued-fraction truncation of tan. The rational form keeps poles
/// near ±π/2, so error stays below 0.1% for filter pre-warp arguments up
/// to about a quarter of the sample rate and degrades gracefully toward
/// Nyquist.
///
/// # Use case
///
/// The biquad pre-warp `tan(π · cutoff / sample_rate)`.
///
/// # Example
/// ```rust
/// use subida_core::fast_math::fast_tan;
///
/// let x = core::f32::consts::PI * 1000.0 / 48000.0;
/// let exact = libm::tanf(x);
/// assert!((fast_tan(x) - exact).abs() / exact < 0.001);
/// ```
pub fn fast_tan(x: f32) -> f32 {
    let x = wrap_half_pi(f64::from(x));
    let x2 = x * x;
    let num = x * (-135135.0 + x2 * (17325.0 + x2 * (-378.0 + x2)));
    let den = -135135.0 + x2 * (62370.0 + x2 * (-3150.0 + 28.0 * x2));
    (num / den) as f32
}
