//! Subida Core - DSP primitives for the riser engine
//!
//! This crate provides the building blocks the riser chain is assembled
//! from, designed for real-time audio processing with zero allocation in
//! the audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - Linear ramps for click-free parameter changes
//!
//! ## Delay
//!
//! - [`DelayBuffer`] - Circular store with smoothed, fractional delay reads
//! - [`Interpolation`] - Per-read interpolation selection (none/linear/cubic)
//!
//! ## Filters
//!
//! - [`CombFilter`] - Single-tap recirculating comb (the doubler stage)
//! - [`Biquad`] - Second-order lowpass/highpass with cached coefficients
//!
//! ## Utilities
//!
//! - Math: [`clamp`], [`map_range`], [`exp_rounder`], [`lerp`],
//!   [`cubic_interp`], [`flush_denormal`]
//! - Trig approximations: [`fast_math::fast_sin`], [`fast_math::fast_cos`],
//!   [`fast_math::fast_tan`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! subida-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: allocation only in `prepare`, never in processing
//! - **No dependencies on std**: pure `no_std` with `libm` for math
//! - **Silent degradation**: out-of-range parameters clamp, they never fail

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod comb;
pub mod delay;
pub mod fast_math;
pub mod math;
pub mod param;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadParams, FilterKind};
pub use comb::{CombFilter, CombParams};
pub use delay::{DelayBuffer, Interpolation};
pub use math::{
    CubicKind, clamp, cubic_interp, exp_rounder, flush_denormal, fractional_part, lerp, map_range,
    mono_sum, ms_to_samples, samples_to_ms, wet_dry_mix,
};
pub use param::SmoothedParam;
