//! Subida Effects - the riser's processors
//!
//! This crate assembles the subida-core primitives into the riser chain:
//!
//! - [`Reverb`] - Stereo comb-network reverb (parallel early bank, series
//!   late bank, spread-based decorrelation)
//! - [`Riser`] - The fixed chain orchestrator: comb -> lowpass -> highpass
//!   -> reverb -> safety clip, driven by four macro controls
//!
//! ## Example
//!
//! ```rust
//! use subida_effects::{Macros, Riser};
//!
//! let mut riser = Riser::new();
//! riser.prepare(48000);
//! riser.set_macros(Macros {
//!     doubler: 0.7,
//!     filter: 0.4,
//!     reverb: 0.6,
//!     master: 1.0,
//! });
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! riser.process(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod reverb;
pub mod riser;

// Re-export main types at crate root
pub use reverb::{MAX_EARLY_COMBS, MAX_LATE_COMBS, Reverb, ReverbParams};
pub use riser::{Macros, Riser};
