//! WAV file I/O for the subida riser engine.
//!
//! The riser processes stereo blocks in place, so this crate deals in
//! deinterleaved stereo buffers: [`read_wav_stereo`] loads any mono/stereo
//! WAV into a [`StereoSamples`] pair, and [`write_wav_stereo`] writes the
//! processed result back out.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use subida_io::{read_wav_stereo, write_wav_stereo, WavSpec};
//!
//! let (mut samples, spec) = read_wav_stereo("input.wav")?;
//! // ... process samples.left / samples.right in place ...
//! write_wav_stereo("output.wav", &samples, spec)?;
//! ```

mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo,
};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's channel layout cannot be mapped onto the stereo engine.
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    /// Left and right buffers disagree in length.
    #[error("Channel length mismatch: left {left}, right {right}")]
    ChannelLengthMismatch {
        /// Left channel length in frames.
        left: usize,
        /// Right channel length in frames.
        right: usize,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
