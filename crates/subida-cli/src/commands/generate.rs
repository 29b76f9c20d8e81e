//! Test-signal generation command.

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use subida_io::{StereoSamples, WavSpec, write_wav_stereo};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Signal {
    /// Pure sine tone
    Sine,
    /// White noise
    Noise,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Signal type
    #[arg(long, value_enum, default_value = "sine")]
    signal: Signal,

    /// Tone frequency in Hz (sine only)
    #[arg(long, default_value = "440.0")]
    freq: f32,

    /// Duration in seconds
    #[arg(long, default_value = "4.0")]
    duration: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Peak amplitude (0-1)
    #[arg(long, default_value = "0.5")]
    amplitude: f32,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let frames = (args.duration * args.sample_rate as f32) as usize;
    let amplitude = args.amplitude.clamp(0.0, 1.0);

    let mono: Vec<f32> = match args.signal {
        Signal::Sine => (0..frames)
            .map(|n| {
                amplitude
                    * (std::f32::consts::TAU * args.freq * n as f32 / args.sample_rate as f32)
                        .sin()
            })
            .collect(),
        Signal::Noise => {
            // xorshift32: deterministic output, no rand dependency needed
            let mut state: u32 = 0x2545_f491;
            (0..frames)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    amplitude * (state as f32 / u32::MAX as f32 * 2.0 - 1.0)
                })
                .collect()
        }
    };

    let samples = StereoSamples::from_mono(mono);
    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };

    println!(
        "Writing {} ({:?}, {:.2}s at {} Hz)...",
        args.output.display(),
        args.signal,
        args.duration,
        args.sample_rate
    );
    write_wav_stereo(&args.output, &samples, spec)?;
    println!("Done!");

    Ok(())
}
