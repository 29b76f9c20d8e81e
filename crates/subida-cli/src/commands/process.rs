//! File-based riser rendering command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use subida_effects::{Macros, Riser};
use subida_io::{StereoSamples, read_wav_stereo, write_wav_stereo};
use tracing::info;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Doubler macro amount (0-1)
    #[arg(long, default_value = "0.7")]
    doubler: f32,

    /// Filter macro amount (0-1)
    #[arg(long, default_value = "1.0")]
    filter: f32,

    /// Reverb macro amount (0-1)
    #[arg(long, default_value = "0.65")]
    reverb: f32,

    /// Master macro amount (0-1); the rise ramps up to this value
    #[arg(long, default_value = "1.0")]
    master: f32,

    /// Ramp the master macro from 0 to its value over this many seconds.
    /// Without it the macros are held static.
    #[arg(long)]
    rise: Option<f32>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate;

    println!(
        "  {} frames, {} Hz, {:.2}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    let input_rms = stereo_rms(&samples);
    let input_peak = stereo_peak(&samples);

    let mut riser = Riser::new();
    riser.prepare(sample_rate);
    riser.set_macros(Macros {
        doubler: args.doubler,
        filter: args.filter,
        reverb: args.reverb,
        master: if args.rise.is_some() { 0.0 } else { args.master },
    });

    let block_size = args.block_size.max(1);
    let num_frames = samples.len();
    let rise_frames = args.rise.map(|secs| (secs * sample_rate as f32) as usize);

    info!(
        doubler = args.doubler,
        filter = args.filter,
        reverb = args.reverb,
        master = args.master,
        rise = ?args.rise,
        "processing"
    );

    let pb = ProgressBar::new(num_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut start = 0;
    while start < num_frames {
        let end = (start + block_size).min(num_frames);

        // Block-rate macro automation: ramp the master amount up over the
        // configured rise time
        if let Some(rise_frames) = rise_frames {
            let progress = (start as f32 / rise_frames.max(1) as f32).min(1.0);
            riser.set_macros(Macros {
                doubler: args.doubler,
                filter: args.filter,
                reverb: args.reverb,
                master: progress * args.master,
            });
        }

        riser.process(&mut samples.left[start..end], &mut samples.right[start..end]);
        pb.set_position(end as u64);
        start = end;
    }

    pb.finish_with_message("done");

    let output_rms = stereo_rms(&samples);
    let output_peak = stereo_peak(&samples);

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(output_rms),
        linear_to_db(output_peak)
    );

    let out_spec = subida_io::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &samples, out_spec)?;
    println!("Done!");

    Ok(())
}

fn stereo_rms(samples: &StereoSamples) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples
        .left
        .iter()
        .zip(samples.right.iter())
        .map(|(l, r)| l * l + r * r)
        .sum();
    (sum / (2 * samples.len()) as f32).sqrt()
}

fn stereo_peak(samples: &StereoSamples) -> f32 {
    samples
        .left
        .iter()
        .chain(samples.right.iter())
        .map(|s| s.abs())
        .fold(0.0, f32::max)
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
