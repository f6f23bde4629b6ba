//! Command line front end: render one audio file through a virtual room.

use anyhow::{Result, bail};
use clap::Parser;
use clap::error::ErrorKind;
use spaudio::math::{Vec3, positions_from_flat};
use spaudio::{LoadOptions, OutputTarget, Pipeline, PipelineDesc, RoomPreset};
use std::path::Path;
use std::process::ExitCode;

/// spaudio - play a recording through a virtual room and microphone array
#[derive(Parser, Debug)]
#[command(name = "spaudio", version, about)]
struct Args {
    /// Input audio file
    audio_file: String,

    /// Write the result here (.wav, .raw or .pcm) instead of playing it
    #[arg(long = "output_file", value_name = "PATH")]
    output_file: Option<String>,

    /// Room extents in meters
    #[arg(long = "room_dim", num_args = 3, value_names = ["X", "Y", "Z"])]
    room_dim: Option<Vec<f32>>,

    /// Flattened x y z triples, one per input channel
    #[arg(long = "source_positions", num_args = 1.., allow_negative_numbers = true)]
    source_positions: Option<Vec<f32>>,

    /// Flattened x y z triples, one per microphone
    #[arg(long = "mic_positions", num_args = 1.., allow_negative_numbers = true)]
    mic_positions: Option<Vec<f32>>,

    /// Room layout: room, studio, hall or surround
    #[arg(long, default_value_t = RoomPreset::Hall)]
    preset: RoomPreset,

    /// Maximum number of wall reflections to model
    #[arg(long = "max_order")]
    max_order: Option<u32>,

    /// Fraction of energy absorbed per wall reflection, in [0, 1]
    #[arg(long)]
    absorption: Option<f32>,

    /// Resample the input to this rate before simulating
    #[arg(long = "sample_rate", value_name = "HZ")]
    sample_rate: Option<u32>,

    /// Log pipeline progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("ERROR: {}", first_line(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&args) {
        Ok(Some(path)) => {
            println!("Saved to '{}'.", path);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            println!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Render and output; returns the written path, or `None` after playback.
fn run(args: &Args) -> Result<Option<String>> {
    let desc = pipeline_desc(args)?;
    let input = clean_path(&args.audio_file);
    let destination = args.output_file.as_deref().map(clean_path);

    log::info!(
        "Rendering '{}' with preset '{}' to {}",
        input,
        desc.preset,
        destination.as_deref().unwrap_or("playback")
    );

    let sink = OutputTarget::from_destination(destination.as_deref()).into_sink();
    let pipeline = Pipeline::with_defaults(desc);
    let report = pipeline.run(Path::new(&input), &sink)?;
    log::info!("Finished in {:.2?}", report.total_time());

    Ok(destination)
}

fn pipeline_desc(args: &Args) -> Result<PipelineDesc> {
    let mut desc = PipelineDesc::new(args.preset);

    if let Some(dims) = &args.room_dim {
        let [x, y, z] = dims.as_slice() else {
            bail!("--room_dim takes exactly 3 values, got {}", dims.len());
        };
        desc = desc.room_dimensions(Vec3::new(*x, *y, *z));
    }
    if let Some(flat) = &args.source_positions {
        desc = desc.source_positions(positions_from_flat(flat)?);
    }
    if let Some(flat) = &args.mic_positions {
        desc = desc.mic_positions(positions_from_flat(flat)?);
    }
    if let Some(order) = args.max_order {
        desc = desc.max_reflection_order(order);
    }
    if let Some(absorption) = args.absorption {
        desc = desc.wall_absorption(absorption);
    }
    if let Some(rate) = args.sample_rate {
        desc = desc.load_options(LoadOptions::new().target_sample_rate(rate));
    }

    Ok(desc)
}

/// Drop shell-escape backslashes (as left by drag-and-drop) and surrounding whitespace.
fn clean_path(raw: &str) -> String {
    raw.replace('\\', "").trim().to_string()
}

fn first_line(message: &str) -> &str {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line)
}
