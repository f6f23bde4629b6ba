//! # spaudio
//!
//! Renders a multi-channel recording as if it were played by loudspeakers in a
//! shoebox room and captured by a virtual microphone array.
//!
//! Each input channel drives one source. The propagation engine computes what
//! every microphone hears (direct path plus wall reflections), and the result
//! is normalized, reduced to the target channel count and quantized to 16-bit
//! PCM for a file or the default output device.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spaudio::*;
//! use std::path::Path;
//!
//! let desc = PipelineDesc::new(RoomPreset::Hall);
//! let pipeline = Pipeline::with_defaults(desc);
//!
//! let sink = OutputTarget::from_destination(Some("rendered.wav")).into_sink();
//! let report = pipeline.run(Path::new("input.wav"), &sink)?;
//! println!("{} output channels", report.output_channels);
//! # Ok::<(), SpaudioError>(())
//! ```

pub mod audio_data;
pub mod config;
pub mod error;
pub mod math;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod propagation;
pub mod scene;

pub use audio_data::{
    AudioDataLoader, DefaultAudioLoader, LoadOptions, PcmWaveform, WaveformBuffer,
};
pub use config::{PipelineDesc, RoomDesc, RoomPreset};
pub use error::{ErrorKind, Result, SpaudioError};
pub use output::{FileSink, OutputSink, OutputTarget, PlaybackSink};
pub use pipeline::{Pipeline, RenderOutput, RenderReport};
pub use propagation::{ImageSourceEngine, PropagationEngine, RawCapture};
pub use scene::{RoomScene, build_scene};
