//! The render pipeline: load, build the scene, simulate, post-process, output.
//!
//! Every stage runs synchronously on the calling thread and the first failure
//! ends the run. A [`Pipeline`] keeps no state between renders, so one value
//! can render any number of files.

use crate::audio_data::{AudioDataLoader, DefaultAudioLoader, PcmWaveform, WaveformBuffer};
use crate::config::PipelineDesc;
use crate::error::Result;
use crate::output::OutputSink;
use crate::processing::post_process;
use crate::propagation::{ImageSourceEngine, PropagationEngine};
use crate::scene::build_scene;
use std::path::Path;
use std::time::{Duration, Instant};

/// Summary of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub input_channels: u16,
    pub input_frames: usize,
    pub sample_rate: u32,
    pub capture_channels: usize,
    pub capture_frames: usize,
    pub output_channels: u16,
    /// Peak absolute value of the capture before normalization
    pub capture_peak: f32,
    pub load_time: Duration,
    pub simulate_time: Duration,
    pub post_process_time: Duration,
}

impl RenderReport {
    pub fn total_time(&self) -> Duration {
        self.load_time + self.simulate_time + self.post_process_time
    }
}

/// A rendered waveform together with its report.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub waveform: PcmWaveform,
    pub report: RenderReport,
}

/// One configured render pipeline.
///
/// `L` decodes input files and `E` computes what the microphones capture.
pub struct Pipeline<L, E> {
    desc: PipelineDesc,
    loader: L,
    engine: E,
}

impl Pipeline<DefaultAudioLoader, ImageSourceEngine> {
    /// Symphonia loader and image-source propagation.
    pub fn with_defaults(desc: PipelineDesc) -> Self {
        Self::new(desc, DefaultAudioLoader, ImageSourceEngine::default())
    }
}

impl<L: AudioDataLoader, E: PropagationEngine> Pipeline<L, E> {
    pub fn new(desc: PipelineDesc, loader: L, engine: E) -> Self {
        Self {
            desc,
            loader,
            engine,
        }
    }

    pub fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Load `path` and render it.
    pub fn render(&self, path: &Path) -> Result<RenderOutput> {
        let started = Instant::now();
        let input = self.loader.load(path, &self.desc.load_options)?;
        let load_time = started.elapsed();

        self.render_loaded(input, load_time)
    }

    /// Render an in-memory waveform. The buffer is used at its own sample rate.
    pub fn render_buffer(&self, input: WaveformBuffer) -> Result<RenderOutput> {
        self.render_loaded(input, Duration::ZERO)
    }

    /// Render `path` and hand the result to `sink`.
    ///
    /// Nothing reaches the sink unless every earlier stage succeeded.
    pub fn run<S: OutputSink + ?Sized>(&self, path: &Path, sink: &S) -> Result<RenderReport> {
        let output = self.render(path)?;
        sink.write(&output.waveform)?;
        Ok(output.report)
    }

    fn render_loaded(&self, input: WaveformBuffer, load_time: Duration) -> Result<RenderOutput> {
        let input = input.normalized()?;
        let input_channels = input.channels();
        let input_frames = input.total_frames();
        let sample_rate = input.sample_rate();

        let room = self.desc.resolved_room();
        let scene = build_scene(
            &room,
            sample_rate,
            &self.desc.resolved_source_positions(),
            input.to_planar(),
            &self.desc.resolved_mic_positions(),
        )?;
        drop(input);

        let started = Instant::now();
        let capture = self.engine.simulate(&scene)?;
        let simulate_time = started.elapsed();
        drop(scene);

        let capture_channels = capture.mic_count();
        let capture_frames = capture.frames();
        let capture_peak = capture.peak();

        let started = Instant::now();
        let waveform = post_process(capture, sample_rate, self.desc.target_channels)?;
        let post_process_time = started.elapsed();

        let report = RenderReport {
            input_channels,
            input_frames,
            sample_rate,
            capture_channels,
            capture_frames,
            output_channels: waveform.channels(),
            capture_peak,
            load_time,
            simulate_time,
            post_process_time,
        };

        log::info!(
            "Rendered {} ch x {} frames at {} Hz -> {} mics -> {} output channels (load {:.2?}, simulate {:.2?}, post-process {:.2?})",
            report.input_channels,
            report.input_frames,
            report.sample_rate,
            report.capture_channels,
            report.output_channels,
            report.load_time,
            report.simulate_time,
            report.post_process_time
        );

        Ok(RenderOutput { waveform, report })
    }
}
