//! End-to-end renders through the public API.

use spaudio::audio_data::PCM_FULL_SCALE;
use spaudio::math::Vec3;
use spaudio::*;
use std::path::{Path, PathBuf};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("spaudio-it-{}-{}", std::process::id(), name))
}

/// Refuses to run; proves a failure happened before simulation.
struct Unreachable;

impl PropagationEngine for Unreachable {
    fn simulate(&self, _scene: &RoomScene) -> Result<RawCapture> {
        panic!("propagation engine must not be reached");
    }
}

fn impulse_input(channels: usize, frames: usize, sample_rate: u32) -> WaveformBuffer {
    let mut planar = vec![vec![0.0f32; frames]; channels];
    planar[0][0] = 1.0;
    WaveformBuffer::from_planar(&planar, sample_rate).unwrap()
}

fn max_abs(samples: &[i16]) -> i32 {
    samples.iter().map(|s| (*s as i32).abs()).max().unwrap_or(0)
}

#[test]
fn impulse_in_studio_reaches_full_scale() {
    init_logger();
    let pipeline = Pipeline::with_defaults(PipelineDesc::new(RoomPreset::Studio));
    let out = pipeline.render_buffer(impulse_input(2, 44100, 44100)).unwrap();

    assert_eq!(out.report.input_channels, 2);
    assert_eq!(out.report.input_frames, 44100);
    assert_eq!(out.report.capture_channels, 2);
    assert!(out.report.capture_peak > 0.0);
    assert!(out.report.capture_frames > 44100);

    assert_eq!(out.waveform.channels(), 2);
    assert_eq!(out.waveform.sample_rate(), 44100);
    assert_eq!(out.waveform.sample_width(), 16);
    assert_eq!(max_abs(out.waveform.samples()), PCM_FULL_SCALE as i32);
}

#[test]
fn eight_sources_in_hall_are_capped_at_two_channels() {
    init_logger();
    let desc = PipelineDesc::new(RoomPreset::Hall)
        .source_positions(RoomPreset::Surround.source_positions())
        .max_reflection_order(2);
    let pipeline = Pipeline::with_defaults(desc);

    let planar: Vec<Vec<f32>> = (0..8)
        .map(|c| {
            (0..200)
                .map(|i| ((i as f32 + c as f32) * 0.3).sin() * 0.5)
                .collect()
        })
        .collect();
    let input = WaveformBuffer::from_planar(&planar, 4000).unwrap();
    let out = pipeline.render_buffer(input).unwrap();

    assert_eq!(out.report.input_channels, 8);
    assert_eq!(out.report.capture_channels, 2);
    assert_eq!(out.waveform.channels(), 2);
}

#[test]
fn surround_array_is_truncated_to_two_channels() {
    init_logger();
    let desc = PipelineDesc::new(RoomPreset::Surround).max_reflection_order(1);
    let pipeline = Pipeline::with_defaults(desc);
    let out = pipeline.render_buffer(impulse_input(8, 100, 4000)).unwrap();

    assert_eq!(out.report.capture_channels, 8);
    assert_eq!(out.waveform.channels(), 2);
}

#[test]
fn zero_dimension_room_rejected_before_simulation() {
    let source = impulse_input(2, 16, 8000);
    for dims in [
        Vec3::new(0.0, 4.0, 3.0),
        Vec3::new(5.0, 0.0, 3.0),
        Vec3::new(5.0, 4.0, 0.0),
    ] {
        let desc = PipelineDesc::new(RoomPreset::Studio).room_dimensions(dims);
        let pipeline = Pipeline::new(desc, DefaultAudioLoader, Unreachable);
        let err = pipeline.render_buffer(source.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration, "{}", err);
    }
}

#[test]
fn source_count_mismatch_rejected_before_simulation() {
    let pipeline = Pipeline::new(
        PipelineDesc::new(RoomPreset::Studio),
        DefaultAudioLoader,
        Unreachable,
    );
    let err = pipeline
        .render_buffer(impulse_input(3, 16, 8000))
        .unwrap_err();
    assert!(matches!(
        err,
        SpaudioError::Cardinality {
            expected: 3,
            actual: 2
        }
    ));
}

#[test]
fn silent_input_is_degenerate() {
    let pipeline = Pipeline::new(
        PipelineDesc::new(RoomPreset::Studio),
        DefaultAudioLoader,
        Unreachable,
    );
    let silent = WaveformBuffer::new(vec![0.0; 64], 8000, 2).unwrap();
    let err = pipeline.render_buffer(silent).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateSignal);
}

fn write_input_wav(path: &Path, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..400 {
        let t = i as f32 / sample_rate as f32;
        let left = (t * 440.0 * std::f32::consts::TAU).sin() * 0.4;
        let right = (t * 660.0 * std::f32::consts::TAU).sin() * 0.2;
        writer.write_sample((left * 32767.0) as i16).unwrap();
        writer.write_sample((right * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn wav_file_round_trip() {
    init_logger();
    let input_path = temp_path("input.wav");
    let output_path = temp_path("output.wav");
    write_input_wav(&input_path, 8000);

    let desc = PipelineDesc::new(RoomPreset::Studio).max_reflection_order(2);
    let pipeline = Pipeline::with_defaults(desc);
    let output = pipeline.render(&input_path).unwrap();
    let report = pipeline
        .run(&input_path, &FileSink::new(&output_path))
        .unwrap();
    assert_eq!(report.input_channels, 2);
    assert_eq!(report.input_frames, 400);

    let reloaded = DefaultAudioLoader
        .load(&output_path, &LoadOptions::default())
        .unwrap();
    assert_eq!(reloaded.channels(), 2);
    assert_eq!(reloaded.sample_rate(), 8000);
    assert_eq!(reloaded.total_frames(), output.waveform.total_frames());

    let lsb = 1.0 / PCM_FULL_SCALE;
    for (loaded, written) in reloaded.samples().iter().zip(output.waveform.samples()) {
        let expected = *written as f32 / PCM_FULL_SCALE;
        assert!((loaded - expected).abs() <= lsb, "{} vs {}", loaded, expected);
    }

    std::fs::remove_file(&input_path).ok();
    std::fs::remove_file(&output_path).ok();
}

#[test]
fn raw_output_matches_little_endian_stream() {
    let output_path = temp_path("output.raw");
    let desc = PipelineDesc::new(RoomPreset::Studio).max_reflection_order(1);
    let pipeline = Pipeline::with_defaults(desc);

    let out = pipeline.render_buffer(impulse_input(2, 64, 8000)).unwrap();
    let sink = OutputTarget::from_destination(Some(&output_path)).into_sink();
    sink.write(&out.waveform).unwrap();

    let bytes = std::fs::read(&output_path).unwrap();
    assert_eq!(bytes.len(), out.waveform.samples().len() * 2);
    assert_eq!(bytes, out.waveform.to_le_bytes());
    std::fs::remove_file(&output_path).ok();
}

#[test]
fn missing_input_file_is_io_error() {
    let pipeline = Pipeline::new(
        PipelineDesc::default(),
        DefaultAudioLoader,
        Unreachable,
    );
    let err = pipeline
        .render(Path::new("/definitely/not/here.wav"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
