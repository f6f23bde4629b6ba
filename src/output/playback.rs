use super::OutputSink;
use crate::audio_data::{PcmWaveform, WaveformBuffer};
use crate::error::{Result, SpaudioError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Sender, bounded};
use std::time::Duration;

enum PlaybackEvent {
    Finished,
    Failed(String),
}

/// Plays a waveform on the default output device and blocks until it has drained.
#[derive(Debug, Clone)]
pub struct PlaybackSink {
    grace: Duration,
    tail: Duration,
}

impl Default for PlaybackSink {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(1),
            tail: Duration::from_millis(200),
        }
    }
}

impl PlaybackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra time allowed on top of the waveform duration before giving up.
    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

impl OutputSink for PlaybackSink {
    fn write(&self, waveform: &PcmWaveform) -> Result<()> {
        if waveform.total_frames() == 0 {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            SpaudioError::AudioDevice("No default output device available".into())
        })?;
        log::info!(
            "Playing on '{}'",
            device.name().unwrap_or_else(|_| "unknown device".to_string())
        );

        let (config, sample_format) = select_config(&device, waveform)?;

        let mut buffer = waveform.dequantize();
        if config.sample_rate.0 != buffer.sample_rate() {
            log::warn!(
                "Device does not accept {} Hz, resampling to {} Hz",
                buffer.sample_rate(),
                config.sample_rate.0
            );
            buffer = buffer.resample(config.sample_rate.0)?;
        }
        let duration = buffer.duration();

        let (events_tx, events_rx) = bounded(2);
        let stream = match sample_format {
            cpal::SampleFormat::F32 => create_stream::<f32>(&device, &config, buffer, events_tx)?,
            cpal::SampleFormat::I16 => create_stream::<i16>(&device, &config, buffer, events_tx)?,
            cpal::SampleFormat::I32 => create_stream::<i32>(&device, &config, buffer, events_tx)?,
            cpal::SampleFormat::U16 => create_stream::<u16>(&device, &config, buffer, events_tx)?,
            other => {
                return Err(SpaudioError::AudioFormat(format!(
                    "Unsupported sample format {:?}",
                    other
                )));
            }
        };

        stream.play().map_err(|e| {
            SpaudioError::AudioDevice(format!("Failed to start stream: {}", e))
        })?;

        let result = match events_rx.recv_timeout(duration + self.grace) {
            Ok(PlaybackEvent::Finished) => {
                // the device still holds the last callback's buffer
                std::thread::sleep(self.tail);
                Ok(())
            }
            Ok(PlaybackEvent::Failed(message)) => Err(SpaudioError::AudioDevice(message)),
            Err(_) => {
                log::warn!(
                    "Playback did not report completion within {:.2}s, stopping",
                    (duration + self.grace).as_secs_f64()
                );
                Ok(())
            }
        };

        drop(stream);
        result
    }
}

/// Prefer a device configuration matching the waveform exactly, otherwise use
/// the device default.
fn select_config(
    device: &cpal::Device,
    waveform: &PcmWaveform,
) -> Result<(cpal::StreamConfig, cpal::SampleFormat)> {
    let rate = cpal::SampleRate(waveform.sample_rate());

    if let Ok(mut supported) = device.supported_output_configs() {
        if let Some(range) = supported.find(|range| {
            range.channels() == waveform.channels()
                && range.min_sample_rate() <= rate
                && range.max_sample_rate() >= rate
        }) {
            let config = cpal::StreamConfig {
                channels: range.channels(),
                sample_rate: rate,
                buffer_size: cpal::BufferSize::Default,
            };
            return Ok((config, range.sample_format()));
        }
    }

    let default_config = device.default_output_config().map_err(|e| {
        SpaudioError::AudioDevice(format!("Failed to get default config: {}", e))
    })?;
    log::debug!(
        "No exact match for {} channels at {} Hz, using device default {:?}",
        waveform.channels(),
        waveform.sample_rate(),
        default_config
    );
    Ok((default_config.config(), default_config.sample_format()))
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: WaveformBuffer,
    events: Sender<PlaybackEvent>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let out_channels = config.channels as usize;
    let in_channels = buffer.channels() as usize;
    let samples = buffer.into_samples();
    let mut position = 0usize;
    let mut finished = false;
    let error_events = events.clone();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let done = fill_output(data, out_channels, &samples, in_channels, &mut position);
                if done && !finished {
                    finished = true;
                    let _ = events.try_send(PlaybackEvent::Finished);
                }
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
                let _ = error_events.try_send(PlaybackEvent::Failed(err.to_string()));
            },
            None,
        )
        .map_err(|e| SpaudioError::AudioDevice(format!("Failed to build stream: {}", e)))
}

/// Copy interleaved frames from `samples` into a device buffer, advancing
/// `position` (in frames). Mono input is duplicated to every output channel;
/// otherwise extra output channels are silent and extra input channels are
/// dropped. Returns true once every input frame has been written.
fn fill_output<T>(
    data: &mut [T],
    out_channels: usize,
    samples: &[f32],
    in_channels: usize,
    position: &mut usize,
) -> bool
where
    T: SizedSample + FromSample<f32>,
{
    let total_frames = samples.len() / in_channels;

    for frame in data.chunks_mut(out_channels) {
        if *position < total_frames {
            let src = &samples[*position * in_channels..(*position + 1) * in_channels];
            for (c, out) in frame.iter_mut().enumerate() {
                let value = if in_channels == 1 {
                    src[0]
                } else {
                    src.get(c).copied().unwrap_or(0.0)
                };
                *out = T::from_sample(value);
            }
            *position += 1;
        } else {
            for out in frame.iter_mut() {
                *out = T::from_sample(0.0f32);
            }
        }
    }

    *position >= total_frames
}
