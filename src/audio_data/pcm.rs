use crate::audio_data::WaveformBuffer;
use crate::error::{Result, SpaudioError};
use std::time::Duration;

/// Full-scale multiplier between normalized floats and 16-bit PCM.
pub const PCM_FULL_SCALE: f32 = 32767.0;

/// Interleaved signed 16-bit PCM, ready for export or playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmWaveform {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl PcmWaveform {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Result<Self> {
        if channels == 0 || sample_rate == 0 {
            return Err(SpaudioError::AudioFormat(format!(
                "Invalid PCM layout: {} channels at {} Hz",
                channels, sample_rate
            )));
        }
        if samples.len() % channels as usize != 0 {
            return Err(SpaudioError::AudioFormat(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Parses interleaved little-endian 16-bit frames.
    pub fn from_le_bytes(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(SpaudioError::AudioFormat(format!(
                "PCM byte stream has odd length {}",
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(samples, sample_rate, channels)
    }

    /// Interleaved little-endian byte stream.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Bits per sample; always 16.
    pub fn sample_width(&self) -> u16 {
        16
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn total_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_frames() as f64 / self.sample_rate as f64)
    }

    /// Rescale back to floating point in the normalized range.
    pub fn dequantize(&self) -> WaveformBuffer {
        let samples = self
            .samples
            .iter()
            .map(|&s| s as f32 / PCM_FULL_SCALE)
            .collect();
        WaveformBuffer {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
            total_frames: self.total_frames(),
        }
    }
}
