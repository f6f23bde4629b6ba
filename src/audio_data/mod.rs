mod default_loader;
mod load_options;
mod loader;
mod pcm;
mod resampler;

use crate::error::{Result, SpaudioError};
pub use default_loader::DefaultAudioLoader;
pub use load_options::LoadOptions;
pub use loader::AudioDataLoader;
pub use pcm::{PCM_FULL_SCALE, PcmWaveform};
pub use resampler::AudioResampler;
use std::path::Path;
use std::time::Duration;

/// Multi-channel floating point waveform.
///
/// # Data Format
/// Samples are stored **INTERLEAVED**, frame by frame:
/// - Stereo: `[L0, R0, L1, R1, L2, R2, ...]`
/// - 8 channels: `[C0_0, C1_0, ..., C7_0, C0_1, C1_1, ...]`
///
/// The scene and the propagation engine work on planar channels, so
/// [`WaveformBuffer::to_planar`] and [`WaveformBuffer::from_planar`] convert
/// between the two layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    total_frames: usize,
}

impl WaveformBuffer {
    /// Wraps interleaved samples.
    ///
    /// # Errors
    ///
    /// Fails with `AudioFormat` if `channels` or `sample_rate` is zero or the
    /// sample count is not a whole number of frames.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self> {
        if channels == 0 {
            return Err(SpaudioError::AudioFormat(
                "Channel count must be greater than 0".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(SpaudioError::AudioFormat(
                "Sample rate must be greater than 0".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(SpaudioError::AudioFormat(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        let total_frames = samples.len() / channels as usize;
        Ok(Self {
            samples,
            sample_rate,
            channels,
            total_frames,
        })
    }

    /// Interleaves equally long planar channels.
    pub fn from_planar<C: AsRef<[f32]>>(planar: &[C], sample_rate: u32) -> Result<Self> {
        let channels = u16::try_from(planar.len()).map_err(|_| {
            SpaudioError::AudioFormat(format!("Too many channels: {}", planar.len()))
        })?;
        let frames = planar.first().map(|ch| ch.as_ref().len()).unwrap_or(0);

        if let Some(bad) = planar.iter().position(|ch| ch.as_ref().len() != frames) {
            return Err(SpaudioError::AudioFormat(format!(
                "Channel {} has {} frames, expected {}",
                bad,
                planar[bad].as_ref().len(),
                frames
            )));
        }

        let mut samples = Vec::with_capacity(frames * planar.len());
        for frame_idx in 0..frames {
            samples.extend(planar.iter().map(|ch| ch.as_ref()[frame_idx]));
        }

        Self::new(samples, sample_rate, channels)
    }

    /// Load a file with the built-in Symphonia loader.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        DefaultAudioLoader.load(path.as_ref(), options)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_frames as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        peak_abs(&self.samples)
    }

    /// Get samples for a specific channel (0-indexed)
    pub fn channel_samples(&self, channel: usize) -> Result<Vec<f32>> {
        if channel >= self.channels as usize {
            return Err(SpaudioError::AudioFormat(format!(
                "Channel {} out of range (max: {})",
                channel,
                self.channels - 1
            )));
        }

        Ok(self
            .samples
            .chunks_exact(self.channels as usize)
            .map(|frame| frame[channel])
            .collect())
    }

    /// De-interleave into one `Vec` per channel.
    pub fn to_planar(&self) -> Vec<Vec<f32>> {
        let channels = self.channels as usize;
        let mut planar = vec![Vec::with_capacity(self.total_frames); channels];
        for frame in self.samples.chunks_exact(channels) {
            for (dst, &sample) in planar.iter_mut().zip(frame) {
                dst.push(sample);
            }
        }
        planar
    }

    /// Divide every sample by the peak so the loudest sample has magnitude 1.0.
    ///
    /// # Errors
    ///
    /// Fails with `DegenerateSignal` when the buffer is silent throughout.
    pub fn normalized(mut self) -> Result<Self> {
        let peak = self.peak();
        if peak == 0.0 || !peak.is_finite() {
            return Err(SpaudioError::DegenerateSignal(format!(
                "cannot normalize a waveform with peak amplitude {}",
                peak
            )));
        }
        for sample in &mut self.samples {
            *sample /= peak;
        }
        Ok(self)
    }

    /// Resample to a different sample rate using rubato
    pub fn resample(&self, target_sample_rate: u32) -> Result<Self> {
        if target_sample_rate == self.sample_rate {
            return Ok(self.clone());
        }

        let mut resampler =
            AudioResampler::new(self.sample_rate, target_sample_rate, self.channels, None)?;
        let planar = resampler.resample_planar(&self.to_planar())?;

        Self::from_planar(&planar, target_sample_rate)
    }
}

pub(crate) fn peak_abs(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
}
