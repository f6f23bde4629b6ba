use crate::error::{Result, SpaudioError};
use rubato::{FftFixedIn, Resampler};

/// Whole-buffer sample rate converter built on rubato's FFT resampler.
///
/// The output is trimmed to `ceil(frames * ratio)` frames with the
/// resampler's group delay removed, so the converted signal stays aligned
/// with the original.
pub struct AudioResampler {
    source_sample_rate: u32,
    target_sample_rate: u32,
    channels: u16,
    chunk_size: usize,
}

impl AudioResampler {
    pub fn new(
        source_sample_rate: u32,
        target_sample_rate: u32,
        channels: u16,
        chunk_size: Option<usize>,
    ) -> Result<Self> {
        if source_sample_rate == 0 || target_sample_rate == 0 {
            return Err(SpaudioError::AudioFormat(
                "Sample rates must be greater than 0".to_string(),
            ));
        }

        if channels == 0 {
            return Err(SpaudioError::AudioFormat(
                "Channel count must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            source_sample_rate,
            target_sample_rate,
            channels,
            chunk_size: chunk_size.unwrap_or(1024),
        })
    }

    /// Resample planar channels, each of the same length.
    pub fn resample_planar(&mut self, planar: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if planar.len() != self.channels as usize {
            return Err(SpaudioError::AudioFormat(format!(
                "Resampler configured for {} channels, got {}",
                self.channels,
                planar.len()
            )));
        }

        if self.source_sample_rate == self.target_sample_rate {
            return Ok(planar.to_vec());
        }

        let frames = planar.first().map(Vec::len).unwrap_or(0);
        if frames == 0 {
            return Ok(vec![Vec::new(); planar.len()]);
        }

        let mut resampler = FftFixedIn::<f32>::new(
            self.source_sample_rate as usize,
            self.target_sample_rate as usize,
            self.chunk_size,
            2, // sub_chunks
            planar.len(),
        )
        .map_err(|e| SpaudioError::AudioLoading(format!("Failed to create resampler: {}", e)))?;

        let expected = (frames as f64 * self.resample_ratio()).ceil() as usize;
        let delay = resampler.output_delay();
        let chunk = resampler.input_frames_next();

        let mut output = vec![Vec::with_capacity(expected + delay); planar.len()];
        let mut input_index = 0;

        // Keep feeding (zero padding past the end) until the delayed tail is flushed
        while output[0].len() < expected + delay {
            let waves_in: Vec<Vec<f32>> = planar
                .iter()
                .map(|channel| {
                    let mut input_chunk = vec![0.0f32; chunk];
                    if input_index < channel.len() {
                        let end = (input_index + chunk).min(channel.len());
                        input_chunk[..end - input_index]
                            .copy_from_slice(&channel[input_index..end]);
                    }
                    input_chunk
                })
                .collect();

            let waves_out = resampler
                .process(&waves_in, None)
                .map_err(|e| SpaudioError::AudioLoading(format!("Resampling error: {}", e)))?;

            for (dst, src) in output.iter_mut().zip(waves_out) {
                dst.extend_from_slice(&src);
            }

            input_index += chunk;
        }

        Ok(output
            .into_iter()
            .map(|channel| channel[delay..delay + expected].to_vec())
            .collect())
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    pub fn source_sample_rate(&self) -> u32 {
        self.source_sample_rate
    }

    pub fn resample_ratio(&self) -> f64 {
        self.target_sample_rate as f64 / self.source_sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_creation() {
        let resampler = AudioResampler::new(44100, 48000, 2, None).unwrap();
        assert_eq!(resampler.source_sample_rate(), 44100);
        assert_eq!(resampler.target_sample_rate(), 48000);
    }

    #[test]
    fn test_resampler_no_resampling_needed() {
        let mut resampler = AudioResampler::new(44100, 44100, 1, None).unwrap();
        let samples = vec![vec![0.1, 0.2, 0.3, 0.4]];
        assert_eq!(resampler.resample_planar(&samples).unwrap(), samples);
    }

    #[test]
    fn test_invalid_sample_rates() {
        assert!(AudioResampler::new(0, 48000, 2, None).is_err());
        assert!(AudioResampler::new(44100, 0, 2, None).is_err());
        assert!(AudioResampler::new(44100, 48000, 0, None).is_err());
    }

    #[test]
    fn test_channel_mismatch() {
        let mut resampler = AudioResampler::new(44100, 48000, 2, None).unwrap();
        assert!(resampler.resample_planar(&[vec![0.0; 16]]).is_err());
    }

    #[test]
    fn test_upsample_keeps_alignment() {
        // A slow sine survives resampling nearly unchanged in shape
        let frames = 2205;
        let sine: Vec<f32> = (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 22050.0).sin())
            .collect();
        let mut resampler = AudioResampler::new(22050, 44100, 1, None).unwrap();
        let out = resampler.resample_planar(&[sine]).unwrap();

        assert_eq!(out[0].len(), frames * 2);
        let mid = out[0].len() / 2;
        let expected = (2.0 * std::f32::consts::PI * 100.0 * mid as f32 / 44100.0).sin();
        assert!((out[0][mid] - expected).abs() < 0.05);
    }
}
