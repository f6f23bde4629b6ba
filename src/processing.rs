//! Post-processing of captured microphone signals.
//!
//! Three stages run in a fixed order: [`normalize`], [`reduce_channels`] and
//! [`quantize`]. [`post_process`] chains them.

use crate::audio_data::{PCM_FULL_SCALE, PcmWaveform};
use crate::error::{Result, SpaudioError};
use crate::propagation::RawCapture;

/// Output channel count for playback and simple export.
pub const DEFAULT_TARGET_CHANNELS: usize = 2;

/// Divide every sample by the peak absolute value of the whole capture.
///
/// Returns the peak that was divided out.
///
/// # Errors
///
/// Fails with `DegenerateSignal` when the capture is silent throughout.
pub fn normalize(capture: &mut RawCapture) -> Result<f32> {
    let peak = capture.peak();
    if peak == 0.0 || !peak.is_finite() {
        return Err(SpaudioError::DegenerateSignal(format!(
            "captured signal has peak amplitude {}, nothing to normalize",
            peak
        )));
    }
    capture.divide(peak);
    Ok(peak)
}

/// Keep only the first `target` channels, in index order.
///
/// Dropped channels are discarded, not mixed into the kept ones.
pub fn reduce_channels(capture: &mut RawCapture, target: usize) {
    if capture.mic_count() > target {
        log::debug!(
            "Truncating {} capture channels to {}",
            capture.mic_count(),
            target
        );
        capture.truncate_channels(target);
    }
}

/// Scale normalized samples by 32767, truncate toward zero and interleave.
pub fn quantize(capture: &RawCapture, sample_rate: u32) -> Result<PcmWaveform> {
    let channels = capture.channels();
    let mut samples = Vec::with_capacity(capture.frames() * channels.len());
    for frame_idx in 0..capture.frames() {
        // `as` truncates toward zero and saturates at the i16 range
        samples.extend(
            channels
                .iter()
                .map(|ch| (ch[frame_idx] * PCM_FULL_SCALE) as i16),
        );
    }

    let channel_count = u16::try_from(channels.len()).map_err(|_| {
        SpaudioError::AudioFormat(format!("Too many channels: {}", channels.len()))
    })?;
    PcmWaveform::new(samples, sample_rate, channel_count)
}

/// Normalize, reduce to `target_channels` and quantize a capture.
///
/// The result has `min(capture channels, target_channels)` channels.
pub fn post_process(
    mut capture: RawCapture,
    sample_rate: u32,
    target_channels: usize,
) -> Result<PcmWaveform> {
    if target_channels == 0 {
        return Err(SpaudioError::Configuration(
            "Target channel count must be at least 1".to_string(),
        ));
    }

    normalize(&mut capture)?;
    reduce_channels(&mut capture, target_channels);
    quantize(&capture, sample_rate)
}
