use crate::{
    audio_data::{AudioDataLoader, LoadOptions, WaveformBuffer},
    error::{Result, SpaudioError},
};
use std::fs::File;
use std::path::Path;
use symphonia::{
    core::{
        audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
        io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
    },
    default::{get_codecs, get_probe},
};

/// Default audio loader implementation using the Symphonia decoder library.
///
/// Supports the containers and codecs Symphonia ships with (WAV, MP3, FLAC,
/// OGG/Vorbis, ...) and decodes them into interleaved f32 samples. If
/// [`LoadOptions::target_sample_rate`] is set, the decoded buffer is
/// resampled before it is returned.
pub struct DefaultAudioLoader;

impl AudioDataLoader for DefaultAudioLoader {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<WaveformBuffer> {
        let file = File::open(path)?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| {
                SpaudioError::AudioLoading(format!("Failed to probe audio format: {:?}", e))
            })?;

        let mut format = probed.format;

        let track = format.default_track().ok_or_else(|| {
            SpaudioError::AudioLoading("No default audio track found".to_string())
        })?;
        let track_id = track.id;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| SpaudioError::AudioLoading("Sample rate not found".to_string()))?;

        // Some containers only reveal the channel layout once a packet is decoded
        let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

        let mut decoder = get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| {
                SpaudioError::AudioLoading(format!("Failed to create decoder: {:?}", e))
            })?;

        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(_)) => break, // end-of-file
                Err(e) => {
                    return Err(SpaudioError::AudioLoading(format!(
                        "Error reading packet: {:?}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(Error::IoError(_)) => break, // also EOF in some formats
                Err(Error::DecodeError(e)) => {
                    log::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(SpaudioError::AudioLoading(format!(
                        "Error decoding packet: {:?}",
                        e
                    )));
                }
            };

            let spec = *decoded.spec();
            if channels.is_none() {
                channels = Some(spec.channels.count() as u16);
            }

            let mut tmp = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            tmp.copy_interleaved_ref(decoded);
            samples.extend_from_slice(tmp.samples());
        }

        let channels = channels
            .ok_or_else(|| SpaudioError::AudioLoading("Channel count not found".to_string()))?;

        let audio_data = WaveformBuffer::new(samples, sample_rate, channels)?;

        log::info!(
            "Loaded {} ({} ch, {} Hz, {:.2}s)",
            path.display(),
            audio_data.channels(),
            audio_data.sample_rate(),
            audio_data.duration().as_secs_f64()
        );

        match options.target_sample_rate {
            Some(target_rate) if target_rate != sample_rate => {
                log::info!("Resampling {} Hz -> {} Hz", sample_rate, target_rate);
                audio_data.resample(target_rate)
            }
            _ => Ok(audio_data),
        }
    }
}
