use super::OutputSink;
use crate::audio_data::PcmWaveform;
use crate::error::{Result, SpaudioError};
use std::path::{Path, PathBuf};

/// Writes a waveform to disk, choosing the container from the file extension.
///
/// - `.wav`: 16-bit integer WAV
/// - `.raw` / `.pcm`: headerless interleaved little-endian samples
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Wav,
    Raw,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<FileFormat> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("wav") => Ok(FileFormat::Wav),
            Some("raw") | Some("pcm") => Ok(FileFormat::Raw),
            other => Err(SpaudioError::Encoding(format!(
                "Unsupported output format {:?} for '{}', expected .wav, .raw or .pcm",
                other.unwrap_or(""),
                self.path.display()
            ))),
        }
    }

    fn write_wav(&self, waveform: &PcmWaveform) -> Result<()> {
        let spec = hound::WavSpec {
            channels: waveform.channels(),
            sample_rate: waveform.sample_rate(),
            bits_per_sample: waveform.sample_width(),
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&self.path, spec).map_err(wav_error)?;
        for &sample in waveform.samples() {
            writer.write_sample(sample).map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)
    }
}

fn wav_error(err: hound::Error) -> SpaudioError {
    match err {
        hound::Error::IoError(e) => SpaudioError::Io(e),
        other => SpaudioError::Encoding(format!("WAV encoding failed: {}", other)),
    }
}

impl OutputSink for FileSink {
    fn write(&self, waveform: &PcmWaveform) -> Result<()> {
        match self.format()? {
            FileFormat::Wav => self.write_wav(waveform)?,
            FileFormat::Raw => std::fs::write(&self.path, waveform.to_le_bytes())?,
        }

        log::info!(
            "Wrote {} frames x {} channels at {} Hz to '{}'",
            waveform.total_frames(),
            waveform.channels(),
            waveform.sample_rate(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spaudio-file-sink-{}-{}", std::process::id(), name))
    }

    fn waveform() -> PcmWaveform {
        PcmWaveform::new(vec![0, 100, -100, 32767, -32767, 5], 22050, 2).unwrap()
    }

    #[test]
    fn test_wav_round_trip() {
        let path = temp_path("out.wav");
        FileSink::new(&path).write(&waveform()).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, waveform().samples());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_raw_bytes() {
        let path = temp_path("out.PCM");
        FileSink::new(&path).write(&waveform()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), waveform().to_le_bytes());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unknown_extension_rejected() {
        for name in ["out.mp3", "no_extension"] {
            let path = temp_path(name);
            let err = FileSink::new(&path).write(&waveform()).unwrap_err();
            assert!(matches!(err, SpaudioError::Encoding(_)), "{:?}", err);
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let path = std::env::temp_dir()
            .join("spaudio-no-such-dir")
            .join("nested")
            .join("out.raw");
        let err = FileSink::new(path).write(&waveform()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
