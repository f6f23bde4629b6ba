//! Destinations for rendered PCM audio.

mod file;
mod playback;

pub use file::FileSink;
pub use playback::PlaybackSink;

use crate::audio_data::PcmWaveform;
use crate::error::Result;
use std::path::PathBuf;

/// Something that consumes a finished waveform.
///
/// `write` blocks until the waveform has been fully persisted or played.
pub trait OutputSink {
    fn write(&self, waveform: &PcmWaveform) -> Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn write(&self, waveform: &PcmWaveform) -> Result<()> {
        (**self).write(waveform)
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write(&self, waveform: &PcmWaveform) -> Result<()> {
        (**self).write(waveform)
    }
}

/// Where a render ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Playback,
}

impl OutputTarget {
    /// A file when a destination is given, live playback otherwise.
    pub fn from_destination<P: Into<PathBuf>>(destination: Option<P>) -> Self {
        match destination {
            Some(path) => Self::File(path.into()),
            None => Self::Playback,
        }
    }

    pub fn into_sink(self) -> Box<dyn OutputSink> {
        match self {
            Self::File(path) => Box::new(FileSink::new(path)),
            Self::Playback => Box::new(PlaybackSink::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_destination() {
        assert_eq!(
            OutputTarget::from_destination(Some("out.wav")),
            OutputTarget::File(PathBuf::from("out.wav"))
        );
        assert_eq!(
            OutputTarget::from_destination(None::<PathBuf>),
            OutputTarget::Playback
        );
    }
}
