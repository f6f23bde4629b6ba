use crate::audio_data::{LoadOptions, WaveformBuffer};
use crate::error::Result;
use std::path::Path;

/// Trait for decoding an audio file into a [`WaveformBuffer`].
///
/// The render pipeline only depends on this contract, so container and codec
/// handling can be swapped out (e.g. for an in-memory source in tests).
///
/// # Example
///
/// ```ignore
/// use spaudio::audio_data::{AudioDataLoader, LoadOptions, WaveformBuffer};
/// use spaudio::error::Result;
/// use std::path::Path;
///
/// struct MyCustomLoader;
///
/// impl AudioDataLoader for MyCustomLoader {
///     fn load(&self, path: &Path, options: &LoadOptions) -> Result<WaveformBuffer> {
///         todo!()
///     }
/// }
/// ```
pub trait AudioDataLoader {
    /// Loads audio data from a file path.
    ///
    /// # Errors
    ///
    /// Returns a `SpaudioError` if the file cannot be opened or decoded.
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<WaveformBuffer>;
}
