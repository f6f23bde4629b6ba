//! Acoustic propagation from sources to microphones.
//!
//! The render pipeline only talks to [`PropagationEngine`]; the bundled
//! [`ImageSourceEngine`] implements it for shoebox rooms.

mod convolution;
mod image_source;

pub use convolution::FftConvolver;
pub use image_source::{ImageSource, ImageSourceEngine, image_sources};

use crate::error::{Result, SpaudioError};
use crate::scene::RoomScene;

/// Trait for computing what every microphone of a scene captures.
///
/// Implementations must behave as a pure function of the scene: for each
/// microphone, sum the direct and reflected contributions of every source,
/// running at the scene's sample rate and honoring its reflection order and
/// wall absorption. Failures are reported as `SpaudioError::Simulation` and
/// are never retried by the caller.
///
/// The call is blocking and may be long running for large rooms and high
/// reflection orders.
pub trait PropagationEngine {
    fn simulate(&self, scene: &RoomScene) -> Result<RawCapture>;
}

impl<E: PropagationEngine + ?Sized> PropagationEngine for &E {
    fn simulate(&self, scene: &RoomScene) -> Result<RawCapture> {
        (**self).simulate(scene)
    }
}

impl<E: PropagationEngine + ?Sized> PropagationEngine for Box<E> {
    fn simulate(&self, scene: &RoomScene) -> Result<RawCapture> {
        (**self).simulate(scene)
    }
}

/// Planar microphone signals, shaped (microphone count, frames).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCapture {
    channels: Vec<Vec<f32>>,
}

impl RawCapture {
    /// # Errors
    ///
    /// Fails with `Simulation` if there are no channels or the channels differ in length.
    pub fn new(channels: Vec<Vec<f32>>) -> Result<Self> {
        let frames = channels
            .first()
            .map(Vec::len)
            .ok_or_else(|| SpaudioError::Simulation("capture has no channels".to_string()))?;

        if let Some(bad) = channels.iter().position(|ch| ch.len() != frames) {
            return Err(SpaudioError::Simulation(format!(
                "capture channel {} has {} frames, expected {}",
                bad,
                channels[bad].len(),
                frames
            )));
        }

        Ok(Self { channels })
    }

    pub fn mic_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Divide every sample by `divisor`.
    pub fn divide(&mut self, divisor: f32) {
        for sample in self.channels.iter_mut().flatten() {
            *sample /= divisor;
        }
    }

    /// Drop every channel from index `count` on; earlier channels are untouched.
    pub fn truncate_channels(&mut self, count: usize) {
        self.channels.truncate(count.max(1));
    }

    /// Largest absolute sample value across all microphones.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .map(|ch| crate::audio_data::peak_abs(ch))
            .fold(0.0, f32::max)
    }
}
