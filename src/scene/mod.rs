//! Room scene construction and validation.
//!
//! A [`RoomScene`] is the complete, validated input to a
//! [`PropagationEngine`](crate::propagation::PropagationEngine): a shoebox room,
//! one [`AcousticSource`] per input channel and a [`MicrophoneArray`].
//! Building a scene performs no I/O and does not touch the engine, so all
//! geometry checks can run (and be tested) before any expensive simulation.

mod microphone;
mod source;

pub use microphone::MicrophoneArray;
pub use source::AcousticSource;

use crate::config::RoomDesc;
use crate::error::{Result, SpaudioError};
use crate::math::{Vec3, is_strictly_inside};

/// A shoebox room with its sources and microphone array.
///
/// The scene owns everything it references; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct RoomScene {
    room: RoomDesc,
    sample_rate: u32,
    sources: Vec<AcousticSource>,
    microphones: MicrophoneArray,
}

impl RoomScene {
    pub fn room(&self) -> &RoomDesc {
        &self.room
    }

    pub fn dimensions(&self) -> Vec3 {
        self.room.dimensions
    }

    pub fn max_reflection_order(&self) -> u32 {
        self.room.max_reflection_order
    }

    pub fn wall_absorption(&self) -> f32 {
        self.room.wall_absorption
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sources(&self) -> &[AcousticSource] {
        &self.sources
    }

    pub fn microphones(&self) -> &MicrophoneArray {
        &self.microphones
    }

    /// Length of the longest source signal in frames.
    pub fn frames(&self) -> usize {
        self.sources
            .iter()
            .map(|s| s.signal().len())
            .max()
            .unwrap_or(0)
    }
}

/// Builds a validated scene.
///
/// `input_channels` holds one planar signal per input channel; channel `i`
/// drives the source placed at `source_positions[i]`.
///
/// # Errors
///
/// - `Configuration` for a zero-volume room, an absorption outside `[0, 1]`,
///   a zero sample rate or an empty microphone array
/// - `Cardinality` when the number of positions differs from the channel count
/// - `OutOfBounds` when a source or microphone is not strictly inside the room
pub fn build_scene(
    room: &RoomDesc,
    sample_rate: u32,
    source_positions: &[Vec3],
    input_channels: Vec<Vec<f32>>,
    mic_positions: &[Vec3],
) -> Result<RoomScene> {
    room.validate()?;

    if sample_rate == 0 {
        return Err(SpaudioError::Configuration(
            "Sample rate must be greater than 0".to_string(),
        ));
    }

    if source_positions.len() != input_channels.len() {
        return Err(SpaudioError::Cardinality {
            expected: input_channels.len(),
            actual: source_positions.len(),
        });
    }

    if mic_positions.is_empty() {
        return Err(SpaudioError::Configuration(
            "Microphone array needs at least one position".to_string(),
        ));
    }

    check_inside(room.dimensions, "source", source_positions)?;
    check_inside(room.dimensions, "microphone", mic_positions)?;

    let sources: Vec<AcousticSource> = source_positions
        .iter()
        .zip(input_channels)
        .map(|(&position, signal)| AcousticSource::new(position, signal))
        .collect();

    let scene = RoomScene {
        room: room.clone(),
        sample_rate,
        sources,
        microphones: MicrophoneArray::new(mic_positions.to_vec(), sample_rate),
    };

    log::info!(
        "Built scene: room {:.2} x {:.2} x {:.2} m, order {}, absorption {:.2}, {} sources, {} microphones",
        room.dimensions.x,
        room.dimensions.y,
        room.dimensions.z,
        room.max_reflection_order,
        room.wall_absorption,
        scene.sources.len(),
        scene.microphones.len()
    );

    Ok(scene)
}

fn check_inside(dimensions: Vec3, what: &str, positions: &[Vec3]) -> Result<()> {
    match positions
        .iter()
        .position(|&p| !is_strictly_inside(p, dimensions))
    {
        Some(index) => Err(SpaudioError::OutOfBounds {
            what: format!("{} {}", what, index),
            position: positions[index],
            dimensions,
        }),
        None => Ok(()),
    }
}
