use crate::math::Vec3;

/// A loudspeaker in the room, driven by exactly one input channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticSource {
    position: Vec3,
    signal: Vec<f32>,
}

impl AcousticSource {
    pub fn new(position: Vec3, signal: Vec<f32>) -> Self {
        Self { position, signal }
    }

    /// Position in room coordinates (meters).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Dry signal emitted by the source, one sample per input frame.
    pub fn signal(&self) -> &[f32] {
        &self.signal
    }
}
