use crate::math::Vec3;

/// Ordered set of omnidirectional capture points.
///
/// Each position yields one output channel, in index order. The array is
/// fixed once it has been attached to a [`RoomScene`](super::RoomScene).
#[derive(Debug, Clone, PartialEq)]
pub struct MicrophoneArray {
    positions: Vec<Vec3>,
    sample_rate: u32,
}

impl MicrophoneArray {
    pub fn new(positions: Vec<Vec3>, sample_rate: u32) -> Self {
        Self {
            positions,
            sample_rate,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
