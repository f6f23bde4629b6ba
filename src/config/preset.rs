use crate::config::RoomDesc;
use crate::error::SpaudioError;
use crate::math::{Vec3, horizontal_ring};
use std::fmt;
use std::str::FromStr;

/// Named scene layouts.
///
/// Presets differ only in data: room geometry, reflection order, absorption,
/// the default loudspeaker placement and the microphone array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomPreset {
    /// Small 3.18 m cube with an 8-microphone grid around the listening spot
    Room,
    /// 5 x 4 x 3 m damped room with a stereo microphone pair
    Studio,
    /// 20 x 15 x 10 m concert hall with a close stereo microphone pair
    #[default]
    Hall,
    /// Concert hall geometry with an 8-microphone ring in the middle of the floor plan
    Surround,
}

impl RoomPreset {
    pub const ALL: [RoomPreset; 4] = [Self::Room, Self::Studio, Self::Hall, Self::Surround];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Studio => "studio",
            Self::Hall => "hall",
            Self::Surround => "surround",
        }
    }

    pub fn room_desc(&self) -> RoomDesc {
        match self {
            Self::Room => RoomDesc::new(Vec3::splat(3.18))
                .max_reflection_order(10)
                .wall_absorption(0.2),
            Self::Studio => RoomDesc::new(Vec3::new(5.0, 4.0, 3.0))
                .max_reflection_order(5)
                .wall_absorption(0.4),
            Self::Hall | Self::Surround => RoomDesc::new(Vec3::new(20.0, 15.0, 10.0))
                .max_reflection_order(10)
                .wall_absorption(0.2),
        }
    }

    /// Default loudspeaker positions, one per input channel of a stereo (or 8-channel) recording.
    pub fn source_positions(&self) -> Vec<Vec3> {
        match self {
            // Left/right pair 10 cm apart, just off the front wall
            Self::Room => vec![Vec3::new(1.82, 0.1, 1.25), Vec3::new(1.92, 0.1, 1.25)],
            Self::Studio => vec![Vec3::new(2.0, 1.0, 1.5), Vec3::new(3.0, 3.0, 1.5)],
            Self::Hall => vec![Vec3::new(5.0, 2.75, 1.5), Vec3::new(5.0, 1.25, 1.5)],
            Self::Surround => horizontal_ring(Vec3::new(10.0, 7.5, 1.5), 4.0, 8),
        }
    }

    pub fn mic_positions(&self) -> Vec<Vec3> {
        match self {
            Self::Room => {
                let center = Vec3::new(1.82, 1.36, 1.25);
                let d = 0.18;
                [
                    (0.0, 0.0),
                    (d, 0.0),
                    (-d, 0.0),
                    (0.0, d),
                    (0.0, -d),
                    (d, d),
                    (-d, -d),
                    (d, -d),
                ]
                .into_iter()
                .map(|(dx, dy)| center + Vec3::new(dx, dy, 0.0))
                .collect()
            }
            Self::Studio => vec![Vec3::new(4.5, 1.0, 1.5), Vec3::new(4.5, 3.0, 1.5)],
            Self::Hall => vec![Vec3::new(4.5, 1.75, 1.5), Vec3::new(4.5, 2.25, 1.5)],
            Self::Surround => horizontal_ring(Vec3::new(10.0, 7.5, 1.5), 0.5, 8),
        }
    }
}

impl fmt::Display for RoomPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomPreset {
    type Err = SpaudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| {
                SpaudioError::Configuration(format!(
                    "Unknown preset '{}' (expected one of: room, studio, hall, surround)",
                    s
                ))
            })
    }
}
