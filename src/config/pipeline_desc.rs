use crate::audio_data::LoadOptions;
use crate::config::{RoomDesc, RoomPreset};
use crate::math::Vec3;
use crate::processing::DEFAULT_TARGET_CHANNELS;

/// Configuration descriptor for one render run.
///
/// Values left as `None` fall back to the preset.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Preset supplying every value that is not overridden
    pub preset: RoomPreset,
    /// Room extents override in meters
    pub room_dimensions: Option<Vec3>,
    /// Reflection order override
    pub max_reflection_order: Option<u32>,
    /// Wall absorption override
    pub wall_absorption: Option<f32>,
    /// Loudspeaker positions override, one per input channel
    pub source_positions: Option<Vec<Vec3>>,
    /// Microphone positions override, one per capture channel
    pub mic_positions: Option<Vec<Vec3>>,
    /// Channel count of the exported or played waveform (typically 2 for stereo)
    pub target_channels: usize,
    /// Options handed to the waveform loader
    pub load_options: LoadOptions,
}

impl Default for PipelineDesc {
    fn default() -> Self {
        Self {
            preset: RoomPreset::default(),
            room_dimensions: None,
            max_reflection_order: None,
            wall_absorption: None,
            source_positions: None,
            mic_positions: None,
            target_channels: DEFAULT_TARGET_CHANNELS,
            load_options: LoadOptions::default(),
        }
    }
}

impl PipelineDesc {
    pub fn new(preset: RoomPreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    pub fn room_dimensions(mut self, dimensions: Vec3) -> Self {
        self.room_dimensions = Some(dimensions);
        self
    }

    pub fn max_reflection_order(mut self, order: u32) -> Self {
        self.max_reflection_order = Some(order);
        self
    }

    pub fn wall_absorption(mut self, absorption: f32) -> Self {
        self.wall_absorption = Some(absorption);
        self
    }

    pub fn source_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.source_positions = Some(positions);
        self
    }

    pub fn mic_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.mic_positions = Some(positions);
        self
    }

    pub fn target_channels(mut self, channels: usize) -> Self {
        self.target_channels = channels;
        self
    }

    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    /// Room description with overrides applied on top of the preset.
    pub fn resolved_room(&self) -> RoomDesc {
        let mut room = self.preset.room_desc();
        if let Some(dimensions) = self.room_dimensions {
            room.dimensions = dimensions;
        }
        if let Some(order) = self.max_reflection_order {
            room.max_reflection_order = order;
        }
        if let Some(absorption) = self.wall_absorption {
            room.wall_absorption = absorption;
        }
        room
    }

    pub fn resolved_source_positions(&self) -> Vec<Vec3> {
        self.source_positions
            .clone()
            .unwrap_or_else(|| self.preset.source_positions())
    }

    pub fn resolved_mic_positions(&self) -> Vec<Vec3> {
        self.mic_positions
            .clone()
            .unwrap_or_else(|| self.preset.mic_positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_preset() {
        let desc = PipelineDesc::new(RoomPreset::Studio);
        assert_eq!(desc.resolved_room(), RoomPreset::Studio.room_desc());
        assert_eq!(
            desc.resolved_source_positions(),
            RoomPreset::Studio.source_positions()
        );
        assert_eq!(desc.resolved_mic_positions(), RoomPreset::Studio.mic_positions());
        assert_eq!(desc.target_channels, 2);
    }

    #[test]
    fn test_overrides_win() {
        let desc = PipelineDesc::new(RoomPreset::Hall)
            .room_dimensions(Vec3::new(8.0, 6.0, 4.0))
            .wall_absorption(0.5)
            .mic_positions(vec![Vec3::new(1.0, 1.0, 1.0)]);

        let room = desc.resolved_room();
        assert_eq!(room.dimensions, Vec3::new(8.0, 6.0, 4.0));
        assert_eq!(room.wall_absorption, 0.5);
        assert_eq!(room.max_reflection_order, 10);
        assert_eq!(desc.resolved_mic_positions(), vec![Vec3::new(1.0, 1.0, 1.0)]);
        assert_eq!(
            desc.resolved_source_positions(),
            RoomPreset::Hall.source_positions()
        );
    }
}
