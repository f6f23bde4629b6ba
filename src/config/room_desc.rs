use crate::error::{Result, SpaudioError};
use crate::math::Vec3;

/// Geometry and acoustic parameters of a shoebox room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDesc {
    /// Extents along x, y and z in meters; the room spans `[0, extent]` on each axis
    pub dimensions: Vec3,
    /// Highest number of wall reflections the propagation engine models
    pub max_reflection_order: u32,
    /// Fraction of energy absorbed at every wall interaction (0.0 - 1.0)
    pub wall_absorption: f32,
}

impl Default for RoomDesc {
    fn default() -> Self {
        Self {
            dimensions: Vec3::new(5.0, 4.0, 3.0),
            max_reflection_order: 5,
            wall_absorption: 0.4,
        }
    }
}

impl RoomDesc {
    pub fn new(dimensions: Vec3) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    pub fn dimensions(mut self, dimensions: Vec3) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn max_reflection_order(mut self, order: u32) -> Self {
        self.max_reflection_order = order;
        self
    }

    pub fn wall_absorption(mut self, absorption: f32) -> Self {
        self.wall_absorption = absorption;
        self
    }

    /// Checks that the room has positive volume and a physical absorption coefficient.
    pub fn validate(&self) -> Result<()> {
        let d = self.dimensions;
        if !d.is_finite() || d.cmple(Vec3::ZERO).any() {
            return Err(SpaudioError::Configuration(format!(
                "Room dimensions must be positive on every axis, got {} x {} x {}",
                d.x, d.y, d.z
            )));
        }

        if !(0.0..=1.0).contains(&self.wall_absorption) {
            return Err(SpaudioError::Configuration(format!(
                "Wall absorption must lie in [0, 1], got {}",
                self.wall_absorption
            )));
        }

        Ok(())
    }

    /// Amplitude reflection coefficient derived from the energy absorption.
    pub fn reflection_coefficient(&self) -> f32 {
        (1.0 - self.wall_absorption).max(0.0).sqrt()
    }
}
