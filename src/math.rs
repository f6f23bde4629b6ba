//! Math types for spaudio

use crate::error::{Result, SpaudioError};
pub use glam::Vec3;

/// Groups a flat `[x1, y1, z1, x2, y2, z2, ...]` list into points.
pub fn positions_from_flat(values: &[f32]) -> Result<Vec<Vec3>> {
    if values.len() % 3 != 0 {
        return Err(SpaudioError::Configuration(format!(
            "Positions must be given as x y z triples, got {} values",
            values.len()
        )));
    }

    Ok(values
        .chunks_exact(3)
        .map(|triple| Vec3::new(triple[0], triple[1], triple[2]))
        .collect())
}

/// Returns true if every component of `position` lies in the open interval `(0, extent)`.
pub fn is_strictly_inside(position: Vec3, dimensions: Vec3) -> bool {
    position.cmpgt(Vec3::ZERO).all() && position.cmplt(dimensions).all()
}

/// Points evenly spaced on a horizontal circle, starting on the +x axis.
pub fn horizontal_ring(center: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            center + Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_from_flat() {
        let positions = positions_from_flat(&[2.0, 1.0, 1.5, 3.0, 3.0, 1.5]).unwrap();
        assert_eq!(
            positions,
            vec![Vec3::new(2.0, 1.0, 1.5), Vec3::new(3.0, 3.0, 1.5)]
        );
        assert!(positions_from_flat(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_positions_from_flat_rejects_partial_triple() {
        assert!(positions_from_flat(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn test_is_strictly_inside() {
        let room = Vec3::new(5.0, 4.0, 3.0);
        assert!(is_strictly_inside(Vec3::new(2.0, 1.0, 1.5), room));
        assert!(!is_strictly_inside(Vec3::new(0.0, 1.0, 1.5), room));
        assert!(!is_strictly_inside(Vec3::new(2.0, 4.0, 1.5), room));
        assert!(!is_strictly_inside(Vec3::new(2.0, 1.0, -0.1), room));
    }

    #[test]
    fn test_horizontal_ring() {
        let ring = horizontal_ring(Vec3::new(1.0, 1.0, 1.0), 0.5, 4);
        assert_eq!(ring.len(), 4);
        assert!((ring[0] - Vec3::new(1.5, 1.0, 1.0)).length() < 1e-6);
        assert!((ring[1] - Vec3::new(1.0, 1.5, 1.0)).length() < 1e-6);
        for point in &ring {
            assert!((point.z - 1.0).abs() < 1e-6);
        }
    }
}
