//! Image-source propagation for shoebox rooms.
//!
//! Each wall reflection is modeled as a virtual source mirrored across the
//! wall (Allen & Berkley). For every source/microphone pair the engine builds
//! a room impulse response from all images up to the room's reflection
//! order, then convolves the source signal with it.

use crate::error::{Result, SpaudioError};
use crate::math::Vec3;
use crate::propagation::{FftConvolver, PropagationEngine, RawCapture};
use crate::scene::RoomScene;

/// Sources and microphones closer than this are treated as degenerate geometry.
const MIN_DISTANCE: f32 = 1e-3;

/// A mirrored copy of a source position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSource {
    pub position: Vec3,
    /// Number of wall reflections along the path
    pub order: u32,
}

/// Enumerates every image of `source` reachable with at most `max_order` reflections.
///
/// The real source is included as the order-0 image.
pub fn image_sources(source: Vec3, dimensions: Vec3, max_order: u32) -> Vec<ImageSource> {
    let xs = axis_images(source.x, dimensions.x, max_order);
    let ys = axis_images(source.y, dimensions.y, max_order);
    let zs = axis_images(source.z, dimensions.z, max_order);

    let mut images = Vec::new();
    for &(x, ox) in &xs {
        for &(y, oy) in &ys {
            if ox + oy > max_order {
                continue;
            }
            for &(z, oz) in &zs {
                let order = ox + oy + oz;
                if order <= max_order {
                    images.push(ImageSource {
                        position: Vec3::new(x, y, z),
                        order,
                    });
                }
            }
        }
    }
    images
}

/// Image coordinates along one axis paired with the reflection count.
///
/// For lattice index `n` and parity `q` the image sits at `(1 - 2q) s + 2 n L`
/// after `|n - q| + |n|` reflections.
fn axis_images(s: f32, extent: f32, max_order: u32) -> Vec<(f32, u32)> {
    let n_max = max_order as i64;
    let mut images = Vec::new();
    for n in -n_max..=n_max {
        for q in 0..=1i64 {
            let order = ((n - q).abs() + n.abs()) as u32;
            if order <= max_order {
                let coord = (1 - 2 * q) as f32 * s + 2.0 * n as f32 * extent;
                images.push((coord, order));
            }
        }
    }
    images
}

/// Shoebox image-source propagation engine.
///
/// Amplitude of an image at distance `d` after `k` reflections is
/// `beta^k / (4 pi d)` with `beta = sqrt(1 - absorption)`. Fractional delays
/// are rendered with a Hann-windowed sinc, which shifts every impulse
/// response by `fractional_delay_taps / 2` samples.
#[derive(Debug, Clone)]
pub struct ImageSourceEngine {
    speed_of_sound: f32,
    fractional_delay_taps: usize,
}

impl Default for ImageSourceEngine {
    fn default() -> Self {
        Self {
            speed_of_sound: 343.0,
            fractional_delay_taps: 81,
        }
    }
}

impl ImageSourceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed of sound in m/s.
    pub fn speed_of_sound(mut self, speed: f32) -> Self {
        self.speed_of_sound = speed;
        self
    }

    /// Length of the fractional delay filter; rounded up to an odd count.
    pub fn fractional_delay_taps(mut self, taps: usize) -> Self {
        self.fractional_delay_taps = taps | 1;
        self
    }

    /// Impulse response from `images` to a microphone at `mic`.
    pub fn room_impulse_response(
        &self,
        images: &[ImageSource],
        mic: Vec3,
        sample_rate: u32,
        reflection_coefficient: f32,
    ) -> Result<Vec<f32>> {
        let half = (self.fractional_delay_taps / 2) as i64;
        let samples_per_meter = sample_rate as f64 / self.speed_of_sound as f64;

        let mut taps = Vec::with_capacity(images.len());
        let mut max_center = 0.0f64;
        for image in images {
            let distance = image.position.distance(mic);
            if distance < MIN_DISTANCE {
                return Err(SpaudioError::Simulation(format!(
                    "degenerate geometry: image of order {} coincides with microphone at ({:.3}, {:.3}, {:.3})",
                    image.order, mic.x, mic.y, mic.z
                )));
            }
            let gain = reflection_coefficient.powi(image.order as i32) as f64
                / (4.0 * std::f64::consts::PI * distance as f64);
            if gain == 0.0 {
                continue;
            }
            let center = distance as f64 * samples_per_meter + half as f64;
            max_center = max_center.max(center);
            taps.push((center, gain));
        }

        let len = max_center.floor() as usize + half as usize + 1;
        let mut rir = vec![0.0f64; len];
        let window_half_width = (half + 1) as f64;

        for (center, gain) in taps {
            let base = center.floor() as i64;
            for idx in (base - half)..=(base + half) {
                let x = idx as f64 - center;
                let window = 0.5 * (1.0 + (std::f64::consts::PI * x / window_half_width).cos());
                rir[idx as usize] += gain * sinc(x) * window;
            }
        }

        Ok(rir.into_iter().map(|v| v as f32).collect())
    }
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

impl PropagationEngine for ImageSourceEngine {
    fn simulate(&self, scene: &RoomScene) -> Result<RawCapture> {
        if scene.sources().is_empty() {
            return Err(SpaudioError::Simulation("scene has no sources".to_string()));
        }
        if self.speed_of_sound <= 0.0 {
            return Err(SpaudioError::Simulation(format!(
                "speed of sound must be positive, got {}",
                self.speed_of_sound
            )));
        }

        let dimensions = scene.dimensions();
        let order = scene.max_reflection_order();
        let beta = scene.room().reflection_coefficient();
        let sample_rate = scene.sample_rate();
        let mics = scene.microphones().positions();

        // rirs[source][mic]
        let mut rirs = Vec::with_capacity(scene.sources().len());
        for (s, source) in scene.sources().iter().enumerate() {
            let images = image_sources(source.position(), dimensions, order);
            log::debug!("Source {}: {} image sources up to order {}", s, images.len(), order);

            let per_mic = mics
                .iter()
                .map(|&mic| self.room_impulse_response(&images, mic, sample_rate, beta))
                .collect::<Result<Vec<_>>>()?;
            rirs.push(per_mic);
        }

        let rir_len = rirs.iter().flatten().map(Vec::len).max().unwrap_or(0);
        let frames = scene.frames();
        if frames == 0 {
            return Err(SpaudioError::Simulation(
                "scene sources carry no samples".to_string(),
            ));
        }
        let output_len = (frames + rir_len).saturating_sub(1);
        log::debug!(
            "Longest impulse response {} samples ({:.3}s), capture length {} frames",
            rir_len,
            rir_len as f64 / sample_rate as f64,
            output_len
        );

        let mut convolver = FftConvolver::new(frames, rir_len);
        let mut channels = vec![vec![0.0f32; output_len]; mics.len()];

        for (source, source_rirs) in scene.sources().iter().zip(&rirs) {
            if source.signal().is_empty() {
                continue;
            }
            let spectrum = convolver.spectrum(source.signal());
            for (channel, rir) in channels.iter_mut().zip(source_rirs) {
                convolver.convolve_accumulate(&spectrum, rir, channel);
            }
        }

        log::info!(
            "Simulated {} sources into {} microphones ({} frames)",
            scene.sources().len(),
            mics.len(),
            output_len
        );

        RawCapture::new(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomDesc;
    use crate::scene::build_scene;

    #[test]
    fn test_order_zero_is_only_the_source() {
        let source = Vec3::new(1.0, 2.0, 0.5);
        let images = image_sources(source, Vec3::new(5.0, 4.0, 3.0), 0);
        assert_eq!(
            images,
            vec![ImageSource {
                position: source,
                order: 0
            }]
        );
    }

    #[test]
    fn test_first_order_images_mirror_each_wall() {
        let source = Vec3::new(1.0, 2.0, 0.5);
        let dims = Vec3::new(5.0, 4.0, 3.0);
        let images = image_sources(source, dims, 1);
        assert_eq!(images.len(), 7);

        let first: Vec<Vec3> = images
            .iter()
            .filter(|i| i.order == 1)
            .map(|i| i.position)
            .collect();
        for expected in [
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(9.0, 2.0, 0.5),
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(1.0, 6.0, 0.5),
            Vec3::new(1.0, 2.0, -0.5),
            Vec3::new(1.0, 2.0, 5.5),
        ] {
            assert!(first.iter().any(|p| (*p - expected).length() < 1e-5), "{:?}", expected);
        }
    }

    #[test]
    fn test_image_count_grows_with_order() {
        let dims = Vec3::new(5.0, 4.0, 3.0);
        let source = Vec3::new(1.0, 1.0, 1.0);
        // Number of images with total order <= N in 3D: (2N+1)(2N^2+2N+3)/3
        for n in 0..6u32 {
            let expected = (2 * n + 1) * (2 * n * n + 2 * n + 3) / 3;
            assert_eq!(image_sources(source, dims, n).len() as u32, expected);
        }
    }

    #[test]
    fn test_direct_path_delay_and_gain() {
        let engine = ImageSourceEngine::new();
        let images = [ImageSource {
            position: Vec3::new(1.0, 1.0, 1.0),
            order: 0,
        }];
        // 3.43 m at 343 m/s and 10 kHz is exactly 100 samples
        let mic = Vec3::new(4.43, 1.0, 1.0);
        let rir = engine
            .room_impulse_response(&images, mic, 10_000, 1.0)
            .unwrap();

        let peak_idx = rir
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_idx, 100 + 40);

        let expected_gain = 1.0 / (4.0 * std::f32::consts::PI * 3.43);
        assert!((rir[peak_idx] - expected_gain).abs() < 1e-4);
    }

    #[test]
    fn test_full_absorption_leaves_direct_path_only() {
        let engine = ImageSourceEngine::new();
        let dims = Vec3::new(5.0, 4.0, 3.0);
        let images = image_sources(Vec3::new(1.0, 1.0, 1.0), dims, 3);
        let mic = Vec3::new(4.43, 1.0, 1.0);

        let anechoic = engine
            .room_impulse_response(&images, mic, 10_000, 0.0)
            .unwrap();

        // Only the direct path's windowed sinc survives
        let nonzero = anechoic.iter().filter(|v| v.abs() > 1e-9).count();
        assert!(nonzero > 0 && nonzero <= 81);
    }

    #[test]
    fn test_coincident_source_and_mic_fails() {
        let engine = ImageSourceEngine::new();
        let room = RoomDesc::new(Vec3::new(5.0, 4.0, 3.0)).max_reflection_order(1);
        let spot = Vec3::new(2.0, 2.0, 1.5);
        let scene = build_scene(&room, 8000, &[spot], vec![vec![1.0, 0.0]], &[spot]).unwrap();
        let err = engine.simulate(&scene).unwrap_err();
        assert!(matches!(err, SpaudioError::Simulation(_)));
    }

    #[test]
    fn test_simulate_shapes_capture() {
        let engine = ImageSourceEngine::new();
        let room = RoomDesc::new(Vec3::new(5.0, 4.0, 3.0))
            .max_reflection_order(2)
            .wall_absorption(0.4);
        let mut impulse = vec![0.0; 400];
        impulse[0] = 1.0;
        let scene = build_scene(
            &room,
            8000,
            &[Vec3::new(2.0, 1.0, 1.5), Vec3::new(3.0, 3.0, 1.5)],
            vec![impulse, vec![0.0; 400]],
            &[Vec3::new(4.5, 1.0, 1.5), Vec3::new(4.5, 3.0, 1.5)],
        )
        .unwrap();

        let capture = engine.simulate(&scene).unwrap();
        assert_eq!(capture.mic_count(), 2);
        assert!(capture.frames() > 400);
        assert!(capture.peak() > 0.0);

        // Mic 0 is 2.5 m from the sounding source, mic 1 is ~3.2 m away
        let first_arrival = |ch: &[f32]| ch.iter().position(|v| v.abs() > 5e-3).unwrap();
        assert!(
            first_arrival(capture.channel(0).unwrap()) < first_arrival(capture.channel(1).unwrap())
        );
    }
}
