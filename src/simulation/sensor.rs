//! Discrete raycasting against the track boundaries.
//!
//! Rays are marched in unit steps from the origin; the first sample that
//! leaves the drivable region determines the hit distance. Angles are in
//! degrees and use screen space, so a positive angle points "up" (negative y).

use geo::{Coord, coord};
use ndarray::Array1;

use super::track::Track;

/// Heading offsets of the three sensors: straight, left, right.
pub const RAY_OFFSETS: [f32; 3] = [0.0, -30.0, 30.0];

/// Three-ray distance sensor with a fixed maximum range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    max_length: f32,
}

impl SensorModel {
    /// Creates a sensor model whose rays reach at most `max_length` units.
    pub fn new(max_length: f32) -> Self {
        Self { max_length }
    }

    /// Maximum ray length, also used to normalize readings.
    pub fn max_length(&self) -> f32 {
        self.max_length
    }

    /// Casts the three sensor rays from `origin` at `heading`.
    ///
    /// Distances are returned in [`RAY_OFFSETS`] order.
    pub fn cast_sensors(&self, track: &Track, origin: Coord<f32>, heading: f32) -> [f32; 3] {
        RAY_OFFSETS.map(|offset| cast_ray(track, origin, heading + offset, self.max_length))
    }

    /// Casts the sensors and divides each distance by the max length, giving
    /// readings in `[0, 1]`.
    pub fn read(&self, track: &Track, origin: Coord<f32>, heading: f32) -> Array1<f32> {
        let distances = self.cast_sensors(track, origin, heading);
        Array1::from_iter(distances.iter().map(|d| d / self.max_length))
    }
}

/// Marches a ray from `origin` along `angle` (degrees).
///
/// Returns the first integer step at which the sampled point is off-road, or
/// `max_length` if every step below `max_length` stays on the road. An origin
/// that is already off-road yields 0.
pub fn cast_ray(track: &Track, origin: Coord<f32>, angle: f32, max_length: f32) -> f32 {
    let (sin, cos) = angle.to_radians().sin_cos();
    let steps = max_length.max(0.0).ceil() as u32;

    (0..steps)
        .map(|step| step as f32)
        .take_while(|length| *length < max_length)
        .find(|length| {
            let sample = coord! { x: origin.x + length * cos, y: origin.y - length * sin };
            !track.is_drivable(sample)
        })
        .unwrap_or(max_length)
}

/// End point of a ray of `distance` units cast from `origin` along `angle`.
pub fn ray_end(origin: Coord<f32>, angle: f32, distance: f32) -> Coord<f32> {
    let (sin, cos) = angle.to_radians().sin_cos();
    coord! { x: origin.x + distance * cos, y: origin.y - distance * sin }
}
