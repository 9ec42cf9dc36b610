#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::error::ConfigError;
use evo_drive::simulation::sensor::{SensorModel, cast_ray, ray_end};
use evo_drive::simulation::track::{Track, TrackParams, centered_square, ring_checkpoints};
use geo::{Coord, Rect, coord};

fn center() -> Coord<f32> {
    coord! { x: 250.0, y: 250.0 }
}

/// Outer square spans 50..450, inner square 150..350.
fn create_test_track() -> Track {
    Track::square(center(), 400.0, 200.0, ring_checkpoints(center(), 150.0))
        .expect("valid test track")
}

fn point(x: f32, y: f32) -> Rect<f32> {
    Rect::new(coord! { x: x, y: y }, coord! { x: x, y: y })
}

#[test]
fn test_points_in_ring_are_on_road() {
    let track = create_test_track();

    for (x, y) in [(100.0, 100.0), (400.0, 250.0), (250.0, 400.0), (60.0, 440.0)] {
        assert!(track.on_road(&point(x, y)), "({x}, {y}) should be on road");
    }
}

#[test]
fn test_points_outside_ring_are_off_road() {
    let track = create_test_track();

    // inside the hole
    for (x, y) in [(250.0, 250.0), (160.0, 340.0)] {
        assert!(!track.on_road(&point(x, y)), "({x}, {y}) is in the hole");
    }
    // outside the outer bound
    for (x, y) in [(20.0, 250.0), (250.0, 470.0), (500.0, 500.0)] {
        assert!(!track.on_road(&point(x, y)), "({x}, {y}) is outside");
    }
}

#[test]
fn test_shape_edges() {
    let track = create_test_track();

    let straddling_outer = Rect::new(coord! { x: 440.0, y: 240.0 }, coord! { x: 460.0, y: 260.0 });
    assert!(!track.on_road(&straddling_outer));

    let touching_outer = Rect::new(coord! { x: 430.0, y: 240.0 }, coord! { x: 450.0, y: 260.0 });
    assert!(track.on_road(&touching_outer));

    let touching_inner = Rect::new(coord! { x: 350.0, y: 240.0 }, coord! { x: 370.0, y: 260.0 });
    assert!(track.on_road(&touching_inner));

    let overlapping_inner = Rect::new(coord! { x: 345.0, y: 240.0 }, coord! { x: 365.0, y: 260.0 });
    assert!(!track.on_road(&overlapping_inner));
}

#[test]
fn test_drivable_points_use_half_open_bounds() {
    let track = create_test_track();

    assert!(track.is_drivable(coord! { x: 50.0, y: 250.0 }));
    assert!(!track.is_drivable(coord! { x: 450.0, y: 250.0 }));
    assert!(!track.is_drivable(coord! { x: 150.0, y: 250.0 }));
    assert!(track.is_drivable(coord! { x: 350.0, y: 250.0 }));
}

#[test]
fn test_degenerate_tracks_are_rejected() {
    let checkpoints = ring_checkpoints(center(), 150.0);

    let equal = Track::square(center(), 200.0, 200.0, checkpoints.clone());
    assert!(matches!(equal, Err(ConfigError::DegenerateTrack { .. })));

    let inverted = Track::square(center(), 200.0, 300.0, checkpoints.clone());
    assert!(matches!(inverted, Err(ConfigError::DegenerateTrack { .. })));

    let negative = Track::square(center(), 400.0, -100.0, checkpoints.clone());
    assert!(matches!(negative, Err(ConfigError::DegenerateTrack { .. })));

    // inner touches the outer edge
    let outer = centered_square(center(), 400.0);
    let inner = Rect::new(coord! { x: 50.0, y: 150.0 }, coord! { x: 250.0, y: 350.0 });
    let touching = Track::new(outer, inner, checkpoints);
    assert!(matches!(touching, Err(ConfigError::DegenerateTrack { .. })));
}

#[test]
fn test_empty_checkpoints_are_rejected() {
    let result = Track::square(center(), 400.0, 200.0, Vec::new());
    assert_eq!(result, Err(ConfigError::EmptyCheckpointList));
}

#[test]
fn test_default_track_layout() {
    let track = Track::from_params(&TrackParams::default()).expect("default track");

    assert_eq!(track.checkpoint_count(), 8);
    assert_eq!(track.checkpoints()[0], coord! { x: 425.0, y: 75.0 });
    assert_eq!(track.checkpoints()[7], coord! { x: 250.0, y: 75.0 });
    assert_eq!(track.outer_bound().width(), 400.0);
    assert_eq!(track.inner_bound().width(), 300.0);

    // every checkpoint lies on the road
    for checkpoint in track.checkpoints() {
        assert!(track.is_drivable(*checkpoint));
    }
    // indices wrap around
    assert_eq!(track.checkpoint(8), track.checkpoints()[0]);
}

#[test]
fn test_explicit_checkpoints_from_params() {
    let params = TrackParams {
        checkpoints: vec![[400.0, 100.0], [100.0, 400.0]],
        ..TrackParams::default()
    };
    let track = Track::from_params(&params).expect("track with explicit checkpoints");

    assert_eq!(track.checkpoint_count(), 2);
    assert_eq!(track.checkpoint(1), coord! { x: 100.0, y: 400.0 });
}

#[test]
fn test_ray_hits_outer_wall() {
    let track = create_test_track();
    let origin = coord! { x: 250.0, y: 400.0 };

    // straight right reaches x = 450 after 200 steps
    assert_eq!(cast_ray(&track, origin, 0.0, 250.0), 200.0);
    // straight up enters the hole at y < 350
    assert_eq!(cast_ray(&track, origin, 90.0, 250.0), 51.0);
}

#[test]
fn test_ray_without_hit_returns_max_length() {
    let track = create_test_track();
    let origin = coord! { x: 250.0, y: 400.0 };

    assert_eq!(cast_ray(&track, origin, 0.0, 100.0), 100.0);
    assert_eq!(cast_ray(&track, origin, 0.0, 12.5), 12.5);
}

#[test]
fn test_ray_from_off_road_origin_is_zero() {
    let track = create_test_track();

    assert_eq!(cast_ray(&track, center(), 45.0, 250.0), 0.0);
    assert_eq!(cast_ray(&track, coord! { x: 0.0, y: 0.0 }, 45.0, 250.0), 0.0);
}

#[test]
fn test_ray_distance_within_range() {
    let track = create_test_track();
    let origin = coord! { x: 100.0, y: 250.0 };

    for step in 0..24 {
        let angle = step as f32 * 15.0;
        let distance = cast_ray(&track, origin, angle, 120.0);
        assert!((0.0..=120.0).contains(&distance), "angle {angle}: {distance}");
    }
}

#[test]
fn test_sensor_order_and_normalization() {
    let track = create_test_track();
    let sensors = SensorModel::new(250.0);
    let origin = coord! { x: 250.0, y: 400.0 };

    let [straight, left, right] = sensors.cast_sensors(&track, origin, 0.0);
    assert_eq!(straight, 200.0);
    // left dips towards the bottom wall, right towards the hole; both at ~100
    assert!((99.0..=102.0).contains(&left), "left = {left}");
    assert!((99.0..=102.0).contains(&right), "right = {right}");

    let readings = sensors.read(&track, origin, 0.0);
    assert_eq!(readings.len(), 3);
    assert!((readings[0] - 0.8).abs() < 1e-6);
    for reading in &readings {
        assert!((0.0..=1.0).contains(reading));
    }
}

#[test]
fn test_ray_end_point() {
    let end = ray_end(coord! { x: 10.0, y: 10.0 }, 90.0, 5.0);
    assert!((end.x - 10.0).abs() < 1e-5);
    assert!((end.y - 5.0).abs() < 1e-5);
}
