//! Static ring-shaped track geometry.
//!
//! The drivable region is the outer bound minus the inner bound (the hole).
//! Checkpoints form an ordered cycle that agents follow around the ring.

use geo::{Coord, Rect, coord};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Geometry settings used to build the default square ring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackParams {
    /// Shared center of both squares.
    pub center: [f32; 2],
    /// Side length of the outer square.
    pub outer_side: f32,
    /// Side length of the inner square (the hole).
    pub inner_side: f32,
    /// Ordered checkpoint cycle. Empty means "derive from `checkpoint_offset`".
    pub checkpoints: Vec<[f32; 2]>,
    /// Distance from the center of the generated checkpoint ring.
    pub checkpoint_offset: f32,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            center: [250.0, 250.0],
            outer_side: 400.0,
            inner_side: 300.0,
            checkpoints: Vec::new(),
            checkpoint_offset: 175.0,
        }
    }
}

/// Immutable track: outer bound, inner bound and the checkpoint cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    outer: Rect<f32>,
    inner: Rect<f32>,
    checkpoints: Vec<Coord<f32>>,
}

impl Track {
    /// Builds a track from explicit bounds.
    ///
    /// Fails if the inner bound is not strictly inside the outer bound or if
    /// there are no checkpoints.
    pub fn new(
        outer: Rect<f32>,
        inner: Rect<f32>,
        checkpoints: Vec<Coord<f32>>,
    ) -> Result<Self, ConfigError> {
        let strictly_inside = inner.min().x > outer.min().x
            && inner.min().y > outer.min().y
            && inner.max().x < outer.max().x
            && inner.max().y < outer.max().y
            && inner.width() > 0.0
            && inner.height() > 0.0;
        if !strictly_inside {
            return Err(ConfigError::DegenerateTrack {
                outer: rect_array(&outer),
                inner: rect_array(&inner),
            });
        }
        if checkpoints.is_empty() {
            return Err(ConfigError::EmptyCheckpointList);
        }
        Ok(Self {
            outer,
            inner,
            checkpoints,
        })
    }

    /// Builds two concentric squares around `center`.
    pub fn square(
        center: Coord<f32>,
        outer_side: f32,
        inner_side: f32,
        checkpoints: Vec<Coord<f32>>,
    ) -> Result<Self, ConfigError> {
        let outer = centered_square(center, outer_side);
        let inner = centered_square(center, inner_side);
        // Rect::new normalizes corners, so a negative side would flip silently.
        if !(inner_side > 0.0 && outer_side > inner_side) {
            return Err(ConfigError::DegenerateTrack {
                outer: rect_array(&outer),
                inner: rect_array(&inner),
            });
        }
        Self::new(outer, inner, checkpoints)
    }

    /// Builds the track described by `params`.
    pub fn from_params(params: &TrackParams) -> Result<Self, ConfigError> {
        let center = coord! { x: params.center[0], y: params.center[1] };
        let checkpoints = if params.checkpoints.is_empty() {
            ring_checkpoints(center, params.checkpoint_offset)
        } else {
            params
                .checkpoints
                .iter()
                .map(|p| coord! { x: p[0], y: p[1] })
                .collect()
        };
        Self::square(center, params.outer_side, params.inner_side, checkpoints)
    }

    /// Outer boundary of the drivable region.
    pub fn outer_bound(&self) -> Rect<f32> {
        self.outer
    }

    /// Inner boundary (the hole) of the drivable region.
    pub fn inner_bound(&self) -> Rect<f32> {
        self.inner
    }

    /// Ordered checkpoint cycle.
    pub fn checkpoints(&self) -> &[Coord<f32>] {
        &self.checkpoints
    }

    /// Number of checkpoints; never zero.
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Checkpoint at `index`, taken modulo the checkpoint count.
    pub fn checkpoint(&self, index: usize) -> Coord<f32> {
        self.checkpoints[index % self.checkpoints.len()]
    }

    /// Returns `true` if `shape` lies fully within the outer bound and does
    /// not overlap the inner bound.
    ///
    /// Edges touching the outer bound count as inside; edges touching the
    /// inner bound do not count as overlap.
    pub fn on_road(&self, shape: &Rect<f32>) -> bool {
        contains_rect(&self.outer, shape) && !overlaps(&self.inner, shape)
    }

    /// Returns `true` if a sampled point is inside the outer bound and not
    /// inside the inner bound, using half-open `[min, max)` intervals.
    pub fn is_drivable(&self, point: Coord<f32>) -> bool {
        contains_point(&self.outer, point) && !contains_point(&self.inner, point)
    }
}

/// Axis-aligned square of side `side` centered at `center`.
pub fn centered_square(center: Coord<f32>, side: f32) -> Rect<f32> {
    let half = side / 2.0;
    Rect::new(
        coord! { x: center.x - half, y: center.y - half },
        coord! { x: center.x + half, y: center.y + half },
    )
}

/// Eight checkpoints around `center`, starting at the top-right corner and
/// running clockwise in screen space (y grows downwards).
pub fn ring_checkpoints(center: Coord<f32>, offset: f32) -> Vec<Coord<f32>> {
    [
        (offset, -offset),
        (offset, 0.0),
        (offset, offset),
        (0.0, offset),
        (-offset, offset),
        (-offset, 0.0),
        (-offset, -offset),
        (0.0, -offset),
    ]
    .iter()
    .map(|(dx, dy)| coord! { x: center.x + dx, y: center.y + dy })
    .collect()
}

fn contains_rect(outer: &Rect<f32>, shape: &Rect<f32>) -> bool {
    shape.min().x >= outer.min().x
        && shape.min().y >= outer.min().y
        && shape.max().x <= outer.max().x
        && shape.max().y <= outer.max().y
}

fn overlaps(a: &Rect<f32>, b: &Rect<f32>) -> bool {
    a.min().x < b.max().x && b.min().x < a.max().x && a.min().y < b.max().y && b.min().y < a.max().y
}

fn contains_point(rect: &Rect<f32>, point: Coord<f32>) -> bool {
    point.x >= rect.min().x
        && point.x < rect.max().x
        && point.y >= rect.min().y
        && point.y < rect.max().y
}

fn rect_array(rect: &Rect<f32>) -> [f32; 4] {
    [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
}
