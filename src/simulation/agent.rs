//! Per-car simulation state and its frame update.
//!
//! An agent is either alive or crashed. Crashing is terminal: a crashed
//! agent keeps its final state and ignores further updates, which is what
//! fitness evaluation reads at the end of a generation.

use geo::{Coord, Rect, coord};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::params::Params;
use super::policy::{Genome, Policy};
use super::sensor::SensorModel;
use super::track::Track;

/// Weight of the new speed in the smoothed `last_speed`.
const SPEED_SMOOTHING: f32 = 0.25;

/// Pose an agent starts (and resets) from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPose {
    /// Start position.
    pub position: Coord<f32>,
    /// Start heading in degrees.
    pub heading: f32,
    /// Start speed.
    pub speed: f32,
    /// First checkpoint to drive towards.
    pub checkpoint_index: usize,
}

/// A simulated car driven by a [`Policy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Position in screen space (y grows downwards).
    pub position: Coord<f32>,
    /// Heading in degrees, always within `[0, 360)`.
    pub heading: f32,
    /// Current speed in units per frame.
    pub speed: f32,
    /// Exponentially smoothed speed, used for fitness.
    pub last_speed: f32,
    /// Normalized sensor readings of the last live frame.
    pub sensor: Array1<f32>,
    /// Index of the checkpoint the agent is driving towards.
    pub checkpoint_index: usize,
    /// Checkpoints reached so far.
    pub checkpoints_seen: u32,
    /// Frames survived.
    pub frames_alive: u32,
    /// `false` once the agent has left the road.
    pub alive: bool,
    /// Body extent along the heading.
    pub body_length: f32,
    /// Body extent across the heading.
    pub body_width: f32,
    policy: Policy,
    start: StartPose,
}

impl Agent {
    /// Creates a live agent at `start`, driven by `genome`.
    pub fn new(start: StartPose, genome: Genome, body_length: f32, body_width: f32) -> Self {
        Self {
            position: start.position,
            heading: wrap_degrees(start.heading),
            speed: start.speed,
            last_speed: start.speed,
            sensor: Array1::zeros(3),
            checkpoint_index: start.checkpoint_index,
            checkpoints_seen: 0,
            frames_alive: 0,
            alive: true,
            body_length,
            body_width,
            policy: Policy::new(genome),
            start,
        }
    }

    /// Policy driving this agent.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Genome of the policy driving this agent.
    pub fn genome(&self) -> &Genome {
        self.policy.genome()
    }

    /// Pose this agent was spawned at.
    pub fn start(&self) -> StartPose {
        self.start
    }

    /// Checks if the agent is still driving.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Puts the agent back at its start pose, alive, with cleared counters.
    pub fn reset(&mut self) {
        self.position = self.start.position;
        self.heading = wrap_degrees(self.start.heading);
        self.speed = self.start.speed;
        self.last_speed = self.start.speed;
        self.sensor.fill(0.0);
        self.checkpoint_index = self.start.checkpoint_index;
        self.checkpoints_seen = 0;
        self.frames_alive = 0;
        self.alive = true;
    }

    /// Axis-aligned bounding box of the body rotated by the current heading.
    pub fn body(&self) -> Rect<f32> {
        body_bounds(self.position, self.heading, self.body_length, self.body_width)
    }

    /// Advances the agent by one frame.
    ///
    /// Reads the sensors, lets the policy pick a heading change and speed,
    /// moves, then checks for a crash and for the target checkpoint. Does
    /// nothing on a crashed agent.
    pub fn update(&mut self, track: &Track, sensors: &SensorModel, params: &Params) {
        if !self.alive {
            return;
        }

        self.sensor = sensors.read(track, self.position, self.heading);
        let control = self
            .policy
            .decide(&self.sensor, params.max_turn_angle, params.max_speed);

        self.last_speed = self.speed * (1.0 - SPEED_SMOOTHING) + control.speed * SPEED_SMOOTHING;
        self.speed = control.speed;

        self.heading = wrap_degrees(self.heading + control.delta_angle);

        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.position.x += self.speed * cos;
        self.position.y -= self.speed * sin;
        self.frames_alive += 1;

        if !track.on_road(&self.body()) {
            self.alive = false;
            self.speed = 0.0;
            tracing::trace!(
                frames_alive = self.frames_alive,
                checkpoints_seen = self.checkpoints_seen,
                "agent crashed"
            );
            return;
        }

        let checkpoint_count = track.checkpoint_count();
        let target = track.checkpoint(self.checkpoint_index);
        if (self.position.x - target.x).abs() < params.checkpoint_epsilon
            && (self.position.y - target.y).abs() < params.checkpoint_epsilon
        {
            self.checkpoint_index = (self.checkpoint_index + 1) % checkpoint_count;
            self.checkpoints_seen += 1;
        }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Bounding box of a `length` × `width` rectangle centered at `center` and
/// rotated by `heading` degrees.
pub fn body_bounds(center: Coord<f32>, heading: f32, length: f32, width: f32) -> Rect<f32> {
    let (sin, cos) = heading.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let half_x = (length * cos + width * sin) / 2.0;
    let half_y = (length * sin + width * cos) / 2.0;
    Rect::new(
        coord! { x: center.x - half_x, y: center.y - half_y },
        coord! { x: center.x + half_x, y: center.y + half_y },
    )
}
