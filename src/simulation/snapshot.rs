//! Read-only per-frame view of agents for an external renderer.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::sensor::{RAY_OFFSETS, SensorModel, cast_ray, ray_end};
use super::track::Track;

/// One sensor ray as seen from the agent's current pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaySnapshot {
    /// Absolute ray angle in degrees.
    pub angle: f32,
    /// Distance to the first boundary crossing, at most the sensor range.
    pub distance: f32,
    /// Point where the ray stops.
    pub end: Coord<f32>,
}

/// What a renderer needs to draw one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent position.
    pub position: Coord<f32>,
    /// Heading in degrees.
    pub heading: f32,
    /// Straight, left and right rays.
    pub rays: [RaySnapshot; 3],
    /// `false` once crashed.
    pub alive: bool,
    /// Checkpoints reached so far.
    pub checkpoints_seen: u32,
}

impl AgentSnapshot {
    /// Captures `agent`, casting its rays from the current pose.
    pub fn capture(agent: &Agent, track: &Track, sensors: &SensorModel) -> Self {
        let rays = RAY_OFFSETS.map(|offset| {
            let angle = agent.heading + offset;
            let distance = cast_ray(track, agent.position, angle, sensors.max_length());
            RaySnapshot {
                angle,
                distance,
                end: ray_end(agent.position, angle, distance),
            }
        });

        Self {
            position: agent.position,
            heading: agent.heading,
            rays,
            alive: agent.alive,
            checkpoints_seen: agent.checkpoints_seen,
        }
    }
}
