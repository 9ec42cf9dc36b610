//! # Evo Drive - Evolving Cars on a Ring Track
//!
//! Simple cars drive around a square ring track. Each car sees the track
//! through three raycast distance sensors and is steered by a tiny policy of
//! eight weights. A genetic algorithm evolves those weights across
//! generations to go around the ring further and faster.
//!
//! ## Features
//!
//! - Discrete raycast sensors against the track boundaries
//! - Eight-gene policy (tanh steering, logistic speed)
//! - Checkpoint progress tracking and crash detection
//! - Fitness-proportionate selection, uniform crossover, Gaussian mutation
//! - Linearly annealed mutation noise
//! - Seeded, reproducible runs
//! - Per-frame snapshots for an external renderer
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Ring geometry and road checks
//! - [`simulation::sensor`] - Raycasting
//! - [`simulation::policy`] - Genome and control policy
//! - [`simulation::agent`] - Car state and frame update
//! - [`simulation::evolution`] - Genetic algorithm
//! - [`simulation::race`] - Generation loop

/// Core simulation logic and data structures.
pub mod simulation {
    /// Car state, physics integration, crash and checkpoint logic.
    pub mod agent;
    /// Configuration and evolution error types.
    pub mod error;
    /// Fitness, selection, crossover, mutation and annealing.
    pub mod evolution;
    /// Simulation parameters.
    pub mod params;
    /// Eight-gene genome and the policy it encodes.
    pub mod policy;
    /// Ordered genomes of one generation.
    pub mod population;
    /// Generation loop and run reports.
    pub mod race;
    /// Seeded random source.
    pub mod rng;
    /// Raycast distance sensors.
    pub mod sensor;
    /// Read-only agent views for rendering.
    pub mod snapshot;
    /// Ring-shaped track geometry.
    pub mod track;
}
