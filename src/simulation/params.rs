use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, LoadError};
use super::track::TrackParams;

/// Which checkpoint a generation spawns its agents at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCheckpoint {
    /// The last checkpoint of the cycle, so the first target is checkpoint 0.
    #[default]
    Last,
    /// A fixed checkpoint index.
    Index(usize),
    /// A checkpoint drawn uniformly at the start of every generation.
    Random,
}

impl StartCheckpoint {
    /// Fixed index for this choice, or `None` for [`StartCheckpoint::Random`].
    pub fn fixed_index(self, checkpoint_count: usize) -> Option<usize> {
        match self {
            Self::Last => Some(checkpoint_count.saturating_sub(1)),
            Self::Index(index) => Some(index),
            Self::Random => None,
        }
    }
}

/// Simulation parameters that control the track, the agents and evolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Seed of the single random source used for the whole run.
    pub seed: u64,
    /// Number of agents (and genomes) per generation. Must be even.
    pub population_size: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Frame budget of one generation.
    pub max_frames_per_generation: usize,
    /// Per-gene probability of Gaussian mutation.
    pub mutation_rate: f32,
    /// Standard deviation of mutation noise at generation 0.
    pub initial_mutation_std: f32,
    /// Generations over which mutation noise decays linearly to zero.
    pub anneal_generations: u32,
    /// Initial genes are drawn uniformly from `[-init_gene_range, init_gene_range)`.
    pub init_gene_range: f32,
    /// Maximum sensor ray length.
    pub sensor_max_length: f32,
    /// Largest heading change per frame in degrees.
    pub max_turn_angle: f32,
    /// Speed ceiling of the policy's logistic speed output.
    pub max_speed: f32,
    /// Per-axis distance at which a checkpoint counts as reached.
    pub checkpoint_epsilon: f32,
    /// Speed of a freshly spawned agent.
    pub initial_speed: f32,
    /// Body extent along the heading.
    pub body_length: f32,
    /// Body extent across the heading.
    pub body_width: f32,
    /// Checkpoint agents spawn at.
    pub start_checkpoint: StartCheckpoint,
    /// Base spawn heading in degrees.
    pub start_heading: f32,
    /// Spawn position jitter per axis, uniform in `[-j, j)`.
    pub position_jitter: f32,
    /// Spawn heading jitter in degrees, uniform in `[-j, j)`.
    pub heading_jitter: f32,
    /// Update agents on the rayon thread pool.
    pub parallel: bool,
    /// Track geometry.
    pub track: TrackParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 0,
            population_size: 10,
            generations: 10_000,
            max_frames_per_generation: 250,
            mutation_rate: 0.5,
            initial_mutation_std: 1.0,
            anneal_generations: 50,
            init_gene_range: 5.0,
            sensor_max_length: 250.0,
            max_turn_angle: 25.0,
            max_speed: 10.0,
            checkpoint_epsilon: 50.0,
            initial_speed: 5.0,
            body_length: 20.0,
            body_width: 10.0,
            start_checkpoint: StartCheckpoint::Last,
            start_heading: 0.0,
            position_jitter: 15.0,
            heading_jitter: 30.0,
            parallel: false,
            track: TrackParams::default(),
        }
    }
}

impl Params {
    /// Checks every scalar parameter.
    ///
    /// Track geometry and the start checkpoint are checked when the track is
    /// built, see [`Track::from_params`](super::track::Track::from_params).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulationSize(self.population_size));
        }
        if self.max_frames_per_generation == 0 {
            return Err(ConfigError::NonPositiveMaxFrames);
        }
        if !is_positive(self.sensor_max_length) {
            return Err(ConfigError::NonPositiveSensorLength(self.sensor_max_length));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !(self.initial_mutation_std.is_finite() && self.initial_mutation_std >= 0.0) {
            return Err(ConfigError::InvalidMutationStd(self.initial_mutation_std));
        }
        if self.anneal_generations == 0 {
            return Err(ConfigError::NonPositiveAnnealHorizon);
        }
        if !is_positive(self.checkpoint_epsilon) {
            return Err(ConfigError::NonPositiveEpsilon(self.checkpoint_epsilon));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(ConfigError::InvalidInitialSpeed(self.initial_speed));
        }
        if !is_positive(self.max_speed) {
            return Err(ConfigError::NonPositiveMaxSpeed(self.max_speed));
        }
        if !is_positive(self.init_gene_range) {
            return Err(ConfigError::NonPositiveGeneRange(self.init_gene_range));
        }
        Ok(())
    }

    /// Checks that a fixed start checkpoint exists on a track with
    /// `checkpoint_count` checkpoints.
    pub fn validate_start(&self, checkpoint_count: usize) -> Result<(), ConfigError> {
        if checkpoint_count == 0 {
            return Err(ConfigError::EmptyCheckpointList);
        }
        match self.start_checkpoint.fixed_index(checkpoint_count) {
            Some(index) if index >= checkpoint_count => Err(ConfigError::StartCheckpointOutOfRange {
                index,
                count: checkpoint_count,
            }),
            _ => Ok(()),
        }
    }

    /// Loads params from a JSON file and validates them.
    ///
    /// Missing fields take their default values.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves params as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
