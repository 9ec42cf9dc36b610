//! Error types for configuration validation and evolution operations.

use thiserror::Error;

/// Errors detected while validating parameters or building the track.
///
/// All of these are raised before the first generation runs. A simulation
/// built from validated inputs never fails at runtime.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The track has no checkpoints to drive towards.
    #[error("checkpoint list must not be empty")]
    EmptyCheckpointList,
    /// Offspring are produced in pairs, so the population must be even.
    #[error("population size {0} is odd; offspring are produced in pairs")]
    OddPopulationSize(usize),
    /// A population needs at least one pair of individuals.
    #[error("population size must be non-zero")]
    EmptyPopulation,
    /// Sensor rays need a positive maximum length.
    #[error("sensor max length {0} must be positive")]
    NonPositiveSensorLength(f32),
    /// Each generation must run for at least one frame.
    #[error("max frames per generation must be positive")]
    NonPositiveMaxFrames,
    /// The inner bound is not strictly inside the outer bound.
    #[error("inner bound {inner:?} is not strictly inside outer bound {outer:?}")]
    DegenerateTrack {
        /// Outer bound as `[min_x, min_y, max_x, max_y]`.
        outer: [f32; 4],
        /// Inner bound as `[min_x, min_y, max_x, max_y]`.
        inner: [f32; 4],
    },
    /// A fixed start checkpoint refers to a checkpoint that does not exist.
    #[error("start checkpoint {index} out of range for {count} checkpoints")]
    StartCheckpointOutOfRange {
        /// Requested checkpoint index.
        index: usize,
        /// Number of checkpoints on the track.
        count: usize,
    },
    /// Mutation rate is a per-gene probability.
    #[error("mutation rate {0} must be within [0, 1]")]
    InvalidMutationRate(f32),
    /// Mutation noise must have a finite, non-negative standard deviation.
    #[error("mutation std {0} must be finite and non-negative")]
    InvalidMutationStd(f32),
    /// Checkpoint proximity threshold must be positive.
    #[error("checkpoint epsilon {0} must be positive")]
    NonPositiveEpsilon(f32),
    /// Agents must spawn with a finite, non-negative speed.
    #[error("initial speed {0} must be finite and non-negative")]
    InvalidInitialSpeed(f32),
    /// Speed ceiling of the policy must be positive.
    #[error("max speed {0} must be positive")]
    NonPositiveMaxSpeed(f32),
    /// Initial genes are drawn from a symmetric range that must be non-empty.
    #[error("initial gene range {0} must be positive")]
    NonPositiveGeneRange(f32),
    /// Annealing needs a positive number of generations to decay over.
    #[error("anneal horizon must be positive")]
    NonPositiveAnnealHorizon,
    /// A genome was built from the wrong number of genes.
    #[error("genome must have {expected} genes, got {actual}")]
    GenomeLength {
        /// Required gene count.
        expected: usize,
        /// Provided gene count.
        actual: usize,
    },
}

/// Errors raised while loading [`Params`](super::params::Params) from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read params file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid params JSON.
    #[error("failed to parse params file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The params parsed but did not validate.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Errors raised by [`EvolutionEngine`](super::evolution::EvolutionEngine)
/// when called with inputs it cannot select from.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Mutation noise cannot be drawn with this standard deviation.
    #[error("mutation std {0} must be finite and non-negative")]
    InvalidMutationStd(f32),
    /// Fitness scores are empty, negative, non-finite or sum to zero.
    #[error("fitness scores cannot form a selection distribution: {0}")]
    InvalidFitness(String),
    /// One fitness score is required per individual.
    #[error("expected {expected} fitness scores, got {actual}")]
    FitnessLengthMismatch {
        /// Population size.
        expected: usize,
        /// Number of scores provided.
        actual: usize,
    },
}

/// Errors that can stop a simulation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunError {
    /// The params or track did not validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A generation was finished without agents, either before
    /// `start_generation` or twice in a row.
    #[error("no generation in progress; call start_generation first")]
    GenerationNotStarted,
    /// Breeding failed; unreachable with validated params.
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}
