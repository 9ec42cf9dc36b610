//! Fixed-size control policy mapping sensor readings to steering and speed.
//!
//! The genome has eight genes:
//!
//! | genes | role |
//! |---|---|
//! | `0..3` | steering gains for the straight, left and right sensors |
//! | `3` | steering scale |
//! | `4..7` | speed gains for the straight, left and right sensors |
//! | `7` | reserved; inherited and mutated but not read |

use ndarray::{Array1, ArrayViewMut1, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Number of genes in a genome.
pub const GENOME_LEN: usize = 8;

/// Index of the steering scale gene.
pub const STEERING_SCALE_GENE: usize = 3;

/// Index of the reserved gene.
pub const RESERVED_GENE: usize = 7;

/// Eight real-valued genes encoding a [`Policy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array1<f32>", into = "Array1<f32>")]
pub struct Genome {
    genes: Array1<f32>,
}

impl Genome {
    /// Wraps `genes`, checking there are exactly [`GENOME_LEN`] of them.
    pub fn new(genes: Array1<f32>) -> Result<Self, ConfigError> {
        if genes.len() != GENOME_LEN {
            return Err(ConfigError::GenomeLength {
                expected: GENOME_LEN,
                actual: genes.len(),
            });
        }
        Ok(Self { genes })
    }

    /// Builds a genome from a fixed-size array.
    pub fn from_array(genes: [f32; GENOME_LEN]) -> Self {
        Self {
            genes: Array1::from_vec(genes.to_vec()),
        }
    }

    /// Draws every gene uniformly from `[low, high)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> Self {
        Self {
            genes: Array1::from_iter((0..GENOME_LEN).map(|_| rng.random_range(low..high))),
        }
    }

    /// Read-only view of the genes.
    pub fn genes(&self) -> &Array1<f32> {
        &self.genes
    }

    /// Mutable view of the genes. The length cannot change through it.
    pub fn genes_mut(&mut self) -> ArrayViewMut1<'_, f32> {
        self.genes.view_mut()
    }

    /// Gene at `index`.
    pub fn gene(&self, index: usize) -> f32 {
        self.genes[index]
    }

    /// Copies the genes into a plain array.
    pub fn to_array(&self) -> [f32; GENOME_LEN] {
        let mut out = [0.0; GENOME_LEN];
        for (o, g) in out.iter_mut().zip(self.genes.iter()) {
            *o = *g;
        }
        out
    }
}

impl TryFrom<Array1<f32>> for Genome {
    type Error = ConfigError;

    fn try_from(genes: Array1<f32>) -> Result<Self, Self::Error> {
        Self::new(genes)
    }
}

impl From<Genome> for Array1<f32> {
    fn from(genome: Genome) -> Self {
        genome.genes
    }
}

/// Decision taken by the policy for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    /// Heading change in degrees.
    pub delta_angle: f32,
    /// New speed, within `[0, max_speed]`.
    pub speed: f32,
}

/// Controller owning a genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    genome: Genome,
}

impl Policy {
    /// Creates a policy from a genome.
    pub fn new(genome: Genome) -> Self {
        Self { genome }
    }

    /// The genome driving this policy.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Heading change for normalized `sensor` readings:
    /// `genes[3] * max_turn_angle * tanh(genes[0..3] · sensor)`.
    #[inline]
    pub fn steering(&self, sensor: &Array1<f32>, max_turn_angle: f32) -> f32 {
        let genes = self.genome.genes();
        let signal = genes.slice(s![0..3]).dot(sensor);
        genes[STEERING_SCALE_GENE] * max_turn_angle * signal.tanh()
    }

    /// Target speed for normalized `sensor` readings, a logistic of
    /// `genes[4..7] · sensor` scaled to `[0, max_speed]`.
    #[inline]
    pub fn speed(&self, sensor: &Array1<f32>, max_speed: f32) -> f32 {
        let signal = self.genome.genes().slice(s![4..7]).dot(sensor);
        max_speed * logistic(signal)
    }

    /// Evaluates steering and speed together.
    pub fn decide(&self, sensor: &Array1<f32>, max_turn_angle: f32, max_speed: f32) -> Control {
        Control {
            delta_angle: self.steering(sensor, max_turn_angle),
            speed: self.speed(sensor, max_speed),
        }
    }
}

/// Standard logistic function `1 / (1 + e^-x)`.
pub fn logistic(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
