use rand::Rng;
use serde::{Deserialize, Serialize};

use super::policy::Genome;

/// Ordered genomes of one generation, one per agent slot.
///
/// A population is never edited in place; evolution builds a new one and
/// swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    /// Wraps an existing list of genomes.
    pub fn new(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    /// `size` genomes with every gene uniform in `[-range, range)`.
    pub fn random<R: Rng + ?Sized>(size: usize, range: f32, rng: &mut R) -> Self {
        Self {
            genomes: (0..size).map(|_| Genome::random(rng, -range, range)).collect(),
        }
    }

    /// Number of genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// `true` if there are no genomes.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Genome of slot `index`.
    pub fn get(&self, index: usize) -> Option<&Genome> {
        self.genomes.get(index)
    }

    /// All genomes in slot order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Iterates the genomes in slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, Genome> {
        self.genomes.iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Genome;
    type IntoIter = std::slice::Iter<'a, Genome>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.iter()
    }
}
