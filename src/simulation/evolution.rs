//! Genetic algorithm over policy genomes.
//!
//! Each generation is scored, parents are drawn by fitness-proportionate
//! selection, children are produced by uniform crossover and Gaussian
//! mutation, and the mutation noise is annealed towards zero.

use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand_distr::{Distribution, Normal};

use super::agent::Agent;
use super::error::{ConfigError, EvolutionError};
use super::params::Params;
use super::policy::Genome;
use super::population::Population;

/// Fitness floor; keeps the total strictly positive.
pub const FITNESS_FLOOR: f32 = 0.01;

/// Fitness of one agent: `0.01 + last_speed * checkpoints_seen²`.
///
/// Checkpoint progress dominates quadratically, speed is a secondary linear
/// term.
pub fn fitness(agent: &Agent) -> f32 {
    let seen = agent.checkpoints_seen as f32;
    FITNESS_FLOOR + agent.last_speed * seen * seen
}

/// Mutation std after `generations` generations: the initial std decayed
/// linearly to zero over `horizon` generations, and zero afterwards.
pub fn annealed_std(initial_std: f32, generations: u32, horizon: u32) -> f32 {
    let remaining = (horizon as f32 - generations as f32) / horizon as f32;
    initial_std * remaining.max(0.0)
}

/// Owns the current population and breeds the next one.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    population: Population,
    mutation_rate: f32,
    initial_mutation_std: f32,
    mutation_std: f32,
    anneal_generations: u32,
    generations: u32,
}

impl EvolutionEngine {
    /// Creates an engine with a random initial population.
    pub fn new<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            population: Self::initialize_population(
                params.population_size,
                params.init_gene_range,
                rng,
            ),
            mutation_rate: params.mutation_rate,
            initial_mutation_std: params.initial_mutation_std,
            mutation_std: params.initial_mutation_std,
            anneal_generations: params.anneal_generations,
            generations: 0,
        })
    }

    /// `n` genomes with every gene uniform in `[-range, range)`.
    pub fn initialize_population<R: Rng + ?Sized>(n: usize, range: f32, rng: &mut R) -> Population {
        Population::random(n, range, rng)
    }

    /// Current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of individuals per generation.
    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    /// Number of populations generated so far.
    pub fn generations(&self) -> u32 {
        self.generations
    }

    /// Standard deviation currently used by [`Self::mutate`].
    pub fn mutation_std(&self) -> f32 {
        self.mutation_std
    }

    /// Per-gene mutation probability.
    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    /// Scores each agent with [`fitness`], in agent order.
    pub fn evaluate_fitness(agents: &[Agent]) -> Vec<f32> {
        agents.iter().map(fitness).collect()
    }

    /// Draws two parent indices, with replacement, with probability
    /// proportional to their fitness.
    pub fn select_parents<R: Rng + ?Sized>(
        fitness_scores: &[f32],
        rng: &mut R,
    ) -> Result<(usize, usize), EvolutionError> {
        check_fitness(fitness_scores)?;
        let wheel = WeightedIndex::new(fitness_scores)
            .map_err(|e| EvolutionError::InvalidFitness(e.to_string()))?;
        Ok((wheel.sample(rng), wheel.sample(rng)))
    }

    /// Uniform crossover: every gene of each child comes from either parent
    /// with equal probability, chosen independently per child.
    pub fn crossover<R: Rng + ?Sized>(
        parent_1: &Genome,
        parent_2: &Genome,
        rng: &mut R,
    ) -> (Genome, Genome) {
        let mut child_1 = parent_1.clone();
        let mut child_2 = parent_1.clone();

        for (i, (c1, c2)) in child_1
            .genes_mut()
            .iter_mut()
            .zip(child_2.genes_mut().iter_mut())
            .enumerate()
        {
            let (a, b) = (parent_1.gene(i), parent_2.gene(i));
            *c1 = if rng.random_bool(0.5) { a } else { b };
            *c2 = if rng.random_bool(0.5) { a } else { b };
        }

        (child_1, child_2)
    }

    /// Adds `N(0, mutation_std)` noise to each gene with probability
    /// `mutation_rate`.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        child: &mut Genome,
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        gaussian_mutation(child, self.mutation_rate, self.mutation_std, rng)
    }

    /// Replaces the population with a bred one and anneals the mutation std.
    ///
    /// Runs `population_size / 2` rounds of selection, crossover and mutation
    /// of both children.
    pub fn generate_new_population<R: Rng + ?Sized>(
        &mut self,
        fitness_scores: &[f32],
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        if fitness_scores.len() != self.population.len() {
            return Err(EvolutionError::FitnessLengthMismatch {
                expected: self.population.len(),
                actual: fitness_scores.len(),
            });
        }
        check_fitness(fitness_scores)?;
        let wheel = WeightedIndex::new(fitness_scores)
            .map_err(|e| EvolutionError::InvalidFitness(e.to_string()))?;

        let parents = self.population.genomes();
        let mut children = Vec::with_capacity(parents.len());
        for _ in 0..parents.len() / 2 {
            let (i, j) = (wheel.sample(rng), wheel.sample(rng));
            let (mut child_1, mut child_2) = Self::crossover(&parents[i], &parents[j], rng);
            self.mutate(&mut child_1, rng)?;
            self.mutate(&mut child_2, rng)?;
            children.push(child_1);
            children.push(child_2);
        }

        self.population = Population::new(children);
        self.generations += 1;
        self.mutation_std =
            annealed_std(self.initial_mutation_std, self.generations, self.anneal_generations);
        Ok(())
    }

    /// Fittest individual of the current population as
    /// `(index, fitness, genome)`; the first index wins ties.
    pub fn best(&self, fitness_scores: &[f32]) -> Option<(usize, f32, &Genome)> {
        let (index, score) = fitness_scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            })?;
        Some((index, score, self.population.get(index)?))
    }
}

/// Adds `N(0, std)` noise to each gene of `genome` with probability `rate`.
///
/// Fails without touching the genome if `std` is negative or not finite.
pub fn gaussian_mutation<R: Rng + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    std: f32,
    rng: &mut R,
) -> Result<(), EvolutionError> {
    if !(std.is_finite() && std >= 0.0) {
        return Err(EvolutionError::InvalidMutationStd(std));
    }
    let noise = Normal::new(0.0, std).map_err(|_| EvolutionError::InvalidMutationStd(std))?;
    for gene in genome.genes_mut().iter_mut() {
        if rng.random::<f32>() < rate {
            *gene += noise.sample(rng);
        }
    }
    Ok(())
}

fn check_fitness(fitness_scores: &[f32]) -> Result<(), EvolutionError> {
    if fitness_scores.is_empty() {
        return Err(EvolutionError::InvalidFitness("no scores".into()));
    }
    if let Some(bad) = fitness_scores.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(EvolutionError::InvalidFitness(format!(
            "score {bad} is negative or not finite"
        )));
    }
    if fitness_scores.iter().sum::<f32>() <= 0.0 {
        return Err(EvolutionError::InvalidFitness("scores sum to zero".into()));
    }
    Ok(())
}
