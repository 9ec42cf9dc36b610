//! Generation loop: spawn, drive, score, breed.
//!
//! A [`Simulation`] can be driven in one call with [`Simulation::run`], or
//! frame by frame with [`Simulation::start_generation`], [`Simulation::step`]
//! and [`Simulation::finish_generation`] when a renderer owns the frame loop.

use geo::coord;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, StartPose};
use super::error::{ConfigError, RunError};
use super::evolution::EvolutionEngine;
use super::params::Params;
use super::policy::GENOME_LEN;
use super::rng::{SimRng, create_rng};
use super::sensor::SensorModel;
use super::snapshot::AgentSnapshot;
use super::track::Track;

/// Receives frames and generation results while a simulation runs.
///
/// `()` observes nothing and skips building snapshots.
pub trait FrameObserver {
    /// Called after every frame with one snapshot per agent.
    fn on_frame(&mut self, _generation: usize, _frame: usize, _agents: &[AgentSnapshot]) {}

    /// Called once a generation has been scored.
    fn on_generation(&mut self, _summary: &GenerationSummary) {}

    /// Whether [`Self::on_frame`] should be fed snapshots.
    fn wants_frames(&self) -> bool {
        true
    }
}

impl FrameObserver for () {
    fn wants_frames(&self) -> bool {
        false
    }
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// 1-based generation number.
    pub generation: usize,
    /// Highest fitness of the generation.
    pub max_fitness: f32,
    /// Mean fitness of the generation.
    pub mean_fitness: f32,
    /// Slot of the fittest agent.
    pub best_index: usize,
    /// Genome of the fittest agent.
    pub best_weights: [f32; GENOME_LEN],
    /// Checkpoints reached by the fittest agent.
    pub best_checkpoints: u32,
    /// Agents still alive when the generation ended.
    pub survivors: usize,
    /// Frames simulated.
    pub frames: usize,
    /// Mutation std used to breed from this generation.
    pub mutation_std: f32,
}

/// Summaries of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// One summary per generation, in order.
    pub summaries: Vec<GenerationSummary>,
    /// Summary of the generation with the highest max fitness.
    pub best: Option<GenerationSummary>,
}

impl RunReport {
    fn record(&mut self, summary: GenerationSummary) {
        let improved = self
            .best
            .as_ref()
            .is_none_or(|best| summary.max_fitness > best.max_fitness);
        if improved {
            self.best = Some(summary.clone());
        }
        self.summaries.push(summary);
    }
}

/// Track, agents and the evolution engine of a run.
#[derive(Debug)]
pub struct Simulation {
    params: Params,
    track: Track,
    sensors: SensorModel,
    engine: EvolutionEngine,
    rng: SimRng,
    agents: Vec<Agent>,
    frame: usize,
    generation: usize,
}

impl Simulation {
    /// Builds the track from `params.track` and seeds the population.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        let track = Track::from_params(&params.track)?;
        Self::with_track(params, track)
    }

    /// Uses an already built track.
    pub fn with_track(params: Params, track: Track) -> Result<Self, ConfigError> {
        params.validate()?;
        params.validate_start(track.checkpoint_count())?;

        let mut rng = create_rng(params.seed);
        let engine = EvolutionEngine::new(&params, &mut rng)?;

        Ok(Self {
            sensors: SensorModel::new(params.sensor_max_length),
            params,
            track,
            engine,
            rng,
            agents: Vec::new(),
            frame: 0,
            generation: 0,
        })
    }

    /// Run parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Track the agents drive on.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Sensor model shared by all agents.
    pub fn sensors(&self) -> &SensorModel {
        &self.sensors
    }

    /// Evolution engine holding the current population.
    pub fn engine(&self) -> &EvolutionEngine {
        &self.engine
    }

    /// Agents of the current generation.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Frames simulated in the current generation.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Spawns one agent per genome around the start checkpoint.
    pub fn start_generation(&mut self) {
        let count = self.track.checkpoint_count();
        let start_index = match self.params.start_checkpoint.fixed_index(count) {
            Some(index) => index,
            None => self.rng.random_range(0..count),
        };
        let origin = self.track.checkpoint(start_index);
        let target = (start_index + 1) % count;

        let params = &self.params;
        let rng = &mut self.rng;
        self.agents = self
            .engine
            .population()
            .iter()
            .map(|genome| {
                let pose = StartPose {
                    position: coord! {
                        x: origin.x + jitter(rng, params.position_jitter),
                        y: origin.y + jitter(rng, params.position_jitter),
                    },
                    heading: params.start_heading + jitter(rng, params.heading_jitter),
                    speed: params.initial_speed,
                    checkpoint_index: target,
                };
                Agent::new(pose, genome.clone(), params.body_length, params.body_width)
            })
            .collect();
        self.frame = 0;

        tracing::debug!(
            generation = self.generation + 1,
            start_checkpoint = start_index,
            agents = self.agents.len(),
            "spawned generation"
        );
    }

    /// `true` once the frame budget is spent or every agent has crashed.
    pub fn is_generation_over(&self) -> bool {
        self.frame >= self.params.max_frames_per_generation
            || self.agents.iter().all(|agent| !agent.alive)
    }

    /// Advances every agent by one frame.
    ///
    /// Returns `false` once the generation is over.
    pub fn step(&mut self) -> bool {
        if self.is_generation_over() {
            return false;
        }

        let (track, sensors, params) = (&self.track, &self.sensors, &self.params);
        if params.parallel {
            self.agents
                .par_iter_mut()
                .for_each(|agent| agent.update(track, sensors, params));
        } else {
            for agent in &mut self.agents {
                agent.update(track, sensors, params);
            }
        }
        self.frame += 1;

        !self.is_generation_over()
    }

    /// Read-only view of every agent for rendering.
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|agent| AgentSnapshot::capture(agent, &self.track, &self.sensors))
            .collect()
    }

    /// Scores the current agents, breeds the next population and discards
    /// the agents.
    ///
    /// Must follow [`Self::start_generation`]; otherwise fails with
    /// [`RunError::GenerationNotStarted`].
    pub fn finish_generation(&mut self) -> Result<GenerationSummary, RunError> {
        if self.agents.is_empty() {
            return Err(RunError::GenerationNotStarted);
        }

        let fitness = EvolutionEngine::evaluate_fitness(&self.agents);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f32>() / fitness.len() as f32
        };
        let (best_index, max_fitness, best_genome) = self
            .engine
            .best(&fitness)
            .ok_or(RunError::GenerationNotStarted)?;

        let summary = GenerationSummary {
            generation: self.generation + 1,
            max_fitness,
            mean_fitness,
            best_index,
            best_weights: best_genome.to_array(),
            best_checkpoints: self.agents[best_index].checkpoints_seen,
            survivors: self.agents.iter().filter(|agent| agent.alive).count(),
            frames: self.frame,
            mutation_std: self.engine.mutation_std(),
        };

        tracing::info!(
            generation = summary.generation,
            max_fitness = summary.max_fitness,
            mean_fitness = summary.mean_fitness,
            best_checkpoints = summary.best_checkpoints,
            survivors = summary.survivors,
            frames = summary.frames,
            "generation finished"
        );

        self.engine.generate_new_population(&fitness, &mut self.rng)?;
        self.agents.clear();
        self.generation += 1;
        Ok(summary)
    }

    /// Runs one full generation.
    pub fn run_generation<O: FrameObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<GenerationSummary, RunError> {
        self.start_generation();
        let generation = self.generation + 1;

        while !self.is_generation_over() {
            self.step();
            if observer.wants_frames() {
                observer.on_frame(generation, self.frame, &self.snapshots());
            }
        }

        let summary = self.finish_generation()?;
        observer.on_generation(&summary);
        Ok(summary)
    }

    /// Runs the remaining generations up to `params.generations`.
    pub fn run<O: FrameObserver + ?Sized>(&mut self, observer: &mut O) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();
        while self.generation < self.params.generations {
            report.record(self.run_generation(observer)?);
        }
        Ok(report)
    }
}

/// Runs a whole evolution described by `params` without observing frames.
pub fn run(params: &Params) -> Result<RunReport, RunError> {
    Simulation::new(params.clone())?.run(&mut ())
}

fn jitter(rng: &mut SimRng, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..amount)
    } else {
        0.0
    }
}
