use std::f64::consts::PI;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::api::{Controller, SpatialIndexApi};
use crate::config::UniverseConfig;
use crate::error::UniverseError;
use crate::quadtree::QuadTree;
use crate::sensor::{SensorParams, sense};
use crate::types::*;

/// Simulation context: configuration, the robot population and the index.
///
/// One `step` runs a full tick: integrate poses, index every robot, sense
/// against the fully populated index, flush the index, then hand each robot
/// to the controller.
pub struct Universe {
    config: UniverseConfig,
    params: SensorParams,
    population: Vec<Robot>,
    index: QuadTree,
    updates: u64,
    paused: bool,
    last_report: Instant,
}

impl Universe {
    /// Validate `config` and create `config.population` robots at the origin.
    pub fn new(config: UniverseConfig) -> Result<Self, UniverseError> {
        config.validate()?;
        let population = (0..config.population)
            .map(|_| Robot::new(config.pixel_count, config.range))
            .collect();
        Ok(Self::from_parts(config, population))
    }

    /// Use an existing population instead of default robots.
    pub fn with_population(
        mut config: UniverseConfig,
        population: Vec<Robot>,
    ) -> Result<Self, UniverseError> {
        config.population = population.len();
        config.validate()?;
        Ok(Self::from_parts(config, population))
    }

    fn from_parts(config: UniverseConfig, mut population: Vec<Robot>) -> Self {
        let params = config.sensor_params();
        for robot in &mut population {
            robot.pixels = vec![Pixel::empty(params.range); params.pixel_count];
        }
        Self {
            index: QuadTree::unit(config.max_leaves),
            params,
            population,
            config,
            updates: 0,
            paused: false,
            last_report: Instant::now(),
        }
    }

    /// Place every robot at a uniformly random pose.
    pub fn scatter<R: Rng>(&mut self, rng: &mut R) {
        let size = self.config.world_size;
        for robot in &mut self.population {
            let x = rng.gen_range(0.0..size);
            let y = rng.gen_range(0.0..size);
            let heading = angle_normalize(rng.gen_range(-PI..PI));
            robot.pose = Pose::new(x, y, heading);
        }
    }

    /// `scatter` driven by the configured seed.
    pub fn scatter_seeded(&mut self) {
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        self.scatter(&mut rng);
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn sensor_params(&self) -> &SensorParams {
        &self.params
    }

    pub fn population(&self) -> &[Robot] {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut [Robot] {
        &mut self.population
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.population.get(id.index())
    }

    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Run one tick.
    pub fn step<C: Controller + ?Sized>(&mut self, controller: &mut C) -> StepOutcome {
        if self.config.updates_max > 0 && self.updates > self.config.updates_max {
            return StepOutcome::Finished;
        }
        if self.paused {
            self.updates += 1;
            return StepOutcome::Paused;
        }

        let started = Instant::now();
        self.integrate();
        let (indexed, dropped) = self.rebuild_index();
        let tree = self.index.stats();
        let detections = self.sense_all();
        self.index.flush();

        for (i, robot) in self.population.iter_mut().enumerate() {
            controller.control(RobotId(i as u32), robot);
        }

        let stats = TickStats {
            tick: self.updates,
            indexed,
            dropped,
            detections,
            tree,
            step_ms: started.elapsed().as_secs_f64() * 1000.0,
        };
        self.report(&stats);
        self.updates += 1;
        StepOutcome::Ran(stats)
    }

    /// Advance every robot by its speed.
    pub fn integrate(&mut self) {
        let size = self.config.world_size;
        for robot in &mut self.population {
            robot.update_pose(size);
        }
    }

    /// Flush the index and insert every robot; returns `(indexed, dropped)`.
    pub fn rebuild_index(&mut self) -> (usize, usize) {
        self.index.flush();
        let size = self.config.world_size;
        let mut dropped = 0;
        for (i, robot) in self.population.iter().enumerate() {
            let id = RobotId(i as u32);
            if !self.index.insert(id, robot.pose.position() / size) {
                dropped += 1;
                debug!(
                    robot = id.0,
                    x = robot.pose.x,
                    y = robot.pose.y,
                    "robot not indexed this tick"
                );
            }
        }
        (self.population.len() - dropped, dropped)
    }

    /// Recompute every robot's pixels against the current index and return
    /// the number of non-empty pixels.
    ///
    /// Reads only the index and poses, so robots are sensed in parallel and
    /// written back afterwards.
    pub fn sense_all(&mut self) -> usize {
        let population = &self.population;
        let index = &self.index;
        let params = &self.params;
        let size = self.config.world_size;
        let sensed: Vec<Vec<Pixel>> = (0..population.len())
            .into_par_iter()
            .map(|i| sense(RobotId(i as u32), population, index, params, size))
            .collect();

        let mut detections = 0;
        for (robot, pixels) in self.population.iter_mut().zip(sensed) {
            detections += pixels.iter().filter(|p| p.robot.is_some()).count();
            robot.pixels = pixels;
        }
        detections
    }

    fn report(&mut self, stats: &TickStats) {
        let period = self.config.report_period;
        if period == 0 || stats.tick % period != 0 {
            return;
        }
        let seconds = self.last_report.elapsed().as_secs_f64();
        self.last_report = Instant::now();
        let fps = if seconds > 0.0 { period as f64 / seconds } else { 0.0 };
        info!(
            tick = stats.tick,
            fps,
            indexed = stats.indexed,
            dropped = stats.dropped,
            detections = stats.detections,
            nodes = stats.tree.nodes,
            "tick report"
        );
    }
}
