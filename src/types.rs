use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geom::Coord;

/// Handle to a robot: its index in the population slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RobotId(pub u32);

impl RobotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position and heading (radians, normalized to `(-pi, pi]`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    pub fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Per-tick velocity: forward distance and heading change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub forward: f64,
    pub turn: f64,
}

/// One angular slice of a robot's sensor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel {
    /// Distance to the nearest detection, or the sensor range when empty.
    pub range: f64,
    /// Nearest robot seen in this slice.
    pub robot: Option<RobotId>,
}

impl Pixel {
    pub fn empty(range: f64) -> Self {
        Self { range, robot: None }
    }
}

/// A point agent with a bearing sensor.
#[derive(Clone, Debug)]
pub struct Robot {
    pub pose: Pose,
    pub speed: Speed,
    pub color: [u8; 3],
    pub pixels: Vec<Pixel>,
}

impl Robot {
    /// Robot at the origin, stationary, with `pixel_count` empty pixels.
    pub fn new(pixel_count: usize, range: f64) -> Self {
        Self {
            pose: Pose::default(),
            speed: Speed::default(),
            color: [128, 0, 0],
            pixels: vec![Pixel::empty(range); pixel_count],
        }
    }

    /// One Euler step; position wraps into `[0, world_size)`.
    pub fn update_pose(&mut self, world_size: f64) {
        let (sin, cos) = self.pose.heading.sin_cos();
        self.pose.x = distance_normalize(self.pose.x + self.speed.forward * cos, world_size);
        self.pose.y = distance_normalize(self.pose.y + self.speed.forward * sin, world_size);
        self.pose.heading = angle_normalize(self.pose.heading + self.speed.turn);
    }

    /// Pixels that currently see another robot.
    pub fn detections(&self) -> impl Iterator<Item = (usize, &Pixel)> {
        self.pixels.iter().enumerate().filter(|(_, p)| p.robot.is_some())
    }
}

/// Wrap an angle into `(-pi, pi]`.
pub fn angle_normalize(a: f64) -> f64 {
    let mut a = a % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Wrap a coordinate into `[0, world_size)`.
pub fn distance_normalize(d: f64, world_size: f64) -> f64 {
    let wrapped = d.rem_euclid(world_size);
    // rem_euclid can round up to exactly world_size for tiny negative inputs
    if wrapped >= world_size { 0.0 } else { wrapped }
}

/// Shortest signed displacement along one axis of a torus.
pub fn wrap_delta(delta: f64, world_size: f64) -> f64 {
    let half = world_size * 0.5;
    if delta > half {
        delta - world_size
    } else if delta < -half {
        delta + world_size
    } else {
        delta
    }
}

/// Shape summary of a quadtree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total nodes, root included.
    pub nodes: usize,
    /// Nodes without children.
    pub leaf_nodes: usize,
    /// Robot handles stored across all nodes.
    pub robots: usize,
    /// Depth of the deepest node (root = 0).
    pub max_depth: usize,
}

/// Counters for one completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    /// Robots accepted by the index.
    pub indexed: usize,
    /// Robots the index rejected this tick (not sensed by anyone).
    pub dropped: usize,
    /// Non-empty pixels across the population.
    pub detections: usize,
    pub tree: TreeStats,
    pub step_ms: f64,
}

/// Result of asking the driver for one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Ran(TickStats),
    Paused,
    /// `updates_max` reached; the caller should stop stepping.
    Finished,
}
