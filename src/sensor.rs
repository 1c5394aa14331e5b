use serde::{Deserialize, Serialize};

use crate::api::SpatialIndexApi;
use crate::geom::Bounds;
use crate::types::*;

/// Sensor geometry shared by every robot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorParams {
    /// Number of angular pixels.
    pub pixel_count: usize,
    /// Field of view in radians, centered on the heading.
    pub fov: f64,
    /// Maximum detection distance in world units.
    pub range: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self { pixel_count: 8, fov: 270f64.to_radians(), range: 0.1 }
    }
}

impl SensorParams {
    pub fn radians_per_pixel(&self) -> f64 {
        self.fov / self.pixel_count as f64
    }

    /// Pixel index for a bearing relative to the heading, or `None` when the
    /// bearing is outside the field of view.
    pub fn pixel_for(&self, relative_bearing: f64) -> Option<usize> {
        if self.pixel_count == 0 || relative_bearing.abs() > self.fov / 2.0 {
            return None;
        }
        let n = self.pixel_count as i64;
        let slot = (relative_bearing / self.radians_per_pixel()).floor() as i64 + n / 2;
        Some(slot.rem_euclid(n) as usize)
    }

    /// Angular span `(start, end)` of pixel `index`, relative to the heading.
    ///
    /// Uses the same offset as `pixel_for`. With an odd pixel count the
    /// spans are shifted by half a pixel: the last pixel is clipped at
    /// `fov / 2` and also receives the half-pixel sliver just above
    /// `-fov / 2`, which is not part of the returned span.
    pub fn wedge(&self, index: usize) -> (f64, f64) {
        let rpp = self.radians_per_pixel();
        let half = self.fov / 2.0;
        let offset = index as i64 - (self.pixel_count / 2) as i64;
        let start = (offset as f64 * rpp).clamp(-half, half);
        let end = ((offset + 1) as f64 * rpp).clamp(-half, half);
        (start, end)
    }
}

/// Recompute `pixels` for the robot `observer` from scratch.
///
/// `index` covers the unit square; positions are scaled by `world_size`
/// before querying. Each pixel ends up holding the nearest robot seen in its
/// slice, or `(range, None)`.
pub fn update_pixels<I: SpatialIndexApi + ?Sized>(
    observer: RobotId,
    population: &[Robot],
    index: &I,
    params: &SensorParams,
    world_size: f64,
    pixels: &mut Vec<Pixel>,
) {
    pixels.clear();
    pixels.resize(params.pixel_count, Pixel::empty(params.range));

    let Some(me) = population.get(observer.index()) else { return };
    let pose = me.pose;
    let query = Bounds::around(pose.position() / world_size, params.range / world_size);

    for id in index.find_in_range(&query) {
        if id == observer {
            continue;
        }
        let Some(other) = population.get(id.index()) else { continue };

        // cheap per-axis rejection before the hypot
        let dx = wrap_delta(other.pose.x - pose.x, world_size);
        if dx.abs() > params.range {
            continue;
        }
        let dy = wrap_delta(other.pose.y - pose.y, world_size);
        if dy.abs() > params.range {
            continue;
        }
        let range = dx.hypot(dy);
        if range > params.range {
            continue;
        }

        let relative = angle_normalize(dy.atan2(dx) - pose.heading);
        let Some(slot) = params.pixel_for(relative) else { continue };

        let pixel = &mut pixels[slot];
        if pixel.range < range {
            continue;
        }
        *pixel = Pixel { range, robot: Some(id) };
    }
}

/// Convenience wrapper returning a fresh pixel array.
pub fn sense<I: SpatialIndexApi + ?Sized>(
    observer: RobotId,
    population: &[Robot],
    index: &I,
    params: &SensorParams,
    world_size: f64,
) -> Vec<Pixel> {
    let mut pixels = Vec::with_capacity(params.pixel_count);
    update_pixels(observer, population, index, params, world_size, &mut pixels);
    pixels
}
