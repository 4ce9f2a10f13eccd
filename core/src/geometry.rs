//! Continuous display-space geometry shared by the simulation and its adapters.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Position on the display measured in pixels.
///
/// The x axis grows to the right and the y axis grows downward, matching the
/// row-major layout of LED matrix panels. Serialised as an `[x, y]` pair so
/// map files can list waypoints compactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Returns the point translated by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Moves up to `step` units toward `target`.
    ///
    /// Lands exactly on `target` when it lies within `step`, so callers never
    /// overshoot the point they are homing on.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, step: f32) -> Self {
        let distance = self.distance(target);
        if distance <= step || distance == 0.0 {
            return target;
        }

        let scale = step / distance;
        Self::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }

    /// Bearing from this point to `other` in radians, normalised into `[0, 2π)`.
    #[must_use]
    pub fn bearing_to(self, other: WorldPoint) -> f32 {
        let angle = (other.y - self.y).atan2(other.x - self.x);
        if angle < 0.0 {
            angle + TAU
        } else {
            angle
        }
    }

    /// Pixel containing the point, truncating toward zero.
    #[must_use]
    pub fn pixel(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

impl From<(f32, f32)> for WorldPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<WorldPoint> for (f32, f32) {
    fn from(point: WorldPoint) -> Self {
        (point.x, point.y)
    }
}

/// Smallest absolute difference between two angles expressed in `[0, 2π)`.
#[must_use]
pub fn angular_distance(first: f32, second: f32) -> f32 {
    let difference = (first - second).abs();
    if difference > std::f32::consts::PI {
        TAU - difference
    } else {
        difference
    }
}

/// Ordered waypoint sequence walked by enemies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<WorldPoint>,
}

impl Path {
    /// Creates a path from its waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<WorldPoint>) -> Self {
        Self { waypoints }
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Waypoint at the provided index, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<WorldPoint> {
        self.waypoints.get(index).copied()
    }

    /// First waypoint, where freshly spawned enemies appear.
    #[must_use]
    pub fn start(&self) -> Option<WorldPoint> {
        self.waypoints.first().copied()
    }

    /// Index of the exit waypoint. Empty paths report zero.
    #[must_use]
    pub fn final_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Length of the segment leaving waypoint `index`, or zero past the end.
    #[must_use]
    pub fn segment_length(&self, index: usize) -> f32 {
        match (self.waypoint(index), self.waypoint(index + 1)) {
            (Some(from), Some(to)) => from.distance(to),
            _ => 0.0,
        }
    }

    /// Total walking distance from the first to the last waypoint.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        (0..self.final_index())
            .map(|index| self.segment_length(index))
            .sum()
    }

    /// Index of the waypoint closest to `point`; the earliest wins ties.
    #[must_use]
    pub fn nearest_waypoint(&self, point: WorldPoint) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            let distance = waypoint.distance(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Waypoint index an entity placed at `point` should resume walking from.
    ///
    /// The entity is assumed to sit on the segment that ends at the nearest
    /// waypoint, so it resumes from the waypoint before that one.
    #[must_use]
    pub fn resume_index(&self, point: WorldPoint) -> usize {
        self.nearest_waypoint(point)
            .map_or(0, |index| index.saturating_sub(1))
    }

    /// Distance walked by an entity at `point` that last passed waypoint `index`.
    #[must_use]
    pub fn progress_at(&self, index: usize, point: WorldPoint) -> f32 {
        let completed: f32 = (0..index.min(self.final_index()))
            .map(|segment| self.segment_length(segment))
            .sum();
        let partial = self
            .waypoint(index)
            .map_or(0.0, |waypoint| waypoint.distance(point));
        completed + partial
    }

    /// Mean vertical coordinate across all waypoints.
    #[must_use]
    pub fn mean_y(&self) -> Option<f32> {
        if self.waypoints.is_empty() {
            return None;
        }

        let sum: f32 = self.waypoints.iter().map(WorldPoint::y).sum();
        Some(sum / self.waypoints.len() as f32)
    }
}

/// Rasterises the segment between two pixels with Bresenham's algorithm.
///
/// Both endpoints are included; a degenerate segment yields a single pixel.
#[must_use]
pub fn rasterize_line(from: (i32, i32), to: (i32, i32)) -> LineRaster {
    let dx = (to.0 - from.0).abs();
    let dy = (to.1 - from.1).abs();
    LineRaster {
        x: from.0,
        y: from.1,
        end_x: to.0,
        end_y: to.1,
        dx,
        dy,
        step_x: if from.0 < to.0 { 1 } else { -1 },
        step_y: if from.1 < to.1 { 1 } else { -1 },
        error: dx - dy,
        finished: false,
    }
}

/// Iterator over the pixels of a rasterised line.
#[derive(Clone, Debug)]
pub struct LineRaster {
    x: i32,
    y: i32,
    end_x: i32,
    end_y: i32,
    dx: i32,
    dy: i32,
    step_x: i32,
    step_y: i32,
    error: i32,
    finished: bool,
}

impl Iterator for LineRaster {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let current = (self.x, self.y);
        if self.x == self.end_x && self.y == self.end_y {
            self.finished = true;
            return Some(current);
        }

        let doubled = self.error * 2;
        if doubled > -self.dy {
            self.error -= self.dy;
            self.x += self.step_x;
        }
        if doubled < self.dx {
            self.error += self.dx;
            self.y += self.step_y;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest_path() -> Path {
        Path::new(vec![
            WorldPoint::new(63.0, 15.0),
            WorldPoint::new(50.0, 15.0),
            WorldPoint::new(50.0, 25.0),
            WorldPoint::new(30.0, 25.0),
        ])
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = WorldPoint::new(1.0, 1.0);
        let destination = WorldPoint::new(4.0, 5.0);
        assert!((origin.distance(destination) - 5.0).abs() < f32::EPSILON);
        assert!((origin.distance_squared(destination) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn step_toward_never_overshoots() {
        let start = WorldPoint::new(0.0, 0.0);
        let target = WorldPoint::new(3.0, 0.0);
        assert_eq!(start.step_toward(target, 1.0), WorldPoint::new(1.0, 0.0));
        assert_eq!(start.step_toward(target, 10.0), target);
    }

    #[test]
    fn bearing_is_normalised() {
        let origin = WorldPoint::new(0.0, 0.0);
        let above = WorldPoint::new(0.0, -1.0);
        let bearing = origin.bearing_to(above);
        assert!((bearing - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn angular_distance_wraps_around_full_turn() {
        let near_zero = 0.1;
        let near_full_turn = TAU - 0.1;
        assert!((angular_distance(near_zero, near_full_turn) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn path_lengths_accumulate_segments() {
        let path = forest_path();
        assert_eq!(path.final_index(), 3);
        assert!((path.segment_length(0) - 13.0).abs() < f32::EPSILON);
        assert!((path.total_length() - 43.0).abs() < f32::EPSILON);
        assert_eq!(path.segment_length(3), 0.0);
    }

    #[test]
    fn resume_index_steps_back_from_nearest_waypoint() {
        let path = forest_path();
        let point = WorldPoint::new(35.0, 25.0);
        assert_eq!(path.nearest_waypoint(point), Some(3));
        assert_eq!(path.resume_index(point), 2);
        let progress = path.progress_at(2, point);
        assert!((progress - 38.0).abs() < 1e-4);
    }

    #[test]
    fn empty_path_is_harmless() {
        let path = Path::default();
        assert_eq!(path.start(), None);
        assert_eq!(path.final_index(), 0);
        assert_eq!(path.resume_index(WorldPoint::new(1.0, 1.0)), 0);
        assert_eq!(path.mean_y(), None);
        assert_eq!(path.total_length(), 0.0);
    }

    #[test]
    fn line_raster_includes_both_endpoints() {
        let pixels: Vec<_> = rasterize_line((0, 0), (3, 1)).collect();
        assert_eq!(pixels.first(), Some(&(0, 0)));
        assert_eq!(pixels.last(), Some(&(3, 1)));
        assert_eq!(pixels.len(), 4);
    }

    #[test]
    fn degenerate_line_yields_single_pixel() {
        let pixels: Vec<_> = rasterize_line((5, 5), (5, 5)).collect();
        assert_eq!(pixels, vec![(5, 5)]);
    }

    #[test]
    fn points_deserialize_from_pairs() {
        let point: WorldPoint = serde_json::from_str("[63, 15]").expect("valid pair");
        assert_eq!(point, WorldPoint::new(63.0, 15.0));
    }
}
