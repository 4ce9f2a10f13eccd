#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which invisible enemies radar towers reveal.
//!
//! Detection has two sources. Range coverage reveals every invisible enemy
//! inside a radar's radius and is recomputed from scratch every tick. The
//! rotating sweep additionally stamps a short reveal timer on enemies the
//! beam passes over, which keeps them visible briefly after they leave
//! coverage.

use std::f32::consts::TAU;

use led_defence_core::{angular_distance, EnemyId, EnemySnapshot, WorldPoint};

/// Half-width of the sweep beam in radians; offsets must be strictly smaller.
pub const SWEEP_HALF_WIDTH: f32 = 0.3;

/// Seconds an enemy stays revealed after the sweep passes over it.
pub const REVEAL_DURATION: f32 = 0.5;

/// Advances a sweep angle, wrapping it back into `[0, 2π)`.
#[must_use]
pub fn advance_sweep(angle: f32, rate: f32, dt: f32) -> f32 {
    (angle + rate * dt).rem_euclid(TAU)
}

/// Position and reach of a single radar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadarProfile {
    /// Centre of the radar.
    pub origin: WorldPoint,
    /// Detection radius, inclusive.
    pub range: f32,
    /// Current beam angle in radians.
    pub sweep_angle: f32,
}

impl RadarProfile {
    fn covers(&self, enemy: &EnemySnapshot) -> bool {
        enemy.alive
            && enemy.kind.is_invisible()
            && self.origin.distance(enemy.position) <= self.range
    }
}

/// Detection system that reuses its output buffer across ticks.
#[derive(Debug, Default)]
pub struct Detection {
    revealed: Vec<EnemyId>,
}

impl Detection {
    /// Creates a new detection system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists invisible enemies inside the range of at least one radar.
    pub fn coverage<I>(&mut self, radars: &[RadarProfile], enemies: I) -> &[EnemyId]
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.revealed.clear();
        if radars.is_empty() {
            return &self.revealed;
        }

        for enemy in enemies {
            if radars.iter().any(|radar| radar.covers(&enemy)) {
                self.revealed.push(enemy.id);
            }
        }

        &self.revealed
    }

    /// Lists invisible enemies in range that the radar's beam currently crosses.
    pub fn sweep<I>(&mut self, radar: RadarProfile, enemies: I) -> &[EnemyId]
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.revealed.clear();

        for enemy in enemies {
            if !radar.covers(&enemy) {
                continue;
            }

            let bearing = radar.origin.bearing_to(enemy.position);
            if angular_distance(bearing, radar.sweep_angle) < SWEEP_HALF_WIDTH {
                self.revealed.push(enemy.id);
            }
        }

        &self.revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use led_defence_core::EnemyKind;

    fn enemy(id: u32, kind: EnemyKind, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind,
            position: WorldPoint::new(x, y),
            health: kind.stats().health,
            path_progress: 0.0,
            alive: true,
            revealed: false,
        }
    }

    fn radar(sweep_angle: f32) -> RadarProfile {
        RadarProfile {
            origin: WorldPoint::new(0.0, 0.0),
            range: 22.0,
            sweep_angle,
        }
    }

    #[test]
    fn sweep_wraps_after_full_revolution() {
        let angle = advance_sweep(TAU - 0.1, 2.0, 0.1);
        assert!((angle - 0.1).abs() < 1e-4);
        assert!(advance_sweep(0.0, 2.0, 0.5) < TAU);
    }

    #[test]
    fn coverage_includes_boundary_and_skips_visible_kinds() {
        let mut detection = Detection::new();
        let enemies = vec![
            enemy(1, EnemyKind::Ghost, 22.0, 0.0),
            enemy(2, EnemyKind::Ghost, 22.5, 0.0),
            enemy(3, EnemyKind::Scout, 1.0, 0.0),
        ];

        let revealed = detection.coverage(&[radar(0.0)], enemies);

        assert_eq!(revealed, &[EnemyId::new(1)]);
    }

    #[test]
    fn coverage_without_radars_reveals_nothing() {
        let mut detection = Detection::new();
        let revealed = detection.coverage(&[], vec![enemy(1, EnemyKind::Ghost, 0.0, 0.0)]);
        assert!(revealed.is_empty());
    }

    #[test]
    fn sweep_reveals_only_inside_the_beam() {
        let mut detection = Detection::new();
        let enemies = vec![
            enemy(1, EnemyKind::Ghost, 10.0, 0.0),
            enemy(2, EnemyKind::Ghost, 0.0, 10.0),
        ];

        let revealed = detection.sweep(radar(0.1), enemies);

        assert_eq!(revealed, &[EnemyId::new(1)]);
    }

    #[test]
    fn sweep_misses_enemies_beside_the_beam() {
        let mut detection = Detection::new();
        let enemies = vec![enemy(1, EnemyKind::Ghost, 10.0, 0.0)];

        let revealed = detection.sweep(radar(0.35), enemies);

        assert!(revealed.is_empty());
    }

    #[test]
    fn dead_enemies_are_ignored() {
        let mut detection = Detection::new();
        let mut ghost = enemy(1, EnemyKind::Ghost, 5.0, 0.0);
        ghost.alive = false;

        assert!(detection.coverage(&[radar(0.0)], vec![ghost]).is_empty());
    }
}
