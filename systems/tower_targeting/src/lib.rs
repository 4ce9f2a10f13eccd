#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects targets for towers and strafing gunships.

use led_defence_core::{EnemyId, EnemySnapshot, WorldPoint};

/// Position and abilities of an entity looking for a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProfile {
    /// Centre the range is measured from.
    pub origin: WorldPoint,
    /// Targeting radius, inclusive.
    pub range: f32,
    /// Whether the entity sees invisible enemies without help.
    pub sees_invisible: bool,
}

/// Tower targeting system that reuses its candidate buffer between queries.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the enemy that has walked furthest along the path.
    ///
    /// Only alive enemies within range that the profile can see qualify.
    /// Progress must be strictly greater to replace the current best, so the
    /// first enemy in iteration order wins ties.
    pub fn furthest_along_path<I>(&mut self, profile: TargetProfile, enemies: I) -> Option<EnemyId>
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.collect(enemies, |enemy| {
            enemy.visible_to(profile.sees_invisible)
                && profile.origin.distance(enemy.position) <= profile.range
        });

        let mut best: Option<&Candidate> = None;
        for candidate in &self.candidates {
            match best {
                Some(current) if candidate.path_progress <= current.path_progress => {}
                _ => best = Some(candidate),
            }
        }

        best.map(|candidate| candidate.id)
    }

    /// Selects the closest alive enemy strictly within `reach` of `origin`.
    ///
    /// Visibility is not considered; the first enemy in iteration order wins
    /// ties.
    pub fn nearest<I>(&mut self, origin: WorldPoint, reach: f32, enemies: I) -> Option<EnemyId>
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.collect(enemies, |enemy| origin.distance(enemy.position) < reach);

        let mut best: Option<(EnemyId, f32)> = None;
        for candidate in &self.candidates {
            let distance = origin.distance(candidate.position);
            match best {
                Some((_, closest)) if distance >= closest => {}
                _ => best = Some((candidate.id, distance)),
            }
        }

        best.map(|(id, _)| id)
    }

    fn collect<I, F>(&mut self, enemies: I, qualifies: F)
    where
        I: IntoIterator<Item = EnemySnapshot>,
        F: Fn(&EnemySnapshot) -> bool,
    {
        self.candidates.clear();
        for enemy in enemies {
            if enemy.alive && qualifies(&enemy) {
                self.candidates.push(Candidate {
                    id: enemy.id,
                    position: enemy.position,
                    path_progress: enemy.path_progress,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EnemyId,
    position: WorldPoint,
    path_progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use led_defence_core::EnemyKind;

    fn enemy(id: u32, kind: EnemyKind, x: f32, progress: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind,
            position: WorldPoint::new(x, 0.0),
            health: kind.stats().health,
            path_progress: progress,
            alive: true,
            revealed: false,
        }
    }

    fn machine_gun() -> TargetProfile {
        TargetProfile {
            origin: WorldPoint::new(0.0, 0.0),
            range: 14.0,
            sees_invisible: false,
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut targeting = TowerTargeting::new();

        let on_edge = targeting.furthest_along_path(
            machine_gun(),
            vec![enemy(1, EnemyKind::Scout, 14.0, 0.0)],
        );
        let beyond = targeting.furthest_along_path(
            machine_gun(),
            vec![enemy(2, EnemyKind::Scout, 14.0001, 0.0)],
        );

        assert_eq!(on_edge, Some(EnemyId::new(1)));
        assert_eq!(beyond, None);
    }

    #[test]
    fn prefers_greatest_progress_and_first_on_ties() {
        let mut targeting = TowerTargeting::new();
        let enemies = vec![
            enemy(1, EnemyKind::Scout, 2.0, 10.0),
            enemy(2, EnemyKind::Tank, 3.0, 25.0),
            enemy(3, EnemyKind::Scout, 4.0, 25.0),
        ];

        let target = targeting.furthest_along_path(machine_gun(), enemies);

        assert_eq!(target, Some(EnemyId::new(2)));
    }

    #[test]
    fn hidden_ghosts_are_skipped_unless_detected() {
        let mut targeting = TowerTargeting::new();
        let hidden = enemy(1, EnemyKind::Ghost, 2.0, 50.0);
        let mut revealed = hidden;
        revealed.revealed = true;
        let sniper = TargetProfile {
            sees_invisible: true,
            ..machine_gun()
        };

        assert_eq!(targeting.furthest_along_path(machine_gun(), vec![hidden]), None);
        assert_eq!(
            targeting.furthest_along_path(machine_gun(), vec![revealed]),
            Some(EnemyId::new(1))
        );
        assert_eq!(
            targeting.furthest_along_path(sniper, vec![hidden]),
            Some(EnemyId::new(1))
        );
    }

    #[test]
    fn dead_enemies_are_never_targeted() {
        let mut targeting = TowerTargeting::new();
        let mut corpse = enemy(1, EnemyKind::Scout, 1.0, 99.0);
        corpse.alive = false;

        assert_eq!(targeting.furthest_along_path(machine_gun(), vec![corpse]), None);
        assert_eq!(
            targeting.nearest(WorldPoint::new(0.0, 0.0), 21.0, vec![corpse]),
            None
        );
    }

    #[test]
    fn nearest_uses_strict_reach_and_ignores_invisibility() {
        let mut targeting = TowerTargeting::new();
        let origin = WorldPoint::new(0.0, 0.0);
        let enemies = vec![
            enemy(1, EnemyKind::Scout, 21.0, 0.0),
            enemy(2, EnemyKind::Ghost, 8.0, 0.0),
            enemy(3, EnemyKind::Tank, 5.0, 0.0),
        ];

        assert_eq!(
            targeting.nearest(origin, 21.0, enemies.clone()),
            Some(EnemyId::new(3))
        );
        assert_eq!(
            targeting.nearest(origin, 21.0, vec![enemies[0]]),
            None
        );
        assert_eq!(
            targeting.nearest(origin, 21.0, vec![enemies[1]]),
            Some(EnemyId::new(2))
        );
    }
}
