//! Borrowed view over the enemy roster used while towers and strikes act.

use led_defence_core::{EnemyId, EnemySnapshot, Event, Shooter, WorldPoint};
use led_defence_system_tower_combat::{DamageOrder, TowerCombat};
use led_defence_system_tower_targeting::{TargetProfile, TowerTargeting};
use tracing::trace;

use crate::{
    enemies::{self, Enemy},
    projectiles::{Flight, Projectile},
};

/// Enemies plus the pure systems that read them, borrowed for one phase.
pub(crate) struct Battlefield<'a> {
    pub(crate) enemies: &'a mut [Enemy],
    pub(crate) targeting: &'a mut TowerTargeting,
    pub(crate) combat: &'a mut TowerCombat,
}

impl Battlefield<'_> {
    pub(crate) fn furthest_along_path(&mut self, profile: TargetProfile) -> Option<EnemyId> {
        self.targeting
            .furthest_along_path(profile, self.enemies.iter().map(Enemy::snapshot))
    }

    pub(crate) fn nearest(&mut self, origin: WorldPoint, reach: f32) -> Option<EnemyId> {
        self.targeting
            .nearest(origin, reach, self.enemies.iter().map(Enemy::snapshot))
    }

    /// Fires a projectile. Hitscan shots resolve before this returns.
    pub(crate) fn launch(
        &mut self,
        projectiles: &mut Vec<Projectile>,
        mut projectile: Projectile,
        shooter: Shooter,
        out: &mut Vec<Event>,
    ) {
        out.push(Event::ProjectileFired {
            shooter,
            target: projectile.target(),
        });

        if projectile.is_hitscan() {
            let _ = self.resolve(&mut projectile, 0.0, shooter, out);
        } else {
            projectiles.push(projectile);
        }
    }

    /// Moves every projectile and drops the ones that hit or missed.
    pub(crate) fn fly(
        &mut self,
        projectiles: &mut Vec<Projectile>,
        shooter: Shooter,
        dt: f32,
        out: &mut Vec<Event>,
    ) {
        projectiles.retain_mut(|projectile| self.resolve(projectile, dt, shooter, out));
    }

    /// Advances one projectile and reports whether it is still in flight.
    fn resolve(
        &mut self,
        projectile: &mut Projectile,
        dt: f32,
        shooter: Shooter,
        out: &mut Vec<Event>,
    ) -> bool {
        let target = enemies::find(self.enemies, projectile.target()).map(Enemy::snapshot);
        match projectile.advance(dt, target) {
            Flight::InFlight => true,
            Flight::Arrived(target) => {
                self.impact(projectile, &target);
                out.push(Event::ProjectileHit {
                    shooter,
                    target: target.id,
                    damage: projectile.damage(),
                });
                false
            }
            Flight::Lost => {
                trace!(?shooter, target = projectile.target().get(), "projectile lost its target");
                out.push(Event::ProjectileMissed {
                    shooter,
                    target: projectile.target(),
                });
                false
            }
        }
    }

    fn impact(&mut self, projectile: &Projectile, target: &EnemySnapshot) {
        let orders = self.combat.plan_impact(
            target,
            projectile.damage(),
            projectile.splash_radius(),
            self.enemies.iter().map(Enemy::snapshot),
        );
        let kills = commit(self.enemies, orders);
        if kills > 0 {
            trace!(target = target.id.get(), kills, "impact was lethal");
        }
    }

    /// Detonates an explosion and returns how many enemies it struck.
    pub(crate) fn blast(&mut self, center: WorldPoint, damage: f32, radius: f32) -> u32 {
        let orders = self.combat.plan_blast(
            center,
            damage,
            radius,
            self.enemies.iter().map(Enemy::snapshot),
        );
        let kills = commit(self.enemies, orders);
        let struck = u32::try_from(orders.len()).unwrap_or(u32::MAX);
        trace!(x = center.x(), y = center.y(), struck, kills, "blast detonated");
        struck
    }
}

/// Applies damage orders and returns how many of them were lethal.
fn commit(roster: &mut [Enemy], orders: &[DamageOrder]) -> usize {
    let mut kills = 0;
    for order in orders {
        if let Some(enemy) = enemies::find_mut(roster, order.enemy) {
            if enemy.take_damage(order.amount) {
                kills += 1;
            }
        }
    }
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use led_defence_core::{EnemyKind, Path};

    #[test]
    fn commit_counts_only_lethal_hits() {
        let path = Path::new(vec![WorldPoint::new(63.0, 16.0), WorldPoint::new(0.0, 16.0)]);
        let mut roster = vec![
            Enemy::at_path_start(EnemyId::new(0), EnemyKind::Scout, &path),
            Enemy::at_path_start(EnemyId::new(1), EnemyKind::Tank, &path),
        ];
        let orders = [
            DamageOrder {
                enemy: EnemyId::new(0),
                amount: 4.0,
            },
            DamageOrder {
                enemy: EnemyId::new(1),
                amount: 4.0,
            },
            DamageOrder {
                enemy: EnemyId::new(7),
                amount: 4.0,
            },
        ];

        assert_eq!(commit(&mut roster, &orders), 1);
        assert!(!roster[0].is_alive());
        assert_eq!(roster[1].snapshot().health, 6.0);
        assert_eq!(commit(&mut roster, &orders[..1]), 0);
    }
}
