#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns impacts and explosions into damage orders.
//!
//! The world resolves projectiles and bombs; this crate decides who is hurt
//! and by how much so the world can commit the damage after iterating.

use led_defence_core::{EnemyId, EnemySnapshot, WorldPoint};

/// Fraction of a projectile's damage dealt to bystanders inside its splash.
pub const SPLASH_FALLOFF: f32 = 0.5;

/// Damage the world must apply to a single enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOrder {
    /// Enemy receiving the damage.
    pub enemy: EnemyId,
    /// Amount of health to remove.
    pub amount: f32,
}

/// Tower combat system that reuses its order buffer between impacts.
#[derive(Debug, Default)]
pub struct TowerCombat {
    orders: Vec<DamageOrder>,
}

impl TowerCombat {
    /// Creates a new tower combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the damage of a projectile striking `target`.
    ///
    /// The target always receives full damage. When `splash_radius` is
    /// positive, every other alive enemy within that radius of the target's
    /// position receives half damage.
    pub fn plan_impact<I>(
        &mut self,
        target: &EnemySnapshot,
        damage: f32,
        splash_radius: f32,
        enemies: I,
    ) -> &[DamageOrder]
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.orders.clear();
        self.orders.push(DamageOrder {
            enemy: target.id,
            amount: damage,
        });

        if splash_radius <= 0.0 {
            return &self.orders;
        }

        let splash = damage * SPLASH_FALLOFF;
        for enemy in enemies {
            if enemy.id == target.id || !enemy.alive {
                continue;
            }

            if target.position.distance(enemy.position) <= splash_radius {
                self.orders.push(DamageOrder {
                    enemy: enemy.id,
                    amount: splash,
                });
            }
        }

        &self.orders
    }

    /// Plans an explosion dealing full damage to every alive enemy in radius.
    pub fn plan_blast<I>(
        &mut self,
        center: WorldPoint,
        damage: f32,
        radius: f32,
        enemies: I,
    ) -> &[DamageOrder]
    where
        I: IntoIterator<Item = EnemySnapshot>,
    {
        self.orders.clear();
        for enemy in enemies {
            if enemy.alive && center.distance(enemy.position) <= radius {
                self.orders.push(DamageOrder {
                    enemy: enemy.id,
                    amount: damage,
                });
            }
        }

        &self.orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use led_defence_core::EnemyKind;

    fn enemy(id: u32, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Tank,
            position: WorldPoint::new(x, y),
            health: 10.0,
            path_progress: 0.0,
            alive: true,
            revealed: false,
        }
    }

    fn order(id: u32, amount: f32) -> DamageOrder {
        DamageOrder {
            enemy: EnemyId::new(id),
            amount,
        }
    }

    #[test]
    fn splash_hits_full_half_and_nothing() {
        let mut combat = TowerCombat::new();
        let target = enemy(1, 10.0, 10.0);
        let enemies = vec![target, enemy(2, 12.0, 10.0), enemy(3, 14.0, 10.0)];

        let orders = combat.plan_impact(&target, 2.0, 3.0, enemies);

        assert_eq!(orders, &[order(1, 2.0), order(2, 1.0)]);
    }

    #[test]
    fn splash_radius_is_inclusive() {
        let mut combat = TowerCombat::new();
        let target = enemy(1, 0.0, 0.0);
        let enemies = vec![target, enemy(2, 0.0, 3.0)];

        let orders = combat.plan_impact(&target, 2.0, 3.0, enemies);

        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn zero_splash_only_hurts_target() {
        let mut combat = TowerCombat::new();
        let target = enemy(1, 0.0, 0.0);
        let enemies = vec![target, enemy(2, 0.5, 0.0)];

        let orders = combat.plan_impact(&target, 1.0, 0.0, enemies);

        assert_eq!(orders, &[order(1, 1.0)]);
    }

    #[test]
    fn dead_bystanders_are_spared() {
        let mut combat = TowerCombat::new();
        let target = enemy(1, 0.0, 0.0);
        let mut corpse = enemy(2, 1.0, 0.0);
        corpse.alive = false;

        let orders = combat.plan_impact(&target, 2.0, 3.0, vec![target, corpse]);

        assert_eq!(orders, &[order(1, 2.0)]);
    }

    #[test]
    fn blast_deals_full_damage_in_radius() {
        let mut combat = TowerCombat::new();
        let enemies = vec![enemy(1, 0.0, 0.0), enemy(2, 4.0, 0.0), enemy(3, 4.1, 0.0)];

        let orders = combat.plan_blast(WorldPoint::new(0.0, 0.0), 4.0, 4.0, enemies);

        assert_eq!(orders, &[order(1, 4.0), order(2, 4.0)]);
    }
}
