//! Homing projectiles fired by towers and gunships.

use led_defence_core::{EnemyId, EnemySnapshot, ProjectileSnapshot, Shooter, WorldPoint};

/// Outcome of moving a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Still travelling toward the target.
    InFlight,
    /// Reached the target, which was alive at impact.
    Arrived(EnemySnapshot),
    /// The target died or left the field before impact.
    Lost,
}

/// Projectile homing on a single enemy.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Projectile {
    position: WorldPoint,
    target: EnemyId,
    damage: f32,
    speed: f32,
    splash_radius: f32,
}

impl Projectile {
    pub(crate) fn launch(
        from: WorldPoint,
        target: EnemyId,
        damage: f32,
        speed: f32,
        splash_radius: f32,
    ) -> Self {
        Self {
            position: from,
            target,
            damage,
            speed,
            splash_radius,
        }
    }

    /// Homes on the target's current position.
    ///
    /// A zero speed resolves on the first call. Otherwise the projectile
    /// lands on the target once the remaining distance fits in this tick's
    /// travel budget.
    pub(crate) fn advance(&mut self, dt: f32, target: Option<EnemySnapshot>) -> Flight {
        let target = match target {
            Some(target) if target.alive => target,
            _ => return Flight::Lost,
        };

        if self.speed <= 0.0 {
            self.position = target.position;
            return Flight::Arrived(target);
        }

        let distance = self.position.distance(target.position);
        let budget = self.speed * dt;
        if distance == 0.0 || distance <= budget {
            self.position = target.position;
            return Flight::Arrived(target);
        }

        self.position = self.position.step_toward(target.position, budget);
        Flight::InFlight
    }

    pub(crate) fn is_hitscan(&self) -> bool {
        self.speed <= 0.0
    }

    pub(crate) fn target(&self) -> EnemyId {
        self.target
    }

    pub(crate) fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) fn splash_radius(&self) -> f32 {
        self.splash_radius
    }

    pub(crate) fn snapshot(&self, shooter: Shooter) -> ProjectileSnapshot {
        ProjectileSnapshot {
            shooter,
            position: self.position,
            target: self.target,
        }
    }
}
