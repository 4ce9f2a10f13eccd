//! Air strikes crossing the display from right to left.

use led_defence_core::{
    AbilityKind, BombSnapshot, Cooldown, Event, ProjectileSnapshot, Shooter, StrikeId,
    StrikeSnapshot, WorldPoint,
};
use tracing::debug;

use crate::{battlefield::Battlefield, projectiles::Projectile};

/// Distance past the right edge where strikes enter.
const ENTRY_MARGIN: f32 = 5.0;

const HELICOPTER_ALTITUDE: f32 = 5.0;
const HELICOPTER_SPEED: f32 = 8.0;
const HELICOPTER_EXIT_X: f32 = -5.0;
const HELICOPTER_FIRE_PERIOD: f32 = 0.3;
/// Gunners engage enemies strictly closer than one pixel past this reach.
const HELICOPTER_REACH: f32 = 20.0;
const HELICOPTER_MUZZLE_DROP: f32 = 2.0;
const BULLET_DAMAGE: f32 = 2.0;
const BULLET_SPEED: f32 = 60.0;

const BOMBER_ALTITUDE: f32 = 8.0;
const BOMBER_SPEED: f32 = 12.0;
const BOMBER_EXIT_X: f32 = -10.0;
const BOMBER_DROP_PERIOD: f32 = 0.8;
const BOMB_HATCH_DROP: f32 = 3.0;
const BOMB_DAMAGE: f32 = 4.0;
const BOMB_BLAST_RADIUS: f32 = 4.0;
const BOMB_FALL_SPEED: f32 = 15.0;
/// Bombs detonate this far below the bomber's target altitude.
const BOMB_TRIGGER_MARGIN: f32 = 2.0;
const EXPLOSION_DURATION: f32 = 0.15;

/// Parameters fixed when a strike is launched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Launch {
    /// Width of the display in pixels.
    pub(crate) display_width: f32,
    /// Altitude bombers aim their bombs at.
    pub(crate) target_altitude: f32,
}

/// Strike launched by an ability and still on the display.
#[derive(Clone, Debug)]
pub(crate) struct ActiveStrike {
    pub(crate) id: StrikeId,
    pub(crate) run: StrikeRun,
}

/// Vehicle-specific state of a strike.
#[derive(Clone, Debug)]
pub(crate) enum StrikeRun {
    Helicopter(HelicopterRun),
    Bomber(BomberRun),
}

impl ActiveStrike {
    pub(crate) fn launch(id: StrikeId, kind: AbilityKind, launch: Launch) -> Self {
        let entry_x = launch.display_width + ENTRY_MARGIN;
        let run = match kind {
            AbilityKind::Helicopter => StrikeRun::Helicopter(HelicopterRun {
                position: WorldPoint::new(entry_x, HELICOPTER_ALTITUDE),
                fire: Cooldown::new(HELICOPTER_FIRE_PERIOD),
                projectiles: Vec::new(),
            }),
            AbilityKind::Bomber => StrikeRun::Bomber(BomberRun {
                position: WorldPoint::new(entry_x, BOMBER_ALTITUDE),
                drop: Cooldown::new(BOMBER_DROP_PERIOD),
                bombs: Vec::new(),
                trigger_altitude: launch.target_altitude + BOMB_TRIGGER_MARGIN,
            }),
        };
        Self { id, run }
    }

    pub(crate) fn kind(&self) -> AbilityKind {
        match self.run {
            StrikeRun::Helicopter(_) => AbilityKind::Helicopter,
            StrikeRun::Bomber(_) => AbilityKind::Bomber,
        }
    }

    /// Advances the strike and reports whether it is still on the display.
    ///
    /// A strike that leaves the display drops its projectiles and bombs
    /// with it.
    pub(crate) fn update(
        &mut self,
        dt: f32,
        field: &mut Battlefield<'_>,
        out: &mut Vec<Event>,
    ) -> bool {
        match &mut self.run {
            StrikeRun::Helicopter(run) => run.update(self.id, dt, field, out),
            StrikeRun::Bomber(run) => run.update(self.id, dt, field, out),
        }
    }

    pub(crate) fn snapshot(&self) -> StrikeSnapshot {
        let position = match &self.run {
            StrikeRun::Helicopter(run) => run.position,
            StrikeRun::Bomber(run) => run.position,
        };
        StrikeSnapshot {
            id: self.id,
            kind: self.kind(),
            position,
        }
    }

    pub(crate) fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        match &self.run {
            StrikeRun::Helicopter(run) => run
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot(Shooter::Strike(self.id)))
                .collect(),
            StrikeRun::Bomber(_) => Vec::new(),
        }
    }

    pub(crate) fn bomb_snapshots(&self) -> Vec<BombSnapshot> {
        match &self.run {
            StrikeRun::Helicopter(_) => Vec::new(),
            StrikeRun::Bomber(run) => run
                .bombs
                .iter()
                .map(|bomb| BombSnapshot {
                    strike: self.id,
                    position: bomb.position,
                    exploded: matches!(bomb.state, BombState::Exploded { .. }),
                })
                .collect(),
        }
    }
}

/// Gunship strafing the nearest enemies.
#[derive(Clone, Debug)]
pub(crate) struct HelicopterRun {
    position: WorldPoint,
    fire: Cooldown,
    projectiles: Vec<Projectile>,
}

impl HelicopterRun {
    fn update(
        &mut self,
        id: StrikeId,
        dt: f32,
        field: &mut Battlefield<'_>,
        out: &mut Vec<Event>,
    ) -> bool {
        self.position = self.position.offset(-HELICOPTER_SPEED * dt, 0.0);
        if self.position.x() < HELICOPTER_EXIT_X {
            return false;
        }

        let shooter = Shooter::Strike(id);
        self.fire.tick(dt);
        field.fly(&mut self.projectiles, shooter, dt, out);

        if self.fire.is_ready() {
            if let Some(target) = field.nearest(self.position, HELICOPTER_REACH + 1.0) {
                let bullet = Projectile::launch(
                    self.position.offset(0.0, HELICOPTER_MUZZLE_DROP),
                    target,
                    BULLET_DAMAGE,
                    BULLET_SPEED,
                    0.0,
                );
                field.launch(&mut self.projectiles, bullet, shooter, out);
                self.fire.reset();
            }
        }

        true
    }
}

/// Bomber carpet-bombing the path.
#[derive(Clone, Debug)]
pub(crate) struct BomberRun {
    position: WorldPoint,
    drop: Cooldown,
    bombs: Vec<Bomb>,
    trigger_altitude: f32,
}

impl BomberRun {
    fn update(
        &mut self,
        id: StrikeId,
        dt: f32,
        field: &mut Battlefield<'_>,
        out: &mut Vec<Event>,
    ) -> bool {
        self.position = self.position.offset(-BOMBER_SPEED * dt, 0.0);
        if self.position.x() < BOMBER_EXIT_X {
            return false;
        }

        self.drop.tick(dt);

        let trigger_altitude = self.trigger_altitude;
        self.bombs.retain_mut(|bomb| match bomb.update(dt, trigger_altitude) {
            BombPhase::Detonated => {
                let struck = field.blast(bomb.position, BOMB_DAMAGE, BOMB_BLAST_RADIUS);
                debug!(strike = id.get(), struck, "bomb exploded");
                out.push(Event::BombExploded {
                    strike: id,
                    position: bomb.position,
                    struck,
                });
                true
            }
            BombPhase::Falling | BombPhase::Burning => true,
            BombPhase::Spent => false,
        });

        if self.drop.is_ready() {
            self.bombs.push(Bomb {
                position: self.position.offset(0.0, BOMB_HATCH_DROP),
                state: BombState::Falling,
            });
            self.drop.reset();
        }

        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BombState {
    Falling,
    Exploded { elapsed: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BombPhase {
    Falling,
    Detonated,
    Burning,
    Spent,
}

#[derive(Clone, Debug, PartialEq)]
struct Bomb {
    position: WorldPoint,
    state: BombState,
}

impl Bomb {
    fn update(&mut self, dt: f32, trigger_altitude: f32) -> BombPhase {
        match &mut self.state {
            BombState::Exploded { elapsed } => {
                *elapsed += dt;
                if *elapsed > EXPLOSION_DURATION {
                    BombPhase::Spent
                } else {
                    BombPhase::Burning
                }
            }
            BombState::Falling => {
                self.position = self.position.offset(0.0, BOMB_FALL_SPEED * dt);
                if self.position.y() >= trigger_altitude {
                    self.state = BombState::Exploded { elapsed: 0.0 };
                    BombPhase::Detonated
                } else {
                    BombPhase::Falling
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::Enemy;
    use led_defence_core::{EnemyId, EnemyKind, Path};
    use led_defence_system_tower_combat::TowerCombat;
    use led_defence_system_tower_targeting::TowerTargeting;

    const LAUNCH: Launch = Launch {
        display_width: 64.0,
        target_altitude: 16.0,
    };

    #[test]
    fn strikes_enter_past_the_right_edge() {
        let helicopter = ActiveStrike::launch(StrikeId::new(0), AbilityKind::Helicopter, LAUNCH);
        let bomber = ActiveStrike::launch(StrikeId::new(1), AbilityKind::Bomber, LAUNCH);

        assert_eq!(helicopter.snapshot().position, WorldPoint::new(69.0, 5.0));
        assert_eq!(bomber.snapshot().position, WorldPoint::new(69.0, 8.0));
        assert_eq!(bomber.kind(), AbilityKind::Bomber);
    }

    #[test]
    fn bomb_detonates_once_then_burns_out() {
        let mut bomb = Bomb {
            position: WorldPoint::new(30.0, 11.0),
            state: BombState::Falling,
        };

        assert_eq!(bomb.update(0.2, 18.0), BombPhase::Falling);
        assert_eq!(bomb.update(0.3, 18.0), BombPhase::Detonated);
        let detonation = bomb.position;
        assert_eq!(bomb.update(0.1, 18.0), BombPhase::Burning);
        assert_eq!(bomb.position, detonation);
        assert_eq!(bomb.update(0.1, 18.0), BombPhase::Spent);
    }

    #[test]
    fn bomb_blast_reaches_exactly_its_radius() {
        let path = Path::new(vec![WorldPoint::new(63.0, 18.0), WorldPoint::new(0.0, 18.0)]);
        let mut strike = ActiveStrike {
            id: StrikeId::new(2),
            run: StrikeRun::Bomber(BomberRun {
                position: WorldPoint::new(30.0, BOMBER_ALTITUDE),
                drop: Cooldown::new(BOMBER_DROP_PERIOD),
                bombs: vec![Bomb {
                    position: WorldPoint::new(30.0, 18.0),
                    state: BombState::Falling,
                }],
                trigger_altitude: 18.0,
            }),
        };
        let tank = |id, x, y| {
            Enemy::at_position(EnemyId::new(id), EnemyKind::Tank, WorldPoint::new(x, y), &path)
        };
        let mut roster = vec![
            tank(0, 34.0, 18.0),
            tank(1, 30.0, 22.01),
            tank(2, 28.5, 18.0),
        ];
        let mut targeting = TowerTargeting::new();
        let mut combat = TowerCombat::new();
        let mut field = Battlefield {
            enemies: &mut roster,
            targeting: &mut targeting,
            combat: &mut combat,
        };
        let mut events = Vec::new();

        assert!(strike.update(0.0, &mut field, &mut events));

        assert_eq!(
            events,
            vec![Event::BombExploded {
                strike: StrikeId::new(2),
                position: WorldPoint::new(30.0, 18.0),
                struck: 2,
            }]
        );
        let health: Vec<f32> = roster.iter().map(|enemy| enemy.snapshot().health).collect();
        assert_eq!(health, vec![6.0, 10.0, 6.0]);
    }

    #[test]
    fn helicopter_leaves_after_crossing_the_display() {
        let mut strike = ActiveStrike::launch(StrikeId::new(0), AbilityKind::Helicopter, LAUNCH);
        let mut roster: Vec<Enemy> = Vec::new();
        let mut targeting = TowerTargeting::new();
        let mut combat = TowerCombat::new();
        let mut field = Battlefield {
            enemies: &mut roster,
            targeting: &mut targeting,
            combat: &mut combat,
        };
        let mut events = Vec::new();

        let mut ticks = 0;
        while strike.update(0.1, &mut field, &mut events) {
            ticks += 1;
        }

        assert_eq!(ticks, 92);
        assert!(events.is_empty());
    }

    #[test]
    fn helicopter_fires_at_nearest_enemy_in_reach() {
        let path = Path::new(vec![WorldPoint::new(63.0, 15.0), WorldPoint::new(0.0, 15.0)]);
        let mut strike = ActiveStrike::launch(StrikeId::new(4), AbilityKind::Helicopter, LAUNCH);
        let mut roster = vec![Enemy::at_path_start(EnemyId::new(0), EnemyKind::Tank, &path)];
        let mut targeting = TowerTargeting::new();
        let mut combat = TowerCombat::new();
        let mut field = Battlefield {
            enemies: &mut roster,
            targeting: &mut targeting,
            combat: &mut combat,
        };
        let mut events = Vec::new();

        assert!(strike.update(0.3, &mut field, &mut events));

        assert_eq!(
            events,
            vec![Event::ProjectileFired {
                shooter: Shooter::Strike(StrikeId::new(4)),
                target: EnemyId::new(0),
            }]
        );
        assert_eq!(strike.projectile_snapshots().len(), 1);
    }
}
