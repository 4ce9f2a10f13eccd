#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for LED Defence.
//!
//! The world owns every enemy, tower, projectile and strike of a session and
//! advances them through a fixed pipeline on each [`Command::Tick`]: clock,
//! wave banner, radar coverage, air strikes, towers in placement order and
//! finally enemies. Pure systems decide targets and damage from snapshots;
//! the world commits their decisions.

mod abilities;
mod announcement;
mod battlefield;
mod enemies;
mod projectiles;
mod strikes;
mod towers;

use std::time::Duration;

use led_defence_core::{
    AbilityError, AbilityKind, Command, EnemyId, EnemyKind, Event, MapDefinition, Path,
    PlacementError, SessionConfig, Shooter, SpawnOrigin, StrikeId, TowerId, TowerKind, TowerRole,
    WorldPoint, SLOT_SNAP_DISTANCE,
};
use led_defence_system_detection::{advance_sweep, Detection, RadarProfile, REVEAL_DURATION};
use led_defence_system_tower_combat::TowerCombat;
use led_defence_system_tower_targeting::{TargetProfile, TowerTargeting};
use tracing::{debug, info};

use abilities::AbilityManager;
use announcement::BannerPlane;
use battlefield::Battlefield;
use enemies::Enemy;
use projectiles::Projectile;
use strikes::Launch;
use towers::TowerRegistry;

/// Bomber target altitude used when the path has no waypoints.
const DEFAULT_TARGET_ALTITUDE: f32 = 16.0;

/// Represents the authoritative LED Defence session.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    path: Path,
    tower_slots: Vec<WorldPoint>,
    elapsed: Duration,
    economy: Economy,
    enemies: Vec<Enemy>,
    pending_spawns: Vec<Enemy>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    abilities: AbilityManager,
    announcement: Option<BannerPlane>,
    detection: Detection,
    targeting: TowerTargeting,
    combat: TowerCombat,
    radars: Vec<RadarProfile>,
    departures: Vec<Departure>,
}

impl World {
    /// Creates a fresh session on the provided map.
    #[must_use]
    pub fn new(map: &MapDefinition, config: SessionConfig) -> Self {
        Self {
            config,
            path: map.walk_path(),
            tower_slots: map.tower_slots.clone(),
            elapsed: Duration::ZERO,
            economy: Economy {
                money: config.starting_money,
                lives: config.starting_lives,
                score: 0,
                session_over: false,
            },
            enemies: Vec::new(),
            pending_spawns: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            abilities: AbilityManager::new(),
            announcement: None,
            detection: Detection::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            radars: Vec::new(),
            departures: Vec::new(),
        }
    }

    fn now(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get() + 1);
        id
    }

    fn try_place_tower(
        &mut self,
        kind: TowerKind,
        at: WorldPoint,
    ) -> Result<(TowerId, WorldPoint), PlacementError> {
        let cost = kind.cost();
        if self.economy.money < cost {
            return Err(PlacementError::InsufficientFunds);
        }

        let slot = towers::nearest_slot(&self.tower_slots, at, SLOT_SNAP_DISTANCE)
            .ok_or(PlacementError::NoSlotNearby)?;
        if self.towers.is_occupied(slot) {
            return Err(PlacementError::SlotOccupied);
        }

        self.economy.money -= cost;
        Ok((self.towers.insert(kind, slot), slot))
    }

    fn try_activate_ability(&mut self, kind: AbilityKind) -> Result<StrikeId, AbilityError> {
        let now = self.now();
        self.abilities.check(kind, self.economy.money, now)?;

        self.economy.money -= kind.cost();
        let launch = Launch {
            display_width: self.config.display_width as f32,
            target_altitude: self.path.mean_y().unwrap_or(DEFAULT_TARGET_ALTITUDE),
        };
        Ok(self.abilities.activate(kind, now, launch))
    }

    fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.economy.session_over {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        out.push(Event::TimeAdvanced { dt });

        let dt = dt.as_secs_f32();
        self.update_announcement(dt);
        self.update_detection();
        self.update_abilities(dt, out);
        self.update_towers(dt, out);
        self.update_enemies(dt, out);
    }

    fn update_announcement(&mut self, dt: f32) {
        if let Some(banner) = self.announcement.as_mut() {
            if !banner.update(dt) {
                self.announcement = None;
            }
        }
    }

    fn update_detection(&mut self) {
        for enemy in &mut self.enemies {
            enemy.reveal_mut().clear_coverage();
        }

        self.radars.clear();
        self.radars.extend(
            self.towers
                .iter()
                .filter(|tower| tower.kind.is_radar())
                .map(|tower| RadarProfile {
                    origin: tower.position,
                    range: tower.kind.range(),
                    sweep_angle: tower.sweep_angle,
                }),
        );

        let covered = self
            .detection
            .coverage(&self.radars, self.enemies.iter().map(Enemy::snapshot));
        for id in covered {
            if let Some(enemy) = enemies::find_mut(&mut self.enemies, *id) {
                enemy.reveal_mut().cover();
            }
        }
    }

    fn update_abilities(&mut self, dt: f32, out: &mut Vec<Event>) {
        let mut field = Battlefield {
            enemies: &mut self.enemies,
            targeting: &mut self.targeting,
            combat: &mut self.combat,
        };
        self.abilities.update(dt, &mut field, out);
    }

    fn update_towers(&mut self, dt: f32, out: &mut Vec<Event>) {
        let mut field = Battlefield {
            enemies: &mut self.enemies,
            targeting: &mut self.targeting,
            combat: &mut self.combat,
        };

        for tower in self.towers.iter_mut() {
            match tower.kind.stats().role {
                TowerRole::Radar { sweep_rate } => {
                    tower.sweep_angle = advance_sweep(tower.sweep_angle, sweep_rate, dt);
                    let radar = RadarProfile {
                        origin: tower.position,
                        range: tower.kind.range(),
                        sweep_angle: tower.sweep_angle,
                    };
                    let swept = self
                        .detection
                        .sweep(radar, field.enemies.iter().map(Enemy::snapshot));
                    for id in swept {
                        if let Some(enemy) = enemies::find_mut(field.enemies, *id) {
                            enemy.reveal_mut().stamp(REVEAL_DURATION);
                        }
                    }
                }
                TowerRole::Gunnery {
                    damage,
                    projectile_speed,
                    splash_radius,
                    ..
                } => {
                    let shooter = Shooter::Tower(tower.id);
                    tower.cooldown.tick(dt);
                    field.fly(&mut tower.projectiles, shooter, dt, out);

                    if !tower.cooldown.is_ready() {
                        continue;
                    }

                    let profile = TargetProfile {
                        origin: tower.position,
                        range: tower.kind.range(),
                        sees_invisible: tower.kind.sees_invisible(),
                    };
                    let Some(target) = field.furthest_along_path(profile) else {
                        continue;
                    };

                    let projectile = Projectile::launch(
                        tower.position,
                        target,
                        damage,
                        projectile_speed,
                        splash_radius,
                    );
                    field.launch(&mut tower.projectiles, projectile, shooter, out);
                    tower.cooldown.reset();
                    tower.target = Some(target);
                }
            }
        }
    }

    fn update_enemies(&mut self, dt: f32, out: &mut Vec<Event>) {
        let mut departures = std::mem::take(&mut self.departures);
        departures.clear();

        for enemy in &mut self.enemies {
            let escaped = enemy.advance(dt, &self.path);
            if escaped || !enemy.is_alive() {
                departures.push(Departure {
                    enemy: enemy.id(),
                    kind: enemy.kind(),
                    position: enemy.position(),
                    escaped,
                });
            }
        }

        for departure in &departures {
            if departure.escaped {
                self.commit_escape(departure, out);
            } else {
                self.commit_kill(departure, out);
            }
        }

        if !departures.is_empty() {
            self.enemies.retain(|enemy| {
                departures
                    .binary_search_by_key(&enemy.id(), |departure| departure.enemy)
                    .is_err()
            });
        }
        self.enemies.append(&mut self.pending_spawns);
        self.departures = departures;
    }

    fn commit_escape(&mut self, departure: &Departure, out: &mut Vec<Event>) {
        let damage = departure.kind.stats().damage;
        self.economy.lives = self.economy.lives.saturating_sub(damage);
        debug!(
            enemy = departure.enemy.get(),
            kind = departure.kind.label(),
            lives = self.economy.lives,
            "enemy escaped"
        );
        out.push(Event::EnemyEscaped {
            enemy: departure.enemy,
            kind: departure.kind,
            damage,
        });

        if self.economy.lives == 0 && !self.economy.session_over {
            self.economy.session_over = true;
            info!(score = self.economy.score, "session over");
            out.push(Event::SessionOver {
                score: self.economy.score,
            });
        }
    }

    fn commit_kill(&mut self, departure: &Departure, out: &mut Vec<Event>) {
        let stats = departure.kind.stats();
        self.economy.money = self.economy.money.saturating_add(stats.reward);
        self.economy.score = self.economy.score.saturating_add(stats.reward);
        debug!(
            enemy = departure.enemy.get(),
            kind = departure.kind.label(),
            reward = stats.reward,
            "enemy killed"
        );
        out.push(Event::EnemyKilled {
            enemy: departure.enemy,
            kind: departure.kind,
            position: departure.position,
            reward: stats.reward,
        });

        let Some(split) = stats.split else {
            return;
        };

        for index in 0..split.count {
            let offset = (index as f32 - split.count as f32 / 2.0) * 2.0;
            let position = departure.position.offset(offset, 0.0);
            let id = self.allocate_enemy_id();
            debug!(parent = departure.enemy.get(), child = id.get(), "enemy split");
            self.pending_spawns
                .push(Enemy::at_position(id, split.kind, position, &self.path));
            out.push(Event::EnemySpawned {
                enemy: id,
                kind: split.kind,
                position,
                origin: SpawnOrigin::Split {
                    parent: departure.enemy,
                },
            });
        }
    }
}

/// Money, lives and score of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Economy {
    money: u32,
    lives: u32,
    score: u32,
    session_over: bool,
}

/// Enemy leaving the field during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Departure {
    enemy: EnemyId,
    kind: EnemyKind,
    position: WorldPoint,
    escaped: bool,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::PlaceTower { kind, at } => {
            let _ = place_tower(world, kind, at, out_events);
        }
        Command::SpawnEnemy { kind } => {
            let _ = spawn_enemy(world, kind, out_events);
        }
        Command::ActivateAbility { kind } => {
            let _ = activate_ability(world, kind, out_events);
        }
        Command::AnnounceWave { wave } => announce_wave(world, wave, out_events),
    }
}

/// Builds a tower on the slot nearest to `at` and reports whether it succeeded.
///
/// The request snaps to the closest slot within [`SLOT_SNAP_DISTANCE`]. A
/// rejection leaves money untouched and emits
/// [`Event::TowerPlacementRejected`] with the reason.
pub fn place_tower(
    world: &mut World,
    kind: TowerKind,
    at: WorldPoint,
    out_events: &mut Vec<Event>,
) -> bool {
    match world.try_place_tower(kind, at) {
        Ok((tower, slot)) => {
            info!(
                tower = tower.get(),
                kind = kind.label(),
                x = slot.x(),
                y = slot.y(),
                money = world.economy.money,
                "tower placed"
            );
            out_events.push(Event::TowerPlaced {
                tower,
                kind,
                slot,
                cost: kind.cost(),
            });
            true
        }
        Err(reason) => {
            debug!(kind = kind.label(), %reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { kind, at, reason });
            false
        }
    }
}

/// Spawns an enemy on the first waypoint and returns its identifier.
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, out_events: &mut Vec<Event>) -> EnemyId {
    let id = world.allocate_enemy_id();
    let enemy = Enemy::at_path_start(id, kind, &world.path);
    let position = enemy.position();
    world.enemies.push(enemy);
    out_events.push(Event::EnemySpawned {
        enemy: id,
        kind,
        position,
        origin: SpawnOrigin::PathStart,
    });
    id
}

/// Launches an air strike and reports whether it succeeded.
///
/// The cost is deducted exactly once on success. Rejections emit
/// [`Event::AbilityRejected`] and leave money untouched.
pub fn activate_ability(
    world: &mut World,
    kind: AbilityKind,
    out_events: &mut Vec<Event>,
) -> bool {
    match world.try_activate_ability(kind) {
        Ok(strike) => {
            info!(
                strike = strike.get(),
                kind = kind.label(),
                money = world.economy.money,
                "ability activated"
            );
            out_events.push(Event::AbilityActivated {
                kind,
                strike,
                cost: kind.cost(),
            });
            true
        }
        Err(reason) => {
            debug!(kind = kind.label(), %reason, "ability rejected");
            out_events.push(Event::AbilityRejected { kind, reason });
            false
        }
    }
}

/// Sends the banner plane across the display, replacing any banner in flight.
pub fn announce_wave(world: &mut World, wave: u32, out_events: &mut Vec<Event>) {
    info!(wave, "wave announced");
    world.announcement = Some(BannerPlane::new(wave));
    out_events.push(Event::WaveAnnounced { wave });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{enemies::Enemy, World};
    use led_defence_core::{
        AbilityKind, AnnouncementSnapshot, BombSnapshot, EconomySnapshot, EnemyView, Path,
        ProjectileSnapshot, SessionConfig, StrikeSnapshot, TowerView, WorldPoint,
    };

    /// Captures money, lives, score and whether the session ended.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        EconomySnapshot {
            money: world.economy.money,
            lives: world.economy.lives,
            score: world.economy.score,
            session_over: world.economy.session_over,
        }
    }

    /// Captures a read-only view of the enemies in iteration order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(Enemy::snapshot).collect())
    }

    /// Number of enemies currently on the field.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the towers in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Lists projectiles in flight from towers and gunships.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .towers
            .iter()
            .flat_map(|tower| tower.projectile_snapshots())
            .collect();
        for strike in world.abilities.strikes() {
            snapshots.extend(strike.projectile_snapshots());
        }
        snapshots
    }

    /// Lists air strikes crossing the display in launch order.
    #[must_use]
    pub fn strikes(world: &World) -> Vec<StrikeSnapshot> {
        world
            .abilities
            .strikes()
            .map(|strike| strike.snapshot())
            .collect()
    }

    /// Lists falling and exploding bombs.
    #[must_use]
    pub fn bombs(world: &World) -> Vec<BombSnapshot> {
        world
            .abilities
            .strikes()
            .flat_map(|strike| strike.bomb_snapshots())
            .collect()
    }

    /// Reports the banner plane currently crossing the display.
    #[must_use]
    pub fn announcement(world: &World) -> Option<AnnouncementSnapshot> {
        world.announcement.as_ref().map(|banner| banner.snapshot())
    }

    /// Seconds until the ability may be activated again, never negative.
    #[must_use]
    pub fn cooldown_remaining(world: &World, kind: AbilityKind) -> f32 {
        world.abilities.cooldown_remaining(kind, world.now())
    }

    /// Reports whether the ability is affordable and off cooldown.
    #[must_use]
    pub fn can_activate(world: &World, kind: AbilityKind) -> bool {
        world
            .abilities
            .can_activate(kind, world.economy.money, world.now())
    }

    /// Path walked by enemies.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Slots where towers may be built.
    #[must_use]
    pub fn tower_slots(world: &World) -> &[WorldPoint] {
        &world.tower_slots
    }

    /// Simulated time elapsed since the session started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Starting conditions the session was created with.
    #[must_use]
    pub fn config(world: &World) -> SessionConfig {
        world.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desert() -> MapDefinition {
        MapDefinition {
            name: String::from("Desert Straight"),
            width: 64,
            height: 32,
            path: vec![WorldPoint::new(63.0, 16.0), WorldPoint::new(0.0, 16.0)],
            tower_slots: vec![WorldPoint::new(53.0, 8.0), WorldPoint::new(53.0, 24.0)],
            waves: vec![3, 5],
            background_color: [80, 60, 20],
        }
    }

    #[test]
    fn new_session_uses_configured_economy() {
        let world = World::new(&desert(), SessionConfig::default());
        let economy = query::economy(&world);
        assert_eq!(economy.money, 200);
        assert_eq!(economy.lives, 20);
        assert_eq!(economy.score, 0);
        assert!(!economy.session_over);
    }

    #[test]
    fn tick_reports_time_advanced_first() {
        let mut world = World::new(&desert(), SessionConfig::default());
        let mut events = Vec::new();
        let dt = Duration::from_millis(100);

        apply(&mut world, Command::Tick { dt }, &mut events);

        assert_eq!(events, vec![Event::TimeAdvanced { dt }]);
        assert_eq!(query::elapsed(&world), dt);
    }

    #[test]
    fn placement_snaps_to_slot_and_deducts_cost() {
        let mut world = World::new(&desert(), SessionConfig::default());
        let mut events = Vec::new();

        assert!(place_tower(
            &mut world,
            TowerKind::Cannon,
            WorldPoint::new(51.0, 10.0),
            &mut events
        ));

        assert_eq!(
            events,
            vec![Event::TowerPlaced {
                tower: TowerId::new(0),
                kind: TowerKind::Cannon,
                slot: WorldPoint::new(53.0, 8.0),
                cost: 50,
            }]
        );
        assert_eq!(query::economy(&world).money, 150);
    }

    #[test]
    fn placement_rejections_carry_reasons() {
        let mut world = World::new(
            &desert(),
            SessionConfig {
                starting_money: 60,
                ..SessionConfig::default()
            },
        );
        let mut events = Vec::new();

        assert!(!place_tower(&mut world, TowerKind::Sniper, WorldPoint::new(53.0, 8.0), &mut events));
        assert!(!place_tower(&mut world, TowerKind::Radar, WorldPoint::new(30.0, 16.0), &mut events));
        assert!(place_tower(&mut world, TowerKind::MachineGun, WorldPoint::new(53.0, 8.0), &mut events));
        assert!(!place_tower(&mut world, TowerKind::MachineGun, WorldPoint::new(54.0, 9.0), &mut events));

        let reasons: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::TowerPlacementRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                PlacementError::InsufficientFunds,
                PlacementError::NoSlotNearby,
                PlacementError::SlotOccupied,
            ]
        );
        assert_eq!(query::economy(&world).money, 30);
    }

    #[test]
    fn spawned_enemy_stands_on_path_start() {
        let mut world = World::new(&desert(), SessionConfig::default());
        let mut events = Vec::new();

        let id = spawn_enemy(&mut world, EnemyKind::Tank, &mut events);

        let view = query::enemy_view(&world);
        let tank = view.iter().next().expect("tank spawned");
        assert_eq!(tank.id, id);
        assert_eq!(tank.position, WorldPoint::new(63.0, 16.0));
        assert_eq!(tank.health, 10.0);
    }

    #[test]
    fn banner_is_dropped_once_off_screen() {
        let mut world = World::new(&desert(), SessionConfig::default());
        let mut events = Vec::new();
        announce_wave(&mut world, 2, &mut events);
        assert_eq!(query::announcement(&world).map(|banner| banner.wave), Some(2));

        for _ in 0..10 {
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_secs(1),
                },
                &mut events,
            );
        }

        assert!(query::announcement(&world).is_none());
    }
}
