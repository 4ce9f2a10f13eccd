#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the LED Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems read immutable snapshots and answer
//! with decisions or new command batches.

mod geometry;
mod kinds;
mod map;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use geometry::{angular_distance, rasterize_line, LineRaster, Path, WorldPoint};
pub use kinds::{
    AbilityKind, AbilityStats, EnemyKind, EnemyStats, SplitTrait, TowerKind, TowerRole,
    TowerStats,
};
pub use map::{MapDefinition, SessionConfig};

/// Maximum distance between a requested build position and the slot it snaps to.
pub const SLOT_SNAP_DISTANCE: f32 = 5.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a tower on the slot nearest to the provided position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Requested build position; snapped to the nearest slot.
        at: WorldPoint,
    },
    /// Requests a new enemy at the start of the path.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
    },
    /// Requests activation of an air strike.
    ActivateAbility {
        /// Ability to trigger.
        kind: AbilityKind,
    },
    /// Requests the banner plane announcing the provided wave.
    AnnounceWave {
        /// One-based number of the wave being announced.
        wave: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that simulated time advanced by the provided delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// Confirms that a tower was built.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower that was built.
        kind: TowerKind,
        /// Slot the tower occupies.
        slot: WorldPoint,
        /// Money deducted for the tower.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower that was requested.
        kind: TowerKind,
        /// Requested build position.
        at: WorldPoint,
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// Announces that an enemy entered the field.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Kind of the new enemy.
        kind: EnemyKind,
        /// Position the enemy appeared at.
        position: WorldPoint,
        /// What caused the enemy to appear.
        origin: SpawnOrigin,
    },
    /// Reports that a shot left a tower or strike.
    ProjectileFired {
        /// Entity that fired.
        shooter: Shooter,
        /// Enemy the projectile homes on.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target.
    ProjectileHit {
        /// Entity that fired.
        shooter: Shooter,
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage applied to the struck enemy, excluding splash.
        damage: f32,
    },
    /// Reports that a projectile lost its target before impact.
    ProjectileMissed {
        /// Entity that fired.
        shooter: Shooter,
        /// Enemy the projectile was homing on.
        target: EnemyId,
    },
    /// Reports that an enemy was destroyed and its reward credited.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Kind of the destroyed enemy.
        kind: EnemyKind,
        /// Position where the enemy died.
        position: WorldPoint,
        /// Money and score credited for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the exit.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Kind of the escaped enemy.
        kind: EnemyKind,
        /// Lives removed by the escape.
        damage: u32,
    },
    /// Confirms that an ability was triggered.
    AbilityActivated {
        /// Ability that was triggered.
        kind: AbilityKind,
        /// Identifier of the strike that was launched.
        strike: StrikeId,
        /// Money deducted for the activation.
        cost: u32,
    },
    /// Reports that an activation request was rejected.
    AbilityRejected {
        /// Ability that was requested.
        kind: AbilityKind,
        /// Reason the request failed.
        reason: AbilityError,
    },
    /// Reports that a bomb detonated.
    BombExploded {
        /// Strike that dropped the bomb.
        strike: StrikeId,
        /// Point of detonation.
        position: WorldPoint,
        /// Number of enemies caught in the blast.
        struck: u32,
    },
    /// Reports that a strike left the display and was retired.
    StrikeCompleted {
        /// Identifier of the retired strike.
        strike: StrikeId,
        /// Ability the strike belonged to.
        kind: AbilityKind,
    },
    /// Confirms that a wave banner started crossing the display.
    WaveAnnounced {
        /// One-based wave number.
        wave: u32,
    },
    /// Reports that the last life was lost.
    SessionOver {
        /// Final score of the session.
        score: u32,
    },
}

/// Entity responsible for a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shooter {
    /// Projectile fired by a tower.
    Tower(TowerId),
    /// Projectile fired by an air strike.
    Strike(StrikeId),
}

/// Cause of an enemy entering the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnOrigin {
    /// Enemy entered at the first waypoint.
    PathStart,
    /// Enemy was released by a dying splitter.
    Split {
        /// Identifier of the enemy that split.
        parent: EnemyId,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The player cannot afford the requested tower.
    #[error("not enough money to build the tower")]
    InsufficientFunds,
    /// No slot lies within snapping distance of the requested position.
    #[error("no tower slot within snapping distance")]
    NoSlotNearby,
    /// The nearest slot already hosts a tower.
    #[error("tower slot is already occupied")]
    SlotOccupied,
}

/// Reasons an ability activation may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum AbilityError {
    /// The player cannot afford the ability.
    #[error("not enough money to activate the ability")]
    InsufficientFunds,
    /// The ability is still recharging.
    #[error("ability is still cooling down")]
    CoolingDown,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an air strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrikeId(u32);

impl StrikeId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Accumulator gating a repeated action behind a fixed period.
///
/// Elapsed time grows until it reaches the period; resetting discards any
/// surplus rather than carrying it into the next period. Readiness allows
/// [`Cooldown::TOLERANCE`] of slack so that summed frame times landing a hair
/// under the period still fire on that frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cooldown {
    period: f32,
    elapsed: f32,
}

impl Cooldown {
    /// Seconds of rounding slack accepted when comparing against the period.
    pub const TOLERANCE: f32 = 1e-4;

    /// Creates an accumulator that becomes ready after `period` seconds.
    #[must_use]
    pub const fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Accumulates `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Reports whether a full period has accumulated.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.elapsed + Self::TOLERANCE >= self.period
    }

    /// Restarts the accumulator from zero.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Seconds accumulated since the last reset.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds required between actions.
    #[must_use]
    pub const fn period(&self) -> f32 {
        self.period
    }
}

/// Decides whether an observer can see an enemy.
///
/// Visible kinds are always seen. Invisible kinds are seen while revealed or
/// by observers that see invisible enemies on their own.
#[must_use]
pub const fn is_visible(kind: EnemyKind, revealed: bool, sees_invisible: bool) -> bool {
    !kind.is_invisible() || revealed || sees_invisible
}

/// Read-only snapshot describing an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: WorldPoint,
    /// Remaining health, never negative.
    pub health: f32,
    /// Distance walked along the path.
    pub path_progress: f32,
    /// Whether the enemy is still alive.
    pub alive: bool,
    /// Whether a detector currently reveals the enemy.
    pub revealed: bool,
}

impl EnemySnapshot {
    /// Reports whether an observer with the provided capability sees the enemy.
    #[must_use]
    pub const fn visible_to(&self, sees_invisible: bool) -> bool {
        is_visible(self.kind, self.revealed, sees_invisible)
    }
}

/// Immutable representation of all enemies in iteration order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view and returns the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Slot the tower occupies.
    pub position: WorldPoint,
    /// Enemy most recently fired upon, if any.
    pub target: Option<EnemyId>,
    /// Seconds since the tower last fired.
    pub since_last_shot: f32,
    /// Current beam angle for radar towers.
    pub sweep_angle: Option<f32>,
}

/// Immutable representation of all towers in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new view from the provided snapshots sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view and returns the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Entity that fired the projectile.
    pub shooter: Shooter,
    /// Current position.
    pub position: WorldPoint,
    /// Enemy the projectile homes on.
    pub target: EnemyId,
}

/// Read-only snapshot describing an air strike crossing the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeSnapshot {
    /// Identifier of the strike.
    pub id: StrikeId,
    /// Ability the strike belongs to.
    pub kind: AbilityKind,
    /// Current airframe position.
    pub position: WorldPoint,
}

/// Read-only snapshot describing a bomb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BombSnapshot {
    /// Strike that dropped the bomb.
    pub strike: StrikeId,
    /// Current position, or the detonation point once exploded.
    pub position: WorldPoint,
    /// Whether the bomb has detonated.
    pub exploded: bool,
}

/// Read-only snapshot describing the wave banner plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnouncementSnapshot {
    /// Wave being announced.
    pub wave: u32,
    /// Current position of the plane's nose.
    pub position: WorldPoint,
}

/// Read-only snapshot of the session economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    /// Money available for towers and abilities.
    pub money: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Whether the session has ended.
    pub session_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn ghost(revealed: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(1),
            kind: EnemyKind::Ghost,
            position: WorldPoint::new(0.0, 0.0),
            health: 4.0,
            path_progress: 0.0,
            alive: true,
            revealed,
        }
    }

    #[test]
    fn hidden_ghost_needs_detection() {
        assert!(!ghost(false).visible_to(false));
        assert!(ghost(false).visible_to(true));
        assert!(ghost(true).visible_to(false));
    }

    #[test]
    fn visible_kinds_are_always_seen() {
        assert!(is_visible(EnemyKind::Tank, false, false));
    }

    #[test]
    fn cooldown_becomes_ready_after_period() {
        let mut cooldown = Cooldown::new(0.5);
        cooldown.tick(0.25);
        assert!(!cooldown.is_ready());
        cooldown.tick(0.25);
        assert!(cooldown.is_ready());
        cooldown.reset();
        assert_eq!(cooldown.elapsed(), 0.0);
        assert!(!cooldown.is_ready());
    }

    #[test]
    fn cooldown_fires_on_the_frame_that_completes_its_period() {
        let frames_until_ready = |period: f32, dt: f32| {
            let mut cooldown = Cooldown::new(period);
            let mut frames = 0;
            while !cooldown.is_ready() {
                cooldown.tick(dt);
                frames += 1;
            }
            frames
        };

        assert_eq!(frames_until_ready(1.5, 0.05), 30);
        assert_eq!(frames_until_ready(2.0, 0.05), 40);
        assert_eq!(frames_until_ready(0.8, 0.01), 80);
        assert_eq!(frames_until_ready(0.3, 0.1), 3);
    }

    #[test]
    fn tower_view_sorts_by_identifier() {
        let snapshot = |id| TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Cannon,
            position: WorldPoint::new(0.0, 0.0),
            target: None,
            since_last_shot: 0.0,
            sweep_angle: None,
        };
        let view = TowerView::from_snapshots(vec![snapshot(2), snapshot(0), snapshot(1)]);
        let ids: Vec<u32> = view.iter().map(|tower| tower.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn rejection_reasons_describe_themselves() {
        assert_eq!(
            PlacementError::SlotOccupied.to_string(),
            "tower slot is already occupied"
        );
        assert_eq!(
            AbilityError::CoolingDown.to_string(),
            "ability is still cooling down"
        );
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&TowerKind::Sniper);
        assert_round_trip(&PlacementError::NoSlotNearby);
        assert_round_trip(&AbilityError::InsufficientFunds);
        assert_round_trip(&Shooter::Strike(StrikeId::new(3)));
        assert_round_trip(&SpawnOrigin::Split {
            parent: EnemyId::new(9),
        });
        assert_round_trip(&EconomySnapshot {
            money: 120,
            lives: 18,
            score: 42,
            session_over: false,
        });
    }
}
