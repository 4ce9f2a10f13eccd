//! Closed catalogues of enemies, towers and abilities with their stat records.

use serde::{Deserialize, Serialize};

/// Enemy archetypes that walk the path toward the exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast, fragile runner.
    Scout,
    /// Slow armoured unit that costs two lives when it escapes.
    Tank,
    /// Quick unit that bursts into scouts when destroyed.
    Splitter,
    /// Invisible unit that only detectors can reliably target.
    Ghost,
}

/// Replacement spawned when an enemy with the split trait dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplitTrait {
    /// Number of replacements spawned.
    pub count: u32,
    /// Kind assigned to every replacement.
    pub kind: EnemyKind,
}

/// Static attributes shared by every enemy of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health the enemy spawns with.
    pub health: f32,
    /// Walking speed in pixels per second.
    pub speed: f32,
    /// Money and score credited when the enemy is destroyed.
    pub reward: u32,
    /// Lives removed when the enemy reaches the exit.
    pub damage: u32,
    /// Whether ordinary towers are unable to see the enemy.
    pub invisible: bool,
    /// Optional replacement spawned on death.
    pub split: Option<SplitTrait>,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [EnemyKind; 4] = [Self::Scout, Self::Tank, Self::Splitter, Self::Ghost];

    /// Stat record for the kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Scout => EnemyStats {
                health: 3.0,
                speed: 4.0,
                reward: 2,
                damage: 1,
                invisible: false,
                split: None,
            },
            Self::Tank => EnemyStats {
                health: 10.0,
                speed: 2.0,
                reward: 6,
                damage: 2,
                invisible: false,
                split: None,
            },
            Self::Splitter => EnemyStats {
                health: 2.0,
                speed: 7.0,
                reward: 3,
                damage: 1,
                invisible: false,
                split: Some(SplitTrait {
                    count: 2,
                    kind: Self::Scout,
                }),
            },
            Self::Ghost => EnemyStats {
                health: 4.0,
                speed: 5.0,
                reward: 5,
                damage: 1,
                invisible: true,
                split: None,
            },
        }
    }

    /// Reports whether the kind is invisible to ordinary towers.
    #[must_use]
    pub const fn is_invisible(self) -> bool {
        self.stats().invisible
    }

    /// Human readable label used by reports and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scout => "scout",
            Self::Tank => "tank",
            Self::Splitter => "splitter",
            Self::Ghost => "ghost",
        }
    }
}

/// Tower archetypes that can be built on slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Rapid single-target projectile tower.
    #[serde(alias = "mg")]
    MachineGun,
    /// Slow projectile tower with splash damage.
    Cannon,
    /// Long range hitscan tower that sees invisible enemies.
    Sniper,
    /// Detector that reveals invisible enemies and never fires.
    Radar,
}

/// Behaviour a tower exhibits once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TowerRole {
    /// Fires projectiles at enemies in range.
    Gunnery {
        /// Damage dealt to the struck enemy.
        damage: f32,
        /// Seconds between shots.
        fire_period: f32,
        /// Projectile speed in pixels per second; zero resolves immediately.
        projectile_speed: f32,
        /// Radius receiving half damage around the struck enemy.
        splash_radius: f32,
    },
    /// Sweeps a detection beam around the tower.
    Radar {
        /// Angular speed of the beam in radians per second.
        sweep_rate: f32,
    },
}

/// Static attributes shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Money deducted when the tower is built.
    pub cost: u32,
    /// Detection and targeting radius in pixels, inclusive.
    pub range: f32,
    /// Whether the tower sees invisible enemies without help.
    pub sees_invisible: bool,
    /// Firing or detection behaviour.
    pub role: TowerRole,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 4] = [Self::MachineGun, Self::Cannon, Self::Sniper, Self::Radar];

    /// Stat record for the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::MachineGun => TowerStats {
                cost: 30,
                range: 14.0,
                sees_invisible: false,
                role: TowerRole::Gunnery {
                    damage: 1.0,
                    fire_period: 0.5,
                    projectile_speed: 60.0,
                    splash_radius: 0.0,
                },
            },
            Self::Cannon => TowerStats {
                cost: 50,
                range: 10.0,
                sees_invisible: false,
                role: TowerRole::Gunnery {
                    damage: 2.0,
                    fire_period: 1.5,
                    projectile_speed: 40.0,
                    splash_radius: 3.0,
                },
            },
            Self::Sniper => TowerStats {
                cost: 65,
                range: 26.0,
                sees_invisible: true,
                role: TowerRole::Gunnery {
                    damage: 4.0,
                    fire_period: 2.0,
                    projectile_speed: 0.0,
                    splash_radius: 0.0,
                },
            },
            Self::Radar => TowerStats {
                cost: 40,
                range: 22.0,
                sees_invisible: true,
                role: TowerRole::Radar { sweep_rate: 2.0 },
            },
        }
    }

    /// Money deducted when the tower is built.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Targeting or detection radius in pixels.
    #[must_use]
    pub const fn range(self) -> f32 {
        self.stats().range
    }

    /// Whether the tower sees invisible enemies without help.
    #[must_use]
    pub const fn sees_invisible(self) -> bool {
        self.stats().sees_invisible
    }

    /// Reports whether the tower detects rather than fires.
    #[must_use]
    pub const fn is_radar(self) -> bool {
        matches!(self, Self::Radar)
    }

    /// Human readable label used by reports and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MachineGun => "machine gun",
            Self::Cannon => "cannon",
            Self::Sniper => "sniper",
            Self::Radar => "radar",
        }
    }
}

/// Player-triggered air strikes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Gunship that strafes the nearest enemies while crossing the display.
    #[serde(alias = "apache")]
    Helicopter,
    /// Bomber that carpet-bombs the path while crossing the display.
    Bomber,
}

/// Static attributes of an ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilityStats {
    /// Money deducted on activation.
    pub cost: u32,
    /// Seconds before the ability may be activated again.
    pub cooldown: f32,
}

impl AbilityKind {
    /// Every ability in declaration order.
    pub const ALL: [AbilityKind; 2] = [Self::Helicopter, Self::Bomber];

    /// Stat record for the ability.
    #[must_use]
    pub const fn stats(self) -> AbilityStats {
        match self {
            Self::Helicopter => AbilityStats {
                cost: 50,
                cooldown: 15.0,
            },
            Self::Bomber => AbilityStats {
                cost: 75,
                cooldown: 20.0,
            },
        }
    }

    /// Money deducted on activation.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Human readable label used by reports and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Helicopter => "helicopter",
            Self::Bomber => "bomber",
        }
    }
}
