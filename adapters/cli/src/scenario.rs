//! Scripted player actions loaded from TOML.
//!
//! ```toml
//! [economy]
//! starting_money = 300
//!
//! [[towers]]
//! kind = "machine_gun"
//! at = [53, 8]
//!
//! [[abilities]]
//! kind = "bomber"
//! after = 20.0
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use led_defence_core::{AbilityKind, Command, EnemyKind, SessionConfig, TowerKind, WorldPoint};
use serde::Deserialize;

/// Errors raised while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}")]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The scenario file is not valid scenario TOML.
    #[error("failed to parse scenario {path}")]
    Parse {
        /// Location that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// Order times must be finite and not negative.
    #[error("{order} order scheduled at invalid time {seconds}")]
    InvalidTime {
        /// Kind of order carrying the time.
        order: &'static str,
        /// Offending time in seconds.
        seconds: f32,
    },
}

/// Player actions and economy overrides for a headless session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    economy: EconomyOverrides,
    #[serde(default)]
    towers: Vec<TowerOrder>,
    #[serde(default)]
    abilities: Vec<AbilityOrder>,
    #[serde(default)]
    enemies: Vec<EnemyOrder>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct EconomyOverrides {
    starting_money: Option<u32>,
    starting_lives: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct TowerOrder {
    kind: TowerKind,
    at: WorldPoint,
    #[serde(default)]
    after: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct AbilityOrder {
    kind: AbilityKind,
    #[serde(default)]
    after: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnemyOrder {
    kind: EnemyKind,
    #[serde(default)]
    after: f32,
}

/// Command issued once the session clock reaches `at`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TimedCommand {
    pub(crate) at: Duration,
    pub(crate) command: Command,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Session configuration with the scenario's economy overrides applied.
    pub(crate) fn session_config(&self, display_width: u32) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            starting_money: self.economy.starting_money.unwrap_or(defaults.starting_money),
            starting_lives: self.economy.starting_lives.unwrap_or(defaults.starting_lives),
            display_width,
        }
    }

    /// Every order as a command, sorted by issue time.
    ///
    /// Orders sharing a time keep file order with towers first, then
    /// enemies, then abilities.
    pub(crate) fn timeline(&self) -> Result<Vec<TimedCommand>, ScenarioError> {
        let mut timeline = Vec::new();
        for order in &self.towers {
            timeline.push(TimedCommand {
                at: offset("tower", order.after)?,
                command: Command::PlaceTower {
                    kind: order.kind,
                    at: order.at,
                },
            });
        }
        for order in &self.enemies {
            timeline.push(TimedCommand {
                at: offset("enemy", order.after)?,
                command: Command::SpawnEnemy { kind: order.kind },
            });
        }
        for order in &self.abilities {
            timeline.push(TimedCommand {
                at: offset("ability", order.after)?,
                command: Command::ActivateAbility { kind: order.kind },
            });
        }
        timeline.sort_by_key(|timed| timed.at);
        Ok(timeline)
    }
}

fn offset(order: &'static str, seconds: f32) -> Result<Duration, ScenarioError> {
    Duration::try_from_secs_f32(seconds).map_err(|_| ScenarioError::InvalidTime { order, seconds })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Scenario {
        toml::from_str(text).expect("valid scenario")
    }

    #[test]
    fn empty_scenario_keeps_default_economy() {
        let scenario = parse("");

        assert_eq!(scenario.session_config(64), SessionConfig::default());
        assert!(scenario.timeline().expect("no orders").is_empty());
    }

    #[test]
    fn economy_overrides_replace_only_named_fields() {
        let scenario = parse("[economy]\nstarting_lives = 3\n");
        let config = scenario.session_config(96);

        assert_eq!(config.starting_money, 200);
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.display_width, 96);
    }

    #[test]
    fn orders_are_sorted_by_time() {
        let scenario = parse(
            r#"
            [[towers]]
            kind = "machine_gun"
            at = [53, 8]

            [[towers]]
            kind = "radar"
            at = [32.5, 24]
            after = 4.0

            [[abilities]]
            kind = "apache"
            after = 2.5

            [[enemies]]
            kind = "ghost"
            after = 2.5
            "#,
        );

        let timeline = scenario.timeline().expect("valid times");
        let commands: Vec<_> = timeline.iter().map(|timed| timed.command.clone()).collect();

        assert_eq!(
            commands,
            vec![
                Command::PlaceTower {
                    kind: TowerKind::MachineGun,
                    at: WorldPoint::new(53.0, 8.0),
                },
                Command::SpawnEnemy {
                    kind: EnemyKind::Ghost
                },
                Command::ActivateAbility {
                    kind: AbilityKind::Helicopter
                },
                Command::PlaceTower {
                    kind: TowerKind::Radar,
                    at: WorldPoint::new(32.5, 24.0),
                },
            ]
        );
        assert_eq!(timeline[1].at, Duration::from_millis(2500));
    }

    #[test]
    fn negative_times_are_rejected() {
        let scenario = parse("[[abilities]]\nkind = \"bomber\"\nafter = -1.0\n");

        let error = scenario.timeline().expect_err("negative time");

        assert!(matches!(
            error,
            ScenarioError::InvalidTime {
                order: "ability",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_reported() {
        let result: Result<Scenario, _> =
            toml::from_str("[[towers]]\nkind = \"mg\"\nat = [1, 1]\nlevel = 2\n");

        assert!(result.is_err());
    }
}
