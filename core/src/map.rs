//! Declarative map layout and session configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::{Path, WorldPoint};

/// Static description of a playable map.
///
/// The serialised layout matches the JSON map files shipped with the game.
/// Cosmetic fields such as `spawn`, `end` and `decorations` are accepted and
/// ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Display name of the map.
    #[serde(default = "default_name")]
    pub name: String,
    /// Width of the display in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height of the display in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Waypoints walked by enemies, from spawn to exit.
    pub path: Vec<WorldPoint>,
    /// Positions where towers may be built.
    #[serde(default, rename = "towers")]
    pub tower_slots: Vec<WorldPoint>,
    /// Enemy count of each successive wave.
    #[serde(default = "default_waves")]
    pub waves: Vec<u32>,
    /// Background colour as an RGB triple.
    #[serde(default = "default_background")]
    pub background_color: [u8; 3],
}

fn default_name() -> String {
    String::from("Unnamed")
}

const fn default_width() -> u32 {
    64
}

const fn default_height() -> u32 {
    32
}

fn default_waves() -> Vec<u32> {
    vec![5, 8, 12]
}

const fn default_background() -> [u8; 3] {
    [0, 50, 0]
}

impl MapDefinition {
    /// Walkable path described by the map's waypoints.
    #[must_use]
    pub fn walk_path(&self) -> Path {
        Path::new(self.path.clone())
    }
}

/// Tunable starting conditions of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Money available before anything is built.
    pub starting_money: u32,
    /// Lives available before the session ends.
    pub starting_lives: u32,
    /// Display width in pixels; strikes enter just past the right edge.
    pub display_width: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_money: 200,
            starting_lives: 20,
            display_width: 64,
        }
    }
}
