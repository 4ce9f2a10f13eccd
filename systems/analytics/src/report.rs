use std::{collections::BTreeMap, time::Duration};

use led_defence_core::{AbilityKind, EnemyKind, TowerKind};
use serde::{Deserialize, Serialize};

/// Aggregated outcome of a session, built from the world's event stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Simulated time covered by the observed ticks.
    pub elapsed: Duration,
    /// Shots fired by towers and gunships.
    pub shots_fired: u32,
    /// Shots that struck their target.
    pub shots_hit: u32,
    /// Shots whose target was gone before impact.
    pub shots_missed: u32,
    /// Enemies destroyed, by kind.
    pub kills: BTreeMap<EnemyKind, u32>,
    /// Enemies that reached the end of the path.
    pub escapes: u32,
    /// Lives removed by escaping enemies.
    pub lives_lost: u32,
    /// Children released by splitting enemies.
    pub splits: u32,
    /// Towers built, by kind.
    pub towers_placed: BTreeMap<TowerKind, u32>,
    /// Placement requests that were refused.
    pub placements_rejected: u32,
    /// Abilities activated, by kind.
    pub abilities_used: BTreeMap<AbilityKind, u32>,
    /// Activation requests that were refused.
    pub abilities_rejected: u32,
    /// Bombs that detonated.
    pub bombs_exploded: u32,
    /// Enemies caught in bomb blasts, counted once per blast.
    pub bomb_victims: u32,
    /// Money spent on towers and abilities.
    pub money_spent: u32,
    /// Bounty collected from kills.
    pub money_earned: u32,
    /// Wave announcements observed.
    pub waves_announced: u32,
    /// Final score, once the session has ended.
    pub final_score: Option<u32>,
}

impl SessionReport {
    /// Enemies destroyed across every kind.
    #[must_use]
    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }

    /// Fraction of resolved shots that struck, if any shot resolved.
    #[must_use]
    pub fn accuracy(&self) -> Option<f32> {
        let resolved = self.shots_hit + self.shots_missed;
        (resolved > 0).then(|| self.shots_hit as f32 / resolved as f32)
    }

    pub(crate) fn tally<K: Ord>(counts: &mut BTreeMap<K, u32>, key: K) {
        *counts.entry(key).or_insert(0) += 1;
    }
}
