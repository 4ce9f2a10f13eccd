#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that summarises a session from its events.

mod report;

pub use report::SessionReport;

use led_defence_core::{Event, SpawnOrigin};

/// Pure analytics system that folds world events into a [`SessionReport`].
#[derive(Debug, Default)]
pub struct Analytics {
    report: SessionReport,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report accumulated so far.
    #[must_use]
    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Consumes the system and returns the final report.
    #[must_use]
    pub fn into_report(self) -> SessionReport {
        self.report
    }

    /// Consumes world events emitted since the previous call.
    pub fn handle(&mut self, events: &[Event]) {
        let report = &mut self.report;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    report.elapsed = report.elapsed.saturating_add(*dt);
                }
                Event::TowerPlaced { kind, cost, .. } => {
                    SessionReport::tally(&mut report.towers_placed, *kind);
                    report.money_spent = report.money_spent.saturating_add(*cost);
                }
                Event::TowerPlacementRejected { .. } => report.placements_rejected += 1,
                Event::EnemySpawned {
                    origin: SpawnOrigin::Split { .. },
                    ..
                } => report.splits += 1,
                Event::EnemySpawned { .. } => {}
                Event::ProjectileFired { .. } => report.shots_fired += 1,
                Event::ProjectileHit { .. } => report.shots_hit += 1,
                Event::ProjectileMissed { .. } => report.shots_missed += 1,
                Event::EnemyKilled { kind, reward, .. } => {
                    SessionReport::tally(&mut report.kills, *kind);
                    report.money_earned = report.money_earned.saturating_add(*reward);
                }
                Event::EnemyEscaped { damage, .. } => {
                    report.escapes += 1;
                    report.lives_lost = report.lives_lost.saturating_add(*damage);
                }
                Event::AbilityActivated { kind, cost, .. } => {
                    SessionReport::tally(&mut report.abilities_used, *kind);
                    report.money_spent = report.money_spent.saturating_add(*cost);
                }
                Event::AbilityRejected { .. } => report.abilities_rejected += 1,
                Event::BombExploded { struck, .. } => {
                    report.bombs_exploded += 1;
                    report.bomb_victims = report.bomb_victims.saturating_add(*struck);
                }
                Event::StrikeCompleted { .. } => {}
                Event::WaveAnnounced { .. } => report.waves_announced += 1,
                Event::SessionOver { score } => report.final_score = Some(*score),
            }
        }
    }
}
