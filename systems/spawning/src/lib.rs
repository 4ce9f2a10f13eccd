#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave system responsible for emitting enemy spawn commands.
//!
//! A wave is a timed list of spawns. The system accumulates simulated time
//! from [`Event::TimeAdvanced`] and emits [`Command::SpawnEnemy`] once each
//! spawn falls due, so replaying the same events always yields the same
//! commands.

use std::time::Duration;

use led_defence_core::{Command, EnemyKind, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Quiet period after the final spawn before a cleared wave counts as complete.
pub const WAVE_SETTLE_TIME: Duration = Duration::from_millis(500);

const MIN_SPAWN_GAP_MS: u64 = 500;
const MAX_SPAWN_GAP_MS: u64 = 1_500;
const WAVE_SEED_LABEL: &[u8] = b"led-defence/wave";

/// Single scheduled spawn within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveSpawn {
    /// Enemy kind entering the path.
    pub kind: EnemyKind,
    /// Offset from the start of the wave.
    pub at: Duration,
}

impl WaveSpawn {
    /// Creates a spawn `seconds` after the wave starts.
    #[must_use]
    pub fn after_secs(kind: EnemyKind, seconds: f32) -> Self {
        Self {
            kind,
            at: Duration::from_secs_f32(seconds),
        }
    }
}

/// Named, time-ordered list of spawns.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WavePlan {
    name: String,
    spawns: Vec<WaveSpawn>,
}

impl WavePlan {
    /// Creates a plan, ordering the spawns by their offset.
    #[must_use]
    pub fn new(name: impl Into<String>, mut spawns: Vec<WaveSpawn>) -> Self {
        spawns.sort_by_key(|spawn| spawn.at);
        Self {
            name: name.into(),
            spawns,
        }
    }

    /// Display name of the wave.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawns in the order they fall due.
    #[must_use]
    pub fn spawns(&self) -> &[WaveSpawn] {
        &self.spawns
    }

    /// Number of enemies the wave sends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    /// Reports whether the wave sends no enemies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    fn last_spawn(&self) -> Duration {
        self.spawns.last().map_or(Duration::ZERO, |spawn| spawn.at)
    }
}

/// The three hand-tuned demonstration waves.
#[must_use]
pub fn demo_waves() -> Vec<WavePlan> {
    use EnemyKind::{Ghost, Scout, Splitter, Tank};

    let plan = |name: &str, table: &[(EnemyKind, f32)]| {
        WavePlan::new(
            name,
            table
                .iter()
                .map(|&(kind, seconds)| WaveSpawn::after_secs(kind, seconds))
                .collect(),
        )
    };

    vec![
        plan(
            "Scout Swarm",
            &[
                (Scout, 0.0),
                (Scout, 1.0),
                (Scout, 2.0),
                (Scout, 3.0),
                (Scout, 4.0),
                (Scout, 5.0),
            ],
        ),
        plan(
            "Mixed Assault",
            &[
                (Scout, 0.0),
                (Scout, 0.5),
                (Tank, 1.5),
                (Scout, 2.5),
                (Scout, 3.0),
                (Tank, 4.0),
                (Scout, 5.0),
                (Tank, 6.5),
                (Scout, 7.5),
                (Scout, 8.0),
            ],
        ),
        plan(
            "Special Forces",
            &[
                (Scout, 0.0),
                (Ghost, 1.0),
                (Scout, 2.0),
                (Splitter, 3.0),
                (Tank, 4.0),
                (Ghost, 5.0),
                (Scout, 6.0),
                (Splitter, 7.0),
                (Tank, 8.0),
                (Ghost, 9.0),
                (Splitter, 10.0),
                (Tank, 11.5),
                (Scout, 12.5),
                (Scout, 13.0),
            ],
        ),
    ]
}

/// Configuration parameters required to construct the wave system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    waves: Vec<WavePlan>,
}

impl Config {
    /// Creates a configuration from explicit wave plans.
    #[must_use]
    pub fn new(waves: Vec<WavePlan>) -> Self {
        Self { waves }
    }

    /// Configuration running the demonstration waves.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(demo_waves())
    }

    /// Generates one wave per entry of `counts` with that many enemies.
    ///
    /// Each wave draws its roster and spacing from its own ChaCha stream,
    /// seeded from `seed` and the wave index, so the same inputs always
    /// produce the same plans.
    #[must_use]
    pub fn from_counts(counts: &[u32], seed: u64) -> Self {
        let waves = counts
            .iter()
            .enumerate()
            .map(|(index, &count)| generate_wave(index, count, seed))
            .collect();
        Self::new(waves)
    }

    /// Plans in the order they are played.
    #[must_use]
    pub fn waves(&self) -> &[WavePlan] {
        &self.waves
    }
}

/// Errors raised while driving the wave system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WaveError {
    /// The requested wave index exceeds the configured plans.
    #[error("wave {index} does not exist ({total} waves configured)")]
    UnknownWave {
        /// Zero-based wave index that was requested.
        index: usize,
        /// Number of configured waves.
        total: usize,
    },
}

/// Pure system that emits spawn commands for the active wave.
#[derive(Debug)]
pub struct Spawning {
    waves: Vec<WavePlan>,
    active: Option<ActiveWave>,
}

#[derive(Clone, Copy, Debug)]
struct ActiveWave {
    index: usize,
    clock: Duration,
    spawned: usize,
}

impl Spawning {
    /// Creates a new wave system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves: config.waves,
            active: None,
        }
    }

    /// Number of configured waves.
    #[must_use]
    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    /// Plan for the zero-based wave index, if configured.
    #[must_use]
    pub fn plan(&self, index: usize) -> Option<&WavePlan> {
        self.waves.get(index)
    }

    /// Zero-based index of the wave being played.
    #[must_use]
    pub fn current_wave(&self) -> Option<usize> {
        self.active.map(|wave| wave.index)
    }

    /// Starts the wave at `index` and emits its announcement.
    ///
    /// Announcements number waves from one. Starting a wave abandons any
    /// spawns still pending from the previous one.
    pub fn start_wave(&mut self, index: usize, out: &mut Vec<Command>) -> Result<(), WaveError> {
        let plan = self.waves.get(index).ok_or(WaveError::UnknownWave {
            index,
            total: self.waves.len(),
        })?;

        info!(
            wave = index + 1,
            name = plan.name(),
            enemies = plan.len(),
            "wave started"
        );
        self.active = Some(ActiveWave {
            index,
            clock: Duration::ZERO,
            spawned: 0,
        });
        out.push(Command::AnnounceWave {
            wave: wave_number(index),
        });
        Ok(())
    }

    /// Consumes events and emits spawn commands for every spawn now due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(plan) = self.waves.get(active.index) else {
            return;
        };

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        active.clock = active.clock.saturating_add(accumulated);

        while let Some(spawn) = plan.spawns().get(active.spawned) {
            if active.clock < spawn.at {
                break;
            }
            active.spawned += 1;
            debug!(
                wave = active.index + 1,
                spawned = active.spawned,
                total = plan.len(),
                kind = spawn.kind.label(),
                "wave spawn due"
            );
            out.push(Command::SpawnEnemy { kind: spawn.kind });
        }
    }

    /// Reports whether the active wave has fully played out.
    ///
    /// A wave completes once every spawn has been emitted, the field holds
    /// no enemies, and [`WAVE_SETTLE_TIME`] has passed since the final
    /// spawn so late splits still count against the wave.
    #[must_use]
    pub fn is_wave_complete(&self, enemy_count: usize) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let Some(plan) = self.waves.get(active.index) else {
            return false;
        };

        active.spawned >= plan.len()
            && enemy_count == 0
            && active.clock >= plan.last_spawn().saturating_add(WAVE_SETTLE_TIME)
    }
}

fn wave_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Relative odds of each kind appearing in generated waves, by wave index.
fn roster_weights(index: usize) -> [(EnemyKind, u32); 4] {
    match index {
        0 => [
            (EnemyKind::Scout, 3),
            (EnemyKind::Tank, 1),
            (EnemyKind::Splitter, 0),
            (EnemyKind::Ghost, 0),
        ],
        1 => [
            (EnemyKind::Scout, 3),
            (EnemyKind::Tank, 2),
            (EnemyKind::Splitter, 1),
            (EnemyKind::Ghost, 0),
        ],
        _ => [
            (EnemyKind::Scout, 3),
            (EnemyKind::Tank, 2),
            (EnemyKind::Splitter, 2),
            (EnemyKind::Ghost, 2),
        ],
    }
}

fn generate_wave(index: usize, count: u32, seed: u64) -> WavePlan {
    let mut rng = ChaCha8Rng::from_seed(derive_wave_seed(seed, index));
    let weights = roster_weights(index);
    let total_weight: u32 = weights.iter().map(|(_, weight)| weight).sum();

    let mut at = Duration::ZERO;
    let mut spawns = Vec::with_capacity(count as usize);
    for spawn in 0..count {
        if spawn > 0 {
            at += Duration::from_millis(rng.gen_range(MIN_SPAWN_GAP_MS..=MAX_SPAWN_GAP_MS));
        }

        let mut roll = rng.gen_range(0..total_weight);
        let mut kind = EnemyKind::Scout;
        for (candidate, weight) in weights {
            if roll < weight {
                kind = candidate;
                break;
            }
            roll -= weight;
        }
        spawns.push(WaveSpawn { kind, at });
    }

    WavePlan::new(format!("Wave {}", wave_number(index)), spawns)
}

fn derive_wave_seed(seed: u64, index: usize) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(WAVE_SEED_LABEL);
    hasher.update(seed.to_le_bytes());
    hasher.update((index as u64).to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0_u8; 32];
    bytes.copy_from_slice(&digest);
    bytes
}
