//! Enemy movement, health and reveal bookkeeping.

use led_defence_core::{EnemyId, EnemyKind, EnemySnapshot, Path, WorldPoint};

/// Detection state owned by a single enemy.
///
/// Range coverage is cleared and re-derived every tick, while the sweep
/// timer counts down on its own and may be renewed by any radar beam.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RevealState {
    covered: bool,
    timer: f32,
}

impl RevealState {
    pub(crate) fn is_revealed(&self) -> bool {
        self.covered || self.timer > 0.0
    }

    pub(crate) fn clear_coverage(&mut self) {
        self.covered = false;
    }

    pub(crate) fn cover(&mut self) {
        self.covered = true;
    }

    /// Restarts the countdown; stamps replace rather than extend it.
    pub(crate) fn stamp(&mut self, duration: f32) {
        self.timer = duration;
    }

    fn decay(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
        }
    }
}

/// Enemy walking the path, stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    health: f32,
    position: WorldPoint,
    path_index: usize,
    path_progress: f32,
    alive: bool,
    reveal: RevealState,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint.
    pub(crate) fn at_path_start(id: EnemyId, kind: EnemyKind, path: &Path) -> Self {
        let position = path.start().unwrap_or_default();
        Self::new(id, kind, position, 0, 0.0)
    }

    /// Creates an enemy at an arbitrary point, resuming from the segment
    /// that leads to the nearest waypoint.
    pub(crate) fn at_position(
        id: EnemyId,
        kind: EnemyKind,
        position: WorldPoint,
        path: &Path,
    ) -> Self {
        let path_index = path.resume_index(position);
        let path_progress = path.progress_at(path_index, position);
        Self::new(id, kind, position, path_index, path_progress)
    }

    fn new(
        id: EnemyId,
        kind: EnemyKind,
        position: WorldPoint,
        path_index: usize,
        path_progress: f32,
    ) -> Self {
        Self {
            id,
            kind,
            health: kind.stats().health,
            position,
            path_index,
            path_progress,
            alive: true,
            reveal: RevealState::default(),
        }
    }

    /// Moves the enemy along the path and reports whether it stands at the exit.
    ///
    /// An enemy that arrives on the final waypoint reports the exit on the
    /// following call. Budget left over after snapping onto a waypoint is
    /// discarded.
    pub(crate) fn advance(&mut self, dt: f32, path: &Path) -> bool {
        self.reveal.decay(dt);

        if self.path_index >= path.final_index() {
            return true;
        }

        let Some(next) = path.waypoint(self.path_index + 1) else {
            return true;
        };

        let remaining = self.position.distance(next);
        if remaining == 0.0 {
            self.path_index += 1;
            return false;
        }

        let step = self.kind.stats().speed * dt;
        if remaining <= step {
            self.position = next;
            self.path_progress += remaining;
            self.path_index += 1;
        } else {
            self.position = self.position.step_toward(next, step);
            self.path_progress += step;
        }

        false
    }

    /// Removes health and reports whether this hit was the lethal one.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }

        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            return true;
        }

        false
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn reveal_mut(&mut self) -> &mut RevealState {
        &mut self.reveal
    }

    /// Captures the enemy for systems and adapters.
    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            path_progress: self.path_progress,
            alive: self.alive,
            revealed: self.reveal.is_revealed(),
        }
    }
}

/// Looks up an enemy in a collection kept sorted by identifier.
pub(crate) fn find(enemies: &[Enemy], id: EnemyId) -> Option<&Enemy> {
    enemies
        .binary_search_by_key(&id, Enemy::id)
        .ok()
        .map(|index| &enemies[index])
}

/// Mutable counterpart of [`find`].
pub(crate) fn find_mut(enemies: &mut [Enemy], id: EnemyId) -> Option<&mut Enemy> {
    let index = enemies.binary_search_by_key(&id, Enemy::id).ok()?;
    enemies.get_mut(index)
}
