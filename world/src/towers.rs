//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use led_defence_core::{
    Cooldown, EnemyId, ProjectileSnapshot, Shooter, TowerId, TowerKind, TowerRole,
    TowerSnapshot, WorldPoint,
};

use crate::projectiles::Projectile;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Slot the tower occupies.
    pub(crate) position: WorldPoint,
    /// Time accumulated toward the next shot.
    pub(crate) cooldown: Cooldown,
    /// Enemy most recently fired upon.
    pub(crate) target: Option<EnemyId>,
    /// Projectiles still in flight.
    pub(crate) projectiles: Vec<Projectile>,
    /// Beam angle of radar towers, in radians.
    pub(crate) sweep_angle: f32,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, position: WorldPoint) -> Self {
        let period = match kind.stats().role {
            TowerRole::Gunnery { fire_period, .. } => fire_period,
            TowerRole::Radar { .. } => f32::INFINITY,
        };

        Self {
            id,
            kind,
            position,
            cooldown: Cooldown::new(period),
            target: None,
            projectiles: Vec::new(),
            sweep_angle: 0.0,
        }
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            target: self.target,
            since_last_shot: self.cooldown.elapsed(),
            sweep_angle: self.kind.is_radar().then_some(self.sweep_angle),
        }
    }

    pub(crate) fn projectile_snapshots(&self) -> impl Iterator<Item = ProjectileSnapshot> + '_ {
        self.projectiles
            .iter()
            .map(|projectile| projectile.snapshot(Shooter::Tower(self.id)))
    }
}

/// Registry that stores towers in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Reports whether a tower already stands exactly on the slot.
    pub(crate) fn is_occupied(&self, slot: WorldPoint) -> bool {
        self.entries.values().any(|tower| tower.position == slot)
    }

    /// Builds a tower on the slot and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, slot: WorldPoint) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get() + 1);
        let previous = self.entries.insert(id, TowerState::new(id, kind, slot));
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}

/// Picks the slot nearest to `at`, provided it lies within `max_distance`.
///
/// The earliest slot wins ties.
pub(crate) fn nearest_slot(
    slots: &[WorldPoint],
    at: WorldPoint,
    max_distance: f32,
) -> Option<WorldPoint> {
    let mut nearest: Option<(WorldPoint, f32)> = None;
    for slot in slots {
        let distance = slot.distance(at);
        match nearest {
            Some((_, closest)) if distance >= closest => {}
            _ => nearest = Some((*slot, distance)),
        }
    }

    nearest
        .filter(|(_, distance)| *distance <= max_distance)
        .map(|(slot, _)| slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Cannon, WorldPoint::new(55.0, 8.0));
        let second = registry.insert(TowerKind::Radar, WorldPoint::new(55.0, 22.0));

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        let kinds: Vec<_> = registry.iter().map(|tower| tower.kind).collect();
        assert_eq!(kinds, vec![TowerKind::Cannon, TowerKind::Radar]);
    }

    #[test]
    fn occupancy_requires_exact_slot() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert(TowerKind::MachineGun, WorldPoint::new(20.0, 6.0));

        assert!(registry.is_occupied(WorldPoint::new(20.0, 6.0)));
        assert!(!registry.is_occupied(WorldPoint::new(20.0, 7.0)));
    }

    #[test]
    fn slot_snapping_respects_distance_limit() {
        let slots = [WorldPoint::new(55.0, 8.0), WorldPoint::new(55.0, 22.0)];

        assert_eq!(
            nearest_slot(&slots, WorldPoint::new(52.0, 12.0), 5.0),
            Some(WorldPoint::new(55.0, 8.0))
        );
        assert_eq!(nearest_slot(&slots, WorldPoint::new(40.0, 15.0), 5.0), None);
        assert_eq!(nearest_slot(&[], WorldPoint::new(0.0, 0.0), 5.0), None);
    }

    #[test]
    fn radar_snapshot_exposes_sweep_angle() {
        let mut registry = TowerRegistry::new();
        let radar = registry.insert(TowerKind::Radar, WorldPoint::new(38.0, 18.0));
        let cannon = registry.insert(TowerKind::Cannon, WorldPoint::new(20.0, 6.0));

        let snapshots: Vec<_> = registry.iter().map(TowerState::snapshot).collect();

        assert_eq!(snapshots[0].id, radar);
        assert_eq!(snapshots[0].sweep_angle, Some(0.0));
        assert_eq!(snapshots[1].id, cannon);
        assert_eq!(snapshots[1].sweep_angle, None);
    }
}
