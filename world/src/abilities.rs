//! Ability cooldowns and the strikes they launch.

use std::collections::BTreeMap;

use led_defence_core::{AbilityError, AbilityKind, Event, StrikeId};
use tracing::debug;

use crate::{
    battlefield::Battlefield,
    strikes::{ActiveStrike, Launch},
};

/// Tracks cooldown expiry per ability and owns the strikes in the air.
#[derive(Debug)]
pub(crate) struct AbilityManager {
    expiries: BTreeMap<AbilityKind, f32>,
    strikes: Vec<ActiveStrike>,
    next_strike_id: StrikeId,
}

impl AbilityManager {
    pub(crate) fn new() -> Self {
        Self {
            expiries: BTreeMap::new(),
            strikes: Vec::new(),
            next_strike_id: StrikeId::new(0),
        }
    }

    /// Checks affordability first, then the cooldown.
    ///
    /// An ability that was never activated is never cooling down.
    pub(crate) fn check(&self, kind: AbilityKind, money: u32, now: f32) -> Result<(), AbilityError> {
        if money < kind.cost() {
            return Err(AbilityError::InsufficientFunds);
        }

        match self.expiries.get(&kind) {
            Some(expiry) if now < *expiry => Err(AbilityError::CoolingDown),
            _ => Ok(()),
        }
    }

    pub(crate) fn can_activate(&self, kind: AbilityKind, money: u32, now: f32) -> bool {
        self.check(kind, money, now).is_ok()
    }

    /// Starts the cooldown and launches the strike.
    ///
    /// Callers validate with [`AbilityManager::check`] and deduct the cost
    /// beforehand.
    pub(crate) fn activate(&mut self, kind: AbilityKind, now: f32, launch: Launch) -> StrikeId {
        let _ = self.expiries.insert(kind, now + kind.stats().cooldown);

        let id = self.next_strike_id;
        self.next_strike_id = StrikeId::new(id.get() + 1);
        self.strikes.push(ActiveStrike::launch(id, kind, launch));
        id
    }

    /// Seconds until the ability may be activated again, never negative.
    pub(crate) fn cooldown_remaining(&self, kind: AbilityKind, now: f32) -> f32 {
        self.expiries
            .get(&kind)
            .map_or(0.0, |expiry| (expiry - now).max(0.0))
    }

    /// Advances every strike in launch order and retires those that left.
    pub(crate) fn update(&mut self, dt: f32, field: &mut Battlefield<'_>, out: &mut Vec<Event>) {
        self.strikes.retain_mut(|strike| {
            let active = strike.update(dt, field, out);
            if !active {
                debug!(strike = strike.id.get(), kind = strike.kind().label(), "strike completed");
                out.push(Event::StrikeCompleted {
                    strike: strike.id,
                    kind: strike.kind(),
                });
            }
            active
        });
    }

    pub(crate) fn strikes(&self) -> impl Iterator<Item = &ActiveStrike> {
        self.strikes.iter()
    }
}
