//! Banner plane announcing wave transitions.

use led_defence_core::{AnnouncementSnapshot, WorldPoint};

const BANNER_ENTRY: WorldPoint = WorldPoint::new(70.0, 16.0);
const BANNER_SPEED: f32 = 15.0;
/// The towed banner trails the plane, so the plane flies well past the edge.
const BANNER_EXIT_X: f32 = -65.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BannerPlane {
    wave: u32,
    position: WorldPoint,
}

impl BannerPlane {
    pub(crate) fn new(wave: u32) -> Self {
        Self {
            wave,
            position: BANNER_ENTRY,
        }
    }

    /// Moves the plane and reports whether it is still on the display.
    pub(crate) fn update(&mut self, dt: f32) -> bool {
        self.position = self.position.offset(-BANNER_SPEED * dt, 0.0);
        self.position.x() >= BANNER_EXIT_X
    }

    pub(crate) fn snapshot(&self) -> AnnouncementSnapshot {
        AnnouncementSnapshot {
            wave: self.wave,
            position: self.position,
        }
    }
}
