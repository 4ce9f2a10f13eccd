use glam::Vec2;
use led_defence_core::{
    rasterize_line, AbilityKind, AnnouncementSnapshot, BombSnapshot, EnemyId, EnemyKind,
    EnemySnapshot, ProjectileSnapshot, Shooter, StrikeSnapshot, TowerKind, TowerSnapshot,
    WorldPoint,
};

use crate::{Color, DisplaySurface};

const PATH: Color = Color::from_rgb(100, 100, 100);
const TOWER_SLOT: Color = Color::from_rgb(128, 107, 0);
const RADAR_RANGE: Color = Color::from_rgb(0, 80, 0);
const RADAR_SWEEP: Color = Color::from_rgb(0, 120, 0);
const SNIPER_TRACER: Color = Color::from_rgb(255, 255, 100);
const GUNSHIP_TRACER: Color = Color::from_rgb(255, 255, 0);
const BOMB: Color = Color::from_rgb(255, 200, 0);
const EXPLOSION: Color = Color::from_rgb(255, 100, 0);
const EXPLOSION_CORE: Color = Color::from_rgb(255, 255, 0);

const TOWER_SIZE: i32 = 3;
const SLOT_SIZE: i32 = 4;
/// Tracers stay visible this long after a sniper fires.
const TRACER_FLASH_SECS: f32 = 0.1;
const EXPLOSION_SIZE: i32 = 6;
const BANNER_ROPE: i32 = 8;
const BANNER_LENGTH: i32 = 45;
const BANNER_HALF_HEIGHT: i32 = 6;

/// Everything drawn in one frame, captured from world queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Fill color behind the map.
    pub background: Color,
    /// Path waypoints in walking order.
    pub path: Vec<WorldPoint>,
    /// Slots towers may be built on.
    pub tower_slots: Vec<WorldPoint>,
    /// Towers in placement order.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies on the field.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Air strikes crossing the display.
    pub strikes: Vec<StrikeSnapshot>,
    /// Falling and exploding bombs.
    pub bombs: Vec<BombSnapshot>,
    /// Banner plane announcing a wave.
    pub announcement: Option<AnnouncementSnapshot>,
}

impl Scene {
    /// Creates a scene holding only the static map layers.
    #[must_use]
    pub fn new(background: Color, path: Vec<WorldPoint>, tower_slots: Vec<WorldPoint>) -> Self {
        Self {
            background,
            path,
            tower_slots,
            ..Self::default()
        }
    }

    fn enemy(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    fn tower_kind(&self, shooter: Shooter) -> Option<TowerKind> {
        match shooter {
            Shooter::Tower(id) => self
                .towers
                .iter()
                .find(|tower| tower.id == id)
                .map(|tower| tower.kind),
            Shooter::Strike(_) => None,
        }
    }
}

/// Draws the scene from the ground up: map, towers, enemies, air layer and
/// finally the wave banner.
pub fn render<S: DisplaySurface + ?Sized>(scene: &Scene, surface: &mut S) {
    let (width, height) = (surface.width() as i32, surface.height() as i32);
    surface.fill_rect(0, 0, width, height, scene.background);

    draw_path(&scene.path, surface);
    for slot in &scene.tower_slots {
        let (x, y) = slot.pixel();
        surface.fill_rect(x - 2, y - 2, SLOT_SIZE, SLOT_SIZE, TOWER_SLOT);
    }

    for tower in &scene.towers {
        draw_tower(scene, tower, surface);
    }
    for enemy in scene.enemies.iter().filter(|enemy| enemy.alive) {
        draw_enemy(enemy, surface);
    }
    for projectile in &scene.projectiles {
        let color = match scene.tower_kind(projectile.shooter) {
            Some(kind) => projectile_color(kind),
            None => GUNSHIP_TRACER,
        };
        let (x, y) = projectile.position.pixel();
        surface.set_pixel(x, y, color);
    }

    for strike in &scene.strikes {
        match strike.kind {
            AbilityKind::Helicopter => draw_helicopter(strike.position, surface),
            AbilityKind::Bomber => draw_bomber(strike.position, surface),
        }
    }
    for bomb in &scene.bombs {
        draw_bomb(bomb, surface);
    }

    if let Some(banner) = &scene.announcement {
        draw_banner(banner.position, surface);
    }
}

fn draw_path<S: DisplaySurface + ?Sized>(path: &[WorldPoint], surface: &mut S) {
    for segment in path.windows(2) {
        let (from, to) = (segment[0].pixel(), segment[1].pixel());
        let horizontal = from.1 == to.1;
        for (x, y) in rasterize_line(from, to) {
            surface.set_pixel(x, y, PATH);
            if horizontal {
                surface.set_pixel(x, y - 1, PATH);
                surface.set_pixel(x, y + 1, PATH);
            } else {
                surface.set_pixel(x - 1, y, PATH);
                surface.set_pixel(x + 1, y, PATH);
            }
        }
    }
}

fn tower_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::MachineGun => Color::from_rgb(100, 150, 50),
        TowerKind::Cannon => Color::from_rgb(80, 80, 80),
        TowerKind::Sniper => Color::from_rgb(40, 40, 40),
        TowerKind::Radar => Color::from_rgb(50, 150, 200),
    }
}

fn projectile_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::Cannon => BOMB,
        TowerKind::Sniper => SNIPER_TRACER,
        TowerKind::MachineGun | TowerKind::Radar => Color::from_rgb(200, 200, 200),
    }
}

fn draw_tower<S: DisplaySurface + ?Sized>(scene: &Scene, tower: &TowerSnapshot, surface: &mut S) {
    let center = tower.position.pixel();
    let range = tower.kind.range();

    // Range ring sits under the tower body.
    if tower.kind.is_radar() {
        surface.draw_circle(center, range as i32, RADAR_RANGE);
    }

    let half = TOWER_SIZE / 2;
    surface.fill_rect(
        center.0 - half,
        center.1 - half,
        TOWER_SIZE,
        TOWER_SIZE,
        tower_color(tower.kind),
    );

    if let Some(angle) = tower.sweep_angle {
        let origin = Vec2::new(tower.position.x(), tower.position.y());
        let tip = origin + Vec2::new(angle.cos(), angle.sin()) * (range.trunc() - 1.0);
        let tip = tip.as_ivec2();
        surface.draw_line(center, (tip.x, tip.y), RADAR_SWEEP);
    }

    if tower.kind == TowerKind::Sniper && tower.since_last_shot < TRACER_FLASH_SECS {
        let target = tower
            .target
            .and_then(|id| scene.enemy(id))
            .filter(|enemy| enemy.alive);
        if let Some(target) = target {
            surface.draw_line(center, target.position.pixel(), SNIPER_TRACER);
        }
    }
}

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Scout => Color::from_rgb(200, 20, 20),
        EnemyKind::Tank => Color::from_rgb(80, 80, 80),
        EnemyKind::Splitter => Color::from_rgb(255, 180, 0),
        EnemyKind::Ghost => Color::from_rgb(150, 100, 255),
    }
}

fn draw_enemy<S: DisplaySurface + ?Sized>(enemy: &EnemySnapshot, surface: &mut S) {
    let (x, y) = enemy.position.pixel();
    if enemy.kind.is_invisible() && !enemy.revealed {
        // Hidden ghosts only shimmer over whatever lies beneath them.
        if let Some(beneath) = surface.pixel(x, y) {
            surface.set_pixel(x, y, beneath.tint(3, 5, 15));
        }
        return;
    }
    surface.set_pixel(x, y, enemy_color(enemy.kind));
}

fn draw_helicopter<S: DisplaySurface + ?Sized>(position: WorldPoint, surface: &mut S) {
    let (x, y) = position.pixel();
    let tail = Color::from_rgb(40, 120, 40);
    let blades = Color::from_rgb(120, 120, 120);

    surface.fill_rect(x - 1, y - 1, 3, 3, Color::from_rgb(50, 150, 50));
    surface.fill_rect(x + 2, y, 2, 1, tail);
    surface.set_pixel(x + 3, y - 1, tail);
    surface.set_pixel(x + 3, y + 1, tail);
    for dx in [-3, -2, 2, 3] {
        surface.set_pixel(x + dx, y - 2, blades);
    }
    surface.set_pixel(x, y, Color::from_rgb(90, 90, 90));
}

fn draw_bomber<S: DisplaySurface + ?Sized>(position: WorldPoint, surface: &mut S) {
    let (x, y) = position.pixel();
    let hull = Color::from_rgb(120, 120, 120);
    let wing = Color::from_rgb(100, 100, 100);
    let engine = Color::from_rgb(40, 40, 40);
    let exhaust = Color::from_rgb(255, 100, 0);
    let nose = Color::from_rgb(180, 180, 180);

    surface.fill_rect(x, y - 5, 2, 10, wing);
    surface.fill_rect(x + 1, y - 5, 1, 10, hull);
    surface.fill_rect(x + 1, y - 4, 1, 2, engine);
    surface.set_pixel(x + 2, y - 3, exhaust);
    surface.fill_rect(x + 1, y + 2, 1, 2, engine);
    surface.set_pixel(x + 2, y + 3, exhaust);
    surface.fill_rect(x - 2, y - 1, 6, 2, hull);
    surface.fill_rect(x - 3, y - 1, 2, 2, nose);
    surface.set_pixel(x - 4, y, nose);
    surface.fill_rect(x + 4, y - 2, 1, 4, wing);
}

fn draw_bomb<S: DisplaySurface + ?Sized>(bomb: &BombSnapshot, surface: &mut S) {
    let (x, y) = bomb.position.pixel();
    if bomb.exploded {
        let half = EXPLOSION_SIZE / 2;
        surface.fill_rect(x - half, y - half, EXPLOSION_SIZE, EXPLOSION_SIZE, EXPLOSION);
        surface.fill_rect(x - 1, y - 1, 2, 2, EXPLOSION_CORE);
    } else {
        surface.fill_rect(x, y, 2, 2, BOMB);
    }
}

fn draw_banner<S: DisplaySurface + ?Sized>(position: WorldPoint, surface: &mut S) {
    let (x, y) = position.pixel();
    let body = Color::from_rgb(200, 20, 20);
    let wing = Color::from_rgb(180, 20, 20);

    surface.fill_rect(x - 2, y - 1, 5, 2, body);
    surface.set_pixel(x - 3, y, body);
    surface.set_pixel(x - 4, y, Color::from_rgb(220, 40, 40));
    surface.fill_rect(x - 2, y - 1, 2, 2, Color::from_rgb(120, 10, 10));
    surface.fill_rect(x - 1, y - 3, 2, 2, wing);
    surface.fill_rect(x - 1, y + 2, 2, 2, wing);
    surface.fill_rect(x + 3, y - 1, 1, 2, wing);
    surface.set_pixel(x + 4, y, wing);

    let tail = (x + 3, y);
    let banner_x = tail.0 + BANNER_ROPE;
    let rope = Color::from_rgb(100, 80, 60);
    surface.draw_line(tail, (banner_x, y - BANNER_HALF_HEIGHT), rope);
    surface.draw_line(tail, (banner_x, y + BANNER_HALF_HEIGHT), rope);
    surface.fill_rect(
        banner_x,
        y - BANNER_HALF_HEIGHT,
        BANNER_LENGTH,
        BANNER_HALF_HEIGHT * 2 + 1,
        Color::from_rgb(220, 220, 180),
    );
}
