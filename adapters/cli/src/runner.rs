//! Drives the world, wave system and analytics through a headless session.

use std::{collections::VecDeque, mem, time::Duration};

use led_defence_core::{Command, Event, MapDefinition, SessionConfig};
use led_defence_rendering::{Color, Scene};
use led_defence_system_analytics::{Analytics, SessionReport};
use led_defence_system_spawning::{Config as WaveConfig, Spawning};
use led_defence_world::{self as world, query, World};
use tracing::{info, warn};

use crate::scenario::TimedCommand;

/// One session in progress.
#[derive(Debug)]
pub(crate) struct Runner {
    world: World,
    spawning: Spawning,
    analytics: Analytics,
    background: Color,
    timeline: VecDeque<TimedCommand>,
    queued: Vec<Command>,
    next_wave: usize,
}

impl Runner {
    pub(crate) fn new(
        map: &MapDefinition,
        config: SessionConfig,
        waves: WaveConfig,
        timeline: Vec<TimedCommand>,
    ) -> Self {
        Self {
            world: World::new(map, config),
            spawning: Spawning::new(waves),
            analytics: Analytics::new(),
            background: Color::from(map.background_color),
            timeline: timeline.into(),
            queued: Vec::new(),
            next_wave: 0,
        }
    }

    /// Issues due orders and wave commands, then advances the clock by `dt`.
    ///
    /// Spawns requested by the wave system during a step enter the field at
    /// the start of the following one.
    pub(crate) fn step(&mut self, dt: Duration) {
        let now = query::elapsed(&self.world);
        while self.timeline.front().is_some_and(|timed| timed.at <= now) {
            if let Some(timed) = self.timeline.pop_front() {
                self.queued.push(timed.command);
            }
        }
        self.advance_waves();

        let mut commands = mem::take(&mut self.queued);
        commands.push(Command::Tick { dt });

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        report_rejections(&events);
        self.spawning.handle(&events, &mut self.queued);
        self.analytics.handle(&events);
    }

    fn advance_waves(&mut self) {
        let ready = match self.spawning.current_wave() {
            None => self.next_wave == 0,
            Some(_) => self
                .spawning
                .is_wave_complete(query::enemy_count(&self.world)),
        };
        if !ready || self.next_wave >= self.spawning.total_waves() {
            return;
        }

        match self.spawning.start_wave(self.next_wave, &mut self.queued) {
            Ok(()) => self.next_wave += 1,
            Err(error) => warn!(%error, "could not start wave"),
        }
    }

    /// Whether every wave has played out.
    fn waves_finished(&self) -> bool {
        let total = self.spawning.total_waves();
        total == 0
            || (self.next_wave >= total
                && self
                    .spawning
                    .is_wave_complete(query::enemy_count(&self.world)))
    }

    /// Reports whether the session has nothing left to play.
    pub(crate) fn is_finished(&self) -> bool {
        query::economy(&self.world).session_over
            || (self.waves_finished()
                && self.timeline.is_empty()
                && self.queued.is_empty()
                && query::enemy_count(&self.world) == 0
                && query::strikes(&self.world).is_empty())
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn report(&self) -> &SessionReport {
        self.analytics.report()
    }

    /// Captures everything visible on the display right now.
    pub(crate) fn scene(&self) -> Scene {
        let world = &self.world;
        Scene {
            towers: query::tower_view(world).into_vec(),
            enemies: query::enemy_view(world).into_vec(),
            projectiles: query::projectiles(world),
            strikes: query::strikes(world),
            bombs: query::bombs(world),
            announcement: query::announcement(world),
            ..Scene::new(
                self.background,
                query::path(world).waypoints().to_vec(),
                query::tower_slots(world).to_vec(),
            )
        }
    }
}

fn report_rejections(events: &[Event]) {
    for event in events {
        match event {
            Event::TowerPlacementRejected { kind, at, reason } => {
                let (x, y) = at.pixel();
                warn!(kind = kind.label(), x, y, %reason, "tower order rejected");
            }
            Event::AbilityRejected { kind, reason } => {
                warn!(kind = kind.label(), %reason, "ability order rejected");
            }
            Event::SessionOver { score } => info!(score, "all lives lost"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use led_defence_core::{EnemyKind, TowerKind, WorldPoint};
    use led_defence_system_spawning::{WavePlan, WaveSpawn};

    use super::*;

    fn corridor() -> MapDefinition {
        MapDefinition {
            name: String::from("Corridor"),
            width: 64,
            height: 32,
            path: vec![WorldPoint::new(63.0, 16.0), WorldPoint::new(0.0, 16.0)],
            tower_slots: vec![WorldPoint::new(53.0, 8.0), WorldPoint::new(32.0, 8.0)],
            waves: vec![2],
            background_color: [80, 60, 20],
        }
    }

    fn run(runner: &mut Runner, limit: usize) -> usize {
        for step in 0..limit {
            if runner.is_finished() {
                return step;
            }
            runner.step(Duration::from_millis(100));
        }
        limit
    }

    #[test]
    fn waves_play_back_to_back_until_finished() {
        let waves = WaveConfig::new(vec![
            WavePlan::new("First", vec![WaveSpawn::after_secs(EnemyKind::Scout, 0.0)]),
            WavePlan::new("Second", vec![WaveSpawn::after_secs(EnemyKind::Tank, 0.5)]),
        ]);
        let mut runner = Runner::new(&corridor(), SessionConfig::default(), waves, Vec::new());

        let steps = run(&mut runner, 2_000);

        assert!(steps < 2_000, "session never finished");
        let report = runner.report();
        assert_eq!(report.waves_announced, 2);
        assert_eq!(report.escapes, 2);
        assert_eq!(query::economy(runner.world()).lives, 17);
    }

    #[test]
    fn scripted_orders_wait_for_their_time() {
        let timeline = vec![TimedCommand {
            at: Duration::from_secs(1),
            command: Command::PlaceTower {
                kind: TowerKind::MachineGun,
                at: WorldPoint::new(53.0, 8.0),
            },
        }];
        let mut runner = Runner::new(
            &corridor(),
            SessionConfig::default(),
            WaveConfig::new(Vec::new()),
            timeline,
        );

        for _ in 0..10 {
            runner.step(Duration::from_millis(100));
        }
        assert!(query::tower_view(runner.world()).iter().next().is_none());

        runner.step(Duration::from_millis(100));
        assert_eq!(query::economy(runner.world()).money, 170);
        assert!(runner.is_finished());
    }

    #[test]
    fn scene_carries_map_layers() {
        let runner = Runner::new(
            &corridor(),
            SessionConfig::default(),
            WaveConfig::new(Vec::new()),
            Vec::new(),
        );

        let scene = runner.scene();

        assert_eq!(scene.background, Color::from_rgb(80, 60, 20));
        assert_eq!(scene.path.len(), 2);
        assert_eq!(scene.tower_slots.len(), 2);
        assert!(scene.enemies.is_empty());
    }
}
