//! Game session: the phase state machine wired to the clock
//!
//! ```text
//! NotStarted --start--> Running --collision / fell out--> Paused
//!                          ^                                 |
//!                          +-------------resume--------------+
//! ```
//!
//! Every handler runs to completion before the next tick is pulled from the
//! clock, so a pause or reconfiguration inside a handler applies to the very
//! next delivery.

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::GameClock;
use super::difficulty;
use super::hud::HudView;
use super::state::{Building, Drone, EntityState, SessionPhase};
use super::tick::{ObstacleOutcome, PhysicsOutcome, obstacle_step, physics_step};
use crate::consts::{BASE_DIFFICULTY_INTERVAL, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::platform::{Scheduler, TickSource};
use crate::settings::Settings;

/// Something that happened during a handler, for hosts to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Started,
    Boosted,
    /// Drone hit the building; the run is over
    Collided { score: f64 },
    /// Drone dropped off the bottom; the run is over
    FellOut { score: f64 },
    /// A new run began after a loss
    Resumed { final_score: f64, new_high_score: bool },
    ObstacleRecycled { y: f32 },
    /// The difficulty period changed to a different value
    DifficultyChanged { level: usize, interval: Duration },
}

pub struct GameSession<S: Scheduler, P: ScoreStore> {
    phase: SessionPhase,
    entities: EntityState,
    high_score: HighScore,
    clock: GameClock<S>,
    store: P,
    rng: Pcg32,
    screen_width: f32,
    screen_height: f32,
    resync_high_score: bool,
    events: Vec<SessionEvent>,
}

impl<S: Scheduler, P: ScoreStore> GameSession<S, P> {
    /// Create a session on the default screen. Reads the stored high score.
    pub fn new(scheduler: S, store: P, seed: u64) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            phase: SessionPhase::NotStarted,
            entities: EntityState::new(),
            high_score,
            clock: GameClock::new(scheduler),
            store,
            rng: Pcg32::seed_from_u64(seed),
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            resync_high_score: false,
            events: Vec::new(),
        }
    }

    /// Create a session configured from host settings
    pub fn with_settings(scheduler: S, store: P, settings: &Settings) -> Self {
        let seed = settings.seed_or_random();
        log::info!("Session seed: {}", seed);
        let mut session = Self::new(scheduler, store, seed);
        session.screen_width = settings.screen_width;
        session.screen_height = settings.screen_height;
        session.resync_high_score = settings.resync_high_score_each_tick;
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn entities(&self) -> &EntityState {
        &self.entities
    }

    pub fn score(&self) -> f64 {
        self.entities.score()
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    pub fn clock(&self) -> &GameClock<S> {
        &self.clock
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.screen_height
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot for the presentation layer
    pub fn hud(&self) -> HudView {
        HudView {
            score: self.entities.display_score(),
            high_score: self.high_score.display(),
            drone: self.entities.drone.pos,
            drone_size: Drone::SIZE,
            building: self.entities.building.pos,
            building_size: Building::SIZE,
            screen: Vec2::new(self.screen_width, self.screen_height),
            phase: self.phase,
            show_start_button: self.phase == SessionPhase::NotStarted,
            show_restart_button: self.phase == SessionPhase::Paused,
        }
    }

    /// Single input surface: start, boost or resume depending on the phase
    pub fn tap(&mut self) {
        match self.phase {
            SessionPhase::NotStarted => self.start(),
            SessionPhase::Running => self.boost(),
            SessionPhase::Paused => self.resume(),
        }
    }

    /// Leave the title screen. Ignored in any other phase.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::Running;
        self.clock.start(BASE_DIFFICULTY_INTERVAL);
        self.events.push(SessionEvent::Started);
        log::info!("Run started");
    }

    /// Jump up. Only while running.
    pub fn boost(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.entities.drone.boost();
        self.events.push(SessionEvent::Boosted);
    }

    /// Start a new run after a loss. Ignored unless paused.
    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        let final_score = self.entities.score();
        let new_high_score = self.high_score.submit_and_save(final_score, &mut self.store);
        if new_high_score {
            log::info!("New high score: {:.1}", final_score);
        }

        self.phase = SessionPhase::Running;
        self.entities.reset_for_restart();
        self.clock.start(BASE_DIFFICULTY_INTERVAL);
        self.events.push(SessionEvent::Resumed {
            final_score,
            new_high_score,
        });
        log::info!("Run restarted");
    }

    /// Deliver every tick due within the next `dt` of clock time
    pub fn advance(&mut self, dt: Duration) {
        let until = self.clock.now() + dt;
        while let Some(source) = self.clock.poll(until) {
            self.handle_tick(source);
        }
    }

    /// Apply a single tick
    pub fn handle_tick(&mut self, source: TickSource) {
        match source {
            TickSource::Physics => self.on_physics_tick(),
            TickSource::Difficulty => self.on_difficulty_tick(),
        }
    }

    fn on_physics_tick(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if self.resync_high_score {
            self.high_score.resync(&self.store);
        }

        match physics_step(&mut self.entities, self.screen_height) {
            PhysicsOutcome::Continue => {}
            PhysicsOutcome::Collided => {
                let score = self.entities.score();
                self.end_run(SessionEvent::Collided { score });
            }
            PhysicsOutcome::FellOut => {
                let score = self.entities.score();
                self.end_run(SessionEvent::FellOut { score });
            }
        }
    }

    fn on_difficulty_tick(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }

        if let ObstacleOutcome::Recycled { y } = obstacle_step(&mut self.entities, &mut self.rng) {
            log::debug!("Building recycled at y={:.0}", y);
            self.events.push(SessionEvent::ObstacleRecycled { y });
        }

        let score = self.entities.score();
        if let Some(interval) = difficulty::reconfiguration(score) {
            let previous = self.clock.difficulty_interval();
            self.clock.reconfigure(interval);
            if previous != Some(interval) {
                let level = difficulty::level(score);
                log::info!("Difficulty level {} ({} ms)", level, interval.as_millis());
                self.events
                    .push(SessionEvent::DifficultyChanged { level, interval });
            }
        }
    }

    fn end_run(&mut self, event: SessionEvent) {
        self.phase = SessionPhase::Paused;
        self.clock.stop();
        log::info!("Run over: {:?}", event);
        self.events.push(event);
    }
}

#[cfg(test)]
impl<S: Scheduler, P: ScoreStore> GameSession<S, P> {
    fn entities_mut(&mut self) -> &mut EntityState {
        &mut self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualScheduler;
    use glam::Vec2;
    use proptest::prelude::*;

    type TestSession = GameSession<ManualScheduler, MemoryStore>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session_with(store: MemoryStore) -> TestSession {
        GameSession::new(ManualScheduler::new(), store, 42)
    }

    fn running_session() -> TestSession {
        let mut session = session_with(MemoryStore::new());
        session.start();
        session.drain_events();
        session
    }

    fn crash(session: &mut TestSession) {
        let drone = session.entities().drone.pos;
        // Sits where the drone will be after the next gravity step
        session.entities_mut().building.pos = drone + Vec2::new(0.0, 40.0);
        session.advance(ms(100));
        assert_eq!(session.phase(), SessionPhase::Paused);
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut session = session_with(MemoryStore::new());
        session.advance(ms(1000));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(*session.entities(), EntityState::new());

        // Boost and resume are ignored on the title screen
        session.boost();
        session.resume();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.entities().drone.pos.y, 100.0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_five_physics_ticks() {
        let mut session = running_session();
        session.advance(ms(500));

        assert_eq!(session.phase(), SessionPhase::Running);
        assert!((session.score() - 0.5).abs() < 1e-9);
        assert_eq!(session.entities().drone.pos.y, 300.0);
        assert_eq!(session.entities().building.pos.x, 700.0 - 5.0 * 30.0);
    }

    #[test]
    fn test_boost_applies_immediately() {
        let mut session = running_session();
        session.advance(ms(50));
        session.tap();
        assert_eq!(session.entities().drone.pos.y, -30.0);
        assert_eq!(session.drain_events(), vec![SessionEvent::Boosted]);

        // The next physics tick clamps to the top after gravity
        session.tap();
        session.advance(ms(50));
        assert_eq!(session.entities().drone.pos.y, 0.0);
    }

    #[test]
    fn test_collision_pauses_and_stops_clock() {
        let mut session = running_session();
        crash(&mut session);

        assert!(!session.clock().is_running());
        assert!(matches!(
            session.drain_events().as_slice(),
            [SessionEvent::Collided { .. }]
        ));

        let frozen = *session.entities();
        session.advance(ms(2000));
        session.boost();
        assert_eq!(*session.entities(), frozen);

        let hud = session.hud();
        assert!(hud.show_restart_button);
        assert!(!hud.show_start_button);
    }

    #[test]
    fn test_falling_out_pauses() {
        let mut session = running_session();
        let h = session.screen_height();
        session.entities_mut().drone.pos.y = h + 9.0;
        session.advance(ms(100));
        assert_eq!(session.phase(), SessionPhase::Running);

        session.entities_mut().drone.pos.y = h + 11.0;
        session.advance(ms(100));
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(matches!(
            session.drain_events().last(),
            Some(SessionEvent::FellOut { .. })
        ));
    }

    #[test]
    fn test_resume_resets_and_saves_best() {
        let mut session = running_session();
        session.advance(ms(500));
        crash(&mut session);
        let final_score = session.score();
        assert!(final_score > 0.5);
        let building_y = session.entities().building.pos.y;

        session.drain_events();
        session.tap();

        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.entities().drone.pos, Vec2::new(100.0, 100.0));
        assert_eq!(session.entities().building.pos, Vec2::new(1000.0, building_y));
        assert_eq!(session.clock().difficulty_interval(), Some(ms(100)));
        assert!(session.clock().is_running());

        assert_eq!(session.store().read_high_score(), final_score);
        assert_eq!(session.store().writes(), 1);
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::Resumed {
                final_score,
                new_high_score: true
            }]
        );
    }

    #[test]
    fn test_resume_keeps_better_stored_score() {
        let mut session = session_with(MemoryStore::with_value(50.0));
        session.start();
        crash(&mut session);
        session.resume();

        assert_eq!(session.store().writes(), 0);
        assert_eq!(session.high_score().value(), 50.0);
        assert_eq!(session.hud().high_score_label(), "High Score: 50");
    }

    #[test]
    fn test_hud_reports_sizes_and_screen() {
        let settings = Settings {
            screen_width: 1024.0,
            screen_height: 600.0,
            seed: Some(3),
            ..Default::default()
        };
        let session =
            GameSession::with_settings(ManualScheduler::new(), MemoryStore::new(), &settings);
        let hud = session.hud();

        assert_eq!(hud.screen, Vec2::new(1024.0, 600.0));
        assert_eq!(hud.drone_size, Vec2::new(50.0, 50.0));
        assert_eq!(hud.building_size, Vec2::new(20.0, 200.0));
        assert_eq!(session.screen_width(), 1024.0);
        assert!(hud.show_start_button);
        assert_eq!(hud.score_label(), "0");
    }

    #[test]
    fn test_long_run_reaches_fastest_level_on_time() {
        let mut session = running_session();
        session.entities_mut().building.pos.x = 1.0e6;
        // One tick past 60s so a difficulty tick has seen the 60 point score
        for _ in 0..601 {
            // Hold the drone near the top so the run survives
            session.entities_mut().drone.pos.y = 0.0;
            session.advance(ms(100));
        }
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.hud().score, 60);
        assert_eq!(session.clock().difficulty_interval(), Some(ms(40)));
    }

    #[test]
    fn test_difficulty_follows_score() {
        let mut session = running_session();
        session.entities_mut().ticks = 450;
        session.advance(ms(100));

        assert_eq!(session.clock().difficulty_interval(), Some(ms(60)));
        assert!(session.drain_events().contains(&SessionEvent::DifficultyChanged {
            level: 2,
            interval: ms(60)
        }));

        // Next difficulty tick lands 60ms later
        let x = session.entities().building.pos.x;
        session.advance(ms(60));
        assert_eq!(session.entities().building.pos.x, x - 30.0);
    }

    #[test]
    fn test_unchanged_difficulty_still_reconfigures_quietly() {
        let mut session = running_session();
        session.entities_mut().ticks = 250;
        session.advance(ms(100));
        assert_eq!(session.clock().difficulty_interval(), Some(ms(80)));
        session.drain_events();

        session.advance(ms(80));
        assert_eq!(session.clock().difficulty_interval(), Some(ms(80)));
        assert!(
            !session
                .drain_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::DifficultyChanged { .. }))
        );
    }

    #[test]
    fn test_building_recycles_off_left_edge() {
        let mut session = running_session();
        session.entities_mut().building.pos.x = 0.0;
        // Keep the drone hovering so the run survives
        session.entities_mut().drone.pos.y = 0.0;
        session.advance(ms(100));

        let building = session.entities().building.pos;
        assert_eq!(building.x, 1000.0);
        assert!((0.0..400.0).contains(&building.y));
        assert!(
            session
                .drain_events()
                .contains(&SessionEvent::ObstacleRecycled { y: building.y })
        );
    }

    #[test]
    fn test_high_score_read_once_by_default() {
        let mut session = running_session();
        session.store.write_high_score(99.0);
        session.advance(ms(100));
        assert_eq!(session.high_score().value(), 0.0);
    }

    #[test]
    fn test_high_score_resync_when_enabled() {
        let settings = Settings {
            seed: Some(1),
            resync_high_score_each_tick: true,
            ..Default::default()
        };
        let mut session =
            GameSession::with_settings(ManualScheduler::new(), MemoryStore::new(), &settings);
        session.start();
        session.store.write_high_score(99.0);
        session.advance(ms(100));
        assert_eq!(session.high_score().value(), 99.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut session = running_session();
            for i in 0..300 {
                if i % 3 == 0 {
                    session.tap();
                }
                session.advance(ms(100));
            }
            (*session.entities(), session.phase())
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_resume_never_lowers_high_score(prior in 0.0f64..500.0, ticks in 0u64..5000) {
            let mut session = session_with(MemoryStore::with_value(prior));
            session.start();
            session.entities_mut().ticks = ticks;
            let reached = session.score();
            session.end_run(SessionEvent::Collided { score: reached });
            session.resume();

            let expected = prior.max(reached);
            prop_assert_eq!(session.high_score().value(), expected);
            prop_assert_eq!(session.store().read_high_score(), expected);
        }
    }
}
