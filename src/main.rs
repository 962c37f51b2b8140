//! Robofly entry point
//!
//! Native builds run a headless session in virtual time: a simple autopilot
//! taps whenever the drone sinks below its target height, the session is
//! restarted after every loss, and the high score is kept on disk.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use robofly::consts::DRONE_START_X;
    use robofly::platform::ManualScheduler;
    use robofly::sim::HudView;
    use robofly::{GameSession, JsonFileStore, SessionEvent, SessionPhase, Settings};

    /// Host frame period
    const FRAME: Duration = Duration::from_millis(16);
    /// Minimum time between autopilot taps
    const TAP_COOLDOWN: Duration = Duration::from_millis(200);
    /// Losses before the demo exits
    const ROUNDS: u32 = 3;
    /// Cap on a single round, in virtual time
    const MAX_ROUND_TIME: Duration = Duration::from_secs(180);

    /// Height the autopilot tries to hold for the current obstacle
    fn target_height(hud: &HudView) -> f32 {
        let building = hud.building;
        let screen = hud.screen;
        // React once the building is within a third of the screen
        let window = screen.x / 3.0;
        let approaching = building.x > DRONE_START_X - hud.building_size.x * 3.0
            && building.x < DRONE_START_X + window;
        // Half the building plus the whole drone plus a little slack
        let clearance = hud.building_size.y / 2.0 + hud.drone_size.y + 20.0;
        let target = if !approaching {
            screen.y / 2.0
        } else if building.y > screen.y / 2.0 {
            building.y - clearance
        } else {
            building.y + clearance
        };
        target.clamp(hud.drone_size.y / 2.0, screen.y)
    }

    /// Shown when the demo stops mid-run; that run never reached a restart
    fn time_limit_notice(hud: &HudView) -> String {
        format!(
            "Round time limit reached, ending demo; this round's score of {} was not saved",
            hud.score
        )
    }

    fn report(events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::Collided { score } => {
                    log::info!("Crashed into the building at {:.1}", score)
                }
                SessionEvent::FellOut { score } => log::info!("Fell off screen at {:.1}", score),
                SessionEvent::Resumed {
                    final_score,
                    new_high_score: true,
                } => log::info!("Round scored {:.1}, new best!", final_score),
                SessionEvent::DifficultyChanged { level, interval } => {
                    log::debug!("Level {} at {:?}", level, interval)
                }
                _ => {}
            }
        }
    }

    pub fn run() {
        let settings = Settings::load();
        let store = JsonFileStore::new(&settings.high_score_path);
        let mut session = GameSession::with_settings(ManualScheduler::new(), store, &settings);
        log::info!("{}", session.hud().high_score_label());

        session.tap();
        let mut rounds = 0;
        let mut round_time = Duration::ZERO;
        let mut since_tap = TAP_COOLDOWN;

        while rounds < ROUNDS {
            let hud = session.hud();
            match hud.phase {
                SessionPhase::Running => {
                    let target = target_height(&hud);
                    if hud.drone.y > target && since_tap >= TAP_COOLDOWN {
                        session.tap();
                        since_tap = Duration::ZERO;
                    }
                }
                SessionPhase::Paused => {
                    rounds += 1;
                    log::info!("Round {} over: score {}", rounds, hud.score);
                    // Restarting is what records the score
                    session.tap();
                    round_time = Duration::ZERO;
                }
                SessionPhase::NotStarted => session.tap(),
            }

            session.advance(FRAME);
            round_time += FRAME;
            since_tap += FRAME;
            report(session.drain_events());

            if round_time >= MAX_ROUND_TIME {
                // Scores are only recorded on restart, which needs a loss first
                log::warn!("{}", time_limit_notice(&session.hud()));
                break;
            }
        }

        let hud = session.hud();
        println!("{}", hud.high_score_label());
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Robofly (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library; there is no standalone wasm binary
}
