//! Coarse session state machine wrapped around the world's tick loop.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarm_survival_core::PerkKind;
use swarm_survival_persistence::{capture, GameDao, SaveDocument, SaveError, SpawnerRecord};
use swarm_survival_system_spawning::{BossFlags, Config, SpawnController};
use swarm_survival_world::{collision, reaping, World};

use crate::camera::Camera;
use crate::input::InputSource;

/// Elapsed time at which a running session is won.
pub(crate) const SESSION_LENGTH_MS: f64 = 180_000.0;

/// Screen width handed to the camera.
const SCREEN_WIDTH: f32 = 800.0;
/// Screen height handed to the camera.
const SCREEN_HEIGHT: f32 = 600.0;

/// Coarse state driving whether ticks execute at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// Simulation ticks run.
    Running,
    /// Pause toggle engaged; no ticks.
    Paused,
    /// The player owes at least one upgrade choice; no ticks.
    UpgradeSelection,
    /// Terminal: the player died. Ticks halt and saving is suppressed.
    Dead,
    /// Terminal: the session length was survived.
    Won,
}

/// One play session: world, spawner, camera, and the state machine the
/// surrounding loop consults before ticking.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    spawner: SpawnController,
    camera: Camera,
    rng: ChaCha8Rng,
    state: SessionState,
    seed: u64,
}

impl Session {
    /// Starts a session from a loaded save document.
    #[must_use]
    pub(crate) fn from_document(document: &SaveDocument, seed: u64) -> Self {
        let (world, spawner_record) = swarm_survival_persistence::restore(document);
        let flags = BossFlags {
            minute_boss_added: spawner_record.minute_boss_added,
            second_minute_boss_added: spawner_record.second_minute_boss_added,
        };
        let spawner =
            SpawnController::restored(Config::default().with_seed(seed), flags, &world.clock());
        let camera = Camera::new(SCREEN_WIDTH, SCREEN_HEIGHT, world.bounds());
        Self {
            world,
            spawner,
            camera,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: SessionState::Running,
            seed,
        }
    }

    /// Starts a fresh session.
    #[must_use]
    pub(crate) fn fresh(seed: u64) -> Self {
        Self::from_document(&SaveDocument::default(), seed)
    }

    /// Current state-machine state.
    #[must_use]
    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    /// Read-only access to the world.
    #[must_use]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for tests.
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Advances the session by one frame.
    ///
    /// Consults the pause toggle first, then runs a simulation tick only
    /// in [`SessionState::Running`]: world update, collision pass, sweep
    /// pass, and finally the state transitions the tick produced.
    pub(crate) fn tick(&mut self, input: &mut dyn InputSource) {
        if input.pause_toggled() {
            self.state = match self.state {
                SessionState::Running => SessionState::Paused,
                SessionState::Paused => SessionState::Running,
                other => other,
            };
        }

        if self.state != SessionState::Running {
            return;
        }

        let (direction_x, direction_y) = input.movement();
        self.world.player_mut().steer(direction_x, direction_y);
        self.camera.follow(self.world.player().position());
        self.spawner.set_viewport(self.camera.view_rect());

        self.world.update(&mut self.spawner);
        collision::resolve(&mut self.world);

        if reaping::sweep(&mut self.world, &mut self.rng).is_err() {
            tracing::info!("player died; session over");
            self.state = SessionState::Dead;
            return;
        }

        if self.world.pending_upgrades() > 0 {
            self.state = SessionState::UpgradeSelection;
        } else if self.world.clock().now() >= SESSION_LENGTH_MS {
            tracing::info!("session length survived");
            self.state = SessionState::Won;
        }
    }

    /// Samples the perk choices for the current upgrade selection.
    #[must_use]
    pub(crate) fn upgrade_choices(&mut self) -> Vec<PerkKind> {
        self.world.upgrade_choices(3, &mut self.rng)
    }

    /// Applies one upgrade choice and leaves [`SessionState::UpgradeSelection`]
    /// once the pending counter drains.
    pub(crate) fn apply_upgrade(&mut self, choice: Option<PerkKind>) {
        if let Some(kind) = choice {
            tracing::info!(?kind, "perk chosen");
            self.world.grant_perk(kind);
        }
        self.world.consume_pending_upgrade();
        if self.world.pending_upgrades() == 0 && self.state == SessionState::UpgradeSelection {
            self.state = SessionState::Running;
        }
    }

    /// Persists the session unless the terminal Dead state suppresses it.
    ///
    /// Returns whether a document was written.
    ///
    /// # Errors
    ///
    /// Propagates [`SaveError`] from the gateway.
    pub(crate) fn save(&self, dao: &dyn GameDao) -> Result<bool, SaveError> {
        if self.state == SessionState::Dead {
            return Ok(false);
        }
        let flags = self.spawner.flags();
        let record = SpawnerRecord {
            minute_boss_added: flags.minute_boss_added,
            second_minute_boss_added: flags.second_minute_boss_added,
        };
        dao.save_game(&capture(&self.world, record))?;
        Ok(true)
    }

    /// Discards the session and the persisted save, reconstructing a fresh
    /// world from defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`SaveError`] from clearing the gateway.
    pub(crate) fn reset(&mut self, dao: &dyn GameDao) -> Result<(), SaveError> {
        dao.clear_save()?;
        *self = Self::fresh(self.seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{IdleInput, InputSource};
    use std::fs;
    use std::path::PathBuf;
    use swarm_survival_persistence::JsonFileDao;

    struct PausePress {
        pressed: bool,
    }

    impl InputSource for PausePress {
        fn movement(&mut self) -> (f32, f32) {
            (0.0, 0.0)
        }

        fn pause_toggled(&mut self) -> bool {
            std::mem::take(&mut self.pressed)
        }
    }

    fn temp_save_path(label: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "swarm-survival-session-{}-{}.json",
            label,
            std::process::id(),
        ));
        path
    }

    #[test]
    fn running_sessions_tick_the_clock() {
        let mut session = Session::fresh(1);
        let mut input = IdleInput;
        session.tick(&mut input);
        assert!(session.world().clock().now() > 0.0);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn pause_toggle_halts_and_resumes_ticking() {
        let mut session = Session::fresh(1);
        session.tick(&mut PausePress { pressed: true });
        assert_eq!(session.state(), SessionState::Paused);
        let frozen = session.world().clock().now();

        let mut idle = IdleInput;
        session.tick(&mut idle);
        assert_eq!(session.world().clock().now(), frozen);

        session.tick(&mut PausePress { pressed: true });
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.world().clock().now() > frozen);
    }

    #[test]
    fn level_ups_enter_and_leave_upgrade_selection() {
        let mut session = Session::fresh(1);
        session.world_mut().grant_experience(100);
        let mut input = IdleInput;
        session.tick(&mut input);
        assert_eq!(session.state(), SessionState::UpgradeSelection);
        let halted = session.world().clock().now();

        session.tick(&mut input);
        assert_eq!(session.world().clock().now(), halted, "selection halts ticks");

        let choices = session.upgrade_choices();
        assert!(!choices.is_empty());
        session.apply_upgrade(choices.first().copied());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn player_death_is_terminal_and_suppresses_saving() {
        let path = temp_save_path("dead");
        let dao = JsonFileDao::new(&path);
        let mut session = Session::fresh(1);
        session.world_mut().player_mut().take_damage(f32::MAX);

        let mut input = IdleInput;
        session.tick(&mut input);
        assert_eq!(session.state(), SessionState::Dead);

        let frozen = session.world().clock().now();
        session.tick(&mut input);
        assert_eq!(session.world().clock().now(), frozen);

        assert_eq!(session.save(&dao).expect("save call"), false);
        assert!(!path.exists(), "no document written for a dead session");
    }

    #[test]
    fn surviving_the_session_length_wins() {
        let document: SaveDocument =
            serde_json_clock(SESSION_LENGTH_MS - 1.0);
        let mut session = Session::from_document(&document, 1);
        let mut input = IdleInput;
        session.tick(&mut input);
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn reset_clears_the_save_and_starts_over() {
        let path = temp_save_path("reset");
        let dao = JsonFileDao::new(&path);
        let mut session = Session::from_document(&serde_json_clock(90_000.0), 1);
        assert!(session.save(&dao).expect("save"));

        session.reset(&dao).expect("reset");
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.world().clock().now(), 0.0);

        let reloaded = dao.load_game();
        assert_eq!(reloaded.clock, 0.0);
        assert!(reloaded.player.is_none());

        fs::remove_file(&path).expect("cleanup");
    }

    fn serde_json_clock(clock: f64) -> SaveDocument {
        SaveDocument {
            clock,
            ..SaveDocument::default()
        }
    }
}
