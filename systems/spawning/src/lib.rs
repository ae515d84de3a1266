#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn scheduling: cadence-driven wave spawns on the viewport edges and
//! the scripted one-time boss spawns.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swarm_survival_core::{CooldownTimer, GameClock, MonsterKind, Position, Rect};
use swarm_survival_world::{Monster, Spawner, World};

/// Elapsed time at which the first scripted boss appears.
pub const FIRST_BOSS_MS: f64 = 60_000.0;
/// Elapsed time at which the second scripted boss appears.
pub const SECOND_BOSS_MS: f64 = 120_000.0;

/// Placement samples drawn before falling back to a clamped position.
const MAX_PLACEMENT_ATTEMPTS: u32 = 8;

/// Configuration parameters required to construct the spawn controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval_ms: f64,
    population_cap: usize,
    elite_percent: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from explicit knobs.
    #[must_use]
    pub const fn new(
        spawn_interval_ms: f64,
        population_cap: usize,
        elite_percent: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            spawn_interval_ms,
            population_cap,
            elite_percent,
            rng_seed,
        }
    }

    /// Replaces the RNG seed, keeping every other knob.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 250.0,
            population_cap: 20,
            elite_percent: 10,
            rng_seed: 0x4d59_5df4_d0f3_3173,
        }
    }
}

/// Idempotence flags for the scripted boss spawns, included in persisted
/// state so a resumed session never re-triggers them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossFlags {
    /// Set once the first-threshold boss has been added.
    pub minute_boss_added: bool,
    /// Set once the second-threshold boss has been added.
    pub second_minute_boss_added: bool,
}

/// Decides when and where new monsters enter the world.
///
/// Wave spawns fire whenever the cadence timer is ready and the population
/// sits below the cap; positions are sampled uniformly on the edges of the
/// externally supplied viewport rectangle. Scripted bosses are spawned
/// exactly once each when the clock crosses their thresholds.
#[derive(Debug)]
pub struct SpawnController {
    config: Config,
    spawn_timer: CooldownTimer,
    rng: ChaCha8Rng,
    viewport: Rect,
    flags: BossFlags,
}

impl SpawnController {
    /// Creates a controller armed against the provided clock reading.
    #[must_use]
    pub fn new(config: Config, clock: &GameClock) -> Self {
        Self {
            config,
            spawn_timer: CooldownTimer::armed(config.spawn_interval_ms, clock),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            flags: BossFlags::default(),
        }
    }

    /// Restores a controller with persisted boss flags.
    #[must_use]
    pub fn restored(config: Config, flags: BossFlags, clock: &GameClock) -> Self {
        let mut controller = Self::new(config, clock);
        controller.flags = flags;
        controller
    }

    /// Current boss flags, for the persistence gateway.
    #[must_use]
    pub fn flags(&self) -> BossFlags {
        self.flags
    }

    /// Updates the viewport rectangle used for edge sampling.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    fn run_boss_script(&mut self, world: &mut World) {
        let now = world.clock().now();
        if !self.flags.minute_boss_added && now >= FIRST_BOSS_MS {
            self.flags.minute_boss_added = true;
            self.spawn(world, MonsterKind::Boss);
        }
        if !self.flags.second_minute_boss_added && now >= SECOND_BOSS_MS {
            self.flags.second_minute_boss_added = true;
            self.spawn(world, MonsterKind::Megaboss);
        }
    }

    fn spawn(&mut self, world: &mut World, kind: MonsterKind) {
        let position = self.sample_position(world);
        let clock = world.clock();
        tracing::debug!(?kind, x = position.x(), y = position.y(), "spawning monster");
        world.add_monster(Monster::spawned(kind, position, &clock));
    }

    /// Samples a point on one of the four viewport edges, retrying when it
    /// falls outside the playfield. The retry count is bounded; the final
    /// fallback clamps the last sample into bounds so a degenerate
    /// viewport can never spin the spawner.
    fn sample_position(&mut self, world: &World) -> Position {
        let bounds = world.bounds();
        let mut candidate = self.sample_edge_point();
        for _ in 1..MAX_PLACEMENT_ATTEMPTS {
            if bounds.contains(candidate) {
                return candidate;
            }
            candidate = self.sample_edge_point();
        }
        if bounds.contains(candidate) {
            candidate
        } else {
            bounds.clamp(candidate)
        }
    }

    fn sample_edge_point(&mut self) -> Position {
        let rect = self.viewport;
        let along_x = self.rng.gen_range(rect.x()..=rect.x() + rect.width());
        let along_y = self.rng.gen_range(rect.y()..=rect.y() + rect.height());
        match self.rng.gen_range(0..4_u32) {
            0 => Position::new(along_x, rect.y()),
            1 => Position::new(along_x, rect.y() + rect.height()),
            2 => Position::new(rect.x(), along_y),
            _ => Position::new(rect.x() + rect.width(), along_y),
        }
    }

    fn sample_wave_kind(&mut self) -> MonsterKind {
        if self.rng.gen_range(0..100_u32) < self.config.elite_percent {
            MonsterKind::Gunner
        } else {
            MonsterKind::Common
        }
    }
}

impl Spawner for SpawnController {
    fn update(&mut self, world: &mut World) {
        self.run_boss_script(world);

        let clock = world.clock();
        if !self.spawn_timer.ready(&clock) {
            return;
        }
        if world.monster_count() >= self.config.population_cap {
            return;
        }

        let kind = self.sample_wave_kind();
        self.spawn(world, kind);
        self.spawn_timer.trigger(&clock);
    }
}
