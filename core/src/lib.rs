#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Swarm Survival engine.
//!
//! This crate defines the primitives every other crate agrees on: world
//! geometry, health accounting, the virtual clock and the cooldown timers
//! derived from it, and the stable kind tags that identify monsters,
//! bullets, items, and perks across the simulation and the save format.
//! Nothing here touches wall-clock time or any rendering concern.

use serde::{Deserialize, Serialize};

/// Milliseconds advanced per simulation tick at the default 60 Hz cadence.
pub const DEFAULT_TICK_MS: f64 = 1000.0 / 60.0;

/// A point in world space.
///
/// Every entity owns exactly one position, mutated only by its own movement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from world coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing from this position toward `other`.
    ///
    /// Returns the zero vector when the two positions coincide, so callers
    /// never divide by zero on a degenerate direction.
    #[must_use]
    pub fn direction_to(&self, other: Position) -> (f32, f32) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let magnitude = (dx * dx + dy * dy).sqrt();
        if magnitude == 0.0 {
            return (0.0, 0.0);
        }
        (dx / magnitude, dy / magnitude)
    }

    /// Returns this position displaced by the provided deltas.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle in world space.
///
/// Consumed opaquely for camera viewports and entity bounding boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given dimensions centered on a position.
    #[must_use]
    pub fn centered_on(center: Position, width: f32, height: f32) -> Self {
        Self {
            x: center.x() - width / 2.0,
            y: center.y() - height / 2.0,
            width,
            height,
        }
    }

    /// Upper-left x coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Upper-left y coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Reports whether two rectangles overlap on both axes.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Playfield dimensions with the inset inside which entities count as
/// in-world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// Horizontal inset applied on both sides of the playfield.
    pub const MARGIN_X: f32 = 20.0;
    /// Vertical inset applied on both sides of the playfield.
    pub const MARGIN_Y: f32 = 25.0;

    /// Creates playfield bounds of the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Total width of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Total height of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether a position lies inside the inset playfield.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= Self::MARGIN_X
            && position.x() <= self.width - Self::MARGIN_X
            && position.y() >= Self::MARGIN_Y
            && position.y() <= self.height - Self::MARGIN_Y
    }

    /// Clamps a position into the inset playfield.
    #[must_use]
    pub fn clamp(&self, position: Position) -> Position {
        Position::new(
            position
                .x()
                .clamp(Self::MARGIN_X, self.width - Self::MARGIN_X),
            position
                .y()
                .clamp(Self::MARGIN_Y, self.height - Self::MARGIN_Y),
        )
    }
}

/// Current and maximum hit points of an entity.
///
/// [`Health::take_damage`] is the only decreasing mutator and clamps at
/// zero, so no caller ever observes a negative reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    current: f32,
    maximum: f32,
}

impl Health {
    /// Creates health at full capacity.
    #[must_use]
    pub const fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Creates health with an explicit current reading, clamped into
    /// `[0, maximum]`.
    #[must_use]
    pub fn restored(current: f32, maximum: f32) -> Self {
        Self {
            current: current.clamp(0.0, maximum),
            maximum,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Reports whether the entity is out of hit points.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtracts `amount`, clamping at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Adds `amount`, clamping at the maximum.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.maximum);
    }

    /// Raises the maximum by `amount` and heals the same amount.
    pub fn raise_maximum(&mut self, amount: f32) {
        self.maximum += amount;
        self.heal(amount);
    }
}

/// Simulation-owned elapsed-time counter.
///
/// Advanced once per tick by a fixed quantum and never by wall-clock time,
/// so sessions can be saved, restored, and driven deterministically by
/// tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameClock {
    elapsed_ms: f64,
    tick_ms: f64,
}

impl GameClock {
    /// Creates a clock at zero elapsed time with the default tick quantum.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_ms: 0.0,
            tick_ms: DEFAULT_TICK_MS,
        }
    }

    /// Restores a clock from a persisted elapsed reading.
    #[must_use]
    pub const fn from_elapsed(elapsed_ms: f64) -> Self {
        Self {
            elapsed_ms,
            tick_ms: DEFAULT_TICK_MS,
        }
    }

    /// Creates a clock with a custom per-tick quantum.
    #[must_use]
    pub const fn with_tick_ms(tick_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            tick_ms,
        }
    }

    /// Advances the clock by one tick quantum.
    pub fn advance(&mut self) {
        self.elapsed_ms += self.tick_ms;
    }

    /// Current elapsed reading in milliseconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.elapsed_ms
    }

    /// Milliseconds added per tick.
    #[must_use]
    pub const fn tick_ms(&self) -> f64 {
        self.tick_ms
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Reusable readiness timer keyed off the [`GameClock`].
///
/// Records the clock reading of the last triggered action and reports
/// readiness once the configured duration has elapsed since. Restorable
/// from a persisted reading so resumed sessions keep exact remaining
/// cooldowns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CooldownTimer {
    duration_ms: f64,
    last_trigger_ms: f64,
}

impl CooldownTimer {
    /// Creates a timer armed at the clock's current reading.
    #[must_use]
    pub fn armed(duration_ms: f64, clock: &GameClock) -> Self {
        Self {
            duration_ms,
            last_trigger_ms: clock.now(),
        }
    }

    /// Reports whether the configured duration has elapsed since the last
    /// trigger.
    #[must_use]
    pub fn ready(&self, clock: &GameClock) -> bool {
        clock.now() - self.last_trigger_ms >= self.duration_ms
    }

    /// Re-arms the timer at the clock's current reading.
    pub fn trigger(&mut self, clock: &GameClock) {
        self.last_trigger_ms = clock.now();
    }

    /// Configured duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Clock reading recorded at the last trigger.
    #[must_use]
    pub const fn last_trigger_ms(&self) -> f64 {
        self.last_trigger_ms
    }

    /// Restores the last-trigger reading from persisted state.
    pub fn restore_last_trigger(&mut self, last_trigger_ms: f64) {
        self.last_trigger_ms = last_trigger_ms;
    }
}

/// Kinds of monsters the spawner can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    /// Melee chaser that makes up the bulk of every wave.
    Common,
    /// Low-probability elite that keeps its distance and fires bolts.
    Gunner,
    /// Scripted one-time spawn at the first boss threshold.
    Boss,
    /// Scripted one-time spawn at the second boss threshold.
    Megaboss,
}

impl MonsterKind {
    /// Reports whether this kind is a scripted boss.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self, Self::Boss | Self::Megaboss)
    }
}

/// Kinds of bullets that can inhabit the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletKind {
    /// Straight-flying round from the standard gun.
    Standard,
    /// Fast, cheap round from the turret gun.
    Turret,
    /// Homing round that retargets the nearest monster and expires on a
    /// despawn timer.
    Homing,
    /// Monster-owned bolt that only ever collides with the player.
    MonsterBolt,
}

impl BulletKind {
    /// Reports whether the player owns bullets of this kind.
    #[must_use]
    pub const fn player_owned(&self) -> bool {
        !matches!(self, Self::MonsterBolt)
    }
}

/// Kinds of pickups dropped into the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Lowest experience tier; despawns the quickest.
    CommonGem,
    /// Mid experience tier.
    GreenGem,
    /// High experience tier.
    BlueGem,
    /// Top experience tier; longest lived and the fixed boss reward.
    RedGem,
    /// Rare heal that restores half of the player's maximum health.
    Snack,
}

impl ItemKind {
    /// Reports whether this item grants experience rather than healing.
    #[must_use]
    pub const fn is_gem(&self) -> bool {
        !matches!(self, Self::Snack)
    }
}

/// Broad category a perk belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PerkCategory {
    /// Passive stat bonus; at most one leveled instance per kind.
    Passive,
    /// Weapon that periodically fires bullets on its own cooldown.
    Weapon,
}

/// Every perk the progression system can offer.
///
/// These tags double as the save-format keys for perk inventories, so they
/// stay decoupled from any internal type naming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerkKind {
    /// Periodic self-heal.
    Regeneration,
    /// Raises maximum health.
    MaxHealth,
    /// Additive damage multiplier bonus.
    DamageBoost,
    /// Additive movement-speed multiplier bonus.
    SpeedBoost,
    /// The starting weapon; slow, solid rounds.
    StandardGun,
    /// Rapid-fire weapon with fragile rounds.
    TurretGun,
    /// Weapon whose rounds chase the nearest monster.
    HomingGun,
}

impl PerkKind {
    /// All perk kinds, in catalog order.
    pub const ALL: [PerkKind; 7] = [
        PerkKind::Regeneration,
        PerkKind::MaxHealth,
        PerkKind::DamageBoost,
        PerkKind::SpeedBoost,
        PerkKind::StandardGun,
        PerkKind::TurretGun,
        PerkKind::HomingGun,
    ];

    /// Category this perk belongs to.
    #[must_use]
    pub const fn category(&self) -> PerkCategory {
        match self {
            Self::Regeneration | Self::MaxHealth | Self::DamageBoost | Self::SpeedBoost => {
                PerkCategory::Passive
            }
            Self::StandardGun | Self::TurretGun | Self::HomingGun => PerkCategory::Weapon,
        }
    }

    /// Weapon bullet kind fired by this perk, if it is a weapon.
    #[must_use]
    pub const fn bullet_kind(&self) -> Option<BulletKind> {
        match self {
            Self::StandardGun => Some(BulletKind::Standard),
            Self::TurretGun => Some(BulletKind::Turret),
            Self::HomingGun => Some(BulletKind::Homing),
            _ => None,
        }
    }
}
