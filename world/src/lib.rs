#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Swarm Survival simulation.
//!
//! The [`World`] owns the single player and the monster, bullet, and item
//! collections, and drives the fixed per-tick sequence: clock advance,
//! player update (regen and weapon fire), spawner, bullets, monsters.
//! Items have no autonomous behavior; their lifecycle is handled by the
//! [`collision`] pickup pass and the [`reaping`] sweep, which the
//! surrounding loop runs after every update. Collections handed to callers
//! are snapshots, so removals never invalidate an in-progress iteration.

mod entities;
mod perks;

pub mod collision;
pub mod reaping;

pub use entities::{Bullet, Item, Monster, Player};
pub use perks::{PassivePerk, WeaponPerk};

use rand::seq::SliceRandom;
use rand::Rng;
use swarm_survival_core::{Bounds, GameClock, PerkKind, Position};
use thiserror::Error;

/// Default playfield width in world units.
pub const DEFAULT_WORLD_WIDTH: f32 = 2400.0;
/// Default playfield height in world units.
pub const DEFAULT_WORLD_HEIGHT: f32 = 1800.0;

/// Terminal signal raised by the sweep pass when the player's health
/// reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("player health reached zero")]
pub struct DeadPlayer;

/// Monster source driven once per tick between the player and bullet
/// phases.
///
/// Implementations receive the world as a transient reference for the
/// duration of a single call and must not retain it.
pub trait Spawner {
    /// Gives the spawner its slot in the tick sequence.
    fn update(&mut self, world: &mut World);
}

/// The authoritative game world.
#[derive(Debug)]
pub struct World {
    pub(crate) player: Player,
    pub(crate) monsters: Vec<Monster>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) items: Vec<Item>,
    pub(crate) clock: GameClock,
    pub(crate) bounds: Bounds,
    pending_upgrades: u32,
}

impl World {
    /// Creates a fresh world with a level-1 player at the playfield
    /// center and a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        let clock = GameClock::new();
        let bounds = Bounds::new(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        Self {
            player: Player::new(
                Position::new(bounds.width() / 2.0, bounds.height() / 2.0),
                &clock,
            ),
            monsters: Vec::new(),
            bullets: Vec::new(),
            items: Vec::new(),
            clock,
            bounds,
            pending_upgrades: 0,
        }
    }

    /// Reassembles a world from restored parts.
    ///
    /// Used by the persistence gateway; every timer inside the parts is
    /// expected to already carry its persisted reading.
    #[must_use]
    pub fn restored(
        clock: GameClock,
        player: Player,
        monsters: Vec<Monster>,
        bullets: Vec<Bullet>,
        items: Vec<Item>,
    ) -> Self {
        Self {
            player,
            monsters,
            bullets,
            items,
            clock,
            bounds: Bounds::new(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT),
            pending_upgrades: 0,
        }
    }

    /// Current clock reading.
    #[must_use]
    pub fn clock(&self) -> GameClock {
        self.clock
    }

    /// Playfield bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Read-only access to the player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player for the input adapter.
    #[must_use]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Snapshot of the monster collection.
    #[must_use]
    pub fn monsters(&self) -> Vec<Monster> {
        self.monsters.clone()
    }

    /// Snapshot of the bullet collection.
    #[must_use]
    pub fn bullets(&self) -> Vec<Bullet> {
        self.bullets.clone()
    }

    /// Snapshot of the item collection.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    /// Number of live monsters.
    #[must_use]
    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    /// Number of bullets in flight.
    #[must_use]
    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    /// Number of items on the ground.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Inserts a monster into the world.
    pub fn add_monster(&mut self, monster: Monster) {
        self.monsters.push(monster);
    }

    /// Inserts a bullet into the world.
    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Inserts an item into the world.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes and returns the monster at `index`, when it exists.
    pub fn remove_monster(&mut self, index: usize) -> Option<Monster> {
        (index < self.monsters.len()).then(|| self.monsters.remove(index))
    }

    /// Removes and returns the bullet at `index`, when it exists.
    pub fn remove_bullet(&mut self, index: usize) -> Option<Bullet> {
        (index < self.bullets.len()).then(|| self.bullets.remove(index))
    }

    /// Removes and returns the item at `index`, when it exists.
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Executes one simulation tick in the fixed phase order.
    ///
    /// The collision and sweep passes are separate calls made by the
    /// surrounding loop so that damage dealt this tick is only reaped
    /// after it was observable.
    pub fn update(&mut self, spawner: &mut dyn Spawner) {
        self.clock.advance();
        self.update_player();
        spawner.update(self);
        self.update_bullets();
        self.update_monsters();
    }

    fn update_player(&mut self) {
        let clock = self.clock;
        let player_position = self.player.position();
        let target = self
            .monsters
            .iter()
            .min_by(|a, b| {
                let da = a.position().distance_to(player_position);
                let db = b.position().distance_to(player_position);
                da.total_cmp(&db)
            })
            .map(Monster::position);

        let mut fired = self.player.update(&clock, target);
        self.bullets.append(&mut fired);
    }

    fn update_bullets(&mut self) {
        let Self {
            bullets, monsters, ..
        } = self;
        for bullet in bullets.iter_mut() {
            bullet.update(monsters);
        }
    }

    fn update_monsters(&mut self) {
        let Self {
            monsters,
            player,
            bullets,
            clock,
            ..
        } = self;
        for monster in monsters.iter_mut() {
            if let Some(bolt) = monster.update(player, clock) {
                bullets.push(bolt);
            }
        }
    }

    /// Number of upgrade selections the player still owes.
    #[must_use]
    pub fn pending_upgrades(&self) -> u32 {
        self.pending_upgrades
    }

    /// Queues `count` further upgrade selections, one per level gained.
    pub fn activate_upgrade(&mut self, count: u32) {
        self.pending_upgrades += count;
    }

    /// Marks one queued upgrade selection as applied.
    pub fn consume_pending_upgrade(&mut self) {
        self.pending_upgrades = self.pending_upgrades.saturating_sub(1);
    }

    /// Samples up to `count` currently-upgradable perk kinds from the full
    /// catalog, without replacement.
    ///
    /// Kinds the player does not own yet count as upgradable. Fewer than
    /// `count` upgradable kinds returns all of them; none returns empty.
    #[must_use]
    pub fn upgrade_choices<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<PerkKind> {
        let upgradable: Vec<PerkKind> = PerkKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.player.perk_upgradable(*kind))
            .collect();
        upgradable
            .choose_multiple(rng, count)
            .copied()
            .collect()
    }

    /// Hands the chosen perk to the player: a not-yet-owned kind is added,
    /// an owned kind is upgraded.
    pub fn grant_perk(&mut self, kind: PerkKind) {
        let clock = self.clock;
        self.player.handle_perk(kind, &clock);
    }

    /// Adds experience to the player and queues one upgrade selection per
    /// level gained.
    pub fn grant_experience(&mut self, amount: u32) {
        let levels = self.player.gain_experience(amount);
        if levels > 0 {
            tracing::info!(level = self.player.level(), "level up");
            self.activate_upgrade(levels);
        }
    }

    /// Applies a collected item to the player.
    pub(crate) fn apply_item(&mut self, item: &Item) {
        if item.kind().is_gem() {
            self.grant_experience(item.amount() as u32);
        } else {
            let amount = self.player.health().maximum() * item.amount();
            self.player.heal(amount);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
