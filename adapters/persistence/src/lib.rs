#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Save/restore gateway for the Swarm Survival world.
//!
//! One JSON document per save, keyed by the stable kind tags from the core
//! crate rather than any internal type naming. Loading is total: a missing
//! file, malformed document, or absent top-level key falls back to fresh
//! defaults instead of failing the session.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swarm_survival_core::{
    BulletKind, GameClock, ItemKind, MonsterKind, PerkCategory, PerkKind, Position,
};
use swarm_survival_world::{
    Bullet, Item, Monster, PassivePerk, Player, WeaponPerk, World, DEFAULT_WORLD_HEIGHT,
    DEFAULT_WORLD_WIDTH,
};
use thiserror::Error;

/// Failure writing a save document to its backing store.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The document could not be encoded.
    #[error("failed to encode save document")]
    Encode(#[from] serde_json::Error),
    /// The backing file could not be written.
    #[error("failed to write save file")]
    Io(#[from] std::io::Error),
}

/// Persisted state of one monster.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MonsterRecord {
    /// Horizontal position.
    pub pos_x: f32,
    /// Vertical position.
    pub pos_y: f32,
    /// Current hit points.
    pub health: f32,
    /// Clock reading recorded by the attack timer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_cooldown: Option<f64>,
}

/// Persisted state of one bullet.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BulletRecord {
    /// Horizontal position.
    pub pos_x: f32,
    /// Vertical position.
    pub pos_y: f32,
    /// Horizontal component of the unit direction.
    pub dir_x: f32,
    /// Vertical component of the unit direction.
    pub dir_y: f32,
    /// Damage applied on overlap.
    pub damage: f32,
    /// Remaining hit budget.
    pub health: f32,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Clock reading recorded by the despawn timer, for homing rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub despawn_cooldown: Option<f64>,
}

/// Persisted state of one item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Horizontal position.
    pub pos_x: f32,
    /// Vertical position.
    pub pos_y: f32,
    /// Experience value or healed fraction.
    pub amount: f32,
    /// Clock reading recorded by the despawn timer, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub despawn_cooldown: Option<f64>,
}

/// Persisted state of one owned passive perk.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PassiveRecord {
    /// Perk level, starting at 1.
    pub level: u8,
}

/// Persisted state of one owned weapon perk.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WeaponRecord {
    /// Perk level, starting at 1.
    pub level: u8,
    /// Clock reading recorded by the firing timer.
    pub attack_cooldown: f64,
}

/// Persisted state of the player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Horizontal position.
    pub pos_x: f32,
    /// Vertical position.
    pub pos_y: f32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Current level.
    pub level: u32,
    /// Current hit points.
    pub health: f32,
    /// Clock reading recorded by the regen timer.
    pub health_regen_cooldown: f64,
    /// Owned passive perks keyed by kind tag.
    #[serde(rename = "static", default)]
    pub passive_inventory: BTreeMap<PerkKind, PassiveRecord>,
    /// Owned weapon perks keyed by kind tag.
    #[serde(rename = "updatable", default)]
    pub weapon_inventory: BTreeMap<PerkKind, WeaponRecord>,
}

/// Persisted spawner state: the idempotence flags of the scripted boss
/// spawns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerRecord {
    /// Whether the first-threshold boss was already added.
    #[serde(default)]
    pub minute_boss_added: bool,
    /// Whether the second-threshold boss was already added.
    #[serde(default)]
    pub second_minute_boss_added: bool,
}

/// One complete save: the structured document written per session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SaveDocument {
    /// Monsters grouped by kind tag.
    #[serde(default)]
    pub monsters: BTreeMap<MonsterKind, Vec<MonsterRecord>>,
    /// Bullets grouped by kind tag.
    #[serde(default)]
    pub bullets: BTreeMap<BulletKind, Vec<BulletRecord>>,
    /// Items grouped by kind tag.
    #[serde(default)]
    pub items: BTreeMap<ItemKind, Vec<ItemRecord>>,
    /// Player state; absent means a fresh player.
    #[serde(default)]
    pub player: Option<PlayerRecord>,
    /// Spawner boss flags.
    #[serde(default)]
    pub monster_spawner: SpawnerRecord,
    /// Elapsed virtual-clock milliseconds.
    #[serde(default)]
    pub clock: f64,
}

/// Converts a live world (plus the spawner flags) into a save document.
#[must_use]
pub fn capture(world: &World, monster_spawner: SpawnerRecord) -> SaveDocument {
    let mut monsters: BTreeMap<MonsterKind, Vec<MonsterRecord>> = BTreeMap::new();
    for monster in world.monsters() {
        monsters
            .entry(monster.kind())
            .or_default()
            .push(MonsterRecord {
                pos_x: monster.position().x(),
                pos_y: monster.position().y(),
                health: monster.health().current(),
                attack_cooldown: Some(monster.attack_last_trigger_ms()),
            });
    }

    let mut bullets: BTreeMap<BulletKind, Vec<BulletRecord>> = BTreeMap::new();
    for bullet in world.bullets() {
        bullets.entry(bullet.kind()).or_default().push(BulletRecord {
            pos_x: bullet.position().x(),
            pos_y: bullet.position().y(),
            dir_x: bullet.direction().0,
            dir_y: bullet.direction().1,
            damage: bullet.damage(),
            health: bullet.health().current(),
            speed: bullet.speed(),
            despawn_cooldown: bullet.despawn_last_trigger_ms(),
        });
    }

    let mut items: BTreeMap<ItemKind, Vec<ItemRecord>> = BTreeMap::new();
    for item in world.items() {
        items.entry(item.kind()).or_default().push(ItemRecord {
            pos_x: item.position().x(),
            pos_y: item.position().y(),
            amount: item.amount(),
            despawn_cooldown: item.despawn_last_trigger_ms(),
        });
    }

    let player = world.player();
    let player_record = PlayerRecord {
        pos_x: player.position().x(),
        pos_y: player.position().y(),
        experience: player.experience(),
        level: player.level(),
        health: player.health().current(),
        health_regen_cooldown: player.regen_last_trigger_ms(),
        passive_inventory: player
            .passives()
            .iter()
            .map(|perk| (perk.kind(), PassiveRecord { level: perk.level() }))
            .collect(),
        weapon_inventory: player
            .weapons()
            .iter()
            .map(|weapon| {
                (
                    weapon.kind(),
                    WeaponRecord {
                        level: weapon.level(),
                        attack_cooldown: weapon.last_trigger_ms(),
                    },
                )
            })
            .collect(),
    };

    SaveDocument {
        monsters,
        bullets,
        items,
        player: Some(player_record),
        monster_spawner,
        clock: world.clock().now(),
    }
}

/// Reconstructs a world and the spawner flags from a save document.
///
/// Entity counts, player level and experience, boss flags, and every
/// timer's remaining time relative to the restored clock match the state
/// at capture time. Absent sections restore as fresh defaults.
#[must_use]
pub fn restore(document: &SaveDocument) -> (World, SpawnerRecord) {
    let clock = GameClock::from_elapsed(document.clock);

    let player = match &document.player {
        Some(record) => {
            let passives = record
                .passive_inventory
                .iter()
                .filter(|(kind, _)| kind.category() == PerkCategory::Passive)
                .map(|(kind, perk)| PassivePerk::restored(*kind, perk.level))
                .collect();
            let weapons = record
                .weapon_inventory
                .iter()
                .filter(|(kind, _)| kind.category() == PerkCategory::Weapon)
                .map(|(kind, weapon)| {
                    WeaponPerk::restored(*kind, weapon.level, weapon.attack_cooldown, &clock)
                })
                .collect();
            Player::restored(
                Position::new(record.pos_x, record.pos_y),
                record.experience,
                record.level,
                record.health,
                record.health_regen_cooldown,
                passives,
                weapons,
                &clock,
            )
        }
        None => Player::new(
            Position::new(DEFAULT_WORLD_WIDTH / 2.0, DEFAULT_WORLD_HEIGHT / 2.0),
            &clock,
        ),
    };

    let monsters = document
        .monsters
        .iter()
        .flat_map(|(kind, records)| {
            records.iter().map(|record| {
                Monster::restored(
                    *kind,
                    Position::new(record.pos_x, record.pos_y),
                    record.health,
                    record.attack_cooldown,
                    &clock,
                )
            })
        })
        .collect();

    let bullets = document
        .bullets
        .iter()
        .flat_map(|(kind, records)| {
            records.iter().map(|record| {
                Bullet::restored(
                    *kind,
                    Position::new(record.pos_x, record.pos_y),
                    (record.dir_x, record.dir_y),
                    record.damage,
                    record.health,
                    record.speed,
                    record.despawn_cooldown,
                    &clock,
                )
            })
        })
        .collect();

    let items = document
        .items
        .iter()
        .flat_map(|(kind, records)| {
            records.iter().map(|record| {
                Item::restored(
                    *kind,
                    Position::new(record.pos_x, record.pos_y),
                    record.amount,
                    record.despawn_cooldown,
                    &clock,
                )
            })
        })
        .collect();

    (
        World::restored(clock, player, monsters, bullets, items),
        document.monster_spawner,
    )
}

/// Data access gateway for whole-session saves.
pub trait GameDao {
    /// Persists the provided document.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] when the document cannot be encoded or
    /// written.
    fn save_game(&self, document: &SaveDocument) -> Result<(), SaveError>;

    /// Loads the persisted document; any failure yields defaults.
    fn load_game(&self) -> SaveDocument;

    /// Discards the persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] when the cleared document cannot be written.
    fn clear_save(&self) -> Result<(), SaveError>;
}

/// File-backed JSON implementation of [`GameDao`].
#[derive(Debug)]
pub struct JsonFileDao {
    path: PathBuf,
}

impl JsonFileDao {
    /// Creates a gateway backed by the provided file path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GameDao for JsonFileDao {
    fn save_game(&self, document: &SaveDocument) -> Result<(), SaveError> {
        let encoded = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }

    fn load_game(&self) -> SaveDocument {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return SaveDocument::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(%error, "malformed save treated as fresh game");
                SaveDocument::default()
            }
        }
    }

    fn clear_save(&self) -> Result<(), SaveError> {
        self.save_game(&SaveDocument::default())
    }
}
