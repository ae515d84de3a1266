//! Entity state machines: the player, monsters, bullets, and items.

use swarm_survival_core::{
    BulletKind, CooldownTimer, GameClock, Health, ItemKind, MonsterKind, PerkCategory, PerkKind,
    Position, Rect,
};

use crate::perks::{PassivePerk, WeaponPerk};

/// Elapsed time below which monsters spawn without a scaling bonus.
const MULTIPLIER_GRACE_MS: f64 = 66_000.0;
/// Divisor converting elapsed time into the monster stat multiplier.
const MULTIPLIER_SCALE_MS: f64 = 50_000.0;
/// Hard cap on scaled monster movement speed.
const MONSTER_SPEED_CAP: f32 = 4.0;

/// Stat multiplier derived from elapsed session time.
///
/// Scripted bosses ignore it; everything else grows with the clock.
fn time_multiplier(kind: MonsterKind, clock: &GameClock) -> f32 {
    if kind.is_boss() || clock.now() < MULTIPLIER_GRACE_MS {
        1.0
    } else {
        (clock.now() / MULTIPLIER_SCALE_MS) as f32
    }
}

/// A monster inhabiting the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    kind: MonsterKind,
    position: Position,
    health: Health,
    multiplier: f32,
    attack_timer: CooldownTimer,
}

impl Monster {
    /// Creates a freshly spawned monster, sampling the stat multiplier
    /// from the clock's current reading.
    #[must_use]
    pub fn spawned(kind: MonsterKind, position: Position, clock: &GameClock) -> Self {
        let multiplier = time_multiplier(kind, clock);
        Self {
            kind,
            position,
            health: Health::full(Self::base_health(kind) * multiplier),
            multiplier,
            attack_timer: CooldownTimer::armed(Self::attack_interval_ms(kind, multiplier), clock),
        }
    }

    /// Restores a monster from persisted state.
    ///
    /// The multiplier is re-sampled from the restored clock so resumed
    /// sessions keep the same difficulty curve.
    #[must_use]
    pub fn restored(
        kind: MonsterKind,
        position: Position,
        health: f32,
        attack_last_trigger_ms: Option<f64>,
        clock: &GameClock,
    ) -> Self {
        let mut monster = Self::spawned(kind, position, clock);
        monster.health = Health::restored(health, monster.health.maximum());
        if let Some(last) = attack_last_trigger_ms {
            monster.attack_timer.restore_last_trigger(last);
        }
        monster
    }

    const fn base_health(kind: MonsterKind) -> f32 {
        match kind {
            MonsterKind::Common | MonsterKind::Gunner => 10.0,
            MonsterKind::Boss => 1000.0,
            MonsterKind::Megaboss => 10_000.0,
        }
    }

    const fn base_speed(kind: MonsterKind) -> f32 {
        match kind {
            MonsterKind::Common => 2.0,
            MonsterKind::Gunner => 1.0,
            MonsterKind::Boss => 3.0,
            MonsterKind::Megaboss => 4.0,
        }
    }

    const fn base_damage(kind: MonsterKind) -> f32 {
        match kind {
            MonsterKind::Common => 10.0,
            MonsterKind::Gunner => 0.0,
            MonsterKind::Boss => 50.0,
            MonsterKind::Megaboss => 10_000.0,
        }
    }

    const fn attack_range(kind: MonsterKind) -> f32 {
        match kind {
            MonsterKind::Common | MonsterKind::Megaboss => 50.0,
            MonsterKind::Gunner => 20_000.0,
            MonsterKind::Boss => 60.0,
        }
    }

    fn attack_interval_ms(kind: MonsterKind, multiplier: f32) -> f64 {
        match kind {
            MonsterKind::Common => 1000.0,
            // Gunners fire their bolt on this timer, quicker as they scale.
            MonsterKind::Gunner => 5000.0 / (2.0 * f64::from(multiplier)),
            MonsterKind::Boss => 1500.0,
            MonsterKind::Megaboss => 0.0,
        }
    }

    const fn half_extent(kind: MonsterKind) -> f32 {
        match kind {
            MonsterKind::Common | MonsterKind::Gunner => 16.0,
            MonsterKind::Boss => 32.0,
            MonsterKind::Megaboss => 48.0,
        }
    }

    /// Kind tag of this monster.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current health state.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Stat multiplier sampled at spawn time.
    #[must_use]
    pub const fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Clock reading recorded at the last attack, for persistence.
    #[must_use]
    pub fn attack_last_trigger_ms(&self) -> f64 {
        self.attack_timer.last_trigger_ms()
    }

    /// Movement speed after scaling and the global cap.
    #[must_use]
    pub fn speed(&self) -> f32 {
        let scaled = Self::base_speed(self.kind) * self.multiplier;
        if self.kind.is_boss() {
            Self::base_speed(self.kind)
        } else {
            scaled.min(MONSTER_SPEED_CAP)
        }
    }

    /// Melee damage dealt per attack after scaling.
    #[must_use]
    pub fn damage(&self) -> f32 {
        Self::base_damage(self.kind) * self.multiplier
    }

    /// Bounding box used for overlap tests.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let extent = Self::half_extent(self.kind);
        Rect::centered_on(self.position, extent * 2.0, extent * 2.0)
    }

    /// Subtracts damage, clamping at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }

    /// Steps toward the player and attacks when in range and off cooldown.
    ///
    /// Gunners return the bolt they fire instead of dealing contact damage.
    pub(crate) fn update(&mut self, player: &mut Player, clock: &GameClock) -> Option<Bullet> {
        let (dir_x, dir_y) = self.position.direction_to(player.position());
        if (dir_x, dir_y) == (0.0, 0.0) {
            return None;
        }

        let speed = self.speed();
        self.position = self.position.translated(dir_x * speed, dir_y * speed);

        let in_range = self.position.distance_to(player.position()) < Self::attack_range(self.kind);
        if !in_range || !self.attack_timer.ready(clock) {
            return None;
        }
        self.attack_timer.trigger(clock);

        if self.kind == MonsterKind::Gunner {
            return Some(Bullet::aimed(
                BulletKind::MonsterBolt,
                self.position,
                player.position(),
                5.0 * self.multiplier,
                4.0 * self.multiplier,
                1.0,
                clock,
            ));
        }

        player.take_damage(self.damage());
        None
    }
}

/// Lifetime of a homing round before it expires without impact.
const HOMING_DESPAWN_MS: f64 = 2500.0;
/// Half extent of every bullet's bounding box.
const BULLET_HALF_EXTENT: f32 = 6.0;

/// A projectile in flight.
///
/// Health acts as a hit budget: every overlap consumes the bullet's damage
/// from both sides, so most rounds are single-use unless their health
/// exceeds their damage.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    kind: BulletKind,
    position: Position,
    direction: (f32, f32),
    speed: f32,
    damage: f32,
    health: Health,
    despawn_timer: Option<CooldownTimer>,
}

impl Bullet {
    /// Creates a bullet at `origin` aimed toward `target`.
    #[must_use]
    pub fn aimed(
        kind: BulletKind,
        origin: Position,
        target: Position,
        speed: f32,
        damage: f32,
        health: f32,
        clock: &GameClock,
    ) -> Self {
        Self {
            kind,
            position: origin,
            direction: origin.direction_to(target),
            speed,
            damage,
            health: Health::full(health),
            despawn_timer: (kind == BulletKind::Homing)
                .then(|| CooldownTimer::armed(HOMING_DESPAWN_MS, clock)),
        }
    }

    /// Restores a bullet from persisted state.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn restored(
        kind: BulletKind,
        position: Position,
        direction: (f32, f32),
        damage: f32,
        health: f32,
        speed: f32,
        despawn_last_trigger_ms: Option<f64>,
        clock: &GameClock,
    ) -> Self {
        let mut bullet = Self {
            kind,
            position,
            direction,
            speed,
            damage,
            health: Health::full(health),
            despawn_timer: (kind == BulletKind::Homing)
                .then(|| CooldownTimer::armed(HOMING_DESPAWN_MS, clock)),
        };
        if let (Some(timer), Some(last)) = (bullet.despawn_timer.as_mut(), despawn_last_trigger_ms)
        {
            timer.restore_last_trigger(last);
        }
        bullet
    }

    /// Kind tag of this bullet.
    #[must_use]
    pub const fn kind(&self) -> BulletKind {
        self.kind
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn direction(&self) -> (f32, f32) {
        self.direction
    }

    /// Distance travelled per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Damage applied to both sides of every overlap.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Remaining hit budget.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Clock reading of the despawn timer, when this kind carries one.
    #[must_use]
    pub fn despawn_last_trigger_ms(&self) -> Option<f64> {
        self.despawn_timer.map(|timer| timer.last_trigger_ms())
    }

    /// Reports whether the despawn timer, if any, has run out.
    #[must_use]
    pub fn despawn_ready(&self, clock: &GameClock) -> bool {
        self.despawn_timer
            .is_some_and(|timer| timer.ready(clock))
    }

    /// Bounding box used for overlap tests.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::centered_on(
            self.position,
            BULLET_HALF_EXTENT * 2.0,
            BULLET_HALF_EXTENT * 2.0,
        )
    }

    /// Consumes part of the hit budget, clamping at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }

    /// Advances one tick: homing rounds retarget the nearest monster, then
    /// every round flies its direction.
    pub(crate) fn update(&mut self, monsters: &[Monster]) {
        if self.kind == BulletKind::Homing {
            if let Some(nearest) = monsters.iter().min_by(|a, b| {
                let da = a.position().distance_to(self.position);
                let db = b.position().distance_to(self.position);
                da.total_cmp(&db)
            }) {
                self.direction = self.position.direction_to(nearest.position());
            }
        }
        self.position = self
            .position
            .translated(self.direction.0 * self.speed, self.direction.1 * self.speed);
    }
}

/// A pickup lying in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    kind: ItemKind,
    position: Position,
    amount: f32,
    despawn_timer: Option<CooldownTimer>,
}

impl Item {
    /// Lifespan before the item despawns uncollected, when it has one.
    #[must_use]
    pub const fn lifespan_ms(kind: ItemKind) -> Option<f64> {
        match kind {
            ItemKind::CommonGem => Some(10_000.0),
            ItemKind::GreenGem => Some(15_000.0),
            ItemKind::BlueGem => Some(20_000.0),
            ItemKind::RedGem => Some(30_000.0),
            ItemKind::Snack => None,
        }
    }

    /// Creates a freshly dropped item with its despawn timer armed.
    #[must_use]
    pub fn dropped(kind: ItemKind, position: Position, amount: f32, clock: &GameClock) -> Self {
        Self {
            kind,
            position,
            amount,
            despawn_timer: match Self::lifespan_ms(kind) {
                Some(lifespan) => Some(CooldownTimer::armed(lifespan, clock)),
                None => None,
            },
        }
    }

    /// Restores an item from persisted state.
    #[must_use]
    pub fn restored(
        kind: ItemKind,
        position: Position,
        amount: f32,
        despawn_last_trigger_ms: Option<f64>,
        clock: &GameClock,
    ) -> Self {
        let mut item = Self::dropped(kind, position, amount, clock);
        if let (Some(timer), Some(last)) = (item.despawn_timer.as_mut(), despawn_last_trigger_ms) {
            timer.restore_last_trigger(last);
        }
        item
    }

    /// Kind tag of this item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Experience value for gems; healed fraction of maximum health for
    /// the snack.
    #[must_use]
    pub const fn amount(&self) -> f32 {
        self.amount
    }

    /// Clock reading of the despawn timer, when this kind carries one.
    #[must_use]
    pub fn despawn_last_trigger_ms(&self) -> Option<f64> {
        self.despawn_timer.map(|timer| timer.last_trigger_ms())
    }

    /// Reports whether the despawn timer, if any, has run out.
    #[must_use]
    pub fn despawn_ready(&self, clock: &GameClock) -> bool {
        self.despawn_timer
            .is_some_and(|timer| timer.ready(clock))
    }
}

/// Half extent of the player's bounding box.
const PLAYER_HALF_EXTENT: f32 = 16.0;

/// The player character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Position,
    movement: (f32, f32),
    experience: u32,
    level: u32,
    health: Health,
    pick_range: f32,
    regen_timer: CooldownTimer,
    passives: Vec<PassivePerk>,
    weapons: Vec<WeaponPerk>,
}

impl Player {
    const BASE_SPEED: f32 = 5.0;
    const BASE_HEALTH: f32 = 100.0;
    const BASE_PICK_RANGE: f32 = 35.0;
    const BASE_DAMAGE_MULTIPLIER: f32 = 1.0;
    const BASE_SPEED_MULTIPLIER: f32 = 1.0;
    const BASE_HEALTH_REGEN: f32 = 0.0;
    const REGEN_INTERVAL_MS: f64 = 1000.0;

    /// Experience required to reach each level beyond the first.
    const LEVEL_THRESHOLDS: [(u32, u32); 6] = [
        (2, 100),
        (3, 250),
        (4, 500),
        (5, 850),
        (6, 1200),
        (7, 1700),
    ];

    /// Creates a fresh level-1 player holding the starting weapon.
    #[must_use]
    pub fn new(position: Position, clock: &GameClock) -> Self {
        Self {
            position,
            movement: (0.0, 0.0),
            experience: 0,
            level: 1,
            health: Health::full(Self::BASE_HEALTH),
            pick_range: Self::BASE_PICK_RANGE,
            regen_timer: CooldownTimer::armed(Self::REGEN_INTERVAL_MS, clock),
            passives: Vec::new(),
            weapons: vec![WeaponPerk::new(PerkKind::StandardGun, clock)],
        }
    }

    /// Restores a player from persisted state.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn restored(
        position: Position,
        experience: u32,
        level: u32,
        health: f32,
        regen_last_trigger_ms: f64,
        passives: Vec<PassivePerk>,
        weapons: Vec<WeaponPerk>,
        clock: &GameClock,
    ) -> Self {
        let mut player = Self::new(position, clock);
        player.experience = experience;
        player.level = level.max(1);
        player.passives = passives;
        player.weapons = weapons;
        if player.weapons.is_empty() {
            player.weapons.push(WeaponPerk::new(PerkKind::StandardGun, clock));
        }
        player.regen_timer.restore_last_trigger(regen_last_trigger_ms);

        let maximum = Self::BASE_HEALTH
            + player
                .passive(PerkKind::MaxHealth)
                .map_or(0.0, PassivePerk::upgrade_amount);
        player.health = Health::restored(health, maximum);
        player
    }

    /// Experience required to go from `level` to the next, when defined.
    #[must_use]
    pub fn threshold_for(level: u32) -> Option<u32> {
        Self::LEVEL_THRESHOLDS
            .iter()
            .find(|(target, _)| *target == level + 1)
            .map(|(_, cost)| *cost)
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Accumulated experience toward the next level.
    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// Current level, starting at 1 and only ever increasing.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current health state.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Radius within which items are collected.
    #[must_use]
    pub const fn pick_range(&self) -> f32 {
        self.pick_range
    }

    /// Clock reading recorded by the regen timer, for persistence.
    #[must_use]
    pub fn regen_last_trigger_ms(&self) -> f64 {
        self.regen_timer.last_trigger_ms()
    }

    /// Passive perks currently owned.
    #[must_use]
    pub fn passives(&self) -> &[PassivePerk] {
        &self.passives
    }

    /// Weapons currently owned.
    #[must_use]
    pub fn weapons(&self) -> &[WeaponPerk] {
        &self.weapons
    }

    fn passive(&self, kind: PerkKind) -> Option<&PassivePerk> {
        self.passives.iter().find(|perk| perk.kind() == kind)
    }

    /// Reports whether a perk of the provided kind is owned.
    #[must_use]
    pub fn owns(&self, kind: PerkKind) -> bool {
        match kind.category() {
            PerkCategory::Passive => self.passive(kind).is_some(),
            PerkCategory::Weapon => self.weapons.iter().any(|weapon| weapon.kind() == kind),
        }
    }

    /// Reports whether a perk of the provided kind could still level up
    /// (not-yet-owned kinds count as upgradable).
    #[must_use]
    pub fn perk_upgradable(&self, kind: PerkKind) -> bool {
        match kind.category() {
            PerkCategory::Passive => self.passive(kind).map_or(true, PassivePerk::upgradable),
            PerkCategory::Weapon => self
                .weapons
                .iter()
                .find(|weapon| weapon.kind() == kind)
                .map_or(true, WeaponPerk::upgradable),
        }
    }

    /// Base damage multiplier plus the owned damage perk's bonus.
    #[must_use]
    pub fn damage_multiplier(&self) -> f32 {
        Self::BASE_DAMAGE_MULTIPLIER
            + self
                .passive(PerkKind::DamageBoost)
                .map_or(0.0, PassivePerk::upgrade_amount)
    }

    /// Base speed multiplier plus the owned speed perk's bonus.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        Self::BASE_SPEED_MULTIPLIER
            + self
                .passive(PerkKind::SpeedBoost)
                .map_or(0.0, PassivePerk::upgrade_amount)
    }

    /// Health restored per regen interval.
    #[must_use]
    pub fn health_regen(&self) -> f32 {
        Self::BASE_HEALTH_REGEN
            + self
                .passive(PerkKind::Regeneration)
                .map_or(0.0, PassivePerk::upgrade_amount)
    }

    /// Bounding box used for overlap tests.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::centered_on(
            self.position,
            PLAYER_HALF_EXTENT * 2.0,
            PLAYER_HALF_EXTENT * 2.0,
        )
    }

    /// Sets the movement intent applied on the next update.
    pub fn steer(&mut self, direction_x: f32, direction_y: f32) {
        self.movement = (direction_x, direction_y);
    }

    /// Subtracts damage, clamping at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }

    /// Adds health, clamping at the maximum.
    pub fn heal(&mut self, amount: f32) {
        self.health.heal(amount);
    }

    /// Adds experience and resolves any level-ups, returning how many
    /// levels were gained.
    ///
    /// Once no next-level threshold is defined, surplus experience is
    /// retained in the counter but triggers nothing further.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut levels = 0;
        while let Some(threshold) = Self::threshold_for(self.level) {
            if self.experience < threshold {
                break;
            }
            self.experience -= threshold;
            self.level += 1;
            levels += 1;
        }
        levels
    }

    /// Adds a not-yet-owned perk or upgrades the owned instance.
    pub fn handle_perk(&mut self, kind: PerkKind, clock: &GameClock) {
        match kind.category() {
            PerkCategory::Passive => {
                match self.passives.iter_mut().find(|perk| perk.kind() == kind) {
                    Some(perk) => perk.upgrade(),
                    None => self.passives.push(PassivePerk::new(kind)),
                }
                if kind == PerkKind::MaxHealth {
                    self.refresh_max_health();
                }
            }
            PerkCategory::Weapon => {
                match self.weapons.iter_mut().find(|weapon| weapon.kind() == kind) {
                    Some(weapon) => weapon.upgrade(clock),
                    None => self.weapons.push(WeaponPerk::new(kind, clock)),
                }
            }
        }
    }

    fn refresh_max_health(&mut self) {
        let target = Self::BASE_HEALTH
            + self
                .passive(PerkKind::MaxHealth)
                .map_or(0.0, PassivePerk::upgrade_amount);
        let delta = target - self.health.maximum();
        if delta > 0.0 {
            self.health.raise_maximum(delta);
        }
    }

    /// Advances one tick: movement, regen, then every ready weapon fires
    /// at the nearest monster.
    ///
    /// Weapon cooldowns are consumed on readiness even when no target
    /// exists, matching the firing cadence of a continuously running gun.
    pub(crate) fn update(
        &mut self,
        clock: &GameClock,
        nearest_monster: Option<Position>,
    ) -> Vec<Bullet> {
        let speed = Self::BASE_SPEED * self.speed_multiplier();
        self.position = self
            .position
            .translated(self.movement.0 * speed, self.movement.1 * speed);

        let regen = self.health_regen();
        if regen > 0.0 && self.regen_timer.ready(clock) {
            self.health.heal(regen);
            self.regen_timer.trigger(clock);
        }

        let origin = self.position;
        let damage_multiplier = self.damage_multiplier();
        let mut fired = Vec::new();
        for weapon in &mut self.weapons {
            if !weapon.ready(clock) {
                continue;
            }
            match nearest_monster {
                Some(target) => {
                    fired.push(weapon.fire(origin, target, damage_multiplier, clock));
                }
                // No target: the shot is wasted but the cadence holds.
                None => {
                    let _ = weapon.fire(origin, origin, damage_multiplier, clock);
                }
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(ms: f64) -> GameClock {
        GameClock::from_elapsed(ms)
    }

    #[test]
    fn early_monsters_spawn_without_scaling() {
        let monster = Monster::spawned(MonsterKind::Common, Position::new(0.0, 0.0), &clock_at(0.0));
        assert_eq!(monster.multiplier(), 1.0);
        assert_eq!(monster.health().maximum(), 10.0);
        assert_eq!(monster.damage(), 10.0);
    }

    #[test]
    fn late_monsters_scale_with_the_clock() {
        let monster =
            Monster::spawned(MonsterKind::Common, Position::new(0.0, 0.0), &clock_at(100_000.0));
        assert_eq!(monster.multiplier(), 2.0);
        assert_eq!(monster.health().maximum(), 20.0);
        assert_eq!(monster.damage(), 20.0);
        assert_eq!(monster.speed(), 4.0, "speed is capped");
    }

    #[test]
    fn bosses_ignore_the_time_multiplier() {
        let boss =
            Monster::spawned(MonsterKind::Megaboss, Position::new(0.0, 0.0), &clock_at(150_000.0));
        assert_eq!(boss.multiplier(), 1.0);
        assert_eq!(boss.health().maximum(), 10_000.0);
    }

    #[test]
    fn monster_attack_respects_range_and_cooldown() {
        let mut clock = GameClock::with_tick_ms(600.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        let mut monster = Monster::spawned(MonsterKind::Common, Position::new(10.0, 0.0), &clock);

        // Timer armed at spawn; not ready on the first contact.
        assert!(monster.update(&mut player, &clock).is_none());
        assert_eq!(player.health().current(), 100.0);

        clock.advance();
        clock.advance();
        let _ = monster.update(&mut player, &clock);
        assert_eq!(player.health().current(), 90.0);

        // Immediately after attacking the cooldown blocks a second hit.
        let _ = monster.update(&mut player, &clock);
        assert_eq!(player.health().current(), 90.0);
    }

    #[test]
    fn gunner_fires_a_bolt_instead_of_melee() {
        let mut clock = GameClock::with_tick_ms(3000.0);
        let mut player = Player::new(Position::new(200.0, 0.0), &clock);
        let mut monster = Monster::spawned(MonsterKind::Gunner, Position::new(0.0, 0.0), &clock);

        clock.advance();
        let bolt = monster
            .update(&mut player, &clock)
            .expect("gunner should fire once ready");
        assert_eq!(bolt.kind(), BulletKind::MonsterBolt);
        assert!(!bolt.kind().player_owned());
        assert_eq!(player.health().current(), 100.0);
    }

    #[test]
    fn homing_bullets_retarget_the_nearest_monster() {
        let clock = clock_at(0.0);
        let mut bullet = Bullet::aimed(
            BulletKind::Homing,
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            10.0,
            5.0,
            100.0,
            &clock,
        );
        let monsters = vec![
            Monster::spawned(MonsterKind::Common, Position::new(0.0, 50.0), &clock),
            Monster::spawned(MonsterKind::Common, Position::new(500.0, 0.0), &clock),
        ];

        bullet.update(&monsters);
        assert_eq!(bullet.position(), Position::new(0.0, 10.0));
    }

    #[test]
    fn homing_bullets_expire_on_their_timer() {
        let mut clock = GameClock::with_tick_ms(1300.0);
        let bullet = Bullet::aimed(
            BulletKind::Homing,
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            1.0,
            1.0,
            1.0,
            &clock,
        );
        clock.advance();
        assert!(!bullet.despawn_ready(&clock));
        clock.advance();
        assert!(bullet.despawn_ready(&clock));
    }

    #[test]
    fn straight_bullets_never_expire_on_time() {
        let mut clock = GameClock::with_tick_ms(100_000.0);
        let bullet = Bullet::aimed(
            BulletKind::Standard,
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            1.0,
            1.0,
            1.0,
            &clock,
        );
        clock.advance();
        assert!(!bullet.despawn_ready(&clock));
    }

    #[test]
    fn gems_despawn_on_their_lifespan() {
        let mut clock = GameClock::with_tick_ms(6000.0);
        let gem = Item::dropped(ItemKind::CommonGem, Position::new(0.0, 0.0), 1.0, &clock);
        let snack = Item::dropped(ItemKind::Snack, Position::new(0.0, 0.0), 0.5, &clock);

        clock.advance();
        assert!(!gem.despawn_ready(&clock));
        clock.advance();
        assert!(gem.despawn_ready(&clock));
        assert!(!snack.despawn_ready(&clock), "snacks never despawn");
    }

    #[test]
    fn gaining_experience_levels_through_thresholds() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);

        let levels = player.gain_experience(350);
        assert_eq!(levels, 2);
        assert_eq!(player.level(), 3);
        assert_eq!(player.experience(), 0);
    }

    #[test]
    fn surplus_experience_at_max_level_is_retained() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        let total: u32 = [100, 250, 500, 850, 1200, 1700].iter().sum();

        let levels = player.gain_experience(total + 42);
        assert_eq!(levels, 6);
        assert_eq!(player.level(), 7);
        assert_eq!(player.experience(), 42);

        assert_eq!(player.gain_experience(10_000), 0);
        assert_eq!(player.level(), 7);
    }

    #[test]
    fn passive_perks_feed_derived_stats() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        assert_eq!(player.damage_multiplier(), 1.0);
        assert_eq!(player.speed_multiplier(), 1.0);
        assert_eq!(player.health_regen(), 0.0);

        player.handle_perk(PerkKind::DamageBoost, &clock);
        player.handle_perk(PerkKind::SpeedBoost, &clock);
        player.handle_perk(PerkKind::Regeneration, &clock);
        assert!((player.damage_multiplier() - 1.1).abs() < f32::EPSILON);
        assert!((player.speed_multiplier() - 1.1).abs() < f32::EPSILON);
        assert_eq!(player.health_regen(), 1.0);

        player.handle_perk(PerkKind::DamageBoost, &clock);
        assert!((player.damage_multiplier() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn max_health_perk_raises_and_heals() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        player.take_damage(50.0);

        player.handle_perk(PerkKind::MaxHealth, &clock);
        assert_eq!(player.health().maximum(), 125.0);
        assert_eq!(player.health().current(), 75.0);
    }

    #[test]
    fn handle_perk_upgrades_owned_weapons() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        assert!(player.owns(PerkKind::StandardGun));

        player.handle_perk(PerkKind::StandardGun, &clock);
        assert_eq!(player.weapons()[0].level(), 2);
        assert!(!player.perk_upgradable(PerkKind::StandardGun));

        player.handle_perk(PerkKind::TurretGun, &clock);
        assert!(player.owns(PerkKind::TurretGun));
        assert_eq!(player.weapons().len(), 2);
    }

    #[test]
    fn player_update_fires_ready_weapons_at_the_nearest_monster() {
        let mut clock = GameClock::with_tick_ms(1100.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        clock.advance();

        let fired = player.update(&clock, Some(Position::new(100.0, 0.0)));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind(), BulletKind::Standard);
        assert_eq!(fired[0].direction(), (1.0, 0.0));

        // Cooldown was consumed; nothing more fires this instant.
        let fired_again = player.update(&clock, Some(Position::new(100.0, 0.0)));
        assert!(fired_again.is_empty());
    }

    #[test]
    fn player_movement_applies_speed_multiplier() {
        let clock = clock_at(0.0);
        let mut player = Player::new(Position::new(0.0, 0.0), &clock);
        player.handle_perk(PerkKind::SpeedBoost, &clock);
        player.steer(1.0, 0.0);
        let _ = player.update(&clock, None);
        assert!((player.position().x() - 5.5).abs() < 1e-4);
    }
}
