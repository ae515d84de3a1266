//! Player-owned upgrades: passive stat perks and weapon bullet factories.

use swarm_survival_core::{BulletKind, CooldownTimer, GameClock, PerkKind, Position};

use crate::entities::Bullet;

/// Passive stat bonus owned by the player.
///
/// At most one leveled instance of each passive kind ever exists; the
/// player's derived stats add the current upgrade amount to a base
/// constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassivePerk {
    kind: PerkKind,
    level: u8,
}

impl PassivePerk {
    const MAX_LEVEL: u8 = 5;

    /// Creates a level-1 passive perk of the provided kind.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `kind` is a passive kind; weapon kinds are
    /// represented by [`WeaponPerk`].
    #[must_use]
    pub fn new(kind: PerkKind) -> Self {
        debug_assert!(kind.category() == swarm_survival_core::PerkCategory::Passive);
        Self { kind, level: 1 }
    }

    /// Restores a passive perk from persisted state, clamping the level
    /// into the defined range.
    #[must_use]
    pub fn restored(kind: PerkKind, level: u8) -> Self {
        Self {
            kind,
            level: level.clamp(1, Self::MAX_LEVEL),
        }
    }

    /// Kind tag of this perk.
    #[must_use]
    pub const fn kind(&self) -> PerkKind {
        self.kind
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Stat bonus granted at the current level.
    #[must_use]
    pub fn upgrade_amount(&self) -> f32 {
        let index = usize::from(self.level - 1);
        match self.kind {
            PerkKind::Regeneration => [1.0, 2.0, 5.0, 8.0, 12.0][index],
            PerkKind::MaxHealth => [25.0, 40.0, 75.0, 150.0, 250.0][index],
            PerkKind::DamageBoost => [0.1, 0.5, 1.0, 2.0, 4.0][index],
            PerkKind::SpeedBoost => [0.1, 0.2, 0.4, 0.8, 1.0][index],
            _ => 0.0,
        }
    }

    /// Reports whether a further level is defined.
    #[must_use]
    pub fn upgradable(&self) -> bool {
        self.level < Self::MAX_LEVEL
    }

    /// Advances to the next level when one is defined.
    pub fn upgrade(&mut self) {
        if self.upgradable() {
            self.level += 1;
        }
    }
}

/// Per-level stat row of a weapon: cooldown, damage, speed, bullet health.
type WeaponStats = (f64, f32, f32, f32);

const STANDARD_GUN_STATS: [WeaponStats; 2] = [(1000.0, 5.0, 4.0, 100.0), (750.0, 10.0, 10.0, 100.0)];
const TURRET_GUN_STATS: [WeaponStats; 2] = [(250.0, 1.0, 10.0, 5.0), (250.0, 5.0, 20.0, 5.0)];
const HOMING_GUN_STATS: [WeaponStats; 2] = [(2000.0, 10.0, 5.0, 2000.0), (1500.0, 20.0, 6.0, 200.0)];

/// Active weapon perk: an independently leveled, independently cooling
/// bullet factory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponPerk {
    kind: PerkKind,
    level: u8,
    timer: CooldownTimer,
}

impl WeaponPerk {
    /// Creates a level-1 weapon armed at the clock's current reading.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `kind` fires a bullet kind.
    #[must_use]
    pub fn new(kind: PerkKind, clock: &GameClock) -> Self {
        debug_assert!(kind.bullet_kind().is_some());
        let mut weapon = Self {
            kind,
            level: 1,
            timer: CooldownTimer::armed(0.0, clock),
        };
        weapon.timer = CooldownTimer::armed(weapon.cooldown_ms(), clock);
        weapon
    }

    /// Restores a weapon from persisted state, preserving the recorded
    /// cooldown reading.
    #[must_use]
    pub fn restored(kind: PerkKind, level: u8, last_trigger_ms: f64, clock: &GameClock) -> Self {
        let mut weapon = Self::new(kind, clock);
        weapon.level = level.clamp(1, weapon.max_level());
        weapon.rebuild_timer(clock);
        weapon.timer.restore_last_trigger(last_trigger_ms);
        weapon
    }

    fn stats(&self) -> WeaponStats {
        let index = usize::from(self.level - 1);
        match self.kind {
            PerkKind::StandardGun => STANDARD_GUN_STATS[index],
            PerkKind::TurretGun => TURRET_GUN_STATS[index],
            PerkKind::HomingGun => HOMING_GUN_STATS[index],
            _ => (f64::INFINITY, 0.0, 0.0, 0.0),
        }
    }

    fn max_level(&self) -> u8 {
        match self.kind {
            PerkKind::StandardGun => STANDARD_GUN_STATS.len() as u8,
            PerkKind::TurretGun => TURRET_GUN_STATS.len() as u8,
            PerkKind::HomingGun => HOMING_GUN_STATS.len() as u8,
            _ => 1,
        }
    }

    /// Kind tag of this weapon.
    #[must_use]
    pub const fn kind(&self) -> PerkKind {
        self.kind
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Firing interval at the current level, in milliseconds.
    #[must_use]
    pub fn cooldown_ms(&self) -> f64 {
        self.stats().0
    }

    /// Base damage per round at the current level.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.stats().1
    }

    /// Round speed at the current level.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.stats().2
    }

    /// Hit budget given to each round at the current level.
    #[must_use]
    pub fn bullet_health(&self) -> f32 {
        self.stats().3
    }

    /// Clock reading recorded at the last shot, for persistence.
    #[must_use]
    pub fn last_trigger_ms(&self) -> f64 {
        self.timer.last_trigger_ms()
    }

    /// Reports whether a further level row is defined.
    #[must_use]
    pub fn upgradable(&self) -> bool {
        self.level < self.max_level()
    }

    /// Advances to the next level row, keeping the recorded cooldown
    /// reading so an upgrade never resets an in-flight cooldown.
    pub fn upgrade(&mut self, clock: &GameClock) {
        if !self.upgradable() {
            return;
        }
        self.level += 1;
        let last = self.timer.last_trigger_ms();
        self.rebuild_timer(clock);
        self.timer.restore_last_trigger(last);
    }

    fn rebuild_timer(&mut self, clock: &GameClock) {
        self.timer = CooldownTimer::armed(self.cooldown_ms(), clock);
    }

    /// Reports whether the weapon may fire at the clock's current reading.
    #[must_use]
    pub fn ready(&self, clock: &GameClock) -> bool {
        self.timer.ready(clock)
    }

    /// Consumes the cooldown and produces a round aimed from `origin`
    /// toward `target`, scaled by the player's damage multiplier.
    #[must_use]
    pub fn fire(
        &mut self,
        origin: Position,
        target: Position,
        damage_multiplier: f32,
        clock: &GameClock,
    ) -> Bullet {
        self.timer.trigger(clock);
        let kind = self
            .kind
            .bullet_kind()
            .unwrap_or(BulletKind::Standard);
        Bullet::aimed(
            kind,
            origin,
            target,
            self.speed(),
            self.damage() * damage_multiplier,
            self.bullet_health(),
            clock,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_perk_levels_through_its_table() {
        let mut perk = PassivePerk::new(PerkKind::Regeneration);
        assert_eq!(perk.level(), 1);
        assert_eq!(perk.upgrade_amount(), 1.0);
        assert!(perk.upgradable());

        perk.upgrade();
        assert_eq!(perk.level(), 2);
        assert_eq!(perk.upgrade_amount(), 2.0);
    }

    #[test]
    fn passive_perk_stops_at_max_level() {
        let mut perk = PassivePerk::new(PerkKind::MaxHealth);
        while perk.upgradable() {
            perk.upgrade();
        }
        assert_eq!(perk.level(), 5);
        assert_eq!(perk.upgrade_amount(), 250.0);
        perk.upgrade();
        assert_eq!(perk.level(), 5);
    }

    #[test]
    fn weapon_upgrade_switches_stat_row_and_keeps_cooldown_reading() {
        let mut clock = GameClock::with_tick_ms(100.0);
        let mut weapon = WeaponPerk::new(PerkKind::StandardGun, &clock);
        clock.advance();
        clock.advance();

        let recorded = weapon.last_trigger_ms();
        weapon.upgrade(&clock);

        assert_eq!(weapon.level(), 2);
        assert_eq!(weapon.cooldown_ms(), 750.0);
        assert_eq!(weapon.damage(), 10.0);
        assert_eq!(weapon.last_trigger_ms(), recorded);
        assert!(!weapon.upgradable());
    }

    #[test]
    fn weapon_fire_consumes_the_cooldown() {
        let mut clock = GameClock::with_tick_ms(1000.0);
        let mut weapon = WeaponPerk::new(PerkKind::TurretGun, &clock);
        clock.advance();
        assert!(weapon.ready(&clock));

        let bullet = weapon.fire(
            Position::new(0.0, 0.0),
            Position::new(10.0, 0.0),
            2.0,
            &clock,
        );
        assert_eq!(bullet.damage(), 2.0);
        assert!(!weapon.ready(&clock));
    }

    #[test]
    fn restored_weapon_preserves_remaining_cooldown() {
        let clock = GameClock::from_elapsed(42_000.0);
        let weapon = WeaponPerk::restored(PerkKind::HomingGun, 2, 41_000.0, &clock);
        assert_eq!(weapon.level(), 2);
        assert_eq!(weapon.last_trigger_ms(), 41_000.0);
        assert!(!weapon.ready(&clock));

        let later = GameClock::from_elapsed(42_500.0);
        assert!(weapon.ready(&later));
    }
}
