//! Stateless cleanup pass: expired bullets, despawned items, slain
//! monsters with their loot, and the terminal player-death signal.

use rand::Rng;
use swarm_survival_core::{ItemKind, MonsterKind, Position};

use crate::entities::Item;
use crate::{DeadPlayer, World};

/// Fixed experience reward dropped by the first scripted boss.
const BOSS_REWARD: f32 = 100.0;
/// Fixed experience reward dropped by the second scripted boss.
const MEGABOSS_REWARD: f32 = 250.0;

/// Removes dead, expired, and out-of-world entities, rolling loot for
/// slain monsters.
///
/// The player check runs last so a fatal hit and a kill landed in the same
/// tick are both honored before the terminal signal propagates.
///
/// # Errors
///
/// Returns [`DeadPlayer`] when the player's health is depleted; the
/// surrounding loop must halt ticking and suppress saving.
pub fn sweep<R: Rng>(world: &mut World, rng: &mut R) -> Result<(), DeadPlayer> {
    let clock = world.clock;
    let bounds = world.bounds;

    world.bullets.retain(|bullet| {
        !bullet.health().is_depleted()
            && bounds.contains(bullet.position())
            && !bullet.despawn_ready(&clock)
    });

    world.items.retain(|item| !item.despawn_ready(&clock));

    let mut drops: Vec<Item> = Vec::new();
    world.monsters.retain(|monster| {
        if monster.health().is_depleted() {
            tracing::debug!(kind = ?monster.kind(), "monster slain");
            if let Some(item) = roll_loot(monster.kind(), monster.position(), rng, &clock) {
                drops.push(item);
            }
            false
        } else {
            // Out-of-world monsters vanish without loot.
            bounds.contains(monster.position())
        }
    });
    world.items.append(&mut drops);

    if world.player.health().is_depleted() {
        return Err(DeadPlayer);
    }
    Ok(())
}

/// Weighted loot roll for a slain monster.
///
/// Bosses always drop their fixed high-value gem; everything else draws
/// from the tier table and may drop nothing at all.
fn roll_loot<R: Rng>(
    kind: MonsterKind,
    position: Position,
    rng: &mut R,
    clock: &swarm_survival_core::GameClock,
) -> Option<Item> {
    let (item_kind, amount) = match kind {
        MonsterKind::Boss => (ItemKind::RedGem, BOSS_REWARD),
        MonsterKind::Megaboss => (ItemKind::RedGem, MEGABOSS_REWARD),
        MonsterKind::Common | MonsterKind::Gunner => match rng.gen_range(0..100_u32) {
            0..=49 => (ItemKind::CommonGem, 1.0),
            50..=61 => (ItemKind::GreenGem, 5.0),
            62..=67 => (ItemKind::BlueGem, 10.0),
            68..=69 => (ItemKind::RedGem, 25.0),
            70..=74 => (ItemKind::Snack, 0.5),
            _ => return None,
        },
    };
    Some(Item::dropped(item_kind, position, amount, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bullet, Monster};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use swarm_survival_core::{BulletKind, Position};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0x5eed)
    }

    #[test]
    fn depleted_bullets_are_removed() {
        let mut world = World::new();
        let clock = world.clock();
        let center = world.player().position();
        let mut bullet = Bullet::aimed(
            BulletKind::Standard,
            center,
            center.translated(1.0, 0.0),
            4.0,
            5.0,
            5.0,
            &clock,
        );
        bullet.take_damage(5.0);
        world.add_bullet(bullet);

        sweep(&mut world, &mut rng()).expect("player alive");
        assert_eq!(world.bullet_count(), 0);
    }

    #[test]
    fn out_of_bounds_bullets_are_removed() {
        let mut world = World::new();
        let clock = world.clock();
        world.add_bullet(Bullet::aimed(
            BulletKind::Standard,
            Position::new(-100.0, -100.0),
            Position::new(-200.0, -100.0),
            4.0,
            5.0,
            100.0,
            &clock,
        ));

        sweep(&mut world, &mut rng()).expect("player alive");
        assert_eq!(world.bullet_count(), 0);
    }

    #[test]
    fn slain_common_monsters_may_drop_loot() {
        let mut world = World::new();
        let clock = world.clock();
        let center = world.player().position();
        let mut seeded = rng();

        for offset in 0..40 {
            let mut monster = Monster::spawned(
                MonsterKind::Common,
                center.translated(offset as f32, 0.0),
                &clock,
            );
            monster.take_damage(f32::MAX);
            world.add_monster(monster);
        }

        sweep(&mut world, &mut seeded).expect("player alive");
        assert_eq!(world.monster_count(), 0);
        assert!(
            world.item_count() > 0,
            "forty kills should roll at least one drop",
        );
        assert!(world.item_count() <= 40);
    }

    #[test]
    fn bosses_drop_their_fixed_reward() {
        let mut world = World::new();
        let clock = world.clock();
        let center = world.player().position();
        let mut boss = Monster::spawned(MonsterKind::Boss, center, &clock);
        boss.take_damage(f32::MAX);
        world.add_monster(boss);

        sweep(&mut world, &mut rng()).expect("player alive");

        let items = world.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind(), ItemKind::RedGem);
        assert_eq!(items[0].amount(), BOSS_REWARD);
    }

    #[test]
    fn out_of_bounds_monsters_vanish_without_loot() {
        let mut world = World::new();
        let clock = world.clock();
        world.add_monster(Monster::spawned(
            MonsterKind::Boss,
            Position::new(-500.0, -500.0),
            &clock,
        ));

        sweep(&mut world, &mut rng()).expect("player alive");
        assert_eq!(world.monster_count(), 0);
        assert_eq!(world.item_count(), 0);
    }

    #[test]
    fn depleted_player_signals_the_terminal_error_last() {
        let mut world = World::new();
        let clock = world.clock();
        let center = world.player().position();
        let mut monster = Monster::spawned(MonsterKind::Common, center, &clock);
        monster.take_damage(f32::MAX);
        world.add_monster(monster);
        world.player_mut().take_damage(f32::MAX);

        assert_eq!(sweep(&mut world, &mut rng()), Err(DeadPlayer));
        assert_eq!(world.monster_count(), 0, "kills are honored before death");
    }
}
