//! Stateless overlap pass: bullet damage exchange and item pickup.
//!
//! Damage applied here is only reaped by the sweep pass that follows, so an
//! entity brought to zero health stays visible for exactly one tick.

use crate::World;

/// Resolves every overlap in the world for the current tick.
///
/// Player-owned bullets test against every monster with no early exit, so a
/// single round can register several overlaps in one tick (piercing when
/// its hit budget allows). Monster bolts test against the player only. Both
/// exchanges follow the symmetric-consumption rule: target and bullet take
/// the bullet's damage alike.
pub fn resolve(world: &mut World) {
    resolve_bullet_overlaps(world);
    resolve_item_pickups(world);
}

fn resolve_bullet_overlaps(world: &mut World) {
    let World {
        monsters,
        bullets,
        player,
        ..
    } = world;

    for bullet in bullets.iter_mut() {
        let damage = bullet.damage();
        if bullet.kind().player_owned() {
            for monster in monsters.iter_mut() {
                if bullet.bounding_box().intersects(&monster.bounding_box()) {
                    monster.take_damage(damage);
                    bullet.take_damage(damage);
                }
            }
        } else if bullet.bounding_box().intersects(&player.bounding_box()) {
            player.take_damage(damage);
            bullet.take_damage(damage);
        }
    }
}

fn resolve_item_pickups(world: &mut World) {
    let mut index = 0;
    while index < world.items.len() {
        let in_range = world.items[index]
            .position()
            .distance_to(world.player.position())
            <= world.player.pick_range();
        if in_range {
            if let Some(item) = world.remove_item(index) {
                world.apply_item(&item);
            }
        } else {
            index += 1;
        }
    }
}
