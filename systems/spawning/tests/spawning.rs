use swarm_survival_core::{GameClock, MonsterKind, Position, Rect};
use swarm_survival_system_spawning::{BossFlags, Config, SpawnController};
use swarm_survival_world::{Player, Spawner, World};

fn world_at(elapsed_ms: f64) -> World {
    let clock = GameClock::from_elapsed(elapsed_ms);
    let player = Player::new(Position::new(1200.0, 900.0), &clock);
    World::restored(clock, player, Vec::new(), Vec::new(), Vec::new())
}

#[test]
fn population_never_exceeds_the_cap() {
    let mut world = World::new();
    let mut controller = SpawnController::new(Config::default(), &world.clock());
    controller.set_viewport(Rect::new(800.0, 600.0, 800.0, 600.0));

    for _ in 0..600 {
        world.update(&mut controller);
        assert!(
            world.monster_count() <= 20,
            "cap breached: {}",
            world.monster_count(),
        );
    }
    assert_eq!(world.monster_count(), 20, "cadence should fill the cap");
}

#[test]
fn boss_flags_follow_the_scripted_timeline() {
    let mut world = world_at(119_999.0);
    let mut controller = SpawnController::new(Config::default(), &world.clock());
    controller.set_viewport(Rect::new(800.0, 600.0, 800.0, 600.0));

    controller.update(&mut world);
    assert!(controller.flags().minute_boss_added);
    assert!(!controller.flags().second_minute_boss_added);
    assert_eq!(world.monster_count(), 1);
    assert_eq!(world.monsters()[0].kind(), MonsterKind::Boss);

    let mut world = world_at(120_001.0);
    controller.update(&mut world);
    assert!(controller.flags().second_minute_boss_added);
    assert_eq!(world.monster_count(), 1, "exactly one additional monster");
    assert_eq!(world.monsters()[0].kind(), MonsterKind::Megaboss);

    let mut world = world_at(150_000.0);
    controller.update(&mut world);
    assert!(
        world
            .monsters()
            .iter()
            .all(|monster| !monster.kind().is_boss()),
        "no further scripted boss",
    );
}

#[test]
fn restored_flags_suppress_replayed_boss_spawns() {
    let mut world = world_at(150_000.0);
    let flags = BossFlags {
        minute_boss_added: true,
        second_minute_boss_added: true,
    };
    let mut controller = SpawnController::restored(Config::default(), flags, &world.clock());
    controller.set_viewport(Rect::new(800.0, 600.0, 800.0, 600.0));

    controller.update(&mut world);
    assert!(
        world
            .monsters()
            .iter()
            .all(|monster| !monster.kind().is_boss()),
    );
}

#[test]
fn degenerate_viewport_falls_back_to_a_clamped_position() {
    let clock = GameClock::new();
    let mut world = world_at(1000.0);
    let mut controller = SpawnController::new(Config::default(), &clock);
    controller.set_viewport(Rect::new(-5000.0, -5000.0, 100.0, 100.0));

    controller.update(&mut world);

    assert_eq!(world.monster_count(), 1);
    let position = world.monsters()[0].position();
    assert!(
        world.bounds().contains(position),
        "fallback must land in bounds: {position:?}",
    );
}

#[test]
fn seeded_controllers_replay_identical_spawn_sequences() {
    let run = |seed: u64| {
        let mut world = World::new();
        let mut controller =
            SpawnController::new(Config::default().with_seed(seed), &world.clock());
        controller.set_viewport(Rect::new(800.0, 600.0, 800.0, 600.0));
        for _ in 0..200 {
            world.update(&mut controller);
        }
        world
            .monsters()
            .iter()
            .map(|monster| {
                (
                    monster.kind(),
                    monster.position().x().to_bits(),
                    monster.position().y().to_bits(),
                )
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(7), run(7), "same seed, same wave");
    assert_ne!(run(7), run(8), "different seed, different wave");
}
