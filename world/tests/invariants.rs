use grid_chase_core::{Command, Direction, EntityKind, Event, LevelConfig, SessionStatus};
use grid_chase_system_level_generation::LevelGenerator;
use grid_chase_world::{self as world, query, World};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn direction() -> impl Strategy<Value = Option<Direction>> {
    prop::option::of(prop::sample::select(Direction::ALL.to_vec()))
}

fn level() -> LevelConfig {
    LevelConfig {
        adversaries: 2,
        energizers: 2,
        food: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_sessions_keep_grid_invariants(
        size in 5u32..=12,
        seed in any::<u64>(),
        script in prop::collection::vec(direction(), 1..60),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = LevelGenerator::new(level())
            .generate(size, &mut rng)
            .expect("level fits");
        let mut world = World::from_layout(size, &layout).expect("generated layout is valid");
        let mut events = Vec::new();
        world::apply(&mut world, Command::Start, &mut rng, &mut events);

        let walls: Vec<_> = query::grid(&world).cells_of(EntityKind::Wall).collect();
        let adversary_count = layout.adversaries.len();

        for pending in script {
            let score_before = query::score(&world);
            let player_before = query::player(&world).cell;
            events.clear();
            world::apply(&mut world, Command::Tick { pending }, &mut rng, &mut events);

            let grid = query::grid(&world);
            prop_assert_eq!(grid.cells_of(EntityKind::Wall).collect::<Vec<_>>(), walls.clone());

            let eaten = events
                .iter()
                .filter(|event| matches!(event, Event::FoodEaten { .. }))
                .count();
            let score_after = query::score(&world);
            prop_assert!(score_after >= score_before);
            prop_assert_eq!(score_after - score_before, eaten as u64);
            if eaten == 1 {
                prop_assert!(player_before != query::player(&world).cell);
            }

            if query::status(&world) == SessionStatus::Finished {
                prop_assert!(query::outcome(&world).is_some());
                break;
            }

            let player = query::player(&world);
            prop_assert_eq!(grid.count(EntityKind::PlayerActor), 1);
            prop_assert_eq!(grid.kind_at(player.cell), Some(EntityKind::PlayerActor));

            let adversaries = query::adversaries(&world);
            prop_assert_eq!(grid.count(EntityKind::Adversary), adversary_count);
            for adversary in &adversaries {
                prop_assert_eq!(grid.kind_at(adversary.cell), Some(EntityKind::Adversary));
            }
            let mut cells: Vec<_> = adversaries.iter().map(|adversary| adversary.cell).collect();
            cells.sort();
            cells.dedup();
            prop_assert_eq!(cells.len(), adversary_count);
        }
    }

    #[test]
    fn paused_sessions_ignore_ticks(
        seed in any::<u64>(),
        script in prop::collection::vec(direction(), 1..20),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = LevelGenerator::new(level())
            .generate(8, &mut rng)
            .expect("level fits");
        let mut world = World::from_layout(8, &layout).expect("generated layout is valid");
        let mut events = Vec::new();
        world::apply(&mut world, Command::Start, &mut rng, &mut events);
        world::apply(&mut world, Command::Pause, &mut rng, &mut events);

        let before = query::frame(&world);
        events.clear();
        for pending in script {
            world::apply(&mut world, Command::Tick { pending }, &mut rng, &mut events);
        }
        prop_assert!(events.is_empty());
        prop_assert_eq!(query::frame(&world), before);
    }
}
