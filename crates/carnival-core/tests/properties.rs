//! Property tests for the invariants that must survive any random history.

use carnival_core::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn interaction() -> impl Strategy<Value = (Interaction, bool)> {
    (
        prop_oneof![
            Just(Interaction::Insult),
            Just(Interaction::Joke),
            Just(Interaction::Hug),
            Just(Interaction::Other),
        ],
        any::<bool>(),
    )
}

fn in_unit_range(field: &Field) -> bool {
    field.values().iter().all(|v| (0.0..=1.0).contains(v))
}

proptest! {
    #[test]
    fn biome_fields_stay_clamped(seed in any::<u64>(), ticks in 1_usize..300, w in 1_usize..12, h in 1_usize..12) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut biome = Biome::new(w, h, &mut rng);

        for _ in 0..ticks {
            biome.tick(&mut rng);
        }

        prop_assert!(in_unit_range(&biome.water));
        prop_assert!(in_unit_range(&biome.nutrients));
        prop_assert!(in_unit_range(&biome.fungi));
        prop_assert!(in_unit_range(&biome.bacteria));
        prop_assert!(in_unit_range(&biome.altitude));
    }

    #[test]
    fn kanban_never_regresses(steps in prop::collection::vec(interaction(), 1..120)) {
        let mut kanban = ConsentKanban::new();

        for (kind, is_local) in steps {
            let awareness = kanban.awareness();
            let consent = kanban.consent_level();
            let (local, distant) = (kanban.local_count(), kanban.distant_count());

            kanban.interact(kind, is_local);

            prop_assert!(kanban.awareness() >= awareness);
            prop_assert!(kanban.consent_level() >= consent);
            prop_assert!(kanban.consent_level() <= 1.0);
            prop_assert!(kanban.local_count() >= local);
            prop_assert!(kanban.distant_count() >= distant);
            prop_assert_eq!(kanban.local_count() + kanban.distant_count(), local + distant + 1);
        }
    }

    #[test]
    fn mode_follows_vibe(steps in prop::collection::vec(interaction(), 1..60)) {
        let mut kanban = ConsentKanban::new();
        for (kind, is_local) in steps {
            kanban.interact(kind, is_local);

            let vibe = kanban.vibe_bias();
            let expected = if vibe < -0.4 {
                Mode::Rival
            } else if vibe > 0.4 {
                Mode::Homie
            } else {
                Mode::Sovereign
            };
            prop_assert_eq!(kanban.mode(), expected);
            prop_assert_eq!(kanban.sub_state().is_none(), expected == Mode::Sovereign);
        }
    }

    #[test]
    fn die_magnitude_in_range(seed in any::<u64>(), scale in 0.01_f64..100.0, resonance in -10.0_f64..10.0) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let roll = roll_spiral_die(&mut rng, scale, resonance);

        prop_assert!((0.0..=1.0).contains(&roll.magnitude));
        prop_assert_eq!(roll.outcome, Outcome::from_magnitude(roll.magnitude));
    }

    #[test]
    fn same_seed_same_world(seed in 0_u64..5_000, ticks in 1_u32..40) {
        let run = || {
            let mut engine = SimulationEngine::new(WorldConfig {
                width: 16,
                height: 10,
                population: 8,
                ..WorldConfig::seeded(seed)
            })
            .unwrap();
            engine.auto_run(ticks).unwrap();
            (engine.agents(), engine.biome().clone())
        };

        prop_assert_eq!(run(), run());
    }

    #[test]
    fn no_dead_entity_survives_a_tick(seed in 0_u64..5_000, energy in 0.0_f64..2.0) {
        let mut engine = SimulationEngine::new(WorldConfig {
            width: 6,
            height: 6,
            population: 0,
            ..WorldConfig::seeded(seed)
        })
        .unwrap();
        for i in 0..4 {
            engine.spawn_agent(GridPos::new(i, i), Role::Normal, energy + i as f64 * 0.05).unwrap();
        }

        for _ in 0..25 {
            let report = engine.tick();
            let remaining: Vec<AgentId> = engine.agents().iter().map(|a| a.id).collect();
            for id in &report.deaths {
                prop_assert!(!remaining.contains(id));
            }
            for agent in engine.agents() {
                prop_assert!(agent.alive);
            }
        }
    }
}
