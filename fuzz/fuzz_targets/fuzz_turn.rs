#![no_main]

//! Full turn fuzzer.
//!
//! Populates a small world, applies several turns of arbitrary moves from
//! arbitrary (possibly unknown) players, and checks that the registries stay
//! in lockstep and no entity is ever lost.

use arbitrary::Arbitrary;
use arena::game::check_invariants;
use arena::{apply_turn, Command, Direction, Location, Map, Submission, TurnConfig, World};
use arena::turn::IllegalCommandPolicy;
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated move.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzMove {
    player: u8,
    x: i8,
    y: i8,
    direction: u8,
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    /// Map dimensions (capped).
    width: u8,
    height: u8,
    /// Starting placements as (player, x, y).
    placements: Vec<(u8, u8, u8)>,
    /// Moves per turn.
    turns: Vec<Vec<FuzzMove>>,
    /// Whether an illegal command ends the player's turn.
    end_turn_on_illegal: bool,
}

fuzz_target!(|input: TurnInput| {
    let width = u16::from(input.width % 16).max(1);
    let height = u16::from(input.height % 16).max(1);
    let Some(map) = Map::new(width, height) else {
        return;
    };
    let mut world = World::new(map, 1..=4);

    for &(player, x, y) in input.placements.iter().take(64) {
        let location = Location::new(u16::from(x) % width, u16::from(y) % height);
        let _ = world.spawn(player % 5, location, 0);
    }
    let entities = world.entity_count();

    let config = TurnConfig {
        on_illegal: if input.end_turn_on_illegal {
            IllegalCommandPolicy::EndPlayerTurn
        } else {
            IllegalCommandPolicy::SkipCommand
        },
        ..TurnConfig::default()
    };

    for turn in input.turns.iter().take(10) {
        let submissions: Vec<_> = turn
            .iter()
            .take(64)
            .map(|m| {
                let direction = Direction::ALL[usize::from(m.direction) % Direction::ALL.len()];
                let command = Command::Move {
                    x: i64::from(m.x),
                    y: i64::from(m.y),
                    direction,
                };
                Submission::new(m.player % 6, vec![command])
            })
            .collect();
        apply_turn(&mut world, &submissions, &config);

        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
        assert_eq!(world.entity_count(), entities, "entity lost");
    }
});
