//! Turn-serial command application.
//!
//! Commands collected from all bots for one turn are applied here, one at a
//! time, in a fixed total order:
//! - Submissions are ordered by player id (stable, so repeated submissions
//!   from one player keep their arrival order)
//! - Each player's commands run in the order the bot sent them
//!
//! No command ever observes another command half-applied. Illegal commands
//! are reported back, never acted on.

mod config;

pub use config::{IllegalCommandPolicy, TurnConfig, DEFAULT_MAX_COMMANDS_PER_TURN};

use crate::error::IllegalCommand;
use crate::game::{assert_invariants, PlayerId, World};
use crate::protocol::Command;

/// The commands one player sent for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The issuing player.
    pub player: PlayerId,
    /// Commands in the order they were received.
    pub commands: Vec<Command>,
}

impl Submission {
    /// Create a new submission.
    #[must_use]
    pub fn new(player: PlayerId, commands: Vec<Command>) -> Self {
        Self { player, commands }
    }
}

/// What happened to one player's commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOutcome {
    /// The player.
    pub player: PlayerId,
    /// Commands applied successfully.
    pub applied: usize,
    /// Commands rejected as illegal, in processing order.
    pub rejected: Vec<IllegalCommand>,
    /// Commands dropped because the player's turn was ended early.
    pub discarded: usize,
    /// Commands dropped for exceeding the per-turn cap.
    pub truncated: usize,
}

impl PlayerOutcome {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            applied: 0,
            rejected: Vec::new(),
            discarded: 0,
            truncated: 0,
        }
    }

    fn processed(&self) -> usize {
        self.applied + self.rejected.len()
    }

    /// Whether every command the player sent was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.discarded == 0 && self.truncated == 0
    }
}

/// Result of applying one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// One entry per player that submitted, in player id order.
    pub outcomes: Vec<PlayerOutcome>,
    /// Players that submitted commands but are not in the world.
    pub unknown_players: Vec<PlayerId>,
}

impl TurnReport {
    /// Outcome for a player, if they submitted anything.
    #[must_use]
    pub fn outcome(&self, player: PlayerId) -> Option<&PlayerOutcome> {
        self.outcomes.iter().find(|o| o.player == player)
    }

    /// Commands applied across all players.
    #[must_use]
    pub fn total_applied(&self) -> usize {
        self.outcomes.iter().map(|o| o.applied).sum()
    }

    /// Commands rejected across all players.
    #[must_use]
    pub fn total_rejected(&self) -> usize {
        self.outcomes.iter().map(|o| o.rejected.len()).sum()
    }

    /// Every rejection, in application order.
    pub fn rejections(&self) -> impl Iterator<Item = &IllegalCommand> {
        self.outcomes.iter().flat_map(|o| o.rejected.iter())
    }
}

/// Apply one turn's submissions to the world.
///
/// Never fails as a whole: each illegal command is recorded in the report
/// and the world stays consistent.
pub fn apply_turn(world: &mut World, submissions: &[Submission], config: &TurnConfig) -> TurnReport {
    let mut ordered: Vec<&Submission> = submissions.iter().collect();
    ordered.sort_by_key(|submission| submission.player);

    let mut report = TurnReport::default();
    let mut ended = false;

    for submission in ordered {
        let id = submission.player;
        let Some((map, player)) = world.split_mut(id) else {
            tracing::warn!(player = id, "commands submitted for unknown player");
            if report.unknown_players.last() != Some(&id) {
                report.unknown_players.push(id);
            }
            continue;
        };

        // Submissions are sorted, so a player's outcome is always the last one.
        if report.outcomes.last().is_none_or(|o| o.player != id) {
            report.outcomes.push(PlayerOutcome::new(id));
            ended = false;
        }
        let index = report.outcomes.len() - 1;
        let outcome = &mut report.outcomes[index];

        for command in &submission.commands {
            if ended {
                outcome.discarded += 1;
                continue;
            }
            if outcome.processed() >= config.max_commands_per_turn {
                outcome.truncated += 1;
                continue;
            }

            match command.apply(map, player) {
                Ok(_) => outcome.applied += 1,
                Err(e) => {
                    tracing::warn!(player = id, command = %command, error = %e, "illegal command");
                    outcome.rejected.push(e);
                    if config.on_illegal == IllegalCommandPolicy::EndPlayerTurn {
                        ended = true;
                    }
                }
            }
        }
    }

    assert_invariants(world);
    tracing::info!(
        players = report.outcomes.len(),
        applied = report.total_applied(),
        rejected = report.total_rejected(),
        "turn applied"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IllegalReason;
    use crate::game::{Direction, Location, Map};

    fn create_test_world() -> World {
        let mut world = World::new(Map::new(4, 4).unwrap(), [1, 2]);
        world.spawn(1, Location::new(3, 2), 100).unwrap();
        world.spawn(1, Location::new(0, 0), 100).unwrap();
        world.spawn(2, Location::new(1, 1), 100).unwrap();
        world
    }

    fn mv(x: u16, y: u16, direction: Direction) -> Command {
        Command::move_entity(Location::new(x, y), direction)
    }

    #[test]
    fn test_applies_all_players() {
        let mut world = create_test_world();
        let submissions = vec![
            Submission::new(2, vec![mv(1, 1, Direction::West)]),
            Submission::new(1, vec![mv(3, 2, Direction::East), mv(0, 0, Direction::South)]),
        ];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());

        assert_eq!(report.total_applied(), 3);
        assert_eq!(report.total_rejected(), 0);
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.player).collect();
        assert_eq!(ids, vec![1, 2]);

        let p1 = world.get_player(1).unwrap();
        assert!(p1.has_entity_at(Location::new(0, 2)));
        assert!(p1.has_entity_at(Location::new(0, 1)));
        assert!(world.get_player(2).unwrap().has_entity_at(Location::new(0, 1)));
        assert_eq!(world.map().at(Location::new(0, 1)).len(), 2);
    }

    #[test]
    fn test_commands_see_earlier_commands() {
        let mut world = create_test_world();
        // Second command moves the entity the first one just moved.
        let submissions = vec![Submission::new(
            1,
            vec![mv(3, 2, Direction::East), mv(0, 2, Direction::East)],
        )];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());

        assert!(report.outcome(1).unwrap().is_clean());
        assert!(world.get_player(1).unwrap().has_entity_at(Location::new(1, 2)));
    }

    #[test]
    fn test_repeated_submissions_share_one_outcome() {
        let mut world = create_test_world();
        let submissions = vec![
            Submission::new(1, vec![mv(3, 2, Direction::East)]),
            Submission::new(2, vec![mv(1, 1, Direction::North)]),
            Submission::new(1, vec![mv(2, 2, Direction::North), mv(0, 2, Direction::South)]),
        ];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());

        let ids: Vec<_> = report.outcomes.iter().map(|o| o.player).collect();
        assert_eq!(ids, vec![1, 2]);
        let outcome = report.outcome(1).unwrap();
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.rejected.len(), 1);
        // Arrival order within the player is kept: the second move sees the first.
        assert!(world.get_player(1).unwrap().has_entity_at(Location::new(0, 3)));
    }

    #[test]
    fn test_skip_policy_continues() {
        let mut world = create_test_world();
        let submissions = vec![Submission::new(
            1,
            vec![mv(2, 2, Direction::North), mv(3, 2, Direction::West)],
        )];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());
        let outcome = report.outcome(1).unwrap();

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].reason, IllegalReason::UnownedEntity);
        assert_eq!(outcome.rejected[0].player, 1);
    }

    #[test]
    fn test_end_turn_policy_discards_rest() {
        let mut world = create_test_world();
        let before = world.clone();
        let config = TurnConfig {
            on_illegal: IllegalCommandPolicy::EndPlayerTurn,
            ..TurnConfig::default()
        };
        let submissions = vec![
            Submission::new(1, vec![mv(2, 2, Direction::North), mv(3, 2, Direction::West)]),
            Submission::new(1, vec![mv(0, 0, Direction::East)]),
            Submission::new(2, vec![mv(1, 1, Direction::Still)]),
        ];

        let report = apply_turn(&mut world, &submissions, &config);

        let outcome = report.outcome(1).unwrap();
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.discarded, 2);
        assert_eq!(report.outcome(2).unwrap().applied, 1);
        assert_eq!(world, before);
    }

    #[test]
    fn test_cap_truncates() {
        let mut world = create_test_world();
        let config = TurnConfig {
            max_commands_per_turn: 2,
            ..TurnConfig::default()
        };
        let submissions = vec![Submission::new(
            1,
            vec![
                mv(0, 0, Direction::Still),
                mv(0, 0, Direction::Still),
                mv(0, 0, Direction::Still),
            ],
        )];

        let report = apply_turn(&mut world, &submissions, &config);
        let outcome = report.outcome(1).unwrap();
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.truncated, 1);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_unknown_player_is_reported() {
        let mut world = create_test_world();
        let before = world.clone();
        let submissions = vec![Submission::new(7, vec![mv(3, 2, Direction::East)])];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());

        assert_eq!(report.unknown_players, vec![7]);
        assert!(report.outcomes.is_empty());
        assert_eq!(world, before);
    }

    #[test]
    fn test_player_cannot_move_foreign_entity() {
        let mut world = create_test_world();
        let submissions = vec![Submission::new(2, vec![mv(3, 2, Direction::East)])];

        let report = apply_turn(&mut world, &submissions, &TurnConfig::default());

        assert_eq!(report.rejections().count(), 1);
        assert!(world.get_player(1).unwrap().has_entity_at(Location::new(3, 2)));
    }
}
