//! Helpers shared by the scenario tests.

#![allow(dead_code)]

use catan_engine::board::{BoardLayout, EdgeId, MapType, NodeId, Topology, normalize_edge};
use catan_engine::game::{
    Argument, Choice, Game, GameConfig, GameState, Prompt, ResourceBundle, full_deck, roll_dice,
};
use catan_engine::types::OptionTag;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn config(num_players: usize) -> GameConfig {
    GameConfig {
        num_players,
        ..GameConfig::default()
    }
}

pub fn beginner_layout() -> BoardLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    BoardLayout::build(MapType::Beginner, &mut rng)
}

/// A main-phase state in round 1 with empty hands and the robber on the
/// desert. Nobody owes a choice yet.
pub fn main_phase_state(num_players: usize) -> GameState {
    let layout = beginner_layout();
    let mut state = GameState::new(num_players, full_deck(), layout.desert());
    state.round = 1;
    state.action = catan_engine::types::ActionTag::Turn;
    state.option = OptionTag::End;
    state
}

/// First seed whose opening roll sums to `total`.
pub fn seed_rolling(total: u8) -> u64 {
    (0..10_000)
        .find(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            let (a, b) = roll_dice(&mut rng);
            a + b == total
        })
        .expect("some seed rolls the total")
}

/// Resumes `state` with `rng_seed` driving every later roll and draw.
pub fn resume(state: GameState, rng_seed: u64) -> Game {
    let num_players = state.num_players();
    Game::resume(
        config(num_players),
        beginner_layout(),
        state,
        ChaCha8Rng::seed_from_u64(rng_seed),
    )
    .expect("valid scenario")
}

/// A bare turn prompt offering only `end`.
pub fn end_only() -> Choice {
    Choice::new(Prompt::Turn).with_option(OptionTag::End)
}

pub fn hand(counts: [i32; 5]) -> ResourceBundle {
    ResourceBundle::from_counts(counts)
}

/// A simple path of `len` edges found by depth-first search from `start`,
/// returned as its nodes in order. The walk never touches an earlier node
/// or any node in `avoid`.
pub fn simple_path(start: NodeId, len: usize, avoid: &[NodeId]) -> Vec<NodeId> {
    fn extend(nodes: &mut Vec<NodeId>, len: usize, avoid: &[NodeId]) -> bool {
        if nodes.len() == len + 1 {
            return true;
        }
        let topology = Topology::base();
        let last = *nodes.last().unwrap();
        for (_, next) in topology.neighbors(last) {
            if nodes.contains(&next) || avoid.contains(&next) {
                continue;
            }
            let touches_earlier = topology
                .neighbors(next)
                .any(|(_, n)| n != last && nodes.contains(&n));
            if touches_earlier {
                continue;
            }
            nodes.push(next);
            if extend(nodes, len, avoid) {
                return true;
            }
            nodes.pop();
        }
        false
    }
    let mut nodes = vec![start];
    assert!(extend(&mut nodes, len, avoid), "no path of {len} from {start}");
    nodes
}

pub fn edges_of(nodes: &[NodeId]) -> Vec<EdgeId> {
    nodes
        .windows(2)
        .map(|pair| normalize_edge((pair[0], pair[1])))
        .collect()
}

pub fn args(choice: &Choice, option: OptionTag) -> Vec<Argument> {
    choice.args(option).map(<[Argument]>::to_vec).unwrap_or_default()
}

/// Checks that each committed state's resources are the previous state's
/// plus its recorded delta, and that nothing ever goes negative.
pub fn assert_ledger(game: &Game) {
    let history = game.history();
    for state in history {
        for player in &state.players {
            assert!(player.resources.is_non_negative(), "negative hand in {state:?}");
        }
    }
    for pair in history.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        for index in 0..next.num_players() {
            let mut expected = prev.players[index].resources;
            if let Some(delta) = next.delta(index) {
                expected.add_bundle(delta);
            }
            assert_eq!(next.players[index].resources, expected, "seat {index}");
        }
    }
}
