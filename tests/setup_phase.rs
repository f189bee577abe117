//! Home placement: snake order, the hand-off into the first roll, and the
//! resources granted by second camps.

mod common;

use catan_engine::game::{Argument, Game, Prompt, ResourceBundle};
use catan_engine::types::{ActionTag, OptionTag};

/// Answers the single pending setup choice with its first offered argument.
fn place_first(game: &mut Game) -> usize {
    let pending = game.pending_players();
    assert_eq!(pending.len(), 1, "setup has exactly one pending seat");
    let seat = pending[0];
    let choice = game.choice(seat).unwrap();
    let option = if choice.has_option(OptionTag::Camp) {
        OptionTag::Camp
    } else {
        OptionTag::Road
    };
    let argument = common::args(choice, option)[0];
    game.perform(seat, option, Some(argument)).unwrap();
    seat
}

/// Test that a first camp asks the same seat for its road, and that road
/// hands the first camp prompt to the next seat.
#[test]
fn test_base1_hands_off_to_next_seat() {
    let mut game = Game::new(common::config(2)).unwrap();

    let choice = game.choice(0).unwrap();
    assert_eq!(choice.prompt, Prompt::Base1 { anchor: None });
    let camp = common::args(choice, OptionTag::Camp)[0];
    game.perform(0, OptionTag::Camp, Some(camp)).unwrap();

    let node = camp.as_node().unwrap();
    let choice = game.choice(0).unwrap();
    assert_eq!(choice.prompt, Prompt::Base1 { anchor: Some(node) });
    let roads = common::args(choice, OptionTag::Road);
    assert!(!roads.is_empty());
    for road in &roads {
        let edge = road.as_edge().unwrap();
        assert!(edge.0 == node || edge.1 == node);
    }

    game.perform(0, OptionTag::Road, Some(roads[0])).unwrap();
    assert!(game.choice(0).is_none());
    let next = game.choice(1).unwrap();
    assert_eq!(next.action(), ActionTag::Base1);
    assert!(next.has_option(OptionTag::Camp));
    // The new prompt never offers a site next to the camp just placed.
    for site in common::args(next, OptionTag::Camp) {
        assert_ne!(site, camp);
    }
    assert_eq!(game.latest().current, 1);
    assert_eq!(game.history().len(), 3);
}

/// Test the full snake order for three seats and the first roll after it.
#[test]
fn test_three_player_setup_order() {
    let mut game = Game::new(common::config(3)).unwrap();

    let mut actors = Vec::new();
    for _ in 0..12 {
        actors.push(place_first(&mut game));
    }
    assert_eq!(actors, vec![0, 0, 1, 1, 2, 2, 2, 2, 1, 1, 0, 0]);

    let state = game.latest();
    assert_eq!(state.round, 0);
    assert_eq!(state.current, 0);
    assert_eq!(state.actor, 0);
    assert_eq!(state.action, ActionTag::Roll);
    assert!(matches!(state.argument, Some(Argument::Amount(2..=12))));
    for player in &state.players {
        assert_eq!(player.camps.len(), 2);
        assert_eq!(player.roads.len(), 2);
        assert!(player.forts.is_empty());
    }
    // One snapshot per action, the initial state, and the commit made
    // before the roll.
    assert_eq!(game.history().len(), 14);
    let before_roll = &game.history()[12];
    assert_eq!(before_roll.action, ActionTag::Base2);
    assert_eq!(before_roll.option, OptionTag::Road);
    assert!(game.choice(0).is_some());
}

/// Test that only second camps produce, one card per adjoining tile.
#[test]
fn test_second_camp_grants_home_yields() {
    let mut game = Game::new(common::config(3)).unwrap();
    for _ in 0..12 {
        place_first(&mut game);
    }

    let mut second_camps = 0;
    for state in game.history() {
        if state.option != OptionTag::Camp {
            continue;
        }
        let actor = state.actor;
        let delta = state.delta(actor).copied().unwrap_or_else(ResourceBundle::zero);
        match state.action {
            ActionTag::Base1 => assert!(delta.is_empty()),
            ActionTag::Base2 => {
                second_camps += 1;
                let node = state.argument.and_then(Argument::as_node).unwrap();
                let mut expected = ResourceBundle::zero();
                for resource in game.layout.home_yields(node) {
                    expected.add(resource, 1);
                }
                assert_eq!(delta, expected);
            }
            other => panic!("camp placed during {other}"),
        }
    }
    assert_eq!(second_camps, 3);
    common::assert_ledger(&game);
}

/// Test that a bad argument is rejected without touching the history.
#[test]
fn test_illegal_setup_argument_is_rejected() {
    let mut game = Game::new(common::config(2)).unwrap();
    let offered = common::args(game.choice(0).unwrap(), OptionTag::Camp);
    let missing = (0..54u16)
        .map(Argument::Node)
        .find(|node| !offered.contains(node));

    assert!(game.perform(0, OptionTag::Camp, None).is_err());
    assert!(game.perform(1, OptionTag::Camp, Some(offered[0])).is_err());
    if let Some(node) = missing {
        assert!(game.perform(0, OptionTag::Camp, Some(node)).is_err());
    }
    assert_eq!(game.history().len(), 1);
    assert!(game.choice(0).is_some());
}
