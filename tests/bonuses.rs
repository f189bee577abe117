//! Largest army and longest road: thresholds, ties and transfers.

mod common;

use catan_engine::board::{NodeId, Topology};

/// Test that the army bonus starts at three knights and only moves on a
/// strictly larger army.
#[test]
fn test_army_tie_keeps_holder() {
    let mut state = common::main_phase_state(2);

    state.increment_army_size(0);
    state.increment_army_size(0);
    assert_eq!(state.largest_army, None);
    state.increment_army_size(0);
    assert_eq!(state.largest_army, Some(0));

    for _ in 0..3 {
        state.increment_army_size(1);
    }
    assert_eq!(state.players[1].army_size, 3);
    assert_eq!(state.largest_army, Some(0));

    state.increment_army_size(1);
    assert_eq!(state.largest_army, Some(1));
    assert_eq!(state.compute_points(1), 2);
    assert_eq!(state.compute_points(0), 0);
}

/// Second path for seat 1, kept clear of every node seat 0 touches.
fn far_path(first: &[NodeId], len: usize) -> Vec<NodeId> {
    let topology = Topology::base();
    let mut avoid: Vec<NodeId> = first.to_vec();
    for node in first {
        avoid.extend(topology.neighbors(*node).map(|(_, next)| next));
    }
    let start = topology
        .node_ids()
        .filter(|node| !avoid.contains(node))
        .last()
        .unwrap();
    common::simple_path(start, len, &avoid)
}

/// Test that a five-road tie leaves the bonus where it is, and a sixth road
/// takes it.
#[test]
fn test_longest_road_needs_strictly_more() {
    let mut state = common::main_phase_state(2);
    let first = common::simple_path(0, 5, &[]);
    state.players[0].roads.extend(common::edges_of(&first));
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 5);
    assert_eq!(state.longest_road, Some(0));

    let second = far_path(&first, 6);
    let edges = common::edges_of(&second);
    state.players[1].roads.extend(edges[..5].iter().copied());
    state.update_road_length(1);
    assert_eq!(state.players[1].road_length, 5);
    assert_eq!(state.longest_road, Some(0));

    state.players[1].roads.insert(edges[5]);
    state.update_road_length(1);
    assert_eq!(state.players[1].road_length, 6);
    assert_eq!(state.longest_road, Some(1));
    assert_eq!(state.compute_points(1), 2);
}

/// Test that four roads never earn the bonus.
#[test]
fn test_short_road_earns_nothing() {
    let mut state = common::main_phase_state(2);
    let path = common::simple_path(0, 4, &[]);
    state.players[0].roads.extend(common::edges_of(&path));
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 4);
    assert_eq!(state.longest_road, None);
}

/// Test that an opponent's camp in the middle of a road splits it.
#[test]
fn test_opponent_site_cuts_road() {
    let mut state = common::main_phase_state(2);
    let path = common::simple_path(0, 6, &[]);
    state.players[0].roads.extend(common::edges_of(&path));
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 6);

    state.players[1].camps.insert(path[3]);
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 3);

    // The player's own camp never cuts.
    state.players[1].camps.clear();
    state.players[0].camps.insert(path[3]);
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 6);
}

/// Test that a road branching into a fork counts its longest arm once.
#[test]
fn test_fork_counts_longest_branch() {
    let mut state = common::main_phase_state(2);
    let trunk = common::simple_path(0, 5, &[]);
    state.players[0].roads.extend(common::edges_of(&trunk));

    let topology = Topology::base();
    let branch = topology
        .neighbors(trunk[2])
        .find(|(_, next)| !trunk.contains(next))
        .map(|(edge, _)| edge);
    if let Some(edge) = branch {
        state.players[0].roads.insert(edge);
    }
    state.update_road_length(0);
    assert_eq!(state.players[0].road_length, 5);
}
