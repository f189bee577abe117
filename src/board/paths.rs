//! Shortest paths over the node/edge graph and the longest-road measure built
//! on top of them.

use std::collections::{BTreeMap, BTreeSet};

use super::{EdgeId, NodeId, Topology};

/// Breadth-first search from `origin`. Returns, for every reachable node, one
/// shortest path as the list of edges walked. Only edges in `only_edges` are
/// traversed; `None` allows the whole board.
pub fn shortest_paths(
    topology: &Topology,
    origin: NodeId,
    only_edges: Option<&BTreeSet<EdgeId>>,
) -> BTreeMap<NodeId, Vec<EdgeId>> {
    let mut paths: BTreeMap<NodeId, Vec<EdgeId>> = BTreeMap::from([(origin, Vec::new())]);
    let mut frontier: Vec<NodeId> = vec![origin];

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for node in frontier {
            for (edge, next) in topology.neighbors(node) {
                if only_edges.is_some_and(|allowed| !allowed.contains(&edge)) {
                    continue;
                }
                if paths.contains_key(&next) {
                    continue;
                }
                let mut path = paths[&node].clone();
                path.push(edge);
                paths.insert(next, path);
                next_frontier.push(next);
            }
        }
        frontier = next_frontier;
    }

    paths
}

/// Longest stretch of `roads` between two of its nodes, measured along
/// shortest paths. A path whose interior passes through a node in
/// `other_sites` is cut there and does not count.
pub fn max_road_length(
    topology: &Topology,
    roads: &BTreeSet<EdgeId>,
    other_sites: &BTreeSet<NodeId>,
) -> u32 {
    let waypoints: BTreeSet<NodeId> = roads.iter().flat_map(|edge| [edge.0, edge.1]).collect();
    let mut max_length = 0;

    for &start in &waypoints {
        let paths = shortest_paths(topology, start, Some(roads));
        for &end in &waypoints {
            if end == start {
                continue;
            }
            let Some(path) = paths.get(&end) else {
                continue;
            };
            let length = path.len() as u32;
            if length <= max_length {
                continue;
            }
            if !is_interrupted(start, path, other_sites) {
                max_length = length;
            }
        }
    }

    max_length
}

fn is_interrupted(start: NodeId, path: &[EdgeId], other_sites: &BTreeSet<NodeId>) -> bool {
    let Some((_, interior)) = path.split_last() else {
        return false;
    };
    let mut node = start;
    for edge in interior {
        node = super::other_end(*edge, node);
        if other_sites.contains(&node) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A simple path of `len` edges found by depth-first search from node 0,
    /// returned as its nodes in order.
    fn simple_path(topology: &Topology, len: usize) -> Vec<NodeId> {
        fn extend(topology: &Topology, nodes: &mut Vec<NodeId>, len: usize) -> bool {
            if nodes.len() == len + 1 {
                return true;
            }
            let last = *nodes.last().unwrap();
            for (_, next) in topology.neighbors(last) {
                if nodes.contains(&next) {
                    continue;
                }
                // Stay clear of earlier nodes so the walk never folds back on itself.
                let touches_earlier = topology
                    .neighbors(next)
                    .any(|(_, n)| n != last && nodes.contains(&n));
                if touches_earlier {
                    continue;
                }
                nodes.push(next);
                if extend(topology, nodes, len) {
                    return true;
                }
                nodes.pop();
            }
            false
        }
        let mut nodes = vec![0];
        assert!(extend(topology, &mut nodes, len));
        nodes
    }

    fn edges_of(nodes: &[NodeId]) -> BTreeSet<EdgeId> {
        nodes
            .windows(2)
            .map(|pair| crate::board::normalize_edge((pair[0], pair[1])))
            .collect()
    }

    #[test]
    fn origin_has_empty_path() {
        let topology = Topology::base();
        let paths = shortest_paths(topology, 3, None);
        assert_eq!(paths[&3], Vec::<EdgeId>::new());
        assert_eq!(paths.len(), topology.node_ids().count());
    }

    #[test]
    fn neighbors_are_one_step_away() {
        let topology = Topology::base();
        let paths = shortest_paths(topology, 10, None);
        for (edge, next) in topology.neighbors(10) {
            assert_eq!(paths[&next], vec![edge]);
        }
    }

    #[test]
    fn restricted_search_only_reaches_road_nodes() {
        let topology = Topology::base();
        let line = simple_path(topology, 3);
        let roads = edges_of(&line);
        let paths = shortest_paths(topology, line[0], Some(&roads));
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[&line[3]].len(), 3);
    }

    #[test]
    fn no_roads_means_zero_length() {
        let topology = Topology::base();
        assert_eq!(max_road_length(topology, &BTreeSet::new(), &BTreeSet::new()), 0);
    }

    #[test]
    fn straight_road_measures_its_edge_count() {
        let topology = Topology::base();
        let line = simple_path(topology, 6);
        let roads = edges_of(&line);
        assert_eq!(max_road_length(topology, &roads, &BTreeSet::new()), 6);
    }

    #[test]
    fn opponent_site_cuts_road_to_longer_segment() {
        let topology = Topology::base();
        let line = simple_path(topology, 6);
        let roads = edges_of(&line);
        let blocked = BTreeSet::from([line[2]]);
        assert_eq!(max_road_length(topology, &roads, &blocked), 4);
        let blocked = BTreeSet::from([line[3]]);
        assert_eq!(max_road_length(topology, &roads, &blocked), 3);
    }

    #[test]
    fn opponent_site_at_road_end_does_not_cut() {
        let topology = Topology::base();
        let line = simple_path(topology, 6);
        let roads = edges_of(&line);
        let blocked = BTreeSet::from([line[0], line[6]]);
        assert_eq!(max_road_length(topology, &roads, &blocked), 6);
    }

    #[test]
    fn single_edge_touching_nothing_else_counts_once() {
        let topology = Topology::base();
        let line = simple_path(topology, 1);
        let roads = edges_of(&line);
        assert_eq!(max_road_length(topology, &roads, &BTreeSet::new()), 1);
    }

    proptest! {
        #[test]
        fn road_length_never_exceeds_road_count(
            picks in prop::collection::btree_set(0usize..72, 0..15),
            blocked in prop::collection::btree_set(0u16..54, 0..6),
        ) {
            let topology = Topology::base();
            let roads: BTreeSet<EdgeId> = picks.iter().map(|i| topology.edges()[*i]).collect();
            let length = max_road_length(topology, &roads, &blocked);
            prop_assert!(length as usize <= roads.len());
            if !roads.is_empty() {
                prop_assert!(length >= 1);
            }
        }

        #[test]
        fn blocking_never_lengthens_road(
            picks in prop::collection::btree_set(0usize..72, 1..12),
            blocked in prop::collection::btree_set(0u16..54, 1..6),
        ) {
            let topology = Topology::base();
            let roads: BTreeSet<EdgeId> = picks.iter().map(|i| topology.edges()[*i]).collect();
            let open = max_road_length(topology, &roads, &BTreeSet::new());
            let cut = max_road_length(topology, &roads, &blocked);
            prop_assert!(cut <= open);
        }
    }
}
