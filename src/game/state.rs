use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, NodeId, TileId, Topology, max_road_length, other_end};
use crate::game::choice::Argument;
use crate::game::players::PlayerState;
use crate::game::resources::{ResourceBundle, ResourceError};
use crate::types::{ActionTag, DevelopmentCard, OptionTag, Resource};

/// Roads shorter than this never hold the longest-road bonus.
pub const MIN_LONGEST_ROAD: u32 = 5;
/// Knights needed before the largest-army bonus is awarded.
pub const MIN_LARGEST_ARMY: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no player at seat {player}")]
    UnknownPlayer { player: usize },
    #[error("game already has a winner")]
    GameFinished,
    #[error("player {player} has no pending choice")]
    NoPendingChoice { player: usize },
    #[error("option {option} is not offered by {action}")]
    IllegalOption { action: ActionTag, option: OptionTag },
    #[error("{action}.{option} requires an argument")]
    MissingArgument { action: ActionTag, option: OptionTag },
    #[error("{action}.{option} takes no argument, got {argument}")]
    UnexpectedArgument {
        action: ActionTag,
        option: OptionTag,
        argument: Argument,
    },
    #[error("{argument} is not a legal argument for {action}.{option}")]
    IllegalArgument {
        action: ActionTag,
        option: OptionTag,
        argument: Argument,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} has no playable effect")]
    IllegalCard(DevelopmentCard),
    #[error("ledger would go negative: {0}")]
    Ledger(#[from] ResourceError),
    #[error("unsupported player count {num_players}")]
    InvalidConfig { num_players: usize },
}

/// One committed snapshot of a game, plus the metadata of the action step
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    /// Remaining development cards; the top of the deck is the last entry.
    pub stack: Vec<DevelopmentCard>,
    pub robber: TileId,
    pub largest_army: Option<usize>,
    pub longest_road: Option<usize>,
    pub winner: Option<usize>,
    /// Negative while placing home camps; 0 is the first full turn round.
    pub round: i32,
    pub current: usize,
    pub actor: usize,
    pub action: ActionTag,
    pub option: OptionTag,
    pub argument: Option<Argument>,
    /// Resource adjustments applied at the next commit.
    pub deltas: Vec<Option<ResourceBundle>>,
}

impl GameState {
    pub fn new(num_players: usize, stack: Vec<DevelopmentCard>, robber: TileId) -> Self {
        Self {
            players: vec![PlayerState::new(); num_players],
            stack,
            robber,
            largest_army: None,
            longest_road: None,
            winner: None,
            round: -2,
            current: 0,
            actor: 0,
            action: ActionTag::Game,
            option: OptionTag::Start,
            argument: None,
            deltas: vec![None; num_players],
        }
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn is_setup(&self) -> bool {
        self.round < 0
    }

    /// Seats currently owing a choice, in seat order.
    pub fn pending_players(&self) -> impl Iterator<Item = usize> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.choice.is_some())
            .map(|(index, _)| index)
    }

    /// Resources with this step's uncommitted delta already applied. Only
    /// meaningful mid-action: a committed snapshot keeps its applied deltas as
    /// a record, so read `resources` there instead.
    pub fn hand(&self, player_index: usize) -> ResourceBundle {
        let mut hand = self.players[player_index].resources;
        if let Some(delta) = &self.deltas[player_index] {
            hand.add_bundle(delta);
        }
        hand
    }

    pub fn add_delta(&mut self, player_index: usize, delta: &ResourceBundle) {
        self.deltas[player_index]
            .get_or_insert_with(ResourceBundle::zero)
            .add_bundle(delta);
    }

    pub fn delta(&self, player_index: usize) -> Option<&ResourceBundle> {
        self.deltas.get(player_index).and_then(Option::as_ref)
    }

    /// Applies every pending delta to its player's resources. The deltas stay
    /// behind as a record. Fails without touching anything if a counter would
    /// go negative.
    pub fn apply_deltas(&mut self) -> Result<(), ResourceError> {
        let mut updated = Vec::with_capacity(self.players.len());
        for (player, delta) in self.players.iter().zip(&self.deltas) {
            let mut resources = player.resources;
            if let Some(delta) = delta {
                resources.apply_delta(delta)?;
            }
            updated.push(resources);
        }
        for (player, resources) in self.players.iter_mut().zip(updated) {
            player.resources = resources;
        }
        Ok(())
    }

    pub fn clear_deltas(&mut self) {
        self.deltas.iter_mut().for_each(|delta| *delta = None);
    }

    pub fn compute_points(&self, player_index: usize) -> u32 {
        let player = &self.players[player_index];
        let mut points = player.camps.len() + 2 * player.forts.len() + player.victory_cards();
        if self.longest_road == Some(player_index) {
            points += 2;
        }
        if self.largest_army == Some(player_index) {
            points += 2;
        }
        points as u32
    }

    /// Occupied corners of `tile` and the seat that owns each.
    pub fn adjacent_owners(&self, tile: TileId) -> Vec<(NodeId, usize)> {
        Topology::base()
            .tile_nodes(tile)
            .iter()
            .filter_map(|node| {
                self.players
                    .iter()
                    .position(|player| player.owns_site(*node))
                    .map(|owner| (*node, owner))
            })
            .collect()
    }

    pub fn other_sites(&self, player_index: usize) -> BTreeSet<NodeId> {
        self.players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != player_index)
            .flat_map(|(_, player)| player.sites())
            .collect()
    }

    fn all_sites(&self) -> BTreeSet<NodeId> {
        self.players.iter().flat_map(|player| player.sites()).collect()
    }

    fn all_roads(&self) -> BTreeSet<EdgeId> {
        self.players
            .iter()
            .flat_map(|player| player.roads.iter().copied())
            .collect()
    }

    /// Empty nodes with no settled neighbour.
    pub fn open_sites(&self) -> BTreeSet<NodeId> {
        let topology = Topology::base();
        let sites = self.all_sites();
        topology
            .node_ids()
            .filter(|node| !sites.contains(node))
            .filter(|node| !topology.neighbors(*node).any(|(_, next)| sites.contains(&next)))
            .collect()
    }

    /// Home camp sites. A site also needs a free edge for the road that
    /// follows it.
    pub fn setup_camp_options(&self) -> Vec<NodeId> {
        let topology = Topology::base();
        let roads = self.all_roads();
        self.open_sites()
            .into_iter()
            .filter(|node| {
                topology
                    .node_edges(*node)
                    .iter()
                    .any(|edge| !roads.contains(edge))
            })
            .collect()
    }

    pub fn setup_road_options(&self, anchor: NodeId) -> Vec<EdgeId> {
        let roads = self.all_roads();
        Topology::base()
            .node_edges(anchor)
            .iter()
            .copied()
            .filter(|edge| !roads.contains(edge))
            .collect()
    }

    pub fn robber_options(&self) -> Vec<TileId> {
        Topology::base()
            .tile_ids()
            .filter(|tile| *tile != self.robber)
            .collect()
    }

    /// Free edges touching one of the player's roads. An edge may not end on
    /// a node an opponent has settled.
    pub fn road_options(&self, player_index: usize) -> Vec<EdgeId> {
        let topology = Topology::base();
        let roads = self.all_roads();
        let other_sites = self.other_sites(player_index);
        let mut options = BTreeSet::new();
        for edge in &self.players[player_index].roads {
            for (junction, next_edges) in topology.connections(*edge) {
                options.extend(next_edges.into_iter().filter(|next| {
                    !roads.contains(next) && !other_sites.contains(&other_end(*next, junction))
                }));
            }
        }
        options.into_iter().collect()
    }

    pub fn camp_options(&self, player_index: usize) -> Vec<NodeId> {
        let topology = Topology::base();
        let roads = &self.players[player_index].roads;
        self.open_sites()
            .into_iter()
            .filter(|node| {
                topology
                    .node_edges(*node)
                    .iter()
                    .any(|edge| roads.contains(edge))
            })
            .collect()
    }

    pub fn fort_options(&self, player_index: usize) -> Vec<NodeId> {
        self.players[player_index].camps.iter().copied().collect()
    }

    pub fn swap_rate(&self, player_index: usize, resource: Resource) -> i32 {
        let topology = Topology::base();
        let sites = self.players[player_index].sites();
        if sites
            .iter()
            .any(|node| topology.is_specific_harbor(*node, resource))
        {
            2
        } else if sites.iter().any(|node| topology.is_generic_harbor(*node)) {
            3
        } else {
            4
        }
    }

    /// Remeasures the player's road and hands them the bonus on a strict
    /// improvement over the holder.
    pub fn update_road_length(&mut self, player_index: usize) {
        let other_sites = self.other_sites(player_index);
        let length = max_road_length(
            Topology::base(),
            &self.players[player_index].roads,
            &other_sites,
        );
        self.players[player_index].road_length = length;
        if length < MIN_LONGEST_ROAD {
            return;
        }
        match self.longest_road {
            None => self.longest_road = Some(player_index),
            Some(holder) if length > self.players[holder].road_length => {
                self.longest_road = Some(player_index)
            }
            Some(_) => {}
        }
    }

    pub fn increment_army_size(&mut self, player_index: usize) {
        let size = self.players[player_index].army_size + 1;
        self.players[player_index].army_size = size;
        if size < MIN_LARGEST_ARMY {
            return;
        }
        match self.largest_army {
            None => self.largest_army = Some(player_index),
            Some(holder) if size > self.players[holder].army_size => {
                self.largest_army = Some(player_index)
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_state() -> GameState {
        GameState::new(2, Vec::new(), 0)
    }

    #[test]
    fn new_state_starts_in_setup() {
        let state = two_player_state();
        assert_eq!(state.round, -2);
        assert!(state.is_setup());
        assert_eq!(state.action, ActionTag::Game);
        assert_eq!(state.deltas, vec![None, None]);
        assert_eq!(state.pending_players().count(), 0);
    }

    #[test]
    fn hand_includes_pending_delta() {
        let mut state = two_player_state();
        state.players[0].resources = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
        state.add_delta(0, &ResourceBundle::single(Resource::Wood, 2));
        state.add_delta(0, &ResourceBundle::single(Resource::Brick, -1));
        assert_eq!(state.hand(0), ResourceBundle::from_counts([3, 0, 0, 0, 0]));
        assert_eq!(state.players[0].resources.total(), 2);
    }

    #[test]
    fn apply_deltas_is_all_or_nothing() {
        let mut state = two_player_state();
        state.add_delta(0, &ResourceBundle::single(Resource::Ore, 1));
        state.add_delta(1, &ResourceBundle::single(Resource::Ore, -1));
        assert!(state.apply_deltas().is_err());
        assert!(state.players.iter().all(|player| player.resources.is_empty()));

        state.clear_deltas();
        state.add_delta(0, &ResourceBundle::single(Resource::Ore, 1));
        state.apply_deltas().unwrap();
        assert_eq!(state.players[0].resources.get(Resource::Ore), 1);
    }

    #[test]
    fn points_count_sites_cards_and_bonuses() {
        let mut state = two_player_state();
        state.players[1].camps.extend([1, 9]);
        state.players[1].forts.insert(20);
        state.players[1].cards.push(DevelopmentCard::Chapel);
        state.players[1].draws.push(DevelopmentCard::Knight);
        state.largest_army = Some(1);
        assert_eq!(state.compute_points(1), 2 + 2 + 1 + 2);
        assert_eq!(state.compute_points(0), 0);
    }

    #[test]
    fn setup_sites_respect_distance_rule() {
        let topology = Topology::base();
        let mut state = two_player_state();
        state.players[0].camps.insert(0);
        let options = state.setup_camp_options();
        assert!(!options.contains(&0));
        for (_, next) in topology.neighbors(0) {
            assert!(!options.contains(&next));
        }
        assert_eq!(options.len(), topology.node_ids().count() - 1 - topology.neighbors(0).count());
    }

    #[test]
    fn road_options_extend_own_network() {
        let topology = Topology::base();
        let mut state = two_player_state();
        let (edge, far) = topology.neighbors(0).next().unwrap();
        state.players[0].camps.insert(0);
        state.players[0].roads.insert(edge);
        let options = state.road_options(0);
        let expected = topology.node_edges(0).len() + topology.node_edges(far).len() - 2;
        assert_eq!(options.len(), expected);
        assert!(!options.contains(&edge));

        // A road may pass an opponent's junction but never end on a site.
        state.players[1].camps.insert(far);
        let past = state.road_options(0);
        assert_eq!(past.len(), expected);

        state.players[1].camps.clear();
        let (beyond, site) = topology
            .neighbors(far)
            .find(|(next, _)| *next != edge)
            .unwrap();
        state.players[1].camps.insert(site);
        let blocked = state.road_options(0);
        assert!(!blocked.contains(&beyond));
        assert_eq!(blocked.len(), expected - 1);
    }

    #[test]
    fn camp_options_need_own_road() {
        let topology = Topology::base();
        let mut state = two_player_state();
        assert!(state.camp_options(0).is_empty());
        let (first, middle) = topology.neighbors(0).next().unwrap();
        let (second, far) = topology
            .neighbors(middle)
            .find(|(edge, _)| *edge != first)
            .unwrap();
        state.players[0].camps.insert(0);
        state.players[0].roads.extend([first, second]);
        assert_eq!(state.camp_options(0), vec![far]);
    }

    #[test]
    fn swap_rate_prefers_specific_harbor() {
        let topology = Topology::base();
        let mut state = two_player_state();
        assert_eq!(state.swap_rate(0, Resource::Ore), 4);

        let generic = topology
            .harbors()
            .iter()
            .find(|harbor| harbor.resource.is_none())
            .unwrap();
        state.players[0].camps.insert(generic.nodes[0]);
        assert_eq!(state.swap_rate(0, Resource::Ore), 3);

        let ore = topology
            .harbors()
            .iter()
            .find(|harbor| harbor.resource == Some(Resource::Ore))
            .unwrap();
        state.players[0].forts.insert(ore.nodes[1]);
        assert_eq!(state.swap_rate(0, Resource::Ore), 2);
        assert_eq!(state.swap_rate(0, Resource::Wood), 3);
    }

    #[test]
    fn army_bonus_moves_only_on_strict_improvement() {
        let mut state = two_player_state();
        for _ in 0..2 {
            state.increment_army_size(0);
        }
        assert_eq!(state.largest_army, None);
        state.increment_army_size(0);
        assert_eq!(state.largest_army, Some(0));
        for _ in 0..3 {
            state.increment_army_size(1);
        }
        assert_eq!(state.largest_army, Some(0));
        state.increment_army_size(1);
        assert_eq!(state.largest_army, Some(1));
    }

    #[test]
    fn adjacent_owners_list_settled_corners() {
        let topology = Topology::base();
        let mut state = two_player_state();
        let nodes = topology.tile_nodes(4);
        state.players[1].camps.insert(nodes[0]);
        state.players[0].forts.insert(nodes[3]);
        assert_eq!(state.adjacent_owners(4), vec![(nodes[0], 1), (nodes[3], 0)]);
    }
}
