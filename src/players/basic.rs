use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;

use crate::board::{EdgeId, NodeId, TileId, Topology};
use crate::game::{
    Argument, COST_CAMP, COST_CARD, COST_FORT, COST_ROAD, Choice, Game, GameState, Prompt,
    ResourceBundle,
};
use crate::players::base::{BasePlayer, Decision, choose_any, choose_ranked};
use crate::types::{ActionTag, OptionTag, Resource};

/// Stock the bot tries to keep of each resource before giving any away.
const BASE_LEVELS: [i32; 5] = [1, 1, 1, 2, 3];

fn base_level(resource: Resource) -> i32 {
    BASE_LEVELS[resource.index()]
}

/// Rule-of-thumb bot: settles for yield diversity, robs the leader, keeps a
/// small reserve of each resource and trades at most once a round.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPlayer;

struct Context<'a> {
    game: &'a Game,
    state: &'a GameState,
    index: usize,
    resources: ResourceBundle,
    open_sites: BTreeSet<NodeId>,
}

impl<'a> Context<'a> {
    fn new(game: &'a Game, index: usize) -> Self {
        let state = game.latest();
        Self {
            game,
            state,
            index,
            resources: state.players[index].resources,
            open_sites: state.open_sites(),
        }
    }

    /// Two points per new resource kind, one per repeat, one for a harbor.
    fn rank_camp(&self, node: NodeId) -> i32 {
        let mut seen = BTreeSet::new();
        let mut score = 0;
        for resource in self.game.layout.home_yields(node) {
            score += if seen.insert(resource) { 2 } else { 1 };
        }
        if Topology::base().is_harbor(node) {
            score += 1;
        }
        score
    }

    fn rank_road(&self, edge: EdgeId) -> i32 {
        let topology = Topology::base();
        let player = &self.state.players[self.index];

        let mut unlocked = None;
        for (node, others) in topology.connections(edge) {
            if player.owns_site(node) {
                continue;
            }
            if !others.iter().any(|other| player.roads.contains(other)) {
                unlocked = Some(node);
            }
        }
        let Some(unlocked) = unlocked else {
            // Joins two stretches of road already owned.
            return 0;
        };
        if self.open_sites.contains(&unlocked) {
            return self.rank_camp(unlocked) + 2;
        }

        let claimed: BTreeSet<EdgeId> = self
            .state
            .players
            .iter()
            .flat_map(|other| other.roads.iter().copied())
            .collect();
        topology
            .neighbors(unlocked)
            .filter(|(next_edge, next)| {
                !claimed.contains(next_edge) && self.open_sites.contains(next)
            })
            .map(|(_, next)| self.rank_camp(next))
            .max()
            .unwrap_or(0)
    }

    fn rank_robber(&self, tile: TileId) -> i32 {
        let owners = self.state.adjacent_owners(tile);
        if owners.iter().any(|(_, owner)| *owner == self.index) {
            0
        } else if owners.is_empty() {
            1
        } else {
            2
        }
    }

    fn rank_lose(&self, resource: Resource, drops: &[Resource]) -> i32 {
        let dropped = drops.iter().filter(|drop| **drop == resource).count() as i32;
        self.resources.get(resource) - dropped - base_level(resource)
    }

    fn rank_gain(&self, resource: Resource) -> i32 {
        -self.resources.get(resource)
    }

    fn rank_swap(&self, resource: Resource) -> i32 {
        let rate = self.state.swap_rate(self.index, resource);
        self.resources.get(resource) - rate - base_level(resource)
    }

    /// Whichever build is closest to affordable decides what a swap buys.
    fn swap_target(&self) -> ResourceBundle {
        let mut best = COST_FORT;
        let mut best_progress = -1;
        for cost in [COST_FORT, COST_CAMP, COST_ROAD, COST_CARD] {
            let progress: i32 = cost
                .iter()
                .map(|(resource, amount)| self.resources.get(resource).min(amount))
                .sum();
            if progress > best_progress {
                best_progress = progress;
                best = cost;
            }
        }
        best
    }

    fn traded_this_round(&self) -> bool {
        self.game
            .history()
            .iter()
            .rev()
            .find(|state| {
                state.actor == self.index
                    && state.action == ActionTag::Turn
                    && state.option == OptionTag::Trade
            })
            .is_some_and(|state| state.round == self.state.round)
    }

    fn turn(&self, choice: &Choice, rng: &mut ChaCha8Rng) -> Option<Decision> {
        if let Some(decision) = choose_any(choice, OptionTag::Win, rng) {
            return Some(decision);
        }
        if let Some(decision) = choose_any(choice, OptionTag::Play, rng) {
            return Some(decision);
        }
        let by_camp = |arg: &Argument| arg.as_node().map_or(0, |node| self.rank_camp(node));
        if let Some(decision) = choose_ranked(choice, OptionTag::Fort, by_camp, None, rng) {
            return Some(decision);
        }
        if let Some(decision) = choose_ranked(choice, OptionTag::Camp, by_camp, None, rng) {
            return Some(decision);
        }
        if choice.has_option(OptionTag::Road) {
            let sites = self.state.camp_options(self.index).len();
            let has_multi = self.resources.get(Resource::Wood) > 1
                && self.resources.get(Resource::Brick) > 1;
            if sites == 0 || (has_multi && sites < 2) {
                let by_road = |arg: &Argument| arg.as_edge().map_or(0, |edge| self.rank_road(edge));
                if let Some(decision) = choose_ranked(choice, OptionTag::Road, by_road, None, rng) {
                    return Some(decision);
                }
            }
        }
        if choice.has_option(OptionTag::Card) {
            let points = self.state.compute_points(self.index);
            let has_multi = self.resources.get(Resource::Sheep) > 1
                && self.resources.get(Resource::Wheat) > 1;
            if points > 5 || (has_multi && points > 3) {
                return Some(Decision::new(OptionTag::Card));
            }
        }
        let by_swap =
            |arg: &Argument| arg.as_resource().map_or(i32::MIN, |res| self.rank_swap(res));
        if let Some(decision) = choose_ranked(choice, OptionTag::Swap, by_swap, Some(1), rng) {
            return Some(decision);
        }
        if self.resources.total() > 6 && !self.traded_this_round() {
            return Some(Decision::new(OptionTag::Trade));
        }
        Some(Decision::new(OptionTag::End))
    }
}

impl BasePlayer for BasicPlayer {
    fn decide(&self, game: &Game, player_index: usize, rng: &mut ChaCha8Rng) -> Option<Decision> {
        let choice = game.choice(player_index)?;
        let ctx = Context::new(game, player_index);

        let by_camp = |arg: &Argument| arg.as_node().map_or(0, |node| ctx.rank_camp(node));
        let by_road = |arg: &Argument| arg.as_edge().map_or(0, |edge| ctx.rank_road(edge));
        let by_gain = |arg: &Argument| arg.as_resource().map_or(0, |res| ctx.rank_gain(res));

        match &choice.prompt {
            Prompt::Base1 { anchor: None } | Prompt::Base2 { anchor: None } => {
                choose_ranked(choice, OptionTag::Camp, by_camp, None, rng)
            }
            Prompt::Base1 { anchor: Some(_) } | Prompt::Base2 { anchor: Some(_) } => {
                choose_ranked(choice, OptionTag::Road, by_road, None, rng)
            }
            Prompt::Select { drops, .. } => {
                let by_lose =
                    |arg: &Argument| arg.as_resource().map_or(0, |res| ctx.rank_lose(res, drops));
                choose_ranked(choice, OptionTag::Res, by_lose, None, rng)
            }
            Prompt::Drop { .. } => choose_any(choice, OptionTag::Commit, rng),
            Prompt::Move => {
                let by_robber =
                    |arg: &Argument| arg.as_tile().map_or(0, |tile| ctx.rank_robber(tile));
                choose_ranked(choice, OptionTag::Robber, by_robber, None, rng)
            }
            Prompt::Rob => {
                let by_points = |arg: &Argument| {
                    arg.as_player()
                        .map_or(0, |player| ctx.state.compute_points(player) as i32)
                };
                choose_ranked(choice, OptionTag::Player, by_points, None, rng)
            }
            Prompt::Turn => ctx.turn(choice, rng),
            Prompt::Swap { .. } => {
                let target = ctx.swap_target();
                let by_need = |arg: &Argument| {
                    arg.as_resource().map_or(i32::MIN, |res| {
                        -(ctx.resources.get(res) - target.get(res))
                    })
                };
                choose_ranked(choice, OptionTag::Res, by_need, None, rng)
            }
            Prompt::Partner => {
                let by_wealth = |arg: &Argument| {
                    arg.as_player()
                        .map_or(0, |player| ctx.state.players[player].resources.total())
                };
                choose_ranked(choice, OptionTag::Player, by_wealth, None, rng)
            }
            Prompt::Request { .. } => choose_ranked(choice, OptionTag::Res, by_gain, None, rng),
            Prompt::Offer { .. } => {
                let by_lose =
                    |arg: &Argument| arg.as_resource().map_or(0, |res| ctx.rank_lose(res, &[]));
                choose_ranked(choice, OptionTag::Res, by_lose, Some(1), rng)
                    .or_else(|| choose_any(choice, OptionTag::Cancel, rng))
            }
            Prompt::Quote { .. } => {
                let near_two = |arg: &Argument| {
                    arg.as_amount().map_or(0, |amount| -(amount as i32 - 2).abs())
                };
                choose_ranked(choice, OptionTag::Amount, near_two, None, rng)
            }
            Prompt::Trade {
                request, amount, ..
            } => {
                let willing = *amount >= 2 && ctx.resources.get(*request) > base_level(*request);
                if willing && choice.has_option(OptionTag::Accept) {
                    Some(Decision::new(OptionTag::Accept))
                } else {
                    Some(Decision::new(OptionTag::Decline))
                }
            }
            Prompt::Donate { .. } => Some(Decision::new(OptionTag::Decline)),
            Prompt::Monopoly => {
                let by_haul = |arg: &Argument| {
                    arg.as_resource().map_or(0, |res| {
                        ctx.state
                            .players
                            .iter()
                            .enumerate()
                            .filter(|(index, _)| *index != player_index)
                            .map(|(_, other)| other.resources.get(res))
                            .sum::<i32>()
                    })
                };
                choose_ranked(choice, OptionTag::Res, by_haul, None, rng)
            }
            Prompt::Roads { .. } => choose_ranked(choice, OptionTag::Road, by_road, None, rng),
            Prompt::Plenty { .. } => choose_ranked(choice, OptionTag::Res, by_gain, None, rng),
        }
    }
}
