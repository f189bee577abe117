//! Per-player projections of a game, shaped for sending to a client.
//!
//! Every seat sees the public board. Only the target seat sees its own exact
//! resources, cards, points and pending choice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, NodeId, TileId, TileYield, Topology};
use crate::game::{Argument, Choice, Game, GameState, ResourceBundle};
use crate::types::{ActionTag, DevelopmentCard, OptionTag, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub action: ActionTag,
    pub action_params: Vec<Argument>,
    pub options: Vec<OptionTag>,
    pub option_args: BTreeMap<OptionTag, Vec<Argument>>,
}

impl From<&Choice> for ChoiceView {
    fn from(choice: &Choice) -> Self {
        let option_args = choice
            .options()
            .iter()
            .filter_map(|option| option.args.clone().map(|args| (option.tag, args)))
            .collect();
        Self {
            action: choice.action(),
            action_params: choice.prompt.params(),
            options: choice.option_tags().collect(),
            option_args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateView {
    pub resources: ResourceBundle,
    pub swap_rates: BTreeMap<Resource, i32>,
    pub cards: Vec<DevelopmentCard>,
    pub draws: Vec<DevelopmentCard>,
    pub points: u32,
    pub choice: Option<ChoiceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub resource_count: i32,
    pub hand_count: usize,
    pub roads: Vec<EdgeId>,
    pub conns: Vec<NodeId>,
    pub camps: Vec<NodeId>,
    pub forts: Vec<NodeId>,
    pub knight_count: u32,
    pub road_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub round: i32,
    pub current: usize,
    pub robber: TileId,
    pub largest: Option<usize>,
    pub longest: Option<usize>,
    pub winner: Option<usize>,
    pub actor: usize,
    pub action: ActionTag,
    pub option: OptionTag,
    pub argument: Option<Argument>,
    pub players: Vec<PlayerView>,
    /// The target seat's share of the step that produced this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<ResourceBundle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub goal: u32,
    pub num_players: usize,
    pub tiles: Vec<TileYield>,
    pub states: Vec<StateView>,
}

impl GameState {
    /// Projects the state for `target`; `None` gives the spectator view.
    pub fn view(&self, target: Option<usize>) -> StateView {
        let topology = Topology::base();
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let private = (target == Some(index)).then(|| PrivateView {
                    resources: player.resources,
                    swap_rates: Resource::ALL
                        .into_iter()
                        .map(|resource| (resource, self.swap_rate(index, resource)))
                        .collect(),
                    cards: player.cards.clone(),
                    draws: player.draws.clone(),
                    points: self.compute_points(index),
                    choice: player.choice.as_ref().map(ChoiceView::from),
                });
                PlayerView {
                    resource_count: player.resources.total(),
                    hand_count: player.hand_size(),
                    roads: player.roads.iter().copied().collect(),
                    conns: player.conns(topology).into_iter().collect(),
                    camps: player.camps.iter().copied().collect(),
                    forts: player.forts.iter().copied().collect(),
                    knight_count: player.army_size,
                    road_length: player.road_length,
                    private,
                }
            })
            .collect();

        StateView {
            round: self.round,
            current: self.current,
            robber: self.robber,
            largest: self.largest_army,
            longest: self.longest_road,
            winner: self.winner,
            actor: self.actor,
            action: self.action,
            option: self.option,
            argument: self.argument,
            players,
            delta: target.and_then(|index| self.delta(index).copied()),
        }
    }
}

impl Game {
    pub fn view(&self, target: Option<usize>) -> GameView {
        GameView {
            goal: self.config.vps_to_win,
            num_players: self.config.num_players,
            tiles: self.layout.tiles().map(|(_, tile)| tile).collect(),
            states: self
                .history()
                .iter()
                .map(|state| state.view(target))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[test]
    fn only_target_sees_private_block() {
        let game = Game::new(GameConfig::default()).unwrap();
        let view = game.latest().view(Some(0));
        assert!(view.players[0].private.is_some());
        assert!(view.players[1..].iter().all(|player| player.private.is_none()));

        let spectator = game.latest().view(None);
        assert!(spectator.players.iter().all(|player| player.private.is_none()));
    }

    #[test]
    fn pending_choice_is_projected() {
        let game = Game::new(GameConfig::default()).unwrap();
        let view = game.latest().view(Some(0));
        let choice = view.players[0]
            .private
            .as_ref()
            .and_then(|private| private.choice.as_ref())
            .unwrap();
        assert_eq!(choice.action, ActionTag::Base1);
        assert_eq!(choice.options, vec![OptionTag::Camp]);
        assert!(!choice.option_args[&OptionTag::Camp].is_empty());
        assert!(choice.action_params.is_empty());
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let game = Game::new(GameConfig::default()).unwrap();
        let json = serde_json::to_value(game.view(Some(0))).unwrap();
        let player = &json["states"][0]["players"][0];
        assert!(player.get("resourceCount").is_some());
        assert!(player.get("roadLength").is_some());
        assert!(player["private"].get("swapRates").is_some());
        assert!(json["states"][0]["players"][1].get("private").is_none());
        assert_eq!(json["goal"], 10);
    }

    #[test]
    fn game_view_covers_whole_history() {
        let game = Game::new(GameConfig::default()).unwrap();
        let view = game.view(None);
        assert_eq!(view.states.len(), game.history().len());
        assert_eq!(view.tiles.len(), 19);
    }
}
