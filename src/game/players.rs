use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, NodeId, Topology};
use crate::game::choice::Choice;
use crate::game::resources::ResourceBundle;
use crate::types::DevelopmentCard;

pub const MAX_CAMPS: usize = 5;
pub const MAX_FORTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub resources: ResourceBundle,
    /// Bought this turn; playable once the turn ends.
    pub draws: Vec<DevelopmentCard>,
    pub cards: Vec<DevelopmentCard>,
    pub roads: BTreeSet<EdgeId>,
    pub camps: BTreeSet<NodeId>,
    pub forts: BTreeSet<NodeId>,
    pub road_length: u32,
    pub army_size: u32,
    /// The input this player owes, if any.
    pub choice: Option<Choice>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock_cards(&mut self) {
        self.cards.append(&mut self.draws);
    }

    /// Removes one copy of `card`. Returns false if none was held.
    pub fn discard_card(&mut self, card: DevelopmentCard) -> bool {
        match self.cards.iter().position(|held| *held == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn sites(&self) -> BTreeSet<NodeId> {
        self.camps.union(&self.forts).copied().collect()
    }

    pub fn owns_site(&self, node: NodeId) -> bool {
        self.camps.contains(&node) || self.forts.contains(&node)
    }

    /// Unsettled nodes where two of this player's roads meet.
    pub fn conns(&self, topology: &Topology) -> BTreeSet<NodeId> {
        let mut conns = BTreeSet::new();
        for edge in &self.roads {
            for (node, others) in topology.connections(*edge) {
                if self.owns_site(node) {
                    continue;
                }
                if others.iter().any(|other| self.roads.contains(other)) {
                    conns.insert(node);
                }
            }
        }
        conns
    }

    pub fn victory_cards(&self) -> usize {
        self.cards.iter().filter(|card| card.is_victory()).count()
    }

    /// Distinct cards that can be played now, in card order.
    pub fn playable_cards(&self) -> BTreeSet<DevelopmentCard> {
        self.cards
            .iter()
            .copied()
            .filter(|card| !card.is_victory())
            .collect()
    }

    pub fn hand_size(&self) -> usize {
        self.cards.len() + self.draws.len()
    }
}
