//! Phase handlers. Every `(prompt, option)` pair a choice can offer maps to
//! exactly one method here; [`Action::dispatch`] is the table.

use itertools::Itertools;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::board::NodeId;
use crate::game::action::Action;
use crate::game::choice::{Argument, Choice, Prompt};
use crate::game::game::roll_dice;
use crate::game::players::{MAX_CAMPS, MAX_FORTS};
use crate::game::resources::{COST_CAMP, COST_CARD, COST_FORT, COST_ROAD, ResourceBundle};
use crate::game::state::{GameError, GameState, ValidationError};
use crate::types::{ActionTag, DevelopmentCard, OptionTag, Resource};

/// Hands at or above this size lose half on a 7.
pub const DISCARD_THRESHOLD: i32 = 8;

pub(super) fn setup_camp_choice(state: &GameState, first_round: bool) -> Choice {
    let prompt = if first_round {
        Prompt::Base1 { anchor: None }
    } else {
        Prompt::Base2 { anchor: None }
    };
    let sites = state.setup_camp_options();
    Choice::new(prompt).with_args(OptionTag::Camp, sites.into_iter().map(Argument::Node).collect())
}

fn setup_road_choice(state: &GameState, first_round: bool, anchor: NodeId) -> Choice {
    let prompt = if first_round {
        Prompt::Base1 {
            anchor: Some(anchor),
        }
    } else {
        Prompt::Base2 {
            anchor: Some(anchor),
        }
    };
    let edges = state.setup_road_options(anchor);
    Choice::new(prompt).with_args(OptionTag::Road, edges.into_iter().map(Argument::Edge).collect())
}

fn resource_args(resources: impl IntoIterator<Item = Resource>) -> Vec<Argument> {
    resources.into_iter().map(Argument::Resource).collect()
}

fn others(state: &GameState, player_index: usize) -> Vec<Argument> {
    (0..state.num_players())
        .filter(|index| *index != player_index)
        .map(Argument::Player)
        .collect()
}

impl Action<'_> {
    pub(super) fn dispatch(
        &mut self,
        prompt: Prompt,
        option: OptionTag,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        use OptionTag as O;

        let actor = self.state.actor;
        match (prompt, option) {
            (Prompt::Base1 { .. }, O::Camp) => self.base_camp(true, argument),
            (Prompt::Base1 { .. }, O::Road) => self.base1_road(argument),
            (Prompt::Base2 { .. }, O::Camp) => self.base_camp(false, argument),
            (Prompt::Base2 { .. }, O::Road) => self.base2_road(argument),

            (
                Prompt::Select {
                    dropped,
                    drop_count,
                    drops,
                },
                O::Res,
            ) => self.select_res(dropped, drop_count, drops, argument),
            (Prompt::Drop { drops, .. }, O::Commit) => self.drop_commit(&drops),
            (Prompt::Drop { drop_count, .. }, O::Reset) => {
                self.start_select(actor, drop_count);
                Ok(())
            }
            (Prompt::Move, O::Robber) => self.move_robber(argument),
            (Prompt::Rob, O::Player) => self.rob_player(argument),
            (Prompt::Rob, O::Nobody) => self.continue_turn(actor),

            (Prompt::Turn, O::Win) => self.turn_win(),
            (Prompt::Turn, O::Road) => self.turn_road(argument),
            (Prompt::Turn, O::Camp) => self.turn_camp(argument),
            (Prompt::Turn, O::Fort) => self.turn_fort(argument),
            (Prompt::Turn, O::Card) => self.turn_card(),
            (Prompt::Turn, O::Play) => self.turn_play(argument),
            (Prompt::Turn, O::Swap) => self.turn_swap(argument),
            (Prompt::Turn, O::Trade) => self.turn_trade(),
            (Prompt::Turn, O::End) => self.turn_end(),

            (Prompt::Swap { give }, O::Res) => self.swap_res(give, argument),
            (Prompt::Partner, O::Player) => self.partner_player(argument),
            (Prompt::Request { partner }, O::Res) => self.request_res(partner, argument),
            (Prompt::Offer { partner, request }, O::Nothing) => {
                self.offer_nothing(partner, request)
            }
            (Prompt::Offer { partner, request }, O::Res) => {
                self.offer_res(partner, request, argument)
            }
            (
                Prompt::Quote {
                    partner,
                    request,
                    offer,
                },
                O::Amount,
            ) => self.quote_amount(partner, request, offer, argument),
            (
                Prompt::Trade {
                    requester,
                    request,
                    offer,
                    amount,
                },
                O::Accept,
            ) => self.trade_accept(requester, request, offer, amount),
            (Prompt::Donate { requester, request }, O::Grant) => {
                self.donate_grant(requester, request)
            }
            (Prompt::Trade { requester, .. } | Prompt::Donate { requester, .. }, O::Decline) => {
                self.continue_turn(requester)
            }
            (
                Prompt::Swap { .. }
                | Prompt::Partner
                | Prompt::Request { .. }
                | Prompt::Offer { .. }
                | Prompt::Quote { .. },
                O::Cancel,
            ) => self.continue_turn(actor),

            (Prompt::Monopoly, O::Res) => self.monopoly_res(argument),
            (Prompt::Roads { num }, O::Road) => self.roads_road(num, argument),
            (Prompt::Plenty { num }, O::Res) => self.plenty_res(num, argument),

            (prompt, option) => Err(ValidationError::IllegalOption {
                action: prompt.tag(),
                option,
            }
            .into()),
        }
    }

    fn required<T>(
        &self,
        argument: Option<Argument>,
        extract: fn(Argument) -> Option<T>,
    ) -> Result<T, GameError> {
        let (action, option) = (self.state.action, self.state.option);
        let argument = argument.ok_or(ValidationError::MissingArgument { action, option })?;
        extract(argument).ok_or_else(|| {
            ValidationError::IllegalArgument {
                action,
                option,
                argument,
            }
            .into()
        })
    }

    // Setup

    fn base_camp(
        &mut self,
        first_round: bool,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        let node = self.required(argument, Argument::as_node)?;
        let actor = self.state.actor;
        self.state.players[actor].camps.insert(node);
        if !first_round {
            let mut yields = ResourceBundle::zero();
            for resource in self.layout.home_yields(node) {
                yields.add(resource, 1);
            }
            self.state.add_delta(actor, &yields);
        }
        let choice = setup_road_choice(&self.state, first_round, node);
        self.set_choice(actor, choice);
        Ok(())
    }

    fn base1_road(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        self.place_setup_road(argument)?;
        if self.state.current + 1 == self.state.num_players() {
            // The last seat places both of its camps back to back.
            self.state.round += 1;
            let choice = setup_camp_choice(&self.state, false);
            self.set_choice(self.state.current, choice);
        } else {
            self.state.current += 1;
            let choice = setup_camp_choice(&self.state, true);
            self.set_choice(self.state.current, choice);
        }
        Ok(())
    }

    fn base2_road(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        self.place_setup_road(argument)?;
        if self.state.current == 0 {
            self.state.round += 1;
            return self.start_next_turn();
        }
        self.state.current -= 1;
        let choice = setup_camp_choice(&self.state, false);
        self.set_choice(self.state.current, choice);
        Ok(())
    }

    fn place_setup_road(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let edge = self.required(argument, Argument::as_edge)?;
        let actor = self.state.actor;
        self.state.players[actor].roads.insert(edge);
        self.state.update_road_length(actor);
        Ok(())
    }

    // Dice

    fn start_next_turn(&mut self) -> Result<(), GameError> {
        self.commit()?;

        let (a, b) = roll_dice(&mut *self.rng);
        let roll = a + b;
        let current = self.state.current;
        self.state.actor = current;
        self.state.action = ActionTag::Roll;
        self.state.argument = Some(Argument::Amount(u32::from(roll)));
        debug!(player = current, round = self.state.round, roll, "dice");

        if roll == 7 {
            self.state.option = OptionTag::Robber;
            self.start_drops();
        } else {
            self.state.option = OptionTag::Yield;
            self.add_yields(roll);
            self.continue_turn(current)?;
        }
        Ok(())
    }

    /// Credits every settled corner of each producing tile. The robber's
    /// tile produces nothing.
    fn add_yields(&mut self, roll: u8) {
        let layout = self.layout;
        for (tile, produce) in layout.tiles() {
            if produce.roll != Some(roll) || tile == self.state.robber {
                continue;
            }
            let Some(resource) = produce.resource else {
                continue;
            };
            for (node, owner) in self.state.adjacent_owners(tile) {
                let amount = if self.state.players[owner].forts.contains(&node) {
                    2
                } else {
                    1
                };
                self.state
                    .add_delta(owner, &ResourceBundle::single(resource, amount));
            }
        }
    }

    // Discards and the robber

    fn start_drops(&mut self) {
        for index in 0..self.state.num_players() {
            let total = self.state.hand(index).total();
            if total >= DISCARD_THRESHOLD {
                self.start_select(index, (total / 2) as u32);
            }
        }
        self.end_drops();
    }

    fn start_select(&mut self, player_index: usize, drop_count: u32) {
        let choice = self.select_choice(player_index, 0, drop_count, Vec::new());
        self.set_choice(player_index, choice);
    }

    fn select_choice(
        &self,
        player_index: usize,
        dropped: u32,
        drop_count: u32,
        drops: Vec<Resource>,
    ) -> Choice {
        let mut remaining = self.state.hand(player_index);
        for resource in &drops {
            remaining.add(*resource, -1);
        }
        let args = resource_args(
            remaining
                .iter()
                .filter(|(_, amount)| *amount > 0)
                .map(|(resource, _)| resource),
        );
        Choice::new(Prompt::Select {
            dropped,
            drop_count,
            drops,
        })
        .with_args(OptionTag::Res, args)
    }

    fn select_res(
        &mut self,
        dropped: u32,
        drop_count: u32,
        mut drops: Vec<Resource>,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        let resource = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        drops.push(resource);
        let dropped = dropped + 1;

        let choice = if dropped >= drop_count {
            Choice::new(Prompt::Drop { drop_count, drops })
                .with_args(OptionTag::Commit, vec![Argument::Amount(drop_count)])
                .with_option(OptionTag::Reset)
        } else {
            self.select_choice(actor, dropped, drop_count, drops)
        };
        self.set_choice(actor, choice);
        Ok(())
    }

    fn drop_commit(&mut self, drops: &[Resource]) -> Result<(), GameError> {
        let mut delta = ResourceBundle::zero();
        for resource in drops {
            delta.add(*resource, -1);
        }
        self.state.add_delta(self.state.actor, &delta);
        self.end_drops();
        Ok(())
    }

    /// The robber moves once nobody owes a discard.
    fn end_drops(&mut self) {
        if self.state.pending_players().next().is_some() {
            return;
        }
        let choice = self.robber_choice();
        self.set_choice(self.state.current, choice);
    }

    fn robber_choice(&self) -> Choice {
        let tiles = self.state.robber_options();
        Choice::new(Prompt::Move)
            .with_args(OptionTag::Robber, tiles.into_iter().map(Argument::Tile).collect())
    }

    fn move_robber(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let tile = self.required(argument, Argument::as_tile)?;
        let actor = self.state.actor;
        self.state.robber = tile;

        let victims: Vec<Argument> = self
            .state
            .adjacent_owners(tile)
            .into_iter()
            .map(|(_, owner)| owner)
            .filter(|owner| *owner != actor && self.state.hand(*owner).total() > 0)
            .sorted()
            .dedup()
            .map(Argument::Player)
            .collect();
        if victims.is_empty() {
            return self.continue_turn(actor);
        }
        let choice = Choice::new(Prompt::Rob)
            .with_args(OptionTag::Player, victims)
            .with_option(OptionTag::Nobody);
        self.set_choice(actor, choice);
        Ok(())
    }

    fn rob_player(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let victim = self.required(argument, Argument::as_player)?;
        let actor = self.state.actor;
        let cards = self.state.hand(victim).cards();
        if let Some(resource) = cards.choose(&mut *self.rng).copied() {
            self.state
                .add_delta(victim, &ResourceBundle::single(resource, -1));
            self.state
                .add_delta(actor, &ResourceBundle::single(resource, 1));
        }
        self.continue_turn(actor)
    }

    // Main turn

    fn continue_turn(&mut self, player_index: usize) -> Result<(), GameError> {
        let choice = self.turn_choice(player_index);
        self.set_choice(player_index, choice);
        Ok(())
    }

    /// Everything the player could do next, judged on resources with this
    /// step's delta applied.
    fn turn_choice(&self, player_index: usize) -> Choice {
        let state = &self.state;
        let player = &state.players[player_index];
        let hand = state.hand(player_index);
        let road_sites = state.road_options(player_index);
        let mut choice = Choice::new(Prompt::Turn);

        if state.compute_points(player_index) >= self.config.vps_to_win {
            choice.add_option(OptionTag::Win);
        }
        if hand.can_afford(&COST_ROAD) {
            choice.add_option_with(
                OptionTag::Road,
                road_sites.iter().copied().map(Argument::Edge).collect(),
            );
        }
        if hand.can_afford(&COST_CAMP) && player.camps.len() < MAX_CAMPS {
            let sites = state.camp_options(player_index).into_iter().map(Argument::Node).collect();
            choice.add_option_with(OptionTag::Camp, sites);
        }
        if hand.can_afford(&COST_FORT) && player.forts.len() < MAX_FORTS {
            let sites = state.fort_options(player_index).into_iter().map(Argument::Node).collect();
            choice.add_option_with(OptionTag::Fort, sites);
        }
        if hand.can_afford(&COST_CARD) && !state.stack.is_empty() {
            choice.add_option(OptionTag::Card);
        }
        let playable = player
            .playable_cards()
            .into_iter()
            .filter(|card| *card != DevelopmentCard::RoadBuilding || !road_sites.is_empty())
            .map(Argument::Card)
            .collect();
        choice.add_option_with(OptionTag::Play, playable);
        let swappable = Resource::ALL
            .into_iter()
            .filter(|resource| hand.get(*resource) >= state.swap_rate(player_index, *resource));
        choice.add_option_with(OptionTag::Swap, resource_args(swappable));
        choice.add_option(OptionTag::Trade);
        choice.add_option(OptionTag::End);
        choice
    }

    fn turn_win(&mut self) -> Result<(), GameError> {
        let actor = self.state.actor;
        self.state.winner = Some(actor);
        info!(
            player = actor,
            round = self.state.round,
            points = self.state.compute_points(actor),
            "winner"
        );
        Ok(())
    }

    fn turn_road(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let edge = self.required(argument, Argument::as_edge)?;
        let actor = self.state.actor;
        self.state.players[actor].roads.insert(edge);
        self.state.add_delta(actor, &COST_ROAD.negated());
        self.state.update_road_length(actor);
        self.continue_turn(actor)
    }

    fn turn_camp(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let node = self.required(argument, Argument::as_node)?;
        let actor = self.state.actor;
        self.state.players[actor].camps.insert(node);
        self.state.add_delta(actor, &COST_CAMP.negated());
        self.continue_turn(actor)
    }

    fn turn_fort(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let node = self.required(argument, Argument::as_node)?;
        let actor = self.state.actor;
        let player = &mut self.state.players[actor];
        player.camps.remove(&node);
        player.forts.insert(node);
        self.state.add_delta(actor, &COST_FORT.negated());
        self.continue_turn(actor)
    }

    fn turn_card(&mut self) -> Result<(), GameError> {
        let actor = self.state.actor;
        let Some(card) = self.state.stack.pop() else {
            return Err(ValidationError::IllegalOption {
                action: ActionTag::Turn,
                option: OptionTag::Card,
            }
            .into());
        };
        let player = &mut self.state.players[actor];
        if card.is_victory() {
            player.cards.push(card);
        } else {
            player.draws.push(card);
        }
        self.state.add_delta(actor, &COST_CARD.negated());
        self.continue_turn(actor)
    }

    fn turn_play(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let card = self.required(argument, Argument::as_card)?;
        let actor = self.state.actor;
        let choice = match card {
            DevelopmentCard::Knight => {
                self.state.increment_army_size(actor);
                self.robber_choice()
            }
            DevelopmentCard::RoadBuilding => self.roads_choice(1),
            DevelopmentCard::Monopoly => Choice::new(Prompt::Monopoly)
                .with_args(OptionTag::Res, resource_args(Resource::ALL)),
            DevelopmentCard::YearOfPlenty => Choice::new(Prompt::Plenty { num: 1 })
                .with_args(OptionTag::Res, resource_args(Resource::ALL)),
            other => return Err(GameError::IllegalCard(other)),
        };
        self.state.players[actor].discard_card(card);
        if choice.is_empty() {
            return self.continue_turn(actor);
        }
        self.set_choice(actor, choice);
        Ok(())
    }

    fn turn_swap(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let give = self.required(argument, Argument::as_resource)?;
        let wanted = Resource::ALL.into_iter().filter(|resource| *resource != give);
        let choice = Choice::new(Prompt::Swap { give })
            .with_args(OptionTag::Res, resource_args(wanted))
            .with_option(OptionTag::Cancel);
        self.set_choice(self.state.actor, choice);
        Ok(())
    }

    fn swap_res(&mut self, give: Resource, argument: Option<Argument>) -> Result<(), GameError> {
        let take = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        let rate = self.state.swap_rate(actor, give);
        let mut delta = ResourceBundle::single(give, -rate);
        delta.add(take, 1);
        self.state.add_delta(actor, &delta);
        self.continue_turn(actor)
    }

    fn turn_end(&mut self) -> Result<(), GameError> {
        let current = self.state.current;
        self.state.players[current].unlock_cards();
        self.state.current = (current + 1) % self.state.num_players();
        if self.state.current == 0 {
            self.state.round += 1;
        }
        self.start_next_turn()
    }

    // Trading between players

    fn turn_trade(&mut self) -> Result<(), GameError> {
        let actor = self.state.actor;
        let choice = Choice::new(Prompt::Partner)
            .with_args(OptionTag::Player, others(&self.state, actor))
            .with_option(OptionTag::Cancel);
        self.set_choice(actor, choice);
        Ok(())
    }

    fn partner_player(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let partner = self.required(argument, Argument::as_player)?;
        let choice = Choice::new(Prompt::Request { partner })
            .with_args(OptionTag::Res, resource_args(Resource::ALL))
            .with_option(OptionTag::Cancel);
        self.set_choice(self.state.actor, choice);
        Ok(())
    }

    fn request_res(&mut self, partner: usize, argument: Option<Argument>) -> Result<(), GameError> {
        let request = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        let held = self.state.hand(actor);
        let offers = held
            .iter()
            .filter(|(resource, amount)| *resource != request && *amount > 0)
            .map(|(resource, _)| resource);
        let choice = Choice::new(Prompt::Offer { partner, request })
            .with_args(OptionTag::Res, resource_args(offers))
            .with_option(OptionTag::Nothing)
            .with_option(OptionTag::Cancel);
        self.set_choice(actor, choice);
        Ok(())
    }

    fn offer_nothing(&mut self, partner: usize, request: Resource) -> Result<(), GameError> {
        let requester = self.state.actor;
        let mut choice = Choice::new(Prompt::Donate { requester, request });
        if self.state.hand(partner).get(request) > 0 {
            choice.add_option(OptionTag::Grant);
        }
        choice.add_option(OptionTag::Decline);
        self.set_choice(partner, choice);
        Ok(())
    }

    fn offer_res(
        &mut self,
        partner: usize,
        request: Resource,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        let offer = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        let held = self.state.hand(actor).get(offer).max(0) as u32;
        let choice = Choice::new(Prompt::Quote {
            partner,
            request,
            offer,
        })
        .with_args(OptionTag::Amount, (1..=held).map(Argument::Amount).collect())
        .with_option(OptionTag::Cancel);
        self.set_choice(actor, choice);
        Ok(())
    }

    fn quote_amount(
        &mut self,
        partner: usize,
        request: Resource,
        offer: Resource,
        argument: Option<Argument>,
    ) -> Result<(), GameError> {
        let amount = self.required(argument, Argument::as_amount)?;
        let requester = self.state.actor;
        let mut choice = Choice::new(Prompt::Trade {
            requester,
            request,
            offer,
            amount,
        });
        if self.state.hand(partner).get(request) > 0 {
            choice.add_option(OptionTag::Accept);
        }
        choice.add_option(OptionTag::Decline);
        self.set_choice(partner, choice);
        Ok(())
    }

    fn trade_accept(
        &mut self,
        requester: usize,
        request: Resource,
        offer: Resource,
        amount: u32,
    ) -> Result<(), GameError> {
        let partner = self.state.actor;
        let amount = amount as i32;

        let mut given = ResourceBundle::single(request, -1);
        given.add(offer, amount);
        self.state.add_delta(partner, &given);
        self.state.add_delta(requester, &given.negated());
        self.continue_turn(requester)
    }

    fn donate_grant(&mut self, requester: usize, request: Resource) -> Result<(), GameError> {
        let partner = self.state.actor;
        self.state
            .add_delta(partner, &ResourceBundle::single(request, -1));
        self.state
            .add_delta(requester, &ResourceBundle::single(request, 1));
        self.continue_turn(requester)
    }

    // Card effects

    fn roads_choice(&self, num: u8) -> Choice {
        let edges = self.state.road_options(self.state.actor);
        Choice::new(Prompt::Roads { num })
            .with_args(OptionTag::Road, edges.into_iter().map(Argument::Edge).collect())
    }

    fn roads_road(&mut self, num: u8, argument: Option<Argument>) -> Result<(), GameError> {
        let edge = self.required(argument, Argument::as_edge)?;
        let actor = self.state.actor;
        self.state.players[actor].roads.insert(edge);
        self.state.update_road_length(actor);
        if num == 1 {
            let choice = self.roads_choice(2);
            if !choice.is_empty() {
                self.set_choice(actor, choice);
                return Ok(());
            }
        }
        self.continue_turn(actor)
    }

    fn monopoly_res(&mut self, argument: Option<Argument>) -> Result<(), GameError> {
        let resource = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        let mut taken = 0;
        for index in 0..self.state.num_players() {
            if index == actor {
                continue;
            }
            let count = self.state.hand(index).get(resource);
            if count > 0 {
                self.state
                    .add_delta(index, &ResourceBundle::single(resource, -count));
                taken += count;
            }
        }
        if taken > 0 {
            self.state
                .add_delta(actor, &ResourceBundle::single(resource, taken));
        }
        self.continue_turn(actor)
    }

    fn plenty_res(&mut self, num: u8, argument: Option<Argument>) -> Result<(), GameError> {
        let resource = self.required(argument, Argument::as_resource)?;
        let actor = self.state.actor;
        self.state
            .add_delta(actor, &ResourceBundle::single(resource, 1));
        if num == 1 {
            let choice = Choice::new(Prompt::Plenty { num: 2 })
                .with_args(OptionTag::Res, resource_args(Resource::ALL));
            self.set_choice(actor, choice);
            return Ok(());
        }
        self.continue_turn(actor)
    }
}
