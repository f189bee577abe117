use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, NodeId, TileId};
use crate::game::state::ValidationError;
use crate::types::{ActionTag, DevelopmentCard, OptionTag, Resource};

/// A value supplied with an option. Each option accepts exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    Node(NodeId),
    Edge(EdgeId),
    Tile(TileId),
    Resource(Resource),
    Player(usize),
    Amount(u32),
    Card(DevelopmentCard),
}

impl Argument {
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Argument::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            Argument::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    pub fn as_tile(self) -> Option<TileId> {
        match self {
            Argument::Tile(tile) => Some(tile),
            _ => None,
        }
    }

    pub fn as_resource(self) -> Option<Resource> {
        match self {
            Argument::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_player(self) -> Option<usize> {
        match self {
            Argument::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_amount(self) -> Option<u32> {
        match self {
            Argument::Amount(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn as_card(self) -> Option<DevelopmentCard> {
        match self {
            Argument::Card(card) => Some(card),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Node(node) => write!(f, "node {node}"),
            Argument::Edge((a, b)) => write!(f, "edge {a}-{b}"),
            Argument::Tile(tile) => write!(f, "tile {tile}"),
            Argument::Resource(resource) => write!(f, "{resource}"),
            Argument::Player(player) => write!(f, "player {player}"),
            Argument::Amount(amount) => write!(f, "{amount}"),
            Argument::Card(card) => write!(f, "{card}"),
        }
    }
}

/// The prompt a choice answers, with the parameters fixed when it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// First setup round. `anchor` is the camp just placed, once there is one.
    Base1 { anchor: Option<NodeId> },
    /// Second setup round, in reverse seating order.
    Base2 { anchor: Option<NodeId> },
    Select {
        dropped: u32,
        drop_count: u32,
        drops: Vec<Resource>,
    },
    Drop {
        drop_count: u32,
        drops: Vec<Resource>,
    },
    Move,
    Rob,
    Turn,
    Swap { give: Resource },
    Partner,
    Request { partner: usize },
    Offer { partner: usize, request: Resource },
    Quote {
        partner: usize,
        request: Resource,
        offer: Resource,
    },
    Trade {
        requester: usize,
        request: Resource,
        offer: Resource,
        amount: u32,
    },
    Donate { requester: usize, request: Resource },
    Monopoly,
    Roads { num: u8 },
    Plenty { num: u8 },
}

impl Prompt {
    pub fn tag(&self) -> ActionTag {
        match self {
            Prompt::Base1 { .. } => ActionTag::Base1,
            Prompt::Base2 { .. } => ActionTag::Base2,
            Prompt::Select { .. } => ActionTag::Select,
            Prompt::Drop { .. } => ActionTag::Drop,
            Prompt::Move => ActionTag::Move,
            Prompt::Rob => ActionTag::Rob,
            Prompt::Turn => ActionTag::Turn,
            Prompt::Swap { .. } => ActionTag::Swap,
            Prompt::Partner => ActionTag::Partner,
            Prompt::Request { .. } => ActionTag::Request,
            Prompt::Offer { .. } => ActionTag::Offer,
            Prompt::Quote { .. } => ActionTag::Quote,
            Prompt::Trade { .. } => ActionTag::Trade,
            Prompt::Donate { .. } => ActionTag::Donate,
            Prompt::Monopoly => ActionTag::Monopoly,
            Prompt::Roads { .. } => ActionTag::Roads,
            Prompt::Plenty { .. } => ActionTag::Plenty,
        }
    }

    /// The fixed parameters in the order they were captured.
    pub fn params(&self) -> Vec<Argument> {
        use Argument as A;
        match self {
            Prompt::Base1 { anchor } | Prompt::Base2 { anchor } => {
                anchor.iter().map(|node| A::Node(*node)).collect()
            }
            Prompt::Select {
                dropped,
                drop_count,
                drops,
            } => [A::Amount(*dropped), A::Amount(*drop_count)]
                .into_iter()
                .chain(drops.iter().map(|r| A::Resource(*r)))
                .collect(),
            Prompt::Drop { drop_count, drops } => std::iter::once(A::Amount(*drop_count))
                .chain(drops.iter().map(|r| A::Resource(*r)))
                .collect(),
            Prompt::Move | Prompt::Rob | Prompt::Turn | Prompt::Partner | Prompt::Monopoly => {
                Vec::new()
            }
            Prompt::Swap { give } => vec![A::Resource(*give)],
            Prompt::Request { partner } => vec![A::Player(*partner)],
            Prompt::Offer { partner, request } => vec![A::Player(*partner), A::Resource(*request)],
            Prompt::Quote {
                partner,
                request,
                offer,
            } => vec![
                A::Player(*partner),
                A::Resource(*request),
                A::Resource(*offer),
            ],
            Prompt::Trade {
                requester,
                request,
                offer,
                amount,
            } => vec![
                A::Player(*requester),
                A::Resource(*request),
                A::Resource(*offer),
                A::Amount(*amount),
            ],
            Prompt::Donate { requester, request } => {
                vec![A::Player(*requester), A::Resource(*request)]
            }
            Prompt::Roads { num } | Prompt::Plenty { num } => vec![A::Amount(u32::from(*num))],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub tag: OptionTag,
    /// Legal argument values; `None` means the option takes no argument.
    pub args: Option<Vec<Argument>>,
}

/// The single input a player is being asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub prompt: Prompt,
    options: Vec<ChoiceOption>,
}

impl Choice {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, tag: OptionTag) -> Self {
        self.add_option(tag);
        self
    }

    pub fn with_args(mut self, tag: OptionTag, args: Vec<Argument>) -> Self {
        self.add_option_with(tag, args);
        self
    }

    pub fn add_option(&mut self, tag: OptionTag) {
        self.options.push(ChoiceOption { tag, args: None });
    }

    /// Offers `tag` with `args` as its legal values. An empty list leaves the
    /// option out, since nothing could be chosen for it.
    pub fn add_option_with(&mut self, tag: OptionTag, args: Vec<Argument>) {
        if args.is_empty() {
            return;
        }
        self.options.push(ChoiceOption {
            tag,
            args: Some(args),
        });
    }

    pub fn action(&self) -> ActionTag {
        self.prompt.tag()
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn option_tags(&self) -> impl Iterator<Item = OptionTag> + '_ {
        self.options.iter().map(|option| option.tag)
    }

    pub fn has_option(&self, tag: OptionTag) -> bool {
        self.options.iter().any(|option| option.tag == tag)
    }

    pub fn args(&self, tag: OptionTag) -> Option<&[Argument]> {
        self.options
            .iter()
            .find(|option| option.tag == tag)
            .and_then(|option| option.args.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn validate(
        &self,
        option: OptionTag,
        argument: Option<Argument>,
    ) -> Result<(), ValidationError> {
        let action = self.action();
        let entry = self
            .options
            .iter()
            .find(|entry| entry.tag == option)
            .ok_or(ValidationError::IllegalOption { action, option })?;
        match (&entry.args, argument) {
            (None, None) => Ok(()),
            (None, Some(argument)) => Err(ValidationError::UnexpectedArgument {
                action,
                option,
                argument,
            }),
            (Some(_), None) => Err(ValidationError::MissingArgument { action, option }),
            (Some(args), Some(argument)) if args.contains(&argument) => Ok(()),
            (Some(_), Some(argument)) => Err(ValidationError::IllegalArgument {
                action,
                option,
                argument,
            }),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self
            .option_tags()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>()
            .join("|");
        write!(f, "{} [{options}]", self.action())
    }
}
