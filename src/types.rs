use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Resource {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Sheep,
        Resource::Wheat,
        Resource::Ore,
    ];

    pub const fn index(self) -> usize {
        match self {
            Resource::Wood => 0,
            Resource::Brick => 1,
            Resource::Sheep => 2,
            Resource::Wheat => 3,
            Resource::Ore => 4,
        }
    }
}

/// Development cards. The five victory cards score a point each and are never
/// played; the rest unlock the turn after they are bought.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "title_case")]
pub enum DevelopmentCard {
    Knight,
    RoadBuilding,
    Monopoly,
    YearOfPlenty,
    Library,
    Market,
    GreatHall,
    Chapel,
    University,
}

impl DevelopmentCard {
    pub const VICTORY: [DevelopmentCard; 5] = [
        DevelopmentCard::Library,
        DevelopmentCard::Market,
        DevelopmentCard::GreatHall,
        DevelopmentCard::Chapel,
        DevelopmentCard::University,
    ];

    pub fn is_victory(self) -> bool {
        Self::VICTORY.contains(&self)
    }
}

/// Names the prompt a pending choice belongs to. `Game` and `Roll` only ever
/// appear as snapshot metadata.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionTag {
    Game,
    Roll,
    Base1,
    Base2,
    Select,
    Drop,
    Move,
    Rob,
    Turn,
    Swap,
    Partner,
    Request,
    Offer,
    Quote,
    Trade,
    Donate,
    Monopoly,
    Roads,
    Plenty,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OptionTag {
    Start,
    Yield,
    Camp,
    Road,
    Fort,
    Res,
    Commit,
    Reset,
    Robber,
    Player,
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    Nobody,
    Win,
    Card,
    Play,
    Swap,
    Trade,
    End,
    Cancel,
    Nothing,
    Amount,
    Accept,
    Decline,
    Grant,
}
