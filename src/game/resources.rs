use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// Per-resource counter. Holds a player's hand or a signed adjustment to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    counts: [i32; Resource::ALL.len()],
}

impl ResourceBundle {
    pub const fn from_counts(counts: [i32; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn single(resource: Resource, amount: i32) -> Self {
        let mut bundle = Self::zero();
        bundle.add(resource, amount);
        bundle
    }

    pub fn total(&self) -> i32 {
        self.counts.iter().sum()
    }

    pub fn get(&self, resource: Resource) -> i32 {
        self.counts[resource.index()]
    }

    pub fn add(&mut self, resource: Resource, amount: i32) {
        self.counts[resource.index()] += amount;
    }

    pub fn add_bundle(&mut self, other: &ResourceBundle) {
        for (count, value) in self.counts.iter_mut().zip(other.counts) {
            *count += value;
        }
    }

    /// Adds `delta` only if no counter would go below zero.
    pub fn apply_delta(&mut self, delta: &ResourceBundle) -> Result<(), ResourceError> {
        for (resource, amount) in delta.iter() {
            let available = self.get(resource);
            if available + amount < 0 {
                return Err(ResourceError::InsufficientResource {
                    resource,
                    available,
                    requested: -amount,
                });
            }
        }
        self.add_bundle(delta);
        Ok(())
    }

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.counts
            .iter()
            .zip(cost.counts.iter())
            .all(|(have, need)| have >= need)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&value| value == 0)
    }

    pub fn is_non_negative(&self) -> bool {
        self.counts.iter().all(|&value| value >= 0)
    }

    pub fn negated(&self) -> Self {
        Self {
            counts: self.counts.map(|value| -value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, i32)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// One entry per card held, in resource order.
    pub fn cards(&self) -> Vec<Resource> {
        self.iter()
            .flat_map(|(resource, amount)| {
                std::iter::repeat(resource).take(amount.max(0) as usize)
            })
            .collect()
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for (resource, amount) in self.iter() {
            if amount != 0 {
                parts.push(format!("{amount}x{resource}"));
            }
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("insufficient {resource:?}: have {available}, need {requested}")]
    InsufficientResource {
        resource: Resource,
        available: i32,
        requested: i32,
    },
}

pub const COST_ROAD: ResourceBundle = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
pub const COST_CAMP: ResourceBundle = ResourceBundle::from_counts([1, 1, 1, 1, 0]);
pub const COST_FORT: ResourceBundle = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
pub const COST_CARD: ResourceBundle = ResourceBundle::from_counts([0, 0, 1, 1, 1]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_lookups() {
        let bundle = ResourceBundle::from_counts([1, 2, 0, 3, 0]);
        assert_eq!(bundle.total(), 6);
        assert_eq!(bundle.get(Resource::Wheat), 3);
        assert!(!bundle.is_empty());
        assert_eq!(bundle.to_string(), "1xWOOD, 2xBRICK, 3xWHEAT");
    }

    #[test]
    fn apply_delta_rejects_overdraw_without_mutating() {
        let mut hand = ResourceBundle::from_counts([1, 0, 0, 0, 0]);
        let delta = COST_ROAD.negated();
        let err = hand.apply_delta(&delta).unwrap_err();
        assert_eq!(
            err,
            ResourceError::InsufficientResource {
                resource: Resource::Brick,
                available: 0,
                requested: 1,
            }
        );
        assert_eq!(hand, ResourceBundle::from_counts([1, 0, 0, 0, 0]));
    }

    #[test]
    fn apply_delta_adds_elementwise() {
        let mut hand = ResourceBundle::from_counts([2, 2, 1, 1, 0]);
        hand.apply_delta(&COST_CAMP.negated()).unwrap();
        assert_eq!(hand, ResourceBundle::from_counts([1, 1, 0, 0, 0]));
    }

    #[test]
    fn can_afford_compares_every_resource() {
        let hand = ResourceBundle::from_counts([0, 0, 1, 2, 3]);
        assert!(hand.can_afford(&COST_FORT));
        assert!(hand.can_afford(&COST_CARD));
        assert!(!hand.can_afford(&COST_ROAD));
    }

    #[test]
    fn cards_expand_the_multiset() {
        let hand = ResourceBundle::from_counts([2, 0, 1, 0, 0]);
        assert_eq!(
            hand.cards(),
            vec![Resource::Wood, Resource::Wood, Resource::Sheep]
        );
    }
}
