use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIter, IntoEnumIterator};

use crate::coords::{CubeCoord, Direction};
use crate::types::Resource;

pub mod paths;

pub use paths::{max_road_length, shortest_paths};

pub type NodeId = u16;
pub type EdgeId = (NodeId, NodeId);
pub type TileId = u16;

pub const TILE_COUNT: usize = 19;
pub const NODE_COUNT: usize = 54;
pub const EDGE_COUNT: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum NodeRef {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum EdgeRef {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

impl EdgeRef {
    pub const ALL: [EdgeRef; 6] = [
        EdgeRef::East,
        EdgeRef::SouthEast,
        EdgeRef::SouthWest,
        EdgeRef::West,
        EdgeRef::NorthWest,
        EdgeRef::NorthEast,
    ];
}

#[derive(Debug, Clone)]
pub struct TileSlot {
    pub id: TileId,
    pub coord: CubeCoord,
    pub nodes: [NodeId; 6],
    pub edges: [EdgeId; 6],
}

#[derive(Debug, Clone)]
pub struct Harbor {
    /// `None` for a generic 3:1 harbor.
    pub resource: Option<Resource>,
    pub nodes: [NodeId; 2],
}

/// The fixed board graph. Built once per process and shared by every game.
#[derive(Debug, Clone)]
pub struct Topology {
    tiles: Vec<TileSlot>,
    edges: Vec<EdgeId>,
    node_edges: Vec<SmallVec<[EdgeId; 3]>>,
    node_tiles: Vec<SmallVec<[TileId; 3]>>,
    harbors: Vec<Harbor>,
}

impl Topology {
    pub fn base() -> &'static Topology {
        &BASE_TOPOLOGY
    }

    fn build(land: &[CubeCoord], ports: &[(CubeCoord, Direction, Option<Resource>)]) -> Self {
        let mut placed: HashMap<CubeCoord, usize> = HashMap::new();
        let mut tiles: Vec<TileSlot> = Vec::with_capacity(land.len());
        let mut next_node: NodeId = 0;

        for (index, coord) in land.iter().enumerate() {
            let mut corners: [Option<NodeId>; 6] = [None; 6];
            for direction in Direction::iter() {
                let Some(&neighbor) = placed.get(&coord.neighbor(direction)) else {
                    continue;
                };
                for (own, theirs) in shared_corners(direction) {
                    corners[own as usize] = Some(tiles[neighbor].nodes[theirs as usize]);
                }
            }
            let nodes = corners.map(|corner| {
                corner.unwrap_or_else(|| {
                    let id = next_node;
                    next_node += 1;
                    id
                })
            });
            let edges = EdgeRef::ALL.map(|edge_ref| {
                let (a, b) = edge_corners(edge_ref);
                normalize_edge((nodes[a as usize], nodes[b as usize]))
            });

            placed.insert(*coord, index);
            tiles.push(TileSlot {
                id: index as TileId,
                coord: *coord,
                nodes,
                edges,
            });
        }

        let node_count = next_node as usize;
        let edges: Vec<EdgeId> = tiles
            .iter()
            .flat_map(|tile| tile.edges)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut node_edges: Vec<SmallVec<[EdgeId; 3]>> = vec![SmallVec::new(); node_count];
        for edge in &edges {
            node_edges[edge.0 as usize].push(*edge);
            node_edges[edge.1 as usize].push(*edge);
        }

        let mut node_tiles: Vec<SmallVec<[TileId; 3]>> = vec![SmallVec::new(); node_count];
        for tile in &tiles {
            for node in tile.nodes {
                node_tiles[node as usize].push(tile.id);
            }
        }

        let harbors = ports
            .iter()
            .filter_map(|(coord, direction, resource)| {
                let land_index = *placed.get(&coord.neighbor(*direction))?;
                let land_tile = &tiles[land_index];
                let [(_, a), (_, b)] = shared_corners(*direction);
                Some(Harbor {
                    resource: *resource,
                    nodes: [land_tile.nodes[a as usize], land_tile.nodes[b as usize]],
                })
            })
            .collect();

        Self {
            tiles,
            edges,
            node_edges,
            node_tiles,
            harbors,
        }
    }

    pub fn tiles(&self) -> &[TileSlot] {
        &self.tiles
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|tile| tile.id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.node_edges.len() as NodeId
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn tile_nodes(&self, tile: TileId) -> &[NodeId] {
        self.tiles
            .get(tile as usize)
            .map(|slot| slot.nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_edges(&self, node: NodeId) -> &[EdgeId] {
        self.node_edges
            .get(node as usize)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_tiles(&self, node: NodeId) -> &[TileId] {
        self.node_tiles
            .get(node as usize)
            .map(|tiles| tiles.as_slice())
            .unwrap_or(&[])
    }

    /// Each `(edge, node)` pair reachable from `node` in one step.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.node_edges(node)
            .iter()
            .map(move |edge| (*edge, other_end(*edge, node)))
    }

    /// For both ends of `edge`, the other edges incident to that end.
    pub fn connections(&self, edge: EdgeId) -> [(NodeId, SmallVec<[EdgeId; 2]>); 2] {
        let edge = normalize_edge(edge);
        [edge.0, edge.1].map(|node| {
            let others = self
                .node_edges(node)
                .iter()
                .copied()
                .filter(|other| *other != edge)
                .collect();
            (node, others)
        })
    }

    pub fn harbors(&self) -> &[Harbor] {
        &self.harbors
    }

    pub fn is_generic_harbor(&self, node: NodeId) -> bool {
        self.harbors
            .iter()
            .any(|harbor| harbor.resource.is_none() && harbor.nodes.contains(&node))
    }

    pub fn is_specific_harbor(&self, node: NodeId, resource: Resource) -> bool {
        self.harbors
            .iter()
            .any(|harbor| harbor.resource == Some(resource) && harbor.nodes.contains(&node))
    }

    pub fn is_harbor(&self, node: NodeId) -> bool {
        self.harbors.iter().any(|harbor| harbor.nodes.contains(&node))
    }
}

pub fn normalize_edge(edge: EdgeId) -> EdgeId {
    if edge.0 <= edge.1 {
        edge
    } else {
        (edge.1, edge.0)
    }
}

pub fn other_end(edge: EdgeId, node: NodeId) -> NodeId {
    if edge.0 == node { edge.1 } else { edge.0 }
}

/// Corners this tile shares with its neighbor in `direction`, as
/// `(own corner, neighbor's corner)`.
fn shared_corners(direction: Direction) -> [(NodeRef, NodeRef); 2] {
    use NodeRef::*;
    match direction {
        Direction::East => [(NorthEast, NorthWest), (SouthEast, SouthWest)],
        Direction::SouthEast => [(South, NorthWest), (SouthEast, North)],
        Direction::SouthWest => [(South, NorthEast), (SouthWest, North)],
        Direction::West => [(NorthWest, NorthEast), (SouthWest, SouthEast)],
        Direction::NorthWest => [(North, SouthEast), (NorthWest, South)],
        Direction::NorthEast => [(North, SouthWest), (NorthEast, South)],
    }
}

fn edge_corners(edge_ref: EdgeRef) -> (NodeRef, NodeRef) {
    match edge_ref {
        EdgeRef::East => (NodeRef::NorthEast, NodeRef::SouthEast),
        EdgeRef::SouthEast => (NodeRef::SouthEast, NodeRef::South),
        EdgeRef::SouthWest => (NodeRef::South, NodeRef::SouthWest),
        EdgeRef::West => (NodeRef::SouthWest, NodeRef::NorthWest),
        EdgeRef::NorthWest => (NodeRef::NorthWest, NodeRef::North),
        EdgeRef::NorthEast => (NodeRef::North, NodeRef::NorthEast),
    }
}

static BASE_TOPOLOGY: Lazy<Topology> = Lazy::new(|| Topology::build(&BASE_LAND, &BASE_PORTS));

/// Centre, inner ring, outer ring. Tile ids follow this order.
const BASE_LAND: [CubeCoord; TILE_COUNT] = [
    CubeCoord::new(0, 0, 0),
    CubeCoord::new(1, -1, 0),
    CubeCoord::new(0, -1, 1),
    CubeCoord::new(-1, 0, 1),
    CubeCoord::new(-1, 1, 0),
    CubeCoord::new(0, 1, -1),
    CubeCoord::new(1, 0, -1),
    CubeCoord::new(2, -2, 0),
    CubeCoord::new(1, -2, 1),
    CubeCoord::new(0, -2, 2),
    CubeCoord::new(-1, -1, 2),
    CubeCoord::new(-2, 0, 2),
    CubeCoord::new(-2, 1, 1),
    CubeCoord::new(-2, 2, 0),
    CubeCoord::new(-1, 2, -1),
    CubeCoord::new(0, 2, -2),
    CubeCoord::new(1, 1, -2),
    CubeCoord::new(2, 0, -2),
    CubeCoord::new(2, -1, -1),
];

/// Water tiles carrying a harbor, the direction facing land, and the traded
/// resource.
const BASE_PORTS: [(CubeCoord, Direction, Option<Resource>); 9] = [
    (CubeCoord::new(3, -3, 0), Direction::West, None),
    (CubeCoord::new(1, -3, 2), Direction::NorthWest, Some(Resource::Sheep)),
    (CubeCoord::new(-1, -2, 3), Direction::NorthWest, None),
    (CubeCoord::new(-3, 0, 3), Direction::NorthEast, Some(Resource::Ore)),
    (CubeCoord::new(-3, 2, 1), Direction::East, Some(Resource::Wheat)),
    (CubeCoord::new(-2, 3, -1), Direction::East, None),
    (CubeCoord::new(0, 3, -3), Direction::SouthEast, Some(Resource::Wood)),
    (CubeCoord::new(2, 1, -3), Direction::SouthWest, Some(Resource::Brick)),
    (CubeCoord::new(3, -1, -2), Direction::SouthWest, None),
];

/// Outer ring, inner ring, centre: the order number tokens are dealt in.
const SPIRAL: [TileId; TILE_COUNT] =
    [7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 1, 2, 3, 4, 5, 6, 0];

const BEGINNER_RESOURCES: [Option<Resource>; TILE_COUNT] = {
    use Resource::*;
    [
        Some(Ore),
        Some(Sheep),
        Some(Wood),
        Some(Brick),
        Some(Ore),
        Some(Sheep),
        Some(Sheep),
        Some(Wheat),
        Some(Brick),
        Some(Wood),
        Some(Wheat),
        Some(Wheat),
        Some(Brick),
        Some(Sheep),
        Some(Wood),
        Some(Wheat),
        Some(Ore),
        Some(Wood),
        None,
    ]
};

const BEGINNER_ROLLS: [u8; TILE_COUNT - 1] =
    [10, 2, 9, 10, 8, 5, 11, 6, 5, 8, 9, 12, 6, 4, 3, 4, 3, 11];

const DEALT_ROLLS: [u8; TILE_COUNT - 1] =
    [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapType {
    Beginner,
    Random,
}

impl Default for MapType {
    fn default() -> Self {
        MapType::Beginner
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MapType::Beginner => "BEGINNER",
            MapType::Random => "RANDOM",
        };
        write!(f, "{label}")
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(MapType::Beginner),
            "random" => Ok(MapType::Random),
            _ => Err(format!("unknown map type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileYield {
    pub resource: Option<Resource>,
    pub roll: Option<u8>,
}

/// What each tile produces and on which roll. Chosen per game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    tiles: Vec<TileYield>,
}

impl BoardLayout {
    pub fn build(map_type: MapType, rng: &mut impl rand::Rng) -> Self {
        match map_type {
            MapType::Beginner => Self::deal(BEGINNER_RESOURCES, &BEGINNER_ROLLS),
            MapType::Random => {
                let mut resources = BEGINNER_RESOURCES;
                resources.shuffle(rng);
                Self::deal(resources, &DEALT_ROLLS)
            }
        }
    }

    /// Lays `resources` along the spiral and deals `rolls` to every tile but
    /// the desert.
    fn deal(resources: [Option<Resource>; TILE_COUNT], rolls: &[u8]) -> Self {
        let mut tiles = vec![
            TileYield {
                resource: None,
                roll: None,
            };
            TILE_COUNT
        ];
        let mut rolls = rolls.iter().copied();
        for (position, tile_id) in SPIRAL.iter().enumerate() {
            let resource = resources[position];
            tiles[*tile_id as usize] = TileYield {
                resource,
                roll: resource.and_then(|_| rolls.next()),
            };
        }
        Self { tiles }
    }

    pub fn tile(&self, tile: TileId) -> TileYield {
        self.tiles.get(tile as usize).copied().unwrap_or(TileYield {
            resource: None,
            roll: None,
        })
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileId, TileYield)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(id, tile)| (id as TileId, *tile))
    }

    /// Resources produced by the tiles around `node`, one per tile.
    pub fn home_yields(&self, node: NodeId) -> Vec<Resource> {
        Topology::base()
            .node_tiles(node)
            .iter()
            .filter_map(|tile| self.tile(*tile).resource)
            .collect()
    }

    pub fn desert(&self) -> TileId {
        self.tiles
            .iter()
            .position(|tile| tile.resource.is_none())
            .unwrap_or(0) as TileId
    }
}
