
mod engine;
mod path;

pub use engine::{distance_map, shortest_path};

use crate::collections::FxIndexMap;

/// Type alias for the record map built while searching
/// N: Node - a state in the search space
/// C: Cost of reaching the node from the start
/// The tuple contains (parent_index, cost) where:
/// - parent_index is the index of the parent node in the map
/// - cost is the cheapest known total to reach this node from the start
/// The start node carries parent_index usize::MAX to mark that it has no parent
pub type SearchRecords<N, C> = FxIndexMap<N, (usize, C)>;
