//! Shortest paths across raster images.
//!
//! The crate splits into three layers:
//!
//! - [`search`] holds a generic uniform-cost search engine over any hashable
//!   node type, driven by a caller-supplied successor function and target
//!   predicate. Predicates may accept several nodes; the cheapest one wins.
//! - [`grid`] and [`raster`] apply the engine to pixels: color-classified
//!   occupancy grids, move sets with scaled Euclidean step costs, and
//!   image-to-image route tracing.
//! - [`geometry`] measures distances along polylines for route annotation.
//!
//! # Example
//!
//! ```
//! use rasterpath::{shortest_path, Cell, GridMap, MoveSet};
//!
//! let mut grid = GridMap::new(3, 3);
//! grid.block(Cell::new(1, 1));
//!
//! let moves = MoveSet::orthogonal();
//! let end = Cell::new(2, 2);
//! let (path, cost) =
//!     shortest_path(Cell::new(0, 0), grid.successors(&moves), |c| *c == end).unwrap();
//!
//! assert_eq!(path.len(), 4); // the start cell stays out of the path
//! assert_eq!(path.last(), Some(&end));
//! assert_eq!(cost, 400); // four unit steps at 100 each
//! ```

mod collections;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod raster;
pub mod search;

pub use errors::{GeometryError, RasterError};
pub use grid::{Cell, GridMap, Move, MoveSet, COST_SCALE};
pub use search::{distance_map, shortest_path, SearchRecords};
