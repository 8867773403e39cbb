//! Shortest paths on a 2D grid with an A* search that publishes its progress
//! cell by cell, so a front end can draw open, closed and path cells while
//! the search runs.
//!
//! - [`grid`]: cells, barriers, neighbor lookup and the text grid format
//! - [`find`]: the step-wise [`PathFinder`] and the [`run`] entry point
//! - [`board`]: editor state (start, end, barriers) on top of a grid
//! - [`config`]: JSON scenarios
//! - [`util`]: loading barrier maps from images

pub mod board;
pub mod config;
pub mod find;
pub mod grid;
pub mod util;

pub use board::{Board, Edit};
pub use config::Scenario;
pub use find::{
    run, run_to_end, InvalidInput, MapStorage, MapTrait, NodeReference, PathFinder,
    PathFinderState, PathResult, SearchFailure, UNREACHABLE,
};
pub use grid::{manhattan, Cell, CellStatus, GridMap, Point, Role};
