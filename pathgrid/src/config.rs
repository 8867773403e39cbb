use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::grid::{GridMap, Point};

/// A board description that can be stored as JSON.
///
/// `map` names a text grid file and `layout` holds the same format inline;
/// either one defines the size and cells, and the explicit `start`, `end`
/// and `barriers` are applied on top. Unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)] // missing fields fall back to the reference 50x50 board
pub struct Scenario {
    pub rows: usize,
    pub width: usize,
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub barriers: Vec<Point>,
    pub map: Option<PathBuf>,
    pub layout: Option<String>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            rows: 50,
            width: 800,
            start: None,
            end: None,
            barriers: Vec::new(),
            map: None,
            layout: None,
        }
    }
}

impl Scenario {
    pub fn from_json(s: &str) -> Result<Self, anyhow::Error> {
        serde_json::from_str(s).context("Failed to parse scenario")
    }

    /// Reads a JSON scenario. A relative `map` is resolved against the
    /// directory of the JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut scenario =
            Self::from_json(&text).with_context(|| format!("In {}", path.display()))?;

        if let (Some(map), Some(dir)) = (&scenario.map, path.parent()) {
            if map.is_relative() {
                scenario.map = Some(dir.join(map));
            }
        }

        Ok(scenario)
    }

    pub fn into_board(self) -> Result<Board, anyhow::Error> {
        let layout = match (&self.map, self.layout) {
            (Some(_), Some(_)) => bail!("Scenario sets both `map` and `layout`"),
            (Some(map), None) => Some(
                std::fs::read_to_string(map)
                    .with_context(|| format!("Failed to read map {}", map.display()))?,
            ),
            (None, layout) => layout,
        };

        let grid = match &layout {
            Some(layout) => {
                let mut grid: GridMap = layout.parse().context("Invalid layout")?;
                grid.cell_size = self.width / grid.columns.max(1);
                grid
            }
            None => {
                if self.rows == 0 {
                    bail!("Scenario needs at least one row");
                }
                GridMap::new(self.rows, self.width)
            }
        };

        let mut board = Board::from_grid(grid);

        if let Some(start) = self.start {
            if !board.set_start(start) {
                bail!("Start {} is outside the grid or on the end cell", start);
            }
        }
        if let Some(end) = self.end {
            if !board.set_end(end) {
                bail!("End {} is outside the grid or on the start cell", end);
            }
        }
        for barrier in self.barriers {
            if !board.grid().contains(barrier) {
                bail!("Barrier {} is outside the grid", barrier);
            }
            if !board.set_barrier(barrier) {
                warn!("Ignoring barrier on {}, the cell holds the start or end", barrier);
            }
        }

        Ok(board)
    }
}
