use crate::find::{MapStorage, MapTrait, NodeReference};
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// What a cell stands for in the current scenario, independent of the search
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    Start,
    End,
}

/// Search residue written by the path finder, purely observational for callers
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum CellStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
    Path,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub passable: bool,
    pub role: Role,
    pub status: CellStatus,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            passable: true,
            role: Role::None,
            status: CellStatus::Unvisited,
        }
    }
}

impl Cell {
    pub fn barrier() -> Self {
        Self {
            passable: false,
            ..Default::default()
        }
    }

    pub fn is_barrier(&self) -> bool {
        !self.passable
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match (self.passable, self.role, self.status) {
                (false, _, _) => "X",
                (_, Role::Start, _) => "S",
                (_, Role::End, _) => "E",
                (_, Role::None, CellStatus::Path) => "*",
                (_, Role::None, CellStatus::Open) => "o",
                (_, Role::None, CellStatus::Closed) => ".",
                (_, Role::None, CellStatus::Unvisited) => " ",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `row,col`
impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid point: {}", s))?;
        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

impl NodeReference for Point {}

/// Manhattan distance, admissible and consistent for 4-directional unit steps
pub fn manhattan(a: Point, b: Point) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// A MapTrait implementation that uses a rectangular grid of cells
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GridMapData")]
pub struct GridMap {
    pub rows: usize,
    pub columns: usize,
    /// Display size of one cell, only used to map pixels back to cells
    pub cell_size: usize,
    cells: Vec<Cell>,
}

/// Unchecked serialized form of a [`GridMap`]
#[derive(Deserialize)]
struct GridMapData {
    rows: usize,
    columns: usize,
    cell_size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridMapData> for GridMap {
    type Error = anyhow::Error;

    fn try_from(data: GridMapData) -> Result<Self, Self::Error> {
        let expected = data
            .rows
            .checked_mul(data.columns)
            .ok_or_else(|| anyhow::anyhow!("Grid {}x{} is too large", data.rows, data.columns))?;
        if data.cells.len() != expected {
            anyhow::bail!(
                "Grid {}x{} needs {} cells, got {}",
                data.rows,
                data.columns,
                expected,
                data.cells.len()
            );
        }
        for role in [Role::Start, Role::End] {
            if data.cells.iter().filter(|c| c.role == role).count() > 1 {
                anyhow::bail!("Grid has more than one {:?} cell", role);
            }
        }

        Ok(Self {
            rows: data.rows,
            columns: data.columns,
            cell_size: data.cell_size,
            cells: data.cells,
        })
    }
}

impl GridMap {
    /// Square `rows x rows` grid drawn into a `width` wide area
    pub fn new(rows: usize, width: usize) -> Self {
        Self::with_size(rows, rows, width / rows.max(1))
    }

    pub fn with_size(rows: usize, columns: usize, cell_size: usize) -> Self {
        Self {
            rows,
            columns,
            cell_size,
            cells: vec![Cell::default(); rows * columns],
        }
    }

    fn index(&self, point: Point) -> usize {
        point.row * self.columns + point.col
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub fn get(&self, point: Point) -> &Cell {
        &self.cells[self.index(point)]
    }

    pub fn get_mut(&mut self, point: Point) -> &mut Cell {
        let idx = self.index(point);
        &mut self.cells[idx]
    }

    pub fn status(&self, point: Point) -> CellStatus {
        self.get(point).status
    }

    /// Marks the cell as a barrier. Cells holding the start or end role are
    /// left untouched and `false` is returned.
    pub fn set_barrier(&mut self, point: Point) -> bool {
        let cell = self.get_mut(point);
        if cell.role != Role::None {
            return false;
        }
        *cell = Cell::barrier();
        true
    }

    /// Back to a plain passable cell
    pub fn clear(&mut self, point: Point) {
        *self.get_mut(point) = Cell::default();
    }

    pub fn set_role(&mut self, point: Point, role: Role) {
        let cell = self.get_mut(point);
        cell.role = role;
        cell.passable = true;
    }

    pub fn reset_status(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.status = CellStatus::Unvisited;
        }
    }

    /// First cell (row-major) carrying the given role
    pub fn find_role(&self, role: Role) -> Option<Point> {
        self.cells
            .iter()
            .position(|c| c.role == role)
            .map(|idx| Point {
                row: idx / self.columns,
                col: idx % self.columns,
            })
    }

    /// Maps a pixel position inside the drawing area to the cell under it.
    ///
    /// `x` is the horizontal offset and selects the column, `y` is the
    /// vertical offset and selects the row, both divided by `cell_size`.
    /// Returns `None` outside the grid.
    pub fn point_at(&self, x: usize, y: usize) -> Option<Point> {
        if self.cell_size == 0 {
            return None;
        }
        let point = Point {
            row: y / self.cell_size,
            col: x / self.cell_size,
        };
        self.contains(point).then_some(point)
    }

    /// Returns the passable orthogonal neighbors in the order up, down, left, right
    pub fn neighbors_four(&self, point: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);

        if point.row > 0 {
            points.push(Point {
                row: point.row - 1,
                col: point.col,
            });
        }
        if point.row + 1 < self.rows {
            points.push(Point {
                row: point.row + 1,
                col: point.col,
            });
        }
        if point.col > 0 {
            points.push(Point {
                row: point.row,
                col: point.col - 1,
            });
        }
        if point.col + 1 < self.columns {
            points.push(Point {
                row: point.row,
                col: point.col + 1,
            });
        }

        // filter to only keep passable cells
        points.retain(|p| self.get(*p).passable);

        points.into_iter()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Point { row, col }))
    }

    pub fn cells(&self) -> impl Iterator<Item = (Point, &Cell)> {
        self.points().zip(self.cells.iter())
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the text layout: `#` or `X` for barriers, `S` and `E` for the
/// endpoints, `.` or space for open cells. Every line is one row.
impl FromStr for GridMap {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();

        let rows = lines.len();
        let columns = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(anyhow::anyhow!("Empty grid"));
        }

        let mut map = GridMap::with_size(rows, columns, 1);

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                return Err(anyhow::anyhow!(
                    "Row {} has {} columns, expected {}",
                    row,
                    line.chars().count(),
                    columns
                ));
            }
            for (col, c) in line.chars().enumerate() {
                let point = Point { row, col };
                match c {
                    '#' | 'X' => {
                        map.set_barrier(point);
                    }
                    'S' | 'E' => {
                        let role = if c == 'S' { Role::Start } else { Role::End };
                        if let Some(other) = map.find_role(role) {
                            return Err(anyhow::anyhow!(
                                "Duplicate {:?} at {} (already at {})",
                                role,
                                point,
                                other
                            ));
                        }
                        map.set_role(point, role);
                    }
                    '.' | ' ' => {}
                    _ => return Err(anyhow::anyhow!("Invalid cell '{}' at {}", c, point)),
                }
            }
        }

        Ok(map)
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        self.contains(node)
    }

    fn is_passable(&self, node: Self::Reference) -> bool {
        self.get(node).passable
    }

    fn nodes(&self) -> impl Iterator<Item = Self::Reference> {
        self.points()
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        self.neighbors_four(node)
    }

    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize {
        manhattan(from, to)
    }

    fn set_status(&mut self, node: Self::Reference, status: CellStatus) {
        self.get_mut(node).status = status;
    }

    fn reset_status(&mut self) {
        GridMap::reset_status(self);
    }

    fn create_storage<T: Clone + 'static>(&self, default_value: T) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![default_value; self.rows * self.columns],
        }
    }
}

/// A MapStorage that keeps one value per cell in a single row-major vec
#[derive(Clone, Debug)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Clone + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.col < self.columns && node.row * self.columns + node.col < self.values.len()
    }

    fn get(&self, node: Self::Reference) -> &T {
        &self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.columns.max(1)) {
            for value in row {
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
