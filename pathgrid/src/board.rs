use std::ops::ControlFlow;

use log::debug;

use crate::find::{run, InvalidInput, PathResult, SearchFailure};
use crate::grid::{GridMap, Point, Role};

/// What a paint action did to the board
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Edit {
    Start,
    End,
    Barrier,
    Ignored,
}

/// A grid together with the current start and end assignment.
///
/// Painting follows the usual editor flow: the first painted cell becomes the
/// start, the second the end, every further cell a barrier. Start and end can
/// never be painted over; erase them first.
#[derive(Clone, Debug)]
pub struct Board {
    grid: GridMap,
    start: Option<Point>,
    end: Option<Point>,
}

impl Board {
    pub fn new(rows: usize, width: usize) -> Self {
        Self::from_grid(GridMap::new(rows, width))
    }

    /// Takes over a grid, picking up start and end from the cell roles
    pub fn from_grid(grid: GridMap) -> Self {
        Self {
            start: grid.find_role(Role::Start),
            end: grid.find_role(Role::End),
            grid,
        }
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn paint(&mut self, point: Point) -> Edit {
        if !self.grid.contains(point) {
            return Edit::Ignored;
        }

        let is_start = self.start == Some(point);
        let is_end = self.end == Some(point);

        if self.start.is_none() && !is_end {
            self.grid.set_role(point, Role::Start);
            self.start = Some(point);
            Edit::Start
        } else if self.end.is_none() && !is_start {
            self.grid.set_role(point, Role::End);
            self.end = Some(point);
            Edit::End
        } else if !is_start && !is_end && self.grid.set_barrier(point) {
            Edit::Barrier
        } else {
            Edit::Ignored
        }
    }

    /// Resets the cell, releasing the start or end assignment held there
    pub fn erase(&mut self, point: Point) -> bool {
        if !self.grid.contains(point) {
            return false;
        }
        self.grid.clear(point);
        if self.start == Some(point) {
            self.start = None;
        } else if self.end == Some(point) {
            self.end = None;
        }
        true
    }

    pub fn paint_at(&mut self, x: usize, y: usize) -> Edit {
        match self.grid.point_at(x, y) {
            Some(point) => self.paint(point),
            None => Edit::Ignored,
        }
    }

    pub fn erase_at(&mut self, x: usize, y: usize) -> bool {
        match self.grid.point_at(x, y) {
            Some(point) => self.erase(point),
            None => false,
        }
    }

    /// Moves the start to `point`. Refused for cells outside the grid and for the end cell.
    pub fn set_start(&mut self, point: Point) -> bool {
        if !self.grid.contains(point) || self.end == Some(point) {
            return false;
        }
        if let Some(previous) = self.start.take() {
            self.grid.clear(previous);
        }
        self.grid.set_role(point, Role::Start);
        self.start = Some(point);
        true
    }

    /// Moves the end to `point`. Refused for cells outside the grid and for the start cell.
    pub fn set_end(&mut self, point: Point) -> bool {
        if !self.grid.contains(point) || self.start == Some(point) {
            return false;
        }
        if let Some(previous) = self.end.take() {
            self.grid.clear(previous);
        }
        self.grid.set_role(point, Role::End);
        self.end = Some(point);
        true
    }

    pub fn set_barrier(&mut self, point: Point) -> bool {
        self.grid.contains(point) && self.grid.set_barrier(point)
    }

    /// Empty grid of the same size, no start or end
    pub fn reset(&mut self) {
        debug!("resetting {}x{} board", self.grid.rows, self.grid.columns);
        self.grid = GridMap::with_size(self.grid.rows, self.grid.columns, self.grid.cell_size);
        self.start = None;
        self.end = None;
    }

    pub fn run<F>(&mut self, on_step: F) -> Result<PathResult<Point>, SearchFailure<Point>>
    where
        F: FnMut(&GridMap) -> ControlFlow<()>,
    {
        let start = self.start.ok_or(InvalidInput::<Point>::MissingStart)?;
        let end = self.end.ok_or(InvalidInput::<Point>::MissingEnd)?;
        run(&mut self.grid, start, end, on_step)
    }

    pub fn run_to_end(&mut self) -> Result<PathResult<Point>, SearchFailure<Point>> {
        self.run(|_| ControlFlow::Continue(()))
    }
}
