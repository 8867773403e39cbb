use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    error::Error,
    fmt::{Debug, Display},
    ops::ControlFlow,
};

use log::{debug, trace};

use crate::grid::CellStatus;

/// Score of a node that has not been reached yet. Larger than any reachable sum.
pub const UNREACHABLE: usize = usize::MAX;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + Display + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for per-node scratch storage
    type Storage<T: Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is inside the map
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Check if the node can be stepped on
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// All nodes of the map
    fn nodes(&self) -> impl Iterator<Item = Self::Reference>;

    /// Return an iterator over the traversable neighbors of the provided node,
    /// in a deterministic order. Every move costs 1.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Admissible estimate of the remaining cost between two nodes
    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize;

    /// Publish the search status of a node
    fn set_status(&mut self, node: Self::Reference, status: CellStatus);

    /// Set every node back to `CellStatus::Unvisited`
    fn reset_status(&mut self);

    /// Create a storage for values of type T, every node starting at `default_value`
    fn create_storage<T: Clone + 'static>(&self, default_value: T) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> &T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<R> {
    f_score: usize,
    order: u64,
    point: R,
}

impl<R> Ord for ToVisit<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap, insertion order breaks ties
        (self.f_score, self.order)
            .cmp(&(other.f_score, other.order))
            .reverse()
    }
}

impl<R> PartialOrd for ToVisit<R> {
    fn partial_cmp(&self, other: &ToVisit<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for ToVisit<R> {
    fn eq(&self, other: &ToVisit<R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for ToVisit<R> {}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    /// From the node after `start` up to and including `goal`
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    Cancelled,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Reasons a search refuses to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput<R> {
    MissingStart,
    MissingEnd,
    OutOfBounds(R),
    Impassable(R),
    StartIsGoal(R),
}

impl<R: Display> Display for InvalidInput<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::MissingStart => write!(f, "no start cell assigned"),
            InvalidInput::MissingEnd => write!(f, "no end cell assigned"),
            InvalidInput::OutOfBounds(node) => write!(f, "{} is outside the map", node),
            InvalidInput::Impassable(node) => write!(f, "{} is a barrier", node),
            InvalidInput::StartIsGoal(node) => write!(f, "start and end are both {}", node),
        }
    }
}

impl<R: Debug + Display> Error for InvalidInput<R> {}

/// Every way a run can end without a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure<R> {
    InvalidInput(InvalidInput<R>),
    NoPathExists,
    Cancelled,
}

impl<R> From<InvalidInput<R>> for SearchFailure<R> {
    fn from(value: InvalidInput<R>) -> Self {
        SearchFailure::InvalidInput(value)
    }
}

impl<R: Display> Display for SearchFailure<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchFailure::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            SearchFailure::NoPathExists => write!(f, "no path exists"),
            SearchFailure::Cancelled => write!(f, "search cancelled"),
        }
    }
}

impl<R: Debug + Display + 'static> Error for SearchFailure<R> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchFailure::InvalidInput(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum Phase<R> {
    Searching,
    /// Walking `came_from` back from the goal, one node per step
    Tracing { cursor: R, path: Vec<R> },
    Done,
}

/// A* search over a [`MapTrait`], advanced one observable step at a time.
///
/// All scratch state lives here and is dropped with the finder. The map is
/// only written through [`MapTrait::set_status`].
pub struct PathFinder<M: MapTrait> {
    start: M::Reference,
    goal: M::Reference,
    g_score: M::Storage<usize>,
    f_score: M::Storage<usize>,
    came_from: M::Storage<Option<M::Reference>>,
    in_frontier: M::Storage<bool>,
    neighbors: M::Storage<Vec<M::Reference>>,
    frontier: BinaryHeap<ToVisit<M::Reference>>,
    counter: u64,
    expanded: Vec<M::Reference>,
    phase: Phase<M::Reference>,
    state: PathFinderState<M::Reference>,
}

fn validate<M: MapTrait>(
    map: &M,
    start: M::Reference,
    goal: M::Reference,
) -> Result<(), InvalidInput<M::Reference>> {
    for node in [start, goal] {
        if !map.is_valid(node) {
            return Err(InvalidInput::OutOfBounds(node));
        }
        if !map.is_passable(node) {
            return Err(InvalidInput::Impassable(node));
        }
    }
    if start == goal {
        return Err(InvalidInput::StartIsGoal(start));
    }
    Ok(())
}

impl<M: MapTrait> PathFinder<M> {
    /// Validates the endpoints, then clears the previous run's statuses and
    /// takes a snapshot of every node's neighbors. Edits to the map after this
    /// point do not change the graph being searched.
    pub fn new(
        map: &mut M,
        start: M::Reference,
        goal: M::Reference,
    ) -> Result<Self, InvalidInput<M::Reference>> {
        validate(&*map, start, goal)?;

        map.reset_status();

        let mut neighbors = map.create_storage::<Vec<M::Reference>>(Vec::new());
        for node in map.nodes() {
            *neighbors.get_mut(node) = map.neighbors_of(node).collect();
        }

        let mut g_score = map.create_storage(UNREACHABLE);
        let mut f_score = map.create_storage(UNREACHABLE);
        let mut in_frontier = map.create_storage(false);

        let estimate = map.estimate(start, goal);
        *g_score.get_mut(start) = 0;
        *f_score.get_mut(start) = estimate;
        *in_frontier.get_mut(start) = true;
        map.set_status(start, CellStatus::Open);

        debug!("searching from {} to {}, estimate={}", start, goal, estimate);

        Ok(Self {
            start,
            goal,
            g_score,
            f_score,
            came_from: map.create_storage::<Option<M::Reference>>(None),
            in_frontier,
            neighbors,
            frontier: BinaryHeap::from([ToVisit {
                f_score: estimate,
                order: 0,
                point: start,
            }]),
            counter: 0,
            expanded: Vec::new(),
            phase: Phase::Searching,
            state: PathFinderState::Computing,
        })
    }

    pub fn finish(&mut self, map: &mut M) -> PathFinderState<M::Reference> {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return s,
            }
        }
    }

    /// Does one unit of work: expands one node, or marks one node of the path
    /// once the goal has been reached.
    pub fn step(&mut self, map: &mut M) -> PathFinderState<M::Reference> {
        if self.state.is_done() {
            return self.state.clone();
        }
        if matches!(self.phase, Phase::Tracing { .. }) {
            self.trace(map);
            return self.state.clone();
        }

        while let Some(visit) = self.frontier.pop() {
            let current = visit.point;

            // superseded entry
            if !*self.in_frontier.get(current) {
                continue;
            }
            *self.in_frontier.get_mut(current) = false;

            if current == self.goal {
                debug!(
                    "reached goal {} after {} expansions, cost={}",
                    current,
                    self.expanded.len(),
                    self.g_score.get(current)
                );
                self.phase = Phase::Tracing {
                    cursor: current,
                    path: vec![current],
                };
                self.trace(map);
                return self.state.clone();
            }

            let tentative_g = *self.g_score.get(current) + 1;

            for &neighbor in self.neighbors.get(current) {
                if tentative_g >= *self.g_score.get(neighbor) {
                    continue;
                }

                let f_score = tentative_g + map.estimate(neighbor, self.goal);
                *self.came_from.get_mut(neighbor) = Some(current);
                *self.g_score.get_mut(neighbor) = tentative_g;
                *self.f_score.get_mut(neighbor) = f_score;

                if !*self.in_frontier.get(neighbor) {
                    self.counter += 1;
                    self.frontier.push(ToVisit {
                        f_score,
                        order: self.counter,
                        point: neighbor,
                    });
                    *self.in_frontier.get_mut(neighbor) = true;
                    map.set_status(neighbor, CellStatus::Open);
                }
            }

            if current != self.start {
                map.set_status(current, CellStatus::Closed);
            }
            trace!("expanded {} f={}", current, visit.f_score);
            self.expanded.push(current);

            return self.state.clone();
        }

        debug!(
            "no path from {} to {}, {} nodes expanded",
            self.start,
            self.goal,
            self.expanded.len()
        );
        self.state = PathFinderState::NoPathFound;
        self.state.clone()
    }

    fn trace(&mut self, map: &mut M) {
        let Phase::Tracing { cursor, path } = &mut self.phase else {
            return;
        };

        match *self.came_from.get(*cursor) {
            Some(previous) if previous != self.start => {
                map.set_status(previous, CellStatus::Path);
                path.push(previous);
                *cursor = previous;
            }
            Some(_) => {
                // reached the start, the goal is marked last
                map.set_status(self.goal, CellStatus::Path);

                let mut path = std::mem::take(path);
                path.reverse();

                self.state = PathFinderState::PathFound(PathResult {
                    total_cost: *self.g_score.get(self.goal),
                    path,
                    start: self.start,
                    goal: self.goal,
                });
                self.phase = Phase::Done;
            }
            None => panic!("Backtracking lead to a node that was never reached"),
        }
    }

    /// Stops the search, leaving every published status as it is
    pub fn cancel(&mut self) {
        if !self.state.is_done() {
            debug!("search from {} to {} cancelled", self.start, self.goal);
            self.state = PathFinderState::Cancelled;
            self.phase = Phase::Done;
        }
    }

    pub fn state(&self) -> &PathFinderState<M::Reference> {
        &self.state
    }

    /// Nodes in the order they were expanded
    pub fn expanded(&self) -> &[M::Reference] {
        &self.expanded
    }

    pub fn came_from(&self, node: M::Reference) -> Option<M::Reference> {
        *self.came_from.get(node)
    }

    pub fn g_score(&self, node: M::Reference) -> usize {
        *self.g_score.get(node)
    }

    pub fn f_score(&self, node: M::Reference) -> usize {
        *self.f_score.get(node)
    }

    pub fn in_frontier(&self, node: M::Reference) -> bool {
        *self.in_frontier.get(node)
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }
}

/// Runs a full search, calling `on_step` after every expanded node and every
/// node marked as path. Returning `ControlFlow::Break` from the observer
/// cancels the run.
pub fn run<M, F>(
    map: &mut M,
    start: M::Reference,
    goal: M::Reference,
    mut on_step: F,
) -> Result<PathResult<M::Reference>, SearchFailure<M::Reference>>
where
    M: MapTrait,
    F: FnMut(&M) -> ControlFlow<()>,
{
    let mut finder = PathFinder::new(map, start, goal)?;

    loop {
        match finder.step(map) {
            PathFinderState::Computing => {
                if on_step(&*map).is_break() {
                    finder.cancel();
                }
            }
            PathFinderState::PathFound(result) => return Ok(result),
            PathFinderState::NoPathFound => return Err(SearchFailure::NoPathExists),
            PathFinderState::Cancelled => return Err(SearchFailure::Cancelled),
        }
    }
}

pub fn run_to_end<M: MapTrait>(
    map: &mut M,
    start: M::Reference,
    goal: M::Reference,
) -> Result<PathResult<M::Reference>, SearchFailure<M::Reference>> {
    run(map, start, goal, |_| ControlFlow::Continue(()))
}

#[cfg(test)]
mod test {

    use std::collections::VecDeque;

    use super::*;
    use crate::grid::{manhattan, GridMap, Point};

    fn p(row: usize, col: usize) -> Point {
        Point { row, col }
    }

    /// Hop distances from `source` over passable cells
    fn bfs(map: &GridMap, source: Point) -> Vec<Option<usize>> {
        let mut dist = vec![None; map.rows * map.columns];
        let idx = |p: Point| p.row * map.columns + p.col;
        let mut queue = VecDeque::from([source]);
        dist[idx(source)] = Some(0);

        while let Some(current) = queue.pop_front() {
            let d = dist[idx(current)].unwrap();
            for n in map.neighbors_four(current) {
                if dist[idx(n)].is_none() {
                    dist[idx(n)] = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *seed >> 33
    }

    fn random_map(size: usize, seed: &mut u64) -> GridMap {
        let mut map = GridMap::new(size, size * 10);
        for point in map.points().collect::<Vec<_>>() {
            if lcg(seed) % 100 < 30 {
                map.set_barrier(point);
            }
        }
        map
    }

    fn assert_valid_path(map: &GridMap, result: &PathResult<Point>) {
        let mut previous = result.start;
        for &point in &result.path {
            assert_eq!(manhattan(previous, point), 1, "{} -> {}", previous, point);
            assert!(map.get(point).passable);
            previous = point;
        }
        assert_eq!(result.path.last(), Some(&result.goal));
        assert_eq!(result.path.len(), result.total_cost);
    }

    #[test]
    fn test_open_grid() {
        let mut map = GridMap::new(5, 50);

        let result = run_to_end(&mut map, p(0, 0), p(4, 4)).unwrap();

        assert_eq!(result.total_cost, 8);
        assert_eq!(result.path.len(), 8);
        assert_valid_path(&map, &result);
        for point in &result.path {
            assert_eq!(map.status(*point), CellStatus::Path);
        }
        assert_eq!(map.status(p(0, 0)), CellStatus::Open);
    }

    #[test]
    fn test_forced_gap() {
        let mut map: GridMap = "S..\n.#.\n.#E\n".parse().unwrap();
        let mut finder = PathFinder::new(&mut map, p(0, 0), p(2, 2)).unwrap();

        let PathFinderState::PathFound(result) = finder.finish(&mut map) else {
            panic!("expected a path");
        };
        assert_eq!(result.path, vec![p(0, 1), p(0, 2), p(1, 2), p(2, 2)]);

        let mut chain = vec![];
        let mut cursor = p(2, 2);
        while let Some(previous) = finder.came_from(cursor) {
            chain.push(previous);
            cursor = previous;
        }
        assert_eq!(cursor, p(0, 0));
        assert!(chain.contains(&p(0, 1)));
    }

    #[test]
    fn test_adjacent_goal() {
        let mut map = GridMap::new(3, 30);
        let mut calls = 0;
        let result = run(&mut map, p(1, 1), p(1, 2), |_| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(result.path, vec![p(1, 2)]);
        assert_eq!(result.total_cost, 1);
        // only the start gets expanded before the goal is popped
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_exhaustive_small_grids() {
        for mask in 0u32..(1 << 9) {
            let mut base = GridMap::new(3, 30);
            for (i, point) in base.points().collect::<Vec<_>>().into_iter().enumerate() {
                if mask & (1 << i) != 0 {
                    base.set_barrier(point);
                }
            }

            let open: Vec<Point> = base.points().filter(|p| base.get(*p).passable).collect();
            for &start in &open {
                let dist = bfs(&base, start);
                for &goal in &open {
                    if start == goal {
                        continue;
                    }
                    let mut map = base.clone();
                    let expected = dist[goal.row * 3 + goal.col];
                    match (run_to_end(&mut map, start, goal), expected) {
                        (Ok(result), Some(d)) => {
                            assert_eq!(result.total_cost, d);
                            assert_valid_path(&map, &result);
                        }
                        (Err(SearchFailure::NoPathExists), None) => {}
                        (outcome, expected) => panic!(
                            "mask {:09b} {} -> {}: got {:?}, expected {:?}",
                            mask, start, goal, outcome, expected
                        ),
                    }
                }
            }
        }
    }

    #[test]
    fn test_random_grids_match_bfs() {
        let mut seed = 0x5eed;
        for _ in 0..40 {
            let base = random_map(10, &mut seed);
            let open: Vec<Point> = base.points().filter(|p| base.get(*p).passable).collect();
            if open.len() < 2 {
                continue;
            }

            for _ in 0..5 {
                let start = open[lcg(&mut seed) as usize % open.len()];
                let goal = open[lcg(&mut seed) as usize % open.len()];
                if start == goal {
                    continue;
                }
                let dist = bfs(&base, start);
                let mut map = base.clone();
                match run_to_end(&mut map, start, goal) {
                    Ok(result) => {
                        assert_eq!(Some(result.total_cost), dist[goal.row * 10 + goal.col]);
                        assert_valid_path(&map, &result);
                    }
                    Err(SearchFailure::NoPathExists) => {
                        assert_eq!(dist[goal.row * 10 + goal.col], None)
                    }
                    Err(e) => panic!("unexpected failure {}", e),
                }
            }
        }
    }

    #[test]
    fn test_heuristic_admissible() {
        let mut seed = 42;
        for _ in 0..20 {
            let map = random_map(10, &mut seed);
            for goal in map.points().filter(|p| map.get(*p).passable) {
                let dist = bfs(&map, goal);
                for point in map.points() {
                    if let Some(d) = dist[point.row * 10 + point.col] {
                        assert!(map.estimate(point, goal) <= d);
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut seed = 7;
        let base = random_map(12, &mut seed);
        let open: Vec<Point> = base.points().filter(|p| base.get(*p).passable).collect();
        let (start, goal) = (open[0], open[open.len() - 1]);

        let record = || {
            let mut map = base.clone();
            let mut frames = vec![];
            let outcome = run(&mut map, start, goal, |m| {
                frames.push(m.to_string());
                ControlFlow::Continue(())
            });
            (outcome, frames)
        };

        let (first, first_frames) = record();
        let (second, second_frames) = record();
        assert_eq!(first, second);
        assert_eq!(first_frames, second_frames);

        let mut a = base.clone();
        let mut b = base.clone();
        let mut finder_a = PathFinder::new(&mut a, start, goal).unwrap();
        let mut finder_b = PathFinder::new(&mut b, start, goal).unwrap();
        finder_a.finish(&mut a);
        finder_b.finish(&mut b);
        assert_eq!(finder_a.expanded(), finder_b.expanded());
    }

    #[test]
    fn test_enclosed_goal() {
        let mut map: GridMap = "S....\n..#..\n.#E#.\n..#..\n.....\n".parse().unwrap();

        let outcome = run_to_end(&mut map, p(0, 0), p(2, 2));
        assert_eq!(outcome, Err(SearchFailure::NoPathExists));

        let reachable = bfs(&map, p(0, 0));
        for point in map.points() {
            let cell = map.get(point);
            let expected = if point == p(0, 0) {
                CellStatus::Open
            } else if reachable[point.row * 5 + point.col].is_some() {
                CellStatus::Closed
            } else {
                CellStatus::Unvisited
            };
            assert_eq!(cell.status, expected, "at {}", point);
        }
    }

    #[test]
    fn test_invalid_input_leaves_map_untouched() {
        let mut map: GridMap = "S.#\n...\n..E\n".parse().unwrap();
        run_to_end(&mut map, p(0, 0), p(2, 2)).unwrap();
        let residue = map.to_string();
        let statuses: Vec<CellStatus> = map.cells().map(|(_, c)| c.status).collect();

        let cases = [
            (p(0, 0), p(0, 0), InvalidInput::StartIsGoal(p(0, 0))),
            (p(0, 0), p(3, 0), InvalidInput::OutOfBounds(p(3, 0))),
            (p(0, 2), p(2, 2), InvalidInput::Impassable(p(0, 2))),
            (p(0, 0), p(0, 2), InvalidInput::Impassable(p(0, 2))),
        ];
        for (start, goal, expected) in cases {
            assert_eq!(
                run_to_end(&mut map, start, goal),
                Err(SearchFailure::InvalidInput(expected))
            );
        }

        assert_eq!(map.to_string(), residue);
        assert_eq!(
            map.cells().map(|(_, c)| c.status).collect::<Vec<_>>(),
            statuses
        );
    }

    #[test]
    fn test_cancel() {
        let mut map = GridMap::new(10, 100);
        let mut calls = 0;
        let outcome = run(&mut map, p(0, 0), p(9, 9), |_| {
            calls += 1;
            if calls == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(outcome, Err(SearchFailure::Cancelled));
        assert_eq!(calls, 3);
        // start was expanded but stays open, the two following cells were closed
        let closed = map
            .cells()
            .filter(|(_, c)| c.status == CellStatus::Closed)
            .count();
        assert_eq!(closed, 2);
        assert_eq!(map.status(p(0, 0)), CellStatus::Open);
    }

    #[test]
    fn test_cancel_while_tracing() {
        let mut map = GridMap::new(5, 50);
        let mut marked = 0;
        let outcome = run(&mut map, p(0, 0), p(4, 4), |m| {
            marked = m
                .cells()
                .filter(|(_, c)| c.status == CellStatus::Path)
                .count();
            if marked >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(outcome, Err(SearchFailure::Cancelled));
        assert_eq!(marked, 2);

        // cells marked before the break keep their status, nothing else is added
        let path: Vec<Point> = map
            .cells()
            .filter(|(_, c)| c.status == CellStatus::Path)
            .map(|(point, _)| point)
            .collect();
        assert_eq!(path.len(), 2);
        assert!(path.iter().all(|&point| point != p(4, 4) && point != p(0, 0)));
        assert_ne!(map.status(p(4, 4)), CellStatus::Path);
        assert_eq!(map.status(p(0, 0)), CellStatus::Open);
    }

    #[test]
    fn test_observer_sees_every_step() {
        let mut map = GridMap::new(5, 50);
        let mut path_frames = 0;
        let mut frames = 0;
        let result = run(&mut map, p(0, 0), p(4, 4), |m| {
            frames += 1;
            path_frames = m
                .cells()
                .filter(|(_, c)| c.status == CellStatus::Path)
                .count();
            ControlFlow::Continue(())
        })
        .unwrap();

        // the last observed frame shows every intermediate path cell, the
        // goal is marked after the final callback
        assert_eq!(path_frames, result.path.len() - 1);
        assert!(frames > result.path.len());
    }

    #[test]
    fn test_rerun_resets_statuses() {
        let mut map: GridMap = "S....\n.###.\n....E\n".parse().unwrap();
        run_to_end(&mut map, p(0, 0), p(2, 4)).unwrap();

        // second run on a different target starts from a clean slate
        let result = run_to_end(&mut map, p(0, 0), p(0, 1)).unwrap();
        assert_eq!(result.path, vec![p(0, 1)]);
        assert_eq!(map.status(p(2, 4)), CellStatus::Unvisited);
        assert_eq!(map.status(p(2, 0)), CellStatus::Unvisited);
    }

    #[test]
    fn test_neighbors_snapshot() {
        let mut map = GridMap::new(5, 50);
        let mut finder = PathFinder::new(&mut map, p(0, 0), p(0, 4)).unwrap();
        finder.step(&mut map);

        // walls added mid-run are not seen until the next run
        for row in 0..5 {
            map.set_barrier(p(row, 2));
        }
        let PathFinderState::PathFound(result) = finder.finish(&mut map) else {
            panic!("expected a path");
        };
        assert_eq!(result.total_cost, 4);

        assert_eq!(
            run_to_end(&mut map, p(0, 0), p(0, 4)),
            Err(SearchFailure::NoPathExists)
        );
    }

    #[test]
    fn test_finder_accessors() {
        let mut map = GridMap::new(4, 40);
        let mut finder = PathFinder::new(&mut map, p(0, 0), p(3, 3)).unwrap();
        assert_eq!(finder.g_score(p(0, 0)), 0);
        assert_eq!(finder.f_score(p(0, 0)), 6);
        assert_eq!(finder.g_score(p(3, 3)), UNREACHABLE);
        assert!(finder.in_frontier(p(0, 0)));
        assert_eq!(finder.state(), &PathFinderState::Computing);

        finder.step(&mut map);
        assert_eq!(finder.expanded(), &[p(0, 0)]);
        assert!(!finder.in_frontier(p(0, 0)));
        assert!(finder.in_frontier(p(1, 0)));
        assert_eq!(finder.g_score(p(0, 1)), 1);
        assert_eq!(map.status(p(1, 0)), CellStatus::Open);

        finder.cancel();
        assert_eq!(finder.step(&mut map), PathFinderState::Cancelled);
    }

    #[test]
    fn test_failure_display() {
        let failure: SearchFailure<Point> = InvalidInput::Impassable(p(1, 2)).into();
        assert_eq!(failure.to_string(), "invalid input: (1, 2) is a barrier");
        assert!(failure.source().is_some());
        assert_eq!(SearchFailure::<Point>::NoPathExists.to_string(), "no path exists");
    }
}
