#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Least-cost route search over terrain grids.
//!
//! [`find_path`] runs an A* search guided by the Manhattan distance to the
//! goal. Entering a cell costs its terrain's movement cost and every passable
//! terrain costs at least one, so the heuristic never overestimates and the
//! first time the goal is selected its score is optimal.
//!
//! The open frontier is a plain vector scanned linearly. When several open
//! cells share the lowest estimated total, the one inserted earliest wins,
//! which keeps routes on symmetric maps reproducible. Combined with the
//! down, up, right, left neighbour order of [`GridView::neighbors`], this
//! means ties are resolved in favour of moving down before moving right.
//!
//! The engine keeps no state between calls: every invocation allocates its
//! own score tables and drops them before returning.

use terrain_route_core::{
    CellCoord, ConfigurationError, Endpoint, GridView, PathResult, Route,
};
use terrain_route_system_analytics::summarize;
use tracing::debug;

const UNREACHED: u32 = u32::MAX;

/// Searches `grid` for a least-cost route from `start` to `goal`.
///
/// Missing or out-of-bounds endpoints are configuration errors and no search
/// is attempted. An unreachable goal is a normal outcome reported as
/// [`PathResult::NotFound`].
pub fn find_path(
    grid: GridView<'_>,
    start: Option<CellCoord>,
    goal: Option<CellCoord>,
) -> Result<PathResult, ConfigurationError> {
    let start = validate_endpoint(grid, Endpoint::Start, start)?;
    let goal = validate_endpoint(grid, Endpoint::Goal, goal)?;

    let mut search = Search::new(grid, goal);
    let outcome = match search.run(start) {
        Some(cells) => {
            let summary = summarize(grid, &cells);
            PathResult::Found(Route::new(cells, summary))
        }
        None => PathResult::NotFound,
    };

    debug!(
        %start,
        %goal,
        expanded = search.expanded,
        found = outcome.route().is_some(),
        cost = outcome.route().map(Route::total_cost),
        "path search finished"
    );

    Ok(outcome)
}

fn validate_endpoint(
    grid: GridView<'_>,
    endpoint: Endpoint,
    cell: Option<CellCoord>,
) -> Result<CellCoord, ConfigurationError> {
    let cell = cell.ok_or(ConfigurationError::MissingEndpoint(endpoint))?;
    if !grid.contains(cell) {
        return Err(ConfigurationError::EndpointOutOfBounds {
            endpoint,
            cell,
            rows: grid.rows(),
            columns: grid.columns(),
        });
    }

    Ok(cell)
}

/// Score tables owned by a single search, indexed by row-major cell offset.
#[derive(Debug)]
struct Search<'a> {
    grid: GridView<'a>,
    goal: CellCoord,
    g_score: Vec<u32>,
    f_score: Vec<u32>,
    came_from: Vec<Option<usize>>,
    in_frontier: Vec<bool>,
    frontier: Vec<usize>,
    expanded: usize,
}

impl<'a> Search<'a> {
    fn new(grid: GridView<'a>, goal: CellCoord) -> Self {
        let cell_count = grid.cell_count();
        Self {
            grid,
            goal,
            g_score: vec![UNREACHED; cell_count],
            f_score: vec![UNREACHED; cell_count],
            came_from: vec![None; cell_count],
            in_frontier: vec![false; cell_count],
            frontier: Vec::new(),
            expanded: 0,
        }
    }

    fn heuristic(&self, cell: CellCoord) -> u32 {
        cell.manhattan_distance(self.goal)
    }

    fn run(&mut self, start: CellCoord) -> Option<Vec<CellCoord>> {
        let start_index = self.grid.index(start)?;
        let goal_index = self.grid.index(self.goal)?;

        self.g_score[start_index] = 0;
        self.f_score[start_index] = self.heuristic(start);
        self.push_frontier(start_index);

        while let Some(position) = self.lowest_in_frontier() {
            let current_index = self.frontier[position];
            if current_index == goal_index {
                return Some(self.reconstruct(goal_index));
            }

            let _ = self.frontier.remove(position);
            self.in_frontier[current_index] = false;
            self.expanded += 1;

            let Some(current) = self.grid.cell_at(current_index) else {
                continue;
            };
            let current_score = self.g_score[current_index];
            let grid = self.grid;

            for neighbor in grid.neighbors(current) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                let Some(step_cost) = grid
                    .terrain_of(neighbor)
                    .and_then(|terrain| terrain.movement_cost())
                else {
                    continue;
                };

                let tentative = current_score.saturating_add(step_cost);
                if tentative >= self.g_score[neighbor_index] {
                    continue;
                }

                self.came_from[neighbor_index] = Some(current_index);
                self.g_score[neighbor_index] = tentative;
                self.f_score[neighbor_index] = tentative.saturating_add(self.heuristic(neighbor));
                self.push_frontier(neighbor_index);
            }
        }

        None
    }

    fn push_frontier(&mut self, index: usize) {
        if self.in_frontier[index] {
            return;
        }

        self.in_frontier[index] = true;
        self.frontier.push(index);
    }

    /// Position within the frontier of the first-inserted cell with the lowest f-score.
    fn lowest_in_frontier(&self) -> Option<usize> {
        self.frontier
            .iter()
            .enumerate()
            .min_by_key(|&(_, &index)| self.f_score[index])
            .map(|(position, _)| position)
    }

    fn reconstruct(&self, goal_index: usize) -> Vec<CellCoord> {
        let mut indices = vec![goal_index];
        let mut current = goal_index;
        while let Some(previous) = self.came_from[current] {
            indices.push(previous);
            current = previous;
        }

        indices
            .into_iter()
            .rev()
            .filter_map(|index| self.grid.cell_at(index))
            .collect()
    }
}
