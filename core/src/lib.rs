#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Terrain Route engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired grid edits, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Systems never mutate the world: they read a [`GridView`] snapshot
//! and return plain values such as [`PathResult`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest grid edge accepted by the editing surface.
pub const MIN_GRID_SIZE: u32 = 2;
/// Largest grid edge accepted by the editing surface.
pub const MAX_GRID_SIZE: u32 = 60;
/// Grid edge used when no explicit size has been requested.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Verifies that the provided edge length lies within the editable range.
pub fn validate_grid_size(size: u32) -> Result<u32, GridSizeError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(GridSizeError { size })
    }
}

/// Reports a grid edge length outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error(
    "grid size {size} is outside the supported range {}..={}",
    MIN_GRID_SIZE,
    MAX_GRID_SIZE
)]
pub struct GridSizeError {
    /// Edge length that failed validation.
    pub size: u32,
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    #[serde(rename = "r")]
    row: u32,
    #[serde(rename = "c")]
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// Terrain kinds a cell may carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Paved road, the cheapest terrain to cross.
    Road,
    /// Open grass. Fresh grids are filled with it.
    #[default]
    Grass,
    /// Dense forest.
    Forest,
    /// Steep mountain, the most expensive passable terrain.
    Mountain,
    /// Open water. Never entered.
    Water,
}

impl Terrain {
    /// Every terrain kind in declaration order.
    pub const ALL: [Terrain; 5] = [
        Terrain::Road,
        Terrain::Grass,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Water,
    ];

    /// Cost of entering a cell with this terrain, or `None` when impassable.
    #[must_use]
    pub const fn movement_cost(self) -> Option<u32> {
        match self {
            Self::Road => Some(1),
            Self::Grass => Some(2),
            Self::Forest => Some(4),
            Self::Mountain => Some(7),
            Self::Water => None,
        }
    }

    /// Reports whether a route may enter a cell with this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        self.movement_cost().is_some()
    }

    /// Lowercase name used by the map exchange format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Grass => "grass",
            Self::Forest => "forest",
            Self::Mountain => "mountain",
            Self::Water => "water",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Terrain {
    type Err = UnknownTerrain;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|terrain| terrain.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTerrain(trimmed.to_owned()))
    }
}

/// Reports a terrain name outside the closed terrain set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown terrain '{0}'")]
pub struct UnknownTerrain(pub String);

/// Designated route endpoints held by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Cell the route departs from.
    Start,
    /// Cell the route must reach.
    Goal,
}

impl Endpoint {
    /// Capitalised label used in player-facing diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Goal => "Goal",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Recreates the grid with the provided edge length and default endpoints.
    ResetGrid {
        /// Edge length of the new square grid.
        size: u32,
    },
    /// Recreates the grid at its current size with default endpoints.
    ClearGrid,
    /// Assigns terrain to a single cell.
    PaintTerrain {
        /// Cell receiving the terrain.
        cell: CellCoord,
        /// Terrain to assign.
        terrain: Terrain,
    },
    /// Moves the start or goal designation onto a cell.
    PlaceEndpoint {
        /// Which endpoint to move.
        endpoint: Endpoint,
        /// Cell that should carry the designation.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was recreated.
    GridReset {
        /// Edge length of the fresh grid.
        size: u32,
    },
    /// Reports that a reset was refused because the size is unsupported.
    GridResizeRejected {
        /// Requested edge length.
        size: u32,
    },
    /// Confirms that a cell's terrain changed.
    TerrainPainted {
        /// Cell that was painted.
        cell: CellCoord,
        /// Terrain now carried by the cell.
        terrain: Terrain,
    },
    /// Reports that a terrain edit was refused.
    TerrainEditRejected {
        /// Cell targeted by the edit.
        cell: CellCoord,
        /// Terrain the edit attempted to assign.
        terrain: Terrain,
        /// Specific reason the edit failed.
        reason: EditRejection,
    },
    /// Confirms that an endpoint designation moved.
    EndpointPlaced {
        /// Endpoint that moved.
        endpoint: Endpoint,
        /// Cell now carrying the designation.
        cell: CellCoord,
    },
    /// Reports that an endpoint placement was refused.
    EndpointRejected {
        /// Endpoint targeted by the placement.
        endpoint: Endpoint,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: EditRejection,
    },
}

/// Reasons a grid edit may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum EditRejection {
    /// The cell currently carries the start or goal designation.
    #[error("cell is the current {0}")]
    ProtectedEndpoint(Endpoint),
    /// Endpoints cannot be placed on water.
    #[error("cell is water")]
    Water,
    /// The cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
}

/// Reasons the path engine refuses to start a search.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The endpoint has not been designated.
    #[error("{0} is not set")]
    MissingEndpoint(Endpoint),
    /// The endpoint lies outside the grid being searched.
    #[error("{endpoint} {cell} lies outside the {rows}x{columns} grid")]
    EndpointOutOfBounds {
        /// Endpoint that failed validation.
        endpoint: Endpoint,
        /// Coordinates carried by the endpoint.
        cell: CellCoord,
        /// Row count of the searched grid.
        rows: u32,
        /// Column count of the searched grid.
        columns: u32,
    },
}

/// Read-only terrain snapshot handed to systems for the duration of one query.
///
/// Terrain is stored in row-major order. Views are usually square, but any
/// non-empty rectangle is accepted so systems can be exercised on strips.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    rows: u32,
    columns: u32,
    terrain: &'a [Terrain],
}

impl<'a> GridView<'a> {
    /// Wraps row-major terrain, returning `None` when the dimensions disagree with the slice.
    #[must_use]
    pub fn new(rows: u32, columns: u32, terrain: &'a [Terrain]) -> Option<Self> {
        let expected = usize::try_from(u64::from(rows) * u64::from(columns)).ok()?;
        if rows == 0 || columns == 0 || terrain.len() != expected {
            return None;
        }

        Some(Self {
            rows,
            columns,
            terrain,
        })
    }

    /// Number of rows in the snapshot.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the snapshot.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells in the snapshot.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.terrain.len()
    }

    /// Reports whether the cell lies inside the snapshot.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major offset of the cell, if it lies inside the snapshot.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let columns = usize::try_from(self.columns).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }

    /// Cell stored at the provided row-major offset.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.terrain.len() {
            return None;
        }

        let columns = usize::try_from(self.columns).ok()?;
        let row = u32::try_from(index / columns).ok()?;
        let column = u32::try_from(index % columns).ok()?;
        Some(CellCoord::new(row, column))
    }

    /// Terrain carried by the cell, or `None` outside the snapshot.
    #[must_use]
    pub fn terrain_of(&self, cell: CellCoord) -> Option<Terrain> {
        self.index(cell)
            .and_then(|offset| self.terrain.get(offset).copied())
    }

    /// Reports whether the cell lies inside the snapshot and is not water.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.terrain_of(cell).is_some_and(Terrain::is_passable)
    }

    /// Passable cells one cardinal step away, enumerated down, up, right, left.
    ///
    /// The enumeration order is part of the contract: the path engine breaks
    /// cost ties by frontier insertion order, which follows this sequence.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + 'a {
        let view = *self;
        let mut candidates = [None; 4];
        let mut count = 0;

        if let Some(row) = cell.row().checked_add(1) {
            candidates[count] = Some(CellCoord::new(row, cell.column()));
            count += 1;
        }

        if let Some(row) = cell.row().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(row, cell.column()));
            count += 1;
        }

        if let Some(column) = cell.column().checked_add(1) {
            candidates[count] = Some(CellCoord::new(cell.row(), column));
            count += 1;
        }

        if let Some(column) = cell.column().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(cell.row(), column));
            count += 1;
        }

        candidates
            .into_iter()
            .take(count)
            .flatten()
            .filter(move |candidate| view.is_passable(*candidate))
    }

    /// Iterates every cell with its terrain in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Terrain)> + 'a {
        let view = *self;
        let terrain = self.terrain;
        terrain
            .iter()
            .enumerate()
            .filter_map(move |(offset, terrain)| Some((view.cell_at(offset)?, *terrain)))
    }
}

/// Per-terrain counts of the cells a route enters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TerrainHistogram {
    road: u32,
    grass: u32,
    forest: u32,
    mountain: u32,
}

impl TerrainHistogram {
    /// Creates a histogram from explicit counts.
    #[must_use]
    pub const fn new(road: u32, grass: u32, forest: u32, mountain: u32) -> Self {
        Self {
            road,
            grass,
            forest,
            mountain,
        }
    }

    /// Counts one more entered cell of the provided terrain. Water is ignored.
    pub fn record(&mut self, terrain: Terrain) {
        let slot = match terrain {
            Terrain::Road => &mut self.road,
            Terrain::Grass => &mut self.grass,
            Terrain::Forest => &mut self.forest,
            Terrain::Mountain => &mut self.mountain,
            Terrain::Water => return,
        };
        *slot = slot.saturating_add(1);
    }

    /// Number of entered cells carrying the provided terrain.
    #[must_use]
    pub const fn count(&self, terrain: Terrain) -> u32 {
        match terrain {
            Terrain::Road => self.road,
            Terrain::Grass => self.grass,
            Terrain::Forest => self.forest,
            Terrain::Mountain => self.mountain,
            Terrain::Water => 0,
        }
    }

    /// Total number of entered cells.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.road + self.grass + self.forest + self.mountain
    }
}

/// Coarse danger rating derived from the risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    /// Score of ten or less.
    Safe,
    /// Score from eleven to twenty.
    Moderate,
    /// Score above twenty.
    High,
}

impl RiskLevel {
    /// Classifies a risk score. Boundary values fall into the lower tier.
    #[must_use]
    pub const fn classify(score: u32) -> Self {
        if score > 20 {
            Self::High
        } else if score > 10 {
            Self::Moderate
        } else {
            Self::Safe
        }
    }

    /// Player-facing label for the level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk score paired with its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RiskAssessment {
    score: u32,
    level: RiskLevel,
}

impl RiskAssessment {
    /// Classifies the provided score.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        Self {
            score,
            level: RiskLevel::classify(score),
        }
    }

    /// Raw risk score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Classification of the score.
    #[must_use]
    pub const fn level(&self) -> RiskLevel {
        self.level
    }
}

/// Aggregate figures describing a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteSummary {
    /// Sum of the movement costs of every entered cell.
    pub total_cost: u32,
    /// Terrain composition of the entered cells.
    pub histogram: TerrainHistogram,
    /// Risk derived from the terrain composition.
    pub risk: RiskAssessment,
}

/// Ordered route from start to goal together with its analytics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    cells: Vec<CellCoord>,
    summary: RouteSummary,
}

impl Route {
    /// Creates a route from its ordered cells and precomputed summary.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>, summary: RouteSummary) -> Self {
        Self { cells, summary }
    }

    /// Cells from start to goal inclusive.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells on the route, start included.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len()
    }

    /// Sum of the movement costs of every entered cell.
    #[must_use]
    pub const fn total_cost(&self) -> u32 {
        self.summary.total_cost
    }

    /// Terrain composition of the entered cells.
    #[must_use]
    pub const fn histogram(&self) -> &TerrainHistogram {
        &self.summary.histogram
    }

    /// Risk derived from the terrain composition.
    #[must_use]
    pub const fn risk(&self) -> RiskAssessment {
        self.summary.risk
    }

    /// Aggregate figures describing the route.
    #[must_use]
    pub const fn summary(&self) -> &RouteSummary {
        &self.summary
    }
}

/// Outcome of a single path query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// A least-cost route exists.
    Found(Route),
    /// The goal cannot be reached from the start.
    NotFound,
}

impl PathResult {
    /// Route carried by the outcome, if one was found.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Found(route) => Some(route),
            Self::NotFound => None,
        }
    }
}
