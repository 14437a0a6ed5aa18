#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic route analytics: movement cost totals, terrain composition and risk.
//!
//! Every figure is derived from the cells a route *enters*. The first cell of a
//! path is where the traveller already stands, so it contributes neither cost
//! nor a histogram entry.

use terrain_route_core::{
    CellCoord, GridView, RiskAssessment, RouteSummary, Terrain, TerrainHistogram,
};

/// Risk points contributed by every entered forest cell.
pub const FOREST_RISK: u32 = 2;
/// Risk points contributed by every entered mountain cell.
pub const MOUNTAIN_RISK: u32 = 4;

/// Computes the raw risk score for a terrain composition.
#[must_use]
pub fn risk_score(histogram: &TerrainHistogram) -> u32 {
    let forest = histogram.count(Terrain::Forest).saturating_mul(FOREST_RISK);
    let mountain = histogram
        .count(Terrain::Mountain)
        .saturating_mul(MOUNTAIN_RISK);
    forest.saturating_add(mountain)
}

/// Scores and classifies a terrain composition.
#[must_use]
pub fn assess_risk(histogram: &TerrainHistogram) -> RiskAssessment {
    RiskAssessment::from_score(risk_score(histogram))
}

/// Tallies the cells entered along `path` and derives the route figures.
///
/// Cells outside the grid and impassable cells contribute nothing; the path
/// engine never produces either.
#[must_use]
pub fn summarize(grid: GridView<'_>, path: &[CellCoord]) -> RouteSummary {
    let mut histogram = TerrainHistogram::default();
    let mut total_cost: u32 = 0;

    for &cell in path.iter().skip(1) {
        let Some(terrain) = grid.terrain_of(cell) else {
            continue;
        };
        let Some(cost) = terrain.movement_cost() else {
            continue;
        };

        total_cost = total_cost.saturating_add(cost);
        histogram.record(terrain);
    }

    RouteSummary {
        total_cost,
        histogram,
        risk: assess_risk(&histogram),
    }
}
