#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared text presentation contracts for Terrain Route adapters.
//!
//! Nothing in this crate influences route selection. It turns world events,
//! search outcomes and grid snapshots into text, and replays an already
//! complete route as a timed reveal.

use std::time::Duration;

use anyhow::Result as AnyResult;
use terrain_route_core::{
    CellCoord, ConfigurationError, EditRejection, Event, GridView, PathResult, Route, Terrain,
};

/// Delay between two revealed path cells.
pub const DEFAULT_REVEAL_CADENCE: Duration = Duration::from_millis(60);

/// Closing sentence appended to every route explanation.
pub const ROUTE_RATIONALE: &str =
    "A* selected this path by minimizing total movement cost while avoiding blocked cells.";

/// Message shown when the goal cannot be reached.
pub const NO_ROUTE_MESSAGE: &str = "No path found. (Blocked terrain or isolated goal)";

/// Message shown when a search is requested without usable endpoints.
pub const MISSING_ENDPOINTS_MESSAGE: &str = "Set start and goal.";

/// Glyph drawn for the start cell.
pub const START_GLYPH: char = 'S';
/// Glyph drawn for the goal cell.
pub const GOAL_GLYPH: char = 'G';
/// Glyph drawn for revealed path cells.
pub const PATH_GLYPH: char = '*';

/// Glyph representing a terrain kind.
#[must_use]
pub const fn terrain_glyph(terrain: Terrain) -> char {
    match terrain {
        Terrain::Road => '=',
        Terrain::Grass => '.',
        Terrain::Forest => 'f',
        Terrain::Mountain => '^',
        Terrain::Water => '~',
    }
}

/// Player-facing diagnostic describing a world event.
#[must_use]
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::GridReset { .. } => "Grid initialized.".to_owned(),
        Event::GridResizeRejected { size } => format!("Grid size {size} is not supported."),
        Event::TerrainPainted { cell, terrain } => format!("Painted {cell} as {terrain}."),
        Event::TerrainEditRejected {
            reason: EditRejection::ProtectedEndpoint(endpoint),
            ..
        } => format!("Cannot change terrain of {endpoint} cell."),
        Event::TerrainEditRejected { cell, reason, .. } => {
            format!("Cannot paint {cell}: {reason}.")
        }
        Event::EndpointPlaced { endpoint, cell } => format!("{endpoint} set at {cell}"),
        Event::EndpointRejected {
            endpoint,
            reason: EditRejection::Water,
            ..
        } => format!("Cannot place {endpoint} on water."),
        Event::EndpointRejected {
            endpoint,
            cell,
            reason,
        } => format!("Cannot place {endpoint} at {cell}: {reason}."),
    }
}

/// Player-facing explanation of a search outcome.
#[must_use]
pub fn explain_outcome(outcome: &Result<PathResult, ConfigurationError>) -> String {
    match outcome {
        Ok(PathResult::Found(route)) => explain_route(route),
        Ok(PathResult::NotFound) => NO_ROUTE_MESSAGE.to_owned(),
        Err(_) => MISSING_ENDPOINTS_MESSAGE.to_owned(),
    }
}

/// Multi-line breakdown of a found route.
#[must_use]
pub fn explain_route(route: &Route) -> String {
    let histogram = route.histogram();
    format!(
        "Path found!\n\
         Steps: {steps}\n\
         Total Cost: {cost:.1}\n\
         Terrain Breakdown:\n\
         Road: {road}\n\
         Grass: {grass}\n\
         Forest: {forest}\n\
         Mountain: {mountain}\n\
         Risk Level: {risk}\n\
         \n\
         Explanation: {ROUTE_RATIONALE}",
        steps = route.steps(),
        cost = f64::from(route.total_cost()),
        road = histogram.count(Terrain::Road),
        grass = histogram.count(Terrain::Grass),
        forest = histogram.count(Terrain::Forest),
        mountain = histogram.count(Terrain::Mountain),
        risk = route.risk().level(),
    )
}

/// Snapshot of everything drawn in a single text frame.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Terrain to draw.
    pub grid: GridView<'a>,
    /// Start designation, if any.
    pub start: Option<CellCoord>,
    /// Goal designation, if any.
    pub goal: Option<CellCoord>,
    /// Path cells revealed so far.
    pub path: &'a [CellCoord],
}

impl<'a> Scene<'a> {
    /// Creates a scene without any revealed path.
    #[must_use]
    pub const fn new(
        grid: GridView<'a>,
        start: Option<CellCoord>,
        goal: Option<CellCoord>,
    ) -> Self {
        Self {
            grid,
            start,
            goal,
            path: &[],
        }
    }

    /// Returns a copy of the scene overlaying the provided path cells.
    #[must_use]
    pub fn with_path(self, path: &'a [CellCoord]) -> Self {
        Self { path, ..self }
    }

    /// Draws one glyph per cell, one line per row.
    ///
    /// Endpoints take precedence over path cells, which take precedence over
    /// terrain.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::with_capacity(self.grid.cell_count() + self.grid.rows() as usize);

        for (cell, terrain) in self.grid.cells() {
            if cell.column() == 0 && cell.row() > 0 {
                text.push('\n');
            }
            text.push(self.glyph(cell, terrain));
        }

        text
    }

    fn glyph(&self, cell: CellCoord, terrain: Terrain) -> char {
        if self.start == Some(cell) {
            START_GLYPH
        } else if self.goal == Some(cell) {
            GOAL_GLYPH
        } else if self.path.contains(&cell) {
            PATH_GLYPH
        } else {
            terrain_glyph(terrain)
        }
    }
}

/// Timed reveal of a completed route, one intermediate cell per cadence interval.
///
/// The start and goal cells are never revealed because their own glyphs
/// already mark them. The first call to [`PathReveal::advance`] starts the
/// clock and reveals the first cell.
#[derive(Clone, Debug)]
pub struct PathReveal {
    cells: Vec<CellCoord>,
    cadence: Duration,
    elapsed: Option<Duration>,
    revealed: usize,
}

impl PathReveal {
    /// Prepares a reveal for the provided route.
    #[must_use]
    pub fn new(route: &Route, cadence: Duration) -> Self {
        let path = route.cells();
        let endpoints = [path.first().copied(), path.last().copied()];
        let cells = path
            .iter()
            .copied()
            .filter(|cell| !endpoints.contains(&Some(*cell)))
            .collect();

        Self {
            cells,
            cadence,
            elapsed: None,
            revealed: 0,
        }
    }

    /// Delay between two revealed cells.
    #[must_use]
    pub const fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Advances the reveal clock and returns the cells revealed by this step.
    pub fn advance(&mut self, dt: Duration) -> &[CellCoord] {
        let elapsed = self
            .elapsed
            .map_or(Duration::ZERO, |elapsed| elapsed.saturating_add(dt));
        self.elapsed = Some(elapsed);

        let due = if self.cadence.is_zero() {
            self.cells.len()
        } else {
            let intervals = elapsed.as_nanos() / self.cadence.as_nanos();
            usize::try_from(intervals)
                .unwrap_or(usize::MAX)
                .saturating_add(1)
        };

        let before = self.revealed;
        self.revealed = due.min(self.cells.len());
        &self.cells[before..self.revealed]
    }

    /// Cells revealed so far, in route order.
    #[must_use]
    pub fn revealed(&self) -> &[CellCoord] {
        &self.cells[..self.revealed]
    }

    /// Reports whether every intermediate cell has been revealed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.revealed == self.cells.len()
    }
}

/// Output surface capable of presenting text frames.
pub trait RenderingBackend {
    /// Presents a fully rendered frame, replacing the previous one.
    fn present(&mut self, frame: &str) -> AnyResult<()>;

    /// Blocks until the next frame is due.
    fn wait(&mut self, delay: Duration) -> AnyResult<()>;
}

/// Replays `route` over `scene`, presenting one frame per revealed cell.
///
/// A final frame showing the full route is always presented, so routes
/// without intermediate cells still produce output.
pub fn play_reveal<B>(
    backend: &mut B,
    scene: Scene<'_>,
    route: &Route,
    cadence: Duration,
) -> AnyResult<()>
where
    B: RenderingBackend,
{
    let mut reveal = PathReveal::new(route, cadence);
    let mut dt = Duration::ZERO;

    loop {
        let _ = reveal.advance(dt);
        backend.present(&scene.with_path(reveal.revealed()).render())?;
        if reveal.is_complete() {
            return Ok(());
        }

        backend.wait(reveal.cadence())?;
        dt = reveal.cadence();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_route_core::{Endpoint, RiskAssessment, RouteSummary, TerrainHistogram};

    fn straight_route(length: u32) -> Route {
        let cells: Vec<_> = (0..length).map(|column| CellCoord::new(0, column)).collect();
        let entered = length.saturating_sub(1);
        Route::new(
            cells,
            RouteSummary {
                total_cost: entered * 2,
                histogram: TerrainHistogram::new(0, entered, 0, 0),
                risk: RiskAssessment::from_score(0),
            },
        )
    }

    #[derive(Default)]
    struct RecordingBackend {
        frames: Vec<String>,
        waits: Vec<Duration>,
    }

    impl RenderingBackend for RecordingBackend {
        fn present(&mut self, frame: &str) -> AnyResult<()> {
            self.frames.push(frame.to_owned());
            Ok(())
        }

        fn wait(&mut self, delay: Duration) -> AnyResult<()> {
            self.waits.push(delay);
            Ok(())
        }
    }

    #[test]
    fn explanation_lists_breakdown() {
        let route = straight_route(3);

        assert_eq!(
            explain_route(&route),
            "Path found!\nSteps: 3\nTotal Cost: 4.0\nTerrain Breakdown:\nRoad: 0\nGrass: 2\n\
             Forest: 0\nMountain: 0\nRisk Level: Safe\n\nExplanation: A* selected this path by \
             minimizing total movement cost while avoiding blocked cells."
        );
    }

    #[test]
    fn outcome_messages_cover_failures() {
        assert_eq!(explain_outcome(&Ok(PathResult::NotFound)), NO_ROUTE_MESSAGE);
        assert_eq!(
            explain_outcome(&Err(ConfigurationError::MissingEndpoint(Endpoint::Goal))),
            MISSING_ENDPOINTS_MESSAGE
        );
    }

    #[test]
    fn rejected_edits_use_player_wording() {
        let cell = CellCoord::new(0, 0);
        assert_eq!(
            describe_event(&Event::TerrainEditRejected {
                cell,
                terrain: Terrain::Water,
                reason: EditRejection::ProtectedEndpoint(Endpoint::Start),
            }),
            "Cannot change terrain of Start cell."
        );
        assert_eq!(
            describe_event(&Event::EndpointRejected {
                endpoint: Endpoint::Goal,
                cell,
                reason: EditRejection::Water,
            }),
            "Cannot place Goal on water."
        );
        assert_eq!(
            describe_event(&Event::EndpointPlaced {
                endpoint: Endpoint::Start,
                cell: CellCoord::new(2, 5),
            }),
            "Start set at (2,5)"
        );
    }

    #[test]
    fn scene_draws_endpoints_over_path_and_terrain() {
        let terrain = [
            Terrain::Grass,
            Terrain::Road,
            Terrain::Water,
            Terrain::Forest,
            Terrain::Mountain,
            Terrain::Grass,
        ];
        let grid = GridView::new(2, 3, &terrain).expect("view");
        let path = [CellCoord::new(0, 1), CellCoord::new(1, 1)];
        let scene = Scene::new(grid, Some(CellCoord::new(0, 0)), Some(CellCoord::new(1, 2)))
            .with_path(&path);

        assert_eq!(scene.render(), "S*~\nf*G");
    }

    #[test]
    fn reveal_skips_endpoints_and_follows_cadence() {
        let route = straight_route(5);
        let mut reveal = PathReveal::new(&route, Duration::from_millis(60));

        assert!(reveal.revealed().is_empty());
        assert_eq!(reveal.advance(Duration::ZERO), &[CellCoord::new(0, 1)]);
        assert!(reveal.advance(Duration::from_millis(30)).is_empty());
        assert_eq!(
            reveal.advance(Duration::from_millis(30)),
            &[CellCoord::new(0, 2)]
        );
        assert!(!reveal.is_complete());
        assert_eq!(
            reveal.advance(Duration::from_millis(500)),
            &[CellCoord::new(0, 3)]
        );
        assert!(reveal.is_complete());
        assert_eq!(reveal.revealed().len(), 3);
    }

    #[test]
    fn play_reveal_presents_one_frame_per_cell() {
        let terrain = [Terrain::Grass; 4];
        let grid = GridView::new(1, 4, &terrain).expect("view");
        let route = straight_route(4);
        let scene = Scene::new(grid, Some(CellCoord::new(0, 0)), Some(CellCoord::new(0, 3)));
        let mut backend = RecordingBackend::default();

        play_reveal(&mut backend, scene, &route, DEFAULT_REVEAL_CADENCE)
            .expect("recording never fails");

        assert_eq!(backend.frames, vec!["S*.G".to_owned(), "S**G".to_owned()]);
        assert_eq!(backend.waits, vec![DEFAULT_REVEAL_CADENCE]);
    }

    #[test]
    fn play_reveal_of_adjacent_endpoints_presents_single_frame() {
        let terrain = [Terrain::Grass; 2];
        let grid = GridView::new(1, 2, &terrain).expect("view");
        let route = straight_route(2);
        let scene = Scene::new(grid, Some(CellCoord::new(0, 0)), Some(CellCoord::new(0, 1)));
        let mut backend = RecordingBackend::default();

        play_reveal(&mut backend, scene, &route, DEFAULT_REVEAL_CADENCE)
            .expect("recording never fails");

        assert_eq!(backend.frames, vec!["SG".to_owned()]);
        assert!(backend.waits.is_empty());
    }
}
