#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Terrain Route.
//!
//! The world owns the terrain of every cell together with the start and goal
//! designations. All mutations flow through [`apply`], which validates the
//! command, updates state when the edit is allowed, and reports exactly one
//! outcome per command through the event buffer. Rejected edits never touch
//! state.

use terrain_route_core::{
    validate_grid_size, CellCoord, Command, EditRejection, Endpoint, Event, GridSizeError,
    Terrain, DEFAULT_GRID_SIZE,
};
use tracing::debug;

/// Represents the authoritative terrain grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    size: u32,
    terrain: Vec<Terrain>,
    start: Option<CellCoord>,
    goal: Option<CellCoord>,
}

impl World {
    /// Creates the default grid: all grass, start in the top-left corner and
    /// goal in the bottom-right corner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_endpoints(DEFAULT_GRID_SIZE)
    }

    /// Creates an all-grass grid without start or goal designations.
    pub fn blank(size: u32) -> Result<Self, GridSizeError> {
        let size = validate_grid_size(size)?;
        Ok(Self::blank_unchecked(size))
    }

    fn blank_unchecked(size: u32) -> Self {
        let edge = size as usize;
        Self {
            size,
            terrain: vec![Terrain::default(); edge * edge],
            start: None,
            goal: None,
        }
    }

    fn with_default_endpoints(size: u32) -> Self {
        let mut world = Self::blank_unchecked(size);
        let last = size.saturating_sub(1);
        world.start = Some(CellCoord::new(0, 0));
        world.goal = Some(CellCoord::new(last, last));
        world
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.size || cell.column() >= self.size {
            return None;
        }

        let edge = self.size as usize;
        Some(cell.row() as usize * edge + cell.column() as usize)
    }

    fn endpoint_at(&self, cell: CellCoord) -> Option<Endpoint> {
        if self.start == Some(cell) {
            Some(Endpoint::Start)
        } else if self.goal == Some(cell) {
            Some(Endpoint::Goal)
        } else {
            None
        }
    }

    fn endpoint_slot(&mut self, endpoint: Endpoint) -> &mut Option<CellCoord> {
        match endpoint {
            Endpoint::Start => &mut self.start,
            Endpoint::Goal => &mut self.goal,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetGrid { size } => match validate_grid_size(size) {
            Ok(size) => reset(world, size, out_events),
            Err(error) => {
                debug!(%error, "grid reset rejected");
                out_events.push(Event::GridResizeRejected { size });
            }
        },
        Command::ClearGrid => {
            let size = world.size;
            reset(world, size, out_events);
        }
        Command::PaintTerrain { cell, terrain } => {
            let outcome = world.index(cell).ok_or(EditRejection::OutOfBounds).and_then(|index| {
                match world.endpoint_at(cell) {
                    Some(endpoint) => Err(EditRejection::ProtectedEndpoint(endpoint)),
                    None => Ok(index),
                }
            });

            match outcome {
                Ok(index) => {
                    world.terrain[index] = terrain;
                    out_events.push(Event::TerrainPainted { cell, terrain });
                }
                Err(reason) => {
                    debug!(%cell, %terrain, %reason, "terrain edit rejected");
                    out_events.push(Event::TerrainEditRejected {
                        cell,
                        terrain,
                        reason,
                    });
                }
            }
        }
        Command::PlaceEndpoint { endpoint, cell } => {
            let outcome = match world.index(cell) {
                None => Err(EditRejection::OutOfBounds),
                Some(index) if !world.terrain[index].is_passable() => Err(EditRejection::Water),
                Some(_) => Ok(()),
            };

            match outcome {
                Ok(()) => {
                    *world.endpoint_slot(endpoint) = Some(cell);
                    out_events.push(Event::EndpointPlaced { endpoint, cell });
                }
                Err(reason) => {
                    debug!(%endpoint, %cell, %reason, "endpoint placement rejected");
                    out_events.push(Event::EndpointRejected {
                        endpoint,
                        cell,
                        reason,
                    });
                }
            }
        }
    }
}

fn reset(world: &mut World, size: u32, out_events: &mut Vec<Event>) {
    *world = World::with_default_endpoints(size);
    out_events.push(Event::GridReset { size });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use terrain_route_core::{CellCoord, Endpoint, GridView, Terrain};

    /// Edge length of the square grid.
    #[must_use]
    pub fn size(world: &World) -> u32 {
        world.size
    }

    /// Captures a read-only terrain snapshot for systems.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(world.size, world.size, &world.terrain)
            .expect("world terrain always matches its edge length")
    }

    /// Terrain carried by the cell, or `None` outside the grid.
    #[must_use]
    pub fn terrain_of(world: &World, cell: CellCoord) -> Option<Terrain> {
        world
            .index(cell)
            .and_then(|offset| world.terrain.get(offset).copied())
    }

    /// Cell currently designated as the start, if any.
    #[must_use]
    pub fn start(world: &World) -> Option<CellCoord> {
        world.start
    }

    /// Cell currently designated as the goal, if any.
    #[must_use]
    pub fn goal(world: &World) -> Option<CellCoord> {
        world.goal
    }

    /// Cell currently carrying the provided designation, if any.
    #[must_use]
    pub fn endpoint(world: &World, endpoint: Endpoint) -> Option<CellCoord> {
        match endpoint {
            Endpoint::Start => world.start,
            Endpoint::Goal => world.goal,
        }
    }

    /// Designation carried by the cell, if any. Start wins when both coincide.
    #[must_use]
    pub fn endpoint_at(world: &World, cell: CellCoord) -> Option<Endpoint> {
        world.endpoint_at(cell)
    }
}
