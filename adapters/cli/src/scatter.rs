//! Seeded terrain scattering for freshly created maps.

use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terrain_route_core::{Command, Event, Terrain};
use terrain_route_world::{self as world, query, World};

/// Relative frequency of each terrain, in [`Terrain::ALL`] order.
const TERRAIN_WEIGHTS: [u32; 5] = [10, 50, 20, 12, 8];

/// Repaints every cell except the start and goal with terrain drawn from `seed`.
///
/// Returns the number of cells painted. Identical seeds on identical grids
/// always produce identical maps.
pub(crate) fn scatter_terrain(world: &mut World, seed: u64) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let weights = match WeightedIndex::new(TERRAIN_WEIGHTS) {
        Ok(weights) => weights,
        Err(_) => return 0,
    };

    let cells: Vec<_> = query::grid_view(world)
        .cells()
        .map(|(cell, _)| cell)
        .filter(|&cell| query::endpoint_at(world, cell).is_none())
        .collect();

    let mut events = Vec::with_capacity(cells.len());
    for cell in cells {
        let terrain = Terrain::ALL[weights.sample(&mut rng)];
        world::apply(world, Command::PaintTerrain { cell, terrain }, &mut events);
    }

    events
        .iter()
        .filter(|event| matches!(event, Event::TerrainPainted { .. }))
        .count()
}
