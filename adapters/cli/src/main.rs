#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for editing terrain maps and finding routes across them.

mod config;
mod map_transfer;
mod scatter;
mod terminal;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use terrain_route_core::{CellCoord, Command, Endpoint, Event, PathResult, Terrain};
use terrain_route_rendering::{describe_event, explain_outcome, play_reveal, Scene};
use terrain_route_system_pathfinding::find_path;
use terrain_route_world::{self as world, query, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::{config::RouteConfig, terminal::TerminalBackend};

const DEFAULT_LOG_DIRECTIVE: &str = "terrain_route=info";

#[derive(Debug, Parser)]
#[command(
    name = "terrain-route",
    version,
    about = "Edit terrain maps and find the cheapest route across them"
)]
struct Cli {
    /// Configuration file (defaults to ./terrain-route.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Write a fresh all-grass map
    New {
        /// Edge length of the square grid
        #[arg(long)]
        size: Option<u32>,
        /// Scatter pseudo-random terrain generated from this seed
        #[arg(long, value_name = "SEED")]
        scatter: Option<u64>,
        /// Destination file; prints to stdout when omitted
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Render a map as text
    Show {
        /// Map file to render
        map: PathBuf,
    },
    /// Apply edits to a map
    Edit(EditArgs),
    /// Find the cheapest route between start and goal
    Find {
        /// Map file to search
        map: PathBuf,
        /// Reveal the route one cell at a time
        #[arg(long)]
        animate: bool,
        /// Only print the explanation
        #[arg(long)]
        no_grid: bool,
    },
}

/// Edits are applied in field order.
#[derive(Debug, clap::Args)]
struct EditArgs {
    /// Map file to edit
    map: PathBuf,
    /// Reset every cell to grass and restore the default endpoints
    #[arg(long)]
    clear: bool,
    /// Recreate the grid with a new edge length
    #[arg(long, value_name = "N")]
    resize: Option<u32>,
    /// Paint a cell, e.g. `3,4=forest`
    #[arg(long, value_name = "R,C=TERRAIN", value_parser = parse_paint)]
    paint: Vec<PaintSpec>,
    /// Reset a cell to grass
    #[arg(long, value_name = "R,C", value_parser = parse_cell)]
    erase: Vec<CellCoord>,
    /// Move the start designation
    #[arg(long, value_name = "R,C", value_parser = parse_cell)]
    start: Option<CellCoord>,
    /// Move the goal designation
    #[arg(long, value_name = "R,C", value_parser = parse_cell)]
    goal: Option<CellCoord>,
    /// Destination file; overwrites MAP when omitted
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl EditArgs {
    fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.clear {
            commands.push(Command::ClearGrid);
        }
        if let Some(size) = self.resize {
            commands.push(Command::ResetGrid { size });
        }
        commands.extend(self.paint.iter().map(|spec| Command::PaintTerrain {
            cell: spec.cell,
            terrain: spec.terrain,
        }));
        commands.extend(self.erase.iter().map(|&cell| Command::PaintTerrain {
            cell,
            terrain: Terrain::Grass,
        }));
        commands.extend(self.start.map(|cell| Command::PlaceEndpoint {
            endpoint: Endpoint::Start,
            cell,
        }));
        commands.extend(self.goal.map(|cell| Command::PlaceEndpoint {
            endpoint: Endpoint::Goal,
            cell,
        }));
        commands
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PaintSpec {
    cell: CellCoord,
    terrain: Terrain,
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected R,C but found '{value}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row '{}'", row.trim()))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column.trim()))?;
    Ok(CellCoord::new(row, column))
}

fn parse_paint(value: &str) -> Result<PaintSpec, String> {
    let (cell, terrain) = value
        .split_once('=')
        .ok_or_else(|| format!("expected R,C=TERRAIN but found '{value}'"))?;
    let cell = parse_cell(cell)?;
    let terrain = terrain
        .trim()
        .parse()
        .map_err(|error: terrain_route_core::UnknownTerrain| error.to_string())?;
    Ok(PaintSpec { cell, terrain })
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = RouteConfig::load(cli.config.as_deref())?;

    match cli.action {
        Action::New {
            size,
            scatter,
            output,
        } => create_map(&config, size, scatter, output.as_deref()),
        Action::Show { map } => show_map(&config, &map),
        Action::Edit(args) => edit_map(&config, &args),
        Action::Find {
            map,
            animate,
            no_grid,
        } => find_route(&config, &map, animate, !no_grid && config.render.show_grid),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn create_map(
    config: &RouteConfig,
    size: Option<u32>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let size = size.unwrap_or(config.grid.default_size);
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ResetGrid { size }, &mut events);
    if let Some(rejected) = events
        .iter()
        .find(|event| matches!(event, Event::GridResizeRejected { .. }))
    {
        bail!(describe_event(rejected));
    }

    if let Some(seed) = seed {
        let painted = scatter::scatter_terrain(&mut world, seed);
        info!(seed, painted, "scattered terrain");
    }

    write_map(&world, output)
}

fn show_map(config: &RouteConfig, map: &Path) -> Result<()> {
    let world = load_map(config, map)?;
    println!("{}", scene(&world).render());
    Ok(())
}

fn edit_map(config: &RouteConfig, args: &EditArgs) -> Result<()> {
    let mut world = load_map(config, &args.map)?;
    let mut events = Vec::new();
    for command in args.commands() {
        world::apply(&mut world, command, &mut events);
    }

    for event in &events {
        println!("{}", describe_event(event));
    }

    write_map(&world, Some(args.output.as_deref().unwrap_or(args.map.as_path())))
}

fn find_route(config: &RouteConfig, map: &Path, animate: bool, show_grid: bool) -> Result<()> {
    let world = load_map(config, map)?;
    let outcome = find_path(
        query::grid_view(&world),
        query::start(&world),
        query::goal(&world),
    );
    println!("{}", explain_outcome(&outcome));

    if !show_grid {
        return Ok(());
    }

    let route = outcome.as_ref().ok().and_then(PathResult::route);
    match route {
        Some(route) if animate => {
            println!();
            let mut backend = TerminalBackend::new(io::stdout().lock());
            play_reveal(
                &mut backend,
                scene(&world),
                route,
                config.animation.cadence(),
            )
        }
        Some(route) => {
            println!("\n{}", scene(&world).with_path(route.cells()).render());
            Ok(())
        }
        None => {
            println!("\n{}", scene(&world).render());
            Ok(())
        }
    }
}

fn scene(world: &World) -> Scene<'_> {
    Scene::new(
        query::grid_view(world),
        query::start(world),
        query::goal(world),
    )
}

fn load_map(config: &RouteConfig, path: &Path) -> Result<World> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    let imported = map_transfer::import(&text, config.grid.default_size)
        .with_context(|| format!("failed to import map {}", path.display()))?;

    if imported.skipped_cells > 0 {
        warn!(
            skipped = imported.skipped_cells,
            "ignored cells outside the grid"
        );
    }
    for event in imported.events.iter().filter(|event| {
        matches!(
            event,
            Event::TerrainEditRejected { .. } | Event::EndpointRejected { .. }
        )
    }) {
        warn!("{}", describe_event(event));
    }

    Ok(imported.world)
}

fn write_map(world: &World, output: Option<&Path>) -> Result<()> {
    let document = map_transfer::export(world);
    match output {
        Some(path) => {
            fs::write(path, document + "\n")
                .with_context(|| format!("failed to write map {}", path.display()))?;
            info!(path = %path.display(), size = query::size(world), "wrote map");
        }
        None => println!("{document}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_arguments_accept_padding() {
        assert_eq!(parse_cell("3, 4"), Ok(CellCoord::new(3, 4)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("-1,4").is_err());
    }

    #[test]
    fn paint_arguments_name_terrain_case_insensitively() {
        assert_eq!(
            parse_paint("1,2=Mountain"),
            Ok(PaintSpec {
                cell: CellCoord::new(1, 2),
                terrain: Terrain::Mountain,
            })
        );
        assert!(parse_paint("1,2=lava").is_err());
        assert!(parse_paint("1,2").is_err());
    }

    #[test]
    fn edit_commands_follow_documented_order() {
        let cli = Cli::try_parse_from([
            "terrain-route",
            "edit",
            "map.json",
            "--goal",
            "4,4",
            "--erase",
            "2,2",
            "--paint",
            "1,1=water",
            "--start",
            "0,1",
            "--resize",
            "5",
            "--clear",
        ])
        .expect("arguments parse");
        let Action::Edit(args) = cli.action else {
            panic!("expected edit subcommand");
        };

        assert_eq!(
            args.commands(),
            vec![
                Command::ClearGrid,
                Command::ResetGrid { size: 5 },
                Command::PaintTerrain {
                    cell: CellCoord::new(1, 1),
                    terrain: Terrain::Water,
                },
                Command::PaintTerrain {
                    cell: CellCoord::new(2, 2),
                    terrain: Terrain::Grass,
                },
                Command::PlaceEndpoint {
                    endpoint: Endpoint::Start,
                    cell: CellCoord::new(0, 1),
                },
                Command::PlaceEndpoint {
                    endpoint: Endpoint::Goal,
                    cell: CellCoord::new(4, 4),
                },
            ]
        );
    }

    #[test]
    fn config_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["terrain-route", "show", "map.json", "--config", "alt.toml"])
            .expect("arguments parse");

        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }
}
