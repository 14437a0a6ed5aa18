#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use terrain_route_core::{CellCoord, Command, Endpoint, Event, GridSizeError, Terrain};
use terrain_route_world::{self as world, query, World};
use tracing::warn;

/// JSON document exchanged through map files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapDocument {
    /// Edge length of the square grid. Missing or zero falls back to the caller's size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) size: Option<u32>,
    /// Start designation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) start: Option<DocumentCoord>,
    /// Goal designation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) goal: Option<DocumentCoord>,
    /// Terrain assignments in application order.
    #[serde(default)]
    pub(crate) cells: Vec<DocumentCell>,
}

/// Cell coordinates as written in a document. Negative values are tolerated and skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DocumentCoord {
    /// Row index.
    pub(crate) r: i64,
    /// Column index.
    pub(crate) c: i64,
}

impl DocumentCoord {
    fn to_cell(self) -> Option<CellCoord> {
        let row = u32::try_from(self.r).ok()?;
        let column = u32::try_from(self.c).ok()?;
        Some(CellCoord::new(row, column))
    }
}

impl From<CellCoord> for DocumentCoord {
    fn from(cell: CellCoord) -> Self {
        Self {
            r: i64::from(cell.row()),
            c: i64::from(cell.column()),
        }
    }
}

/// Terrain assignment for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DocumentCell {
    /// Row index.
    pub(crate) r: i64,
    /// Column index.
    pub(crate) c: i64,
    /// Terrain of the cell. Missing or unrecognised values read as grass.
    #[serde(default, deserialize_with = "lenient_terrain")]
    pub(crate) terrain: Terrain,
}

/// World rebuilt from a document together with the edits it produced.
#[derive(Debug)]
pub(crate) struct ImportedMap {
    /// Rebuilt grid.
    pub(crate) world: World,
    /// Events emitted while replaying the document.
    pub(crate) events: Vec<Event>,
    /// Number of cell entries ignored because they fall outside the grid.
    pub(crate) skipped_cells: usize,
}

impl MapDocument {
    /// Captures every cell of the world in row-major order.
    #[must_use]
    pub(crate) fn from_world(world: &World) -> Self {
        let cells = query::grid_view(world)
            .cells()
            .map(|(cell, terrain)| DocumentCell {
                r: i64::from(cell.row()),
                c: i64::from(cell.column()),
                terrain,
            })
            .collect();

        Self {
            size: Some(query::size(world)),
            start: query::start(world).map(DocumentCoord::from),
            goal: query::goal(world).map(DocumentCoord::from),
            cells,
        }
    }

    /// Encodes the document as pretty-printed JSON.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        serde_json::to_string_pretty(self).expect("map document serialization never fails")
    }

    /// Parses a document from JSON text.
    pub(crate) fn decode(value: &str) -> Result<Self, MapTransferError> {
        if value.trim().is_empty() {
            return Err(MapTransferError::EmptyPayload);
        }

        serde_json::from_str(value).map_err(MapTransferError::InvalidPayload)
    }

    /// Replays the document onto a blank grid.
    ///
    /// Terrain is applied first, then the start and goal designations through
    /// the same validated path interactive edits use, so an endpoint sitting on
    /// water stays unset.
    pub(crate) fn into_world(self, fallback_size: u32) -> Result<ImportedMap, MapTransferError> {
        let size = self.size.filter(|&size| size > 0).unwrap_or(fallback_size);
        let mut world = World::blank(size).map_err(MapTransferError::UnsupportedSize)?;
        let mut events = Vec::new();
        let mut skipped_cells = 0;

        for entry in self.cells {
            let coord = DocumentCoord {
                r: entry.r,
                c: entry.c,
            };
            let Some(cell) = coord
                .to_cell()
                .filter(|cell| cell.row() < size && cell.column() < size)
            else {
                skipped_cells += 1;
                continue;
            };

            world::apply(
                &mut world,
                Command::PaintTerrain {
                    cell,
                    terrain: entry.terrain,
                },
                &mut events,
            );
        }

        for (endpoint, coord) in [(Endpoint::Start, self.start), (Endpoint::Goal, self.goal)] {
            let Some(coord) = coord else {
                continue;
            };
            let Some(cell) = coord.to_cell() else {
                warn!(%endpoint, row = coord.r, column = coord.c, "ignoring negative endpoint");
                continue;
            };

            world::apply(&mut world, Command::PlaceEndpoint { endpoint, cell }, &mut events);
        }

        Ok(ImportedMap {
            world,
            events,
            skipped_cells,
        })
    }
}

/// Parses `value` and rebuilds the grid it describes.
pub(crate) fn import(value: &str, fallback_size: u32) -> Result<ImportedMap, MapTransferError> {
    MapDocument::decode(value)?.into_world(fallback_size)
}

/// Serialises the world into map document JSON.
#[must_use]
pub(crate) fn export(world: &World) -> String {
    MapDocument::from_world(world).encode()
}

fn lenient_terrain<'de, D>(deserializer: D) -> Result<Terrain, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|name| name.parse().ok())
        .unwrap_or_default())
}

/// Errors that can occur while importing map documents.
#[derive(Debug)]
pub(crate) enum MapTransferError {
    /// The provided text was empty or contained only whitespace.
    EmptyPayload,
    /// The text is not a structurally valid map document.
    InvalidPayload(serde_json::Error),
    /// The document describes a grid size outside the supported range.
    UnsupportedSize(GridSizeError),
}

impl fmt::Display for MapTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "map file was empty"),
            Self::InvalidPayload(error) => write!(f, "could not parse map file: {error}"),
            Self::UnsupportedSize(error) => write!(f, "map file is not usable: {error}"),
        }
    }
}

impl Error for MapTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPayload(error) => Some(error),
            Self::UnsupportedSize(error) => Some(error),
            Self::EmptyPayload => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_route_core::{EditRejection, PathResult};
    use terrain_route_system_pathfinding::find_path;

    #[test]
    fn export_lists_every_cell_row_major() {
        let mut world = World::blank(2).expect("size within range");
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PaintTerrain {
                cell: CellCoord::new(1, 0),
                terrain: Terrain::Water,
            },
            &mut events,
        );

        let document = MapDocument::from_world(&world);

        assert_eq!(document.size, Some(2));
        assert_eq!(document.start, None);
        let listed: Vec<_> = document
            .cells
            .iter()
            .map(|cell| (cell.r, cell.c, cell.terrain))
            .collect();
        assert_eq!(
            listed,
            vec![
                (0, 0, Terrain::Grass),
                (0, 1, Terrain::Grass),
                (1, 0, Terrain::Water),
                (1, 1, Terrain::Grass),
            ]
        );
        assert!(!export(&world).contains("\"start\""));
    }

    #[test]
    fn exported_map_reimports_identically() {
        let mut world = World::new();
        let mut events = Vec::new();
        for (cell, terrain) in [
            (CellCoord::new(3, 4), Terrain::Forest),
            (CellCoord::new(5, 1), Terrain::Water),
            (CellCoord::new(0, 9), Terrain::Road),
        ] {
            world::apply(&mut world, Command::PaintTerrain { cell, terrain }, &mut events);
        }

        let imported = import(&export(&world), 10).expect("exported map imports");

        assert_eq!(imported.world, world);
        assert_eq!(imported.skipped_cells, 0);
    }

    #[test]
    fn import_applies_lenient_rules() {
        let text = r#"{
            "size": 3,
            "start": {"r": 0, "c": 0},
            "goal": {"r": 2, "c": 2},
            "cells": [
                {"r": 0, "c": 0, "terrain": "road"},
                {"r": 0, "c": 1, "terrain": "lava"},
                {"r": 1, "c": 1},
                {"r": 2, "c": 1, "terrain": 7},
                {"r": 1, "c": 0, "terrain": "forest"},
                {"r": -1, "c": 0, "terrain": "water"},
                {"r": 5, "c": 5, "terrain": "water"}
            ]
        }"#;

        let imported = import(text, 10).expect("document parses");
        let world = &imported.world;

        assert_eq!(query::size(world), 3);
        assert_eq!(imported.skipped_cells, 2);
        assert_eq!(
            query::terrain_of(world, CellCoord::new(0, 0)),
            Some(Terrain::Road),
            "terrain is applied before endpoints are designated",
        );
        assert_eq!(query::terrain_of(world, CellCoord::new(0, 1)), Some(Terrain::Grass));
        assert_eq!(query::terrain_of(world, CellCoord::new(1, 0)), Some(Terrain::Forest));
        assert_eq!(query::terrain_of(world, CellCoord::new(2, 1)), Some(Terrain::Grass));
        assert_eq!(query::start(world), Some(CellCoord::new(0, 0)));
        assert_eq!(query::goal(world), Some(CellCoord::new(2, 2)));
    }

    #[test]
    fn import_rejects_endpoint_on_water() {
        let text = r#"{
            "size": 2,
            "start": {"r": 0, "c": 0},
            "goal": {"r": 1, "c": 1},
            "cells": [{"r": 1, "c": 1, "terrain": "water"}]
        }"#;

        let imported = import(text, 10).expect("document parses");

        assert_eq!(query::start(&imported.world), Some(CellCoord::new(0, 0)));
        assert_eq!(query::goal(&imported.world), None);
        assert!(imported.events.contains(&Event::EndpointRejected {
            endpoint: Endpoint::Goal,
            cell: CellCoord::new(1, 1),
            reason: EditRejection::Water,
        }));
    }

    #[test]
    fn import_uses_fallback_size_when_missing() {
        let imported = import(r#"{"cells": []}"#, 4).expect("document parses");

        assert_eq!(query::size(&imported.world), 4);
        assert_eq!(query::start(&imported.world), None);
    }

    #[test]
    fn import_reports_malformed_documents() {
        assert!(matches!(import("   ", 10), Err(MapTransferError::EmptyPayload)));
        assert!(matches!(
            import("{\"size\": ", 10),
            Err(MapTransferError::InvalidPayload(_))
        ));
        assert!(matches!(
            import(r#"{"cells": "nope"}"#, 10),
            Err(MapTransferError::InvalidPayload(_))
        ));
        assert!(matches!(
            import(r#"{"size": 61}"#, 10),
            Err(MapTransferError::UnsupportedSize(GridSizeError { size: 61 }))
        ));
    }

    #[test]
    fn engine_runs_on_imported_map() {
        let text = r#"{
            "size": 3,
            "start": {"r": 0, "c": 0},
            "goal": {"r": 0, "c": 2},
            "cells": [
                {"r": 0, "c": 1, "terrain": "water"},
                {"r": 1, "c": 1, "terrain": "water"},
                {"r": 2, "c": 1, "terrain": "water"}
            ]
        }"#;

        let imported = import(text, 10).expect("document parses");
        let world = &imported.world;
        let result = find_path(query::grid_view(world), query::start(world), query::goal(world));

        assert_eq!(result, Ok(PathResult::NotFound));
    }
}
