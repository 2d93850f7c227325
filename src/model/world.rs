//! # World Description
//!
//! The world file is a JSON array of entities. An entity may carry a grid
//! position, a sprite reference and a terrain marker; only entities with all
//! three are terrain. Terrain is bucketed into square chunks of grid cells and
//! every chunk becomes one grouped model named `chunk_<cx>_<cz>`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_time::Instant;

use crate::config::CompilerConfig;
use crate::error::{MesherError, Result};
use crate::voxels::{group_volumes, GridPosition, PositionedVolume};

use super::ModelLibrary;

/// Reference from an entity to a sprite by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRef {
    /// File stem of the sprite image.
    pub name: String,
}

/// One entry of the world file. Unknown components are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    /// Grid position and rotation.
    #[serde(default)]
    pub position: Option<GridPosition>,
    /// The sprite drawn for this entity.
    #[serde(default)]
    pub sprite: Option<SpriteRef>,
    /// Terrain marker; any JSON-truthy value makes the entity terrain.
    #[serde(default)]
    pub terrain: Option<Value>,
}

impl WorldEntity {
    /// The position and sprite name if this entity is terrain.
    pub fn as_terrain(&self) -> Option<(GridPosition, &str)> {
        if !self.terrain.as_ref().is_some_and(is_truthy) {
            return None;
        }
        Some((self.position?, self.sprite.as_ref()?.name.as_str()))
    }
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The parsed world file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    entities: Vec<WorldEntity>,
}

/// A terrain entity reduced to what grouping needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainPiece {
    /// Grid position and rotation.
    pub position: GridPosition,
    /// Model to take the voxels from.
    pub sprite: String,
}

impl World {
    /// Reads a world file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let entities: Vec<WorldEntity> = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!("Loaded {} entities from {}", entities.len(), path.display());
        Ok(Self::from_entities(entities))
    }

    /// Wraps already parsed entities.
    pub fn from_entities(entities: Vec<WorldEntity>) -> Self {
        World { entities }
    }

    /// All entities in file order.
    pub fn entities(&self) -> &[WorldEntity] {
        &self.entities
    }

    /// Every sprite name referenced by any entity, sorted and de-duplicated.
    pub fn sprite_names(&self) -> Vec<String> {
        self.entities
            .iter()
            .filter_map(|entity| entity.sprite.as_ref())
            .map(|sprite| sprite.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Buckets terrain entities into chunks of `chunk_size × chunk_size` grid cells.
    ///
    /// Keys are `chunk_<cx>_<cz>` with `cx = floor(x / chunk_size)`, so negative
    /// positions land in negative chunks. Pieces keep file order within a chunk.
    pub fn terrain_chunks(&self, chunk_size: i32) -> BTreeMap<String, Vec<TerrainPiece>> {
        let mut chunks: BTreeMap<String, Vec<TerrainPiece>> = BTreeMap::new();
        for (position, sprite) in self.entities.iter().filter_map(WorldEntity::as_terrain) {
            chunks
                .entry(chunk_key(position, chunk_size))
                .or_default()
                .push(TerrainPiece {
                    position,
                    sprite: sprite.to_owned(),
                });
        }
        chunks
    }
}

/// Name of the chunk model containing `position`.
pub fn chunk_key(position: GridPosition, chunk_size: i32) -> String {
    format!(
        "chunk_{}_{}",
        position.x.div_euclid(chunk_size),
        position.z.div_euclid(chunk_size)
    )
}

/// Groups every terrain chunk into a single model and adds it to the library.
///
/// The sprite models must already be in the library.
///
/// # Returns
/// The number of chunk models added.
///
/// # Errors
/// * [`MesherError::MissingModel`] if a terrain entity's sprite was not loaded
/// * Any error of [`group_volumes`]
pub fn group_terrain(
    world: &World,
    library: &mut ModelLibrary,
    config: &CompilerConfig,
) -> Result<usize> {
    let start = Instant::now();
    let chunks = world.terrain_chunks(config.chunk_size as i32);

    for (key, pieces) in &chunks {
        let positioned = pieces
            .iter()
            .map(|piece| {
                let model = library
                    .get(&piece.sprite)
                    .ok_or_else(|| MesherError::MissingModel(piece.sprite.clone()))?;
                Ok(PositionedVolume {
                    position: piece.position,
                    volume: model.volume.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let grouped = group_volumes(&positioned, config.grid_size)?;
        let model = library.add_model(key.clone(), grouped.volume);
        debug!("Grouped {} pieces into {key}: {} faces", pieces.len(), model.faces.len());
    }

    info!("Grouped {} terrain chunks in {:?}", chunks.len(), start.elapsed());
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::voxels::{Rotation, VoxelVolume};

    fn entities(json: &str) -> World {
        World::from_entities(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parses_entities_and_ignores_other_components() {
        let world = entities(
            r#"[
                {"position": {"x": 1, "y": 0, "z": 2, "rotation": 3}, "sprite": {"name": "grass"}, "terrain": {}},
                {"sprite": {"name": "tree"}, "health": 10},
                {"camera": true}
            ]"#,
        );
        assert_eq!(world.entities().len(), 3);
        assert_eq!(
            world.entities()[0].position,
            Some(GridPosition::new(1, 0, 2, Rotation::Turn3))
        );
        assert_eq!(world.sprite_names(), vec!["grass", "tree"]);
    }

    #[test]
    fn rotation_defaults_to_zero() {
        let world = entities(r#"[{"position": {"x": 0, "y": 0, "z": 0}}]"#);
        assert_eq!(world.entities()[0].position.unwrap().rotation, Rotation::Turn0);
    }

    #[test]
    fn terrain_needs_a_truthy_marker() {
        let world = entities(
            r#"[
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "a"}, "terrain": true},
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "b"}, "terrain": false},
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "c"}, "terrain": 0},
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "d"}, "terrain": ""},
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "e"}, "terrain": null},
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "f"}, "terrain": "yes"},
                {"sprite": {"name": "g"}, "terrain": true}
            ]"#,
        );
        let chunks = world.terrain_chunks(10);
        let sprites: Vec<_> = chunks["chunk_0_0"].iter().map(|p| p.sprite.as_str()).collect();
        assert_eq!(sprites, vec!["a", "f"]);
    }

    #[test]
    fn chunk_keys_floor_negative_positions() {
        let at = |x, z| GridPosition::new(x, 0, z, Rotation::Turn0);
        assert_eq!(chunk_key(at(0, 0), 10), "chunk_0_0");
        assert_eq!(chunk_key(at(9, 19), 10), "chunk_0_1");
        assert_eq!(chunk_key(at(-1, -10), 10), "chunk_-1_-1");
        assert_eq!(chunk_key(at(-11, 10), 10), "chunk_-2_1");
    }

    #[test]
    fn groups_terrain_chunks_into_models() {
        let config = CompilerConfig {
            grid_size: 2,
            chunk_size: 10,
            ..CompilerConfig::default()
        };
        let mut library = ModelLibrary::new();
        let mut block = VoxelVolume::new(2).unwrap();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    block.populate(x, y, z, Color::new(1, 1, 1)).unwrap();
                }
            }
        }
        library.add_model("block", block);

        let world = entities(
            r#"[
                {"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "block"}, "terrain": true},
                {"position": {"x": 1, "y": 0, "z": 0}, "sprite": {"name": "block"}, "terrain": true},
                {"position": {"x": 20, "y": 0, "z": 0}, "sprite": {"name": "block"}, "terrain": true}
            ]"#,
        );

        assert_eq!(group_terrain(&world, &mut library, &config).unwrap(), 2);

        let pair = library.get("chunk_0_0").unwrap();
        assert_eq!(pair.volume.size(), 4);
        assert_eq!(pair.volume.len(), 16);
        // A 4 x 2 x 2 slab: one face per side.
        assert_eq!(pair.faces.len(), 6);
        assert_eq!(pair.faces.top_faces[0].width, 4);
        assert_eq!(pair.faces.top_faces[0].height, 2);

        assert_eq!(library.get("chunk_2_0").unwrap().volume.len(), 8);
    }

    #[test]
    fn missing_sprite_model_is_an_error() {
        let world = entities(
            r#"[{"position": {"x": 0, "y": 0, "z": 0}, "sprite": {"name": "ghost"}, "terrain": 1}]"#,
        );
        let mut library = ModelLibrary::new();
        let err = group_terrain(&world, &mut library, &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, MesherError::MissingModel(name) if name == "ghost"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        fs::write(&path, r#"[{"sprite": {"name": "x"}}]"#).unwrap();
        assert_eq!(World::load(&path).unwrap().sprite_names(), vec!["x"]);

        fs::write(&path, "not json").unwrap();
        assert!(matches!(World::load(&path), Err(MesherError::Json(_))));
    }
}
