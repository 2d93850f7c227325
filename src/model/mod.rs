//! # Model Library
//!
//! A model is a named, meshed voxel volume. The [`ModelLibrary`] owns every
//! model produced during a compile run and writes their face lists out as the
//! JSON files the renderer loads.
//!
//! ## Lifecycle
//! 1. Sprites are decoded and meshed into models, one per sprite name
//! 2. Terrain chunks are grouped from those models and added as new models
//! 3. [`ModelLibrary::save_models`] writes `<name>.json` for every model

pub mod world;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use web_time::Instant;

use crate::error::Result;
use crate::meshing::{voxels_to_faces, Faces};
use crate::sprite::Sprite;
use crate::voxels::VoxelVolume;

/// File extension of sprite images.
pub const SPRITE_EXTENSION: &str = "png";

/// File extension of compiled models.
pub const MODEL_EXTENSION: &str = "json";

/// A named voxel volume together with its merged faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Name the model is saved and looked up under.
    pub name: String,
    /// The voxels, with visibility computed.
    pub volume: VoxelVolume,
    /// The merged faces of `volume`.
    pub faces: Faces,
}

impl Model {
    /// Meshes `volume` and wraps it as a model.
    pub fn new(name: impl Into<String>, mut volume: VoxelVolume) -> Self {
        let faces = voxels_to_faces(&mut volume);
        Model {
            name: name.into(),
            volume,
            faces,
        }
    }

    /// Loads `slices_dir/<name>.png`, decodes it and meshes it.
    ///
    /// # Errors
    /// Any error of [`Sprite::load`] or [`Sprite::to_volume`].
    pub fn from_sprite_file(name: &str, slices_dir: &Path) -> Result<Self> {
        let start = Instant::now();
        let path = slices_dir.join(format!("{name}.{SPRITE_EXTENSION}"));
        let volume = Sprite::load(&path)?.to_volume()?;
        let model = Model::new(name, volume);

        debug!(
            "Loaded model {name}: {} voxels, {} faces in {:?}",
            model.volume.len(),
            model.faces.len(),
            start.elapsed()
        );

        Ok(model)
    }
}

/// All models of a compile run, keyed by name.
///
/// Names are kept sorted so saving and listing are deterministic.
#[derive(Debug, Default)]
pub struct ModelLibrary {
    models: BTreeMap<String, Model>,
}

impl ModelLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes `volume` and stores it under `name`, replacing any previous model.
    ///
    /// # Returns
    /// The stored model.
    pub fn add_model(&mut self, name: impl Into<String>, volume: VoxelVolume) -> &Model {
        self.insert(Model::new(name, volume))
    }

    /// Stores an already meshed model, replacing any previous one of that name.
    pub fn insert(&mut self, model: Model) -> &Model {
        let name = model.name.clone();
        self.models.insert(name.clone(), model);
        &self.models[&name]
    }

    /// Looks a model up by name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// `true` when the library holds no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Iterates over the models in name order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Total number of faces over every model.
    pub fn face_count(&self) -> usize {
        self.models.values().map(|model| model.faces.len()).sum()
    }

    /// Loads, decodes and meshes the sprite `slices_dir/<name>.png`.
    pub fn load_model(&mut self, name: &str, slices_dir: impl AsRef<Path>) -> Result<&Model> {
        let model = Model::from_sprite_file(name, slices_dir.as_ref())?;
        Ok(self.insert(model))
    }

    /// Writes every model's faces to `dir/<name>.json` as pretty-printed JSON.
    ///
    /// The directory is created if it does not exist.
    pub fn save_models(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for model in self.models.values() {
            let path = dir.join(format!("{}.{MODEL_EXTENSION}", model.name));
            let json = serde_json::to_string_pretty(&model.faces)?;
            fs::write(&path, json)?;
            debug!("Wrote {}", path.display());
        }

        info!("Saved {} models to {}", self.models.len(), dir.display());
        Ok(())
    }
}

/// Deletes every file in `dir`, creating the directory if it is missing.
///
/// Subdirectories are left alone.
///
/// # Returns
/// The number of files removed.
pub fn clean_directory(dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    debug!("Removed {removed} files from {}", dir.display());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::MesherError;

    fn dot(size: usize) -> VoxelVolume {
        let mut volume = VoxelVolume::new(size).unwrap();
        volume.populate(0, 0, 0, Color::new(9, 8, 7)).unwrap();
        volume
    }

    #[test]
    fn add_model_meshes_and_replaces() {
        let mut library = ModelLibrary::new();
        assert!(library.is_empty());

        assert_eq!(library.add_model("tree", dot(2)).faces.len(), 6);
        library.add_model("tree", VoxelVolume::new(2).unwrap());

        assert_eq!(library.len(), 1);
        assert!(library.get("tree").unwrap().faces.is_empty());
        assert!(library.get("rock").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let mut library = ModelLibrary::new();
        for name in ["b", "c", "a"] {
            library.add_model(name, dot(1));
        }
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(library.face_count(), 18);
    }

    #[test]
    fn saves_one_json_file_per_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = ModelLibrary::new();
        library.add_model("dot", dot(2));
        library.add_model("nothing", VoxelVolume::new(2).unwrap());

        library.save_models(dir.path().join("compiled")).unwrap();

        let text = fs::read_to_string(dir.path().join("compiled/dot.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json["leftFaces"][0],
            serde_json::json!({
                "x": 0, "y": 0, "z": 0, "width": 1, "height": 1, "r": 9, "g": 8, "b": 7
            })
        );
        assert!(text.contains('\n'), "output should be pretty-printed");

        let empty: Faces =
            serde_json::from_str(&fs::read_to_string(dir.path().join("compiled/nothing.json")).unwrap())
                .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn load_model_reads_slices_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = image::RgbaImage::new(2, 4);
        image.put_pixel(1, 1, image::Rgba([200, 100, 50, 255]));
        image.save(dir.path().join("crate.png")).unwrap();

        let mut library = ModelLibrary::new();
        let model = library.load_model("crate", dir.path()).unwrap();
        assert_eq!(model.volume.color(1, 1, 1), Some(Color::new(200, 100, 50)));
        assert_eq!(model.faces.len(), 6);

        let err = library.load_model("missing", dir.path()).unwrap_err();
        assert!(matches!(err, MesherError::Image { .. }));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn clean_directory_removes_only_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("compiled");
        assert_eq!(clean_directory(&out).unwrap(), 0);

        fs::write(out.join("old.json"), "{}").unwrap();
        fs::write(out.join("older.json"), "{}").unwrap();
        fs::create_dir(out.join("keep")).unwrap();

        assert_eq!(clean_directory(&out).unwrap(), 2);
        let left: Vec<_> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(left, vec![std::ffi::OsString::from("keep")]);
    }
}
