//! File-backed saved view store.
//!
//! One JSON document per store:
//! ```text
//! {
//!   "schema_version": 1,
//!   "views": { "<name>": { "molecule_id": ..., "camera": ..., "visibility": ... } }
//! }
//! ```
//! Writes go to a sibling `.tmp` file first and are renamed into place.

use ballstick_camera::Camera;
use ballstick_common::VisibilityMask;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: u32 = 1;

/// Errors from view store operations.
#[derive(Debug, thiserror::Error)]
pub enum ViewStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("unknown view: {0}")]
    UnknownView(String),
    #[error("view name must not be empty")]
    EmptyName,
}

/// A named camera pose plus the element visibility it was taken with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    #[serde(skip)]
    pub name: String,
    /// Library id of the molecule on screen, if any.
    #[serde(default)]
    pub molecule_id: Option<String>,
    pub camera: Camera,
    #[serde(default)]
    pub visibility: VisibilityMask,
}

impl SavedView {
    pub fn new(
        name: impl Into<String>,
        molecule_id: Option<String>,
        camera: Camera,
        visibility: VisibilityMask,
    ) -> Self {
        Self {
            name: name.into(),
            molecule_id,
            camera,
            visibility,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ViewFile {
    schema_version: u32,
    views: BTreeMap<String, SavedView>,
}

/// Saved views keyed by name, persisted to one JSON file.
///
/// Every mutation is written through before it returns.
#[derive(Debug)]
pub struct ViewStore {
    path: PathBuf,
    views: BTreeMap<String, SavedView>,
}

impl ViewStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ViewStoreError> {
        let path = path.as_ref().to_path_buf();
        let views = if path.exists() {
            let file: ViewFile = serde_json::from_reader(std::fs::File::open(&path)?)?;
            if file.schema_version != SCHEMA_VERSION {
                return Err(ViewStoreError::SchemaMismatch {
                    file_version: file.schema_version,
                    expected_version: SCHEMA_VERSION,
                });
            }
            file.views
                .into_iter()
                .map(|(name, mut view)| {
                    view.name = name.clone();
                    (name, view)
                })
                .collect()
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), views = views.len(), "view store opened");
        Ok(Self { path, views })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a view by name and write the store.
    pub fn put(&mut self, view: SavedView) -> Result<Option<SavedView>, ViewStoreError> {
        if view.name.trim().is_empty() {
            return Err(ViewStoreError::EmptyName);
        }
        tracing::debug!(name = %view.name, "saving view");
        let previous = self.views.insert(view.name.clone(), view);
        self.flush()?;
        Ok(previous)
    }

    pub fn get(&self, name: &str) -> Option<&SavedView> {
        self.views.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&SavedView, ViewStoreError> {
        self.get(name)
            .ok_or_else(|| ViewStoreError::UnknownView(name.to_string()))
    }

    /// Remove a view and write the store.
    pub fn remove(&mut self, name: &str) -> Result<SavedView, ViewStoreError> {
        let view = self
            .views
            .remove(name)
            .ok_or_else(|| ViewStoreError::UnknownView(name.to_string()))?;
        self.flush()?;
        tracing::debug!(%name, "view removed");
        Ok(view)
    }

    /// Views in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SavedView> {
        self.views.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn flush(&self) -> Result<(), ViewStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = ViewFile {
            schema_version: SCHEMA_VERSION,
            views: self.views.clone(),
        };
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        serde_json::to_writer_pretty(std::fs::File::create(&tmp)?, &file)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballstick_camera::NamedView;

    fn top_view() -> SavedView {
        let mut camera = Camera::new();
        camera.apply_view(NamedView::Top);
        camera.set_zoom(2.5);
        let mut visibility = VisibilityMask::all_visible();
        visibility.hide("H");
        SavedView::new("top-no-h", Some("water".into()), camera, visibility)
    }

    #[test]
    fn open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ViewStore::open(dir.path().join("views.json")).unwrap();
        assert!(store.is_empty());
        assert!(!dir.path().join("views.json").exists());
    }

    #[test]
    fn saved_views_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        {
            let mut store = ViewStore::open(&path).unwrap();
            assert!(store.put(top_view()).unwrap().is_none());
        }

        let store = ViewStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        let view = store.require("top-no-h").unwrap();
        assert_eq!(view, &top_view());
        assert_eq!(view.camera.zoom(), 2.5);
        assert!(!view.visibility.is_visible("H"));
    }

    #[test]
    fn put_replaces_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ViewStore::open(dir.path().join("views.json")).unwrap();
        store.put(top_view()).unwrap();
        let mut again = top_view();
        again.molecule_id = None;
        let previous = store.put(again).unwrap();
        assert_eq!(previous.unwrap().molecule_id.as_deref(), Some("water"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("views.json");
        let mut store = ViewStore::open(&path).unwrap();
        store.put(top_view()).unwrap();
        store.remove("top-no-h").unwrap();
        assert!(matches!(
            store.remove("top-no-h"),
            Err(ViewStoreError::UnknownView(_))
        ));
        assert!(ViewStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn rejects_empty_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ViewStore::open(dir.path().join("views.json")).unwrap();
        let mut view = top_view();
        view.name = "  ".into();
        assert!(matches!(store.put(view), Err(ViewStoreError::EmptyName)));
    }

    #[test]
    fn schema_mismatch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        std::fs::write(&path, r#"{"schema_version": 99, "views": {}}"#).unwrap();
        assert!(matches!(
            ViewStore::open(&path),
            Err(ViewStoreError::SchemaMismatch {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_zoom_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        std::fs::write(
            &path,
            r#"{"schema_version": 1, "views": {"far": {
                "camera": {"rotation_x": 0.0, "rotation_y": 0.0, "zoom": 40.0}}}}"#,
        )
        .unwrap();
        let store = ViewStore::open(&path).unwrap();
        let view = store.require("far").unwrap();
        assert_eq!(view.name, "far");
        assert_eq!(view.camera.zoom(), ballstick_camera::MAX_ZOOM);
        assert!(view.molecule_id.is_none());
    }
}
