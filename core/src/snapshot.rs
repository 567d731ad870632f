//! On-disk stage records, one JSON file per stage.

use std::io;
use std::path::{Path, PathBuf};

use stage_config::PersistenceConfig;
use stage_types::{StageId, StageRecord};
use stage_utils::{atomic_write, recover_bak_file};

use crate::SnapshotError;

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured snapshot directory, if one is set.
    #[must_use]
    pub fn from_config(config: &PersistenceConfig) -> Option<Self> {
        config.snapshot_dir().map(Self::new)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, id: StageId) -> PathBuf {
        self.dir.join(format!("stage-{id}.json"))
    }

    pub fn save(&self, record: &StageRecord) -> Result<PathBuf, SnapshotError> {
        let path = self.path_for(record.stage_id);
        let json = record.to_json()?;
        std::fs::create_dir_all(&self.dir).map_err(|source| io_error(&self.dir, source))?;
        atomic_write(&path, json.as_bytes()).map_err(|source| io_error(&path, source))?;
        tracing::debug!(path = %path.display(), "Saved stage record");
        Ok(path)
    }

    /// Read the record for `id`. A missing file is `Ok(None)`.
    pub fn load(&self, id: StageId) -> Result<Option<StageRecord>, SnapshotError> {
        let path = self.path_for(id);
        recover_bak_file(&path);

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(&path, source)),
        };
        StageRecord::from_json(&json)
            .map(Some)
            .map_err(|source| SnapshotError::Decode {
                path: path.display().to_string(),
                source,
            })
    }

    /// Delete the record for `id`. Returns whether a file was removed.
    pub fn remove(&self, id: StageId) -> Result<bool, SnapshotError> {
        let path = self.path_for(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(io_error(&path, source)),
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> SnapshotError {
    SnapshotError::Io {
        path: path.display().to_string(),
        source,
    }
}
