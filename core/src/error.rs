use stage_types::{SceneType, StageId};
use thiserror::Error;

/// Configuration and integration errors. None of these are retried.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("scene type `{0}` has no registered launch mode")]
    UnregisteredSceneType(SceneType),
    #[error("scene type `{0}` has no registered factory")]
    MissingFactory(SceneType),
    #[error("stage id {0} is already registered")]
    StageIdInUse(StageId),
    #[error("stage id {0} is not a valid stage identifier")]
    InvalidStageId(StageId),
    #[error("stage state can only be restored before the first mutation")]
    RestoreAfterMutation,
    #[error("stage {0} has finished")]
    StageFinished(StageId),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot at {path} is not a valid stage record: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode stage record: {0}")]
    Encode(#[from] serde_json::Error),
}
