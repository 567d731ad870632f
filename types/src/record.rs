//! Persisted stack shape.

use serde::{Deserialize, Serialize};

use crate::{SceneTag, StageId};

/// Minimal state a stage needs to rebuild its stack after a restart.
///
/// Only the shape is stored: scene content is the host's business, and the
/// host re-associates every tag with a live instance after restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage_id: StageId,
    pub tag_list: Vec<SceneTag>,
    pub next_id: u32,
}

impl StageRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
