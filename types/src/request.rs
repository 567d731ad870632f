//! Result requests between scenes.

use serde::{Deserialize, Serialize};

use crate::{SceneArgs, SceneTag};

/// Who must receive the result of a scene when it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub requester: SceneTag,
    pub request_code: i32,
}

impl PendingRequest {
    #[must_use]
    pub fn new(requester: SceneTag, request_code: i32) -> Self {
        Self {
            requester,
            request_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    #[default]
    Canceled,
}

/// Payload a finishing scene hands back to its requester.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneResult {
    pub code: ResultCode,
    pub data: Option<SceneArgs>,
}

impl SceneResult {
    #[must_use]
    pub fn ok(data: Option<SceneArgs>) -> Self {
        Self {
            code: ResultCode::Ok,
            data,
        }
    }

    #[must_use]
    pub fn canceled() -> Self {
        Self::default()
    }
}
