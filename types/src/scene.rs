//! Scene identity, launch policy and argument bags.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of a scene implementation.
///
/// Scene types are compared by name; hierarchy-aware matching is layered on
/// top by the scene registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneType(Cow<'static, str>);

impl SceneType {
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SceneType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SceneType {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for SceneType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Push policy of a scene type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Every push creates a new instance.
    #[default]
    Standard,
    /// A push onto a matching top reuses it.
    SingleTop,
    /// A push pops back to the first matching instance in the stack.
    SingleTask,
}

impl LaunchMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Standard => "standard",
            LaunchMode::SingleTop => "single_top",
            LaunchMode::SingleTask => "single_task",
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown launch mode `{0}` (expected standard, single_top or single_task)")]
pub struct ParseLaunchModeError(String);

impl FromStr for LaunchMode {
    type Err = ParseLaunchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(LaunchMode::Standard),
            "single_top" => Ok(LaunchMode::SingleTop),
            "single_task" => Ok(LaunchMode::SingleTask),
            _ => Err(ParseLaunchModeError(s.to_string())),
        }
    }
}

/// String-keyed arguments handed to a scene on creation or reuse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneArgs(Map<String, Value>);

impl SceneArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for SceneArgs {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}
