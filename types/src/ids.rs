use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a scene instance within one stage.
///
/// Tags are the decimal rendering of a [`TagIdGenerator`] counter and are
/// persisted verbatim, so a tag stays valid across a restart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneTag(String);

impl SceneTag {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SceneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SceneTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SceneTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Identifier of a stage (one host window owning one scene stack).
///
/// `-1` is reserved for "not registered yet" so the persisted record keeps a
/// plain integer in that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(i32);

impl StageId {
    pub const INVALID: StageId = StageId(-1);

    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl Default for StageId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of scene tags.
///
/// The counter is what gets persisted as `next_id`; seeding it from a record
/// resumes allocation where the previous process stopped.
#[derive(Debug, Clone, Default)]
pub struct TagIdGenerator {
    next: u32,
}

impl TagIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seeded(next: u32) -> Self {
        Self { next }
    }

    /// The id the next call to [`Self::next_tag`] will start from.
    #[must_use]
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn seed(&mut self, next: u32) {
        self.next = next;
    }

    /// Allocate the next tag, skipping any tag for which `in_use` is true.
    ///
    /// A record with a stale `next_id` must not hand out a tag that is still
    /// live in the restored stack.
    pub fn next_tag(&mut self, in_use: impl Fn(&SceneTag) -> bool) -> SceneTag {
        loop {
            let tag = SceneTag(self.next.to_string());
            self.next = self.next.wrapping_add(1);
            if !in_use(&tag) {
                return tag;
            }
        }
    }
}
