//! Ordered scene entries. The last entry is the visible top.

use stage_types::{PendingRequest, SceneTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    tag: SceneTag,
    pending_request: Option<PendingRequest>,
}

impl SceneEntry {
    #[must_use]
    pub fn new(tag: SceneTag) -> Self {
        Self {
            tag,
            pending_request: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &SceneTag {
        &self.tag
    }

    #[must_use]
    pub fn pending_request(&self) -> Option<&PendingRequest> {
        self.pending_request.as_ref()
    }

    pub(crate) fn set_pending_request(&mut self, request: PendingRequest) {
        self.pending_request = Some(request);
    }

    pub(crate) fn take_pending_request(&mut self) -> Option<PendingRequest> {
        self.pending_request.take()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneStack {
    entries: Vec<SceneEntry>,
}

impl SceneStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tags(tags: impl IntoIterator<Item = SceneTag>) -> Self {
        Self {
            entries: tags.into_iter().map(SceneEntry::new).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&SceneEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SceneEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn index_of(&self, tag: &SceneTag) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == *tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &SceneTag) -> bool {
        self.index_of(tag).is_some()
    }

    #[must_use]
    pub fn find(&self, tag: &SceneTag) -> Option<&SceneEntry> {
        self.entries.iter().find(|entry| entry.tag == *tag)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<SceneTag> {
        self.entries.iter().map(|entry| entry.tag.clone()).collect()
    }

    pub(crate) fn push(&mut self, entry: SceneEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, index: usize) -> SceneEntry {
        self.entries.remove(index)
    }

    /// Keep entries `0..len`, returning everything above in stack order.
    pub(crate) fn truncate(&mut self, len: usize) -> Vec<SceneEntry> {
        if len >= self.entries.len() {
            return Vec::new();
        }
        self.entries.split_off(len)
    }
}

impl<'a> IntoIterator for &'a SceneStack {
    type Item = &'a SceneEntry;
    type IntoIter = std::slice::Iter<'a, SceneEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
