//! In-memory [`SceneHost`] used by the CLI and tests.
//!
//! Applies each transaction immediately and keeps a log of what was committed.

use std::collections::HashMap;

use stage_types::{AnimationPair, SceneTag};

use crate::host::{HostOp, HostTransaction, Scene, SceneHost};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommittedOp {
    Add(SceneTag),
    Attach(SceneTag),
    Detach(SceneTag),
    Remove(SceneTag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub ops: Vec<CommittedOp>,
    pub animation: Option<AnimationPair>,
}

struct Hosted {
    scene: Box<dyn Scene>,
    detached: bool,
}

#[derive(Default)]
pub struct MemoryHost {
    scenes: HashMap<SceneTag, Hosted>,
    commits: Vec<CommitRecord>,
    destroyed: Vec<SceneTag>,
    finished: bool,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-associate a tag with a live instance, e.g. after a restore.
    pub fn adopt(&mut self, tag: SceneTag, scene: Box<dyn Scene>, detached: bool) {
        self.scenes.insert(tag, Hosted { scene, detached });
    }

    /// Drop an instance behind the stage's back.
    pub fn evict(&mut self, tag: &SceneTag) -> bool {
        self.scenes.remove(tag).is_some()
    }

    #[must_use]
    pub fn contains(&self, tag: &SceneTag) -> bool {
        self.scenes.contains_key(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Tags of attached instances, sorted.
    #[must_use]
    pub fn attached_tags(&self) -> Vec<SceneTag> {
        let mut tags: Vec<_> = self
            .scenes
            .iter()
            .filter(|(_, hosted)| !hosted.detached)
            .map(|(tag, _)| tag.clone())
            .collect();
        tags.sort();
        tags
    }

    /// Every hosted instance with its detached flag, sorted by tag.
    #[must_use]
    pub fn hosted(&self) -> Vec<(&SceneTag, &(dyn Scene + 'static), bool)> {
        let mut hosted: Vec<_> = self
            .scenes
            .iter()
            .map(|(tag, hosted)| (tag, &*hosted.scene, hosted.detached))
            .collect();
        hosted.sort_by(|a, b| a.0.cmp(b.0));
        hosted
    }

    #[must_use]
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    #[must_use]
    pub fn last_commit(&self) -> Option<&CommitRecord> {
        self.commits.last()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_detached(&mut self, tag: &SceneTag, detached: bool) {
        match self.scenes.get_mut(tag) {
            Some(hosted) => hosted.detached = detached,
            None => tracing::warn!(%tag, detached, "Host has no scene to (de)tach"),
        }
    }
}

impl SceneHost for MemoryHost {
    fn find_by_tag(&self, tag: &SceneTag) -> Option<&(dyn Scene + 'static)> {
        self.scenes.get(tag).map(|hosted| &*hosted.scene)
    }

    fn find_by_tag_mut(&mut self, tag: &SceneTag) -> Option<&mut (dyn Scene + 'static)> {
        self.scenes.get_mut(tag).map(|hosted| &mut *hosted.scene)
    }

    fn is_detached(&self, tag: &SceneTag) -> bool {
        self.scenes.get(tag).is_some_and(|hosted| hosted.detached)
    }

    fn commit(&mut self, transaction: HostTransaction) {
        let (ops, animation) = transaction.into_parts();
        let mut record = CommitRecord {
            ops: Vec::with_capacity(ops.len()),
            animation,
        };

        for op in ops {
            match op {
                HostOp::Add { tag, scene } => {
                    self.scenes.insert(
                        tag.clone(),
                        Hosted {
                            scene,
                            detached: false,
                        },
                    );
                    record.ops.push(CommittedOp::Add(tag));
                }
                HostOp::Attach(tag) => {
                    self.set_detached(&tag, false);
                    record.ops.push(CommittedOp::Attach(tag));
                }
                HostOp::Detach(tag) => {
                    self.set_detached(&tag, true);
                    record.ops.push(CommittedOp::Detach(tag));
                }
                HostOp::Remove(tag) => {
                    if self.scenes.remove(&tag).is_some() {
                        self.destroyed.push(tag.clone());
                    }
                    record.ops.push(CommittedOp::Remove(tag));
                }
            }
        }

        self.commits.push(record);
    }

    fn take_destroyed(&mut self) -> Vec<SceneTag> {
        std::mem::take(&mut self.destroyed)
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
