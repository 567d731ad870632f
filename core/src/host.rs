//! Seams to the collaborator that actually hosts scene instances.

use std::fmt;

use stage_types::{AnimationPair, SceneArgs, SceneResult, SceneTag, SceneType};

/// Capabilities the stage needs from a live scene instance.
pub trait Scene {
    fn scene_type(&self) -> &SceneType;

    /// New arguments for an instance that was reused instead of recreated.
    fn update_arguments(&mut self, args: SceneArgs);

    /// Result of a scene this one started with a request code.
    fn receive_result(&mut self, request_code: i32, result: SceneResult);

    fn notify_back_pressed(&mut self) {}

    /// The result handed to the requester when this scene finishes.
    fn take_result(&mut self) -> SceneResult {
        SceneResult::canceled()
    }

    /// Drop shared-element and enter/exit markers before a canned animation.
    fn clear_transition_markers(&mut self) {}
}

/// Creates a scene instance with its initial arguments.
pub type SceneFactory = Box<dyn Fn(Option<SceneArgs>) -> Box<dyn Scene>>;

/// One host-side change within a transaction.
pub enum HostOp {
    Add { tag: SceneTag, scene: Box<dyn Scene> },
    Attach(SceneTag),
    Detach(SceneTag),
    Remove(SceneTag),
}

impl HostOp {
    #[must_use]
    pub fn tag(&self) -> &SceneTag {
        match self {
            HostOp::Add { tag, .. }
            | HostOp::Attach(tag)
            | HostOp::Detach(tag)
            | HostOp::Remove(tag) => tag,
        }
    }
}

impl fmt::Debug for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOp::Add { tag, scene } => f
                .debug_struct("Add")
                .field("tag", tag)
                .field("scene_type", scene.scene_type())
                .finish(),
            HostOp::Attach(tag) => f.debug_tuple("Attach").field(tag).finish(),
            HostOp::Detach(tag) => f.debug_tuple("Detach").field(tag).finish(),
            HostOp::Remove(tag) => f.debug_tuple("Remove").field(tag).finish(),
        }
    }
}

/// Ordered batch of host changes produced by a single stack mutation.
///
/// The host must make the whole batch visible at once, in order.
#[derive(Debug, Default)]
pub struct HostTransaction {
    ops: Vec<HostOp>,
    animation: Option<AnimationPair>,
}

impl HostTransaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tag: SceneTag, scene: Box<dyn Scene>) {
        self.ops.push(HostOp::Add { tag, scene });
    }

    pub fn attach(&mut self, tag: SceneTag) {
        self.ops.push(HostOp::Attach(tag));
    }

    pub fn detach(&mut self, tag: SceneTag) {
        self.ops.push(HostOp::Detach(tag));
    }

    pub fn remove(&mut self, tag: SceneTag) {
        self.ops.push(HostOp::Remove(tag));
    }

    pub fn set_animation(&mut self, animation: AnimationPair) {
        self.animation = Some(animation);
    }

    #[must_use]
    pub fn animation(&self) -> Option<AnimationPair> {
        self.animation
    }

    #[must_use]
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<HostOp>, Option<AnimationPair>) {
        (self.ops, self.animation)
    }
}

/// The container that owns scene instances, keyed by tag.
pub trait SceneHost {
    fn find_by_tag(&self, tag: &SceneTag) -> Option<&(dyn Scene + 'static)>;

    fn find_by_tag_mut(&mut self, tag: &SceneTag) -> Option<&mut (dyn Scene + 'static)>;

    /// `true` when the instance exists but is not currently attached.
    fn is_detached(&self, tag: &SceneTag) -> bool;

    fn commit(&mut self, transaction: HostTransaction);

    /// The last scene finished; tear the stage down.
    fn finish(&mut self);

    /// Tags whose instances were destroyed since the last call.
    ///
    /// Read right after every commit. Hosts that tear views down later call
    /// `Stage::on_scene_destroyed` instead.
    fn take_destroyed(&mut self) -> Vec<SceneTag> {
        Vec::new()
    }

    /// Called after every committed transaction.
    fn on_transact_scene(&mut self) {}
}
