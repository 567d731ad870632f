//! Scene stack state machine for stage navigation.
//!
//! A [`Stage`] owns one stack of scene tags and drives a [`SceneHost`]
//! through batched [`HostTransaction`]s. Launch modes, factories and type
//! matching live in a shared [`SceneRegistry`]; stages themselves are kept in
//! a [`StageRegistry`].
//!
//! Nothing here does IO except [`SnapshotStore`], which the mutation paths
//! never call.

mod announcement;
mod error;
mod host;
mod launch;
mod memory;
mod registry;
mod result;
mod snapshot;
mod stack;
mod stage;
mod stages;
mod transition;

pub use announcement::Announcement;
pub use error::{NavigationError, SnapshotError};
pub use host::{HostOp, HostTransaction, Scene, SceneFactory, SceneHost};
pub use launch::{LaunchIntent, LaunchOutcome, StageDelegate};
pub use memory::{CommitRecord, CommittedOp, MemoryHost};
pub use registry::SceneRegistry;
pub use result::ResultChannel;
pub use snapshot::SnapshotStore;
pub use stack::{SceneEntry, SceneStack};
pub use stage::{PopOutcome, PushOutcome, Stage};
pub use stages::StageRegistry;
pub use transition::{TransitionContext, TransitionCoordinator, TransitionPlan, TransitionStrategy};

pub use stage_types::{
    AnimationPair, LaunchMode, PendingRequest, ResultCode, SceneAnimation, SceneAnimationKind,
    SceneArgs, SceneResult, SceneTag, SceneType, StageId, StageRecord, TagIdGenerator,
    TransitionDirection,
};
