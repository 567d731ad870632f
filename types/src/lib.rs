//! Core domain types for stage navigation.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod ids;
mod record;
mod request;
mod scene;
mod transition;

pub use ids::{SceneTag, StageId, TagIdGenerator};
pub use record::StageRecord;
pub use request::{PendingRequest, ResultCode, SceneResult};
pub use scene::{LaunchMode, ParseLaunchModeError, SceneArgs, SceneType};
pub use transition::{AnimationPair, SceneAnimation, SceneAnimationKind, TransitionDirection};
