//! Animation descriptors for scene transitions.
//!
//! These only describe what the host should play; nothing here runs a clock.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// A scene is pushed over the current top.
    Forward,
    /// The top scene finishes and the one below comes back.
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAnimationKind {
    OpenEnter,
    OpenExit,
    CloseEnter,
    CloseExit,
    FadeIn,
    FadeOut,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneAnimation {
    kind: SceneAnimationKind,
    duration: Duration,
}

impl SceneAnimation {
    #[must_use]
    pub fn new(kind: SceneAnimationKind, duration: Duration) -> Self {
        if kind == SceneAnimationKind::Instant {
            return Self::instant();
        }
        Self { kind, duration }
    }

    #[must_use]
    pub fn instant() -> Self {
        Self {
            kind: SceneAnimationKind::Instant,
            duration: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SceneAnimationKind {
        self.kind
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Enter animation for the incoming scene and exit animation for the outgoing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationPair {
    pub enter: SceneAnimation,
    pub exit: SceneAnimation,
}

impl AnimationPair {
    #[must_use]
    pub fn open(duration: Duration) -> Self {
        Self {
            enter: SceneAnimation::new(SceneAnimationKind::OpenEnter, duration),
            exit: SceneAnimation::new(SceneAnimationKind::OpenExit, duration),
        }
    }

    #[must_use]
    pub fn close(duration: Duration) -> Self {
        Self {
            enter: SceneAnimation::new(SceneAnimationKind::CloseEnter, duration),
            exit: SceneAnimation::new(SceneAnimationKind::CloseExit, duration),
        }
    }

    #[must_use]
    pub fn fade(duration: Duration) -> Self {
        Self {
            enter: SceneAnimation::new(SceneAnimationKind::FadeIn, duration),
            exit: SceneAnimation::new(SceneAnimationKind::FadeOut, duration),
        }
    }

    #[must_use]
    pub fn instant() -> Self {
        Self {
            enter: SceneAnimation::instant(),
            exit: SceneAnimation::instant(),
        }
    }

    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.enter.kind() == SceneAnimationKind::Instant
            && self.exit.kind() == SceneAnimationKind::Instant
    }
}
