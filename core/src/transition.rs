//! Picks the animation pair for a stack mutation.
//!
//! Purely advisory: the coordinator hands back a plan and never touches the stack.

use stage_config::TransitionConfig;
use stage_types::{AnimationPair, SceneTag, SceneType, TransitionDirection};

/// The two scenes involved in a visible stack change.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub from_tag: &'a SceneTag,
    pub from_type: &'a SceneType,
    pub to_tag: &'a SceneTag,
    pub to_type: &'a SceneType,
    pub direction: TransitionDirection,
}

/// Caller-supplied animation choice.
///
/// Returning `Some` means the strategy handles this pair and the canned
/// animation is not applied.
pub trait TransitionStrategy {
    fn on_transition(&self, context: &TransitionContext<'_>) -> Option<AnimationPair>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub animation: AnimationPair,
    /// Shared-element markers on both scenes must be cleared first.
    pub clear_markers: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionCoordinator {
    open: AnimationPair,
    close: AnimationPair,
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}

impl TransitionCoordinator {
    #[must_use]
    pub fn new(open: AnimationPair, close: AnimationPair) -> Self {
        Self { open, close }
    }

    #[must_use]
    pub fn from_config(config: &TransitionConfig) -> Self {
        if config.reduced_motion {
            return Self::new(AnimationPair::instant(), AnimationPair::instant());
        }
        Self::new(
            AnimationPair::open(config.open_duration()),
            AnimationPair::close(config.close_duration()),
        )
    }

    #[must_use]
    pub fn default_pair(&self, direction: TransitionDirection) -> AnimationPair {
        match direction {
            TransitionDirection::Forward => self.open,
            TransitionDirection::Backward => self.close,
        }
    }

    #[must_use]
    pub fn select(
        &self,
        context: &TransitionContext<'_>,
        strategy: Option<&dyn TransitionStrategy>,
    ) -> TransitionPlan {
        if let Some(animation) = strategy.and_then(|s| s.on_transition(context)) {
            return TransitionPlan {
                animation,
                clear_markers: false,
            };
        }
        TransitionPlan {
            animation: self.default_pair(context.direction),
            clear_markers: true,
        }
    }
}
