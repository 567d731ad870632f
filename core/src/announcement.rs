use std::fmt;

use stage_types::{PendingRequest, SceneArgs, SceneTag, SceneType};

use crate::transition::TransitionStrategy;

/// Request to show a scene: what to push, with what, and who wants the result.
pub struct Announcement {
    pub(crate) scene_type: SceneType,
    pub(crate) args: Option<SceneArgs>,
    pub(crate) transition: Option<Box<dyn TransitionStrategy>>,
    pub(crate) request: Option<PendingRequest>,
}

impl Announcement {
    #[must_use]
    pub fn new(scene_type: impl Into<SceneType>) -> Self {
        Self {
            scene_type: scene_type.into(),
            args: None,
            transition: None,
            request: None,
        }
    }

    pub fn args(mut self, args: SceneArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn maybe_args(mut self, args: Option<SceneArgs>) -> Self {
        self.args = args;
        self
    }

    pub fn transition(mut self, strategy: impl TransitionStrategy + 'static) -> Self {
        self.transition = Some(Box::new(strategy));
        self
    }

    /// Deliver the pushed scene's result to `requester` when it finishes.
    pub fn request_from(mut self, requester: SceneTag, request_code: i32) -> Self {
        self.request = Some(PendingRequest::new(requester, request_code));
        self
    }

    #[must_use]
    pub fn scene_type(&self) -> &SceneType {
        &self.scene_type
    }

    #[must_use]
    pub fn arguments(&self) -> Option<&SceneArgs> {
        self.args.as_ref()
    }

    #[must_use]
    pub fn request(&self) -> Option<&PendingRequest> {
        self.request.as_ref()
    }
}

impl fmt::Debug for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcement")
            .field("scene_type", &self.scene_type)
            .field("args", &self.args)
            .field("transition", &self.transition.is_some())
            .field("request", &self.request)
            .finish()
    }
}
