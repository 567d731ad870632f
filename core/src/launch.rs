//! Starting a stage from an external launch request.

use stage_types::{SceneArgs, SceneType, StageRecord};

use crate::NavigationError;
use crate::announcement::Announcement;
use crate::host::SceneHost;
use crate::stage::{PushOutcome, Stage};

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchIntent {
    /// Plain launch; the delegate picks the first scene.
    Main,
    /// Open a scene by its registered type name.
    StartScene {
        scene: String,
        args: Option<SceneArgs>,
    },
    /// Anything else, carrying the action name.
    Other(String),
}

/// Application hooks consulted while handling launch intents.
pub trait StageDelegate {
    /// First scene for a plain launch. `None` treats the launch as unrecognized.
    fn launch_announcement(&mut self) -> Option<Announcement>;

    /// Announcement for a resolved `StartScene` intent. `None` declines it.
    fn on_start_scene_from_intent(
        &mut self,
        scene: &SceneType,
        args: Option<SceneArgs>,
    ) -> Option<Announcement> {
        Some(Announcement::new(scene.clone()).maybe_args(args))
    }

    fn on_unrecognized_intent(&mut self, intent: &LaunchIntent) {
        tracing::warn!("Unrecognized launch intent {intent:?}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Restored,
    Started(PushOutcome),
    Unrecognized,
}

impl<H: SceneHost> Stage<H> {
    /// Bring the stage up, either from a saved record or from `intent`.
    ///
    /// A saved record wins; the intent is then ignored since the restored
    /// stack already reflects it.
    pub fn on_create(
        &mut self,
        saved: Option<StageRecord>,
        intent: &LaunchIntent,
        delegate: &mut dyn StageDelegate,
    ) -> Result<LaunchOutcome, NavigationError> {
        if let Some(record) = saved {
            self.restore_state(record)?;
            return Ok(LaunchOutcome::Restored);
        }

        match intent {
            LaunchIntent::Main => match delegate.launch_announcement() {
                Some(announcement) => Ok(LaunchOutcome::Started(self.push(announcement)?)),
                None => {
                    delegate.on_unrecognized_intent(intent);
                    Ok(LaunchOutcome::Unrecognized)
                }
            },
            LaunchIntent::StartScene { .. } => self.start_scene_from_intent(intent, delegate),
            LaunchIntent::Other(_) => {
                delegate.on_unrecognized_intent(intent);
                Ok(LaunchOutcome::Unrecognized)
            }
        }
    }

    /// Handle a launch request delivered to an already running stage.
    pub fn on_new_intent(
        &mut self,
        intent: &LaunchIntent,
        delegate: &mut dyn StageDelegate,
    ) -> Result<LaunchOutcome, NavigationError> {
        self.start_scene_from_intent(intent, delegate)
    }

    fn start_scene_from_intent(
        &mut self,
        intent: &LaunchIntent,
        delegate: &mut dyn StageDelegate,
    ) -> Result<LaunchOutcome, NavigationError> {
        let LaunchIntent::StartScene { scene, args } = intent else {
            delegate.on_unrecognized_intent(intent);
            return Ok(LaunchOutcome::Unrecognized);
        };
        let Some(scene_type) = self.registry().resolve(scene) else {
            tracing::error!("Can't find scene type {scene}");
            delegate.on_unrecognized_intent(intent);
            return Ok(LaunchOutcome::Unrecognized);
        };
        match delegate.on_start_scene_from_intent(&scene_type, args.clone()) {
            Some(announcement) => Ok(LaunchOutcome::Started(self.push(announcement)?)),
            None => {
                delegate.on_unrecognized_intent(intent);
                Ok(LaunchOutcome::Unrecognized)
            }
        }
    }
}
