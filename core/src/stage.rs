//! One stage: a scene stack bound to the host that displays it.
//!
//! # Push
//!
//! The target type's launch mode decides the shape of the mutation:
//!
//! | Mode          | Match found                                  | No match     |
//! |---------------|----------------------------------------------|--------------|
//! | `Standard`    | -                                            | create       |
//! | `SingleTop`   | top matches: update its arguments            | create       |
//! | `SingleTask`  | any entry matches: drop everything above it  | create       |
//!
//! Matching is "is-a" through [`SceneRegistry::matches`], evaluated on the
//! live instance the host holds for each tag.
//!
//! # Pop
//!
//! Popping the top brings the entry below back with a backward animation.
//! Popping a mid-stack entry removes it silently. Popping the last entry
//! finishes the stage instead of leaving it empty.
//!
//! # Root reset
//!
//! [`Stage::push_as_root`] leaves exactly one scene on the stack. A
//! `Standard` type always gets a fresh instance; other modes keep the first
//! matching entry when the type is `SingleTask` or the entry is attached.
//!
//! Every mutation reaches the host as a single [`HostTransaction`].

use std::rc::Rc;

use stage_types::{
    LaunchMode, PendingRequest, SceneArgs, SceneTag, SceneType, StageId, StageRecord,
    TagIdGenerator, TransitionDirection,
};

use crate::NavigationError;
use crate::announcement::Announcement;
use crate::host::{HostTransaction, Scene, SceneHost};
use crate::registry::SceneRegistry;
use crate::result::ResultChannel;
use crate::stack::{SceneEntry, SceneStack};
use crate::transition::{TransitionContext, TransitionCoordinator, TransitionStrategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// A new scene was created on top.
    Created { tag: SceneTag },
    /// The matching top scene received the arguments.
    Reused { tag: SceneTag },
    /// The stack was cut back to an existing matching scene.
    Truncated {
        tag: SceneTag,
        removed: Vec<SceneTag>,
    },
    /// Everything but the root was removed; `created` when the root is new.
    Rooted {
        tag: SceneTag,
        created: bool,
        removed: Vec<SceneTag>,
    },
}

impl PushOutcome {
    /// Tag of the scene that is on top after the push.
    #[must_use]
    pub fn tag(&self) -> &SceneTag {
        match self {
            PushOutcome::Created { tag }
            | PushOutcome::Reused { tag }
            | PushOutcome::Truncated { tag, .. }
            | PushOutcome::Rooted { tag, .. } => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    Popped {
        tag: SceneTag,
        result_delivered: bool,
    },
    /// The popped scene was the last one; the stage is finished.
    StageFinished,
    /// Unknown tag or missing instance; nothing changed.
    Ignored,
}

pub struct Stage<H: SceneHost> {
    id: StageId,
    stack: SceneStack,
    ids: TagIdGenerator,
    /// Tags whose views may still be on screen, in stack order.
    view_order: Vec<SceneTag>,
    scenes: Rc<SceneRegistry>,
    transitions: TransitionCoordinator,
    host: H,
    finished: bool,
}

impl<H: SceneHost> Stage<H> {
    pub fn new(scenes: Rc<SceneRegistry>, host: H) -> Self {
        Self {
            id: StageId::INVALID,
            stack: SceneStack::new(),
            ids: TagIdGenerator::new(),
            view_order: Vec::new(),
            scenes,
            transitions: TransitionCoordinator::default(),
            host,
            finished: false,
        }
    }

    pub fn with_transitions(mut self, transitions: TransitionCoordinator) -> Self {
        self.transitions = transitions;
        self
    }

    pub(crate) fn on_register(&mut self, id: StageId) {
        self.id = id;
    }

    #[must_use]
    pub fn id(&self) -> StageId {
        self.id
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn registry(&self) -> &SceneRegistry {
        &self.scenes
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn current_top_tag(&self) -> Option<&SceneTag> {
        self.stack.top().map(SceneEntry::tag)
    }

    /// Type of the live top scene, if the host has it.
    #[must_use]
    pub fn current_top_type(&self) -> Option<SceneType> {
        let tag = self.current_top_tag()?;
        self.host
            .find_by_tag(tag)
            .map(|scene| scene.scene_type().clone())
    }

    #[must_use]
    pub fn find_entry_by_tag(&self, tag: &SceneTag) -> Option<&SceneEntry> {
        self.stack.find(tag)
    }

    #[must_use]
    pub fn find_scene_by_tag(&self, tag: &SceneTag) -> Option<&(dyn Scene + 'static)> {
        self.host.find_by_tag(tag)
    }

    // ========================================================================
    // Push
    // ========================================================================

    pub fn push(&mut self, announcement: Announcement) -> Result<PushOutcome, NavigationError> {
        if self.finished {
            return Err(NavigationError::StageFinished(self.id));
        }

        let Announcement {
            scene_type,
            args,
            transition,
            request,
        } = announcement;
        let mode = self.scenes.launch_mode(&scene_type)?;

        if mode == LaunchMode::SingleTask
            && let Some((index, tag)) = self.find_first_match(&scene_type)
        {
            return Ok(self.truncate_to(index, tag, args));
        }

        if mode == LaunchMode::SingleTop
            && let Some(tag) = self.current_top_tag().cloned()
            && let Some(top) = self.host.find_by_tag_mut(&tag)
            && self.scenes.matches(top.scene_type(), &scene_type)
        {
            if let Some(args) = args {
                top.update_arguments(args);
            }
            return Ok(PushOutcome::Reused { tag });
        }

        self.create(scene_type, args, transition.as_deref(), request)
    }

    /// Bottom-to-top scan for the first live scene matching `requested`.
    fn find_first_match(&self, requested: &SceneType) -> Option<(usize, SceneTag)> {
        for (index, entry) in self.stack.iter().enumerate() {
            let Some(scene) = self.host.find_by_tag(entry.tag()) else {
                tracing::error!(tag = %entry.tag(), "Can't find scene with tag");
                continue;
            };
            if self.scenes.matches(scene.scene_type(), requested) {
                return Some((index, entry.tag().clone()));
            }
        }
        None
    }

    fn truncate_to(&mut self, index: usize, tag: SceneTag, args: Option<SceneArgs>) -> PushOutcome {
        let mut transaction = HostTransaction::new();
        transaction.set_animation(self.transitions.default_pair(TransitionDirection::Forward));

        let discarded = self.stack.truncate(index + 1);
        let mut removed = Vec::with_capacity(discarded.len());
        for entry in discarded {
            let discarded_tag = entry.tag().clone();
            if let Some(request) = entry.pending_request() {
                tracing::debug!(
                    tag = %discarded_tag,
                    requester = %request.requester,
                    "Dropping pending result request of truncated scene"
                );
            }
            match self.host.find_by_tag_mut(&discarded_tag) {
                Some(scene) => {
                    scene.clear_transition_markers();
                    transaction.remove(discarded_tag.clone());
                }
                None => tracing::error!(tag = %discarded_tag, "Can't find scene with tag"),
            }
            removed.push(discarded_tag);
        }

        if self.host.is_detached(&tag) {
            transaction.attach(tag.clone());
        }
        self.commit(transaction);

        if let Some(args) = args
            && let Some(scene) = self.host.find_by_tag_mut(&tag)
        {
            scene.update_arguments(args);
        }

        PushOutcome::Truncated { tag, removed }
    }

    fn create(
        &mut self,
        scene_type: SceneType,
        args: Option<SceneArgs>,
        strategy: Option<&dyn TransitionStrategy>,
        request: Option<PendingRequest>,
    ) -> Result<PushOutcome, NavigationError> {
        let mut scene = self.scenes.instantiate(&scene_type, args)?;

        let stack = &self.stack;
        let view_order = &self.view_order;
        let tag = self
            .ids
            .next_tag(|candidate| stack.contains(candidate) || view_order.contains(candidate));

        let mut transaction = HostTransaction::new();
        if let Some(current_tag) = self.current_top_tag().cloned()
            && let Some(current) = self.host.find_by_tag_mut(&current_tag)
        {
            let context = TransitionContext {
                from_tag: &current_tag,
                from_type: current.scene_type(),
                to_tag: &tag,
                to_type: &scene_type,
                direction: TransitionDirection::Forward,
            };
            let plan = self.transitions.select(&context, strategy);
            if plan.clear_markers {
                current.clear_transition_markers();
                scene.clear_transition_markers();
            }
            transaction.set_animation(plan.animation);

            if self.host.is_detached(&current_tag) {
                tracing::error!(tag = %current_tag, "Current scene is detached");
            } else {
                transaction.detach(current_tag);
            }
        }
        transaction.add(tag.clone(), scene);

        let mut entry = SceneEntry::new(tag.clone());
        if let Some(request) = request {
            ResultChannel::associate(&mut entry, request);
        }
        self.stack.push(entry);
        self.view_order.push(tag.clone());
        self.commit(transaction);

        Ok(PushOutcome::Created { tag })
    }

    // ========================================================================
    // Root reset
    // ========================================================================

    /// Replace the whole stack with a single root scene, in one batch.
    pub fn push_as_root(
        &mut self,
        announcement: Announcement,
    ) -> Result<PushOutcome, NavigationError> {
        if self.finished {
            return Err(NavigationError::StageFinished(self.id));
        }

        let Announcement {
            scene_type,
            args,
            request,
            ..
        } = announcement;
        let mode = self.scenes.launch_mode(&scene_type)?;
        if let Some(request) = request {
            tracing::debug!(
                requester = %request.requester,
                "Root scene has no requester below it; dropping request"
            );
        }

        let keep = self.find_root_candidate(&scene_type, mode);
        let (fresh, mut args) = match keep {
            Some(_) => (None, args),
            None => (Some(self.scenes.instantiate(&scene_type, args)?), None),
        };

        let mut transaction = HostTransaction::new();
        transaction.set_animation(self.transitions.default_pair(TransitionDirection::Forward));

        let mut root = None;
        let mut removed = Vec::new();
        for (index, entry) in self.stack.truncate(0).into_iter().enumerate() {
            let tag = entry.tag().clone();
            let detached = self.host.is_detached(&tag);
            let Some(scene) = self.host.find_by_tag_mut(&tag) else {
                tracing::error!(%tag, "Can't find scene with tag");
                removed.push(tag);
                continue;
            };
            scene.clear_transition_markers();

            if keep == Some(index) {
                if detached {
                    transaction.attach(tag);
                }
                root = Some(entry);
            } else {
                transaction.remove(tag.clone());
                removed.push(tag);
            }
        }

        let outcome = if let Some(entry) = root {
            let tag = entry.tag().clone();
            self.stack.push(entry);
            PushOutcome::Rooted {
                tag,
                created: false,
                removed,
            }
        } else {
            let scene = match fresh {
                Some(scene) => scene,
                None => self.scenes.instantiate(&scene_type, args.take())?,
            };
            let view_order = &self.view_order;
            let tag = self.ids.next_tag(|candidate| view_order.contains(candidate));
            transaction.add(tag.clone(), scene);
            self.stack.push(SceneEntry::new(tag.clone()));
            self.view_order.push(tag.clone());
            PushOutcome::Rooted {
                tag,
                created: true,
                removed,
            }
        };
        self.commit(transaction);

        if let Some(args) = args
            && let Some(scene) = self.host.find_by_tag_mut(outcome.tag())
        {
            scene.update_arguments(args);
        }

        Ok(outcome)
    }

    /// Index of the entry `push_as_root` may keep, if any.
    fn find_root_candidate(&self, requested: &SceneType, mode: LaunchMode) -> Option<usize> {
        if mode == LaunchMode::Standard {
            return None;
        }
        self.stack.iter().position(|entry| {
            self.host.find_by_tag(entry.tag()).is_some_and(|scene| {
                self.scenes.matches(scene.scene_type(), requested)
                    && (mode == LaunchMode::SingleTask || !self.host.is_detached(entry.tag()))
            })
        })
    }

    // ========================================================================
    // Pop
    // ========================================================================

    pub fn pop(&mut self, tag: &SceneTag) -> PopOutcome {
        self.finish_scene(tag, None)
    }

    pub fn pop_with_transition(
        &mut self,
        tag: &SceneTag,
        strategy: &dyn TransitionStrategy,
    ) -> PopOutcome {
        self.finish_scene(tag, Some(strategy))
    }

    pub fn pop_current_top(&mut self) -> PopOutcome {
        match self.current_top_tag().cloned() {
            Some(tag) => self.pop(&tag),
            None => PopOutcome::Ignored,
        }
    }

    fn finish_scene(
        &mut self,
        tag: &SceneTag,
        strategy: Option<&dyn TransitionStrategy>,
    ) -> PopOutcome {
        if self.finished {
            tracing::warn!(%tag, "finish scene: stage already finished");
            return PopOutcome::Ignored;
        }
        if self.host.find_by_tag(tag).is_none() {
            tracing::error!(%tag, "finish scene: can't find scene by tag");
            return PopOutcome::Ignored;
        }
        let Some(index) = self.stack.index_of(tag) else {
            tracing::error!(%tag, "finish scene: can't find the tag in the stack");
            return PopOutcome::Ignored;
        };

        if self.stack.len() == 1 {
            tracing::info!(stage = %self.id, "finish scene: last scene, finishing stage");
            self.finished = true;
            self.host.finish();
            return PopOutcome::StageFinished;
        }

        let mut transaction = HostTransaction::new();
        if index + 1 == self.stack.len()
            && let Some(next_tag) = self.stack.get(index - 1).map(|entry| entry.tag().clone())
        {
            self.reveal(tag, next_tag, strategy, &mut transaction);
        }
        transaction.remove(tag.clone());

        let result = self
            .host
            .find_by_tag_mut(tag)
            .map(|scene| scene.take_result())
            .unwrap_or_default();
        self.commit(transaction);

        let mut entry = self.stack.remove(index);
        let result_delivered = match entry.take_pending_request() {
            Some(request) => ResultChannel::deliver(&self.stack, &mut self.host, request, result),
            None => false,
        };

        PopOutcome::Popped {
            tag: tag.clone(),
            result_delivered,
        }
    }

    /// Attach the scene below a finishing top, with a backward animation.
    fn reveal(
        &mut self,
        leaving: &SceneTag,
        next_tag: SceneTag,
        strategy: Option<&dyn TransitionStrategy>,
        transaction: &mut HostTransaction,
    ) {
        let (Some(from), Some(to)) = (
            self.host.find_by_tag(leaving),
            self.host.find_by_tag(&next_tag),
        ) else {
            tracing::error!(tag = %next_tag, "finish scene: can't find scene below the top");
            return;
        };

        let context = TransitionContext {
            from_tag: leaving,
            from_type: from.scene_type(),
            to_tag: &next_tag,
            to_type: to.scene_type(),
            direction: TransitionDirection::Backward,
        };
        let plan = self.transitions.select(&context, strategy);

        if plan.clear_markers {
            for tag in [leaving, &next_tag] {
                if let Some(scene) = self.host.find_by_tag_mut(tag) {
                    scene.clear_transition_markers();
                }
            }
        }
        transaction.set_animation(plan.animation);
        transaction.attach(next_tag);
    }

    // ========================================================================
    // Refresh & input
    // ========================================================================

    /// Detach and re-attach the top so the host rebuilds its view.
    pub fn refresh_top(&mut self) -> bool {
        let Some(tag) = self.current_top_tag().cloned() else {
            return false;
        };
        if self.host.find_by_tag(&tag).is_none() {
            tracing::warn!(%tag, "refresh top: can't find scene by tag");
            return false;
        }

        let mut transaction = HostTransaction::new();
        transaction.detach(tag.clone());
        transaction.attach(tag);
        self.commit(transaction);
        true
    }

    /// Forward a back press to the top scene.
    pub fn back_pressed(&mut self) -> bool {
        let Some(tag) = self.current_top_tag().cloned() else {
            return false;
        };
        match self.host.find_by_tag_mut(&tag) {
            Some(scene) => {
                scene.notify_back_pressed();
                true
            }
            None => {
                tracing::error!(%tag, "back pressed: can't find scene by tag");
                false
            }
        }
    }

    // ========================================================================
    // View ordering
    // ========================================================================

    /// The host destroyed the scene's view; it no longer takes part in ordering.
    pub fn on_scene_destroyed(&mut self, tag: &SceneTag) {
        self.view_order.retain(|candidate| candidate != tag);
    }

    /// Tags whose views the host still holds, in stack order.
    #[must_use]
    pub fn view_order(&self) -> &[SceneTag] {
        &self.view_order
    }

    /// Order view tags bottom-to-top. Tags the stage never knew sort first.
    pub fn sort_scene_views(&self, views: &mut [SceneTag]) {
        views.sort_by_key(|tag| self.view_order.iter().position(|candidate| candidate == tag));
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    #[must_use]
    pub fn capture_state(&self) -> StageRecord {
        StageRecord {
            stage_id: self.id,
            tag_list: self.stack.tags(),
            next_id: self.ids.peek(),
        }
    }

    /// Rebuild the stack shape from a record.
    ///
    /// Must run before the first push. The host re-associates each tag with
    /// a live instance before the next mutation.
    pub fn restore_state(&mut self, record: StageRecord) -> Result<(), NavigationError> {
        if !self.stack.is_empty() {
            return Err(NavigationError::RestoreAfterMutation);
        }

        self.id = record.stage_id;
        self.ids.seed(record.next_id);
        self.stack = SceneStack::from_tags(record.tag_list.iter().cloned());
        self.view_order = record.tag_list;
        self.finished = false;
        Ok(())
    }

    fn commit(&mut self, transaction: HostTransaction) {
        self.host.commit(transaction);
        for tag in self.host.take_destroyed() {
            self.on_scene_destroyed(&tag);
        }
        self.host.on_transact_scene();
    }
}
