//! Process-wide table of live stages keyed by [`StageId`].

use std::collections::HashMap;

use stage_types::StageId;

use crate::NavigationError;
use crate::host::SceneHost;
use crate::stage::Stage;

pub struct StageRegistry<H: SceneHost> {
    stages: HashMap<StageId, Stage<H>>,
    next_id: i32,
}

impl<H: SceneHost> Default for StageRegistry<H> {
    fn default() -> Self {
        Self {
            stages: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<H: SceneHost> StageRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `stage`, keeping a restored id or allocating a fresh one.
    pub fn register(&mut self, stage: Stage<H>) -> Result<StageId, NavigationError> {
        let id = stage.id();
        if id.is_valid() {
            return self.register_with_id(stage, id);
        }
        let id = self.allocate();
        self.insert(stage, id);
        Ok(id)
    }

    pub fn register_with_id(
        &mut self,
        stage: Stage<H>,
        id: StageId,
    ) -> Result<StageId, NavigationError> {
        if !id.is_valid() {
            return Err(NavigationError::InvalidStageId(id));
        }
        if self.stages.contains_key(&id) {
            return Err(NavigationError::StageIdInUse(id));
        }
        self.insert(stage, id);
        Ok(id)
    }

    pub fn unregister(&mut self, id: StageId) -> Option<Stage<H>> {
        let stage = self.stages.remove(&id);
        if stage.is_none() {
            tracing::warn!("Unregister of unknown stage {id}");
        }
        stage
    }

    #[must_use]
    pub fn get(&self, id: StageId) -> Option<&Stage<H>> {
        self.stages.get(&id)
    }

    pub fn get_mut(&mut self, id: StageId) -> Option<&mut Stage<H>> {
        self.stages.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Registered ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<StageId> {
        let mut ids: Vec<StageId> = self.stages.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn allocate(&mut self) -> StageId {
        loop {
            let id = StageId::new(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if id.is_valid() && !self.stages.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&mut self, mut stage: Stage<H>, id: StageId) {
        stage.on_register(id);
        self.stages.insert(id, stage);
    }
}
