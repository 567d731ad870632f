//! Launch modes, factories and type matching per scene type.
//!
//! One registry is built at startup and shared by every stage; nothing here
//! is process-global.

use std::collections::{HashMap, HashSet};

use stage_types::{LaunchMode, SceneArgs, SceneType};

use crate::NavigationError;
use crate::host::{Scene, SceneFactory};

type Matcher = Box<dyn Fn(&SceneType, &SceneType) -> Option<bool>>;

#[derive(Default)]
struct Registration {
    launch_mode: Option<LaunchMode>,
    factory: Option<SceneFactory>,
    ancestors: Vec<SceneType>,
}

#[derive(Default)]
pub struct SceneRegistry {
    scenes: HashMap<SceneType, Registration>,
    matcher: Option<Matcher>,
}

impl SceneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene type with its launch mode and factory in one place.
    pub fn register<F>(&mut self, scene_type: impl Into<SceneType>, mode: LaunchMode, factory: F)
    where
        F: Fn(Option<SceneArgs>) -> Box<dyn Scene> + 'static,
    {
        let entry = self.scenes.entry(scene_type.into()).or_default();
        entry.launch_mode = Some(mode);
        entry.factory = Some(Box::new(factory));
    }

    pub fn register_launch_mode(&mut self, scene_type: impl Into<SceneType>, mode: LaunchMode) {
        self.scenes.entry(scene_type.into()).or_default().launch_mode = Some(mode);
    }

    pub fn register_factory<F>(&mut self, scene_type: impl Into<SceneType>, factory: F)
    where
        F: Fn(Option<SceneArgs>) -> Box<dyn Scene> + 'static,
    {
        self.scenes.entry(scene_type.into()).or_default().factory = Some(Box::new(factory));
    }

    /// Declare that `scene_type` is-a `ancestor` for launch-mode matching.
    pub fn register_ancestor(
        &mut self,
        scene_type: impl Into<SceneType>,
        ancestor: impl Into<SceneType>,
    ) {
        let ancestor = ancestor.into();
        let entry = self.scenes.entry(scene_type.into()).or_default();
        if !entry.ancestors.contains(&ancestor) {
            entry.ancestors.push(ancestor);
        }
    }

    /// Override matching. `None` from the matcher falls back to the ancestor table.
    pub fn set_matcher<F>(&mut self, matcher: F)
    where
        F: Fn(&SceneType, &SceneType) -> Option<bool> + 'static,
    {
        self.matcher = Some(Box::new(matcher));
    }

    /// Apply launch mode overrides keyed by scene type name (from config).
    ///
    /// Only already-registered types are touched; unknown names are logged.
    pub fn apply_launch_modes<'a>(
        &mut self,
        modes: impl IntoIterator<Item = (&'a String, &'a LaunchMode)>,
    ) {
        for (name, mode) in modes {
            match self.scenes.get_mut(name.as_str()) {
                Some(entry) => entry.launch_mode = Some(*mode),
                None => tracing::warn!("Launch mode override for unknown scene type {name}"),
            }
        }
    }

    pub fn launch_mode(&self, scene_type: &SceneType) -> Result<LaunchMode, NavigationError> {
        self.scenes
            .get(scene_type)
            .and_then(|entry| entry.launch_mode)
            .ok_or_else(|| NavigationError::UnregisteredSceneType(scene_type.clone()))
    }

    pub fn instantiate(
        &self,
        scene_type: &SceneType,
        args: Option<SceneArgs>,
    ) -> Result<Box<dyn Scene>, NavigationError> {
        let factory = self
            .scenes
            .get(scene_type)
            .and_then(|entry| entry.factory.as_ref())
            .ok_or_else(|| NavigationError::MissingFactory(scene_type.clone()))?;
        Ok(factory(args))
    }

    /// Look up a registered scene type by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<SceneType> {
        self.scenes.get_key_value(name).map(|(ty, _)| ty.clone())
    }

    /// Whether an instance of `existing` satisfies a request for `requested`.
    #[must_use]
    pub fn matches(&self, existing: &SceneType, requested: &SceneType) -> bool {
        if let Some(verdict) = self
            .matcher
            .as_ref()
            .and_then(|matcher| matcher(existing, requested))
        {
            return verdict;
        }
        if existing == requested {
            return true;
        }

        let mut seen = HashSet::new();
        let mut pending = vec![existing];
        while let Some(ty) = pending.pop() {
            if !seen.insert(ty) {
                continue;
            }
            let Some(entry) = self.scenes.get(ty) else {
                continue;
            };
            for ancestor in &entry.ancestors {
                if ancestor == requested {
                    return true;
                }
                pending.push(ancestor);
            }
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
