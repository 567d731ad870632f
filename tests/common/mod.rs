//! Shared test utilities and fixtures
//!
//! A probe scene that records everything the stage does to it, and helpers
//! to build registries and stages around it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use stage_core::{
    Announcement, LaunchMode, MemoryHost, PushOutcome, Scene, SceneArgs, SceneRegistry,
    SceneResult, SceneType, Stage,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created(Option<SceneArgs>),
    Args(SceneArgs),
    Result { code: i32, result: SceneResult },
    Back,
}

/// Every event, tagged with the scene type that saw it.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<(SceneType, Event)>>>);

impl Journal {
    pub fn events(&self) -> Vec<(SceneType, Event)> {
        self.0.borrow().clone()
    }

    pub fn for_type(&self, name: &str) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|(ty, _)| ty.as_str() == name)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn results(&self) -> Vec<(SceneType, i32, SceneResult)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|(ty, event)| match event {
                Event::Result { code, result } => Some((ty.clone(), *code, result.clone())),
                _ => None,
            })
            .collect()
    }

    fn push(&self, ty: &SceneType, event: Event) {
        self.0.borrow_mut().push((ty.clone(), event));
    }
}

/// Scene whose result is whatever sits under the `reply` argument.
pub struct Probe {
    scene_type: SceneType,
    reply: Option<String>,
    journal: Journal,
}

impl Scene for Probe {
    fn scene_type(&self) -> &SceneType {
        &self.scene_type
    }

    fn update_arguments(&mut self, args: SceneArgs) {
        if let Some(reply) = args.get_str("reply") {
            self.reply = Some(reply.to_string());
        }
        self.journal.push(&self.scene_type, Event::Args(args));
    }

    fn receive_result(&mut self, request_code: i32, result: SceneResult) {
        self.journal.push(
            &self.scene_type,
            Event::Result {
                code: request_code,
                result,
            },
        );
    }

    fn notify_back_pressed(&mut self) {
        self.journal.push(&self.scene_type, Event::Back);
    }

    fn take_result(&mut self) -> SceneResult {
        match self.reply.take() {
            Some(reply) => SceneResult::ok(Some(SceneArgs::new().with("reply", reply))),
            None => SceneResult::canceled(),
        }
    }
}

pub fn probe_factory(
    name: &str,
    journal: &Journal,
) -> impl Fn(Option<SceneArgs>) -> Box<dyn Scene> + 'static {
    let scene_type = SceneType::new(name);
    let journal = journal.clone();
    move |args: Option<SceneArgs>| -> Box<dyn Scene> {
        journal.push(&scene_type, Event::Created(args.clone()));
        Box::new(Probe {
            scene_type: scene_type.clone(),
            reply: args.as_ref().and_then(|a| a.get_str("reply")).map(str::to_string),
            journal: journal.clone(),
        })
    }
}

pub fn registry(journal: &Journal, scenes: &[(&str, LaunchMode)]) -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    for (name, mode) in scenes {
        registry.register(SceneType::new(*name), *mode, probe_factory(name, journal));
    }
    registry
}

/// `{A: Standard, B: SingleTop, C: SingleTask}`
pub fn abc_stage() -> (Stage<MemoryHost>, Journal) {
    let journal = Journal::default();
    let registry = registry(
        &journal,
        &[
            ("A", LaunchMode::Standard),
            ("B", LaunchMode::SingleTop),
            ("C", LaunchMode::SingleTask),
        ],
    );
    (Stage::new(Rc::new(registry), MemoryHost::new()), journal)
}

pub fn push(stage: &mut Stage<MemoryHost>, name: &str) -> PushOutcome {
    stage
        .push(Announcement::new(SceneType::new(name)))
        .unwrap_or_else(|err| panic!("push {name}: {err}"))
}

pub fn tags(stage: &Stage<MemoryHost>) -> Vec<String> {
    stage.stack().iter().map(|entry| entry.tag().to_string()).collect()
}

/// Scene types of the stack, bottom to top, as the host sees them.
pub fn types(stage: &Stage<MemoryHost>) -> Vec<String> {
    stage
        .stack()
        .iter()
        .map(|entry| {
            stage
                .find_scene_by_tag(entry.tag())
                .map_or_else(|| "?".to_string(), |scene| scene.scene_type().to_string())
        })
        .collect()
}
