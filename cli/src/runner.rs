//! Replays a [`Script`] against an in-memory stage and renders the result.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use stage_config::StageConfig;
use stage_core::{
    Announcement, LaunchIntent, MemoryHost, PopOutcome, PushOutcome, Scene, SceneHost,
    SceneArgs, SceneRegistry, SceneResult, SceneTag, SceneType, SnapshotStore, Stage,
    StageDelegate, StageId, StageRegistry, TransitionCoordinator,
};
use stage_utils::{atomic_write, recover_bak_file};

use crate::script::{Script, Step};

type Events = Rc<RefCell<Vec<String>>>;

/// A scene that only reports what happens to it.
struct ScriptScene {
    scene_type: SceneType,
    args: Option<SceneArgs>,
    events: Events,
}

impl ScriptScene {
    fn record(&self, event: String) {
        self.events
            .borrow_mut()
            .push(format!("{}: {event}", self.scene_type));
    }
}

impl Scene for ScriptScene {
    fn scene_type(&self) -> &SceneType {
        &self.scene_type
    }

    fn update_arguments(&mut self, args: SceneArgs) {
        self.record(format!("arguments {}", to_json(&args)));
        self.args = Some(args);
    }

    fn receive_result(&mut self, request_code: i32, result: SceneResult) {
        let data = result.data.as_ref().map(to_json).unwrap_or_default();
        self.record(format!("result {request_code} {:?} {data}", result.code));
    }

    fn notify_back_pressed(&mut self) {
        self.record("back pressed".to_string());
    }

    fn take_result(&mut self) -> SceneResult {
        match self.args.as_ref().and_then(|args| args.get("result")) {
            Some(value) => SceneResult::ok(Some(SceneArgs::new().with("result", value.clone()))),
            None => SceneResult::canceled(),
        }
    }
}

fn to_json(args: &SceneArgs) -> String {
    serde_json::to_string(args).unwrap_or_default()
}

/// Host-side state persisted next to the stage record so tags can be
/// re-associated with instances after a restore.
#[derive(Debug, Serialize, Deserialize)]
struct HostedScene {
    tag: SceneTag,
    scene: String,
    detached: bool,
}

struct LaunchDelegate {
    launch: Option<String>,
}

impl StageDelegate for LaunchDelegate {
    fn launch_announcement(&mut self) -> Option<Announcement> {
        self.launch.clone().map(Announcement::new)
    }

    fn on_unrecognized_intent(&mut self, intent: &LaunchIntent) {
        tracing::debug!(?intent, "No launch scene declared; starting empty");
    }
}

pub struct Runner {
    scenes: Rc<SceneRegistry>,
    stages: StageRegistry<MemoryHost>,
    id: StageId,
    events: Events,
}

impl Runner {
    /// Build the stage and bring it up from `store` or the script's launch scene.
    pub fn start(
        script: &Script,
        config: &StageConfig,
        store: Option<&SnapshotStore>,
    ) -> Result<Self> {
        let events = Events::default();
        let scenes = Rc::new(build_registry(script, config, &events));

        let mut stage = Stage::new(Rc::clone(&scenes), MemoryHost::new())
            .with_transitions(TransitionCoordinator::from_config(&config.transitions));

        let saved = match store {
            Some(store) => store.load(StageId::new(0))?,
            None => None,
        };
        let restored = saved.is_some();
        let mut delegate = LaunchDelegate {
            launch: script.launch.clone(),
        };
        let outcome = stage.on_create(saved, &LaunchIntent::Main, &mut delegate)?;
        tracing::debug!(?outcome, "Stage created");

        if restored && let Some(store) = store {
            for hosted in load_manifest(&manifest_path(store, stage.id()))? {
                let scene_type = scenes
                    .resolve(&hosted.scene)
                    .ok_or_else(|| anyhow!("saved scene `{}` is not declared", hosted.scene))?;
                let scene = scenes.instantiate(&scene_type, None)?;
                stage.host_mut().adopt(hosted.tag, scene, hosted.detached);
            }
        }

        let mut stages = StageRegistry::new();
        let id = stages.register(stage)?;
        Ok(Self {
            scenes,
            stages,
            id,
            events,
        })
    }

    fn stage(&self) -> Result<&Stage<MemoryHost>> {
        self.stages
            .get(self.id)
            .ok_or_else(|| anyhow!("stage {} is not registered", self.id))
    }

    fn stage_mut(&mut self) -> Result<&mut Stage<MemoryHost>> {
        let id = self.id;
        self.stages
            .get_mut(id)
            .ok_or_else(|| anyhow!("stage {id} is not registered"))
    }

    /// Render the current stack without applying anything.
    pub fn render(&self) -> Result<String> {
        Ok(render_stack(self.stage()?))
    }

    /// Apply one step and describe what happened.
    pub fn apply(&mut self, step: &Step) -> Result<String> {
        let commits_before = self.stage()?.host().commits().len();
        let (label, outcome) = match step {
            Step::Push {
                scene,
                args,
                request_code,
            } => {
                let scene_type = self
                    .scenes
                    .resolve(scene)
                    .ok_or_else(|| anyhow!("scene `{scene}` is not declared"))?;
                let stage = self.stage_mut()?;
                let mut announcement = Announcement::new(scene_type).maybe_args(args.clone());
                if let Some(code) = request_code {
                    match stage.current_top_tag() {
                        Some(top) => announcement = announcement.request_from(top.clone(), *code),
                        None => tracing::warn!("No scene to receive result {code}"),
                    }
                }
                let outcome = stage
                    .push(announcement)
                    .with_context(|| format!("push {scene}"))?;
                (format!("push {scene}"), describe_push(&outcome))
            }
            Step::Root { scene, args } => {
                let scene_type = self
                    .scenes
                    .resolve(scene)
                    .ok_or_else(|| anyhow!("scene `{scene}` is not declared"))?;
                let announcement = Announcement::new(scene_type).maybe_args(args.clone());
                let outcome = self
                    .stage_mut()?
                    .push_as_root(announcement)
                    .with_context(|| format!("root {scene}"))?;
                (format!("root {scene}"), describe_push(&outcome))
            }
            Step::Pop { tag } => {
                let stage = self.stage_mut()?;
                let outcome = match tag {
                    Some(tag) => stage.pop(&SceneTag::new(tag.as_str())),
                    None => stage.pop_current_top(),
                };
                let label = tag
                    .as_ref()
                    .map_or_else(|| "pop".to_string(), |tag| format!("pop {tag}"));
                (label, describe_pop(&outcome))
            }
            Step::Refresh => {
                let refreshed = self.stage_mut()?.refresh_top();
                let outcome = if refreshed { "refreshed" } else { "nothing to refresh" };
                ("refresh".to_string(), outcome.to_string())
            }
            Step::Back => {
                let delivered = self.stage_mut()?.back_pressed();
                let outcome = if delivered { "delivered" } else { "no scene" };
                ("back".to_string(), outcome.to_string())
            }
        };

        let stage = self.stage()?;
        let mut out = format!("{label} -> {outcome}\n");
        if stage.host().commits().len() > commits_before
            && let Some(animation) = stage.host().last_commit().and_then(|commit| commit.animation)
        {
            let _ = writeln!(
                out,
                "  ~ {:?}/{:?} {}ms",
                animation.enter.kind(),
                animation.exit.kind(),
                animation.enter.duration().as_millis()
            );
        }
        for event in self.events.borrow_mut().drain(..) {
            let _ = writeln!(out, "  ! {event}");
        }
        out.push_str(&render_stack(stage));
        Ok(out)
    }

    /// Persist the stack, or clear the snapshot once the stage has finished.
    pub fn save(&self, store: &SnapshotStore) -> Result<()> {
        let stage = self.stage()?;
        let manifest = manifest_path(store, stage.id());
        if stage.is_finished() {
            store.remove(stage.id())?;
            if manifest.exists() {
                std::fs::remove_file(&manifest)
                    .with_context(|| format!("failed to remove {}", manifest.display()))?;
            }
            return Ok(());
        }

        let path = store.save(&stage.capture_state())?;
        let hosted: Vec<HostedScene> = stage
            .host()
            .hosted()
            .into_iter()
            .map(|(tag, scene, detached)| HostedScene {
                tag: tag.clone(),
                scene: scene.scene_type().to_string(),
                detached,
            })
            .collect();
        let json = serde_json::to_string_pretty(&hosted)?;
        atomic_write(&manifest, json.as_bytes())
            .with_context(|| format!("failed to write {}", manifest.display()))?;
        tracing::info!(path = %path.display(), "Saved stage");
        Ok(())
    }
}

fn build_registry(script: &Script, config: &StageConfig, events: &Events) -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    for decl in &script.scenes {
        let scene_type = SceneType::new(decl.name.as_str());
        let events = Rc::clone(events);
        let factory_type = scene_type.clone();
        registry.register(
            scene_type.clone(),
            decl.mode,
            move |args: Option<SceneArgs>| -> Box<dyn Scene> {
                Box::new(ScriptScene {
                    scene_type: factory_type.clone(),
                    args,
                    events: Rc::clone(&events),
                })
            },
        );
        for ancestor in &decl.ancestors {
            registry.register_ancestor(scene_type.clone(), SceneType::new(ancestor.as_str()));
        }
    }
    registry.apply_launch_modes(&config.launch_modes);
    registry
}

fn manifest_path(store: &SnapshotStore, id: StageId) -> PathBuf {
    store.dir().join(format!("host-{id}.json"))
}

fn load_manifest(path: &Path) -> Result<Vec<HostedScene>> {
    recover_bak_file(path);
    if !path.exists() {
        tracing::warn!("No host manifest at {}", path.display());
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid host manifest {}", path.display()))
}

fn describe_push(outcome: &PushOutcome) -> String {
    match outcome {
        PushOutcome::Created { tag } => format!("created {tag}"),
        PushOutcome::Reused { tag } => format!("reused {tag}"),
        PushOutcome::Truncated { tag, removed } if removed.is_empty() => {
            format!("brought {tag} to front")
        }
        PushOutcome::Truncated { tag, removed } => {
            let removed: Vec<&str> = removed.iter().map(SceneTag::as_str).collect();
            format!("truncated to {tag}, removed {}", removed.join(","))
        }
        PushOutcome::Rooted {
            tag,
            created,
            removed,
        } => {
            let verb = if *created { "new root" } else { "kept root" };
            let removed: Vec<&str> = removed.iter().map(SceneTag::as_str).collect();
            if removed.is_empty() {
                format!("{verb} {tag}")
            } else {
                format!("{verb} {tag}, removed {}", removed.join(","))
            }
        }
    }
}

fn describe_pop(outcome: &PopOutcome) -> String {
    match outcome {
        PopOutcome::Popped {
            tag,
            result_delivered: true,
        } => format!("popped {tag}, result delivered"),
        PopOutcome::Popped { tag, .. } => format!("popped {tag}"),
        PopOutcome::StageFinished => "stage finished".to_string(),
        PopOutcome::Ignored => "ignored".to_string(),
    }
}

fn render_stack(stage: &Stage<MemoryHost>) -> String {
    let mut out = String::new();
    if stage.stack().is_empty() {
        out.push_str("  (empty)\n");
    }
    for entry in stage.stack() {
        let tag = entry.tag();
        let name = stage
            .find_scene_by_tag(tag)
            .map_or_else(|| "?".to_string(), |scene| scene.scene_type().to_string());
        let state = if stage.host().is_detached(tag) {
            " (detached)"
        } else {
            ""
        };
        let waiting = entry
            .pending_request()
            .map(|request| format!(" <- {}#{}", request.requester, request.request_code))
            .unwrap_or_default();
        let _ = writeln!(out, "  [{tag}] {name}{state}{waiting}");
    }
    if stage.is_finished() {
        out.push_str("  (finished)\n");
    }
    out
}
