//! Capture, restore and snapshot files

use std::rc::Rc;

use stage_core::{
    Announcement, LaunchIntent, LaunchMode, LaunchOutcome, MemoryHost, NavigationError,
    PushOutcome, SceneArgs, SceneTag, SceneType, SnapshotStore, Stage, StageDelegate, StageId,
    StageRecord, StageRegistry,
};

use crate::common::{Journal, abc_stage, push, registry, tags, types};

fn build(steps: &[&str]) -> Stage<MemoryHost> {
    let (mut stage, _) = abc_stage();
    for step in steps {
        match *step {
            "pop" => {
                stage.pop_current_top();
            }
            name => {
                push(&mut stage, name);
            }
        }
    }
    stage
}

#[test]
fn capture_restore_round_trips_for_varied_stacks() {
    let scripts: [&[&str]; 5] = [
        &[],
        &["A"],
        &["A", "B", "B", "C", "A"],
        &["A", "A", "pop", "A", "C", "A", "C"],
        &["C", "A", "A", "pop", "pop", "B"],
    ];
    for script in scripts {
        let stage = build(script);
        let record = stage.capture_state();

        let (mut restored, _) = abc_stage();
        restored.restore_state(record.clone()).unwrap();
        let again = restored.capture_state();
        assert_eq!(again, record, "{script:?}");
        assert_eq!(again.tag_list, stage.stack().tags());
    }
}

#[test]
fn capture_does_not_advance_generator() {
    let stage = build(&["A", "A"]);
    assert_eq!(stage.capture_state().next_id, 2);
    assert_eq!(stage.capture_state().next_id, 2);
}

#[test]
fn record_json_layout() {
    let mut stages = StageRegistry::new();
    let id = stages.register(build(&["A", "A", "A", "pop", "A"])).unwrap();
    let record = stages.get(id).unwrap().capture_state();

    insta::assert_snapshot!(
        record.to_json().unwrap(),
        @r#"{"stage_id":0,"tag_list":["0","1","3"],"next_id":4}"#
    );
}

#[test]
fn restore_into_used_stage_fails() {
    let mut stage = build(&["A"]);
    let record = StageRecord {
        stage_id: StageId::new(1),
        tag_list: vec!["0".into()],
        next_id: 1,
    };
    assert!(matches!(
        stage.restore_state(record),
        Err(NavigationError::RestoreAfterMutation)
    ));
    assert_eq!(tags(&stage), ["0"]);
}

#[test]
fn restored_stage_continues_after_adopting_instances() {
    let original = build(&["A", "B", "A"]);
    let record = original.capture_state();

    let journal = Journal::default();
    let scenes = registry(
        &journal,
        &[
            ("A", LaunchMode::Standard),
            ("B", LaunchMode::SingleTop),
            ("C", LaunchMode::SingleTask),
        ],
    );
    let scenes = Rc::new(scenes);
    let mut stage = Stage::new(Rc::clone(&scenes), MemoryHost::new());
    stage.restore_state(record).unwrap();
    for (tag, name) in [("0", "A"), ("1", "B"), ("2", "A")] {
        let scene = scenes.instantiate(&SceneType::new(name), None).unwrap();
        stage.host_mut().adopt(tag.into(), scene, tag != "2");
    }

    assert_eq!(types(&stage), ["A", "B", "A"]);
    let outcome = push(&mut stage, "C");
    assert_eq!(outcome, PushOutcome::Created { tag: "3".into() });
    stage.pop_current_top();
    stage.pop_current_top();
    assert_eq!(stage.current_top_type(), Some(SceneType::new("B")));
}

#[test]
fn snapshot_store_round_trip_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let mut stages = StageRegistry::new();
    let first = stages.register(build(&["A"])).unwrap();
    let second = stages.register(build(&["A", "C", "A"])).unwrap();
    for id in [first, second] {
        store.save(&stages.get(id).unwrap().capture_state()).unwrap();
    }

    let record = store.load(second).unwrap().unwrap();
    assert_eq!(record.stage_id, second);
    assert_eq!(record.tag_list, ["0", "1", "2"].map(SceneTag::from));

    let (mut restored, _) = abc_stage();
    restored.restore_state(record).unwrap();
    let mut reopened = StageRegistry::new();
    reopened.register(build(&["A"])).unwrap();
    reopened.register(build(&["B"])).unwrap();
    assert!(matches!(
        reopened.register(restored),
        Err(NavigationError::StageIdInUse(_))
    ));
}

struct Launcher;

impl StageDelegate for Launcher {
    fn launch_announcement(&mut self) -> Option<Announcement> {
        Some(Announcement::new("A").args(SceneArgs::new().with("cold", true)))
    }
}

#[test]
fn on_create_prefers_saved_record() {
    let (mut cold, _) = abc_stage();
    let outcome = cold
        .on_create(None, &LaunchIntent::Main, &mut Launcher)
        .unwrap();
    assert!(matches!(outcome, LaunchOutcome::Started(PushOutcome::Created { .. })));
    push(&mut cold, "B");

    let (mut warm, _) = abc_stage();
    let outcome = warm
        .on_create(Some(cold.capture_state()), &LaunchIntent::Main, &mut Launcher)
        .unwrap();
    assert_eq!(outcome, LaunchOutcome::Restored);
    assert_eq!(warm.stack().tags(), cold.stack().tags());
}

#[test]
fn view_order_follows_host_removals() {
    let journal = Journal::default();
    let scenes = registry(&journal, &[("A", LaunchMode::Standard)]);
    let mut stage = Stage::new(Rc::new(scenes), MemoryHost::new());
    push(&mut stage, "A");
    for _ in 0..1000 {
        push(&mut stage, "A");
        stage.pop_current_top();
    }

    assert_eq!(stage.view_order().len(), stage.stack_depth());
    assert_eq!(stage.host().len(), 1);

    let outcome = push(&mut stage, "A");
    assert_eq!(outcome.tag().as_str(), "1001");
    let record = stage.capture_state();
    assert_eq!(record.next_id, 1002);
}
