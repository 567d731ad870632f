//! Launch-mode behaviour of push and pop

use std::rc::Rc;

use stage_core::{
    Announcement, CommittedOp, LaunchMode, MemoryHost, PopOutcome, PushOutcome, SceneArgs,
    SceneRegistry, SceneTag, SceneType, Stage,
};

use crate::common::{Event, Journal, abc_stage, push, registry, tags, types};

#[test]
fn worked_example() {
    let (mut stage, journal) = abc_stage();

    push(&mut stage, "A");
    push(&mut stage, "B");
    assert_eq!(tags(&stage), ["0", "1"]);

    let args = SceneArgs::new().with("filter", "recent");
    let outcome = stage
        .push(Announcement::new("B").args(args.clone()))
        .unwrap();
    assert_eq!(outcome, PushOutcome::Reused { tag: "1".into() });
    assert_eq!(journal.for_type("B").last(), Some(&Event::Args(args)));

    push(&mut stage, "C");
    let args = SceneArgs::new().with("page", 3);
    let outcome = stage
        .push(Announcement::new("C").args(args.clone()))
        .unwrap();
    assert_eq!(outcome.tag().as_str(), "2");
    assert_eq!(journal.for_type("C").last(), Some(&Event::Args(args)));
    assert_eq!(tags(&stage), ["0", "1", "2"]);

    push(&mut stage, "A");
    assert_eq!(tags(&stage), ["0", "1", "2", "3"]);

    push(&mut stage, "C");
    assert_eq!(tags(&stage), ["0", "1", "2"]);
    assert_eq!(types(&stage), ["A", "B", "C"]);
    assert!(!stage.host().contains(&"3".into()));
}

#[test]
fn standard_pushes_then_pops() {
    for n in 1..=5 {
        for m in 0..=n {
            let (mut stage, _) = abc_stage();
            push(&mut stage, "A");
            for _ in 0..n {
                push(&mut stage, "A");
            }
            for _ in 0..m {
                assert!(matches!(stage.pop_current_top(), PopOutcome::Popped { .. }));
            }
            assert_eq!(stage.stack_depth(), n - m + 1, "n={n} m={m}");
            assert!(!stage.is_finished());
        }
    }
}

#[test]
fn single_top_never_changes_depth_when_top_matches() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    push(&mut stage, "B");

    for page in 0..4 {
        let args = SceneArgs::new().with("page", page);
        stage
            .push(Announcement::new("B").args(args.clone()))
            .unwrap();
        assert_eq!(stage.stack_depth(), 2);
        assert_eq!(journal.for_type("B").last(), Some(&Event::Args(args)));
    }
}

#[test]
fn single_top_reuse_without_args_delivers_nothing() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "B");
    let before = journal.for_type("B").len();
    push(&mut stage, "B");
    assert_eq!(journal.for_type("B").len(), before);
}

#[test]
fn single_task_truncates_to_match_for_every_index() {
    for i in 0..4 {
        let journal = Journal::default();
        let scenes = registry(
            &journal,
            &[("A", LaunchMode::Standard), ("T", LaunchMode::SingleTask)],
        );
        let mut stage = Stage::new(Rc::new(scenes), MemoryHost::new());
        for position in 0..5 {
            push(&mut stage, if position == i { "T" } else { "A" });
        }

        let outcome = push(&mut stage, "T");
        assert_eq!(stage.stack_depth(), i + 1, "i={i}");
        assert_eq!(outcome.tag().as_str(), i.to_string());
        assert_eq!(stage.host().attached_tags(), [SceneTag::new(i.to_string())]);
    }
}

#[test]
fn single_task_without_match_behaves_like_standard() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "A");
    push(&mut stage, "A");
    let outcome = push(&mut stage, "C");
    assert_eq!(outcome, PushOutcome::Created { tag: "2".into() });
    assert_eq!(stage.stack_depth(), 3);
}

#[test]
fn single_task_truncation_is_one_commit() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "C");
    push(&mut stage, "A");
    push(&mut stage, "A");
    push(&mut stage, "A");
    let commits = stage.host().commits().len();

    push(&mut stage, "C");
    assert_eq!(stage.host().commits().len(), commits + 1);
    let ops = &stage.host().last_commit().unwrap().ops;
    assert_eq!(
        ops,
        &[
            CommittedOp::Remove("1".into()),
            CommittedOp::Remove("2".into()),
            CommittedOp::Remove("3".into()),
            CommittedOp::Attach("0".into()),
        ]
    );
}

#[test]
fn single_task_matches_through_custom_matcher() {
    let journal = Journal::default();
    let mut scenes = registry(
        &journal,
        &[
            ("gallery.grid", LaunchMode::SingleTask),
            ("gallery.viewer", LaunchMode::Standard),
            ("favorites.grid", LaunchMode::SingleTask),
        ],
    );
    scenes.set_matcher(|existing: &SceneType, requested: &SceneType| {
        let family = |ty: &SceneType| ty.as_str().ends_with(".grid");
        (family(existing) && family(requested)).then_some(true)
    });

    let mut stage = Stage::new(Rc::new(scenes), MemoryHost::new());
    push(&mut stage, "favorites.grid");
    push(&mut stage, "gallery.viewer");
    let outcome = push(&mut stage, "gallery.grid");

    assert_eq!(outcome.tag().as_str(), "0");
    assert_eq!(types(&stage), ["favorites.grid"]);
}

#[test]
fn push_of_unregistered_type_leaves_stack_untouched() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "A");
    assert!(stage.push(Announcement::new("Z")).is_err());
    assert_eq!(tags(&stage), ["0"]);
}

#[test]
fn missing_factory_is_fatal() {
    let mut scenes = SceneRegistry::new();
    scenes.register_launch_mode("orphan", LaunchMode::Standard);
    let mut stage = Stage::new(Rc::new(scenes), MemoryHost::new());
    let err = stage.push(Announcement::new("orphan")).unwrap_err();
    assert!(err.to_string().contains("orphan"));
    assert_eq!(stage.stack_depth(), 0);
}

#[test]
fn popping_sole_entry_finishes_stage() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "A");
    assert_eq!(stage.pop_current_top(), PopOutcome::StageFinished);
    assert!(stage.is_finished());
    assert!(stage.host().is_finished());
    assert!(stage.push(Announcement::new("A")).is_err());
}

#[test]
fn pop_with_empty_stack_is_ignored() {
    let (mut stage, _) = abc_stage();
    assert_eq!(stage.pop_current_top(), PopOutcome::Ignored);
    assert!(!stage.is_finished());
}

#[test]
fn tags_are_never_reused_after_pop() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "A");
    push(&mut stage, "A");
    stage.pop_current_top();
    let outcome = push(&mut stage, "A");
    assert_eq!(outcome, PushOutcome::Created { tag: "2".into() });
}

#[test]
fn back_press_and_refresh_target_top() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    push(&mut stage, "C");

    assert!(stage.back_pressed());
    assert_eq!(journal.for_type("C").last(), Some(&Event::Back));
    assert!(!journal.for_type("A").contains(&Event::Back));

    assert!(stage.refresh_top());
    assert_eq!(
        stage.host().last_commit().unwrap().ops,
        [CommittedOp::Detach("1".into()), CommittedOp::Attach("1".into())]
    );
    assert_eq!(stage.current_top_type(), Some(SceneType::new("C")));
}
