//! Result delivery between scenes

use stage_core::{Announcement, PopOutcome, ResultCode, SceneArgs, SceneResult, SceneType};

use crate::common::{Event, abc_stage, push, tags};

fn reply(text: &str) -> SceneArgs {
    SceneArgs::new().with("reply", text)
}

#[test]
fn result_reaches_requester_below() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    stage
        .push(Announcement::new("B").args(reply("blue")).request_from("0".into(), 11))
        .unwrap();

    let outcome = stage.pop_current_top();
    assert_eq!(
        outcome,
        PopOutcome::Popped {
            tag: "1".into(),
            result_delivered: true,
        }
    );
    assert_eq!(
        journal.results(),
        [(SceneType::new("A"), 11, SceneResult::ok(Some(reply("blue"))))]
    );
}

#[test]
fn scene_without_result_delivers_canceled() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    stage
        .push(Announcement::new("A").request_from("0".into(), 3))
        .unwrap();

    stage.pop_current_top();
    let results = journal.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].2.code, ResultCode::Canceled);
    assert!(results[0].2.data.is_none());
}

#[test]
fn mid_stack_pop_still_delivers() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    stage
        .push(Announcement::new("B").args(reply("x")).request_from("0".into(), 1))
        .unwrap();
    push(&mut stage, "A");

    let outcome = stage.pop(&"1".into());
    assert!(matches!(
        outcome,
        PopOutcome::Popped {
            result_delivered: true,
            ..
        }
    ));
    assert_eq!(journal.results().len(), 1);
    assert_eq!(tags(&stage), ["0", "2"]);
}

#[test]
fn result_is_dropped_when_requester_is_gone() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    push(&mut stage, "A");
    stage
        .push(Announcement::new("A").args(reply("late")).request_from("1".into(), 5))
        .unwrap();

    stage.pop(&"1".into());
    let outcome = stage.pop_current_top();
    assert_eq!(
        outcome,
        PopOutcome::Popped {
            tag: "2".into(),
            result_delivered: false,
        }
    );
    assert!(journal.results().is_empty());
}

#[test]
fn result_for_unknown_requester_is_dropped() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "A");
    stage
        .push(Announcement::new("A").args(reply("x")).request_from("42".into(), 5))
        .unwrap();
    stage.pop_current_top();
    assert!(journal.results().is_empty());
}

#[test]
fn single_task_truncation_drops_pending_requests() {
    let (mut stage, journal) = abc_stage();
    push(&mut stage, "C");
    stage
        .push(Announcement::new("A").args(reply("never")).request_from("0".into(), 9))
        .unwrap();

    push(&mut stage, "C");
    assert_eq!(tags(&stage), ["0"]);
    assert!(journal.results().is_empty());
    assert!(
        !journal
            .events()
            .iter()
            .any(|(_, event)| matches!(event, Event::Result { .. }))
    );
}

#[test]
fn pending_request_is_visible_on_entry() {
    let (mut stage, _) = abc_stage();
    push(&mut stage, "A");
    stage
        .push(Announcement::new("A").request_from("0".into(), 2))
        .unwrap();

    let entry = stage.find_entry_by_tag(&"1".into()).unwrap();
    let request = entry.pending_request().unwrap();
    assert_eq!(request.requester.as_str(), "0");
    assert_eq!(request.request_code, 2);
    assert!(stage.find_entry_by_tag(&"0".into()).unwrap().pending_request().is_none());
}

#[test]
fn finishing_stage_does_not_deliver() {
    let (mut stage, journal) = abc_stage();
    stage
        .push(Announcement::new("A").args(reply("x")).request_from("0".into(), 1))
        .unwrap();
    assert_eq!(stage.pop_current_top(), PopOutcome::StageFinished);
    assert!(journal.results().is_empty());
}
