use std::cell::Cell;
use std::rc::Rc;

use vizij_animation_core::{
    parse_snippet_json, parse_snippet_json_named, CurveScheduler, Keyframe, ScheduleError,
    SchedulerEvent, SnippetCategory, SnippetParseError, SnippetSpec, SnippetState, TargetKey,
    TargetValueTable,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn keys(pairs: &[(f32, f32)]) -> Vec<Keyframe> {
    pairs.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
}

fn au_snippet(name: &str, priority: i32, curve: &str, pairs: &[(f32, f32)]) -> SnippetSpec {
    SnippetSpec::new(name, SnippetCategory::AuSnippet)
        .with_priority(priority)
        .with_curve(curve, keys(pairs))
}

fn run(s: &mut CurveScheduler, table: &mut TargetValueTable, dt: f32, steps: usize) {
    for _ in 0..steps {
        s.tick(dt, table);
    }
}

#[test]
fn duration_is_the_latest_keyframe() {
    let mut s = CurveScheduler::default();
    s.schedule(
        SnippetSpec::new("brows", SnippetCategory::AuSnippet)
            .with_curve("1", keys(&[(0.0, 0.0), (0.25, 1.0)]))
            .with_curve("2", keys(&[(0.1, 0.0), (0.8, 1.0)])),
    )
    .unwrap();
    approx(s.get("brows").unwrap().duration, 0.8, 1e-6);
}

#[test]
fn higher_priority_wins_in_either_schedule_order() {
    // viseme channel 3: X pushes hard, Y holds it closed
    let x = || {
        SnippetSpec::new("x", SnippetCategory::VisemeSnippet)
            .with_priority(50)
            .with_curve("3", keys(&[(0.0, 80.0), (0.1, 80.0), (0.5, 80.0)]))
    };
    let y = || {
        SnippetSpec::new("y", SnippetCategory::VisemeSnippet)
            .with_priority(60)
            .with_curve("3", keys(&[(0.0, 0.0), (0.1, 0.0), (0.5, 0.0)]))
    };

    for x_first in [true, false] {
        let mut s = CurveScheduler::default();
        let mut table = TargetValueTable::new();
        if x_first {
            s.schedule(x()).unwrap();
            s.schedule(y()).unwrap();
        } else {
            s.schedule(y()).unwrap();
            s.schedule(x()).unwrap();
        }
        s.tick(0.1, &mut table);
        assert_eq!(s.sampled(&TargetKey::viseme(3)), Some(0.0));
        assert_eq!(table.value(&TargetKey::viseme(3)), 0.0);
    }
}

#[test]
fn equal_priority_goes_to_the_later_schedule() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("first", 10, "12", &[(0.0, 0.2), (1.0, 0.2)]))
        .unwrap();
    s.schedule(au_snippet("second", 10, "12", &[(0.0, 0.9), (1.0, 0.9)]))
        .unwrap();
    s.tick(0.1, &mut table);
    approx(table.au(12), 0.9, 1e-6);
}

#[test]
fn rescheduling_a_name_replaces_it_and_counts_as_newest() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("a", 10, "12", &[(0.0, 0.3), (1.0, 0.3)]))
        .unwrap();
    s.schedule(au_snippet("b", 10, "12", &[(0.0, 0.6), (1.0, 0.6)]))
        .unwrap();
    s.schedule(au_snippet("a", 10, "12", &[(0.0, 0.1), (1.0, 0.1)]))
        .unwrap();
    assert_eq!(s.len(), 2);
    s.tick(0.1, &mut table);
    approx(table.au(12), 0.1, 1e-6);

    let events = s.drain_events();
    assert!(events.contains(&SchedulerEvent::SnippetReplaced { name: "a".into() }));
}

#[test]
fn non_looping_snippet_completes_once_and_fires_listener_once() {
    let fired = Rc::new(Cell::new(0u32));
    let mut s = CurveScheduler::default();
    {
        let fired = Rc::clone(&fired);
        s.set_on_snippet_end(move |name| {
            assert_eq!(name, "blink");
            fired.set(fired.get() + 1);
        });
    }
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("blink", 0, "43", &[(0.0, 0.0), (0.15, 1.0), (0.3, 0.0)]))
        .unwrap();

    run(&mut s, &mut table, 0.01, 31);
    assert_eq!(s.snippet_state("blink"), Some(SnippetState::Completed));
    assert_eq!(fired.get(), 1);

    run(&mut s, &mut table, 0.01, 20);
    assert_eq!(fired.get(), 1);

    let ended = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SchedulerEvent::SnippetEnded { .. }))
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn completing_tick_still_writes_the_final_key() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("up", 0, "12", &[(0.0, 0.0), (0.3, 0.8)]))
        .unwrap();
    s.tick(0.5, &mut table);
    assert!(s.get("up").unwrap().is_completed());
    approx(table.au(12), 0.8, 1e-6);

    // After completion nothing is written; the table keeps the last value.
    s.tick(0.1, &mut table);
    assert_eq!(s.sampled(&TargetKey::au(12)), None);
    approx(table.au(12), 0.8, 1e-6);
}

#[test]
fn looping_snippet_wraps_and_never_completes() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(
        au_snippet("breath", 0, "38", &[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]).with_loop(true),
    )
    .unwrap();
    run(&mut s, &mut table, 0.25, 9);
    let snip = s.get("breath").unwrap();
    assert_eq!(snip.state, SnippetState::Playing);
    approx(snip.current_time, 0.25, 1e-5);
    approx(table.au(38), 0.5, 1e-5);
}

#[test]
fn scheduled_snippets_play_from_the_next_tick() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("ramp", 0, "12", &[(0.0, 0.0), (1.0, 1.0)]))
        .unwrap();
    assert_eq!(s.snippet_state("ramp"), Some(SnippetState::Scheduled));
    s.tick(0.2, &mut table);
    assert_eq!(s.snippet_state("ramp"), Some(SnippetState::Playing));
    approx(table.au(12), 0.2, 1e-6);
}

#[test]
fn continuum_curve_splits_into_its_pair() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(
        SnippetSpec::new("gaze", SnippetCategory::EyeTracking)
            .with_curve("61:62", keys(&[(0.0, -0.6), (1.0, -0.6)])),
    )
    .unwrap();
    s.tick(0.1, &mut table);
    approx(table.au(61), 0.6, 1e-6);
    assert_eq!(table.au(62), 0.0);
    approx(table.continuum(61, 62), -0.6, 1e-6);
}

#[test]
fn intensity_scale_then_band_clamp() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("hot", 0, "12", &[(0.0, 1.5), (1.0, 1.5)]).with_intensity_scale(2.0))
        .unwrap();
    s.schedule(au_snippet("neg", 0, "4", &[(0.0, -1.0), (1.0, -1.0)]))
        .unwrap();
    s.tick(0.1, &mut table);
    assert_eq!(table.au(12), 2.0);
    assert_eq!(table.au(4), 0.0);
}

#[test]
fn paused_snippet_holds_time_but_keeps_contributing() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("ramp", 0, "12", &[(0.0, 0.0), (1.0, 1.0)]))
        .unwrap();
    s.tick(0.3, &mut table);
    assert!(s.pause_snippet("ramp"));
    run(&mut s, &mut table, 0.1, 5);
    approx(s.get("ramp").unwrap().current_time, 0.3, 1e-6);
    approx(table.au(12), 0.3, 1e-6);

    assert!(s.resume_snippet("ramp"));
    s.tick(0.1, &mut table);
    approx(table.au(12), 0.4, 1e-6);
}

#[test]
fn seek_and_restart_reposition_local_time() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("ramp", 0, "12", &[(0.0, 0.0), (1.0, 1.0)]))
        .unwrap();
    s.tick(2.0, &mut table);
    assert!(s.get("ramp").unwrap().is_completed());

    assert!(s.seek("ramp", 0.5));
    assert_eq!(s.snippet_state("ramp"), Some(SnippetState::Playing));
    s.tick(0.0, &mut table);
    approx(table.au(12), 0.5, 1e-6);

    assert!(s.restart("ramp"));
    s.tick(0.1, &mut table);
    approx(table.au(12), 0.1, 1e-6);
    assert!(!s.seek("missing", 0.1));
}

#[test]
fn playback_rate_scales_local_time() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("fast", 0, "12", &[(0.0, 0.0), (1.0, 1.0)]).with_playback_rate(2.0))
        .unwrap();
    s.tick(0.25, &mut table);
    approx(table.au(12), 0.5, 1e-6);
    assert!(s.set_playback_rate("fast", 0.5));
    s.tick(0.2, &mut table);
    approx(table.au(12), 0.6, 1e-6);
}

#[test]
fn malformed_snippets_are_rejected_and_not_added() {
    let mut s = CurveScheduler::default();
    let empty = s.schedule(SnippetSpec::new("empty", SnippetCategory::AuSnippet));
    assert!(matches!(empty, Err(ScheduleError::EmptyCurveSet { .. })));
    let unsorted = s.schedule(au_snippet("bad", 0, "1", &[(0.5, 1.0), (0.1, 0.0)]));
    assert!(matches!(unsorted, Err(ScheduleError::UnsortedKeys { .. })));
    assert!(s.is_empty());
}

#[test]
fn removing_missing_snippet_is_a_no_op() {
    let mut s = CurveScheduler::default();
    assert!(!s.remove("ghost"));
    s.schedule(au_snippet("real", 0, "1", &[(0.0, 1.0)])).unwrap();
    assert!(s.remove("real"));
    assert!(!s.remove("real"));
}

#[test]
fn prune_and_prefix_removal() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    s.schedule(au_snippet("lipsync:0", 50, "1", &[(0.0, 0.0), (0.1, 1.0)]))
        .unwrap();
    s.schedule(au_snippet("lipsync:1", 50, "2", &[(0.0, 0.0), (5.0, 1.0)]))
        .unwrap();
    s.schedule(au_snippet("idle", 0, "3", &[(0.0, 0.0), (5.0, 1.0)]))
        .unwrap();
    s.tick(0.2, &mut table);
    assert_eq!(s.prune_completed(), vec!["lipsync:0".to_string()]);
    assert_eq!(s.remove_prefixed("lipsync:"), 1);
    assert_eq!(s.active_names(), vec!["idle"]);
}

#[test]
fn fixtures_parse_and_schedule() {
    let mut s = CurveScheduler::default();
    let mut table = TargetValueTable::new();
    for key in ["smile", "nod-loop", "viseme-demo"] {
        let json = vizij_test_fixtures::snippets::json(key).unwrap();
        let spec = parse_snippet_json(&json).unwrap();
        s.schedule(spec).unwrap();
    }
    approx(s.get("smile").unwrap().duration, 1.6, 1e-6);
    assert!(s.get("nod-loop").unwrap().looping);

    s.tick(0.1, &mut table);
    // viseme-demo: plain "3" is a viseme, scaled by 0.8; "au:26" stays an AU
    approx(table.value(&TargetKey::viseme(3)), 0.8, 1e-5);
    approx(table.au(26), 0.32, 1e-5);
    assert_eq!(table.get(&TargetKey::au(3)), None);

    let unsorted = vizij_test_fixtures::snippets::json("unsorted").unwrap();
    assert!(matches!(
        parse_snippet_json_named(&unsorted, "unsorted"),
        Err(SnippetParseError::Invalid(ScheduleError::UnsortedKeys { .. }))
    ));
}

#[test]
fn authoring_export_round_trips() {
    let json = vizij_test_fixtures::snippets::json("viseme-demo").unwrap();
    let spec = parse_snippet_json(&json).unwrap();
    let exported = vizij_animation_core::to_authoring_json(&spec).unwrap();
    assert_eq!(parse_snippet_json(&exported).unwrap(), spec);
}
