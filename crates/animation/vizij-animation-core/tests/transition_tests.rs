use vizij_animation_core::{
    Easing, TargetKey, TargetValueTable, TransitionEngine, TransitionRequest, TransitionState,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn negative_duration_resolves_immediately() {
    let mut engine = TransitionEngine::default();
    let mut table = TargetValueTable::new();
    let h = engine.start(
        &mut table,
        TransitionRequest::new(TargetKey::morph("Jaw_Open"), 0.2, 0.9, -10.0),
    );
    assert!(h.is_resolved());
    assert_eq!(table.value(&TargetKey::morph("Jaw_Open")), 0.9);
}

#[test]
fn restart_on_same_key_cancels_without_applying_old_target() {
    let mut engine = TransitionEngine::default();
    let mut table = TargetValueTable::new();
    let key = TargetKey::au(12);

    let first = engine.start(&mut table, TransitionRequest::new(key.clone(), 0.0, 1.0, 100.0));
    engine.tick(0.05, &mut table);
    approx(table.au(12), 0.5, 1e-5);

    let second = engine.start(&mut table, TransitionRequest::new(key.clone(), 0.5, 0.0, 100.0));
    assert_eq!(first.state(), TransitionState::Cancelled);
    assert_eq!(engine.len(), 1);
    // the cancelled transition never wrote its final value
    approx(table.au(12), 0.5, 1e-5);

    engine.tick(0.1, &mut table);
    assert!(second.is_resolved());
    assert_eq!(table.au(12), 0.0);
    engine.tick(0.1, &mut table);
    assert_eq!(table.au(12), 0.0);
}

#[test]
fn pause_freezes_elapsed_until_resume() {
    let mut engine = TransitionEngine::default();
    let mut table = TargetValueTable::new();
    let h = engine.start(
        &mut table,
        TransitionRequest::new(TargetKey::au(1), 0.0, 1.0, 200.0).with_easing(Easing::Linear),
    );
    engine.tick(0.05, &mut table);
    assert!(engine.pause(h.id()));
    assert_eq!(h.state(), TransitionState::Paused);
    for _ in 0..10 {
        engine.tick(0.05, &mut table);
    }
    approx(engine.elapsed_ms(h.id()).unwrap(), 50.0, 1e-3);
    approx(table.au(1), 0.25, 1e-5);

    assert!(engine.resume(h.id()));
    engine.tick(0.05, &mut table);
    approx(table.au(1), 0.5, 1e-5);
}

#[test]
fn cancel_is_per_transition_and_idempotent() {
    let mut engine = TransitionEngine::default();
    let mut table = TargetValueTable::new();
    let a = engine.start(&mut table, TransitionRequest::new(TargetKey::au(1), 0.0, 1.0, 100.0));
    let b = engine.start(&mut table, TransitionRequest::new(TargetKey::au(2), 0.0, 1.0, 100.0));

    assert!(engine.cancel(a.id()));
    assert!(!engine.cancel(a.id()));
    assert_eq!(a.state(), TransitionState::Cancelled);

    engine.tick(0.05, &mut table);
    assert_eq!(table.au(1), 0.0);
    approx(table.au(2), 0.5, 1e-5);
    assert!(!b.is_resolved());
    assert!(engine.is_active(&TargetKey::au(2)));
}

#[test]
fn cancel_all_resolves_every_handle() {
    let mut engine = TransitionEngine::default();
    let mut table = TargetValueTable::new();
    let handles: Vec<_> = (0..3)
        .map(|i| engine.start(&mut table, TransitionRequest::new(TargetKey::au(i), 0.0, 1.0, 50.0)))
        .collect();
    engine.cancel_all();
    assert!(handles.iter().all(|h| h.is_resolved()));
    assert!(engine.is_empty());
}
