mod common;

use common::{approx, assert_quat_close, bound_cc4};
use vizij_face_api::math::{quat_from_axis_angle, quat_mul, QUAT_IDENTITY};
use vizij_face_api::{BonePose, RecordingSink, TargetKey, TargetValueTable};
use vizij_rig_core::{MappingResolver, MemoryScene, NodeSnapshot, Profile, RigApplier};

const X: [f32; 3] = [1.0, 0.0, 0.0];
const Y: [f32; 3] = [0.0, 1.0, 0.0];
const Z: [f32; 3] = [0.0, 0.0, 1.0];

fn deg(axis: [f32; 3], degrees: f32) -> [f32; 4] {
    quat_from_axis_angle(axis, degrees.to_radians())
}

fn render(resolver: &MappingResolver, table: &TargetValueTable) -> RecordingSink {
    let mut sink = RecordingSink::new();
    RigApplier::new().build(resolver, table).apply_to(&mut sink);
    sink
}

fn resolver_for(json: &str, nodes: &[&str]) -> MappingResolver {
    let mut scene = MemoryScene::new();
    for n in nodes {
        scene.insert(n, NodeSnapshot::default());
    }
    let mut resolver = MappingResolver::new(Profile::from_json(json).unwrap());
    resolver.bind_scene(&scene);
    resolver
}

#[test]
fn neutral_table_leaves_bones_at_base() {
    let resolver = bound_cc4();
    let sink = render(&resolver, &TargetValueTable::new());
    assert_quat_close(sink.rotation("HEAD").unwrap(), QUAT_IDENTITY);
    assert_quat_close(sink.rotation("EYE_L").unwrap(), QUAT_IDENTITY);
    assert_quat_close(
        sink.rotation("JAW").unwrap(),
        [0.0, 0.0, 0.70710677, 0.70710677],
    );
    assert!(sink.rotation("NECK").is_none());
}

#[test]
fn continuum_pair_picks_side_and_direction() {
    let resolver = bound_cc4();

    let mut table = TargetValueTable::new();
    table.set_au(52, 1.0);
    let right = render(&resolver, &table);
    assert_quat_close(right.rotation("HEAD").unwrap(), deg(Y, -30.0));

    let mut table = TargetValueTable::new();
    table.set_au(51, 0.5);
    let left = render(&resolver, &table);
    assert_quat_close(left.rotation("HEAD").unwrap(), deg(Y, 15.0));
}

#[test]
fn opposing_pair_sides_cancel() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set_au(51, 0.6);
    table.set_au(52, 0.6);
    let sink = render(&resolver, &table);
    assert_quat_close(sink.rotation("HEAD").unwrap(), QUAT_IDENTITY);
}

#[test]
fn each_axis_is_independent_and_composed_yaw_pitch_roll() {
    let resolver = bound_cc4();

    let mut pitch_only = TargetValueTable::new();
    pitch_only.set_au(54, 1.0);
    assert_quat_close(
        render(&resolver, &pitch_only).rotation("HEAD").unwrap(),
        deg(X, 20.0),
    );

    let mut all = TargetValueTable::new();
    all.set_au(52, 1.0);
    all.set_au(54, 1.0);
    all.set_au(55, 1.0);
    let expected = quat_mul(quat_mul(deg(Y, -30.0), deg(X, 20.0)), deg(Z, 15.0));
    assert_quat_close(render(&resolver, &all).rotation("HEAD").unwrap(), expected);
}

#[test]
fn composing_twice_yields_the_same_pose() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set_au(51, 0.4);
    table.set_au(63, 0.7);
    table.set_au(26, 0.9);

    let applier = RigApplier::new();
    let first = applier.build(&resolver, &table);
    let second = applier.build(&resolver, &table);
    assert_eq!(first, second);
}

#[test]
fn max_of_axis_takes_strongest_and_applies_relative_to_base() {
    let resolver = bound_cc4();
    let base = [0.0, 0.0, 0.70710677, 0.70710677];

    let mut table = TargetValueTable::new();
    table.set_au(25, 0.3);
    table.set_au(26, 0.8);
    let sink = render(&resolver, &table);
    // AU26 is mixed at 0.5: 0.8 * 0.5 * 18 degrees
    assert_quat_close(sink.rotation("JAW").unwrap(), quat_mul(base, deg(X, 7.2)));
    assert!(approx(sink.morph("Jaw_Open"), 0.4));
    assert!(approx(sink.morph("Mouth_Lips_Part"), 0.15));
}

#[test]
fn max_of_tie_keeps_first_listed() {
    let resolver = bound_cc4();
    let base = [0.0, 0.0, 0.70710677, 0.70710677];
    let mut table = TargetValueTable::new();
    table.set_au(25, 0.5);
    table.set_au(27, 0.5);
    let sink = render(&resolver, &table);
    // AU25: 0.5 * 0.5 (default mix) * 6 degrees
    assert_quat_close(sink.rotation("JAW").unwrap(), quat_mul(base, deg(X, 1.5)));
}

#[test]
fn mixed_eye_au_splits_between_morph_and_bone() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set_au(61, 1.0);
    let sink = render(&resolver, &table);

    assert!(approx(sink.morph("Eye_L_Look_L"), 0.2));
    assert!(approx(sink.morph("Eye_R_Look_L"), 0.2));
    assert_quat_close(sink.rotation("EYE_L").unwrap(), deg(Y, 25.6));
    assert_quat_close(sink.rotation("EYE_R").unwrap(), deg(Y, 25.6));
}

#[test]
fn translation_binding_offsets_from_base_position() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set_au(29, 1.0);
    let sink = render(&resolver, &table);
    let t = sink.translation("JAW").unwrap();
    assert!(approx(t[0], 0.0) && approx(t[1], 1.58) && approx(t[2], 0.43), "{t:?}");
}

#[test]
fn flip_negates_axis_rotation() {
    let json = r#"{
        "auToBones": { "26": [{ "bone": "JAW", "channel": "rx", "maxDegrees": 20 }] },
        "compositeRotations": [
            { "bone": "JAW", "pitch": { "maxOf": [26], "axis": "rx", "flip": true } }
        ]
    }"#;
    let resolver = resolver_for(json, &["JAW"]);
    let mut table = TargetValueTable::new();
    table.set_au(26, 0.5);
    assert_quat_close(
        render(&resolver, &table).rotation("JAW").unwrap(),
        deg(X, -10.0),
    );
}

#[test]
fn axis_without_binding_uses_its_own_limit() {
    let json = r#"{
        "compositeRotations": [
            { "bone": "HEAD", "yaw": { "pair": [51, 52], "axis": "ry", "maxDegrees": 20 } }
        ]
    }"#;
    let resolver = resolver_for(json, &["HEAD"]);

    let mut table = TargetValueTable::new();
    table.set_au(52, 0.5);
    assert_quat_close(render(&resolver, &table).rotation("HEAD").unwrap(), deg(Y, 10.0));

    let mut table = TargetValueTable::new();
    table.set_au(51, 0.5);
    assert_quat_close(render(&resolver, &table).rotation("HEAD").unwrap(), deg(Y, -10.0));
}

#[test]
fn non_composite_bone_gets_per_binding_rotation() {
    let json = r#"{
        "auToBones": {
            "9":  [{ "bone": "NOSE", "channel": "rx", "maxDegrees": 10 }],
            "10": [{ "bone": "NOSE", "channel": "rz", "scale": -1, "maxDegrees": 4 }]
        }
    }"#;
    let resolver = resolver_for(json, &["NOSE"]);
    let mut table = TargetValueTable::new();
    table.set_au(9, 1.0);
    table.set_au(10, 0.5);
    let expected = quat_mul(deg(X, 10.0), deg(Z, -2.0));
    assert_quat_close(render(&resolver, &table).rotation("NOSE").unwrap(), expected);
}

#[test]
fn unresolved_bone_writes_nothing() {
    let json = r#"{
        "auToBones": { "9": [{ "bone": "NOSE", "channel": "rx", "maxDegrees": 10 }] }
    }"#;
    let resolver = resolver_for(json, &[]);
    let mut table = TargetValueTable::new();
    table.set_au(9, 1.0);
    let batch = RigApplier::new().build(&resolver, &table);
    assert!(batch.bones.is_empty());
}

#[test]
fn morph_collisions_keep_strongest_value() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set_au(12, 0.6);
    table.set(TargetKey::morph("Mouth_Smile_L"), 0.3);
    table.set(TargetKey::morph("Mouth_Smile_R"), 0.9);
    let sink = render(&resolver, &table);
    assert!(approx(sink.morph("Mouth_Smile_L"), 0.6));
    assert!(approx(sink.morph("Mouth_Smile_R"), 0.9));
}

#[test]
fn visemes_map_to_profile_keys_and_unknown_indices_are_dropped() {
    let resolver = bound_cc4();
    let mut table = TargetValueTable::new();
    table.set(TargetKey::viseme(3), 0.7);
    table.set(TargetKey::viseme(99), 1.0);
    let batch = RigApplier::new().build(&resolver, &table);
    assert_eq!(batch.morph("V_Ch_J"), Some(0.7));
    assert_eq!(batch.morphs.len(), 1);
}

#[test]
fn bone_writes_carry_resolved_node_names() {
    let resolver = bound_cc4();
    let batch = RigApplier::new().build(&resolver, &TargetValueTable::new());
    let eye = batch.bone("EYE_L").next().unwrap();
    assert_eq!(eye.node, "CC_Base_L_Eye.001");
    assert!(matches!(eye.pose, BonePose::Rotation(_)));
}
