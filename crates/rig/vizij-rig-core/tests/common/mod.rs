#![allow(dead_code)]

use vizij_face_api::math::quat_angle;
use vizij_face_api::Quat;
use vizij_rig_core::{MappingResolver, MemoryScene, NodeSnapshot, Profile};

pub fn cc4_profile() -> Profile {
    let json = vizij_test_fixtures::profiles::json("cc4").expect("cc4 profile fixture");
    Profile::from_json(&json).expect("cc4 profile parses")
}

pub fn cc4_scene() -> MemoryScene {
    let nodes = vizij_test_fixtures::scene_nodes("cc4-head").expect("cc4 scene fixture");
    let mut scene = MemoryScene::new();
    for n in nodes {
        scene.insert(
            &n.name,
            NodeSnapshot {
                position: n.position,
                rotation: n.rotation,
            },
        );
    }
    scene
}

pub fn bound_cc4() -> MappingResolver {
    let scene = cc4_scene();
    let mut resolver = MappingResolver::new(cc4_profile());
    resolver.bind_scene(&scene);
    resolver
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5
}

pub fn assert_quat_close(actual: Quat, expected: Quat) {
    let angle = quat_angle(actual, expected);
    assert!(
        angle < 1e-4,
        "quaternions differ by {angle} rad: {actual:?} vs {expected:?}"
    );
}
