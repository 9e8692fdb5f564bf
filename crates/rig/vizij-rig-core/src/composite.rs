//! Composite rotation composer.
//!
//! For each bone with a composite rotation entry, up to three independent axis
//! values (yaw, pitch, roll) are turned into quaternions, composed in that fixed
//! order and multiplied onto the bone's cached base rotation. The current scene
//! rotation is never read, so composing twice in one frame gives the same pose.
//!
//! Bones without a composite entry still receive their AU rotation bindings, one
//! axis rotation per binding in profile order, and every translation binding as an
//! offset from the base position.

use indexmap::IndexMap;
use vizij_face_api::math::{quat_from_axis_angle, quat_mul, vec3_add, vec3_scale, QUAT_IDENTITY};
use vizij_face_api::{BonePose, BoneWrite, Quat, RigWriteBatch, TargetValueTable, Vec3};

use crate::profile::{AxisConfig, AxisSource, BoneBinding};
use crate::resolver::MappingResolver;

#[derive(Debug, Default, Clone, Copy)]
pub struct CompositeComposer;

impl CompositeComposer {
    pub fn new() -> Self {
        Self
    }

    /// Signed axis value and the AU that supplied it; `None` when the axis is at rest.
    pub fn axis_value(axis: &AxisConfig, table: &TargetValueTable) -> Option<(u32, f32)> {
        match &axis.source {
            AxisSource::Pair([neg, pos]) => {
                let v = table.continuum(*neg, *pos);
                if v > 0.0 {
                    Some((*pos, v))
                } else if v < 0.0 {
                    Some((*neg, v))
                } else {
                    None
                }
            }
            AxisSource::MaxOf(aus) => {
                let mut best: Option<(u32, f32)> = None;
                for au in aus {
                    let v = table.au(*au).clamp(0.0, 1.0);
                    if best.map_or(true, |(_, b)| v > b) {
                        best = Some((*au, v));
                    }
                }
                best.filter(|(_, v)| *v > 0.0)
            }
        }
    }

    /// Quaternion for one axis of `bone`.
    pub fn axis_rotation(
        &self,
        resolver: &MappingResolver,
        bone: &str,
        axis: &AxisConfig,
        table: &TargetValueTable,
    ) -> Quat {
        let Some((au, value)) = Self::axis_value(axis, table) else {
            return QUAT_IDENTITY;
        };
        let value = value * resolver.bone_share(au);

        let binding = resolver
            .resolve_bone_bindings(au)
            .iter()
            .find(|b| b.bone == bone && b.channel == axis.axis);
        let (max_degrees, scale) = match binding {
            Some(b) => match b.max_degrees.or(axis.max_degrees) {
                Some(deg) => (deg, b.scale),
                None => return QUAT_IDENTITY,
            },
            None => match axis.max_degrees {
                Some(deg) => (deg, value.signum()),
                None => {
                    log::debug!("rig: no binding or maxDegrees for AU {au} on '{bone}'");
                    return QUAT_IDENTITY;
                }
            },
        };

        let mut radians = (max_degrees * value.abs() * scale).to_radians();
        if axis.flip {
            radians = -radians;
        }
        quat_from_axis_angle(axis.axis.axis(), radians)
    }

    /// Compose every bone driven by the profile and push the poses into `out`.
    pub fn compose(
        &self,
        resolver: &MappingResolver,
        table: &TargetValueTable,
        out: &mut RigWriteBatch,
    ) {
        let profile = resolver.profile();

        for cr in &profile.composite_rotations {
            let Some(bone) = resolver.resolve_bone(&cr.bone) else {
                continue;
            };
            let mut delta = QUAT_IDENTITY;
            for (_, axis) in cr.axes() {
                if let Some(axis) = axis {
                    delta = quat_mul(delta, self.axis_rotation(resolver, &cr.bone, axis, table));
                }
            }
            out.push_bone(BoneWrite {
                key: cr.bone.clone(),
                node: bone.node.clone(),
                pose: BonePose::Rotation(quat_mul(bone.base_rotation, delta)),
            });
        }

        let mut rotations: IndexMap<&str, Quat> = IndexMap::new();
        let mut offsets: IndexMap<&str, Vec3> = IndexMap::new();
        for (au, bindings) in &profile.au_to_bones {
            let value = table.au(*au).clamp(0.0, 1.0) * resolver.bone_share(*au);
            for b in bindings {
                if b.channel.is_rotation() {
                    if profile.composite_for(&b.bone).is_some() {
                        continue;
                    }
                    let q = binding_rotation(b, value);
                    let acc = rotations.entry(b.bone.as_str()).or_insert(QUAT_IDENTITY);
                    *acc = quat_mul(*acc, q);
                } else {
                    let offset = binding_offset(b, value);
                    let acc = offsets.entry(b.bone.as_str()).or_insert([0.0; 3]);
                    *acc = vec3_add(*acc, offset);
                }
            }
        }

        for (key, delta) in rotations {
            if let Some(bone) = resolver.resolve_bone(key) {
                out.push_bone(BoneWrite {
                    key: key.to_string(),
                    node: bone.node.clone(),
                    pose: BonePose::Rotation(quat_mul(bone.base_rotation, delta)),
                });
            }
        }
        for (key, offset) in offsets {
            if let Some(bone) = resolver.resolve_bone(key) {
                out.push_bone(BoneWrite {
                    key: key.to_string(),
                    node: bone.node.clone(),
                    pose: BonePose::Translation(vec3_add(bone.base_position, offset)),
                });
            }
        }
    }
}

fn binding_rotation(b: &BoneBinding, value: f32) -> Quat {
    let degrees = b.max_degrees.unwrap_or(0.0) * value * b.scale;
    quat_from_axis_angle(b.channel.axis(), degrees.to_radians())
}

fn binding_offset(b: &BoneBinding, value: f32) -> Vec3 {
    vec3_scale(b.channel.axis(), value * b.max_units.unwrap_or(0.0) * b.scale)
}
