use crate::scene::ModelRoot;
use crate::viewer::params::{
    DIRECTION_RANGE, HEIGHT_RANGE, RangeParam, SCALE_RANGE, SPEED_RANGE, TILT_RANGE,
};
use crate::viewer::{DEFAULT_POSITION, DEFAULT_ROTATION, DEFAULT_SCALE, DEFAULT_SPEED};

/// Playback gate for the animation clock.
///
/// Invariant: `time_scale == if powered { last_speed } else { 0.0 }`.
/// `last_speed` survives a power-off so switching back on restores the
/// previous speed exactly.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackState {
    pub time_scale: f32,
    pub powered: bool,
    pub last_speed: f32,
}

impl PlaybackState {
    fn new(speed: f32) -> Self {
        Self {
            time_scale: speed,
            powered: true,
            last_speed: speed,
        }
    }

    fn refresh(&mut self) {
        self.time_scale = if self.powered { self.last_speed } else { 0.0 };
    }
}

/// Live two-way binding between the five control parameters and the model
/// transform / animation clock. Every apply is idempotent: feeding the same
/// value twice leaves the model in the same state.
#[derive(Debug, Clone)]
pub struct TransformBindings {
    pub speed: RangeParam,
    pub direction: RangeParam,
    pub height: RangeParam,
    pub scale: RangeParam,
    pub tilt: RangeParam,
    pub playback: PlaybackState,
}

impl TransformBindings {
    /// Seed parameter values from the post-normalization pose. Speed is the
    /// exception: it starts at the fixed default, decoupled from the asset.
    /// Scale seeds from the design scale constant the normalizer applied
    /// (the auto-fit factor is internal to the normalizer).
    pub fn seed(root: &ModelRoot) -> Self {
        Self {
            speed: SPEED_RANGE.with_value(DEFAULT_SPEED),
            direction: DIRECTION_RANGE.with_value(root.rotation.y),
            height: HEIGHT_RANGE.with_value(root.position.y),
            scale: SCALE_RANGE.with_value(DEFAULT_SCALE),
            tilt: TILT_RANGE.with_value(root.rotation.x),
            playback: PlaybackState::new(DEFAULT_SPEED),
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.playback.time_scale
    }

    pub fn apply_speed(&mut self, v: f32) {
        self.playback.last_speed = self.speed.set(v);
        self.playback.refresh();
    }

    pub fn apply_direction(&mut self, root: &mut ModelRoot, v: f32) {
        root.rotation.y = self.direction.set(v);
    }

    pub fn apply_height(&mut self, root: &mut ModelRoot, v: f32) {
        root.position.y = self.height.set(v);
    }

    /// Overrides the normalizer's composite scale; no re-centering.
    pub fn apply_scale(&mut self, root: &mut ModelRoot, v: f32) {
        root.scale = self.scale.set(v);
    }

    pub fn apply_tilt(&mut self, root: &mut ModelRoot, v: f32) {
        root.rotation.x = self.tilt.set(v);
    }

    /// Flip the power gate. Parameter values are untouched; only the
    /// effective playback rate changes.
    pub fn toggle_power(&mut self) {
        self.playback.powered = !self.playback.powered;
        self.playback.refresh();
    }

    /// Restore the hand-authored defaults (not the load-time seed values),
    /// re-apply them to the model and playback in one step, and force the
    /// power gate on.
    pub fn reset(&mut self, root: &mut ModelRoot) {
        self.playback.powered = true;
        self.speed.set(DEFAULT_SPEED);
        self.direction.set(DEFAULT_ROTATION[1]);
        self.height.set(DEFAULT_POSITION[1]);
        self.scale.set(DEFAULT_SCALE);
        self.tilt.set(DEFAULT_ROTATION[0]);

        root.rotation.x = self.tilt.value();
        root.rotation.y = self.direction.value();
        root.position.y = self.height.value();
        root.scale = self.scale.value();

        self.playback.last_speed = self.speed.value();
        self.playback.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::types::{CpuMesh, LoadedAsset, NodeDesc};
    use crate::scene::Aabb;
    use crate::viewer::normalize::normalize;
    use nalgebra_glm as glm;

    fn normalized_root() -> ModelRoot {
        let asset = LoadedAsset {
            name: "test".into(),
            nodes: vec![NodeDesc {
                name: "root".into(),
                parent: None,
                translation: glm::vec3(0.0, 0.0, 0.0),
                rotation: glm::Quat::new(1.0, 0.0, 0.0, 0.0),
                scale: glm::vec3(1.0, 1.0, 1.0),
            }],
            meshes: vec![CpuMesh {
                node: 0,
                positions: Vec::new(),
                normals: Vec::new(),
                uvs: Vec::new(),
                indices: Vec::new(),
                texture: None,
                bounds: Aabb::new(glm::vec3(-1.0, -1.0, -1.0), glm::vec3(1.0, 1.0, 1.0)),
            }],
            textures: Vec::new(),
            clips: Vec::new(),
        };
        let mut root = ModelRoot::from_asset(&asset);
        normalize(&mut root);
        root
    }

    #[test]
    fn seeds_from_pose_except_speed() {
        let root = normalized_root();
        let b = TransformBindings::seed(&root);
        assert_eq!(b.speed.value(), 1.0);
        assert!((b.direction.value() - 1.6).abs() < 1e-6);
        assert!((b.height.value() - root.position.y).abs() < 1e-6);
        assert_eq!(b.scale.value(), 7.0);
        assert_eq!(b.tilt.value(), 0.0);
        assert!(b.playback.powered);
        assert_eq!(b.time_scale(), 1.0);
    }

    #[test]
    fn applies_are_idempotent() {
        let mut root = normalized_root();
        let mut b = TransformBindings::seed(&root);
        b.apply_direction(&mut root, 3.14);
        let first = root.rotation.y;
        b.apply_direction(&mut root, 3.14);
        assert_eq!(root.rotation.y, first);
        b.apply_scale(&mut root, 8.0);
        b.apply_scale(&mut root, 8.0);
        assert_eq!(root.scale, 8.0);
    }

    #[test]
    fn power_toggle_round_trips_time_scale() {
        let root = normalized_root();
        let mut b = TransformBindings::seed(&root);
        b.apply_speed(2.5);
        assert_eq!(b.time_scale(), 2.5);

        b.toggle_power();
        assert_eq!(b.time_scale(), 0.0);
        assert_eq!(b.playback.last_speed, 2.5);

        b.toggle_power();
        assert_eq!(b.time_scale(), 2.5);
    }

    #[test]
    fn speed_while_off_takes_effect_on_power_on() {
        let root = normalized_root();
        let mut b = TransformBindings::seed(&root);
        b.toggle_power();
        b.apply_speed(4.0);
        assert_eq!(b.time_scale(), 0.0);
        b.toggle_power();
        assert_eq!(b.time_scale(), 4.0);
    }

    #[test]
    fn reset_restores_design_defaults() {
        let mut root = normalized_root();
        let mut b = TransformBindings::seed(&root);
        b.apply_speed(2.5);
        b.apply_direction(&mut root, 3.14);
        b.apply_height(&mut root, -1.0);
        b.apply_scale(&mut root, 9.3);
        b.apply_tilt(&mut root, 0.5);
        b.toggle_power();

        b.reset(&mut root);

        assert_eq!(b.speed.value(), 1.0);
        assert!((b.direction.value() - 1.6).abs() < 1e-6);
        assert_eq!(b.height.value(), 0.0);
        assert_eq!(b.scale.value(), 7.0);
        assert_eq!(b.tilt.value(), 0.0);
        assert!(b.playback.powered);
        assert_eq!(b.time_scale(), 1.0);

        assert!((root.rotation.y - 1.6).abs() < 1e-6);
        assert_eq!(root.rotation.x, 0.0);
        assert_eq!(root.position.y, 0.0);
        assert_eq!(root.scale, 7.0);
    }

    #[test]
    fn reset_is_not_the_seed_pose() {
        // Height seeds from the post-normalization pose, which is not
        // necessarily the reset default; force them apart and check reset
        // goes to the design value.
        let mut root = normalized_root();
        root.position.y = -0.4;
        let mut b = TransformBindings::seed(&root);
        assert!((b.height.value() + 0.4).abs() < 1e-6);
        b.reset(&mut root);
        assert_eq!(b.height.value(), 0.0);
        assert_eq!(root.position.y, 0.0);
    }
}
