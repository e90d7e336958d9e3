use crate::animation::interpolation::{find_keyframes, lerp_vec3, slerp_quat};
use crate::asset::types::{AnimClip, ChannelValues, Interpolation};
use crate::scene::ModelRoot;

/// Animation clock for the loaded asset. Every clip plays, each looping
/// over its own duration; `time_scale` multiplies clock advancement, so 0
/// holds the current pose without losing it.
pub struct AnimationPlayer {
    clips: Vec<AnimClip>,
    time: f64,
    time_scale: f32,
}

impl AnimationPlayer {
    pub fn new(clips: Vec<AnimClip>) -> Self {
        Self {
            clips,
            time: 0.0,
            time_scale: 1.0,
        }
    }

    pub fn has_clips(&self) -> bool {
        !self.clips.is_empty()
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// Advance the clock by `delta` seconds (scaled) and sample every clip
    /// into the node transforms. No-op without clips. Sampling is a pure
    /// function of the clock, so a zero time scale re-applies the same pose.
    pub fn update(&mut self, delta: f32, root: &mut ModelRoot) {
        if self.clips.is_empty() {
            return;
        }
        self.time += f64::from(delta * self.time_scale);
        for clip in &self.clips {
            let local_time = if clip.duration > 0.0 {
                (self.time % f64::from(clip.duration)) as f32
            } else {
                0.0
            };
            for channel in &clip.channels {
                let Some(node) = root.node_mut(channel.node) else {
                    continue;
                };
                if channel.times.is_empty() || channel.values.is_empty() {
                    continue;
                }
                let (prev, next, raw_factor) = find_keyframes(&channel.times, local_time);
                let factor = match channel.interpolation {
                    Interpolation::Linear => raw_factor,
                    Interpolation::Step => 0.0,
                };
                match &channel.values {
                    ChannelValues::Translation(values) => {
                        node.translation = lerp_vec3(&values[prev], &values[next], factor);
                    }
                    ChannelValues::Rotation(values) => {
                        node.rotation = slerp_quat(&values[prev], &values[next], factor);
                    }
                    ChannelValues::Scale(values) => {
                        node.scale = lerp_vec3(&values[prev], &values[next], factor);
                    }
                }
            }
        }
        root.update_globals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::types::{AnimChannel, CpuMesh, LoadedAsset, NodeDesc};
    use crate::scene::Aabb;
    use nalgebra_glm as glm;

    fn rig() -> (ModelRoot, Vec<AnimClip>) {
        let asset = LoadedAsset {
            name: "anim".into(),
            nodes: vec![NodeDesc {
                name: "spinner".into(),
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
        let clip = AnimClip {
            name: "rise".into(),
            duration: 2.0,
            channels: vec![AnimChannel {
                node: 0,
                times: vec![0.0, 2.0],
                values: ChannelValues::Translation(vec![[0.0, 0.0, 0.0], [0.0, 4.0, 0.0]]),
                interpolation: Interpolation::Linear,
            }],
        };
        (ModelRoot::from_asset(&asset), vec![clip])
    }

    #[test]
    fn advances_and_samples() {
        let (mut root, clips) = rig();
        let mut player = AnimationPlayer::new(clips);
        player.update(1.0, &mut root);
        let y = root.node(0).unwrap().translation.y;
        assert!((y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn loops_over_clip_duration() {
        let (mut root, clips) = rig();
        let mut player = AnimationPlayer::new(clips);
        // 2.5s into a 2s clip wraps to 0.5s.
        player.update(2.5, &mut root);
        let y = root.node(0).unwrap().translation.y;
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_time_scale_holds_the_pose() {
        let (mut root, clips) = rig();
        let mut player = AnimationPlayer::new(clips);
        player.update(1.0, &mut root);
        let before = root.node(0).unwrap().translation.y;
        player.set_time_scale(0.0);
        player.update(10.0, &mut root);
        let after = root.node(0).unwrap().translation.y;
        assert_eq!(before, after);
    }

    #[test]
    fn time_scale_multiplies_advancement() {
        let (mut root, clips) = rig();
        let mut player = AnimationPlayer::new(clips);
        player.set_time_scale(2.0);
        player.update(0.5, &mut root);
        let y = root.node(0).unwrap().translation.y;
        assert!((y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn step_interpolation_holds_previous_key() {
        let (mut root, mut clips) = rig();
        clips[0].channels[0].interpolation = Interpolation::Step;
        let mut player = AnimationPlayer::new(clips);
        player.update(1.0, &mut root);
        let y = root.node(0).unwrap().translation.y;
        assert_eq!(y, 0.0);
    }

    #[test]
    fn no_clips_is_a_noop() {
        let (mut root, _) = rig();
        let mut player = AnimationPlayer::new(Vec::new());
        assert!(!player.has_clips());
        player.update(1.0, &mut root);
        assert_eq!(root.node(0).unwrap().translation.y, 0.0);
    }
}
