use crate::scene::bounds::Aabb;
use nalgebra_glm as glm;

/// Mesh data on the CPU side, one entry per glTF primitive.
#[derive(Debug, Clone)]
pub struct CpuMesh {
    /// Index into [`LoadedAsset::nodes`] of the node this mesh hangs off.
    pub node: usize,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    /// Index into [`LoadedAsset::textures`] of the base color texture.
    pub texture: Option<usize>,
    /// Bounds in mesh-local coordinates.
    pub bounds: Aabb,
}

/// Decoded RGBA8 texture payload.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Static description of one scene-graph node as authored in the asset.
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

#[derive(Debug, Clone)]
pub enum ChannelValues {
    Translation(Vec<[f32; 3]>),
    Rotation(Vec<[f32; 4]>),
    Scale(Vec<[f32; 3]>),
}

impl ChannelValues {
    pub fn len(&self) -> usize {
        match self {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One animated property of one node.
#[derive(Debug, Clone)]
pub struct AnimChannel {
    pub node: usize,
    /// Keyframe times in seconds, strictly increasing.
    pub times: Vec<f32>,
    pub values: ChannelValues,
    pub interpolation: Interpolation,
}

#[derive(Debug, Clone)]
pub struct AnimClip {
    pub name: String,
    /// Largest keyframe time over all channels, seconds.
    pub duration: f32,
    pub channels: Vec<AnimChannel>,
}

/// Everything the loader hands back to the app on success.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub name: String,
    pub nodes: Vec<NodeDesc>,
    pub meshes: Vec<CpuMesh>,
    pub textures: Vec<CpuTexture>,
    pub clips: Vec<AnimClip>,
}

impl LoadedAsset {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}
