use crate::asset::types::LoadedAsset;
use crate::scene::bounds::Aabb;
use nalgebra_glm as glm;

/// One node of the loaded asset's hierarchy. Local TRS is mutated by the
/// animation player; `global` is recomputed once per frame.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
    global: glm::Mat4,
}

impl Node {
    pub fn local_matrix(&self) -> glm::Mat4 {
        glm::translation(&self.translation)
            * glm::quat_to_mat4(&glm::quat_normalize(&self.rotation))
            * glm::scaling(&self.scale)
    }

}

#[derive(Debug, Clone, Copy)]
struct MeshRef {
    node: usize,
    bounds: Aabb,
}

/// The scene-graph root of the loaded asset. Owns the viewer-facing
/// transform (position / Euler rotation / uniform scale) and the node
/// hierarchy beneath it.
#[derive(Debug, Clone)]
pub struct ModelRoot {
    pub position: glm::Vec3,
    /// Euler angles in radians; `y` is yaw (direction), `x` is pitch (tilt).
    pub rotation: glm::Vec3,
    /// Uniform scale, strictly positive.
    pub scale: f32,
    nodes: Vec<Node>,
    meshes: Vec<MeshRef>,
}

impl ModelRoot {
    pub fn from_asset(asset: &LoadedAsset) -> Self {
        let nodes = asset
            .nodes
            .iter()
            .map(|desc| Node {
                name: desc.name.clone(),
                parent: desc.parent,
                translation: desc.translation,
                rotation: desc.rotation,
                scale: desc.scale,
                global: glm::Mat4::identity(),
            })
            .collect();
        let meshes = asset
            .meshes
            .iter()
            .map(|m| MeshRef {
                node: m.node,
                bounds: m.bounds,
            })
            .collect();
        let mut root = Self {
            position: glm::vec3(0.0, 0.0, 0.0),
            rotation: glm::vec3(0.0, 0.0, 0.0),
            scale: 1.0,
            nodes,
            meshes,
        };
        root.update_globals();
        root
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Viewer transform: translation, yaw/pitch/roll, uniform scale.
    pub fn root_matrix(&self) -> glm::Mat4 {
        let rx = glm::rotation(self.rotation.x, &glm::vec3(1.0, 0.0, 0.0));
        let ry = glm::rotation(self.rotation.y, &glm::vec3(0.0, 1.0, 0.0));
        let rz = glm::rotation(self.rotation.z, &glm::vec3(0.0, 0.0, 1.0));
        glm::translation(&self.position)
            * (ry * rx * rz)
            * glm::scaling(&glm::vec3(self.scale, self.scale, self.scale))
    }

    /// Recompute global matrices from the local TRS of every node.
    /// Must run after the animation player touches node transforms.
    pub fn update_globals(&mut self) {
        let locals: Vec<glm::Mat4> = self.nodes.iter().map(|n| n.local_matrix()).collect();
        let parents: Vec<Option<usize>> = self.nodes.iter().map(|n| n.parent).collect();
        let mut globals: Vec<Option<glm::Mat4>> = vec![None; self.nodes.len()];
        for i in 0..self.nodes.len() {
            Self::resolve_global(i, &parents, &locals, &mut globals);
        }
        for (node, global) in self.nodes.iter_mut().zip(globals) {
            node.global = global.unwrap_or_else(glm::Mat4::identity);
        }
    }

    fn resolve_global(
        index: usize,
        parents: &[Option<usize>],
        locals: &[glm::Mat4],
        globals: &mut [Option<glm::Mat4>],
    ) -> glm::Mat4 {
        if let Some(g) = globals[index] {
            return g;
        }
        let g = match parents[index] {
            Some(p) if p < locals.len() && p != index => {
                Self::resolve_global(p, parents, locals, globals) * locals[index]
            }
            _ => locals[index],
        };
        globals[index] = Some(g);
        g
    }

    /// World-space transform of a mesh-bearing node, root transform included.
    pub fn mesh_world_matrix(&self, mesh_index: usize) -> glm::Mat4 {
        let node_global = self
            .meshes
            .get(mesh_index)
            .and_then(|m| self.nodes.get(m.node))
            .map(|n| n.global)
            .unwrap_or_else(glm::Mat4::identity);
        self.root_matrix() * node_global
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Axis-aligned bounds of all mesh geometry under the current transform.
    pub fn world_bounds(&self) -> Aabb {
        let root = self.root_matrix();
        let mut out = Aabb::empty();
        for mesh in &self.meshes {
            let node_global = self
                .nodes
                .get(mesh.node)
                .map(|n| n.global)
                .unwrap_or_else(glm::Mat4::identity);
            out.merge(&mesh.bounds.transformed(&(root * node_global)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::types::{CpuMesh, NodeDesc};

    fn box_asset(size: [f32; 3]) -> LoadedAsset {
        let half = glm::vec3(size[0] / 2.0, size[1] / 2.0, size[2] / 2.0);
        LoadedAsset {
            name: "box".into(),
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
                bounds: Aabb::new(-half, half),
            }],
            textures: Vec::new(),
            clips: Vec::new(),
        }
    }

    #[test]
    fn world_bounds_follow_uniform_scale() {
        let mut root = ModelRoot::from_asset(&box_asset([4.0, 2.0, 1.0]));
        assert_eq!(root.world_bounds().max_dim(), 4.0);
        root.scale = 0.5;
        assert!((root.world_bounds().max_dim() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn world_bounds_follow_translation() {
        let mut root = ModelRoot::from_asset(&box_asset([2.0, 2.0, 2.0]));
        root.position = glm::vec3(3.0, -1.0, 0.5);
        let center = root.world_bounds().center();
        assert!((center - glm::vec3(3.0, -1.0, 0.5)).norm() < 1e-6);
    }

    #[test]
    fn child_node_inherits_parent_transform() {
        let mut asset = box_asset([2.0, 2.0, 2.0]);
        asset.nodes.push(NodeDesc {
            name: "child".into(),
            parent: Some(0),
            translation: glm::vec3(5.0, 0.0, 0.0),
            rotation: glm::Quat::new(1.0, 0.0, 0.0, 0.0),
            scale: glm::vec3(1.0, 1.0, 1.0),
        });
        asset.meshes[0].node = 1;
        let root = ModelRoot::from_asset(&asset);
        let center = root.world_bounds().center();
        assert!((center - glm::vec3(5.0, 0.0, 0.0)).norm() < 1e-6);
    }
}
