use crate::scene::ModelRoot;
use crate::viewer::{DEFAULT_POSITION, DEFAULT_ROTATION, DEFAULT_SCALE};
use nalgebra_glm as glm;

/// Target extent of the largest model dimension before the design scale
/// constant is applied, world units.
pub const TARGET_FIT: f32 = 2.0;

/// Fit an asset of unknown size and origin into the canonical viewing frame:
/// scale its largest dimension to [`TARGET_FIT`] units times the design
/// scale, center it on the default position offset, and apply the default
/// orientation. Returns the composite scale that was applied.
pub fn normalize(root: &mut ModelRoot) -> f32 {
    let bounds = root.world_bounds();
    let max_dim = bounds.max_dim();
    // A zero-extent asset (single point, no renderable geometry) cannot be
    // fit; fall back to a neutral factor instead of dividing by zero.
    let auto_scale = if max_dim > 0.0 {
        TARGET_FIT / max_dim
    } else {
        1.0
    };
    root.scale = auto_scale * DEFAULT_SCALE;

    // Re-measure after scaling, then pull the center onto the offset.
    let center = root.world_bounds().center();
    root.position = glm::make_vec3(&DEFAULT_POSITION) - center;

    root.rotation = glm::make_vec3(&DEFAULT_ROTATION);
    root.scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::types::{CpuMesh, LoadedAsset, NodeDesc};
    use crate::scene::Aabb;

    fn asset_with_bounds(min: [f32; 3], max: [f32; 3]) -> LoadedAsset {
        LoadedAsset {
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
                bounds: Aabb::new(glm::make_vec3(&min), glm::make_vec3(&max)),
            }],
            textures: Vec::new(),
            clips: Vec::new(),
        }
    }

    #[test]
    fn fits_largest_dimension() {
        // Box of size (4, 2, 1): auto scale 2/4, composite 0.5 * 7.
        let mut root = ModelRoot::from_asset(&asset_with_bounds(
            [-2.0, -1.0, -0.5],
            [2.0, 1.0, 0.5],
        ));
        let applied = normalize(&mut root);
        assert!((applied - 3.5).abs() < 1e-6);
        assert!((root.scale - 3.5).abs() < 1e-6);
        assert!(root.scale > 0.0);
    }

    #[test]
    fn degenerate_extent_keeps_scale_finite() {
        // All geometry collapsed onto a single point.
        let mut root =
            ModelRoot::from_asset(&asset_with_bounds([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]));
        let applied = normalize(&mut root);
        assert!(applied.is_finite());
        assert!((applied - DEFAULT_SCALE).abs() < 1e-6);
        assert!(root.scale > 0.0);
    }

    #[test]
    fn recentered_on_default_offset() {
        // Geometry centered on its own origin but the box offset in space
        // is irrelevant: after normalize the world center must sit on the
        // default position offset.
        let mut root = ModelRoot::from_asset(&asset_with_bounds(
            [-1.0, -1.0, -1.0],
            [1.0, 1.0, 1.0],
        ));
        normalize(&mut root);
        let center = root.world_bounds().center();
        let offset = glm::make_vec3(&DEFAULT_POSITION);
        assert!((center - offset).norm() < 1e-5);
    }

    #[test]
    fn default_orientation_applied() {
        let mut root = ModelRoot::from_asset(&asset_with_bounds(
            [-1.0, -1.0, -1.0],
            [1.0, 1.0, 1.0],
        ));
        normalize(&mut root);
        assert!((root.rotation.y - 1.6).abs() < 1e-6);
        assert_eq!(root.rotation.x, 0.0);
        assert_eq!(root.rotation.z, 0.0);
    }
}
