use nalgebra_glm as glm;

/// Fixed viewer camera. The viewer never orbits; framing is handled by
/// normalizing the asset instead. Only the aspect ratio changes, on resize.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: glm::Vec3,
    pub target: glm::Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: glm::vec3(0.0, 1.0, 4.0),
            target: glm::vec3(0.0, 0.0, 0.0),
            fov_y: 60.0f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_proj(&self) -> glm::Mat4 {
        let proj = glm::perspective(self.aspect, self.fov_y, self.near, self.far);
        let view = glm::look_at(&self.eye, &self.target, &glm::vec3(0.0, 1.0, 0.0));
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ignores_degenerate_sizes() {
        let mut cam = Camera::new(1.5);
        cam.set_aspect(0, 600);
        assert_eq!(cam.aspect, 1.5);
        cam.set_aspect(1920, 1080);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_inside_the_frustum() {
        let cam = Camera::new(16.0 / 9.0);
        let clip = cam.view_proj() * glm::vec4(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
    }
}
