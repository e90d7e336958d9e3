use nalgebra_glm as glm;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: glm::vec3(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: glm::vec3(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn new(min: glm::Vec3, max: glm::Vec3) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn grow(&mut self, p: &glm::Vec3) {
        self.min = glm::min2(&self.min, p);
        self.max = glm::max2(&self.max, p);
    }

    pub fn merge(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.grow(&other.min);
        self.grow(&other.max);
    }

    /// Extent along each axis; zero vector for an empty box.
    pub fn size(&self) -> glm::Vec3 {
        if self.is_empty() {
            return glm::vec3(0.0, 0.0, 0.0);
        }
        self.max - self.min
    }

    pub fn center(&self) -> glm::Vec3 {
        if self.is_empty() {
            return glm::vec3(0.0, 0.0, 0.0);
        }
        (self.min + self.max) * 0.5
    }

    /// Largest extent over the three axes.
    pub fn max_dim(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    pub fn corners(&self) -> [glm::Vec3; 8] {
        [
            glm::vec3(self.min.x, self.min.y, self.min.z),
            glm::vec3(self.max.x, self.min.y, self.min.z),
            glm::vec3(self.min.x, self.max.y, self.min.z),
            glm::vec3(self.max.x, self.max.y, self.min.z),
            glm::vec3(self.min.x, self.min.y, self.max.z),
            glm::vec3(self.max.x, self.min.y, self.max.z),
            glm::vec3(self.min.x, self.max.y, self.max.z),
            glm::vec3(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Box enclosing this box after transforming its corners.
    pub fn transformed(&self, matrix: &glm::Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Aabb::empty();
        for corner in self.corners() {
            let p = matrix * glm::vec4(corner.x, corner.y, corner.z, 1.0);
            out.grow(&glm::vec3(p.x, p.y, p.z));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_zero_size() {
        let b = Aabb::empty();
        assert!(b.is_empty());
        assert_eq!(b.max_dim(), 0.0);
        assert_eq!(b.center(), glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn grow_and_center() {
        let mut b = Aabb::empty();
        b.grow(&glm::vec3(-1.0, 0.0, 2.0));
        b.grow(&glm::vec3(3.0, 4.0, 6.0));
        assert_eq!(b.size(), glm::vec3(4.0, 4.0, 4.0));
        assert_eq!(b.center(), glm::vec3(1.0, 2.0, 4.0));
    }

    #[test]
    fn transformed_scales_extents() {
        let b = Aabb::new(glm::vec3(-1.0, -1.0, -1.0), glm::vec3(1.0, 1.0, 1.0));
        let m = glm::scaling(&glm::vec3(2.0, 3.0, 4.0));
        let t = b.transformed(&m);
        assert_eq!(t.size(), glm::vec3(4.0, 6.0, 8.0));
        assert_eq!(t.center(), glm::vec3(0.0, 0.0, 0.0));
    }
}
