// Keyframe sampling helpers shared by the animation player.

use nalgebra_glm as glm;

/// Locate the keyframe pair bracketing `t` and the blend factor between
/// them. Times before the first key clamp to it, times after the last key
/// clamp to the last.
pub fn find_keyframes(times: &[f32], t: f32) -> (usize, usize, f32) {
    if times.is_empty() {
        return (0, 0, 0.0);
    }
    if t <= times[0] {
        return (0, 0, 0.0);
    }
    let last = times.len() - 1;
    if t >= times[last] {
        return (last, last, 0.0);
    }
    // partition_point: first index whose time is greater than t
    let next = times.partition_point(|&k| k <= t);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let factor = if span > 0.0 {
        (t - times[prev]) / span
    } else {
        0.0
    };
    (prev, next, factor)
}

pub fn lerp_vec3(a: &[f32; 3], b: &[f32; 3], t: f32) -> glm::Vec3 {
    glm::lerp(&glm::make_vec3(a), &glm::make_vec3(b), t)
}

/// Spherical interpolation between two glTF-order (x, y, z, w) quaternions.
pub fn slerp_quat(a: &[f32; 4], b: &[f32; 4], t: f32) -> glm::Quat {
    let qa = glm::quat_normalize(&glm::Quat::new(a[3], a[0], a[1], a[2]));
    let qb = glm::quat_normalize(&glm::Quat::new(b[3], b[0], b[1], b[2]));
    glm::quat_slerp(&qa, &qb, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_outside_key_range() {
        let times = [0.0, 1.0, 2.0];
        assert_eq!(find_keyframes(&times, -1.0), (0, 0, 0.0));
        assert_eq!(find_keyframes(&times, 5.0), (2, 2, 0.0));
    }

    #[test]
    fn brackets_interior_times() {
        let times = [0.0, 1.0, 3.0];
        let (prev, next, f) = find_keyframes(&times, 2.0);
        assert_eq!((prev, next), (1, 2));
        assert!((f - 0.5).abs() < 1e-6);
    }

    #[test]
    fn vec3_lerp_midpoint() {
        let v = lerp_vec3(&[0.0, 0.0, 0.0], &[2.0, 4.0, -2.0], 0.5);
        assert!((v - glm::vec3(1.0, 2.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn slerp_endpoints_are_exact() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.707_106_8, 0.0, 0.707_106_8];
        let qa = slerp_quat(&a, &b, 0.0);
        let qb = slerp_quat(&a, &b, 1.0);
        assert!((qa.w - 1.0).abs() < 1e-5);
        assert!((qb.j - 0.707_106_8).abs() < 1e-5);
    }
}
