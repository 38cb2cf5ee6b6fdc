//! World-to-screen projection.
//!
//! World axes: x right of the road, y forward along it, z up. Screen space is
//! x right, y up, with the depth/scale term carried in z. The camera always
//! sits on the centerline at the configured height above the local track
//! elevation, so projecting is a translate, a perspective divide and a scale
//! to the 64x64 surface.

use cgmath::Vector3;

use crate::config::CAMERA_FOV_DEGREES;

/// Distance from the eye to the screen plane for the fixed field of view.
pub fn screen_distance() -> f32 {
    1.0 / (CAMERA_FOV_DEGREES.to_radians() / 2.0).tan()
}

/// Projects a world point through a camera at `camera_pos`. The forward
/// (depth) component of `world - camera_pos` must be positive; callers clip
/// points at or behind the camera instead of dividing by them.
pub fn project(world: Vector3<f32>, camera_pos: Vector3<f32>) -> Vector3<f32> {
    let rel = world - camera_pos;
    debug_assert!(rel.y > 0.0, "projected point must be in front of the camera");
    let sd = screen_distance();
    let proj_x = rel.x * sd / rel.y;
    let proj_y = rel.z * sd / rel.y;
    Vector3::new(
        32.0 + 50.0 * proj_x,
        50.0 + 50.0 * proj_y,
        50.0 * sd / rel.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_dead_ahead_projects_to_screen_center_x() {
        let camera = Vector3::new(0.0, 10.0, 2.0);
        for depth in [0.5f32, 2.0, 40.0, 1000.0] {
            let screen = project(Vector3::new(0.0, 10.0 + depth, 2.0), camera);
            assert!((screen.x - 32.0).abs() < 1e-4);
            assert!((screen.y - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn scale_falls_off_with_depth() {
        let camera = Vector3::new(0.0, 0.0, 2.0);
        let near = project(Vector3::new(0.0, 4.0, 0.0), camera);
        let far = project(Vector3::new(0.0, 16.0, 0.0), camera);
        assert!(near.z > far.z);
        assert!(far.z > 0.0);
        // ground points sit below the horizon row
        assert!(near.y < 50.0);
        assert!(near.y < far.y);
    }

    #[test]
    fn lateral_offset_scales_with_screen_distance() {
        let camera = Vector3::new(0.0, 0.0, 2.0);
        let screen = project(Vector3::new(1.0, 10.0, 2.0), camera);
        let expected = 32.0 + 50.0 * screen_distance() / 10.0;
        assert!((screen.x - expected).abs() < 1e-4);
    }
}
