//! Time-driven animation values fed into uniform blocks.

use std::f32::consts::PI;

use glam::{Mat4, Vec2, Vec3};

/// Rises from 0 to 1 and back over a 10 s period, stepping once per
/// millisecond.
pub fn pulse(elapsed: f32) -> f32 {
    let ms = (elapsed.max(0.0) as f64 * 1000.0) as u64 % 10_000;
    (ms as f32 / 10_000.0 * PI).sin()
}

pub fn wave(elapsed: f32) -> f32 {
    elapsed.sin()
}

/// Circular drift of radius 0.5 around the origin.
pub fn offsets(elapsed: f32) -> Vec2 {
    Vec2::new(0.5 * elapsed.sin(), 0.5 * elapsed.cos())
}

/// Identity; the cube does not rotate.
pub fn model() -> Mat4 {
    Mat4::IDENTITY
}

/// View matrix of a camera circling the origin at height 1, looking at it.
pub fn orbit_camera(elapsed: f32) -> Mat4 {
    let eye = Vec3::new(elapsed.cos(), elapsed.sin(), 1.0);
    let forward = eye.normalize();
    let right = Vec3::Y.cross(forward).normalize();
    let up = forward.cross(right);
    Mat4::look_at_rh(eye, Vec3::ZERO, up)
}

/// 75° vertical field of view, near 0.1, far 100, depth in `[0, 1]`.
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(75f32.to_radians(), aspect, 0.1, 100.0)
}

/// Width over height; 1.0 when either is zero.
pub fn aspect((width, height): (u32, u32)) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> impl Iterator<Item = f32> {
        (0..2_000).map(|i| i as f32 * 0.0173)
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        assert!(samples().map(pulse).all(|v| (0.0..=1.0).contains(&v)));
        assert_eq!(pulse(0.0), 0.0);
        assert!((pulse(5.0) - 1.0).abs() < 1e-6);
        assert!(pulse(10.0) < 1e-3);
    }

    #[test]
    fn wave_and_offsets_are_bounded() {
        for t in samples() {
            assert!((-1.0..=1.0).contains(&wave(t)));
            let o = offsets(t);
            assert!(o.x.abs() <= 0.5 && o.y.abs() <= 0.5);
        }
    }

    #[test]
    fn orbit_camera_looks_at_origin() {
        for t in [0.0f32, 1.0, 2.5] {
            let view = orbit_camera(t);
            let eye = Vec3::new(t.cos(), t.sin(), 1.0);
            // The origin lands on the view axis, in front of the camera.
            let origin = view.transform_point3(Vec3::ZERO);
            assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
            assert!((origin.z + eye.length()).abs() < 1e-5);
        }
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let p = projection(1.0);
        let near = p.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = p.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
        assert_eq!(aspect((500, 500)), 1.0);
        assert_eq!(aspect((0, 500)), 1.0);
    }
}
