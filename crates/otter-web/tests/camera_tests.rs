// Host-side tests for the screen/world helpers.
// The crate is wasm-only, so the pure module is included directly.

#![allow(dead_code)]
mod camera {
    include!("../src/camera.rs");
}

use camera::*;
use glam::{Mat4, Vec2, Vec3};

fn view_proj() -> Mat4 {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 1.5, 1.0), Vec3::new(0.0, 1.5, 0.0), Vec3::Y);
    let proj = Mat4::perspective_rh_gl(1.0, 1.0, 0.1, 100.0);
    proj * view
}

#[test]
fn client_to_ndc_maps_corners_and_centre() {
    let rect = [10.0, 20.0, 200.0, 100.0];
    assert_eq!(client_to_ndc(Vec2::new(110.0, 70.0), rect), Vec2::ZERO);
    assert_eq!(client_to_ndc(Vec2::new(10.0, 20.0), rect), Vec2::new(-1.0, 1.0));
    assert_eq!(client_to_ndc(Vec2::new(210.0, 120.0), rect), Vec2::new(1.0, -1.0));

    let px = Vec2::new(60.0, 45.0);
    let back = ndc_to_client(client_to_ndc(px, rect), rect);
    assert!(back.distance(px) < 1e-4);
}

#[test]
fn centre_ray_looks_down_the_view_axis() {
    let ray = ndc_to_ray(view_proj().inverse(), Vec2::ZERO).unwrap();
    assert!(ray.direction.distance(Vec3::NEG_Z) < 1e-4);
    // Starts on the near plane in front of the eye
    assert!(ray.origin.distance(Vec3::new(0.0, 1.5, 0.9)) < 1e-3);
}

#[test]
fn unprojected_ray_passes_through_projected_point() {
    let vp = view_proj();
    let target = Vec3::new(0.4, 1.2, -2.0);
    let ndc = world_to_ndc(vp, target).unwrap();
    let ray = ndc_to_ray(vp.inverse(), ndc).unwrap();

    // Distance from the target to the ray line
    let to_target = target - ray.origin;
    let closest = ray.origin + ray.direction * to_target.dot(ray.direction);
    assert!(closest.distance(target) < 1e-3);
}

#[test]
fn points_behind_the_camera_do_not_project() {
    assert!(world_to_ndc(view_proj(), Vec3::new(0.0, 1.5, 0.0)).is_some());
    assert!(world_to_ndc(view_proj(), Vec3::new(0.0, 1.5, 3.0)).is_none());
}

#[test]
fn viewer_pose_from_matrix() {
    let (pos, fwd) = viewer_from_matrix(&Mat4::IDENTITY.to_cols_array());
    assert_eq!(pos, Vec3::ZERO);
    assert_eq!(fwd, Vec3::NEG_Z);

    let turned = Mat4::from_translation(Vec3::new(1.0, 1.6, 0.0))
        * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let (pos, fwd) = viewer_from_matrix(&turned.to_cols_array());
    assert!(pos.distance(Vec3::new(1.0, 1.6, 0.0)) < 1e-6);
    // Turning left about +Y points -Z toward -X
    assert!(fwd.distance(Vec3::NEG_X) < 1e-5);
}

#[test]
fn matrix16_rejects_wrong_lengths() {
    assert!(matrix16(&[0.0; 16]).is_some());
    assert!(matrix16(&[0.0; 15]).is_none());
    assert!(matrix16(&[]).is_none());
}
