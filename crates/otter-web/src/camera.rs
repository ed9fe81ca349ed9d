// Screen <-> world helpers. Pure glam math so the host tests can include
// this file directly.

use glam::{Mat4, Vec2, Vec3, Vec4};
use otter_core::geometry::Ray;

/// Client pixel inside `rect` (`[left, top, width, height]`) to normalized
/// device coordinates, y up.
#[inline]
pub fn client_to_ndc(client: Vec2, rect: [f32; 4]) -> Vec2 {
    let [left, top, width, height] = rect;
    let x = (client.x - left) / width.max(1.0);
    let y = (client.y - top) / height.max(1.0);
    Vec2::new(x * 2.0 - 1.0, 1.0 - y * 2.0)
}

#[inline]
pub fn ndc_to_client(ndc: Vec2, rect: [f32; 4]) -> Vec2 {
    let [left, top, width, height] = rect;
    Vec2::new(
        left + (ndc.x + 1.0) * 0.5 * width,
        top + (1.0 - ndc.y) * 0.5 * height,
    )
}

/// Picking ray through an NDC point, unprojected between the near and far
/// planes with the inverse view-projection matrix.
pub fn ndc_to_ray(inv_view_proj: Mat4, ndc: Vec2) -> Option<Ray> {
    let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
    let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
        return None;
    }
    let near = near.truncate() / near.w;
    let far = far.truncate() / far.w;
    let dir = far - near;
    (dir.length_squared() > f32::EPSILON).then(|| Ray::new(near, dir))
}

/// Project a world point; `None` when it is behind the camera.
pub fn world_to_ndc(view_proj: Mat4, p: Vec3) -> Option<Vec2> {
    let clip = view_proj * p.extend(1.0);
    (clip.w > f32::EPSILON).then(|| Vec2::new(clip.x / clip.w, clip.y / clip.w))
}

/// Camera position and unit look direction from a column-major viewer
/// transform (the camera looks down its local -Z).
pub fn viewer_from_matrix(m: &[f32; 16]) -> (Vec3, Vec3) {
    let mat = Mat4::from_cols_array(m);
    let position = mat.w_axis.truncate();
    let forward = (-mat.z_axis.truncate()).normalize_or_zero();
    (position, forward)
}

/// Copy a WebXR matrix out of a JS array, rejecting anything malformed.
#[inline]
pub fn matrix16(values: &[f32]) -> Option<[f32; 16]> {
    values.try_into().ok()
}
