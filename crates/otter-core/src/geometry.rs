//! Poses, rays and the curved ground surface.
//!
//! Everything here is plain `glam` math with no platform types so it can be
//! exercised on the host.

use glam::{Mat4, Quat, Vec3};

use crate::constants::{GROUND_DROP, GROUND_SEGMENTS, GROUND_SIZE};

/// A real-world placement pose reported by the AR hit-test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Build a pose from a column-major 4x4 matrix (the WebXR
    /// `XRRigidTransform.matrix` layout).
    pub fn from_matrix(m: &[f32; 16]) -> Self {
        let (_, orientation, position) = Mat4::from_cols_array(m).to_scale_rotation_translation();
        Self {
            position,
            orientation,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    pub fn offset(&self, delta: Vec3) -> Vec3 {
        self.position + delta
    }
}

/// Position, heading and scale of a placed entity.
///
/// Entities in the scenes only ever turn about the vertical axis, so a yaw
/// angle is enough.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub yaw: f32,
    pub scale: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            scale: Vec3::ONE,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_scale_xyz(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector the entity faces, in the XZ plane.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Yaw that makes an entity at `from` look at `to` (rotation about +Y).
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let d = to - from;
    let flat = d.x * d.x + d.z * d.z;
    (flat > f32::EPSILON).then(|| d.x.atan2(d.z))
}

/// World-space picking ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = -b - sq;
    if t >= 0.0 {
        return Some(t);
    }
    // origin inside the sphere: report the exit point
    let t_far = -b + sq;
    (t_far >= 0.0).then_some(t_far)
}

/// Intersect a ray with the horizontal plane `y = height`.
#[inline]
pub fn ray_plane_y(ray: &Ray, height: f32) -> Option<f32> {
    if ray.direction.y.abs() < 1e-6 {
        return None;
    }
    let t = (height - ray.origin.y) / ray.direction.y;
    (t >= 0.0).then_some(t)
}

/// Upward bend applied to the far edge of the ground sheet so the backdrop
/// texture curls up behind the scene like a cyclorama.
///
/// `local_y` runs across the sheet from the near edge (`-size/2`) to the far
/// edge (`+size/2`). Past `start` the sheet lifts by
/// `strength * ((local_y - start) / span) ^ exponent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundBend {
    pub start: f32,
    pub span: f32,
    pub strength: f32,
    pub exponent: f32,
}

impl GroundBend {
    #[inline]
    pub fn lift(&self, local_y: f32) -> f32 {
        if local_y <= self.start || self.span <= 0.0 {
            return 0.0;
        }
        let f = (local_y - self.start) / self.span;
        self.strength * f.powf(self.exponent)
    }
}

/// The ground sheet placed under every node: a square centred on the placement
/// pose, dropped slightly below it, optionally bent up at the far side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSurface {
    pub center: Vec3,
    pub size: f32,
    pub segments: u32,
    pub bend: Option<GroundBend>,
}

impl GroundSurface {
    pub fn at_pose(pose: &Pose, bend: Option<GroundBend>) -> Self {
        Self {
            center: pose.position - Vec3::Y * GROUND_DROP,
            size: GROUND_SIZE,
            segments: GROUND_SEGMENTS,
            bend,
        }
    }

    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    /// Sheet-local "y" (towards the far edge) of a world point. The sheet is
    /// laid flat by a -90° rotation about X, so local +y is world -z.
    #[inline]
    fn local_y(&self, p: Vec3) -> f32 {
        self.center.z - p.z
    }

    #[inline]
    pub fn contains_xz(&self, p: Vec3) -> bool {
        let h = self.half_extent();
        (p.x - self.center.x).abs() <= h && (p.z - self.center.z).abs() <= h
    }

    /// Surface height at a world XZ location.
    pub fn height_at(&self, p: Vec3) -> f32 {
        let lift = self.bend.map(|b| b.lift(self.local_y(p))).unwrap_or(0.0);
        self.center.y + lift
    }

    /// Grid vertices of the sheet in its local (unrotated) frame, row-major
    /// from the far edge, matching a `segments x segments` plane geometry.
    /// The front-end builds the mesh from these.
    pub fn local_vertices(&self) -> Vec<Vec3> {
        let n = self.segments.max(1);
        let h = self.half_extent();
        let step = self.size / n as f32;
        let mut out = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
        for row in 0..=n {
            let y = h - row as f32 * step;
            let z = self.bend.map(|b| b.lift(y)).unwrap_or(0.0);
            for col in 0..=n {
                let x = -h + col as f32 * step;
                out.push(Vec3::new(x, y, z));
            }
        }
        out
    }

    /// Where a tap ray meets the ground, if it lands on the sheet.
    ///
    /// Flat sheets intersect analytically; bent sheets are ray-marched as a
    /// height field and refined by bisection.
    pub fn raycast(&self, ray: &Ray) -> Option<Vec3> {
        let Some(bend) = self.bend else {
            let t = ray_plane_y(ray, self.center.y)?;
            let p = ray.at(t);
            return self.contains_xz(p).then_some(p);
        };

        let max_t = (self.size + bend.strength) * 4.0;
        let steps = 256;
        let dt = max_t / steps as f32;
        let above = |t: f32| {
            let p = ray.at(t);
            p.y - (self.center.y + bend.lift(self.local_y(p)))
        };
        let mut prev_t = 0.0;
        let mut prev = above(prev_t);
        for i in 1..=steps {
            let t = i as f32 * dt;
            let cur = above(t);
            if prev > 0.0 && cur <= 0.0 {
                let (mut lo, mut hi) = (prev_t, t);
                for _ in 0..24 {
                    let mid = 0.5 * (lo + hi);
                    if above(mid) > 0.0 {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                let p = ray.at(hi);
                return self.contains_xz(p).then_some(p);
            }
            prev_t = t;
            prev = cur;
        }
        None
    }
}
