//! The otter: placement, steering toward a tapped target, and the end-of-node
//! fade.

use std::time::Duration;

use glam::Vec3;

use crate::constants::{ARRIVAL_EPSILON, AVATAR_FACING_YAW, DEFAULT_AVATAR_SPEED};
use crate::error::AvatarError;
use crate::geometry::{yaw_towards, Pose, Transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarPhase {
    Unplaced,
    Idle,
    Moving,
    Despawned,
}

/// What happened during one [`AvatarController::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do (not moving, not fading).
    Rest,
    Moved { distance_left: f32 },
    /// A blocking hazard held the avatar in place; the target is kept.
    Blocked,
    /// Reached the target this tick; the target has been cleared.
    Arrived,
    Fading { opacity: f32 },
    /// The fade finished this tick and the avatar is gone.
    Despawned,
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    elapsed: Duration,
    duration: Duration,
}

#[derive(Clone, Debug)]
pub struct AvatarController {
    phase: AvatarPhase,
    transform: Transform,
    target: Option<Vec3>,
    speed: f32,
    arrival_epsilon: f32,
    facing: f32,
    opacity: f32,
    fade: Option<Fade>,
}

impl Default for AvatarController {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_SPEED)
    }
}

impl AvatarController {
    pub fn new(speed: f32) -> Self {
        Self {
            phase: AvatarPhase::Unplaced,
            transform: Transform::default().with_yaw(AVATAR_FACING_YAW),
            target: None,
            speed,
            arrival_epsilon: ARRIVAL_EPSILON,
            facing: AVATAR_FACING_YAW,
            opacity: 1.0,
            fade: None,
        }
    }

    pub fn with_arrival_epsilon(mut self, eps: f32) -> Self {
        self.arrival_epsilon = eps;
        self
    }

    /// Heading taken on placement.
    pub fn with_facing(mut self, yaw: f32) -> Self {
        self.facing = yaw;
        self.transform.yaw = yaw;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vec3::splat(scale);
        self
    }

    pub fn phase(&self) -> AvatarPhase {
        self.phase
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.phase, AvatarPhase::Idle | AvatarPhase::Moving)
    }

    pub fn is_moving(&self) -> bool {
        self.phase == AvatarPhase::Moving
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn place(&mut self, pose: &Pose) -> Result<(), AvatarError> {
        if self.phase != AvatarPhase::Unplaced {
            return Err(AvatarError::AlreadyPlaced);
        }
        self.transform.position = pose.position;
        self.transform.yaw = self.facing;
        self.target = None;
        self.opacity = 1.0;
        self.phase = AvatarPhase::Idle;
        log::debug!("[avatar] placed at {:?}", pose.position);
        Ok(())
    }

    /// Put a placed avatar back at `pose`, dropping any target (used by
    /// resets that keep the avatar on the ground).
    pub fn reposition(&mut self, pose: &Pose) {
        if self.is_placed() {
            self.transform.position = pose.position;
            self.transform.yaw = self.facing;
            self.target = None;
            self.phase = AvatarPhase::Idle;
        }
    }

    /// Stand still where the avatar is, dropping any target.
    pub fn stop(&mut self) {
        if self.phase == AvatarPhase::Moving {
            self.target = None;
            self.phase = AvatarPhase::Idle;
        }
    }

    /// Return to the unplaced state (full node reset).
    pub fn unplace(&mut self) {
        self.phase = AvatarPhase::Unplaced;
        self.target = None;
        self.fade = None;
        self.opacity = 1.0;
    }

    pub fn command_target(&mut self, point: Vec3) -> Result<(), AvatarError> {
        if !self.is_placed() || self.fade.is_some() {
            return Err(AvatarError::NotCommandable(self.phase));
        }
        self.target = Some(point);
        self.phase = AvatarPhase::Moving;
        Ok(())
    }

    pub fn fade_out_and_despawn(&mut self, duration: Duration) -> Result<(), AvatarError> {
        if !self.is_placed() || self.fade.is_some() {
            return Err(AvatarError::NotCommandable(self.phase));
        }
        self.target = None;
        self.phase = AvatarPhase::Idle;
        self.fade = Some(Fade {
            elapsed: Duration::ZERO,
            duration,
        });
        Ok(())
    }

    /// Integrate one frame. `blocked` holds the avatar in place without
    /// dropping its target.
    pub fn tick(&mut self, dt: Duration, blocked: bool) -> TickOutcome {
        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            let t = if fade.duration.is_zero() {
                1.0
            } else {
                (fade.elapsed.as_secs_f32() / fade.duration.as_secs_f32()).min(1.0)
            };
            self.opacity = 1.0 - t;
            if t >= 1.0 {
                self.fade = None;
                self.phase = AvatarPhase::Despawned;
                log::debug!("[avatar] despawned");
                return TickOutcome::Despawned;
            }
            return TickOutcome::Fading {
                opacity: self.opacity,
            };
        }

        if self.phase != AvatarPhase::Moving {
            return TickOutcome::Rest;
        }
        let Some(target) = self.target else {
            self.phase = AvatarPhase::Idle;
            return TickOutcome::Rest;
        };

        let to_target = target - self.transform.position;
        let distance = to_target.length();
        if distance < self.arrival_epsilon {
            return self.arrive();
        }
        if blocked {
            return TickOutcome::Blocked;
        }

        let step = (self.speed * dt.as_secs_f32()).min(distance);
        self.transform.position += to_target / distance * step;
        if let Some(yaw) = yaw_towards(self.transform.position, target) {
            self.transform.yaw = yaw;
        }

        let distance_left = distance - step;
        if distance_left < self.arrival_epsilon {
            return self.arrive();
        }
        TickOutcome::Moved { distance_left }
    }

    fn arrive(&mut self) -> TickOutcome {
        self.target = None;
        self.phase = AvatarPhase::Idle;
        TickOutcome::Arrived
    }
}
