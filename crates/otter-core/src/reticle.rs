//! Surface reticle: the hit-test source lifecycle and the current placement
//! pose.
//!
//! Acquiring the hit-test source is asynchronous on the platform side, so the
//! front-end asks [`SurfaceReticle::needs_source_request`] every frame, kicks
//! off the request once, and reports back with [`SurfaceReticle::source_ready`]
//! or [`SurfaceReticle::source_rejected`]. Frames that arrive in between just
//! keep the reticle hidden.

use crate::geometry::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTestAcquisition {
    /// No AR session, or the session ended.
    Idle,
    /// Request in flight.
    Requested,
    Ready,
    /// The platform refused; the reticle stays hidden until the next session.
    Rejected,
}

#[derive(Clone, Debug)]
pub struct SurfaceReticle {
    acquisition: HitTestAcquisition,
    session_active: bool,
    frozen: bool,
    pose: Option<Pose>,
}

impl Default for SurfaceReticle {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceReticle {
    pub fn new() -> Self {
        Self {
            acquisition: HitTestAcquisition::Idle,
            session_active: false,
            frozen: false,
            pose: None,
        }
    }

    pub fn acquisition(&self) -> HitTestAcquisition {
        self.acquisition
    }

    /// True exactly once per session: on the first call after the session is
    /// seen active. The caller must then issue the platform request.
    pub fn needs_source_request(&mut self, session_active: bool) -> bool {
        self.session_active = session_active;
        if session_active && self.acquisition == HitTestAcquisition::Idle {
            self.acquisition = HitTestAcquisition::Requested;
            return true;
        }
        false
    }

    pub fn source_ready(&mut self) {
        if self.acquisition == HitTestAcquisition::Requested {
            self.acquisition = HitTestAcquisition::Ready;
        }
    }

    pub fn source_rejected(&mut self) {
        if self.acquisition == HitTestAcquisition::Requested {
            log::warn!("[reticle] hit-test source request rejected");
            self.acquisition = HitTestAcquisition::Rejected;
        }
    }

    /// Session ended: drop the source so the next session re-requests it.
    pub fn session_ended(&mut self) {
        self.session_active = false;
        self.acquisition = HitTestAcquisition::Idle;
        self.pose = None;
    }

    /// Per-frame update with the hit reported for this frame (if any).
    pub fn update(&mut self, hit: Option<Pose>) {
        if self.frozen || self.acquisition != HitTestAcquisition::Ready {
            self.pose = None;
            return;
        }
        self.pose = hit;
    }

    /// Hide the reticle after the node has committed its placement.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.pose = None;
    }

    /// Re-arm after a reset so the user can place again.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_visible(&self) -> bool {
        self.pose.is_some()
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.pose
    }
}
