pub mod assets;
pub mod avatar;
pub mod constants;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod map;
pub mod narration;
pub mod nodes;
pub mod progress;
pub mod puzzle;
pub mod reticle;
pub mod rules;
pub mod scene;
pub mod session;
pub mod ui;
pub mod zones;

pub use assets::{AssetKind, AssetRequest, AssetSource, LoadBarrier, SceneAsset};
pub use avatar::{AvatarController, AvatarPhase, TickOutcome};
pub use entity::{EntityKey, EntityRole, EntityStore, PathChoice, SceneCommand, Visual};
pub use error::{AssetError, AvatarError, PuzzleError, SessionError};
pub use geometry::{GroundBend, GroundSurface, Pose, Ray, Transform};
pub use map::{waypoints, MapConfig, Waypoint};
pub use narration::{AudioState, NarrationSequencer};
pub use nodes::{node, NodeConfig, PageKind, NODES};
pub use progress::{AffordanceGate, GateChange, ProgressState, WinCondition};
pub use reticle::{HitTestAcquisition, SurfaceReticle};
pub use scene::{FrameInput, SceneConfig, SceneHandle, XrFrameData};
pub use session::{AudioCue, NodePhase, NodeSession, SessionEvent};
pub use ui::{Popup, UiAction, ViewState};
pub use zones::{FiredEffect, TriggerZone, TriggerZoneRegistry, ZoneKind};
