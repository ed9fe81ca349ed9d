//! Error types for the node engine.
//!
//! None of these are fatal to a running node: the session logs them and
//! degrades (skips an entity, ignores a command) instead of aborting.

use thiserror::Error;

use crate::avatar::AvatarPhase;
use crate::session::NodePhase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvatarError {
    #[error("avatar is already placed")]
    AlreadyPlaced,

    #[error("avatar cannot accept commands while {0:?}")]
    NotCommandable(AvatarPhase),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleError {
    #[error("no puzzle piece with index {0}")]
    UnknownPiece(usize),

    #[error("puzzle piece {0} is locked")]
    PieceLocked(usize),

    #[error("another piece is already being dragged")]
    AlreadyDragging,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("media playback refused for {0}")]
    Playback(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("no placement pose available")]
    NoPlacementPose,

    #[error("action not valid while {0:?}")]
    InvalidPhase(NodePhase),

    #[error(transparent)]
    Avatar(#[from] AvatarError),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
