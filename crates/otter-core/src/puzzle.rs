//! Drag-and-snap habitat puzzle.

use glam::Vec3;

use crate::constants::PUZZLE_SNAP_TOLERANCE;
use crate::error::PuzzleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceState {
    Floating,
    Dragging,
    Locked,
    /// Out of play; never needs placing.
    Missing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PuzzlePiece {
    pub index: usize,
    pub position: Vec3,
    pub target: Vec3,
    pub state: PieceState,
}

/// Result of releasing a dragged piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropOutcome {
    pub index: usize,
    pub position: Vec3,
    pub locked: bool,
    /// True only on the drop that locked the last piece.
    pub solved_now: bool,
}

/// Slot positions spread evenly along an arc around `origin`, from
/// `start_deg` to `end_deg` (0° is +X, positive angles towards +Z).
pub fn arc_targets(origin: Vec3, radius: f32, start_deg: f32, end_deg: f32, count: usize) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let step = if count > 1 {
        (end_deg - start_deg) / (count - 1) as f32
    } else {
        0.0
    };
    (0..count)
        .map(|i| {
            let rad = (start_deg + step * i as f32).to_radians();
            Vec3::new(
                origin.x + radius * rad.cos(),
                origin.y,
                origin.z + radius * rad.sin(),
            )
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct DragPuzzle {
    pieces: Vec<PuzzlePiece>,
    grab: Option<(usize, Vec3)>,
    tolerance: f32,
    solved: bool,
}

impl DragPuzzle {
    /// `layout` pairs each piece's starting position with its slot.
    pub fn new(layout: impl IntoIterator<Item = (Vec3, Vec3)>) -> Self {
        let pieces = layout
            .into_iter()
            .enumerate()
            .map(|(index, (position, target))| PuzzlePiece {
                index,
                position,
                target,
                state: PieceState::Floating,
            })
            .collect();
        Self {
            pieces,
            grab: None,
            tolerance: PUZZLE_SNAP_TOLERANCE,
            solved: false,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn pieces(&self) -> &[PuzzlePiece] {
        &self.pieces
    }

    pub fn piece(&self, index: usize) -> Option<&PuzzlePiece> {
        self.pieces.get(index)
    }

    pub fn dragging(&self) -> Option<usize> {
        self.grab.map(|(i, _)| i)
    }

    pub fn locked_count(&self) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.state == PieceState::Locked)
            .count()
    }

    pub fn is_solved(&self) -> bool {
        self.locked_count() > 0
            && self
                .pieces
                .iter()
                .all(|p| matches!(p.state, PieceState::Locked | PieceState::Missing))
    }

    /// Take a piece out of play. Returns `false` for unknown or locked pieces.
    pub fn remove_piece(&mut self, index: usize) -> bool {
        if self.dragging() == Some(index) {
            self.grab = None;
        }
        match self.pieces.get_mut(index) {
            Some(p) if p.state != PieceState::Locked => {
                p.state = PieceState::Missing;
                true
            }
            _ => false,
        }
    }

    /// Begin dragging `index`; `hit` is where the pointer ray met the piece.
    pub fn pointer_down(&mut self, index: usize, hit: Vec3) -> Result<(), PuzzleError> {
        if self.grab.is_some() {
            return Err(PuzzleError::AlreadyDragging);
        }
        let piece = self
            .pieces
            .get_mut(index)
            .ok_or(PuzzleError::UnknownPiece(index))?;
        match piece.state {
            PieceState::Locked => return Err(PuzzleError::PieceLocked(index)),
            PieceState::Missing => return Err(PuzzleError::UnknownPiece(index)),
            _ => {}
        }
        piece.state = PieceState::Dragging;
        self.grab = Some((index, hit - piece.position));
        Ok(())
    }

    /// Follow the pointer's ground intersection in XZ. Returns the dragged
    /// piece and its new position.
    pub fn pointer_move(&mut self, ground_point: Vec3) -> Option<(usize, Vec3)> {
        let (index, offset) = self.grab?;
        let piece = self.pieces.get_mut(index)?;
        piece.position.x = ground_point.x - offset.x;
        piece.position.z = ground_point.z - offset.z;
        Some((index, piece.position))
    }

    /// Release the dragged piece, snapping it when it lies within the
    /// tolerance of its target.
    pub fn pointer_up(&mut self) -> Option<DropOutcome> {
        let tolerance = self.tolerance;
        self.release(|piece| piece.position.distance(piece.target) < tolerance)
    }

    /// Release the dragged piece; `snaps` decides whether it locks.
    pub fn release(&mut self, snaps: impl FnOnce(&PuzzlePiece) -> bool) -> Option<DropOutcome> {
        let (index, _) = self.grab.take()?;
        let piece = self.pieces.get_mut(index)?;
        let locked = snaps(piece);
        if locked {
            piece.position = piece.target;
            piece.state = PieceState::Locked;
            log::debug!("[puzzle] piece {} locked", index);
        } else {
            piece.state = PieceState::Floating;
        }
        let position = piece.position;

        let solved_now = !self.solved && self.is_solved();
        if solved_now {
            self.solved = true;
            log::info!("[puzzle] solved");
        }
        Some(DropOutcome {
            index,
            position,
            locked,
            solved_now,
        })
    }

    /// Abandon an in-progress drag (pointer cancelled or node reset).
    pub fn cancel_drag(&mut self) {
        if let Some((index, _)) = self.grab.take() {
            if let Some(p) = self.pieces.get_mut(index) {
                p.state = PieceState::Floating;
            }
        }
    }
}
