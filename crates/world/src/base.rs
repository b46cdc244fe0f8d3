//! Base layout: player position and placed structures.

use serde::{Deserialize, Serialize};

use crate::ActionError;

/// Structures snap to a square grid of this many units.
pub const GRID_SIZE: i32 = 40;

/// Where a new game starts the player.
pub const DEFAULT_PLAYER_POSITION: PlayerPosition = PlayerPosition(400, 300);

/// Player position in base coordinates, stored on disk as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPosition(pub i32, pub i32);

impl Default for PlayerPosition {
    fn default() -> Self {
        DEFAULT_PLAYER_POSITION
    }
}

/// Axis-aligned footprint of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Default for StructureRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: GRID_SIZE,
            h: GRID_SIZE,
        }
    }
}

impl StructureRect {
    /// One grid cell with its top-left corner at `(x, y)`.
    pub fn cell(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Grid cell containing the point `(x, y)`, or `OutOfBounds` if that
    /// cell does not fit in base coordinates.
    pub fn snapped(x: i32, y: i32) -> Result<Self, ActionError> {
        let (gx, gy) = snap_to_grid(x, y).ok_or(ActionError::OutOfBounds { x, y })?;
        let rect = Self::cell(gx, gy);
        if !rect.in_bounds() {
            return Err(ActionError::OutOfBounds { x, y });
        }
        Ok(rect)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.w)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.h)
    }

    /// Returns true if both far edges are representable base coordinates.
    pub fn in_bounds(&self) -> bool {
        i32::try_from(self.right()).is_ok() && i32::try_from(self.bottom()).is_ok()
    }

    /// Returns true if the two rectangles share any area. Touching edges do not count.
    pub fn intersects(&self, other: &StructureRect) -> bool {
        i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.bottom()
            && i64::from(other.y) < self.bottom()
    }
}

/// Round a point down to the top-left corner of its grid cell.
///
/// `None` when that corner lies below `i32::MIN`.
pub fn snap_to_grid(x: i32, y: i32) -> Option<(i32, i32)> {
    let snap = |v: i32| v.div_euclid(GRID_SIZE).checked_mul(GRID_SIZE);
    Some((snap(x)?, snap(y)?))
}

/// A structure built in the base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacedStructure {
    /// Structure item id ("Wall", "Door", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Footprint.
    pub rect: StructureRect,
}

impl Default for PlacedStructure {
    fn default() -> Self {
        Self {
            kind: "Unknown".to_string(),
            rect: StructureRect::default(),
        }
    }
}

/// Persistent state of the home base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseLayout {
    /// Where the player stood when the base was last saved.
    #[serde(rename = "player_pos")]
    pub player_position: PlayerPosition,
    /// Structures in placement order.
    pub placed_structures: Vec<PlacedStructure>,
}

impl BaseLayout {
    /// Returns true if `rect` overlaps any placed structure.
    pub fn is_occupied(&self, rect: &StructureRect) -> bool {
        self.placed_structures
            .iter()
            .any(|structure| structure.rect.intersects(rect))
    }

    /// Place a structure, refusing overlaps and footprints past the edge of
    /// base coordinates.
    pub fn place(&mut self, kind: &str, rect: StructureRect) -> Result<(), ActionError> {
        if !rect.in_bounds() {
            return Err(ActionError::OutOfBounds {
                x: rect.x,
                y: rect.y,
            });
        }
        if self.is_occupied(&rect) {
            return Err(ActionError::Occupied);
        }
        self.placed_structures.push(PlacedStructure {
            kind: kind.to_string(),
            rect,
        });
        Ok(())
    }

    /// Number of structures of the given kind.
    pub fn count_kind(&self, kind: &str) -> usize {
        self.placed_structures
            .iter()
            .filter(|structure| structure.kind == kind)
            .count()
    }
}
