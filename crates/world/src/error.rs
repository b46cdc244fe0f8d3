use thiserror::Error;

/// A gameplay action that was refused.
///
/// These are expected outcomes, not faults: the `Display` text is the short
/// message shown to the player, and the state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Every inventory slot is taken.
    #[error("not enough space")]
    NoSpace,
    /// Split amount must leave at least one item on both sides.
    #[error("cannot split {amount} from a stack of {quantity}")]
    InvalidSplit {
        /// Requested amount.
        amount: u32,
        /// Size of the source stack.
        quantity: u32,
    },
    /// No stack at that inventory position.
    #[error("no stack in slot {0}")]
    InvalidSlot(usize),
    /// Recipe or build cost not covered by the inventory.
    #[error("not enough materials")]
    MissingMaterials,
    /// Placement overlaps an existing structure.
    #[error("occupied")]
    Occupied,
    /// Placement footprint does not fit in base coordinates.
    #[error("cannot build at ({x}, {y})")]
    OutOfBounds {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
    },
    /// No recipe produces the named item.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),
}
