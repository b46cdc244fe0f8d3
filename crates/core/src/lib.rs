#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod slot;

// Re-export commonly used types
pub use item::ItemId;
pub use slot::{SlotIndex, SlotIndexError, DEFAULT_SLOT_COUNT};

/// Wall-clock stamp recorded on save slots.
///
/// Naive local time, serialized as ISO 8601 (`2024-05-01T18:22:03.120391`).
pub type Timestamp = chrono::NaiveDateTime;

/// Current local time as a [`Timestamp`].
pub fn now() -> Timestamp {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isoformat_strings_parse_as_timestamps() {
        let stamp: Timestamp = "2024-05-01T18:22:03.120391".parse().expect("iso timestamp");
        assert_eq!(stamp.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 18:22");

        let without_fraction: Timestamp = "2024-05-01T18:22:03".parse().expect("iso timestamp");
        assert!(without_fraction < stamp);
    }

    #[test]
    fn now_is_monotonic_enough_for_last_played() {
        let earlier = now();
        let later = now();
        assert!(later >= earlier);
    }
}
