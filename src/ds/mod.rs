//! Arena-backed building blocks for the eviction engine.
//!
//! All structures address entries through generational [`SlotId`] handles,
//! so a handle that outlives its entry fails lookups instead of aliasing a
//! newer one.

pub mod frequency_index;
pub mod recency_list;
pub mod slot_arena;

pub use frequency_index::FrequencyIndex;
pub use recency_list::RecencyList;
pub use slot_arena::{SlotArena, SlotId};
