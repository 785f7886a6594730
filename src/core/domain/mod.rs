//! Domain types.
//!
//! The loadout aggregate and the tag-set helpers its metadata updates use.

mod loadout;
pub mod tags;

pub use loadout::{is_value_encrypted, now, Loadout, Metadata, Timestamp};
