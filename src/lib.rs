//! Packs shippable items into the fewest standard boxes a greedy first-fit
//! search can find, with a position and rotation for every item.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod packer;
pub mod placement;
pub mod render;
pub mod types;

pub use error::{PackError, PackResult};
pub use packer::pack;
pub use types::{BoxItem, BoxTemplate, Item, PackedBox, Parcel, Rotation};
