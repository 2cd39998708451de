use thiserror::Error;

use crate::types::Item;

pub type PackResult<T> = std::result::Result<T, PackError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The item does not fit, in any rotation, into even the largest
    /// catalog box when packed alone.
    #[error("item too big: {width}x{height}x{depth} mm, {weight} g")]
    ItemTooBig {
        width: u32,
        height: u32,
        depth: u32,
        weight: u32,
    },
}

impl PackError {
    pub fn item_too_big<I: Item + ?Sized>(item: &I) -> Self {
        PackError::ItemTooBig {
            width: item.width(),
            height: item.height(),
            depth: item.depth(),
            weight: item.weight(),
        }
    }
}
