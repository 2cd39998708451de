use crate::geometry::overlaps;
use crate::types::{BoxItem, Item, PackedBox, Rotation};

impl<'a, I: Item> PackedBox<'a, I> {
    /// Seats `item` with its corner at `anchor`, trying rotations in order.
    /// A rotation that pokes out of the box is skipped. A rotation that fits
    /// the box but hits an already placed item ends the attempt at this
    /// anchor: later rotations are not tried.
    pub fn place(&mut self, item: &'a I, anchor: [u32; 3]) -> bool {
        for rotation in Rotation::ALL {
            let extents = rotation.dimensions(item);
            if !self.contains(anchor, extents) {
                continue;
            }

            let candidate = BoxItem {
                item,
                position: anchor,
                rotation,
            };
            if self.items.iter().any(|placed| overlaps(placed, &candidate)) {
                return false;
            }

            self.items.push(candidate);
            return true;
        }
        false
    }

    /// First-fit search over the corners next to already placed items:
    /// along width past every item, then along height, then along depth.
    pub fn place_next_to_items(&mut self, item: &'a I) -> bool {
        for axis in 0..3 {
            for idx in 0..self.items.len() {
                let anchor = self.items[idx].anchor_along(axis);
                if self.place(item, anchor) {
                    return true;
                }
            }
        }
        false
    }

    fn contains(&self, anchor: [u32; 3], extents: [u32; 3]) -> bool {
        let inner = self.template.dimensions();
        (0..3).all(|i| anchor[i] as u64 + extents[i] as u64 <= inner[i] as u64)
    }
}
