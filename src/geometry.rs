use crate::types::{BoxItem, Item, Rotation};

impl Rotation {
    /// Extents of `item` along the box's (width, height, depth) axes.
    pub fn dimensions<I: Item + ?Sized>(self, item: &I) -> [u32; 3] {
        let (w, h, d) = (item.width(), item.height(), item.depth());
        match self {
            Rotation::Whd => [w, h, d],
            Rotation::Hwd => [h, w, d],
            Rotation::Hdw => [h, d, w],
            Rotation::Dhw => [d, h, w],
            Rotation::Dwh => [d, w, h],
            Rotation::Wdh => [w, d, h],
        }
    }
}

//     +-----------------+
//    /|                /|
//   / |               / |
//  +-----------------+  |
//  |  |              |  |
//  |  H              |  |
//  |  |              |  |
//  |  O-----W--------|--+
//  | D               | /
//  |/                |/
//  +-----------------+
//
/// True when the two placed items intersect with positive volume. Items that
/// only share a face, edge or corner do not overlap.
pub fn overlaps<I: Item>(a: &BoxItem<'_, I>, b: &BoxItem<'_, I>) -> bool {
    let (da, db) = (a.dimensions(), b.dimensions());
    let (pa, pb) = (a.position, b.position);
    rects_intersect([pa[0], pa[1]], [pb[0], pb[1]], [da[0], da[1]], [db[0], db[1]])
        && rects_intersect([pa[1], pa[2]], [pb[1], pb[2]], [da[1], da[2]], [db[1], db[2]])
        && rects_intersect([pa[0], pa[2]], [pb[0], pb[2]], [da[0], da[2]], [db[0], db[2]])
}

/// Whether two rectangles, given by origin corner and size, overlap in the
/// plane.
fn rects_intersect(o1: [u32; 2], o2: [u32; 2], s1: [u32; 2], s2: [u32; 2]) -> bool {
    spans_overlap(o1[0], s1[0], o2[0], s2[0]) && spans_overlap(o1[1], s1[1], o2[1], s2[1])
}

// Compares center distance against summed half-lengths, both doubled so
// odd lengths stay exact.
fn spans_overlap(start1: u32, len1: u32, start2: u32, len2: u32) -> bool {
    let center1 = 2 * start1 as u64 + len1 as u64;
    let center2 = 2 * start2 as u64 + len2 as u64;
    center1.abs_diff(center2) < len1 as u64 + len2 as u64
}
