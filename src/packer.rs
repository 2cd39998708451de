use tracing::{debug, warn};

use crate::catalog;
use crate::error::{PackError, PackResult};
use crate::types::{BoxTemplate, Item, PackedBox};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escalation {
    Allowed,
    /// Used for trial re-packs, which must not escalate again.
    Forbidden,
}

/// Packs `items` into catalog boxes.
///
/// Each round opens the smallest box that holds the largest remaining item
/// and fills it greedily, moving the whole box up to a larger size when an
/// item does not fit. Items that fit in no larger box either are carried over
/// to the next round. Fails with [`PackError::ItemTooBig`] as soon as an item
/// fits no catalog box even on its own.
pub fn pack<I: Item>(items: &[I]) -> PackResult<Vec<PackedBox<'_, I>>> {
    let mut not_packed: Vec<&I> = items.iter().collect();
    let mut boxes = Vec::new();

    while !not_packed.is_empty() {
        // Stable: equal volumes keep their input order.
        not_packed.sort_by(|a, b| b.volume().cmp(&a.volume()));

        let first = not_packed[0];
        let Some(template) = catalog::smallest_fitting(first) else {
            warn!(
                width = first.width(),
                height = first.height(),
                depth = first.depth(),
                "item does not fit any box"
            );
            return Err(PackError::item_too_big(first));
        };
        debug!(
            box_name = template.name,
            remaining = not_packed.len(),
            "opening box"
        );

        let (packed, deferred) = fill(template, &not_packed, Escalation::Allowed);
        if packed.is_empty() {
            return Err(PackError::item_too_big(first));
        }
        debug!(
            box_name = packed.template.name,
            placed = packed.items.len(),
            deferred = deferred.len(),
            "box closed"
        );
        boxes.push(packed);
        not_packed = deferred;
    }

    Ok(boxes)
}

/// Fills a fresh box of `template` with `items` in order and returns it along
/// with the items that did not go in.
fn fill<'a, I: Item>(
    template: BoxTemplate,
    items: &[&'a I],
    escalation: Escalation,
) -> (PackedBox<'a, I>, Vec<&'a I>) {
    let mut bx = PackedBox::new(template);
    let Some((&first, rest)) = items.split_first() else {
        return (bx, Vec::new());
    };

    if !bx.place(first, [0, 0, 0]) {
        if escalation == Escalation::Allowed
            && let Some(larger) = catalog::next_larger(&template)
        {
            return fill(larger, items, escalation);
        }
        return (bx, items.to_vec());
    }

    let mut deferred = Vec::new();
    for &item in rest {
        if bx.place_next_to_items(item) {
            continue;
        }

        if escalation == Escalation::Allowed
            && let Some(larger) = escalate(&bx, item)
        {
            bx = larger;
            continue;
        }

        debug!(box_name = bx.template.name, "item deferred to a later box");
        deferred.push(item);
    }

    (bx, deferred)
}

/// Tries each larger box in turn, re-packing the current contents plus `item`
/// from scratch. Returns the first box that takes all of them.
fn escalate<'a, I: Item>(current: &PackedBox<'a, I>, item: &'a I) -> Option<PackedBox<'a, I>> {
    let mut batch = current.contents();
    batch.push(item);

    let mut candidate = catalog::next_larger(&current.template);
    while let Some(template) = candidate {
        let (trial, leftover) = fill(template, &batch, Escalation::Forbidden);
        if leftover.is_empty() {
            debug!(
                from = current.template.name,
                to = template.name,
                items = batch.len(),
                "escalated box"
            );
            return Some(trial);
        }
        candidate = catalog::next_larger(&template);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parcel, Rotation};

    /// Validates a complete packing:
    /// 1. Every placed item lies inside its box
    /// 2. No two items in the same box overlap
    /// 3. Every input item is placed exactly once
    fn assert_packing_valid(items: &[Parcel], boxes: &[PackedBox<'_, Parcel>]) {
        for (bi, bx) in boxes.iter().enumerate() {
            assert!(!bx.is_empty(), "box {bi} ({}) is empty", bx.template);
            let inner = bx.template.dimensions();
            for (pi, p) in bx.items.iter().enumerate() {
                let d = p.dimensions();
                for axis in 0..3 {
                    assert!(
                        p.position[axis] + d[axis] <= inner[axis],
                        "box {bi}, item {pi} ({}) exceeds {} on axis {axis}: {} + {} > {}",
                        p.item,
                        bx.template,
                        p.position[axis],
                        d[axis],
                        inner[axis]
                    );
                }
            }

            for i in 0..bx.items.len() {
                for j in (i + 1)..bx.items.len() {
                    let (a, b) = (&bx.items[i], &bx.items[j]);
                    let (da, db) = (a.dimensions(), b.dimensions());
                    let collide = (0..3).all(|k| {
                        a.position[k] < b.position[k] + db[k]
                            && b.position[k] < a.position[k] + da[k]
                    });
                    assert!(
                        !collide,
                        "box {bi}: item {i} ({} @ {:?}) overlaps item {j} ({} @ {:?})",
                        a.item, a.position, b.item, b.position
                    );
                }
            }
        }

        for (idx, item) in items.iter().enumerate() {
            let count = boxes
                .iter()
                .flat_map(|bx| &bx.items)
                .filter(|bi| std::ptr::eq(bi.item, item))
                .count();
            assert_eq!(count, 1, "input item {idx} ({item}) placed {count} times");
        }
    }

    fn layout(items: &[Parcel], bx: &PackedBox<'_, Parcel>) -> Vec<(usize, Rotation, [u32; 3])> {
        bx.items
            .iter()
            .map(|bi| {
                let idx = items
                    .iter()
                    .position(|it| std::ptr::eq(it, bi.item))
                    .unwrap();
                (idx, bi.rotation, bi.position)
            })
            .collect()
    }

    fn seven_items() -> Vec<Parcel> {
        vec![
            Parcel::new(20, 100, 30, 10),
            Parcel::new(100, 20, 30, 10),
            Parcel::new(20, 100, 30, 10),
            Parcel::new(100, 20, 30, 10),
            Parcel::new(100, 20, 30, 10),
            Parcel::new(100, 100, 30, 10),
            Parcel::new(100, 100, 30, 10),
        ]
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<Parcel> = vec![];
        let boxes = pack(&items).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_single_item() {
        let items = vec![Parcel::new(50, 50, 50, 10)];
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].template.name, "Box1");
        assert_eq!(boxes[0].total_weight(), 120);
    }

    #[test]
    fn test_seven_items_fit_smallest_box() {
        let items = seven_items();
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].template, catalog::CATALOG[0]);
        assert_eq!(
            layout(&items, &boxes[0]),
            vec![
                (5, Rotation::Whd, [0, 0, 0]),
                (6, Rotation::Whd, [100, 0, 0]),
                (0, Rotation::Whd, [200, 0, 0]),
                (1, Rotation::Whd, [0, 100, 0]),
                (2, Rotation::Hwd, [100, 100, 0]),
                (3, Rotation::Hdw, [200, 100, 0]),
                (4, Rotation::Whd, [0, 120, 0]),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let items = seven_items();
        let first = pack(&items).unwrap();
        let second = pack(&items).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.template, b.template);
            assert_eq!(layout(&items, a), layout(&items, b));
        }
    }

    #[test]
    fn test_equal_volumes_keep_input_order() {
        let items = vec![
            Parcel::new(10, 10, 10, 0).with_name("a"),
            Parcel::new(10, 10, 10, 0).with_name("b"),
            Parcel::new(10, 10, 10, 0).with_name("c"),
        ];
        let boxes = pack(&items).unwrap();
        let names: Vec<&str> = boxes[0].items.iter().map(|bi| bi.item.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_item_too_big() {
        let items = vec![Parcel::new(1000, 1000, 1000, 10)];
        let err = pack(&items).unwrap_err();
        assert_eq!(
            err,
            PackError::ItemTooBig {
                width: 1000,
                height: 1000,
                depth: 1000,
                weight: 10,
            }
        );
    }

    #[test]
    fn test_item_too_big_after_earlier_boxes() {
        // The long item has less volume than the first one, so it is only
        // examined on its own in the second round; the whole call still fails.
        let items = vec![Parcel::new(100, 100, 30, 10), Parcel::new(1000, 10, 10, 5)];
        let err = pack(&items).unwrap_err();
        assert!(matches!(err, PackError::ItemTooBig { width: 1000, .. }));
    }

    #[test]
    fn test_escalates_whole_box_for_straggler() {
        let items = vec![Parcel::new(40, 40, 40, 10), Parcel::new(220, 160, 100, 10)];
        let initial = catalog::smallest_fitting(&items[1]).unwrap();
        assert_eq!(initial.name, "Box1");

        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 1);
        // Box2 has more volume but cannot take the big item at all.
        assert_eq!(boxes[0].template.name, "Box3");
        assert!(boxes[0].volume() > initial.volume());
        assert_eq!(
            layout(&items, &boxes[0]),
            vec![(1, Rotation::Whd, [0, 0, 0]), (0, Rotation::Whd, [220, 0, 0])]
        );
    }

    #[test]
    fn test_escalates_repeatedly() {
        let items = vec![
            Parcel::new(220, 160, 100, 10),
            Parcel::new(50, 185, 110, 10),
            Parcel::new(45, 45, 45, 10),
        ];
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 1);
        // Box1 -> Box3 for the second item, Box3 -> Box4 for the third.
        assert_eq!(boxes[0].template.name, "Box4");
        assert_eq!(
            layout(&items, &boxes[0]),
            vec![
                (0, Rotation::Whd, [0, 0, 0]),
                (1, Rotation::Whd, [220, 0, 0]),
                (2, Rotation::Whd, [0, 160, 0]),
            ]
        );
    }

    #[test]
    fn test_defers_item_to_new_box() {
        let items = vec![Parcel::new(465, 350, 370, 100), Parcel::new(10, 10, 10, 1)];
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].template.name, "Box12");
        assert_eq!(boxes[1].template.name, "Box1");
    }

    #[test]
    fn test_two_largest_boxes() {
        let items = vec![Parcel::new(465, 350, 370, 100); 2];
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().all(|bx| bx.template.name == "Box12"));
    }

    #[test]
    fn test_mixed_batch_is_valid() {
        let mut items = vec![
            Parcel::new(20, 100, 30, 10),
            Parcel::new(100, 20, 30, 10),
            Parcel::new(20, 100, 30, 10),
            Parcel::new(100, 20, 30, 10),
            Parcel::new(100, 20, 30, 10),
        ];
        items.extend(std::iter::repeat_n(Parcel::new(100, 100, 30, 10), 9));
        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);
    }

    /// 40 parcels, 8 different sizes. Checks validity and a volume lower bound.
    #[test]
    fn test_large_order() {
        let sizes = [
            (300, 200, 150, 2000),
            (120, 80, 60, 300),
            (250, 250, 100, 900),
            (90, 90, 90, 200),
            (400, 120, 80, 1200),
            (60, 40, 20, 50),
            (200, 150, 150, 700),
            (35, 35, 200, 150),
        ];
        let items: Vec<Parcel> = sizes
            .iter()
            .flat_map(|&(w, h, d, g)| std::iter::repeat_n(Parcel::new(w, h, d, g), 5))
            .collect();
        assert_eq!(items.len(), 40);

        let boxes = pack(&items).unwrap();
        assert_packing_valid(&items, &boxes);

        let total: u64 = items.iter().map(|it| it.volume()).sum();
        let largest = catalog::CATALOG[catalog::CATALOG.len() - 1].volume();
        assert!(boxes.len() as u64 >= total.div_ceil(largest));
    }
}
