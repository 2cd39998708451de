use crate::types::{BoxTemplate, Item, Rotation};

const fn template(
    name: &'static str,
    width: u32,
    height: u32,
    depth: u32,
    weight: u32,
) -> BoxTemplate {
    BoxTemplate {
        name,
        width,
        height,
        depth,
        weight,
    }
}

/// Standard shipping boxes in ascending order of volume. Dimensions in mm,
/// weight of the empty box in g.
pub static CATALOG: [BoxTemplate; 12] = [
    template("Box1", 220, 160, 100, 110),
    template("Box2", 260, 145, 145, 120),
    template("Box3", 270, 185, 110, 140),
    template("Box4", 310, 220, 140, 210),
    template("Box6", 300, 300, 130, 290),
    template("Box5", 300, 210, 200, 250),
    template("Box7", 370, 270, 150, 300),
    template("Box8", 300, 300, 250, 360),
    template("Box10", 430, 315, 200, 430),
    template("Box9", 470, 280, 210, 400),
    template("Box11", 330, 330, 350, 500),
    template("Box12", 465, 350, 370, 650),
];

/// Smallest box that holds `item` on its own, in some rotation.
pub fn smallest_fitting<I: Item + ?Sized>(item: &I) -> Option<BoxTemplate> {
    CATALOG.iter().copied().find(|t| fits_empty(t, item))
}

/// First box with strictly more volume than `current`, if any.
pub fn next_larger(current: &BoxTemplate) -> Option<BoxTemplate> {
    let volume = current.volume();
    CATALOG.iter().copied().find(|t| t.volume() > volume)
}

fn fits_empty<I: Item + ?Sized>(template: &BoxTemplate, item: &I) -> bool {
    let inner = template.dimensions();
    Rotation::ALL.iter().any(|r| {
        let d = r.dimensions(item);
        d[0] <= inner[0] && d[1] <= inner[1] && d[2] <= inner[2]
    })
}
