use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Anything the packer can put in a box. Dimensions are in millimeters,
/// weight in grams.
pub trait Item {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn depth(&self) -> u32;
    fn weight(&self) -> u32;

    fn volume(&self) -> u64 {
        self.width() as u64 * self.height() as u64 * self.depth() as u64
    }
}

/// A named shippable unit, as accepted by the CLI and the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Parcel {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub depth: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub weight: u32,
}

impl Parcel {
    pub fn new(width: u32, height: u32, depth: u32, weight: u32) -> Self {
        Self {
            name: String::new(),
            width,
            height,
            depth,
            weight,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Item for Parcel {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn weight(&self) -> u32 {
        self.weight
    }
}

impl std::fmt::Display for Parcel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{} ", self.name)?;
        }
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// One of the fixed standard boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxTemplate {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Weight of the empty box itself, not a load limit.
    pub weight: u32,
}

impl BoxTemplate {
    pub fn volume(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }

    pub fn is_valid(&self) -> bool {
        self.volume() != 0
    }

    pub fn dimensions(&self) -> [u32; 3] {
        [self.width, self.height, self.depth]
    }
}

impl std::fmt::Display for BoxTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{}x{}",
            self.name, self.width, self.height, self.depth
        )
    }
}

/// Axis-aligned orientation of an item. Each variant names which item
/// dimension lands on the box's width, height and depth axes. The declaration
/// order is the order placement tries them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rotation {
    #[serde(rename = "RT1")]
    Whd,
    #[serde(rename = "RT2")]
    Hwd,
    #[serde(rename = "RT3")]
    Hdw,
    #[serde(rename = "RT4")]
    Dhw,
    #[serde(rename = "RT5")]
    Dwh,
    #[serde(rename = "RT6")]
    Wdh,
}

impl Rotation {
    pub const ALL: [Rotation; 6] = [
        Rotation::Whd,
        Rotation::Hwd,
        Rotation::Hdw,
        Rotation::Dhw,
        Rotation::Dwh,
        Rotation::Wdh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Rotation::Whd => "RT1",
            Rotation::Hwd => "RT2",
            Rotation::Hdw => "RT3",
            Rotation::Dhw => "RT4",
            Rotation::Dwh => "RT5",
            Rotation::Wdh => "RT6",
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An item seated in a box at `position` (mm from the box origin).
#[derive(Debug)]
pub struct BoxItem<'a, I> {
    pub item: &'a I,
    pub position: [u32; 3],
    pub rotation: Rotation,
}

impl<I> Clone for BoxItem<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for BoxItem<'_, I> {}

impl<I: Item> BoxItem<'_, I> {
    /// Extents along the box axes under this item's rotation.
    pub fn dimensions(&self) -> [u32; 3] {
        self.rotation.dimensions(self.item)
    }

    pub fn volume(&self) -> u64 {
        self.item.volume()
    }

    /// Corner reached by stepping past this item along `axis`, keeping the
    /// other two coordinates.
    pub fn anchor_along(&self, axis: usize) -> [u32; 3] {
        let mut anchor = self.position;
        anchor[axis] += self.dimensions()[axis];
        anchor
    }
}

/// A catalog box being filled, or a finished one in a packing result.
#[derive(Debug)]
pub struct PackedBox<'a, I> {
    pub template: BoxTemplate,
    pub items: Vec<BoxItem<'a, I>>,
}

impl<'a, I: Item> PackedBox<'a, I> {
    pub fn new(template: BoxTemplate) -> Self {
        Self {
            template,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn volume(&self) -> u64 {
        self.template.volume()
    }

    pub fn used_volume(&self) -> u64 {
        self.items.iter().map(|bi| bi.volume()).sum()
    }

    pub fn fill_percent(&self) -> f64 {
        let volume = self.volume();
        if volume == 0 {
            return 0.0;
        }
        self.used_volume() as f64 / volume as f64 * 100.0
    }

    /// Gross weight: the empty box plus everything in it.
    pub fn total_weight(&self) -> u64 {
        self.template.weight as u64
            + self
                .items
                .iter()
                .map(|bi| bi.item.weight() as u64)
                .sum::<u64>()
    }

    pub(crate) fn contents(&self) -> Vec<&'a I> {
        self.items.iter().map(|bi| bi.item).collect()
    }
}

impl<I: Item + Serialize> Serialize for BoxItem<'_, I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BoxItem", 4)?;
        s.serialize_field("item", self.item)?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("rotation", &self.rotation)?;
        s.serialize_field("dimensions", &self.dimensions())?;
        s.end()
    }
}

impl<I: Item + Serialize> Serialize for PackedBox<'_, I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PackedBox", 8)?;
        s.serialize_field("name", self.template.name)?;
        s.serialize_field("width", &self.template.width)?;
        s.serialize_field("height", &self.template.height)?;
        s.serialize_field("depth", &self.template.depth)?;
        s.serialize_field("weight", &self.template.weight)?;
        s.serialize_field("gross_weight", &self.total_weight())?;
        s.serialize_field("fill_percent", &self.fill_percent())?;
        s.serialize_field("items", &self.items)?;
        s.end()
    }
}

/// Accepts any JSON number with an integral value in `u32` range, so that
/// clients sending `100.0` are not rejected.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}
