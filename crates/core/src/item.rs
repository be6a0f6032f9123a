//! Item model - classes, materials, and per-item enchantment state.
//!
//! Item kind strings (`"diamond_sword"`, `"leather_helmet"`, ...) are owned
//! by the inventory system. The class and material are resolved from the
//! string once, when the item is created, so the rest of the engine works
//! with enums instead of re-inspecting suffixes on every call.

use serde::{Deserialize, Serialize};

/// Broad gameplay class of an item, derived from its type-string suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    /// Melee weapon
    Sword,
    /// Chopping tool / secondary weapon
    Axe,
    /// Mining tool
    Pickaxe,
    /// Digging tool
    Shovel,
    /// Farming tool
    Hoe,
    /// Ranged weapon
    Bow,
    /// Head armor
    Helmet,
    /// Torso armor
    Chestplate,
    /// Leg armor
    Leggings,
    /// Foot armor
    Boots,
    /// Off-hand defensive item
    Shield,
    /// Fishing rod
    FishingRod,
    /// Shears
    Shears,
    /// Plain or enchanted book - accepts any enchantment
    Book,
    /// Anything else; not enchantable at the table
    Other,
}

/// Suffix lookup table used when resolving an item's class.
/// First match wins; order puts the longer/more specific suffixes first.
const CLASS_SUFFIXES: &[(&str, ItemClass)] = &[
    ("_sword", ItemClass::Sword),
    // "_pickaxe" must precede "_axe"
    ("_pickaxe", ItemClass::Pickaxe),
    ("_axe", ItemClass::Axe),
    ("_shovel", ItemClass::Shovel),
    ("_hoe", ItemClass::Hoe),
    ("_helmet", ItemClass::Helmet),
    ("_chestplate", ItemClass::Chestplate),
    ("_leggings", ItemClass::Leggings),
    ("_boots", ItemClass::Boots),
    ("bow", ItemClass::Bow),
    ("shield", ItemClass::Shield),
    ("fishing_rod", ItemClass::FishingRod),
    ("shears", ItemClass::Shears),
    ("book", ItemClass::Book),
];

impl ItemClass {
    /// Resolve the class from an item type string.
    pub fn from_type_name(type_name: &str) -> Self {
        for (suffix, class) in CLASS_SUFFIXES {
            if type_name.ends_with(suffix) {
                return *class;
            }
        }
        ItemClass::Other
    }

    /// True for armor pieces (helmet/chestplate/leggings/boots).
    pub fn is_armor(self) -> bool {
        matches!(
            self,
            ItemClass::Helmet | ItemClass::Chestplate | ItemClass::Leggings | ItemClass::Boots
        )
    }

    /// True for mining/farming tools (pickaxe, axe, shovel, hoe).
    pub fn is_tool(self) -> bool {
        matches!(
            self,
            ItemClass::Pickaxe | ItemClass::Axe | ItemClass::Shovel | ItemClass::Hoe
        )
    }
}

/// Material tier of an item, derived from its type-string prefix.
///
/// Each material carries a fixed enchantability constant biasing how strong
/// and how numerous enchantment offers can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// Wooden tools/weapons
    Wood,
    /// Stone tools/weapons
    Stone,
    /// Iron tools/armor
    Iron,
    /// Gold tools/armor (highest enchantability)
    Gold,
    /// Diamond tools/armor
    Diamond,
    /// Netherite tools/armor
    Netherite,
    /// Leather armor
    Leather,
    /// Chainmail armor
    Chainmail,
    /// Books
    Book,
    /// Unrecognized material
    Unknown,
}

impl Material {
    /// Resolve the material from an item type string.
    pub fn from_type_name(type_name: &str) -> Self {
        const PREFIXES: &[(&str, Material)] = &[
            ("wooden_", Material::Wood),
            ("wood_", Material::Wood),
            ("stone_", Material::Stone),
            ("iron_", Material::Iron),
            ("golden_", Material::Gold),
            ("gold_", Material::Gold),
            ("diamond_", Material::Diamond),
            ("netherite_", Material::Netherite),
            ("leather_", Material::Leather),
            ("chainmail_", Material::Chainmail),
        ];
        for (prefix, material) in PREFIXES {
            if type_name.starts_with(prefix) {
                return *material;
            }
        }
        if type_name.ends_with("book") {
            return Material::Book;
        }
        Material::Unknown
    }

    /// Fixed enchantability constant for this material.
    pub fn enchantability(self) -> u32 {
        match self {
            Material::Wood => 15,
            Material::Stone => 5,
            Material::Iron => 14,
            Material::Gold => 22,
            Material::Diamond => 10,
            Material::Netherite => 15,
            Material::Leather => 15,
            Material::Chainmail => 12,
            Material::Book => 30,
            Material::Unknown => 1,
        }
    }

    /// Base durability for items of this material.
    pub fn base_durability(self) -> u32 {
        match self {
            Material::Wood => 59,
            Material::Stone => 131,
            Material::Iron => 250,
            Material::Gold => 32,
            Material::Diamond => 1561,
            Material::Netherite => 2031,
            Material::Leather => 80,
            Material::Chainmail => 240,
            Material::Book | Material::Unknown => 0,
        }
    }
}

/// An enchantment entry on an item: catalog id plus level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    /// Catalog id, e.g. `"sharpness"`.
    pub id: String,
    /// Level, `1..=max_level` of the definition.
    pub level: u32,
}

impl Enchantment {
    /// Create an enchantment entry. Levels below 1 are raised to 1;
    /// the catalog-aware call sites clamp the upper bound.
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            level: level.max(1),
        }
    }
}

/// A mutable item instance as seen by the enchantment engine.
///
/// Owned by the inventory system; the engine mutates the enchantment list
/// and the derived display state (`lore`, `glowing`).
///
/// Deserialization only trusts `type_name`: class, material, and the
/// durability defaults are re-resolved server-side, so a client cannot
/// claim a sword is a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemWire")]
pub struct Item {
    /// Raw item kind string from the inventory system.
    pub type_name: String,
    /// Class resolved once at creation.
    pub class: ItemClass,
    /// Material resolved once at creation.
    pub material: Material,
    /// Active enchantments; ids are unique within the list.
    pub enchantments: Vec<Enchantment>,
    /// Remaining durability.
    pub durability: u32,
    /// Maximum durability (0 = item does not wear).
    pub max_durability: u32,
    /// Display lore lines, recomputed whenever the enchantment list changes.
    pub lore: Vec<String>,
    /// Enchanted-glint flag, recomputed with `lore`.
    pub glowing: bool,
}

/// Wire shape of an [`Item`]: everything except `type_name` is optional.
#[derive(Deserialize)]
struct ItemWire {
    type_name: String,
    #[serde(default)]
    enchantments: Vec<Enchantment>,
    #[serde(default)]
    durability: Option<u32>,
    #[serde(default)]
    max_durability: Option<u32>,
    #[serde(default)]
    lore: Vec<String>,
    #[serde(default)]
    glowing: bool,
}

impl From<ItemWire> for Item {
    fn from(wire: ItemWire) -> Self {
        let class = ItemClass::from_type_name(&wire.type_name);
        let material = Material::from_type_name(&wire.type_name);
        let max_durability = wire.max_durability.unwrap_or_else(|| material.base_durability());
        Self {
            type_name: wire.type_name,
            class,
            material,
            enchantments: wire.enchantments,
            durability: wire.durability.unwrap_or(max_durability).min(max_durability),
            max_durability,
            lore: wire.lore,
            glowing: wire.glowing,
        }
    }
}

impl Item {
    /// Create an item of the given kind with full durability and no
    /// enchantments. Class and material are resolved here, once.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let class = ItemClass::from_type_name(&type_name);
        let material = Material::from_type_name(&type_name);
        let max_durability = material.base_durability();
        Self {
            type_name,
            class,
            material,
            enchantments: Vec::new(),
            durability: max_durability,
            max_durability,
            lore: Vec::new(),
            glowing: false,
        }
    }

    /// Enchantability constant of this item's material.
    pub fn enchantability(&self) -> u32 {
        self.material.enchantability()
    }

    /// Level of the given enchantment, if present.
    pub fn enchantment_level(&self, id: &str) -> Option<u32> {
        self.enchantments
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.level)
    }

    /// Whether the item carries the given enchantment.
    pub fn has_enchantment(&self, id: &str) -> bool {
        self.enchantment_level(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_suffix() {
        assert_eq!(ItemClass::from_type_name("diamond_sword"), ItemClass::Sword);
        assert_eq!(
            ItemClass::from_type_name("iron_pickaxe"),
            ItemClass::Pickaxe
        );
        assert_eq!(ItemClass::from_type_name("stone_axe"), ItemClass::Axe);
        assert_eq!(
            ItemClass::from_type_name("leather_helmet"),
            ItemClass::Helmet
        );
        assert_eq!(ItemClass::from_type_name("bow"), ItemClass::Bow);
        assert_eq!(ItemClass::from_type_name("book"), ItemClass::Book);
        assert_eq!(
            ItemClass::from_type_name("enchanted_book"),
            ItemClass::Book
        );
        assert_eq!(ItemClass::from_type_name("cobblestone"), ItemClass::Other);
    }

    #[test]
    fn test_pickaxe_not_misread_as_axe() {
        assert_eq!(
            ItemClass::from_type_name("netherite_pickaxe"),
            ItemClass::Pickaxe
        );
    }

    #[test]
    fn test_material_from_prefix() {
        assert_eq!(Material::from_type_name("wooden_sword"), Material::Wood);
        assert_eq!(Material::from_type_name("golden_apple"), Material::Gold);
        assert_eq!(
            Material::from_type_name("netherite_boots"),
            Material::Netherite
        );
        assert_eq!(Material::from_type_name("book"), Material::Book);
        assert_eq!(Material::from_type_name("torch"), Material::Unknown);
    }

    #[test]
    fn test_enchantability_table() {
        // Fixed constants; the option generator depends on these exactly.
        assert_eq!(Material::Wood.enchantability(), 15);
        assert_eq!(Material::Stone.enchantability(), 5);
        assert_eq!(Material::Iron.enchantability(), 14);
        assert_eq!(Material::Gold.enchantability(), 22);
        assert_eq!(Material::Diamond.enchantability(), 10);
        assert_eq!(Material::Netherite.enchantability(), 15);
        assert_eq!(Material::Leather.enchantability(), 15);
        assert_eq!(Material::Chainmail.enchantability(), 12);
        assert_eq!(Material::Book.enchantability(), 30);
        assert_eq!(Material::Unknown.enchantability(), 1);
    }

    #[test]
    fn test_item_new_resolves_once() {
        let item = Item::new("diamond_sword");
        assert_eq!(item.class, ItemClass::Sword);
        assert_eq!(item.material, Material::Diamond);
        assert_eq!(item.durability, 1561);
        assert!(item.enchantments.is_empty());
        assert!(!item.glowing);
    }

    #[test]
    fn test_enchantment_level_lookup() {
        let mut item = Item::new("iron_sword");
        item.enchantments.push(Enchantment::new("sharpness", 3));
        assert_eq!(item.enchantment_level("sharpness"), Some(3));
        assert_eq!(item.enchantment_level("smite"), None);
        assert!(item.has_enchantment("sharpness"));
    }

    #[test]
    fn test_enchantment_min_level() {
        let e = Enchantment::new("sharpness", 0);
        assert_eq!(e.level, 1);
    }

    #[test]
    fn test_item_deserializes_from_type_name_alone() {
        let item: Item = serde_json::from_str(r#"{"type_name":"iron_pickaxe"}"#).unwrap();
        assert_eq!(item.class, ItemClass::Pickaxe);
        assert_eq!(item.material, Material::Iron);
        assert_eq!(item.durability, 250);
    }

    #[test]
    fn test_item_deserialize_ignores_claimed_class() {
        let json = r#"{"type_name":"diamond_sword","class":"book","material":"book"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.class, ItemClass::Sword);
        assert_eq!(item.material, Material::Diamond);
    }

    #[test]
    fn test_item_serialization_round_trip() {
        let mut item = Item::new("golden_helmet");
        item.enchantments.push(Enchantment::new("protection", 2));
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
