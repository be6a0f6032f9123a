#![warn(missing_docs)]
//! Enchantment engine: catalog, eligibility, offer generation,
//! application/combination, and effect aggregation.
//!
//! The pipeline mirrors the enchanting-table flow: the resolver filters
//! which enchantments fit the held item, the option generator rolls three
//! offers from the table's power, the application engine mutates the
//! item's enchantment list, and the effect aggregator turns that list into
//! gameplay modifiers at action time.

pub mod apply;
pub mod catalog;
pub mod effects;
pub mod eligibility;
pub mod options;
pub mod table;

pub use apply::{apply_enchantment, combine_items, update_display, CombineError};
pub use catalog::{default_catalog, CatalogError, EnchantmentCatalog, EnchantmentDefinition};
pub use effects::{apply_effects, calculate_effects, ActionContext, DamageSource, EffectBundle};
pub use eligibility::{conflicts, is_eligible, TargetFlags};
pub use options::{generate_options, EnchantmentOption, OptionGenerator};
pub use table::{BlockLookup, EnchantingTableState, TableRegistry, MAX_BOOKSHELVES};
