//! Catalog entities with translated content.
//!
//! Each entity composes [`TranslatableRecord`](crate::translatable::TranslatableRecord):
//! its translatable attributes are `TranslatableField`s, it owns a
//! `LanguageSet`, and it carries a transient display locale that is never
//! serialized. Creation starts the language set with the creation locale;
//! updates write through the record-level operations so new locales are
//! prepended.

mod category;
mod kit;
mod product;
mod usage;
mod variant;

pub use category::Category;
pub use kit::{Kit, KitContent};
pub use product::{Product, ProductAttributes, ProductContent};
pub use usage::{ProductUsage, StepContent, UsageStep};
pub use variant::{Variant, VariantOption, VariantSpec};

use serde::{Deserialize, Serialize};

/// Publication status shared by catalog entities, stored as `1` (active)
/// or `2` (inactive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    Active,
    #[default]
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => 1,
            Status::Inactive => 2,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Status::Active),
            2 => Ok(Status::Inactive),
            other => Err(format!("unknown status {}", other)),
        }
    }
}
