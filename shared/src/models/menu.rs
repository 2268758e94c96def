//! Menu Item Model

use crate::serde_helpers::null_as_default;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Menu item variant
///
/// Serialized as the `$type` discriminator of a [`MenuItem`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MenuCategory {
    Dish,
    Drink,
    Dessert,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 3] = [Self::Dish, Self::Drink, Self::Dessert];

    /// Category label shown on the menu board
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dish => "Блюда власної кухні",
            Self::Drink => "Напої",
            Self::Dessert => "Десерти",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// Purchasable menu entry
///
/// Identified by `name` within a catalog: equality and hashing only look at
/// the name, so two loads of the same entry compare equal even if the price
/// was edited in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "$type")]
    pub kind: MenuCategory,
    pub name: String,
    /// Unit price (non-negative)
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub weight_grams: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allergens: Vec<String>,
}

impl MenuItem {
    pub fn new(kind: MenuCategory, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            kind,
            name: name.into(),
            price,
            description: String::new(),
            weight_grams: 0.0,
            allergens: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight(mut self, grams: f64) -> Self {
        self.weight_grams = grams;
        self
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }

    /// Category label of this item's variant
    pub fn category(&self) -> &'static str {
        self.kind.label()
    }

    /// Catalog admission check: a name and a non-negative price
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && !self.price.is_sign_negative()
    }
}

impl PartialEq for MenuItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MenuItem {}

impl Hash for MenuItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
