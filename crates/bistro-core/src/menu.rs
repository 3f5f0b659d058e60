//! # Menu Items and Order Lines
//!
//! Immutable priced-describable values that flow into the order pipeline.
//!
//! A menu item is a base dish plus a flat list of add-ons (extra cheese,
//! sauce, …). Add-ons contribute to both the description and the price;
//! once constructed the item never changes, so it can be freely cloned
//! into order lines and bill snapshots.
//!
//! ```text
//! MenuItem { "Margherita", Pizza, $55.00, [+ Extra Cheese $2.50] }
//!      │
//!      ▼  describe() = "Margherita (Pizza) + Extra Cheese"
//!      ▼  price()    = $57.50
//!      │
//! OrderLine { item, quantity: 2 }  →  subtotal() = $115.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Menu Category
// =============================================================================

/// Dish category, used for display and by category-matching discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Pizza,
    Burger,
    Side,
    Drink,
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuCategory::Pizza => "Pizza",
            MenuCategory::Burger => "Burger",
            MenuCategory::Side => "Side",
            MenuCategory::Drink => "Drink",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Add-on
// =============================================================================

/// A named price delta layered onto a base menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    name: String,
    price: Money,
}

impl Addon {
    /// Creates a new add-on.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Addon {
            name: name.into(),
            price,
        }
    }

    /// The add-on name as it appears in descriptions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The price delta this add-on contributes.
    pub fn price(&self) -> Money {
        self.price
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An immutable menu item: base dish plus zero or more add-ons.
///
/// ## Example
/// ```rust
/// use bistro_core::menu::{MenuCategory, MenuItem};
/// use bistro_core::money::Money;
///
/// let pizza = MenuItem::new("Margherita", MenuCategory::Pizza, Money::from_cents(5500))
///     .with_addon("Extra Cheese", Money::from_cents(2500));
///
/// assert_eq!(pizza.describe(), "Margherita (Pizza) + Extra Cheese");
/// assert_eq!(pizza.price().cents(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    name: String,
    category: MenuCategory,
    base_price: Money,
    addons: Vec<Addon>,
}

impl MenuItem {
    /// Creates a new base menu item with no add-ons.
    pub fn new(name: impl Into<String>, category: MenuCategory, base_price: Money) -> Self {
        MenuItem {
            name: name.into(),
            category,
            base_price,
            addons: Vec::new(),
        }
    }

    /// Returns a copy of this item with one more add-on layered on.
    ///
    /// Add-ons accumulate in application order; each contributes to both
    /// `describe` and `price`.
    pub fn with_addon(mut self, name: impl Into<String>, price: Money) -> Self {
        self.addons.push(Addon::new(name, price));
        self
    }

    /// The base dish name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dish category.
    pub fn category(&self) -> MenuCategory {
        self.category
    }

    /// The registered add-ons, in application order.
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    /// Full description: base name, category, then each add-on.
    pub fn describe(&self) -> String {
        let mut description = format!("{} ({})", self.name, self.category);
        for addon in &self.addons {
            description.push_str(" + ");
            description.push_str(&addon.name);
        }
        description
    }

    /// Full price: base price plus every add-on delta.
    pub fn price(&self) -> Money {
        self.addons
            .iter()
            .fold(self.base_price, |total, addon| total + addon.price)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A menu item bound to a quantity, contributing one row to a bill.
///
/// Quantities below 1 are coerced up to 1 at construction; after that the
/// line is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    item: MenuItem,
    quantity: i64,
}

impl OrderLine {
    /// Creates a line for `quantity` of `item`.
    pub fn new(item: MenuItem, quantity: i64) -> Self {
        OrderLine {
            item,
            quantity: quantity.max(1),
        }
    }

    /// The menu item on this line.
    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// The quantity ordered (always ≥ 1).
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Line subtotal: item price × quantity.
    pub fn subtotal(&self) -> Money {
        self.item.price().multiply_quantity(self.quantity)
    }

    /// Line description with quantity suffix, e.g. `Margherita (Pizza) x2`.
    pub fn description(&self) -> String {
        format!("{} x{}", self.item.describe(), self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
