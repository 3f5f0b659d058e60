//! # Menu Catalog
//!
//! Preset menus handed to the ordering flow. Items are immutable
//! priced-describable values from bistro-core; the presets only decide
//! what goes on each card.

use bistro_core::menu::{MenuCategory, MenuItem};
use bistro_core::money::Money;

/// A card of menu items.
#[derive(Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Menu { items: Vec::new() }
    }

    pub fn add_item(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Finds the first item whose description contains `name_part`
    /// (case-insensitive).
    pub fn find_item(&self, name_part: &str) -> Option<&MenuItem> {
        let needle = name_part.to_lowercase();
        self.items
            .iter()
            .find(|item| item.describe().to_lowercase().contains(&needle))
    }
}

/// The preset cards the restaurant offers.
#[derive(Debug, Clone, Copy)]
pub enum MenuPreset {
    Vegetarian,
    NonVegetarian,
    Kids,
}

impl MenuPreset {
    /// Builds the card for this preset.
    pub fn build(self) -> Menu {
        let mut menu = Menu::new();

        match self {
            MenuPreset::Vegetarian => {
                menu.add_item(MenuItem::new(
                    "Italian Veg",
                    MenuCategory::Pizza,
                    Money::from_cents(6000),
                ));
                menu.add_item(MenuItem::new(
                    "Margherita",
                    MenuCategory::Pizza,
                    Money::from_cents(5500),
                ));
                menu.add_item(MenuItem::new(
                    "Veggie Classic",
                    MenuCategory::Burger,
                    Money::from_cents(4500),
                ));
            }
            MenuPreset::NonVegetarian => {
                menu.add_item(MenuItem::new(
                    "Italian Chicken",
                    MenuCategory::Pizza,
                    Money::from_cents(8000),
                ));
                menu.add_item(MenuItem::new(
                    "Eastern Meat Feast",
                    MenuCategory::Pizza,
                    Money::from_cents(9500),
                ));
                menu.add_item(MenuItem::new(
                    "Classic Beef",
                    MenuCategory::Burger,
                    Money::from_cents(7000),
                ));
            }
            MenuPreset::Kids => {
                menu.add_item(MenuItem::new(
                    "Kids Small Margherita",
                    MenuCategory::Pizza,
                    Money::from_cents(3000),
                ));
                menu.add_item(MenuItem::new(
                    "Kids Mini Burger",
                    MenuCategory::Burger,
                    Money::from_cents(2500),
                ));
            }
        }

        menu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_populated() {
        assert_eq!(MenuPreset::Vegetarian.build().items().len(), 3);
        assert_eq!(MenuPreset::NonVegetarian.build().items().len(), 3);
        assert_eq!(MenuPreset::Kids.build().items().len(), 2);
    }

    #[test]
    fn test_find_item_is_case_insensitive() {
        let menu = MenuPreset::Vegetarian.build();

        let item = menu.find_item("margherita").unwrap();
        assert_eq!(item.name(), "Margherita");

        assert!(menu.find_item("sushi").is_none());
    }

    #[test]
    fn test_find_item_matches_category_text() {
        let menu = MenuPreset::NonVegetarian.build();

        // Descriptions carry the category, so "pizza" matches too.
        let item = menu.find_item("pizza").unwrap();
        assert_eq!(item.category(), MenuCategory::Pizza);
    }
}
