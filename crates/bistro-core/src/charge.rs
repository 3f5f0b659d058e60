//! # Charge Calculator
//!
//! Composes a tax rate and a set of discount strategies into the
//! subtotal / discount / tax / total figures for a set of order lines.
//!
//! ## Charge Arithmetic
//! ```text
//! subtotal        = Σ line subtotal                     (0 if no lines)
//! discount        = Σ strategy.apply(lines)             (0 if no strategies)
//! after_discount  = max(0, subtotal - discount)         (never negative)
//! tax             = after_discount × rate               (never negative)
//! total           = after_discount + tax
//! ```
//!
//! The aggregate clamp at zero means stacked discounts can never drive an
//! order to a negative total, and tax is always computed on a non-negative
//! base.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::ValidationError;
use crate::menu::{MenuCategory, OrderLine};
use crate::money::{Money, TaxRate};
use crate::validation;

// =============================================================================
// Discount Strategy
// =============================================================================

/// A pluggable rule computing a currency amount to subtract from the
/// pre-tax subtotal.
///
/// ## Contract
/// - `apply` is a pure function of the line set; it must return a
///   non-negative amount
/// - Strategy-local configuration (category, percent) is fixed at
///   construction; no shared mutable state across calls
pub trait DiscountStrategy: Send + Sync {
    /// Short human-readable label for traces, e.g. `Pizza -10%`.
    fn label(&self) -> &str;

    /// The currency amount to subtract for this line set.
    fn apply(&self, lines: &[OrderLine]) -> Money;
}

/// Percentage discount on the subtotal of lines in a matching category.
///
/// This is the single shipped discount semantics
/// (percentage-of-matching-subtotal); lines outside the category
/// contribute nothing.
///
/// ## Example
/// ```rust
/// use bistro_core::charge::{CategoryDiscount, DiscountStrategy};
/// use bistro_core::menu::{MenuCategory, MenuItem, OrderLine};
/// use bistro_core::money::Money;
///
/// let discount = CategoryDiscount::new(MenuCategory::Pizza, 1000); // 10%
/// let lines = vec![OrderLine::new(
///     MenuItem::new("Margherita", MenuCategory::Pizza, Money::from_cents(5500)),
///     1,
/// )];
/// assert_eq!(discount.apply(&lines).cents(), 550);
/// ```
pub struct CategoryDiscount {
    label: String,
    category: MenuCategory,
    percent_bps: u32,
}

impl CategoryDiscount {
    /// Creates a discount of `percent_bps` (1000 = 10%) on `category` lines.
    pub fn new(category: MenuCategory, percent_bps: u32) -> Self {
        CategoryDiscount {
            label: format!("{} -{}%", category, percent_bps / 100),
            category,
            percent_bps,
        }
    }

    /// The matched category.
    pub fn category(&self) -> MenuCategory {
        self.category
    }
}

impl DiscountStrategy for CategoryDiscount {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, lines: &[OrderLine]) -> Money {
        let matching_subtotal: Money = lines
            .iter()
            .filter(|line| line.item().category() == self.category)
            .map(|line| line.subtotal())
            .sum();

        matching_subtotal.percentage(self.percent_bps)
    }
}

// =============================================================================
// Charge Breakdown
// =============================================================================

/// All figures for one line set, computed in a single pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChargeBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub after_discount: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Charge Calculator
// =============================================================================

/// Computes subtotal, discount, tax, and total for a set of order lines.
///
/// The calculator is shared by injection (`Arc`) between orders and the
/// billing service; the strategy list sits behind an interior lock so
/// strategies can be registered after construction. It remains a
/// single-owner component: the lock is not a multi-thread design.
pub struct ChargeCalculator {
    tax_rate: TaxRate,
    strategies: Mutex<Vec<Arc<dyn DiscountStrategy>>>,
}

impl ChargeCalculator {
    /// Creates a calculator with the given tax rate.
    ///
    /// Fails with a validation error if the rate exceeds 100%.
    pub fn new(tax_rate: TaxRate) -> Result<Self, ValidationError> {
        validation::validate_tax_rate(tax_rate)?;

        Ok(ChargeCalculator {
            tax_rate,
            strategies: Mutex::new(Vec::new()),
        })
    }

    /// The configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Registers a discount strategy.
    ///
    /// Registration is idempotent by reference: adding the same `Arc`
    /// twice keeps a single entry.
    pub fn add_discount_strategy(&self, strategy: Arc<dyn DiscountStrategy>) {
        let mut strategies = self.strategies.lock().expect("strategy list poisoned");
        if !strategies.iter().any(|s| Arc::ptr_eq(s, &strategy)) {
            debug!(strategy = strategy.label(), "discount strategy registered");
            strategies.push(strategy);
        }
    }

    /// Removes a previously registered strategy, by reference.
    pub fn remove_discount_strategy(&self, strategy: &Arc<dyn DiscountStrategy>) {
        let mut strategies = self.strategies.lock().expect("strategy list poisoned");
        strategies.retain(|s| !Arc::ptr_eq(s, strategy));
    }

    /// Drops every registered strategy.
    pub fn clear_discount_strategies(&self) {
        self.strategies
            .lock()
            .expect("strategy list poisoned")
            .clear();
    }

    /// Number of registered strategies.
    pub fn discount_strategy_count(&self) -> usize {
        self.strategies.lock().expect("strategy list poisoned").len()
    }

    /// Sum of line subtotals (zero for an empty line set).
    pub fn subtotal(&self, lines: &[OrderLine]) -> Money {
        lines.iter().map(|line| line.subtotal()).sum()
    }

    /// Sum of every registered strategy's discount (zero if no strategies
    /// or no lines).
    pub fn discount(&self, lines: &[OrderLine]) -> Money {
        if lines.is_empty() {
            return Money::zero();
        }

        let strategies = self.strategies.lock().expect("strategy list poisoned");
        strategies
            .iter()
            .map(|strategy| strategy.apply(lines))
            .sum()
    }

    /// Tax on an already-discounted amount.
    ///
    /// A negative input yields zero tax, never negative tax.
    pub fn tax(&self, after_discount: Money) -> Money {
        after_discount.max(Money::zero()).calculate_tax(self.tax_rate)
    }

    /// Grand total: clamped after-discount amount plus tax on it.
    pub fn total(&self, lines: &[OrderLine]) -> Money {
        self.breakdown(lines).total
    }

    /// Computes every figure for the line set in one pass.
    pub fn breakdown(&self, lines: &[OrderLine]) -> ChargeBreakdown {
        let subtotal = self.subtotal(lines);
        let discount = self.discount(lines);
        let after_discount = (subtotal - discount).max(Money::zero());
        let tax = self.tax(after_discount);

        ChargeBreakdown {
            subtotal,
            discount,
            after_discount,
            tax,
            total: after_discount + tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
