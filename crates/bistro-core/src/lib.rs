//! # bistro-core: Pure Business Logic for Bistro
//!
//! This crate is the heart of Bistro. It models the lifecycle of a
//! restaurant order as pure, synchronous business logic with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bistro Architecture                            │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                apps/terminal (composition root)               │  │
//! │  │   Menu catalog ─► Order lines ─► process() ─► Printed bill    │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │              ★ bistro-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │  ┌────────┐ ┌────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │  │
//! │  │  │  menu  │ │ charge │ │ payment │ │ notify  │ │   bill   │  │  │
//! │  │  │ items  │ │ totals │ │ auth    │ │ fan-out │ │ snapshot │  │  │
//! │  │  └────────┘ └────────┘ └─────────┘ └─────────┘ └──────────┘  │  │
//! │  │                        ┌─────────┐                            │  │
//! │  │                        │  order  │  fixed lifecycle routine   │  │
//! │  │                        └─────────┘                            │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • SINGLE-THREADED         │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent money and basis-point tax rates
//! - [`menu`] - Menu items with flattened add-ons, order lines
//! - [`charge`] - Charge calculator and discount strategies
//! - [`payment`] - Payment strategies, gateway simulation, handler façade
//! - [`notify`] - Observer registry for order-state fan-out
//! - [`order`] - The order state machine and its fixed routine
//! - [`bill`] - Immutable bill snapshots and the billing service
//! - [`error`] - Domain error types
//! - [`validation`] - Fail-fast input validation
//!
//! ## Design Principles
//!
//! 1. **Integer money**: all monetary values are cents (i64); no floats
//! 2. **Explicit errors**: validation and misuse are typed errors; a
//!    declined payment is an expected outcome carried by the order status
//! 3. **Injection over globals**: calculator, notifier, and billing
//!    service are constructed once and passed by reference
//! 4. **Single-threaded**: the pipeline is synchronous and cooperative;
//!    interior locks exist only so collaborators can be shared by `Arc`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bistro_core::bill::BillingService;
//! use bistro_core::charge::ChargeCalculator;
//! use bistro_core::menu::{MenuCategory, MenuItem};
//! use bistro_core::money::{Money, TaxRate};
//! use bistro_core::notify::OrderNotifier;
//! use bistro_core::order::{Order, OrderStatus};
//! use bistro_core::payment::PaymentHandler;
//!
//! let calculator = Arc::new(ChargeCalculator::new(TaxRate::from_bps(1400)).unwrap());
//! let notifier = Arc::new(OrderNotifier::new());
//! let billing = Arc::new(BillingService::new());
//!
//! let mut order = Order::dine_in(
//!     5,
//!     PaymentHandler::new(),
//!     notifier,
//!     Arc::clone(&calculator),
//!     billing,
//! )
//! .unwrap();
//!
//! let pizza = MenuItem::new("Margherita", MenuCategory::Pizza, Money::from_cents(5500));
//! order.add_item(pizza, 1).unwrap();
//!
//! let outcome = order.process().unwrap();
//! assert_eq!(outcome.status, OrderStatus::Completed);
//! assert_eq!(outcome.bill.unwrap().total().cents(), 6270);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod charge;
pub mod error;
pub mod menu;
pub mod money;
pub mod notify;
pub mod order;
pub mod payment;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bistro_core::Money` instead of
// `use bistro_core::money::Money`

pub use bill::{Bill, BillLine, BillPrinter, BillingService};
pub use charge::{CategoryDiscount, ChargeBreakdown, ChargeCalculator, DiscountStrategy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use menu::{Addon, MenuCategory, MenuItem, OrderLine};
pub use money::{Money, TaxRate};
pub use notify::{NotifyError, Observer, OrderEvent, OrderNotifier};
pub use order::{Order, OrderKind, OrderStatus, ProcessOutcome};
pub use payment::{
    CashPayment, CardPayment, FixedGateway, PaymentGateway, PaymentHandler, PaymentStrategy,
    SimulatedGateway, WalletPayment,
};
