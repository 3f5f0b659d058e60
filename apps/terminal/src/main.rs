//! # Bistro Terminal
//!
//! Composition root for the order pipeline: builds the menu catalog,
//! wires the shared collaborators, registers staff observers and the
//! console printer, then drives one order of each kind through the fixed
//! processing routine.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (RUST_LOG overridable)
//! 2. Build calculator (14% tax) and register the pizza discount
//! 3. Register kitchen and waiter observers
//! 4. Point the billing service at the console printer
//! 5. Run the dine-in, delivery, and takeaway orders
//! 6. Drain the kitchen queue

mod catalog;
mod printer;
mod staff;

use std::sync::Arc;

use bistro_core::bill::BillingService;
use bistro_core::charge::{CategoryDiscount, ChargeCalculator};
use bistro_core::error::CoreResult;
use bistro_core::menu::MenuCategory;
use bistro_core::money::{Money, TaxRate};
use bistro_core::notify::{Observer, OrderNotifier};
use bistro_core::order::Order;
use bistro_core::payment::{CardPayment, CashPayment, PaymentHandler, WalletPayment};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::MenuPreset;
use printer::{ConsoleBillPrinter, JsonBillPrinter};
use staff::{Kitchen, Waiter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bistro=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> CoreResult<()> {
    init_tracing();

    info!("starting bistro terminal");

    // Shared collaborators, built once and injected everywhere.
    let calculator = Arc::new(ChargeCalculator::new(TaxRate::from_percentage(14.0))?);
    calculator.add_discount_strategy(Arc::new(CategoryDiscount::new(MenuCategory::Pizza, 1000)));

    let notifier = Arc::new(OrderNotifier::new());
    let grill = Arc::new(Kitchen::new("K1", "grill"));
    notifier.register(grill.clone() as Arc<dyn Observer>);
    notifier.register(Arc::new(Waiter::new("W1", Some(5))));
    notifier.register(Arc::new(Waiter::new("W2", None)));

    let billing = Arc::new(BillingService::with_printer(Arc::new(ConsoleBillPrinter)));

    // Menu cards.
    let veg = MenuPreset::Vegetarian.build();
    let non_veg = MenuPreset::NonVegetarian.build();
    let kids = MenuPreset::Kids.build();

    // ------------------------------------------------------------------
    // Dine-in: one Margherita, cash at the counter.
    // ------------------------------------------------------------------
    let mut dine_in = Order::dine_in(
        5,
        PaymentHandler::new(),
        Arc::clone(&notifier),
        Arc::clone(&calculator),
        Arc::clone(&billing),
    )?;
    dine_in.set_customer_name("Dana");
    if let Some(margherita) = veg.find_item("Margherita") {
        dine_in.add_item(margherita.clone(), 1)?;
    }
    dine_in.set_payment_strategy(Arc::new(CashPayment::new("C-07")?));

    let outcome = dine_in.process()?;
    info!(order_id = dine_in.order_id(), status = %outcome.status, "dine-in finished");

    // ------------------------------------------------------------------
    // Delivery: two beef burgers with extra cheese, wallet payment.
    // The pizza discount matches nothing here.
    // ------------------------------------------------------------------
    let mut delivery = Order::delivery(
        "12 Nile St",
        Money::from_cents(1500),
        PaymentHandler::new(),
        Arc::clone(&notifier),
        Arc::clone(&calculator),
        Arc::clone(&billing),
    )?;
    delivery.set_customer_name("Omar");
    if let Some(beef) = non_veg.find_item("Classic Beef") {
        let loaded = beef.clone().with_addon("Extra Cheese", Money::from_cents(2500));
        delivery.add_item(loaded, 2)?;
    }
    delivery.set_payment_strategy(Arc::new(WalletPayment::new("W-1881")?));

    let outcome = delivery.process()?;
    info!(order_id = delivery.order_id(), status = %outcome.status, "delivery finished");

    // ------------------------------------------------------------------
    // Takeaway: kids card, card payment, JSON receipt this time.
    // ------------------------------------------------------------------
    billing.set_printer(Arc::new(JsonBillPrinter));

    let mut takeaway = Order::takeaway(
        "18:30",
        PaymentHandler::new(),
        Arc::clone(&notifier),
        Arc::clone(&calculator),
        Arc::clone(&billing),
    )?;
    takeaway.set_customer_name("Noor");
    if let Some(mini_burger) = kids.find_item("Mini Burger") {
        takeaway.add_item(mini_burger.clone(), 2)?;
    }
    takeaway.set_payment_strategy(Arc::new(CardPayment::new("4242424242424242", "AUTH-9313")?));

    let outcome = takeaway.process()?;
    info!(order_id = takeaway.order_id(), status = %outcome.status, "takeaway finished");

    // ------------------------------------------------------------------
    // The grill works through everything that was queued.
    // ------------------------------------------------------------------
    while grill.prepare_next().is_some() {}

    info!("bistro terminal done");
    Ok(())
}
