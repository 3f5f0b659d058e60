//! # Order State Machine
//!
//! Owns the order lines, customer identity, and assigned payment
//! strategy, and drives the fixed processing lifecycle.
//!
//! ## Lifecycle
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            │              Order::process                    │
//!            │                                                │
//!  NEW ────► │ 1. status = PLACED, placement trace            │
//!            │ 2. notify_systems()   (observer fan-out)       │
//!            │ 3. calculate_total()  (charge figures trace)   │
//!            │ 4. handle_payment()  ──── declined ──► CANCELLED
//!            │ 5. print_bill()       (bill snapshot + print)  │
//!            │                                                │
//!            └──────────────────────────────────► COMPLETED   │
//! ```
//!
//! Status moves strictly forward and only inside `process`; once an order
//! is terminal, further `process` calls fail loudly. The routine itself
//! is fixed — the dine-in / takeaway / delivery variants only contribute
//! their per-step behavior through the closed [`OrderKind`] enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::bill::{Bill, BillingService};
use crate::charge::ChargeCalculator;
use crate::error::{CoreError, CoreResult};
use crate::menu::{MenuItem, OrderLine};
use crate::money::Money;
use crate::notify::{OrderEvent, OrderNotifier};
use crate::payment::{PaymentHandler, PaymentStrategy};
use crate::validation;

/// First order id handed out by the process-wide allocator.
pub const FIRST_ORDER_ID: u64 = 1000;

/// Monotonic process-wide order-id allocator; ids never collide.
static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(FIRST_ORDER_ID);

fn next_order_id() -> u64 {
    NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is being assembled (lines may be added).
    #[default]
    New,
    /// The processing routine has started.
    Placed,
    /// Payment was declined; terminal.
    Cancelled,
    /// Bill produced; terminal.
    Completed,
}

impl OrderStatus {
    /// Whether this status accepts no further processing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::New => "NEW",
            OrderStatus::Placed => "PLACED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Order Kind
// =============================================================================

/// The closed set of order variants.
///
/// Variant data is validated by the [`Order`] constructors and fixed for
/// the life of the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderKind {
    DineIn {
        table_number: u32,
    },
    Takeaway {
        pickup_time: String,
    },
    Delivery {
        address: String,
        /// Participates in the tax base and payment total, but not in the
        /// discountable subtotal.
        delivery_fee: Money,
    },
}

impl OrderKind {
    fn variant_name(&self) -> &'static str {
        match self {
            OrderKind::DineIn { .. } => "dine-in",
            OrderKind::Takeaway { .. } => "takeaway",
            OrderKind::Delivery { .. } => "delivery",
        }
    }
}

// =============================================================================
// Process Outcome
// =============================================================================

/// What one `process` run produced: the terminal status, and the bill
/// when the order completed.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub status: OrderStatus,
    pub bill: Option<Bill>,
}

// =============================================================================
// Order
// =============================================================================

/// A restaurant order driving the fixed four-step processing routine.
pub struct Order {
    order_id: u64,
    kind: OrderKind,
    lines: Vec<OrderLine>,
    customer_name: String,
    payment_strategy: Option<Arc<dyn PaymentStrategy>>,
    status: OrderStatus,
    payment_handler: PaymentHandler,
    notifier: Arc<OrderNotifier>,
    calculator: Arc<ChargeCalculator>,
    billing: Arc<BillingService>,
}

impl Order {
    /// Creates an order of the given kind, validating variant data.
    pub fn new(
        kind: OrderKind,
        payment_handler: PaymentHandler,
        notifier: Arc<OrderNotifier>,
        calculator: Arc<ChargeCalculator>,
        billing: Arc<BillingService>,
    ) -> CoreResult<Self> {
        let kind = match kind {
            OrderKind::DineIn { table_number } => {
                validation::validate_table_number(table_number)?;
                OrderKind::DineIn { table_number }
            }
            OrderKind::Takeaway { pickup_time } => OrderKind::Takeaway {
                pickup_time: validation::validate_required("pickup time", &pickup_time)?,
            },
            OrderKind::Delivery {
                address,
                delivery_fee,
            } => {
                validation::validate_delivery_fee(delivery_fee)?;
                OrderKind::Delivery {
                    address: validation::validate_required("delivery address", &address)?,
                    delivery_fee,
                }
            }
        };

        Ok(Order {
            order_id: next_order_id(),
            kind,
            lines: Vec::new(),
            customer_name: "Guest".to_string(),
            payment_strategy: None,
            status: OrderStatus::New,
            payment_handler,
            notifier,
            calculator,
            billing,
        })
    }

    /// Convenience constructor for a dine-in order at `table_number`.
    pub fn dine_in(
        table_number: u32,
        payment_handler: PaymentHandler,
        notifier: Arc<OrderNotifier>,
        calculator: Arc<ChargeCalculator>,
        billing: Arc<BillingService>,
    ) -> CoreResult<Self> {
        Self::new(
            OrderKind::DineIn { table_number },
            payment_handler,
            notifier,
            calculator,
            billing,
        )
    }

    /// Convenience constructor for a takeaway order.
    pub fn takeaway(
        pickup_time: &str,
        payment_handler: PaymentHandler,
        notifier: Arc<OrderNotifier>,
        calculator: Arc<ChargeCalculator>,
        billing: Arc<BillingService>,
    ) -> CoreResult<Self> {
        Self::new(
            OrderKind::Takeaway {
                pickup_time: pickup_time.to_string(),
            },
            payment_handler,
            notifier,
            calculator,
            billing,
        )
    }

    /// Convenience constructor for a delivery order.
    pub fn delivery(
        address: &str,
        delivery_fee: Money,
        payment_handler: PaymentHandler,
        notifier: Arc<OrderNotifier>,
        calculator: Arc<ChargeCalculator>,
        billing: Arc<BillingService>,
    ) -> CoreResult<Self> {
        Self::new(
            OrderKind::Delivery {
                address: address.to_string(),
                delivery_fee,
            },
            payment_handler,
            notifier,
            calculator,
            billing,
        )
    }

    // -------------------------------------------------------------------------
    // Accessors and pre-placement mutation
    // -------------------------------------------------------------------------

    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn kind(&self) -> &OrderKind {
        &self.kind
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sets the customer name (defaults to "Guest").
    pub fn set_customer_name(&mut self, name: &str) {
        self.customer_name = name.to_string();
    }

    /// Assigns the payment strategy. Payment is optional: an order with
    /// no strategy completes without an authorization attempt.
    pub fn set_payment_strategy(&mut self, strategy: Arc<dyn PaymentStrategy>) {
        self.payment_strategy = Some(strategy);
    }

    /// Appends a line for `quantity` of `item`.
    ///
    /// Lines are append-only and accepted only while the order is NEW.
    pub fn add_item(&mut self, item: MenuItem, quantity: i64) -> CoreResult<()> {
        if self.status != OrderStatus::New {
            return Err(CoreError::OrderClosed {
                order_id: self.order_id,
                status: self.status,
            });
        }

        self.lines.push(OrderLine::new(item, quantity));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Fixed processing routine
    // -------------------------------------------------------------------------

    /// Runs the fixed processing routine.
    ///
    /// ## Behavior
    /// - fails loudly if the order already left the NEW state
    /// - a declined payment is not an error: the order lands in
    ///   CANCELLED and no bill is produced
    /// - with a succeeding (or absent) strategy the order lands in
    ///   COMPLETED and exactly one bill is produced
    pub fn process(&mut self) -> CoreResult<ProcessOutcome> {
        if self.status != OrderStatus::New {
            return Err(CoreError::AlreadyProcessed {
                order_id: self.order_id,
                status: self.status,
            });
        }

        self.status = OrderStatus::Placed;
        info!(
            order_id = self.order_id,
            variant = self.kind.variant_name(),
            customer = %self.customer_name,
            "order placed"
        );

        self.notify_systems();
        self.calculate_total();

        if !self.handle_payment() {
            self.status = OrderStatus::Cancelled;
            warn!(order_id = self.order_id, "payment failed, order cancelled");
            return Ok(ProcessOutcome {
                status: self.status,
                bill: None,
            });
        }

        let bill = self.print_bill();
        self.status = OrderStatus::Completed;
        info!(order_id = self.order_id, "order completed");

        Ok(ProcessOutcome {
            status: self.status,
            bill: Some(bill),
        })
    }

    /// Step 2: fan out the placement event; delivery additionally
    /// surfaces its address on the trace channel.
    fn notify_systems(&self) {
        self.notifier.notify(OrderEvent {
            order_id: self.order_id,
            status: self.status,
        });

        if let OrderKind::Delivery { address, .. } = &self.kind {
            info!(order_id = self.order_id, address = %address, "delivery address recorded");
        }
    }

    /// Step 3: compute and trace the charge figures.
    ///
    /// Delivery taxes `after_discount + delivery_fee`; dine-in and
    /// takeaway tax `after_discount` only.
    fn calculate_total(&self) {
        let breakdown = self.calculator.breakdown(&self.lines);

        match &self.kind {
            OrderKind::DineIn { table_number } => {
                info!(
                    order_id = self.order_id,
                    table = table_number,
                    subtotal = %breakdown.subtotal,
                    discount = %breakdown.discount,
                    tax = %breakdown.tax,
                    total = %breakdown.total,
                    "dine-in charges"
                );
            }
            OrderKind::Takeaway { pickup_time } => {
                info!(
                    order_id = self.order_id,
                    pickup = %pickup_time,
                    subtotal = %breakdown.subtotal,
                    discount = %breakdown.discount,
                    tax = %breakdown.tax,
                    total = %breakdown.total,
                    "takeaway charges"
                );
            }
            OrderKind::Delivery { delivery_fee, .. } => {
                let tax = self.calculator.tax(breakdown.after_discount + *delivery_fee);
                let total = breakdown.after_discount + tax + *delivery_fee;
                info!(
                    order_id = self.order_id,
                    subtotal = %breakdown.subtotal,
                    discount = %breakdown.discount,
                    delivery_fee = %delivery_fee,
                    tax = %tax,
                    total = %total,
                    "delivery charges"
                );
            }
        }
    }

    /// The amount the assigned strategy must authorize, recomputed fresh:
    /// discount strategies may have been registered after lines were
    /// appended, so cached figures are never trusted.
    fn payable_total(&self) -> Money {
        let breakdown = self.calculator.breakdown(&self.lines);

        match &self.kind {
            OrderKind::DineIn { .. } | OrderKind::Takeaway { .. } => breakdown.total,
            OrderKind::Delivery { delivery_fee, .. } => {
                let tax = self.calculator.tax(breakdown.after_discount + *delivery_fee);
                breakdown.after_discount + tax + *delivery_fee
            }
        }
    }

    /// Step 4: run the payment, if one is required.
    ///
    /// Returns true when no strategy is assigned, or when the total is
    /// non-positive (a zero amount is never submitted for
    /// authorization), or when the handler reports success.
    fn handle_payment(&self) -> bool {
        let Some(strategy) = &self.payment_strategy else {
            info!(order_id = self.order_id, "no payment strategy assigned, skipping payment");
            return true;
        };

        let total = self.payable_total();
        if !total.is_positive() {
            info!(order_id = self.order_id, total = %total, "nothing to pay");
            return true;
        }

        self.payment_handler
            .process_payment(total, Some(strategy.as_ref()))
    }

    /// Step 5: snapshot the bill and hand it to the configured printer.
    ///
    /// Zero-line orders still bill (all-zero figures). Delivery orders
    /// surface their fee and address next to the rendered bill.
    fn print_bill(&self) -> Bill {
        let bill = self
            .billing
            .assemble(self.order_id, &self.lines, &self.calculator);
        self.billing.print(&bill);

        if let OrderKind::Delivery {
            address,
            delivery_fee,
        } = &self.kind
        {
            info!(
                order_id = self.order_id,
                address = %address,
                delivery_fee = %delivery_fee,
                "delivery surcharge applies on top of billed figures"
            );
        }

        bill
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charge::CategoryDiscount;
    use crate::menu::MenuCategory;
    use crate::money::TaxRate;
    use crate::notify::{NotifyError, Observer};
    use crate::payment::{CashPayment, FixedGateway, WalletPayment};
    use std::sync::Mutex;

    struct Recorder {
        events: Mutex<Vec<OrderEvent>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Recorder {
                events: Mutex::new(Vec::new()),
            })
        }
    }

    impl Observer for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn update(&self, event: &OrderEvent) -> Result<(), NotifyError> {
            self.events.lock().unwrap().push(*event);
            Ok(())
        }
    }

    struct Fixture {
        notifier: Arc<OrderNotifier>,
        calculator: Arc<ChargeCalculator>,
        billing: Arc<BillingService>,
    }

    impl Fixture {
        fn new(tax_bps: u32) -> Self {
            Fixture {
                notifier: Arc::new(OrderNotifier::new()),
                calculator: Arc::new(ChargeCalculator::new(TaxRate::from_bps(tax_bps)).unwrap()),
                billing: Arc::new(BillingService::new()),
            }
        }

        fn dine_in(&self, table: u32) -> Order {
            Order::dine_in(
                table,
                PaymentHandler::new(),
                Arc::clone(&self.notifier),
                Arc::clone(&self.calculator),
                Arc::clone(&self.billing),
            )
            .unwrap()
        }

        fn takeaway(&self, pickup: &str) -> Order {
            Order::takeaway(
                pickup,
                PaymentHandler::new(),
                Arc::clone(&self.notifier),
                Arc::clone(&self.calculator),
                Arc::clone(&self.billing),
            )
            .unwrap()
        }

        fn delivery(&self, address: &str, fee_cents: i64) -> Order {
            Order::delivery(
                address,
                Money::from_cents(fee_cents),
                PaymentHandler::new(),
                Arc::clone(&self.notifier),
                Arc::clone(&self.calculator),
                Arc::clone(&self.billing),
            )
            .unwrap()
        }
    }

    fn pizza(name: &str, price_cents: i64) -> MenuItem {
        MenuItem::new(name, MenuCategory::Pizza, Money::from_cents(price_cents))
    }

    fn burger(name: &str, price_cents: i64) -> MenuItem {
        MenuItem::new(name, MenuCategory::Burger, Money::from_cents(price_cents))
    }

    #[test]
    fn test_fresh_order_is_new_with_unique_id() {
        let fixture = Fixture::new(1400);
        let a = fixture.dine_in(3);
        let b = fixture.dine_in(4);

        assert_eq!(a.status(), OrderStatus::New);
        assert!(a.order_id() >= FIRST_ORDER_ID);
        assert_ne!(a.order_id(), b.order_id());
    }

    #[test]
    fn test_variant_data_validated() {
        let fixture = Fixture::new(1400);

        assert!(fixture
            .dine_in(1)
            .status()
            .eq(&OrderStatus::New));
        assert!(Order::dine_in(
            0,
            PaymentHandler::new(),
            Arc::clone(&fixture.notifier),
            Arc::clone(&fixture.calculator),
            Arc::clone(&fixture.billing),
        )
        .is_err());
        assert!(Order::takeaway(
            "  ",
            PaymentHandler::new(),
            Arc::clone(&fixture.notifier),
            Arc::clone(&fixture.calculator),
            Arc::clone(&fixture.billing),
        )
        .is_err());
        assert!(Order::delivery(
            "12 Nile St",
            Money::from_cents(-1),
            PaymentHandler::new(),
            Arc::clone(&fixture.notifier),
            Arc::clone(&fixture.calculator),
            Arc::clone(&fixture.billing),
        )
        .is_err());
    }

    /// Scenario A: dine-in, one $55.00 pizza, 14% tax, no discounts,
    /// cash payment.
    #[test]
    fn test_dine_in_cash_order_completes() {
        let fixture = Fixture::new(1400);
        let recorder = Recorder::new();
        fixture.notifier.register(recorder.clone() as Arc<dyn Observer>);

        let mut order = fixture.dine_in(5);
        order.set_customer_name("Dana");
        order.add_item(pizza("Margherita", 5500), 1).unwrap();
        order.set_payment_strategy(Arc::new(CashPayment::new("C-07").unwrap()));

        let outcome = order.process().unwrap();
        assert_eq!(outcome.status, OrderStatus::Completed);
        assert_eq!(order.status(), OrderStatus::Completed);

        let bill = outcome.bill.unwrap();
        assert_eq!(bill.subtotal().cents(), 5500);
        assert_eq!(bill.discount().cents(), 0);
        assert_eq!(bill.tax().cents(), 770);
        assert_eq!(bill.total().cents(), 6270);
        assert_eq!(bill.total(), fixture.calculator.total(order.lines()));

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].order_id, order.order_id());
        assert_eq!(events[0].status, OrderStatus::Placed);
    }

    /// Scenario B: delivery, two $70.00 burgers, a pizza discount that
    /// matches nothing, $15.00 fee, 14% tax on (after-discount + fee).
    #[test]
    fn test_delivery_fee_in_tax_base_but_not_bill() {
        let fixture = Fixture::new(1400);
        fixture
            .calculator
            .add_discount_strategy(Arc::new(CategoryDiscount::new(MenuCategory::Pizza, 1000)));

        let mut order = fixture.delivery("12 Nile St", 1500);
        order.add_item(burger("Classic Beef", 7000), 2).unwrap();

        // afterDiscount = 14000, fee = 1500, tax = 14% of 15500 = 2170
        assert_eq!(order.payable_total().cents(), 14000 + 2170 + 1500);

        let outcome = order.process().unwrap();
        assert_eq!(outcome.status, OrderStatus::Completed);

        // The bill itself carries the calculator's fee-less figures.
        let bill = outcome.bill.unwrap();
        assert_eq!(bill.subtotal().cents(), 14000);
        assert_eq!(bill.discount().cents(), 0);
        assert_eq!(bill.tax().cents(), 1960);
        assert_eq!(bill.total().cents(), 15960);
    }

    /// Scenario C: takeaway with zero lines and a cash strategy; nothing
    /// is payable, so authorization is never attempted and the order
    /// completes with a zero-figure bill.
    #[test]
    fn test_zero_line_order_completes_without_payment() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.takeaway("18:30");
        order.set_payment_strategy(Arc::new(CashPayment::new("C-07").unwrap()));

        let outcome = order.process().unwrap();
        assert_eq!(outcome.status, OrderStatus::Completed);

        let bill = outcome.bill.unwrap();
        assert!(bill.subtotal().is_zero());
        assert!(bill.discount().is_zero());
        assert!(bill.tax().is_zero());
        assert!(bill.total().is_zero());
        assert!(bill.lines().is_empty());
    }

    #[test]
    fn test_declined_payment_cancels_without_bill() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.dine_in(2);
        order.add_item(pizza("Margherita", 5500), 1).unwrap();
        order.set_payment_strategy(Arc::new(
            WalletPayment::with_gateway("W-1", Arc::new(FixedGateway(false))).unwrap(),
        ));

        let outcome = order.process().unwrap();
        assert_eq!(outcome.status, OrderStatus::Cancelled);
        assert!(outcome.bill.is_none());
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_absent_strategy_completes() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.dine_in(2);
        order.add_item(pizza("Margherita", 5500), 1).unwrap();

        let outcome = order.process().unwrap();
        assert_eq!(outcome.status, OrderStatus::Completed);
        assert!(outcome.bill.is_some());
    }

    #[test]
    fn test_double_processing_fails_loudly() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.dine_in(2);
        order.add_item(pizza("Margherita", 5500), 1).unwrap();
        order.process().unwrap();
        assert!(order.status().is_terminal());

        let again = order.process();
        assert!(matches!(
            again,
            Err(CoreError::AlreadyProcessed {
                status: OrderStatus::Completed,
                ..
            })
        ));

        // Cancelled orders are equally terminal.
        let mut declined = fixture.dine_in(3);
        declined.add_item(pizza("Margherita", 5500), 1).unwrap();
        declined.set_payment_strategy(Arc::new(
            WalletPayment::with_gateway("W-1", Arc::new(FixedGateway(false))).unwrap(),
        ));
        declined.process().unwrap();
        assert!(matches!(
            declined.process(),
            Err(CoreError::AlreadyProcessed {
                status: OrderStatus::Cancelled,
                ..
            })
        ));
    }

    #[test]
    fn test_lines_frozen_after_processing() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.dine_in(2);
        order.add_item(pizza("Margherita", 5500), 1).unwrap();
        order.process().unwrap();

        let rejected = order.add_item(pizza("Margherita", 5500), 1);
        assert!(matches!(rejected, Err(CoreError::OrderClosed { .. })));
        assert_eq!(order.lines().len(), 1);
    }

    #[test]
    fn test_payable_total_sees_late_discounts() {
        let fixture = Fixture::new(1400);
        let mut order = fixture.dine_in(2);
        order.add_item(pizza("Margherita", 5500), 2).unwrap();

        let before = order.payable_total();

        // Strategy registered after the lines were appended still counts.
        fixture
            .calculator
            .add_discount_strategy(Arc::new(CategoryDiscount::new(MenuCategory::Pizza, 1000)));

        let after = order.payable_total();
        assert!(after < before);
        // subtotal 11000, discount 1100, after 9900, tax 1386
        assert_eq!(after.cents(), 9900 + 1386);
    }

    #[test]
    fn test_observer_sees_each_processed_order_once() {
        let fixture = Fixture::new(1400);
        let recorder = Recorder::new();
        fixture.notifier.register(recorder.clone() as Arc<dyn Observer>);
        fixture.notifier.register(recorder.clone() as Arc<dyn Observer>);

        let mut first = fixture.dine_in(1);
        first.add_item(pizza("Margherita", 5500), 1).unwrap();
        first.process().unwrap();

        let mut second = fixture.takeaway("19:00");
        second.add_item(burger("Classic Beef", 7000), 1).unwrap();
        second.process().unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].order_id, first.order_id());
        assert_eq!(events[1].order_id, second.order_id());
    }
}
