//! # Bill Assembly
//!
//! Snapshots an order's computed figures into an immutable receipt and
//! hands it to the configured printer.
//!
//! The [`BillingService`] is constructed explicitly at composition time
//! and injected by reference; there is no process-wide billing state.
//! Only the printer slot is swappable, behind an interior lock; swapping
//! does not affect bills already rendered.
//!
//! ```text
//! Order ──► BillingService ──► ChargeCalculator (figures)
//!                │
//!                ├── Bill (immutable snapshot, defensive line copy)
//!                │
//!                └── BillPrinter::print(bill)   (swappable renderer)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::charge::ChargeCalculator;
use crate::error::{CoreError, CoreResult};
use crate::menu::OrderLine;
use crate::money::Money;

// =============================================================================
// Bill
// =============================================================================

/// One row of a bill: the line description and its subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub description: String,
    pub amount: Money,
}

/// Immutable snapshot of an order's final computed figures.
///
/// Created once per completed calculation; never mutated after
/// construction. The line rows are a defensive copy taken at assembly
/// time, so later changes to the order cannot reach into the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    order_id: u64,
    lines: Vec<BillLine>,
    subtotal: Money,
    discount: Money,
    tax: Money,
    total: Money,
    issued_at: DateTime<Utc>,
}

impl Bill {
    pub(crate) fn new(
        order_id: u64,
        lines: Vec<BillLine>,
        subtotal: Money,
        discount: Money,
        tax: Money,
        total: Money,
    ) -> Self {
        Bill {
            order_id,
            lines,
            subtotal,
            discount,
            tax,
            total,
            issued_at: Utc::now(),
        }
    }

    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

// =============================================================================
// Bill Printer
// =============================================================================

/// Renderer contract: consume a bill, produce a side effect, return
/// nothing.
pub trait BillPrinter: Send + Sync {
    fn print(&self, bill: &Bill);
}

/// Renders a bill in the default tabular text layout.
pub fn render_tabular(bill: &Bill) -> String {
    let rule = "-".repeat(54);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("BILL - Order #{}\n", bill.order_id()));
    out.push_str(&rule);
    out.push('\n');

    for line in bill.lines() {
        out.push_str(&format!(
            "{:<42} {:>10}\n",
            line.description,
            line.amount.to_string()
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "{:<42} {:>10}\n",
        "SUBTOTAL",
        bill.subtotal().to_string()
    ));
    out.push_str(&format!(
        "{:<42} {:>10}\n",
        "DISCOUNT",
        bill.discount().to_string()
    ));
    out.push_str(&format!("{:<42} {:>10}\n", "TAX", bill.tax().to_string()));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "{:<42} {:>10}\n",
        "TOTAL",
        bill.total().to_string()
    ));

    out
}

/// Default printer: emits the tabular rendering through the tracing
/// layer, keeping the core free of console I/O. Hosts that want a real
/// console receipt swap in their own printer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBillPrinter;

impl BillPrinter for LogBillPrinter {
    fn print(&self, bill: &Bill) {
        info!(order_id = bill.order_id(), "rendered bill:\n{}", render_tabular(bill));
    }
}

// =============================================================================
// Billing Service
// =============================================================================

/// Assembles bills and routes them to the configured printer.
pub struct BillingService {
    printer: Mutex<Arc<dyn BillPrinter>>,
}

impl BillingService {
    /// Creates a billing service with the default tabular printer.
    pub fn new() -> Self {
        Self::with_printer(Arc::new(LogBillPrinter))
    }

    /// Creates a billing service with the given printer.
    pub fn with_printer(printer: Arc<dyn BillPrinter>) -> Self {
        BillingService {
            printer: Mutex::new(printer),
        }
    }

    /// Swaps the printer. Bills already rendered are unaffected.
    pub fn set_printer(&self, printer: Arc<dyn BillPrinter>) {
        *self.printer.lock().expect("printer slot poisoned") = printer;
    }

    /// Snapshots the figures for `lines` into a bill.
    ///
    /// Accepts an empty line set (all-zero figures): the order pipeline
    /// bills zero-line orders. External one-shot callers go through
    /// [`BillingService::generate_bill`], which rejects empty input.
    pub(crate) fn assemble(
        &self,
        order_id: u64,
        lines: &[OrderLine],
        calculator: &ChargeCalculator,
    ) -> Bill {
        let breakdown = calculator.breakdown(lines);
        let rows = lines
            .iter()
            .map(|line| BillLine {
                description: line.description(),
                amount: line.subtotal(),
            })
            .collect();

        Bill::new(
            order_id,
            rows,
            breakdown.subtotal,
            breakdown.discount,
            breakdown.tax,
            breakdown.total,
        )
    }

    /// Generates a bill for a non-empty line set.
    ///
    /// Fails with [`CoreError::EmptyBill`] when `lines` is empty; this is
    /// construction-time validation, not a runtime state.
    pub fn generate_bill(
        &self,
        order_id: u64,
        lines: &[OrderLine],
        calculator: &ChargeCalculator,
    ) -> CoreResult<Bill> {
        if lines.is_empty() {
            return Err(CoreError::EmptyBill { order_id });
        }

        Ok(self.assemble(order_id, lines, calculator))
    }

    /// Sends a bill to the current printer.
    pub fn print(&self, bill: &Bill) {
        let printer = Arc::clone(&self.printer.lock().expect("printer slot poisoned"));
        printer.print(bill);
    }

    /// Generates a bill and prints it in one call.
    pub fn generate_and_print_bill(
        &self,
        order_id: u64,
        lines: &[OrderLine],
        calculator: &ChargeCalculator,
    ) -> CoreResult<Bill> {
        let bill = self.generate_bill(order_id, lines, calculator)?;
        self.print(&bill);
        Ok(bill)
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuCategory, MenuItem};
    use crate::money::TaxRate;

    fn lines() -> Vec<OrderLine> {
        vec![OrderLine::new(
            MenuItem::new("Margherita", MenuCategory::Pizza, Money::from_cents(5500)),
            1,
        )]
    }

    fn calculator() -> ChargeCalculator {
        ChargeCalculator::new(TaxRate::from_bps(1400)).unwrap()
    }

    #[test]
    fn test_generate_bill_snapshots_figures() {
        let billing = BillingService::new();
        let calc = calculator();

        let bill = billing.generate_bill(1000, &lines(), &calc).unwrap();
        assert_eq!(bill.order_id(), 1000);
        assert_eq!(bill.subtotal().cents(), 5500);
        assert_eq!(bill.discount().cents(), 0);
        assert_eq!(bill.tax().cents(), 770);
        assert_eq!(bill.total().cents(), 6270);
        assert_eq!(bill.lines().len(), 1);
        assert_eq!(bill.lines()[0].description, "Margherita (Pizza) x1");
        assert_eq!(bill.lines()[0].amount.cents(), 5500);
    }

    #[test]
    fn test_generate_bill_rejects_empty_lines() {
        let billing = BillingService::new();
        let calc = calculator();

        let result = billing.generate_bill(1000, &[], &calc);
        assert!(matches!(result, Err(CoreError::EmptyBill { order_id: 1000 })));
    }

    #[test]
    fn test_bill_is_isolated_from_later_line_changes() {
        let billing = BillingService::new();
        let calc = calculator();

        let mut order_lines = lines();
        let bill = billing.generate_bill(1000, &order_lines, &calc).unwrap();

        order_lines.push(OrderLine::new(
            MenuItem::new("Classic Beef", MenuCategory::Burger, Money::from_cents(7000)),
            3,
        ));

        assert_eq!(bill.lines().len(), 1);
        assert_eq!(bill.subtotal().cents(), 5500);
    }

    #[test]
    fn test_render_tabular_layout() {
        let billing = BillingService::new();
        let calc = calculator();
        let bill = billing.generate_bill(1000, &lines(), &calc).unwrap();

        let text = render_tabular(&bill);
        assert!(text.contains("BILL - Order #1000"));
        assert!(text.contains("Margherita (Pizza) x1"));
        assert!(text.contains("$55.00"));
        assert!(text.contains("SUBTOTAL"));
        assert!(text.contains("$62.70"));
    }

    #[test]
    fn test_printer_swap_routes_next_print() {
        struct Counting {
            printed: Mutex<Vec<u64>>,
        }

        impl BillPrinter for Counting {
            fn print(&self, bill: &Bill) {
                self.printed.lock().unwrap().push(bill.order_id());
            }
        }

        let billing = BillingService::new();
        let counting = Arc::new(Counting {
            printed: Mutex::new(Vec::new()),
        });

        let calc = calculator();
        billing.generate_and_print_bill(1000, &lines(), &calc).unwrap();
        assert!(counting.printed.lock().unwrap().is_empty());

        billing.set_printer(counting.clone() as Arc<dyn BillPrinter>);
        billing.generate_and_print_bill(1001, &lines(), &calc).unwrap();
        assert_eq!(*counting.printed.lock().unwrap(), vec![1001]);
    }

    #[test]
    fn test_bill_serializes_for_renderers() {
        let billing = BillingService::new();
        let calc = calculator();
        let bill = billing.generate_bill(1000, &lines(), &calc).unwrap();

        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["order_id"], 1000);
        assert_eq!(json["subtotal"], 5500);
        assert_eq!(json["lines"][0]["description"], "Margherita (Pizza) x1");
    }
}
