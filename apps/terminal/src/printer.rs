//! # Bill Printers
//!
//! Console renderers swapped into the billing service at startup. The
//! core's default printer goes through the tracing layer; these write the
//! receipt to stdout for the terminal session.

use bistro_core::bill::{render_tabular, Bill, BillPrinter};
use tracing::warn;

/// Prints the tabular receipt to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBillPrinter;

impl BillPrinter for ConsoleBillPrinter {
    fn print(&self, bill: &Bill) {
        println!("{}", render_tabular(bill));
    }
}

/// Prints the bill as pretty JSON, for piping into other tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBillPrinter;

impl BillPrinter for JsonBillPrinter {
    fn print(&self, bill: &Bill) {
        match serde_json::to_string_pretty(bill) {
            Ok(json) => println!("{json}"),
            Err(error) => warn!(order_id = bill.order_id(), %error, "bill serialization failed"),
        }
    }
}
