//! # Staff Observers
//!
//! Kitchen stations and waiters consume order-placement events from the
//! notification registry. A kitchen queues order ids for preparation
//! (FIFO); a waiter just acknowledges the event for their table.

use std::collections::VecDeque;
use std::sync::Mutex;

use bistro_core::notify::{NotifyError, Observer, OrderEvent};
use tracing::info;

// =============================================================================
// Kitchen
// =============================================================================

/// A kitchen station with a preparation queue.
pub struct Kitchen {
    id: String,
    station: String,
    queue: Mutex<VecDeque<u64>>,
}

impl Kitchen {
    pub fn new(id: &str, station: &str) -> Self {
        Kitchen {
            id: id.to_string(),
            station: station.to_string(),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Pops the next queued order for preparation.
    pub fn prepare_next(&self) -> Option<u64> {
        let order_id = self.queue.lock().expect("kitchen queue poisoned").pop_front();
        if let Some(order_id) = order_id {
            info!(kitchen = %self.id, order_id, "preparing order");
        }
        order_id
    }

    pub fn has_orders(&self) -> bool {
        !self.queue.lock().expect("kitchen queue poisoned").is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().expect("kitchen queue poisoned").len()
    }
}

impl Observer for Kitchen {
    fn name(&self) -> &str {
        &self.id
    }

    fn update(&self, event: &OrderEvent) -> Result<(), NotifyError> {
        self.queue
            .lock()
            .map_err(|_| NotifyError::new("kitchen queue poisoned"))?
            .push_back(event.order_id);

        info!(
            kitchen = %self.id,
            station = %self.station,
            order_id = event.order_id,
            status = %event.status,
            "order queued"
        );
        Ok(())
    }
}

// =============================================================================
// Waiter
// =============================================================================

/// A waiter assigned to a table (floaters have none).
pub struct Waiter {
    id: String,
    assigned_table: Option<u32>,
}

impl Waiter {
    pub fn new(id: &str, assigned_table: Option<u32>) -> Self {
        Waiter {
            id: id.to_string(),
            assigned_table,
        }
    }

    pub fn assigned_table(&self) -> Option<u32> {
        self.assigned_table
    }
}

impl Observer for Waiter {
    fn name(&self) -> &str {
        &self.id
    }

    fn update(&self, event: &OrderEvent) -> Result<(), NotifyError> {
        info!(
            waiter = %self.id,
            table = ?self.assigned_table,
            order_id = event.order_id,
            status = %event.status,
            "waiter notified"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
