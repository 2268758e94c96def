//! TableOrders - one table's view of the shared order book
//!
//! Every operation goes through [`OrderDesk`]:
//!
//! ```text
//! operation(order_id, ...)
//!     ├─ 1. Lock the order book, read "now" from the desk clock
//!     ├─ 2. Find the order on this table (OrderNotFound otherwise)
//!     ├─ 3. Apply the change to the order model
//!     ├─ 4. On error: nothing changed, nothing written
//!     ├─ 5. Rewrite orders.json
//!     └─ 6. Return a copy of the updated order
//! ```
//!
//! Confirmation callbacks run while the book is locked; they must not call
//! back into the desk.
//!
//! # Edit sessions
//!
//! [`TableOrders::begin_edit`] snapshots an order's lines and status. Line
//! edits made while the session is open are applied (and persisted) as they
//! happen. Schedule edits are staged on the [`EditSession`] and only applied
//! by [`TableOrders::finish_edit`], which rejects a schedule in the past.
//! [`TableOrders::cancel_edit`] restores the snapshot.

mod error;
pub use error::*;

use super::book::OrderDesk;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use shared::models::MenuItem;
use shared::order::{
    Decrement, Order, OrderError, OrderLine, OrderResult, OrderSnapshot, OrderStatus,
    parse_time_of_day,
};
use std::sync::Arc;

/// A past order that was never closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclosedPastOrder {
    pub order_id: u64,
    pub table_number: u32,
    pub status: OrderStatus,
    pub scheduled_at: NaiveDateTime,
}

impl UnclosedPastOrder {
    fn of(order: &Order) -> Self {
        Self {
            order_id: order.order_id(),
            table_number: order.table_number(),
            status: order.status(),
            scheduled_at: order.scheduled_at(),
        }
    }
}

/// What a table view shows: its orders, newest first, plus warnings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListing {
    pub table_number: u32,
    pub orders: Vec<Order>,
    pub unclosed: Vec<UnclosedPastOrder>,
}

/// An open edit of one order
///
/// Carries the rollback point and the staged schedule.
#[derive(Debug, Clone)]
pub struct EditSession {
    snapshot: OrderSnapshot,
    scheduled_at: NaiveDateTime,
}

impl EditSession {
    pub fn order_id(&self) -> u64 {
        self.snapshot.order_id()
    }

    pub fn snapshot(&self) -> &OrderSnapshot {
        &self.snapshot
    }

    /// Schedule that [`TableOrders::finish_edit`] will commit
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.scheduled_at
    }

    /// Change the date, keeping the time of day
    pub fn set_date(&mut self, date: NaiveDate) {
        self.scheduled_at = date.and_time(self.scheduled_at.time());
    }

    /// Change the time of day, keeping the date
    pub fn set_time(&mut self, time: NaiveTime) {
        self.scheduled_at = self.scheduled_at.date().and_time(time);
    }

    /// Parse an `HH:mm` entry; malformed input leaves the schedule as is
    pub fn set_time_str(&mut self, input: &str) -> OrderResult<NaiveDateTime> {
        let time = parse_time_of_day(input)?;
        self.set_time(time);
        Ok(self.scheduled_at)
    }
}

/// Orders of one table
#[derive(Debug, Clone)]
pub struct TableOrders {
    desk: Arc<OrderDesk>,
    table_number: u32,
}

impl TableOrders {
    /// Open the view, registering the table if it has no orders yet
    ///
    /// Unclosed past orders are reported by [`Self::listing`], not here.
    pub fn open(desk: Arc<OrderDesk>, table_number: u32) -> Self {
        desk.register_table(table_number);
        Self { desk, table_number }
    }

    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    pub fn desk(&self) -> &Arc<OrderDesk> {
        &self.desk
    }

    // ========== Queries ==========

    /// Copy of this table's orders, newest first
    pub fn orders(&self) -> Vec<Order> {
        self.desk.read(|book| book.table(self.table_number).to_vec())
    }

    pub fn order(&self, order_id: u64) -> ManagerResult<Order> {
        self.desk
            .read(|book| {
                book.table(self.table_number)
                    .iter()
                    .find(|o| o.order_id() == order_id)
                    .cloned()
            })
            .ok_or_else(|| self.not_found(order_id))
    }

    /// Past orders still open, one warning logged per order
    pub fn unclosed_past_orders(&self) -> Vec<UnclosedPastOrder> {
        let now = self.desk.now();
        let unclosed: Vec<_> = self.desk.read(|book| {
            book.table(self.table_number)
                .iter()
                .filter(|o| o.is_unclosed_past(now))
                .map(UnclosedPastOrder::of)
                .collect()
        });

        for order in &unclosed {
            tracing::warn!(
                order_id = order.order_id,
                table = order.table_number,
                status = ?order.status,
                scheduled_at = %order.scheduled_at,
                "Past order was never closed"
            );
        }
        unclosed
    }

    /// Orders plus unclosed-past warnings, for one display pass
    pub fn listing(&self) -> TableListing {
        TableListing {
            table_number: self.table_number,
            orders: self.orders(),
            unclosed: self.unclosed_past_orders(),
        }
    }

    // ========== Orders ==========

    /// File a new order built from `lines`, scheduled for now
    pub fn create_order(&self, lines: Vec<OrderLine>) -> ManagerResult<Order> {
        if let Some(empty) = lines.iter().find(|l| l.quantity() == 0) {
            return Err(OrderError::InvalidQuantity(empty.quantity().to_string()).into());
        }

        let table = self.table_number;
        let order = self.desk.mutate(|book, now| {
            let mut order = book.new_order(table, now);
            for line in lines {
                order.push_line(line)?;
            }
            book.table_mut(table).insert(0, order.clone());
            Ok(order)
        })?;

        tracing::info!(
            order_id = order.order_id(),
            table,
            lines = order.lines().len(),
            total = %order.total_cost(),
            "Order created"
        );
        Ok(order)
    }

    /// Delete an order if `confirm` agrees; returns whether it was deleted
    pub fn delete_order<F>(&self, order_id: u64, confirm: F) -> ManagerResult<bool>
    where
        F: FnOnce(&Order) -> bool,
    {
        let table = self.table_number;
        let deleted = self.desk.mutate(|book, _| {
            let orders = book.table_mut(table);
            let idx = orders
                .iter()
                .position(|o| o.order_id() == order_id)
                .ok_or_else(|| self.not_found(order_id))?;
            if !confirm(&orders[idx]) {
                return Ok(false);
            }
            orders.remove(idx);
            Ok(true)
        })?;

        if deleted {
            tracing::info!(order_id, table, "Order deleted");
        }
        Ok(deleted)
    }

    /// Move an order to `target` if its current type allows it
    pub fn change_status(&self, order_id: u64, target: OrderStatus) -> ManagerResult<Order> {
        self.with_order(order_id, |order, now| {
            let previous = order.change_status(target, now)?;
            tracing::info!(
                order_id,
                from = ?previous,
                to = ?target,
                "Order status changed"
            );
            Ok(order.clone())
        })
    }

    // ========== Lines ==========

    pub fn add_line(
        &self,
        order_id: u64,
        item: Arc<MenuItem>,
        quantity: u32,
        note: &str,
    ) -> ManagerResult<Order> {
        self.with_order(order_id, |order, _| {
            order.add_line(item, quantity, note)?;
            Ok(order.clone())
        })
    }

    pub fn set_quantity(&self, order_id: u64, item_name: &str, quantity: i64) -> ManagerResult<Order> {
        self.with_order(order_id, |order, _| {
            order.set_quantity(item_name, quantity)?;
            Ok(order.clone())
        })
    }

    pub fn increment_quantity(&self, order_id: u64, item_name: &str) -> ManagerResult<Order> {
        self.with_order(order_id, |order, _| {
            order.increment_quantity(item_name)?;
            Ok(order.clone())
        })
    }

    /// Take one portion off a line; at quantity 1, `confirm` decides removal
    pub fn decrement_quantity<F>(
        &self,
        order_id: u64,
        item_name: &str,
        confirm: F,
    ) -> ManagerResult<(Order, Decrement)>
    where
        F: FnOnce(&OrderLine) -> bool,
    {
        self.with_order(order_id, |order, _| {
            let outcome = order.decrement_quantity(item_name, confirm)?;
            Ok((order.clone(), outcome))
        })
    }

    /// Delete a line if `confirm` agrees
    pub fn remove_line<F>(&self, order_id: u64, item_name: &str, confirm: F) -> ManagerResult<Order>
    where
        F: FnOnce(&OrderLine) -> bool,
    {
        self.with_order(order_id, |order, _| {
            let line = order
                .line(item_name)
                .ok_or_else(|| OrderError::LineNotFound(item_name.to_string()))?;
            if confirm(line) {
                order.remove_line(item_name)?;
            }
            Ok(order.clone())
        })
    }

    pub fn set_note(&self, order_id: u64, item_name: &str, text: &str) -> ManagerResult<Order> {
        self.with_order(order_id, |order, _| {
            order.set_note(item_name, text)?;
            Ok(order.clone())
        })
    }

    // ========== Edit sessions ==========

    /// Snapshot an order before editing it
    pub fn begin_edit(&self, order_id: u64) -> ManagerResult<EditSession> {
        let order = self.order(order_id)?;
        tracing::debug!(order_id, table = self.table_number, "Edit session started");
        Ok(EditSession {
            snapshot: order.snapshot(),
            scheduled_at: order.scheduled_at(),
        })
    }

    /// Commit the staged schedule
    ///
    /// A schedule in the past (or too far ahead) is rejected and nothing is
    /// committed; the session stays usable so the operator can fix it.
    pub fn finish_edit(&self, session: &EditSession) -> ManagerResult<Order> {
        let scheduled_at = session.scheduled_at;
        self.with_order(session.order_id(), |order, now| {
            shared::order::validate_schedule(scheduled_at, now)?;
            order.set_scheduled_at(scheduled_at);
            tracing::debug!(
                order_id = order.order_id(),
                scheduled_at = %scheduled_at,
                "Edit session committed"
            );
            Ok(order.clone())
        })
    }

    /// Restore the lines and status captured by [`Self::begin_edit`]
    pub fn cancel_edit(&self, session: EditSession) -> ManagerResult<Order> {
        self.with_order(session.order_id(), |order, _| {
            order.rollback(&session.snapshot)?;
            tracing::debug!(order_id = order.order_id(), "Edit session rolled back");
            Ok(order.clone())
        })
    }

    // ========== Internals ==========

    fn not_found(&self, order_id: u64) -> ManagerError {
        tracing::warn!(order_id, table = self.table_number, "Order not found");
        ManagerError::OrderNotFound(order_id)
    }

    /// Run `f` against one of this table's orders and persist on success
    fn with_order<R, F>(&self, order_id: u64, f: F) -> ManagerResult<R>
    where
        F: FnOnce(&mut Order, NaiveDateTime) -> OrderResult<R>,
    {
        let table = self.table_number;
        self.desk.mutate(|book, now| {
            let order = book
                .table_mut(table)
                .iter_mut()
                .find(|o| o.order_id() == order_id)
                .ok_or_else(|| self.not_found(order_id))?;

            f(order, now).map_err(|e| {
                if e.is_validation() {
                    tracing::debug!(order_id, table, error = %e, "Rejected operator input");
                } else {
                    tracing::warn!(order_id, table, error = %e, "Order operation failed");
                }
                ManagerError::from(e)
            })
        })
    }
}

#[cfg(test)]
mod tests;
