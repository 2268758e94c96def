//! Order aggregate and rollback snapshots
//!
//! `total_cost` is derived state: it is recomputed after every line mutation
//! and again whenever an order is deserialized. The stored value in a
//! document is never trusted.

use super::error::{OrderError, OrderResult};
use super::money::{line_total, money_eq, sum_lines};
use super::schedule::{self, OrderType};
use super::types::OrderLine;
use crate::models::MenuItem;
use crate::serde_helpers::{null_as_default, wall_clock};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Order status
///
/// Values follow the natural progression of an order but transitions are
/// not linear; see [`OrderType::allowed_statuses`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    AwaitingConfirmation,
    Confirmed,
    NotConfirmed,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::AwaitingConfirmation,
        Self::Confirmed,
        Self::NotConfirmed,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
    ];

    /// Operator-facing name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AwaitingConfirmation => "Очікує підтвердження",
            Self::Confirmed => "Підтверджено",
            Self::NotConfirmed => "Не підтверджено",
            Self::Preparing => "Готується",
            Self::Ready => "Готове",
            Self::Completed => "Закрито",
        }
    }

    /// Terminal from the operator's point of view
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::NotConfirmed | Self::Completed)
    }
}

/// Outcome of [`Order::decrement_quantity`]
#[derive(Debug, Clone, PartialEq)]
pub enum Decrement {
    /// Quantity dropped by one; carries the new quantity
    Decremented(u32),
    /// Quantity was 1 and the caller confirmed removal
    Removed(OrderLine),
    /// Quantity was 1 and the caller declined removal
    Kept,
}

/// Counters from [`Order::normalize_lines`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineRepair {
    pub dropped_empty: usize,
    pub merged_duplicates: usize,
}

impl LineRepair {
    pub fn is_clean(&self) -> bool {
        self.dropped_empty == 0 && self.merged_duplicates == 0
    }
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "OrderRecord")]
pub struct Order {
    order_id: u64,
    table_number: u32,
    status: OrderStatus,
    order_date_time: NaiveDateTime,
    items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    total_cost: Decimal,
}

impl Order {
    /// Create an empty order scheduled for `now`
    pub fn new(order_id: u64, table_number: u32, now: NaiveDateTime) -> Self {
        Self {
            order_id,
            table_number,
            status: OrderStatus::AwaitingConfirmation,
            order_date_time: now,
            items: Vec::new(),
            total_cost: Decimal::ZERO,
        }
    }

    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.order_date_time
    }

    /// Lines in insertion (display/print) order
    pub fn lines(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn line(&self, item_name: &str) -> Option<&OrderLine> {
        self.items.iter().find(|l| l.name() == item_name)
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    /// Number of portions across all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity())).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply `edit` to a copy of the lines and commit it with its new total
    ///
    /// Nothing changes when `edit` fails or the new total does not fit in a
    /// `Decimal`.
    fn edit_lines<R>(
        &mut self,
        item_name: &str,
        edit: impl FnOnce(&mut Vec<OrderLine>) -> OrderResult<R>,
    ) -> OrderResult<R> {
        let mut lines = self.items.clone();
        let result = edit(&mut lines)?;
        self.total_cost =
            sum_lines(&lines).ok_or_else(|| OrderError::AmountOverflow(item_name.to_string()))?;
        self.items = lines;
        Ok(result)
    }

    fn position(&self, item_name: &str) -> OrderResult<usize> {
        position_in(&self.items, item_name)
    }

    // ========== Lines ==========

    /// Add `quantity` of `item`
    ///
    /// There is at most one line per item name: adding an item that is
    /// already on the order bumps that line's quantity and leaves its note.
    pub fn add_line(
        &mut self,
        item: Arc<MenuItem>,
        quantity: u32,
        note: &str,
    ) -> OrderResult<&OrderLine> {
        let name = item.name.clone();
        let idx = self.edit_lines(&name, |lines| match position_in(lines, &name) {
            Ok(idx) => {
                if quantity == 0 {
                    return Err(OrderError::InvalidQuantity(quantity.to_string()));
                }
                lines[idx].increment_by(quantity)?;
                Ok(idx)
            }
            Err(_) => {
                lines.push(OrderLine::new(item, quantity, note)?);
                Ok(lines.len() - 1)
            }
        })?;
        Ok(&self.items[idx])
    }

    /// Append a prepared line, merging into an existing line for the same item
    pub fn push_line(&mut self, line: OrderLine) -> OrderResult<&OrderLine> {
        let OrderLine {
            item,
            quantity,
            notes,
        } = line;
        self.add_line(item, quantity, &notes)
    }

    /// Replace a line's quantity; invalid input leaves the line unchanged
    pub fn set_quantity(&mut self, item_name: &str, quantity: i64) -> OrderResult<&OrderLine> {
        let idx = self.edit_lines(item_name, |lines| {
            let idx = position_in(lines, item_name)?;
            lines[idx].set_quantity(quantity)?;
            Ok(idx)
        })?;
        Ok(&self.items[idx])
    }

    pub fn increment_quantity(&mut self, item_name: &str) -> OrderResult<&OrderLine> {
        let idx = self.edit_lines(item_name, |lines| {
            let idx = position_in(lines, item_name)?;
            lines[idx].increment_by(1)?;
            Ok(idx)
        })?;
        Ok(&self.items[idx])
    }

    /// Take one portion off a line
    ///
    /// At quantity 1 the line is only removed if `confirm_remove` agrees;
    /// otherwise it stays at 1.
    pub fn decrement_quantity<F>(&mut self, item_name: &str, confirm_remove: F) -> OrderResult<Decrement>
    where
        F: FnOnce(&OrderLine) -> bool,
    {
        self.edit_lines(item_name, |lines| {
            let idx = position_in(lines, item_name)?;
            let line = &mut lines[idx];

            Ok(if line.quantity > 1 {
                line.quantity -= 1;
                Decrement::Decremented(line.quantity)
            } else if confirm_remove(line) {
                Decrement::Removed(lines.remove(idx))
            } else {
                Decrement::Kept
            })
        })
    }

    /// Delete a line (confirmation is the caller's job)
    pub fn remove_line(&mut self, item_name: &str) -> OrderResult<OrderLine> {
        self.edit_lines(item_name, |lines| {
            let idx = position_in(lines, item_name)?;
            Ok(lines.remove(idx))
        })
    }

    pub fn set_note(&mut self, item_name: &str, text: impl Into<String>) -> OrderResult<&OrderLine> {
        let idx = self.position(item_name)?;
        self.items[idx].set_note(text);
        Ok(&self.items[idx])
    }

    // ========== Status & Schedule ==========

    /// Temporal category at `now`
    pub fn order_type(&self, now: NaiveDateTime) -> OrderType {
        OrderType::classify(self.order_date_time, now)
    }

    /// Move to `target` if the order's current type allows it
    ///
    /// Returns the previous status.
    pub fn change_status(&mut self, target: OrderStatus, now: NaiveDateTime) -> OrderResult<OrderStatus> {
        self.order_type(now).check_transition(target)?;
        let previous = std::mem::replace(&mut self.status, target);
        Ok(previous)
    }

    /// Past but neither NotConfirmed nor Completed
    pub fn is_unclosed_past(&self, now: NaiveDateTime) -> bool {
        self.order_type(now) == OrderType::Past && !self.status.is_closed()
    }

    pub fn set_scheduled_at(&mut self, when: NaiveDateTime) {
        self.order_date_time = when;
    }

    /// Change the date, keeping the time of day
    pub fn set_schedule_date(&mut self, date: NaiveDate) {
        self.order_date_time = date.and_time(self.order_date_time.time());
    }

    /// Change the time of day, keeping the date
    pub fn set_schedule_time(&mut self, time: NaiveTime) {
        self.order_date_time = self.order_date_time.date().and_time(time);
    }

    /// Parse `HH:mm` and apply it as the time of day
    pub fn set_schedule_time_str(&mut self, input: &str) -> OrderResult<NaiveDateTime> {
        let time = schedule::parse_time_of_day(input)?;
        self.set_schedule_time(time);
        Ok(self.order_date_time)
    }

    pub fn validate_schedule(&self, now: NaiveDateTime) -> OrderResult<()> {
        schedule::validate_schedule(self.order_date_time, now)
    }

    pub fn is_valid_schedule(&self, now: NaiveDateTime) -> bool {
        self.validate_schedule(now).is_ok()
    }

    // ========== Snapshot ==========

    /// Copy lines and status for a later [`Order::rollback`]
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            order_id: self.order_id,
            status: self.status,
            lines: self.items.clone(),
        }
    }

    /// Restore lines and status from `snapshot`
    ///
    /// Lines are copied again so the snapshot stays reusable; menu items are
    /// still shared with the catalog.
    pub fn rollback(&mut self, snapshot: &OrderSnapshot) -> OrderResult<()> {
        if snapshot.order_id != self.order_id {
            return Err(OrderError::SnapshotMismatch {
                expected: self.order_id,
                found: snapshot.order_id,
            });
        }
        let label = format!("order {}", self.order_id);
        self.edit_lines(&label, |lines| {
            *lines = snapshot.lines.clone();
            Ok(())
        })?;
        self.status = snapshot.status;
        Ok(())
    }

    // ========== Load repair ==========

    /// Scheduled time was never set (written before scheduling existed)
    pub fn has_unset_schedule(&self) -> bool {
        self.order_date_time.year() <= 1
    }

    /// Assign `now` to an unset schedule; returns whether anything changed
    pub fn migrate_unset_schedule(&mut self, now: NaiveDateTime) -> bool {
        if self.has_unset_schedule() {
            self.order_date_time = now;
            true
        } else {
            false
        }
    }

    /// Drop zero-quantity lines and merge lines that share an item name
    pub fn normalize_lines(&mut self) -> LineRepair {
        let mut repair = LineRepair::default();
        let mut kept: Vec<OrderLine> = Vec::with_capacity(self.items.len());

        for line in self.items.drain(..) {
            if line.quantity == 0 {
                repair.dropped_empty += 1;
                continue;
            }
            let merged = kept.iter_mut().find(|l| l.name() == line.name()).and_then(|existing| {
                let quantity = existing.quantity.checked_add(line.quantity)?;
                line_total(existing.item.price, quantity)?;
                existing.quantity = quantity;
                Some(())
            });
            match merged {
                Some(()) => repair.merged_duplicates += 1,
                None => kept.push(line),
            }
        }

        // same amounts regrouped, so the sum still fits
        if let Some(total) = sum_lines(&kept) {
            self.total_cost = total;
        }
        self.items = kept;
        repair
    }

    /// Re-home the order to `table_number`
    pub fn set_table_number(&mut self, table_number: u32) {
        self.table_number = table_number;
    }
}

/// Rollback point for an edit session
///
/// Holds independent copies of the lines; the menu items they reference
/// remain shared.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    order_id: u64,
    status: OrderStatus,
    lines: Vec<OrderLine>,
}

impl OrderSnapshot {
    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

fn position_in(lines: &[OrderLine], item_name: &str) -> OrderResult<usize> {
    lines
        .iter()
        .position(|l| l.name() == item_name)
        .ok_or_else(|| OrderError::LineNotFound(item_name.to_string()))
}

/// Wire shape of an order as read from a document
///
/// `totalCost` is read only to report drift; the order's total is always
/// recomputed from its lines.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    order_id: u64,
    table_number: u32,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default = "unset_schedule", deserialize_with = "wall_clock")]
    order_date_time: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<OrderLine>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    total_cost: Option<Decimal>,
}

fn unset_schedule() -> NaiveDateTime {
    NaiveDateTime::MIN
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrderError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let total_cost = sum_lines(&record.items)
            .ok_or_else(|| OrderError::AmountOverflow(format!("order {}", record.order_id)))?;
        let order = Order {
            order_id: record.order_id,
            table_number: record.table_number,
            status: record.status,
            order_date_time: record.order_date_time,
            items: record.items,
            total_cost,
        };

        if let Some(stored) = record.total_cost
            && !money_eq(stored, order.total_cost)
        {
            tracing::warn!(
                order_id = order.order_id,
                stored = %stored,
                recomputed = %order.total_cost,
                "Stored total disagrees with lines, using recomputed total"
            );
        }
        Ok(order)
    }
}
