//! Decimal arithmetic for line and order totals
//!
//! Prices are `Decimal` end to end; totals are never accumulated in floating
//! point. Every operation is checked: `None` means the amount does not fit
//! in a `Decimal`.

use super::types::OrderLine;
use rust_decimal::Decimal;

/// Tolerance for comparing externally supplied totals (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// price × quantity
pub fn line_total(price: Decimal, quantity: u32) -> Option<Decimal> {
    price.checked_mul(Decimal::from(quantity))
}

/// Sum of line totals
pub fn sum_lines<'a>(lines: impl IntoIterator<Item = &'a OrderLine>) -> Option<Decimal> {
    lines.into_iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line_total(line.item().price, line.quantity())?)
    })
}

/// Equal within [`MONEY_TOLERANCE`]
pub fn money_eq(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|diff| diff.abs() < MONEY_TOLERANCE)
}
