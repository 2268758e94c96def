//! Order line types

use super::error::{OrderError, OrderResult};
use super::money::line_total;
use crate::models::MenuItem;
use crate::serde_helpers::null_as_default;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One catalog item on an order
///
/// The menu item is shared with the catalog (and with every other line that
/// points at it); cloning a line copies quantity and notes but not the item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub(crate) item: Arc<MenuItem>,
    /// Always >= 1 once a line is part of an order
    pub(crate) quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) notes: String,
}

impl OrderLine {
    pub fn new(item: Arc<MenuItem>, quantity: u32, notes: impl Into<String>) -> OrderResult<Self> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity(quantity.to_string()));
        }
        if line_total(item.price, quantity).is_none() {
            return Err(OrderError::AmountOverflow(item.name.clone()));
        }
        Ok(Self {
            item,
            quantity,
            notes: notes.into(),
        })
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Shared handle to the catalog entry
    pub fn item_handle(&self) -> &Arc<MenuItem> {
        &self.item
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// item.price × quantity
    ///
    /// Saturates at `Decimal::MAX`; lines accepted onto an order never do.
    pub fn total(&self) -> Decimal {
        line_total(self.item.price, self.quantity).unwrap_or(Decimal::MAX)
    }

    /// Replace the note verbatim
    pub fn set_note(&mut self, text: impl Into<String>) {
        self.notes = text.into();
    }

    /// Set a new quantity; anything below 1 is rejected and the line is kept
    pub fn set_quantity(&mut self, quantity: i64) -> OrderResult<()> {
        let quantity = validate_quantity(quantity)?;
        if line_total(self.item.price, quantity).is_none() {
            return Err(OrderError::AmountOverflow(self.item.name.clone()));
        }
        self.quantity = quantity;
        Ok(())
    }

    pub(crate) fn increment_by(&mut self, by: u32) -> OrderResult<()> {
        self.quantity = self
            .quantity
            .checked_add(by)
            .ok_or_else(|| OrderError::InvalidQuantity(format!("{} + {by}", self.quantity)))?;
        Ok(())
    }
}

/// Validate a requested quantity
pub fn validate_quantity(quantity: i64) -> OrderResult<u32> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity.to_string()));
    }
    u32::try_from(quantity).map_err(|_| OrderError::InvalidQuantity(quantity.to_string()))
}

/// Parse an operator-entered quantity (digits only, > 0)
pub fn parse_quantity(input: &str) -> OrderResult<u32> {
    let text = input.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrderError::InvalidQuantity(input.to_string()));
    }
    let value: i64 = text
        .parse()
        .map_err(|_| OrderError::InvalidQuantity(input.to_string()))?;
    validate_quantity(value).map_err(|_| OrderError::InvalidQuantity(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuCategory;

    fn soup() -> Arc<MenuItem> {
        Arc::new(MenuItem::new(MenuCategory::Dish, "Борщ", Decimal::new(1250, 1)))
    }

    #[test]
    fn test_new_line_rejects_zero() {
        assert_eq!(
            OrderLine::new(soup(), 0, "").unwrap_err(),
            OrderError::InvalidQuantity("0".to_string())
        );
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine::new(soup(), 3, "").unwrap();
        assert_eq!(line.total(), Decimal::new(3750, 1));
    }

    #[test]
    fn test_set_quantity_rejects_non_positive_and_keeps_value() {
        let mut line = OrderLine::new(soup(), 2, "").unwrap();
        assert!(line.set_quantity(0).is_err());
        assert!(line.set_quantity(-4).is_err());
        assert_eq!(line.quantity(), 2);

        line.set_quantity(7).unwrap();
        assert_eq!(line.quantity(), 7);
    }

    #[test]
    fn test_note_is_stored_verbatim() {
        let mut line = OrderLine::new(soup(), 1, "").unwrap();
        line.set_note("  без сметани\nі гаряче  ");
        assert_eq!(line.notes(), "  без сметани\nі гаряче  ");
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        let caviar = Arc::new(MenuItem::new(MenuCategory::Dish, "Ікра", Decimal::MAX));
        assert_eq!(
            OrderLine::new(caviar.clone(), 2, "").unwrap_err(),
            OrderError::AmountOverflow("Ікра".to_string())
        );

        let mut line = OrderLine::new(caviar, 1, "").unwrap();
        assert!(line.set_quantity(i64::from(u32::MAX)).is_err());
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.total(), Decimal::MAX);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        for bad in ["0", "-1", "abc", "", "1.5", "+2", "99999999999"] {
            assert!(parse_quantity(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_clone_shares_menu_item() {
        let line = OrderLine::new(soup(), 1, "x").unwrap();
        let copy = line.clone();
        assert!(Arc::ptr_eq(line.item_handle(), copy.item_handle()));
    }
}
