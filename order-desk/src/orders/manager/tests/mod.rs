use super::*;
use crate::orders::storage::JsonStore;
use chrono::Duration;
use rust_decimal::Decimal;
use shared::models::MenuCategory;
use shared::util::FixedClock;
use std::path::Path;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Desk over `dir` with the clock frozen at `at`
fn open_desk_at(dir: &Path, at: NaiveDateTime) -> Arc<OrderDesk> {
    let loaded = OrderDesk::with_clock(JsonStore::new(dir), Arc::new(FixedClock(at))).unwrap();
    assert!(loaded.is_clean(), "unexpected recovery: {:?}", loaded.recovered);
    loaded.value
}

fn create_test_desk() -> (tempfile::TempDir, Arc<OrderDesk>) {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk_at(dir.path(), now());
    (dir, desk)
}

// ========================================================================
// Menu fixtures
// ========================================================================

fn borscht() -> Arc<MenuItem> {
    Arc::new(
        MenuItem::new(MenuCategory::Dish, "Борщ", Decimal::from(50))
            .with_weight(350.0)
            .with_allergens(["селера"]),
    )
}

fn juice() -> Arc<MenuItem> {
    Arc::new(MenuItem::new(MenuCategory::Drink, "Сік", Decimal::from(30)))
}

fn cheesecake() -> Arc<MenuItem> {
    Arc::new(MenuItem::new(MenuCategory::Dessert, "Сирники", Decimal::new(895, 1)))
}

fn line(item: Arc<MenuItem>, quantity: u32) -> OrderLine {
    OrderLine::new(item, quantity, "").unwrap()
}

/// Order with 2 × Борщ and 1 × Сік (130.00)
fn create_lunch_order(table: &TableOrders) -> Order {
    table
        .create_order(vec![line(borscht(), 2), line(juice(), 1)])
        .unwrap()
}

/// Reload the stored order book and return one table's orders
fn stored_orders(dir: &Path, table_number: u32) -> Vec<Order> {
    JsonStore::new(dir)
        .load_orders_at(now())
        .unwrap()
        .value
        .remove(&table_number)
        .unwrap_or_default()
}

mod test_flows;
