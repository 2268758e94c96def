use anyhow::Context;
use order_desk::{JsonStore, MenuCatalog, OrderDesk, setup_environment};
use shared::models::MenuCategory;

fn main() -> anyhow::Result<()> {
    // 1. .env, configuration, logging
    let config = setup_environment();

    // 2. Table to show (first argument, default 1)
    let table_number: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("table number must be a whole number")?
        .unwrap_or(1);

    // 3. Load documents
    let store = JsonStore::from_config(&config);
    let catalog = MenuCatalog::load(&store).map_err(|e| MenuCatalog::unavailable(&e))?;
    if let Some(e) = &catalog.recovered {
        let err = MenuCatalog::unavailable(e);
        eprintln!("[{}] Меню пошкоджене, завантажено порожнє: {}", err.code.code(), err.message);
    }
    let desk = OrderDesk::open(store).context("failed to read orders")?;
    if let Some(e) = &desk.recovered {
        eprintln!("Замовлення пошкоджені, завантажено порожній список: {e}");
    }

    // 4. Menu board
    let catalog = catalog.value;
    for category in MenuCategory::ALL {
        let items = catalog.items_of(category);
        if items.is_empty() {
            continue;
        }
        println!("== {} ==", category.label());
        for item in items {
            println!("  {:<30} {:>8.2}", item.name, item.price);
        }
    }

    // 5. Table listing
    let listing = desk.value.table(table_number).listing();
    println!();
    println!("Столик {}: {} замовлень", listing.table_number, listing.orders.len());
    for order in &listing.orders {
        println!(
            "  #{:<5} {}  {:<22} {:>8.2}",
            order.order_id(),
            order.scheduled_at().format("%d.%m.%Y %H:%M"),
            order.status().display_name(),
            order.total_cost()
        );
        for line in order.lines() {
            println!("         {} × {}", line.quantity(), line.name());
        }
    }
    for order in &listing.unclosed {
        println!(
            "  ! Замовлення #{} від {} не закрите",
            order.order_id,
            order.scheduled_at.format("%d.%m.%Y %H:%M")
        );
    }

    Ok(())
}
