//! Order book and the desk context that owns it
//!
//! [`OrderDesk`] is the single process-wide context: one store, one clock,
//! one lock around the [`OrderBook`]. Every mutation runs under the lock on a
//! draft of the book, rewrites `orders.json` from the draft and only then
//! replaces the live book. Two views of the same table can never interleave
//! a change with a save.

use super::manager::{ManagerResult, TableOrders};
use super::storage::{JsonStore, Loaded, StorageResult, TableOrderBook};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use shared::order::Order;
use shared::util::{Clock, SystemClock};
use std::sync::Arc;

/// All tables' orders plus the id counter
#[derive(Debug, Clone)]
pub struct OrderBook {
    tables: TableOrderBook,
    next_order_id: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new(TableOrderBook::new())
    }
}

impl OrderBook {
    /// Wrap loaded tables; ids continue after the highest one present
    pub fn new(tables: TableOrderBook) -> Self {
        let next_order_id = tables
            .values()
            .flatten()
            .map(Order::order_id)
            .max()
            .map_or(1, |max| max + 1);
        Self {
            tables,
            next_order_id,
        }
    }

    pub fn tables(&self) -> &TableOrderBook {
        &self.tables
    }

    pub fn next_order_id(&self) -> u64 {
        self.next_order_id
    }

    /// Orders of one table, newest first (empty if the table has none)
    pub fn table(&self, table_number: u32) -> &[Order] {
        self.tables
            .get(&table_number)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Orders of one table, registering the table if it is new
    pub fn table_mut(&mut self, table_number: u32) -> &mut Vec<Order> {
        self.tables.entry(table_number).or_default()
    }

    pub fn order_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Fresh empty order for `table_number`, not yet filed
    pub fn new_order(&mut self, table_number: u32, now: NaiveDateTime) -> Order {
        let order_id = self.next_order_id;
        self.next_order_id += 1;
        Order::new(order_id, table_number, now)
    }
}

/// Shared context for every table view
pub struct OrderDesk {
    store: JsonStore,
    book: Mutex<OrderBook>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for OrderDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDesk")
            .field("store", &self.store)
            .field("orders", &self.book.try_lock().map(|b| b.order_count()))
            .finish()
    }
}

impl OrderDesk {
    /// Load the order book from `store` using the system clock
    pub fn open(store: JsonStore) -> StorageResult<Loaded<Arc<Self>>> {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Load the order book from `store`, reading time from `clock`
    pub fn with_clock(store: JsonStore, clock: Arc<dyn Clock>) -> StorageResult<Loaded<Arc<Self>>> {
        let loaded = store.load_orders_at(clock.now())?;
        let book = OrderBook::new(loaded.value);

        tracing::info!(
            tables = book.tables().len(),
            orders = book.order_count(),
            next_order_id = book.next_order_id(),
            "Order book loaded"
        );

        Ok(Loaded {
            value: Arc::new(Self {
                store,
                book: Mutex::new(book),
                clock,
            }),
            recovered: loaded.recovered,
        })
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Open the view for one table
    pub fn table(self: &Arc<Self>, table_number: u32) -> TableOrders {
        TableOrders::open(Arc::clone(self), table_number)
    }

    /// Copy of the whole book as of now
    pub fn tables(&self) -> TableOrderBook {
        self.book.lock().tables().clone()
    }

    /// Give `table_number` an entry; written out with the next save
    pub(crate) fn register_table(&self, table_number: u32) {
        self.book.lock().table_mut(table_number);
    }

    /// Read under the lock
    pub(crate) fn read<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&self.book.lock())
    }

    /// Apply `f` to a draft of the book and commit it once it is saved
    ///
    /// The live book only changes when both `f` and the save succeed, so
    /// memory never runs ahead of `orders.json`.
    pub(crate) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut OrderBook, NaiveDateTime) -> ManagerResult<R>,
    ) -> ManagerResult<R> {
        let now = self.clock.now();
        let mut book = self.book.lock();
        let mut draft = book.clone();
        let result = f(&mut draft, now)?;
        if let Err(e) = self.store.save_orders(draft.tables()) {
            tracing::error!(error = %e, "Failed to persist order book, change discarded");
            return Err(e.into());
        }
        *book = draft;
        Ok(result)
    }

    /// Write the current book to disk
    pub fn save(&self) -> StorageResult<()> {
        let book = self.book.lock();
        self.store.save_orders(book.tables())
    }
}
