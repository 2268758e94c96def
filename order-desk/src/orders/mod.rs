//! Orders Module
//!
//! - `storage`: JSON documents on disk (`menu.json`, `orders.json`)
//! - `book`: the in-memory order book and the shared desk context
//! - `manager`: per-table operations and edit sessions

pub mod book;
pub mod manager;
pub mod storage;

pub use book::{OrderBook, OrderDesk};
pub use manager::{
    EditSession, ManagerError, ManagerResult, TableListing, TableOrders, UnclosedPastOrder,
};
pub use storage::{
    JsonStore, Loaded, MENU_FILE, ORDERS_FILE, RepairReport, StorageError, StorageResult,
    TableOrderBook,
};
