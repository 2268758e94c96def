//! JSON document storage for the menu catalog and the order book
//!
//! # Documents
//!
//! | File | Shape | Purpose |
//! |------|-------|---------|
//! | `menu.json` | `[MenuItem]` (tagged by `$type`) | Menu catalog |
//! | `orders.json` | `{ "<table>": [Order] }` | Every table's orders |
//!
//! File names are fixed; only the directory comes from configuration.
//!
//! # Loading
//!
//! - A missing file is a first run: the empty default is returned.
//! - A file that does not parse is reported through [`Loaded::recovered`]
//!   and the empty default is returned in its place. A corrupt order book
//!   is first renamed to `orders.json.corrupt`.
//! - Any other I/O failure is an error.
//!
//! Loaded order books are repaired before they are handed out (see
//! [`repair_order_book`]).
//!
//! # Saving
//!
//! Saves rewrite the whole document: pretty-printed, non-ASCII text kept
//! unescaped, written to a sibling temp file and renamed into place.

use crate::core::Config;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::MenuItem;
use shared::order::Order;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog document name
pub const MENU_FILE: &str = "menu.json";

/// Order book document name
pub const ORDERS_FILE: &str = "orders.json";

/// Table number → that table's orders, newest first
pub type TableOrderBook = BTreeMap<u32, Vec<Order>>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A loaded document, plus the parse failure it was recovered from
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    /// Set when the file was corrupt and `value` is the empty default
    pub recovered: Option<StorageError>,
}

impl<T> Loaded<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            recovered: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.recovered.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            value: f(self.value),
            recovered: self.recovered,
        }
    }
}

/// What [`repair_order_book`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Orders whose unset schedule was set to the load time
    pub migrated_schedules: usize,
    /// Zero-quantity lines dropped
    pub dropped_lines: usize,
    /// Duplicate lines merged into an earlier line for the same item
    pub merged_lines: usize,
    /// Orders whose table number disagreed with their table key
    pub rehomed_orders: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Repair a freshly loaded order book in place
///
/// - unset schedules (written before scheduling existed) become `now`
/// - lines with quantity 0 are dropped; lines for the same item are merged
/// - an order's table number is forced to match its table key
///
/// Totals are already recomputed by deserialization.
pub fn repair_order_book(book: &mut TableOrderBook, now: chrono::NaiveDateTime) -> RepairReport {
    let mut report = RepairReport::default();

    for (&table, orders) in book.iter_mut() {
        for order in orders.iter_mut() {
            if order.migrate_unset_schedule(now) {
                report.migrated_schedules += 1;
                tracing::info!(
                    order_id = order.order_id(),
                    table,
                    scheduled_at = %now,
                    "Assigned load time to order without schedule"
                );
            }

            let lines = order.normalize_lines();
            if !lines.is_clean() {
                report.dropped_lines += lines.dropped_empty;
                report.merged_lines += lines.merged_duplicates;
                tracing::info!(
                    order_id = order.order_id(),
                    table,
                    dropped = lines.dropped_empty,
                    merged = lines.merged_duplicates,
                    "Repaired order lines"
                );
            }

            if order.table_number() != table {
                tracing::info!(
                    order_id = order.order_id(),
                    stored_table = order.table_number(),
                    table,
                    "Order filed under another table, re-homed"
                );
                order.set_table_number(table);
                report.rehomed_orders += 1;
            }
        }
    }

    report
}

/// JSON file store for the two documents
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Store rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.work_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn menu_path(&self) -> PathBuf {
        self.dir.join(MENU_FILE)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.dir.join(ORDERS_FILE)
    }

    // ========== Document primitives ==========

    /// Read and parse a document; `Ok(None)` when the file does not exist
    fn read_document<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Like [`Self::read_document`], but a corrupt file yields the default
    fn load_document<T: DeserializeOwned + Default>(path: &Path) -> StorageResult<Loaded<T>> {
        match Self::read_document(path) {
            Ok(value) => Ok(Loaded::clean(value.unwrap_or_default())),
            Err(e) if e.is_parse() => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt document, starting empty");
                Ok(Loaded {
                    value: T::default(),
                    recovered: Some(e),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite a document (temp file + rename)
    fn write_document<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(value)?;

        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;

        tracing::debug!(path = %path.display(), "Document saved");
        Ok(())
    }

    // ========== Menu ==========

    /// Read the catalog; a corrupt file is an error
    pub fn read_menu(&self) -> StorageResult<Vec<MenuItem>> {
        Ok(Self::read_document(&self.menu_path())?.unwrap_or_default())
    }

    /// Load the catalog, recovering from a corrupt file
    pub fn load_menu(&self) -> StorageResult<Loaded<Vec<MenuItem>>> {
        Self::load_document(&self.menu_path())
    }

    pub fn save_menu(&self, items: &[MenuItem]) -> StorageResult<()> {
        self.write_document(&self.menu_path(), items)
    }

    // ========== Orders ==========

    /// Where a corrupt order book is moved before the desk starts empty
    pub fn corrupt_backup_path(&self) -> PathBuf {
        self.orders_path().with_extension("json.corrupt")
    }

    /// Load and repair the order book as of `now`
    ///
    /// A corrupt `orders.json` is renamed to [`Self::corrupt_backup_path`]
    /// so the next save cannot overwrite it.
    pub fn load_orders_at(&self, now: chrono::NaiveDateTime) -> StorageResult<Loaded<TableOrderBook>> {
        let path = self.orders_path();
        let mut loaded: Loaded<TableOrderBook> = Self::load_document(&path)?;
        if !loaded.is_clean() {
            let backup = self.corrupt_backup_path();
            std::fs::rename(&path, &backup).map_err(|e| StorageError::io(&backup, e))?;
            tracing::warn!(backup = %backup.display(), "Corrupt order book moved aside");
        }
        let report = repair_order_book(&mut loaded.value, now);
        if !report.is_clean() {
            tracing::info!(?report, "Order book repaired on load");
        }
        Ok(loaded)
    }

    /// Load and repair the order book as of the local wall clock
    pub fn load_orders(&self) -> StorageResult<Loaded<TableOrderBook>> {
        self.load_orders_at(shared::util::now_local())
    }

    pub fn save_orders(&self, book: &TableOrderBook) -> StorageResult<()> {
        self.write_document(&self.orders_path(), book)
    }
}
