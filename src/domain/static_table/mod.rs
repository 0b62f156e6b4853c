//! Static redirect table loaded from the map file.
//!
//! - [`StaticTable`] - Immutable prefix → path → entry map
//! - [`StaticTableHandle`] - Atomically swappable reference to the active table
//! - [`parse_table`] / [`load_table_file`] - Map file loader

mod loader;
mod table;

pub use loader::{FILE_FIELDS_COUNT, LoadError, load_table_file, parse_table};
pub use table::{StaticTable, StaticTableHandle};
