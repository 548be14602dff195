//! # tabstore - In-Memory Tabular Store
//!
//! tabstore loads delimiter-separated text into a header plus rows of text
//! values, lets you reshape and edit it in memory, and writes it back out as
//! delimited text or as a JSON-style array of objects.
//!
//! ## Quick Start
//!
//! ```
//! use tabstore::{StoreOptions, TabularStore};
//!
//! let mut store = TabularStore::from_source("id,name\n1,Alice\n", StoreOptions::default())?;
//! store.add_row(["2", "Bob"])?;
//! store.add_column("team", ["red", "blue"])?;
//! store.set_value_at(0, "team", "green")?;
//!
//! assert_eq!(store.render_delimited(), "id,name,team\n1,Alice,green\n2,Bob,blue\n");
//! # Ok::<(), tabstore::error::StoreError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`store`]: the [`TabularStore`] data model, row views and renderers
//! - [`config`]: [`StoreOptions`] and their JSON persistence
//! - [`io`]: reading sources from and writing output to files
//! - [`error`]: error types and handling utilities
//! - [`logging`]: logger setup for the binary
//!
//! ## Limits
//!
//! All values are plain text. Delimiters are plain separators: there is no
//! quoting or escaping, so values must not contain the delimiter or a
//! newline. Everything is held in memory and the store is not synchronized;
//! wrap it in a lock to share it between threads.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod store;

pub use config::StoreOptions;
pub use error::{Result, StoreError};
pub use store::{DelimitedLayout, Row, RowRef, TabularStore};
