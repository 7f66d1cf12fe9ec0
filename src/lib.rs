//! tagconf - typed, human-editable configuration files
//!
//! A tagconf file is a flat list of named values, each tagged with one of six
//! types (int, string, bool, float, point, rect) and optionally commented.
//! [`Store`] loads such a file, offers typed getters and setters, and writes
//! it back. Problems are collected in an error log instead of aborting.
//!
//! ```no_run
//! use tagconf::Store;
//!
//! let mut cfg = Store::new("./test.ini", "test config");
//! if cfg.is_empty() {
//!     cfg.add_int("test_int", "Test integer", 123, false);
//!     cfg.write();
//! }
//! assert_eq!(cfg.get_int("test_int"), 123);
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{ConfigValue, Entry, Point, Rect, TypeTag};
pub use storage::{ConfigError, Severity, Store, StoreOptions};
