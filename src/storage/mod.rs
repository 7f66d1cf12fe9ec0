//! # Storage Layer
//!
//! Reading, querying and writing tagconf files.
//!
//! ## File Format
//!
//! ```text
//! # test config
//! # Test integer 1
//! 1_test_int=123
//! # Test string
//! 2_test_string=Hello World!
//! 5_window_pos=100,200
//! ```
//!
//! | Part | Meaning |
//! |------|---------|
//! | First line | Header comment (`# ` + text) |
//! | `# ...` | Comment for the next entry (only the last one counts) |
//! | `<digit>_<id>=<value>` | Entry; see [`TypeTag`](crate::domain::TypeTag) for digits |
//!
//! ## Error Handling
//!
//! Nothing here panics or returns `Err` for bad data. Every problem is
//! recorded in the [`Store`]'s [`Diagnostics`] as Normal or Fatal, and
//! the host checks [`Store::has_errors`] / [`Store::has_fatal_errors`].
//!
//! ## Key Types
//!
//! - [`Store`] - Entries for one file plus its error log
//! - [`FileProvider`] - Filesystem seam ([`OsFs`], [`MemoryFs`])
//! - [`StoreOptions`] - Comment output, error cap, hex and component policies
//! - [`Settings`] - The `tagconf` tool's own settings file

mod config;
mod diagnostics;
mod error;
pub mod format;
mod fs;
mod options;
mod store;

pub use config::{OutputFormat, Settings, SettingsError};
pub use diagnostics::{Diagnostic, Diagnostics, NO_ERRORS};
pub use error::{ConfigError, Severity};
pub use fs::{FileProvider, MemoryFs, OsFs};
pub use options::{ComponentErrors, HexPrefix, StoreOptions};
pub use store::Store;
