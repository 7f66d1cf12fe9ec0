//! # Command-Line Interface
//!
//! A thin wrapper over [`Store`](crate::storage::Store) for inspecting and
//! editing config files from a shell.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create an empty file with a header |
//! | `show` | List entries with type, value and comment |
//! | `get` / `set` | Read or change one value |
//! | `add` / `remove` | Manage entries |
//! | `check` | Print the error report, fail if there are errors |
//! | `demo` | Create or update the sample config |
//!
//! ## Output Formats
//!
//! All commands support `--format text|json`. The default comes from the
//! settings file (see [`Settings`](crate::storage::Settings)).
//!
//! ## Logging
//!
//! `--verbose` turns on debug logs on stderr; `RUST_LOG` overrides it.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod demo;
mod entry;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
