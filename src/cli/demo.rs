//! Sample config command
//!
//! First run creates a file with a few typed values; later runs flip
//! `test_bool`, print two values and write the file back.

use std::path::Path;

use anyhow::{bail, Result};

use super::output::Output;
use crate::storage::{Store, StoreOptions};

pub fn run(output: &Output, options: &StoreOptions, path: &Path) -> Result<()> {
    let mut cfg = Store::with_options(path, "test config", options.clone());

    if cfg.is_empty() {
        cfg.add_int("test_int", "Test integer 1", 123, false);
        cfg.add_int("test_int2", "Test integer 2", -1234, false);
        cfg.add_int("test_int3", "Test integer 3", 1337, false);

        cfg.add_float("test_float", "Test float", 0.483, false);
        cfg.add_string("test_string", "Test string", "Hello World!", false);
        cfg.add_bool("test_bool", "Test bool", false, false);

        cfg.write();
        if !cfg.has_fatal_errors() {
            output.success(&format!("Created sample config at {}", path.display()));
        }
    } else {
        cfg.set_bool("test_bool", true);
        let text = cfg.get_string("test_string");
        let number = cfg.get_float("test_float");

        if output.is_json() {
            output.data(&serde_json::json!({
                "test_string": text,
                "test_float": number,
            }));
        } else {
            println!("Test string: {}", text);
            println!("Test float: {}", number);
        }
        cfg.write();
    }

    if cfg.has_fatal_errors() {
        bail!("{}", cfg.error_message());
    }
    if cfg.has_errors() {
        output.warn(&cfg.error_message());
    }
    Ok(())
}
