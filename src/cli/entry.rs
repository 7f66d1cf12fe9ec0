//! Entry CLI commands

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::{Entry, TypeTag};
use crate::storage::{Diagnostic, Store, StoreOptions, NO_ERRORS};

pub const DEFAULT_HEADER: &str = "tagconf config";

/// Arguments of `tagconf add`
pub struct NewEntry<'a> {
    pub kind: TypeTag,
    pub id: &'a str,
    pub value: &'a str,
    pub comment: &'a str,
    pub replace: bool,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    header: &'a str,
    entries: Vec<&'a Entry>,
    errors: Vec<&'a Diagnostic>,
    fatal: bool,
}

impl<'a> FileReport<'a> {
    fn new(store: &'a Store) -> Self {
        Self {
            path: store.path().display().to_string(),
            header: store.header(),
            entries: store.entries().collect(),
            errors: store.diagnostics().iter().collect(),
            fatal: store.has_fatal_errors(),
        }
    }
}

fn open(options: &StoreOptions, path: &Path) -> Store {
    Store::with_options(path, DEFAULT_HEADER, options.clone())
}

/// Opens a store whose file must already exist
fn open_existing(options: &StoreOptions, path: &Path) -> Result<Store> {
    let store = open(options, path);
    if !store.can_load() {
        bail!("Config file not found or not readable: {}", path.display());
    }
    Ok(store)
}

/// Writes the store, turning a fatal write error into a command failure
fn persist(store: &mut Store) -> Result<()> {
    store.write();
    if store.has_fatal_errors() {
        bail!("{}", store.error_message());
    }
    Ok(())
}

fn report_load_errors(output: &Output, store: &Store) {
    if store.has_errors() {
        output.warn(&store.error_message());
    }
}

pub fn init(output: &Output, options: &StoreOptions, path: &Path, header: &str) -> Result<()> {
    let mut store = open(options, path);
    if store.can_load() {
        output.success(&format!("Config already exists at {}", path.display()));
        return Ok(());
    }

    store.set_header(header);
    persist(&mut store)?;
    output.success(&format!("Initialized config at {}", path.display()));
    Ok(())
}

pub fn show(output: &Output, options: &StoreOptions, path: &Path) -> Result<()> {
    let store = open_existing(options, path)?;

    if output.is_json() {
        output.data(&FileReport::new(&store));
        return Ok(());
    }

    println!("# {}", store.header());
    for entry in store.entries() {
        let value = entry.value().replace('\n', "\\n");
        if entry.comment().is_empty() {
            output.row(&[entry.id(), entry.tag().as_str(), value.as_str()]);
        } else {
            let comment = format!("# {}", entry.comment());
            output.row(&[entry.id(), entry.tag().as_str(), value.as_str(), comment.as_str()]);
        }
    }
    report_load_errors(output, &store);
    Ok(())
}

pub fn get(output: &Output, options: &StoreOptions, path: &Path, id: &str) -> Result<()> {
    let store = open_existing(options, path)?;
    let Some(entry) = store.entry(id) else {
        bail!("Value with id '{}' does not exist", id);
    };

    if output.is_json() {
        output.data(entry);
    } else {
        println!("{}", entry.value());
    }
    Ok(())
}

pub fn set(output: &Output, options: &StoreOptions, path: &Path, id: &str, value: &str) -> Result<()> {
    let mut store = open_existing(options, path)?;
    report_load_errors(output, &store);

    if !store.set_text(id, value) {
        bail!("{}", store.error_message());
    }
    persist(&mut store)?;

    output.success(&format!("Set {} = {}", id, value));
    Ok(())
}

pub fn add(output: &Output, options: &StoreOptions, path: &Path, new: NewEntry<'_>) -> Result<()> {
    let entry = match Entry::parse(new.id, new.comment, new.kind, new.value) {
        Ok(entry) => entry,
        Err(failures) => {
            let reasons: Vec<String> = failures.iter().map(ToString::to_string).collect();
            bail!("Invalid {} value '{}': {}", new.kind, new.value, reasons.join("; "));
        }
    };

    let mut store = open(options, path);
    report_load_errors(output, &store);

    if !store.add(entry, new.replace) {
        bail!("{}", store.error_message());
    }
    persist(&mut store)?;

    output.success(&format!("Added {} ({})", new.id, new.kind));
    Ok(())
}

pub fn remove(output: &Output, options: &StoreOptions, path: &Path, id: &str) -> Result<()> {
    let mut store = open_existing(options, path)?;
    if store.remove(id).is_none() {
        bail!("Value with id '{}' does not exist", id);
    }
    persist(&mut store)?;

    output.success(&format!("Removed {}", id));
    Ok(())
}

pub fn check(output: &Output, options: &StoreOptions, path: &Path) -> Result<()> {
    let store = open_existing(options, path)?;

    if output.is_json() {
        output.data(&FileReport::new(&store));
    } else if store.has_errors() {
        println!("{}", store.error_message());
    } else {
        println!("{}", NO_ERRORS);
    }

    if store.has_errors() {
        bail!("{} problem(s) found in {}", store.diagnostics().len(), path.display());
    }
    Ok(())
}
