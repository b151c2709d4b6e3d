//! Locked append protocol for the registry directory.
//!
//! New entries for an existing context land in a copy of the backing file
//! that is renamed over the original once fully written, so a reader or a
//! crash mid-write never observes a partially appended context.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::error;
use uuid::Uuid;

use super::context::{self, Context};
use super::error::StoreError;
use super::lock::LockFile;
use super::settings::Settings;

/// Appends the fields of one new entry to a context under the directory
/// lock.
///
/// Fails with [`StoreError::LockContended`] when another writer holds the
/// directory and with [`StoreError::DuplicateEntry`] when `entry_name` is
/// already bound in the context. A context without a backing file is created
/// on the fly. The lock is released on every exit path.
///
/// Unlike the resolver, which downgrades a malformed context name to a miss
/// for probing, the writer rejects one with
/// [`StoreError::InvalidContextName`]: an empty or separator-carrying name
/// would dodge the duplicate check and place the backing file outside the
/// root.
pub(crate) fn add_entry(
    settings: &Settings,
    context_name: &str,
    entry_name: &str,
    fields: &BTreeMap<String, String>,
) -> Result<(), StoreError> {
    if !context::is_valid_name(context_name) {
        error!("'{context_name}' is not a valid context name");
        return Err(StoreError::InvalidContextName(context_name.to_string()));
    }

    let root = settings.root();
    let target = settings.context_path(context_name);

    let _lock = LockFile::acquire(root)?;

    match Context::load(settings, context_name)? {
        Some(context) => {
            // Check whether the name being added already exists.
            if context.contains(entry_name) {
                error!("entry '{entry_name}' already exists for context '{context_name}'");
                return Err(StoreError::DuplicateEntry {
                    context: context_name.to_string(),
                    entry: entry_name.to_string(),
                });
            }

            let backup = root.join(format!("{}_{}.properties", context_name, Uuid::new_v4()));
            fs::copy(&target, &backup).map_err(|e| StoreError::Io {
                path: backup.clone(),
                source: e,
            })?;
            // Append the new block to the copy, then rename the copy over
            // the original.
            append_block(&backup, entry_name, settings.delimiter(), fields)?;
            fs::rename(&backup, &target).map_err(|e| StoreError::Io {
                path: target.clone(),
                source: e,
            })?;
        }
        // No prior state to protect, write the new context file directly.
        None => append_block(&target, entry_name, settings.delimiter(), fields)?,
    }

    Ok(())
}

/// Appends a blank separator line followed by one
/// `entryName<delimiter>fieldName=value` line per field.
fn append_block(
    path: &Path,
    entry_name: &str,
    delimiter: &str,
    fields: &BTreeMap<String, String>,
) -> Result<(), StoreError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut block = String::from("\n");
    for (field, value) in fields {
        block.push_str(&format!("{entry_name}{delimiter}{field}={value}\n"));
    }
    file.write_all(block.as_bytes()).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
