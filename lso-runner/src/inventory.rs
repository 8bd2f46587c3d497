//! Inventory staging
//!
//! Turns a requested inventory into the value passed to `ansible-playbook -i`.
//! Host lists and file references are passed inline. A structured inventory is
//! written to a temporary JSON file that lives as long as the staged value, so
//! the caller must hold on to it until the process has exited.

use lso_core::domain::inventory::Inventory;
use std::ffi::OsString;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Inventory ready to be handed to the automation tool
#[derive(Debug)]
pub enum StagedInventory {
    /// Passed to `-i` as is
    Inline(OsString),
    /// Written to a temporary file, removed on drop
    Temp(NamedTempFile),
}

impl StagedInventory {
    /// Stages `inventory`, writing a temporary file only when needed
    pub fn stage(inventory: &Inventory) -> Result<Self> {
        match inventory {
            Inventory::File(path) => Ok(Self::Inline(path.as_os_str().to_owned())),
            Inventory::Structured(groups) => {
                let mut file = tempfile::Builder::new()
                    .prefix("lso-inventory-")
                    .suffix(".json")
                    .tempfile()?;
                serde_json::to_writer(file.as_file_mut(), groups)?;
                file.as_file_mut().flush()?;

                debug!("Staged structured inventory at {}", file.path().display());
                Ok(Self::Temp(file))
            }
            literal => {
                // Trailing comma keeps a single host from being read as a file name
                let mut arg = String::new();
                for host in literal.hosts() {
                    arg.push_str(host);
                    arg.push(',');
                }
                Ok(Self::Inline(OsString::from(arg)))
            }
        }
    }

    /// Value passed to `-i`
    pub fn arg(&self) -> OsString {
        match self {
            Self::Inline(arg) => arg.clone(),
            Self::Temp(file) => file.path().as_os_str().to_owned(),
        }
    }
}
