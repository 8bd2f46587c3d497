//! Command construction
//!
//! Builds the exact program and argument vector for a run. Nothing here
//! touches the filesystem or spawns anything, which keeps the mapping from a
//! request to a command line easy to test.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::inventory::StagedInventory;

/// A fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Working directory, inherited from the server when unset
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// `<bin> <playbook> -i <inventory> [--extra-vars <json>]`
    pub fn playbook(
        bin: impl Into<OsString>,
        playbook: &Path,
        inventory: &StagedInventory,
        extra_vars: &HashMap<String, JsonValue>,
    ) -> Result<Self> {
        let mut args = vec![
            playbook.as_os_str().to_owned(),
            OsString::from("-i"),
            inventory.arg(),
        ];

        if !extra_vars.is_empty() {
            args.push(OsString::from("--extra-vars"));
            args.push(OsString::from(serde_json::to_string(extra_vars)?));
        }

        Ok(Self {
            program: bin.into(),
            args,
            current_dir: None,
        })
    }

    /// `<executable> <args...>`
    pub fn executable(path: &Path, args: &[String]) -> Self {
        Self {
            program: path.as_os_str().to_owned(),
            args: args.iter().map(OsString::from).collect(),
            current_dir: None,
        }
    }

    /// Runs the command from `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Program name for logging
    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}
