//! Inventory domain types
//!
//! An inventory selects the hosts a playbook runs against. On the wire it is
//! one of:
//! - a JSON string holding one hostname per line
//! - an object of the form `{"file": "<path>"}` naming an inventory file
//! - any other object, taken as an Ansible JSON inventory with groups such as
//!   `all` and an optional `_meta`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;

use crate::error::ValidationError;

/// Target selection for a playbook run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InventoryWire", into = "InventoryWire")]
pub enum Inventory {
    /// A single hostname
    Host(String),
    /// Two or more hostnames
    Hosts(Vec<String>),
    /// Path to an inventory file understood by the automation tool
    File(PathBuf),
    /// Ansible JSON inventory, keyed by group name
    Structured(Map<String, JsonValue>),
}

impl Inventory {
    /// Parses a newline separated host list
    ///
    /// Blank lines are skipped and entries are trimmed. One entry yields
    /// [`Inventory::Host`], more yield [`Inventory::Hosts`].
    pub fn parse_hosts(raw: &str) -> Result<Self, ValidationError> {
        let hosts: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(bad) = hosts
            .iter()
            .find(|h| h.contains(|c: char| c.is_whitespace() || c == ','))
        {
            return Err(ValidationError::Inventory(format!(
                "invalid host entry '{}'",
                bad
            )));
        }

        match hosts.len() {
            0 => Err(ValidationError::Inventory(
                "host list must contain at least one host".to_string(),
            )),
            1 => Ok(Inventory::Host(hosts.into_iter().next().unwrap_or_default())),
            _ => Ok(Inventory::Hosts(hosts)),
        }
    }

    /// Hostnames for literal inventories, empty otherwise
    pub fn hosts(&self) -> Vec<&str> {
        match self {
            Inventory::Host(host) => vec![host.as_str()],
            Inventory::Hosts(hosts) => hosts.iter().map(String::as_str).collect(),
            Inventory::File(_) | Inventory::Structured(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryFile {
    file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum InventoryWire {
    Hosts(String),
    File(InventoryFile),
    Structured(Map<String, JsonValue>),
}

impl TryFrom<InventoryWire> for Inventory {
    type Error = ValidationError;

    fn try_from(wire: InventoryWire) -> Result<Self, Self::Error> {
        match wire {
            InventoryWire::Hosts(raw) => Inventory::parse_hosts(&raw),
            InventoryWire::File(InventoryFile { file }) => {
                if file.as_os_str().is_empty() {
                    return Err(ValidationError::Inventory(
                        "inventory file path must not be empty".to_string(),
                    ));
                }
                Ok(Inventory::File(file))
            }
            InventoryWire::Structured(groups) => {
                if groups.is_empty() {
                    return Err(ValidationError::Inventory(
                        "inventory object must contain at least one group".to_string(),
                    ));
                }
                if let Some((name, _)) = groups.iter().find(|(_, group)| !group.is_object()) {
                    return Err(ValidationError::Inventory(format!(
                        "inventory group '{}' must be an object",
                        name
                    )));
                }
                Ok(Inventory::Structured(groups))
            }
        }
    }
}

impl From<Inventory> for InventoryWire {
    fn from(inventory: Inventory) -> Self {
        match inventory {
            Inventory::Host(host) => InventoryWire::Hosts(host),
            Inventory::Hosts(hosts) => InventoryWire::Hosts(hosts.join("\n")),
            Inventory::File(file) => InventoryWire::File(InventoryFile { file }),
            Inventory::Structured(groups) => InventoryWire::Structured(groups),
        }
    }
}
