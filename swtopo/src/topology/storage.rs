// SwTopo: Reconciling Static and Discovered Switch Topologies
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Persisted Static Topology
//!
//! The static topology is persisted as a single configuration record. The record is either
//! present, holding the static links and the edge ports, or absent. Absence is represented
//! explicitly as `None`. Writing an empty configuration deletes the record.
//!
//! The JSON representation of the record looks as follows:
//!
//! ```json
//! {
//!   "static-switch-links": [ { "source": "1000:1", "destination": "1001:2" } ],
//!   "static-edge-ports": [ "1002:3" ]
//! }
//! ```

use crate::topology::{PortId, StorageError};

use log::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persisted form of the static topology configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StaticTopologyRecord {
    /// All configured static links
    #[serde(default)]
    pub static_switch_links: Vec<StaticSwitchLink>,
    /// All configured edge ports
    #[serde(default)]
    pub static_edge_ports: Vec<PortId>,
}

/// Persisted form of a single static link.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaticSwitchLink {
    /// Source port
    pub source: PortId,
    /// Destination port
    pub destination: PortId,
}

/// Backend holding the persisted static topology record.
pub trait ConfigStorage {
    /// Read the record. `Ok(None)` means that no static topology is configured.
    fn load(&self) -> Result<Option<StaticTopologyRecord>, StorageError>;

    /// Write the record, replacing any existing one. This operation must be atomic.
    fn store(&mut self, record: &StaticTopologyRecord) -> Result<(), StorageError>;

    /// Delete the record. Deleting an absent record is not an error.
    fn delete(&mut self) -> Result<(), StorageError>;

    /// Write the record if it is `Some`, or delete it if it is `None`.
    fn put(&mut self, record: Option<&StaticTopologyRecord>) -> Result<(), StorageError> {
        match record {
            Some(record) => self.store(record),
            None => self.delete(),
        }
    }
}

/// In-memory storage. Writes can be rejected by setting the storage read-only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Option<StaticTopologyRecord>,
    read_only: bool,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already contains the given record.
    pub fn with_record(record: StaticTopologyRecord) -> Self {
        Self { record: Some(record), read_only: false }
    }

    /// If set, all writes and deletions fail with [`StorageError::Rejected`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns the currently stored record.
    pub fn record(&self) -> Option<&StaticTopologyRecord> {
        self.record.as_ref()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.read_only {
            Err(StorageError::Rejected(String::from("storage is read-only")))
        } else {
            Ok(())
        }
    }
}

impl ConfigStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StaticTopologyRecord>, StorageError> {
        Ok(self.record.clone())
    }

    fn store(&mut self, record: &StaticTopologyRecord) -> Result<(), StorageError> {
        self.check_writable()?;
        self.record = Some(record.clone());
        Ok(())
    }

    fn delete(&mut self) -> Result<(), StorageError> {
        self.check_writable()?;
        self.record = None;
        Ok(())
    }
}

/// Storage writing the record as JSON file. A missing file means that no record exists.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage backed by the file at `path`. The file does not need to exist.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<StaticTopologyRecord>, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn store(&mut self, record: &StaticTopologyRecord) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(record)?;
        // write the new record next to the old one, and replace it in a single step.
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, data)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            warn!("Cannot replace {}: {}", self.path.display(), e);
            if let Err(rm_err) = fs::remove_file(&tmp_path) {
                warn!("Cannot remove {}: {}", tmp_path.display(), rm_err);
            }
            return Err(e.into());
        }
        debug!("Static topology written to {}", self.path.display());
        Ok(())
    }

    fn delete(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Static topology removed from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
