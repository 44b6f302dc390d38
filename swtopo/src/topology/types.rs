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

//! Module containing all type definitions

use crate::topology::config::StaticModifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Switch Identification. This is the part of a [`PortId`] in front of the last `:`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// # Port Identification
///
/// Opaque, globally unique key of a switch port, formatted as `<node>:<port-number>`. Any string
/// is accepted as a port identifier. A malformed identifier simply has no [`NodeId`], and will
/// never match a port known by the registry.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    /// Create a new port identifier from its string representation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create the port identifier of port `number` on `node`.
    pub fn from_parts(node: &NodeId, number: u32) -> Self {
        Self(format!("{}:{}", node.0, number))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the node on which this port is located, or `None` if the identifier is malformed.
    pub fn node(&self) -> Option<NodeId> {
        self.split().map(|(node, _)| NodeId::new(node))
    }

    /// Returns the port number, or `None` if the identifier is malformed.
    pub fn number(&self) -> Option<u32> {
        self.split().and_then(|(_, number)| number.parse().ok())
    }

    /// Returns `true` if the identifier has the form `<node>:<port-number>`.
    pub fn is_valid(&self) -> bool {
        self.node().is_some() && self.number().is_some()
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.0.rsplit_once(':').filter(|(node, number)| !node.is_empty() && !number.is_empty())
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PortId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Operational state of a switch port.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// The port is operational
    Up,
    /// The port is administratively or operationally down
    Down,
}

impl Default for PortState {
    fn default() -> Self {
        Self::Up
    }
}

impl PortState {
    /// Returns `true` if the port is up.
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Configuration Error
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The modifier does not match the configuration it is applied to. Either an insert hits an
    /// existing expression, a removal or update expects a different expression, or an update
    /// changes the key.
    #[error("The StaticModifier cannot be applied: {0:?}")]
    StaticModifierError(StaticModifier),
}

/// Errors of the (mocked) device layer.
#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    /// Node is not known
    #[error("Node was not found in the registry: {0}")]
    NodeNotFound(NodeId),
    /// Node is already known
    #[error("Node already exists: {0}")]
    NodeAlreadyExists(NodeId),
    /// Port is not known
    #[error("Port was not found in the registry: {0}")]
    PortNotFound(PortId),
    /// Port is already known
    #[error("Port already exists: {0}")]
    PortAlreadyExists(PortId),
    /// Port identifier does not have the form `<node>:<port-number>`
    #[error("Invalid port identifier: {0}")]
    InvalidPortId(PortId),
    /// A port cannot be linked to itself
    #[error("Cannot link port {0} to itself")]
    SelfLink(PortId),
}

/// Errors while reading or writing the persisted static topology.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO Error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Cannot (de)serialize the record
    #[error("Cannot (de)serialize the static topology: {0}")]
    JsonError(#[from] serde_json::Error),
    /// The store refused the write
    #[error("Write to the configuration store was rejected: {0}")]
    Rejected(String),
}
