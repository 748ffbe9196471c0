// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph snapshots for the BNDL encoder.
//!
//! This crate provides the passive, read-only graph model the encoder walks:
//! - Nodes with typed sockets and properties
//! - Links between sockets, keyed by stable socket handles
//! - Interface items declaring a scope's boundary ports
//! - A library of scopes plus the subject instance applying one of them
//!
//! Snapshots are built once (directly or from a RON/JSON [`snapshot`]) and
//! never mutated by the encoder. Every lookup returns an `Option` so missing
//! host data is a typed outcome.

pub mod value;
pub mod socket;
pub mod node;
pub mod link;
pub mod interface;
pub mod graph;
pub mod library;
pub mod snapshot;

pub use value::{ResourceKind, ResourceRef, Value};
pub use socket::{Socket, SocketDirection, SocketId};
pub use node::{DynamicItems, Node, NodeId, NodeKind, Property, PropertyValue, ZoneKind};
pub use link::Link;
pub use interface::InterfaceItem;
pub use graph::{Graph, GraphId, LinkError, SocketLocation};
pub use library::{Library, Modifier, Subject};
pub use snapshot::{LoadedSnapshot, Snapshot, SnapshotError};
