// SPDX-License-Identifier: MIT OR Apache-2.0
//! BNDL encoder for node graph snapshots.
//!
//! Turns a [`bndl_graph::Library`] into canonical BNDL text:
//! - Reroute chains collapse to single links
//! - Nodes get stable per-type sequence numbers
//! - Duplicate socket names are disambiguated with ordinals
//! - Values serialize to escaped, sentinel-wrapped tokens
//! - Unused boundary ports are exposed
//! - Instance values that differ from the defaults form an appendix
//!
//! ## Architecture
//!
//! Each scope is handled by a [`ScopeEmitter`]; an export context carries
//! the visited set and warnings of one pass through the recursion. Output is
//! a pure function of the snapshot and [`EncoderConfig`].

pub mod config;
pub mod diagnostics;
pub mod serialize;
pub mod labels;
pub mod enumerate;
pub mod reroute;
pub mod dead_end;
pub mod zones;
pub mod overrides;
pub mod scope;
pub mod export;

pub use config::{ConfigError, EncoderConfig};
pub use diagnostics::Diagnostics;
pub use enumerate::{Enumeration, NodeRef};
pub use export::{export_graph, export_subject, ExportError, ExportOutput};
pub use overrides::{OverrideEntry, OverrideProbe, OverrideSource};
pub use reroute::{EffectiveLink, RerouteCollapser};
pub use scope::ScopeEmitter;
