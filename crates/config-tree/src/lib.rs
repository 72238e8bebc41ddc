//! Ordered section tree over dotted-path document nodes
//!
//! A document engine turns a configuration file into a flat, document-ordered
//! sequence of [`Node`]s. This crate decodes that sequence into a
//! [`SectionTree`], offers path lookup, on-demand creation, positional
//! insertion and typed reads, and flattens the tree back into the node
//! sequence the engine writes out. [`merge_defaults`] reconciles a user
//! document with a defaults template.

pub mod access;
pub mod error;
pub mod merge;
pub mod node;
pub mod path;
pub mod section;
pub mod tree;

pub use access::{Fetched, FromValues};
pub use error::{Error, Result};
pub use merge::{Merged, merge_defaults};
pub use node::{Node, Value, ValueKind};
pub use section::SectionRef;
pub use tree::{DecodeReport, SectionId, SectionTree};

pub use bigdecimal::BigDecimal;
