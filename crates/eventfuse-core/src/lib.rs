//! eventfuse Core Library
//!
//! Reconciles two independently curated terror-incident datasets into one
//! canonical record set: date resolution, composite-key merge with
//! field-level conflict resolution, normalization, identity assignment and
//! record validation. Pure and synchronous; no I/O happens here.

pub mod columns;
pub mod dates;
pub mod error;
pub mod event;
pub mod identity;
pub mod merge;
pub mod normalize;
pub mod table;

pub use error::{FuseError, FuseResult};
pub use event::{Event, ValidationReport};
pub use merge::Provenance;
pub use table::{Row, Table, Value};
