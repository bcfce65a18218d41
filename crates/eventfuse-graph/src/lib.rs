//! # eventfuse Graph
//!
//! Projects validated events into a property graph: entity extraction and
//! deduplication, Cypher statement generation, script persistence, and the
//! Neo4j client used to apply the generated statements.

pub mod client;
pub mod entities;
pub mod projector;
pub mod schema;
pub mod script;
pub mod statement;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use entities::{EntitySet, Location};
pub use projector::{project_events, GraphError, Projection, ProjectionStats};
pub use script::{render_script, save_script};
