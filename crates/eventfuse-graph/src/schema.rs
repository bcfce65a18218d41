//! Neo4j schema initialization (constraints and indexes).

use anyhow::Result;
use tracing::info;

use crate::GraphClient;

/// Statements for schema initialization.
///
/// Location carries no uniqueness constraint: two Location nodes may
/// share country and city while differing in optional properties, so the
/// pair only gets a lookup index.
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE CONSTRAINT attack_id IF NOT EXISTS FOR (a:Attack) REQUIRE a.id IS UNIQUE",
    "CREATE CONSTRAINT terror_group_name IF NOT EXISTS FOR (g:TerrorGroup) REQUIRE g.name IS UNIQUE",
    "CREATE CONSTRAINT attack_type IF NOT EXISTS FOR (at:AttackType) REQUIRE at.type IS UNIQUE",
    "CREATE CONSTRAINT target_type IF NOT EXISTS FOR (t:Target) REQUIRE t.type IS UNIQUE",
    "CREATE INDEX location_country_city IF NOT EXISTS FOR (l:Location) ON (l.country, l.city)",
];

/// Initialize the schema. Safe to run multiple times — every statement
/// uses IF NOT EXISTS.
pub async fn initialize_schema(client: &GraphClient) -> Result<()> {
    info!("Initializing Neo4j schema...");

    for statement in SCHEMA_STATEMENTS {
        client.execute(statement).await?;
    }

    info!("Neo4j schema initialized ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}
