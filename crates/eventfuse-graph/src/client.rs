//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;
use tracing::debug;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
        }
    }
}

/// Client for applying generated statements to a Neo4j instance.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs pools lazily — `Graph::connect` does not open a bolt
    /// connection yet, so a cheap `RETURN 1` ping runs immediately and
    /// callers get a fast failure when Neo4j is unreachable.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db("neo4j")
            .max_connections(4)
            .fetch_size(20)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute a statement that returns no results.
    pub async fn execute(&self, statement: &str) -> Result<()> {
        debug!(statement, "Executing statement");
        self.graph
            .run(Query::new(statement.to_string()))
            .await
            .context("Neo4j statement execution failed")?;
        Ok(())
    }

    /// Apply a generated statement sequence in order, returning how many
    /// statements ran. Order matters: entity upserts come first in the
    /// sequence and relationships assume they already ran.
    pub async fn apply(&self, statements: &[String]) -> Result<usize> {
        for statement in statements {
            self.execute(statement)
                .await
                .with_context(|| format!("Failed applying: {statement}"))?;
        }
        Ok(statements.len())
    }

    /// Get node and relationship counts for status display.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        Ok(GraphCounts {
            nodes: self.count("MATCH (n) RETURN count(n) as count").await?,
            relationships: self.count("MATCH ()-[r]->() RETURN count(r) as count").await?,
        })
    }

    async fn count(&self, statement: &str) -> Result<usize> {
        let mut result = self
            .graph
            .execute(Query::new(statement.to_string()))
            .await
            .context("Neo4j count query failed")?;

        if let Ok(Some(row)) = result.next().await {
            let count: i64 = row
                .get("count")
                .map_err(|e| anyhow::anyhow!("Failed to read count: {e:?}"))?;
            return Ok(count as usize);
        }
        Ok(0)
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
