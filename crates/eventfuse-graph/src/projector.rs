//! Two-pass projection of validated events into graph statements.
//!
//! Pass one extracts and deduplicates the entities events refer to; pass
//! two emits idempotent `MERGE` upserts for every unique entity, then a
//! `CREATE` per event and its relationship statements. All entity upserts
//! precede all event/relationship statements: relationships assume their
//! endpoints already exist.

use thiserror::Error;
use tracing::info;

use eventfuse_core::Event;

use crate::entities::{EntitySet, Location};
use crate::statement::{is_meaningful, render_props, PropValue};

/// Statement-construction failures. These indicate an upstream invariant
/// breach (an entity that should have been extracted was not), so they
/// are fatal rather than skipped.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Relationship endpoint missing for event {event_id}: {endpoint}")]
    MissingEndpoint { event_id: String, endpoint: String },
}

/// Counts for one projection run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionStats {
    pub entities: usize,
    pub events: usize,
    pub relationships: usize,
}

/// A generated statement sequence plus its counts.
#[derive(Debug, Clone)]
pub struct Projection {
    pub statements: Vec<String>,
    pub stats: ProjectionStats,
}

/// Project events into an ordered statement sequence.
pub fn project_events(events: &[Event]) -> Result<Projection, GraphError> {
    let mut entities = EntitySet::new();
    for event in events {
        entities.absorb(event);
    }

    let mut statements = Vec::new();
    let mut stats = ProjectionStats {
        entities: entities.len(),
        ..Default::default()
    };

    push_entity_upserts(&entities, &mut statements);

    for event in events {
        if !is_meaningful(&event.event_id) {
            continue;
        }
        statements.push(event_create(event));
        stats.events += 1;
        stats.relationships += push_relationships(event, &entities, &mut statements)?;
    }

    info!(
        entities = stats.entities,
        events = stats.events,
        relationships = stats.relationships,
        "Graph projection complete"
    );
    Ok(Projection { statements, stats })
}

fn push_entity_upserts(entities: &EntitySet, statements: &mut Vec<String>) {
    for location in &entities.locations {
        statements.push(format!(
            "MERGE (l:Location {{{}}})",
            render_props(&location_props(location))
        ));
    }
    for group in &entities.terror_groups {
        statements.push(format!(
            "MERGE (g:TerrorGroup {{{}}})",
            render_props(&[("name", PropValue::Text(group.clone()))])
        ));
    }
    for attack_type in &entities.attack_types {
        statements.push(format!(
            "MERGE (at:AttackType {{{}}})",
            render_props(&[("type", PropValue::Text(attack_type.clone()))])
        ));
    }
    for target in &entities.targets {
        statements.push(format!(
            "MERGE (t:Target {{{}}})",
            render_props(&[("type", PropValue::Text(target.clone()))])
        ));
    }
}

fn location_props(location: &Location) -> Vec<(&'static str, PropValue)> {
    let mut props = vec![
        ("country", PropValue::Text(location.country.clone())),
        ("city", PropValue::Text(location.city.clone())),
    ];
    if let Some(region) = &location.region {
        props.push(("region", PropValue::Text(region.clone())));
    }
    if let Some(province) = &location.province {
        props.push(("province", PropValue::Text(province.clone())));
    }
    if let Some(latitude) = location.latitude {
        props.push(("latitude", PropValue::Float(latitude.into_inner())));
    }
    if let Some(longitude) = location.longitude {
        props.push(("longitude", PropValue::Float(longitude.into_inner())));
    }
    props
}

fn event_create(event: &Event) -> String {
    let mut props = vec![
        ("id", PropValue::Text(event.event_id.clone())),
        ("date", PropValue::Text(event.event_date.to_string())),
        (
            "data_source",
            PropValue::Text(event.data_source.as_str().to_string()),
        ),
    ];

    let counts = [
        ("num_killed", event.num_killed),
        ("num_wounded", event.num_wounded),
        ("total_casualties", Some(event.total_casualties)),
        ("num_perpetrators", event.num_perpetrators),
        ("num_perpetrators_captured", event.num_perpetrators_captured),
    ];
    for (key, value) in counts {
        if let Some(n) = value {
            if n >= 0 {
                props.push((key, PropValue::Int(n)));
            }
        }
    }

    let texts = [
        ("summary", event.summary.as_deref()),
        ("description", event.description.as_deref()),
    ];
    for (key, value) in texts {
        if let Some(text) = value {
            if is_meaningful(text) {
                props.push((key, PropValue::Text(text.to_string())));
            }
        }
    }

    format!("CREATE (a:Attack {{{}}})", render_props(&props))
}

/// Emit the relationship statements for one event, returning how many
/// were written. Every referenced endpoint must exist in the entity set.
fn push_relationships(
    event: &Event,
    entities: &EntitySet,
    statements: &mut Vec<String>,
) -> Result<usize, GraphError> {
    let mut written = 0;

    if is_meaningful(&event.country) && is_meaningful(&event.city) {
        if !entities.has_location(&event.country, &event.city) {
            return Err(missing(event, format!("Location {}/{}", event.country, event.city)));
        }
        statements.push(format!(
            "MATCH (a:Attack {{{}}}), (l:Location {{{}}}) CREATE (a)-[:OCCURRED_AT]->(l)",
            render_props(&[("id", PropValue::Text(event.event_id.clone()))]),
            render_props(&[
                ("country", PropValue::Text(event.country.clone())),
                ("city", PropValue::Text(event.city.clone())),
            ]),
        ));
        written += 1;
    }

    written += labelled_relationships(
        event,
        &event.terror_groups,
        &entities.terror_groups,
        "TerrorGroup",
        "g",
        "name",
        "CONDUCTED_BY",
        statements,
    )?;
    written += labelled_relationships(
        event,
        &event.attack_types,
        &entities.attack_types,
        "AttackType",
        "at",
        "type",
        "TYPE_OF",
        statements,
    )?;
    written += labelled_relationships(
        event,
        &event.target_details,
        &entities.targets,
        "Target",
        "t",
        "type",
        "TARGETED",
        statements,
    )?;

    Ok(written)
}

#[allow(clippy::too_many_arguments)]
fn labelled_relationships(
    event: &Event,
    labels: &[String],
    known: &std::collections::BTreeSet<String>,
    node_label: &str,
    var: &str,
    key: &str,
    rel_type: &str,
    statements: &mut Vec<String>,
) -> Result<usize, GraphError> {
    let mut written = 0;
    for label in labels {
        if !is_meaningful(label) {
            continue;
        }
        if !known.contains(label) {
            return Err(missing(event, format!("{node_label} '{label}'")));
        }
        statements.push(format!(
            "MATCH (a:Attack {{{}}}), ({var}:{node_label} {{{}}}) CREATE (a)-[:{rel_type}]->({var})",
            render_props(&[("id", PropValue::Text(event.event_id.clone()))]),
            render_props(&[(key, PropValue::Text(label.clone()))]),
        ));
        written += 1;
    }
    Ok(written)
}

fn missing(event: &Event, endpoint: String) -> GraphError {
    GraphError::MissingEndpoint {
        event_id: event.event_id.clone(),
        endpoint,
    }
}
