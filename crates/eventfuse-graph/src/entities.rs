//! Graph entities referenced by events, deduplicated per run.

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use eventfuse_core::Event;

use crate::statement::is_meaningful;

/// Natural key of a Location node. Deduplication is by full structural
/// equality: two locations differing only in an optional field are
/// distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub country: String,
    pub city: String,
    pub region: Option<String>,
    pub province: Option<String>,
    pub latitude: Option<OrderedFloat<f64>>,
    pub longitude: Option<OrderedFloat<f64>>,
}

/// Per-run accumulator of unique entities. Passed explicitly through the
/// projection so concurrent runs cannot interfere; ordered sets keep the
/// generated statement order deterministic.
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    pub locations: BTreeSet<Location>,
    pub terror_groups: BTreeSet<String>,
    pub attack_types: BTreeSet<String>,
    pub targets: BTreeSet<String>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity-extraction pass for one event.
    pub fn absorb(&mut self, event: &Event) {
        if is_meaningful(&event.country) && is_meaningful(&event.city) {
            self.locations.insert(Location {
                country: event.country.clone(),
                city: event.city.clone(),
                region: meaningful_or_none(event.region.as_deref()),
                province: meaningful_or_none(event.province_or_state.as_deref()),
                latitude: event.latitude.map(OrderedFloat),
                longitude: event.longitude.map(OrderedFloat),
            });
        }

        self.terror_groups
            .extend(meaningful_labels(&event.terror_groups));
        self.attack_types
            .extend(meaningful_labels(&event.attack_types));
        self.targets
            .extend(meaningful_labels(&event.target_details));
    }

    /// Whether a location with this country/city pair was extracted.
    pub fn has_location(&self, country: &str, city: &str) -> bool {
        self.locations
            .iter()
            .any(|l| l.country == country && l.city == city)
    }

    pub fn len(&self) -> usize {
        self.locations.len() + self.terror_groups.len() + self.attack_types.len() + self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn meaningful_or_none(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_meaningful(v)).map(|v| v.to_string())
}

fn meaningful_labels(labels: &[String]) -> impl Iterator<Item = String> + '_ {
    labels.iter().filter(|l| is_meaningful(l)).cloned()
}
