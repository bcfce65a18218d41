//! Column vocabulary: rename maps and the canonical column set.
//!
//! The primary source keeps its research-database column names; the
//! secondary incident list is renamed into that vocabulary before the
//! merge, and the merged table is renamed to canonical names before
//! normalization and validation.

/// Secondary-source columns mapped into the primary vocabulary.
pub const SECONDARY_RENAMES: &[(&str, &str)] = &[
    ("City", "city"),
    ("Country", "country_txt"),
    ("Injuries", "nwound"),
    ("Fatalities", "nkill"),
];

/// Merged-table columns mapped to canonical record names.
pub const CANONICAL_RENAMES: &[(&str, &str)] = &[
    ("date", "event_date"),
    ("country_txt", "country"),
    ("region_txt", "region"),
    ("provstate", "province_or_state"),
    ("nkill", "num_killed"),
    ("nkillter", "num_terrorist_killed"),
    ("nwound", "num_wounded"),
    ("nwoundte", "num_terrorist_wounded"),
    ("nperps", "num_perpetrators"),
    ("nperpcap", "num_perpetrators_captured"),
    ("attacktype1_txt", "attack_type_1"),
    ("attacktype2_txt", "attack_type_2"),
    ("attacktype3_txt", "attack_type_3"),
    ("targtype1_txt", "target_type_1"),
    ("targsubtype1_txt", "target_subtype_1"),
    ("targtype2_txt", "target_type_2"),
    ("targsubtype2_txt", "target_subtype_2"),
    ("targtype3_txt", "target_type_3"),
    ("targsubtype3_txt", "target_subtype_3"),
    ("gname", "terror_group_name"),
    ("gsubname", "terror_group_subname"),
    ("gname2", "secondary_terror_group_name"),
    ("gsubname2", "secondary_terror_group_subname"),
    ("gname3", "tertiary_terror_group_name"),
    ("gsubname3", "tertiary_terror_group_subname"),
    ("Description", "description"),
];

/// The fixed column set a merged table is restricted to, in output order.
pub const ESSENTIAL_COLUMNS: &[&str] = &[
    "date",
    "country_txt",
    "city",
    "region_txt",
    "provstate",
    "latitude",
    "longitude",
    "nkill",
    "nkillter",
    "nwound",
    "nwoundte",
    "total_casualties",
    "nperps",
    "nperpcap",
    "attacktype1_txt",
    "attacktype2_txt",
    "attacktype3_txt",
    "targtype1_txt",
    "targsubtype1_txt",
    "targtype2_txt",
    "targsubtype2_txt",
    "targtype3_txt",
    "targsubtype3_txt",
    "gname",
    "gsubname",
    "gname2",
    "gsubname2",
    "gname3",
    "gsubname3",
    "Description",
    "data_source",
];
