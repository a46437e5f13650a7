//! Flattening of nested player records into single-level rows.
//!
//! Every row carries the same static columns (top-level scalars, two columns
//! per known sub-object, one column per attribute of each known list). The
//! `stats` object contributes one `stat_<key>` column per key it holds, so
//! the full column set is only known once all rows are collected.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};

/// Separator used when joining list attributes into one column.
pub const LIST_SEPARATOR: &str = "|";

/// Prefix for columns derived from the `stats` object.
pub const STAT_PREFIX: &str = "stat_";

/// One flattened player row, keyed by column name.
pub type FlatRow = BTreeMap<String, Cell>;

/// All rows of a run, in fetch order.
pub type RowSet = Vec<FlatRow>;

/// A scalar cell value. `Null` is written as an empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Cell {
    /// Converts a JSON value into a cell. Objects and arrays are not scalars
    /// and degrade to `Null`.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(Value::Number(n)) => Cell::Number(n.clone()),
            Some(Value::String(s)) => Cell::Text(s.clone()),
            _ => Cell::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static schema
// ─────────────────────────────────────────────────────────────────────────────

/// (column, source key) for top-level scalar fields.
const SCALAR_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("overall_rating", "overallRating"),
    ("first_name", "firstName"),
    ("last_name", "lastName"),
    ("common_name", "commonName"),
    ("skill_moves", "skillMoves"),
    ("weak_foot", "weakFootAbility"),
    ("preferred_foot", "preferredFoot"),
    ("league_name", "leagueName"),
    ("avatar_url", "avatarUrl"),
    ("shield_url", "shieldUrl"),
];

/// A nested single object from which two sub-fields are lifted.
struct ObjectField {
    source: &'static str,
    columns: [(&'static str, &'static str); 2],
}

const OBJECT_FIELDS: &[ObjectField] = &[
    ObjectField {
        source: "nationality",
        columns: [
            ("nationality_label", "label"),
            ("nationality_image_url", "imageUrl"),
        ],
    },
    ObjectField {
        source: "team",
        columns: [("team_label", "label"), ("team_image_url", "imageUrl")],
    },
    ObjectField {
        source: "position",
        columns: [
            ("position_short_label", "shortLabel"),
            ("position_label", "label"),
        ],
    },
];

/// (column, source list key, attribute) for list-of-object fields.
const LIST_FIELDS: &[(&str, &str, &str)] = &[
    ("alternate_positions", "alternatePositions", "shortLabel"),
    ("player_abilities_labels", "playerAbilities", "label"),
    ("player_abilities_images", "playerAbilities", "imageUrl"),
];

/// Column names every flattened row carries, regardless of input shape.
pub fn static_columns() -> impl Iterator<Item = &'static str> {
    SCALAR_FIELDS
        .iter()
        .map(|(column, _)| *column)
        .chain(
            OBJECT_FIELDS
                .iter()
                .flat_map(|field| field.columns.iter().map(|(column, _)| *column)),
        )
        .chain(LIST_FIELDS.iter().map(|(column, _, _)| *column))
}

// ─────────────────────────────────────────────────────────────────────────────
// Flattening
// ─────────────────────────────────────────────────────────────────────────────

/// Flattens one raw player record.
///
/// Never fails: a record that is not a JSON object yields a row of empty
/// static columns.
pub fn flatten_record(record: &Value) -> FlatRow {
    let empty = Map::new();
    let obj = record.as_object().unwrap_or(&empty);
    let mut row = FlatRow::new();

    for (column, key) in SCALAR_FIELDS {
        row.insert((*column).to_string(), Cell::from_json(obj.get(*key)));
    }

    for field in OBJECT_FIELDS {
        let nested = obj.get(field.source).and_then(Value::as_object);
        for (column, key) in &field.columns {
            let text = nested
                .and_then(|n| n.get(*key))
                .map(text_of)
                .unwrap_or_default();
            row.insert((*column).to_string(), Cell::Text(text));
        }
    }

    for (column, source, attribute) in LIST_FIELDS {
        let joined = join_list_attribute(obj.get(*source), attribute);
        row.insert((*column).to_string(), Cell::Text(joined));
    }

    if let Some(stats) = obj.get("stats").and_then(Value::as_object) {
        for (name, stat) in stats {
            if let Some(value) = stat.as_object().and_then(|s| s.get("value")) {
                row.insert(
                    format!("{}{}", STAT_PREFIX, name),
                    Cell::from_json(Some(value)),
                );
            }
        }
    }

    row
}

/// Joins `attribute` of every element in a list of objects with `|`.
///
/// Null and empty-object elements are skipped; an element lacking the
/// attribute contributes an empty segment so positions stay aligned with
/// sibling list columns.
fn join_list_attribute(list: Option<&Value>, attribute: &str) -> String {
    let Some(items) = list.and_then(Value::as_array) else {
        return String::new();
    };

    items
        .iter()
        .filter(|item| item.as_object().map_or(!item.is_null(), |o| !o.is_empty()))
        .map(|item| item.get(attribute).map(text_of).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Renders a scalar JSON value as text; nulls and containers become "".
fn text_of(value: &Value) -> String {
    Cell::from_json(Some(value)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(row: &FlatRow, column: &str) -> String {
        row.get(column)
            .unwrap_or_else(|| panic!("missing column {}", column))
            .to_string()
    }

    fn full_record() -> Value {
        json!({
            "id": 231747,
            "overallRating": 91,
            "firstName": "Kylian",
            "lastName": "Mbappé",
            "commonName": null,
            "skillMoves": 5,
            "weakFootAbility": 4,
            "preferredFoot": 1,
            "leagueName": "LALIGA EA SPORTS",
            "avatarUrl": "https://img.example/avatar.png",
            "shieldUrl": "https://img.example/shield.png",
            "nationality": { "id": 18, "label": "France", "imageUrl": "https://img.example/fr.png" },
            "team": { "id": 243, "label": "Real Madrid", "imageUrl": "https://img.example/rm.png" },
            "position": { "id": 25, "shortLabel": "ST", "label": "Striker" },
            "alternatePositions": [
                { "id": 27, "shortLabel": "LW", "label": "Left Wing" }
            ],
            "playerAbilities": [
                { "id": "quick-step", "label": "Quick Step+", "imageUrl": "https://img.example/qs.png" },
                { "id": "rapid", "label": "Rapid", "imageUrl": "https://img.example/rapid.png" }
            ],
            "stats": {
                "acceleration": { "value": 97, "diff": 0 },
                "sprintSpeed": { "value": 97, "diff": 0 },
                "pac": { "value": 97 }
            }
        })
    }

    #[test]
    fn flattens_scalars_objects_lists_and_stats() {
        let row = flatten_record(&full_record());

        assert_eq!(row["id"], Cell::Number(231747.into()));
        assert_eq!(row["overall_rating"], Cell::Number(91.into()));
        assert_eq!(text(&row, "first_name"), "Kylian");
        assert_eq!(text(&row, "last_name"), "Mbappé");
        assert!(row["common_name"].is_null());
        assert_eq!(text(&row, "weak_foot"), "4");
        assert_eq!(text(&row, "nationality_label"), "France");
        assert_eq!(text(&row, "nationality_image_url"), "https://img.example/fr.png");
        assert_eq!(text(&row, "team_label"), "Real Madrid");
        assert_eq!(text(&row, "position_short_label"), "ST");
        assert_eq!(text(&row, "position_label"), "Striker");
        assert_eq!(text(&row, "alternate_positions"), "LW");
        assert_eq!(text(&row, "player_abilities_labels"), "Quick Step+|Rapid");
        assert_eq!(
            text(&row, "player_abilities_images"),
            "https://img.example/qs.png|https://img.example/rapid.png"
        );
        assert_eq!(text(&row, "stat_acceleration"), "97");
        assert_eq!(text(&row, "stat_sprintSpeed"), "97");
        assert_eq!(text(&row, "stat_pac"), "97");
    }

    #[test]
    fn empty_record_has_every_static_column() {
        let row = flatten_record(&json!({}));

        for column in static_columns() {
            assert!(row.contains_key(column), "missing static column {}", column);
            assert_eq!(text(&row, column), "");
        }
        assert_eq!(row.len(), static_columns().count());
    }

    #[test]
    fn non_object_record_degrades_to_empty_row() {
        for record in [json!(null), json!(42), json!("player"), json!([1, 2])] {
            let row = flatten_record(&record);
            assert_eq!(row.len(), static_columns().count());
            assert!(row.values().all(|cell| cell.to_string().is_empty()));
        }
    }

    #[test]
    fn null_sub_objects_yield_empty_columns() {
        let row = flatten_record(&json!({
            "nationality": null,
            "team": "not an object",
            "position": { "shortLabel": "CB" }
        }));

        assert_eq!(text(&row, "nationality_label"), "");
        assert_eq!(text(&row, "nationality_image_url"), "");
        assert_eq!(text(&row, "team_label"), "");
        assert_eq!(text(&row, "team_image_url"), "");
        assert_eq!(text(&row, "position_short_label"), "CB");
        assert_eq!(text(&row, "position_label"), "");
    }

    #[test]
    fn empty_abilities_and_two_alternate_positions() {
        let row = flatten_record(&json!({
            "playerAbilities": [],
            "alternatePositions": [
                { "shortLabel": "CM" },
                { "shortLabel": "CDM" }
            ]
        }));

        assert_eq!(row["player_abilities_labels"], Cell::from(""));
        assert_eq!(row["player_abilities_images"], Cell::from(""));
        assert_eq!(text(&row, "alternate_positions"), "CM|CDM");
    }

    #[test]
    fn list_column_has_one_segment_per_element_in_order() {
        let positions: Vec<Value> = ["RB", "RWB", "RM", "CB"]
            .iter()
            .map(|label| json!({ "shortLabel": label }))
            .collect();
        let row = flatten_record(&json!({ "alternatePositions": positions }));

        let joined = text(&row, "alternate_positions");
        let segments: Vec<&str> = joined.split(LIST_SEPARATOR).collect();
        assert_eq!(segments, vec!["RB", "RWB", "RM", "CB"]);
    }

    #[test]
    fn list_skips_null_elements_but_keeps_missing_attributes() {
        let row = flatten_record(&json!({
            "playerAbilities": [
                { "label": "Finesse Shot+", "imageUrl": "a.png" },
                null,
                { "imageUrl": "b.png" }
            ]
        }));

        assert_eq!(text(&row, "player_abilities_labels"), "Finesse Shot+|");
        assert_eq!(text(&row, "player_abilities_images"), "a.png|b.png");
    }

    #[test]
    fn list_skips_empty_object_elements() {
        let row = flatten_record(&json!({
            "alternatePositions": [{ "shortLabel": "ST" }, {}],
            "playerAbilities": [{}, { "label": "Rapid", "imageUrl": "r.png" }, {}]
        }));

        assert_eq!(text(&row, "alternate_positions"), "ST");
        assert_eq!(text(&row, "player_abilities_labels"), "Rapid");
        assert_eq!(text(&row, "player_abilities_images"), "r.png");

        let row = flatten_record(&json!({ "alternatePositions": [{}, null] }));
        assert_eq!(text(&row, "alternate_positions"), "");
    }

    #[test]
    fn list_that_is_not_an_array_is_empty() {
        let row = flatten_record(&json!({ "alternatePositions": { "shortLabel": "GK" } }));
        assert_eq!(text(&row, "alternate_positions"), "");
    }

    #[test]
    fn stats_without_value_are_skipped() {
        let row = flatten_record(&json!({
            "stats": {
                "vision": { "value": 88 },
                "gkDiving": { "diff": 1 },
                "curve": 77,
                "composure": { "value": null }
            }
        }));

        assert_eq!(text(&row, "stat_vision"), "88");
        assert!(!row.contains_key("stat_gkDiving"));
        assert!(!row.contains_key("stat_curve"));
        assert!(row["stat_composure"].is_null());
    }

    #[test]
    fn stat_columns_vary_between_records() {
        let outfield = flatten_record(&json!({ "stats": { "pac": { "value": 90 } } }));
        let keeper = flatten_record(&json!({ "stats": { "gkReflexes": { "value": 89 } } }));

        assert!(outfield.contains_key("stat_pac"));
        assert!(!outfield.contains_key("stat_gkReflexes"));
        assert!(keeper.contains_key("stat_gkReflexes"));
        assert!(!keeper.contains_key("stat_pac"));
    }

    #[test]
    fn non_scalar_top_level_field_degrades_to_null() {
        let row = flatten_record(&json!({
            "id": { "nested": true },
            "leagueName": ["Premier League"],
            "overallRating": 84.5
        }));

        assert!(row["id"].is_null());
        assert!(row["league_name"].is_null());
        assert_eq!(text(&row, "overall_rating"), "84.5");
    }

    #[test]
    fn cell_display() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::Number(7.into()).to_string(), "7");
        assert_eq!(Cell::from("Pelé").to_string(), "Pelé");
    }
}
