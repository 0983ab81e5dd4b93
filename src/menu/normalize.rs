//! Normalization of the raw upstream menu document.
//!
//! Total over any input: the upstream schema carries no guarantees, so every
//! missing or misshapen field degrades to a default instead of an error.

use serde_json::Value;

use super::nutrients::extract_macro;
use super::types::{Macros, MenuItem, Station};

/// Station name used when a category has none.
const UNKNOWN_STATION: &str = "Unknown";

/// Sort order for stations without one; sorts them last.
const UNKNOWN_SORT_ORDER: i64 = 999;

/// Normalize a raw menu document into stations.
///
/// Walks `period.categories`; an absent path yields an empty list. Never
/// panics on malformed input.
pub fn normalize(raw: &Value) -> Vec<Station> {
    let categories = raw
        .get("period")
        .and_then(|p| p.get("categories"))
        .and_then(Value::as_array);

    categories
        .map(|cats| cats.iter().map(normalize_category).collect())
        .unwrap_or_default()
}

fn normalize_category(category: &Value) -> Station {
    let station = match category.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_STATION.to_string(),
    };
    let sort_order = category
        .get("sortOrder")
        .and_then(Value::as_i64)
        .unwrap_or(UNKNOWN_SORT_ORDER);
    let items = category
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_item).collect())
        .unwrap_or_default();

    Station {
        station,
        sort_order,
        items,
    }
}

fn normalize_item(item: &Value) -> MenuItem {
    let calories = extract_macro(item, "Calories");
    let protein = extract_macro(item, "Protein (g)");
    let carbs = extract_macro(item, "Total Carbohydrates (g)");
    let fat = extract_macro(item, "Total Fat (g)");

    // Upstream represents missing nutrition data as an all-zero row,
    // indistinguishable from a true zero-calorie item. Treat a simultaneous
    // all-zero reading as "not provided"; a null among the four means a
    // partial reading and disables the suppression. Heuristic carried over
    // from the upstream data shape — a genuinely zero-calorie item is also
    // nulled.
    let all_zero = [calories, protein, carbs, fat]
        .iter()
        .all(|v| *v == Some(0.0));
    let keep = |v: Option<f64>| if all_zero { None } else { v };

    MenuItem {
        id: item.get("id").cloned().unwrap_or(Value::Null),
        name: item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string(),
        portion: present_string(item.get("portion")),
        ingredients: present_string(item.get("ingredients")),
        calories: keep(calories),
        macros: Macros {
            protein_g: keep(protein),
            carbs_g: keep(carbs),
            fat_g: keep(fat),
        },
        allergens: string_list(item.get("customAllergens")),
        tags: string_list(item.get("filters")),
    }
}

/// A string field carried through verbatim; absent or empty becomes `None`.
fn present_string(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A list field mapped to strings; absent becomes an empty list and
/// non-string entries are stringified.
fn string_list(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| match entry {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
