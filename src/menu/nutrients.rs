//! Nutrient lookup over the upstream item shape.
//!
//! Upstream items carry a `nutrients` list of `{name, valueNumeric, value}`
//! entries with no guaranteed fields. Lookups never fail — anything missing
//! or malformed is `None`.

use serde_json::Value;

/// Extract a named macro value from an item.
///
/// Matches `nutrient` case-insensitively against each entry's `name` and
/// returns the first hit's numeric value. `"Calories"` is special: the item's
/// direct `calories` field wins over the nutrient list when it parses.
pub fn extract_macro(item: &Value, nutrient: &str) -> Option<f64> {
    if nutrient.eq_ignore_ascii_case("calories") {
        if let Some(direct) = item.get("calories").and_then(to_number) {
            return Some(direct);
        }
    }
    lookup_nutrient(item, nutrient)
}

fn lookup_nutrient(item: &Value, name: &str) -> Option<f64> {
    let entries = item.get("nutrients")?.as_array()?;
    let hit = entries.iter().find(|entry| {
        entry
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    })?;

    // Prefer the explicitly numeric field; an explicit null falls through to
    // the generic one.
    let raw = match hit.get("valueNumeric") {
        Some(v) if !v.is_null() => v,
        _ => hit.get("value")?,
    };
    to_number(raw)
}

/// Coerce a JSON value to a finite number.
///
/// Accepts JSON numbers and strings that parse as finite floats; everything
/// else is `None`.
pub(crate) fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_is_case_insensitive() {
        let item = json!({
            "nutrients": [{"name": "protein (g)", "valueNumeric": 12.5}]
        });
        assert_eq!(extract_macro(&item, "Protein (g)"), Some(12.5));
    }

    #[test]
    fn test_prefers_value_numeric_over_value() {
        let item = json!({
            "nutrients": [{"name": "Total Fat (g)", "valueNumeric": 3, "value": 99}]
        });
        assert_eq!(extract_macro(&item, "Total Fat (g)"), Some(3.0));
    }

    #[test]
    fn test_null_value_numeric_falls_through() {
        let item = json!({
            "nutrients": [{"name": "Total Fat (g)", "valueNumeric": null, "value": "7.5"}]
        });
        assert_eq!(extract_macro(&item, "Total Fat (g)"), Some(7.5));
    }

    #[test]
    fn test_string_values_parse() {
        let item = json!({
            "nutrients": [{"name": "Total Carbohydrates (g)", "value": " 42 "}]
        });
        assert_eq!(extract_macro(&item, "Total Carbohydrates (g)"), Some(42.0));
    }

    #[test]
    fn test_unparseable_value_is_none() {
        let item = json!({
            "nutrients": [{"name": "Protein (g)", "value": "less than 1"}]
        });
        assert_eq!(extract_macro(&item, "Protein (g)"), None);
    }

    #[test]
    fn test_missing_structure_is_none() {
        assert_eq!(extract_macro(&json!({}), "Protein (g)"), None);
        assert_eq!(extract_macro(&json!({"nutrients": "oops"}), "Protein (g)"), None);
        assert_eq!(extract_macro(&json!(null), "Protein (g)"), None);
        assert_eq!(
            extract_macro(&json!({"nutrients": [{"valueNumeric": 5}]}), "Protein (g)"),
            None
        );
    }

    #[test]
    fn test_direct_calories_field_wins() {
        let item = json!({
            "calories": 250,
            "nutrients": [{"name": "Calories", "valueNumeric": 999}]
        });
        assert_eq!(extract_macro(&item, "Calories"), Some(250.0));
    }

    #[test]
    fn test_calories_falls_back_to_nutrient_list() {
        let item = json!({
            "nutrients": [{"name": "Calories", "valueNumeric": 310}]
        });
        assert_eq!(extract_macro(&item, "Calories"), Some(310.0));
    }

    #[test]
    fn test_direct_zero_calories_is_zero_not_fallback() {
        let item = json!({
            "calories": 0,
            "nutrients": [{"name": "Calories", "valueNumeric": 120}]
        });
        assert_eq!(extract_macro(&item, "Calories"), Some(0.0));
    }
}
