//! Core data types for normalized menus.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A meal period offered by the hall.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealPeriod {
    /// All periods, in serving order.
    pub const ALL: [MealPeriod; 3] = [
        MealPeriod::Breakfast,
        MealPeriod::Lunch,
        MealPeriod::Dinner,
    ];

    /// Lowercase name as used in URLs and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            MealPeriod::Breakfast => "breakfast",
            MealPeriod::Lunch => "lunch",
            MealPeriod::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully normalized menu for one (date, period) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMenu {
    pub date: NaiveDate,
    pub period: MealPeriod,
    pub hall: String,
    pub stations: Vec<Station>,
}

/// One serving station and its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station name; `"Unknown"` when the upstream category has none.
    pub station: String,
    /// Display order; unknown stations get 999 and sort last.
    #[serde(rename = "sortOrder")]
    pub sort_order: i64,
    pub items: Vec<MenuItem>,
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Upstream item id, carried verbatim (number or string upstream).
    pub id: Value,
    /// Item name, trimmed; empty when the upstream item has none.
    pub name: String,
    pub portion: Option<String>,
    pub ingredients: Option<String>,
    pub calories: Option<f64>,
    pub macros: Macros,
    pub allergens: Vec<String>,
    pub tags: Vec<String>,
}

/// Macronutrients in grams. All-null when upstream provided no nutrition row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_lowercase_everywhere() {
        assert_eq!(MealPeriod::Breakfast.to_string(), "breakfast");
        assert_eq!(
            serde_json::to_value(MealPeriod::Dinner).unwrap(),
            serde_json::json!("dinner")
        );
    }

    #[test]
    fn test_station_serializes_camel_case_sort_order() {
        let station = Station {
            station: "Grill".to_string(),
            sort_order: 1,
            items: vec![],
        };
        let v = serde_json::to_value(&station).unwrap();
        assert_eq!(v["sortOrder"], serde_json::json!(1));
    }
}
