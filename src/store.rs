//! Persistence of captured and normalized menu documents.
//!
//! Two records per (date, period): the verbatim raw payload and the
//! normalized document, both self-contained and tagged with date, period,
//! and hall. Files land under `<root>/<date>/`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::menu::{MealPeriod, NormalizedMenu};

/// Envelope for a raw captured document. The payload stays verbatim; the
/// tags make the record self-contained.
#[derive(Debug, Clone, Serialize)]
pub struct RawCaptureRecord<'a> {
    pub date: NaiveDate,
    pub period: MealPeriod,
    pub hall: &'a str,
    pub payload: &'a Value,
}

/// Writes menu documents under a root directory.
pub struct MenuStore {
    root: PathBuf,
}

impl MenuStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the raw captured payload as `raw-<period>.json`.
    pub fn save_raw(
        &self,
        date: NaiveDate,
        period: MealPeriod,
        hall: &str,
        payload: &Value,
    ) -> Result<PathBuf> {
        let record = RawCaptureRecord {
            date,
            period,
            hall,
            payload,
        };
        self.write_json(date, &format!("raw-{period}.json"), &record)
    }

    /// Write the normalized document as `<period>.json`.
    pub fn save_normalized(&self, menu: &NormalizedMenu) -> Result<PathBuf> {
        self.write_json(menu.date, &format!("{}.json", menu.period), menu)
    }

    fn write_json<T: Serialize>(&self, date: NaiveDate, name: &str, value: &T) -> Result<PathBuf> {
        let dir = self.root.join(date.to_string());
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let path = dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Macros, MenuItem, Station};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_save_raw_wraps_payload_with_tags() {
        let dir = TempDir::new().unwrap();
        let store = MenuStore::new(dir.path());

        let payload = json!({"period": {"categories": []}});
        let path = store
            .save_raw(sample_date(), MealPeriod::Lunch, "Roussell Dining Hall", &payload)
            .unwrap();

        assert!(path.ends_with("2026-03-14/raw-lunch.json"));
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["date"], json!("2026-03-14"));
        assert_eq!(written["period"], json!("lunch"));
        assert_eq!(written["hall"], json!("Roussell Dining Hall"));
        assert_eq!(written["payload"], payload);
    }

    #[test]
    fn test_save_normalized_layout() {
        let dir = TempDir::new().unwrap();
        let store = MenuStore::new(dir.path());

        let menu = NormalizedMenu {
            date: sample_date(),
            period: MealPeriod::Breakfast,
            hall: "Roussell Dining Hall".to_string(),
            stations: vec![Station {
                station: "Grill".to_string(),
                sort_order: 1,
                items: vec![MenuItem {
                    id: json!(7),
                    name: "Eggs".to_string(),
                    portion: None,
                    ingredients: None,
                    calories: Some(140.0),
                    macros: Macros {
                        protein_g: Some(12.0),
                        carbs_g: Some(1.0),
                        fat_g: Some(9.0),
                    },
                    allergens: vec!["Egg".to_string()],
                    tags: vec![],
                }],
            }],
        };

        let path = store.save_normalized(&menu).unwrap();
        assert!(path.ends_with("2026-03-14/breakfast.json"));

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["hall"], json!("Roussell Dining Hall"));
        assert_eq!(written["stations"][0]["sortOrder"], json!(1));
        assert_eq!(written["stations"][0]["items"][0]["name"], json!("Eggs"));
    }
}
