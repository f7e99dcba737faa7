//! Checklist persistence for shopping lists
//!
//! Checked items are stored per week as a small JSON file so that the CLI
//! can check items off across invocations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::dates;
use crate::shopping::ShoppingList;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChecklistFile {
    week_start: String,
    checked: Vec<String>,
}

/// On-disk store of checked shopping items
pub struct ChecklistStore {
    dir: PathBuf,
}

impl ChecklistStore {
    /// Create a store rooted at `<state_dir>/checklists`
    pub fn new(state_dir: PathBuf) -> Result<Self> {
        let dir = state_dir.join("checklists");
        if !dir.exists() {
            fs::create_dir_all(&dir).context("Failed to create checklist directory")?;
        }

        Ok(Self { dir })
    }

    fn path_for(&self, week_start: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", dates::date_to_string(week_start)))
    }

    /// Checked keys for a week; an unknown week has none
    pub fn load(&self, week_start: NaiveDate) -> Result<Vec<String>> {
        let path = self.path_for(week_start);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path).context("Failed to read checklist file")?;
        let file: ChecklistFile =
            serde_json::from_str(&json).context("Failed to deserialize checklist")?;

        Ok(file.checked)
    }

    /// Persist the checked state of `list`
    pub fn save(&self, list: &ShoppingList) -> Result<PathBuf> {
        let path = self.path_for(list.week_start);
        let file = ChecklistFile {
            week_start: dates::date_to_string(list.week_start),
            checked: list.checked_keys(),
        };

        let json = serde_json::to_string_pretty(&file).context("Failed to serialize checklist")?;
        fs::write(&path, json).context("Failed to write checklist file")?;

        Ok(path)
    }

    /// Apply stored state to a freshly computed list
    pub fn restore(&self, list: &mut ShoppingList) -> Result<()> {
        let keys = self.load(list.week_start)?;
        list.apply_checked(&keys);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, Meal};
    use tempfile::TempDir;

    fn list() -> ShoppingList {
        let meal = Meal {
            id: 1,
            name: "Chili".to_string(),
            ingredients: vec![
                Ingredient::new("beans", 2.0, "cans"),
                Ingredient::new("onion", 1.0, "pieces"),
            ],
            prep_time: 45,
            servings: 6,
            tags: Vec::new(),
            notes: String::new(),
            created_at: None,
        };
        ShoppingList::from_meals(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(), [&meal])
    }

    #[test]
    fn test_missing_week_has_no_checks() {
        let temp = TempDir::new().unwrap();
        let store = ChecklistStore::new(temp.path().to_path_buf()).unwrap();
        assert!(store.load(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_restore() {
        let temp = TempDir::new().unwrap();
        let store = ChecklistStore::new(temp.path().to_path_buf()).unwrap();

        let mut checked = list();
        checked.toggle(1).unwrap();
        let path = store.save(&checked).unwrap();
        assert!(path.ends_with("checklists/2025-02-02.json"));

        let mut fresh = list();
        store.restore(&mut fresh).unwrap();
        assert!(!fresh.items[0].checked);
        assert!(fresh.items[1].checked);
    }
}
