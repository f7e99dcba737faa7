//! Weekly plan types
//!
//! A week plan always holds exactly seven days starting on a Sunday. It can
//! also be viewed as a date-keyed map, which is the shape the HTTP API and
//! the calendar renderer prefer.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates;
use crate::types::MealType;

/// Meal assignments for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub date: NaiveDate,
    pub breakfast: Option<u64>,
    pub lunch: Option<u64>,
    pub dinner: Option<u64>,
}

impl DayMeals {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            breakfast: None,
            lunch: None,
            dinner: None,
        }
    }

    pub fn get(&self, slot: MealType) -> Option<u64> {
        match slot {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }

    pub fn set(&mut self, slot: MealType, meal_id: Option<u64>) {
        match slot {
            MealType::Breakfast => self.breakfast = meal_id,
            MealType::Lunch => self.lunch = meal_id,
            MealType::Dinner => self.dinner = meal_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        MealType::ALL.iter().all(|slot| self.get(*slot).is_none())
    }
}

/// Meal assignments for a Sunday-started week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub id: u64,
    pub week_start: NaiveDate,
    pub days: Vec<DayMeals>,
}

impl WeekPlan {
    /// Empty plan for the week containing `date`
    pub fn empty(id: u64, date: NaiveDate) -> Self {
        let week_start = dates::week_start(date);
        let days = dates::week_days(week_start)
            .into_iter()
            .map(DayMeals::empty)
            .collect();

        Self { id, week_start, days }
    }

    /// Last day of the week (Saturday)
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date <= self.week_end()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayMeals> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayMeals> {
        self.days.iter_mut().find(|day| day.date == date)
    }

    /// Assigned meal ids in day order, then breakfast/lunch/dinner order
    pub fn meal_ids(&self) -> Vec<u64> {
        self.days
            .iter()
            .flat_map(|day| MealType::ALL.iter().filter_map(move |slot| day.get(*slot)))
            .collect()
    }

    /// Number of filled slots
    pub fn filled_slots(&self) -> usize {
        self.meal_ids().len()
    }

    /// Date-keyed view of the week
    pub fn to_date_map(&self) -> BTreeMap<NaiveDate, DayMeals> {
        self.days
            .iter()
            .map(|day| (day.date, day.clone()))
            .collect()
    }

    /// Rebuild the seven-day list from a date-keyed map.
    ///
    /// Dates missing from the map become empty days; entries outside the
    /// week are ignored.
    pub fn from_date_map(
        id: u64,
        week_start: NaiveDate,
        map: &BTreeMap<NaiveDate, DayMeals>,
    ) -> Self {
        let week_start = dates::week_start(week_start);
        let days = dates::week_days(week_start)
            .into_iter()
            .map(|date| match map.get(&date) {
                Some(day) => DayMeals { date, ..day.clone() },
                None => DayMeals::empty(date),
            })
            .collect();

        Self { id, week_start, days }
    }
}
