//! Weekly meal planning: a 7-day by 3-meal grid per user.

mod grid;
mod meals;

pub use grid::{GridCell, GridDay, MealGrid, PlannedMeal, WeekView};
pub use meals::{add_meal, delete_meal, list_week, MealSelection};

use crate::error::AppError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Display order of the grid rows.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Petit-déjeuner",
            MealType::Lunch => "Déjeuner",
            MealType::Dinner => "Dîner",
        }
    }
}

/// A Monday-to-Sunday week whose neighbouring weeks are also representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDate,
    end: NaiveDate,
    previous_start: NaiveDate,
    next_start: NaiveDate,
}

impl Week {
    /// Fails with `Invalid` at the edges of the supported calendar.
    pub fn containing(date: NaiveDate) -> Result<Self, AppError> {
        let out_of_range = || AppError::Invalid("Date out of range");
        let start = week_start(date).ok_or_else(out_of_range)?;
        Ok(Week {
            start,
            end: start
                .checked_add_signed(Duration::days(6))
                .ok_or_else(out_of_range)?,
            previous_start: start
                .checked_sub_signed(Duration::days(7))
                .ok_or_else(out_of_range)?,
            next_start: start
                .checked_add_signed(Duration::days(7))
                .ok_or_else(out_of_range)?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week, inclusive.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    pub fn previous_start(&self) -> NaiveDate {
        self.previous_start
    }

    pub fn next_start(&self) -> NaiveDate {
        self.next_start
    }

    pub fn previous(&self) -> Result<Self, AppError> {
        Week::containing(self.previous_start)
    }

    pub fn next(&self) -> Result<Self, AppError> {
        Week::containing(self.next_start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The Monday on or before `date`. `None` before the first representable Monday.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(date(2024, 5, 15)), Some(date(2024, 5, 13)));
        assert_eq!(week_start(date(2024, 5, 13)), Some(date(2024, 5, 13)));
        assert_eq!(week_start(date(2024, 5, 19)), Some(date(2024, 5, 13)));
    }

    #[test]
    fn test_week_range_and_navigation() {
        let week = Week::containing(date(2024, 5, 15)).unwrap();
        assert_eq!(week.end(), date(2024, 5, 19));
        assert_eq!(week.days().count(), 7);
        assert!(week.contains(date(2024, 5, 19)));
        assert!(!week.contains(date(2024, 5, 20)));

        assert_eq!(week.next().unwrap().start(), date(2024, 5, 20));
        assert_eq!(week.previous().unwrap().start(), date(2024, 5, 6));
        assert_eq!(week.next().unwrap().previous().unwrap(), week);
        assert_eq!(week.days().last(), Some(date(2024, 5, 19)));
    }

    #[test]
    fn test_week_crosses_year_boundary() {
        let week = Week::containing(date(2025, 1, 1)).unwrap();
        assert_eq!(week.start(), date(2024, 12, 30));
        assert_eq!(week.end(), date(2025, 1, 5));
    }

    #[test]
    fn test_calendar_edges_are_rejected() {
        assert!(matches!(
            Week::containing(NaiveDate::MAX),
            Err(AppError::Invalid(_))
        ));
        assert!(matches!(
            Week::containing(NaiveDate::MIN),
            Err(AppError::Invalid(_))
        ));

        // A week near the edge is fine as long as its neighbours exist
        let late = NaiveDate::MAX - Duration::days(30);
        let week = Week::containing(late).unwrap();
        assert!(week.contains(late));
        assert_eq!(week.days().count(), 7);
    }

    #[test]
    fn test_meal_type_parse() {
        for meal_type in MealType::ALL {
            assert_eq!(MealType::parse(meal_type.as_str()), Some(meal_type));
        }
        assert_eq!(MealType::parse("DINNER"), Some(MealType::Dinner));
        assert_eq!(MealType::parse("snack"), None);
        assert_eq!(MealType::Breakfast.label(), "Petit-déjeuner");
    }
}
