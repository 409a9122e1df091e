use super::{MealType, Week};
use crate::models::{MealPlanId, RecipeId};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// One stored plan, with the recipe title resolved when there is one.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PlannedMeal {
    pub id: MealPlanId,
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: Option<RecipeId>,
    pub recipe_title: Option<String>,
    pub custom_meal: Option<String>,
    pub notes: Option<String>,
}

impl PlannedMeal {
    /// What the cell shows: the recipe title, else the free-text meal.
    pub fn display_name(&self) -> &str {
        self.recipe_title
            .as_deref()
            .or(self.custom_meal.as_deref())
            .unwrap_or_default()
    }
}

pub struct MealGrid {
    week: Week,
    plans: Vec<PlannedMeal>,
}

impl MealGrid {
    /// Plans outside the week are dropped.
    pub fn build(week: Week, plans: Vec<PlannedMeal>) -> Self {
        let plans = plans
            .into_iter()
            .filter(|p| week.contains(p.meal_date))
            .collect();
        MealGrid { week, plans }
    }

    pub fn week(&self) -> Week {
        self.week
    }

    /// `None` is an empty cell.
    pub fn cell(&self, date: NaiveDate, meal_type: MealType) -> Option<&PlannedMeal> {
        self.plans
            .iter()
            .find(|p| p.meal_date == date && p.meal_type == meal_type)
    }

    pub fn view(&self) -> WeekView {
        let days = self
            .week
            .days()
            .map(|date| GridDay {
                date,
                cells: MealType::ALL
                    .iter()
                    .map(|&meal_type| GridCell {
                        meal_type,
                        label: meal_type.label(),
                        meal: self.cell(date, meal_type).cloned(),
                    })
                    .collect(),
            })
            .collect();

        WeekView {
            week_start: self.week.start(),
            week_end: self.week.end(),
            previous_week: self.week.previous_start(),
            next_week: self.week.next_start(),
            days,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GridCell {
    pub meal_type: MealType,
    pub label: &'static str,
    pub meal: Option<PlannedMeal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GridDay {
    pub date: NaiveDate,
    pub cells: Vec<GridCell>,
}

/// Serialized grid, with the anchors for the neighbouring weeks.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub previous_week: NaiveDate,
    pub next_week: NaiveDate,
    pub days: Vec<GridDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planned(meal_date: NaiveDate, meal_type: MealType, custom: &str) -> PlannedMeal {
        PlannedMeal {
            id: MealPlanId::generate(),
            meal_date,
            meal_type,
            recipe_id: None,
            recipe_title: None,
            custom_meal: Some(custom.to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_cell_lookup() {
        let week = Week::containing(date(2024, 5, 15)).unwrap();
        let soup = planned(date(2024, 5, 14), MealType::Dinner, "Soupe");
        let grid = MealGrid::build(week, vec![soup.clone()]);

        assert_eq!(grid.cell(date(2024, 5, 14), MealType::Dinner), Some(&soup));
        assert_eq!(grid.cell(date(2024, 5, 14), MealType::Lunch), None);
        assert_eq!(grid.cell(date(2024, 5, 15), MealType::Dinner), None);
    }

    #[test]
    fn test_build_drops_plans_outside_week() {
        let week = Week::containing(date(2024, 5, 15)).unwrap();
        let grid = MealGrid::build(
            week,
            vec![planned(date(2024, 5, 20), MealType::Lunch, "Pâtes")],
        );
        assert_eq!(grid.cell(date(2024, 5, 20), MealType::Lunch), None);
    }

    #[test]
    fn test_view_shape() {
        let week = Week::containing(date(2024, 5, 15)).unwrap();
        let grid = MealGrid::build(
            week,
            vec![planned(date(2024, 5, 13), MealType::Breakfast, "Crêpes")],
        );
        let view = grid.view();

        assert_eq!(view.days.len(), 7);
        assert!(view.days.iter().all(|d| d.cells.len() == 3));
        assert_eq!(view.previous_week, date(2024, 5, 6));
        assert_eq!(view.next_week, date(2024, 5, 20));

        let monday = &view.days[0];
        assert_eq!(monday.cells[0].label, "Petit-déjeuner");
        let meal = monday.cells[0].meal.as_ref().unwrap();
        assert_eq!(meal.display_name(), "Crêpes");
        assert!(monday.cells[1].meal.is_none());
    }
}
