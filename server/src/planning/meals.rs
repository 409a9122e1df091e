use super::grid::{MealGrid, PlannedMeal};
use super::{MealType, Week};
use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{MealPlan, MealPlanId, NewMealPlan, RecipeId, User};
use crate::recipes::find_visible;
use crate::schema::{meal_plans, recipes};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

/// What goes in a cell: a recipe, or a free-text meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealSelection {
    Recipe(RecipeId),
    Custom(String),
}

impl MealSelection {
    /// A recipe wins over a custom meal. Blank text counts as absent.
    pub fn from_parts(
        recipe_id: Option<RecipeId>,
        custom_meal: Option<&str>,
    ) -> Result<Self, AppError> {
        if let Some(recipe_id) = recipe_id {
            return Ok(MealSelection::Recipe(recipe_id));
        }
        match trimmed(custom_meal) {
            Some(custom) => Ok(MealSelection::Custom(custom.to_string())),
            None => Err(AppError::Invalid("Pick a recipe or enter a custom meal")),
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn to_planned(plan: MealPlan, recipe_title: Option<String>) -> Option<PlannedMeal> {
    let Some(meal_type) = MealType::parse(&plan.meal_type) else {
        tracing::warn!(
            id = %plan.id,
            meal_type = %plan.meal_type,
            "skipping meal plan with unknown meal type"
        );
        return None;
    };
    Some(PlannedMeal {
        id: plan.id,
        meal_date: plan.meal_date,
        meal_type,
        recipe_id: plan.recipe_id,
        recipe_title,
        custom_meal: plan.custom_meal,
        notes: plan.notes,
    })
}

/// The grid for the week containing `anchor`.
pub fn list_week(conn: &mut DbConn, user: &User, anchor: NaiveDate) -> Result<MealGrid, AppError> {
    let week = Week::containing(anchor)?;

    let rows: Vec<(MealPlan, Option<String>)> = meal_plans::table
        .left_join(recipes::table)
        .filter(meal_plans::user_id.eq(&user.id))
        .filter(meal_plans::meal_date.ge(week.start()))
        .filter(meal_plans::meal_date.le(week.end()))
        .select((MealPlan::as_select(), recipes::title.nullable()))
        .order(meal_plans::meal_date.asc())
        .load(conn)?;

    let plans = rows
        .into_iter()
        .filter_map(|(plan, title)| to_planned(plan, title))
        .collect();

    Ok(MealGrid::build(week, plans))
}

pub fn add_meal(
    conn: &mut DbConn,
    user: &User,
    meal_date: NaiveDate,
    meal_type: MealType,
    selection: MealSelection,
    notes: Option<&str>,
) -> Result<PlannedMeal, AppError> {
    let (recipe_id, recipe_title, custom_meal) = match &selection {
        MealSelection::Recipe(id) => {
            let recipe = find_visible(conn, id, Some(user))?;
            (Some(recipe.id), Some(recipe.title), None)
        }
        MealSelection::Custom(text) => (None, None, Some(text.as_str())),
    };
    let notes = trimmed(notes);
    let id = MealPlanId::generate();

    diesel::insert_into(meal_plans::table)
        .values(NewMealPlan {
            id: id.clone(),
            user_id: user.id.clone(),
            meal_date,
            meal_type: meal_type.as_str(),
            recipe_id: recipe_id.clone(),
            custom_meal,
            notes,
            created_at: Utc::now(),
        })
        .execute(conn)
        .map_err(AppError::on_conflict("A meal is already planned for this slot"))?;

    tracing::debug!(%id, date = %meal_date, meal_type = meal_type.as_str(), "meal planned");

    Ok(PlannedMeal {
        id,
        meal_date,
        meal_type,
        recipe_id,
        recipe_title,
        custom_meal: custom_meal.map(str::to_string),
        notes: notes.map(str::to_string),
    })
}

/// Removes one of the user's own plans.
pub fn delete_meal(conn: &mut DbConn, id: &MealPlanId, user: &User) -> Result<(), AppError> {
    let deleted = diesel::delete(
        meal_plans::table
            .filter(meal_plans::id.eq(id))
            .filter(meal_plans::user_id.eq(&user.id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(AppError::NotFound("Meal plan"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::testing::{insert_recipe, insert_user};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn custom(text: &str) -> MealSelection {
        MealSelection::Custom(text.to_string())
    }

    #[test]
    fn test_selection_requires_recipe_or_custom_meal() {
        assert!(matches!(
            MealSelection::from_parts(None, None),
            Err(AppError::Invalid(_))
        ));
        assert!(matches!(
            MealSelection::from_parts(None, Some("   ")),
            Err(AppError::Invalid(_))
        ));
        assert_eq!(
            MealSelection::from_parts(None, Some("  Pizza ")).unwrap(),
            custom("Pizza")
        );

        let recipe_id = RecipeId::generate();
        assert_eq!(
            MealSelection::from_parts(Some(recipe_id.clone()), Some("Pizza")).unwrap(),
            MealSelection::Recipe(recipe_id)
        );
    }

    #[test]
    fn test_add_and_list_week() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let recipe = insert_recipe(&mut conn, &alice, "Ratatouille", None);

        add_meal(
            &mut conn,
            &alice,
            date(2024, 5, 14),
            MealType::Dinner,
            MealSelection::Recipe(recipe.id.clone()),
            Some("  "),
        )
        .unwrap();
        add_meal(
            &mut conn,
            &alice,
            date(2024, 5, 13),
            MealType::Lunch,
            custom("Restes"),
            Some("au bureau"),
        )
        .unwrap();
        // Next week; must not show up
        add_meal(
            &mut conn,
            &alice,
            date(2024, 5, 20),
            MealType::Lunch,
            custom("Pâtes"),
            None,
        )
        .unwrap();

        let grid = list_week(&mut conn, &alice, date(2024, 5, 16)).unwrap();
        let dinner = grid.cell(date(2024, 5, 14), MealType::Dinner).unwrap();
        assert_eq!(dinner.recipe_title.as_deref(), Some("Ratatouille"));
        assert_eq!(dinner.custom_meal, None);
        assert_eq!(dinner.notes, None);

        let lunch = grid.cell(date(2024, 5, 13), MealType::Lunch).unwrap();
        assert_eq!(lunch.display_name(), "Restes");
        assert_eq!(lunch.notes.as_deref(), Some("au bureau"));

        assert!(grid.cell(date(2024, 5, 20), MealType::Lunch).is_none());
        assert!(grid.cell(date(2024, 5, 15), MealType::Breakfast).is_none());
    }

    #[test]
    fn test_one_plan_per_cell() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let day = date(2024, 5, 14);

        add_meal(&mut conn, &alice, day, MealType::Dinner, custom("Soupe"), None).unwrap();
        let again = add_meal(&mut conn, &alice, day, MealType::Dinner, custom("Salade"), None);
        assert!(matches!(again, Err(AppError::AlreadyExists(_))));

        // Same cell for another user is fine
        add_meal(&mut conn, &bob, day, MealType::Dinner, custom("Salade"), None).unwrap();
    }

    #[test]
    fn test_add_requires_visible_recipe() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let private = insert_recipe(&mut conn, &alice, "Secret", None);

        let result = add_meal(
            &mut conn,
            &bob,
            date(2024, 5, 14),
            MealType::Lunch,
            MealSelection::Recipe(private.id),
            None,
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_is_scoped_to_owner() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let day = date(2024, 5, 14);
        let plan =
            add_meal(&mut conn, &alice, day, MealType::Dinner, custom("Soupe"), None).unwrap();

        assert!(matches!(
            delete_meal(&mut conn, &plan.id, &bob),
            Err(AppError::NotFound(_))
        ));
        delete_meal(&mut conn, &plan.id, &alice).unwrap();
        assert!(matches!(
            delete_meal(&mut conn, &plan.id, &alice),
            Err(AppError::NotFound(_))
        ));
        let grid = list_week(&mut conn, &alice, day).unwrap();
        assert!(grid.cell(day, MealType::Dinner).is_none());
    }

    #[test]
    fn test_deleting_recipe_clears_its_plans() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let recipe = insert_recipe(&mut conn, &alice, "Gratin", None);
        let day = date(2024, 5, 14);
        add_meal(
            &mut conn,
            &alice,
            day,
            MealType::Dinner,
            MealSelection::Recipe(recipe.id.clone()),
            None,
        )
        .unwrap();

        crate::recipes::delete_recipe(&mut conn, &recipe.id, &alice).unwrap();
        let grid = list_week(&mut conn, &alice, day).unwrap();
        assert!(grid.cell(day, MealType::Dinner).is_none());
    }
}
