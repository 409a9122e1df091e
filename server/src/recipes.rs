//! Recipe storage and visibility rules.
//!
//! A recipe is visible to its owner, to everyone when public, and to the
//! members of the family group it is shared into.

use crate::db::DbConn;
use crate::error::AppError;
use crate::families::role_of;
use crate::models::{
    Difficulty, GroupId, Ingredient, Instruction, NewRecipe, Recipe, RecipeId, RecipeReplacement,
    User,
};
use crate::schema::recipes;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "Tous";

/// User-supplied recipe fields, shared by create and full replacement.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub family_group_id: Option<GroupId>,
}

impl RecipeInput {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Invalid("Title cannot be empty"));
        }
        let negative = [self.prep_time, self.cook_time, self.servings]
            .into_iter()
            .flatten()
            .any(|v| v < 0);
        if negative {
            return Err(AppError::Invalid("Times and servings cannot be negative"));
        }
        Ok(())
    }

    fn encoded_lists(&self) -> Result<(String, String), AppError> {
        let ingredients = serde_json::to_string(&self.ingredients)
            .map_err(|_| AppError::Invalid("Invalid ingredients format"))?;
        let instructions = serde_json::to_string(&self.instructions)
            .map_err(|_| AppError::Invalid("Invalid instructions format"))?;
        Ok((ingredients, instructions))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub user_id: crate::models::UserId,
    pub family_group_id: Option<GroupId>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        // Unknown when it would not fit
        let total_time = match (recipe.prep_time, recipe.cook_time) {
            (None, None) => None,
            (prep, cook) => prep.unwrap_or(0).checked_add(cook.unwrap_or(0)),
        };
        let ingredients = recipe.ingredients();
        let instructions = recipe.instructions();
        let difficulty = recipe.difficulty();

        RecipeResponse {
            id: recipe.id,
            user_id: recipe.user_id,
            family_group_id: recipe.family_group_id,
            title: recipe.title,
            description: recipe.description,
            image_url: recipe.image_url,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time,
            servings: recipe.servings,
            difficulty,
            category: recipe.category,
            ingredients,
            instructions,
            is_public: recipe.is_public,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Search box and category chips of the library and explorer pages.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let text_ok = match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                recipe.title.to_lowercase().contains(&needle)
                    || recipe
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        };

        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => true,
            Some(category) => recipe.category.as_deref() == Some(category),
        };

        text_ok && category_ok
    }
}

/// Sharing into a group requires membership of that group.
fn check_family_group(
    conn: &mut DbConn,
    user: &User,
    group_id: Option<&GroupId>,
) -> Result<(), AppError> {
    if let Some(group_id) = group_id {
        crate::families::find_group(conn, group_id)?;
        if role_of(conn, group_id, &user.id)?.is_none() {
            return Err(AppError::Forbidden(
                "You can only share recipes into groups you belong to",
            ));
        }
    }
    Ok(())
}

pub fn create_recipe(
    conn: &mut DbConn,
    user: &User,
    input: &RecipeInput,
) -> Result<Recipe, AppError> {
    input.validate()?;
    check_family_group(conn, user, input.family_group_id.as_ref())?;
    let (ingredients, instructions) = input.encoded_lists()?;
    let now = Utc::now();
    let id = RecipeId::generate();

    diesel::insert_into(recipes::table)
        .values(NewRecipe {
            id: id.clone(),
            user_id: user.id.clone(),
            family_group_id: input.family_group_id.clone(),
            title: input.title.trim(),
            description: non_blank(&input.description),
            image_url: non_blank(&input.image_url),
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            servings: input.servings,
            difficulty: input.difficulty.map(|d| d.as_str()),
            category: non_blank(&input.category),
            ingredients,
            instructions,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        })
        .execute(conn)?;

    load(conn, &id)
}

fn load(conn: &mut DbConn, id: &RecipeId) -> Result<Recipe, AppError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::NotFound("Recipe"))
}

pub fn can_view(conn: &mut DbConn, recipe: &Recipe, user: Option<&User>) -> Result<bool, AppError> {
    if recipe.is_public {
        return Ok(true);
    }
    let Some(user) = user else {
        return Ok(false);
    };
    if recipe.user_id == user.id {
        return Ok(true);
    }
    match &recipe.family_group_id {
        Some(group_id) => Ok(role_of(conn, group_id, &user.id)?.is_some()),
        None => Ok(false),
    }
}

/// Loads a recipe the caller may see. Hidden recipes report `NotFound`.
pub fn find_visible(
    conn: &mut DbConn,
    id: &RecipeId,
    user: Option<&User>,
) -> Result<Recipe, AppError> {
    let recipe = load(conn, id)?;
    if can_view(conn, &recipe, user)? {
        Ok(recipe)
    } else {
        Err(AppError::NotFound("Recipe"))
    }
}

/// Replaces every editable field. Only the owner may edit.
pub fn replace_recipe(
    conn: &mut DbConn,
    id: &RecipeId,
    user: &User,
    input: &RecipeInput,
) -> Result<Recipe, AppError> {
    input.validate()?;
    check_family_group(conn, user, input.family_group_id.as_ref())?;
    let (ingredients, instructions) = input.encoded_lists()?;

    let updated = diesel::update(
        recipes::table
            .filter(recipes::id.eq(id))
            .filter(recipes::user_id.eq(&user.id)),
    )
    .set(RecipeReplacement {
        family_group_id: input.family_group_id.clone(),
        title: input.title.trim(),
        description: non_blank(&input.description),
        image_url: non_blank(&input.image_url),
        prep_time: input.prep_time,
        cook_time: input.cook_time,
        servings: input.servings,
        difficulty: input.difficulty.map(|d| d.as_str()),
        category: non_blank(&input.category),
        ingredients,
        instructions,
        is_public: input.is_public,
        updated_at: Utc::now(),
    })
    .execute(conn)?;

    if updated == 0 {
        return Err(AppError::NotFound("Recipe"));
    }
    load(conn, id)
}

/// Deletes a recipe owned by the user. Favorites and meal plans that point
/// at it go with it.
pub fn delete_recipe(conn: &mut DbConn, id: &RecipeId, user: &User) -> Result<(), AppError> {
    let deleted = diesel::delete(
        recipes::table
            .filter(recipes::id.eq(id))
            .filter(recipes::user_id.eq(&user.id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(AppError::NotFound("Recipe"));
    }
    Ok(())
}

/// The user's own library, most recently updated first.
pub fn list_for_user(
    conn: &mut DbConn,
    user: &User,
    filter: &RecipeFilter,
) -> Result<Vec<Recipe>, AppError> {
    let rows: Vec<Recipe> = recipes::table
        .filter(recipes::user_id.eq(&user.id))
        .select(Recipe::as_select())
        .order(recipes::updated_at.desc())
        .load(conn)?;
    Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
}

/// Public recipes shared by the community.
pub fn explore(conn: &mut DbConn, filter: &RecipeFilter) -> Result<Vec<Recipe>, AppError> {
    let rows: Vec<Recipe> = recipes::table
        .filter(recipes::is_public.eq(true))
        .select(Recipe::as_select())
        .order(recipes::created_at.desc())
        .load(conn)?;
    Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::families::create_group;
    use crate::testing::{insert_recipe, insert_recipe_with, insert_user};

    fn input(title: &str) -> RecipeInput {
        RecipeInput {
            title: title.to_string(),
            description: Some("Un classique".to_string()),
            image_url: None,
            prep_time: Some(20),
            cook_time: Some(40),
            servings: Some(6),
            difficulty: Some(Difficulty::Moyen),
            category: Some("Dessert".to_string()),
            ingredients: vec![Ingredient {
                name: "Pommes".to_string(),
                quantity: "6".to_string(),
                unit: String::new(),
            }],
            instructions: vec![Instruction {
                step: 1,
                text: "Caraméliser".to_string(),
            }],
            is_public: false,
            family_group_id: None,
        }
    }

    #[test]
    fn test_create_and_read_back() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");

        let recipe = create_recipe(&mut conn, &alice, &input("  Tarte Tatin ")).unwrap();
        assert_eq!(recipe.title, "Tarte Tatin");

        let response = RecipeResponse::from(recipe);
        assert_eq!(response.total_time, Some(60));
        assert_eq!(response.difficulty, Some(Difficulty::Moyen));
        assert_eq!(response.ingredients.len(), 1);
        assert_eq!(response.instructions[0].text, "Caraméliser");
    }

    #[test]
    fn test_total_time_that_does_not_fit_is_unknown() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");

        let mut long = input("Pain au levain");
        long.prep_time = Some(i32::MAX);
        long.cook_time = Some(1);
        long.is_public = true;
        let recipe = create_recipe(&mut conn, &alice, &long).unwrap();

        let response = RecipeResponse::from(recipe);
        assert_eq!(response.prep_time, Some(i32::MAX));
        assert_eq!(response.total_time, None);

        let public = explore(&mut conn, &RecipeFilter::default()).unwrap();
        assert_eq!(public.len(), 1);

        let mut only_prep = input("Salade");
        only_prep.cook_time = None;
        let recipe = create_recipe(&mut conn, &alice, &only_prep).unwrap();
        assert_eq!(RecipeResponse::from(recipe).total_time, Some(20));
    }

    #[test]
    fn test_title_is_required() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");

        let err = create_recipe(&mut conn, &alice, &input(" ")).unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
    }

    #[test]
    fn test_visibility_rules() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();

        let private = insert_recipe(&mut conn, &alice, "Secret", None);
        let shared = insert_recipe(&mut conn, &alice, "Famille", Some(&group.id));
        let public = insert_recipe_with(&mut conn, &alice, "Public", None, true);

        assert!(find_visible(&mut conn, &private.id, Some(&alice)).is_ok());
        assert!(matches!(
            find_visible(&mut conn, &private.id, Some(&bob)),
            Err(AppError::NotFound(_))
        ));
        assert!(find_visible(&mut conn, &shared.id, Some(&bob)).is_err());
        assert!(find_visible(&mut conn, &public.id, None).is_ok());

        diesel::insert_into(crate::schema::family_group_members::table)
            .values(crate::models::NewFamilyGroupMember {
                id: crate::models::MemberId::generate(),
                group_id: group.id.clone(),
                user_id: bob.id.clone(),
                role: "member",
                joined_at: Utc::now(),
            })
            .execute(&mut conn)
            .unwrap();
        assert!(find_visible(&mut conn, &shared.id, Some(&bob)).is_ok());
    }

    #[test]
    fn test_only_owner_replaces_and_deletes() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let recipe = create_recipe(&mut conn, &alice, &input("Tarte")).unwrap();

        let mut changed = input("Tarte Tatin");
        changed.description = None;
        changed.difficulty = None;
        assert!(matches!(
            replace_recipe(&mut conn, &recipe.id, &bob, &changed),
            Err(AppError::NotFound(_))
        ));

        let replaced = replace_recipe(&mut conn, &recipe.id, &alice, &changed).unwrap();
        assert_eq!(replaced.title, "Tarte Tatin");
        assert_eq!(replaced.description, None);
        assert_eq!(replaced.difficulty, None);

        assert!(matches!(
            delete_recipe(&mut conn, &recipe.id, &bob),
            Err(AppError::NotFound(_))
        ));
        delete_recipe(&mut conn, &recipe.id, &alice).unwrap();
        assert!(matches!(
            find_visible(&mut conn, &recipe.id, Some(&alice)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_sharing_requires_membership() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();

        let mut shared = input("Tarte");
        shared.family_group_id = Some(group.id.clone());
        assert!(matches!(
            create_recipe(&mut conn, &bob, &shared),
            Err(AppError::Forbidden(_))
        ));
        let recipe = create_recipe(&mut conn, &alice, &shared).unwrap();
        assert_eq!(recipe.family_group_id, Some(group.id));
    }

    #[test]
    fn test_filter_matches_title_description_and_category() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        create_recipe(&mut conn, &alice, &input("Tarte Tatin")).unwrap();
        let mut soup = input("Soupe à l'oignon");
        soup.description = Some("Gratinée au fromage".to_string());
        soup.category = Some("Entrée".to_string());
        create_recipe(&mut conn, &alice, &soup).unwrap();

        let all = list_for_user(&mut conn, &alice, &RecipeFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let by_text = RecipeFilter {
            q: Some("FROMAGE".to_string()),
            category: None,
        };
        let found = list_for_user(&mut conn, &alice, &by_text).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Soupe à l'oignon");

        let by_category = RecipeFilter {
            q: None,
            category: Some("Dessert".to_string()),
        };
        assert_eq!(list_for_user(&mut conn, &alice, &by_category).unwrap().len(), 1);

        let everything = RecipeFilter {
            q: None,
            category: Some(ALL_CATEGORIES.to_string()),
        };
        assert_eq!(list_for_user(&mut conn, &alice, &everything).unwrap().len(), 2);
    }

    #[test]
    fn test_explore_lists_only_public_recipes() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        insert_recipe_with(&mut conn, &alice, "Public", None, true);
        insert_recipe(&mut conn, &alice, "Private", None);

        let found = explore(&mut conn, &RecipeFilter::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Public");
    }
}
