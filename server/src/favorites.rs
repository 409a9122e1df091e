use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{FavoriteId, NewFavorite, Recipe, RecipeId, User};
use crate::recipes::find_visible;
use crate::schema::{favorites, recipes};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

pub fn is_favorite(conn: &mut DbConn, user: &User, recipe_id: &RecipeId) -> Result<bool, AppError> {
    let found = favorites::table
        .filter(favorites::user_id.eq(&user.id))
        .filter(favorites::recipe_id.eq(recipe_id))
        .select(favorites::id)
        .first::<FavoriteId>(conn)
        .optional()?;
    Ok(found.is_some())
}

fn insert_favorite(conn: &mut DbConn, user: &User, recipe_id: &RecipeId) -> Result<(), AppError> {
    let result = diesel::insert_into(favorites::table)
        .values(NewFavorite {
            id: FavoriteId::generate(),
            user_id: user.id.clone(),
            recipe_id: recipe_id.clone(),
            created_at: Utc::now(),
        })
        .execute(conn);

    match result {
        // Someone got there first; the pair exists either way
        Ok(_) | Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn delete_favorite(conn: &mut DbConn, user: &User, recipe_id: &RecipeId) -> Result<bool, AppError> {
    let deleted = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(&user.id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

/// Flips the favorite flag and returns the new state.
///
/// The check and the write share one transaction, so two toggles in a row
/// always land back on the starting state.
pub fn toggle_favorite(
    conn: &mut DbConn,
    user: &User,
    recipe_id: &RecipeId,
) -> Result<bool, AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        find_visible(conn, recipe_id, Some(user))?;
        if delete_favorite(conn, user, recipe_id)? {
            Ok(false)
        } else {
            insert_favorite(conn, user, recipe_id)?;
            Ok(true)
        }
    })
}

/// Idempotent "add to favorites".
pub fn set_favorite(conn: &mut DbConn, user: &User, recipe_id: &RecipeId) -> Result<(), AppError> {
    find_visible(conn, recipe_id, Some(user))?;
    insert_favorite(conn, user, recipe_id)
}

/// Idempotent "remove from favorites".
pub fn unset_favorite(
    conn: &mut DbConn,
    user: &User,
    recipe_id: &RecipeId,
) -> Result<(), AppError> {
    delete_favorite(conn, user, recipe_id)?;
    Ok(())
}

/// Favorited recipes the user can still see, most recently favorited first.
pub fn list_favorites(conn: &mut DbConn, user: &User) -> Result<Vec<Recipe>, AppError> {
    let rows: Vec<Recipe> = favorites::table
        .inner_join(recipes::table)
        .filter(favorites::user_id.eq(&user.id))
        .select(Recipe::as_select())
        .order(favorites::created_at.desc())
        .load(conn)?;

    let mut visible = Vec::with_capacity(rows.len());
    for recipe in rows {
        if crate::recipes::can_view(conn, &recipe, Some(user))? {
            visible.push(recipe);
        }
    }
    Ok(visible)
}
