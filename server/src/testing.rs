//! Fixtures shared by the unit tests.

use crate::db::DbConn;
use crate::models::{GroupId, NewRecipe, NewUser, Recipe, RecipeId, User, UserId};
use crate::schema::{recipes, users};
use chrono::Utc;
use diesel::prelude::*;

pub fn insert_user(conn: &mut DbConn, username: &str) -> User {
    let user = NewUser {
        id: UserId::generate(),
        username,
        password_hash: "not-a-real-hash",
        created_at: Utc::now(),
    };
    diesel::insert_into(users::table)
        .values(&user)
        .execute(conn)
        .unwrap();
    users::table
        .find(&user.id)
        .select(User::as_select())
        .first(conn)
        .unwrap()
}

pub fn insert_recipe(
    conn: &mut DbConn,
    owner: &User,
    title: &str,
    family_group_id: Option<&GroupId>,
) -> Recipe {
    insert_recipe_with(conn, owner, title, family_group_id, false)
}

pub fn insert_recipe_with(
    conn: &mut DbConn,
    owner: &User,
    title: &str,
    family_group_id: Option<&GroupId>,
    is_public: bool,
) -> Recipe {
    let now = Utc::now();
    let id = RecipeId::generate();
    diesel::insert_into(recipes::table)
        .values(NewRecipe {
            id: id.clone(),
            user_id: owner.id.clone(),
            family_group_id: family_group_id.cloned(),
            title,
            description: None,
            image_url: None,
            prep_time: None,
            cook_time: None,
            servings: None,
            difficulty: None,
            category: None,
            ingredients: "[]".to_string(),
            instructions: "[]".to_string(),
            is_public,
            created_at: now,
            updated_at: now,
        })
        .execute(conn)
        .unwrap();
    recipes::table
        .find(&id)
        .select(Recipe::as_select())
        .first(conn)
        .unwrap()
}
