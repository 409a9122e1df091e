use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Declares a text-backed UUID identifier that can be bound directly in diesel queries.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            DieselNewType, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type!(UserId);
id_type!(SessionId);
id_type!(RecipeId);
id_type!(GroupId);
id_type!(MemberId);
id_type!(InviteId);
id_type!(MealPlanId);
id_type!(FavoriteId);

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// Users end up in request spans and error logs; keep the hash out of them.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub id: UserId,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub id: SessionId,
    pub user_id: UserId,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Recipe difficulty, serialized with the labels shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    Facile,
    Moyen,
    Difficile,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Facile => "Facile",
            Difficulty::Moyen => "Moyen",
            Difficulty::Difficile => "Difficile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Facile" => Some(Difficulty::Facile),
            "Moyen" => Some(Difficulty::Moyen),
            "Difficile" => Some(Difficulty::Difficile),
            _ => None,
        }
    }
}

// Ingredient and instruction lists are stored as JSON text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Instruction {
    pub step: i32,
    pub text: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: RecipeId,
    pub user_id: UserId,
    pub family_group_id: Option<GroupId>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn ingredients(&self) -> Vec<Ingredient> {
        serde_json::from_str(&self.ingredients).unwrap_or_default()
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        serde_json::from_str(&self.instructions).unwrap_or_default()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(Difficulty::parse)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub id: RecipeId,
    pub user_id: UserId,
    pub family_group_id: Option<GroupId>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<&'static str>,
    pub category: Option<&'a str>,
    pub ingredients: String,
    pub instructions: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the user-editable columns of a recipe.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeReplacement<'a> {
    pub family_group_id: Option<GroupId>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<&'static str>,
    pub category: Option<&'a str>,
    pub ingredients: String,
    pub instructions: String,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::family_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FamilyGroup {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::family_groups)]
pub struct NewFamilyGroup<'a> {
    pub id: GroupId,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::family_group_members)]
pub struct NewFamilyGroupMember {
    pub id: MemberId,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub role: &'static str,
    pub joined_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::family_group_invites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FamilyGroupInvite {
    pub id: InviteId,
    pub group_id: GroupId,
    pub code: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::family_group_invites)]
pub struct NewFamilyGroupInvite<'a> {
    pub id: InviteId,
    pub group_id: GroupId,
    pub code: &'a str,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::meal_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MealPlan {
    pub id: MealPlanId,
    pub user_id: UserId,
    pub meal_date: NaiveDate,
    pub meal_type: String,
    pub recipe_id: Option<RecipeId>,
    pub custom_meal: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::meal_plans)]
pub struct NewMealPlan<'a> {
    pub id: MealPlanId,
    pub user_id: UserId,
    pub meal_date: NaiveDate,
    pub meal_type: &'static str,
    pub recipe_id: Option<RecipeId>,
    pub custom_meal: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub created_at: DateTime<Utc>,
}
