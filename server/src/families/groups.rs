use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{
    FamilyGroup, GroupId, MemberId, NewFamilyGroup, NewFamilyGroupMember, Recipe, Role, User,
    UserId,
};
use crate::schema::{family_group_members, family_groups, recipes, users};
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A group as seen by one of its members.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub role: Role,
    pub member_count: i64,
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberSummary {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Creates a group and makes its creator the first admin, atomically.
pub fn create_group(
    conn: &mut DbConn,
    user: &User,
    name: &str,
    description: Option<&str>,
) -> Result<FamilyGroup, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Invalid("Group name cannot be empty"));
    }
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    let now = Utc::now();
    let group_id = GroupId::generate();

    conn.transaction::<_, AppError, _>(|conn| {
        diesel::insert_into(family_groups::table)
            .values(NewFamilyGroup {
                id: group_id.clone(),
                name,
                description,
                created_by: user.id.clone(),
                created_at: now,
            })
            .execute(conn)?;

        add_member(conn, &group_id, &user.id, Role::Admin, now)?;

        Ok(FamilyGroup {
            id: group_id.clone(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_by: user.id.clone(),
            created_at: now,
        })
    })
}

pub(super) fn add_member(
    conn: &mut DbConn,
    group_id: &GroupId,
    user_id: &UserId,
    role: Role,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    diesel::insert_into(family_group_members::table)
        .values(NewFamilyGroupMember {
            id: MemberId::generate(),
            group_id: group_id.clone(),
            user_id: user_id.clone(),
            role: role.as_str(),
            joined_at: now,
        })
        .execute(conn)
        .map_err(AppError::on_conflict(
            "You are already a member of this group",
        ))?;
    Ok(())
}

pub fn find_group(conn: &mut DbConn, group_id: &GroupId) -> Result<FamilyGroup, AppError> {
    family_groups::table
        .find(group_id)
        .select(FamilyGroup::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::NotFound("Family group"))
}

/// The user's role in the group, or `None` if they are not a member.
pub fn role_of(
    conn: &mut DbConn,
    group_id: &GroupId,
    user_id: &UserId,
) -> Result<Option<Role>, AppError> {
    let role: Option<String> = family_group_members::table
        .filter(family_group_members::group_id.eq(group_id))
        .filter(family_group_members::user_id.eq(user_id))
        .select(family_group_members::role)
        .first(conn)
        .optional()?;
    Ok(role.as_deref().and_then(Role::parse))
}

/// Fails with `NotFound` for an unknown group and `Forbidden` for non-members.
pub fn require_member(
    conn: &mut DbConn,
    group_id: &GroupId,
    user_id: &UserId,
) -> Result<(FamilyGroup, Role), AppError> {
    let group = find_group(conn, group_id)?;
    match role_of(conn, group_id, user_id)? {
        Some(role) => Ok((group, role)),
        None => Err(AppError::Forbidden("You are not a member of this group")),
    }
}

pub fn count_members(conn: &mut DbConn, group_id: &GroupId) -> Result<i64, AppError> {
    Ok(family_group_members::table
        .filter(family_group_members::group_id.eq(group_id))
        .count()
        .get_result(conn)?)
}

pub fn count_recipes(conn: &mut DbConn, group_id: &GroupId) -> Result<i64, AppError> {
    Ok(recipes::table
        .filter(recipes::family_group_id.assume_not_null().eq(group_id))
        .count()
        .get_result(conn)?)
}

/// Every group the user belongs to, with member and recipe counts taken from
/// one consistent snapshot. `search` filters by name, case-insensitively.
pub fn list_groups(
    conn: &mut DbConn,
    user: &User,
    search: Option<&str>,
) -> Result<Vec<GroupSummary>, AppError> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    conn.transaction::<_, AppError, _>(|conn| {
        let rows: Vec<(FamilyGroup, String)> = family_groups::table
            .inner_join(family_group_members::table)
            .filter(family_group_members::user_id.eq(&user.id))
            .select((FamilyGroup::as_select(), family_group_members::role))
            .order(family_groups::name.asc())
            .load(conn)?;

        let rows: Vec<(FamilyGroup, Role)> = rows
            .into_iter()
            .filter(|(group, _)| {
                needle
                    .as_deref()
                    .is_none_or(|n| group.name.to_lowercase().contains(n))
            })
            .filter_map(|(group, role)| Role::parse(&role).map(|role| (group, role)))
            .collect();

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<GroupId> = rows.iter().map(|(group, _)| group.id.clone()).collect();

        let member_counts: HashMap<GroupId, i64> = family_group_members::table
            .filter(family_group_members::group_id.eq_any(ids.clone()))
            .group_by(family_group_members::group_id)
            .select((family_group_members::group_id, count_star()))
            .load::<(GroupId, i64)>(conn)?
            .into_iter()
            .collect();

        let recipe_counts: HashMap<GroupId, i64> = recipes::table
            .filter(recipes::family_group_id.assume_not_null().eq_any(ids))
            .group_by(recipes::family_group_id)
            .select((recipes::family_group_id, count_star()))
            .load::<(Option<GroupId>, i64)>(conn)?
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(group, role)| GroupSummary {
                member_count: member_counts.get(&group.id).copied().unwrap_or(0),
                recipe_count: recipe_counts.get(&group.id).copied().unwrap_or(0),
                id: group.id,
                name: group.name,
                description: group.description,
                role,
                created_at: group.created_at,
            })
            .collect())
    })
}

/// One group's summary, for members only.
pub fn group_summary(
    conn: &mut DbConn,
    group_id: &GroupId,
    user: &User,
) -> Result<GroupSummary, AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        let (group, role) = require_member(conn, group_id, &user.id)?;
        Ok(GroupSummary {
            member_count: count_members(conn, group_id)?,
            recipe_count: count_recipes(conn, group_id)?,
            id: group.id,
            name: group.name,
            description: group.description,
            role,
            created_at: group.created_at,
        })
    })
}

pub fn list_members(
    conn: &mut DbConn,
    group_id: &GroupId,
) -> Result<Vec<MemberSummary>, AppError> {
    let rows: Vec<(UserId, String, String, DateTime<Utc>)> = family_group_members::table
        .inner_join(users::table)
        .filter(family_group_members::group_id.eq(group_id))
        .select((
            users::id,
            users::username,
            family_group_members::role,
            family_group_members::joined_at,
        ))
        .order(family_group_members::joined_at.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .filter_map(|(user_id, username, role, joined_at)| {
            Some(MemberSummary {
                user_id,
                username,
                role: Role::parse(&role)?,
                joined_at,
            })
        })
        .collect())
}

/// Recipes shared into the group, newest first. Members only.
pub fn group_recipes(
    conn: &mut DbConn,
    group_id: &GroupId,
    user: &User,
) -> Result<Vec<Recipe>, AppError> {
    require_member(conn, group_id, &user.id)?;
    Ok(recipes::table
        .filter(recipes::family_group_id.assume_not_null().eq(group_id))
        .select(Recipe::as_select())
        .order(recipes::updated_at.desc())
        .load(conn)?)
}

/// Removes the caller from the group. The last admin may only leave once
/// they are the last member, which deletes the group.
pub fn leave_group(conn: &mut DbConn, group_id: &GroupId, user: &User) -> Result<(), AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        let (_, role) = require_member(conn, group_id, &user.id)?;

        if role == Role::Admin {
            let admins: i64 = family_group_members::table
                .filter(family_group_members::group_id.eq(group_id))
                .filter(family_group_members::role.eq(Role::Admin.as_str()))
                .count()
                .get_result(conn)?;
            let members = count_members(conn, group_id)?;

            if admins == 1 && members > 1 {
                return Err(AppError::Invalid(
                    "The last admin cannot leave while other members remain",
                ));
            }
            if members == 1 {
                diesel::delete(family_groups::table.find(group_id)).execute(conn)?;
                tracing::info!(group_id = %group_id, "deleted family group after last member left");
                return Ok(());
            }
        }

        diesel::delete(
            family_group_members::table
                .filter(family_group_members::group_id.eq(group_id))
                .filter(family_group_members::user_id.eq(&user.id)),
        )
        .execute(conn)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::testing::{insert_recipe, insert_user};

    #[test]
    fn test_create_group_makes_creator_admin() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");

        let group = create_group(&mut conn, &alice, "  Famille Dupont  ", Some("")).unwrap();
        assert_eq!(group.name, "Famille Dupont");
        assert_eq!(group.description, None);
        assert_eq!(
            role_of(&mut conn, &group.id, &alice.id).unwrap(),
            Some(Role::Admin)
        );
        assert_eq!(count_members(&mut conn, &group.id).unwrap(), 1);
    }

    #[test]
    fn test_create_group_rejects_blank_name() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");

        let err = create_group(&mut conn, &alice, "   ", None).unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));
        let groups: i64 = family_groups::table.count().get_result(&mut conn).unwrap();
        assert_eq!(groups, 0);
    }

    #[test]
    fn test_list_groups_counts_and_filters() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");

        let dupont = create_group(&mut conn, &alice, "Recettes Dupont", None).unwrap();
        let martin = create_group(&mut conn, &alice, "Traditions Martin", None).unwrap();
        add_member(&mut conn, &dupont.id, &bob.id, Role::Member, Utc::now()).unwrap();
        insert_recipe(&mut conn, &alice, "Tarte Tatin", Some(&dupont.id));
        insert_recipe(&mut conn, &bob, "Quiche", Some(&dupont.id));
        insert_recipe(&mut conn, &alice, "Soupe", None);

        let groups = list_groups(&mut conn, &alice, None).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, dupont.id);
        assert_eq!(groups[0].member_count, 2);
        assert_eq!(groups[0].recipe_count, 2);
        assert_eq!(groups[1].id, martin.id);
        assert_eq!(groups[1].member_count, 1);
        assert_eq!(groups[1].recipe_count, 0);

        let filtered = list_groups(&mut conn, &alice, Some("MARTIN")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Traditions Martin");

        let bobs = list_groups(&mut conn, &bob, None).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].role, Role::Member);
    }

    #[test]
    fn test_group_recipes_requires_membership() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let eve = insert_user(&mut conn, "eve");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();
        insert_recipe(&mut conn, &alice, "Tarte Tatin", Some(&group.id));

        assert_eq!(group_recipes(&mut conn, &group.id, &alice).unwrap().len(), 1);
        assert!(matches!(
            group_recipes(&mut conn, &group.id, &eve),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            group_recipes(&mut conn, &GroupId::generate(), &alice),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_last_admin_cannot_abandon_members() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();
        add_member(&mut conn, &group.id, &bob.id, Role::Member, Utc::now()).unwrap();

        assert!(matches!(
            leave_group(&mut conn, &group.id, &alice),
            Err(AppError::Invalid(_))
        ));

        leave_group(&mut conn, &group.id, &bob).unwrap();
        assert_eq!(count_members(&mut conn, &group.id).unwrap(), 1);

        leave_group(&mut conn, &group.id, &alice).unwrap();
        assert!(matches!(
            find_group(&mut conn, &group.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_deleting_group_detaches_recipes() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();
        let recipe = insert_recipe(&mut conn, &alice, "Tarte Tatin", Some(&group.id));

        leave_group(&mut conn, &group.id, &alice).unwrap();

        let family_group_id: Option<GroupId> = recipes::table
            .find(&recipe.id)
            .select(recipes::family_group_id)
            .first(&mut conn)
            .unwrap();
        assert_eq!(family_group_id, None);
    }

    #[test]
    fn test_list_members() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let alice = insert_user(&mut conn, "alice");
        let bob = insert_user(&mut conn, "bob");
        let group = create_group(&mut conn, &alice, "Dupont", None).unwrap();
        add_member(&mut conn, &group.id, &bob.id, Role::Member, Utc::now()).unwrap();

        let members = list_members(&mut conn, &group.id).unwrap();
        let names: Vec<_> = members.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(members[0].role, Role::Admin);
    }
}
