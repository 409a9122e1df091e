use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{FamilyGroupInvite, GroupId, InviteId, NewFamilyGroupInvite, Role, User};
use crate::schema::{family_group_invites, family_group_members, family_groups};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use super::groups::{add_member, find_group, role_of};

pub const CODE_LENGTH: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 5;

/// Samples an invite code. Not suitable as a secret: codes are short-lived
/// and only grant group membership.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Codes are typed by hand, so surrounding whitespace and case are ignored.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl FamilyGroupInvite {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < now)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JoinedGroup {
    pub group_id: GroupId,
    pub name: String,
}

/// Issues a new invite for the group. Only admins may invite.
pub fn generate_invite<R: Rng + ?Sized>(
    conn: &mut DbConn,
    group_id: &GroupId,
    user: &User,
    ttl: Duration,
    rng: &mut R,
) -> Result<FamilyGroupInvite, AppError> {
    find_group(conn, group_id)?;
    if role_of(conn, group_id, &user.id)? != Some(Role::Admin) {
        return Err(AppError::Forbidden("Only group admins can create invites"));
    }

    let now = Utc::now();
    let expiry_date = Some(now + ttl);

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate_code(rng);
        let invite = NewFamilyGroupInvite {
            id: InviteId::generate(),
            group_id: group_id.clone(),
            code: &code,
            expiry_date,
            created_by: user.id.clone(),
            created_at: now,
        };

        match diesel::insert_into(family_group_invites::table)
            .values(&invite)
            .execute(conn)
        {
            Ok(_) => {
                tracing::info!(group_id = %group_id, "created family group invite");
                return Ok(FamilyGroupInvite {
                    id: invite.id,
                    group_id: invite.group_id,
                    code: code.clone(),
                    expiry_date,
                    created_by: invite.created_by,
                    created_at: now,
                });
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                tracing::warn!(attempt, "invite code collision, resampling");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::AlreadyExists("Could not allocate a unique invite code"))
}

/// Joins the group behind `code` as a plain member.
///
/// Checks run in order inside one transaction: the code must exist, must not
/// be expired, and the user must not already belong to the group. The invite
/// itself is left in place and can be redeemed by others until it expires.
pub fn redeem_invite(
    conn: &mut DbConn,
    code: &str,
    user: &User,
    now: DateTime<Utc>,
) -> Result<JoinedGroup, AppError> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(AppError::Invalid("Invite code is required"));
    }

    conn.transaction::<_, AppError, _>(|conn| {
        let invite = family_group_invites::table
            .filter(family_group_invites::code.eq(&code))
            .select(FamilyGroupInvite::as_select())
            .first(conn)
            .optional()?
            .ok_or(AppError::NotFound("Invite code"))?;

        if invite.is_expired(now) {
            return Err(AppError::Expired);
        }

        let already_member = family_group_members::table
            .filter(family_group_members::group_id.eq(&invite.group_id))
            .filter(family_group_members::user_id.eq(&user.id))
            .select(family_group_members::id)
            .first::<crate::models::MemberId>(conn)
            .optional()?
            .is_some();
        if already_member {
            return Err(AppError::AlreadyExists(
                "You are already a member of this group",
            ));
        }

        add_member(conn, &invite.group_id, &user.id, Role::Member, now)?;

        let name: String = family_groups::table
            .find(&invite.group_id)
            .select(family_groups::name)
            .first(conn)?;

        tracing::info!(group_id = %invite.group_id, user_id = %user.id, "joined family group");
        Ok(JoinedGroup {
            group_id: invite.group_id,
            name,
        })
    })
}
