//! Family recipe books: groups of users who share a set of recipes, joined
//! through short invite codes.

mod groups;
mod invites;

pub use groups::{
    count_members, count_recipes, create_group, find_group, group_recipes, group_summary,
    leave_group, list_groups, list_members, require_member, role_of, GroupSummary, MemberSummary,
};
pub use invites::{
    generate_code, generate_invite, normalize_code, redeem_invite, JoinedGroup, CODE_LENGTH,
};
