//! Caller identity as provided by the auth collaborator

use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role ids as stored by the auth collaborator (`users.user_role`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    /// Content moderation only; at the gate it counts as `User`
    Moderator = 1,
    Admin = 2,
    SuperAdmin = 3,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Moderator => "moderator",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    /// Admin-equivalent roles may operate any gate
    #[inline]
    pub const fn is_admin_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | SuperAdmin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(User),
            1 => Some(Moderator),
            2 => Some(Admin),
            3 => Some(SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Authenticated caller of an entry operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_admin_or_higher()
    }
}
