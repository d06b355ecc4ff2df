use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access level carried by authenticated callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    User,
    Admin,
}

/// Identity claims of an authenticated caller, issued by the auth layer
/// upstream of this crate and passed by value into every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub access_level: AccessLevel,
}

/// The caller of an operation. Unauthenticated requests are an explicit
/// variant rather than an absent claims object, so every policy branch has
/// to spell out what anonymous callers get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Caller {
    #[default]
    Anonymous,
    Authenticated(Claims),
}

impl Caller {
    pub fn user(user_id: Uuid) -> Self {
        Caller::Authenticated(Claims {
            user_id,
            access_level: AccessLevel::User,
        })
    }

    pub fn admin(user_id: Uuid) -> Self {
        Caller::Authenticated(Claims {
            user_id,
            access_level: AccessLevel::Admin,
        })
    }

    /// The caller's user id, if authenticated.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(claims) => Some(claims.user_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Caller::Authenticated(Claims {
                access_level: AccessLevel::Admin,
                ..
            })
        )
    }

    /// True if the caller is the given user.
    pub fn is_user(&self, user_id: Uuid) -> bool {
        self.user_id() == Some(user_id)
    }
}
