//! User records and session principals.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::roles::{ParseRoleError, Role};

/// A user as returned by the authentication repository.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub email_verified: bool,
    pub username: String,
    pub preferred_language: String,
    pub preferred_currency: String,
    pub role: String,
}

/// The authenticated identity attached to a request.
///
/// Built from a [`UserRecord`] by the token verifier; lives only for the
/// request that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionPrincipal {
    pub id: Uuid,
    pub email: String,
    pub email_verified: bool,
    pub username: String,
    pub preferred_language: String,
    pub preferred_currency: String,
    pub role: Role,
}

impl TryFrom<UserRecord> for SessionPrincipal {
    type Error = ParseRoleError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = record.role.parse()?;

        Ok(Self {
            id: record.id,
            email: record.email,
            email_verified: record.email_verified,
            username: record.username,
            preferred_language: record.preferred_language,
            preferred_currency: record.preferred_currency,
            role,
        })
    }
}
