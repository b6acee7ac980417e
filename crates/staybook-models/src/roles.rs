//! User roles.
//!
//! Roles arrive from the repository as text. They are parsed exactly once, at
//! the authentication boundary, into [`Role`]; everything downstream matches
//! on the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Customer,
    HotelManager,
    ViaAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::HotelManager, Role::ViaAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::HotelManager => "hotel-manager",
            Role::ViaAdmin => "via-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "hotel-manager" => Ok(Role::HotelManager),
            "via-admin" => Ok(Role::ViaAdmin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
