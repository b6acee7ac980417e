use serde::Serialize;
use utoipa::ToSchema;

use staybook_models::Role;

use crate::middleware::role::AccessPolicy;

/// Policies the caller satisfies, used by clients to gate UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccessResponse {
    pub role: Role,
    pub policies: Vec<AccessPolicy>,
}

impl AccessResponse {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            policies: AccessPolicy::ALL
                .into_iter()
                .filter(|policy| policy.permits(Some(role)))
                .collect(),
        }
    }
}
