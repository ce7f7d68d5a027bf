//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docharbor_entity::user::UserRole;

/// Context for the current request.
///
/// Supplied per operation by the external identity provider, so that
/// every operation knows *who* is acting and with which role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated caller's ID.
    pub user_id: Uuid,
    /// The caller's role as reported by the identity provider.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Context for a regular member.
    pub fn member(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Member)
    }

    /// Context for an administrator.
    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
