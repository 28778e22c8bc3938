//! Role/permission repository port.

use async_trait::async_trait;

use crate::domain::entities::rbac::{Permission, Role};
use crate::errors::DomainResult;

/// Read access to the role/permission store.
///
/// Only the two reads needed to build a policy snapshot are part of the
/// contract; administrative mutation happens outside the core and reaches it
/// as a `POLICY_RELOAD` event.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// List every role known to the store
    async fn list_roles(&self) -> DomainResult<Vec<Role>>;

    /// List the permissions granted to one role
    async fn list_permissions_for_role(&self, role_id: i64) -> DomainResult<Vec<Permission>>;
}
