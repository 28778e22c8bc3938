//! Atomically-swapped snapshot of the role → permission mapping.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::errors::{DomainResult, PolicyError};
use crate::repositories::RoleRepository;

/// Immutable role → permission-set mapping as of one reload generation.
///
/// Role and permission names are stored lowercased; lookups are therefore
/// case-insensitive.
#[derive(Debug, Default)]
pub struct PolicySnapshot {
    grants: HashMap<String, HashSet<String>>,
}

impl PolicySnapshot {
    /// Case-insensitive membership test. An unknown role has no permissions
    /// by definition, so it yields `false` rather than an error.
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.grants
            .get(&role.to_lowercase())
            .map(|perms| perms.contains(&permission.to_lowercase()))
            .unwrap_or(false)
    }

    /// Number of roles in this snapshot
    pub fn role_count(&self) -> usize {
        self.grants.len()
    }
}

/// Read-mostly policy cache built from the role repository.
///
/// Exactly one snapshot is current at any instant; `reload` builds a complete
/// replacement off to the side and swaps the pointer, so readers observe
/// either the old or the new generation in full, never a mix.
pub struct PolicyCache<R: RoleRepository> {
    repository: R,
    snapshot: ArcSwap<PolicySnapshot>,
}

impl<R: RoleRepository> PolicyCache<R> {
    /// Creates a cache with an empty initial snapshot; call
    /// [`reload`](Self::reload) to populate it.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            snapshot: ArcSwap::from_pointee(PolicySnapshot::default()),
        }
    }

    /// Fetch all roles and their permissions and swap in a fresh snapshot.
    ///
    /// Any repository failure aborts the whole rebuild and leaves the
    /// previous snapshot in place: stale-but-valid beats empty.
    pub async fn reload(&self) -> DomainResult<()> {
        let roles = self
            .repository
            .list_roles()
            .await
            .map_err(|err| PolicyError::RepositoryUnavailable {
                message: err.to_string(),
            })?;

        let mut grants: HashMap<String, HashSet<String>> = HashMap::with_capacity(roles.len());
        for role in roles {
            let permissions = self
                .repository
                .list_permissions_for_role(role.id)
                .await
                .map_err(|err| PolicyError::RepositoryUnavailable {
                    message: err.to_string(),
                })?;

            grants.insert(
                role.name.to_lowercase(),
                permissions.into_iter().map(|p| p.name.to_lowercase()).collect(),
            );
        }

        let roles = grants.len();
        self.snapshot.store(Arc::new(PolicySnapshot { grants }));
        info!(roles, "policy snapshot reloaded");

        Ok(())
    }

    /// Case-insensitive permission check against the current snapshot
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.snapshot.load().has_permission(role, permission)
    }

    /// The current snapshot, for callers needing several checks against one
    /// consistent generation
    pub fn current(&self) -> Arc<PolicySnapshot> {
        self.snapshot.load_full()
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repository
    }
}
