//! Role and permission records as returned by the repository.

use serde::{Deserialize, Serialize};

/// A role assignable to principals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Repository identifier
    pub id: i64,

    /// Unique role name (matched case-insensitively during checks)
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

/// A permission grantable to roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Repository identifier
    pub id: i64,

    /// Unique permission name (matched case-insensitively during checks)
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}
