//! Filesystem-backed key source reading `<directory>/<kid>.pem`.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use authz_core::errors::{DomainError, DomainResult};
use authz_core::repositories::KeySource;
use authz_shared::KeyStoreConfig;

/// Reads PEM-encoded public keys from a directory, one file per `kid`.
///
/// Rotation is a file drop: new kids resolve as soon as their file exists,
/// with no process restart.
pub struct FileKeySource {
    base_dir: PathBuf,
}

impl FileKeySource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn from_config(config: &KeyStoreConfig) -> Self {
        Self::new(config.directory.clone())
    }

    /// Kids become file names, so only a conservative character set is
    /// allowed; anything else is treated as an unknown key.
    fn is_safe_kid(kid: &str) -> bool {
        !kid.is_empty()
            && kid
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[async_trait]
impl KeySource for FileKeySource {
    async fn read_key_material(&self, kid: &str) -> DomainResult<Option<Vec<u8>>> {
        if !Self::is_safe_kid(kid) {
            debug!(kid, "rejected unsafe kid");
            return Ok(None);
        }

        let path = self.base_dir.join(format!("{kid}.pem"));
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DomainError::Internal {
                message: format!("failed to read key file {}: {err}", path.display()),
            }),
        }
    }
}
