//! Public key store configuration

use serde::{Deserialize, Serialize};

/// Location of the PEM-encoded public keys used for token verification.
///
/// Keys are stored one per file as `<directory>/<kid>.pem`, which supports
/// rotation by dropping a new file in place.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyStoreConfig {
    /// Directory containing `<kid>.pem` files
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> String {
    String::from("./keys/public")
}
