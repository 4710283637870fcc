//! Storage scopes.

use crate::constants::STORE_FILE_NAME;
use notify_types::NonEmptyText;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::str::FromStr;

/// Addresses one notification slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// One slot shared by everyone using this deployment's data directory.
    Deployment,
    /// One slot per admin identity.
    Identity(IdentityKey),
}

/// Hex SHA-256 of an admin identifier; only constructible through hashing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StoreScope {
    /// Derives the identity scope for an admin identifier.
    pub fn for_identity(admin_id: &NonEmptyText) -> Self {
        let digest = Sha256::digest(admin_id.as_str().as_bytes());
        StoreScope::Identity(IdentityKey(hex::encode(digest)))
    }

    /// Path of the slot relative to the store root.
    ///
    /// Identity slots are sharded by the first four hex characters of the key:
    /// `<k[0..2]>/<k[2..4]>/<k>/notifications.json`.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            StoreScope::Deployment => PathBuf::from(STORE_FILE_NAME),
            StoreScope::Identity(IdentityKey(key)) => PathBuf::from(&key[0..2])
                .join(&key[2..4])
                .join(key)
                .join(STORE_FILE_NAME),
        }
    }
}

/// How sessions map onto scopes; chosen once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreScopeMode {
    #[default]
    Identity,
    Deployment,
}

impl StoreScopeMode {
    pub fn scope_for(&self, admin_id: &NonEmptyText) -> StoreScope {
        match self {
            StoreScopeMode::Identity => StoreScope::for_identity(admin_id),
            StoreScopeMode::Deployment => StoreScope::Deployment,
        }
    }
}

impl FromStr for StoreScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(StoreScopeMode::Identity),
            "deployment" => Ok(StoreScopeMode::Deployment),
            other => Err(format!(
                "unknown store scope '{}', expected 'identity' or 'deployment'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(id: &str) -> NonEmptyText {
        NonEmptyText::new(id).unwrap()
    }

    #[test]
    fn test_identity_scope_hides_identifier() {
        let scope = StoreScope::for_identity(&admin("admin@example.com"));
        let path = scope.relative_path();
        let text = path.to_string_lossy();

        assert!(!text.contains("admin"));
        assert!(text.ends_with(STORE_FILE_NAME));
        match scope {
            StoreScope::Identity(IdentityKey(key)) => {
                assert_eq!(key.len(), 64);
                assert!(text.starts_with(&format!("{}/{}/{}", &key[0..2], &key[2..4], key)));
            }
            StoreScope::Deployment => panic!("expected identity scope"),
        }
    }

    #[test]
    fn test_identity_scope_is_stable_and_distinct() {
        assert_eq!(
            StoreScope::for_identity(&admin("a1")),
            StoreScope::for_identity(&admin("a1"))
        );
        assert_ne!(
            StoreScope::for_identity(&admin("a1")),
            StoreScope::for_identity(&admin("a2"))
        );
    }

    #[test]
    fn test_deployment_scope_path() {
        assert_eq!(
            StoreScope::Deployment.relative_path(),
            PathBuf::from(STORE_FILE_NAME)
        );
    }

    #[test]
    fn test_scope_mode_parse_and_apply() {
        assert_eq!(
            "Deployment".parse::<StoreScopeMode>().unwrap(),
            StoreScopeMode::Deployment
        );
        assert_eq!(
            " identity ".parse::<StoreScopeMode>().unwrap(),
            StoreScopeMode::Identity
        );
        assert!("per-user".parse::<StoreScopeMode>().is_err());

        assert_eq!(
            StoreScopeMode::Deployment.scope_for(&admin("a1")),
            StoreScope::Deployment
        );
        assert!(matches!(
            StoreScopeMode::Identity.scope_for(&admin("a1")),
            StoreScope::Identity(_)
        ));
    }
}
