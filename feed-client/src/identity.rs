//! Local installation identity.
//!
//! A random author token generated once on first use and persisted in a JSON
//! slot under the caller's data directory. The token is what lets the feed
//! tag posts as "mine" across launches.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use nearcast_types::AuthorId;

const IDENTITY_FILE: &str = "identity.json";

/// Identity persistence errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity file exists but could not be read.
    #[error("failed to read identity file: {0}")]
    Read(#[source] std::io::Error),

    /// The identity file could not be written.
    #[error("failed to write identity file: {0}")]
    Write(#[source] std::io::Error),

    /// The identity file is present but not parseable.
    #[error("invalid identity file: {0}")]
    Invalid(String),
}

/// On-disk form of the identity slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityFile {
    /// Base64 author token.
    author_id: String,
    /// Unix seconds at creation.
    created_at: u64,
}

/// The persisted per-installation identity.
#[derive(Debug, Clone, Copy)]
pub struct InstallationIdentity {
    /// The stable author token for this installation.
    pub author_id: AuthorId,
}

impl InstallationIdentity {
    /// A throwaway identity that is never persisted. For tests and previews.
    pub fn ephemeral() -> Self {
        Self {
            author_id: AuthorId::random(),
        }
    }

    /// Load the identity from `data_dir`, creating and persisting a fresh one
    /// if the slot does not exist yet.
    pub async fn load_or_create(data_dir: &Path) -> Result<Self, IdentityError> {
        let path = data_dir.join(IDENTITY_FILE);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let file: IdentityFile = serde_json::from_str(&contents)
                    .map_err(|e| IdentityError::Invalid(e.to_string()))?;
                let author_id = AuthorId::parse(&file.author_id).ok_or_else(|| {
                    IdentityError::Invalid(format!("bad author token: {}", file.author_id))
                })?;
                Ok(Self { author_id })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let identity = Self {
                    author_id: AuthorId::random(),
                };
                identity.persist(data_dir, &path).await?;
                tracing::info!("created installation identity {}", identity.author_id);
                Ok(identity)
            }
            Err(e) => Err(IdentityError::Read(e)),
        }
    }

    async fn persist(&self, data_dir: &Path, path: &Path) -> Result<(), IdentityError> {
        let file = IdentityFile {
            author_id: self.author_id.to_string(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| IdentityError::Invalid(e.to_string()))?;

        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(IdentityError::Write)?;
        tokio::fs::write(path, contents)
            .await
            .map_err(IdentityError::Write)?;
        set_file_permissions_0600(path).await
    }
}

async fn set_file_permissions_0600(path: &Path) -> Result<(), IdentityError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(IdentityError::Write)?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_identity_on_first_use() {
        let dir = tempdir().unwrap();

        let identity = InstallationIdentity::load_or_create(dir.path())
            .await
            .unwrap();

        assert!(dir.path().join(IDENTITY_FILE).exists());
        // Parse back from the file on disk
        let contents = std::fs::read_to_string(dir.path().join(IDENTITY_FILE)).unwrap();
        let file: IdentityFile = serde_json::from_str(&contents).unwrap();
        assert_eq!(AuthorId::parse(&file.author_id).unwrap(), identity.author_id);
    }

    #[tokio::test]
    async fn reloads_same_identity() {
        let dir = tempdir().unwrap();

        let first = InstallationIdentity::load_or_create(dir.path())
            .await
            .unwrap();
        let second = InstallationIdentity::load_or_create(dir.path())
            .await
            .unwrap();

        assert_eq!(first.author_id, second.author_id);
    }

    #[tokio::test]
    async fn creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let identity = InstallationIdentity::load_or_create(&nested).await;
        assert!(identity.is_ok());
        assert!(nested.join(IDENTITY_FILE).exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(IDENTITY_FILE), "not json").unwrap();

        let result = InstallationIdentity::load_or_create(dir.path()).await;
        assert!(matches!(result, Err(IdentityError::Invalid(_))));
    }

    #[tokio::test]
    async fn bad_token_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(IDENTITY_FILE),
            r#"{"author_id": "tooshort", "created_at": 0}"#,
        )
        .unwrap();

        let result = InstallationIdentity::load_or_create(dir.path()).await;
        assert!(matches!(result, Err(IdentityError::Invalid(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn identity_file_is_0600() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();

        InstallationIdentity::load_or_create(dir.path())
            .await
            .unwrap();

        let mode = std::fs::metadata(dir.path().join(IDENTITY_FILE))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn ephemeral_identities_differ() {
        assert_ne!(
            InstallationIdentity::ephemeral().author_id,
            InstallationIdentity::ephemeral().author_id
        );
    }
}
