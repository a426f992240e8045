//! Local credential file handling.
//!
//! Credentials live in a flat `secrets.json` next to the executable (or in
//! the current directory). All keys are optional in the file; resolving the
//! credentials for the chosen provider fails if a required key is absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// File name probed for in the search path
pub const SECRETS_FILE: &str = "secrets.json";

/// Credential loading errors
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("secrets.json not found next to the executable or in the current directory")]
    NotFound,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("missing or empty key in secrets file: {0}")]
    MissingKey(&'static str),
}

/// Raw contents of `secrets.json`. Keys for both providers share one flat
/// record; only the keys for the selected provider are required at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub aws_account: Option<String>,
    #[serde(default)]
    pub aws_username: Option<String>,
    #[serde(default)]
    pub aws_password: Option<String>,
    #[serde(default)]
    pub azure_email: Option<String>,
    #[serde(default)]
    pub azure_password: Option<String>,
}

/// Credentials for the AWS sign-in form
#[derive(Debug, Clone)]
pub struct AwsSecrets {
    pub account: String,
    pub username: String,
    pub password: String,
}

/// Credentials for the Azure portal login
#[derive(Debug, Clone)]
pub struct AzureSecrets {
    pub email: String,
    pub password: String,
}

impl Secrets {
    /// Load secrets from the given path, or probe the default search path.
    pub fn load(override_path: Option<&Path>) -> Result<Self, SecretsError> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => Self::find()?,
        };
        Self::from_file(&path)
    }

    /// Read and parse a secrets file.
    pub fn from_file(path: &Path) -> Result<Self, SecretsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SecretsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let secrets = serde_json::from_str(&content).map_err(|source| SecretsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded secrets from {}", path.display());
        Ok(secrets)
    }

    /// Find `secrets.json` next to the executable, then in the current directory.
    fn find() -> Result<PathBuf, SecretsError> {
        let candidates = [
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join(SECRETS_FILE))),
            Some(PathBuf::from(SECRETS_FILE)),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .ok_or(SecretsError::NotFound)
    }

    /// Credentials for the AWS flow.
    pub fn aws(&self) -> Result<AwsSecrets, SecretsError> {
        Ok(AwsSecrets {
            account: require(&self.aws_account, "aws_account")?,
            username: require(&self.aws_username, "aws_username")?,
            password: require(&self.aws_password, "aws_password")?,
        })
    }

    /// Credentials for the Azure flow.
    pub fn azure(&self) -> Result<AzureSecrets, SecretsError> {
        Ok(AzureSecrets {
            email: require(&self.azure_email, "azure_email")?,
            password: require(&self.azure_password, "azure_password")?,
        })
    }
}

fn require(field: &Option<String>, key: &'static str) -> Result<String, SecretsError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(SecretsError::MissingKey(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secrets(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(SECRETS_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_full_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            &dir,
            r#"{
                "aws_account": "123456789012",
                "aws_username": "ops",
                "aws_password": "hunter2",
                "azure_email": "ops@example.com",
                "azure_password": "hunter3"
            }"#,
        );

        let secrets = Secrets::from_file(&path).unwrap();
        let aws = secrets.aws().unwrap();
        assert_eq!(aws.account, "123456789012");
        assert_eq!(aws.username, "ops");
        let azure = secrets.azure().unwrap();
        assert_eq!(azure.email, "ops@example.com");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(&dir, "{ not json");

        match Secrets::from_file(&path) {
            Err(SecretsError::Parse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SECRETS_FILE);

        match Secrets::from_file(&path) {
            Err(SecretsError::Read { .. }) => {}
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn missing_provider_key_names_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            &dir,
            r#"{ "aws_account": "123", "aws_username": "ops", "aws_password": "pw" }"#,
        );

        let secrets = Secrets::from_file(&path).unwrap();
        assert!(secrets.aws().is_ok());
        match secrets.azure() {
            Err(SecretsError::MissingKey("azure_email")) => {}
            other => panic!("expected missing azure_email, got {other:?}"),
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            &dir,
            r#"{ "azure_email": "  ", "azure_password": "pw" }"#,
        );

        let secrets = Secrets::from_file(&path).unwrap();
        match secrets.azure() {
            Err(SecretsError::MissingKey("azure_email")) => {}
            other => panic!("expected missing azure_email, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            &dir,
            r#"{ "azure_email": "a@b.c", "azure_password": "pw", "gcp_project": "x" }"#,
        );

        let secrets = Secrets::from_file(&path).unwrap();
        assert!(secrets.azure().is_ok());
    }
}
