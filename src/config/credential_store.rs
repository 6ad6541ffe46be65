use crate::core::CredentialProvider;
use crate::domain::ports::DEFAULT_CREDENTIAL;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    api_key: String,
}

/// Credential kept as `{"api_key": "..."}` in a JSON file. A missing file
/// means nothing is stored.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    default_credential: Option<String>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_credential: None,
        }
    }

    pub fn with_default(mut self, credential: impl Into<String>) -> Self {
        self.default_credential = Some(credential.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: CredentialFile = serde_json::from_str(&content)?;
        Ok(Some(file.api_key).filter(|key| !key.is_empty()))
    }

    async fn set(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&CredentialFile {
            api_key: value.to_string(),
        })?;
        tokio::fs::write(&self.path, json).await?;

        tracing::debug!("Credential written to {}", self.path.display());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn default_credential(&self) -> String {
        self.default_credential
            .clone()
            .unwrap_or_else(|| DEFAULT_CREDENTIAL.to_string())
    }
}

/// In-process store; clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    value: Arc<RwLock<Option<String>>>,
    default_credential: Option<String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(Some(value.into()))),
            default_credential: None,
        }
    }

    pub fn with_default(mut self, credential: impl Into<String>) -> Self {
        self.default_credential = Some(credential.into());
        self
    }
}

impl CredentialProvider for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn set(&self, value: &str) -> Result<()> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn default_credential(&self) -> String {
        self.default_credential
            .clone()
            .unwrap_or_else(|| DEFAULT_CREDENTIAL.to_string())
    }
}

/// Shows only the first and last few characters of a credential.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
