use crate::domain::model::{PriceEstimate, RequestDescriptor};
use crate::utils::error::{RemoteEstimationError, Result};
use async_trait::async_trait;
use std::future::Future;

/// Credential compiled into the binary, taken from the build environment.
/// Empty when the crate was built without `TASKPRICE_DEFAULT_API_KEY`.
pub const DEFAULT_CREDENTIAL: &str = match option_env!("TASKPRICE_DEFAULT_API_KEY") {
    Some(key) => key,
    None => "",
};

/// Key-value store holding the single API credential for the pricing service.
pub trait CredentialProvider: Send + Sync {
    fn get(&self) -> impl Future<Output = Result<Option<String>>> + Send;
    fn set(&self, value: &str) -> impl Future<Output = Result<()>> + Send;
    fn delete(&self) -> impl Future<Output = Result<()>> + Send;

    /// Credential used when nothing is stored.
    fn default_credential(&self) -> String {
        DEFAULT_CREDENTIAL.to_string()
    }

    /// Stored credential, else the default. Never fails: a store that cannot
    /// be read counts as empty.
    fn resolve(&self) -> impl Future<Output = String> + Send {
        async move {
            match self.get().await {
                Ok(Some(value)) if !value.trim().is_empty() => value,
                Ok(_) => {
                    tracing::debug!("No stored credential, using default");
                    self.default_credential()
                }
                Err(e) => {
                    tracing::warn!("Credential store unreadable, using default: {}", e);
                    self.default_credential()
                }
            }
        }
    }
}

/// One attempt at pricing a request through an external service.
#[async_trait]
pub trait RemoteEstimator: Send + Sync {
    async fn estimate_remote(
        &self,
        request: &RequestDescriptor,
        credential: &str,
    ) -> std::result::Result<PriceEstimate, RemoteEstimationError>;
}
