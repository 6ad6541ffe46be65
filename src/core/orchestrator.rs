use crate::core::heuristic::HeuristicEstimator;
use crate::core::{CredentialProvider, PriceEstimate, RemoteEstimator, RequestDescriptor};
use crate::utils::error::RemoteEstimationError;
use std::time::Duration;

/// Upper bound for one remote estimate when none is configured.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tries the remote estimator and degrades to the heuristic one on any
/// failure. `estimate` cannot fail.
pub struct PricingOrchestrator<R: RemoteEstimator, C: CredentialProvider> {
    remote: Option<R>,
    credentials: C,
    heuristic: HeuristicEstimator,
    timeout: Duration,
}

impl<R: RemoteEstimator, C: CredentialProvider> PricingOrchestrator<R, C> {
    pub fn new(remote: R, credentials: C) -> Self {
        Self {
            remote: Some(remote),
            credentials,
            heuristic: HeuristicEstimator::new(),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// An orchestrator that never calls out and always prices heuristically.
    pub fn offline(credentials: C) -> Self {
        Self {
            remote: None,
            credentials,
            heuristic: HeuristicEstimator::new(),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub async fn estimate(&self, request: &RequestDescriptor) -> PriceEstimate {
        let Some(remote) = &self.remote else {
            tracing::debug!("Offline mode, pricing heuristically");
            return self.heuristic.estimate(request);
        };

        match self.try_remote(remote, request).await {
            Ok(estimate) => {
                tracing::info!(
                    "Remote estimate for '{}': total {}",
                    request.title(),
                    estimate.total_price
                );
                estimate
            }
            Err(e) => {
                tracing::warn!(
                    kind = e.kind_name(),
                    "Remote pricing failed, using heuristic: {}",
                    e
                );
                self.heuristic.estimate(request)
            }
        }
    }

    async fn try_remote(
        &self,
        remote: &R,
        request: &RequestDescriptor,
    ) -> Result<PriceEstimate, RemoteEstimationError> {
        let credential = self.credentials.resolve().await;
        if credential.is_empty() {
            tracing::debug!("No credential available, remote call will likely be rejected");
        }

        tokio::time::timeout(self.timeout, remote.estimate_remote(request, &credential))
            .await
            .map_err(|_| {
                RemoteEstimationError::NetworkFailure(format!(
                    "No response within {:?}",
                    self.timeout
                ))
            })?
    }
}
