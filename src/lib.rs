pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::credential_store::{FileCredentialStore, MemoryCredentialStore};
pub use config::toml_config::PricingConfig;
pub use core::{
    heuristic::HeuristicEstimator,
    orchestrator::PricingOrchestrator,
    remote::GeminiEstimator,
    session::{PriceAdjustmentSession, SharedPriceSession},
};
pub use domain::model::{
    EstimateSource, LineItem, PriceBreakdown, PriceEstimate, RequestDescriptor, Urgency,
};
pub use domain::ports::{CredentialProvider, RemoteEstimator};
pub use utils::error::{PricingError, RemoteEstimationError, Result};
