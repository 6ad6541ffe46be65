pub mod heuristic;
pub mod orchestrator;
pub mod remote;
pub mod session;

pub use crate::domain::model::{
    EstimateSource, LineItem, PriceBreakdown, PriceEstimate, RequestDescriptor,
};
pub use crate::domain::ports::{CredentialProvider, RemoteEstimator};
pub use crate::utils::error::Result;
