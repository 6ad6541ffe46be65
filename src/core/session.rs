use crate::core::{PriceBreakdown, PriceEstimate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The adjusted price never goes below this.
pub const MINIMUM_PRICE: u64 = 1000;
/// Amount moved by one increment or decrement.
pub const ADJUSTMENT_STEP: u64 = 1000;

/// Holds one estimate while the user tweaks the final price.
///
/// The breakdown and recommended total always come from the original
/// estimate; only the committed price follows the adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceAdjustmentSession {
    estimate: PriceEstimate,
    current_price: u64,
}

impl PriceAdjustmentSession {
    pub fn new(estimate: PriceEstimate) -> Self {
        Self {
            current_price: estimate.total_price,
            estimate,
        }
    }

    /// Moves the current price by `delta`, clamped to [`MINIMUM_PRICE`].
    pub fn adjust(&mut self, delta: i64) -> u64 {
        self.current_price = self
            .current_price
            .saturating_add_signed(delta)
            .max(MINIMUM_PRICE);
        self.current_price
    }

    pub fn increment(&mut self) -> u64 {
        self.adjust(ADJUSTMENT_STEP as i64)
    }

    pub fn decrement(&mut self) -> u64 {
        self.adjust(-(ADJUSTMENT_STEP as i64))
    }

    pub fn current_price(&self) -> u64 {
        self.current_price
    }

    pub fn recommended_price(&self) -> u64 {
        self.estimate.total_price
    }

    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.estimate.breakdown
    }

    pub fn estimate(&self) -> &PriceEstimate {
        &self.estimate
    }

    /// Ends the session and hands back the agreed price.
    pub fn commit(self) -> u64 {
        tracing::info!(
            "Price committed: {} (recommended {})",
            self.current_price,
            self.estimate.total_price
        );
        self.current_price
    }

    pub fn abandon(self) {
        tracing::debug!("Pricing session abandoned at {}", self.current_price);
    }
}

/// Cloneable handle for when several tasks may adjust the same session.
/// Each adjustment is one read-modify-write under the lock.
#[derive(Debug, Clone)]
pub struct SharedPriceSession {
    inner: Arc<Mutex<PriceAdjustmentSession>>,
}

impl SharedPriceSession {
    pub fn new(session: PriceAdjustmentSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn adjust(&self, delta: i64) -> u64 {
        self.lock().adjust(delta)
    }

    pub fn current_price(&self) -> u64 {
        self.lock().current_price()
    }

    pub fn recommended_price(&self) -> u64 {
        self.lock().recommended_price()
    }

    pub fn breakdown(&self) -> PriceBreakdown {
        self.lock().breakdown().clone()
    }

    /// Reads the agreed price under the lock, after any adjustment that
    /// acquired it first.
    pub fn commit(&self) -> u64 {
        let session = self.lock();
        tracing::info!(
            "Price committed: {} (recommended {})",
            session.current_price(),
            session.recommended_price()
        );
        session.current_price()
    }

    /// Snapshot of the underlying session.
    pub fn snapshot(&self) -> PriceAdjustmentSession {
        self.lock().clone()
    }

    // Every mutation is a single store, so a poisoned session is still valid.
    fn lock(&self) -> MutexGuard<'_, PriceAdjustmentSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
