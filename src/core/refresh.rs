use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::orchestrator::IndicatorService;
use crate::error::Result;
use crate::models::{LaggingIndicators, LeadingIndicators};

/// Identifies one refresh request. Later requests carry larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published,
    /// A newer refresh was requested while this one was in flight; its result was dropped.
    Superseded,
}

/// Holds the latest published value of one indicator group.
///
/// Overlapping refreshes are not cancelled. Each takes a token when it starts and
/// may only publish while its token is still the newest one issued.
pub struct RefreshCoordinator<T> {
    issued: AtomicU64,
    published: Mutex<Option<(RefreshToken, T)>>,
}

impl<T: Clone> Default for RefreshCoordinator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> RefreshCoordinator<T> {
    pub fn new() -> Self {
        Self { issued: AtomicU64::new(0), published: Mutex::new(None) }
    }

    pub fn begin(&self) -> RefreshToken {
        RefreshToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: RefreshToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    pub fn publish(&self, token: RefreshToken, value: T) -> RefreshOutcome {
        let mut slot = self.published.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.is_latest(token) {
            debug!(token = token.0, "Discarding superseded refresh result");
            return RefreshOutcome::Superseded;
        }
        *slot = Some((token, value));
        RefreshOutcome::Published
    }

    pub fn current(&self) -> Option<T> {
        let slot = self.published.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().map(|(_, value)| value.clone())
    }
}

/// The dashboard's view of both indicator groups across refreshes.
pub struct DashboardState {
    service: Arc<IndicatorService>,
    leading: RefreshCoordinator<LeadingIndicators>,
    lagging: RefreshCoordinator<LaggingIndicators>,
}

impl DashboardState {
    pub fn new(service: Arc<IndicatorService>) -> Self {
        Self {
            service,
            leading: RefreshCoordinator::new(),
            lagging: RefreshCoordinator::new(),
        }
    }

    pub fn leading(&self) -> Option<LeadingIndicators> {
        self.leading.current()
    }

    pub fn lagging(&self) -> Option<LaggingIndicators> {
        self.lagging.current()
    }

    /// Errors from a superseded refresh are dropped along with its data.
    pub async fn refresh_leading(&self) -> Result<RefreshOutcome> {
        let token = self.leading.begin();
        match self.service.get_all_leading_indicators().await {
            Ok(data) => Ok(self.leading.publish(token, data)),
            Err(_) if !self.leading.is_latest(token) => Ok(RefreshOutcome::Superseded),
            Err(e) => Err(e),
        }
    }

    pub async fn refresh_lagging(&self) -> Result<RefreshOutcome> {
        let token = self.lagging.begin();
        match self.service.get_all_lagging_indicators().await {
            Ok(data) => Ok(self.lagging.publish(token, data)),
            Err(_) if !self.lagging.is_latest(token) => Ok(RefreshOutcome::Superseded),
            Err(e) => Err(e),
        }
    }
}
