//! Reusable outbound HTTP session.

use arc_swap::ArcSwapOption;
use scaffold_common::{Result, ScaffoldError};
use std::sync::Arc;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("scaffold-bot/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client that can be closed once at shutdown.
///
/// Clones share the same underlying slot, so closing one handle closes all.
#[derive(Debug, Clone, Default)]
pub struct HttpSession {
    client: Arc<ArcSwapOption<reqwest::Client>>,
}

impl HttpSession {
    /// Builds the client and opens the session.
    pub fn open() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScaffoldError::network_with_source("cannot build HTTP client", e))?;
        info!("HTTP session opened");

        Ok(Self {
            client: Arc::new(ArcSwapOption::new(Some(Arc::new(client)))),
        })
    }

    /// Client for issuing a request; fails once the session is closed.
    pub fn client(&self) -> Result<Arc<reqwest::Client>> {
        self.client
            .load_full()
            .ok_or_else(|| ScaffoldError::network("HTTP session is closed"))
    }

    /// Whether requests can still be issued.
    pub fn is_open(&self) -> bool {
        self.client.load().is_some()
    }

    /// Closes the session. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let was_open = self.client.swap(None).is_some();
        if was_open {
            info!("HTTP session closed");
        } else {
            debug!("HTTP session already closed");
        }
        was_open
    }
}
