//! # Dispatch / Wiring
//!
//! Binds each capability to exactly one backend implementation, once, at
//! startup. Configuration is read a single time and never re-evaluated; the
//! bound set is immutable for the process lifetime.
//!
//! Precedence, one rule per capability:
//!
//! 1. proxy: `server_url` set ⇒ remote client, else in-memory mock;
//! 2. sources + explorations: `store_path` set ⇒ embedded store for BOTH,
//!    else in-memory for both. The two stores always share one backend; a
//!    split (one persistent, one in-memory) must never occur.
//!
//! Capabilities with no backend variant at all (users, roles, permissions,
//! dashboards) answer NotImplemented from a single shared stub regardless
//! of configuration; see `stub_routes`.
//!
//! Any open/validation failure here is a [`StartupError`]: the process
//! aborts before a handler is registered rather than serve half-wired.

use std::fmt;
use std::sync::Arc;

use crate::http_server::config::ServerConfig;
use crate::memory::MemoryBackend;
use crate::persist::PersistentStore;
use crate::remote::RemoteTimeSeries;
use crate::store::{ExplorationStore, SourcesStore, StartupError, TimeSeriesProxy};

/// The runtime pairing of each capability to its bound implementation.
#[derive(Clone)]
pub struct Backends {
    pub sources: Arc<dyn SourcesStore>,
    pub explorations: Arc<dyn ExplorationStore>,
    pub proxy: Arc<dyn TimeSeriesProxy>,
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends")
            .field("sources", &self.sources.backend())
            .field("explorations", &self.explorations.backend())
            .field("proxy", &self.proxy.backend())
            .finish()
    }
}

impl Backends {
    /// Evaluate the wiring rules against `config`.
    pub fn wire(config: &ServerConfig) -> Result<Self, StartupError> {
        let memory = Arc::new(MemoryBackend::new());

        let proxy: Arc<dyn TimeSeriesProxy> = match &config.server_url {
            Some(url) => Arc::new(RemoteTimeSeries::connect(url)?),
            None => memory.clone(),
        };

        let (sources, explorations): (Arc<dyn SourcesStore>, Arc<dyn ExplorationStore>) =
            match &config.store_path {
                Some(path) => {
                    let store = Arc::new(PersistentStore::open(path)?);
                    (store.clone(), store)
                }
                None => (memory.clone(), memory.clone()),
            };

        tracing::info!(
            sources = sources.backend(),
            explorations = explorations.backend(),
            proxy = proxy.backend(),
            "capabilities wired"
        );

        Ok(Self {
            sources,
            explorations,
            proxy,
        })
    }

    /// All-in-memory wiring, for tests and default configurations.
    pub fn in_memory() -> Self {
        let memory = Arc::new(MemoryBackend::new());
        Self {
            sources: memory.clone(),
            explorations: memory.clone(),
            proxy: memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_wiring_shares_one_backend() {
        let backends = Backends::in_memory();
        assert_eq!(backends.sources.backend(), "memory");
        assert_eq!(backends.explorations.backend(), "memory");
        assert_eq!(backends.proxy.backend(), "memory");
    }

    #[test]
    fn test_debug_reports_bound_backends() {
        let rendered = format!("{:?}", Backends::in_memory());
        assert!(rendered.contains("Backends"));
        assert!(rendered.contains("memory"));
    }
}
