//! Composition-root factory for the shared converter.
//!
//! One process normally wants exactly one converter: the engine is
//! heavyweight and its assets are large. Rather than an ambient global,
//! the factory is constructed at the composition root and injected into
//! consumers, which keeps lifecycles testable and avoids cross-test
//! leakage.

use std::sync::{Arc, OnceLock};

use crate::engine::EngineLoader;
use crate::environment::HostContext;
use crate::manager::ConverterManager;

/// Default asset base URL when the first caller supplies none.
pub const DEFAULT_BASE_URL: &str = "/engine";

/// Hands out one shared [`ConverterManager`] per factory.
pub struct ConverterFactory {
    host: Arc<dyn HostContext>,
    loader: Arc<dyn EngineLoader>,
    shared: OnceLock<ConverterManager>,
}

impl ConverterFactory {
    pub fn new(host: Arc<dyn HostContext>, loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            host,
            loader,
            shared: OnceLock::new(),
        }
    }

    /// Get the shared converter, constructing it on first call.
    ///
    /// The first caller's `base_url` wins; later calls return the same
    /// manager and their parameter is ignored.
    pub fn converter(&self, base_url: Option<&str>) -> ConverterManager {
        self.shared
            .get_or_init(|| {
                ConverterManager::new(
                    base_url.unwrap_or(DEFAULT_BASE_URL),
                    Arc::clone(&self.host),
                    Arc::clone(&self.loader),
                )
            })
            .clone()
    }
}
