//! Host environment preflight.
//!
//! The engine needs a cross-origin isolated context with shared-memory
//! buffers available, and all of its remote assets must be reachable.
//! Missing isolation headers are by far the most common cause of load
//! failures in the field, so that case fails fast with an error spelling
//! out both observed flags and both required headers.

use docbridge_core::ConvertError;

use crate::assets;

/// Host-context signals consumed by the preflight.
///
/// Embedders implement this against their runtime; tests and the
/// preflight binary use [`StaticHost`].
pub trait HostContext: Send + Sync {
    /// Whether the host context is cross-origin isolated.
    fn cross_origin_isolated(&self) -> bool;

    /// Whether the shared-memory buffer constructor is present.
    fn shared_memory_available(&self) -> bool;
}

/// Fixed host-context flags, typically read from configuration.
#[derive(Debug, Clone, Copy)]
pub struct StaticHost {
    pub cross_origin_isolated: bool,
    pub shared_memory: bool,
}

impl Default for StaticHost {
    fn default() -> Self {
        Self {
            cross_origin_isolated: true,
            shared_memory: true,
        }
    }
}

impl HostContext for StaticHost {
    fn cross_origin_isolated(&self) -> bool {
        self.cross_origin_isolated
    }

    fn shared_memory_available(&self) -> bool {
        self.shared_memory
    }
}

/// Verify isolation flags, then probe every required asset.
///
/// Returns the combined declared size of all assets in bytes. Fails fast
/// on the isolation check; asset probes run concurrently and the first
/// failing probe decides the error (see [`assets::probe_assets`]).
pub async fn check_environment(
    host: &dyn HostContext,
    client: &reqwest::Client,
    base_url: &str,
) -> Result<u64, ConvertError> {
    let cross_origin_isolated = host.cross_origin_isolated();
    let shared_memory = host.shared_memory_available();
    tracing::debug!(cross_origin_isolated, shared_memory, "Host isolation flags");

    if !cross_origin_isolated || !shared_memory {
        let error = ConvertError::EnvironmentUnsupported {
            cross_origin_isolated,
            shared_memory,
        };
        tracing::error!(error = %error, "Environment check failed");
        return Err(error);
    }

    assets::probe_assets(client, base_url).await
}
