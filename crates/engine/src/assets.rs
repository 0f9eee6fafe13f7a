//! Required engine assets and reachability probing.
//!
//! Before constructing the engine we verify that every asset it will
//! fetch actually exists, so a missing file surfaces as a clear error
//! naming the file instead of an opaque load failure deep inside the
//! engine. Probes are HEAD requests issued concurrently; the first
//! failure decides the outcome, but probes that already started are left
//! to finish in the background rather than cancelled.

use futures::stream::{FuturesUnordered, StreamExt};

use docbridge_core::ConvertError;

/// Cache-busting version tag appended to every asset request.
pub const ASSET_VERSION: &str = "1.4.2";

/// The five files the engine loads from the asset base URL: the engine
/// script, its binary module, its data bundle, the worker script, and
/// the browser-integration worker script.
pub const REQUIRED_ASSETS: &[&str] = &[
    "engine.js",
    "engine.wasm",
    "engine.data",
    "engine.worker.js",
    "browser.worker.js",
];

/// Build the versioned URL for a single asset.
pub fn asset_url(base_url: &str, name: &str) -> String {
    format!("{}/{name}?v={ASSET_VERSION}", base_url.trim_end_matches('/'))
}

/// Probe all required assets concurrently and sum their declared sizes.
///
/// Returns the combined byte count on success. A response without a
/// `Content-Length` header contributes zero, which can under-report the
/// total; this matches the engine's own loader and is accepted as a
/// known imprecision.
pub async fn probe_assets(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<u64, ConvertError> {
    let mut probes = FuturesUnordered::new();
    for &name in REQUIRED_ASSETS {
        let url = asset_url(base_url, name);
        let client = client.clone();
        let handle = tokio::spawn(async move { probe_asset(&client, name, &url).await });
        probes.push(async move {
            handle.await.unwrap_or_else(|e| {
                Err(ConvertError::AssetUnavailable {
                    asset: name.to_string(),
                    reason: format!("probe task failed: {e}"),
                })
            })
        });
    }

    let mut total: u64 = 0;
    while let Some(result) = probes.next().await {
        total += result?;
    }

    tracing::info!(total_bytes = total, "All engine assets reachable");
    Ok(total)
}

/// HEAD-probe one asset, returning its declared byte length.
async fn probe_asset(
    client: &reqwest::Client,
    name: &str,
    url: &str,
) -> Result<u64, ConvertError> {
    let response = client.head(url).send().await.map_err(|e| {
        tracing::error!(asset = name, error = %e, "Asset probe transport failure");
        ConvertError::AssetUnavailable {
            asset: name.to_string(),
            reason: e.to_string(),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!(asset = name, status = status.as_u16(), "Asset probe rejected");
        return Err(ConvertError::AssetUnavailable {
            asset: name.to_string(),
            reason: format!("HTTP {status}"),
        });
    }

    let declared = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    tracing::debug!(asset = name, bytes = declared, "Asset probe ok");
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_url_appends_version_param() {
        let url = asset_url("https://cdn.example.com/engine", "engine.wasm");
        assert_eq!(
            url,
            format!("https://cdn.example.com/engine/engine.wasm?v={ASSET_VERSION}")
        );
    }

    #[test]
    fn asset_url_tolerates_trailing_slash() {
        let url = asset_url("https://cdn.example.com/engine/", "engine.js");
        assert_eq!(
            url,
            format!("https://cdn.example.com/engine/engine.js?v={ASSET_VERSION}")
        );
    }

    #[test]
    fn manifest_has_five_assets() {
        assert_eq!(REQUIRED_ASSETS.len(), 5);
    }
}
