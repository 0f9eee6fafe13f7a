//! Environment check and asset probe behavior against a stub asset host.

mod common;

use assert_matches::assert_matches;

use docbridge_core::ConvertError;
use docbridge_engine::assets::{probe_assets, REQUIRED_ASSETS};
use docbridge_engine::environment::{check_environment, StaticHost};

use common::{healthy_asset_server, start_asset_server, AssetResponse};

#[tokio::test]
async fn probe_sums_declared_sizes() {
    let sizes = [100usize, 2048, 300, 40, 5];
    let routes = REQUIRED_ASSETS
        .iter()
        .zip(sizes)
        .map(|(&name, size)| (name, AssetResponse::Sized(size)))
        .collect();
    let base = start_asset_server(routes).await;

    let total = probe_assets(&reqwest::Client::new(), &base).await.unwrap();
    assert_eq!(total, 100 + 2048 + 300 + 40 + 5);
}

#[tokio::test]
async fn missing_content_length_counts_zero() {
    let routes = vec![
        ("engine.js", AssetResponse::Sized(10)),
        ("engine.wasm", AssetResponse::Sized(20)),
        ("engine.data", AssetResponse::Chunked(512)),
        ("engine.worker.js", AssetResponse::Sized(30)),
        ("browser.worker.js", AssetResponse::Sized(40)),
    ];
    let base = start_asset_server(routes).await;

    // The data bundle is reachable but declares no size, so it
    // contributes zero to the total.
    let total = probe_assets(&reqwest::Client::new(), &base).await.unwrap();
    assert_eq!(total, 10 + 20 + 30 + 40);
}

#[tokio::test]
async fn one_missing_asset_fails_naming_it() {
    let routes = REQUIRED_ASSETS
        .iter()
        .map(|&name| {
            if name == "engine.wasm" {
                (name, AssetResponse::Missing)
            } else {
                (name, AssetResponse::Sized(10))
            }
        })
        .collect();
    let base = start_asset_server(routes).await;

    let err = probe_assets(&reqwest::Client::new(), &base)
        .await
        .unwrap_err();
    match err {
        ConvertError::AssetUnavailable { asset, reason } => {
            assert_eq!(asset, "engine.wasm");
            assert!(reason.contains("404"), "unexpected reason: {reason}");
        }
        other => panic!("Expected AssetUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() {
    // Grab a free port, then close it again so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = probe_assets(&reqwest::Client::new(), &format!("http://{addr}"))
        .await
        .unwrap_err();
    match err {
        ConvertError::AssetUnavailable { asset, reason } => {
            assert!(REQUIRED_ASSETS.contains(&asset.as_str()));
            assert!(!reason.is_empty());
        }
        other => panic!("Expected AssetUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn isolation_failure_reports_flags_and_headers() {
    let host = StaticHost {
        cross_origin_isolated: false,
        shared_memory: true,
    };

    // Fails before any probe is issued; the URL is never contacted.
    let err = check_environment(&host, &reqwest::Client::new(), "http://127.0.0.1:1")
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ConvertError::EnvironmentUnsupported {
            cross_origin_isolated: false,
            shared_memory: true,
        }
    );

    let message = err.to_string();
    assert!(message.contains("Cross-Origin-Opener-Policy: same-origin"));
    assert!(message.contains("Cross-Origin-Embedder-Policy: require-corp"));
    assert!(message.contains("crossOriginIsolated=false"));
    assert!(message.contains("SharedArrayBuffer available=true"));
}

#[tokio::test]
async fn check_environment_returns_probe_total() {
    let base = healthy_asset_server(1000).await;
    let total = check_environment(&StaticHost::default(), &reqwest::Client::new(), &base)
        .await
        .unwrap();
    assert_eq!(total, 5000);
}
