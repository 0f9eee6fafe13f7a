//! Shared test fixtures: a localhost stub server standing in for the
//! asset host.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use docbridge_engine::assets::REQUIRED_ASSETS;

/// How the stub server answers a probe for one asset.
#[derive(Clone, Copy)]
pub enum AssetResponse {
    /// 200 with a `Content-Length` of this many bytes.
    Sized(usize),
    /// 200 without a `Content-Length` header (chunked body).
    Chunked(usize),
    /// No route registered; the server answers 404.
    Missing,
}

/// Start a stub asset host and return its base URL.
pub async fn start_asset_server(routes: Vec<(&'static str, AssetResponse)>) -> String {
    let mut router = Router::new();
    for (name, behavior) in routes {
        let path = format!("/{name}");
        match behavior {
            AssetResponse::Sized(n) => {
                router = router.route(
                    &path,
                    get(move || async move {
                        (
                            StatusCode::OK,
                            [(header::CONTENT_LENGTH, n.to_string())],
                            vec![0u8; n],
                        )
                    }),
                );
            }
            AssetResponse::Chunked(n) => {
                router = router.route(
                    &path,
                    get(move || async move {
                        Body::from_stream(futures::stream::iter(vec![
                            Ok::<_, std::io::Error>(vec![0u8; n]),
                        ]))
                    }),
                );
            }
            AssetResponse::Missing => {}
        }
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// All five required assets present, each with the given size.
pub async fn healthy_asset_server(size: usize) -> String {
    start_asset_server(
        REQUIRED_ASSETS
            .iter()
            .map(|&name| (name, AssetResponse::Sized(size)))
            .collect(),
    )
    .await
}
