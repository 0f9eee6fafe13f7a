//! Error taxonomy for the conversion orchestration layer.
//!
//! Variants carry `String` payloads rather than source errors so the whole
//! enum is `Clone` — a failed initialization attempt is delivered to every
//! caller that subscribed to it.

/// Response header the hosting server must send to enable cross-origin
/// isolation (opener policy).
pub const OPENER_POLICY_HEADER: &str = "Cross-Origin-Opener-Policy: same-origin";

/// Response header the hosting server must send to enable cross-origin
/// isolation (embedder policy).
pub const EMBEDDER_POLICY_HEADER: &str = "Cross-Origin-Embedder-Policy: require-corp";

/// Errors surfaced by the orchestration layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConvertError {
    /// The host context lacks cross-origin isolation or the shared-memory
    /// buffer primitive. Not retryable without server/header changes; by
    /// far the most common root cause, so the message spells out both
    /// observed states and both required headers.
    #[error(
        "environment unsupported: crossOriginIsolated={cross_origin_isolated}, \
         SharedArrayBuffer available={shared_memory}; the server must send \
         `Cross-Origin-Opener-Policy: same-origin` and \
         `Cross-Origin-Embedder-Policy: require-corp`"
    )]
    EnvironmentUnsupported {
        /// Observed cross-origin-isolation flag.
        cross_origin_isolated: bool,
        /// Whether the shared-memory buffer constructor was present.
        shared_memory: bool,
    },

    /// A required remote asset returned a non-success status or was
    /// unreachable. Fatal for the current attempt.
    #[error("required asset unavailable: {asset}: {reason}")]
    AssetUnavailable {
        /// File name of the failing asset.
        asset: String,
        /// HTTP status or transport-level cause.
        reason: String,
    },

    /// Conversion was requested before a ready engine exists.
    #[error("conversion engine is not initialized; call initialize() first")]
    NotInitialized,

    /// The input file could not be read.
    #[error("failed to read input '{name}': {reason}")]
    InputRead {
        /// File name of the input document.
        name: String,
        /// Underlying I/O cause.
        reason: String,
    },

    /// The engine rejected initialization or conversion. Propagated
    /// verbatim after contextual logging.
    #[error("engine failure: {0}")]
    Engine(String),
}
