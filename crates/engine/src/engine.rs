//! Trait boundary to the external conversion engine.
//!
//! The engine is a precompiled binary with its own internal pipeline;
//! this layer only constructs it, feeds it conversion jobs, and releases
//! it. Embedders provide an [`EngineLoader`] for their runtime.

use std::sync::Arc;

use async_trait::async_trait;

use docbridge_core::ProgressPhase;

/// Raw progress update emitted by the engine while it loads.
#[derive(Debug, Clone, Copy)]
pub struct EngineProgress {
    pub phase: ProgressPhase,
    /// Completion percentage; engines may report fractional values.
    pub percent: f64,
}

/// Sink for raw engine progress updates during load.
pub type ProgressSink = Arc<dyn Fn(EngineProgress) + Send + Sync>;

/// Engine-side failure, opaque to the orchestration layer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// One conversion job handed to the engine.
pub struct EngineRequest<'a> {
    /// Full contents of the input document.
    pub bytes: &'a [u8],
    /// Input format identifier derived from the file name; empty string
    /// when unknown (the engine falls back to content sniffing).
    pub input_format: &'a str,
    /// Target format identifier.
    pub output_format: &'a str,
    /// Original file name, used by the engine for logging and metadata.
    pub file_name: &'a str,
}

/// Byte buffer returned by the engine.
///
/// Engines running in shared-memory contexts may hand back views into a
/// shared buffer. Shared-backed bytes must be copied before crossing a
/// boundary that rejects shared memory; owned bytes are reused as-is.
#[derive(Debug, Clone)]
pub enum OutputBuffer {
    Owned(Vec<u8>),
    Shared(Arc<[u8]>),
}

/// Result of a conversion call.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub buffer: OutputBuffer,
    /// MIME type reported by the engine for the produced document.
    pub mime_type: String,
}

/// A live, initialized engine instance.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Run one conversion. Failures must not poison the instance; the
    /// engine stays usable for the next call.
    async fn convert(&self, request: EngineRequest<'_>) -> Result<EngineOutput, EngineError>;

    /// Release the engine's resources. Called once during teardown.
    async fn shutdown(&self);
}

/// Constructs and initializes engine instances.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    /// Construct an engine from the assets under `base_url`, streaming raw
    /// progress updates to `on_progress`, and resolve once the engine
    /// reports readiness.
    async fn load(
        &self,
        base_url: &str,
        on_progress: ProgressSink,
    ) -> Result<Box<dyn ConversionEngine>, EngineError>;
}
