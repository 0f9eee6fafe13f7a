//! Orchestration layer for a precompiled document-conversion engine.
//!
//! The engine itself is an opaque external collaborator reached through
//! the traits in [`engine`]; this crate owns everything around it:
//! environment preflight, asset reachability probing, single-flight
//! initialization with progress reporting, conversion dispatch, and
//! teardown.
//!
//! The hosting server must send cross-origin isolation headers on all
//! responses (`Cross-Origin-Opener-Policy: same-origin`,
//! `Cross-Origin-Embedder-Policy: require-corp`, and a
//! `Cross-Origin-Resource-Policy` allowing cross-origin use). That is a
//! documented contract, not something this crate can enforce.

pub mod assets;
pub mod dispatch;
pub mod engine;
pub mod environment;
pub mod factory;
pub mod manager;

pub use dispatch::DocumentBlob;
pub use engine::{ConversionEngine, EngineLoader, EngineOutput, OutputBuffer};
pub use environment::{HostContext, StaticHost};
pub use factory::ConverterFactory;
pub use manager::{ConverterManager, ProgressCallback};
