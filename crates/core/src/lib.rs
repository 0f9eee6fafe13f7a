//! Pure domain logic for the docbridge conversion orchestrator.
//!
//! This crate holds everything that needs no I/O:
//!
//! - [`error::ConvertError`] — the error taxonomy shared across the
//!   orchestration layer.
//! - [`formats`] — output format identifiers and input-format derivation.
//! - [`progress`] — progress phases, events, and the deterministic
//!   status-message builder.

pub mod error;
pub mod formats;
pub mod progress;

pub use error::ConvertError;
pub use formats::{input_format_from_name, OutputFormat};
pub use progress::{build_progress_message, ProgressEvent, ProgressPhase};
