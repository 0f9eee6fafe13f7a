//! Progress phases, events, and the status-message builder.
//!
//! [`build_progress_message`] is a pure function of the current percent and
//! the total download size computed during the environment check. Keeping
//! it deterministic and side-effect free is what makes the reporting layer
//! testable without a live engine.

use serde::Serialize;

/// Bytes per megabyte as used in user-facing download messages.
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Phase of an orchestration operation, as reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    /// Assets are being fetched.
    Loading,
    /// The engine is starting up.
    Initializing,
    /// A document conversion is running.
    Converting,
    /// A conversion finished.
    Complete,
    /// The engine is ready to accept conversions.
    Ready,
}

/// Immutable progress snapshot delivered to a caller-supplied callback.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    /// Completion percentage (0-100).
    pub percent: u8,
    /// Human-readable status line.
    pub message: String,
}

impl ProgressEvent {
    pub fn new(phase: ProgressPhase, percent: u8, message: impl Into<String>) -> Self {
        Self {
            phase,
            percent,
            message: message.into(),
        }
    }
}

/// Convert a byte total to megabytes for user-facing messages.
pub fn total_size_mb(total_bytes: u64) -> f64 {
    total_bytes as f64 / BYTES_PER_MB
}

/// Build the human-readable status line for a raw progress percent.
///
/// * `percent` in `[95, 100)` — the download is done and the engine is
///   starting; a fixed string, independent of the total.
/// * `percent < 95` with a known total — size-aware download message, both
///   figures in MB with one decimal place.
/// * otherwise (total unknown, or `percent >= 100`) — generic loading
///   message with the rounded integer percent.
///
/// A `total_bytes` of zero means the total is unknown. Probe responses
/// without a content-length header contribute zero to the total, so the
/// downloading figures can under-report; this matches the engine's own
/// behavior and is accepted as a known imprecision.
pub fn build_progress_message(percent: f64, total_bytes: u64) -> String {
    if (95.0..100.0).contains(&percent) {
        "Initializing conversion engine...".to_string()
    } else if total_bytes > 0 && percent < 95.0 {
        let total_mb = total_bytes as f64 / BYTES_PER_MB;
        let done_mb = percent / 100.0 * total_mb;
        format!("Downloading: {done_mb:.1} MB / {total_mb:.1} MB")
    } else {
        format!("Loading conversion engine ({}%)...", percent.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MB: u64 = 10 * 1_048_576;

    #[test]
    fn downloading_message_scales_with_percent() {
        assert_eq!(
            build_progress_message(0.0, TEN_MB),
            "Downloading: 0.0 MB / 10.0 MB"
        );
        assert_eq!(
            build_progress_message(50.0, TEN_MB),
            "Downloading: 5.0 MB / 10.0 MB"
        );
        assert_eq!(
            build_progress_message(94.9, TEN_MB),
            "Downloading: 9.5 MB / 10.0 MB"
        );
    }

    #[test]
    fn downloading_message_rounds_to_one_decimal() {
        // 3 MB total, 33% -> 0.99 MB -> "1.0"
        let total = 3 * 1_048_576;
        assert_eq!(
            build_progress_message(33.0, total),
            "Downloading: 1.0 MB / 3.0 MB"
        );
    }

    #[test]
    fn initializing_band_ignores_total() {
        for percent in [95.0, 97.5, 99.9] {
            assert_eq!(
                build_progress_message(percent, TEN_MB),
                "Initializing conversion engine..."
            );
            assert_eq!(
                build_progress_message(percent, 0),
                "Initializing conversion engine..."
            );
        }
    }

    #[test]
    fn unknown_total_uses_generic_message() {
        assert_eq!(
            build_progress_message(42.0, 0),
            "Loading conversion engine (42%)..."
        );
        assert_eq!(
            build_progress_message(42.4, 0),
            "Loading conversion engine (42%)..."
        );
        assert_eq!(
            build_progress_message(42.5, 0),
            "Loading conversion engine (43%)..."
        );
    }

    #[test]
    fn full_percent_uses_generic_message_even_with_total() {
        assert_eq!(
            build_progress_message(100.0, TEN_MB),
            "Loading conversion engine (100%)..."
        );
    }

    #[test]
    fn event_serializes_with_lowercase_phase() {
        let event = ProgressEvent::new(ProgressPhase::Loading, 5, "msg");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["percent"], 5);
    }
}
