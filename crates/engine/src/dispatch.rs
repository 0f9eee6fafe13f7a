//! Conversion dispatch: file read, engine delegation, output
//! normalization.

use std::path::Path;

use docbridge_core::{input_format_from_name, ConvertError, OutputFormat};

use crate::engine::{ConversionEngine, EngineOutput, EngineRequest, OutputBuffer};

/// A converted document: plain (never shared-backed) bytes tagged with
/// the engine-reported MIME type.
#[derive(Debug, Clone)]
pub struct DocumentBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Read the input file, delegate to the engine, and normalize the output.
///
/// Failures during read, delegation, or normalization are logged with the
/// originating file name and propagated unchanged.
pub(crate) async fn convert_file(
    engine: &dyn ConversionEngine,
    path: &Path,
    output_format: OutputFormat,
) -> Result<DocumentBlob, ConvertError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::error!(file = %path.display(), error = %e, "Failed to read input file");
        ConvertError::InputRead {
            name: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    let input_format = input_format_from_name(&file_name);
    tracing::debug!(
        file = %file_name,
        input_format = %input_format,
        output_format = %output_format,
        input_bytes = bytes.len(),
        "Dispatching conversion",
    );

    let output = engine
        .convert(EngineRequest {
            bytes: &bytes,
            input_format: &input_format,
            output_format: output_format.as_str(),
            file_name: &file_name,
        })
        .await
        .map_err(|e| {
            tracing::error!(file = %file_name, error = %e, "Engine conversion failed");
            ConvertError::Engine(e.to_string())
        })?;

    let blob = into_blob(output);
    tracing::debug!(
        file = %file_name,
        output_bytes = blob.bytes.len(),
        mime_type = %blob.mime_type,
        "Conversion complete",
    );
    Ok(blob)
}

/// Wrap engine output as a plain blob.
///
/// Shared-backed buffers are copied into a fresh owned buffer (shared
/// memory is not transferable across the blob boundary); owned buffers
/// are reused without a copy.
fn into_blob(output: EngineOutput) -> DocumentBlob {
    let bytes = match output.buffer {
        OutputBuffer::Owned(bytes) => bytes,
        OutputBuffer::Shared(shared) => shared.to_vec(),
    };
    DocumentBlob {
        bytes,
        mime_type: output.mime_type,
    }
}
